#![forbid(unsafe_code)]

pub mod model;
pub mod stats;
pub mod time;

pub use time::Clock;

pub use model::{
    Category, CategoryStat, Difficulty, OverallProgress, ProgressEntry, Question, QuestionDraft,
    QuestionId, Role, Status, User, UserId, WeeklyBucket,
};
