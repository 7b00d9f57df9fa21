mod ids;
mod progress;
mod question;
mod user;

pub use ids::{QuestionId, UserId};
pub use progress::{ProgressEntry, WeeklyBucket};
pub use question::{Category, CategoryStat, Difficulty, Question, QuestionDraft, Status};
pub use user::{Role, User};

use serde::{Deserialize, Serialize};

/// Completion ratio across the whole catalog, derived on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallProgress {
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}
