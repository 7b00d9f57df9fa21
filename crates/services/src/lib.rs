#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_store;
pub mod error;
pub mod progress_store;
pub mod question_store;
pub mod subject;

pub use prep_core::Clock;

pub use app_services::AppServices;
pub use auth_store::AuthStore;
pub use error::AuthError;
pub use progress_store::ProgressStore;
pub use question_store::QuestionStore;
pub use subject::{Subject, SubscriptionId};
