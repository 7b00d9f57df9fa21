use std::path::Path;
use std::sync::Arc;

use prep_core::time::Clock;
use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

use crate::auth_store::AuthStore;
use crate::progress_store::ProgressStore;
use crate::question_store::QuestionStore;

/// Assembles the three stores over one shared persistence adapter.
///
/// This is the composition root the presentation layer holds; the stores
/// stay independent and never call each other.
#[derive(Clone)]
pub struct AppServices {
    questions: Arc<QuestionStore>,
    progress: Arc<ProgressStore>,
    auth: Arc<AuthStore>,
}

impl AppServices {
    /// Build stores over an existing adapter.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        Self {
            questions: Arc::new(QuestionStore::new(Arc::clone(&kv))),
            progress: Arc::new(ProgressStore::new(Arc::clone(&kv), clock)),
            auth: Arc::new(AuthStore::new(kv)),
        }
    }

    /// Build stores over a throwaway in-memory adapter.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(Arc::new(MemoryStore::new()), clock)
    }

    /// Build stores over a file-backed adapter rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>, clock: Clock) -> Result<Self, StorageError> {
        let kv = FileStore::open(dir.as_ref().to_path_buf())?;
        Ok(Self::new(Arc::new(kv), clock))
    }

    #[must_use]
    pub fn questions(&self) -> Arc<QuestionStore> {
        Arc::clone(&self.questions)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthStore> {
        Arc::clone(&self.auth)
    }
}
