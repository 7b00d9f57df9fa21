use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use prep_core::model::{
    Category, CategoryStat, Difficulty, Question, QuestionDraft, QuestionId, Status,
};
use prep_core::stats;
use storage::{KeyValueStore, keys};

use crate::subject::{Subject, SubscriptionId};

/// Owns the question catalog and mirrors it to persistence.
///
/// Every mutation follows write-then-publish ordering: the new snapshot is
/// written to the persistence adapter first, then delivered to subscribers.
/// A failed write degrades the store to memory-only; the mutation itself is
/// never lost.
#[derive(Clone)]
pub struct QuestionStore {
    kv: Arc<dyn KeyValueStore>,
    catalog: Subject<Vec<Question>>,
    degraded: Arc<AtomicBool>,
}

impl QuestionStore {
    /// Build the store, restoring the persisted catalog or seeding defaults.
    ///
    /// A corrupt persisted snapshot is discarded and overwritten with the
    /// built-in default catalog; this store alone is reseeded.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let degraded = Arc::new(AtomicBool::new(false));
        let initial = load_or_seed(kv.as_ref(), &degraded);
        Self {
            kv,
            catalog: Subject::new(initial),
            degraded,
        }
    }

    /// Registers a subscriber; it immediately receives the current catalog.
    pub fn subscribe(
        &self,
        callback: impl Fn(&Vec<Question>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.catalog.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.catalog.unsubscribe(id);
    }

    /// The current full catalog.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Question> {
        self.catalog.latest()
    }

    /// Appends a new question with a fresh id and returns that id.
    pub fn add(&self, draft: QuestionDraft) -> QuestionId {
        let id = QuestionId::generate();
        let mut questions = self.catalog.latest();
        questions.push(draft.assign_id(id.clone()));
        self.commit(questions);
        id
    }

    /// Removes the matching question; an absent id is a silent no-op.
    pub fn remove(&self, id: &QuestionId) {
        let mut questions = self.catalog.latest();
        questions.retain(|q| &q.id != id);
        self.commit(questions);
    }

    /// Replaces the status of the matching question; absent id is a no-op.
    pub fn set_status(&self, id: &QuestionId, status: Status) {
        let mut questions = self.catalog.latest();
        if let Some(q) = questions.iter_mut().find(|q| &q.id == id) {
            q.status = status;
        }
        self.commit(questions);
    }

    /// Replaces the notes of the matching question; absent id is a no-op.
    pub fn set_notes(&self, id: &QuestionId, notes: impl Into<String>) {
        let mut questions = self.catalog.latest();
        if let Some(q) = questions.iter_mut().find(|q| &q.id == id) {
            q.notes = notes.into();
        }
        self.commit(questions);
    }

    /// Search and filter the latest snapshot; pure read, no mutation.
    #[must_use]
    pub fn search(
        &self,
        term: &str,
        category: Option<Category>,
        difficulty: Option<Difficulty>,
    ) -> Vec<Question> {
        stats::filter_questions(&self.catalog.latest(), term, category, difficulty)
    }

    /// Questions belonging to one category, in catalog order.
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<Question> {
        self.catalog
            .latest()
            .into_iter()
            .filter(|q| q.category == category)
            .collect()
    }

    /// Per-category completion counts, one entry per known category.
    #[must_use]
    pub fn category_stats(&self) -> Vec<CategoryStat> {
        stats::category_stats(&self.catalog.latest())
    }

    /// True once a persistence write has failed this session.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn commit(&self, questions: Vec<Question>) {
        persist(self.kv.as_ref(), &self.degraded, &questions);
        tracing::debug!(count = questions.len(), "question catalog updated");
        self.catalog.publish(questions);
    }
}

fn load_or_seed(kv: &dyn KeyValueStore, degraded: &AtomicBool) -> Vec<Question> {
    match kv.read(keys::QUESTIONS) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(questions) => return questions,
            Err(e) => {
                tracing::warn!(error = %e, "persisted catalog is corrupt, reseeding defaults");
            }
        },
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "catalog read failed, running memory-only");
            degraded.store(true, Ordering::Relaxed);
            return default_catalog();
        }
    }

    let seeded = default_catalog();
    persist(kv, degraded, &seeded);
    seeded
}

fn persist(kv: &dyn KeyValueStore, degraded: &AtomicBool, questions: &[Question]) {
    match serde_json::to_string(questions) {
        Ok(encoded) => {
            if let Err(e) = kv.write(keys::QUESTIONS, &encoded) {
                tracing::warn!(error = %e, "catalog write failed, continuing memory-only");
                degraded.store(true, Ordering::Relaxed);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "catalog encode failed");
            degraded.store(true, Ordering::Relaxed);
        }
    }
}

/// The built-in catalog seeded on first run: six questions spanning all four
/// categories and all three difficulties.
#[must_use]
pub fn default_catalog() -> Vec<Question> {
    let seed = |id: &str,
                title: &str,
                description: &str,
                category: Category,
                difficulty: Difficulty,
                tags: &[&str],
                hint: &str| Question {
        id: QuestionId::new(id),
        title: title.to_owned(),
        description: description.to_owned(),
        category,
        difficulty,
        tags: tags.iter().map(|&t| t.to_owned()).collect(),
        hint: Some(hint.to_owned()),
        status: Status::NotStarted,
        notes: String::new(),
    };

    vec![
        seed(
            "1",
            "What is Object-Oriented Programming?",
            "Explain the four pillars of OOP and provide examples in Java.",
            Category::Java,
            Difficulty::Easy,
            &["OOP", "Fundamentals"],
            "Think about Encapsulation, Inheritance, Polymorphism, and Abstraction",
        ),
        seed(
            "2",
            "Implement Binary Search",
            "Write a function to implement binary search algorithm and analyze its time complexity.",
            Category::Dsa,
            Difficulty::Medium,
            &["Search", "Algorithm"],
            "Use divide and conquer approach",
        ),
        seed(
            "3",
            "Explain Database Normalization",
            "What are the different normal forms? Explain with examples.",
            Category::Dbms,
            Difficulty::Medium,
            &["Normalization", "Database Design"],
            "Start with 1NF, 2NF, 3NF",
        ),
        seed(
            "4",
            "Tell me about yourself",
            "How would you introduce yourself in a professional interview setting?",
            Category::Hr,
            Difficulty::Easy,
            &["Introduction", "Personal"],
            "Keep it professional and relevant to the role",
        ),
        seed(
            "5",
            "Java Memory Management",
            "Explain heap vs stack memory in Java and garbage collection.",
            Category::Java,
            Difficulty::Hard,
            &["Memory", "JVM"],
            "Think about object allocation and method calls",
        ),
        seed(
            "6",
            "Merge Sort Algorithm",
            "Implement merge sort and explain its time and space complexity.",
            Category::Dsa,
            Difficulty::Medium,
            &["Sorting", "Divide and Conquer"],
            "Use recursive approach",
        ),
    ]
}
