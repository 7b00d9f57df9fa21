use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::QuestionId;

//
// ─── CATALOG ENUMS ─────────────────────────────────────────────────────────────
//

/// Topical bucket a question is classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Java,
    #[serde(rename = "DSA")]
    Dsa,
    #[serde(rename = "DBMS")]
    Dbms,
    #[serde(rename = "HR")]
    Hr,
}

impl Category {
    /// All categories in fixed display order.
    pub const ALL: [Category; 4] = [Category::Java, Category::Dsa, Category::Dbms, Category::Hr];

    /// Returns the display name, which is also the wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Java => "Java",
            Category::Dsa => "DSA",
            Category::Dbms => "DBMS",
            Category::Hr => "HR",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a question, as driven by user action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Caller-supplied fields for a new catalog entry.
///
/// The store assigns the id, status, and notes on insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub hint: Option<String>,
}

impl QuestionDraft {
    /// Materializes the draft into a catalog entry with the given id.
    ///
    /// New questions always start not-started with empty notes.
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            difficulty: self.difficulty,
            tags: self.tags,
            hint: self.hint,
            status: Status::NotStarted,
            notes: String::new(),
        }
    }
}

/// A practice question in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub status: Status,
    #[serde(default)]
    pub notes: String,
}

/// Per-category completion counts derived from a catalog snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: Category,
    pub total: u32,
    pub completed: u32,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_assigns_defaults_on_insertion() {
        let draft = QuestionDraft {
            title: "Two Sum".into(),
            description: "Find indices of two numbers adding to target.".into(),
            category: Category::Dsa,
            difficulty: Difficulty::Easy,
            tags: vec!["Array".into()],
            hint: None,
        };

        let q = draft.assign_id(QuestionId::new("9"));
        assert_eq!(q.id, QuestionId::new("9"));
        assert_eq!(q.status, Status::NotStarted);
        assert!(q.notes.is_empty());
    }

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"not-started\"").unwrap(),
            Status::NotStarted
        );
    }

    #[test]
    fn category_keeps_acronym_wire_names() {
        assert_eq!(serde_json::to_string(&Category::Dsa).unwrap(), "\"DSA\"");
        assert_eq!(
            serde_json::from_str::<Category>("\"DBMS\"").unwrap(),
            Category::Dbms
        );
    }

    #[test]
    fn question_round_trips_through_json() {
        let q = Question {
            id: QuestionId::new("1"),
            title: "Implement Binary Search".into(),
            description: "Write a function to implement binary search.".into(),
            category: Category::Dsa,
            difficulty: Difficulty::Medium,
            tags: vec!["Search".into(), "Algorithm".into()],
            hint: Some("Use divide and conquer".into()),
            status: Status::InProgress,
            notes: "revisit edge cases".into(),
        };

        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn question_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": "7",
            "title": "T",
            "description": "D",
            "category": "HR",
            "difficulty": "Easy",
            "tags": [],
            "status": "completed"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.hint, None);
        assert!(q.notes.is_empty());
        assert_eq!(q.status, Status::Completed);
    }
}
