use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Ordering index of the single section every project currently carries.
pub const FIRST_SECTION: i32 = 1;

/// Body of `POST /projects`. Values are stored exactly as sent.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectInput {
    pub title: String,
    pub content: String,
    /// Tag of the export format the text was produced for, e.g. `docx`.
    pub doc_type: String,
}

/// A row of the `projects` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub doc_type: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i32,
}

/// A row of the `document_sections` table, including its feedback fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentSection {
    pub id: i32,
    pub project_id: i32,
    pub sequence_order: i32,
    pub heading: Option<String>,
    pub content: String,
    pub is_liked: bool,
    pub is_disliked: bool,
    pub user_notes: Option<String>,
}

/// One entry of `GET /projects`: the project with its first section's content.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectSummary {
    pub id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub content: String,
}

/// Response of `GET /projects/{id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub sections: Vec<DocumentSection>,
}

/// Body of `PUT /projects/{id}/feedback`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FeedbackInput {
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_disliked: bool,
    #[serde(default)]
    pub user_notes: Option<String>,
}
