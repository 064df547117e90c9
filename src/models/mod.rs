pub mod project;
pub mod user;

pub use project::{
    DocumentSection, FeedbackInput, Project, ProjectDetail, ProjectInput, ProjectSummary,
    FIRST_SECTION,
};
pub use user::{CurrentUser, User};
