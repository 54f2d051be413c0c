/// Record types for PanelCheck
///
/// These are plain data structures shared by both store backends and by the
/// HTTP layer. Persistence lives in [`crate::store`].
///
/// # Models
///
/// - `user`: User accounts
/// - `project`: Projects (job sites) owned by a user
/// - `note`: Append-only project notes
/// - `panel_analysis`: NEC compliance verdicts for panel photos

pub mod note;
pub mod panel_analysis;
pub mod project;
pub mod user;

pub use note::{CreateNote, Note};
pub use panel_analysis::{AnalysisResult, CreatePanelAnalysis, PanelAnalysis};
pub use project::{CreateProject, Project, ProjectStatus};
pub use user::{CreateUser, User};
