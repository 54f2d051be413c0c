/// In-memory record store
///
/// All tables live behind a single `RwLock`, so id allocation and insertion
/// happen atomically with respect to other writers. `BTreeMap` keyed by id
/// keeps listings in insertion order.
///
/// Contents are lost when the process exits.

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{
    user::normalize_email, CreateNote, CreatePanelAnalysis, CreateProject, CreateUser, Note,
    PanelAnalysis, Project, ProjectStatus, User,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Per-table id sequences
#[derive(Debug, Default)]
struct Sequences {
    users: i64,
    projects: i64,
    notes: i64,
    analyses: i64,
}

impl Sequences {
    fn next(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    projects: BTreeMap<i64, Project>,
    notes: BTreeMap<i64, Note>,
    analyses: BTreeMap<i64, PanelAnalysis>,
    seq: Sequences,
}

/// Process-local [`RecordStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = normalize_email(email);
        let tables = self.tables.read().await;

        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        let email = normalize_email(&input.email);
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict("Email already exists".to_string()));
        }

        let user = User {
            id: Sequences::next(&mut tables.seq.users),
            email,
            password_hash: input.password_hash,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_project(&self, id: i64) -> StoreResult<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn get_projects_by_owner(&self, user_id: i64) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;

        Ok(tables
            .projects
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_project(&self, input: CreateProject, owner_id: i64) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;

        let project = Project {
            id: Sequences::next(&mut tables.seq.projects),
            user_id: owner_id,
            name: input.name,
            address: input.address,
            description: input.description,
            status: input.status.unwrap_or_default(),
            created_at: Utc::now(),
        };
        tables.projects.insert(project.id, project.clone());

        Ok(project)
    }

    async fn update_project_status(
        &self,
        id: i64,
        status: ProjectStatus,
    ) -> StoreResult<Option<Project>> {
        let mut tables = self.tables.write().await;

        Ok(tables.projects.get_mut(&id).map(|project| {
            project.status = status;
            project.clone()
        }))
    }

    async fn get_notes_by_project(&self, project_id: i64) -> StoreResult<Vec<Note>> {
        let tables = self.tables.read().await;

        Ok(tables
            .notes
            .values()
            .filter(|n| n.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_note(&self, input: CreateNote) -> StoreResult<Note> {
        let mut tables = self.tables.write().await;

        let note = Note {
            id: Sequences::next(&mut tables.seq.notes),
            project_id: input.project_id,
            content: input.content,
            created_at: Utc::now(),
        };
        tables.notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn get_analyses_by_project(&self, project_id: i64) -> StoreResult<Vec<PanelAnalysis>> {
        let tables = self.tables.read().await;

        Ok(tables
            .analyses
            .values()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_analysis(&self, input: CreatePanelAnalysis) -> StoreResult<PanelAnalysis> {
        let mut tables = self.tables.write().await;

        let analysis = PanelAnalysis {
            id: Sequences::next(&mut tables.seq.analyses),
            project_id: input.project_id,
            image_url: input.image_url,
            compliant: input.analysis.compliant,
            analysis: input.analysis,
            created_at: Utc::now(),
        };
        tables.analyses.insert(analysis.id, analysis.clone());

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisResult;

    fn project_input(name: &str) -> CreateProject {
        CreateProject {
            name: name.to_string(),
            address: "1 Test Way".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_user_lowercases_email() {
        let store = MemoryStore::new();
        let user = store
            .create_user(CreateUser {
                email: "Sparky@Example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.email, "sparky@example.com");
        assert_eq!(
            store.get_user_by_email("SPARKY@example.COM").await.unwrap(),
            Some(user)
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let input = |email: &str| CreateUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
        };

        store.create_user(input("a@example.com")).await.unwrap();
        let err = store.create_user(input("A@EXAMPLE.COM")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_project_defaults() {
        let store = MemoryStore::new();
        let project = store.create_project(project_input("Garage"), 9).await.unwrap();

        assert_eq!(project.user_id, 9);
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert!(project.description.is_none());
    }

    #[tokio::test]
    async fn test_ids_are_sequential_per_table() {
        let store = MemoryStore::new();
        let p1 = store.create_project(project_input("One"), 1).await.unwrap();
        let n1 = store
            .create_note(CreateNote {
                project_id: p1.id,
                content: "first".to_string(),
            })
            .await
            .unwrap();
        let p2 = store.create_project(project_input("Two"), 1).await.unwrap();

        assert_eq!(p1.id, 1);
        assert_eq!(p2.id, 2);
        assert_eq!(n1.id, 1);
    }

    #[tokio::test]
    async fn test_listing_preserves_insertion_order() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.create_project(project_input(name), 1).await.unwrap();
        }

        let names: Vec<_> = store
            .get_projects_by_owner(1)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_update_status_of_missing_project() {
        let store = MemoryStore::new();
        let updated = store
            .update_project_status(404, ProjectStatus::Completed)
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_analysis_compliant_copied_from_result() {
        let store = MemoryStore::new();
        let analysis = store
            .create_analysis(CreatePanelAnalysis {
                project_id: 1,
                image_url: "aGVsbG8=".to_string(),
                analysis: AnalysisResult {
                    compliant: true,
                    issues: vec![],
                    recommendations: vec![],
                    summary: "Looks good".to_string(),
                },
            })
            .await
            .unwrap();

        assert!(analysis.compliant);
        assert_eq!(analysis.compliant, analysis.analysis.compliant);
    }
}
