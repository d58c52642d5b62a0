use chrono::Utc;
use genesis_core::settings::{self, PersistError, ProviderConfig, Storage};
use genesis_core::{Chapter, Edit, Outcome, Project, Scene};

/// Which chapter/scene is open. Holds ids only; they may outlive the entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub chapter_id: Option<String>,
    pub scene_id: Option<String>,
}

/// The single owner of the project and the provider settings. Panels borrow
/// it to read and go through [`Workspace::apply`] to change the tree.
pub struct Workspace {
    project: Project,
    provider: ProviderConfig,
    storage: Box<dyn Storage>,
    selection: Selection,
}

impl Workspace {
    /// Open a workspace around `project`, reading provider settings from `storage`.
    pub fn new(project: Project, storage: Box<dyn Storage>) -> Self {
        let provider = settings::load(storage.as_ref());
        Self {
            project,
            provider,
            storage,
            selection: Selection::default(),
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Run a tree operation against the current project and commit its result.
    /// `updated` is stamped only when the tree actually changed.
    pub fn apply(&mut self, op: impl FnOnce(&Project) -> Edit) -> Outcome {
        let Edit { project, outcome } = op(&self.project);
        match &outcome {
            Outcome::NotFound(e) => tracing::debug!(error = %e, "edit skipped"),
            _ if project != self.project => {
                self.project = project;
                self.project.updated = Utc::now();
            }
            _ => {}
        }
        outcome
    }

    /// Persist new provider settings. The in-memory copy only changes once the write succeeds.
    pub fn set_provider(&mut self, config: ProviderConfig) -> Result<(), PersistError> {
        settings::save(self.storage.as_ref(), &config)?;
        self.provider = config;
        Ok(())
    }

    // --- Selection ---

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_scene(&mut self, chapter_id: &str, scene_id: &str) {
        self.selection = Selection {
            chapter_id: Some(chapter_id.to_string()),
            scene_id: Some(scene_id.to_string()),
        };
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    pub fn active_chapter(&self) -> Option<&Chapter> {
        self.project.chapter(self.selection.chapter_id.as_deref()?)
    }

    /// The open scene, resolved against the latest project. `None` once it is deleted.
    pub fn active_scene(&self) -> Option<(&Chapter, &Scene)> {
        let chapter_id = self.selection.chapter_id.as_deref()?;
        let scene_id = self.selection.scene_id.as_deref()?;
        self.project.find_scene(chapter_id, scene_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genesis_core::settings::{MemoryStorage, CONFIG_KEY};
    use genesis_core::{seed, tree};

    fn workspace() -> Workspace {
        Workspace::new(seed::default_project(), Box::new(MemoryStorage::new()))
    }

    #[test]
    fn loads_provider_from_storage() {
        let storage = MemoryStorage::new();
        storage
            .set(
                CONFIG_KEY,
                r#"{"enabled":true,"serverUrl":"http://box:1","model":"gemma"}"#,
            )
            .unwrap();
        let ws = Workspace::new(seed::default_project(), Box::new(storage));
        assert!(ws.provider().enabled);
        assert_eq!(ws.provider().model, "gemma");
    }

    #[test]
    fn apply_commits_and_stamps_changes() {
        let mut ws = workspace();
        let before = ws.project().updated;
        let outcome = ws.apply(|p| tree::add_chapter(p, "Chapter 2"));
        let id = outcome.created_id().unwrap();
        assert!(ws.project().chapter(id).is_some());
        assert!(ws.project().updated >= before);
    }

    #[test]
    fn apply_leaves_project_alone_on_not_found() {
        let mut ws = workspace();
        let before = ws.project().clone();
        let outcome = ws.apply(|p| tree::add_scene(p, "nope", "Scene"));
        assert!(!outcome.is_applied());
        assert_eq!(ws.project(), &before);
    }

    #[test]
    fn selection_is_weak() {
        let mut ws = workspace();
        let chapter_id = ws.project().chapters[0].id.clone();
        let scene_id = ws.project().chapters[0].scenes[0].id.clone();
        ws.select_scene(&chapter_id, &scene_id);
        assert_eq!(ws.active_scene().unwrap().1.title, "The Awakening");

        ws.apply(|p| tree::delete_scene(p, &chapter_id, &scene_id));
        assert!(ws.active_scene().is_none());
        assert!(ws.active_chapter().is_some());

        ws.apply(|p| tree::delete_chapter(p, &chapter_id));
        assert!(ws.active_chapter().is_none());
        assert_eq!(ws.selection().scene_id.as_deref(), Some(scene_id.as_str()));
    }

    #[test]
    fn set_provider_persists_then_updates() {
        let mut ws = workspace();
        let config = ProviderConfig {
            enabled: false,
            server_url: "http://other:1".to_string(),
            model: "phi".to_string(),
        };
        ws.set_provider(config.clone()).unwrap();
        assert_eq!(ws.provider(), &config);
        assert_eq!(settings::load(ws.storage()), config);
    }
}
