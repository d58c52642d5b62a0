use genesis_core::export::{self, ExportArtifact};
use genesis_core::{text_stats, tree, Outcome, Scene, TextStats};

use crate::{Notice, Workspace};

pub const PLACEHOLDER: &str = "Select a scene to start editing";

/// What the editor shows for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorView {
    Placeholder,
    Editing {
        chapter_title: String,
        title: String,
        content: String,
        stats: TextStats,
        dirty: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Loaded {
    chapter_id: String,
    scene_id: String,
    title: String,
    content: String,
    /// Stored title and content the draft was last loaded from.
    base_title: String,
    base_content: String,
}

impl Loaded {
    fn from_scene(chapter_id: &str, scene: &Scene) -> Self {
        Self {
            chapter_id: chapter_id.to_string(),
            scene_id: scene.id.clone(),
            title: scene.title.clone(),
            content: scene.content.clone(),
            base_title: scene.title.clone(),
            base_content: scene.content.clone(),
        }
    }

    fn is_edited(&self) -> bool {
        self.title != self.base_title || self.content != self.base_content
    }
}

/// Title/content draft for the scene selected in the workspace.
#[derive(Debug, Default)]
pub struct EditorPanel {
    loaded: Option<Loaded>,
}

impl EditorPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload the draft when the workspace selection points at a different
    /// scene, or when the stored scene changed underneath an untouched draft.
    /// Unsaved text for the previous scene is discarded.
    pub fn sync(&mut self, ws: &Workspace) {
        let Some((chapter, scene)) = ws.active_scene() else {
            self.loaded = None;
            return;
        };
        let reload = match self.loaded.as_ref() {
            Some(l) if l.chapter_id == chapter.id && l.scene_id == scene.id => {
                !l.is_edited() && (l.base_title != scene.title || l.base_content != scene.content)
            }
            _ => true,
        };
        if reload {
            tracing::debug!(scene_id = %scene.id, "loading scene into editor");
            self.loaded = Some(Loaded::from_scene(&chapter.id, scene));
        }
    }

    pub fn view(&mut self, ws: &Workspace) -> EditorView {
        self.sync(ws);
        let (Some(loaded), Some((chapter, scene))) = (self.loaded.as_ref(), ws.active_scene())
        else {
            return EditorView::Placeholder;
        };
        EditorView::Editing {
            chapter_title: chapter.title.clone(),
            title: loaded.title.clone(),
            content: loaded.content.clone(),
            stats: text_stats(&loaded.content),
            dirty: is_dirty(loaded, scene),
        }
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.title = title.to_string();
        }
    }

    pub fn set_content(&mut self, content: &str) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.content = content.to_string();
        }
    }

    /// Word and character counts of the draft.
    pub fn stats(&self) -> TextStats {
        self.loaded
            .as_ref()
            .map(|l| text_stats(&l.content))
            .unwrap_or_default()
    }

    pub fn is_dirty(&self, ws: &Workspace) -> bool {
        match (self.loaded.as_ref(), ws.active_scene()) {
            (Some(loaded), Some((_, scene))) if loaded.scene_id == scene.id => {
                is_dirty(loaded, scene)
            }
            _ => false,
        }
    }

    pub fn save(&mut self, ws: &mut Workspace) -> Notice {
        let Some(loaded) = self.loaded.as_ref() else {
            return Notice::warning(PLACEHOLDER);
        };
        let title = loaded.title.trim().to_string();
        let new_title = (!title.is_empty()).then_some(title.as_str());
        let outcome = ws.apply(|p| {
            tree::update_scene_content(
                p,
                &loaded.chapter_id,
                &loaded.scene_id,
                &loaded.content,
                new_title,
            )
        });
        match outcome {
            Outcome::NotFound(e) => {
                tracing::warn!(error = %e, "scene vanished before save");
                self.loaded = None;
                Notice::error("Scene no longer exists")
            }
            _ => {
                // Show what was stored, not the untrimmed draft.
                let stored = self.loaded.as_ref().and_then(|l| {
                    let (chapter, scene) = ws.project().find_scene(&l.chapter_id, &l.scene_id)?;
                    Some(Loaded::from_scene(&chapter.id, scene))
                });
                if stored.is_some() {
                    self.loaded = stored;
                }
                Notice::success("Saved successfully")
            }
        }
    }

    /// The draft as a plain-text artifact, saved or not.
    pub fn export(&self) -> Option<ExportArtifact> {
        let loaded = self.loaded.as_ref()?;
        let scene = Scene {
            id: loaded.scene_id.clone(),
            title: loaded.title.clone(),
            content: loaded.content.clone(),
            order: 0,
        };
        Some(export::export_scene(&scene))
    }
}

fn is_dirty(loaded: &Loaded, scene: &Scene) -> bool {
    loaded.title != scene.title || loaded.content != scene.content
}
