use std::collections::HashSet;

use genesis_core::export::{self, ExportArtifact};
use genesis_core::tree::{self, Direction};
use genesis_core::Outcome;
use serde::Serialize;

use crate::{Notice, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Chapter,
    Scene,
}

/// One line of the chapter/scene outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineRow {
    pub kind: RowKind,
    pub id: String,
    pub chapter_id: String,
    pub title: String,
    pub expanded: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
struct SceneDraft {
    chapter_id: String,
    title: String,
}

/// Chapter and scene browser.
#[derive(Debug, Default)]
pub struct StructurePanel {
    expanded: HashSet<String>,
    chapter_draft: Option<String>,
    scene_draft: Option<SceneDraft>,
}

impl StructurePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_chapter(&mut self, chapter_id: &str) {
        if !self.expanded.remove(chapter_id) {
            self.expanded.insert(chapter_id.to_string());
        }
    }

    pub fn is_expanded(&self, chapter_id: &str) -> bool {
        self.expanded.contains(chapter_id)
    }

    /// Chapters in order, each followed by its scenes when expanded.
    pub fn outline(&self, ws: &Workspace) -> Vec<OutlineRow> {
        let selection = ws.selection();
        let mut rows = Vec::new();
        for chapter in ws.project().ordered_chapters() {
            let expanded = self.is_expanded(&chapter.id);
            rows.push(OutlineRow {
                kind: RowKind::Chapter,
                id: chapter.id.clone(),
                chapter_id: chapter.id.clone(),
                title: chapter.title.clone(),
                expanded,
                active: selection.chapter_id.as_deref() == Some(chapter.id.as_str()),
            });
            if !expanded {
                continue;
            }
            for scene in chapter.ordered_scenes() {
                rows.push(OutlineRow {
                    kind: RowKind::Scene,
                    id: scene.id.clone(),
                    chapter_id: chapter.id.clone(),
                    title: scene.title.clone(),
                    expanded: false,
                    active: selection.chapter_id.as_deref() == Some(chapter.id.as_str())
                        && selection.scene_id.as_deref() == Some(scene.id.as_str()),
                });
            }
        }
        rows
    }

    // --- Add chapter form ---

    pub fn open_chapter_form(&mut self) {
        self.chapter_draft = Some(String::new());
    }

    pub fn chapter_form(&self) -> Option<&str> {
        self.chapter_draft.as_deref()
    }

    pub fn set_chapter_title(&mut self, title: &str) {
        if let Some(draft) = self.chapter_draft.as_mut() {
            *draft = title.to_string();
        }
    }

    pub fn cancel_chapter_form(&mut self) {
        self.chapter_draft = None;
    }

    pub fn submit_chapter(&mut self, ws: &mut Workspace) -> Notice {
        let Some(title) = self.chapter_draft.as_deref().map(str::trim) else {
            return Notice::warning("Open the chapter form first");
        };
        if title.is_empty() {
            return Notice::error("Chapter title cannot be empty");
        }
        let title = title.to_string();
        if ws.apply(|p| tree::add_chapter(p, &title)) == Outcome::OrdersExhausted {
            return Notice::error("No room for another chapter");
        }
        self.chapter_draft = None;
        Notice::success("Chapter added")
    }

    // --- Add scene form ---

    pub fn open_scene_form(&mut self, chapter_id: &str) {
        self.scene_draft = Some(SceneDraft {
            chapter_id: chapter_id.to_string(),
            title: String::new(),
        });
    }

    /// The chapter the scene form targets, if open.
    pub fn scene_form_chapter(&self) -> Option<&str> {
        self.scene_draft.as_ref().map(|d| d.chapter_id.as_str())
    }

    pub fn set_scene_title(&mut self, title: &str) {
        if let Some(draft) = self.scene_draft.as_mut() {
            draft.title = title.to_string();
        }
    }

    pub fn cancel_scene_form(&mut self) {
        self.scene_draft = None;
    }

    pub fn submit_scene(&mut self, ws: &mut Workspace) -> Notice {
        let Some(draft) = self.scene_draft.as_ref() else {
            return Notice::warning("Open the scene form first");
        };
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Notice::error("Scene title cannot be empty");
        }
        let chapter_id = draft.chapter_id.clone();
        match ws.apply(|p| tree::add_scene(p, &chapter_id, &title)) {
            Outcome::NotFound(e) => {
                self.scene_draft = None;
                Notice::error(format!("Could not add scene: {e}"))
            }
            Outcome::OrdersExhausted => Notice::error("No room for another scene in this chapter"),
            _ => {
                self.scene_draft = None;
                self.expanded.insert(chapter_id);
                Notice::success("Scene added")
            }
        }
    }

    // --- Row actions ---

    /// Open a scene in the editor. Returns false when the ids no longer resolve.
    pub fn select_scene(&self, ws: &mut Workspace, chapter_id: &str, scene_id: &str) -> bool {
        if ws.project().find_scene(chapter_id, scene_id).is_none() {
            return false;
        }
        ws.select_scene(chapter_id, scene_id);
        true
    }

    pub fn rename_chapter(&mut self, ws: &mut Workspace, chapter_id: &str, title: &str) -> Notice {
        if title.trim().is_empty() {
            return Notice::error("Chapter title cannot be empty");
        }
        match ws.apply(|p| tree::rename_chapter(p, chapter_id, title)) {
            Outcome::NotFound(e) => Notice::error(e.to_string()),
            _ => Notice::success("Chapter renamed"),
        }
    }

    pub fn delete_chapter(&mut self, ws: &mut Workspace, chapter_id: &str) -> Notice {
        self.expanded.remove(chapter_id);
        if self.scene_form_chapter() == Some(chapter_id) {
            self.scene_draft = None;
        }
        match ws.apply(|p| tree::delete_chapter(p, chapter_id)) {
            Outcome::NotFound(_) => Notice::info("Chapter was already removed"),
            _ => Notice::success("Chapter deleted"),
        }
    }

    pub fn delete_scene(&mut self, ws: &mut Workspace, chapter_id: &str, scene_id: &str) -> Notice {
        match ws.apply(|p| tree::delete_scene(p, chapter_id, scene_id)) {
            Outcome::NotFound(_) => Notice::info("Scene was already removed"),
            _ => Notice::success("Scene deleted"),
        }
    }

    pub fn move_chapter(&mut self, ws: &mut Workspace, chapter_id: &str, direction: Direction) {
        ws.apply(|p| tree::move_chapter(p, chapter_id, direction));
    }

    pub fn move_scene(
        &mut self,
        ws: &mut Workspace,
        chapter_id: &str,
        scene_id: &str,
        direction: Direction,
    ) {
        ws.apply(|p| tree::move_scene(p, chapter_id, scene_id, direction));
    }

    // --- Export ---

    pub fn export_project(&self, ws: &Workspace) -> ExportArtifact {
        export::export_project(ws.project())
    }

    pub fn export_chapter(&self, ws: &Workspace, chapter_id: &str) -> Option<ExportArtifact> {
        ws.project().chapter(chapter_id).map(export::export_chapter)
    }

    pub fn export_scene(
        &self,
        ws: &Workspace,
        chapter_id: &str,
        scene_id: &str,
    ) -> Option<ExportArtifact> {
        ws.project()
            .find_scene(chapter_id, scene_id)
            .map(|(_, scene)| export::export_scene(scene))
    }
}
