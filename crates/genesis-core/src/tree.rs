//! Pure update operations on the project tree.
//!
//! Every operation borrows the current [`Project`] and hands back an [`Edit`]
//! holding a fresh project value plus what happened. The input is never
//! touched, so callers can compare old and new values to detect change.
//! Unknown ids never fail: the edit carries [`Outcome::NotFound`] and a
//! project equal to the input.

use crate::{new_id, Chapter, Character, CharacterDraft, Project, Prompt, PromptDraft, Scene};

/// An id that did not resolve to anything in the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFound {
    #[error("chapter '{0}' not found")]
    Chapter(String),
    #[error("scene '{scene_id}' not found in chapter '{chapter_id}'")]
    Scene { chapter_id: String, scene_id: String },
    #[error("character '{0}' not found")]
    Character(String),
    #[error("prompt '{0}' not found")]
    Prompt(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new entity was inserted under this id.
    Created(String),
    Updated,
    Removed,
    /// Nothing changed because an id did not resolve.
    NotFound(NotFound),
    /// Nothing changed because no order is left above the existing siblings.
    OrdersExhausted,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Outcome::NotFound(_) | Outcome::OrdersExhausted)
    }

    pub fn created_id(&self) -> Option<&str> {
        match self {
            Outcome::Created(id) => Some(id),
            _ => None,
        }
    }
}

/// Result of a tree operation.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub project: Project,
    pub outcome: Outcome,
}

impl Edit {
    fn applied(project: Project, outcome: Outcome) -> Self {
        Self { project, outcome }
    }

    fn missing(project: &Project, missing: NotFound) -> Self {
        Self {
            project: project.clone(),
            outcome: Outcome::NotFound(missing),
        }
    }

    fn exhausted(project: &Project) -> Self {
        Self {
            project: project.clone(),
            outcome: Outcome::OrdersExhausted,
        }
    }

    /// Collapse into a `Result` for callers that want to treat a missing id as an error.
    pub fn into_result(self) -> Result<Project, NotFound> {
        match self.outcome {
            Outcome::NotFound(e) => Err(e),
            _ => Ok(self.project),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Order for the next child: one past the largest sibling, but never below the
/// parent's high-water mark. `None` once the next order would be `u32::MAX`,
/// which is kept free so the high-water mark always fits.
fn next_order(existing: impl Iterator<Item = u32>, high_water: u32) -> Option<u32> {
    let mut order = high_water;
    for o in existing {
        order = order.max(o.checked_add(1)?);
    }
    (order < u32::MAX).then_some(order)
}

/// Trim, drop empties and drop repeats while keeping first-seen order.
pub fn normalize_labels(labels: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    out
}

// --- Chapters ---

pub fn add_chapter(project: &Project, title: &str) -> Edit {
    let Some(order) = next_order(
        project.chapters.iter().map(|c| c.order),
        project.next_chapter_order,
    ) else {
        return Edit::exhausted(project);
    };
    let mut next = project.clone();
    let id = new_id();
    next.chapters.push(Chapter {
        id: id.clone(),
        title: title.trim().to_string(),
        order,
        scenes: Vec::new(),
        next_scene_order: 0,
    });
    next.next_chapter_order = order + 1;
    Edit::applied(next, Outcome::Created(id))
}

pub fn rename_chapter(project: &Project, chapter_id: &str, title: &str) -> Edit {
    let mut next = project.clone();
    match next.chapters.iter_mut().find(|c| c.id == chapter_id) {
        Some(chapter) => {
            chapter.title = title.trim().to_string();
            Edit::applied(next, Outcome::Updated)
        }
        None => Edit::missing(project, NotFound::Chapter(chapter_id.to_string())),
    }
}

/// Remove a chapter and every scene inside it.
pub fn delete_chapter(project: &Project, chapter_id: &str) -> Edit {
    if project.chapter(chapter_id).is_none() {
        return Edit::missing(project, NotFound::Chapter(chapter_id.to_string()));
    }
    let mut next = project.clone();
    next.chapters.retain(|c| c.id != chapter_id);
    Edit::applied(next, Outcome::Removed)
}

/// Swap a chapter's position with its neighbour in display order.
pub fn move_chapter(project: &Project, chapter_id: &str, direction: Direction) -> Edit {
    if project.chapter(chapter_id).is_none() {
        return Edit::missing(project, NotFound::Chapter(chapter_id.to_string()));
    }
    let ordered = project.ordered_chapters();
    let Some(idx) = ordered.iter().position(|c| c.id == chapter_id) else {
        return Edit::missing(project, NotFound::Chapter(chapter_id.to_string()));
    };
    // At the edge the tree is returned untouched, storage order included.
    if neighbour(idx, ordered.len(), direction).is_none() {
        return Edit::applied(project.clone(), Outcome::Updated);
    }
    let mut next = project.clone();
    next.chapters.sort_by_key(|c| c.order);
    if let Some(other) = neighbour(idx, next.chapters.len(), direction) {
        let a = next.chapters[idx].order;
        next.chapters[idx].order = next.chapters[other].order;
        next.chapters[other].order = a;
        next.chapters.swap(idx, other);
    }
    Edit::applied(next, Outcome::Updated)
}

fn neighbour(idx: usize, len: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Up => idx.checked_sub(1),
        Direction::Down => (idx + 1 < len).then_some(idx + 1),
    }
}

// --- Scenes ---

pub fn add_scene(project: &Project, chapter_id: &str, title: &str) -> Edit {
    let mut next = project.clone();
    let Some(chapter) = next.chapters.iter_mut().find(|c| c.id == chapter_id) else {
        return Edit::missing(project, NotFound::Chapter(chapter_id.to_string()));
    };
    let Some(order) = next_order(chapter.scenes.iter().map(|s| s.order), chapter.next_scene_order)
    else {
        return Edit::exhausted(project);
    };
    let id = new_id();
    chapter.scenes.push(Scene {
        id: id.clone(),
        title: title.trim().to_string(),
        content: String::new(),
        order,
    });
    chapter.next_scene_order = order + 1;
    Edit::applied(next, Outcome::Created(id))
}

/// Replace a scene's text and, when given, its title.
pub fn update_scene_content(
    project: &Project,
    chapter_id: &str,
    scene_id: &str,
    content: &str,
    title: Option<&str>,
) -> Edit {
    let mut next = project.clone();
    let Some(chapter) = next.chapters.iter_mut().find(|c| c.id == chapter_id) else {
        return Edit::missing(project, NotFound::Chapter(chapter_id.to_string()));
    };
    let Some(scene) = chapter.scenes.iter_mut().find(|s| s.id == scene_id) else {
        return Edit::missing(project, missing_scene(chapter_id, scene_id));
    };
    scene.content = content.to_string();
    if let Some(title) = title {
        scene.title = title.to_string();
    }
    Edit::applied(next, Outcome::Updated)
}

pub fn delete_scene(project: &Project, chapter_id: &str, scene_id: &str) -> Edit {
    let Some(chapter) = project.chapter(chapter_id) else {
        return Edit::missing(project, NotFound::Chapter(chapter_id.to_string()));
    };
    if chapter.scene(scene_id).is_none() {
        return Edit::missing(project, missing_scene(chapter_id, scene_id));
    }
    let mut next = project.clone();
    if let Some(chapter) = next.chapters.iter_mut().find(|c| c.id == chapter_id) {
        chapter.scenes.retain(|s| s.id != scene_id);
    }
    Edit::applied(next, Outcome::Removed)
}

pub fn move_scene(project: &Project, chapter_id: &str, scene_id: &str, direction: Direction) -> Edit {
    let Some(current) = project.chapter(chapter_id) else {
        return Edit::missing(project, NotFound::Chapter(chapter_id.to_string()));
    };
    let ordered = current.ordered_scenes();
    let Some(idx) = ordered.iter().position(|s| s.id == scene_id) else {
        return Edit::missing(project, missing_scene(chapter_id, scene_id));
    };
    if neighbour(idx, ordered.len(), direction).is_none() {
        return Edit::applied(project.clone(), Outcome::Updated);
    }
    let mut next = project.clone();
    let Some(chapter) = next.chapters.iter_mut().find(|c| c.id == chapter_id) else {
        return Edit::missing(project, NotFound::Chapter(chapter_id.to_string()));
    };
    chapter.scenes.sort_by_key(|s| s.order);
    if let Some(other) = neighbour(idx, chapter.scenes.len(), direction) {
        let a = chapter.scenes[idx].order;
        chapter.scenes[idx].order = chapter.scenes[other].order;
        chapter.scenes[other].order = a;
        chapter.scenes.swap(idx, other);
    }
    Edit::applied(next, Outcome::Updated)
}

fn missing_scene(chapter_id: &str, scene_id: &str) -> NotFound {
    NotFound::Scene {
        chapter_id: chapter_id.to_string(),
        scene_id: scene_id.to_string(),
    }
}

// --- Characters ---

fn character_from_draft(id: String, draft: &CharacterDraft) -> Character {
    Character {
        id,
        name: draft.name.trim().to_string(),
        description: draft.description.clone(),
        traits: normalize_labels(&draft.traits),
        background: draft.background.clone(),
    }
}

pub fn add_character(project: &Project, draft: &CharacterDraft) -> Edit {
    let mut next = project.clone();
    let id = new_id();
    next.characters.push(character_from_draft(id.clone(), draft));
    Edit::applied(next, Outcome::Created(id))
}

pub fn update_character(project: &Project, character_id: &str, draft: &CharacterDraft) -> Edit {
    let mut next = project.clone();
    match next.characters.iter_mut().find(|c| c.id == character_id) {
        Some(character) => {
            *character = character_from_draft(character.id.clone(), draft);
            Edit::applied(next, Outcome::Updated)
        }
        None => Edit::missing(project, NotFound::Character(character_id.to_string())),
    }
}

pub fn delete_character(project: &Project, character_id: &str) -> Edit {
    if project.character(character_id).is_none() {
        return Edit::missing(project, NotFound::Character(character_id.to_string()));
    }
    let mut next = project.clone();
    next.characters.retain(|c| c.id != character_id);
    Edit::applied(next, Outcome::Removed)
}

// --- Prompts ---

fn prompt_from_draft(id: String, draft: &PromptDraft) -> Prompt {
    Prompt {
        id,
        title: draft.title.trim().to_string(),
        content: draft.content.clone(),
        category: draft.category,
        tags: normalize_labels(&draft.tags),
    }
}

pub fn add_prompt(project: &Project, draft: &PromptDraft) -> Edit {
    let mut next = project.clone();
    let id = new_id();
    next.prompts.push(prompt_from_draft(id.clone(), draft));
    Edit::applied(next, Outcome::Created(id))
}

pub fn update_prompt(project: &Project, prompt_id: &str, draft: &PromptDraft) -> Edit {
    let mut next = project.clone();
    match next.prompts.iter_mut().find(|p| p.id == prompt_id) {
        Some(prompt) => {
            *prompt = prompt_from_draft(prompt.id.clone(), draft);
            Edit::applied(next, Outcome::Updated)
        }
        None => Edit::missing(project, NotFound::Prompt(prompt_id.to_string())),
    }
}

pub fn delete_prompt(project: &Project, prompt_id: &str) -> Edit {
    if project.prompt(prompt_id).is_none() {
        return Edit::missing(project, NotFound::Prompt(prompt_id.to_string()));
    }
    let mut next = project.clone();
    next.prompts.retain(|p| p.id != prompt_id);
    Edit::applied(next, Outcome::Removed)
}
