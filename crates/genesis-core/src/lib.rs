pub mod export;
pub mod seed;
pub mod settings;
pub mod tree;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use settings::{PersistError, ProviderConfig, Storage};
pub use tree::{Direction, Edit, NotFound, Outcome};

// --- Types ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub order: u32,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    /// Lowest order the next scene may take. Never decreases, so orders
    /// freed by deletion are not handed out again.
    #[serde(default)]
    pub next_scene_order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub background: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptCategory {
    Character,
    Plot,
    Setting,
    Dialogue,
    Conflict,
    /// Also what unknown category names decode to.
    #[default]
    #[serde(other)]
    General,
}

impl PromptCategory {
    pub const ALL: [PromptCategory; 6] = [
        PromptCategory::General,
        PromptCategory::Character,
        PromptCategory::Plot,
        PromptCategory::Setting,
        PromptCategory::Dialogue,
        PromptCategory::Conflict,
    ];

    /// Display label shown in category pickers and on prompt cards.
    pub fn label(self) -> &'static str {
        match self {
            PromptCategory::General => "General",
            PromptCategory::Character => "Character Development",
            PromptCategory::Plot => "Plot Ideas",
            PromptCategory::Setting => "Setting & World Building",
            PromptCategory::Dialogue => "Dialogue",
            PromptCategory::Conflict => "Conflict & Tension",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: PromptCategory,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The whole novel workspace. Owns every chapter, scene, character and prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub next_chapter_order: u32,
}

/// Editable fields of a character, as entered in a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterDraft {
    pub name: String,
    pub description: String,
    pub traits: Vec<String>,
    pub background: String,
}

/// Editable fields of a prompt, as entered in a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptDraft {
    pub title: String,
    pub content: String,
    pub category: PromptCategory,
    pub tags: Vec<String>,
}

impl From<&Character> for CharacterDraft {
    fn from(c: &Character) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
            traits: c.traits.clone(),
            background: c.background.clone(),
        }
    }
}

impl From<&Prompt> for PromptDraft {
    fn from(p: &Prompt) -> Self {
        Self {
            title: p.title.clone(),
            content: p.content.clone(),
            category: p.category,
            tags: p.tags.clone(),
        }
    }
}

// --- Lookups ---

impl Project {
    /// Create an empty project stamped with the current time.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: description.into(),
            updated: Utc::now(),
            chapters: Vec::new(),
            characters: Vec::new(),
            prompts: Vec::new(),
            next_chapter_order: 0,
        }
    }

    pub fn chapter(&self, chapter_id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == chapter_id)
    }

    pub fn find_scene(&self, chapter_id: &str, scene_id: &str) -> Option<(&Chapter, &Scene)> {
        let chapter = self.chapter(chapter_id)?;
        let scene = chapter.scene(scene_id)?;
        Some((chapter, scene))
    }

    pub fn character(&self, character_id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == character_id)
    }

    pub fn prompt(&self, prompt_id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == prompt_id)
    }

    /// Chapters in display order.
    pub fn ordered_chapters(&self) -> Vec<&Chapter> {
        let mut chapters: Vec<&Chapter> = self.chapters.iter().collect();
        chapters.sort_by_key(|c| c.order);
        chapters
    }
}

impl Chapter {
    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    /// Scenes in display order.
    pub fn ordered_scenes(&self) -> Vec<&Scene> {
        let mut scenes: Vec<&Scene> = self.scenes.iter().collect();
        scenes.sort_by_key(|s| s.order);
        scenes
    }
}

// --- Text statistics ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
}

pub fn text_stats(text: &str) -> TextStats {
    TextStats {
        words: text.split_whitespace().count(),
        characters: text.chars().count(),
    }
}

/// Generate a fresh entity id. Ids are random, so a deleted entity's id is
/// never handed to a new one.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
