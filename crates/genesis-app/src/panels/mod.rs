//! Editing surfaces. Each panel keeps only transient view state (drafts,
//! expanded ids, request status) and re-derives everything else from the
//! [`Workspace`](crate::Workspace) on every read.

mod assistant;
mod characters;
mod editor;
mod prompts;
mod settings;
mod structure;

pub use assistant::{AssistantPanel, RequestState, Ticket};
pub use characters::{CharacterForm, CharacterPanel};
pub use editor::{EditorPanel, EditorView};
pub use prompts::{PromptForm, PromptPanel};
pub use settings::{ConnectionStatus, SettingsPanel};
pub use structure::{OutlineRow, RowKind, StructurePanel};

/// Whether a form is creating a new entity or editing an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Adding,
    Editing(String),
}
