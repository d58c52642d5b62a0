pub mod clipboard;
pub mod notice;
pub mod panels;
pub mod workspace;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use notice::{Level, Notice};
pub use panels::{
    AssistantPanel, CharacterPanel, ConnectionStatus, EditorPanel, EditorView, FormMode,
    OutlineRow, PromptPanel, RequestState, RowKind, SettingsPanel, StructurePanel, Ticket,
};
pub use workspace::{Selection, Workspace};
