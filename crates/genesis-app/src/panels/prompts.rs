use genesis_core::{tree, Outcome, Prompt, PromptCategory, PromptDraft};

use super::FormMode;
use crate::{Clipboard, Notice, Workspace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptForm {
    pub mode: FormMode,
    pub draft: PromptDraft,
    pub tag_input: String,
}

/// Prompt library with an optional category filter.
#[derive(Debug, Default)]
pub struct PromptPanel {
    filter: Option<PromptCategory>,
    form: Option<PromptForm>,
}

impl PromptPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> Option<PromptCategory> {
        self.filter
    }

    /// `None` shows every category.
    pub fn set_filter(&mut self, category: Option<PromptCategory>) {
        self.filter = category;
    }

    pub fn visible<'a>(&self, ws: &'a Workspace) -> Vec<&'a Prompt> {
        ws.project()
            .prompts
            .iter()
            .filter(|p| self.filter.map_or(true, |c| p.category == c))
            .collect()
    }

    pub fn form(&self) -> Option<&PromptForm> {
        self.form.as_ref()
    }

    /// New prompts start in the filtered category, if any.
    pub fn begin_add(&mut self) {
        self.form = Some(PromptForm {
            mode: FormMode::Adding,
            draft: PromptDraft {
                category: self.filter.unwrap_or_default(),
                ..PromptDraft::default()
            },
            tag_input: String::new(),
        });
    }

    pub fn begin_edit(&mut self, ws: &Workspace, prompt_id: &str) -> bool {
        let Some(prompt) = ws.project().prompt(prompt_id) else {
            return false;
        };
        self.form = Some(PromptForm {
            mode: FormMode::Editing(prompt.id.clone()),
            draft: PromptDraft::from(prompt),
            tag_input: String::new(),
        });
        true
    }

    pub fn cancel(&mut self) {
        self.form = None;
    }

    fn draft_mut(&mut self) -> Option<&mut PromptDraft> {
        self.form.as_mut().map(|f| &mut f.draft)
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(draft) = self.draft_mut() {
            draft.title = title.to_string();
        }
    }

    pub fn set_content(&mut self, content: &str) {
        if let Some(draft) = self.draft_mut() {
            draft.content = content.to_string();
        }
    }

    pub fn set_category(&mut self, category: PromptCategory) {
        if let Some(draft) = self.draft_mut() {
            draft.category = category;
        }
    }

    pub fn set_tag_input(&mut self, input: &str) {
        if let Some(form) = self.form.as_mut() {
            form.tag_input = input.to_string();
        }
    }

    pub fn add_tag(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let tag = form.tag_input.trim().to_string();
        if !tag.is_empty() && !form.draft.tags.contains(&tag) {
            form.draft.tags.push(tag);
        }
        form.tag_input.clear();
    }

    pub fn remove_tag(&mut self, index: usize) {
        if let Some(draft) = self.draft_mut() {
            if index < draft.tags.len() {
                draft.tags.remove(index);
            }
        }
    }

    pub fn submit(&mut self, ws: &mut Workspace) -> Notice {
        let Some(form) = self.form.as_ref() else {
            return Notice::warning("Open the prompt form first");
        };
        if form.draft.title.trim().is_empty() || form.draft.content.trim().is_empty() {
            return Notice::error("Prompt title and content are required");
        }
        let notice = match &form.mode {
            FormMode::Adding => {
                ws.apply(|p| tree::add_prompt(p, &form.draft));
                Notice::success("Prompt added")
            }
            FormMode::Editing(id) => match ws.apply(|p| tree::update_prompt(p, id, &form.draft)) {
                Outcome::NotFound(_) => Notice::error("Prompt no longer exists"),
                _ => Notice::success("Prompt updated"),
            },
        };
        self.form = None;
        notice
    }

    pub fn delete(&mut self, ws: &mut Workspace, prompt_id: &str) -> Notice {
        let editing_it = self
            .form
            .as_ref()
            .is_some_and(|f| f.mode == FormMode::Editing(prompt_id.to_string()));
        if editing_it {
            self.form = None;
        }
        match ws.apply(|p| tree::delete_prompt(p, prompt_id)) {
            Outcome::NotFound(_) => Notice::info("Prompt was already removed"),
            _ => Notice::success("Prompt deleted"),
        }
    }

    pub fn copy(&self, ws: &Workspace, prompt_id: &str, clipboard: &mut dyn Clipboard) -> Notice {
        let Some(prompt) = ws.project().prompt(prompt_id) else {
            return Notice::error("Prompt no longer exists");
        };
        match clipboard.write_text(&prompt.content) {
            Ok(()) => Notice::success("Copied to clipboard"),
            Err(e) => {
                tracing::warn!(error = %e, "copy failed");
                Notice::error(format!("Failed to copy: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClipboardError, MemoryClipboard};
    use genesis_core::seed;
    use genesis_core::settings::MemoryStorage;

    fn workspace() -> Workspace {
        Workspace::new(seed::default_project(), Box::new(MemoryStorage::new()))
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError("denied".to_string()))
        }
    }

    #[test]
    fn filter_narrows_visible_prompts() {
        let mut ws = workspace();
        let mut panel = PromptPanel::new();
        panel.set_filter(Some(PromptCategory::Plot));
        panel.begin_add();
        assert_eq!(panel.form().unwrap().draft.category, PromptCategory::Plot);
        panel.set_title("Twist");
        panel.set_content("Reverse the reader's expectation");
        panel.set_tag_input("  twist ");
        panel.add_tag();
        assert_eq!(panel.submit(&mut ws).message, "Prompt added");

        let titles: Vec<&str> = panel.visible(&ws).iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Twist"]);
        panel.set_filter(None);
        assert_eq!(panel.visible(&ws).len(), 2);
        assert_eq!(ws.project().prompts[1].tags, vec!["twist"]);
    }

    #[test]
    fn missing_title_or_content_is_rejected() {
        let mut ws = workspace();
        let mut panel = PromptPanel::new();
        panel.begin_add();
        panel.set_title("Only a title");
        assert_eq!(panel.submit(&mut ws).level, crate::Level::Error);
        assert_eq!(ws.project().prompts.len(), 1);
    }

    #[test]
    fn edit_changes_category() {
        let mut ws = workspace();
        let mut panel = PromptPanel::new();
        let id = ws.project().prompts[0].id.clone();
        assert!(panel.begin_edit(&ws, &id));
        panel.set_category(PromptCategory::Dialogue);
        panel.remove_tag(99);
        assert_eq!(panel.submit(&mut ws).message, "Prompt updated");
        assert_eq!(ws.project().prompt(&id).unwrap().category, PromptCategory::Dialogue);
    }

    #[test]
    fn copy_puts_content_on_clipboard() {
        let ws = workspace();
        let panel = PromptPanel::new();
        let prompt = &ws.project().prompts[0];
        let mut clipboard = MemoryClipboard::default();
        let notice = panel.copy(&ws, &prompt.id, &mut clipboard);
        assert_eq!(notice.message, "Copied to clipboard");
        assert_eq!(clipboard.contents.as_deref(), Some(prompt.content.as_str()));
    }

    #[test]
    fn copy_failure_is_reported() {
        let ws = workspace();
        let panel = PromptPanel::new();
        let id = ws.project().prompts[0].id.clone();
        let notice = panel.copy(&ws, &id, &mut BrokenClipboard);
        assert_eq!(notice.level, crate::Level::Error);
        assert!(notice.message.contains("denied"));
    }

    #[test]
    fn delete_prompt_twice() {
        let mut ws = workspace();
        let mut panel = PromptPanel::new();
        let id = ws.project().prompts[0].id.clone();
        assert!(panel.delete(&mut ws, &id).is_success());
        assert!(!panel.delete(&mut ws, &id).is_success());
    }
}
