use genesis_core::{tree, Character, CharacterDraft, Outcome};

use super::FormMode;
use crate::{Notice, Workspace};

/// The add/edit character form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterForm {
    pub mode: FormMode,
    pub draft: CharacterDraft,
    pub trait_input: String,
}

impl CharacterForm {
    fn adding() -> Self {
        Self {
            mode: FormMode::Adding,
            draft: CharacterDraft::default(),
            trait_input: String::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CharacterPanel {
    form: Option<CharacterForm>,
}

impl CharacterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Characters in insertion order.
    pub fn cards<'a>(&self, ws: &'a Workspace) -> &'a [Character] {
        &ws.project().characters
    }

    pub fn form(&self) -> Option<&CharacterForm> {
        self.form.as_ref()
    }

    pub fn begin_add(&mut self) {
        self.form = Some(CharacterForm::adding());
    }

    /// Open the form on an existing character. Returns false if it is gone.
    pub fn begin_edit(&mut self, ws: &Workspace, character_id: &str) -> bool {
        let Some(character) = ws.project().character(character_id) else {
            return false;
        };
        self.form = Some(CharacterForm {
            mode: FormMode::Editing(character.id.clone()),
            draft: CharacterDraft::from(character),
            trait_input: String::new(),
        });
        true
    }

    pub fn cancel(&mut self) {
        self.form = None;
    }

    fn draft_mut(&mut self) -> Option<&mut CharacterDraft> {
        self.form.as_mut().map(|f| &mut f.draft)
    }

    pub fn set_name(&mut self, name: &str) {
        if let Some(draft) = self.draft_mut() {
            draft.name = name.to_string();
        }
    }

    pub fn set_description(&mut self, description: &str) {
        if let Some(draft) = self.draft_mut() {
            draft.description = description.to_string();
        }
    }

    pub fn set_background(&mut self, background: &str) {
        if let Some(draft) = self.draft_mut() {
            draft.background = background.to_string();
        }
    }

    pub fn set_trait_input(&mut self, input: &str) {
        if let Some(form) = self.form.as_mut() {
            form.trait_input = input.to_string();
        }
    }

    /// Move the trait input into the trait list. Blank and duplicate input is dropped.
    pub fn add_trait(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let value = form.trait_input.trim().to_string();
        if !value.is_empty() && !form.draft.traits.contains(&value) {
            form.draft.traits.push(value);
        }
        form.trait_input.clear();
    }

    pub fn remove_trait(&mut self, index: usize) {
        if let Some(draft) = self.draft_mut() {
            if index < draft.traits.len() {
                draft.traits.remove(index);
            }
        }
    }

    pub fn submit(&mut self, ws: &mut Workspace) -> Notice {
        let Some(form) = self.form.as_ref() else {
            return Notice::warning("Open the character form first");
        };
        if form.draft.name.trim().is_empty() {
            return Notice::error("Character name is required");
        }
        let notice = match &form.mode {
            FormMode::Adding => {
                ws.apply(|p| tree::add_character(p, &form.draft));
                Notice::success("Character added")
            }
            FormMode::Editing(id) => match ws.apply(|p| tree::update_character(p, id, &form.draft)) {
                Outcome::NotFound(_) => Notice::error("Character no longer exists"),
                _ => Notice::success("Character updated"),
            },
        };
        self.form = None;
        notice
    }

    pub fn delete(&mut self, ws: &mut Workspace, character_id: &str) -> Notice {
        let editing_it = self
            .form
            .as_ref()
            .is_some_and(|f| f.mode == FormMode::Editing(character_id.to_string()));
        if editing_it {
            self.form = None;
        }
        match ws.apply(|p| tree::delete_character(p, character_id)) {
            Outcome::NotFound(_) => Notice::info("Character was already removed"),
            _ => Notice::success("Character deleted"),
        }
    }
}
