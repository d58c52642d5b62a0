use crate::{new_id, Chapter, Character, Project, Prompt, PromptCategory, Scene};

/// The project a fresh workspace opens with.
pub fn default_project() -> Project {
    let mut project = Project::new(
        "My Novel",
        "A story about discovery, loss and the courage to begin again.",
    );

    project.chapters.push(Chapter {
        id: new_id(),
        title: "Chapter 1: Beginnings".to_string(),
        order: 0,
        scenes: vec![Scene {
            id: new_id(),
            title: "The Awakening".to_string(),
            content: "It was a cold morning when everything changed...".to_string(),
            order: 0,
        }],
        next_scene_order: 1,
    });
    project.next_chapter_order = 1;

    project.characters.push(Character {
        id: new_id(),
        name: "Alex Morgan".to_string(),
        description: "The protagonist with a mysterious past".to_string(),
        traits: vec![
            "determined".to_string(),
            "secretive".to_string(),
            "resourceful".to_string(),
        ],
        background: "Grew up in a small coastal town and left without explanation at eighteen."
            .to_string(),
    });

    project.prompts.push(Prompt {
        id: new_id(),
        title: "Character Introduction".to_string(),
        content: "Create a detailed character introduction that reveals personality through \
action rather than description."
            .to_string(),
        category: PromptCategory::Character,
        tags: vec!["character".to_string(), "introduction".to_string()],
    });

    project
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;

    #[test]
    fn seed_has_one_of_each() {
        let project = default_project();
        assert_eq!(project.title, "My Novel");
        assert_eq!(project.chapters.len(), 1);
        assert_eq!(project.chapters[0].title, "Chapter 1: Beginnings");
        assert_eq!(project.chapters[0].scenes[0].title, "The Awakening");
        assert_eq!(project.characters[0].name, "Alex Morgan");
        assert_eq!(project.prompts[0].title, "Character Introduction");
    }

    #[test]
    fn seed_counters_continue_after_existing_entries() {
        let project = default_project();
        let chapter_id = project.chapters[0].id.clone();
        let edit = tree::add_scene(&project, &chapter_id, "Second");
        assert_eq!(edit.project.chapters[0].scenes[1].order, 1);
        let edit = tree::add_chapter(&project, "Chapter 2");
        assert_eq!(edit.project.chapters[1].order, 1);
    }
}
