use std::time::Duration;

use genesis_app::panels::RequestState;
use genesis_app::{
    AssistantPanel, EditorPanel, EditorView, Level, SettingsPanel, StructurePanel, Workspace,
};
use genesis_core::settings::{self, FileStorage, MemoryStorage, CONFIG_KEY};
use genesis_core::{export, seed, tree, Project, ProviderConfig};
use genesis_suggest::{compose_request, Purpose};
use genesis_testkit::{Method, Reply, StubServer};

const STUB_BODY: &str = r#"{"models":[{"name":"llama3:latest"}],"response":"Three twists:\n1. The butler was the narrator."}"#;

fn memory_workspace() -> Workspace {
    Workspace::new(seed::default_project(), Box::new(MemoryStorage::new()))
}

#[test]
fn scenes_added_in_sequence_get_increasing_orders() {
    let mut project = Project::new("Draft", "");
    project = tree::add_chapter(&project, "Chapter 1").into_result().unwrap();
    let mut ws = Workspace::new(project, Box::new(MemoryStorage::new()));
    let chapter_id = ws.project().chapters[0].id.clone();
    assert_eq!(ws.project().chapters[0].order, 0);

    let mut structure = StructurePanel::new();
    for title in ["Scene A", "Scene B"] {
        structure.open_scene_form(&chapter_id);
        structure.set_scene_title(title);
        assert!(structure.submit_scene(&mut ws).is_success());
    }

    let chapter = ws.project().chapter(&chapter_id).unwrap();
    let scenes: Vec<(&str, u32)> = chapter
        .ordered_scenes()
        .into_iter()
        .map(|s| (s.title.as_str(), s.order))
        .collect();
    assert_eq!(scenes, vec![("Scene A", 0), ("Scene B", 1)]);
}

#[test]
fn orders_are_not_reused_after_delete() {
    let mut ws = memory_workspace();
    let mut structure = StructurePanel::new();
    structure.open_chapter_form();
    structure.set_chapter_title("Chapter 2");
    structure.submit_chapter(&mut ws);
    let second = ws.project().chapters[1].clone();
    structure.delete_chapter(&mut ws, &second.id);

    structure.open_chapter_form();
    structure.set_chapter_title("Chapter 2, again");
    structure.submit_chapter(&mut ws);
    let again = ws.project().chapters.last().unwrap();
    assert!(again.order > second.order);
    assert_ne!(again.id, second.id);
}

#[test]
fn editor_follows_selection_and_shows_placeholder_after_delete() {
    let mut ws = memory_workspace();
    let mut structure = StructurePanel::new();
    let mut editor = EditorPanel::new();
    let chapter_id = ws.project().chapters[0].id.clone();
    let first = ws.project().chapters[0].scenes[0].id.clone();

    structure.open_scene_form(&chapter_id);
    structure.set_scene_title("The Descent");
    structure.submit_scene(&mut ws);
    let second = ws.project().chapters[0].scenes[1].id.clone();

    assert!(structure.select_scene(&mut ws, &chapter_id, &first));
    editor.sync(&ws);
    editor.set_content("unsaved words");

    structure.select_scene(&mut ws, &chapter_id, &second);
    match editor.view(&ws) {
        EditorView::Editing { title, content, .. } => {
            assert_eq!(title, "The Descent");
            assert_eq!(content, "");
        }
        EditorView::Placeholder => panic!("expected the second scene"),
    }

    structure.delete_scene(&mut ws, &chapter_id, &second);
    assert_eq!(editor.view(&ws), EditorView::Placeholder);
    let (_, scene) = ws.project().find_scene(&chapter_id, &first).unwrap();
    assert!(scene.content.starts_with("It was a cold morning"));
}

#[test]
fn enabled_settings_are_not_saved_untested() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = Workspace::new(
        seed::default_project(),
        Box::new(FileStorage::new(dir.path())),
    );
    let mut panel = SettingsPanel::new(&ws);
    panel.set_enabled(true);

    let notice = panel.save(&mut ws);
    assert_eq!(notice.level, Level::Warning);
    assert!(ws.storage().get(CONFIG_KEY).is_none());
    assert!(!dir.path().join("ollamaConfig.json").exists());
}

#[tokio::test]
async fn tested_settings_persist_across_workspaces() {
    let stub = StubServer::start(Reply::json(200, STUB_BODY)).await;
    let dir = tempfile::tempdir().unwrap();
    let mut ws = Workspace::new(
        seed::default_project(),
        Box::new(FileStorage::new(dir.path())),
    );

    let mut panel = SettingsPanel::new(&ws);
    panel.set_server_url(&stub.url());
    panel.set_model("gemma");
    let tested = panel.test_connection().await;
    assert_eq!(tested.message, "Successfully connected to Ollama server");
    panel.set_enabled(true);
    assert_eq!(panel.save(&mut ws).message, "Ollama settings saved successfully");

    let reopened = settings::load(&FileStorage::new(dir.path()));
    assert_eq!(
        reopened,
        ProviderConfig {
            enabled: true,
            server_url: stub.url(),
            model: "gemma".to_string(),
        }
    );
}

#[tokio::test]
async fn assistant_shows_provider_text_verbatim() {
    let stub = StubServer::start(Reply::json(200, STUB_BODY)).await;
    let config = ProviderConfig {
        enabled: true,
        server_url: stub.url(),
        model: "llama3".to_string(),
    };
    let mut panel = AssistantPanel::new();
    panel.set_context("A detective in 1920s Paris");

    assert!(panel.generate(&config).await.is_none());
    assert_eq!(
        panel.state(),
        &RequestState::Ready("Three twists:\n1. The butler was the narrator.".to_string())
    );

    let request = stub.request().await;
    assert!(request.is(Method::POST, "/api/generate"));
    let sent = request.json();
    assert_eq!(sent["system"], Purpose::PlotIdea.preamble());
    assert_eq!(
        sent["prompt"],
        compose_request(Purpose::PlotIdea, "A detective in 1920s Paris")
    );
}

#[tokio::test]
async fn disabled_assistant_never_contacts_server() {
    let stub = StubServer::start(Reply::json(200, STUB_BODY)).await;
    let config = ProviderConfig {
        enabled: false,
        server_url: stub.url(),
        model: "llama3".to_string(),
    };
    let mut panel = AssistantPanel::new();
    panel.set_context("anything");

    let notice = panel.generate(&config).await.unwrap();
    assert_eq!(notice.level, Level::Error);
    assert!(!stub.was_contacted(Duration::from_millis(50)).await);
}

#[test]
fn result_from_before_cancel_is_dropped() {
    let mut panel = AssistantPanel::new();
    panel.set_context("A storm at sea");
    let (ticket, _) = panel.begin().unwrap();
    panel.cancel();
    assert!(panel
        .finish(ticket, Ok("stale suggestion".to_string()))
        .is_none());
    assert_eq!(panel.state(), &RequestState::Idle);
}

#[tokio::test]
async fn abandoned_generation_does_not_block_the_next_one() {
    let stub = StubServer::start(Reply::Hang).await;
    let config = ProviderConfig {
        enabled: true,
        server_url: stub.url(),
        model: "llama3".to_string(),
    };
    let mut panel = AssistantPanel::new();
    panel.set_context("A lighthouse keeper");

    let abandoned = tokio::time::timeout(Duration::from_millis(200), panel.generate(&config)).await;
    assert!(abandoned.is_err());
    assert!(stub.request().await.is(Method::POST, "/api/generate"));

    assert_eq!(panel.state(), &RequestState::Idle);
    assert!(panel.begin().is_ok());
    assert_eq!(panel.state(), &RequestState::Loading);
}

#[test]
fn export_writes_manuscript_in_order() {
    let mut ws = memory_workspace();
    let mut structure = StructurePanel::new();
    structure.open_chapter_form();
    structure.set_chapter_title("Chapter 2: Departures");
    structure.submit_chapter(&mut ws);
    let second = ws.project().chapters[1].id.clone();
    structure.move_chapter(&mut ws, &second, genesis_core::Direction::Up);

    let dir = tempfile::tempdir().unwrap();
    let artifact = structure.export_project(&ws);
    let path = export::write_artifact(dir.path(), &artifact).unwrap();
    let text = std::fs::read_to_string(path).unwrap();

    let departures = text.find("## Chapter 2: Departures").unwrap();
    let beginnings = text.find("## Chapter 1: Beginnings").unwrap();
    assert!(departures < beginnings);
    assert!(text.starts_with("# My Novel\n"));
}
