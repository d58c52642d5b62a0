use std::env;
use std::path::PathBuf;

use genesis_app::{AssistantPanel, Notice, RequestState, SettingsPanel, StructurePanel, Workspace};
use genesis_core::export::write_artifact;
use genesis_core::settings::{model_label, FileStorage};
use genesis_core::seed;
use genesis_suggest::Purpose;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "Usage:
  genesis status
  genesis check [url] [model] [--enable]
  genesis ask <purpose> <context...>
  genesis export <dir>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let task = args.first().map(|s| s.as_str()).unwrap_or("");

    let storage = FileStorage::at_default_location();
    tracing::debug!(dir = %storage.dir().display(), "using settings directory");
    let mut ws = Workspace::new(seed::default_project(), Box::new(storage));

    match task {
        "status" => status(&ws),
        "check" => check(&mut ws, &args[1..]).await,
        "ask" if args.len() >= 3 => ask(&ws, &args[1], &args[2..]).await,
        "export" if args.len() == 2 => export(&ws, PathBuf::from(&args[1])),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    }
}

fn status(ws: &Workspace) -> Result<(), Box<dyn std::error::Error>> {
    let config = ws.provider();
    println!("{}", serde_json::to_string_pretty(config)?);
    println!(
        "Ollama integration is {} ({} at {})",
        if config.enabled { "enabled" } else { "disabled" },
        model_label(&config.model),
        config.server_url
    );
    Ok(())
}

async fn check(ws: &mut Workspace, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let enable = args.iter().any(|a| a == "--enable");
    let mut positional = args.iter().filter(|a| *a != "--enable");

    let mut panel = SettingsPanel::new(ws);
    if let Some(url) = positional.next() {
        panel.set_server_url(url);
    }
    if let Some(model) = positional.next() {
        panel.set_model(model);
    }

    let tested = panel.test_connection().await;
    report(&tested);
    if !tested.is_success() {
        std::process::exit(1);
    }
    if enable {
        panel.set_enabled(true);
        let saved = panel.save(ws);
        report(&saved);
        if !saved.is_success() {
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn ask(ws: &Workspace, purpose: &str, context: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let purpose: Purpose = purpose.parse()?;
    let mut panel = AssistantPanel::new();
    panel.set_purpose(purpose);
    panel.set_context(&context.join(" "));

    if let Some(notice) = panel.generate(ws.provider()).await {
        report(&notice);
    }
    match panel.state() {
        RequestState::Ready(text) => {
            println!("{text}");
            Ok(())
        }
        _ => std::process::exit(1),
    }
}

fn export(ws: &Workspace, dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let artifact = StructurePanel::new().export_project(ws);
    let path = write_artifact(&dir, &artifact)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn report(notice: &Notice) {
    eprintln!("[{:?}] {}", notice.level, notice.message);
}
