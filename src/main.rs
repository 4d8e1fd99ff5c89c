use std::io;

use tokio::io::{AsyncBufReadExt, BufReader};
use vanta_agent::chat::SendOutcome;
use vanta_agent::config::{load_config, WidgetConfig};
use vanta_agent::error::WidgetError;
use vanta_agent::observability::init_tracing;
use vanta_agent::widget::{MountRegistry, TranscriptPrinter, Widget};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&config_path).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration from '{config_path}': {e}");
        eprintln!("Please copy 'config.example.yaml' to 'config.yaml' and modify as needed.");
        std::process::exit(1);
    });

    init_tracing(&config.features.log_level);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Failed to initialize Tokio runtime: {e}");
            std::process::exit(1);
        });

    runtime.block_on(async move {
        if let Err(err) = run(config).await {
            eprintln!("vanta-chat: {err}");
            std::process::exit(1);
        }
    });
}

async fn run(config: WidgetConfig) -> Result<(), WidgetError> {
    let mut registry = MountRegistry::new();
    // The terminal stands in for whichever host element the config names.
    if let Some(element_id) = config.element_id.as_deref() {
        registry.register_element(element_id);
    }
    let widget = registry.init(&config)?;
    let _config_task = widget.start();

    tracing::info!(
        session_id = %widget.controller().session_id(),
        base_url = %widget.controller().client().endpoints().base_url(),
        kind = %widget.options().kind,
        position = ?widget.position(),
        "vanta-chat starting"
    );

    widget.controller().wait_for_config().await;
    println!("== {} ==", widget.title());
    let suggestions = widget.suggestions();
    if !suggestions.is_empty() {
        println!("Try: {}", suggestions.join(" | "));
    }
    println!("({}; /quit to exit)", widget.input_placeholder());

    let render_task = tokio::spawn(render_loop(widget.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|err| WidgetError::Transport(format!("reading stdin: {err}")))?
    {
        if line.trim() == "/quit" {
            break;
        }
        if widget.submit(&line).await == SendOutcome::Failed {
            tracing::debug!("exchange failed; error message shown");
        }
    }

    render_task.abort();
    println!();
    Ok(())
}

async fn render_loop(widget: std::sync::Arc<Widget>) {
    let mut changes = widget.controller().subscribe();
    let mut printer = TranscriptPrinter::new();
    loop {
        let messages = widget.controller().messages();
        let rendered = printer.render(&messages, &mut io::stdout().lock());
        if let Err(err) = rendered {
            tracing::warn!("failed to write transcript: {err}");
            return;
        }
        if changes.changed().await.is_err() {
            return;
        }
    }
}
