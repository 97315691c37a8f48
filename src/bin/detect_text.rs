use anyhow::{bail, Context};
use humanlens_lib::api::{self, AppState};
use humanlens_lib::services::config_store::ConfigStore;
use humanlens_lib::services::history_store::HistoryStore;
use humanlens_lib::services::Detector;
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;

const USAGE: &str = "Usage:
  detect_text <path|-> [--config <dir>] [--db <path>] [--no-log] [--sensitivity <low|medium|high>]
  detect_text --history [--config <dir>] [--db <path>]

Notes:
  - `-` reads the text from stdin.
  - Results are printed as JSON on stdout; logs go to stderr and the log directory.
  - Set HUMANLENS_DISABLE_FILE_LOG=1 to keep logs on the console only.";

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn read_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read stdin failed")?;
        return Ok(buf);
    }
    std::fs::read_to_string(source).with_context(|| format!("read file failed: {}", source))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let show_history = has_flag(&args, "--history");
    if args.len() < 2 || has_flag(&args, "--help") {
        eprintln!("{}", USAGE);
        return Ok(());
    }

    humanlens_lib::init_logging();

    let config_dir = parse_arg_value(&args, "--config")
        .map(PathBuf::from)
        .or_else(ConfigStore::default_config_dir)
        .context("no config directory available")?;
    let mut config = ConfigStore::new(config_dir)
        .load()
        .context("load config failed")?;

    if let Some(sensitivity) = parse_arg_value(&args, "--sensitivity") {
        config.detection.sensitivity = sensitivity;
        config.detection.decision_threshold = None;
    }
    if let Some(db) = parse_arg_value(&args, "--db") {
        config.history.database_path = Some(PathBuf::from(db));
    }
    if has_flag(&args, "--no-log") {
        config.history.enabled = false;
    }

    if show_history {
        let path = config.history.resolved_database_path();
        let store = HistoryStore::open(&path)
            .await
            .with_context(|| format!("open history failed: {}", path.display()))?;
        let state = AppState::new(Detector::from_config(&config.detection), Some(store));
        let rows = api::history(&state).await?;
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let source = &args[1];
    if source.starts_with("--") {
        bail!("expected an input path or `-` as the first argument\n\n{}", USAGE);
    }
    let text = read_input(source)?;

    let state = AppState::from_config(&config)
        .await
        .context("initialize detector failed")?;
    let body = json!({ "text": text });
    match api::analyze(&state, &body).await {
        Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&e.to_json())?);
            std::process::exit(2);
        }
    }

    if let Some(store) = &state.history {
        store.close().await;
    }
    Ok(())
}
