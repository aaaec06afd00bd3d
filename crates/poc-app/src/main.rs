mod cli;
mod command;
mod repl;

use std::path::Path;
use std::time::Duration;

use poc_chat::{ChatSession, EndpointConfig, HttpLeadSink, HttpTransport};
use poc_common::PocError;
use poc_config::PocConfig;
use tracing_subscriber::EnvFilter;

use repl::ChatRepl;

/// Crates whose log level follows `--log-level` / `[logging] level`.
const LOG_TARGETS: &[&str] = &["poc_app", "poc_chat", "poc_config"];

/// Load environment variables from a .env file (KEY=VALUE lines).
/// Variables already set in the environment win.
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

/// Logs go to stderr so they never interleave with the rendered reply.
fn init_logging(level: &str) {
    let mut filter = EnvFilter::from_default_env();
    for target in LOG_TARGETS {
        match format!("{target}={level}").parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("ignoring log level {level:?} for {target}: {e}"),
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> (PocConfig, Option<String>) {
    let loaded = match path {
        Some(path) => poc_config::load_config_from(Path::new(path)),
        None => poc_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (PocConfig::default(), Some(e.to_string())),
    }
}

async fn run(args: cli::Args, config: PocConfig) -> Result<(), PocError> {
    let api_key = std::env::var(&config.chat.api_key_env).unwrap_or_else(|_| {
        tracing::warn!(
            "{} is not set; requests will be sent without credentials",
            config.chat.api_key_env
        );
        String::new()
    });

    let endpoint = args.endpoint.unwrap_or_else(|| config.chat.endpoint.clone());
    tracing::info!("Chat endpoint: {endpoint}");
    let transport = HttpTransport::new(
        EndpointConfig::new(endpoint, api_key.clone())
            .with_connect_timeout(config.chat.connect_timeout()),
    )
    .map_err(|e| PocError::Chat(e.to_string()))?;

    let interval = args
        .typing_interval_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.chat.typing_interval());
    let session = ChatSession::new().with_typing_interval(interval);

    let mut repl = ChatRepl::new(session, Box::new(transport), std::io::stdout());
    if config.leads.enabled {
        let sink = HttpLeadSink::new(
            EndpointConfig::new(config.leads.endpoint.clone(), api_key)
                .with_connect_timeout(config.chat.connect_timeout()),
        )
        .map_err(|e| PocError::Lead(e.to_string()))?;
        repl = repl.with_leads(Box::new(sink));
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    repl.run(stdin).await?;
    tracing::info!(
        messages = repl.session().message_count(),
        "chat session ended"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    load_dotenv();

    let args = cli::parse();
    let (config, config_error) = load_config(args.config.as_deref());

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.to_ascii_lowercase());
    init_logging(&level);

    tracing::info!("poc-chat v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    if let Err(e) = run(args, config).await {
        tracing::error!("{e}");
        eprintln!("poc-chat: {e}");
        std::process::exit(1);
    }
    tracing::info!("Shutdown complete");
}
