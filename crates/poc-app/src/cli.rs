use clap::Parser;

/// Chat with the Proof of Concept assistant from a terminal.
#[derive(Parser, Debug)]
#[command(name = "poc-chat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Chat endpoint URL override.
    #[arg(long, value_parser = parse_endpoint)]
    pub endpoint: Option<String>,

    /// Delay between revealed characters, in milliseconds (1-1000).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub typing_interval_ms: Option<u64>,
}

fn parse_endpoint(value: &str) -> Result<String, String> {
    if poc_config::validation::is_http_url(value) {
        Ok(value.to_string())
    } else {
        Err(format!("{value:?} is not an http(s) URL"))
    }
}

pub fn parse() -> Args {
    Args::parse()
}
