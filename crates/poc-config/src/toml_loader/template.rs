/// The commented config written on first run.
pub(crate) fn default_config_toml() -> String {
    r##"# Proof of Concept chat client configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[chat]
# endpoint = "http://localhost:54321/functions/v1/chat"
# api_key_env = "POC_CHAT_API_KEY"   # env var holding the bearer credential
# typing_interval_ms = 20            # 1-1000, delay between revealed characters
# connect_timeout_secs = 10          # 1-120

[leads]
# enabled = true
# endpoint = "http://localhost:54321/functions/v1/leads"

[logging]
# level = "info"                     # trace, debug, info, warn, error
"##
    .to_string()
}
