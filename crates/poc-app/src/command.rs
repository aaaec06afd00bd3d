//! Parsing of REPL input lines.

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a chat message.
    Say(String),
    /// Start a fresh conversation.
    New,
    /// Leave contact details: `/lead name; email[; company[; message]]`.
    Lead {
        name: String,
        email: String,
        company: Option<String>,
        message: Option<String>,
    },
    Help,
    Quit,
    /// Blank line.
    Nothing,
    /// Unknown or badly formed command, with a hint for the user.
    Invalid(String),
}

pub const HELP: &str = "\
Type a message and press Enter to chat.
  /new                                   start a new conversation
  /lead name; email[; company[; note]]   leave your contact details
  /help                                  show this help
  /quit                                  exit";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Nothing;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Say(line.to_string());
        };

        let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        match name {
            "quit" | "exit" => Command::Quit,
            "new" => Command::New,
            "help" => Command::Help,
            "lead" => parse_lead(args),
            other => Command::Invalid(format!("unknown command /{other}, try /help")),
        }
    }
}

fn parse_lead(args: &str) -> Command {
    let mut fields = args.split(';').map(str::trim);
    let name = fields.next().unwrap_or_default().to_string();
    let email = fields.next().unwrap_or_default().to_string();
    if name.is_empty() || email.is_empty() {
        return Command::Invalid("usage: /lead name; email[; company[; note]]".into());
    }
    let company = fields.next().filter(|s| !s.is_empty()).map(String::from);
    let message = fields.next().filter(|s| !s.is_empty()).map(String::from);
    Command::Lead {
        name,
        email,
        company,
        message,
    }
}
