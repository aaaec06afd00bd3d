//! Interactive chat loop: reads lines, runs turns, renders the reply as it
//! is revealed.

use std::io::Write;

use poc_chat::{ChatError, ChatSession, ChatTransport, Lead, LeadSink};
use poc_common::{Notice, NoticeBoard, NoticeLevel, PocError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::command::{Command, HELP};

/// Tracks how much of the display buffer has been written out.
#[derive(Debug, Default)]
pub(crate) struct DisplayTracker {
    written: usize,
}

impl DisplayTracker {
    /// The part of `current` not yet written. A shorter buffer means a new
    /// turn started, so writing restarts from the beginning.
    pub(crate) fn advance<'a>(&mut self, current: &'a str) -> &'a str {
        if current.len() < self.written || !current.is_char_boundary(self.written) {
            self.written = 0;
        }
        let delta = &current[self.written..];
        self.written = current.len();
        delta
    }
}

pub struct ChatRepl<W> {
    session: ChatSession,
    transport: Box<dyn ChatTransport>,
    leads: Option<Box<dyn LeadSink>>,
    notices: NoticeBoard,
    out: W,
}

impl<W: Write> ChatRepl<W> {
    pub fn new(session: ChatSession, transport: Box<dyn ChatTransport>, out: W) -> Self {
        Self {
            session,
            transport,
            leads: None,
            notices: NoticeBoard::default(),
            out,
        }
    }

    pub fn with_leads(mut self, sink: Box<dyn LeadSink>) -> Self {
        self.leads = Some(sink);
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Read commands until `/quit` or end of input.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<(), PocError> {
        writeln!(self.out, "{HELP}")?;
        let mut lines = input.lines();

        loop {
            write!(self.out, "\nyou> ")?;
            self.out.flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };

            match Command::parse(&line) {
                Command::Say(text) => self.chat(text).await?,
                Command::New => {
                    self.session.clear();
                    self.notices.post(Notice::info("New conversation", "Started over."));
                }
                Command::Lead {
                    name,
                    email,
                    company,
                    message,
                } => {
                    let mut lead = Lead::new(name, email)
                        .with_conversation_id(self.session.conversation_id());
                    if let Some(company) = company {
                        lead = lead.with_company(company);
                    }
                    if let Some(message) = message {
                        lead = lead.with_message(message);
                    }
                    self.capture_lead(lead).await;
                }
                Command::Help => writeln!(self.out, "{HELP}")?,
                Command::Quit => break,
                Command::Nothing => {}
                Command::Invalid(hint) => writeln!(self.out, "{hint}")?,
            }
            self.show_notices()?;
        }

        Ok(())
    }

    /// Run one turn, writing the reply as it is revealed.
    async fn chat(&mut self, text: String) -> Result<(), PocError> {
        let mut display = self.session.subscribe_display();
        let mut tracker = DisplayTracker::default();
        write!(self.out, "assistant> ")?;
        self.out.flush()?;

        let result = {
            let submit = self.session.submit(self.transport.as_ref(), text);
            tokio::pin!(submit);
            loop {
                tokio::select! {
                    result = &mut submit => break result,
                    Ok(()) = display.changed() => {
                        let current = display.borrow_and_update().clone();
                        let delta = tracker.advance(&current);
                        if !delta.is_empty() {
                            write!(self.out, "{delta}")?;
                            self.out.flush()?;
                        }
                    }
                }
            }
        };

        match result {
            Ok(reply) => {
                // Characters revealed after the last render before commit.
                write!(self.out, "{}", tracker.advance(&reply.content))?;
                writeln!(self.out)?;
            }
            Err(e) => {
                writeln!(self.out)?;
                report_turn_failure(&e);
                self.notices.post(Notice::turn_failed());
            }
        }
        Ok(())
    }

    async fn capture_lead(&mut self, lead: Lead) {
        let Some(ref sink) = self.leads else {
            self.notices.post(Notice::error(
                "Lead capture disabled",
                "Contact details cannot be collected right now.",
            ));
            return;
        };

        match sink.submit(&lead).await {
            Ok(()) => self.notices.post(Notice::info(
                "Thanks!",
                "We received your details and will be in touch shortly.",
            )),
            Err(ChatError::Lead(reason)) => {
                self.notices.post(Notice::error("Please check your details", reason));
            }
            Err(e) => {
                tracing::warn!(error = %e, "lead capture failed");
                self.notices.post(Notice::error(
                    "Could not send your details",
                    "Please try again in a moment.",
                ));
            }
        }
    }

    fn show_notices(&mut self) -> Result<(), PocError> {
        for notice in self.notices.drain() {
            let marker = match notice.level {
                NoticeLevel::Info => "*",
                NoticeLevel::Error => "!",
            };
            writeln!(self.out, "[{marker}] {}: {}", notice.title, notice.body)?;
        }
        Ok(())
    }
}

fn report_turn_failure(error: &ChatError) {
    if error.is_transport() {
        tracing::warn!(error = %error, "chat backend unavailable");
    } else {
        tracing::warn!(error = %error, "chat turn failed");
    }
}
