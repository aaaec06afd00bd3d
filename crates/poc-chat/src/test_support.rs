//! Shared test helpers: scripted transports.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;

use crate::transport::{ByteStream, ChatRequest, ChatTransport};
use crate::ChatError;

/// One scripted response body: network chunks, optionally ending in a
/// read failure or never ending at all.
#[derive(Clone)]
pub(crate) enum Script {
    Body(Vec<&'static str>),
    FailAfter(Vec<&'static str>),
    HangAfter(Vec<&'static str>),
    /// Each chunk is delivered after waiting the given number of milliseconds.
    Timed(Vec<(u64, &'static str)>),
    Reject(u16),
}

/// Transport that replays scripts in order and records every request.
pub(crate) struct ScriptedTransport {
    scripts: Mutex<Vec<Script>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn chunks(parts: Vec<&'static str>) -> impl futures_util::Stream<Item = std::io::Result<Bytes>> {
    futures_util::stream::iter(parts.into_iter().map(|p| Ok(Bytes::from_static(p.as_bytes()))))
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, ChatError> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self.scripts.lock().unwrap().remove(0);
        match script {
            Script::Body(parts) => Ok(chunks(parts).boxed()),
            Script::FailAfter(parts) => {
                let failure = futures_util::stream::once(async {
                    Err::<Bytes, _>(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        "connection reset by peer",
                    ))
                });
                Ok(chunks(parts).chain(failure).boxed())
            }
            Script::HangAfter(parts) => Ok(chunks(parts).chain(futures_util::stream::pending()).boxed()),
            Script::Timed(parts) => Ok(futures_util::stream::iter(parts)
                .then(|(delay_ms, part)| async move {
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                    Ok::<_, std::io::Error>(Bytes::from_static(part.as_bytes()))
                })
                .boxed()),
            Script::Reject(status) => Err(ChatError::Api(format!("HTTP {status}: unavailable"))),
        }
    }
}
