//! Line framing over a chunked byte stream.
//!
//! Lines are cut on raw `\n` bytes before any text decoding, so a
//! multi-byte character split across network chunks is only decoded once
//! its whole line has arrived. This layer knows nothing about SSE.

use bytes::Bytes;
use futures_util::Stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;

use crate::ChatError;

/// Reassembles complete text lines from an async byte source.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// Next line without its `\n` / `\r\n` terminator.
    ///
    /// At end of stream, leftover unterminated bytes are returned as a final
    /// line; after that `Ok(None)`. Invalid UTF-8 is replaced with U+FFFD.
    pub async fn next_line(&mut self) -> Result<Option<String>, ChatError> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        if read == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    /// Lazy stream of lines in arrival order. Ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<String, ChatError>> {
        futures_util::stream::try_unfold(self, |mut reader| async move {
            Ok::<_, ChatError>(reader.next_line().await?.map(|line| (line, reader)))
        })
    }
}

impl<S> LineReader<StreamReader<S, Bytes>>
where
    S: Stream<Item = std::io::Result<Bytes>> + Unpin,
{
    /// Frame lines from a chunked body such as `reqwest::Response::bytes_stream`.
    pub fn from_byte_stream(stream: S) -> Self {
        Self::new(StreamReader::new(stream))
    }
}
