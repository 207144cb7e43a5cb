use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use std::collections::VecDeque;

use crate::error::GenerationError;
use crate::events::{parse_event, GenerationEvent};

/// Raw response body, chunk by chunk.
pub type ByteStream = BoxStream<'static, Result<Bytes, GenerationError>>;

/// Splits a byte stream into line payloads, stripping optional SSE `data:` framing.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut payloads = Vec::new();
        while let Some(pos) = memchr::memchr(b'\n', &self.buf) {
            let line = self.buf.drain(..=pos).collect::<Vec<u8>>();
            payloads.extend(frame_payload(&line));
        }
        payloads
    }

    /// Flush a trailing line that never got its newline.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buf);
        frame_payload(&rest)
    }
}

fn frame_payload(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    let payload = text
        .strip_prefix("data:")
        .map(str::trim_start)
        .unwrap_or(text);
    (!payload.is_empty()).then(|| payload.to_string())
}

/// Pulls decoded [`GenerationEvent`]s off a response body one at a time.
/// Blank lines and malformed records are skipped.
pub struct EventReader {
    body: ByteStream,
    decoder: LineDecoder,
    pending: VecDeque<String>,
    exhausted: bool,
}

impl EventReader {
    pub fn new(body: ByteStream) -> Self {
        Self {
            body,
            decoder: LineDecoder::default(),
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    /// `None` once the body is closed and every buffered record was handed out.
    pub async fn next_event(&mut self) -> Option<Result<GenerationEvent, GenerationError>> {
        loop {
            while let Some(payload) = self.pending.pop_front() {
                if let Some(event) = parse_event(&payload) {
                    return Some(Ok(event));
                }
            }
            if self.exhausted {
                return None;
            }
            match self.body.next().await {
                Some(Ok(chunk)) => self.pending.extend(self.decoder.push(&chunk)),
                Some(Err(e)) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
                None => {
                    self.exhausted = true;
                    self.pending.extend(self.decoder.finish());
                }
            }
        }
    }
}
