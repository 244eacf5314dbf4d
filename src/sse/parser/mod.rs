//! SSE stream parsing logic
//!
//! Contains the stateful `SseTokenizer` that cuts complete records out of
//! arbitrarily chunked input, and the functions that decode a record into a
//! typed `ResearchEvent`.

mod research;
mod utf8;

use crate::sse::events::{ResearchEvent, SseLine, SseParseError, SseRecord};

use research::{parse_complete_event, parse_error_event, parse_state_event};
pub use utf8::Utf8Decoder;

/// Parse a single SSE line into its component type
///
/// A trailing `\r` is ignored so CRLF streams work. One space after the
/// field colon is part of the separator.
pub fn parse_sse_line(line: &str) -> SseLine {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        return SseLine::Data(rest.to_string());
    }

    // Unknown field - treat as comment
    SseLine::Comment(line.to_string())
}

/// Parse one complete record (the text before its blank line).
///
/// Later `event:`/`data:` lines override earlier ones. Returns `None` unless
/// both fields end up non-empty.
pub fn parse_record(text: &str) -> Option<SseRecord> {
    let mut event_type = String::new();
    let mut data = String::new();

    for line in text.split('\n') {
        match parse_sse_line(line) {
            SseLine::Event(t) => event_type = t,
            SseLine::Data(d) => data = d,
            SseLine::Empty | SseLine::Comment(_) => {}
        }
    }

    if event_type.is_empty() || data.is_empty() {
        return None;
    }

    Some(SseRecord { event_type, data })
}

/// Decode a record's payload into a typed event
pub fn parse_sse_event(event_type: &str, data: &str) -> Result<ResearchEvent, SseParseError> {
    match event_type {
        "state" => parse_state_event(event_type, data),
        "complete" => parse_complete_event(event_type, data),
        "error" => parse_error_event(event_type, data),
        other => Err(SseParseError::UnknownEventType(other.to_string())),
    }
}

/// Stateful SSE tokenizer that buffers partial input and emits complete records
#[derive(Debug, Default)]
pub struct SseTokenizer {
    decoder: Utf8Decoder,
    /// Decoded text not yet consumed as a record
    buffer: String,
    /// Start of the first line in `buffer` not yet checked for blankness
    scan_pos: usize,
}

impl SseTokenizer {
    /// Create a new tokenizer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every record completed by them.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseRecord> {
        let text = self.decoder.decode(chunk);
        self.feed_str(&text)
    }

    /// Feed already-decoded text.
    pub fn feed_str(&mut self, text: &str) -> Vec<SseRecord> {
        self.buffer.push_str(text);

        let mut records = Vec::new();
        while let Some((record_end, consumed)) = self.next_boundary() {
            if let Some(record) = parse_record(&self.buffer[..record_end]) {
                records.push(record);
            }
            self.buffer.drain(..consumed);
            self.scan_pos = 0;
        }
        records
    }

    /// Find the next blank line. Returns the end of the record text and the
    /// number of bytes to drop, blank line included.
    fn next_boundary(&mut self) -> Option<(usize, usize)> {
        while let Some(offset) = self.buffer[self.scan_pos..].find('\n') {
            let line_start = self.scan_pos;
            let newline = line_start + offset;
            self.scan_pos = newline + 1;

            let line = &self.buffer[line_start..newline];
            if line.is_empty() || line == "\r" {
                return Some((line_start, newline + 1));
            }
        }
        None
    }

    /// End of input. Whatever is buffered can never complete, so it is
    /// dropped. Returns the number of bytes discarded.
    pub fn finish(&mut self) -> usize {
        let dangling = self.decoder.finish().map(char::len_utf8).unwrap_or(0);
        let discarded = self.buffer.len() + dangling;
        self.buffer.clear();
        self.scan_pos = 0;
        discarded
    }

    /// Bytes of text currently waiting for the rest of their record.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.decoder.pending_len()
    }

    /// Reset the tokenizer state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.scan_pos = 0;
        self.decoder.reset();
    }
}
