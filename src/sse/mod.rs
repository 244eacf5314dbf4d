//! SSE (Server-Sent Events) stream parser
//!
//! Parses the event stream returned by `POST /research`.
//! SSE format consists of:
//! - `event: <type>` - event type line
//! - `data: <json>` - data payload line
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `events` - Record and event types (SseRecord, ResearchEvent, SseParseError)
//! - `payloads` - Internal payload deserialization structs
//! - `parser` - Tokenizer and decoding (SseTokenizer, parse_sse_line, parse_sse_event)
//! - `stream` - Lazy record stream over a response body

mod events;
mod parser;
mod payloads;
mod stream;

// Re-export public types
pub use events::{ResearchEvent, SseLine, SseParseError, SseRecord, StateUpdate};
pub use parser::{parse_record, parse_sse_event, parse_sse_line, SseTokenizer, Utf8Decoder};
pub use stream::{records, RecordStream};
