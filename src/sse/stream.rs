//! Adapter from a response body stream to a stream of SSE records.

use std::collections::VecDeque;
use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};

use crate::sse::events::SseRecord;
use crate::sse::parser::SseTokenizer;
use crate::traits::{ByteStream, HttpError};

/// Stream of complete SSE records.
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<SseRecord, HttpError>> + Send>>;

struct RecordState {
    body: ByteStream,
    tokenizer: SseTokenizer,
    ready: VecDeque<SseRecord>,
    done: bool,
}

/// Tokenize a body stream lazily.
///
/// Each body chunk is pulled only when the consumer asks for the next
/// record and none is ready. A transport error is yielded once and ends the
/// stream. Dropping the record stream drops the body.
pub fn records(body: ByteStream) -> RecordStream {
    let state = RecordState {
        body,
        tokenizer: SseTokenizer::new(),
        ready: VecDeque::new(),
        done: false,
    };

    let record_stream = stream::unfold(state, |mut state| async move {
        loop {
            if let Some(record) = state.ready.pop_front() {
                return Some((Ok(record), state));
            }
            if state.done {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    state.ready.extend(state.tokenizer.feed(&chunk));
                }
                Some(Err(e)) => {
                    state.done = true;
                    state.tokenizer.reset();
                    return Some((Err(e), state));
                }
                None => {
                    // Stream ended - a partial record can never complete
                    let discarded = state.tokenizer.finish();
                    if discarded > 0 {
                        tracing::debug!(discarded, "Discarded incomplete trailing SSE record");
                    }
                    state.done = true;
                }
            }
        }
    });

    Box::pin(record_stream)
}
