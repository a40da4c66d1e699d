//! Server-Sent Events (SSE) streaming parser.
//!
//! Chat-completions servers stream their response as SSE. [`SseDecoder`]
//! turns lines into events; [`parse_sse_stream`] drives it over a reqwest
//! response body.

use std::ops::ControlFlow;

use futures_util::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;

use crate::AiError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The `event:` field, if the server sent one.
    pub event: Option<String>,
    /// The event data; multiple `data:` lines are joined with `\n`.
    pub data: String,
}

/// Line-oriented SSE state machine.
#[derive(Debug, Default)]
pub struct SseDecoder {
    event: Option<String>,
    data: String,
    has_data: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its terminator). Returns an event when the
    /// line completes one.
    pub fn push_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            return self.flush();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            // id:, retry: and unknown fields carry nothing we use
            _ => {}
        }
        None
    }

    /// Flush a trailing event that was not followed by a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        self.flush()
    }

    fn flush(&mut self) -> Option<SseEvent> {
        if !self.has_data {
            self.event = None;
            return None;
        }
        self.has_data = false;
        Some(SseEvent {
            event: self.event.take(),
            data: std::mem::take(&mut self.data),
        })
    }
}

/// Read SSE events from any buffered reader, calling `on_event` for each.
///
/// Stops early when `on_event` returns [`ControlFlow::Break`].
pub async fn read_sse_events<R>(
    reader: R,
    mut on_event: impl FnMut(SseEvent) -> ControlFlow<()>,
) -> Result<(), AiError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut decoder = SseDecoder::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(read_error)?
    {
        if let Some(event) = decoder.push_line(&line) {
            if on_event(event).is_break() {
                return Ok(());
            }
        }
    }

    if let Some(event) = decoder.finish() {
        let _ = on_event(event);
    }

    Ok(())
}

fn read_error(e: std::io::Error) -> AiError {
    let timed_out = e
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
        .is_some_and(reqwest::Error::is_timeout);
    if timed_out {
        AiError::Timeout
    } else {
        AiError::NetworkError(e.to_string())
    }
}

/// Parse an SSE stream from a reqwest response, calling `on_event` for each event.
pub async fn parse_sse_stream(
    response: reqwest::Response,
    on_event: impl FnMut(SseEvent) -> ControlFlow<()>,
) -> Result<(), AiError> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    read_sse_events(reader, on_event).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<SseEvent> {
        let mut decoder = SseDecoder::new();
        let mut events: Vec<SseEvent> = input
            .split('\n')
            .filter_map(|line| decoder.push_line(line))
            .collect();
        events.extend(decoder.finish());
        events
    }

    #[test]
    fn blank_line_terminates_event() {
        let events = collect("data: {\"a\":1}\n\ndata: {\"a\":2}\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "{\"a\":1}");
        assert_eq!(events[1].data, "{\"a\":2}");
        assert_eq!(events[0].event, None);
    }

    #[test]
    fn multi_line_data_is_joined() {
        let events = collect("event: message\ndata: line one\ndata: line two\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.as_deref(), Some("message"));
        assert_eq!(events[0].data, "line one\nline two");
    }

    #[test]
    fn comments_ids_and_crlf_are_ignored() {
        let events = collect(": keep-alive\r\nid: 7\r\ndata:no-space\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "no-space");
    }

    #[test]
    fn trailing_event_without_blank_line_is_flushed() {
        let events = collect("data: [DONE]");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "[DONE]");
    }

    #[test]
    fn event_without_data_is_dropped() {
        let events = collect("event: ping\n\n");
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn reader_stops_on_break() {
        let body = b"data: one\n\ndata: [DONE]\n\ndata: after\n\n";
        let mut seen = Vec::new();
        read_sse_events(&body[..], |event| {
            if event.data == "[DONE]" {
                return ControlFlow::Break(());
            }
            seen.push(event.data);
            ControlFlow::Continue(())
        })
        .await
        .unwrap();
        assert_eq!(seen, vec!["one".to_string()]);
    }
}
