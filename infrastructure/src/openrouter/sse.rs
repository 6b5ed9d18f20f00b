//! Server-Sent Events line parser for streaming completions.
//!
//! Handles:
//! - line buffering across chunk boundaries
//! - `data:` prefix extraction
//! - `[DONE]` marker filtering
//!
//! Yields raw JSON payload strings; chunk decoding lives with the client.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use parley_application::CompletionError;
use tracing::warn;

/// Parse SSE `data:` payloads out of a byte stream.
///
/// A transport error is yielded once and ends the stream.
pub fn parse_sse_lines<S>(byte_stream: S) -> impl Stream<Item = Result<String, CompletionError>> + Send
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + Unpin + 'static,
{
    futures::stream::unfold(
        (byte_stream, BytesMut::with_capacity(8192), false),
        |(mut stream, mut buffer, done)| async move {
            if done {
                return None;
            }

            loop {
                if let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                    let mut line_bytes = buffer.split_to(newline_pos + 1);
                    line_bytes.truncate(line_bytes.len() - 1);
                    if line_bytes.last() == Some(&b'\r') {
                        line_bytes.truncate(line_bytes.len() - 1);
                    }

                    let Ok(line) = std::str::from_utf8(&line_bytes) else {
                        warn!("Skipping SSE line with invalid UTF-8");
                        continue;
                    };

                    if let Some(data) = extract_sse_data(line) {
                        return Some((Ok(data), (stream, buffer, false)));
                    }
                    continue;
                }

                match stream.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                    Some(Err(e)) => {
                        warn!("SSE stream read error: {e}");
                        let error = CompletionError::Connection(e.to_string());
                        return Some((Err(error), (stream, buffer, true)));
                    }
                    None => {
                        // Trailing line without a newline
                        let data = std::str::from_utf8(&buffer)
                            .ok()
                            .and_then(extract_sse_data);
                        buffer.clear();
                        return data.map(|d| (Ok(d), (stream, buffer, true)));
                    }
                }
            }
        },
    )
}

/// Extract the data payload from an SSE line.
///
/// Returns `None` for comments, empty lines, non-data fields and `[DONE]`.
pub(crate) fn extract_sse_data(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return None;
    }

    let data = trimmed
        .strip_prefix("data: ")
        .or_else(|| trimmed.strip_prefix("data:"))?
        .trim();

    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    Some(data.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_data_lines() {
        assert_eq!(extract_sse_data("data: {\"a\":1}"), Some("{\"a\":1}".into()));
        assert_eq!(extract_sse_data("data:{\"a\":1}"), Some("{\"a\":1}".into()));
        assert_eq!(extract_sse_data("data: [DONE]"), None);
        assert_eq!(extract_sse_data(": OPENROUTER PROCESSING"), None);
        assert_eq!(extract_sse_data("event: message"), None);
        assert_eq!(extract_sse_data(""), None);
    }

    #[tokio::test]
    async fn reassembles_lines_split_across_chunks() {
        let chunks: Vec<Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from_static(b"data: {\"n\":")),
            Ok(Bytes::from_static(b"1}\r\n\r\n: keep-alive\n")),
            Ok(Bytes::from_static(b"data: {\"n\":2}\n\ndata: [DONE]\n\n")),
        ];
        let stream = futures::stream::iter(chunks);

        let items: Vec<String> = parse_sse_lines(stream)
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(items, vec!["{\"n\":1}", "{\"n\":2}"]);
    }

    #[tokio::test]
    async fn yields_trailing_line_without_newline() {
        let chunks: Vec<Result<Bytes, reqwest::Error>> =
            vec![Ok(Bytes::from_static(b"data: {\"last\":true}"))];
        let items: Vec<_> = parse_sse_lines(futures::stream::iter(chunks))
            .collect()
            .await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_deref().unwrap(), "{\"last\":true}");
    }
}
