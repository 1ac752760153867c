//! Frame sources: where landmark frames come from.
//!
//! The landmark model itself runs in another process (a MediaPipe sidecar,
//! a recorded session, a test harness).  [`FrameSource`] abstracts over that
//! so the pipeline only ever sees [`Frame`] values.
//!
//! [`JsonLinesSource`] reads one JSON-encoded [`Frame`] per line from any
//! async reader, typically stdin of the gesture-control process, with the
//! tracker piping its output in.

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use super::Frame;

// ---------------------------------------------------------------------------
// SourceError
// ---------------------------------------------------------------------------

/// Errors that can occur while reading frames.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying reader failed.
    #[error("frame source I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be decoded as a [`Frame`].  The source stays usable;
    /// callers normally log and continue.
    #[error("malformed frame on line {line}: {message}")]
    Parse { line: usize, message: String },
}

// ---------------------------------------------------------------------------
// FrameSource trait
// ---------------------------------------------------------------------------

/// Async supplier of landmark frames.
///
/// Returns `Ok(None)` once the stream is exhausted.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;
}

// ---------------------------------------------------------------------------
// JsonLinesSource
// ---------------------------------------------------------------------------

/// Reads newline-delimited JSON frames.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// ```rust,no_run
/// use gesture_control::landmarks::{FrameSource, JsonLinesSource};
///
/// # async fn example() {
/// let stdin = tokio::io::BufReader::new(tokio::io::stdin());
/// let mut source = JsonLinesSource::new(stdin);
/// while let Ok(Some(frame)) = source.next_frame().await {
///     println!("{} hands @ {} ms", frame.hands.len(), frame.timestamp_ms);
/// }
/// # }
/// ```
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> FrameSource for JsonLinesSource<R> {
    async fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return serde_json::from_str(trimmed)
                .map(Some)
                .map_err(|e| SourceError::Parse {
                    line: self.line_no,
                    message: e.to_string(),
                });
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &'static str) -> JsonLinesSource<tokio::io::BufReader<&'static [u8]>> {
        JsonLinesSource::new(tokio::io::BufReader::new(text.as_bytes()))
    }

    #[tokio::test]
    async fn reads_frames_in_order() {
        let mut src = source(
            "{\"timestamp_ms\": 0, \"hands\": []}\n{\"timestamp_ms\": 33, \"hands\": []}\n",
        );
        assert_eq!(src.next_frame().await.unwrap().unwrap().timestamp_ms, 0);
        assert_eq!(src.next_frame().await.unwrap().unwrap().timestamp_ms, 33);
        assert!(src.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn skips_blank_and_comment_lines() {
        let mut src = source("\n# recorded session\n{\"timestamp_ms\": 7}\n");
        let frame = src.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.timestamp_ms, 7);
        assert!(frame.hands.is_empty());
    }

    #[tokio::test]
    async fn malformed_line_reports_line_number_and_continues() {
        let mut src = source("{\"timestamp_ms\": 0}\nnot json\n{\"timestamp_ms\": 66}\n");
        assert!(src.next_frame().await.unwrap().is_some());

        match src.next_frame().await {
            Err(SourceError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }

        let next = src.next_frame().await.unwrap().unwrap();
        assert_eq!(next.timestamp_ms, 66);
    }
}
