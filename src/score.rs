use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Message tag used when none is configured.
pub const DEFAULT_SCORE_TAG: &str = "snake-score";

/// Final-score notification payload: `{"type":"<tag>","points":N}`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub points: u32,
}

impl ScoreMessage {
    #[must_use]
    pub fn new(kind: impl Into<String>, points: u32) -> Self {
        Self {
            kind: kind.into(),
            points,
        }
    }
}

/// Receives the final score once a game ends.
///
/// Reporting is fire-and-forget: implementations must not fail the game.
pub trait ScoreSink {
    fn report(&mut self, points: u32);
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ScoreSink for NullSink {
    fn report(&mut self, _points: u32) {}
}

/// Writes one JSON message per line to any writer.
#[derive(Debug)]
pub struct JsonLineSink<W: Write> {
    writer: W,
    tag: String,
}

impl<W: Write> JsonLineSink<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_tag(writer, DEFAULT_SCORE_TAG)
    }

    #[must_use]
    pub fn with_tag(writer: W, tag: impl Into<String>) -> Self {
        Self {
            writer,
            tag: tag.into(),
        }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_message(&mut self, message: &ScoreMessage) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, message)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl JsonLineSink<File> {
    /// Opens `path` for appending, creating parent directories when needed.
    pub fn append_to(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> ScoreSink for JsonLineSink<W> {
    fn report(&mut self, points: u32) {
        let message = ScoreMessage::new(self.tag.clone(), points);
        if let Err(error) = self.write_message(&message) {
            warn!(%error, points, "failed to report final score");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::{JsonLineSink, NullSink, ScoreMessage, ScoreSink};

    #[test]
    fn message_uses_type_and_points_keys() {
        let json = serde_json::to_string(&ScoreMessage::new("snake-score", 7))
            .expect("message should serialize");

        assert_eq!(json, r#"{"type":"snake-score","points":7}"#);
    }

    #[test]
    fn json_line_sink_writes_one_line_per_report() {
        let mut sink = JsonLineSink::with_tag(Vec::new(), "arcade");

        sink.report(3);
        sink.report(12);

        let output = String::from_utf8(sink.into_inner()).expect("output should be utf-8");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"type":"arcade","points":3}"#,
                r#"{"type":"arcade","points":12}"#,
            ]
        );
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_are_swallowed() {
        let mut sink = JsonLineSink::new(BrokenWriter);
        sink.report(1);

        let mut null = NullSink;
        null.report(1);
    }
}
