//! Writers for harmonized records and the decision log.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::core::record::InputRecord;
use crate::error::{HarmonizerError, Result};
use crate::harmonize::log::{LogEntry, Tally};

enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            Self::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(w) => w.flush(),
        }
    }
}

/// A line-oriented output file, optionally gzip-compressed
pub struct RecordSink {
    path: PathBuf,
    inner: Sink,
}

impl RecordSink {
    /// Create (or truncate) `path`
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be created.
    pub fn create(path: &Path, gzip: bool) -> Result<Self> {
        let file = File::create(path).map_err(|e| HarmonizerError::io(path, e))?;
        let writer = BufWriter::new(file);
        let inner = if gzip {
            Sink::Gzip(GzEncoder::new(writer, Compression::default()))
        } else {
            Sink::Plain(writer)
        };
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `line` followed by a newline
    ///
    /// # Errors
    ///
    /// Returns an IO error if the write fails.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.inner, "{line}").map_err(|e| HarmonizerError::io(&self.path, e))
    }

    /// Flush buffered data and finish the gzip stream
    ///
    /// # Errors
    ///
    /// Returns an IO error if the final flush fails.
    pub fn finish(self) -> Result<()> {
        let path = self.path;
        let writer = match self.inner {
            Sink::Plain(w) => w,
            Sink::Gzip(w) => w.finish().map_err(|e| HarmonizerError::io(&path, e))?,
        };
        writer
            .into_inner()
            .map_err(|e| HarmonizerError::io(&path, e.into_error()))?
            .sync_all()
            .map_err(|e| HarmonizerError::io(&path, e))
    }
}

impl std::fmt::Debug for RecordSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSink")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Writes the output file and the decision log side by side
#[derive(Debug)]
pub struct RecordEmitter {
    output: RecordSink,
    log: RecordSink,
    separator: char,
    tally: Tally,
}

impl RecordEmitter {
    #[must_use]
    pub fn new(output: RecordSink, log: RecordSink, separator: char) -> Self {
        Self {
            output,
            log,
            separator,
            tally: Tally::default(),
        }
    }

    /// Write the input header line unchanged
    ///
    /// # Errors
    ///
    /// Returns an IO error if the write fails.
    pub fn write_header(&mut self, header: &str) -> Result<()> {
        self.output.write_line(header)
    }

    /// # Errors
    ///
    /// Returns an IO error if the write fails.
    pub fn write_record(&mut self, record: &InputRecord) -> Result<()> {
        self.output.write_line(&record.to_line(self.separator))
    }

    /// Write log entries in order and count them
    ///
    /// # Errors
    ///
    /// Returns an IO error if the write fails.
    pub fn write_entries(&mut self, entries: &[LogEntry]) -> Result<()> {
        for entry in entries {
            self.log.write_line(&entry.to_string())?;
            self.tally.record(entry.kind);
        }
        Ok(())
    }

    /// Close both files and return the final tally
    ///
    /// # Errors
    ///
    /// Returns an IO error if either file cannot be flushed.
    pub fn finish(self) -> Result<Tally> {
        self.output.finish()?;
        self.log.finish()?;
        Ok(self.tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmonize::log::Message;
    use flate2::read::MultiGzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_plain_sink() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        let mut sink = RecordSink::create(&path, false).unwrap();
        sink.write_line("a\tb").unwrap();
        sink.write_line("c\td").unwrap();
        sink.finish().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\tb\nc\td\n");
    }

    #[test]
    fn test_gzip_sink() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt.gz");

        let mut sink = RecordSink::create(&path, true).unwrap();
        sink.write_line("hello").unwrap();
        sink.finish().unwrap();

        let mut text = String::new();
        MultiGzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "hello\n");
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let err = RecordSink::create(&path, false).unwrap_err();
        assert!(matches!(err, HarmonizerError::Io { path: p, .. } if p == path));
    }

    #[test]
    fn test_emitter_tallies_entries() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.csv");
        let log = dir.path().join("out.csv.log");

        let mut emitter = RecordEmitter::new(
            RecordSink::create(&out, false).unwrap(),
            RecordSink::create(&log, false).unwrap(),
            ',',
        );
        emitter.write_header("MARKER,CHR").unwrap();
        emitter
            .write_record(&InputRecord::new(2, vec!["1:5:SNP".into(), "1".into()]))
            .unwrap();
        emitter
            .write_entries(&[LogEntry::id_changed(2, "rs5", "1:5:SNP")])
            .unwrap();
        let tally = emitter.finish().unwrap();

        assert_eq!(tally.message_count(Message::IdChanged), 1);
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "MARKER,CHR\n1:5:SNP,1\n"
        );
        assert_eq!(
            std::fs::read_to_string(&log).unwrap(),
            "Line 2: rs5 changed to 1:5:SNP.\n"
        );
    }
}
