//! Line source over plain or gzip/bgzip compressed text files.
//!
//! Compression is detected from the gzip magic bytes rather than the file
//! extension, so a `.txt` that is actually gzipped is still read correctly.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::error::{HarmonizerError, Result};

/// gzip magic number (also the start of every BGZF block)
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Reads a text file one line at a time.
///
/// [`LineReader::next_line`] distinguishes an empty line (`Ok(true)` with an
/// empty buffer) from end-of-stream (`Ok(false)`). A final newline at the end
/// of the file does not produce an extra empty line.
pub struct LineReader {
    path: PathBuf,
    inner: Box<dyn BufRead>,
    line_number: u64,
}

impl std::fmt::Debug for LineReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("path", &self.path)
            .field("line_number", &self.line_number)
            .finish_non_exhaustive()
    }
}

impl LineReader {
    /// Open a file, transparently decompressing gzip content
    ///
    /// # Errors
    ///
    /// Returns `HarmonizerError::Io` if the file cannot be opened or read.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| HarmonizerError::io(path, e))?;
        let mut buffered = BufReader::new(file);
        let compressed = {
            let head = buffered.fill_buf().map_err(|e| HarmonizerError::io(path, e))?;
            head.starts_with(&GZIP_MAGIC)
        };

        let inner: Box<dyn BufRead> = if compressed {
            Box::new(BufReader::new(MultiGzDecoder::new(buffered)))
        } else {
            Box::new(buffered)
        };

        Ok(Self {
            path: path.to_path_buf(),
            inner,
            line_number: 0,
        })
    }

    /// Wrap an arbitrary reader; `path` is only used in error messages
    pub fn from_reader(path: impl Into<PathBuf>, reader: impl Read + 'static) -> Self {
        Self {
            path: path.into(),
            inner: Box::new(BufReader::new(reader)),
            line_number: 0,
        }
    }

    /// Read the next line into `buf`, without its line terminator.
    ///
    /// Returns `Ok(false)` at end-of-stream.
    ///
    /// # Errors
    ///
    /// Returns `HarmonizerError::Io` on read failure or invalid UTF-8.
    pub fn next_line(&mut self, buf: &mut String) -> Result<bool> {
        buf.clear();
        let n = self
            .inner
            .read_line(buf)
            .map_err(|e| HarmonizerError::io(&self.path, e))?;
        if n == 0 {
            return Ok(false);
        }

        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }

        self.line_number += 1;
        Ok(true)
    }

    /// 1-based number of the line most recently returned
    #[must_use]
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read_all(reader: &mut LineReader) -> Vec<String> {
        let mut lines = Vec::new();
        let mut buf = String::new();
        while reader.next_line(&mut buf).unwrap() {
            lines.push(buf.clone());
        }
        lines
    }

    #[test]
    fn test_empty_line_is_not_end_of_stream() {
        let mut reader = LineReader::from_reader("mem", "a\n\nb\n".as_bytes());
        assert_eq!(read_all(&mut reader), vec!["a", "", "b"]);
        assert_eq!(reader.line_number(), 3);
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let mut reader = LineReader::from_reader("mem", "a\r\nb".as_bytes());
        assert_eq!(read_all(&mut reader), vec!["a", "b"]);
    }

    #[test]
    fn test_open_plain_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "line1").unwrap();
        writeln!(file, "line2").unwrap();
        file.flush().unwrap();

        let mut reader = LineReader::open(file.path()).unwrap();
        assert_eq!(read_all(&mut reader), vec!["line1", "line2"]);
    }

    #[test]
    fn test_open_gzip_file() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"##fileformat=VCFv4.2\nrow\n").unwrap();
        file.write_all(&encoder.finish().unwrap()).unwrap();
        file.flush().unwrap();

        let mut reader = LineReader::open(file.path()).unwrap();
        assert_eq!(read_all(&mut reader), vec!["##fileformat=VCFv4.2", "row"]);
    }

    #[test]
    fn test_open_missing_file() {
        let err = LineReader::open(Path::new("/nonexistent/ref.vcf")).unwrap_err();
        assert!(matches!(err, HarmonizerError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/ref.vcf"));
    }
}
