//! Line-oriented file operations for transfer files.
//!
//! - Writing: one record per line, streamed through a single buffered handle
//!   that is flushed and synced once at the end
//! - Reading: streamed line by line, never loaded whole into memory

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Split, Write};
use std::path::Path;

use crate::model::ContactRecord;
use crate::transfer::types::{TransferError, TransferResult};

/// Serialize a record as a single line (without the terminator).
///
/// `serde_json` already escapes `\n`, `\r` and other control characters.
/// NEL, LINE SEPARATOR and PARAGRAPH SEPARATOR are valid raw inside JSON
/// strings, so they are escaped here too. They can only occur inside string
/// values, which keeps the replacement safe.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized.
pub fn encode_line(record: &ContactRecord) -> TransferResult<String> {
    let json = serde_json::to_string(record)?;
    if !json.contains(['\u{85}', '\u{2028}', '\u{2029}']) {
        return Ok(json);
    }

    let mut line = String::with_capacity(json.len() + 8);
    for ch in json.chars() {
        match ch {
            '\u{85}' => line.push_str("\\u0085"),
            '\u{2028}' => line.push_str("\\u2028"),
            '\u{2029}' => line.push_str("\\u2029"),
            other => line.push(other),
        }
    }
    Ok(line)
}

/// Decode one line into a record.
///
/// # Errors
///
/// Returns `InvalidRecord` with the given line number if the line is not a
/// well-formed record.
pub fn decode_line(line_num: usize, line: &str) -> TransferResult<ContactRecord> {
    serde_json::from_str(line).map_err(|e| TransferError::InvalidRecord {
        line: line_num,
        message: e.to_string(),
    })
}

/// Streaming writer for a transfer file.
///
/// The file is truncated on creation. Each record is written as one complete
/// line before the next begins. Dropping the writer without calling
/// [`JsonlWriter::finish`] still closes the handle; whatever was flushed
/// stays on disk.
pub struct JsonlWriter {
    writer: BufWriter<File>,
    written: usize,
}

impl JsonlWriter {
    /// Create (or truncate) the file at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn create(path: &Path) -> TransferResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append one record followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_record(&mut self, record: &ContactRecord) -> TransferResult<()> {
        let mut line = encode_line(record)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush, sync to disk and close. Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush or sync fails.
    pub fn finish(mut self) -> TransferResult<usize> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(self.written)
    }
}

/// Streaming reader over the lines of a transfer file.
///
/// Yields `(line_number, text)` pairs, 1-indexed, blank lines included.
/// A trailing `\r` is stripped, so CRLF files read the same as LF files.
///
/// A line that is not valid UTF-8 yields `InvalidRecord` for that line only;
/// iteration continues with the next line. Any other error is an I/O
/// failure and ends the stream for the caller.
pub struct JsonlReader {
    lines: Split<BufReader<File>>,
    line_num: usize,
}

impl JsonlReader {
    /// Open `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the file does not exist, or an IO error if
    /// it cannot be opened.
    pub fn open(path: &Path) -> TransferResult<Self> {
        if !path.exists() {
            return Err(TransferError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).split(b'\n'),
            line_num: 0,
        })
    }
}

impl Iterator for JsonlReader {
    type Item = TransferResult<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut bytes = match self.lines.next()? {
            Ok(bytes) => bytes,
            Err(e) => return Some(Err(e.into())),
        };
        self.line_num += 1;

        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let line_num = self.line_num;
        Some(
            String::from_utf8(bytes)
                .map(|text| (line_num, text))
                .map_err(|e| TransferError::InvalidRecord {
                    line: line_num,
                    message: format!("line is not valid UTF-8: {}", e.utf8_error()),
                }),
        )
    }
}

/// Count the non-blank lines in a transfer file.
///
/// Returns 0 if the file does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn count_records(path: &Path) -> TransferResult<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for line in JsonlReader::open(path)? {
        match line {
            Ok((_, text)) if text.trim().is_empty() => {}
            Ok(_) | Err(TransferError::InvalidRecord { .. }) => count += 1,
            Err(e) => return Err(e),
        }
    }
    Ok(count)
}
