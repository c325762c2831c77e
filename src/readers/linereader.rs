// src/readers/linereader.rs

//! Implements a [`LineReader`], the loader of one log source into
//! [`LogLine`s].
//!
//! [`LineReader`]: crate::readers::linereader::LineReader
//! [`LogLine`s]: crate::data::line::LogLine

use crate::common::{Count, FPath, File, FileMetadata, FileSz};
use crate::data::line::{LogLine, LogLines};
use crate::readers::helpers::fpath_to_path;

use std::io::{Error, Read};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ----------
// LineReader

/// Loads one log source, whole, into memory as [`LogLines`].
///
/// The file handle is a scoped acquisition: opened, read fully, and
/// released inside [`new`], on every exit path; no I/O occurs
/// mid-computation afterward. Input is UTF-8(-compatible) line-oriented
/// text; invalid sequences are replaced, not fatal.
///
/// [`new`]: LineReader::new
pub struct LineReader {
    /// path of the log source
    path: FPath,
    /// size of the log source in bytes
    filesz: FileSz,
    /// all lines of the log source
    lines: LogLines,
}

impl LineReader {
    /// Create a new `LineReader` for the file at `path`.
    ///
    /// A missing or unreadable file is a [`std::io::Error`]; the caller
    /// decides whether that is fatal (single-file mode) or a
    /// skip-and-continue (directory mode).
    pub fn new(path: FPath) -> Result<LineReader, Error> {
        defn!("({:?})", path);

        let mut file: File = File::open(fpath_to_path(&path))?;
        let metadata: FileMetadata = file.metadata()?;
        let filesz: FileSz = metadata.len();
        let mut buffer: Vec<u8> = Vec::with_capacity(filesz as usize);
        file.read_to_end(&mut buffer)?;
        // release the handle before any parsing
        drop(file);

        let text = String::from_utf8_lossy(&buffer);
        let lines: LogLines = text
            .lines()
            .enumerate()
            .map(|(li, linetext)| LogLine::new(String::from(linetext), li))
            .collect();
        defx!("read {} bytes, {} lines", filesz, lines.len());

        Ok(LineReader {
            path,
            filesz,
            lines,
        })
    }

    pub fn path(self: &LineReader) -> &FPath {
        &self.path
    }

    pub fn filesz(self: &LineReader) -> FileSz {
        self.filesz
    }

    pub fn lines(self: &LineReader) -> &LogLines {
        &self.lines
    }

    pub fn count_lines(self: &LineReader) -> Count {
        self.lines.len() as Count
    }

    /// Consume the `LineReader`, yielding its lines.
    pub fn into_lines(self: LineReader) -> LogLines {
        self.lines
    }
}
