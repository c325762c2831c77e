// src/readers/summary.rs

//! Implements `Summary` statistics tracking structs.

#![allow(non_snake_case)]

use crate::common::{Count, FPath, FileSz, FileType};
use crate::data::timestamp::TimestampLOpt;

use std::fmt;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SummaryEventReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Accumulated statistics about processing activity of a single file
/// processed by an [`EventReader`] and its underlying `LineReader`.
///
/// For CLI option `--summary`.
///
/// [`EventReader`]: crate::readers::eventreader::EventReader
#[derive(Clone, Copy, Default)]
pub struct SummaryEventReader {
    /// size of the processed file in bytes
    pub EventReader_filesz: FileSz,
    /// count of lines read
    pub EventReader_lines: Count,
    /// count of events recorded
    pub EventReader_events: Count,
    /// count of events without a resolved timestamp
    pub EventReader_events_unresolved: Count,
    /// count of malformed timestamp literals encountered
    pub EventReader_timestamps_malformed: Count,
    /// count of event timestamps resolved by look-back
    pub EventReader_lookback_resolutions: Count,
    /// the captured origin timestamp, if any
    pub EventReader_origin: TimestampLOpt,
}

impl fmt::Debug for SummaryEventReader {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("SummaryEventReader")
            .field("filesz", &self.EventReader_filesz)
            .field("lines", &self.EventReader_lines)
            .field("events", &self.EventReader_events)
            .field("events unresolved", &self.EventReader_events_unresolved)
            .field("timestamps malformed", &self.EventReader_timestamps_malformed)
            .field("lookback resolutions", &self.EventReader_lookback_resolutions)
            .field("origin", &self.EventReader_origin)
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Summary
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The reader-specific data of a [`Summary`].
///
/// `Dummy` is a stand-in for files where no processing occurred, e.g.
/// files without adequate read permissions.
#[derive(Clone, Copy, Debug, Default)]
pub enum SummaryReaderData {
    /// Unset; nothing actually occurred.
    #[default]
    Dummy,
    /// For an `EventReader` and its underlying reader.
    Events(SummaryEventReader),
}

impl SummaryReaderData {
    pub const fn is_dummy(&self) -> bool {
        matches!(*self, SummaryReaderData::Dummy)
    }
}

/// Summary of processing one file, or of failing to.
///
/// A file that could not be read still gets a `Summary`, with `error`
/// set and `readerdata` left `Dummy`; in multi-file aggregation such a
/// file is skipped-and-reported, never silently dropped.
#[derive(Clone, Debug, Default)]
pub struct Summary {
    /// the `FPath` of the processed file
    pub path: FPath,
    /// the `FileType` of the processed file
    pub filetype: FileType,
    /// data specific to the reader that processed the file
    pub readerdata: SummaryReaderData,
    /// the first encountered error, if any, as a `String`
    ///
    /// (an `std::io::Error` cannot be cloned, so its message is kept)
    pub error: Option<String>,
}

pub type SummaryOpt = Option<Summary>;

impl Summary {
    pub fn new(
        path: FPath,
        filetype: FileType,
        summaryeventreader: SummaryEventReader,
        error: Option<String>,
    ) -> Summary {
        Summary {
            path,
            filetype,
            readerdata: SummaryReaderData::Events(summaryeventreader),
            error,
        }
    }

    /// Create a `Summary` for a file that failed before any processing.
    pub fn new_failed(
        path: FPath,
        filetype: FileType,
        error: String,
    ) -> Summary {
        defñ!("({:?}, {:?})", path, error);

        Summary {
            path,
            filetype,
            readerdata: SummaryReaderData::Dummy,
            error: Some(error),
        }
    }

    /// Was the origin event found in this file?
    pub fn origin_found(self: &Summary) -> bool {
        match self.readerdata {
            SummaryReaderData::Events(ser) => ser.EventReader_origin.is_some(),
            SummaryReaderData::Dummy => false,
        }
    }
}
