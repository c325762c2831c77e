// src/readers/eventreader.rs

//! Implements an [`EventReader`], the driver of one log source's
//! event-timeline extraction.
//!
//! An `EventReader` scans the lines of one log source for matches of the
//! configured [`KeywordRule`s], resolves each match to a timestamp
//! (tolerating matches whose own line lacks one, by bounded look-back),
//! captures the origin ("meter wake") timestamp, and annotates every
//! resolved event with its signed elapsed time since the origin.
//!
//! [`EventReader`]: crate::readers::eventreader::EventReader
//! [`KeywordRule`s]: crate::data::event::KeywordRule

use crate::common::{Count, FPath, FileSz, LineIndex};
use crate::data::event::{
    events_annotate_elapsed,
    Event,
    Events,
    FileExtractionResult,
    KeywordRules,
};
use crate::data::header::HeaderRules;
use crate::data::line::LogLines;
use crate::data::timestamp::{
    timestamp_resolve,
    ResultTimestamp,
    TimestampL,
    TimestampLOpt,
};
use crate::debug::printers::{de_wrn, e_wrn};
use crate::readers::headerreader::header_fields_extract;
use crate::readers::linereader::LineReader;
use crate::readers::summary::SummaryEventReader;

use std::io::Error;

use ::more_asserts::debug_assert_lt;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ, den, deo, dex, deñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// keyword matching
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How many lines to scan backward for a timestamp when the matched line
/// carries none of its own.
///
/// Three suffices for the multi-line records the metering firmware
/// prints; the continuation lines never run longer.
pub const LOOKBACK_DEFAULT: usize = 3;

/// Match every rule against one line of text.
///
/// Returns the indices of matched rules, in rule order. All rules are
/// tested independently; rules are not mutually exclusive, a single line
/// may satisfy several (e.g. a line carrying both a network-status string
/// and a connection string). Every match is recorded separately.
pub fn rules_match(
    text: &str,
    rules: &KeywordRules,
) -> Vec<usize> {
    let mut matched: Vec<usize> = Vec::new();
    for (at, rule) in rules.iter().enumerate() {
        if rule.is_match(text) {
            matched.push(at);
        }
    }

    matched
}

// -----------
// EventReader

/// Extracts the event timeline of one log source.
///
/// One `EventReader` per file; no state is shared across files, so
/// many instances may run concurrently. Within one file, processing is
/// strictly sequential; event detection order and one-shot origin
/// capture depend on it.
pub struct EventReader {
    /// path of the log source
    path: FPath,
    /// size of the log source in bytes
    filesz: FileSz,
    /// all lines of the log source
    lines: LogLines,
    /// the configured keyword rules, in evaluation order
    rules: KeywordRules,
    /// index into `rules` of the origin ("meter wake") rule
    origin_index: usize,
    /// look-back window in lines
    lookback: usize,
    /// count of events recorded
    count_events: Count,
    /// count of events without a resolved timestamp
    count_events_unresolved: Count,
    /// count of malformed timestamp literals encountered
    count_timestamps_malformed: Count,
    /// count of event timestamps resolved by look-back
    count_lookback_resolutions: Count,
    /// the captured origin timestamp
    origin: TimestampLOpt,
}

impl EventReader {
    /// Create a new `EventReader` for the file at `path`.
    ///
    /// Reads the file fully (and releases it) here; see [`LineReader`].
    ///
    /// [`LineReader`]: crate::readers::linereader::LineReader
    pub fn new(
        path: FPath,
        rules: KeywordRules,
        origin_index: usize,
        lookback: usize,
    ) -> Result<EventReader, Error> {
        defn!("({:?}, rules[{}], origin_index {}, lookback {})", path, rules.len(), origin_index, lookback);
        debug_assert_lt!(origin_index, rules.len(), "origin_index {} past rules end {}", origin_index, rules.len());

        let linereader: LineReader = LineReader::new(path.clone())?;
        let filesz: FileSz = linereader.filesz();
        let lines: LogLines = linereader.into_lines();
        defx!("{} lines", lines.len());

        Ok(EventReader {
            path,
            filesz,
            lines,
            rules,
            origin_index,
            lookback,
            count_events: 0,
            count_events_unresolved: 0,
            count_timestamps_malformed: 0,
            count_lookback_resolutions: 0,
            origin: None,
        })
    }

    pub fn path(self: &EventReader) -> &FPath {
        &self.path
    }

    pub fn lines(self: &EventReader) -> &LogLines {
        &self.lines
    }

    /// Run the full extraction: the event pass, the independent header
    /// pass over the same lines, then the elapsed-time annotation pass.
    ///
    /// Call once per `EventReader`.
    pub fn process(
        self: &mut EventReader,
        header_rules: &HeaderRules,
    ) -> FileExtractionResult {
        defn!("({:?})", self.path);

        let (mut events, origin) = self.process_events();
        let headers = header_fields_extract(&self.lines, header_rules);
        match origin {
            Some(ref origin_ts) => {
                events_annotate_elapsed(&mut events, origin_ts);
            }
            None => {
                e_wrn!(
                    "origin keyword {:?} never matched with a resolved timestamp in {:?}; elapsed times are unknown",
                    self.rules[self.origin_index].pattern(),
                    self.path,
                );
            }
        }
        defx!("{} events, origin {:?}", events.len(), origin);

        FileExtractionResult::new(self.path.clone(), events, headers, origin)
    }

    /// The event pass: iterate lines in order, match rules, resolve
    /// timestamps, capture the origin.
    ///
    /// The "last known timestamp" is a fold value local to this call,
    /// scoped to one file's extraction; it holds the most recent
    /// well-formed timestamp and the line it appeared on. A match on a
    /// line without its own timestamp uses it only when it lies within
    /// the look-back window.
    ///
    /// Origin capture is one-shot: the first match of the origin rule
    /// with a resolved timestamp wins; later matches do not overwrite it.
    fn process_events(self: &mut EventReader) -> (Events, TimestampLOpt) {
        defn!();

        let mut events: Events = Events::new();
        let mut origin: TimestampLOpt = None;
        let mut last_known: Option<(TimestampL, LineIndex)> = None;
        let mut count_events: Count = 0;
        let mut count_events_unresolved: Count = 0;
        let mut count_timestamps_malformed: Count = 0;
        let mut count_lookback_resolutions: Count = 0;

        for logline in self.lines.iter() {
            let line_ts: ResultTimestamp = timestamp_resolve(logline.text());
            match line_ts {
                ResultTimestamp::Found(ts) => {
                    last_known = Some((ts, logline.li()));
                }
                ResultTimestamp::Malformed => {
                    count_timestamps_malformed += 1;
                    de_wrn!("malformed timestamp on line {} of {:?}", logline.li() + 1, self.path);
                }
                ResultTimestamp::NotFound => {}
            }
            for rule_at in rules_match(logline.text(), &self.rules).into_iter() {
                let ts: TimestampLOpt = match line_ts {
                    // prefer the line's own timestamp
                    ResultTimestamp::Found(ts) => Some(ts),
                    // else the bounded look-back
                    ResultTimestamp::NotFound | ResultTimestamp::Malformed => match last_known {
                        Some((ts0, li0)) if logline.li() - li0 <= self.lookback => {
                            count_lookback_resolutions += 1;
                            deo!("lookback resolution for line {} from line {}", logline.li(), li0);
                            Some(ts0)
                        }
                        _ => None,
                    },
                };
                if ts.is_none() {
                    // record the event anyway; reporting flags it as
                    // "timestamp unknown" instead of losing it
                    count_events_unresolved += 1;
                }
                if rule_at == self.origin_index && origin.is_none() {
                    if let Some(origin_ts) = ts {
                        deo!("origin captured {} at line {}", origin_ts, logline.li());
                        origin = Some(origin_ts);
                    }
                }
                events.push(Event::new(ts, &self.rules[rule_at], logline.text(), logline.li()));
                count_events += 1;
            }
        }

        self.count_events = count_events;
        self.count_events_unresolved = count_events_unresolved;
        self.count_timestamps_malformed = count_timestamps_malformed;
        self.count_lookback_resolutions = count_lookback_resolutions;
        self.origin = origin;
        defx!(
            "{} events, {} unresolved, {} malformed timestamps, {} lookback resolutions",
            count_events,
            count_events_unresolved,
            count_timestamps_malformed,
            count_lookback_resolutions,
        );

        (events, origin)
    }

    /// Statistics about processing activity, for CLI option `--summary`.
    pub fn summary(self: &EventReader) -> SummaryEventReader {
        SummaryEventReader {
            EventReader_filesz: self.filesz,
            EventReader_lines: self.lines.len() as Count,
            EventReader_events: self.count_events,
            EventReader_events_unresolved: self.count_events_unresolved,
            EventReader_timestamps_malformed: self.count_timestamps_malformed,
            EventReader_lookback_resolutions: self.count_lookback_resolutions,
            EventReader_origin: self.origin,
        }
    }
}
