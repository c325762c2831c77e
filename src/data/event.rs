// src/data/event.rs

//! Implements the [`KeywordRule`], [`Event`], and [`FileExtractionResult`]
//! structs.
//!
//! A [`KeywordRule`] pairs a search pattern with the operational meaning of
//! a match, e.g. `"aws_Publish"` → `"Send Telemetry Data"`. An [`Event`] is
//! one match of one rule on one log line. A [`FileExtractionResult`] owns
//! everything extracted from one log source.
//!
//! [`KeywordRule`]: crate::data::event::KeywordRule
//! [`Event`]: crate::data::event::Event
//! [`FileExtractionResult`]: crate::data::event::FileExtractionResult

use crate::common::{Count, FPath, LineIndex};
use crate::data::header::HeaderFields;
use crate::data::timestamp::{
    ElapsedSecondsOpt,
    TimestampL,
    TimestampLOpt,
};

use std::fmt;

use ::regex::{Regex, RegexBuilder};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ, den, deo, dex, deñ};

// -----------
// KeywordRule

/// One configured search pattern and the human-readable meaning of a
/// match.
///
/// The pattern is compiled once, at configuration time; an uncompilable
/// pattern is a configuration error, caught before any file is read.
pub struct KeywordRule {
    /// the pattern as the user configured it; identifies the rule in
    /// reports and the cross-file summary table
    pattern: String,
    /// human-readable meaning of a match
    meaning: String,
    /// compiled form of `pattern`
    re: Regex,
}

/// Ordered sequence of [`KeywordRule`]; rules are evaluated in the order
/// given, every rule independently per line.
pub type KeywordRules = Vec<KeywordRule>;

impl fmt::Debug for KeywordRule {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("KeywordRule")
            .field("pattern", &self.pattern)
            .field("meaning", &self.meaning)
            .finish()
    }
}

impl Clone for KeywordRule {
    fn clone(&self) -> KeywordRule {
        KeywordRule {
            pattern: self.pattern.clone(),
            meaning: self.meaning.clone(),
            re: self.re.clone(),
        }
    }
}

impl PartialEq for KeywordRule {
    fn eq(
        &self,
        other: &KeywordRule,
    ) -> bool {
        self.pattern == other.pattern && self.meaning == other.meaning
    }
}
impl Eq for KeywordRule {}

impl KeywordRule {
    /// Compile one `KeywordRule`.
    ///
    /// When `literal` the pattern is regex-escaped and matched as a plain
    /// substring; otherwise it is compiled as a regular expression.
    /// Matching is case-insensitive unless `case_sensitive`.
    pub fn new(
        pattern: &str,
        meaning: &str,
        literal: bool,
        case_sensitive: bool,
    ) -> Result<KeywordRule, ::regex::Error> {
        defñ!("({:?}, {:?}, literal {}, case_sensitive {})", pattern, meaning, literal, case_sensitive);
        let expression: String = match literal {
            true => ::regex::escape(pattern.trim()),
            false => String::from(pattern),
        };
        let re: Regex = RegexBuilder::new(expression.as_str())
            .case_insensitive(!case_sensitive)
            .build()?;

        Ok(KeywordRule {
            pattern: String::from(pattern),
            meaning: String::from(meaning),
            re,
        })
    }

    /// Does this rule match anywhere within `text`?
    pub fn is_match(
        self: &KeywordRule,
        text: &str,
    ) -> bool {
        self.re.is_match(text)
    }

    pub fn pattern(self: &KeywordRule) -> &str {
        &self.pattern
    }

    pub fn meaning(self: &KeywordRule) -> &str {
        &self.meaning
    }
}

// -----
// Event

/// One match of one [`KeywordRule`] on one log line.
///
/// Created only by the [`EventReader`], in log-line order. Once created an
/// `Event` is never re-ordered and its timestamp, once resolved, never
/// changes; only the elapsed-time annotation pass touches it again.
///
/// [`EventReader`]: crate::readers::eventreader::EventReader
pub struct Event {
    /// resolved timestamp; `None` when no timestamp was found on the
    /// matched line nor within the look-back window
    ts: TimestampLOpt,
    /// pattern of the matched rule
    keyword: String,
    /// meaning of the matched rule
    meaning: String,
    /// the raw matched line text
    line: String,
    /// 0-based position of the matched line
    li: LineIndex,
    /// signed seconds since the origin event; `None` until annotated, and
    /// `None` when the origin was never found or `ts` is unresolved
    elapsed: ElapsedSecondsOpt,
}

/// Sequence of [`Event`] in detection order.
pub type Events = Vec<Event>;

impl fmt::Debug for Event {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("Event")
            .field("ts", &self.ts)
            .field("keyword", &self.keyword)
            .field("li", &self.li)
            .field("elapsed", &self.elapsed)
            .field("line", &self.line)
            .finish()
    }
}

impl Event {
    pub fn new(
        ts: TimestampLOpt,
        rule: &KeywordRule,
        line: &str,
        li: LineIndex,
    ) -> Event {
        Event {
            ts,
            keyword: String::from(rule.pattern()),
            meaning: String::from(rule.meaning()),
            line: String::from(line),
            li,
            elapsed: None,
        }
    }

    /// Return the resolved timestamp, if any.
    pub fn ts(self: &Event) -> &TimestampLOpt {
        &self.ts
    }

    pub fn keyword(self: &Event) -> &str {
        &self.keyword
    }

    pub fn meaning(self: &Event) -> &str {
        &self.meaning
    }

    pub fn line(self: &Event) -> &str {
        &self.line
    }

    pub fn li(self: &Event) -> LineIndex {
        self.li
    }

    pub fn elapsed(self: &Event) -> &ElapsedSecondsOpt {
        &self.elapsed
    }

    /// Annotate this event with its elapsed time since the origin event.
    ///
    /// Only the annotation pass of the `EventReader` calls this.
    pub(crate) fn set_elapsed(
        self: &mut Event,
        elapsed: ElapsedSecondsOpt,
    ) {
        self.elapsed = elapsed;
    }
}

// --------------------
// FileExtractionResult

/// Everything extracted from one log source: the ordered [`Events`], the
/// captured [`HeaderFields`], the origin timestamp (when found), and the
/// source path.
///
/// Created fresh per file and fully populated in one extraction pass;
/// after that, only the elapsed-time annotation pass mutates it.
pub struct FileExtractionResult {
    /// path of the log source
    path: FPath,
    /// every keyword match, in detection order
    events: Events,
    /// captured header metadata, one entry per configured key
    headers: HeaderFields,
    /// timestamp of the first resolved match of the origin rule
    origin: TimestampLOpt,
}

impl fmt::Debug for FileExtractionResult {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("FileExtractionResult")
            .field("path", &self.path)
            .field("events.len", &self.events.len())
            .field("headers.len", &self.headers.len())
            .field("origin", &self.origin)
            .finish()
    }
}

impl FileExtractionResult {
    pub fn new(
        path: FPath,
        events: Events,
        headers: HeaderFields,
        origin: TimestampLOpt,
    ) -> FileExtractionResult {
        FileExtractionResult {
            path,
            events,
            headers,
            origin,
        }
    }

    pub fn path(self: &FileExtractionResult) -> &FPath {
        &self.path
    }

    pub fn events(self: &FileExtractionResult) -> &Events {
        &self.events
    }

    pub fn headers(self: &FileExtractionResult) -> &HeaderFields {
        &self.headers
    }

    /// The origin timestamp, i.e. the meter wake; `None` when the origin
    /// rule never matched with a resolved timestamp.
    pub fn origin(self: &FileExtractionResult) -> &TimestampLOpt {
        &self.origin
    }

    pub fn count_events(self: &FileExtractionResult) -> Count {
        self.events.len() as Count
    }

    /// Count of events without a resolved timestamp.
    pub fn count_events_unresolved(self: &FileExtractionResult) -> Count {
        self.events
            .iter()
            .filter(|event| event.ts().is_none())
            .count() as Count
    }

    /// First captured value of header key `key`, if any.
    ///
    /// The `smee` binary names per-file artifacts after the captured
    /// meter id.
    pub fn header_value_first(
        self: &FileExtractionResult,
        key: &str,
    ) -> Option<&str> {
        self.headers
            .iter()
            .find(|field| field.key() == key)
            .and_then(|field| field.values().first())
            .map(|value| value.as_str())
    }
}

#[doc(hidden)]
pub use crate::data::timestamp::elapsed_seconds;

/// Annotate every event carrying a resolved timestamp with its signed
/// elapsed time since `origin`.
///
/// Events without a resolved timestamp keep `elapsed` unset; they are
/// printed with an explicit unknown marker, never a numeric placeholder.
pub fn events_annotate_elapsed(
    events: &mut Events,
    origin: &TimestampL,
) {
    defn!("(events[{}], origin {})", events.len(), origin);
    let mut count: Count = 0;
    for event in events.iter_mut() {
        if let Some(ts) = event.ts() {
            let elapsed = elapsed_seconds(ts, origin);
            event.set_elapsed(Some(elapsed));
            count += 1;
        }
    }
    defx!("annotated {} events", count);
}
