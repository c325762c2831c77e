// src/data/timestamp.rs

//! Functions to find the bracketed timestamp literal `[HH:MM:SS.mmm]`
//! within a log line and transform it to a chrono [`NaiveTime`] instance.
//!
//! The metering unit firmware prints a wall-clock time-of-day with
//! millisecond precision and no date component, so [`TimestampL`] is a
//! [`NaiveTime`], not a full `DateTime`.
//!
//! The most relevant functions are:
//! - [`timestamp_resolve`] for one line
//! - [`timestamp_resolve_lookback`] for a line without its own timestamp
//!
//! [`NaiveTime`]: https://docs.rs/chrono/0.4.40/chrono/naive/struct.NaiveTime.html
//! [`timestamp_resolve`]: crate::data::timestamp::timestamp_resolve
//! [`timestamp_resolve_lookback`]: crate::data::timestamp::timestamp_resolve_lookback

use crate::common::{Count, LineIndex};
use crate::data::line::LogLine;
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn};

use std::fmt;

#[doc(hidden)]
pub use ::chrono::{Duration, NaiveTime, Timelike};
use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::more_asserts::debug_assert_lt;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ, den, deo, dex, deñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Timestamp regex matching
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A wall-clock time-of-day with millisecond precision used in _smeelib_.
///
/// No date component; the metering unit does not log one.
pub type TimestampL = NaiveTime;
pub type TimestampLOpt = Option<TimestampL>;

/// A signed count of seconds elapsed between two [`TimestampL`] values.
///
/// Negative values are meaningful; they signal an event logged before the
/// origin event (out-of-order logging).
pub type ElapsedSeconds = f64;
pub type ElapsedSecondsOpt = Option<ElapsedSeconds>;

/// Regular expression capture group name.
pub type CaptureGroupName = str;
/// Regular expression capture group pattern, used within a [`RegexPattern`].
pub type CaptureGroupPattern = str;
/// A regular expression pattern passed to [`Regex::new`].
///
/// [`Regex::new`]: https://docs.rs/regex/1.11.1/regex/struct.Regex.html#method.new
pub type RegexPattern = str;

const CGN_HOUR: &CaptureGroupName = "hour";
const CGN_MINUTE: &CaptureGroupName = "minute";
const CGN_SECOND: &CaptureGroupName = "second";
const CGN_FRACTIONAL: &CaptureGroupName = "fractional";

const CGP_HOUR: &CaptureGroupPattern = concatcp!(r"(?P<", CGN_HOUR, r">\d{2})");
const CGP_MINUTE: &CaptureGroupPattern = concatcp!(r"(?P<", CGN_MINUTE, r">\d{2})");
const CGP_SECOND: &CaptureGroupPattern = concatcp!(r"(?P<", CGN_SECOND, r">\d{2})");
const CGP_FRACTIONAL: &CaptureGroupPattern = concatcp!(r"(?P<", CGN_FRACTIONAL, r">\d{3})");

/// regex pattern of the left bracket of the timestamp literal
const RP_LB: &RegexPattern = r"\[";
/// regex pattern of the right bracket of the timestamp literal
const RP_RB: &RegexPattern = r"\]";

/// The one timestamp literal the metering unit firmware emits,
/// `[HH:MM:SS.mmm]`, exactly three fractional digits, 24-hour clock.
pub const TIMESTAMP_PATTERN: &RegexPattern = concatcp!(
    RP_LB, CGP_HOUR, ":", CGP_MINUTE, ":", CGP_SECOND, r"\.", CGP_FRACTIONAL, RP_RB,
);

lazy_static! {
    /// Compiled [`TIMESTAMP_PATTERN`].
    static ref TIMESTAMP_REGEX: Regex = {
        defñ!("lazy_static! TIMESTAMP_REGEX::new()");

        Regex::new(TIMESTAMP_PATTERN).unwrap()
    };
}

/// Printed marker for a timestamp that could not be resolved.
pub const TIMESTAMP_UNKNOWN: &str = "unknown";

/// Printed marker for an elapsed time that could not be computed.
pub const ELAPSED_UNKNOWN: &str = "unknown";

/// strftime-style pattern matching the literal the firmware prints,
/// used when printing a resolved [`TimestampL`].
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ResultTimestamp
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Custom result enum for timestamp resolution functions.
///
/// `Malformed` is a timestamp literal that matched the pattern but holds
/// out-of-range values, e.g. minute `61`. Resolution yields no timestamp
/// but processing must continue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResultTimestamp {
    /// the line carried a well-formed timestamp literal
    Found(TimestampL),
    /// the line carried no timestamp literal
    NotFound,
    /// the line carried a timestamp literal with out-of-range values
    Malformed,
}

impl ResultTimestamp {
    /// Returns `true` if the result is [`Found`].
    ///
    /// [`Found`]: ResultTimestamp::Found
    #[inline(always)]
    pub const fn is_found(&self) -> bool {
        matches!(*self, ResultTimestamp::Found(_))
    }

    /// Returns `true` if the result is [`Malformed`].
    ///
    /// [`Malformed`]: ResultTimestamp::Malformed
    #[inline(always)]
    pub const fn is_malformed(&self) -> bool {
        matches!(*self, ResultTimestamp::Malformed)
    }

    /// Converts from `ResultTimestamp` to [`TimestampLOpt`], consuming
    /// `self` and discarding the `Malformed` distinction.
    #[inline(always)]
    pub fn ok(self) -> TimestampLOpt {
        match self {
            ResultTimestamp::Found(ts) => Some(ts),
            ResultTimestamp::NotFound => None,
            ResultTimestamp::Malformed => None,
        }
    }
}

impl fmt::Display for ResultTimestamp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ResultTimestamp::Found(ts) => write!(f, "ResultTimestamp::Found({})", ts),
            ResultTimestamp::NotFound => write!(f, "ResultTimestamp::NotFound"),
            ResultTimestamp::Malformed => write!(f, "ResultTimestamp::Malformed"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// resolution functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Resolve the timestamp of one line.
///
/// Matches [`TIMESTAMP_PATTERN`] anywhere in the line; the first match
/// wins. The digit groups cannot fail to parse by construction of the
/// pattern; out-of-range values yield [`ResultTimestamp::Malformed`].
pub fn timestamp_resolve(line: &str) -> ResultTimestamp {
    let captures = match TIMESTAMP_REGEX.captures(line) {
        Some(captures) => captures,
        None => {
            return ResultTimestamp::NotFound;
        }
    };
    // the capture groups are `\d{2}`/`\d{3}`; parsing them as `u32`
    // cannot fail, guard anyway
    let mut parts: [u32; 4] = [0; 4];
    for (at, cgn) in [CGN_HOUR, CGN_MINUTE, CGN_SECOND, CGN_FRACTIONAL]
        .into_iter()
        .enumerate()
    {
        let m = match captures.name(cgn) {
            Some(m) => m,
            None => {
                de_err!("capture group {:?} missing from match of {:?}", cgn, TIMESTAMP_PATTERN);
                return ResultTimestamp::Malformed;
            }
        };
        parts[at] = match m.as_str().parse::<u32>() {
            Ok(val) => val,
            Err(_err) => {
                de_err!("failed to parse capture group {:?} value {:?}; {}", cgn, m.as_str(), _err);
                return ResultTimestamp::Malformed;
            }
        };
    }
    match NaiveTime::from_hms_milli_opt(parts[0], parts[1], parts[2], parts[3]) {
        Some(ts) => {
            deñ!("return Found({})", ts);

            ResultTimestamp::Found(ts)
        }
        None => {
            deñ!("out-of-range {:02}:{:02}:{:02}.{:03}; return Malformed", parts[0], parts[1], parts[2], parts[3]);

            ResultTimestamp::Malformed
        }
    }
}

/// Result of [`timestamp_resolve_lookback`]: the resolution and the count
/// of malformed timestamp literals encountered along the way.
pub type ResultTimestampLookback = (ResultTimestamp, Count);

/// Resolve the timestamp of line `lines[index]`, looking back at preceding
/// lines when the line carries no timestamp of its own.
///
/// Scans `lines[index - 1]`, `lines[index - 2]`, … up to `max_back` lines;
/// the first resolved timestamp wins. A malformed timestamp literal is
/// counted and the scan continues to older lines within the window; it
/// must not mask a well-formed timestamp directly behind it.
///
/// Models a multi-line log record that prints its keyword on a
/// continuation line without repeating the timestamp.
pub fn timestamp_resolve_lookback(
    lines: &[LogLine],
    index: LineIndex,
    max_back: usize,
) -> ResultTimestampLookback {
    defn!("(lines[{}…], index {}, max_back {})", lines.len(), index, max_back);
    debug_assert_lt!(index, lines.len(), "index {} past lines end {}", index, lines.len());

    let mut count_malformed: Count = 0;
    match timestamp_resolve(lines[index].text()) {
        ResultTimestamp::Found(ts) => {
            defx!("return (Found({}), {})", ts, count_malformed);
            return (ResultTimestamp::Found(ts), count_malformed);
        }
        ResultTimestamp::Malformed => {
            count_malformed += 1;
        }
        ResultTimestamp::NotFound => {}
    }
    for back in 1..=max_back {
        if index < back {
            break;
        }
        match timestamp_resolve(lines[index - back].text()) {
            ResultTimestamp::Found(ts) => {
                defx!("lookback hit at index {}; return (Found({}), {})", index - back, ts, count_malformed);
                return (ResultTimestamp::Found(ts), count_malformed);
            }
            ResultTimestamp::Malformed => {
                count_malformed += 1;
            }
            ResultTimestamp::NotFound => {}
        }
    }
    defx!("return (NotFound, {})", count_malformed);

    (ResultTimestamp::NotFound, count_malformed)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// elapsed time
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Signed seconds from `origin` to `ts`, millisecond precision.
///
/// Negative when `ts` precedes `origin`; the sign is preserved, never
/// clamped, as it reveals out-of-order logging.
pub fn elapsed_seconds(
    ts: &TimestampL,
    origin: &TimestampL,
) -> ElapsedSeconds {
    let duration: Duration = *ts - *origin;

    duration.num_milliseconds() as ElapsedSeconds / 1000.0
}

/// Printable form of an optional elapsed time; three decimal places or
/// [`ELAPSED_UNKNOWN`], never a numeric placeholder.
pub fn elapsed_format(elapsed: &ElapsedSecondsOpt) -> String {
    match elapsed {
        Some(val) => format!("{:.3}", val),
        None => String::from(ELAPSED_UNKNOWN),
    }
}

/// Printable form of an optional timestamp; [`TIMESTAMP_FORMAT`] or
/// [`TIMESTAMP_UNKNOWN`].
pub fn timestamp_format(ts: &TimestampLOpt) -> String {
    match ts {
        Some(val) => val.format(TIMESTAMP_FORMAT).to_string(),
        None => String::from(TIMESTAMP_UNKNOWN),
    }
}
