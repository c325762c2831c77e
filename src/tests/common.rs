// src/tests/common.rs

//! Common helpers for tests.

#![allow(non_upper_case_globals)]

use crate::common::FPath;
use crate::data::event::{KeywordRule, KeywordRules};
use crate::data::header::{HeaderRule, HeaderRules};
use crate::data::timestamp::TimestampL;
use crate::readers::helpers::path_to_fpath;

use std::io::Write;

pub use ::tempfile::NamedTempFile;

/// Create a `NamedTempFile` with the passed `content`.
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut ntf = NamedTempFile::new().unwrap();
    ntf.write_all(content.as_bytes()).unwrap();
    ntf.flush().unwrap();

    ntf
}

/// Create a `NamedTempFile` with the passed raw bytes.
pub fn create_temp_file_bytes(content: &[u8]) -> NamedTempFile {
    let mut ntf = NamedTempFile::new().unwrap();
    ntf.write_all(content).unwrap();
    ntf.flush().unwrap();

    ntf
}

/// `FPath` of a `NamedTempFile`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    path_to_fpath(ntf.path())
}

/// `TimestampL` from literal parts; tests read better.
pub fn hmsm(
    hour: u32,
    minute: u32,
    second: u32,
    milli: u32,
) -> TimestampL {
    TimestampL::from_hms_milli_opt(hour, minute, second, milli).unwrap()
}

/// Compile `KeywordRules` from pattern/meaning pairs; the default
/// matching mode (literal, case-insensitive).
pub fn rules_from(keywords: &[(&str, &str)]) -> KeywordRules {
    keywords
        .iter()
        .map(|(pattern, meaning)| KeywordRule::new(pattern, meaning, true, false).unwrap())
        .collect()
}

/// `HeaderRules` from key/meaning pairs.
pub fn header_rules_from(fields: &[(&str, &str)]) -> HeaderRules {
    fields
        .iter()
        .map(|(key, meaning)| HeaderRule::new(key, meaning))
        .collect()
}

/// The keyword subset most tests use.
pub const KEYWORDS_TEST: [(&str, &str); 3] = [
    ("cpu_start:", "Meter Wakes up"),
    ("aws_Publish", "Send Telemetry Data"),
    ("into low power!", "Deep Sleep"),
];

/// The origin pattern most tests use.
pub const ORIGIN_TEST: &str = "cpu_start:";

/// A small well-formed meter log.
pub const LOG_BASIC: &str = "\
[10:00:00.000] cpu_start: boot
[10:00:02.500] aws_Publish successed
[10:00:03.000] into low power!
";
