// src/tests/eventreader_tests.rs

//! tests for `eventreader.rs`, the event-timeline extraction driver

#![allow(non_snake_case)]

use crate::tests::common::{
    create_temp_file,
    hmsm,
    ntf_fpath,
    rules_from,
    KEYWORDS_TEST,
    LOG_BASIC,
    ORIGIN_TEST,
};
use crate::data::event::FileExtractionResult;
use crate::data::header::HeaderRules;
use crate::readers::eventreader::{rules_match, EventReader, LOOKBACK_DEFAULT};

use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// helper to wrap the match and panic checks
fn new_EventReader(
    content: &str,
    keywords: &[(&str, &str)],
    origin: &str,
    lookback: usize,
) -> EventReader {
    let ntf = create_temp_file(content);
    let rules = rules_from(keywords);
    let origin_index = rules
        .iter()
        .position(|rule| rule.pattern() == origin)
        .unwrap();
    let path = ntf_fpath(&ntf);
    // keep the tempfile alive until the reader has read it
    let eventreader = match EventReader::new(path.clone(), rules, origin_index, lookback) {
        Ok(val) => val,
        Err(err) => {
            panic!("ERROR: EventReader::new({:?}, …) failed {}", path, err);
        }
    };
    drop(ntf);

    eventreader
}

fn process(
    content: &str,
    keywords: &[(&str, &str)],
    origin: &str,
) -> (FileExtractionResult, EventReader) {
    let mut eventreader = new_EventReader(content, keywords, origin, LOOKBACK_DEFAULT);
    let result = eventreader.process(&HeaderRules::new());

    (result, eventreader)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// rules_match

#[test]
fn test_rules_match_order_and_multiplicity() {
    let rules = rules_from(&[
        ("get network status", "Attaches to GSM Network"),
        ("aws_Connect", "Opens Protocol"),
    ]);
    // one line satisfying two distinct rules
    let matched = rules_match("[10:00:01.000] get network status ok, aws_Connect begin", &rules);
    assert_eq!(matched, vec![0, 1]);
}

#[test]
fn test_rules_match_none() {
    let rules = rules_from(&KEYWORDS_TEST);
    assert!(rules_match("[10:00:01.000] nothing interesting", &rules).is_empty());
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// extraction scenarios

#[test]
fn test_extract_basic_scenario() {
    let keywords = [("cpu_start:", "Wake"), ("aws_Publish", "Publish")];
    let content = "\
[10:00:00.000] cpu_start: boot
[10:00:02.500] aws_Publish successed
";
    let (result, _er) = process(content, &keywords, "cpu_start:");
    assert_eq!(*result.origin(), Some(hmsm(10, 0, 0, 0)));
    assert_eq!(result.count_events(), 2);
    let events = result.events();
    assert_eq!(*events[0].ts(), Some(hmsm(10, 0, 0, 0)));
    assert_eq!(events[0].meaning(), "Wake");
    assert_eq!(*events[0].elapsed(), Some(0.0));
    assert_eq!(*events[1].ts(), Some(hmsm(10, 0, 2, 500)));
    assert_eq!(events[1].meaning(), "Publish");
    assert_eq!(*events[1].elapsed(), Some(2.5));
}

#[test]
fn test_extract_origin_absent() {
    let keywords = [("cpu_start:", "Wake"), ("aws_Publish", "Publish")];
    let content = "\
[10:00:01.000] get network status ok
[10:00:02.500] aws_Publish successed
[10:00:03.000] aws_Publish successed again
";
    let (result, _er) = process(content, &keywords, "cpu_start:");
    // no exception, events recorded, elapsed unknown for every event
    assert_eq!(*result.origin(), None);
    assert_eq!(result.count_events(), 2);
    for event in result.events().iter() {
        assert!(event.ts().is_some());
        assert_eq!(*event.elapsed(), None);
    }
}

#[test]
fn test_extract_origin_one_shot() {
    let keywords = [("cpu_start:", "Wake")];
    let content = "\
[10:00:00.000] cpu_start: first boot
[10:05:00.000] cpu_start: second boot
";
    let (result, _er) = process(content, &keywords, "cpu_start:");
    // first occurrence wins; the later match does not overwrite it
    assert_eq!(*result.origin(), Some(hmsm(10, 0, 0, 0)));
    assert_eq!(result.count_events(), 2);
    assert_eq!(*result.events()[1].elapsed(), Some(300.0));
}

#[test]
fn test_extract_origin_skips_unresolved_match() {
    // the first origin match has no resolvable timestamp; the origin is
    // captured at the second, resolved, match
    let keywords = [("cpu_start:", "Wake")];
    let content = "\
no timestamp here
nor here
nor here
nor here
cpu_start: early boot, unresolvable
[10:00:00.000] cpu_start: boot
";
    let (result, _er) = process(content, &keywords, "cpu_start:");
    assert_eq!(*result.origin(), Some(hmsm(10, 0, 0, 0)));
    assert_eq!(result.count_events(), 2);
    assert_eq!(*result.events()[0].ts(), None);
    assert_eq!(*result.events()[0].elapsed(), None);
}

#[test]
fn test_extract_negative_elapsed_before_origin() {
    let keywords = [("cpu_start:", "Wake"), ("Signal quality", "RSSI")];
    let content = "\
[09:59:58.500] Signal quality report
[10:00:00.000] cpu_start: boot
";
    let (result, _er) = process(content, &keywords, "cpu_start:");
    assert_eq!(*result.origin(), Some(hmsm(10, 0, 0, 0)));
    assert_eq!(*result.events()[0].elapsed(), Some(-1.5), "sign preserved, not clamped");
}

#[test]
fn test_extract_two_rules_one_line() {
    let keywords = [
        ("get network status", "Attaches to GSM Network"),
        ("aws_Connect", "Opens Protocol"),
    ];
    let content = "[10:00:01.000] get network status ok; aws_Connect begin\n";
    let (result, _er) = process(content, &keywords, "get network status");
    // two distinct Events, not one merged Event
    assert_eq!(result.count_events(), 2);
    assert_eq!(result.events()[0].keyword(), "get network status");
    assert_eq!(result.events()[1].keyword(), "aws_Connect");
    assert_eq!(*result.events()[0].ts(), *result.events()[1].ts());
}

#[test_case(1; "gap one")]
#[test_case(2; "gap two")]
#[test_case(3; "gap three")]
fn test_extract_lookback_within_window(gap: usize) {
    let keywords = [("cpu_start:", "Wake"), ("aws_Excute_Job", "Job done")];
    let mut content = String::from("[10:00:00.000] cpu_start: boot\n");
    for _ in 1..gap {
        content.push_str("continuation line\n");
    }
    content.push_str("aws_Excute_Job AdjustCredit\n");
    let (result, er) = process(&content, &keywords, "cpu_start:");
    let events = result.events();
    assert_eq!(events.len(), 2);
    // the keyword line borrowed the timestamp from the stamped line
    assert_eq!(*events[1].ts(), Some(hmsm(10, 0, 0, 0)));
    assert_eq!(*events[1].elapsed(), Some(0.0));
    assert_eq!(er.summary().EventReader_lookback_resolutions, 1);
}

#[test]
fn test_extract_lookback_past_window() {
    let keywords = [("cpu_start:", "Wake"), ("aws_Excute_Job", "Job done")];
    let content = "\
[10:00:00.000] cpu_start: boot
continuation line
continuation line
continuation line
aws_Excute_Job AdjustCredit
";
    let (result, er) = process(content, &keywords, "cpu_start:");
    let events = result.events();
    assert_eq!(events.len(), 2);
    // past the look-back window; the event is kept, flagged unknown
    assert_eq!(*events[1].ts(), None);
    assert_eq!(*events[1].elapsed(), None);
    assert_eq!(er.summary().EventReader_events_unresolved, 1);
}

#[test]
fn test_extract_malformed_timestamp_recovers() {
    let keywords = [("cpu_start:", "Wake"), ("aws_Publish", "Publish")];
    let content = "\
[10:00:00.000] cpu_start: boot
[10:62:00.000] aws_Publish successed
";
    let (result, er) = process(content, &keywords, "cpu_start:");
    let events = result.events();
    assert_eq!(events.len(), 2, "extraction must not abort on a malformed timestamp");
    // the malformed stamp resolves via look-back to the boot line
    assert_eq!(*events[1].ts(), Some(hmsm(10, 0, 0, 0)));
    assert_eq!(er.summary().EventReader_timestamps_malformed, 1);
}

#[test]
fn test_extract_empty_log() {
    let (result, er) = process("", &KEYWORDS_TEST, ORIGIN_TEST);
    assert_eq!(result.count_events(), 0);
    assert_eq!(*result.origin(), None);
    assert_eq!(er.summary().EventReader_lines, 0);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// summary statistics

#[test]
fn test_summary_counts() {
    let (result, er) = process(LOG_BASIC, &KEYWORDS_TEST, ORIGIN_TEST);
    let summary = er.summary();
    assert_eq!(summary.EventReader_lines, 3);
    assert_eq!(summary.EventReader_events, 3);
    assert_eq!(summary.EventReader_events_unresolved, 0);
    assert_eq!(summary.EventReader_timestamps_malformed, 0);
    assert_eq!(summary.EventReader_origin, Some(hmsm(10, 0, 0, 0)));
    assert_eq!(result.count_events_unresolved(), 0);
}
