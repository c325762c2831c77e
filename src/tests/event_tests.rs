// src/tests/event_tests.rs

//! tests for `event.rs` types

#![allow(non_snake_case)]

use crate::tests::common::hmsm;
use crate::data::event::{
    events_annotate_elapsed,
    Event,
    Events,
    KeywordRule,
};

use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// KeywordRule

#[test_case("cpu_start:", "cpu_start: boot", true; "exact substring")]
#[test_case("cpu_start:", "[10:00:00.000] CPU_START: boot", true; "case-insensitive by default")]
#[test_case("into low power!", "entering into low power! now", true; "spaces and punctuation")]
#[test_case("aws_Publish", "aws_Disconnect", false; "different keyword")]
#[test_case("a.b", "aXb", false; "literal dot is not a regex dot")]
fn test_keywordrule_literal_matching(
    pattern: &str,
    text: &str,
    expect: bool,
) {
    let rule = KeywordRule::new(pattern, "meaning", true, false).unwrap();
    assert_eq!(rule.is_match(text), expect, "pattern {:?} text {:?}", pattern, text);
}

#[test]
fn test_keywordrule_case_sensitive() {
    let rule = KeywordRule::new("cpu_start:", "meaning", true, true).unwrap();
    assert!(rule.is_match("cpu_start: boot"));
    assert!(!rule.is_match("CPU_START: boot"));
}

#[test]
fn test_keywordrule_regex_mode() {
    let rule = KeywordRule::new(r"aws_Publish.*successed", "meaning", false, false).unwrap();
    assert!(rule.is_match("[10:00:02.500] aws_Publish topic meter-status successed"));
    assert!(!rule.is_match("[10:00:02.500] aws_Publish failed"));
}

#[test]
fn test_keywordrule_regex_mode_bad_pattern() {
    assert!(KeywordRule::new(r"aws_Publish(", "meaning", false, false).is_err());
}

#[test]
fn test_keywordrule_pattern_trimmed_for_matching() {
    // the configured pattern may carry stray whitespace; matching uses
    // the trimmed form, reporting keeps the original
    let rule = KeywordRule::new(" aws_Publish ", "meaning", true, false).unwrap();
    assert!(rule.is_match("aws_Publish successed"));
    assert_eq!(rule.pattern(), " aws_Publish ");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Event

#[test]
fn test_event_new() {
    let rule = KeywordRule::new("aws_Publish", "Send Telemetry Data", true, false).unwrap();
    let event = Event::new(
        Some(hmsm(10, 0, 2, 500)),
        &rule,
        "[10:00:02.500] aws_Publish successed",
        1,
    );
    assert_eq!(*event.ts(), Some(hmsm(10, 0, 2, 500)));
    assert_eq!(event.keyword(), "aws_Publish");
    assert_eq!(event.meaning(), "Send Telemetry Data");
    assert_eq!(event.li(), 1);
    assert_eq!(*event.elapsed(), None, "elapsed is unset until annotated");
}

#[test]
fn test_events_annotate_elapsed() {
    let rule = KeywordRule::new("aws_Publish", "Send Telemetry Data", true, false).unwrap();
    let mut events: Events = vec![
        Event::new(Some(hmsm(10, 0, 0, 0)), &rule, "line a", 0),
        Event::new(Some(hmsm(10, 0, 2, 500)), &rule, "line b", 1),
        Event::new(None, &rule, "line c", 2),
        // an event logged before the origin
        Event::new(Some(hmsm(9, 59, 59, 0)), &rule, "line d", 3),
    ];
    let origin = hmsm(10, 0, 0, 0);
    events_annotate_elapsed(&mut events, &origin);
    assert_eq!(*events[0].elapsed(), Some(0.0));
    assert_eq!(*events[1].elapsed(), Some(2.5));
    assert_eq!(*events[2].elapsed(), None, "unresolved event stays unknown");
    assert_eq!(*events[3].elapsed(), Some(-1.0), "sign preserved, not clamped");
}
