// src/tests/printers_tests.rs

//! tests for `printer/printers.rs`: report rows, CSV serialization, and
//! the timeline series

#![allow(non_snake_case)]

use crate::tests::common::{
    create_temp_file,
    ntf_fpath,
    rules_from,
    header_rules_from,
};
use crate::data::event::FileExtractionResult;
use crate::data::timestamp::{ELAPSED_UNKNOWN, TIMESTAMP_UNKNOWN};
use crate::printer::printers::{
    csv_escape,
    csv_row,
    csv_row_parse,
    header_rows,
    report_csv_parse,
    report_rows,
    timeline_series,
    write_report_csv,
    write_timeline_csv,
    REPORT_COLUMNS,
};
use crate::readers::eventreader::EventReader;

use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CSV serialization

#[test_case("plain", "plain"; "plain passthrough")]
#[test_case("with, comma", "\"with, comma\""; "comma quoted")]
#[test_case("say \"hi\"", "\"say \"\"hi\"\"\""; "quotes doubled")]
#[test_case("line\nbreak", "\"line\nbreak\""; "newline quoted")]
#[test_case("", ""; "empty passthrough")]
fn test_csv_escape(
    field: &str,
    expect: &str,
) {
    assert_eq!(csv_escape(field), expect);
}

#[test_case(&["a", "b", "c"]; "plain fields")]
#[test_case(&["with, comma", "say \"hi\"", ""]; "tricky fields")]
#[test_case(&["[10:00:00.000] cpu_start: boot, pass 1", "0.000"]; "log line field")]
fn test_csv_row_parse_inverts_csv_row(fields: &[&str]) {
    let row: String = csv_row(fields);
    let parsed: Vec<String> = csv_row_parse(&row);
    assert_eq!(parsed, fields.to_vec());
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// report rows

const LOG_REPORT: &str = "\
[10:00:00.000] g_meterId : 9000231
[10:00:00.100] cpu_start: boot
[10:00:02.500] aws_Publish successed
aws_Publish retry, no timestamp here
continuation
continuation
continuation
aws_Publish far from any timestamp
";

fn result_from_log(content: &str) -> FileExtractionResult {
    let ntf = create_temp_file(content);
    let rules = rules_from(&[
        ("cpu_start:", "Meter Wakes up"),
        ("aws_Publish", "Send Telemetry Data"),
    ]);
    let mut eventreader = EventReader::new(ntf_fpath(&ntf), rules, 0, 3).unwrap();

    eventreader.process(&header_rules_from(&[("g_meterId", "Meter ID")]))
}

#[test]
fn test_report_rows_markers() {
    let result = result_from_log(LOG_REPORT);
    let rows = report_rows(&result);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0][0], "10:00:00.100");
    assert_eq!(rows[0][1], "0.000");
    assert_eq!(rows[0][2], "cpu_start:");
    assert_eq!(rows[0][4], "Meter Wakes up");
    assert_eq!(rows[1][1], "2.400");
    // the third event borrowed its timestamp by look-back
    assert_eq!(rows[2][0], "10:00:02.500");
    // the fourth is past the look-back window; explicit markers
    assert_eq!(rows[3][0], TIMESTAMP_UNKNOWN);
    assert_eq!(rows[3][1], ELAPSED_UNKNOWN);
}

#[test]
fn test_header_rows() {
    let result = result_from_log(LOG_REPORT);
    let rows = header_rows(&result);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "g_meterId");
    assert_eq!(rows[0][1], "Meter ID");
    assert_eq!(rows[0][2], ": 9000231");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// report CSV round-trip

#[test]
fn test_report_csv_roundtrip() {
    let result = result_from_log(LOG_REPORT);
    let ntf_out = create_temp_file("");
    let fpath_out = ntf_fpath(&ntf_out);
    write_report_csv(&result, &fpath_out).unwrap();
    let text: String = std::fs::read_to_string(&fpath_out).unwrap();
    // re-parsing recovers the same tuples, modulo formatting
    let rows_parsed = report_csv_parse(&text);
    let rows_rendered = report_rows(&result);
    assert_eq!(rows_parsed, rows_rendered);
}

#[test]
fn test_report_csv_layout() {
    let result = result_from_log(LOG_REPORT);
    let ntf_out = create_temp_file("");
    let fpath_out = ntf_fpath(&ntf_out);
    write_report_csv(&result, &fpath_out).unwrap();
    let text: String = std::fs::read_to_string(&fpath_out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Header Information:"));
    assert_eq!(lines.next(), Some("Keyword,Meaning,Value"));
    assert!(text.contains(csv_row(&REPORT_COLUMNS).as_str()));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// timeline series

#[test]
fn test_timeline_series_excludes_unresolved() {
    let result = result_from_log(LOG_REPORT);
    let series = timeline_series(&result);
    // four events, one past the look-back window: three plottable points
    assert_eq!(result.events().len(), 4);
    assert_eq!(series.len(), 3);
    assert_eq!(series[0], (0.0, String::from("cpu_start:")));
    assert_eq!(series[1], (2.4, String::from("aws_Publish")));
    assert_eq!(series[2], (2.4, String::from("aws_Publish")));
}

#[test]
fn test_timeline_series_empty_when_origin_absent() {
    let ntf = create_temp_file("[10:00:02.500] aws_Publish successed\n");
    let rules = rules_from(&[
        ("cpu_start:", "Meter Wakes up"),
        ("aws_Publish", "Send Telemetry Data"),
    ]);
    let mut eventreader = EventReader::new(ntf_fpath(&ntf), rules, 0, 3).unwrap();
    let result = eventreader.process(&header_rules_from(&[]));
    // events retained in the tabular output, excluded from the series
    assert_eq!(result.events().len(), 1);
    assert!(timeline_series(&result).is_empty());
}

#[test]
fn test_write_timeline_csv() {
    let result = result_from_log(LOG_REPORT);
    let series = timeline_series(&result);
    let ntf_out = create_temp_file("");
    let fpath_out = ntf_fpath(&ntf_out);
    write_timeline_csv(&series, &fpath_out).unwrap();
    let text: String = std::fs::read_to_string(&fpath_out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Relative Time (s),Keyword");
    assert_eq!(lines[1], "0.000,cpu_start:");
    assert_eq!(lines.len(), 1 + series.len());
}

#[test]
fn test_report_rows_match_event_order() {
    let result = result_from_log(LOG_REPORT);
    let rows = report_rows(&result);
    for (row, event) in rows.iter().zip(result.events().iter()) {
        assert_eq!(row[2], event.keyword());
        assert_eq!(row[3], event.line());
        assert_eq!(row[4], event.meaning());
    }
}
