// src/printer/summary.rs

//! Cross-file aggregation output: the per-keyword summary table, and the
//! per-file processing statistics printed for CLI option `--summary`.

use crate::common::{Count, FPath};
use crate::data::event::{FileExtractionResult, KeywordRules};
use crate::data::timestamp::{ElapsedSecondsOpt, TimestampLOpt};
use crate::printer::printers::csv_row;
use crate::readers::helpers::fpath_to_path;
use crate::readers::summary::{Summary, SummaryReaderData};

use std::fs::File;
use std::io::{BufWriter, Error, Write};

use ::min_max::max;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::unicode_width::UnicodeWidthStr;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// summary table
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Printed marker for a summary cell with nothing to report: the keyword
/// never matched in that file, or never with a resolved timestamp.
pub const SUMMARY_NO_DATA: &str = "no data";

/// File name of the cross-file summary artifact, written into the
/// processed directory.
pub const SUMMARY_STATS_FILENAME: &str = "SummaryStats.csv";

/// One row of the cross-file summary table: a keyword and, per processed
/// file, the maximum elapsed time recorded for it.
///
/// Derived, recomputed each run.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    /// the keyword pattern
    pub keyword: String,
    /// one cell per file, in file order; `None` is "no data"
    pub cells: Vec<ElapsedSecondsOpt>,
}

pub type SummaryRows = Vec<SummaryRow>;

/// Build the summary table: one row per configured keyword, one cell per
/// result in `results` order.
///
/// A cell is the maximum elapsed time recorded for that keyword in that
/// file, or `None` when the keyword never matched or never resolved.
pub fn summary_rows(
    rules: &KeywordRules,
    results: &[&FileExtractionResult],
) -> SummaryRows {
    defn!("(rules[{}], results[{}])", rules.len(), results.len());

    let mut rows: SummaryRows = SummaryRows::with_capacity(rules.len());
    for rule in rules.iter() {
        let mut cells: Vec<ElapsedSecondsOpt> = Vec::with_capacity(results.len());
        for result in results.iter() {
            let mut cell: ElapsedSecondsOpt = None;
            for event in result.events().iter() {
                if event.keyword() != rule.pattern() {
                    continue;
                }
                if let Some(elapsed) = event.elapsed() {
                    cell = Some(match cell {
                        Some(prior) => prior.max(*elapsed),
                        None => *elapsed,
                    });
                }
            }
            cells.push(cell);
        }
        rows.push(SummaryRow {
            keyword: String::from(rule.pattern()),
            cells,
        });
    }
    defx!("return {} rows", rows.len());

    rows
}

/// Printable form of one summary cell.
pub fn summary_cell_format(cell: &ElapsedSecondsOpt) -> String {
    match cell {
        Some(val) => format!("{:.3}", val),
        None => String::from(SUMMARY_NO_DATA),
    }
}

/// Print the summary table aligned, one row per keyword, one column per
/// file.
pub fn print_summary_table(
    rows: &SummaryRows,
    file_labels: &[FPath],
) -> Result<(), Error> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();

    const KEYWORD_COLUMN: &str = "Keyword";
    let mut width_keyword: usize = KEYWORD_COLUMN.width();
    for row in rows.iter() {
        width_keyword = max!(width_keyword, row.keyword.width());
    }
    let mut widths: Vec<usize> = Vec::with_capacity(file_labels.len());
    for (at, label) in file_labels.iter().enumerate() {
        let mut width: usize = label.width();
        for row in rows.iter() {
            width = max!(width, summary_cell_format(&row.cells[at]).width());
        }
        widths.push(width);
    }

    write!(lock, "{:<width$}", KEYWORD_COLUMN, width = width_keyword)?;
    for (label, width) in file_labels.iter().zip(widths.iter()) {
        write!(lock, "  {:>width$}", label, width = width)?;
    }
    writeln!(lock)?;
    for row in rows.iter() {
        write!(lock, "{:<width$}", row.keyword, width = width_keyword)?;
        for (cell, width) in row.cells.iter().zip(widths.iter()) {
            write!(lock, "  {:>width$}", summary_cell_format(cell), width = width)?;
        }
        writeln!(lock)?;
    }
    lock.flush()?;

    Ok(())
}

/// Write the summary table as `SummaryStats.csv`: header row of file
/// identifiers, then one row per keyword.
pub fn write_summary_csv(
    rows: &SummaryRows,
    file_labels: &[FPath],
    path: &FPath,
) -> Result<(), Error> {
    defñ!("({:?})", path);

    let file: File = File::create(fpath_to_path(path))?;
    let mut writer: BufWriter<File> = BufWriter::new(file);

    let mut columns: Vec<&str> = Vec::with_capacity(file_labels.len() + 1);
    columns.push("Keyword");
    for label in file_labels.iter() {
        columns.push(label.as_str());
    }
    writeln!(writer, "{}", csv_row(&columns))?;
    for row in rows.iter() {
        let mut fields: Vec<String> = Vec::with_capacity(row.cells.len() + 1);
        fields.push(row.keyword.clone());
        for cell in row.cells.iter() {
            fields.push(summary_cell_format(cell));
        }
        writeln!(writer, "{}", csv_row(&fields))?;
    }
    writer.flush()?;

    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SummaryPrinted
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Tallies of processing activity across all processed files, printed
/// last for CLI option `--summary`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SummaryPrinted {
    /// count of files processed
    pub files: Count,
    /// count of files that failed to process
    pub files_err: Count,
    /// count of lines read
    pub lines: Count,
    /// count of events recorded
    pub events: Count,
    /// count of events without a resolved timestamp
    pub events_unresolved: Count,
    /// count of malformed timestamp literals
    pub timestamps_malformed: Count,
    /// count of event timestamps resolved by look-back
    pub lookback_resolutions: Count,
    /// count of files where the origin event was found
    pub origins_found: Count,
}

impl SummaryPrinted {
    /// Update tallies with one file's [`Summary`].
    ///
    /// [`Summary`]: crate::readers::summary::Summary
    pub fn summary_update(
        self: &mut SummaryPrinted,
        summary: &Summary,
    ) {
        match summary.readerdata {
            SummaryReaderData::Events(ser) => {
                self.files += 1;
                self.lines += ser.EventReader_lines;
                self.events += ser.EventReader_events;
                self.events_unresolved += ser.EventReader_events_unresolved;
                self.timestamps_malformed += ser.EventReader_timestamps_malformed;
                self.lookback_resolutions += ser.EventReader_lookback_resolutions;
                if ser.EventReader_origin.is_some() {
                    self.origins_found += 1;
                }
            }
            SummaryReaderData::Dummy => {
                self.files_err += 1;
            }
        }
    }

    /// Print the final tallies.
    pub fn print(self: &SummaryPrinted) {
        println!("Files processed         : {}", self.files);
        println!("Files failed            : {}", self.files_err);
        println!("Lines read              : {}", self.lines);
        println!("Events                  : {}", self.events);
        println!("Events unresolved       : {}", self.events_unresolved);
        println!("Timestamps malformed    : {}", self.timestamps_malformed);
        println!("Look-back resolutions   : {}", self.lookback_resolutions);
        println!("Origin events found     : {}", self.origins_found);
    }
}

/// Print one file's processing statistics, for CLI option `--summary`.
pub fn print_summary(summary: &Summary) {
    println!("File: {:?} ({})", summary.path, summary.filetype);
    match summary.readerdata {
        SummaryReaderData::Events(ser) => {
            println!("   bytes         : {}", ser.EventReader_filesz);
            println!("   lines         : {}", ser.EventReader_lines);
            println!("   events        : {}", ser.EventReader_events);
            println!("   unresolved    : {}", ser.EventReader_events_unresolved);
            println!("   malformed     : {}", ser.EventReader_timestamps_malformed);
            println!("   look-backs    : {}", ser.EventReader_lookback_resolutions);
            let origin: TimestampLOpt = ser.EventReader_origin;
            match origin {
                Some(ts) => println!("   origin        : {}", ts),
                None => println!("   origin        : not found"),
            }
        }
        SummaryReaderData::Dummy => {}
    }
    if let Some(ref error) = summary.error {
        println!("   error         : {}", error);
    }
}
