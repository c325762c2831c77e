// src/printer/printers.rs

//! Specialized printer struct [`PrinterEvent`] and helper functions for
//! rendering one file's [`FileExtractionResult`]: the tabular report
//! (console and CSV) and the timeline series.
//!
//! `smee` delegates timeline rendering to external plotting tools; the
//! timeline CSV written here is the hand-off format.
//!
//! [`PrinterEvent`]: self::PrinterEvent
//! [`FileExtractionResult`]: crate::data::event::FileExtractionResult

use crate::common::FPath;
use crate::data::event::FileExtractionResult;
use crate::data::timestamp::{
    elapsed_format,
    timestamp_format,
    ElapsedSeconds,
};
use crate::debug::printers::de_err;
use crate::readers::helpers::fpath_to_path;

use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

#[doc(hidden)]
pub use ::termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use ::unicode_width::UnicodeWidthStr;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// globals and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Column headers of the per-file event table, the layout the metering
/// team's downstream tooling consumes.
pub const REPORT_COLUMNS: [&str; 5] = [
    "Timestamp",
    "Time Elapsed Since Meter Wakes Up",
    "Keyword",
    "Data in the Line Found",
    "Meaning",
];

/// Title line preceding the header-field block of the report.
pub const HEADER_SECTION_TITLE: &str = "Header Information:";

/// Column headers of the header-field block.
pub const HEADER_COLUMNS: [&str; 3] = ["Keyword", "Meaning", "Value"];

/// [`Color`] for printing prepended data like the file name.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_DEFAULT: Color = Color::White;

/// [`Color`] for printing some user-facing error markers.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_ERROR: Color = Color::Red;

/// A preselection of [`Color`s] for printing per-file reports.
/// Chosen for a dark background console.
///
/// [`Color`s]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLORS_TEXT: [Color; 12] = [
    Color::Yellow,
    Color::Cyan,
    Color::Green,
    Color::Magenta,
    Color::Rgb(153, 76, 0),
    Color::Rgb(153, 153, 0),
    Color::Rgb(0, 153, 153),
    Color::Rgb(127, 153, 153),
    Color::Rgb(127, 127, 230),
    Color::Rgb(127, 230, 127),
    Color::Rgb(230, 127, 127),
    Color::Rgb(230, 230, 127),
];

/// "Cached" indexing value for `color_rand`.
static _COLOR_AT: AtomicUsize = AtomicUsize::new(0);

/// Return the next color from [`COLORS_TEXT`].
pub fn color_rand() -> Color {
    let ci: usize = _COLOR_AT.fetch_add(1, Ordering::Relaxed) % COLORS_TEXT.len();

    COLORS_TEXT[ci]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// report rows
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One row per [`Event`] in original detection order, every cell already
/// a printable string; "unknown" markers in place, never numeric
/// placeholders.
///
/// [`Event`]: crate::data::event::Event
pub fn report_rows(result: &FileExtractionResult) -> Vec<[String; 5]> {
    result
        .events()
        .iter()
        .map(|event| {
            [
                timestamp_format(event.ts()),
                elapsed_format(event.elapsed()),
                String::from(event.keyword()),
                String::from(event.line()),
                String::from(event.meaning()),
            ]
        })
        .collect()
}

/// One row per configured header field: key, meaning, joined values.
pub fn header_rows(result: &FileExtractionResult) -> Vec<[String; 3]> {
    result
        .headers()
        .iter()
        .map(|field| {
            [
                String::from(field.key()),
                String::from(field.meaning()),
                field.values_joined(),
            ]
        })
        .collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CSV serialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Escape one CSV field, RFC 4180 quoting rules.
pub fn csv_escape(field: &str) -> String {
    if !field.contains([',', '"', '\n', '\r']) {
        return String::from(field);
    }
    let mut escaped = String::with_capacity(field.len() + 2);
    escaped.push('"');
    for c in field.chars() {
        if c == '"' {
            escaped.push('"');
        }
        escaped.push(c);
    }
    escaped.push('"');

    escaped
}

/// Serialize one CSV row, without the trailing newline.
pub fn csv_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|field| csv_escape(field.as_ref()))
        .collect::<Vec<String>>()
        .join(",")
}

/// Parse one CSV row serialized by [`csv_row`]; the inverse operation.
pub fn csv_row_parse(line: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    // an escaped quote
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => {
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => {
                field.push(c);
            }
        }
    }
    fields.push(field);

    fields
}

/// Write one file's report CSV: the header-field block, a blank
/// separator, then the event table.
pub fn write_report_csv(
    result: &FileExtractionResult,
    path: &FPath,
) -> Result<(), Error> {
    let file: File = File::create(fpath_to_path(path))?;
    let mut writer: BufWriter<File> = BufWriter::new(file);

    writeln!(writer, "{}", HEADER_SECTION_TITLE)?;
    writeln!(writer, "{}", csv_row(&HEADER_COLUMNS))?;
    for row in header_rows(result).iter() {
        writeln!(writer, "{}", csv_row(row))?;
    }
    writeln!(writer)?;
    writeln!(writer)?;
    writeln!(writer, "{}", csv_row(&REPORT_COLUMNS))?;
    for row in report_rows(result).iter() {
        writeln!(writer, "{}", csv_row(row))?;
    }
    writer.flush()?;

    Ok(())
}

/// Parse the event table back out of report CSV text serialized by
/// [`write_report_csv`]; the inverse operation, modulo formatting.
pub fn report_csv_parse(text: &str) -> Vec<[String; 5]> {
    let columns_row: String = csv_row(&REPORT_COLUMNS);
    let mut rows: Vec<[String; 5]> = Vec::new();
    let mut in_events = false;
    for line in text.lines() {
        if !in_events {
            if line == columns_row {
                in_events = true;
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }
        let fields = csv_row_parse(line);
        if fields.len() != REPORT_COLUMNS.len() {
            de_err!("expected {} fields in row, found {}; {:?}", REPORT_COLUMNS.len(), fields.len(), line);
            continue;
        }
        let mut row: [String; 5] = Default::default();
        for (at, field) in fields.into_iter().enumerate() {
            row[at] = field;
        }
        rows.push(row);
    }

    rows
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// timeline series
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One plottable point: elapsed seconds since the origin event, and the
/// keyword label for the categorical axis.
pub type TimelinePoint = (ElapsedSeconds, String);

/// All plottable points of one file, in detection order, on a single
/// relative-time axis.
pub type TimelineSeries = Vec<TimelinePoint>;

/// The plottable series of one file's result.
///
/// Events without a resolved elapsed time are excluded here; they remain
/// in the tabular report.
pub fn timeline_series(result: &FileExtractionResult) -> TimelineSeries {
    result
        .events()
        .iter()
        .filter_map(|event| {
            event
                .elapsed()
                .map(|elapsed| (elapsed, String::from(event.keyword())))
        })
        .collect()
}

/// Write the timeline series as a flat CSV for the plotting tool.
pub fn write_timeline_csv(
    series: &TimelineSeries,
    path: &FPath,
) -> Result<(), Error> {
    let file: File = File::create(fpath_to_path(path))?;
    let mut writer: BufWriter<File> = BufWriter::new(file);

    writeln!(writer, "{}", csv_row(&["Relative Time (s)", "Keyword"]))?;
    for (elapsed, keyword) in series.iter() {
        writeln!(writer, "{}", csv_row(&[format!("{:.3}", elapsed).as_str(), keyword.as_str()]))?;
    }
    writer.flush()?;

    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PrinterEvent
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A printer specialized for one file's report on the console.
///
/// Unknown markers print in [`COLOR_ERROR`] so a file with unresolved
/// timestamps is visually obvious; everything else prints in the
/// per-file color handed in by the caller (see [`color_rand`]).
pub struct PrinterEvent {
    /// termcolor handle to stdout
    stdout_color: StandardStream,
    /// should printing be in color?
    do_color: bool,
    /// color settings for plain text
    color_spec_default: ColorSpec,
    /// color settings for this file's text
    color_spec_text: ColorSpec,
    /// color settings for "unknown" markers
    color_spec_unknown: ColorSpec,
}

impl PrinterEvent {
    pub fn new(
        color_choice: ColorChoice,
        color_text: Color,
    ) -> PrinterEvent {
        let stdout_color = StandardStream::stdout(color_choice);
        let do_color: bool = !matches!(color_choice, ColorChoice::Never);
        let mut color_spec_default: ColorSpec = ColorSpec::new();
        color_spec_default.set_fg(Some(COLOR_DEFAULT));
        let mut color_spec_text: ColorSpec = ColorSpec::new();
        color_spec_text.set_fg(Some(color_text));
        let mut color_spec_unknown: ColorSpec = ColorSpec::new();
        color_spec_unknown.set_fg(Some(COLOR_ERROR));

        PrinterEvent {
            stdout_color,
            do_color,
            color_spec_default,
            color_spec_text,
            color_spec_unknown,
        }
    }

    fn set_color(
        self: &mut PrinterEvent,
        color_spec: &ColorSpec,
    ) -> Result<(), Error> {
        if !self.do_color {
            return Ok(());
        }

        self.stdout_color.set_color(color_spec)
    }

    /// Print one file's report: path line, header-field block, then the
    /// aligned event table.
    pub fn print_report(
        self: &mut PrinterEvent,
        result: &FileExtractionResult,
    ) -> Result<(), Error> {
        let rows: Vec<[String; 5]> = report_rows(result);
        // column widths of the three narrow columns; the raw line column
        // prints last, unpadded
        let mut width_ts: usize = REPORT_COLUMNS[0].width();
        let mut width_elapsed: usize = 0;
        let mut width_keyword: usize = 0;
        let mut width_meaning: usize = 0;
        for row in rows.iter() {
            width_ts = width_ts.max(row[0].width());
            width_elapsed = width_elapsed.max(row[1].width());
            width_keyword = width_keyword.max(row[2].width());
            width_meaning = width_meaning.max(row[4].width());
        }

        self.set_color(&self.color_spec_text.clone())?;
        writeln!(self.stdout_color, "{}:", result.path())?;

        self.set_color(&self.color_spec_default.clone())?;
        writeln!(self.stdout_color, "  {}", HEADER_SECTION_TITLE)?;
        for row in header_rows(result).iter() {
            writeln!(self.stdout_color, "    {} ({}): {}", row[0], row[1], row[2])?;
        }

        for (row, event) in rows.iter().zip(result.events().iter()) {
            let unknown_ts: bool = event.ts().is_none();
            let unknown_elapsed: bool = event.elapsed().is_none();
            write!(self.stdout_color, "  ")?;
            match unknown_ts {
                true => self.set_color(&self.color_spec_unknown.clone())?,
                false => self.set_color(&self.color_spec_text.clone())?,
            }
            write!(self.stdout_color, "{:<width$}  ", row[0], width = width_ts)?;
            match unknown_elapsed {
                true => self.set_color(&self.color_spec_unknown.clone())?,
                false => self.set_color(&self.color_spec_text.clone())?,
            }
            write!(self.stdout_color, "{:>width$}  ", row[1], width = width_elapsed)?;
            self.set_color(&self.color_spec_text.clone())?;
            write!(
                self.stdout_color,
                "{:<width_k$}  {:<width_m$}  ",
                row[2],
                row[4],
                width_k = width_keyword,
                width_m = width_meaning,
            )?;
            self.set_color(&self.color_spec_default.clone())?;
            writeln!(self.stdout_color, "|{}", row[3])?;
        }
        self.set_color(&self.color_spec_default.clone())?;
        self.stdout_color.flush()?;

        Ok(())
    }
}
