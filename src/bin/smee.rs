// src/bin/smee.rs

//! Driver program _smee_ drives the [_smeelib_].
//!
//! Processes user-passed command-line arguments and validates the
//! keyword configuration. Then processes paths passed; directories are
//! enumerated for parseable log files, other paths are tested for
//! suitability (readable? is it a file? etc.).
//!
//! For each parseable file found, a file processing thread is created.
//! Each file processing thread runs an [`EventReader`] over its file and
//! sends the finished [`FileExtractionResult`] and [`Summary`] back to
//! the main thread over a [sending channel]. Files are independent, so
//! thread completion order does not matter; the main thread collects
//! results keyed by `PathId` and prints them in argument order.
//!
//! Per-file failures (missing file, unreadable file) are demoted to a
//! warning and a skipped entry; they never abort the remaining files.
//! Configuration problems are fatal before any file is read.
//!
//! If passed CLI option `--summary`, the main processing thread prints a
//! [`Summary`] about each file processed, and one final
//! [`SummaryPrinted`].
//!
//! `smee.rs` should be the main thread and the only thread that prints
//! to STDOUT.
//!
//! [_smeelib_]: smeelib
//! [`EventReader`]: smeelib::readers::eventreader::EventReader
//! [`FileExtractionResult`]: smeelib::data::event::FileExtractionResult
//! [`Summary`]: smeelib::readers::summary::Summary
//! [sending channel]: self::ChanSendDatum
//! [`SummaryPrinted`]: smeelib::printer::summary::SummaryPrinted

#![allow(non_camel_case_types)]

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::sync::RwLock;
use std::thread;

use ::anyhow;
use ::clap::{Parser, ValueEnum};
use ::const_format::concatcp;
use ::crossbeam_channel;
use ::lazy_static::lazy_static;
use ::si_trace_print::stack::stack_offset_set;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ, deo};

use ::smeelib::common::{FPath, FPaths, FileType, PathId};
use ::smeelib::data::event::{FileExtractionResult, KeywordRule, KeywordRules};
use ::smeelib::data::header::{HeaderRule, HeaderRules};
use ::smeelib::debug::printers::{e_err, e_wrn};
use ::smeelib::printer::printers::{
    color_rand,
    timeline_series,
    write_report_csv,
    write_timeline_csv,
    Color,
    ColorChoice,
    PrinterEvent,
};
use ::smeelib::printer::summary::{
    print_summary,
    print_summary_table,
    summary_rows,
    write_summary_csv,
    SummaryPrinted,
    SummaryRows,
    SUMMARY_STATS_FILENAME,
};
use ::smeelib::readers::eventreader::{EventReader, LOOKBACK_DEFAULT};
use ::smeelib::readers::filepreprocessor::{process_path, ProcessPathResult, ProcessPathResults};
use ::smeelib::readers::helpers::{basename, basename_stem, path_to_fpath};
use ::smeelib::readers::summary::{Summary, SummaryEventReader};

// --------------------
// command-line parsing

/// general error exit value
const EXIT_ERR: u8 = 1;

/// The production meter keyword table; the default `--keyword` set.
/// Pattern, then the operational meaning of a match.
const KEYWORDS_DEFAULT: [(&str, &str); 11] = [
    ("cpu_start:", "Meter Wakes up"),
    ("get network status", "Attaches to GSM Network"),
    ("Signal quality", "RSSI measurement"),
    ("get_clientcert", "Authenticates to Server"),
    ("aws_Connect", "Opens Protocol (TCP or MQTT)"),
    ("coreMQTT", "Check for Job via MQTT ACK"),
    ("aws_Excute_Job", "Meter finishes executing command"),
    ("aws_Publish", "Send Telemetry Data"),
    ("aws_Disconnect", "Disconnection from Server"),
    ("pppos_disc", "Disconnection from GSM Network"),
    ("into low power!", "Deep Sleep"),
];

/// The default `--header-field` set.
const HEADER_FIELDS_DEFAULT: [(&str, &str); 5] = [
    ("g_meterId", "Meter ID"),
    ("g_stIccid.iccid_nu", "ICCID"),
    ("PCB Type", "PCB Type"),
    ("bat_monitor", "Battery Voltage"),
    ("get network status", "Net Status"),
];

/// The default `--origin` pattern; the meter wake event all elapsed
/// times are measured from.
const ORIGIN_DEFAULT: &str = "cpu_start:";

/// The header key whose first captured value names per-file artifacts.
const METER_ID_KEY: &str = "g_meterId";

/// Artifact-name stand-in when the meter id was never captured.
const METER_ID_FALLBACK: &str = "noid";

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.ColorChoice.html
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CLI_Color_Choice {
    always,
    auto,
    never,
}

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
Given a file path, the file is processed as a UTF8 text log.
Given a directory path, found file names with well-known log file name
extensions are processed; other file names are skipped (and accounted for
in the --summary output).

Keyword rules are PATTERN=MEANING pairs. Matching is case-insensitive
substring search unless --case-sensitive or --regex is passed. The
pattern given with --origin must be one of the configured keyword rules;
its first match with a resolved timestamp is the \"meter wake\" moment
all elapsed times are measured from. An event logged before the origin
has a negative elapsed time.

A matched line without a timestamp of its own borrows the nearest
timestamp within the preceding --lookback lines; past that window the
event is kept with \"unknown\" markers rather than dropped.

With --write-csv, each processed file produces
\"<name>_<meterid>_timestamps.csv\" (header fields plus the event table)
and \"<name>_<meterid>_timeline.csv\" (the series consumed by the
plotting tooling) beside the log file. A processed directory also
produces \"", SUMMARY_STATS_FILENAME, "\" there: per keyword, the maximum
elapsed time in each file.

---

Version: ", env!("CARGO_PKG_VERSION"), "
License: ", env!("CARGO_PKG_LICENSE"), "
",
);

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "smee",
    after_help = CLI_HELP_AFTER,
    version = concatcp!(
        "(Smart-Meter Event Extractor)\n",
        "Version: ", env!("CARGO_PKG_VERSION"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"),
    ),
)]
struct CLI_Args {
    /// Path(s) of log files or directories of log files.
    #[clap(required = true, verbatim_doc_comment)]
    paths: Vec<String>,

    /// Keyword rule as PATTERN=MEANING. May be passed multiple times.
    /// Passing any replaces the built-in meter keyword table.
    #[clap(short = 'k', long, value_parser = cli_parse_keyvalue)]
    keyword: Vec<(String, String)>,

    /// Header field as KEY=MEANING. May be passed multiple times.
    /// Passing any replaces the built-in header field table.
    /// Keys match case-sensitively, as exact substrings.
    #[clap(short = 'H', long = "header-field", value_parser = cli_parse_keyvalue)]
    header_field: Vec<(String, String)>,

    /// Pattern of the origin ("meter wake") keyword rule.
    #[clap(short = 'o', long, default_value = ORIGIN_DEFAULT)]
    origin: String,

    /// How many lines to look back for a timestamp when a matched line
    /// carries none.
    #[clap(short = 'b', long, default_value_t = LOOKBACK_DEFAULT)]
    lookback: usize,

    /// Match keyword patterns case-sensitively.
    #[clap(long)]
    case_sensitive: bool,

    /// Treat keyword patterns as regular expressions instead of literal
    /// substrings.
    #[clap(long)]
    regex: bool,

    /// Write the per-file report CSV and timeline CSV beside each log
    /// file, and the cross-file summary CSV into processed directories.
    #[clap(short = 'w', long = "write-csv")]
    write_csv: bool,

    /// Choose to print to terminal using colors.
    #[clap(
        short = 'c',
        long = "color",
        value_enum,
        default_value_t = CLI_Color_Choice::auto,
    )]
    color_choice: CLI_Color_Choice,

    /// Print a summary of processing statistics for each file.
    #[clap(short = 's', long)]
    summary: bool,
}

/// `clap` value parser for PATTERN=MEANING and KEY=MEANING arguments.
fn cli_parse_keyvalue(kv: &str) -> std::result::Result<(String, String), String> {
    match kv.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => {
            Ok((String::from(key), String::from(value)))
        }
        _ => Err(format!("expected PATTERN=MEANING, got {:?}", kv)),
    }
}

/// The validated, compiled configuration shared by every file
/// processing thread.
#[derive(Clone)]
struct Config {
    /// compiled keyword rules, in evaluation order
    rules: KeywordRules,
    /// index into `rules` of the origin rule
    origin_index: usize,
    /// look-back window in lines
    lookback: usize,
    /// header field rules
    header_rules: HeaderRules,
}

/// Compile and validate the keyword and header configuration.
///
/// Any problem here is a configuration error: fatal, before any file is
/// read.
fn config_build(args: &CLI_Args) -> std::result::Result<Config, String> {
    defn!();

    let keywords: Vec<(String, String)> = match args.keyword.is_empty() {
        true => KEYWORDS_DEFAULT
            .iter()
            .map(|(pattern, meaning)| (String::from(*pattern), String::from(*meaning)))
            .collect(),
        false => args.keyword.clone(),
    };
    if keywords.is_empty() {
        return Err(String::from("no keyword rules configured"));
    }
    let mut rules: KeywordRules = KeywordRules::with_capacity(keywords.len());
    for (pattern, meaning) in keywords.iter() {
        for rule in rules.iter() {
            if rule.pattern() == pattern.as_str() {
                return Err(format!("keyword rule {:?} configured twice", pattern));
            }
        }
        let rule = match KeywordRule::new(pattern, meaning, !args.regex, args.case_sensitive) {
            Ok(rule) => rule,
            Err(err) => {
                return Err(format!("bad keyword pattern {:?}; {}", pattern, err));
            }
        };
        rules.push(rule);
    }
    let origin_index: usize = match rules
        .iter()
        .position(|rule| rule.pattern() == args.origin)
    {
        Some(at) => at,
        None => {
            return Err(format!(
                "origin pattern {:?} is not a configured keyword rule",
                args.origin,
            ));
        }
    };

    let header_fields: Vec<(String, String)> = match args.header_field.is_empty() {
        true => HEADER_FIELDS_DEFAULT
            .iter()
            .map(|(key, meaning)| (String::from(*key), String::from(*meaning)))
            .collect(),
        false => args.header_field.clone(),
    };
    let mut header_rules: HeaderRules = HeaderRules::with_capacity(header_fields.len());
    for (key, meaning) in header_fields.iter() {
        for rule in header_rules.iter() {
            if rule.key() == key.as_str() {
                return Err(format!("header field {:?} configured twice", key));
            }
        }
        header_rules.push(HeaderRule::new(key, meaning));
    }
    defx!("{} keyword rules, origin_index {}, {} header rules", rules.len(), origin_index, header_rules.len());

    Ok(Config {
        rules,
        origin_index,
        lookback: args.lookback,
        header_rules,
    })
}

/// Process user-passed command-line arguments.
fn cli_process_args() -> std::result::Result<(FPaths, Config, ColorChoice, bool, bool), String> {
    let args = CLI_Args::parse();
    defo!("args {:?}", args);

    let config = config_build(&args)?;
    let color_choice: ColorChoice = match args.color_choice {
        CLI_Color_Choice::always => ColorChoice::Always,
        CLI_Color_Choice::auto => ColorChoice::Auto,
        CLI_Color_Choice::never => ColorChoice::Never,
    };

    Ok((args.paths, config, color_choice, args.write_csv, args.summary))
}

// --------------------
// processing threads

/// File processing threads send this to the main thread: the processed
/// `PathId`, the per-file [`Summary`], and the extraction result
/// (`None` when the file could not be read).
///
/// [`Summary`]: smeelib::readers::summary::Summary
struct ChanDatum {
    pathid: PathId,
    summary: Summary,
    result: Option<Box<FileExtractionResult>>,
}

type ChanSendDatum = crossbeam_channel::Sender<ChanDatum>;
type ChanRecvDatum = crossbeam_channel::Receiver<ChanDatum>;

/// Each file processing thread sends exactly one datum, so a small
/// bounded capacity is plenty; excess senders briefly block.
const CHANNEL_CAPACITY: usize = 5;

/// Process one file in its own thread: run the [`EventReader`], send the
/// result back.
///
/// A file that cannot be read sends a [`Summary::new_failed`]; the main
/// thread reports the skip and continues with the remaining files.
///
/// [`EventReader`]: smeelib::readers::eventreader::EventReader
/// [`Summary::new_failed`]: smeelib::readers::summary::Summary#method.new_failed
fn exec_fileprocessor_thread(
    chan_send_dt: ChanSendDatum,
    pathid: PathId,
    path: FPath,
    config: Config,
) {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(2));
    }
    defn!("({:?})", path);

    let mut eventreader: EventReader =
        match EventReader::new(path.clone(), config.rules, config.origin_index, config.lookback) {
            Ok(val) => val,
            Err(err) => {
                e_wrn!("skipping {:?}; {}", path, err);
                let summary = Summary::new_failed(path, FileType::Text, err.to_string());
                chan_send(&chan_send_dt, ChanDatum { pathid, summary, result: None });
                defx!("EventReader::new error");
                return;
            }
        };
    let result: FileExtractionResult = eventreader.process(&config.header_rules);
    let summary_er: SummaryEventReader = eventreader.summary();
    let summary = Summary::new(path, FileType::Text, summary_er, None);
    chan_send(
        &chan_send_dt,
        ChanDatum {
            pathid,
            summary,
            result: Some(Box::new(result)),
        },
    );
    defx!();
}

/// Wrapper to ignore a send failure; the main thread closed the channel
/// because it is exiting early.
fn chan_send(
    chan_send_dt: &ChanSendDatum,
    datum: ChanDatum,
) {
    match chan_send_dt.send(datum) {
        Ok(_) => {}
        Err(_err) => {
            defñ!("chan_send_dt.send failed {}", _err);
        }
    }
}

lazy_static! {
    /// flag to signal the main thread it should return ASAP.
    /// Set by the `ctrlc::set_handler` signal handler.
    static ref EXIT_EARLY: RwLock<bool> = RwLock::new(false);
}

/// set a process signal handler
fn set_signal_handler() -> anyhow::Result<(), ctrlc::Error> {
    defñ!();

    ctrlc::set_handler(move || {
        if let Ok(mut exit_early) = EXIT_EARLY.write() {
            *exit_early = true;
        }
    })
}

fn exit_early() -> bool {
    match EXIT_EARLY.read() {
        Ok(val) => *val,
        Err(_) => false,
    }
}

// --------------------
// output helpers

/// Derive the per-file artifact paths, beside the log file:
/// `(<dir>/<stem>_<meterid>_timestamps.csv,
///   <dir>/<stem>_<meterid>_timeline.csv)`.
fn artifact_fpaths(result: &FileExtractionResult) -> (FPath, FPath) {
    let meterid: String = match result.header_value_first(METER_ID_KEY) {
        // the captured remainder may start with ": "
        Some(value) => {
            let cleaned: String = value
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect();
            match cleaned.is_empty() {
                true => String::from(METER_ID_FALLBACK),
                false => cleaned,
            }
        }
        None => String::from(METER_ID_FALLBACK),
    };
    let stem: FPath = basename_stem(result.path());
    let parent: &std::path::Path = std::path::Path::new(result.path().as_str())
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."));
    let report = path_to_fpath(&parent.join(format!("{}_{}_timestamps.csv", stem, meterid)));
    let timeline = path_to_fpath(&parent.join(format!("{}_{}_timeline.csv", stem, meterid)));

    (report, timeline)
}

// --------------------
// main processing loop

/// The main processing loop:
///
/// 1. classifies user-passed paths, warning about the invalid
/// 2. creates a thread to process each valid file
/// 3. collects each thread's result, keyed by `PathId`
/// 4. prints each per-file report in argument order (and writes the CSV
///    artifacts when requested)
/// 5. prints the cross-file summary table (and writes `SummaryStats.csv`
///    into processed directories when requested)
/// 6. prints each [`Summary`] (if CLI option `--summary`)
///
/// Returns `true` when everything requested was processed without error.
///
/// [`Summary`]: smeelib::readers::summary::Summary
fn processing_loop(
    paths: &FPaths,
    config: Config,
    color_choice: ColorChoice,
    write_csv: bool,
    cli_opt_summary: bool,
) -> bool {
    defn!("(paths {:?})", paths);

    let mut ret: bool = true;

    // classify every user-passed path; directories enumerate their files
    let mut map_pathid_path: BTreeMap<PathId, FPath> = BTreeMap::new();
    let mut paths_invalid_results: ProcessPathResults = ProcessPathResults::new();
    // directories passed by the user, for `SummaryStats.csv` placement
    let mut paths_dirs: FPaths = FPaths::new();
    let mut pathid_counter: PathId = 0;
    for path in paths.iter() {
        if std::path::Path::new(path.as_str()).is_dir() {
            paths_dirs.push(path.clone());
        }
        for processpathresult in process_path(path).into_iter() {
            match processpathresult {
                ProcessPathResult::FileValid(fpath, _filetype) => {
                    defo!("map_pathid_path.insert({}, {:?})", pathid_counter, fpath);
                    map_pathid_path.insert(pathid_counter, fpath);
                }
                result => {
                    defo!("invalid {:?}", result);
                    e_wrn!("not a processable file {:?}", result.path());
                    paths_invalid_results.push(result);
                    ret = false;
                }
            }
            pathid_counter += 1;
        }
    }
    if map_pathid_path.is_empty() {
        e_err!("no files to process");
        defx!("no files; return false");
        return false;
    }

    // create a thread per file
    let (chan_send_dt, chan_recv_dt): (ChanSendDatum, ChanRecvDatum) =
        crossbeam_channel::bounded(CHANNEL_CAPACITY);
    let mut spawned: usize = 0;
    let mut handles: Vec<thread::JoinHandle<()>> = Vec::with_capacity(map_pathid_path.len());
    for (pathid, path) in map_pathid_path.iter() {
        let chan_send_dt_clone = chan_send_dt.clone();
        let pathid_ = *pathid;
        let path_ = path.clone();
        let config_ = config.clone();
        let basename_: FPath = basename(path);
        match thread::Builder::new()
            .name(basename_)
            .spawn(move || exec_fileprocessor_thread(chan_send_dt_clone, pathid_, path_, config_))
        {
            Ok(handle) => {
                spawned += 1;
                handles.push(handle);
            }
            Err(err) => {
                e_err!("thread::Builder.spawn failed for {:?}; {}", path, err);
                ret = false;
            }
        }
    }
    // drop the original sender so the channel closes when threads finish
    drop(chan_send_dt);

    // collect results; completion order does not matter, the maps are
    // keyed by `PathId` so output order is deterministic
    let mut map_pathid_result: BTreeMap<PathId, Box<FileExtractionResult>> = BTreeMap::new();
    let mut map_pathid_summary: BTreeMap<PathId, Summary> = BTreeMap::new();
    let mut received: usize = 0;
    while received < spawned {
        if exit_early() {
            defo!("EXIT_EARLY set");
            ret = false;
            break;
        }
        match chan_recv_dt.recv_timeout(std::time::Duration::from_millis(100)) {
            Ok(datum) => {
                received += 1;
                defo!("received PathId {}", datum.pathid);
                if let Some(result) = datum.result {
                    map_pathid_result.insert(datum.pathid, result);
                } else {
                    ret = false;
                }
                map_pathid_summary.insert(datum.pathid, datum.summary);
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                defo!("chan_recv_dt disconnected");
                break;
            }
        }
    }
    // close the channel; a thread blocked on `send` gets an error it
    // ignores, so joining cannot deadlock after an early exit
    drop(chan_recv_dt);
    for handle in handles.into_iter() {
        match handle.join() {
            Ok(_) => {}
            Err(_err) => {
                e_err!("a file processing thread panicked");
                ret = false;
            }
        }
    }

    // print each per-file report, write the per-file artifacts
    for (_pathid, result) in map_pathid_result.iter() {
        let color_text: Color = color_rand();
        let mut printer = PrinterEvent::new(color_choice, color_text);
        match printer.print_report(result) {
            Ok(_) => {}
            Err(err) => {
                // a broken pipe is normal (e.g. piping to `head`)
                defo!("print_report error {}", err);
                break;
            }
        }
        if write_csv {
            let (fpath_report, fpath_timeline) = artifact_fpaths(result);
            match write_report_csv(result, &fpath_report) {
                Ok(_) => {
                    eprintln!("Data saved to {:?}", fpath_report);
                }
                Err(err) => {
                    e_wrn!("failed to write {:?}; {}", fpath_report, err);
                    ret = false;
                }
            }
            let series = timeline_series(result);
            match write_timeline_csv(&series, &fpath_timeline) {
                Ok(_) => {
                    eprintln!("Timeline saved to {:?}", fpath_timeline);
                }
                Err(err) => {
                    e_wrn!("failed to write {:?}; {}", fpath_timeline, err);
                    ret = false;
                }
            }
        }
    }

    // the cross-file summary table
    if map_pathid_result.len() > 1 || !paths_dirs.is_empty() {
        let results: Vec<&FileExtractionResult> = map_pathid_result
            .values()
            .map(|result| result.as_ref())
            .collect();
        let file_labels: FPaths = map_pathid_result
            .values()
            .map(|result| basename(result.path()))
            .collect();
        let rows: SummaryRows = summary_rows(&config.rules, &results);
        println!();
        match print_summary_table(&rows, &file_labels) {
            Ok(_) => {}
            Err(_err) => {
                defo!("print_summary_table error {}", _err);
            }
        }
        if write_csv {
            for dir in paths_dirs.iter() {
                let fpath_summary: FPath =
                    path_to_fpath(&std::path::Path::new(dir.as_str()).join(SUMMARY_STATS_FILENAME));
                match write_summary_csv(&rows, &file_labels, &fpath_summary) {
                    Ok(_) => {
                        eprintln!("Summary saved to {:?}", fpath_summary);
                    }
                    Err(err) => {
                        e_wrn!("failed to write {:?}; {}", fpath_summary, err);
                        ret = false;
                    }
                }
            }
        }
    }

    // `--summary`
    if cli_opt_summary {
        println!();
        let mut summaryprinted = SummaryPrinted::default();
        for (_pathid, summary) in map_pathid_summary.iter() {
            print_summary(summary);
            summaryprinted.summary_update(summary);
        }
        for invalid in paths_invalid_results.iter() {
            println!("File: {:?} (not processed)", invalid.path());
        }
        println!();
        summaryprinted.print();
    }
    defx!("return {}", ret);

    ret
}

// ----
// main

pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();

    let (paths, config, color_choice, write_csv, cli_opt_summary) = match cli_process_args() {
        Ok(val) => val,
        Err(err) => {
            e_err!("{}", err);
            defx!("configuration error");
            return ExitCode::from(EXIT_ERR);
        }
    };

    match set_signal_handler() {
        Ok(_) => {}
        Err(err) => {
            e_err!("set_signal_handler failed; {}", err);
            return ExitCode::from(EXIT_ERR);
        }
    }

    let ret: bool = processing_loop(&paths, config, color_choice, write_csv, cli_opt_summary);

    let exitcode = if ret { ExitCode::SUCCESS } else { ExitCode::from(EXIT_ERR) };
    defx!("exitcode {:?}", exitcode);

    exitcode
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    use ::clap::Parser;
    use ::test_case::test_case;

    #[test_case("cpu_start:=Meter Wakes up", Some(("cpu_start:", "Meter Wakes up")); "plain")]
    #[test_case("a=b", Some(("a", "b")); "minimal")]
    #[test_case("a=b=c", Some(("a", "b=c")); "second equals kept")]
    #[test_case("nopattern", None; "missing equals")]
    #[test_case("=meaning", None; "empty key")]
    #[test_case("key=", None; "empty value")]
    fn test_cli_parse_keyvalue(
        input: &str,
        expect: Option<(&str, &str)>,
    ) {
        let result = cli_parse_keyvalue(input);
        match expect {
            Some((key, value)) => {
                assert_eq!(result, Ok((String::from(key), String::from(value))));
            }
            None => {
                assert!(result.is_err(), "expected error for {:?}, got {:?}", input, result);
            }
        }
    }

    fn args_from(argv: &[&str]) -> CLI_Args {
        CLI_Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_config_build_defaults() {
        let args = args_from(&["smee", "log.txt"]);
        let config = config_build(&args).unwrap();
        assert_eq!(config.rules.len(), KEYWORDS_DEFAULT.len());
        assert_eq!(config.rules[config.origin_index].pattern(), ORIGIN_DEFAULT);
        assert_eq!(config.lookback, LOOKBACK_DEFAULT);
        assert_eq!(config.header_rules.len(), HEADER_FIELDS_DEFAULT.len());
    }

    #[test]
    fn test_config_build_origin_not_a_rule() {
        let args = args_from(&["smee", "log.txt", "--origin", "no_such_rule"]);
        assert!(config_build(&args).is_err());
    }

    #[test]
    fn test_config_build_duplicate_keyword() {
        let args = args_from(&["smee", "log.txt", "-k", "boot=A", "-k", "boot=B", "--origin", "boot"]);
        assert!(config_build(&args).is_err());
    }

    #[test]
    fn test_config_build_duplicate_header_field() {
        let args = args_from(&["smee", "log.txt", "-H", "g_meterId=A", "-H", "g_meterId=B"]);
        assert!(config_build(&args).is_err());
    }

    #[test]
    fn test_config_build_bad_regex() {
        let args = args_from(&["smee", "log.txt", "--regex", "-k", "boot(=A", "--origin", "boot("]);
        assert!(config_build(&args).is_err());
    }

    #[test]
    fn test_config_build_user_keywords_replace_defaults() {
        let args = args_from(&["smee", "log.txt", "-k", "boot=Boot", "--origin", "boot"]);
        let config = config_build(&args).unwrap();
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.origin_index, 0);
    }

    fn create_temp_log(content: &[u8]) -> (::tempfile::NamedTempFile, FPath) {
        let mut ntf = ::tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut ntf, content).unwrap();
        let path: FPath = ntf.path().to_string_lossy().to_string();

        (ntf, path)
    }

    #[test]
    fn test_fileprocessor_thread_skip_and_continue() {
        let (chan_send, chan_recv): (ChanSendDatum, ChanRecvDatum) = crossbeam_channel::unbounded();
        let config = config_build(&args_from(&["smee", "unused"])).unwrap();

        // one missing file, one good file; the bad file is demoted to a
        // reported skip, the good file still processes
        exec_fileprocessor_thread(
            chan_send.clone(),
            0,
            FPath::from("/no/such/meter_log.txt"),
            config.clone(),
        );
        let (_ntf, path) = create_temp_log(b"[10:00:00.000] cpu_start: boot\n");
        exec_fileprocessor_thread(chan_send, 1, path, config);

        let datum0 = chan_recv.recv().unwrap();
        assert_eq!(datum0.pathid, 0);
        assert!(datum0.result.is_none());
        assert!(datum0.summary.error.is_some());

        let datum1 = chan_recv.recv().unwrap();
        assert_eq!(datum1.pathid, 1);
        let result = datum1.result.unwrap();
        assert_eq!(result.count_events(), 1);
        assert!(datum1.summary.error.is_none());
    }

    #[test]
    fn test_artifact_fpaths_naming() {
        let (_ntf, path) = create_temp_log(
            b"[10:00:00.000] g_meterId : 9000231\n[10:00:00.100] cpu_start: boot\n",
        );
        let config = config_build(&args_from(&["smee", "unused"])).unwrap();
        let mut eventreader = EventReader::new(
            path.clone(),
            config.rules.clone(),
            config.origin_index,
            config.lookback,
        )
        .unwrap();
        let result = eventreader.process(&config.header_rules);

        let (fpath_report, fpath_timeline) = artifact_fpaths(&result);
        let stem = basename_stem(&path);
        assert!(fpath_report.ends_with(&format!("{}_9000231_timestamps.csv", stem)));
        assert!(fpath_timeline.ends_with(&format!("{}_9000231_timeline.csv", stem)));
    }

    #[test]
    fn test_artifact_fpaths_meterid_fallback() {
        let (_ntf, path) = create_temp_log(b"[10:00:00.100] cpu_start: boot\n");
        let config = config_build(&args_from(&["smee", "unused"])).unwrap();
        let mut eventreader = EventReader::new(
            path.clone(),
            config.rules.clone(),
            config.origin_index,
            config.lookback,
        )
        .unwrap();
        let result = eventreader.process(&config.header_rules);

        let (fpath_report, _fpath_timeline) = artifact_fpaths(&result);
        assert!(fpath_report.ends_with(&format!("{}_{}_timestamps.csv", basename_stem(&path), METER_ID_FALLBACK)));
    }
}
