// src/readers/filepreprocessor.rs

//! A collection of functions to search for potentially parseable log
//! files, and classify paths before an [`EventReader`] instance is
//! created for them.
//!
//! [`EventReader`]: crate::readers::eventreader::EventReader

use crate::common::{FPath, FileType, Path};
use crate::readers::helpers::path_to_fpath;

use std::ffi::OsStr;
use std::io::ErrorKind;

use ::lazy_static::lazy_static;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::walkdir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FilePreProcessor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Initial path processing return type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProcessPathResult {
    /// File can be processed by `smee`
    FileValid(FPath, FileType),
    /// Filesystem permissions do not allow reading the file
    FileErrNoPermissions(FPath),
    /// File is a known or unknown type that is not supported
    FileErrNotSupported(FPath),
    /// Path exists and is not a file
    FileErrNotAFile(FPath),
    /// Path does not exist
    FileErrNotExist(FPath),
}

pub type ProcessPathResults = Vec<ProcessPathResult>;

impl ProcessPathResult {
    pub fn path(&self) -> &FPath {
        match self {
            ProcessPathResult::FileValid(fpath, _) => fpath,
            ProcessPathResult::FileErrNoPermissions(fpath) => fpath,
            ProcessPathResult::FileErrNotSupported(fpath) => fpath,
            ProcessPathResult::FileErrNotAFile(fpath) => fpath,
            ProcessPathResult::FileErrNotExist(fpath) => fpath,
        }
    }
}

lazy_static! {
    /// file extensions of parseable meter logs
    static ref PARSEABLE_EXTENSIONS: Vec<&'static OsStr> = {
        #[allow(clippy::vec_init_then_push)]
        let v: Vec<&'static OsStr> = vec![
            OsStr::new("txt"),
            OsStr::new("TXT"),
            OsStr::new("log"),
            OsStr::new("LOG"),
            OsStr::new("out"),
        ];
        v
    };
    /// files without file extensions known to be parseable
    static ref PARSEABLE_FILENAMES_FILE: Vec<&'static OsStr> = {
        #[allow(clippy::vec_init_then_push)]
        let v: Vec<&'static OsStr> = vec![
            OsStr::new("console"),
            OsStr::new("CONSOLE"),
            OsStr::new("uart"),
            OsStr::new("uart0"),
            OsStr::new("minicom.cap"),
        ];
        v
    };
}

/// Classify a file path by its name.
///
/// Only called for entries found during directory enumeration; an
/// explicitly-passed file path is always attempted as text (the user
/// asked for it by name).
pub(crate) fn path_to_filetype(path: &Path) -> FileType {
    defn!("({:?})", path);

    let file_name: &OsStr = path.file_name().unwrap_or_default();
    if PARSEABLE_FILENAMES_FILE.contains(&file_name) {
        defx!("known parseable file name; return FileType::Text");
        return FileType::Text;
    }
    match path.extension() {
        Some(ext) if PARSEABLE_EXTENSIONS.contains(&ext) => {
            defx!("return FileType::Text");

            FileType::Text
        }
        _ => {
            defx!("return FileType::Unparsable");

            FileType::Unparsable
        }
    }
}

/// Return all parseable files at or under the passed `path`.
///
/// A file path returns one entry. A directory path is enumerated
/// (non-recursively) for eligible text logs; other entries are returned
/// as `FileErrNotSupported` so the summary can account for them.
/// Entries are returned in lexicographic name order so multi-file output
/// is deterministic.
pub fn process_path(path: &FPath) -> ProcessPathResults {
    defn!("({:?})", path);

    let std_path: &Path = Path::new(path);
    let metadata = match std::fs::metadata(std_path) {
        Ok(val) => val,
        Err(err) => {
            let result = match err.kind() {
                ErrorKind::NotFound => ProcessPathResult::FileErrNotExist(path.clone()),
                ErrorKind::PermissionDenied => ProcessPathResult::FileErrNoPermissions(path.clone()),
                _ => ProcessPathResult::FileErrNotExist(path.clone()),
            };
            defx!("return [{:?}]", result);
            return vec![result];
        }
    };

    if metadata.is_file() {
        // an explicitly-passed file is always attempted as text
        defx!("is_file; return [FileValid({:?}, Text)]", path);
        return vec![ProcessPathResult::FileValid(path.clone(), FileType::Text)];
    }
    if !metadata.is_dir() {
        defx!("not a file, not a directory; return [FileErrNotAFile({:?})]", path);
        return vec![ProcessPathResult::FileErrNotAFile(path.clone())];
    }

    // the directory itself is not processed, only the files within
    let mut results = ProcessPathResults::new();
    for entry in walkdir::WalkDir::new(std_path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|result| result.ok())
    {
        if !entry.file_type().is_file() {
            defo!("skip non-file entry {:?}", entry.path());
            continue;
        }
        let fpath: FPath = path_to_fpath(entry.path());
        match path_to_filetype(entry.path()) {
            FileType::Text => {
                defo!("push FileValid({:?}, Text)", fpath);
                results.push(ProcessPathResult::FileValid(fpath, FileType::Text));
            }
            FileType::Unparsable | FileType::Unset => {
                defo!("push FileErrNotSupported({:?})", fpath);
                results.push(ProcessPathResult::FileErrNotSupported(fpath));
            }
        }
    }
    defx!("return {} results", results.len());

    results
}
