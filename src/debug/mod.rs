// src/debug/mod.rs

//! The `debug` module is functions and macros for printing errors and
//! warnings to the user, and extra printing in debug builds and
//! test builds.

pub mod printers;
