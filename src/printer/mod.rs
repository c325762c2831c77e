// src/printer/mod.rs

//! The `printer` module renders extraction results for users: the
//! per-file report (console and CSV), the timeline series handed to
//! plotting tools, and the cross-file summary table.

pub mod printers;
pub mod summary;
