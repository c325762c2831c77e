// src/readers/mod.rs

//! The `readers` module is the machinery that loads a log source and
//! extracts events and header fields from it.
//!
//! Not every module here is a "Reader" but the word fits the overall
//! theme: given a path, produce structured data.

pub mod eventreader;
pub mod filepreprocessor;
pub mod headerreader;
pub mod helpers;
pub mod linereader;
pub mod summary;
