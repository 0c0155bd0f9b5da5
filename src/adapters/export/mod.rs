//! Export adapters. Vote matrix to delimited text.

pub mod csv_export;

pub use csv_export::{export_csv, option_label, participant_count_label, suggested_file_name};
