//! Output module
//!
//! Turns fetched records into something to read or load elsewhere.
//!
//! # Overview
//!
//! - Flattening nested records into dotted columns (`normalize_record`)
//! - Collecting rows under a shared column list (`Table`)
//! - Writing JSON lines, tab-separated text, or Parquet files

mod table;
mod writer;

pub use table::{normalize_record, render_cell, Table, COLUMN_SEPARATOR, SCALAR_COLUMN};
pub use writer::{
    open_output, table_to_batch, write_json_lines, write_parquet, write_pretty,
};
