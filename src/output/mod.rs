// src/output/mod.rs

pub mod csv;
pub mod json;

pub use self::csv::{render_csv, write_csv};
pub use self::json::{read_json, write_json};

/// Default file names, written to the working directory.
pub const DEFAULT_JSON_FILE: &str = "fifa_data.json";
pub const DEFAULT_CSV_FILE: &str = "fifa_data.csv";
