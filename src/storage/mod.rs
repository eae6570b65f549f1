//! Persistence helpers
//!
//! msgcrypt stores a single JSON settings file; see [`file_io`].

pub mod file_io;

pub use file_io::{read_json, write_json_atomic};
