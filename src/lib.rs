// spantable - piece table text buffer
//
// Licensed under MIT License

pub mod config;
pub mod core;
pub mod error;

pub use crate::config::TableConfig;
pub use crate::core::buffer::{Chunks, PieceTable, Snapshot, Span, Source};
pub use crate::error::{ConfigError, PieceTableError, Result};
