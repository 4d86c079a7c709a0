//! Shared CLI argument types
//!
//! This module contains reusable argument structs that can be flattened
//! into commands using `#[command(flatten)]`.

mod book;
mod common;
mod global;
mod pagination;

pub use book::{BookChangeArgs, NewBookArgs};
pub use common::OutputFormat;
pub use global::GlobalOptions;
pub use pagination::PageArgs;
