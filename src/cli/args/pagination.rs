//! Pagination argument types for CLI commands

use clap::Args;

/// Page position for commands that work on one page of the book list.
///
/// Flatten this into any command that supports pagination:
/// ```ignore
/// List {
///     #[command(flatten)]
///     page: PageArgs,
/// }
/// ```
#[derive(Args, Debug, Default, Clone)]
pub struct PageArgs {
    /// Page number (0-indexed)
    #[arg(long, short = 'p', default_value_t = 0)]
    pub page: usize,

    /// Books per page (defaults to preferences.page_size)
    #[arg(long, short = 's')]
    pub size: Option<usize>,
}

impl PageArgs {
    /// Resolve the page size against the configured default.
    pub fn size_or(&self, default: usize) -> usize {
        self.size.unwrap_or(default)
    }
}
