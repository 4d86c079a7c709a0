//! Display model implementations for table, pretty and JSON output

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::client::Page;
use crate::client::models::Book;
use crate::error::Result;
use crate::output::formatters::truncate_string;
use crate::output::table::{NO_BOOKS, format_table};
use crate::output::{Formattable, json};

const TITLE_WIDTH: usize = 40;
const AUTHOR_WIDTH: usize = 28;

/// Book display model for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct BookDisplay {
    #[tabled(rename = "ID")]
    pub id: i64,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "AUTHOR")]
    pub author: String,

    #[tabled(rename = "ISBN")]
    pub isbn: String,

    #[tabled(rename = "PUBLISHED")]
    pub published_date: String,
}

impl From<&Book> for BookDisplay {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: truncate_string(&book.title, TITLE_WIDTH),
            author: truncate_string(&book.author, AUTHOR_WIDTH),
            isbn: book.isbn.clone(),
            published_date: book.published_date.clone(),
        }
    }
}

/// One page of books as the list screens show it.
///
/// Carries the stale-data error alongside the page when the latest fetch
/// failed, and whether the viewer may add books (for the empty-state hint).
pub struct BookPageView<'a> {
    pub page: &'a Page<Book>,
    pub error: Option<&'a str>,
    pub can_manage: bool,
}

impl<'a> BookPageView<'a> {
    pub fn new(page: &'a Page<Book>) -> Self {
        Self {
            page,
            error: None,
            can_manage: false,
        }
    }

    pub fn with_error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn with_manage(mut self, can_manage: bool) -> Self {
        self.can_manage = can_manage;
        self
    }

    fn empty_state(&self) -> String {
        if self.can_manage {
            format!("{} Add one with {}", NO_BOOKS, "lexora book add".cyan())
        } else {
            NO_BOOKS.to_string()
        }
    }

    fn footer(&self) -> String {
        format!(
            "{} ({} books)",
            self.page.position_label(),
            self.page.total_elements
        )
    }

    fn format_pretty(&self) -> String {
        let mut lines = Vec::new();
        if let Some(error) = self.error {
            lines.push(format!("{} {}", "⚠".yellow(), error.yellow()));
        }

        if self.page.content.is_empty() {
            lines.push(self.empty_state());
            return lines.join("\n");
        }

        for book in &self.page.content {
            lines.push(format!(
                "{} {}",
                format!("#{:<5}", book.id).dimmed(),
                truncate_string(&book.title, TITLE_WIDTH).bold()
            ));
            lines.push(format!(
                "       {} · ISBN {} · {}",
                book.author, book.isbn, book.published_date
            ));
        }
        lines.push(String::new());
        lines.push(self.footer().dimmed().to_string());
        lines.join("\n")
    }

    fn format_table(&self) -> String {
        if self.page.content.is_empty() {
            return self.empty_state();
        }
        let rows: Vec<BookDisplay> = self.page.content.iter().map(BookDisplay::from).collect();
        format!("{}\n{}", format_table(&rows), self.footer())
    }
}

impl Formattable for BookPageView<'_> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok(self.format_pretty()),
            OutputFormat::Table => Ok(self.format_table()),
            OutputFormat::Json => Ok(json::format_json(self.page)?),
        }
    }
}

impl Formattable for Book {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok([
                self.title.bold().to_string(),
                format!("  ID:        {}", self.id),
                format!("  Author:    {}", self.author),
                format!("  ISBN:      {}", self.isbn),
                format!("  Published: {}", self.published_date),
            ]
            .join("\n")),
            OutputFormat::Table => Ok(vec![BookDisplay::from(self)].format(format)?),
            OutputFormat::Json => Ok(json::format_json(self)?),
        }
    }
}
