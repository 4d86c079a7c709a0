//! Book add/edit form

use chrono::NaiveDate;

use crate::client::models::{Book, CreateBookRequest, UpdateBookRequest};
use crate::error::ValidationError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Draft of a book record as typed by the user.
///
/// Values are kept raw; [`BookForm::validate`] trims and checks them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_date: String,
}

impl BookForm {
    /// Prefill the form with an existing record, as the edit dialog does.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            published_date: book.published_date.clone(),
        }
    }

    /// Check the draft and produce the trimmed create body.
    ///
    /// Errors come back one at a time in field order, title first.
    pub fn validate(&self) -> Result<CreateBookRequest, ValidationError> {
        let title = self.title.trim();
        let author = self.author.trim();
        let isbn = self.isbn.trim();

        for (field, value) in [("title", title), ("author", author), ("isbn", isbn)] {
            if value.is_empty() {
                return Err(ValidationError::MissingBookField(field));
            }
        }

        if !is_valid_isbn(isbn) {
            return Err(ValidationError::InvalidIsbn);
        }

        let published_date = self.published_date.trim();
        if published_date.is_empty() {
            return Err(ValidationError::MissingPublishedDate);
        }
        if NaiveDate::parse_from_str(published_date, DATE_FORMAT).is_err() {
            return Err(ValidationError::InvalidPublishedDate);
        }

        Ok(CreateBookRequest {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            published_date: published_date.to_string(),
        })
    }

    /// Validate, then keep only the fields that differ from `original`.
    pub fn diff_against(&self, original: &Book) -> Result<UpdateBookRequest, ValidationError> {
        let draft = self.validate()?;

        fn changed(new: String, old: &str) -> Option<String> {
            (new != old).then_some(new)
        }

        Ok(UpdateBookRequest {
            title: changed(draft.title, &original.title),
            author: changed(draft.author, &original.author),
            isbn: changed(draft.isbn, &original.isbn),
            published_date: changed(draft.published_date, &original.published_date),
        })
    }
}

/// Digits and hyphens only, with exactly 10 or 13 digits.
pub fn is_valid_isbn(isbn: &str) -> bool {
    if isbn.is_empty() || !isbn.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return false;
    }
    let digits = isbn.chars().filter(char::is_ascii_digit).count();
    digits == 10 || digits == 13
}
