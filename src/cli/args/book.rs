//! Book field arguments shared by `book add` and `book edit`

use clap::Args;

use crate::client::models::Book;
use crate::forms::BookForm;

/// Fields for a new book; all are required.
#[derive(Args, Debug, Clone)]
pub struct NewBookArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub author: String,

    /// ISBN-10 or ISBN-13, hyphens allowed
    #[arg(long)]
    pub isbn: String,

    /// Publication date (YYYY-MM-DD)
    #[arg(long = "published-date")]
    pub published_date: String,
}

impl From<NewBookArgs> for BookForm {
    fn from(args: NewBookArgs) -> Self {
        Self {
            title: args.title,
            author: args.author,
            isbn: args.isbn,
            published_date: args.published_date,
        }
    }
}

/// Fields to change on an existing book; omitted ones keep their value.
#[derive(Args, Debug, Clone, Default)]
pub struct BookChangeArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    /// ISBN-10 or ISBN-13, hyphens allowed
    #[arg(long)]
    pub isbn: Option<String>,

    /// Publication date (YYYY-MM-DD)
    #[arg(long = "published-date")]
    pub published_date: Option<String>,
}

impl BookChangeArgs {
    /// Prefill from `original` and overlay the given flags.
    pub fn to_form(&self, original: &Book) -> BookForm {
        let base = BookForm::from_book(original);
        BookForm {
            title: self.title.clone().unwrap_or(base.title),
            author: self.author.clone().unwrap_or(base.author),
            isbn: self.isbn.clone().unwrap_or(base.isbn),
            published_date: self.published_date.clone().unwrap_or(base.published_date),
        }
    }
}
