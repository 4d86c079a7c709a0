//! Book catalogue API trait

use async_trait::async_trait;

use crate::client::models::{Book, CreateBookRequest, UpdateBookRequest};
use crate::client::pagination::{Page, PageRequest};
use crate::error::Result;

/// Book operations for the Lexora API
#[async_trait]
pub trait BookApi: Send + Sync {
    /// Fetch one page of the catalogue
    async fn list_books(&self, request: &PageRequest) -> Result<Page<Book>>;

    /// Fetch a single book by ID
    async fn get_book(&self, id: i64) -> Result<Book>;

    /// Create a book (librarian only on the server side)
    async fn create_book(&self, request: &CreateBookRequest) -> Result<Book>;

    /// Update the given subset of a book's fields
    async fn update_book(&self, id: i64, request: &UpdateBookRequest) -> Result<Book>;

    /// Delete a book
    async fn delete_book(&self, id: i64) -> Result<()>;
}
