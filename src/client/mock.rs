//! Mock Lexora API client for testing
//!
//! Keeps an in-memory catalogue and serves real pages out of it, so the
//! controller's refetch decisions can be checked against captured requests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::api::{AuthApi, BookApi};
use super::models::{
    Book, CreateBookRequest, JwtResponse, MessageResponse, SigninRequest, SignupRequest,
    UpdateBookRequest,
};
use super::pagination::{Page, PageRequest};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// # Example
/// ```ignore
/// let mock = MockLibraryClient::new().with_books(sample_books(25)).await;
/// let page = mock.list_books(&PageRequest::new(2, 10)).await?;
/// assert_eq!(page.content.len(), 5);
/// ```
#[derive(Default)]
pub struct MockLibraryClient {
    /// Catalogue served by list/get and mutated by create/update/delete
    books: Arc<Mutex<Vec<Book>>>,
    /// Response for sign_in
    jwt: Arc<Mutex<Option<JwtResponse>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured requests for test assertions
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub sign_in: usize,
    pub sign_up: usize,
    pub list_books: usize,
    pub get_book: usize,
    pub create_book: usize,
    pub update_book: usize,
    pub delete_book: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.sign_in
            + self.sign_up
            + self.list_books
            + self.get_book
            + self.create_book
            + self.update_book
            + self.delete_book
    }
}

/// A captured API request for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum CapturedRequest {
    ListBooks(PageRequest),
    GetBook(i64),
    CreateBook(CreateBookRequest),
    UpdateBook(i64, UpdateBookRequest),
    DeleteBook(i64),
}

/// Books titled `Book 01`, `Book 02`, ... with ids starting at 1
pub fn sample_books(count: usize) -> Vec<Book> {
    (1..=count)
        .map(|n| Book {
            id: n as i64,
            title: format!("Book {:02}", n),
            author: format!("Author {}", n),
            isbn: format!("978000000{:04}", n),
            published_date: "2001-01-01".to_string(),
        })
        .collect()
}

impl MockLibraryClient {
    /// Create a new mock client with an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the catalogue.
    pub async fn with_books(self, books: Vec<Book>) -> Self {
        *self.books.lock().await = books;
        self
    }

    /// Configure the sign-in response.
    pub async fn with_jwt(self, jwt: JwtResponse) -> Self {
        *self.jwt.lock().await = Some(jwt);
        self
    }

    /// Make the next call fail with `error`.
    pub async fn fail_next(&self, error: ApiError) {
        *self.error.lock().await = Some(error);
    }

    /// Get call counts for verification.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get all captured requests.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().await.clone()
    }

    /// The most recent list request, if any.
    pub async fn last_list_request(&self) -> Option<PageRequest> {
        self.captured_requests
            .lock()
            .await
            .iter()
            .rev()
            .find_map(|r| match r {
                CapturedRequest::ListBooks(req) => Some(req.clone()),
                _ => None,
            })
    }

    /// Snapshot of the catalogue.
    pub async fn books(&self) -> Vec<Book> {
        self.books.lock().await.clone()
    }

    async fn capture(&self, request: CapturedRequest) {
        self.captured_requests.lock().await.push(request);
    }

    async fn check_error(&self) -> Result<()> {
        if let Some(err) = self.error.lock().await.take() {
            return Err(err.into());
        }
        Ok(())
    }

    fn not_found(id: i64) -> ApiError {
        ApiError::NotFound(Some(format!("Book not found with id: {}", id)))
    }
}

#[async_trait]
impl AuthApi for MockLibraryClient {
    async fn sign_in(&self, _request: &SigninRequest) -> Result<JwtResponse> {
        self.call_count.lock().await.sign_in += 1;
        self.check_error().await?;

        self.jwt
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::Unauthorized(Some("Bad credentials".to_string())).into())
    }

    async fn sign_up(&self, _request: &SignupRequest) -> Result<MessageResponse> {
        self.call_count.lock().await.sign_up += 1;
        self.check_error().await?;

        Ok(MessageResponse {
            message: "User registered successfully!".to_string(),
        })
    }
}

#[async_trait]
impl BookApi for MockLibraryClient {
    async fn list_books(&self, request: &PageRequest) -> Result<Page<Book>> {
        self.capture(CapturedRequest::ListBooks(request.clone())).await;
        self.call_count.lock().await.list_books += 1;
        self.check_error().await?;

        let books = self.books.lock().await;
        let content: Vec<Book> = books
            .iter()
            .skip(request.page * request.size)
            .take(request.size)
            .cloned()
            .collect();

        Ok(Page::new(
            content,
            request.page,
            request.size,
            books.len() as u64,
        ))
    }

    async fn get_book(&self, id: i64) -> Result<Book> {
        self.capture(CapturedRequest::GetBook(id)).await;
        self.call_count.lock().await.get_book += 1;
        self.check_error().await?;

        self.books
            .lock()
            .await
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id).into())
    }

    async fn create_book(&self, request: &CreateBookRequest) -> Result<Book> {
        self.capture(CapturedRequest::CreateBook(request.clone())).await;
        self.call_count.lock().await.create_book += 1;
        self.check_error().await?;

        let mut books = self.books.lock().await;
        let book = Book {
            id: books.iter().map(|b| b.id).max().unwrap_or(0) + 1,
            title: request.title.clone(),
            author: request.author.clone(),
            isbn: request.isbn.clone(),
            published_date: request.published_date.clone(),
        };
        books.push(book.clone());
        Ok(book)
    }

    async fn update_book(&self, id: i64, request: &UpdateBookRequest) -> Result<Book> {
        self.capture(CapturedRequest::UpdateBook(id, request.clone()))
            .await;
        self.call_count.lock().await.update_book += 1;
        self.check_error().await?;

        let mut books = self.books.lock().await;
        let book = books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        request.apply_to(book);
        Ok(book.clone())
    }

    async fn delete_book(&self, id: i64) -> Result<()> {
        self.capture(CapturedRequest::DeleteBook(id)).await;
        self.call_count.lock().await.delete_book += 1;
        self.check_error().await?;

        let mut books = self.books.lock().await;
        let before = books.len();
        books.retain(|b| b.id != id);
        if books.len() == before {
            return Err(Self::not_found(id).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_pages() {
        let mock = MockLibraryClient::new().with_books(sample_books(25)).await;

        let page = mock.list_books(&PageRequest::new(2, 10)).await.unwrap();
        assert_eq!(page.content.len(), 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.last);
        assert_eq!(page.content[0].title, "Book 21");
    }

    #[tokio::test]
    async fn test_mock_error_consumed_once() {
        let mock = MockLibraryClient::new().with_books(sample_books(1)).await;
        mock.fail_next(ApiError::ServerError(Some("boom".to_string())))
            .await;

        assert!(mock.get_book(1).await.is_err());
        assert!(mock.get_book(1).await.is_ok());
        assert_eq!(mock.call_counts().await.get_book, 2);
    }

    #[tokio::test]
    async fn test_mock_crud() {
        let mock = MockLibraryClient::new().with_books(sample_books(2)).await;

        let created = mock
            .create_book(&CreateBookRequest {
                title: "New".to_string(),
                author: "Someone".to_string(),
                isbn: "1234567890".to_string(),
                published_date: "2020-02-02".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 3);

        mock.delete_book(1).await.unwrap();
        assert!(mock.delete_book(1).await.is_err());
        assert_eq!(mock.books().await.len(), 2);
        assert_eq!(mock.call_counts().await.total(), 3);
    }
}
