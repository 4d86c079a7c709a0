//! Lexora API client

pub mod api;
pub mod library;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;

pub use api::{AuthApi, BookApi};
pub use library::LibraryClient;
pub use pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest};

/// Supplies the bearer credential for outgoing requests.
///
/// Read synchronously before every request; `None` sends the request
/// unauthenticated.
pub trait CredentialSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}
