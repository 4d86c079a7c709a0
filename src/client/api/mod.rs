//! API trait definitions split by responsibility
//!
//! - [`AuthApi`] - Sign-in and registration
//! - [`BookApi`] - Book catalogue reads and mutations

mod auth;
mod books;

pub use auth::AuthApi;
pub use books::BookApi;
