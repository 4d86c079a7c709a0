//! Mutation forms
//!
//! Local validation that runs before anything reaches the network. Each form
//! turns raw user input into the request body the API expects.

mod auth;
mod book;

pub use auth::{SigninForm, SignupForm};
pub use book::BookForm;
