//! Lexora API data models

mod auth;
mod book;

pub use auth::{JwtResponse, MessageResponse, SigninRequest, SignupRequest};
pub use book::{Book, CreateBookRequest, UpdateBookRequest};
