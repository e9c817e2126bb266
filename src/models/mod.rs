//! Data models for Bookshelf

pub mod book;
pub mod user;

pub use book::{Book, NewBook};
pub use user::{Credentials, NewUser, User};
