//! Request middleware and extractors

pub mod auth;

pub use auth::{CurrentUser, MaybeUser, LOGIN_ROUTE};
