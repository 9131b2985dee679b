//! HTTP request handlers
//!
//! The event view surface: listing with search and category filters,
//! detail with viewer flags, past events, per-user views, and the
//! mutation flows (edit, delete, registration changes), plus the
//! account handlers supplying the sessions the gates check.

pub mod auth;
pub mod events;
pub mod health;
pub mod manage;
