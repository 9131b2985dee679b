//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, response envelopes and
//! pagination.

pub mod errors;
pub mod logging;
pub mod pagination;
pub mod response;

pub use errors::{AppError, Result, ValidationErrors};
pub use pagination::{Page, PageRequest};
