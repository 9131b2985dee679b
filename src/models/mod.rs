//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod category;
pub mod event;
pub mod registration;
pub mod user;

// Re-export commonly used models
pub use category::EventCategory;
pub use event::{
    Event, EventFilter, EventForm, ImageChange, ImageUpload, SearchFilter, ValidatedEventForm,
};
pub use registration::EventRegistration;
pub use user::{LoginRequest, SignupRequest, User};
