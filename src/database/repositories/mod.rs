//! Repository implementations for database operations

pub mod category;
pub mod event;
pub mod registration;
pub mod user;

pub use category::CategoryRepository;
pub use event::EventRepository;
pub use registration::RegistrationRepository;
pub use user::UserRepository;
