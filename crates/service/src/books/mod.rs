//! Book records: domain model, validation pipeline and CRUD service.
//!
//! `isbn` is the natural key. It is set on create and never changed.

pub mod domain;
pub mod validation;
pub mod service;

pub use domain::{Book, BookField, BookPayload};
pub use service::BookService;
pub use validation::Violation;
