//! Service layer for the book collection.
//! - `storage` persists the whole collection (JSON file or memory).
//! - `books` holds the record model, the validation pipeline and `BookService`.
//! - Errors are typed per layer in `errors`.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod books;

pub use books::service::BookService;
