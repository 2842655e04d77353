use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use super::domain::{Book, BookPayload};
use super::validation::{self, CREATE_RULES};
use crate::errors::ServiceError;
use crate::storage::CollectionStore;

/// CRUD over the book collection, independent of the web framework.
///
/// Each mutation is one critical section: read the collection, validate,
/// apply, write it back. `write_lock` serializes those sections, so two
/// concurrent mutations can no longer overwrite each other and a
/// uniqueness check always sees the collection it is about to extend.
/// Reads skip the lock; the store only ever exposes complete documents.
pub struct BookService {
    store: Arc<dyn CollectionStore<Book>>,
    write_lock: Mutex<()>,
}

impl BookService {
    pub fn new(store: Arc<dyn CollectionStore<Book>>) -> Self {
        Self { store, write_lock: Mutex::new(()) }
    }

    /// Validate and append a new book.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::books::{Book, BookPayload, BookService};
    /// use service::storage::MemoryListStore;
    /// let svc = BookService::new(Arc::new(MemoryListStore::<Book>::new()));
    /// let book = tokio_test::block_on(svc.create(BookPayload::new("Dune", "Frank Herbert", "9780441172719"))).unwrap();
    /// assert_eq!(book.isbn, "9780441172719");
    /// assert_eq!(tokio_test::block_on(svc.list()).len(), 1);
    /// ```
    #[instrument(skip(self, payload), fields(isbn = payload.isbn.as_deref().unwrap_or_default()))]
    pub async fn create(&self, payload: BookPayload) -> Result<Book, ServiceError> {
        let book = self
            .mutate(|books| {
                validation::validate(CREATE_RULES, &payload, books).map_err(ServiceError::Validation)?;
                let book = Book {
                    title: payload.title.unwrap_or_default(),
                    author: payload.author.unwrap_or_default(),
                    isbn: payload.isbn.unwrap_or_default(),
                    published_date: payload.published_date,
                };
                books.push(book.clone());
                Ok(book)
            })
            .await?;
        info!(isbn = %book.isbn, "book_created");
        Ok(book)
    }

    /// All books in storage order.
    pub async fn list(&self) -> Vec<Book> {
        self.store.read().await
    }

    /// First book whose isbn equals `isbn`.
    pub async fn get(&self, isbn: &str) -> Result<Book, ServiceError> {
        self.store
            .read()
            .await
            .into_iter()
            .find(|b| b.isbn == isbn)
            .ok_or_else(|| ServiceError::not_found("book"))
    }

    /// Overwrite `title` and/or `author` of the book keyed by `isbn`.
    ///
    /// Only supplied fields change; an omitted field keeps its stored value.
    /// No validation runs here, and `isbn`/`publishedDate` in the payload are ignored.
    #[instrument(skip(self, payload))]
    pub async fn update(&self, isbn: &str, payload: BookPayload) -> Result<Book, ServiceError> {
        let book = self
            .mutate(|books| {
                let existing = books
                    .iter_mut()
                    .find(|b| b.isbn == isbn)
                    .ok_or_else(|| ServiceError::not_found("book"))?;
                if let Some(title) = payload.title {
                    existing.title = title;
                }
                if let Some(author) = payload.author {
                    existing.author = author;
                }
                Ok(existing.clone())
            })
            .await?;
        info!(isbn = %book.isbn, "book_updated");
        Ok(book)
    }

    /// Remove the book keyed by `isbn` and return it.
    #[instrument(skip(self))]
    pub async fn delete(&self, isbn: &str) -> Result<Book, ServiceError> {
        let book = self
            .mutate(|books| {
                let idx = books
                    .iter()
                    .position(|b| b.isbn == isbn)
                    .ok_or_else(|| ServiceError::not_found("book"))?;
                Ok(books.remove(idx))
            })
            .await?;
        info!(isbn = %book.isbn, "book_deleted");
        Ok(book)
    }

    /// Drop every book. Used to reset state between test runs.
    pub async fn clear(&self) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        self.store.clear().await?;
        info!("books_cleared");
        Ok(())
    }

    /// Run `f` on a fresh copy of the collection under the write lock and
    /// persist the result. Nothing is written when `f` fails.
    ///
    /// An unreadable collection still counts as empty here, so the write that
    /// follows replaces whatever was on disk; that case is logged at ERROR.
    async fn mutate<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<Book>) -> Result<R, ServiceError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut books = match self.store.try_read().await {
            Ok(books) => books,
            Err(e) => {
                error!(error = %e, "book collection unreadable; mutation starts from an empty collection");
                Vec::new()
            }
        };
        let out = f(&mut books)?;
        self.store.write(&books).await?;
        Ok(out)
    }
}
