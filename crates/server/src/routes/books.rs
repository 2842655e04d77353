use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::MessageBody;
use service::books::{Book, BookPayload};
use tracing::{info, warn};

use crate::errors::ApiError;
use crate::metrics::OperationMetrics;
use crate::routes::AppState;

fn finish<T>(m: OperationMetrics, res: Result<T, ApiError>) -> Result<T, ApiError> {
    match &res {
        Ok(_) => m.finish("ok"),
        Err(e) => m.finish(e.outcome()),
    }
    res
}

/// Decodes a book body. An empty body counts as `{}`; anything else must be
/// JSON, whatever the declared content type.
fn parse_payload(body: &Bytes) -> Result<BookPayload, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(BookPayload::default());
    }
    serde_json::from_slice(body).map_err(ApiError::from)
}

#[utoipa::path(
    post, path = "/books", tag = "books",
    request_body = crate::openapi::BookPayloadDoc,
    responses(
        (status = 201, description = "Book created", body = crate::openapi::MessageDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorsDoc),
        (status = 500, description = "Persistence failure", body = crate::openapi::MessageDoc)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    let m = OperationMetrics::start("create");
    let res = async {
        let payload = parse_payload(&body)?;
        state.books.create(payload).await.map_err(|e| {
            let e = ApiError::from(e);
            if let ApiError::Validation(v) = &e {
                warn!(violations = v.len(), "create book rejected");
            }
            e
        })?;
        Ok::<_, ApiError>((StatusCode::CREATED, Json(MessageBody::new("Book created"))))
    }
    .await;
    finish(m, res)
}

#[utoipa::path(
    get, path = "/books", tag = "books",
    responses((status = 200, description = "All books in storage order", body = [crate::openapi::BookDoc]))
)]
pub async fn list_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    let m = OperationMetrics::start("list");
    let books = state.books.list().await;
    info!(count = books.len(), "list books");
    m.finish("ok");
    Json(books)
}

#[utoipa::path(
    get, path = "/books/{isbn}", tag = "books",
    params(("isbn" = String, Path, description = "13-digit ISBN")),
    responses(
        (status = 200, description = "Book", body = crate::openapi::BookDoc),
        (status = 404, description = "Book not found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let m = OperationMetrics::start("get");
    let res = state.books.get(&isbn).await.map(Json).map_err(ApiError::from);
    finish(m, res)
}

#[utoipa::path(
    put, path = "/books/{isbn}", tag = "books",
    params(("isbn" = String, Path, description = "13-digit ISBN")),
    request_body = crate::openapi::BookUpdateDoc,
    responses(
        (status = 200, description = "Book updated", body = crate::openapi::MessageDoc),
        (status = 400, description = "Malformed body", body = crate::openapi::ErrorsDoc),
        (status = 404, description = "Book not found", body = crate::openapi::MessageDoc),
        (status = 500, description = "Persistence failure", body = crate::openapi::MessageDoc)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    body: Bytes,
) -> Result<Json<MessageBody>, ApiError> {
    let m = OperationMetrics::start("update");
    let res = async {
        let payload = parse_payload(&body)?;
        state.books.update(&isbn, payload).await?;
        Ok::<_, ApiError>(Json(MessageBody::new("Book updated")))
    }
    .await;
    finish(m, res)
}

#[utoipa::path(
    delete, path = "/books/{isbn}", tag = "books",
    params(("isbn" = String, Path, description = "13-digit ISBN")),
    responses(
        (status = 200, description = "Book deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Book not found", body = crate::openapi::MessageDoc),
        (status = 500, description = "Persistence failure", body = crate::openapi::MessageDoc)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let m = OperationMetrics::start("delete");
    let res = state
        .books
        .delete(&isbn)
        .await
        .map(|_| Json(MessageBody::new("Book deleted")))
        .map_err(ApiError::from);
    finish(m, res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_an_empty_payload() {
        for raw in ["", "  \n"] {
            let payload = parse_payload(&Bytes::from(raw)).unwrap();
            assert!(payload.title.is_none() && payload.author.is_none() && payload.isbn.is_none());
        }
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_payload(&Bytes::from_static(b"{ not json")).unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn json_body_is_decoded() {
        let payload = parse_payload(&Bytes::from_static(br#"{"title":"T","isbn":1234567890123}"#)).unwrap();
        assert_eq!(payload.title.as_deref(), Some("T"));
        assert_eq!(payload.isbn.as_deref(), Some("1234567890123"));
    }
}
