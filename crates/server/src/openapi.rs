use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

/// A stored book.
#[derive(Serialize, ToSchema)]
pub struct BookDoc {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
}

/// Create body. All fields are checked by the validation rules.
#[derive(Serialize, ToSchema)]
pub struct BookPayloadDoc {
    /// Required, at most 100 characters.
    pub title: String,
    /// Required, at most 50 characters, unique.
    pub author: String,
    /// Required, 13 digits, unique.
    pub isbn: String,
    /// Optional ISO-8601 date.
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
}

/// Update body. Supplied fields overwrite, omitted ones are kept.
#[derive(Serialize, ToSchema)]
pub struct BookUpdateDoc {
    pub title: Option<String>,
    pub author: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(Serialize, ToSchema)]
pub struct FieldErrorDoc {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Option<String>,
    pub msg: String,
    pub path: Option<String>,
    pub location: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorsDoc { pub errors: Vec<FieldErrorDoc> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::books::create_book,
        crate::routes::books::list_books,
        crate::routes::books::get_book,
        crate::routes::books::update_book,
        crate::routes::books::delete_book,
    ),
    components(
        schemas(
            HealthResponse,
            BookDoc,
            BookPayloadDoc,
            BookUpdateDoc,
            MessageDoc,
            FieldErrorDoc,
            ErrorsDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "books")
    )
)]
pub struct ApiDoc;
