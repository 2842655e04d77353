use serde::{de, Deserialize, Deserializer, Serialize};

/// A persisted book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(rename = "publishedDate", default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

impl Book {
    /// Text value of `field`, if the record carries one.
    pub fn field_value(&self, field: BookField) -> Option<&str> {
        match field {
            BookField::Title => Some(&self.title),
            BookField::Author => Some(&self.author),
            BookField::Isbn => Some(&self.isbn),
            BookField::PublishedDate => self.published_date.as_deref(),
        }
    }
}

/// Addressable fields of a book, named as they appear in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Author,
    Isbn,
    PublishedDate,
}

impl BookField {
    pub fn as_str(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Isbn => "isbn",
            BookField::PublishedDate => "publishedDate",
        }
    }
}

impl Serialize for BookField {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for BookField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for create and update.
///
/// Every field is optional at this layer so that the validation pipeline,
/// not deserialization, decides what is missing. Numbers and booleans are
/// accepted in their textual form; `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub isbn: Option<String>,
    #[serde(rename = "publishedDate", default, deserialize_with = "lenient_text")]
    pub published_date: Option<String>,
}

impl BookPayload {
    pub fn new(title: &str, author: &str, isbn: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            isbn: Some(isbn.to_string()),
            published_date: None,
        }
    }

    pub fn with_published_date(mut self, date: &str) -> Self {
        self.published_date = Some(date.to_string());
        self
    }

    pub fn value(&self, field: BookField) -> Option<&str> {
        match field {
            BookField::Title => self.title.as_deref(),
            BookField::Author => self.author.as_deref(),
            BookField::Isbn => self.isbn.as_deref(),
            BookField::PublishedDate => self.published_date.as_deref(),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::invalid_type(
            de::Unexpected::Other(json_kind(&other)),
            &"a string, number or boolean",
        )),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
        _ => "scalar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_omits_absent_published_date() {
        let book = Book {
            title: "T".into(),
            author: "A".into(),
            isbn: "1234567890123".into(),
            published_date: None,
        };
        let v = serde_json::to_value(&book).unwrap();
        assert_eq!(v, json!({"title": "T", "author": "A", "isbn": "1234567890123"}));

        let dated = Book { published_date: Some("2023-07-16".into()), ..book };
        let v = serde_json::to_value(&dated).unwrap();
        assert_eq!(v["publishedDate"], "2023-07-16");
    }

    #[test]
    fn payload_coerces_scalars_and_treats_null_as_absent() {
        let p: BookPayload = serde_json::from_value(json!({
            "title": "Book Title",
            "isbn": 1234567890123u64,
            "author": null,
            "publishedDate": true
        }))
        .unwrap();
        assert_eq!(p.title.as_deref(), Some("Book Title"));
        assert_eq!(p.isbn.as_deref(), Some("1234567890123"));
        assert_eq!(p.author, None);
        assert_eq!(p.published_date.as_deref(), Some("true"));
    }

    #[test]
    fn payload_rejects_structured_values() {
        let res = serde_json::from_value::<BookPayload>(json!({"title": ["a"]}));
        assert!(res.is_err());
    }

    #[test]
    fn field_names_match_json_keys() {
        assert_eq!(BookField::PublishedDate.as_str(), "publishedDate");
        assert_eq!(BookField::Isbn.to_string(), "isbn");
    }
}
