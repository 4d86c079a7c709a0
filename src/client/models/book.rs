//! Book models

use serde::{Deserialize, Serialize};

/// Book record as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,

    /// Publication date, `YYYY-MM-DD`
    pub published_date: String,
}

/// Body for creating a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_date: String,
}

/// Partial update body; only the fields that are set are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

impl UpdateBookRequest {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.isbn.is_none()
            && self.published_date.is_none()
    }

    /// Wire names of the fields this update touches
    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            ("title", self.title.is_some()),
            ("author", self.author.is_some()),
            ("isbn", self.isbn.is_some()),
            ("publishedDate", self.published_date.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    /// Apply this update to a local copy of a book
    #[cfg(test)]
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(ref title) = self.title {
            book.title = title.clone();
        }
        if let Some(ref author) = self.author {
            book.author = author.clone();
        }
        if let Some(ref isbn) = self.isbn {
            book.isbn = isbn.clone();
        }
        if let Some(ref date) = self.published_date {
            book.published_date = date.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_deserializes_camel_case() {
        let book: Book = serde_json::from_str(
            r#"{"id":1,"title":"Dune","author":"Frank Herbert","isbn":"9780441013593","publishedDate":"1965-08-01"}"#,
        )
        .unwrap();
        assert_eq!(book.published_date, "1965-08-01");
    }

    #[test]
    fn test_update_request_serializes_only_set_fields() {
        let update = UpdateBookRequest {
            title: Some("New Title".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"title":"New Title"}"#);
        assert_eq!(update.changed_fields(), vec!["title"]);
        assert!(!update.is_empty());
    }

    #[test]
    fn test_empty_update() {
        let update = UpdateBookRequest::default();
        assert!(update.is_empty());
        assert!(update.changed_fields().is_empty());
        assert_eq!(serde_json::to_string(&update).unwrap(), "{}");
    }

    #[test]
    fn test_apply_to() {
        let mut book = Book {
            id: 1,
            title: "Old".to_string(),
            author: "A".to_string(),
            isbn: "1234567890".to_string(),
            published_date: "2000-01-01".to_string(),
        };
        let update = UpdateBookRequest {
            author: Some("B".to_string()),
            published_date: Some("2001-02-03".to_string()),
            ..Default::default()
        };

        update.apply_to(&mut book);
        assert_eq!(book.title, "Old");
        assert_eq!(book.author, "B");
        assert_eq!(book.published_date, "2001-02-03");
    }
}
