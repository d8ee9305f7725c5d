/*
 * Responsibility
 * - Posts request/response DTOs
 * - ids leave the API encoded (internal keys never leak)
 * - readers get the author reduced to { username }
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TITLE_MAX_CHARS: usize = 200;
const CONTENT_MAX_CHARS: usize = 50_000;

/// Body of create and update: both replace title and content as a pair.
#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub title: String,
    pub content: String,
}

impl PostBody {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.title.chars().count() > TITLE_MAX_CHARS {
            return Err("title must be <= 200 chars");
        }
        if self.content.trim().is_empty() {
            return Err("content is required");
        }
        if self.content.chars().count() > CONTENT_MAX_CHARS {
            return Err("content must be <= 50000 chars");
        }

        Ok(())
    }
}

pub type CreatePostRequest = PostBody;
pub type UpdatePostRequest = PostBody;

#[derive(Debug, Default)]
pub struct ListPostsQuery {
    pub location: Option<String>,
}

impl ListPostsQuery {
    /// Built from raw query pairs: the first non-blank `location` wins and
    /// repeats or unrelated parameters are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let location = pairs
            .into_iter()
            .filter(|(key, _)| key == "location")
            .map(|(_, value)| value)
            .find(|value| !value.trim().is_empty());

        Self { location }
    }

    /// Explicit filter, if one was actually given (blank counts as absent).
    pub fn explicit_location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Returned by create and update.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: String, // encoded
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AuthorSummary {
    pub username: String,
}

/// Returned by list and read-one.
#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub id: String, // encoded
    pub title: String,
    pub content: String,
    pub author: AuthorSummary,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(title: &str, content: &str) -> PostBody {
        PostBody {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn requires_title_and_content() {
        assert!(body("T", "C").validate().is_ok());
        assert_eq!(body("  ", "C").validate(), Err("title is required"));
        assert_eq!(body("T", "").validate(), Err("content is required"));
    }

    #[test]
    fn caps_title_length() {
        assert!(body(&"x".repeat(200), "C").validate().is_ok());
        assert!(body(&"x".repeat(201), "C").validate().is_err());
    }

    #[test]
    fn first_non_blank_location_wins() {
        let pairs = |items: &[(&str, &str)]| {
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>()
        };

        let q = ListPostsQuery::from_pairs(pairs(&[("location", " "), ("location", "US"), ("location", "FR")]));
        assert_eq!(q.explicit_location(), Some("US"));

        let q = ListPostsQuery::from_pairs(pairs(&[("page", "2")]));
        assert_eq!(q.explicit_location(), None);
    }

    #[test]
    fn blank_location_query_is_absent() {
        let q = ListPostsQuery {
            location: Some("  ".to_string()),
        };
        assert_eq!(q.explicit_location(), None);

        let q = ListPostsQuery {
            location: Some("FR".to_string()),
        };
        assert_eq!(q.explicit_location(), Some("FR"));
    }
}
