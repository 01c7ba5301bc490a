use serde::{Deserialize, Serialize};

pub mod profile;
pub mod rating;

pub use profile::PreferenceProfile;
pub use rating::{RatingRecord, RatingRequest, MAX_RATING, MIN_RATING};

/// A book returned by the search provider, before any scoring
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    /// Stable external identifier; candidates without one are never recommended
    pub book_id: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    /// Genres as reported by the provider
    #[serde(default)]
    pub categories: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub page_count: Option<u32>,
    pub thumbnail: Option<String>,
    pub info_link: Option<String>,
}

impl CandidateItem {
    /// Returns the item id if it is present and non-blank
    pub fn id(&self) -> Option<&str> {
        self.book_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

/// List response envelope shared by the search and recommendation endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub count: usize,
    pub items: Vec<CandidateItem>,
}

impl From<Vec<CandidateItem>> for ItemsResponse {
    fn from(items: Vec<CandidateItem>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

// ============================================================================
// Google Books API Types
// ============================================================================

/// Raw response from GET /volumes
#[derive(Debug, Clone, Deserialize)]
pub struct ApiVolumesResponse {
    #[serde(default)]
    pub items: Vec<ApiVolume>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVolume {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub volume_info: ApiVolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub image_links: Option<ApiImageLinks>,
    #[serde(default)]
    pub info_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl From<ApiVolume> for CandidateItem {
    fn from(volume: ApiVolume) -> Self {
        let info = volume.volume_info;

        CandidateItem {
            book_id: volume.id,
            title: info.title,
            authors: info.authors,
            categories: info.categories,
            publisher: info.publisher,
            published_date: info.published_date,
            description: info.description,
            page_count: info.page_count,
            thumbnail: info.image_links.and_then(|links| links.thumbnail),
            info_link: info.info_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_to_candidate() {
        let json = r#"{
            "id": "zyTCAlFPjgYC",
            "volumeInfo": {
                "title": "The Google Story",
                "authors": ["David A. Vise", "Mark Malseed"],
                "publisher": "Random House",
                "publishedDate": "2005-11-15",
                "categories": ["Business & Economics"],
                "pageCount": 207,
                "imageLinks": { "thumbnail": "http://books.google.com/thumb.jpg" },
                "infoLink": "http://books.google.com/books?id=zyTCAlFPjgYC"
            }
        }"#;

        let volume: ApiVolume = serde_json::from_str(json).unwrap();
        let item: CandidateItem = volume.into();

        assert_eq!(item.id(), Some("zyTCAlFPjgYC"));
        assert_eq!(item.title.as_deref(), Some("The Google Story"));
        assert_eq!(item.authors, vec!["David A. Vise", "Mark Malseed"]);
        assert_eq!(item.categories, vec!["Business & Economics"]);
        assert_eq!(item.page_count, Some(207));
        assert_eq!(
            item.thumbnail.as_deref(),
            Some("http://books.google.com/thumb.jpg")
        );
    }

    #[test]
    fn test_volume_without_metadata() {
        let volume: ApiVolume = serde_json::from_str(r#"{ "kind": "books#volume" }"#).unwrap();
        let item: CandidateItem = volume.into();

        assert_eq!(item.id(), None);
        assert!(item.authors.is_empty());
        assert!(item.categories.is_empty());
        assert_eq!(item.thumbnail, None);
    }

    #[test]
    fn test_volumes_response_without_items() {
        // Google Books omits `items` entirely when nothing matches
        let response: ApiVolumesResponse =
            serde_json::from_str(r#"{ "kind": "books#volumes", "totalItems": 0 }"#).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_blank_book_id_is_not_an_id() {
        let item = CandidateItem {
            book_id: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(item.id(), None);
    }

    #[test]
    fn test_candidate_serializes_camel_case() {
        let item = CandidateItem {
            book_id: Some("abc".to_string()),
            info_link: Some("http://example.com".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["bookId"], "abc");
        assert_eq!(json["infoLink"], "http://example.com");
    }
}
