use serde::{Deserialize, Deserializer, Serialize};

pub mod anilist;
pub mod queries;

pub use anilist::AniListClient;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;

/// AniList sends explicit `null` for unknown strings and lists
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeTitle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub romaji: String,
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub native: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub extra_large: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub large: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub medium: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// One catalog record, as returned by the trending, search and details queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeSummary {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: AnimeTitle,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_image: CoverImage,
    #[serde(default)]
    pub banner_image: Option<String>,
    /// Only filled in by the details query; may contain HTML.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub average_score: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub season_year: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub format: String,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

impl AnimeSummary {
    /// Title shown on catalog cards: english first, romaji otherwise
    pub fn card_title(&self) -> &str {
        non_empty(&self.title.english).unwrap_or(self.title.romaji.as_str())
    }

    /// Title used on the watch screen and to seed the mirror slug
    pub fn display_title(&self) -> &str {
        if !self.title.romaji.is_empty() {
            &self.title.romaji
        } else {
            non_empty(&self.title.english).unwrap_or("")
        }
    }

    /// Largest cover available for the hero banner
    pub fn hero_image(&self) -> &str {
        non_empty(&self.banner_image).unwrap_or(self.cover_image.extra_large.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub last_page: u32,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<AnimeSummary>,
}

/// Read-only catalog source.
///
/// Every operation issues one request and never fails: transport and decode
/// problems are logged and collapse to an empty list or `None`.
#[async_trait::async_trait]
pub trait CatalogProvider {
    async fn fetch_trending(&self, page: u32, per_page: u32) -> Vec<AnimeSummary>;
    async fn search_by_title(&self, term: &str, page: u32, per_page: u32) -> Vec<AnimeSummary>;
    async fn fetch_details(&self, id: u64) -> Option<AnimeSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nulls_fall_back_to_defaults() {
        let json = r#"{
            "id": 1,
            "title": { "romaji": "Cowboy Bebop", "english": null, "native": null },
            "coverImage": { "extraLarge": "xl", "large": "l", "medium": "m", "color": null },
            "genres": null,
            "status": null,
            "format": "TV"
        }"#;

        let anime: AnimeSummary = serde_json::from_str(json).unwrap();
        assert_eq!(anime.title.native, "");
        assert!(anime.genres.is_empty());
        assert_eq!(anime.status, "");
        assert_eq!(anime.episodes, None);
        assert_eq!(anime.format, "TV");
    }

    #[test]
    fn test_title_preferences() {
        let mut anime = AnimeSummary {
            title: AnimeTitle {
                romaji: "Shingeki no Kyojin".to_string(),
                english: Some("Attack on Titan".to_string()),
                native: "進撃の巨人".to_string(),
            },
            ..Default::default()
        };
        assert_eq!(anime.card_title(), "Attack on Titan");
        assert_eq!(anime.display_title(), "Shingeki no Kyojin");

        anime.title.romaji.clear();
        assert_eq!(anime.display_title(), "Attack on Titan");

        anime.title.english = Some(String::new());
        assert_eq!(anime.card_title(), "");
        assert_eq!(anime.display_title(), "");
    }

    #[test]
    fn test_hero_image_prefers_banner() {
        let mut anime = AnimeSummary::default();
        anime.cover_image.extra_large = "cover".to_string();
        assert_eq!(anime.hero_image(), "cover");

        anime.banner_image = Some("banner".to_string());
        assert_eq!(anime.hero_image(), "banner");
    }
}
