//! Playback URL guessing for the mirror site.
//!
//! The mirror is not affiliated with the catalog, so a URL built here is a
//! best guess. When it is wrong the user edits the slug by hand.

mod slug;

pub use slug::slugify;

use crate::config::MIRROR_BASE_URL;

/// `{slug}-episodio-{n}`
pub fn episode_path(slug: &str, episode: u32) -> String {
    format!("{}-episodio-{}", slug, episode)
}

#[derive(Debug, Clone)]
pub struct MirrorResolver {
    base_url: String,
}

impl MirrorResolver {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Host part of the base URL, for display
    pub fn host(&self) -> &str {
        let without_scheme = self
            .base_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(self.base_url.as_str());
        without_scheme.split('/').next().unwrap_or(without_scheme)
    }

    pub fn source_url(&self, slug: &str, episode: u32) -> String {
        format!("{}/episodio/{}", self.base_url, episode_path(slug, episode))
    }
}

impl Default for MirrorResolver {
    fn default() -> Self {
        Self::new(MIRROR_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_path() {
        assert_eq!(episode_path("one-piece", 1071), "one-piece-episodio-1071");
        assert_eq!(episode_path("", 3), "-episodio-3");
    }

    #[test]
    fn test_default_source_url() {
        let resolver = MirrorResolver::default();
        assert_eq!(
            resolver.source_url("attack-on-titan", 1),
            "https://animesonlinecc.to/episodio/attack-on-titan-episodio-1"
        );
    }

    #[test]
    fn test_trailing_slash_ignored() {
        let resolver = MirrorResolver::new("https://mirror.example/");
        assert_eq!(
            resolver.source_url("frieren", 2),
            "https://mirror.example/episodio/frieren-episodio-2"
        );
    }

    #[test]
    fn test_source_url_from_title() {
        let resolver = MirrorResolver::default();
        assert_eq!(
            resolver.source_url(&slugify("Tóquio Ghoul"), 12),
            "https://animesonlinecc.to/episodio/toquio-ghoul-episodio-12"
        );
    }

    #[test]
    fn test_host() {
        assert_eq!(MirrorResolver::default().host(), "animesonlinecc.to");
        assert_eq!(MirrorResolver::new("http://localhost:8080/base").host(), "localhost:8080");
        assert_eq!(MirrorResolver::new("mirror.example").host(), "mirror.example");
    }
}
