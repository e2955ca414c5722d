use crate::catalog::AnimeSummary;
use crate::mirror::{MirrorResolver, slugify};

/// Bookkeeping for the watch screen: the loaded record, the episode being
/// watched and the slug used to build the mirror URL.
#[derive(Debug, Clone)]
pub struct WatchSession {
    pub id: u64,
    pub anime: Option<AnimeSummary>,
    pub loading: bool,
    pub current_episode: u32,
    pub slug: String,
    pub override_visible: bool,
    resolver: MirrorResolver,
    fallback_episodes: u32,
}

impl WatchSession {
    /// Start a session for `id` whose details are still being fetched
    pub fn pending(id: u64, resolver: MirrorResolver, fallback_episodes: u32) -> Self {
        Self {
            id,
            anime: None,
            loading: true,
            current_episode: 1,
            slug: String::new(),
            override_visible: false,
            resolver,
            fallback_episodes: fallback_episodes.max(1),
        }
    }

    /// Apply a details response. The slug is re-seeded from the title.
    pub fn load(&mut self, anime: Option<AnimeSummary>) {
        self.loading = false;
        self.current_episode = 1;
        self.slug = anime
            .as_ref()
            .map(|a| slugify(a.display_title()))
            .unwrap_or_default();
        self.anime = anime;
    }

    pub fn total_episodes(&self) -> u32 {
        self.anime
            .as_ref()
            .and_then(|a| a.episodes)
            .filter(|&n| n > 0)
            .unwrap_or(self.fallback_episodes)
    }

    /// Out-of-range episode numbers are ignored
    pub fn select_episode(&mut self, episode: u32) {
        if (1..=self.total_episodes()).contains(&episode) {
            self.current_episode = episode;
        }
    }

    pub fn next_episode(&mut self) {
        self.select_episode(self.current_episode + 1);
    }

    pub fn previous_episode(&mut self) {
        self.select_episode(self.current_episode.saturating_sub(1));
    }

    pub fn toggle_override(&mut self) {
        self.override_visible = !self.override_visible;
    }

    pub fn push_slug_char(&mut self, c: char) {
        self.slug.push(c);
    }

    pub fn pop_slug_char(&mut self) {
        self.slug.pop();
    }

    /// Throw away manual edits and slug the title again
    pub fn reset_slug(&mut self) {
        if let Some(anime) = &self.anime {
            self.slug = slugify(anime.display_title());
        }
    }

    pub fn source_url(&self) -> String {
        self.resolver.source_url(&self.slug, self.current_episode)
    }

    pub fn mirror_host(&self) -> &str {
        self.resolver.host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AnimeTitle;

    fn anime(romaji: &str, english: Option<&str>, episodes: Option<u32>) -> AnimeSummary {
        AnimeSummary {
            id: 16498,
            title: AnimeTitle {
                romaji: romaji.to_string(),
                english: english.map(str::to_string),
                native: String::new(),
            },
            episodes,
            ..Default::default()
        }
    }

    fn session() -> WatchSession {
        WatchSession::pending(16498, MirrorResolver::default(), 24)
    }

    #[test]
    fn test_pending_defaults() {
        let s = session();
        assert!(s.loading);
        assert!(s.anime.is_none());
        assert_eq!(s.current_episode, 1);
        assert!(!s.override_visible);
    }

    #[test]
    fn test_load_seeds_slug_from_romaji() {
        let mut s = session();
        s.load(Some(anime("Shingeki no Kyojin", Some("Attack on Titan"), Some(25))));

        assert!(!s.loading);
        assert_eq!(s.slug, "shingeki-no-kyojin");
        assert_eq!(
            s.source_url(),
            "https://animesonlinecc.to/episodio/shingeki-no-kyojin-episodio-1"
        );
    }

    #[test]
    fn test_load_falls_back_to_english() {
        let mut s = session();
        s.load(Some(anime("", Some("Attack on Titan"), None)));
        assert_eq!(s.slug, "attack-on-titan");
    }

    #[test]
    fn test_load_absent_record() {
        let mut s = session();
        s.load(None);
        assert!(!s.loading);
        assert!(s.anime.is_none());
        assert_eq!(s.slug, "");
        assert_eq!(s.total_episodes(), 24);
    }

    #[test]
    fn test_total_episodes_fallback() {
        let mut s = session();
        s.load(Some(anime("One Piece", None, None)));
        assert_eq!(s.total_episodes(), 24);

        s.load(Some(anime("One Piece", None, Some(0))));
        assert_eq!(s.total_episodes(), 24);

        s.load(Some(anime("Frieren", None, Some(28))));
        assert_eq!(s.total_episodes(), 28);
    }

    #[test]
    fn test_select_episode_within_bounds() {
        let mut s = session();
        s.load(Some(anime("Frieren", None, Some(28))));

        for k in 1..=28 {
            s.select_episode(k);
            assert_eq!(s.current_episode, k);
            let needle = format!("-episodio-{}", k);
            assert_eq!(s.source_url().matches(&needle).count(), 1);
            assert!(s.source_url().ends_with(&needle));
        }

        s.select_episode(0);
        assert_eq!(s.current_episode, 28);
        s.select_episode(29);
        assert_eq!(s.current_episode, 28);
    }

    #[test]
    fn test_next_and_previous_clamp() {
        let mut s = session();
        s.load(Some(anime("Frieren", None, Some(2))));

        s.previous_episode();
        assert_eq!(s.current_episode, 1);
        s.next_episode();
        s.next_episode();
        assert_eq!(s.current_episode, 2);
    }

    #[test]
    fn test_manual_override_and_reset() {
        let mut s = session();
        s.load(Some(anime("Solo Leveling Season 2", None, Some(13))));
        s.select_episode(4);

        s.toggle_override();
        assert!(s.override_visible);

        s.slug.clear();
        for c in "solo-leveling-2-temporada".chars() {
            s.push_slug_char(c);
        }
        assert_eq!(
            s.source_url(),
            "https://animesonlinecc.to/episodio/solo-leveling-2-temporada-episodio-4"
        );

        s.pop_slug_char();
        assert_eq!(s.slug, "solo-leveling-2-temporad");

        s.reset_slug();
        assert_eq!(s.slug, "solo-leveling-season-2");
        assert_eq!(s.current_episode, 4);

        s.toggle_override();
        assert!(!s.override_visible);
    }

    #[test]
    fn test_reload_resets_episode() {
        let mut s = session();
        s.load(Some(anime("Frieren", None, Some(28))));
        s.select_episode(10);
        s.load(Some(anime("Frieren", None, Some(28))));
        assert_eq!(s.current_episode, 1);
    }
}
