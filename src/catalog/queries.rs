//! GraphQL documents sent to the catalog endpoint.
//!
//! The three queries share one media selection so every result maps onto
//! [`AnimeSummary`](super::AnimeSummary); the search query asks for a
//! narrower set of fields and leaves the rest at their defaults.

pub const TRENDING_QUERY: &str = r#"
query ($page: Int, $perPage: Int) {
  Page (page: $page, perPage: $perPage) {
    pageInfo {
      total
      currentPage
      lastPage
      hasNextPage
      perPage
    }
    media (sort: TRENDING_DESC, type: ANIME, isAdult: false) {
      id
      title {
        romaji
        english
        native
      }
      coverImage {
        extraLarge
        large
        medium
        color
      }
      bannerImage
      episodes
      genres
      averageScore
      status
      seasonYear
      format
    }
  }
}
"#;

pub const SEARCH_QUERY: &str = r#"
query ($search: String, $page: Int, $perPage: Int) {
  Page (page: $page, perPage: $perPage) {
    pageInfo {
      total
      currentPage
      lastPage
      hasNextPage
      perPage
    }
    media (search: $search, sort: POPULARITY_DESC, type: ANIME, isAdult: false) {
      id
      title {
        romaji
        english
        native
      }
      coverImage {
        extraLarge
        large
        medium
        color
      }
      episodes
      averageScore
      seasonYear
      format
    }
  }
}
"#;

pub const DETAILS_QUERY: &str = r#"
query ($id: Int) {
  Media (id: $id, type: ANIME) {
    id
    title {
      romaji
      english
      native
    }
    coverImage {
      extraLarge
      large
      medium
      color
    }
    bannerImage
    description
    episodes
    genres
    averageScore
    status
    seasonYear
    format
  }
}
"#;
