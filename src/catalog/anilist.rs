use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use crate::catalog::queries::{DETAILS_QUERY, SEARCH_QUERY, TRENDING_QUERY};
use crate::catalog::{AnimeSummary, CatalogProvider, PageResult};
use crate::config::ANILIST_ENDPOINT;
use crate::error::{Error, Result};

pub struct AniListClient {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct PageData {
    #[serde(rename = "Page")]
    page: PageResult,
}

#[derive(Deserialize)]
struct MediaData {
    #[serde(rename = "Media")]
    media: Option<AnimeSummary>,
}

impl AniListClient {
    pub fn new() -> Self {
        Self::with_endpoint(ANILIST_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent("level1/0.1")
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// POST one query and unwrap the `data` member of the envelope
    async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        debug!(endpoint = %self.endpoint, variables = %variables, "Sending catalog query");

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let envelope: GraphQlResponse<T> = serde_json::from_slice(&body)?;

        let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
        match envelope.data {
            Some(data) => {
                if !messages.is_empty() {
                    warn!(errors = %messages.join(", "), "Catalog returned partial data");
                }
                Ok(data)
            }
            None if messages.is_empty() => {
                Err(Error::GraphQl("response contained no data".to_string()))
            }
            None => Err(Error::GraphQl(messages.join(", "))),
        }
    }

    pub async fn try_fetch_trending(&self, page: u32, per_page: u32) -> Result<PageResult> {
        let data: PageData = self
            .execute(TRENDING_QUERY, json!({ "page": page, "perPage": per_page }))
            .await?;
        Ok(data.page)
    }

    pub async fn try_search_by_title(
        &self,
        term: &str,
        page: u32,
        per_page: u32,
    ) -> Result<PageResult> {
        let data: PageData = self
            .execute(
                SEARCH_QUERY,
                json!({ "search": term, "page": page, "perPage": per_page }),
            )
            .await?;
        Ok(data.page)
    }

    /// `Ok(None)` when the catalog has no record with this id
    pub async fn try_fetch_details(&self, id: u64) -> Result<Option<AnimeSummary>> {
        match self.execute::<MediaData>(DETAILS_QUERY, json!({ "id": id })).await {
            Ok(data) => Ok(data.media),
            Err(Error::HttpStatus(code)) if code == StatusCode::NOT_FOUND.as_u16() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Default for AniListClient {
    fn default() -> Self {
        Self::new()
    }
}

fn log_page(kind: &str, result: &PageResult) {
    let info = &result.page_info;
    debug!(
        kind,
        count = result.media.len(),
        total = info.total,
        page = info.current_page,
        last_page = info.last_page,
        per_page = info.per_page,
        has_next = info.has_next_page,
        "Fetched catalog page"
    );
}

#[async_trait::async_trait]
impl CatalogProvider for AniListClient {
    async fn fetch_trending(&self, page: u32, per_page: u32) -> Vec<AnimeSummary> {
        match self.try_fetch_trending(page, per_page).await {
            Ok(result) => {
                log_page("trending", &result);
                result.media
            }
            Err(e) => {
                error!(error = %e, "Trending fetch failed");
                Vec::new()
            }
        }
    }

    async fn search_by_title(&self, term: &str, page: u32, per_page: u32) -> Vec<AnimeSummary> {
        match self.try_search_by_title(term, page, per_page).await {
            Ok(result) => {
                debug!(term = %term, "Search answered");
                log_page("search", &result);
                result.media
            }
            Err(e) => {
                error!(term = %term, error = %e, "Search failed");
                Vec::new()
            }
        }
    }

    async fn fetch_details(&self, id: u64) -> Option<AnimeSummary> {
        match self.try_fetch_details(id).await {
            Ok(Some(anime)) => Some(anime),
            Ok(None) => {
                debug!(id, "No catalog record");
                None
            }
            Err(e) => {
                error!(id, error = %e, "Details fetch failed");
                None
            }
        }
    }
}
