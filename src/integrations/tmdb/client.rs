// src/integrations/tmdb/client.rs
//
// TMDB API Integration
//
// ARCHITECTURE:
// - REST client for the TMDB v3 API
// - Maps wire payloads -> domain model (NO domain mutation)
// - Used by CatalogService behind the CatalogApi trait
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Non-2xx responses and transport failures surface as a uniform AppError
//   the service layer can collapse into a fetch Error state
// - Handles all external API concerns (base url, api key, timeout)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::{Category, MovieDetail, MovieSummary};
use crate::error::{AppError, AppResult};

/// Base URL for poster images, exposed for display layers.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Remote catalog contract consumed by the service layer.
///
/// Object-safe so services take `Arc<dyn CatalogApi>` and tests inject stubs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one category list.
    async fn fetch_category(&self, category: Category) -> AppResult<Vec<MovieSummary>>;

    /// Search the catalog by free-text query.
    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>>;

    /// Fetch the detail payload for a single movie.
    async fn fetch_movie_detail(&self, movie_id: i64) -> AppResult<MovieDetail>;
}

/// TMDB client configuration. The api key is always passed explicitly;
/// there is no process-wide client.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// TMDB API Client
pub struct TmdbClient {
    config: TmdbConfig,
    http_client: Client,
}

/// List responses wrap the page of results
#[derive(Debug, Deserialize)]
struct PageResponse {
    results: Vec<MovieSummary>,
}

impl TmdbClient {
    /// Create a new TMDB client
    pub fn new(config: TmdbConfig) -> Self {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    // ========================================================================
    // INTERNAL: Request Execution
    // ========================================================================

    /// Execute a GET against `{base_url}{path}` with the api key appended
    /// as a query parameter.
    async fn execute_get<T>(&self, path: &str, extra_query: &[(&str, &str)]) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .query(extra_query)
            .send()
            .await?;

        // Check HTTP status
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::RemoteStatus(status.as_u16()));
        }

        // Parse response body
        let parsed = response.json::<T>().await?;
        Ok(parsed)
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn fetch_category(&self, category: Category) -> AppResult<Vec<MovieSummary>> {
        let path = format!("movie/{}", category.query_key());
        let page: PageResponse = self.execute_get(&path, &[]).await?;
        Ok(page.results)
    }

    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        let page: PageResponse = self.execute_get("search/movie", &[("query", query)]).await?;
        Ok(page.results)
    }

    async fn fetch_movie_detail(&self, movie_id: i64) -> AppResult<MovieDetail> {
        let path = format!("movie/{}", movie_id);
        self.execute_get(&path, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_uses_default_base_url() {
        let client = TmdbClient::new(TmdbConfig::new("test_key"));
        assert_eq!(client.config.base_url, "https://api.themoviedb.org/3/");
        assert_eq!(client.config.api_key, "test_key");
    }

    #[test]
    fn test_page_response_parsing() {
        let body = r#"{
            "page": 1,
            "results": [
                {
                    "id": 1,
                    "poster_path": "/p.jpg",
                    "release_date": "2020-05-01",
                    "vote_average": 7.2,
                    "title": "ignored extra field"
                }
            ],
            "total_pages": 10
        }"#;

        let page: PageResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.results.len(), 1);
        let movie = &page.results[0];
        assert_eq!(movie.id, Some(1));
        assert_eq!(movie.poster_path.as_deref(), Some("/p.jpg"));
        assert_eq!(movie.release_date.as_deref(), Some("2020-05-01"));
        assert_eq!(movie.average_rating, Some(7.2));
    }

    #[test]
    fn test_detail_parsing_defaults_missing_genres() {
        let body = r#"{
            "id": 42,
            "title": "Some Movie",
            "vote_average": 8.1,
            "vote_count": 1200
        }"#;

        let detail: MovieDetail = serde_json::from_str(body).unwrap();
        assert_eq!(detail.id, Some(42));
        assert_eq!(detail.title.as_deref(), Some("Some Movie"));
        assert!(detail.genres.is_empty());
        assert_eq!(detail.overview, None);
    }

    #[test]
    fn test_detail_parsing_with_genres() {
        let body = r#"{
            "id": 42,
            "genres": [{"id": 18, "name": "Drama"}, {"id": 53, "name": "Thriller"}]
        }"#;

        let detail: MovieDetail = serde_json::from_str(body).unwrap();
        assert_eq!(detail.genres.len(), 2);
        assert_eq!(detail.genres[0].name.as_deref(), Some("Drama"));
    }

    // Note: Real API tests would be in an integration test suite
    // and would use mocked responses or test against the real API
}
