//! PostgREST API client
//!
//! Thin wrapper over the REST interface hosted backends such as Supabase put
//! in front of a Postgres table: filtered selects, inserts and updates that
//! return the stored rows.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use urlencoding::encode;

use crate::error::RestError;

/// Ask PostgREST to echo the affected rows back
const RETURN_REPRESENTATION: &str = "return=representation";

/// Sort direction for a select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Parameters of a select request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select<'a> {
    /// `(column, value)` pairs combined with AND, compared with `eq`
    pub filters: Vec<(&'a str, String)>,
    pub order_by: Option<(&'a str, Order)>,
    pub limit: Option<usize>,
}

impl<'a> Select<'a> {
    pub fn all() -> Self {
        Self {
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn eq(mut self, column: &'a str, value: impl Into<String>) -> Self {
        self.filters.push((column, value.into()));
        self
    }

    pub fn order(mut self, column: &'a str, order: Order) -> Self {
        self.order_by = Some((column, order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render as a PostgREST query string (without the leading `?`)
    fn query_string(&self) -> String {
        let mut params = vec!["select=*".to_string()];
        for (column, value) in &self.filters {
            params.push(format!("{}=eq.{}", encode(column), encode(value)));
        }
        if let Some((column, order)) = self.order_by {
            let direction = match order {
                Order::Ascending => "asc",
                Order::Descending => "desc",
            };
            params.push(format!("order={}.{}", encode(column), direction));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        params.join("&")
    }
}

/// HTTP client for a PostgREST endpoint
#[derive(Clone)]
pub struct PostgrestClient {
    http: Client,
    base_url: String,
}

impl PostgrestClient {
    /// Create a client for `<base_url>/rest/v1`, authenticating with `api_key`
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, RestError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key).map_err(|_| RestError::Unauthorized)?;
        headers.insert("apikey", key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| RestError::Unauthorized)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, encode(table))
    }

    /// `GET` matching rows
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &Select<'_>,
    ) -> Result<Vec<T>, RestError> {
        let url = format!("{}?{}", self.table_url(table), select.query_string());
        tracing::debug!(%url, "PostgREST select");

        let response = self.http.get(&url).send().await?;
        handle_response(response).await
    }

    /// `POST` new rows, returning them as stored
    pub async fn insert<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        rows: &[B],
    ) -> Result<Vec<T>, RestError> {
        let url = self.table_url(table);
        tracing::debug!(%url, rows = rows.len(), "PostgREST insert");

        let response = self
            .http
            .post(&url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(rows)
            .send()
            .await?;
        handle_response(response).await
    }

    /// `PATCH` the row whose `id` matches, returning it as stored
    pub async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        patch: &B,
        id: &str,
    ) -> Result<T, RestError> {
        let url = format!("{}?id=eq.{}", self.table_url(table), encode(id));
        tracing::debug!(%url, "PostgREST update");

        let response = self
            .http
            .patch(&url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(patch)
            .send()
            .await?;
        let rows: Vec<T> = handle_response(response).await?;
        rows.into_iter().next().ok_or(RestError::EmptyResponse)
    }
}

async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, RestError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RestError::Deserialization(e.to_string()))
    } else if status.as_u16() == 401 || status.as_u16() == 403 {
        Err(RestError::Unauthorized)
    } else if status.as_u16() == 429 {
        Err(RestError::RateLimited)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(RestError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
