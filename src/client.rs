//! Dune API client — latest-result fetching behind a provider trait.
//!
//! The batch pipeline only depends on the [`ResultFetcher`] capability; the
//! concrete [`DuneClient`] targets the Dune "latest result" endpoint and can
//! be swapped for any other tabular-result source (or a test double) without
//! touching the batching or writing logic.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::{QueryId, ResultTable};

/// Abstraction over tabular-result fetching, enabling testability.
#[async_trait]
pub trait ResultFetcher: Send + Sync {
    /// Fetch the latest stored result for one query.
    async fn fetch(&self, id: QueryId) -> Result<ResultTable>;
}

/// Production [`ResultFetcher`] backed by the Dune HTTP API.
#[derive(Debug)]
pub struct DuneClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DuneClient {
    /// Build a client from API settings. Fails if the base URL does not
    /// parse or the underlying HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = url::Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid API base URL '{}': {e}", config.base_url),
            key: Some(crate::config::BASE_URL_VAR.to_string()),
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn results_url(&self, id: QueryId) -> String {
        format!("{}/api/v1/query/{}/results", self.base_url, id)
    }
}

#[async_trait]
impl ResultFetcher for DuneClient {
    async fn fetch(&self, id: QueryId) -> Result<ResultTable> {
        let url = self.results_url(id);
        tracing::debug!(query_id = id.0, url = %url, "Requesting latest result");

        let response = self
            .http
            .get(&url)
            .header("X-Dune-API-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                query_id: id,
                status: status.as_u16(),
                message: extract_api_error(&body),
            });
        }

        let envelope: LatestResultResponse = response.json().await?;
        let captured_at = Utc::now();

        let payload = match envelope.result {
            Some(payload) => payload,
            None => {
                return Err(Error::Api {
                    query_id: id,
                    status: status.as_u16(),
                    message: envelope
                        .error
                        .unwrap_or_else(|| "response contained no result".to_string()),
                });
            }
        };

        let columns = payload.metadata.column_names;
        let rows = payload
            .rows
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|name| render_cell(row.get(name)))
                    .collect()
            })
            .collect();

        Ok(ResultTable {
            columns,
            rows,
            captured_at,
        })
    }
}

/// Render one JSON cell the way a dataframe dump would: strings unquoted,
/// null as empty, everything else via its JSON rendering.
fn render_cell(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Pull the `error` field out of an API error body, falling back to the raw
/// (trimmed) body text.
fn extract_api_error(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Latest-result response envelope (fields we consume)
#[derive(Debug, Deserialize)]
struct LatestResultResponse {
    result: Option<ResultPayload>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultPayload {
    rows: Vec<serde_json::Map<String, serde_json::Value>>,
    metadata: ResultMetadata,
}

#[derive(Debug, Deserialize)]
struct ResultMetadata {
    column_names: Vec<String>,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> DuneClient {
        DuneClient::new(&ApiConfig {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn result_body() -> serde_json::Value {
        serde_json::json!({
            "execution_id": "01HX",
            "state": "QUERY_STATE_COMPLETED",
            "result": {
                "rows": [
                    {"symbol": "WETH", "token_address": "0xc02a", "volume": 12.5},
                    {"symbol": "USDC", "token_address": "0xa0b8", "volume": null},
                ],
                "metadata": {
                    "column_names": ["symbol", "token_address", "volume"]
                }
            }
        })
    }

    #[tokio::test]
    async fn fetch_decodes_rows_in_column_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query/42/results"))
            .and(header("X-Dune-API-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(result_body()))
            .mount(&server)
            .await;

        let table = test_client(&server.uri())
            .fetch(QueryId::new(42))
            .await
            .unwrap();

        assert_eq!(table.columns, vec!["symbol", "token_address", "volume"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["WETH", "0xc02a", "12.5"]);
        // null cells render as empty strings
        assert_eq!(table.rows[1], vec!["USDC", "0xa0b8", ""]);
    }

    #[tokio::test]
    async fn fetch_surfaces_api_error_body_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query/7/results"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"error": "invalid API Key"})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .fetch(QueryId::new(7))
            .await
            .unwrap_err();

        match err {
            Error::Api {
                query_id,
                status,
                message,
            } => {
                assert_eq!(query_id, QueryId::new(7));
                assert_eq!(status, 403);
                assert_eq!(message, "invalid API Key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        // endpoint-level failures are not transport failures
        let err = Error::Api {
            query_id: QueryId::new(7),
            status: 403,
            message: String::new(),
        };
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn fetch_with_missing_result_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query/9/results"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "execution_id": "01HX",
                "state": "QUERY_STATE_PENDING"
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .fetch(QueryId::new(9))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api { status: 200, .. }));
    }

    #[tokio::test]
    async fn fetch_against_unreachable_server_is_transport_classified() {
        // Nothing listens on this port; connection is refused immediately
        let err = test_client("http://127.0.0.1:1")
            .fetch(QueryId::new(1))
            .await
            .unwrap_err();

        assert!(err.is_transport(), "expected transport error, got {err:?}");
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = DuneClient::new(&ApiConfig {
            api_key: "k".to_string(),
            base_url: "not a url".to_string(),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap_err();

        assert!(matches!(err, Error::Config { .. }), "got {err:?}");
    }

    #[test]
    fn extract_api_error_falls_back_to_raw_body() {
        assert_eq!(extract_api_error(r#"{"error": "nope"}"#), "nope");
        assert_eq!(extract_api_error("  plain text  "), "plain text");
        assert_eq!(extract_api_error(""), "no response body");
    }

    #[test]
    fn render_cell_handles_value_shapes() {
        use serde_json::json;
        assert_eq!(render_cell(None), "");
        assert_eq!(render_cell(Some(&json!(null))), "");
        assert_eq!(render_cell(Some(&json!("0xabc"))), "0xabc");
        assert_eq!(render_cell(Some(&json!(3))), "3");
        assert_eq!(render_cell(Some(&json!(true))), "true");
    }
}
