//! TomTom Traffic Incident Details client.
//!
//! Issues one `GET` per call with `key`, `bbox` and `t` query parameters.
//! Anything but `200 OK` is an error; there is no retry or pagination.
//!
//! See <https://developer.tomtom.com/traffic-api/documentation/traffic-incidents/incident-details>

use async_trait::async_trait;
use traffic_map_incident_models::BoundingBox;

use crate::service::TomTomConfig;
use crate::{IncidentError, IncidentSource};

/// Builds the query parameters for one incident request.
#[must_use]
pub fn query_params(
    api_key: &str,
    bbox: &BoundingBox,
    timestamp: &str,
) -> [(&'static str, String); 3] {
    [
        ("key", api_key.to_string()),
        ("bbox", bbox.to_query_param()),
        ("t", timestamp.to_string()),
    ]
}

/// Fetches the raw incident payload for a bounding box.
///
/// # Errors
///
/// Returns [`IncidentError`] if the request fails, the provider answers
/// with a non-200 status, or the body is not JSON.
pub async fn fetch_incidents(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    bbox: &BoundingBox,
    timestamp: &str,
) -> Result<serde_json::Value, IncidentError> {
    log::debug!("Requesting incidents for bbox {}", bbox.to_query_param());

    let resp = client
        .get(base_url)
        .query(&query_params(api_key, bbox, timestamp))
        .send()
        .await?;

    let status = resp.status().as_u16();
    let body = resp.text().await?;

    parse_response(status, &body)
}

/// Interprets a provider response.
fn parse_response(status: u16, body: &str) -> Result<serde_json::Value, IncidentError> {
    if status != 200 {
        return Err(IncidentError::Status {
            status,
            body: body.to_string(),
        });
    }

    Ok(serde_json::from_str(body)?)
}

/// [`IncidentSource`] backed by the TomTom API.
pub struct TomTomClient {
    client: reqwest::Client,
    config: TomTomConfig,
}

impl TomTomClient {
    #[must_use]
    pub fn new(config: TomTomConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    #[must_use]
    pub const fn with_client(client: reqwest::Client, config: TomTomConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl IncidentSource for TomTomClient {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn fetch(&self, bbox: &BoundingBox) -> Result<serde_json::Value, IncidentError> {
        fetch_incidents(
            &self.client,
            &self.config.base_url,
            &self.config.api_key,
            bbox,
            &self.config.timestamp,
        )
        .await
    }
}
