// 7.2: live provider. one GET against the public data-package gateway, then
// normalization of whatever the signers sent. bad entries are dropped with a
// warning; the fetch only fails if nothing usable is left.
//
// response shape (keyed by feed id):
//   { "ETH": [ { "timestampMilliseconds": .., "signature": "..",
//                "dataPoints": [ { "dataFeedId": "ETH", "value": .., "decimals"?: .. } ] } ] }
// entries may also arrive wrapped as { "dataPackage": {..}, "signature": .. }.

use super::decode::decode_value;
use super::{ObservationBatch, PriceSource, SourceError};
use crate::config::SimulatorConfig;
use crate::types::{Observation, SourceMode, Timestamp};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Signature components are concatenated and cut to address length.
const SIGNATURE_COMPONENT_LEN: usize = 42;

pub struct HttpPriceSource {
    client: Client,
    gateway_url: String,
    data_service_id: String,
}

impl HttpPriceSource {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            data_service_id: config.data_service_id.clone(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/data-packages/latest/{}", self.gateway_url, self.data_service_id)
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    fn mode(&self) -> SourceMode {
        SourceMode::Live
    }

    async fn fetch_observations(
        &self,
        feed_id: &str,
        signer_count: usize,
    ) -> Result<ObservationBatch, SourceError> {
        let url = self.endpoint();
        debug!(%url, feed = feed_id, signer_count, "requesting data packages");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Unreachable {
                feed: feed_id.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::BadStatus {
                feed: feed_id.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(|e| SourceError::Malformed {
            feed: feed_id.to_string(),
            reason: e.to_string(),
        })?;

        let batch = decode_feed_response(&body, feed_id, signer_count)?;
        info!(feed = feed_id, observations = batch.len(), "live observations fetched");
        Ok(batch)
    }
}

/// Normalize a gateway response body into observations for `feed_id`.
/// Only the first `signer_count` packages are considered; ids keep each
/// package's position, so a dropped entry leaves a gap in the numbering.
pub fn decode_feed_response(
    body: &Value,
    feed_id: &str,
    signer_count: usize,
) -> Result<ObservationBatch, SourceError> {
    let packages = feed_packages(body, feed_id)?;

    let mut observations = Vec::new();
    let mut signatures = Vec::new();

    for (idx, entry) in packages.iter().take(signer_count.max(1)).enumerate() {
        match decode_entry(entry, feed_id, idx) {
            Ok((observation, signature)) => {
                observations.push(observation);
                signatures.push(signature);
            }
            Err(reason) => {
                warn!(feed = feed_id, signer = idx + 1, reason, "dropping malformed entry");
            }
        }
    }

    if observations.is_empty() {
        return Err(SourceError::NoUsableObservations(feed_id.to_string()));
    }
    Ok(ObservationBatch::new(observations, signatures))
}

fn feed_packages<'a>(body: &'a Value, feed_id: &str) -> Result<&'a Vec<Value>, SourceError> {
    let object = body.as_object().ok_or_else(|| SourceError::Malformed {
        feed: feed_id.to_string(),
        reason: "expected a JSON object keyed by feed".to_string(),
    })?;

    let packages = object
        .get(feed_id)
        .or_else(|| {
            object
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(feed_id))
                .map(|(_, v)| v)
        })
        .ok_or_else(|| SourceError::FeedMissing(feed_id.to_string()))?;

    packages.as_array().ok_or_else(|| SourceError::Malformed {
        feed: feed_id.to_string(),
        reason: "feed entry is not an array".to_string(),
    })
}

fn decode_entry(entry: &Value, feed_id: &str, idx: usize) -> Result<(Observation, String), &'static str> {
    if !entry.is_object() {
        return Err("entry is not an object");
    }
    let package = entry.get("dataPackage").unwrap_or(entry);

    let points = package
        .get("dataPoints")
        .and_then(Value::as_array)
        .filter(|points| !points.is_empty())
        .ok_or("no data points")?;

    // prefer the point for this feed, fall back to the first one
    let point = points
        .iter()
        .find(|p| {
            p.get("dataFeedId")
                .and_then(Value::as_str)
                .is_some_and(|id| id.eq_ignore_ascii_case(feed_id))
        })
        .unwrap_or(&points[0]);

    let value = decode_value(point.get("value"), point.get("decimals"))?;

    let raw_ts = point
        .get("timestamp")
        .and_then(epoch_number)
        .or_else(|| package.get("timestampMilliseconds").and_then(epoch_number))
        .or_else(|| package.get("timestamp").and_then(epoch_number))
        .ok_or("missing timestamp")?;

    let signature = entry
        .get("signature")
        .or_else(|| package.get("signature"))
        .map(signature_text)
        .unwrap_or_default();

    Ok((
        Observation::new(Observation::signer_id(idx), value, Timestamp::from_epoch_guess(raw_ts)),
        signature,
    ))
}

// non-positive epochs are treated as missing
fn epoch_number(v: &Value) -> Option<i64> {
    let raw = match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    raw.filter(|ts| *ts > 0)
}

fn signature_text(sig: &Value) -> String {
    match sig {
        Value::String(s) => s.clone(),
        Value::Object(parts) => {
            let part = |k: &str| match parts.get(k) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            };
            let joined = format!("{}{}{}", part("r"), part("s"), part("v"));
            joined.chars().take(SIGNATURE_COMPONENT_LEN).collect()
        }
        _ => String::new(),
    }
}
