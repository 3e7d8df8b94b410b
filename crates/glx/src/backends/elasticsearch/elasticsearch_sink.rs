use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::backends::Sink;
use crate::common::EnrichedItem;
use crate::composers::{BulkComposer, Composer};

// 📡 ElasticsearchSinkConfig — the address, the door, and the keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticsearchSinkConfig {
    /// 📡 Where to send the documents. `http://localhost:9200`, probably.
    pub url: String,
    /// 📦 The enriched index. Every document in a run lands here.
    pub index: String,
    /// 🔒 Username. The bouncer at the club. Except the club is a database.
    #[serde(default)]
    pub username: Option<String>,
    /// 🔒 Password. "password123" is not a password. It is a confession.
    #[serde(default)]
    pub password: Option<String>,
    /// 🔒 API key — the velvet rope variant of authentication. Wins over basic auth.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ElasticsearchSinkConfig {
    fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// 🧾 The slice of a `_bulk` response we care about. ES sends a lot more; serde ignores it.
#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<Map<String, Value>>,
}

/// 🧾 One entry under `items[n].<action>`.
#[derive(Debug, Deserialize)]
struct BulkItemResult {
    status: u16,
    #[serde(default)]
    error: Option<Value>,
}

impl BulkResponse {
    /// ✅ How many documents the cluster actually kept. A failed item still
    /// gets logged, because "2 missing" is useless without the reason.
    fn accepted(&self) -> usize {
        let mut accepted = 0;
        for entry in &self.items {
            for (action, result) in entry {
                match serde_json::from_value::<BulkItemResult>(result.clone()) {
                    Ok(result) if (200..300).contains(&result.status) => accepted += 1,
                    Ok(result) => {
                        // 🧯 bound outside warn!: its expansion brings tracing's `Value` trait into scope
                        let reason = result.error.unwrap_or(Value::Null);
                        warn!(
                            "⚠️ bulk {} rejected a document with status {}: {}",
                            action, result.status, reason
                        );
                    }
                    Err(err) => warn!("⚠️ unreadable bulk item result for '{}': {}", action, err),
                }
            }
        }
        accepted
    }
}

/// 📡 The sink side of the Elasticsearch backend — one `_bulk` POST per flush.
///
/// Internally holds:
/// - `client`: the HTTP muscle 💪, reused across requests
/// - `sink_config`: auth, URL, index
///
/// 🔄 This sink does not retry. A transport failure or a non-2xx status is an
/// `Err` and ends the run. Per-item rejections are not errors; they just make
/// the returned count smaller.
#[derive(Debug)]
pub struct ElasticsearchSink {
    client: reqwest::Client,
    sink_config: ElasticsearchSinkConfig,
}

impl ElasticsearchSink {
    /// 🚀 Stand up a new `ElasticsearchSink`, fully wired.
    ///
    /// 1. Builds the `reqwest::Client` with sane timeouts (10s connect, 30s total).
    /// 2. Pings the cluster root to confirm the URL is real and auth works.
    /// 3. Looks for the index. A missing index only earns a warning: the first
    ///    bulk request creates it with dynamic mappings.
    pub async fn new(sink_config: ElasticsearchSinkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .context("💀 The HTTP client refused to be born. The TLS stack wept. We tried to build a reqwest::Client and the universe said 'no'.")?;
        let sink = Self {
            client,
            sink_config,
        };

        // 📡 "Hello? Is this thing on?" — fail here, not 50,000 documents later.
        let ping = sink
            .authorized(sink.client.get(sink.sink_config.base_url()))
            .send()
            .await
            .with_context(|| {
                format!(
                    "💀 Knocked on '{}' and nobody answered. Is Elasticsearch running? Is the URL right? Is the firewall on a power trip again?",
                    sink.sink_config.url
                )
            })?;
        if !ping.status().is_success() {
            anyhow::bail!(
                "💀 Elasticsearch at '{}' answered the ping with '{}'. Check the credentials.",
                sink.sink_config.url,
                ping.status()
            );
        }

        let index_url = format!("{}/{}", sink.sink_config.base_url(), sink.sink_config.index);
        match sink.authorized(sink.client.get(&index_url)).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("✅ index '{}' exists and is accepting visitors", sink.sink_config.index);
            }
            Ok(response) => warn!(
                "⚠️ index '{}' answered '{}'; the first bulk request will create it with dynamic mappings",
                sink.sink_config.index,
                response.status()
            ),
            Err(err) => warn!(
                "⚠️ could not check index '{}': {}",
                sink.sink_config.index, err
            ),
        }

        Ok(sink)
    }

    // 🔒 API key beats basic auth in this club. Neither is fine too.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.sink_config.api_key {
            request.header("Authorization", format!("ApiKey {}", api_key))
        } else if let Some(ref username) = self.sink_config.username {
            request.basic_auth(username, self.sink_config.password.as_ref())
        } else {
            request
        }
    }

    /// 📡 Fires one `_bulk` POST and returns the parsed response.
    async fn submit_bulk_request(&self, request_body: String) -> Result<BulkResponse> {
        let bulk_url = format!(
            "{}/{}/_bulk",
            self.sink_config.base_url(),
            self.sink_config.index
        );
        let response = self
            .authorized(self.client.post(&bulk_url))
            // ⚠️ application/x-ndjson, not application/json. ES answers 406 otherwise.
            .header("Content-Type", "application/x-ndjson")
            .body(request_body)
            .send()
            .await
            .context("💀 The bulk request never made it to Elasticsearch. We launched the payload into the network and the network was not vibing with it. Check connectivity, check timeouts, check your feelings.")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("💀 Elasticsearch answered, then trailed off mid-sentence.")?;
        if !status.is_success() {
            anyhow::bail!(
                "💀 The bulk request arrived, but Elasticsearch looked at our documents and said '{}'. The body of the response read: '{}'. We have no one to blame but ourselves, and possibly whoever wrote the mapping.",
                status,
                body
            );
        }
        serde_json::from_str(&body).with_context(|| {
            format!("💀 The _bulk response was not the JSON we were promised: '{}'", body)
        })
    }
}

#[async_trait]
impl Sink for ElasticsearchSink {
    async fn bulk_upload(&mut self, items: Vec<EnrichedItem>, id_field: &str) -> Result<usize> {
        let composed = BulkComposer.compose(&items, id_field)?;
        if composed.submitted == 0 {
            trace!("🤷 nothing addressable in this batch, not bothering the cluster");
            return Ok(0);
        }
        debug!(
            "📡 sending {} documents ({} bytes) to {}/_bulk",
            composed.submitted,
            composed.payload.len(),
            self.sink_config.index
        );
        let response = self
            .submit_bulk_request(composed.payload)
            .await
            .context("💀 The bulk submission stumbled at the finish line.")?;
        let accepted = response.accepted();
        if response.errors {
            warn!(
                "⚠️ bulk response flagged errors: {}/{} documents accepted",
                accepted, composed.submitted
            );
        }
        Ok(accepted)
    }

    /// 🗑️ Nothing to flush. The connection pool says goodbye on drop.
    async fn close(&mut self) -> Result<()> {
        debug!("🗑️ Elasticsearch sink closing — no buffer to flush, just vibes to release");
        Ok(())
    }
}
