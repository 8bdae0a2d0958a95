//! Packs registry client: search, fetch, submit, and telemetry.
//!
//! The registry speaks a Connect-style RPC protocol: every method is a
//! `POST <base>/packs.v1.PacksService/<Method>` with a JSON body whose field
//! names follow the protobuf JSON mapping. Failures come back as a non-2xx
//! status with a `{"code": ..., "message": ...}` body.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};
use crate::telemetry::TelemetryEvent;
use crate::types::{Pack, PackSummary, PackType, SearchOptions, SearchPage};

/// Default registry URL.
pub const DEFAULT_REGISTRY_URL: &str = "https://packs-api.fly.dev";

/// Client-side bound on every HTTP call.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const SERVICE_PATH: &str = "packs.v1.PacksService";

/// Build the shared HTTP client used for registry and raw GitHub calls.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("packs/", env!("CARGO_PKG_VERSION")))
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_default()
}

/// What the registry said about a submitted pack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub version: String,
    pub message: String,
}

/// Operations offered by a packs registry.
#[async_trait]
pub trait PackRegistry: Send + Sync {
    /// Search for packs.
    async fn search(&self, options: &SearchOptions) -> Result<SearchPage>;

    /// Fetch a pack, including its content, by name and version.
    async fn get(&self, name: &str, version: &str) -> Result<Pack>;

    /// Submit a GitHub-hosted pack (`owner/repo/path`) for indexing.
    async fn submit(&self, github_ref: &str) -> Result<Submission>;

    /// Record a usage event.
    async fn telemetry(&self, event: &TelemetryEvent) -> Result<()>;
}

/// HTTP client for the packs registry.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http,
        }
    }

    /// Create a client for the default registry.
    pub fn with_default_url() -> Self {
        Self::new(DEFAULT_REGISTRY_URL, http_client())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{SERVICE_PATH}/{method}", self.base_url)
    }

    async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.method_url(method);
        tracing::debug!(url = %url, "registry call");

        let response = self
            .http
            .post(&url)
            .header("Connect-Protocol-Version", "1")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<WireError>(&body) {
                Ok(err) => PackError::Registry {
                    code: err.code,
                    message: err.message,
                },
                Err(_) => PackError::Registry {
                    code: code_for_status(status).to_owned(),
                    message: format!("{method} failed: HTTP {status}"),
                },
            });
        }

        Ok(response.json().await?)
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::with_default_url()
    }
}

#[async_trait]
impl PackRegistry for RegistryClient {
    async fn search(&self, options: &SearchOptions) -> Result<SearchPage> {
        let request = SearchRequest {
            query: &options.query,
            pack_type: options.pack_type.and_then(pack_type_to_wire),
            tags: &options.tags,
            author: options.author.as_deref().unwrap_or_default(),
            limit: options.limit,
            offset: options.offset,
            sort: options.sort.as_str(),
        };

        let response: SearchResponse = self.call("Search", &request).await?;
        Ok(SearchPage {
            packs: response
                .packs
                .into_iter()
                .map(|p| p.into_pack().summary)
                .collect(),
            total: response.total,
        })
    }

    async fn get(&self, name: &str, version: &str) -> Result<Pack> {
        let request = GetRequest { name, version };
        let response: GetResponse = self.call("Get", &request).await?;
        match response.pack {
            Some(pack) => Ok(pack.into_pack()),
            None => Err(PackError::Registry {
                code: "not_found".into(),
                message: format!("no pack named `{name}@{version}`"),
            }),
        }
    }

    async fn submit(&self, github_ref: &str) -> Result<Submission> {
        let request = SubmitRequest { github_ref };
        let response: SubmitResponse = self.call("Submit", &request).await?;
        Ok(Submission {
            name: response.name,
            version: response.version,
            message: response.message,
        })
    }

    async fn telemetry(&self, event: &TelemetryEvent) -> Result<()> {
        let _: serde_json::Value = self.call("Telemetry", event).await?;
        Ok(())
    }
}

/// Map an HTTP status to the closest Connect error code.
fn code_for_status(status: reqwest::StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "invalid_argument",
        401 => "unauthenticated",
        403 => "permission_denied",
        404 => "not_found",
        409 => "already_exists",
        429 => "resource_exhausted",
        502..=504 => "unavailable",
        _ => "unknown",
    }
}

fn pack_type_to_wire(pack_type: PackType) -> Option<&'static str> {
    match pack_type {
        PackType::Skill => Some("PACK_TYPE_SKILL"),
        PackType::Context => Some("PACK_TYPE_CONTEXT"),
        PackType::Prompt => Some("PACK_TYPE_PROMPT"),
        PackType::Unknown => None,
    }
}

/// Protobuf JSON allows enums as either their name or their number.
fn pack_type_from_wire(value: &serde_json::Value) -> PackType {
    match value {
        serde_json::Value::String(s) => match s.as_str() {
            "PACK_TYPE_SKILL" => PackType::Skill,
            "PACK_TYPE_CONTEXT" => PackType::Context,
            "PACK_TYPE_PROMPT" => PackType::Prompt,
            _ => PackType::Unknown,
        },
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(1) => PackType::Skill,
            Some(2) => PackType::Context,
            Some(3) => PackType::Prompt,
            _ => PackType::Unknown,
        },
        _ => PackType::Unknown,
    }
}

// --- Wire types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pack_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: &'a Vec<String>,
    author: &'a str,
    limit: i32,
    offset: i32,
    sort: &'a str,
}

#[derive(Debug, Serialize)]
struct GetRequest<'a> {
    name: &'a str,
    version: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    github_ref: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    packs: Vec<WirePack>,
    #[serde(default)]
    total: i32,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    pack: Option<WirePack>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SubmitResponse {
    name: String,
    version: String,
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WirePack {
    name: String,
    version: String,
    #[serde(rename = "type")]
    pack_type: serde_json::Value,
    description: String,
    author: String,
    stars: i32,
    tags: Vec<String>,
    content: String,
    github_ref: String,
}

impl WirePack {
    fn into_pack(self) -> Pack {
        Pack {
            summary: PackSummary {
                pack_type: pack_type_from_wire(&self.pack_type),
                name: self.name,
                version: self.version,
                description: self.description,
                author: self.author,
                stars: self.stars,
                tags: self.tags,
            },
            content: self.content,
            github_ref: Some(self.github_ref).filter(|r| !r.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_url_joins_service_path() {
        let client = RegistryClient::new("https://registry.example.com/", reqwest::Client::new());
        assert_eq!(client.base_url(), "https://registry.example.com");
        assert_eq!(
            client.method_url("Get"),
            "https://registry.example.com/packs.v1.PacksService/Get"
        );
    }

    #[test]
    fn default_registry_url() {
        let client = RegistryClient::default();
        assert_eq!(client.base_url(), DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn pack_type_wire_names_and_numbers() {
        assert_eq!(
            pack_type_from_wire(&serde_json::json!("PACK_TYPE_CONTEXT")),
            PackType::Context
        );
        assert_eq!(pack_type_from_wire(&serde_json::json!(3)), PackType::Prompt);
        assert_eq!(
            pack_type_from_wire(&serde_json::Value::Null),
            PackType::Unknown
        );
        assert_eq!(pack_type_to_wire(PackType::Skill), Some("PACK_TYPE_SKILL"));
        assert_eq!(pack_type_to_wire(PackType::Unknown), None);
    }

    #[test]
    fn wire_pack_with_missing_fields() {
        let wire: WirePack =
            serde_json::from_str(r#"{"name":"humanizer","githubRef":"blader/humanizer"}"#).unwrap();
        let pack = wire.into_pack();
        assert_eq!(pack.summary.name, "humanizer");
        assert_eq!(pack.summary.pack_type, PackType::Unknown);
        assert_eq!(pack.github_ref.as_deref(), Some("blader/humanizer"));
        assert!(pack.content.is_empty());
    }

    #[test]
    fn search_request_uses_camel_case_and_skips_empty() {
        let request = SearchRequest {
            query: "git",
            pack_type: None,
            tags: &Vec::new(),
            author: "",
            limit: 20,
            offset: 0,
            sort: "stars",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["query"], "git");
        assert!(json.get("type").is_none());
        assert!(json.get("tags").is_none());
        assert_eq!(json["limit"], 20);
    }

    #[test]
    fn status_codes_map_to_connect_codes() {
        assert_eq!(code_for_status(reqwest::StatusCode::NOT_FOUND), "not_found");
        assert_eq!(
            code_for_status(reqwest::StatusCode::SERVICE_UNAVAILABLE),
            "unavailable"
        );
        assert_eq!(
            code_for_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            "unknown"
        );
    }
}
