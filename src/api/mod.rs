//! Typed client for the remote blog service.
//!
//! Every operation runs as a spawned task on the shared tokio runtime and
//! reports its outcome back to the UI thread as an [`AppEvent`]. The client
//! itself holds no application state.

use crate::event::{AppEvent, MutationKind};
use crate::history::{Author, ChatMessage};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::time::{self, Duration};

/// The remote API host. Fixed at build time, not runtime-configurable.
pub const BASE_URL: &str = "https://api.blog.omnicassion.com";

const SCHEDULE_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("tokio runtime unavailable: {0}")]
    Runtime(String),
    #[error("failed to build HTTP client: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Server(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

// ==============================
// Wire types
// ==============================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Scheduled,
    Completed,
    Failed,
}

impl BlogStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

/// Which collection a blog was routed into the editor from. Client-only
/// annotation, never sent back to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogSource {
    Saved,
    #[default]
    Schedule,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub title_image: Option<String>,
    #[serde(default)]
    pub status: BlogStatus,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub is_saved: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(skip)]
    pub source: BlogSource,
}

/// One turn of conversation as the generation endpoint expects it.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    pub author: Author,
    pub text: String,
}

impl From<&ChatMessage> for HistoryItem {
    fn from(message: &ChatMessage) -> Self {
        Self {
            author: message.author,
            text: message.text.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    history: Vec<HistoryItem>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    blog: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub topic: String,
    pub scheduled_time: String,
    pub title_image: Option<String>,
    pub category: String,
    pub priority: String,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest {
    content: String,
    title_image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveRefinedRequest {
    topic: String,
    content: String,
    title_image: Option<String>,
}

#[derive(Debug, Serialize)]
struct SaveGeneratedRequest {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Which caller a generation request belongs to, so the reply lands in the
/// right part of the UI.
#[derive(Debug, Clone, Copy)]
pub enum GenerationTarget {
    Chat,
    Refine,
}

// ==============================
// Response plumbing
// ==============================

fn net(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.error {
            return message;
        }
    }
    format!("server responded with status {status}")
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Server(error_message(status, &body)))
}

async fn fetch_blogs(http: &reqwest::Client, url: String) -> Result<Vec<Blog>, ApiError> {
    let response = http.get(&url).send().await.map_err(net)?;
    let response = check(response).await?;
    response
        .json()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

fn finish_mutation(
    tx: &mpsc::Sender<AppEvent>,
    kind: MutationKind,
    context: &str,
    result: Result<(), ApiError>,
) {
    let event = match result {
        Ok(()) => AppEvent::MutationDone(kind),
        Err(err) => AppEvent::MutationFailed(format!("{context}: {err}")),
    };
    let _ = tx.send(event);
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tx: mpsc::Sender<AppEvent>) -> Result<Self, ApiError> {
        let runtime_handle =
            Handle::try_current().map_err(|err| ApiError::Runtime(err.to_string()))?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::Build(err.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            tx,
            runtime_handle,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    pub fn fetch_saved(&self) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = self.url("saved-blogs");

        self.runtime_handle.spawn(async move {
            let event = match fetch_blogs(&http, url).await {
                Ok(blogs) => AppEvent::SavedFetched(blogs),
                Err(err) => AppEvent::FetchFailed {
                    what: "saved blogs",
                    message: err.to_string(),
                },
            };
            let _ = tx.send(event);
        });
    }

    pub fn fetch_scheduled(&self) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = self.url("scheduled-blogs");

        self.runtime_handle.spawn(async move {
            let event = match fetch_blogs(&http, url).await {
                Ok(blogs) => AppEvent::ScheduledFetched(blogs),
                Err(err) => AppEvent::FetchFailed {
                    what: "scheduled blogs",
                    message: err.to_string(),
                },
            };
            let _ = tx.send(event);
        });
    }

    /// Poll the scheduled collection on a fixed interval until `alive` is
    /// cleared. A slow response may race the next tick; the result is only
    /// stale data, never corruption.
    pub fn spawn_schedule_poller(&self, alive: Arc<AtomicBool>) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = self.url("scheduled-blogs");

        self.runtime_handle.spawn(async move {
            let mut ticker = time::interval(SCHEDULE_POLL_INTERVAL);
            // The initial fetch is issued separately; skip the immediate tick.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if !alive.load(Ordering::SeqCst) {
                    break;
                }
                let event = match fetch_blogs(&http, url.clone()).await {
                    Ok(blogs) => AppEvent::ScheduledFetched(blogs),
                    Err(err) => AppEvent::FetchFailed {
                        what: "scheduled blogs",
                        message: err.to_string(),
                    },
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
    }

    pub fn generate(&self, history: Vec<HistoryItem>, target: GenerationTarget) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = self.url("generate-blog");

        self.runtime_handle.spawn(async move {
            let result = async {
                let response = http
                    .post(&url)
                    .json(&GenerateRequest { history })
                    .send()
                    .await
                    .map_err(net)?;
                let response = check(response).await?;
                let data: GenerateResponse = response
                    .json()
                    .await
                    .map_err(|err| ApiError::Decode(err.to_string()))?;
                Ok::<_, ApiError>(data.blog)
            }
            .await;

            let event = match (target, result) {
                (GenerationTarget::Chat, Ok(text)) => AppEvent::ChatReply(text),
                (GenerationTarget::Chat, Err(err)) => AppEvent::ChatFailed(err.to_string()),
                (GenerationTarget::Refine, Ok(text)) => AppEvent::RefineReply(text),
                (GenerationTarget::Refine, Err(err)) => AppEvent::RefineFailed(err.to_string()),
            };
            let _ = tx.send(event);
        });
    }

    pub fn update_blog(
        &self,
        id: String,
        content: String,
        title_image: Option<String>,
        source: BlogSource,
    ) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = self.url(&format!("update-blog/{id}"));

        self.runtime_handle.spawn(async move {
            let result = async {
                let response = http
                    .put(&url)
                    .json(&UpdateRequest {
                        content,
                        title_image,
                    })
                    .send()
                    .await
                    .map_err(net)?;
                check(response).await.map(|_| ())
            }
            .await;
            finish_mutation(
                &tx,
                MutationKind::Update { source },
                "Failed to save changes",
                result,
            );
        });
    }

    pub fn save_to_library(&self, id: String) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = self.url(&format!("save-blog/{id}"));

        self.runtime_handle.spawn(async move {
            let result = async {
                let response = http.post(&url).send().await.map_err(net)?;
                check(response).await.map(|_| ())
            }
            .await;
            finish_mutation(
                &tx,
                MutationKind::SaveToLibrary,
                "Failed to save blog to library",
                result,
            );
        });
    }

    pub fn delete_blog(&self, id: String) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = self.url(&format!("blogs/{id}"));

        self.runtime_handle.spawn(async move {
            let result = async {
                let response = http.delete(&url).send().await.map_err(net)?;
                check(response).await.map(|_| ())
            }
            .await;
            finish_mutation(&tx, MutationKind::Delete, "Failed to delete blog", result);
        });
    }

    pub fn schedule_blog(&self, request: ScheduleRequest) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = self.url("schedule-blog");

        self.runtime_handle.spawn(async move {
            let result = async {
                let response = http.post(&url).json(&request).send().await.map_err(net)?;
                check(response).await.map(|_| ())
            }
            .await;
            finish_mutation(
                &tx,
                MutationKind::Schedule,
                "Failed to schedule blog post",
                result,
            );
        });
    }

    pub fn save_refined(&self, topic: String, content: String) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = self.url("saved-blogs");

        self.runtime_handle.spawn(async move {
            let result = async {
                let response = http
                    .post(&url)
                    .json(&SaveRefinedRequest {
                        topic,
                        content,
                        title_image: None,
                    })
                    .send()
                    .await
                    .map_err(net)?;
                check(response).await.map(|_| ())
            }
            .await;
            finish_mutation(
                &tx,
                MutationKind::SaveRefined,
                "Failed to save the refined blog",
                result,
            );
        });
    }

    pub fn save_generated(&self, content: String) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = self.url("save-generated-blog");

        self.runtime_handle.spawn(async move {
            let result = async {
                let response = http
                    .post(&url)
                    .json(&SaveGeneratedRequest { content })
                    .send()
                    .await
                    .map_err(net)?;
                check(response).await.map(|_| ())
            }
            .await;
            finish_mutation(
                &tx,
                MutationKind::SaveGenerated,
                "Failed to save the blog",
                result,
            );
        });
    }

    /// Delete every scheduled blog, all requests in flight at once. Transport
    /// failures collapse into a single generic message; individual non-2xx
    /// responses are tolerated, matching the aggregate-settle semantics.
    pub fn clear_scheduled(&self, ids: Vec<String>) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let base_url = self.base_url.clone();

        self.runtime_handle.spawn(async move {
            let deletes = ids.into_iter().map(|id| {
                let http = http.clone();
                let url = format!("{base_url}/blogs/{id}");
                async move { http.delete(&url).send().await }
            });
            let results = futures::future::join_all(deletes).await;

            let event = if results.iter().any(|result| result.is_err()) {
                AppEvent::MutationFailed("Failed to clear scheduled blogs.".to_string())
            } else {
                AppEvent::MutationDone(MutationKind::ClearScheduled)
            };
            let _ = tx.send(event);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blog_deserializes_from_wire_names() {
        let blog: Blog = serde_json::from_value(json!({
            "_id": "abc123",
            "topic": "Cats",
            "content": "# Cats\nbody",
            "titleImage": "data:image/png;base64,xyz",
            "status": "completed",
            "scheduledTime": "2026-09-01T10:00",
            "isSaved": true,
            "createdAt": "2026-08-30T12:00:00Z"
        }))
        .expect("blog should deserialize");

        assert_eq!(blog.id, "abc123");
        assert_eq!(blog.status, BlogStatus::Completed);
        assert_eq!(blog.title_image.as_deref(), Some("data:image/png;base64,xyz"));
        assert_eq!(blog.is_saved, Some(true));
        assert_eq!(blog.source, BlogSource::Schedule);
    }

    #[test]
    fn blog_with_minimal_fields_deserializes() {
        let blog: Blog = serde_json::from_value(json!({ "_id": "x" }))
            .expect("minimal blog should deserialize");
        assert_eq!(blog.status, BlogStatus::Scheduled);
        assert!(blog.content.is_none());
    }

    #[test]
    fn blog_serialization_never_includes_source() {
        let blog = Blog {
            id: "abc".to_string(),
            topic: "t".to_string(),
            source: BlogSource::Saved,
            ..Blog::default()
        };
        let value = serde_json::to_value(&blog).expect("blog should serialize");
        assert!(value.get("source").is_none());
        assert_eq!(value.get("_id"), Some(&json!("abc")));
    }

    #[test]
    fn generate_request_carries_ordered_history() {
        let request = GenerateRequest {
            history: vec![
                HistoryItem {
                    author: Author::User,
                    text: "Write about cats".to_string(),
                },
                HistoryItem {
                    author: Author::Ai,
                    text: "# Cats".to_string(),
                },
            ],
        };
        let value = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(
            value,
            json!({
                "history": [
                    { "author": "user", "text": "Write about cats" },
                    { "author": "ai", "text": "# Cats" }
                ]
            })
        );
    }

    #[test]
    fn schedule_request_uses_wire_field_names() {
        let request = ScheduleRequest {
            topic: "Cats".to_string(),
            scheduled_time: "2026-09-01T10:00".to_string(),
            title_image: None,
            category: "general".to_string(),
            priority: "medium".to_string(),
            content: None,
        };
        let value = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(value.get("scheduledTime"), Some(&json!("2026-09-01T10:00")));
        assert_eq!(value.get("titleImage"), Some(&json!(null)));
        assert_eq!(value.get("priority"), Some(&json!("medium")));
    }

    #[test]
    fn error_message_prefers_server_error_field() {
        let message = error_message(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error":"topic is required"}"#,
        );
        assert_eq!(message, "topic is required");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        let message = error_message(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert!(message.contains("500"));
    }
}
