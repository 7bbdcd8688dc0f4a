//! Meilisearch implementation of [`SearchIndex`]
//!
//! Talks to the REST API directly:
//! - `POST /indexes/{uid}/documents?primaryKey=...` with a JSON array
//! - `POST /indexes/{uid}/search` with `{"q": ...}`
//! - `GET /tasks/{uid}`

use super::error::IndexError;
use super::traits::SearchIndex;
use super::types::{Document, TaskInfo};
use crate::config::IndexSettings;
use crate::network::{HttpClient, HttpRequest, HttpResponse};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

/// Meilisearch index client
#[derive(Clone)]
pub struct MeiliClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    index: String,
    primary_key: String,
}

impl MeiliClient {
    pub fn new(http: HttpClient, settings: &IndexSettings) -> Self {
        Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            index: settings.name.clone(),
            primary_key: settings.primary_key.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, IndexError> {
        let request = match self.api_key {
            Some(ref key) => request.bearer(key),
            None => request,
        };

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(IndexError::Status {
                status: response.status,
                body: response.text,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl SearchIndex for MeiliClient {
    fn name(&self) -> &str {
        &self.index
    }

    async fn add_documents(&self, documents: &[Document]) -> Result<TaskInfo, IndexError> {
        let url = self.endpoint(&format!("indexes/{}/documents", self.index));
        let request = HttpRequest::post(url)
            .param("primaryKey", self.primary_key.as_str())
            .json(serde_json::to_value(documents)?);

        let response = self.send(request).await?;
        let task: TaskInfo = response.json()?;
        debug!("Enqueued {} documents as task {}", documents.len(), task.uid);
        Ok(task)
    }

    async fn search(&self, query: &str) -> Result<Vec<Value>, IndexError> {
        let url = self.endpoint(&format!("indexes/{}/search", self.index));
        let request = HttpRequest::post(url).json(json!({ "q": query }));

        let response = self.send(request).await?;
        let mut body: Value = response.json()?;

        match body.get_mut("hits").map(Value::take) {
            Some(Value::Array(hits)) => Ok(hits),
            _ => Err(IndexError::MalformedResponse(
                "search response has no hits array".to_string(),
            )),
        }
    }

    async fn task(&self, uid: u64) -> Result<TaskInfo, IndexError> {
        let url = self.endpoint(&format!("tasks/{}", uid));
        let response = self.send(HttpRequest::get(url)).await?;
        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TaskStatus;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> MeiliClient {
        let settings = IndexSettings {
            url: format!("{}/", server.uri()),
            ..Default::default()
        };
        MeiliClient::new(HttpClient::new().unwrap(), &settings)
    }

    #[tokio::test]
    async fn test_search_returns_hits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/indexes/tracks/search"))
            .and(header("Authorization", "Bearer masterKey"))
            .and(body_json(json!({"q": "love"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": [{"track_id": "1", "title": "Love Song"}],
                "query": "love",
                "processingTimeMs": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let hits = client_for(&server).search("love").await.unwrap();
        assert_eq!(hits, vec![json!({"track_id": "1", "title": "Love Song"})]);
    }

    #[tokio::test]
    async fn test_search_without_hits_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/indexes/tracks/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"query": "love"})))
            .mount(&server)
            .await;

        let err = client_for(&server).search("love").await.unwrap_err();
        assert!(matches!(err, IndexError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/indexes/tracks/search"))
            .respond_with(ResponseTemplate::new(404).set_body_string("index not found"))
            .mount(&server)
            .await;

        let err = client_for(&server).search("love").await.unwrap_err();
        match err {
            IndexError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "index not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_add_documents_posts_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/indexes/tracks/documents"))
            .and(query_param("primaryKey", "track_id"))
            .and(body_json(json!([
                {"track_id": "42", "title": "Song Title"},
                {"track_id": "43", "title": "Other"}
            ])))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "taskUid": 3,
                "indexUid": "tracks",
                "status": "enqueued",
                "type": "documentAdditionOrUpdate"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let docs = vec![Document::new("42", "Song Title"), Document::new("43", "Other")];
        let task = client_for(&server).add_documents(&docs).await.unwrap();
        assert_eq!(task.uid, 3);
        assert_eq!(task.status, TaskStatus::Enqueued);
    }

    #[tokio::test]
    async fn test_task_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uid": 3,
                "status": "succeeded",
                "error": null
            })))
            .mount(&server)
            .await;

        let task = client_for(&server).task(3).await.unwrap();
        assert_eq!(task.status, TaskStatus::Succeeded);
    }
}
