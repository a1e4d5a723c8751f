//! Kaggle API client implementation

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use urlencoding::encode;

use crate::adapters::kaggle::credentials::KaggleCredentials;
use crate::domain::entities::SubmissionRecord;
use crate::domain::ports::Leaderboard;
use crate::error::LeaderboardError;

/// Upper bound on submission pages fetched for one competition
const MAX_SUBMISSION_PAGES: u32 = 50;

/// Implementation of the leaderboard port against the Kaggle API
pub struct KaggleClientImpl {
    http: Client,
    api_url: String,
    web_url: String,
    config_dir: PathBuf,
    credentials: RwLock<Option<KaggleCredentials>>,
}

impl KaggleClientImpl {
    pub fn new(api_url: String, web_url: String, config_dir: PathBuf) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            web_url: web_url.trim_end_matches('/').to_string(),
            config_dir,
            credentials: RwLock::new(None),
        }
    }

    fn api_path(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
        competition: &str,
    ) -> Result<T, LeaderboardError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| LeaderboardError::Deserialization(e.to_string()))
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(LeaderboardError::Unauthorized)
        } else if status.as_u16() == 404 {
            Err(LeaderboardError::CompetitionNotFound(competition.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(LeaderboardError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Response types from the Kaggle API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionResponse {
    #[serde(default)]
    public_score: Value,
    #[serde(default)]
    private_score: Value,
    #[serde(default)]
    submitted_by: Option<String>,
    #[serde(default)]
    submitted_by_ref: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<SubmissionResponse> for SubmissionRecord {
    fn from(r: SubmissionResponse) -> Self {
        SubmissionRecord {
            private_score: parse_score(&r.private_score),
            public_score: parse_score(&r.public_score),
            submitted_by: r.submitted_by.unwrap_or_default(),
            submitted_by_ref: r.submitted_by_ref,
            date: r.date,
            description: r.description,
        }
    }
}

/// Scores arrive as strings (empty when not yet scored) or numbers
fn parse_score(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl Leaderboard for KaggleClientImpl {
    async fn store_credentials(&self, username: &str, key: &str) -> Result<(), LeaderboardError> {
        let path = KaggleCredentials::new(username, key).store(&self.config_dir)?;
        tracing::debug!(path = %path.display(), "Stored Kaggle credentials");
        Ok(())
    }

    async fn user_exists(&self, username: &str) -> Result<bool, LeaderboardError> {
        let response = self
            .http
            .get(format!("{}/{}", self.web_url, encode(username)))
            .send()
            .await?;

        Ok(response.status().as_u16() == 200)
    }

    async fn authenticate(&self) -> Result<(), LeaderboardError> {
        let credentials = KaggleCredentials::load(&self.config_dir)?;
        *self.credentials.write().await = Some(credentials);
        Ok(())
    }

    async fn list_submissions(
        &self,
        competition: &str,
    ) -> Result<Vec<SubmissionRecord>, LeaderboardError> {
        let credentials = self
            .credentials
            .read()
            .await
            .clone()
            .ok_or(LeaderboardError::Unauthorized)?;

        let mut submissions = Vec::new();
        for page in 1..=MAX_SUBMISSION_PAGES {
            let response = self
                .http
                .get(self.api_path(&format!(
                    "/competitions/submissions/list/{}",
                    encode(competition)
                )))
                .query(&[("page", page)])
                .basic_auth(&credentials.username, Some(&credentials.key))
                .send()
                .await?;

            let batch: Vec<SubmissionResponse> =
                self.handle_response(response, competition).await?;
            if batch.is_empty() {
                break;
            }
            submissions.extend(batch.into_iter().map(SubmissionRecord::from));
        }

        tracing::debug!(competition, count = submissions.len(), "Listed submissions");
        Ok(submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer, config_dir: PathBuf) -> KaggleClientImpl {
        KaggleClientImpl::new(server.url("/api/v1"), server.base_url(), config_dir)
    }

    #[test]
    fn scores_parse_from_strings_and_numbers() {
        assert_eq!(parse_score(&json!("0.125")), Some(0.125));
        assert_eq!(parse_score(&json!(0.5)), Some(0.5));
        assert_eq!(parse_score(&json!("")), None);
        assert_eq!(parse_score(&json!(null)), None);
        assert_eq!(parse_score(&json!("pending")), None);
    }

    #[tokio::test]
    async fn user_exists_checks_profile_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/student");
                then.status(200).body("<html></html>");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ghost");
                then.status(404);
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let kaggle = client(&server, dir.path().to_path_buf());

        assert!(kaggle.user_exists("student").await.unwrap());
        assert!(!kaggle.user_exists("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn list_requires_authentication() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();

        let err = client(&server, dir.path().to_path_buf())
            .list_submissions("hw2p2")
            .await
            .unwrap_err();

        assert!(matches!(err, LeaderboardError::Unauthorized));
    }

    #[tokio::test]
    async fn authenticate_fails_without_stored_credentials() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();

        let err = client(&server, dir.path().to_path_buf())
            .authenticate()
            .await
            .unwrap_err();

        assert!(matches!(err, LeaderboardError::Credentials { .. }));
    }

    #[tokio::test]
    async fn list_submissions_pages_until_empty() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/competitions/submissions/list/hw2p2")
                    .query_param("page", "1")
                    .header_exists("authorization");
                then.status(200).json_body(json!([
                    {"publicScore": "0.31", "privateScore": "0.30", "submittedBy": "Student", "submittedByRef": "student"},
                    {"publicScore": "", "privateScore": null, "submittedBy": "Student"}
                ]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/competitions/submissions/list/hw2p2")
                    .query_param("page", "2");
                then.status(200).json_body(json!([]));
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let kaggle = client(&server, dir.path().to_path_buf());

        kaggle.store_credentials("student", "k3y").await.unwrap();
        kaggle.authenticate().await.unwrap();
        let subs = kaggle.list_submissions("hw2p2").await.unwrap();

        first.assert_async().await;
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].private_score, Some(0.30));
        assert_eq!(subs[0].public_score, Some(0.31));
        assert!(subs[0].is_by("student"));
        assert_eq!(subs[1].private_score, None);
        assert_eq!(subs[1].public_score, None);
    }

    #[tokio::test]
    async fn unknown_competition_maps_to_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/competitions/submissions/list/nope");
                then.status(404);
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let kaggle = client(&server, dir.path().to_path_buf());
        kaggle.store_credentials("student", "k3y").await.unwrap();
        kaggle.authenticate().await.unwrap();

        let err = kaggle.list_submissions("nope").await.unwrap_err();

        assert!(matches!(err, LeaderboardError::CompetitionNotFound(_)));
    }

    #[tokio::test]
    async fn rejected_credentials_map_to_unauthorized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/competitions/submissions/list/hw2p2");
                then.status(401);
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let kaggle = client(&server, dir.path().to_path_buf());
        kaggle.store_credentials("student", "wrong").await.unwrap();
        kaggle.authenticate().await.unwrap();

        let err = kaggle.list_submissions("hw2p2").await.unwrap_err();

        assert!(matches!(err, LeaderboardError::Unauthorized));
    }
}
