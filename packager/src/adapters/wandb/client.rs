//! Weights & Biases GraphQL client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::Secret;
use crate::domain::entities::{RunOrdering, RunRecord};
use crate::domain::ports::{RunTracker, TrackerAccount};
use crate::error::RunTrackerError;

/// Runs requested per page when listing a project
const RUNS_PER_PAGE: u32 = 50;

const VIEWER_QUERY: &str = r#"
query Viewer {
    viewer {
        id
        username
        entity
    }
}
"#;

const RUNS_QUERY: &str = r#"
query Runs($project: String!, $entity: String!, $cursor: String, $perPage: Int, $order: String) {
    project(name: $project, entityName: $entity) {
        runs(after: $cursor, first: $perPage, order: $order) {
            edges {
                node {
                    name
                    displayName
                    tags
                    state
                    createdAt
                    config
                    summaryMetrics
                }
            }
            pageInfo {
                endCursor
                hasNextPage
            }
        }
    }
}
"#;

const HISTORY_QUERY: &str = r#"
query RunHistory($project: String!, $entity: String!, $name: String!, $samples: Int) {
    project(name: $project, entityName: $entity) {
        run(name: $name) {
            history(samples: $samples)
        }
    }
}
"#;

/// Implementation of the run tracker against the W&B public API
pub struct WandbClientImpl {
    http: Client,
    base_url: String,
    api_key: Secret,
}

impl WandbClientImpl {
    pub fn new(base_url: String, api_key: Secret) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn graphql_url(&self) -> String {
        format!("{}/graphql", self.base_url)
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, RunTrackerError> {
        let response = self
            .http
            .post(self.graphql_url())
            .basic_auth("api", Some(self.api_key.expose()))
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, RunTrackerError> {
        let status = response.status();

        if status.is_success() {
            let body: GraphQlResponse<T> = response
                .json()
                .await
                .map_err(|e| RunTrackerError::Deserialization(e.to_string()))?;

            if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
                let message = errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(RunTrackerError::Query(message));
            }

            body.data
                .ok_or_else(|| RunTrackerError::Deserialization("missing data".to_string()))
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(RunTrackerError::Unauthorized)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(RunTrackerError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlErrorMessage>>,
}

#[derive(Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

/// Response types from the W&B API
#[derive(Deserialize)]
struct ViewerData {
    viewer: Option<ViewerResponse>,
}

#[derive(Deserialize)]
struct ViewerResponse {
    username: Option<String>,
    entity: Option<String>,
}

#[derive(Deserialize)]
struct RunsData {
    project: Option<RunsProject>,
}

#[derive(Deserialize)]
struct RunsProject {
    runs: RunConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunConnection {
    edges: Vec<RunEdge>,
    page_info: PageInfo,
}

#[derive(Deserialize)]
struct RunEdge {
    node: RunNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunNode {
    name: String,
    display_name: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    state: Option<String>,
    created_at: Option<String>,
    config: Option<String>,
    summary_metrics: Option<String>,
}

impl TryFrom<RunNode> for RunRecord {
    type Error = RunTrackerError;

    fn try_from(node: RunNode) -> Result<Self, Self::Error> {
        let config = parse_json_object(node.config.as_deref())?;
        let summary = parse_json_object(node.summary_metrics.as_deref())?;

        Ok(RunRecord {
            name: display_name_or_id(&node.name, node.display_name.as_deref()),
            id: node.name,
            tags: node.tags.unwrap_or_default(),
            state: node.state.unwrap_or_default(),
            created_at: node.created_at.unwrap_or_default(),
            config: unwrap_config_values(config),
            summary,
            history: None,
        })
    }
}

#[derive(Deserialize)]
struct HistoryData {
    project: Option<HistoryProject>,
}

#[derive(Deserialize)]
struct HistoryProject {
    run: Option<HistoryRun>,
}

#[derive(Deserialize)]
struct HistoryRun {
    #[serde(default)]
    history: Vec<String>,
}

fn display_name_or_id(id: &str, display_name: Option<&str>) -> String {
    display_name.unwrap_or(id).to_string()
}

/// Parse a JSONString field, treating null/empty as an empty object
fn parse_json_object(raw: Option<&str>) -> Result<Map<String, Value>, RunTrackerError> {
    match raw.map(str::trim) {
        None | Some("") | Some("null") => Ok(Map::new()),
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(RunTrackerError::Deserialization(format!(
                "expected a JSON object, got {}",
                other
            ))),
            Err(e) => Err(RunTrackerError::Deserialization(e.to_string())),
        },
    }
}

/// Stored configs wrap each entry as `{"value": ..., "desc": ...}`; keys starting
/// with `_` are tracker internals and are dropped
fn unwrap_config_values(raw: Map<String, Value>) -> Map<String, Value> {
    raw.into_iter()
        .filter(|(key, _)| !key.starts_with('_'))
        .map(|(key, entry)| {
            let value = match entry {
                Value::Object(mut wrapped) if wrapped.contains_key("value") => {
                    wrapped.remove("value").unwrap_or(Value::Null)
                }
                other => other,
            };
            (key, value)
        })
        .collect()
}

#[async_trait]
impl RunTracker for WandbClientImpl {
    async fn authenticate(&self) -> Result<TrackerAccount, RunTrackerError> {
        if self.api_key.is_empty() {
            return Err(RunTrackerError::Unauthorized);
        }

        let data: ViewerData = self.query(VIEWER_QUERY, json!({})).await?;
        let viewer = data.viewer.ok_or(RunTrackerError::Unauthorized)?;

        Ok(TrackerAccount {
            username: viewer.username,
            entity: viewer.entity,
        })
    }

    async fn list_runs(
        &self,
        entity: &str,
        project: &str,
        ordering: &RunOrdering,
    ) -> Result<Vec<RunRecord>, RunTrackerError> {
        let order = ordering.order_key();
        let mut cursor: Option<String> = None;
        let mut runs = Vec::new();

        loop {
            let data: RunsData = self
                .query(
                    RUNS_QUERY,
                    json!({
                        "project": project,
                        "entity": entity,
                        "cursor": cursor,
                        "perPage": RUNS_PER_PAGE,
                        "order": order,
                    }),
                )
                .await?;

            let connection = data
                .project
                .ok_or_else(|| RunTrackerError::ProjectNotFound {
                    entity: entity.to_string(),
                    project: project.to_string(),
                })?
                .runs;

            for edge in connection.edges {
                runs.push(RunRecord::try_from(edge.node)?);
            }

            match connection.page_info.end_cursor {
                Some(next) if connection.page_info.has_next_page => cursor = Some(next),
                _ => break,
            }
        }

        tracing::debug!(entity, project, order = %order, count = runs.len(), "Listed runs");
        Ok(runs)
    }

    async fn run_history(
        &self,
        entity: &str,
        project: &str,
        run_id: &str,
        samples: u32,
    ) -> Result<Vec<Map<String, Value>>, RunTrackerError> {
        let data: HistoryData = self
            .query(
                HISTORY_QUERY,
                json!({
                    "project": project,
                    "entity": entity,
                    "name": run_id,
                    "samples": samples,
                }),
            )
            .await?;

        let run = data
            .project
            .ok_or_else(|| RunTrackerError::ProjectNotFound {
                entity: entity.to_string(),
                project: project.to_string(),
            })?
            .run
            .ok_or_else(|| RunTrackerError::RunNotFound(run_id.to_string()))?;

        run.history
            .iter()
            .map(|row| parse_json_object(Some(row)))
            .collect()
    }
}
