//! Task source backed by the Asana REST API.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use salespilot_core::models::config::SourceConfig;
use salespilot_core::{Project, RawTask, SourceError};

/// One page of `GET /projects/{gid}/tasks`.
#[derive(Debug, Deserialize)]
struct TaskPage {
    #[serde(default)]
    data: Vec<RawTask>,
    #[serde(default)]
    next_page: Option<NextPage>,
}

#[derive(Debug, Deserialize)]
struct NextPage {
    offset: String,
}

/// Paginated, sequential task fetcher.
pub struct AsanaClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
    page_size: u32,
    opt_fields: String,
}

impl AsanaClient {
    pub fn new(config: &SourceConfig, token: &str) -> anyhow::Result<Self> {
        if token.trim().is_empty() {
            anyhow::bail!("Missing access token. Set ASANA_ACCESS_TOKEN or pass --token.");
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("salespilot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
            page_size: config.page_size.clamp(1, 100),
            opt_fields: config.opt_fields.join(","),
        })
    }

    /// Fetch every task of a project, following `next_page` offsets.
    pub async fn fetch_tasks(&self, project: &Project) -> Result<Vec<RawTask>, SourceError> {
        let url = format!("{}/projects/{}/tasks", self.api_base, project.gid);
        let mut tasks = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let query = page_query(&self.opt_fields, self.page_size, offset.as_deref());
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&query)
                .send()
                .await
                .map_err(|e| transport(project, e))?;

            let status = response.status();
            let body = response.text().await.map_err(|e| transport(project, e))?;
            if !status.is_success() {
                return Err(SourceError::Status {
                    project: project.gid.clone(),
                    status: status.as_u16(),
                    body,
                });
            }

            let page = decode_page(project, &body)?;
            debug!("Project {}: page of {} tasks", project.gid, page.data.len());
            tasks.extend(page.data);

            match page.next_page {
                Some(next) if !next.offset.is_empty() => offset = Some(next.offset),
                _ => break,
            }
        }

        Ok(tasks)
    }
}

fn transport(project: &Project, err: reqwest::Error) -> SourceError {
    SourceError::Transport {
        project: project.gid.clone(),
        reason: err.to_string(),
    }
}

fn page_query(opt_fields: &str, limit: u32, offset: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![("limit", limit.to_string())];
    if !opt_fields.is_empty() {
        query.push(("opt_fields", opt_fields.to_string()));
    }
    if let Some(offset) = offset {
        query.push(("offset", offset.to_string()));
    }
    query
}

fn decode_page(project: &Project, body: &str) -> Result<TaskPage, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Payload {
        project: project.gid.clone(),
        reason: e.to_string(),
    })
}
