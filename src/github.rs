use std::process::Command;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use url::Url;

use crate::{
    graphql::{OPEN_PRS_QUERY, OpenPrsData, VIEWER_QUERY, ViewerData, normalize_repo},
    pages::{self, Page},
    transport::{GITHUB_GRAPHQL_URL, GraphqlTransport},
    types::{Forge, PullRequest},
};

pub fn github_token() -> Result<String> {
    // Prefer environment variables over gh CLI to avoid subprocess overhead.
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        return Ok(token);
    }

    if let Ok(token) = std::env::var("GH_TOKEN") {
        return Ok(token);
    }

    let output = Command::new("gh").args(["auth", "token"]).output()?;

    if !output.status.success() {
        anyhow::bail!(
            "no GitHub token found: set GITHUB_TOKEN, or run 'gh auth login' first"
        );
    }

    let token = String::from_utf8(output.stdout)?.trim().to_string();

    if token.is_empty() {
        anyhow::bail!("empty token returned from gh CLI");
    }

    Ok(token)
}

fn graphql_endpoint() -> Result<Url> {
    match std::env::var("GITHUB_GRAPHQL_URL") {
        Ok(raw) => {
            Url::parse(&raw).with_context(|| format!("invalid GITHUB_GRAPHQL_URL: '{raw}'"))
        }
        Err(_) => Ok(Url::parse(GITHUB_GRAPHQL_URL).expect("default endpoint parses")),
    }
}

/// GitHub-backed [`Forge`] built on the GraphQL transport.
pub struct GitHub {
    transport: GraphqlTransport,
}

impl GitHub {
    pub fn new(transport: GraphqlTransport) -> Self {
        Self { transport }
    }

    /// Authenticates from the environment: GITHUB_TOKEN, GH_TOKEN, then the
    /// gh CLI; endpoint overridable via GITHUB_GRAPHQL_URL.
    pub fn from_env() -> Result<Self> {
        let token = github_token().context("failed to obtain GitHub authentication token")?;
        let transport = GraphqlTransport::new(token, graphql_endpoint()?)
            .context("failed to create GitHub client")?;
        Ok(Self::new(transport))
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn viewer_login(&self) -> Result<String> {
        let data: ViewerData = self.transport.execute(VIEWER_QUERY, json!({})).await?;
        Ok(data.viewer.login)
    }

    async fn open_pull_requests(&self, org: &str) -> Result<Vec<PullRequest>> {
        let transport = &self.transport;

        let repos = pages::collect_all(|cursor| {
            let variables = json!({ "org": org, "cursor": cursor });
            async move {
                let data: OpenPrsData = transport.execute(OPEN_PRS_QUERY, variables).await?;
                let repositories = data
                    .organization
                    .ok_or_else(|| {
                        anyhow::anyhow!("organization '{org}' not found or token lacks access")
                    })?
                    .repositories;

                tracing::debug!(
                    repos = repositories.nodes.len(),
                    has_next = repositories.page_info.has_next_page,
                    "fetched repository page"
                );

                Ok::<_, anyhow::Error>(Page {
                    next: repositories.page_info.next_cursor(),
                    items: repositories.nodes,
                })
            }
        })
        .await?;

        let prs: Vec<PullRequest> = repos.into_iter().flat_map(normalize_repo).collect();
        tracing::debug!(count = prs.len(), "normalized open pull requests");
        Ok(prs)
    }
}
