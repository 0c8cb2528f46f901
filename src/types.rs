use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Login recorded when the authoring account has been deleted. GitHub renders
/// these as the "ghost" user and so do we.
pub const GHOST_LOGIN: &str = "ghost";

/// Aggregated pass/fail state of all automated checks on a PR's latest
/// commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CiState {
    Success,
    Failing,
    Pending,
    Unknown,
}

impl CiState {
    /// Maps GitHub's `statusCheckRollup.state` string. `None` covers both a
    /// missing rollup and a PR with no commits.
    pub fn from_rollup(state: Option<&str>) -> Self {
        match state {
            Some("SUCCESS") => CiState::Success,
            Some("FAILURE") | Some("ERROR") => CiState::Failing,
            Some("PENDING") => CiState::Pending,
            _ => CiState::Unknown,
        }
    }
}

impl std::fmt::Display for CiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CiState::Success => write!(f, "success"),
            CiState::Failing => write!(f, "failing"),
            CiState::Pending => write!(f, "pending"),
            CiState::Unknown => write!(f, "unknown"),
        }
    }
}

/// A label as shown on the PR: name plus GitHub's six-digit hex color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub name: String,
    pub color: String,
}

/// One submitted review: who and when. Immutable snapshot at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub author: String,
    pub submitted_at: DateTime<Utc>,
}

/// Canonical, fully-defaulted representation of one open pull request.
///
/// Every optional field in the upstream payload has already been resolved to
/// a defined value by the normalizer; consumers never see raw nulls. A record
/// is identified by `(repo, number)` within one fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequest {
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub is_draft: bool,
    pub labels: Vec<Label>,
    pub comment_count: u64,
    pub review_count: u64,
    /// Logins with a currently pending review request. Team-only requests
    /// (no resolvable user login) are absent.
    pub requested_reviewers: Vec<String>,
    /// Most recent reviews as returned by upstream. Upstream order is not
    /// relied upon; derive recency with [`PullRequest::last_review_by`].
    pub reviews: Vec<Review>,
    pub last_commit_at: Option<DateTime<Utc>>,
    pub ci_state: CiState,
}

impl PullRequest {
    /// Timestamp of the given login's most recent review, if any.
    pub fn last_review_by(&self, login: &str) -> Option<DateTime<Utc>> {
        self.reviews
            .iter()
            .filter(|review| review.author == login)
            .map(|review| review.submitted_at)
            .max()
    }

    pub fn is_review_requested_from(&self, login: &str) -> bool {
        self.requested_reviewers.iter().any(|r| r == login)
    }
}

/// A pull request plus its derived attention flag. Recomputed every run,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPr {
    pub pr: PullRequest,
    pub needs_attention: bool,
}

/// Read-only access to a code-hosting forge.
///
/// The engine only ever needs two lookups, and keeping them behind a trait
/// lets integration tests drive the whole pipeline from in-memory data.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Login of the actor the token authenticates as. Fetched once per run.
    async fn viewer_login(&self) -> Result<String>;

    /// Every open pull request in the organization, already normalized.
    async fn open_pull_requests(&self, org: &str) -> Result<Vec<PullRequest>>;
}
