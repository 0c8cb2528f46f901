//! GraphQL query documents, wire-shape types, and normalization.
//!
//! The upstream payload is optional/nullable at arbitrary depth: a PR may
//! have no author (deleted account), no labels, no reviews, no commits, and
//! no CI rollup, and review requests may point at teams with no resolvable
//! user login. The wire types here admit all of that, and [`normalize_repo`]
//! is the single place where the defaults are filled in. Truly required
//! fields (repository name, PR number, URL) are non-optional in the wire
//! shape, so a payload missing one of them fails deserialization instead of
//! producing a half-formed record.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{CiState, GHOST_LOGIN, Label, PullRequest, Review};

/// Login of the authenticated actor.
pub const VIEWER_QUERY: &str = "{ viewer { login } }";

/// Every open PR in every non-fork, non-archived repository of an
/// organization, one page of repositories at a time.
pub const OPEN_PRS_QUERY: &str = r#"
query($org: String!, $cursor: String) {
  organization(login: $org) {
    repositories(first: 100, after: $cursor, isFork: false, isArchived: false, orderBy: {field: UPDATED_AT, direction: DESC}) {
      pageInfo {
        hasNextPage
        endCursor
      }
      nodes {
        name
        pullRequests(states: OPEN, first: 100, orderBy: {field: UPDATED_AT, direction: DESC}) {
          nodes {
            number
            title
            url
            createdAt
            isDraft
            author { login }
            labels(first: 10) { nodes { name color } }
            comments { totalCount }
            reviewRequests(first: 10) { nodes { requestedReviewer { ... on User { login } } } }
            reviews(last: 10) { totalCount nodes { author { login } createdAt } }
            commits(last: 1) {
              nodes {
                commit {
                  committedDate
                  statusCheckRollup { state }
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
pub struct ViewerData {
    pub viewer: Viewer,
}

#[derive(Debug, Deserialize)]
pub struct Viewer {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenPrsData {
    pub organization: Option<Organization>,
}

#[derive(Debug, Deserialize)]
pub struct Organization {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Cursor for the next page. A page that claims more data but carries no
    /// cursor terminates the walk rather than refetching the same page.
    pub fn next_cursor(&self) -> Option<String> {
        if self.has_next_page {
            self.end_cursor.clone()
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub name: String,
    #[serde(default)]
    pub pull_requests: PullRequestConnection,
}

#[derive(Debug, Default, Deserialize)]
pub struct PullRequestConnection {
    #[serde(default)]
    pub nodes: Vec<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestNode {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_draft: bool,
    pub author: Option<Actor>,
    #[serde(default)]
    pub labels: LabelConnection,
    #[serde(default)]
    pub comments: CountedConnection,
    #[serde(default)]
    pub review_requests: ReviewRequestConnection,
    #[serde(default)]
    pub reviews: ReviewConnection,
    #[serde(default)]
    pub commits: CommitConnection,
}

#[derive(Debug, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LabelConnection {
    #[serde(default)]
    pub nodes: Vec<LabelNode>,
}

#[derive(Debug, Deserialize)]
pub struct LabelNode {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountedConnection {
    #[serde(default)]
    pub total_count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequestConnection {
    #[serde(default)]
    pub nodes: Vec<ReviewRequestNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequestNode {
    /// Absent for team review requests: the `... on User` fragment only
    /// matches user reviewers, so anything else deserializes empty.
    pub requested_reviewer: Option<RequestedReviewer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestedReviewer {
    pub login: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewConnection {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub nodes: Vec<ReviewNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewNode {
    pub author: Option<Actor>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommitConnection {
    #[serde(default)]
    pub nodes: Vec<CommitNode>,
}

#[derive(Debug, Deserialize)]
pub struct CommitNode {
    pub commit: CommitInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub committed_date: Option<DateTime<Utc>>,
    pub status_check_rollup: Option<StatusCheckRollup>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusCheckRollup {
    pub state: Option<String>,
}

/// Flattens one repository node into canonical records.
pub fn normalize_repo(repo: RepositoryNode) -> impl Iterator<Item = PullRequest> {
    let name = repo.name;
    repo.pull_requests
        .nodes
        .into_iter()
        .map(move |node| normalize_pr(name.clone(), node))
}

/// Resolves one raw PR node into a fully-defaulted [`PullRequest`].
pub fn normalize_pr(repo: String, node: PullRequestNode) -> PullRequest {
    let author = node
        .author
        .map(|actor| actor.login)
        .unwrap_or_else(|| GHOST_LOGIN.to_string());

    let labels = node
        .labels
        .nodes
        .into_iter()
        .map(|label| Label {
            name: label.name,
            color: label.color,
        })
        .collect();

    let requested_reviewers = node
        .review_requests
        .nodes
        .into_iter()
        .filter_map(|request| request.requested_reviewer?.login)
        .collect();

    let reviews = node
        .reviews
        .nodes
        .into_iter()
        .map(|review| Review {
            author: review
                .author
                .map(|actor| actor.login)
                .unwrap_or_else(|| GHOST_LOGIN.to_string()),
            submitted_at: review.created_at,
        })
        .collect();

    let last_commit = node.commits.nodes.into_iter().next().map(|node| node.commit);
    let (last_commit_at, ci_state) = match last_commit {
        Some(commit) => (
            commit.committed_date,
            CiState::from_rollup(commit.status_check_rollup.and_then(|r| r.state).as_deref()),
        ),
        None => (None, CiState::Unknown),
    };

    PullRequest {
        repo,
        number: node.number,
        title: node.title,
        url: node.url,
        author,
        created_at: node.created_at,
        is_draft: node.is_draft,
        labels,
        comment_count: node.comments.total_count,
        review_count: node.reviews.total_count,
        requested_reviewers,
        reviews,
        last_commit_at,
        ci_state,
    }
}
