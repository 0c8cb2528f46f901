//! End-to-end pipeline tests against an in-memory forge.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use prtriage::{
    CiState, Forge, NoProgress, Progress, PullRequest, Review, Stage, build_review_queue,
};

/// Forge that serves canned data.
struct MockForge {
    viewer: String,
    prs: Vec<PullRequest>,
}

#[async_trait]
impl Forge for MockForge {
    async fn viewer_login(&self) -> Result<String> {
        Ok(self.viewer.clone())
    }

    async fn open_pull_requests(&self, _org: &str) -> Result<Vec<PullRequest>> {
        Ok(self.prs.clone())
    }
}

/// Forge whose PR fetch always fails.
struct BrokenForge;

#[async_trait]
impl Forge for BrokenForge {
    async fn viewer_login(&self) -> Result<String> {
        Ok("alice".to_string())
    }

    async fn open_pull_requests(&self, _org: &str) -> Result<Vec<PullRequest>> {
        anyhow::bail!("GitHub API error: 502 Bad Gateway")
    }
}

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, day, hour, 0, 0).unwrap()
}

fn pr(repo: &str, number: u64, created: DateTime<Utc>) -> PullRequest {
    PullRequest {
        repo: repo.to_string(),
        number,
        title: format!("{repo} change #{number}"),
        url: format!("https://github.com/acme/{repo}/pull/{number}"),
        author: "bob".to_string(),
        created_at: created,
        is_draft: false,
        labels: Vec::new(),
        comment_count: 0,
        review_count: 0,
        requested_reviewers: Vec::new(),
        reviews: Vec::new(),
        last_commit_at: None,
        ci_state: CiState::Unknown,
    }
}

fn review(author: &str, at: DateTime<Utc>) -> Review {
    Review {
        author: author.to_string(),
        submitted_at: at,
    }
}

fn no_ignores() -> HashSet<String> {
    HashSet::new()
}

#[tokio::test]
async fn two_repo_scenario_ranks_unreviewed_first() {
    // Repo A: one PR nobody has reviewed. Repo B: one PR reviewed by someone
    // else, no pending request for the viewer, no commits since. B was
    // created earlier, so only the attention flag can put A first.
    let unreviewed = pr("repo-a", 1, ts(10, 0));
    let mut settled = pr("repo-b", 2, ts(1, 0));
    settled.review_count = 1;
    settled.reviews = vec![review("carol", ts(2, 0))];
    settled.last_commit_at = Some(ts(1, 12));

    let forge = MockForge {
        viewer: "alice".to_string(),
        prs: vec![settled, unreviewed],
    };

    let queue = build_review_queue(&forge, "acme", &no_ignores(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(queue.viewer, "alice");
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.attention_count(), 1);

    assert_eq!(queue.prs[0].pr.repo, "repo-a");
    assert!(queue.prs[0].needs_attention);
    assert_eq!(queue.prs[1].pr.repo, "repo-b");
    assert!(!queue.prs[1].needs_attention);
}

#[tokio::test]
async fn ignored_repositories_are_dropped_before_classification() {
    let forge = MockForge {
        viewer: "alice".to_string(),
        prs: vec![
            pr("keep", 1, ts(1, 0)),
            pr("sandbox", 2, ts(2, 0)),
            pr("keep", 3, ts(3, 0)),
        ],
    };
    let ignore: HashSet<String> = ["sandbox".to_string()].into();

    let queue = build_review_queue(&forge, "acme", &ignore, &NoProgress)
        .await
        .unwrap();

    assert_eq!(queue.len(), 2);
    assert!(queue.prs.iter().all(|c| c.pr.repo == "keep"));
    // The ignored repo's records never reach the counts either.
    assert_eq!(queue.attention_count(), 2);
}

#[tokio::test]
async fn requested_reviewer_outranks_settled_history() {
    // The viewer reviewed this PR after its last commit, but a fresh review
    // request reopens the obligation.
    let mut requested = pr("repo-a", 1, ts(1, 0));
    requested.review_count = 3;
    requested.reviews = vec![review("alice", ts(5, 0))];
    requested.last_commit_at = Some(ts(4, 0));
    requested.requested_reviewers = vec!["alice".to_string()];

    let forge = MockForge {
        viewer: "alice".to_string(),
        prs: vec![requested],
    };

    let queue = build_review_queue(&forge, "acme", &no_ignores(), &NoProgress)
        .await
        .unwrap();

    assert!(queue.prs[0].needs_attention);
}

#[tokio::test]
async fn new_commits_since_the_viewers_review_resurface_the_pr() {
    let mut gone_stale = pr("repo-a", 1, ts(1, 0));
    gone_stale.review_count = 1;
    gone_stale.reviews = vec![review("alice", ts(2, 0))];
    gone_stale.last_commit_at = Some(ts(3, 0));

    let mut still_settled = pr("repo-a", 2, ts(1, 0));
    still_settled.review_count = 1;
    still_settled.reviews = vec![review("alice", ts(4, 0))];
    still_settled.last_commit_at = Some(ts(3, 0));

    let forge = MockForge {
        viewer: "alice".to_string(),
        prs: vec![gone_stale, still_settled],
    };

    let queue = build_review_queue(&forge, "acme", &no_ignores(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(queue.attention_count(), 1);
    assert_eq!(queue.prs[0].pr.number, 1);
    assert!(queue.prs[0].needs_attention);
    assert!(!queue.prs[1].needs_attention);
}

#[tokio::test]
async fn empty_organization_produces_an_empty_queue() {
    let forge = MockForge {
        viewer: "alice".to_string(),
        prs: Vec::new(),
    };

    let queue = build_review_queue(&forge, "acme", &no_ignores(), &NoProgress)
        .await
        .unwrap();

    assert!(queue.is_empty());
    assert_eq!(queue.attention_count(), 0);
}

#[tokio::test]
async fn fetch_failure_aborts_with_no_queue() {
    let result = build_review_queue(&BrokenForge, "acme", &no_ignores(), &NoProgress).await;

    let err = result.expect_err("a failed fetch must not produce a queue");
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn progress_stages_run_in_pipeline_order() {
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<(Stage, String)>>);

    impl Progress for Recorder {
        fn begin(&self, _stage: Stage, _message: &str) {}
        fn end(&self, stage: Stage, summary: &str) {
            self.0.lock().unwrap().push((stage, summary.to_string()));
        }
    }

    let forge = MockForge {
        viewer: "alice".to_string(),
        prs: vec![pr("repo-a", 1, ts(1, 0))],
    };
    let recorder = Recorder(Mutex::new(Vec::new()));

    build_review_queue(&forge, "acme", &no_ignores(), &recorder)
        .await
        .unwrap();

    let events = recorder.0.into_inner().unwrap();
    let stages: Vec<Stage> = events.iter().map(|(stage, _)| *stage).collect();
    assert_eq!(
        stages,
        vec![Stage::FetchPullRequests, Stage::IdentifyViewer, Stage::Rank]
    );
    assert_eq!(events[0].1, "Found 1 open PR");
    assert_eq!(events[1].1, "Logged in as alice");
    assert_eq!(events[2].1, "1 PR needs your attention");
}
