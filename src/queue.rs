//! Classification, ranking, and the pipeline that produces a review queue.

use std::collections::HashSet;

use anyhow::Result;

use crate::{
    attention::needs_attention,
    progress::{Progress, Stage},
    types::{ClassifiedPr, Forge, PullRequest},
};

/// The ranked result of one run: every open PR in the organization,
/// classified against `viewer` and sorted by review priority.
///
/// Presentation layers consume this read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewQueue {
    pub viewer: String,
    pub prs: Vec<ClassifiedPr>,
}

impl ReviewQueue {
    pub fn len(&self) -> usize {
        self.prs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prs.is_empty()
    }

    /// How many records currently need the viewer's attention.
    pub fn attention_count(&self) -> usize {
        self.prs.iter().filter(|c| c.needs_attention).count()
    }
}

/// Classifies every record against the viewer. Pure; order-preserving.
pub fn classify(prs: Vec<PullRequest>, viewer: &str) -> Vec<ClassifiedPr> {
    prs.into_iter()
        .map(|pr| {
            let needs_attention = needs_attention(&pr, viewer);
            ClassifiedPr {
                pr,
                needs_attention,
            }
        })
        .collect()
}

/// Orders the queue for presentation: attention-needed first, oldest-created
/// first within each group. The sort is stable, so exact ties keep their
/// insertion order.
pub fn rank(prs: &mut [ClassifiedPr]) {
    prs.sort_by_key(|c| (!c.needs_attention, c.pr.created_at));
}

/// Secondary arrangement for repo-sectioned presentation. Groups appear in
/// case-insensitive repository-name order; within a group the ranked order is
/// untouched.
pub fn group_by_repo(prs: &[ClassifiedPr]) -> Vec<(&str, Vec<&ClassifiedPr>)> {
    let mut groups: Vec<(&str, Vec<&ClassifiedPr>)> = Vec::new();
    for classified in prs {
        match groups
            .iter_mut()
            .find(|(name, _)| *name == classified.pr.repo)
        {
            Some((_, members)) => members.push(classified),
            None => groups.push((classified.pr.repo.as_str(), vec![classified])),
        }
    }
    groups.sort_by_key(|(name, _)| name.to_lowercase());
    groups
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Runs the whole pipeline: fetch, drop ignored repositories, classify
/// against the viewer, rank.
///
/// Stages are sequential and any failure aborts the run; there is no
/// partially-built queue. `ignore` is matched against bare repository names
/// before classification.
pub async fn build_review_queue<F>(
    forge: &F,
    org: &str,
    ignore: &HashSet<String>,
    progress: &dyn Progress,
) -> Result<ReviewQueue>
where
    F: Forge,
{
    progress.begin(
        Stage::FetchPullRequests,
        &format!("Fetching open PRs for {org}…"),
    );
    let mut prs = forge.open_pull_requests(org).await?;
    prs.retain(|pr| !ignore.contains(&pr.repo));
    progress.end(
        Stage::FetchPullRequests,
        &format!("Found {} open PR{}", prs.len(), plural(prs.len())),
    );

    progress.begin(Stage::IdentifyViewer, "Identifying reviewer…");
    let viewer = forge.viewer_login().await?;
    progress.end(Stage::IdentifyViewer, &format!("Logged in as {viewer}"));

    progress.begin(Stage::Rank, "Sorting by review priority…");
    let mut classified = classify(prs, &viewer);
    rank(&mut classified);
    let queue = ReviewQueue {
        viewer,
        prs: classified,
    };
    let needs = queue.attention_count();
    progress.end(
        Stage::Rank,
        &format!(
            "{needs} PR{} need{} your attention",
            plural(needs),
            if needs == 1 { "s" } else { "" }
        ),
    );

    tracing::debug!(
        total = queue.len(),
        needs_attention = needs,
        viewer = %queue.viewer,
        "review queue built"
    );
    Ok(queue)
}
