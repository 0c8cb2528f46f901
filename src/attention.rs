//! Decides whether a pull request needs the viewer's attention.

use crate::types::PullRequest;

/// True when the viewer has unresolved review obligations on this PR.
///
/// Three rules, any of which suffices:
/// 1. the viewer has a pending review request on the PR;
/// 2. nobody has reviewed the PR at all;
/// 3. the viewer reviewed it before, but commits landed after their latest
///    review.
///
/// Pure in its inputs: only the record's own timestamps are compared, never
/// the wall clock. A PR the viewer authored gets no special treatment; being
/// asked to re-review your own PR still counts.
pub fn needs_attention(pr: &PullRequest, viewer: &str) -> bool {
    if pr.is_review_requested_from(viewer) {
        return true;
    }

    if pr.review_count == 0 {
        return true;
    }

    if let (Some(last_review), Some(last_commit)) = (pr.last_review_by(viewer), pr.last_commit_at)
        && last_commit > last_review
    {
        return true;
    }

    false
}
