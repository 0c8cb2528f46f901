//! Plain-text table output.

use std::io::{self, IsTerminal, Write};

use prtriage::ReviewQueue;

const MIN_REPO_WIDTH: usize = 4;
const MIN_TITLE_WIDTH: usize = 8;
const MIN_URL_WIDTH: usize = 6;

/// Column widths for one rendering: wide enough for the content, shrunk at
/// the title column when the terminal is narrower.
#[derive(Debug, PartialEq)]
struct Layout {
    repo: usize,
    title: usize,
    url: usize,
}

fn layout(queue: &ReviewQueue, terminal_width: Option<usize>) -> Layout {
    let width_of = |f: fn(&prtriage::ClassifiedPr) -> usize, min: usize| {
        queue.prs.iter().map(f).max().unwrap_or(0).max(min)
    };

    let mut layout = Layout {
        repo: width_of(|c| c.pr.repo.chars().count(), MIN_REPO_WIDTH),
        title: width_of(|c| c.pr.title.chars().count(), MIN_TITLE_WIDTH),
        url: width_of(|c| c.pr.url.chars().count(), MIN_URL_WIDTH),
    };

    // "| a | b | c |" carries 10 characters of framing.
    if let Some(max) = terminal_width {
        let total = layout.repo + layout.title + layout.url + 10;
        if total > max {
            let excess = total - max;
            layout.title = layout.title.saturating_sub(excess).max(MIN_TITLE_WIDTH);
        }
    }

    layout
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

pub fn print_table(queue: &ReviewQueue, out: &mut impl Write) -> io::Result<()> {
    let terminal_width = if std::io::stdout().is_terminal() {
        terminal_size::terminal_size().map(|(w, _)| w.0 as usize)
    } else {
        None
    };
    render_table(queue, terminal_width, out)
}

fn render_table(
    queue: &ReviewQueue,
    terminal_width: Option<usize>,
    out: &mut impl Write,
) -> io::Result<()> {
    if queue.is_empty() {
        return writeln!(out, "No open pull requests found.");
    }

    let layout = layout(queue, terminal_width);

    writeln!(
        out,
        "| {:<repo$} | {:<title$} | {:<url$} |",
        "Repo",
        "PR Title",
        "PR URL",
        repo = layout.repo,
        title = layout.title,
        url = layout.url,
    )?;
    writeln!(
        out,
        "|{}|{}|{}|",
        "-".repeat(layout.repo + 2),
        "-".repeat(layout.title + 2),
        "-".repeat(layout.url + 2),
    )?;

    for classified in &queue.prs {
        writeln!(
            out,
            "| {:<repo$} | {:<title$} | {:<url$} |",
            classified.pr.repo,
            clip(&classified.pr.title, layout.title),
            classified.pr.url,
            repo = layout.repo,
            title = layout.title,
            url = layout.url,
        )?;
    }

    writeln!(
        out,
        "\nTotal: {} open PR(s), {} needing attention",
        queue.len(),
        queue.attention_count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use prtriage::{CiState, ClassifiedPr, PullRequest};

    fn classified(repo: &str, title: &str, url: &str, needs_attention: bool) -> ClassifiedPr {
        ClassifiedPr {
            pr: PullRequest {
                repo: repo.to_string(),
                number: 1,
                title: title.to_string(),
                url: url.to_string(),
                author: "alice".to_string(),
                created_at: Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap(),
                is_draft: false,
                labels: Vec::new(),
                comment_count: 0,
                review_count: 0,
                requested_reviewers: Vec::new(),
                reviews: Vec::new(),
                last_commit_at: None,
                ci_state: CiState::Unknown,
            },
            needs_attention,
        }
    }

    fn queue(prs: Vec<ClassifiedPr>) -> ReviewQueue {
        ReviewQueue {
            viewer: "alice".to_string(),
            prs,
        }
    }

    fn rendered(queue: &ReviewQueue, width: Option<usize>) -> String {
        let mut buffer = Vec::new();
        render_table(queue, width, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn empty_queue_prints_friendly_message() {
        assert_eq!(
            rendered(&queue(Vec::new()), None),
            "No open pull requests found.\n"
        );
    }

    #[test]
    fn rows_line_up_and_totals_are_counted() {
        let output = rendered(
            &queue(vec![
                classified("maglev", "Fix arrivals", "https://github.com/a/maglev/pull/1", true),
                classified("site", "Docs", "https://github.com/a/site/pull/2", false),
            ]),
            None,
        );

        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("| Repo"));
        assert!(lines[1].starts_with("|--"));
        assert_eq!(lines[0].len(), lines[2].len());
        assert_eq!(lines[2].len(), lines[3].len());
        assert!(output.ends_with("Total: 2 open PR(s), 1 needing attention\n"));
    }

    #[test]
    fn narrow_terminal_clips_the_title_column() {
        let long_title = "An extremely verbose pull request title that cannot possibly fit";
        let output = rendered(
            &queue(vec![classified(
                "maglev",
                long_title,
                "https://github.com/a/maglev/pull/1",
                false,
            )]),
            Some(60),
        );

        assert!(!output.contains(long_title));
        assert!(output.contains('…'));
    }

    #[test]
    fn title_column_never_shrinks_below_minimum() {
        let narrow = layout(
            &queue(vec![classified(
                "maglev",
                "A fairly long pull request title",
                "https://github.com/a/maglev/pull/1",
                false,
            )]),
            Some(10),
        );

        assert_eq!(narrow.title, MIN_TITLE_WIDTH);
    }
}
