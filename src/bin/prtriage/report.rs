//! Static HTML report.
//!
//! Renders the ranked queue into a repo-grouped page and hands it to the
//! default browser. "Seen" state is purely client-local: a localStorage set
//! keyed by PR URL, consulted by the inline script. The engine knows nothing
//! about it.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Result};
use chrono_humanize::HumanTime;
use minijinja::{Environment, context};
use serde::Serialize;

use prtriage::{ClassifiedPr, ReviewQueue, group_by_repo};

const TEMPLATE: &str = r##"<!doctype html>
<html>
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4"></script>
    <title>Open PRs – {{ org }}</title>
  </head>
  <body class="bg-gray-50 p-8">
    <div class="max-w-5xl mx-auto">
      <h1 class="text-3xl font-bold mb-1">{{ org }}</h1>
      <p class="text-gray-500 mb-6">{{ total }} open pull request{% if total != 1 %}s{% endif %}</p>
      {% if not repos %}<p class="text-gray-500 mt-4">No open pull requests found.</p>{% endif %}
      <div class="bg-white rounded-lg shadow border border-gray-200">
{% for repo in repos %}
      <div class="sticky top-0 flex items-center bg-gray-50/90 px-4 py-3 text-sm font-semibold text-gray-900 ring-1 ring-gray-900/10 backdrop-blur-sm">
        <a href="{{ repo.url }}" class="hover:text-blue-600">{{ repo.name }}</a>
      </div>
{% for pr in repo.prs %}
      <div class="pr-row flex items-start gap-3 px-4 py-3 border-b border-gray-200 hover:bg-gray-50 border-l-4 {% if pr.needs_attention %}border-l-blue-500{% else %}border-l-transparent{% endif %}" data-pr-url="{{ pr.url }}">
        <div class="{% if pr.draft %}text-gray-500{% else %}text-green-600{% endif %} mt-0.5">
          <svg class="w-5 h-5 shrink-0" viewBox="0 0 16 16" fill="currentColor"><path d="M1.5 3.25a2.25 2.25 0 1 1 3 2.122v5.256a2.251 2.251 0 1 1-1.5 0V5.372A2.25 2.25 0 0 1 1.5 3.25Zm5.677-.177L9.573.677A.25.25 0 0 1 10 .854V2.5h1A2.5 2.5 0 0 1 13.5 5v5.628a2.251 2.251 0 1 1-1.5 0V5a1 1 0 0 0-1-1h-1v1.646a.25.25 0 0 1-.427.177L7.177 3.427a.25.25 0 0 1 0-.354ZM3.75 2.5a.75.75 0 1 0 0 1.5.75.75 0 0 0 0-1.5Zm0 9.5a.75.75 0 1 0 0 1.5.75.75 0 0 0 0-1.5Zm8.25.75a.75.75 0 1 0 1.5 0 .75.75 0 0 0-1.5 0Z"/></svg>
        </div>
        <div class="flex-1 min-w-0">
          <div class="flex flex-wrap items-center gap-x-1">
            <a href="{{ pr.url }}" class="text-base font-semibold text-gray-900 hover:text-blue-600">{{ pr.title }}</a>
            {% if pr.ci == "success" %}<span class="text-green-600" title="Checks passing">&#10003;</span>{% elif pr.ci == "failing" %}<span class="text-red-600" title="Checks failing">&#10007;</span>{% elif pr.ci == "pending" %}<span class="text-yellow-500" title="Checks pending">&#9679;</span>{% endif %}
          </div>
          {% if pr.labels %}<div class="mt-1">{% for label in pr.labels %}<span class="inline-block px-2 py-0.5 text-xs font-medium rounded-full mr-1" style="background-color:#{{ label.color }};color:{{ label.text_color }}">{{ label.name }}</span>{% endfor %}</div>{% endif %}
          <div class="text-xs text-gray-500 mt-0.5">#{{ pr.number }} opened {{ pr.ago }} by {{ pr.author }}</div>
        </div>
        <div class="flex items-center gap-3">
          {% if pr.review_count %}<span class="inline-flex items-center gap-1 text-xs text-gray-500" title="Reviews"><svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M15 12a3 3 0 11-6 0 3 3 0 016 0z"/><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M2.458 12C3.732 7.943 7.523 5 12 5c4.478 0 8.268 2.943 9.542 7-1.274 4.057-5.064 7-9.542 7-4.477 0-8.268-2.943-9.542-7z"/></svg> {{ pr.review_count }}</span>{% endif %}
          {% if pr.comment_count %}<span class="inline-flex items-center gap-1 text-xs text-gray-500" title="Comments"><svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M8 12h.01M12 12h.01M16 12h.01M21 12c0 4.418-4.03 8-9 8a9.863 9.863 0 01-4.255-.949L3 20l1.395-3.72C3.512 15.042 3 13.574 3 12c0-4.418 4.03-8 9-8s9 3.582 9 8z"/></svg> {{ pr.comment_count }}</span>{% endif %}
        </div>
      </div>
{% endfor %}
{% endfor %}
      </div>
    </div>
    <script>
      const KEY = "seen_prs";
      const seen = new Set(JSON.parse(localStorage.getItem(KEY) || "[]"));
      function markSeen(row) {
        row.classList.remove("border-l-blue-500");
        row.classList.add("border-l-transparent");
      }
      document.querySelectorAll(".pr-row").forEach(row => {
        const url = row.dataset.prUrl;
        if (seen.has(url)) markSeen(row);
        row.querySelectorAll("a").forEach(a => {
          a.addEventListener("click", () => {
            seen.add(url);
            localStorage.setItem(KEY, JSON.stringify([...seen]));
            markSeen(row);
          });
        });
      });
    </script>
  </body>
</html>
"##;

#[derive(Debug, Serialize)]
struct RepoSection {
    name: String,
    url: String,
    prs: Vec<PrRow>,
}

#[derive(Debug, Serialize)]
struct PrRow {
    number: u64,
    title: String,
    url: String,
    author: String,
    ago: String,
    draft: bool,
    ci: String,
    needs_attention: bool,
    labels: Vec<Badge>,
    comment_count: u64,
    review_count: u64,
}

#[derive(Debug, Serialize)]
struct Badge {
    name: String,
    color: String,
    text_color: &'static str,
}

/// Light text on dark badges, dark text on light ones, per the perceived
/// luminance of the background color.
fn badge_text_color(color: &str) -> &'static str {
    let channel = |range| u8::from_str_radix(color.get(range).unwrap_or_default(), 16);
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => {
            let lum = (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0;
            if lum < 0.6 { "#fff" } else { "#24292f" }
        }
        _ => "#24292f",
    }
}

fn pr_row(classified: &ClassifiedPr) -> PrRow {
    let pr = &classified.pr;
    PrRow {
        number: pr.number,
        title: pr.title.clone(),
        url: pr.url.clone(),
        author: pr.author.clone(),
        ago: HumanTime::from(pr.created_at).to_string(),
        draft: pr.is_draft,
        ci: pr.ci_state.to_string(),
        needs_attention: classified.needs_attention,
        labels: pr
            .labels
            .iter()
            .map(|label| Badge {
                name: label.name.clone(),
                text_color: badge_text_color(&label.color),
                color: if label.color.len() == 6 {
                    label.color.clone()
                } else {
                    "ededed".to_string()
                },
            })
            .collect(),
        comment_count: pr.comment_count,
        review_count: pr.review_count,
    }
}

pub fn render(queue: &ReviewQueue, org: &str) -> Result<String> {
    let repos: Vec<RepoSection> = group_by_repo(&queue.prs)
        .into_iter()
        .map(|(name, members)| RepoSection {
            name: name.to_string(),
            url: format!("https://github.com/{org}/{name}"),
            prs: members.iter().map(|c| pr_row(c)).collect(),
        })
        .collect();

    let mut env = Environment::new();
    env.add_template("report.html", TEMPLATE)
        .context("report template failed to parse")?;
    env.get_template("report.html")?
        .render(context! { org => org, total => queue.len(), repos => repos })
        .context("report template failed to render")
}

/// Writes the report beside other temp files and returns its path.
pub fn write_report(queue: &ReviewQueue, org: &str) -> Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("{org}_review_queue.html"));
    std::fs::write(&path, render(queue, org)?)
        .with_context(|| format!("failed to write report to '{}'", path.display()))?;
    Ok(path)
}

/// Best-effort launch of the platform's default browser; a failure here is
/// worth a warning, not an aborted run, since the report is already on disk.
pub fn open_in_browser(path: &Path) {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(target_os = "windows")]
    let opener = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let opener = "xdg-open";

    if let Err(err) = Command::new(opener).arg(path).spawn() {
        tracing::warn!(%err, "could not open the report in a browser");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use prtriage::{CiState, Label, PullRequest};

    fn classified(repo: &str, title: &str, needs_attention: bool) -> ClassifiedPr {
        ClassifiedPr {
            pr: PullRequest {
                repo: repo.to_string(),
                number: 3,
                title: title.to_string(),
                url: format!("https://github.com/acme/{repo}/pull/3"),
                author: "alice".to_string(),
                created_at: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
                is_draft: false,
                labels: vec![Label {
                    name: "bug".to_string(),
                    color: "d73a4a".to_string(),
                }],
                comment_count: 2,
                review_count: 1,
                requested_reviewers: Vec::new(),
                reviews: Vec::new(),
                last_commit_at: None,
                ci_state: CiState::Success,
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

    #[test]
    fn dark_labels_get_light_text() {
        assert_eq!(badge_text_color("000000"), "#fff");
        assert_eq!(badge_text_color("d73a4a"), "#fff");
        assert_eq!(badge_text_color("ffffff"), "#24292f");
        assert_eq!(badge_text_color("fbca04"), "#24292f");
    }

    #[test]
    fn malformed_colors_fall_back_to_dark_text() {
        assert_eq!(badge_text_color(""), "#24292f");
        assert_eq!(badge_text_color("zzzzzz"), "#24292f");
        assert_eq!(badge_text_color("fff"), "#24292f");
    }

    #[test]
    fn report_escapes_markup_in_titles() {
        let html = render(
            &queue(vec![classified("maglev", "<script>alert(1)</script>", true)]),
            "acme",
        )
        .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn attention_rows_carry_the_highlight_border() {
        let html = render(
            &queue(vec![
                classified("maglev", "Needs me", true),
                classified("site", "Settled", false),
            ]),
            "acme",
        )
        .unwrap();

        assert!(html.contains("border-l-blue-500"));
        assert!(html.contains("border-l-transparent"));
        assert!(html.contains("https://github.com/acme/maglev"));
        assert!(html.contains("2 open pull requests"));
    }

    #[test]
    fn empty_queue_renders_the_empty_message() {
        let html = render(&queue(Vec::new()), "acme").unwrap();

        assert!(html.contains("No open pull requests found."));
        assert!(html.contains("0 open pull requests"));
    }
}
