//! Prtriage: organization-wide pull-request review queue.
//!
//! Walks every repository in a GitHub organization, normalizes each open
//! pull request into a canonical record, decides which ones need the
//! viewer's attention, and produces a stably ranked queue for the
//! presentation layer (table, HTML report, or CSV). Fetching, classifying,
//! and ranking are strictly ordered stages; any upstream failure aborts the
//! run rather than emitting a partial queue.

pub mod attention;
pub mod cli;
pub mod config;
pub mod github;
pub mod graphql;
pub mod pages;
pub mod progress;
pub mod queue;
pub mod transport;
pub mod types;

pub use attention::needs_attention;
pub use cli::{Args, RunSettings, resolve_settings};
pub use config::{ConfigFile, OutputFormat};
pub use github::GitHub;
pub use progress::{NoProgress, Progress, Stage};
pub use queue::{ReviewQueue, build_review_queue, classify, group_by_repo, rank};
pub use transport::{GraphqlTransport, TransportError};
pub use types::{CiState, ClassifiedPr, Forge, GHOST_LOGIN, Label, PullRequest, Review};
