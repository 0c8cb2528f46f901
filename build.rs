//! Embeds human-readable build information for `--version` output.
//!
//! Prefers `git describe --tags --always --dirty`; when the checkout has no
//! tags (or git is unavailable) falls back to a pseudo-version built from the
//! Cargo.toml version and a timestamp, so installed binaries still report
//! something traceable.

use std::process::Command;

use chrono::Utc;

fn main() {
    ["src", "build.rs", "Cargo.toml"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    let version = git_describe().unwrap_or_else(pseudo_version);
    let rustc = rustc_version().unwrap_or_else(|| "rustc unknown".to_string());

    println!(
        "cargo:rustc-env=BUILD_INFO_HUMAN={} ({version}) {rustc}",
        env!("CARGO_PKG_VERSION")
    );
}

fn run(cmd: &str, args: &[&str]) -> Option<String> {
    Command::new(cmd)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn git_describe() -> Option<String> {
    run("git", &["describe", "--tags", "--always", "--dirty"])
        // A bare hash means there are no tags to describe against.
        .filter(|desc| desc.contains('v') || desc.contains("-g"))
}

fn pseudo_version() -> String {
    let commit =
        run("git", &["rev-parse", "--short=12", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    format!("v{}-{timestamp}-{commit}", env!("CARGO_PKG_VERSION"))
}

fn rustc_version() -> Option<String> {
    run("rustc", &["--version"])
}
