mod export;
mod report;
mod spinner;
mod table;

use anyhow::Result;
use clap::Parser;
use prtriage::{Args, GitHub, OutputFormat, build_review_queue, resolve_settings};
use spinner::SpinnerProgress;

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    // Tokens are commonly kept in a .env next to the settings file.
    dotenvy::dotenv().ok();

    let settings = resolve_settings(Args::parse())?;
    let forge = GitHub::from_env()?;
    let progress = SpinnerProgress::new();

    let queue = build_review_queue(&forge, &settings.org, &settings.ignore, &progress).await?;

    let mut stdout = std::io::stdout();
    match settings.output {
        OutputFormat::Table => table::print_table(&queue, &mut stdout)?,
        OutputFormat::Csv => export::write_csv(&queue, &mut stdout)?,
        OutputFormat::Html => {
            let path = report::write_report(&queue, &settings.org)?;
            println!("{}", path.display());
            if settings.open_browser {
                report::open_in_browser(&path);
            }
        }
    }

    Ok(())
}
