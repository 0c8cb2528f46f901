//! CSV export of the ranked queue.

use std::{borrow::Cow, io};

use prtriage::ReviewQueue;

/// Quotes a field when it contains a delimiter, quote, or line break;
/// embedded quotes are doubled.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains(['"', ',', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

pub fn write_csv(queue: &ReviewQueue, out: &mut impl io::Write) -> io::Result<()> {
    writeln!(out, "repo,number,title,author,created,needs_attention")?;
    for classified in &queue.prs {
        let pr = &classified.pr;
        writeln!(
            out,
            "{},{},{},{},{},{}",
            escape(&pr.repo),
            pr.number,
            escape(&pr.title),
            escape(&pr.author),
            pr.created_at.format("%Y-%m-%d"),
            classified.needs_attention,
        )?;
    }
    Ok(())
}
