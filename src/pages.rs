//! Cursor-pagination walker.
//!
//! GitHub's GraphQL connections paginate with an opaque cursor: each page
//! carries `hasNextPage` and `endCursor`, and the absence of a next cursor
//! marks the last page. [`walk`] turns a per-page fetch function into a
//! stream of pages; [`collect_all`] drains that stream into the concatenation
//! of every page in upstream order.
//!
//! The walker makes exactly one fetch call per page, assumes no bound on the
//! number of pages, and aborts the whole walk on the first error: callers
//! either get the complete item set or none of it.

use std::future::Future;

use futures::{Stream, TryStreamExt, stream};

/// One page of results plus the cursor for the next page, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor to pass to the next fetch. `None` terminates the walk.
    pub next: Option<String>,
}

enum State {
    Fetch(Option<String>),
    Done,
}

/// Streams pages from `fetch` until it stops returning a cursor.
///
/// The first call receives `None`; each later call receives the cursor the
/// previous page announced.
pub fn walk<T, E, F, Fut>(mut fetch: F) -> impl Stream<Item = Result<Vec<T>, E>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    stream::try_unfold(State::Fetch(None), move |state| {
        let pending = match state {
            State::Fetch(cursor) => Some(fetch(cursor)),
            State::Done => None,
        };
        async move {
            let Some(pending) = pending else {
                return Ok(None);
            };
            let page = pending.await?;
            let state = match page.next {
                Some(cursor) => State::Fetch(Some(cursor)),
                None => State::Done,
            };
            Ok(Some((page.items, state)))
        }
    })
}

/// Concatenation of every page, in upstream order.
pub async fn collect_all<T, E, F, Fut>(fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    walk(fetch).try_concat().await
}
