//! Paginated fetch cursor.
//!
//! Remote listings arrive in pages; consumers want one translated entity at
//! a time. `Paginated` buffers one fetched page in a FIFO queue and refills
//! on demand, preserving server order. Exhaustion is final: a cursor cannot
//! be rewound, refetching requires a fresh instance.

use std::collections::VecDeque;

use async_trait::async_trait;

use super::errors::Result;

/// Pull-based sequence of translated entities.
#[async_trait]
pub trait Cursor<T>: Send {
    /// Next item in server order; `Ok(None)` signals end-of-sequence.
    async fn try_next(&mut self) -> Result<Option<T>>;
}

/// One fetched, translated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Whether the response's pagination marker promises further pages.
    pub has_more: bool,
}

/// What a page request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome<T> {
    /// A well-formed page of translated records.
    Items(Page<T>),
    /// The response body was an application-level error payload. The
    /// listing is treated as exhausted; the run continues.
    Failed { message: String },
}

/// One remote paged listing, addressed by offset and page size.
#[async_trait]
pub trait PageSource: Send {
    type Item: Send;

    /// Human-readable listing name, used when logging a soft failure.
    fn label(&self) -> String;

    /// Fetch and translate the page starting at `offset`.
    ///
    /// Transport, semantic and translation failures are returned as errors
    /// and propagate to the caller; an application-level error payload in
    /// an otherwise delivered response is reported as
    /// [`PageOutcome::Failed`].
    async fn page(&mut self, offset: u64, limit: u64) -> Result<PageOutcome<Self::Item>>;
}

/// Lazy cursor over a [`PageSource`].
pub struct Paginated<S: PageSource> {
    source: S,
    offset: u64,
    limit: u64,
    buffer: VecDeque<S::Item>,
    exhausted: bool,
}

impl<S: PageSource> Paginated<S> {
    pub fn new(source: S, limit: u64) -> Self {
        Self {
            source,
            offset: 0,
            limit,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }
}

#[async_trait]
impl<S: PageSource> Cursor<S::Item> for Paginated<S> {
    async fn try_next(&mut self) -> Result<Option<S::Item>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            if self.exhausted {
                return Ok(None);
            }

            match self.source.page(self.offset, self.limit).await? {
                PageOutcome::Items(page) => {
                    self.offset += self.limit;
                    self.exhausted = !page.has_more;
                    self.buffer.extend(page.items);
                }
                PageOutcome::Failed { message } => {
                    tracing::warn!(
                        listing = %self.source.label(),
                        error = %message,
                        "remote listing reported an error; treating it as exhausted"
                    );
                    self.exhausted = true;
                    return Ok(None);
                }
            }
        }
    }
}

/// Cursor over an already-materialized list (unpaginated listings).
pub struct FixedCursor<T> {
    items: VecDeque<T>,
}

impl<T> FixedCursor<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn empty() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

#[async_trait]
impl<T: Send> Cursor<T> for FixedCursor<T> {
    async fn try_next(&mut self) -> Result<Option<T>> {
        Ok(self.items.pop_front())
    }
}

/// Drain a cursor into a vector. Mostly useful in export mode and tests;
/// the harvest driver deliberately does not do this.
pub async fn collect<T>(cursor: &mut dyn Cursor<T>) -> Result<Vec<T>> {
    let mut items = Vec::new();
    while let Some(item) = cursor.try_next().await? {
        items.push(item);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;

    /// Scripted page source: yields from a fixed set of outcomes.
    struct Scripted {
        pages: VecDeque<PageOutcome<u64>>,
        requests: Vec<(u64, u64)>,
    }

    impl Scripted {
        fn new(pages: Vec<PageOutcome<u64>>) -> Self {
            Self {
                pages: pages.into(),
                requests: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl PageSource for Scripted {
        type Item = u64;

        fn label(&self) -> String {
            "scripted".to_string()
        }

        async fn page(&mut self, offset: u64, limit: u64) -> Result<PageOutcome<u64>> {
            self.requests.push((offset, limit));
            match self.pages.pop_front() {
                Some(outcome) => Ok(outcome),
                None => Err(SourceError::transport("page requested past script end")),
            }
        }
    }

    fn page(items: Vec<u64>, has_more: bool) -> PageOutcome<u64> {
        PageOutcome::Items(Page { items, has_more })
    }

    #[tokio::test]
    async fn yields_all_items_in_server_order_then_signals_end() {
        // 39 items paged 20 + 19, like a forge module listing
        let first: Vec<u64> = (0..20).collect();
        let second: Vec<u64> = (20..39).collect();
        let mut cursor = Paginated::new(
            Scripted::new(vec![page(first, true), page(second, false)]),
            20,
        );

        let items = collect(&mut cursor).await.expect("collect should succeed");
        assert_eq!(items, (0..39).collect::<Vec<u64>>());

        // End-of-sequence is repeatable, not an error
        assert_eq!(cursor.try_next().await.expect("end"), None);
        assert_eq!(cursor.try_next().await.expect("end"), None);
    }

    #[tokio::test]
    async fn advances_offset_by_page_size() {
        let mut cursor = Paginated::new(
            Scripted::new(vec![
                page((0..20).collect(), true),
                page((20..30).collect(), false),
            ]),
            20,
        );
        let _ = collect(&mut cursor).await.expect("collect should succeed");
        assert_eq!(cursor.source.requests, vec![(0, 20), (20, 20)]);
    }

    #[tokio::test]
    async fn empty_listing_yields_nothing() {
        let mut cursor = Paginated::new(Scripted::new(vec![page(vec![], false)]), 20);
        assert_eq!(cursor.try_next().await.expect("end"), None);
    }

    #[tokio::test]
    async fn skips_empty_page_when_more_are_promised() {
        let mut cursor = Paginated::new(
            Scripted::new(vec![page(vec![], true), page(vec![7], false)]),
            20,
        );
        let items = collect(&mut cursor).await.expect("collect should succeed");
        assert_eq!(items, vec![7]);
    }

    #[tokio::test]
    async fn error_payload_is_soft_end_of_stream() {
        let mut cursor = Paginated::new(
            Scripted::new(vec![PageOutcome::Failed {
                message: "'nothing' is not a valid module slug".to_string(),
            }]),
            20,
        );
        // Zero items, no error
        assert_eq!(cursor.try_next().await.expect("soft end"), None);
        assert_eq!(cursor.try_next().await.expect("soft end"), None);
    }

    #[tokio::test]
    async fn error_payload_after_items_keeps_earlier_items() {
        let mut cursor = Paginated::new(
            Scripted::new(vec![
                page((0..20).collect(), true),
                PageOutcome::Failed {
                    message: "listing broke".to_string(),
                },
            ]),
            20,
        );
        let items = collect(&mut cursor).await.expect("collect should succeed");
        assert_eq!(items.len(), 20);
    }

    #[tokio::test]
    async fn transport_error_propagates() {
        let mut cursor: Paginated<Scripted> = Paginated::new(Scripted::new(vec![]), 20);
        let err = cursor.try_next().await.expect_err("should propagate");
        assert!(matches!(err, SourceError::Transport { .. }));
    }

    #[tokio::test]
    async fn fixed_cursor_yields_in_order() {
        let mut cursor = FixedCursor::new(vec!["a", "b"]);
        assert_eq!(cursor.try_next().await.expect("item"), Some("a"));
        assert_eq!(cursor.try_next().await.expect("item"), Some("b"));
        assert_eq!(cursor.try_next().await.expect("end"), None);
    }
}
