//! Pagination plumbing shared by the list endpoints.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::Stream;

/// One fetched page: the items plus the token for the page after it, if any.
pub type Page<T> = (VecDeque<T>, Option<String>);

type PendingPage<'a, F, T> = Pin<Box<dyn Future<Output = eyre::Result<(F, Page<T>)>> + 'a + Send>>;

/// A stream over every item of a paginated `*.list` endpoint.
///
/// Pages are requested lazily: the next page is only fetched once the items of the current one
/// have all been yielded. The fetcher is handed `None` for the first page and the previous
/// response's `nextPageToken` after that. An absent or empty token ends the stream.
///
/// After an error the stream is fused and yields nothing more.
pub struct PagedStream<'a, T, F> {
    /// Items from the latest page that have not been yielded yet
    buffered: VecDeque<T>,
    /// The request for the next page, if one is outstanding
    in_flight: Option<PendingPage<'a, F, T>>,
    /// How many pages have come back so far
    pages_seen: usize,
    /// Whether the last page has been received or an error was yielded
    exhausted: bool,
}

impl<'a, T, F> PagedStream<'a, T, F> {
    pub fn new<Fut>(fetcher: F) -> Self
    where
        F: Fn(Option<String>) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = eyre::Result<Page<T>>> + Send + 'a,
    {
        let first = async move {
            let page = fetcher(None).await?;
            Ok((fetcher, page))
        };
        Self {
            buffered: VecDeque::new(),
            in_flight: Some(Box::pin(first)),
            pages_seen: 0,
            exhausted: false,
        }
    }

    /// Number of pages received so far.
    pub fn pages_seen(&self) -> usize {
        self.pages_seen
    }
}

impl<'a, T: Unpin, F> Unpin for PagedStream<'a, T, F> {}

impl<'a, T: Unpin, F, Fut> Stream for PagedStream<'a, T, F>
where
    F: Fn(Option<String>) -> Fut,
    F: Send + 'a,
    Fut: Future<Output = eyre::Result<Page<T>>> + Send + 'a,
{
    type Item = eyre::Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if self.exhausted {
                return Poll::Ready(None);
            }

            let Some(pending) = self.in_flight.as_mut() else {
                self.exhausted = true;
                return Poll::Ready(None);
            };

            match pending.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) => {
                    self.in_flight = None;
                    self.exhausted = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(Ok((fetcher, (items, next_token)))) => {
                    self.pages_seen += 1;
                    tracing::trace!(
                        page = self.pages_seen,
                        items = items.len(),
                        has_next = next_token.is_some(),
                        "received page"
                    );
                    self.buffered.extend(items);

                    // the API has been seen to send `""` on the last page
                    match next_token.filter(|t| !t.is_empty()) {
                        Some(token) => {
                            self.in_flight = Some(Box::pin(async move {
                                let page = fetcher(Some(token)).await?;
                                Ok((fetcher, page))
                            }));
                        }
                        None => {
                            self.in_flight = None;
                            self.exhausted = true;
                        }
                    }
                }
            }
        }
    }
}

/// Paging details for lists of resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct PageInfo {
    /// The total number of results in the result set.
    #[serde(rename = "totalResults", default)]
    pub total_results: u32,
}
