// Error event query service
//
// Lists and fetches error events through an ErrorEventStore. Every store call
// is raced against the caller's cancellation token.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::error_event::{ErrorEvent, Page};
use crate::query::{EventFilter, EventQuery, EventSort, ListEventsRequest};
use crate::traits::ErrorEventStore;

pub struct EventQueryService {
    store: Arc<dyn ErrorEventStore>,
}

impl EventQueryService {
    pub fn new(store: Arc<dyn ErrorEventStore>) -> Self {
        Self { store }
    }

    /// List error events newest first, one page at a time.
    ///
    /// `total` and the page come from two separate store calls, so they can
    /// disagree if events are written in between.
    pub async fn list(
        &self,
        request: &ListEventsRequest,
        token: &CancellationToken,
    ) -> Result<Page<ErrorEvent>> {
        let (page, page_size, skip) = request.window()?;
        let filter = EventFilter::from_keyword(request.keyword.as_deref());

        let total = cancellable(token, self.store.count(&filter)).await?;

        let query = EventQuery::new(filter)
            .sort(EventSort::newest_first())
            .skip(skip)
            .take(page_size);
        let items = cancellable(token, self.store.query(&query)).await?;

        tracing::debug!(
            keyword = ?request.keyword,
            page,
            page_size,
            total,
            returned = items.len(),
            "Listed error events"
        );

        Ok(Page::new(page, page_size, items, total))
    }

    /// Fetch a single error event. A missing id is `Ok(None)`, not an error.
    pub async fn get(&self, id: &str, token: &CancellationToken) -> Result<Option<ErrorEvent>> {
        cancellable(token, self.store.find_by_id(id)).await
    }
}

/// Run a store call unless the token fires first
async fn cancellable<T, F>(token: &CancellationToken, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Error::Cancelled),
        result = call => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryErrorEventStore;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn event(id: &str, account: &str, secs: i64) -> ErrorEvent {
        ErrorEvent::new(id, account, Utc.timestamp_opt(secs, 0).unwrap())
    }

    async fn service_with(events: Vec<ErrorEvent>) -> EventQueryService {
        let store = InMemoryErrorEventStore::new();
        store.seed(events).await;
        EventQueryService::new(Arc::new(store))
    }

    fn ids(page: &Page<ErrorEvent>) -> Vec<&str> {
        page.items.iter().map(|e| e.id.as_str()).collect()
    }

    /// Store whose calls never complete, counting how often it was called
    #[derive(Default)]
    struct StalledStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ErrorEventStore for StalledStore {
        async fn count(&self, _filter: &EventFilter) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }

        async fn query(&self, _query: &EventQuery) -> Result<Vec<ErrorEvent>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }

        async fn find_by_id(&self, _id: &str) -> Result<Option<ErrorEvent>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ErrorEventStore for FailingStore {
        async fn count(&self, _filter: &EventFilter) -> Result<u64> {
            Err(Error::store("connection reset"))
        }

        async fn query(&self, _query: &EventQuery) -> Result<Vec<ErrorEvent>> {
            Err(Error::store("connection reset"))
        }

        async fn find_by_id(&self, _id: &str) -> Result<Option<ErrorEvent>> {
            Err(Error::store("connection reset"))
        }
    }

    #[tokio::test]
    async fn test_keyword_filter_and_order() {
        let service = service_with(vec![
            event("1", "bob", 5),
            event("2", "alice", 3),
            event("3", "bob2", 5),
            event("4", "carol", 1),
        ])
        .await;

        let request = ListEventsRequest::new().keyword("bob").page(1).page_size(10);
        let page = service.list(&request, &CancellationToken::new()).await.unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
        let names: HashSet<&str> = page.items.iter().map(|e| e.account_name.as_str()).collect();
        assert_eq!(names, HashSet::from(["bob", "bob2"]));
        assert!(page.items.iter().all(|e| e.created_time.timestamp() == 5));
    }

    #[tokio::test]
    async fn test_second_page_offsets() {
        let service = service_with(vec![
            event("a", "x", 10),
            event("b", "x", 50),
            event("c", "x", 30),
            event("d", "x", 20),
            event("e", "x", 40),
        ])
        .await;

        let request = ListEventsRequest::new().page(2).page_size(2);
        let page = service.list(&request, &CancellationToken::new()).await.unwrap();

        // sorted: b(50) e(40) c(30) d(20) a(10)
        assert_eq!(ids(&page), vec!["c", "d"]);
        assert_eq!(page.total, 5);
    }

    #[tokio::test]
    async fn test_items_are_newest_first() {
        let service = service_with(vec![
            event("a", "x", 3),
            event("b", "x", 9),
            event("c", "x", 1),
            event("d", "x", 9),
            event("e", "x", 4),
        ])
        .await;

        let page = service
            .list(&ListEventsRequest::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(page
            .items
            .windows(2)
            .all(|w| w[0].created_time >= w[1].created_time));
    }

    #[tokio::test]
    async fn test_empty_keyword_counts_everything() {
        let service = service_with(vec![event("a", "bob", 1), event("b", "alice", 2)]).await;

        let page = service
            .list(&ListEventsRequest::new().keyword(""), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_pages_concatenate_without_gaps_or_duplicates() {
        let events: Vec<ErrorEvent> = (0..23)
            .map(|i| event(&format!("e{i}"), if i % 3 == 0 { "team-a" } else { "team-b" }, (i * 7) % 11))
            .collect();
        let service = service_with(events).await;
        let token = CancellationToken::new();

        let full = service
            .list(&ListEventsRequest::new().keyword("team-b"), &token)
            .await
            .unwrap();

        let mut stitched = Vec::new();
        for page in 1..=4 {
            let request = ListEventsRequest::new().keyword("team-b").page(page).page_size(4);
            let result = service.list(&request, &token).await.unwrap();
            assert_eq!(result.total, full.total);
            stitched.extend(result.items);
        }

        let expected: Vec<&str> = full.items.iter().take(16).map(|e| e.id.as_str()).collect();
        let got: Vec<&str> = stitched.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(got, expected);
        let unique: HashSet<&str> = got.iter().copied().collect();
        assert_eq!(unique.len(), got.len());
    }

    #[tokio::test]
    async fn test_page_past_end_keeps_total() {
        let service = service_with(vec![event("a", "x", 1), event("b", "x", 2)]).await;

        let page = service
            .list(&ListEventsRequest::new().page(3).page_size(5), &CancellationToken::new())
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_invalid_pagination_skips_store() {
        let store = Arc::new(StalledStore::default());
        let service = EventQueryService::new(store.clone());

        let err = service
            .list(&ListEventsRequest::new().page(0), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidPagination(_)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_existing_and_missing() {
        let service = service_with(vec![event("a", "bob", 1)]).await;
        let token = CancellationToken::new();

        let found = service.get("a", &token).await.unwrap();
        assert_eq!(found.unwrap().account_name, "bob");

        let missing = service.get("nope", &token).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_token_never_reaches_store() {
        let store = Arc::new(StalledStore::default());
        let service = EventQueryService::new(store.clone());
        let token = CancellationToken::new();
        token.cancel();

        let list_err = service.list(&ListEventsRequest::new(), &token).await.unwrap_err();
        let get_err = service.get("a", &token).await.unwrap_err();

        assert!(list_err.is_cancelled());
        assert!(get_err.is_cancelled());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_mid_flight_aborts_list() {
        let store = Arc::new(StalledStore::default());
        let service = EventQueryService::new(store.clone());
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = service.list(&ListEventsRequest::new(), &token).await.unwrap_err();

        assert!(err.is_cancelled());
        // Count was in flight; the fetch was never issued
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let service = EventQueryService::new(Arc::new(FailingStore));
        let token = CancellationToken::new();

        let err = service.list(&ListEventsRequest::new(), &token).await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));

        let err = service.get("a", &token).await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }
}
