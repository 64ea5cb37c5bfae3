//! Search session
//!
//! Connects a [`FilterStore`] to a [`ListingSource`]. Every commit issues
//! exactly one query; only the response to the most recently issued query is
//! applied, older responses are dropped on arrival.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::data::error::DataError;
use crate::data::types::Listing;
use crate::domain::filters::{
    FilterGroup, FilterStore, GroupChange, GroupDraft, ListingQuery, Snapshot, translate,
};

/// Anything able to answer a listing query
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, DataError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// No query issued yet
    Idle,
    Loading,
    Ready,
    /// Last query failed; listings are empty
    Failed,
}

/// Displayed result set
#[derive(Debug, Clone)]
pub struct SearchResults {
    /// Request sequence number these listings answer (0 before the first query)
    pub revision: u64,
    pub status: SearchStatus,
    pub listings: Arc<Vec<Listing>>,
}

impl SearchResults {
    fn idle() -> Self {
        Self {
            revision: 0,
            status: SearchStatus::Idle,
            listings: Arc::new(Vec::new()),
        }
    }
}

struct Shared {
    source: Arc<dyn ListingSource>,
    latest: AtomicU64,
    results: watch::Sender<SearchResults>,
}

pub struct SearchSession {
    store: FilterStore,
    /// Held across store commit, translation and sequence assignment, so a
    /// higher sequence number always carries the newer filters and city
    city_id: Mutex<Option<i64>>,
    shared: Arc<Shared>,
}

impl SearchSession {
    pub fn new(source: Arc<dyn ListingSource>, city_id: Option<i64>) -> Self {
        let (results, _) = watch::channel(SearchResults::idle());
        Self {
            store: FilterStore::new(),
            city_id: Mutex::new(city_id),
            shared: Arc::new(Shared {
                source,
                latest: AtomicU64::new(0),
                results,
            }),
        }
    }

    pub fn filters(&self) -> Snapshot {
        self.store.current()
    }

    pub fn draft(&self, group: FilterGroup) -> GroupDraft {
        self.store.draft(group)
    }

    pub fn results(&self) -> SearchResults {
        self.shared.results.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.shared.results.subscribe()
    }

    /// Query with the current filters, e.g. on first display
    pub fn refresh(&self) -> JoinHandle<()> {
        let city_id = self.city_id.lock();
        self.issue(&self.store.current(), *city_id)
    }

    pub fn apply_group(&self, change: GroupChange) -> JoinHandle<()> {
        let city_id = self.city_id.lock();
        let snapshot = self.store.apply_group(change);
        self.issue(&snapshot, *city_id)
    }

    /// Commit a draft; no query is issued when the draft was discarded by a reset
    pub fn commit(&self, draft: GroupDraft) -> Option<JoinHandle<()>> {
        let city_id = self.city_id.lock();
        draft
            .commit(&self.store)
            .map(|snapshot| self.issue(&snapshot, *city_id))
    }

    pub fn reset(&self) -> JoinHandle<()> {
        let city_id = self.city_id.lock();
        let snapshot = self.store.reset();
        self.issue(&snapshot, *city_id)
    }

    /// Switch city; filters are kept
    pub fn set_city(&self, city_id: Option<i64>) -> JoinHandle<()> {
        let mut current = self.city_id.lock();
        *current = city_id;
        self.issue(&self.store.current(), city_id)
    }

    /// Caller holds the `city_id` lock
    fn issue(&self, snapshot: &Snapshot, city_id: Option<i64>) -> JoinHandle<()> {
        let query = translate(&snapshot.state, city_id);
        let seq = self.shared.latest.fetch_add(1, Ordering::SeqCst) + 1;

        self.shared.results.send_modify(|r| r.status = SearchStatus::Loading);
        tracing::debug!(
            seq,
            filter_revision = snapshot.revision,
            criteria = query.criteria.len(),
            "Issuing listing query"
        );

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome = shared.source.search(&query).await;
            shared.apply(seq, outcome);
        })
    }
}

impl Shared {
    fn apply(&self, seq: u64, outcome: Result<Vec<Listing>, DataError>) {
        let applied = self.results.send_if_modified(|current| {
            if seq != self.latest.load(Ordering::SeqCst) || seq <= current.revision {
                return false;
            }
            *current = match &outcome {
                Ok(listings) => SearchResults {
                    revision: seq,
                    status: SearchStatus::Ready,
                    listings: Arc::new(listings.clone()),
                },
                Err(_) => SearchResults {
                    revision: seq,
                    status: SearchStatus::Failed,
                    listings: Arc::new(Vec::new()),
                },
            };
            true
        });

        match (&outcome, applied) {
            (Err(e), true) => tracing::warn!(seq, error = %e, "Listing query failed"),
            (_, false) => tracing::debug!(seq, "Dropping stale listing response"),
            (Ok(_), true) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tokio::sync::oneshot;

    use super::*;
    use crate::domain::filters::PriceFilter;

    fn listing(id: i64) -> Listing {
        Listing {
            id,
            name: format!("Listing {}", id),
            ..Default::default()
        }
    }

    /// Answers each city's query only when the test releases its gate
    #[derive(Default)]
    struct GatedSource {
        gates: Mutex<HashMap<Option<i64>, oneshot::Receiver<Vec<Listing>>>>,
    }

    impl GatedSource {
        fn gate(&self, city_id: Option<i64>) -> oneshot::Sender<Vec<Listing>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().insert(city_id, rx);
            tx
        }
    }

    #[async_trait]
    impl ListingSource for GatedSource {
        async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, DataError> {
            let rx = self.gates.lock().remove(&query.city_id);
            match rx {
                Some(rx) => Ok(rx.await.unwrap_or_default()),
                None => Ok(Vec::new()),
            }
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ListingSource for FailingSource {
        async fn search(&self, _query: &ListingQuery) -> Result<Vec<Listing>, DataError> {
            Err(DataError::Sqlite(sqlx::Error::PoolTimedOut))
        }
    }

    /// Records every query it receives
    #[derive(Default)]
    struct RecordingSource {
        queries: Mutex<Vec<ListingQuery>>,
    }

    #[async_trait]
    impl ListingSource for RecordingSource {
        async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, DataError> {
            self.queries.lock().push(query.clone());
            Ok(vec![listing(1)])
        }
    }

    /// Answers every query with one listing named after the query itself
    struct EchoSource;

    #[async_trait]
    impl ListingSource for EchoSource {
        async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, DataError> {
            tokio::task::yield_now().await;
            Ok(vec![Listing {
                name: format!("{:?}", query),
                ..Default::default()
            }])
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_commits_settle_on_latest_filters() {
        let session = Arc::new(SearchSession::new(Arc::new(EchoSource), Some(1)));

        let mut callers = Vec::new();
        for i in 0..64u32 {
            let session = Arc::clone(&session);
            callers.push(tokio::spawn(async move {
                if i % 16 == 15 {
                    session.set_city(Some(i64::from(i)))
                } else {
                    session.apply_group(GroupChange::Price(PriceFilter {
                        from: Some(1000 + i),
                        to: None,
                        has_express: false,
                    }))
                }
            }));
        }
        let mut queries = Vec::new();
        for caller in callers {
            queries.push(caller.await.unwrap());
        }
        for query in queries {
            query.await.unwrap();
        }

        let city_id = *session.city_id.lock();
        let expected = format!("{:?}", translate(&session.filters().state, city_id));
        let results = session.results();
        assert_eq!(results.revision, 64);
        assert_eq!(results.status, SearchStatus::Ready);
        assert_eq!(results.listings[0].name, expected);
    }

    #[tokio::test]
    async fn test_stale_response_never_replaces_newer() {
        let source = Arc::new(GatedSource::default());
        let first = source.gate(Some(1));
        let second = source.gate(Some(2));
        let session = SearchSession::new(source.clone(), Some(1));

        let slow = session.refresh();
        let fast = session.set_city(Some(2));

        second.send(vec![listing(20)]).unwrap();
        fast.await.unwrap();
        first.send(vec![listing(10)]).unwrap();
        slow.await.unwrap();

        let results = session.results();
        assert_eq!(results.revision, 2);
        assert_eq!(results.status, SearchStatus::Ready);
        assert_eq!(results.listings.len(), 1);
        assert_eq!(results.listings[0].id, 20);
    }

    #[tokio::test]
    async fn test_late_response_for_old_query_is_dropped_even_if_newer_pending() {
        let source = Arc::new(GatedSource::default());
        let first = source.gate(Some(1));
        let _pending = source.gate(Some(2));
        let session = SearchSession::new(source.clone(), Some(1));

        let slow = session.refresh();
        let _newer = session.set_city(Some(2));

        first.send(vec![listing(10)]).unwrap();
        slow.await.unwrap();

        let results = session.results();
        assert_eq!(results.revision, 0);
        assert_eq!(results.status, SearchStatus::Loading);
        assert!(results.listings.is_empty());
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_results() {
        let session = SearchSession::new(Arc::new(FailingSource), None);
        session.refresh().await.unwrap();

        let results = session.results();
        assert_eq!(results.status, SearchStatus::Failed);
        assert!(results.listings.is_empty());
        assert_eq!(results.revision, 1);
    }

    #[tokio::test]
    async fn test_each_commit_issues_exactly_one_query() {
        let source = Arc::new(RecordingSource::default());
        let session = SearchSession::new(source.clone(), Some(1));

        let mut draft = session.draft(FilterGroup::District);
        draft.toggle("Центр").unwrap();
        draft.toggle("Арбат").unwrap();
        draft.toggle("Арбат").unwrap();
        assert!(source.queries.lock().is_empty());

        session.commit(draft).unwrap().await.unwrap();
        session.apply_group(GroupChange::Outcall(true)).await.unwrap();
        session.reset().await.unwrap();

        let queries = source.queries.lock();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0].criteria.len(), 1);
        assert_eq!(queries[1].criteria.len(), 2);
        assert!(queries[2].criteria.is_empty());
        assert!(queries.iter().all(|q| q.city_id == Some(1)));
    }

    #[tokio::test]
    async fn test_draft_discarded_by_reset_issues_no_query() {
        let source = Arc::new(RecordingSource::default());
        let session = SearchSession::new(source.clone(), None);

        let mut draft = session.draft(FilterGroup::Gender);
        draft.toggle("female").unwrap();
        session.reset().await.unwrap();

        assert!(session.commit(draft).is_none());
        assert_eq!(source.queries.lock().len(), 1);
    }
}
