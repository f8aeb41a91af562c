//! Article feed driven by the filter store
//!
//! Each first-page fetch takes a new generation number. A response is only
//! applied while its generation is still current, so an older slow response
//! can never overwrite the result of a newer filter. Follow-up pages carry the
//! generation of the listing they extend. Searches are numbered the same way
//! on their own counter.

use chrono::Utc;
use newsdesk_common::{
    api::{ArticleView, SearchRequest, SearchType},
    query::{ArticleFilter, ArticleQuery, Pagination},
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::DashboardApi;
use crate::store::{FilterStore, SearchResults};

/// Shown for any failed fetch
pub const LOAD_ERROR: &str = "Failed to load articles";
pub const SEARCH_ERROR: &str = "Search failed";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeedStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub articles: Vec<ArticleView>,
    pub pagination: Option<Pagination>,
    pub status: FeedStatus,
    pub loading_more: bool,
    /// Overrides `articles` while present
    pub search: Option<SearchResults>,
    /// Query behind `articles`, reused by `load_more`
    pub query: Option<ArticleQuery>,
    /// Generation of the first-page fetch that produced `articles`
    pub generation: u64,
}

impl FeedState {
    /// Rows to render: search results when a search is active
    pub fn visible(&self) -> &[ArticleView] {
        match &self.search {
            Some(results) => &results.articles,
            None => &self.articles,
        }
    }

    pub fn can_load_more(&self) -> bool {
        self.search.is_none() && self.pagination.is_some_and(|p| p.has_more)
    }

    /// Count line shown above the list
    pub fn summary(&self) -> String {
        if let Some(results) = &self.search {
            let n = results.articles.len();
            let noun = if n == 1 { "search result" } else { "search results" };
            return format!("{} {} for \"{}\"", n, noun, results.query);
        }

        let shown = self.articles.len() as u64;
        let total = self.pagination.map(|p| p.total).unwrap_or(shown).max(shown);

        match (shown, total) {
            (_, 0) => "No articles found".to_string(),
            (1, 1) => "1 article".to_string(),
            (shown, total) if shown == total => format!("{} articles", total),
            (shown, total) => format!("Showing {} of {} articles", shown, total),
        }
    }
}

pub struct ArticleFeed<A> {
    api: Arc<A>,
    store: FilterStore,
    page_size: u64,
    generation: AtomicU64,
    search_generation: AtomicU64,
    state: watch::Sender<FeedState>,
}

impl<A: DashboardApi + 'static> ArticleFeed<A> {
    pub fn new(api: Arc<A>, store: FilterStore, page_size: u64) -> Self {
        let (state, _rx) = watch::channel(FeedState::default());
        Self {
            api,
            store,
            page_size: page_size.max(1),
            generation: AtomicU64::new(0),
            search_generation: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Follow the store until it is dropped: refetch on filter changes and
    /// mirror search results into the feed state.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self: Arc<Self>) {
        let mut rx = self.store.subscribe();
        let mut last_filter: Option<ArticleFilter> = None;

        loop {
            let snapshot = rx.borrow_and_update().clone();

            let search = snapshot.search;
            self.state.send_if_modified(|state| {
                let changed = state.search != search;
                state.search = search;
                changed
            });

            if last_filter.as_ref() != Some(&snapshot.filter) {
                let filter = snapshot.filter;
                last_filter = Some(filter.clone());
                // Numbered here so filter order decides, not task scheduling
                let generation = self.begin_refresh();
                let feed = Arc::clone(&self);
                tokio::spawn(async move { feed.fetch_first_page(generation, &filter).await });
            }

            if rx.changed().await.is_err() {
                break;
            }
        }
    }

    /// Fetch the first page for the store's current filter
    pub async fn refresh(&self) {
        let filter = self.store.snapshot().filter;
        self.refresh_with(&filter).await;
    }

    /// Fetch the first page for `filter`, superseding any fetch in flight
    pub async fn refresh_with(&self, filter: &ArticleFilter) {
        let generation = self.begin_refresh();
        self.fetch_first_page(generation, filter).await;
    }

    fn begin_refresh(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.status = FeedStatus::Loading;
            state.loading_more = false;
        });
        generation
    }

    async fn fetch_first_page(&self, generation: u64, filter: &ArticleFilter) {
        let query = filter.to_query(Utc::now(), 0, self.page_size);
        let result = self.api.list_articles(&query).await;

        if !self.is_current(generation) {
            tracing::debug!(generation, "Discarding superseded article response");
            return;
        }

        self.state.send_modify(|state| {
            state.generation = generation;
            match result {
                Ok(response) => {
                    state.articles = response.articles;
                    state.pagination = Some(response.pagination);
                    state.query = Some(query);
                    state.status = FeedStatus::Ready;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Article fetch failed");
                    state.articles.clear();
                    state.pagination = None;
                    state.query = None;
                    state.status = FeedStatus::Error(LOAD_ERROR.to_string());
                }
            }
        });
    }

    /// Append the next page of the current listing, if there is one
    pub async fn load_more(&self) {
        let (mut query, next_page, generation) = {
            let state = self.state.borrow();
            let idle = state.status != FeedStatus::Loading && !state.loading_more;
            let next = state.pagination.and_then(|p| p.next_page());
            match (state.query.clone(), next) {
                (Some(query), Some(next)) if idle && state.search.is_none() => {
                    (query, next, state.generation)
                }
                _ => return,
            }
        };
        query.page = Some(next_page);

        if !self.is_current(generation) {
            return;
        }
        self.state.send_modify(|state| state.loading_more = true);

        let result = self.api.list_articles(&query).await;

        if !self.is_current(generation) {
            tracing::debug!(generation, "Discarding page for superseded filter");
            return;
        }

        self.state.send_modify(|state| {
            state.loading_more = false;
            match result {
                Ok(response) => {
                    state.articles.extend(response.articles);
                    state.pagination = Some(response.pagination);
                    state.query = Some(query);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Loading more articles failed");
                    state.status = FeedStatus::Error(LOAD_ERROR.to_string());
                }
            }
        });
    }

    /// Run a search and publish its results through the store.
    ///
    /// Results are dropped if a newer search started or the store's search
    /// was published or cleared while this one was in flight.
    pub async fn search(&self, text: &str, search_type: SearchType) {
        let generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let text = text.trim();
        if text.is_empty() {
            self.store.clear_search();
            return;
        }

        let search_revision = self.store.snapshot().search_revision;
        let request = SearchRequest {
            query: text.to_string(),
            search_type,
            limit: self.page_size.min(100),
        };

        let result = self.api.search(&request).await;

        if self.search_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding superseded search response");
            return;
        }

        match result {
            Ok(response) => {
                if !self
                    .store
                    .publish_search_if_unchanged(search_revision, response.query, response.data)
                {
                    tracing::debug!(generation, "Search cleared while in flight, dropping results");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Search failed");
                self.state
                    .send_modify(|state| state.status = FeedStatus::Error(SEARCH_ERROR.to_string()));
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
