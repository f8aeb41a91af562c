//! Shared filter and search state
//!
//! One `FilterStore` is shared by the filter panel, the search box and the
//! article feed. Every mutation bumps `revision`, and subscribers always see
//! the newest snapshot, so a burst of edits collapses into the latest one.

use newsdesk_common::{api::ArticleView, query::ArticleFilter};
use std::sync::Arc;
use tokio::sync::watch;

/// Results of the most recent search, shown in place of the article list
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub articles: Vec<ArticleView>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSnapshot {
    pub revision: u64,
    /// Bumped only when the search results are published or cleared
    pub search_revision: u64,
    pub filter: ArticleFilter,
    pub search: Option<SearchResults>,
}

#[derive(Clone)]
pub struct FilterStore {
    tx: Arc<watch::Sender<FilterSnapshot>>,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(FilterSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> FilterSnapshot {
        self.tx.borrow().clone()
    }

    /// Replace the whole filter
    pub fn set_filter(&self, filter: ArticleFilter) {
        self.mutate(|s| s.filter = filter);
    }

    /// Edit the filter in place
    pub fn update_filter(&self, edit: impl FnOnce(&mut ArticleFilter)) {
        self.mutate(|s| edit(&mut s.filter));
    }

    pub fn publish_search(&self, query: impl Into<String>, articles: Vec<ArticleView>) {
        let results = SearchResults {
            query: query.into(),
            articles,
        };
        self.mutate(|s| {
            s.search = Some(results);
            s.search_revision += 1;
        });
    }

    /// Publish only if no search was published or cleared since
    /// `search_revision` was read. Returns whether the results were stored.
    pub fn publish_search_if_unchanged(
        &self,
        search_revision: u64,
        query: impl Into<String>,
        articles: Vec<ArticleView>,
    ) -> bool {
        let results = SearchResults {
            query: query.into(),
            articles,
        };
        self.tx.send_if_modified(|snapshot| {
            if snapshot.search_revision != search_revision {
                return false;
            }
            snapshot.search = Some(results);
            snapshot.search_revision += 1;
            snapshot.revision += 1;
            true
        })
    }

    pub fn clear_search(&self) {
        self.mutate(|s| {
            s.search = None;
            s.search_revision += 1;
        });
    }

    fn mutate(&self, edit: impl FnOnce(&mut FilterSnapshot)) {
        self.tx.send_modify(|snapshot| {
            edit(snapshot);
            snapshot.revision += 1;
        });
    }
}
