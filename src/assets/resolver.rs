use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};

use crate::assets::decode::decode_natural_size;
use crate::assets::fetch::ImageFetcher;
use crate::foundation::core::NaturalSize;
use crate::foundation::error::BackgroundResult;

type PendingSize = Shared<LocalBoxFuture<'static, Option<NaturalSize>>>;

#[derive(Default)]
struct SizeCache {
    settled: HashMap<String, Option<NaturalSize>>,
    in_flight: HashMap<String, PendingSize>,
    // Bumped by `clear`; lookups started before a clear do not write back.
    generation: u64,
    lookups_started: usize,
}

/// Resolves media URLs to natural pixel sizes, memoized per URL.
///
/// Successful and failed lookups are both cached for the lifetime of the cache, and concurrent
/// requests for one URL share a single in-flight lookup. Clones share the same cache.
#[derive(Clone)]
pub struct ImageSizeResolver {
    fetcher: Rc<dyn ImageFetcher>,
    cache: Rc<RefCell<SizeCache>>,
}

impl ImageSizeResolver {
    pub fn new(fetcher: impl ImageFetcher + 'static) -> Self {
        Self::with_fetcher(Rc::new(fetcher))
    }

    pub fn with_fetcher(fetcher: Rc<dyn ImageFetcher>) -> Self {
        Self {
            fetcher,
            cache: Rc::new(RefCell::new(SizeCache::default())),
        }
    }

    /// Natural size of `url`, or `None` when it cannot be fetched or decoded.
    #[tracing::instrument(skip(self))]
    pub fn natural_size(&self, url: &str) -> LocalBoxFuture<'static, Option<NaturalSize>> {
        {
            let cache = self.cache.borrow();
            if let Some(&hit) = cache.settled.get(url) {
                tracing::debug!(resolved = hit.is_some(), "natural size cache hit");
                return future::ready(hit).boxed_local();
            }
            if let Some(pending) = cache.in_flight.get(url) {
                tracing::debug!("joining in-flight natural size lookup");
                return pending.clone().boxed_local();
            }
        }

        let fetch = self.fetcher.fetch(url);
        let generation = self.cache.borrow().generation;
        let lookup = settle(
            Rc::downgrade(&self.cache),
            url.to_string(),
            generation,
            fetch,
        )
        .boxed_local()
        .shared();

        let mut cache = self.cache.borrow_mut();
        cache.in_flight.insert(url.to_string(), lookup.clone());
        cache.lookups_started += 1;
        drop(cache);

        lookup.boxed_local()
    }

    /// Settled entry for `url`: `Some(None)` is a cached failure, `None` means not yet known.
    pub fn cached(&self, url: &str) -> Option<Option<NaturalSize>> {
        self.cache.borrow().settled.get(url).copied()
    }

    /// Number of lookups that actually reached the fetcher.
    pub fn lookups_started(&self) -> usize {
        self.cache.borrow().lookups_started
    }

    /// Forget every settled and in-flight entry.
    pub fn clear(&self) {
        let mut cache = self.cache.borrow_mut();
        cache.settled.clear();
        cache.in_flight.clear();
        cache.lookups_started = 0;
        cache.generation += 1;
    }
}

async fn settle(
    cache: Weak<RefCell<SizeCache>>,
    url: String,
    generation: u64,
    fetch: LocalBoxFuture<'static, BackgroundResult<Vec<u8>>>,
) -> Option<NaturalSize> {
    let size = match fetch.await.and_then(|bytes| decode_natural_size(&bytes)) {
        Ok(size) => Some(size),
        Err(err) => {
            tracing::debug!(%url, error = %err, "natural size unavailable");
            None
        }
    };

    if let Some(cache) = cache.upgrade() {
        let mut cache = cache.borrow_mut();
        if cache.generation == generation {
            cache.in_flight.remove(&url);
            cache.settled.entry(url).or_insert(size);
        }
    }
    size
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolver.rs"]
mod tests;
