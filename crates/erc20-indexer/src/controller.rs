use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{watch, Mutex};

use crate::cache::QueryCache;
use crate::error::Error;
use crate::fetcher::BalanceFetcher;
use crate::provider::TokenDataProvider;
use crate::types::query::CachedQueryResult;
use crate::wallet::WalletProvider;

/// Observable state of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    /// No query issued yet, or the last one had an empty address.
    Idle,
    Loading {
        address: String,
    },
    Done {
        address: String,
        result: Arc<CachedQueryResult>,
    },
    Error {
        address: String,
        message: String,
    },
}

impl QueryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading { .. })
    }

    /// The address the state refers to, if any.
    pub fn address(&self) -> Option<&str> {
        match self {
            QueryState::Idle => None,
            QueryState::Loading { address }
            | QueryState::Done { address, .. }
            | QueryState::Error { address, .. } => Some(address),
        }
    }

    pub fn result(&self) -> Option<&Arc<CachedQueryResult>> {
        match self {
            QueryState::Done { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// Everything the controller mutates, behind one lock so that generation
/// checks, cache writes and state updates happen together.
#[derive(Default)]
struct Inner {
    /// Bumped by every `query` call; a fetch only settles the state if its
    /// generation is still current.
    generation: u64,
    cache: QueryCache,
    /// Per-address locks serializing fetches for the same address.
    flights: HashMap<String, Arc<Mutex<()>>>,
}

impl Inner {
    /// Drop the per-address lock once no other query is waiting on it.
    ///
    /// Callers hold `flight`, so a count of two means only the map and the
    /// caller reference it.
    fn release_flight(&mut self, address: &str, flight: &Arc<Mutex<()>>) {
        let idle = self
            .flights
            .get(address)
            .is_some_and(|entry| Arc::ptr_eq(entry, flight) && Arc::strong_count(flight) == 2);
        if idle {
            self.flights.remove(address);
        }
    }
}

/// Coordinates cache lookups, fetches and the observable query state.
pub struct QueryController {
    fetcher: BalanceFetcher,
    inner: Mutex<Inner>,
    state: watch::Sender<QueryState>,
}

impl QueryController {
    pub fn new(provider: Arc<dyn TokenDataProvider>) -> Self {
        Self::with_fetcher(BalanceFetcher::new(provider))
    }

    pub fn with_fetcher(fetcher: BalanceFetcher) -> Self {
        let (state, _) = watch::channel(QueryState::Idle);
        Self {
            fetcher,
            inner: Mutex::new(Inner::default()),
            state,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Whether a result is currently on display.
    pub fn has_queried(&self) -> bool {
        self.state.borrow().result().is_some()
    }

    /// Every address with a cached result, most recently stored first.
    pub async fn recent_addresses(&self) -> Vec<String> {
        self.inner.lock().await.cache.recent_addresses()
    }

    /// The cached result for `address`, without touching the state.
    pub async fn cached(&self, address: &str) -> Option<Arc<CachedQueryResult>> {
        self.inner.lock().await.cache.get(address)
    }

    /// Request accounts from `wallet` and query the first one.
    ///
    /// Returns the queried address, or `None` if the wallet had no accounts.
    pub async fn connect_wallet(
        &self,
        wallet: &dyn WalletProvider,
    ) -> Result<Option<String>, Error> {
        let accounts = wallet.request_accounts().await?;
        let Some(address) = accounts.into_iter().find(|a| !a.is_empty()) else {
            debug!("wallet returned no accounts");
            return Ok(None);
        };

        info!("wallet connected as {address}");
        self.query(&address).await;
        Ok(Some(address))
    }

    /// Re-run a query for an address taken from [`Self::recent_addresses`].
    pub async fn query_recent(&self, address: &str) {
        self.query(address).await
    }

    /// Query balances for `address`.
    ///
    /// Served from the cache when possible. Otherwise the state moves to
    /// `Loading` and then to `Done` or `Error` once the fetch completes,
    /// unless a newer `query` call has superseded this one in the meantime.
    pub async fn query(&self, address: &str) {
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;

            if address.is_empty() {
                debug!("empty address, nothing to query");
                self.state.send_replace(QueryState::Idle);
                return;
            }
            if let Some(result) = inner.cache.get(address) {
                debug!("cache hit for {address}");
                self.state.send_replace(QueryState::Done {
                    address: address.to_string(),
                    result,
                });
                return;
            }

            self.state.send_replace(QueryState::Loading {
                address: address.to_string(),
            });
            inner.generation
        };

        let flight = self.flight(address).await;
        let _flight = flight.lock().await;

        // A fetch for the same address may have finished while we waited.
        {
            let mut inner = self.inner.lock().await;
            if let Some(result) = inner.cache.get(address) {
                inner.release_flight(address, &flight);
                self.settle(
                    &inner,
                    generation,
                    QueryState::Done {
                        address: address.to_string(),
                        result,
                    },
                );
                return;
            }
        }

        let outcome = self.fetcher.fetch(address).await;

        let mut inner = self.inner.lock().await;
        inner.release_flight(address, &flight);
        match outcome {
            Ok(result) => {
                let result = Arc::new(result);
                inner.cache.put(address, Arc::clone(&result));
                self.settle(
                    &inner,
                    generation,
                    QueryState::Done {
                        address: address.to_string(),
                        result,
                    },
                );
            }
            Err(err) => {
                warn!("query for {address} failed: {err}");
                self.settle(
                    &inner,
                    generation,
                    QueryState::Error {
                        address: address.to_string(),
                        message: format!("failed to check ERC-20 token balances: {err}"),
                    },
                );
            }
        }
    }

    async fn flight(&self, address: &str) -> Arc<Mutex<()>> {
        let mut inner = self.inner.lock().await;
        Arc::clone(inner.flights.entry(address.to_string()).or_default())
    }

    /// Publish `state` only if `generation` has not been superseded.
    fn settle(&self, inner: &Inner, generation: u64, state: QueryState) {
        if inner.generation != generation {
            debug!(
                "discarding stale result for {:?} (generation {generation}, current {})",
                state.address(),
                inner.generation
            );
            return;
        }
        self.state.send_replace(state);
    }
}
