//! Selection and polling controller.
//!
//! A [`FlightTracker`] owns the current live set and an optional selected
//! flight. Every refresh builds a complete new [`TrackerState`] and swaps it
//! in, so readers only ever see whole snapshots. Refreshes may overlap when a
//! poll tick fires before the previous one resolved; each one still writes its
//! own result, so the state is consistent with the latest *completed* poll.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::enrich::enrich_all;
use crate::error::Result;
use crate::model::{FlightDetail, LiveFlightRecord, PositionSample};
use crate::provider::{FlightProvider, LiveQuery};

/// The selected flight and what is known about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Feed id of the selected flight.
    pub id: String,
    /// The flight's record in the current live set, if it is still there.
    pub live: Option<LiveFlightRecord>,
    /// Last successfully fetched detail record.
    pub detail: Option<FlightDetail>,
    /// Position history from the most recent refresh.
    pub positions: Vec<PositionSample>,
    /// The most recent refresh returned no detail and `detail` is older.
    pub detail_stale: bool,
}

impl Selection {
    fn new(id: impl Into<String>, live_set: &[LiveFlightRecord]) -> Self {
        let id = id.into();
        Self {
            live: find_live(live_set, &id),
            id,
            detail: None,
            positions: Vec::new(),
            detail_stale: false,
        }
    }
}

/// Immutable snapshot of the tracker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    /// Live set from the latest completed refresh.
    pub live: Vec<LiveFlightRecord>,
    /// Selected flight, if any.
    pub selection: Option<Selection>,
}

impl TrackerState {
    /// Id of the selected flight.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.id.as_str())
    }

    /// Whether the detail shown for the selection is left over from an
    /// earlier refresh because the latest one returned none.
    #[must_use]
    pub fn detail_is_stale(&self) -> bool {
        self.selection.as_ref().is_some_and(|s| s.detail_stale)
    }
}

fn find_live(live_set: &[LiveFlightRecord], id: &str) -> Option<LiveFlightRecord> {
    live_set.iter().find(|record| record.id == id).cloned()
}

/// What one refresh fetched for the selection.
struct Fetched {
    id: String,
    detail: Option<FlightDetail>,
    positions: Vec<PositionSample>,
}

struct Inner<P> {
    provider: P,
    query: LiveQuery,
    state: watch::Sender<Arc<TrackerState>>,
    poller: Mutex<Option<CancellationToken>>,
}

impl<P> Drop for Inner<P> {
    fn drop(&mut self) {
        if let Some(token) = self
            .poller
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            token.cancel();
        }
    }
}

/// Live set plus an optional selected flight, refreshed on demand or on a timer.
///
/// Cloning is cheap; clones share state and the polling timer.
pub struct FlightTracker<P> {
    inner: Arc<Inner<P>>,
}

impl<P> Clone for FlightTracker<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> fmt::Debug for FlightTracker<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("FlightTracker")
            .field("query", &self.inner.query)
            .field("live", &state.live.len())
            .field("selected", &state.selected_id())
            .field("polling", &self.is_polling())
            .finish_non_exhaustive()
    }
}

impl<P> FlightTracker<P> {
    /// The provider this tracker queries.
    pub fn provider(&self) -> &P {
        &self.inner.provider
    }

    /// The live-feed filters used on every refresh.
    pub fn query(&self) -> &LiveQuery {
        &self.inner.query
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<TrackerState> {
        Arc::clone(&self.inner.state.borrow())
    }

    /// Receiver notified after every state swap.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<TrackerState>> {
        self.inner.state.subscribe()
    }

    /// Stop future refreshes. A refresh already in flight still completes.
    ///
    /// Returns `false` if the tracker was not polling.
    pub fn stop_polling(&self) -> bool {
        let token = self
            .inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match token {
            Some(token) => {
                token.cancel();
                info!("Polling stopped");
                true
            }
            None => false,
        }
    }

    /// Whether a polling timer is active.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<P: FlightProvider + 'static> FlightTracker<P> {
    fn with_state(provider: P, query: LiveQuery, state: TrackerState) -> Self {
        let (sender, _) = watch::channel(Arc::new(state));
        Self {
            inner: Arc::new(Inner {
                provider,
                query,
                state: sender,
                poller: Mutex::new(None),
            }),
        }
    }

    /// Fetch one live snapshot and build a tracker around it.
    ///
    /// Returns `Ok(None)` when nothing matches `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the live fetch fails.
    pub async fn init(provider: P, query: LiveQuery) -> Result<Option<Self>> {
        let live = provider.fetch_live(&query).await?;
        if live.is_empty() {
            debug!(?query, "No flights matched");
            return Ok(None);
        }
        Ok(Some(Self::with_state(
            provider,
            query,
            TrackerState {
                live,
                selection: None,
            },
        )))
    }

    /// Find a flight by number and select the first match.
    ///
    /// Uses the filtered live fetch as the tracker's live set, so only the
    /// detail and position history are fetched on top of it.
    ///
    /// Returns `Ok(None)` when no flight carries that number.
    ///
    /// # Errors
    ///
    /// Returns an error if the live or position fetch fails.
    pub async fn find_by_flight_number(provider: P, flight_number: &str) -> Result<Option<Self>> {
        let query = LiveQuery::new().flight_number(flight_number);
        let live = provider.fetch_live(&query).await?;
        let Some(first) = live.first() else {
            debug!(flight_number, "No flight with that number");
            return Ok(None);
        };

        let id = first.id.clone();
        let selection = Selection::new(id.clone(), &live);
        let tracker = Self::with_state(
            provider,
            query,
            TrackerState {
                live,
                selection: Some(selection),
            },
        );
        let fetched = tracker.fetch_selection(Some(&id)).await?;
        tracker.apply(None, fetched);
        Ok(Some(tracker))
    }

    /// Select a flight and refresh.
    ///
    /// Detail and position history for `id` have been fetched when this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh fails. The selection itself is kept.
    pub async fn select_id(&self, id: &str) -> Result<()> {
        self.inner.state.send_modify(|state| {
            if state.selected_id() != Some(id) {
                let mut next = TrackerState::clone(state);
                next.selection = Some(Selection::new(id, &next.live));
                *state = Arc::new(next);
            }
        });
        self.update().await
    }

    /// Refresh the live set, and the selection's detail and positions.
    ///
    /// All fetches run concurrently; state is written once, after all of
    /// them resolved. A detail fetch that returns nothing (or fails) keeps the
    /// previous detail and marks it stale.
    ///
    /// # Errors
    ///
    /// Returns an error, and writes nothing, if the live or position fetch fails.
    pub async fn update(&self) -> Result<()> {
        let selected = self.state().selected_id().map(str::to_string);
        let provider = &self.inner.provider;

        let (live, fetched) = tokio::join!(
            provider.fetch_live(&self.inner.query),
            self.fetch_selection(selected.as_deref()),
        );
        let live = live?;
        let fetched = fetched?;

        debug!(
            live = live.len(),
            selected = ?selected,
            "Refresh resolved"
        );
        self.apply(Some(live), fetched);
        Ok(())
    }

    async fn fetch_selection(&self, id: Option<&str>) -> Result<Option<Fetched>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let provider = &self.inner.provider;
        let (detail, positions) = tokio::join!(provider.fetch_detail(id), provider.fetch_positions(id));

        let detail = detail.unwrap_or_else(|e| {
            warn!(id, error = %e, "Detail fetch failed, keeping previous detail");
            None
        });
        Ok(Some(Fetched {
            id: id.to_string(),
            detail,
            positions: positions?,
        }))
    }

    /// Swap in a new snapshot built from the current one.
    fn apply(&self, live: Option<Vec<LiveFlightRecord>>, fetched: Option<Fetched>) {
        self.inner.state.send_modify(|state| {
            let mut next = TrackerState::clone(state);
            if let Some(live) = live {
                next.live = live;
            }

            if let Some(selection) = next.selection.as_mut() {
                selection.live = find_live(&next.live, &selection.id);

                match fetched {
                    Some(fetched) if fetched.id == selection.id => {
                        selection.positions = fetched.positions;
                        match fetched.detail {
                            Some(detail) => {
                                selection.detail = Some(detail);
                                selection.detail_stale = false;
                            }
                            None => selection.detail_stale = selection.detail.is_some(),
                        }
                    }
                    Some(fetched) => {
                        debug!(
                            fetched = %fetched.id,
                            selected = %selection.id,
                            "Selection changed during refresh, dropping its detail"
                        );
                    }
                    None => {}
                }
            }

            *state = Arc::new(next);
        });
    }

    /// Fetch full detail for every flight in the current live set.
    pub async fn enrich(&self) -> Vec<FlightDetail> {
        let state = self.state();
        enrich_all(&self.inner.provider, &state.live).await
    }

    /// Refresh every `interval` until [`stop_polling`](Self::stop_polling).
    ///
    /// The first refresh happens one interval from now. Each tick starts a
    /// refresh without waiting for the previous one. Calling this while
    /// already polling replaces the old timer. Must be called within a tokio
    /// runtime.
    pub fn start_polling(&self, interval: Duration) {
        let token = CancellationToken::new();
        let previous = self
            .inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        info!(?interval, "Polling started");
        tokio::spawn(poll_loop(Arc::downgrade(&self.inner), interval, token));
    }
}

async fn poll_loop<P: FlightProvider + 'static>(
    inner: Weak<Inner<P>>,
    interval: Duration,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = ticker.tick() => {
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                let tracker = FlightTracker { inner };
                tokio::spawn(async move {
                    if let Err(e) = tracker.update().await {
                        warn!(error = %e, "Polled refresh failed");
                    }
                });
            }
        }
    }
    debug!("Poll loop exited");
}
