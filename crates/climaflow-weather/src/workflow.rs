//! Search → geocode → forecast workflow and its observable state.
//!
//! `WeatherController` owns the only mutable state in the crate. Every
//! action takes a token from a monotonically increasing counter; a
//! transition is committed only while its token is still the latest one
//! issued. Results of superseded actions are dropped, so the state always
//! reflects the most recently *issued* search or refresh regardless of the
//! order in which network calls complete.
//!
//! Failures never erase the last good forecast: `data` survives
//! `Searching`, `Refreshing` and `Failed` until a newer forecast replaces it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use climaflow_core::WeatherError;
use tokio::sync::watch;

use crate::source::{ForecastSource, LocationResolver};
use crate::types::{ResolvedLocation, WeatherSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Searching,
    Refreshing,
    Ready,
    Failed,
}

/// Location and forecast that were committed together.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastData {
    pub location: ResolvedLocation,
    pub snapshot: WeatherSnapshot,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowState {
    pub phase: Phase,
    /// Last successful result, kept visible while loading or after a failure
    pub data: Option<Arc<ForecastData>>,
    /// Set on `Failed`
    pub error: Option<String>,
    /// Place name searched when the input is empty
    pub confirmed_city: String,
}

impl WorkflowState {
    /// A request is in flight and nothing has been shown yet. Covers both
    /// the geocoding and the forecast step of the first search.
    pub fn is_loading(&self) -> bool {
        self.is_busy() && self.data.is_none()
    }

    /// A search or refresh is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Searching | Phase::Refreshing)
    }

    /// The refresh action only makes sense once a forecast exists.
    pub fn can_refresh(&self) -> bool {
        self.data.is_some()
    }
}

pub struct WeatherController {
    resolver: Arc<dyn LocationResolver>,
    forecasts: Arc<dyn ForecastSource>,
    state: watch::Sender<WorkflowState>,
    latest: AtomicU64,
}

impl WeatherController {
    /// Create an idle controller. `seed_city` is what an empty search (and
    /// [`start`](Self::start)) looks up until another city is confirmed.
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        forecasts: Arc<dyn ForecastSource>,
        seed_city: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(WorkflowState {
            confirmed_city: seed_city.into(),
            ..WorkflowState::default()
        });

        Self {
            resolver,
            forecasts,
            state,
            latest: AtomicU64::new(0),
        }
    }

    /// Observe every committed transition.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// Current state, for callers that poll.
    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    /// Startup search for the seed city.
    pub async fn start(&self) -> bool {
        self.search("").await
    }

    /// Resolve `input` and load its forecast.
    ///
    /// Blank input re-searches the confirmed city. Returns `false` when there
    /// is nothing to search for; failures are reported through the state.
    pub async fn search(&self, input: &str) -> bool {
        let query = match input.trim() {
            "" => self.state.borrow().confirmed_city.trim().to_string(),
            trimmed => trimmed.to_string(),
        };
        if query.is_empty() {
            tracing::debug!("Ignoring search with no query and no confirmed city");
            return false;
        }

        let token = self.issue();
        self.commit(token, |state| {
            state.phase = Phase::Searching;
            state.error = None;
        });

        match self.resolver.resolve(&query).await {
            Ok(location) => self.load(token, location).await,
            Err(e) => self.fail(token, &e),
        }
        true
    }

    /// Reload the forecast for the current location without geocoding.
    ///
    /// Returns `false` when no forecast has been loaded yet.
    pub async fn refresh(&self) -> bool {
        let location = match &self.state.borrow().data {
            Some(data) => data.location.clone(),
            None => {
                tracing::debug!("Refresh requested before any forecast was loaded");
                return false;
            }
        };

        let token = self.issue();
        self.load(token, location).await;
        true
    }

    async fn load(&self, token: u64, location: ResolvedLocation) {
        if !self.commit(token, |state| state.phase = Phase::Refreshing) {
            return;
        }

        match self
            .forecasts
            .fetch(location.latitude, location.longitude)
            .await
        {
            Ok(snapshot) => {
                let title = location.title();
                let committed = self.commit(token, |state| {
                    state.phase = Phase::Ready;
                    state.error = None;
                    state.confirmed_city = location.name.clone();
                    state.data = Some(Arc::new(ForecastData { location, snapshot }));
                });
                if committed {
                    tracing::info!("Forecast ready for {}", title);
                }
            }
            Err(e) => self.fail(token, &e),
        }
    }

    fn fail(&self, token: u64, error: &WeatherError) {
        let message = error.user_message();
        if self.commit(token, |state| {
            state.phase = Phase::Failed;
            state.error = Some(message.to_string());
        }) {
            tracing::warn!("Weather workflow failed: {}", error);
        }
    }

    fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply `transition` if `token` is still the latest issued.
    fn commit(&self, token: u64, transition: impl FnOnce(&mut WorkflowState)) -> bool {
        let committed = self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != token {
                return false;
            }
            transition(state);
            true
        });
        if committed {
            tracing::debug!("Workflow phase -> {:?} (token {})", self.state.borrow().phase, token);
        } else {
            tracing::debug!("Discarding stale result for token {}", token);
        }
        committed
    }
}
