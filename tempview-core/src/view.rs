//! The weather view: which fetch to run for a query, and what to show once it
//! completes.
//!
//! [`ViewModel`] is the plain state container. [`WeatherView`] drives it: every
//! fetch runs as its own tokio task and applies its outcome to the model when it
//! completes. In-flight fetches are never cancelled, so two fetches may finish
//! in either order; [`OrderingPolicy`] decides what happens then.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    condition::Gradient,
    error::FetchError,
    location::LocationResolver,
    model::{SearchQuery, WeatherSnapshot},
    provider::WeatherClient,
};

pub const LOCATION_FAILURE_MESSAGE: &str = "Error fetching weather data";
pub const CITY_NOT_FOUND_MESSAGE: &str = "City not found";

/// How to treat a fetch that completes after a newer one was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderingPolicy {
    /// Whatever completes last is displayed, even if it was issued first.
    #[default]
    LastCompletedWins,
    /// Only the most recently issued fetch may change the display.
    LatestIssuedWins,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Resolve the device position, then fetch by coordinates.
    #[default]
    DeviceLocation,
    ByName(String),
}

impl FetchMode {
    pub fn for_query(query: &SearchQuery) -> Self {
        if query.is_device_location() {
            FetchMode::DeviceLocation
        } else {
            FetchMode::ByName(query.as_str().to_string())
        }
    }

    /// The message shown when a fetch of this kind fails, whatever the cause.
    pub fn failure_message(&self) -> &'static str {
        match self {
            FetchMode::DeviceLocation => LOCATION_FAILURE_MESSAGE,
            FetchMode::ByName(_) => CITY_NOT_FOUND_MESSAGE,
        }
    }
}

/// Identifies one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchTicket {
    generation: u64,
    mode: FetchMode,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> &FetchMode {
        &self.mode
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loaded(WeatherSnapshot),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewModel {
    query: SearchQuery,
    state: ViewState,
    background: Option<Gradient>,
    in_flight: usize,
    issued: u64,
    policy: OrderingPolicy,
}

impl ViewModel {
    pub fn new(policy: OrderingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match &self.state {
            ViewState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Background derived from the last displayed snapshot. Failures leave it
    /// untouched.
    pub fn background(&self) -> Option<Gradient> {
        self.background
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn policy(&self) -> OrderingPolicy {
        self.policy
    }

    /// Issue a fetch for the current query.
    pub fn begin(&mut self) -> FetchTicket {
        self.issued += 1;
        self.in_flight += 1;

        FetchTicket {
            generation: self.issued,
            mode: FetchMode::for_query(&self.query),
        }
    }

    /// Replace the query; issues a fetch only when it actually changed.
    pub fn set_query(&mut self, query: SearchQuery) -> Option<FetchTicket> {
        if query == self.query {
            return None;
        }

        self.query = query;
        Some(self.begin())
    }

    /// Apply the outcome of a fetch. Returns whether the display changed.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<WeatherSnapshot, FetchError>,
    ) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.policy == OrderingPolicy::LatestIssuedWins && ticket.generation != self.issued {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.issued,
                "discarding superseded fetch"
            );
            return false;
        }

        match outcome {
            Ok(snapshot) => {
                self.background = Some(snapshot.condition_main.background());
                self.state = ViewState::Loaded(snapshot);
            }
            Err(err) => {
                tracing::warn!(error = %err, mode = ?ticket.mode, "Error fetching weather data");
                self.state = ViewState::Failed(ticket.mode.failure_message().to_string());
            }
        }

        true
    }
}

/// Runs fetches against a resolver and a client and publishes the resulting
/// [`ViewModel`].
#[derive(Debug, Clone)]
pub struct WeatherView {
    resolver: Arc<dyn LocationResolver>,
    client: Arc<dyn WeatherClient>,
    model: Arc<watch::Sender<ViewModel>>,
}

impl WeatherView {
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        client: Arc<dyn WeatherClient>,
        policy: OrderingPolicy,
    ) -> Self {
        let (tx, _rx) = watch::channel(ViewModel::new(policy));

        Self {
            resolver,
            client,
            model: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.model.subscribe()
    }

    /// A copy of the current model.
    pub fn current(&self) -> ViewModel {
        self.model.borrow().clone()
    }

    /// Initial load for the current query.
    pub fn mount(&self) -> JoinHandle<()> {
        self.refetch()
    }

    /// Fetch again for the current query, even if it did not change.
    pub fn refetch(&self) -> JoinHandle<()> {
        let mut ticket = FetchTicket::default();
        self.model.send_modify(|model| ticket = model.begin());
        self.spawn(ticket)
    }

    /// Change the query. Returns the fetch task if the change triggered one.
    pub fn set_query(&self, query: impl Into<SearchQuery>) -> Option<JoinHandle<()>> {
        let query = query.into();
        let mut ticket = None;

        self.model.send_if_modified(|model| {
            ticket = model.set_query(query);
            ticket.is_some()
        });

        ticket.map(|ticket| self.spawn(ticket))
    }

    /// Search submission: the input text becomes the query.
    pub fn submit(&self, input: &str) -> Option<JoinHandle<()>> {
        self.set_query(input)
    }

    fn spawn(&self, ticket: FetchTicket) -> JoinHandle<()> {
        let view = self.clone();

        tokio::spawn(async move {
            tracing::debug!(generation = ticket.generation, mode = ?ticket.mode, "fetch started");
            let outcome = view.run(&ticket.mode).await;

            view.model.send_if_modified(|model| {
                let was_loading = model.is_loading();
                let changed = model.complete(&ticket, outcome);
                changed || was_loading != model.is_loading()
            });
        })
    }

    async fn run(&self, mode: &FetchMode) -> Result<WeatherSnapshot, FetchError> {
        match mode {
            FetchMode::DeviceLocation => {
                let coords = self.resolver.resolve().await?;
                self.client.fetch_by_coordinates(coords).await
            }
            FetchMode::ByName(query) => self.client.fetch_by_query(query).await,
        }
    }
}
