//! Owner of [`ViewState`] and the single in-flight fetch.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    Config, FetchError, WeatherProvider,
    clock::{Clock, format_datetime},
    i18n::{Catalog, Locale},
    model::{Coordinates, FetchRequest, ViewState, WeatherSnapshot},
    view::CardView,
};

/// Result of one fetch task, tagged with the generation that started it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    pub result: Result<WeatherSnapshot, FetchError>,
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    cancel: CancellationToken,
}

/// Sequences every state transition of the card.
///
/// Fetches run as tokio tasks and report back over a channel; their results
/// are applied only when the owner drains it through [`next_settled`], so the
/// state is never touched from more than one place.
///
/// [`next_settled`]: WeatherController::next_settled
#[derive(Debug)]
pub struct WeatherController {
    provider: Arc<dyn WeatherProvider>,
    clock: Arc<dyn Clock>,
    catalog: Catalog,
    coordinates: Coordinates,
    location_label: String,
    default_locale: Locale,
    state: ViewState,
    in_flight: Option<InFlight>,
    generation: u64,
    settled_tx: mpsc::UnboundedSender<FetchOutcome>,
    settled_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl WeatherController {
    pub fn new(config: &Config, provider: Arc<dyn WeatherProvider>, clock: Arc<dyn Clock>) -> Self {
        let locale = config.default_locale;
        let datetime = format_datetime(&clock.now(), locale);
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();

        Self {
            provider,
            clock,
            catalog: Catalog::new(locale),
            coordinates: config.coordinates(),
            location_label: config.location_label.clone(),
            default_locale: locale,
            state: ViewState::new(config.location_label.clone(), locale, datetime),
            in_flight: None,
            generation: 0,
            settled_tx,
            settled_rx,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> CardView {
        CardView::from_state(&self.state, &self.catalog)
    }

    /// Fresh state with the default locale, then fetch.
    pub fn initialize(&mut self) {
        self.cancel_in_flight();

        let locale = self.default_locale;
        self.catalog.set_locale(locale);
        let datetime = format_datetime(&self.clock.now(), locale);
        self.state = ViewState::new(self.location_label.clone(), locale, datetime);

        self.start_fetch();
    }

    /// Switch to the other locale. Locale-dependent strings are recomputed
    /// immediately; the re-fetch only refreshes the sun times.
    pub fn toggle_language(&mut self) {
        let locale = self.state.locale.toggled();
        self.catalog.set_locale(locale);
        self.state.locale = locale;
        self.state.datetime = format_datetime(&self.clock.now(), locale);

        debug!(%locale, "language toggled");
        self.start_fetch();
    }

    /// Full reinitialization: drops the snapshot and the chosen locale.
    pub fn refresh(&mut self) {
        info!("refreshing widget");
        self.initialize();
    }

    /// Re-fetch after a failure, keeping the current locale.
    pub fn retry(&mut self) {
        debug!("retrying fetch");
        self.start_fetch();
    }

    /// Cancel the in-flight fetch, if any.
    pub fn shutdown(&mut self) {
        self.cancel_in_flight();
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Wait for the next fetch task to finish and apply its outcome.
    /// Returns whether the state changed.
    pub async fn next_settled(&mut self) -> bool {
        match self.settled_rx.recv().await {
            Some(outcome) => self.on_fetch_settled(outcome),
            None => false,
        }
    }

    /// Apply a fetch outcome. Outcomes of superseded or cancelled fetches are
    /// dropped. Returns whether the state changed.
    pub fn on_fetch_settled(&mut self, outcome: FetchOutcome) -> bool {
        let live = match &self.in_flight {
            Some(current) => {
                current.generation == outcome.generation && !current.cancel.is_cancelled()
            }
            None => false,
        };
        if !live {
            debug!(generation = outcome.generation, "discarding superseded fetch result");
            return false;
        }

        match outcome.result {
            Err(FetchError::Cancelled) => {
                debug!(generation = outcome.generation, "fetch cancelled");
                return false;
            }
            Ok(snapshot) => {
                info!(
                    generation = outcome.generation,
                    temperature = snapshot.temperature,
                    "weather updated"
                );
                self.state.snapshot = Some(snapshot);
                self.state.error = None;
            }
            Err(err) => {
                warn!(generation = outcome.generation, error = %err, "weather fetch failed");
                self.state.error = Some(err.to_string());
            }
        }

        self.state.loading = false;
        self.in_flight = None;
        true
    }

    fn start_fetch(&mut self) {
        self.cancel_in_flight();

        self.generation += 1;
        let generation = self.generation;
        let cancel = CancellationToken::new();
        self.in_flight = Some(InFlight {
            generation,
            cancel: cancel.clone(),
        });

        self.state.loading = true;
        self.state.error = None;

        let request = FetchRequest {
            coordinates: self.coordinates,
            locale: self.state.locale,
        };
        let provider = Arc::clone(&self.provider);
        let tx = self.settled_tx.clone();

        debug!(generation, locale = %request.locale, "starting fetch");
        tokio::spawn(async move {
            let result = provider.fetch(&request, &cancel).await;
            // The controller may already be gone.
            let _ = tx.send(FetchOutcome { generation, result });
        });
    }

    fn cancel_in_flight(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            debug!(generation = previous.generation, "cancelling in-flight fetch");
            previous.cancel.cancel();
        }
    }
}

impl Drop for WeatherController {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
