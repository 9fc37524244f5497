//! The orchestrating state machine.
//!
//! `AppStateController` owns `AppState`, drives location resolution,
//! search, and forecast fetches, and mirrors the three preference
//! streams. All mutations pass through one mutex-guarded record;
//! consumers only ever see cloned snapshots from the watch channel.
//! External calls are awaited outside the lock, so a slow fetch never
//! blocks reads or other intents.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Timelike;
use tokio::sync::{watch, Mutex};

use skycast_prefs::PreferencesStore;
use skycast_weather::{
    normalize, Coordinate, ForecastClient, GeoCandidate, GeocodingClient, LocationResolver,
    UnitSystem,
};

use crate::state::{suggested_cities, AppState, ErrorKind};

const LOADING_CONDITION: &str = "Loading...";
const FAILED_CONDITION: &str = "Unavailable";

struct Inner {
    state: AppState,
    /// Coordinate of the last requested forecast; unit changes re-fetch it.
    coordinate: Option<Coordinate>,
    city: String,
}

pub struct AppStateController {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<AppState>,
    forecast: ForecastClient,
    geocoding: GeocodingClient,
    resolver: LocationResolver,
    prefs: Arc<PreferencesStore>,
    /// Issue counter for search fencing: a response only applies if its
    /// request is still the latest issued.
    search_seq: AtomicU64,
}

impl AppStateController {
    pub fn new(
        forecast: ForecastClient,
        geocoding: GeocodingClient,
        resolver: LocationResolver,
        prefs: Arc<PreferencesStore>,
    ) -> Arc<Self> {
        let state = AppState::default();
        let (state_tx, _) = watch::channel(state.clone());
        Arc::new(Self {
            inner: Mutex::new(Inner {
                state,
                coordinate: None,
                city: String::new(),
            }),
            state_tx,
            forecast,
            geocoding,
            resolver,
            prefs,
            search_seq: AtomicU64::new(0),
        })
    }

    /// Continuous read-only view of the state.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state_tx.subscribe()
    }

    /// One-off clone of the current state; prefer `subscribe` for
    /// continuous consumers.
    pub async fn state(&self) -> AppState {
        self.inner.lock().await.state.clone()
    }

    /// Seed the suggestions, start the preference mirror tasks, and
    /// kick off the initial location-based fetch. The mirror tasks live
    /// for the controller's lifetime.
    pub async fn initialize(self: &Arc<Self>) {
        {
            let mut inner = self.inner.lock().await;
            inner.state.suggested_cities = suggested_cities();
            self.publish(&inner);
        }
        self.spawn_pref_mirrors();
        self.request_location_fetch().await;
    }

    /// Resolve the device position and load its forecast. A resolver
    /// failure surfaces `LocationUnavailable` and leaves the previous
    /// snapshot numbers visible.
    pub async fn request_location_fetch(&self) {
        {
            let mut inner = self.inner.lock().await;
            inner.state.is_loading = true;
            inner.state.last_error = None;
            self.publish(&inner);
        }

        match self.resolver.resolve().await {
            Ok((coord, city)) => {
                {
                    let mut inner = self.inner.lock().await;
                    inner.state.active_city = city.clone();
                    // GPS-derived locations carry no stable id and
                    // cannot be favorited.
                    inner.state.active_city_id = None;
                    inner.state.snapshot.condition = LOADING_CONDITION.to_string();
                    self.publish(&inner);
                }
                self.load_forecast(coord, city).await;
            }
            Err(e) => {
                tracing::warn!("location resolution failed: {}", e);
                let mut inner = self.inner.lock().await;
                inner.state.is_loading = false;
                inner.state.last_error = Some(ErrorKind::LocationUnavailable);
                inner.state.snapshot.condition = FAILED_CONDITION.to_string();
                self.publish(&inner);
            }
        }
    }

    /// Search for cities. Blank queries are a no-op and leave prior
    /// results untouched; late responses from superseded requests are
    /// discarded rather than cancelled.
    pub async fn search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let seq = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut inner = self.inner.lock().await;
            inner.state.search_query = query.to_string();
            self.publish(&inner);
        }

        let result = self.geocoding.search(query).await;

        let mut inner = self.inner.lock().await;
        if seq != self.search_seq.load(Ordering::SeqCst) {
            tracing::debug!(seq, "discarding superseded search response");
            return;
        }
        match result {
            Ok(results) => {
                inner.state.search_results = results;
                if inner.state.last_error == Some(ErrorKind::SearchFailed) {
                    inner.state.last_error = None;
                }
            }
            Err(e) => {
                tracing::warn!("city search failed: {}", e);
                inner.state.last_error = Some(ErrorKind::SearchFailed);
            }
        }
        self.publish(&inner);
    }

    /// Optimistically switch the active city, then fetch its forecast.
    pub async fn select_city(&self, candidate: &GeoCandidate) {
        {
            let mut inner = self.inner.lock().await;
            inner.state.search_results.clear();
            inner.state.search_query.clear();
            inner.state.active_city = candidate.name.clone();
            inner.state.active_city_id = (candidate.id != 0).then_some(candidate.id);
            inner.state.snapshot.condition = LOADING_CONDITION.to_string();
            self.publish(&inner);
        }
        self.load_forecast(candidate.coordinate(), candidate.name.clone())
            .await;
    }

    /// Flip membership in the persisted favorites. The mirrored list in
    /// `AppState` updates only when the store's stream emits; the store
    /// is the source of truth.
    pub async fn toggle_favorite(&self, candidate: &GeoCandidate) {
        if candidate.id == 0 {
            tracing::warn!(
                city = %candidate.name,
                "ignoring favorite toggle for a city without a stable id"
            );
            return;
        }

        let is_favorite = {
            let inner = self.inner.lock().await;
            inner.state.favorites.iter().any(|c| c.id == candidate.id)
        };
        let result = if is_favorite {
            self.prefs.remove_favorite(candidate.id).await
        } else {
            self.prefs.add_favorite(candidate.clone()).await
        };
        if let Err(e) = result {
            self.fail_preference_write(e).await;
        }
    }

    pub async fn remove_favorite(&self, id: i64) {
        if let Err(e) = self.prefs.remove_favorite(id).await {
            self.fail_preference_write(e).await;
        }
    }

    /// Persist the theme; state follows via the preference stream.
    pub async fn set_dark_theme(&self, is_dark: bool) {
        if let Err(e) = self.prefs.set_dark_theme(is_dark).await {
            self.fail_preference_write(e).await;
        }
    }

    /// Persist the unit system; the mirror task re-fetches the forecast
    /// when the value actually changes.
    pub async fn set_unit_system(&self, units: UnitSystem) {
        if let Err(e) = self.prefs.set_unit_system(units).await {
            self.fail_preference_write(e).await;
        }
    }

    fn spawn_pref_mirrors(self: &Arc<Self>) {
        let ctrl = Arc::clone(self);
        let mut dark_rx = self.prefs.dark_theme();
        tokio::spawn(async move {
            loop {
                let is_dark = *dark_rx.borrow_and_update();
                ctrl.apply_dark_theme(is_dark).await;
                if dark_rx.changed().await.is_err() {
                    break;
                }
            }
        });

        let ctrl = Arc::clone(self);
        let mut unit_rx = self.prefs.unit_system();
        tokio::spawn(async move {
            loop {
                let units = *unit_rx.borrow_and_update();
                ctrl.apply_unit_system(units).await;
                if unit_rx.changed().await.is_err() {
                    break;
                }
            }
        });

        let ctrl = Arc::clone(self);
        let mut favorites_rx = self.prefs.favorites();
        tokio::spawn(async move {
            loop {
                let favorites = favorites_rx.borrow_and_update().clone();
                ctrl.apply_favorites(favorites).await;
                if favorites_rx.changed().await.is_err() {
                    break;
                }
            }
        });
    }

    async fn apply_dark_theme(&self, is_dark: bool) {
        let mut inner = self.inner.lock().await;
        inner.state.is_dark_theme = is_dark;
        self.publish(&inner);
    }

    /// A changed unit system invalidates the snapshot: the display is
    /// re-derived by fetching again (the service converts server-side),
    /// never by reformatting stale raw data in place.
    async fn apply_unit_system(&self, units: UnitSystem) {
        let refetch = {
            let mut inner = self.inner.lock().await;
            let changed = inner.state.unit_system != units;
            inner.state.unit_system = units;
            self.publish(&inner);
            if changed {
                inner.coordinate.map(|coord| (coord, inner.city.clone()))
            } else {
                None
            }
        };
        if let Some((coord, city)) = refetch {
            self.load_forecast(coord, city).await;
        }
    }

    async fn apply_favorites(&self, favorites: Vec<GeoCandidate>) {
        let mut inner = self.inner.lock().await;
        inner.state.favorites = favorites;
        self.publish(&inner);
    }

    /// Fetch, normalize, and atomically replace the snapshot. Both
    /// failure paths keep the last good numbers on screen; only the
    /// condition label and `last_error` report the failure.
    async fn load_forecast(&self, coord: Coordinate, city: String) {
        let units = {
            let mut inner = self.inner.lock().await;
            inner.state.is_loading = true;
            inner.coordinate = Some(coord);
            inner.city = city.clone();
            self.publish(&inner);
            inner.state.unit_system
        };

        let raw = match self.forecast.fetch(coord, units).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("forecast fetch failed: {}", e);
                self.fail_forecast(ErrorKind::NetworkFailure).await;
                return;
            }
        };

        let now_hour = chrono::Local::now().hour();
        match normalize(&raw, units, now_hour) {
            Ok(snapshot) => {
                let mut inner = self.inner.lock().await;
                inner.state.snapshot = snapshot;
                inner.state.active_city = city;
                inner.state.is_loading = false;
                inner.state.last_error = None;
                self.publish(&inner);
            }
            Err(e) => {
                tracing::warn!("forecast response rejected: {}", e);
                self.fail_forecast(ErrorKind::MalformedResponse).await;
            }
        }
    }

    async fn fail_forecast(&self, kind: ErrorKind) {
        let mut inner = self.inner.lock().await;
        inner.state.is_loading = false;
        inner.state.last_error = Some(kind);
        inner.state.snapshot.condition = FAILED_CONDITION.to_string();
        self.publish(&inner);
    }

    async fn fail_preference_write(&self, e: skycast_prefs::PrefsError) {
        tracing::error!("preference write failed: {}", e);
        let mut inner = self.inner.lock().await;
        inner.state.last_error = Some(ErrorKind::PreferenceWriteFailure);
        self.publish(&inner);
    }

    fn publish(&self, inner: &Inner) {
        self.state_tx.send_replace(inner.state.clone());
    }
}
