use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};

use skycast_weather::{GeoCandidate, UnitSystem};

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("failed to read preferences: {0}")]
    Read(std::io::Error),
    #[error("failed to write preferences: {0}")]
    Write(std::io::Error),
    #[error("preferences file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// On-disk shape. Unknown settings fall back to defaults so older
/// files keep loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PrefsDocument {
    #[serde(default)]
    is_dark_theme: bool,
    #[serde(default)]
    unit_system: UnitSystem,
    #[serde(default)]
    favorites: Vec<GeoCandidate>,
}

/// Async preference store with per-setting watch streams.
///
/// Every write persists the whole document and then emits on the
/// matching channel; subscribers see the current value immediately on
/// subscription.
pub struct PreferencesStore {
    path: PathBuf,
    doc: Mutex<PrefsDocument>,
    dark_theme_tx: watch::Sender<bool>,
    unit_tx: watch::Sender<UnitSystem>,
    favorites_tx: watch::Sender<Vec<GeoCandidate>>,
}

impl PreferencesStore {
    /// Open the store, reading any previously persisted document. A
    /// missing file yields defaults; a corrupt file is an error.
    pub async fn open(path: &Path) -> Result<Self, PrefsError> {
        let doc = match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no preferences file at {}, using defaults", path.display());
                PrefsDocument::default()
            }
            Err(e) => return Err(PrefsError::Read(e)),
        };

        let (dark_theme_tx, _) = watch::channel(doc.is_dark_theme);
        let (unit_tx, _) = watch::channel(doc.unit_system);
        let (favorites_tx, _) = watch::channel(doc.favorites.clone());

        Ok(Self {
            path: path.to_path_buf(),
            doc: Mutex::new(doc),
            dark_theme_tx,
            unit_tx,
            favorites_tx,
        })
    }

    pub fn dark_theme(&self) -> watch::Receiver<bool> {
        self.dark_theme_tx.subscribe()
    }

    pub fn unit_system(&self) -> watch::Receiver<UnitSystem> {
        self.unit_tx.subscribe()
    }

    pub fn favorites(&self) -> watch::Receiver<Vec<GeoCandidate>> {
        self.favorites_tx.subscribe()
    }

    pub async fn set_dark_theme(&self, is_dark: bool) -> Result<(), PrefsError> {
        let mut doc = self.doc.lock().await;
        doc.is_dark_theme = is_dark;
        self.persist(&doc).await?;
        self.dark_theme_tx.send_replace(is_dark);
        Ok(())
    }

    pub async fn set_unit_system(&self, units: UnitSystem) -> Result<(), PrefsError> {
        let mut doc = self.doc.lock().await;
        doc.unit_system = units;
        self.persist(&doc).await?;
        self.unit_tx.send_replace(units);
        Ok(())
    }

    /// Add a favorite unless an entry with the same id already exists.
    /// A duplicate add is a silent no-op, matching concurrent toggles.
    pub async fn add_favorite(&self, city: GeoCandidate) -> Result<(), PrefsError> {
        let mut doc = self.doc.lock().await;
        if doc.favorites.iter().any(|c| c.id == city.id) {
            return Ok(());
        }
        doc.favorites.push(city);
        self.persist(&doc).await?;
        self.favorites_tx.send_replace(doc.favorites.clone());
        Ok(())
    }

    pub async fn remove_favorite(&self, id: i64) -> Result<(), PrefsError> {
        let mut doc = self.doc.lock().await;
        doc.favorites.retain(|c| c.id != id);
        self.persist(&doc).await?;
        self.favorites_tx.send_replace(doc.favorites.clone());
        Ok(())
    }

    async fn persist(&self, doc: &PrefsDocument) -> Result<(), PrefsError> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(PrefsError::Write)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use tempfile::tempdir;

    fn city(id: i64, name: &str) -> GeoCandidate {
        GeoCandidate {
            id,
            name: name.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            country: None,
            admin1: None,
        }
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = PreferencesStore::open(&dir.path().join("prefs.json"))
            .await
            .unwrap();

        assert!(!*store.dark_theme().borrow());
        assert_eq!(*store.unit_system().borrow(), UnitSystem::Metric);
        assert!(store.favorites().borrow().is_empty());
    }

    #[tokio::test]
    async fn test_settings_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = PreferencesStore::open(&path).await.unwrap();
        store.set_dark_theme(true).await.unwrap();
        store.set_unit_system(UnitSystem::Imperial).await.unwrap();
        store.add_favorite(city(524901, "Moscow")).await.unwrap();
        drop(store);

        let reopened = PreferencesStore::open(&path).await.unwrap();
        assert!(*reopened.dark_theme().borrow());
        assert_eq!(*reopened.unit_system().borrow(), UnitSystem::Imperial);
        assert_eq!(reopened.favorites().borrow().len(), 1);
        assert_eq!(reopened.favorites().borrow()[0].name, "Moscow");
    }

    #[tokio::test]
    async fn test_duplicate_favorite_ids_are_rejected() {
        let dir = tempdir().unwrap();
        let store = PreferencesStore::open(&dir.path().join("prefs.json"))
            .await
            .unwrap();

        store.add_favorite(city(1, "A")).await.unwrap();
        store.add_favorite(city(1, "A again")).await.unwrap();
        store.add_favorite(city(2, "B")).await.unwrap();

        let favorites = store.favorites().borrow().clone();
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].name, "A");
    }

    #[tokio::test]
    async fn test_concurrent_adds_of_same_city_keep_one_entry() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(
            PreferencesStore::open(&dir.path().join("prefs.json"))
                .await
                .unwrap(),
        );

        let a = tokio::spawn({
            let store = store.clone();
            async move { store.add_favorite(city(7, "Omsk")).await }
        });
        let b = tokio::spawn({
            let store = store.clone();
            async move { store.add_favorite(city(7, "Omsk")).await }
        });
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(store.favorites().borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_favorite_by_id() {
        let dir = tempdir().unwrap();
        let store = PreferencesStore::open(&dir.path().join("prefs.json"))
            .await
            .unwrap();

        store.add_favorite(city(1, "A")).await.unwrap();
        store.add_favorite(city(2, "B")).await.unwrap();
        store.remove_favorite(1).await.unwrap();

        let favorites = store.favorites().borrow().clone();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, 2);
    }

    #[tokio::test]
    async fn test_streams_emit_on_change() {
        let dir = tempdir().unwrap();
        let store = PreferencesStore::open(&dir.path().join("prefs.json"))
            .await
            .unwrap();

        let mut favorites_rx = store.favorites();
        let mut dark_rx = store.dark_theme();

        store.add_favorite(city(3, "C")).await.unwrap();
        favorites_rx.changed().await.unwrap();
        assert_eq!(favorites_rx.borrow_and_update().len(), 1);

        store.set_dark_theme(true).await.unwrap();
        dark_rx.changed().await.unwrap();
        assert!(*dark_rx.borrow_and_update());
    }
}
