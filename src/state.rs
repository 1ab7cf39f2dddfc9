//! Shared application state.
//!
//! One `AppState` is built at startup and cloned into every handler through
//! axum's `State` extractor. Each store owns its own lock, so the clones share
//! the stores rather than copying them.

use std::sync::Arc;

use crate::config::Config;
use crate::services::counters_service::CountersStore;
use crate::services::credentials::CredentialStore;
use crate::services::device_service::DeviceLog;
use crate::services::notify_service::Notifier;
use crate::services::review_service::ReviewStore;
use crate::services::settings_service::SettingsStore;
use crate::services::upload_service::UploadDir;
use crate::storage::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credentials: Arc<CredentialStore>,
    pub settings: Arc<SettingsStore>,
    pub reviews: Arc<ReviewStore>,
    pub devices: Arc<DeviceLog>,
    pub counters: Arc<CountersStore>,
    pub uploads: Arc<UploadDir>,
    pub notifier: Notifier,
}

impl AppState {
    /// Wire every store to the same document backend.
    ///
    /// # Errors
    ///
    /// Fails only if the relay HTTP client cannot be built.
    pub fn new(config: Config, docs: SharedStore) -> Result<Self, reqwest::Error> {
        let notifier = Notifier::new(&config)?;
        let credentials = CredentialStore::new(
            docs.clone(),
            config.bootstrap_password().map(str::to_string),
        );

        Ok(Self {
            credentials: Arc::new(credentials),
            settings: Arc::new(SettingsStore::new(docs.clone())),
            reviews: Arc::new(ReviewStore::new(docs.clone())),
            devices: Arc::new(DeviceLog::new(docs.clone())),
            counters: Arc::new(CountersStore::new(docs)),
            uploads: Arc::new(UploadDir::new(config.uploads_dir())),
            notifier,
            config: Arc::new(config),
        })
    }

    /// Replace the credential store, e.g. to lower the bcrypt cost in tests.
    pub fn with_credentials(mut self, credentials: CredentialStore) -> Self {
        self.credentials = Arc::new(credentials);
        self
    }
}
