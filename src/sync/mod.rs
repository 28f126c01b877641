//! Load/save boundary between the persisted record and the editor
//!
//! An [`EditSession`] owns the aggregate for one editing session. `load` and
//! `save` take `&mut self`, so a session never has two of them in flight.

mod file;
mod http;

pub use file::JsonFileStore;
pub use http::HttpStore;

use std::future::Future;
use tracing::{info, warn};

use crate::buttons::{ButtonCatalog, ButtonId, ButtonLabel, ButtonViews};
use crate::error::{LedConfigError, Result, ValidationErrors};
use crate::model::{self, Advisory, LedConfiguration, LedEdit, LedOptionsRecord};
use crate::pins::UsedPins;

/// Where LED options are persisted
pub trait LedOptionsStore {
    /// Fetch the full record
    fn load(&self) -> impl Future<Output = Result<LedOptionsRecord>> + Send;

    /// Write the full record as one unit
    fn save(&self, record: &LedOptionsRecord) -> impl Future<Output = Result<()>> + Send;

    /// Pins claimed by the device configuration, including the LED pins
    fn used_pins(&self) -> impl Future<Output = Result<UsedPins>> + Send;
}

/// Store selected by the application config
#[derive(Debug, Clone)]
pub enum Store {
    File(JsonFileStore),
    Http(HttpStore),
}

impl LedOptionsStore for Store {
    async fn load(&self) -> Result<LedOptionsRecord> {
        match self {
            Store::File(store) => store.load().await,
            Store::Http(store) => store.load().await,
        }
    }

    async fn save(&self, record: &LedOptionsRecord) -> Result<()> {
        match self {
            Store::File(store) => store.save(record).await,
            Store::Http(store) => store.save(record).await,
        }
    }

    async fn used_pins(&self) -> Result<UsedPins> {
        match self {
            Store::File(store) => store.used_pins().await,
            Store::Http(store) => store.used_pins().await,
        }
    }
}

/// One editing session over a store
pub struct EditSession<S, C> {
    store: S,
    catalog: C,
    reserved_pins: Vec<i32>,
    pins: UsedPins,
    record: LedOptionsRecord,
    config: LedConfiguration,
    last_failure: Option<String>,
}

impl<S: LedOptionsStore, C: ButtonCatalog> EditSession<S, C> {
    /// Create a session holding the default configuration until `load`
    pub fn new(store: S, catalog: C, reserved_pins: Vec<i32>) -> Self {
        let pins = reserved_pins.iter().copied().collect();
        Self {
            store,
            catalog,
            reserved_pins,
            pins,
            record: LedOptionsRecord::default(),
            config: LedConfiguration::default(),
            last_failure: None,
        }
    }

    pub fn config(&self) -> &LedConfiguration {
        &self.config
    }

    pub fn pins(&self) -> &UsedPins {
        &self.pins
    }

    /// Message from the last failed load or save
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn buttons(&self) -> Vec<ButtonLabel> {
        self.catalog.buttons()
    }

    /// Display label for `id`, or its key if the catalog has no entry
    pub fn label_for(&self, id: ButtonId) -> String {
        self.catalog
            .label_for(id)
            .unwrap_or_else(|| id.key().to_string())
    }

    /// Available/assigned partitions in catalog order
    pub fn views(&self) -> ButtonViews {
        let order: Vec<ButtonId> = self.catalog.buttons().iter().map(|b| b.id).collect();
        self.config.views(&order)
    }

    pub fn first_available_rgb_index(&self) -> u32 {
        self.config.first_available_rgb_index()
    }

    pub fn edit(&mut self, edit: LedEdit) {
        self.config = std::mem::take(&mut self.config).apply(edit);
    }

    pub fn edit_all<I: IntoIterator<Item = LedEdit>>(&mut self, edits: I) {
        self.config = std::mem::take(&mut self.config).apply_all(edits);
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        model::validate(&self.config, &self.pins)
    }

    pub fn advisories(&self) -> Vec<Advisory> {
        model::advisories(&self.config)
    }

    /// Replace the session contents with the persisted record.
    ///
    /// On failure the session keeps its previous state.
    pub async fn load(&mut self) -> Result<&LedConfiguration> {
        info!("Loading LED options");

        let record = match self.store.load().await {
            Ok(record) => record,
            Err(e) => {
                let e = into_persistence(e);
                warn!("Failed to load LED options: {}", e);
                self.last_failure = Some(e.to_string());
                return Err(e);
            }
        };

        let config = record.hydrate();
        let pins = self.fetch_pins(&config).await;

        self.record = record;
        self.config = config;
        self.pins = pins;
        self.last_failure = None;

        info!(
            "Loaded LED options ({} buttons assigned)",
            self.config.button_map.assigned_count()
        );
        Ok(&self.config)
    }

    /// Validate, encode and write the configuration.
    ///
    /// Validation or invariant errors block the save and are returned as
    /// `Err`. Otherwise returns whether the store accepted the record.
    pub async fn save(&mut self) -> Result<bool> {
        if let Err(errors) = self.validate() {
            info!("Save blocked: {}", errors);
            return Err(LedConfigError::Validation(errors));
        }
        self.config.button_map.check_contiguity()?;

        for hint in self.advisories() {
            warn!(
                "{} = {} is below the first free LED index {}",
                hint.field, hint.value, hint.first_available
            );
        }

        let record = self.record.clone().with_configuration(&self.config);

        info!("Saving LED options");
        match self.store.save(&record).await {
            Ok(()) => {
                self.record = record;
                self.pins = self.fetch_pins(&self.config).await;
                self.last_failure = None;
                info!("LED options saved");
                Ok(true)
            }
            Err(e) => {
                let e = into_persistence(e);
                warn!("Failed to save LED options: {}", e);
                self.last_failure = Some(e.to_string());
                Ok(false)
            }
        }
    }

    /// Pins claimed elsewhere: the device list minus this config's own
    /// pins, plus the reserved pins from the application config
    async fn fetch_pins(&self, config: &LedConfiguration) -> UsedPins {
        let device = match self.store.used_pins().await {
            Ok(pins) => pins,
            Err(e) => {
                warn!("Failed to fetch used pins: {}", e);
                UsedPins::new()
            }
        };

        let mut pins = device.without(config.own_pins());
        pins.extend(self.reserved_pins.iter().copied());
        pins
    }
}

fn into_persistence(e: LedConfigError) -> LedConfigError {
    match e {
        LedConfigError::Persistence(_) => e,
        other => LedConfigError::Persistence(other.to_string()),
    }
}
