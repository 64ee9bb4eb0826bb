//! In-memory doubles for the store, camera and decoder.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{AppError, AppResult};
use crate::models::{Item, MovementRecord};
use crate::scan::camera::{Camera, CameraFailure, CaptureStream};
use crate::scan::decoder::{CameraConstraint, DecodeSink, Decoder, DecoderSession, ScanConfig};
use crate::store::{LookupKey, RecordStore};

pub fn sample_item(id: &str, sku: &str, quantity: u32, minimum: Option<u32>) -> Item {
    Item {
        id: id.to_string(),
        secondary_key: Some(sku.to_string()),
        name: format!("Item {}", sku),
        quantity,
        minimum,
        unit: None,
        location: Some("Rack A".to_string()),
        image_url: None,
        supplier: None,
        updated_at: None,
    }
}

#[derive(Default)]
struct StoreState {
    items: Vec<Item>,
    lookups: Vec<LookupKey>,
    updates: Vec<(String, u32)>,
    movements: Vec<MovementRecord>,
    fail_lookups: bool,
    fail_updates: bool,
    fail_movements: bool,
    /// Added by "another client" to every stored quantity on update.
    drift: i64,
}

#[derive(Clone, Default)]
pub struct FakeStore {
    inner: Arc<Mutex<StoreState>>,
}

impl FakeStore {
    pub fn with_items(items: Vec<Item>) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().items = items;
        store
    }

    pub fn lookups(&self) -> Vec<LookupKey> {
        self.inner.lock().unwrap().lookups.clone()
    }

    pub fn updates(&self) -> Vec<(String, u32)> {
        self.inner.lock().unwrap().updates.clone()
    }

    pub fn movements(&self) -> Vec<MovementRecord> {
        self.inner.lock().unwrap().movements.clone()
    }

    pub fn fail_lookups(&self) {
        self.inner.lock().unwrap().fail_lookups = true;
    }

    pub fn fail_updates(&self) {
        self.inner.lock().unwrap().fail_updates = true;
    }

    pub fn fail_movements(&self) {
        self.inner.lock().unwrap().fail_movements = true;
    }

    pub fn set_drift(&self, drift: i64) {
        self.inner.lock().unwrap().drift = drift;
    }

    fn lookup(&self, key: LookupKey, value: &str) -> AppResult<Option<Item>> {
        let mut state = self.inner.lock().unwrap();
        state.lookups.push(key);
        if state.fail_lookups {
            return Err(AppError::Fetch("connection refused".to_string()));
        }
        Ok(state
            .items
            .iter()
            .find(|item| match key {
                LookupKey::Identifier => item.id == value,
                LookupKey::SecondaryKey => item.secondary_key.as_deref() == Some(value),
            })
            .cloned())
    }
}

impl RecordStore for FakeStore {
    async fn find_by_identifier(&self, id: &str) -> AppResult<Option<Item>> {
        self.lookup(LookupKey::Identifier, id)
    }

    async fn find_by_secondary_key(&self, key: &str) -> AppResult<Option<Item>> {
        self.lookup(LookupKey::SecondaryKey, key)
    }

    async fn update_quantity(&self, id: &str, quantity: u32) -> AppResult<Item> {
        let mut state = self.inner.lock().unwrap();
        state.updates.push((id.to_string(), quantity));
        if state.fail_updates {
            return Err(AppError::Update("status=500".to_string()));
        }
        let drift = state.drift;
        let item = state
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| AppError::Update("no row matched the id".to_string()))?;
        item.quantity = (i64::from(quantity) + drift).max(0) as u32;
        Ok(item.clone())
    }

    async fn log_movement(&self, movement: MovementRecord) -> AppResult<()> {
        let mut state = self.inner.lock().unwrap();
        if state.fail_movements {
            return Err(AppError::Update("movement insert failed".to_string()));
        }
        state.movements.push(movement);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeCamera {
    unavailable: bool,
    failure: Option<CameraFailure>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl FakeCamera {
    pub fn granting() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn failing(failure: CameraFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

pub struct FakeStream {
    released: Arc<AtomicUsize>,
}

impl CaptureStream for FakeStream {
    fn stop_tracks(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl Camera for FakeCamera {
    type Stream = FakeStream;

    fn is_available(&self) -> bool {
        !self.unavailable
    }

    async fn acquire(&self, _constraint: CameraConstraint) -> Result<FakeStream, CameraFailure> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(FakeStream {
            released: self.released.clone(),
        })
    }
}

#[derive(Clone, Default)]
pub struct DecoderLog {
    starts: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

impl DecoderLog {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FakeDecoder {
    log: DecoderLog,
    start_error: Option<String>,
    stop_error: Option<String>,
}

impl FakeDecoder {
    pub fn new() -> (Self, DecoderLog) {
        let decoder = Self::default();
        let log = decoder.log.clone();
        (decoder, log)
    }

    pub fn failing_start(message: &str) -> (Self, DecoderLog) {
        let (mut decoder, log) = Self::new();
        decoder.start_error = Some(message.to_string());
        (decoder, log)
    }

    pub fn failing_stop(message: &str) -> (Self, DecoderLog) {
        let (mut decoder, log) = Self::new();
        decoder.stop_error = Some(message.to_string());
        (decoder, log)
    }
}

pub struct FakeSession {
    log: DecoderLog,
    error: Option<String>,
}

impl Decoder for FakeDecoder {
    type Session = FakeSession;

    async fn start(
        &mut self,
        _constraint: CameraConstraint,
        _config: ScanConfig,
        _sink: DecodeSink,
    ) -> Result<FakeSession, String> {
        if let Some(msg) = &self.start_error {
            return Err(msg.clone());
        }
        self.log.starts.fetch_add(1, Ordering::SeqCst);
        Ok(FakeSession {
            log: self.log.clone(),
            error: self.stop_error.clone(),
        })
    }
}

impl DecoderSession for FakeSession {
    async fn stop(self) -> Result<(), String> {
        self.log.stops.fetch_add(1, Ordering::SeqCst);
        match self.error {
            Some(msg) => Err(msg),
            None => Ok(()),
        }
    }
}
