use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use crate::address::{clear_session_params, read_session_params, write_session_params, AddressBar};
use crate::config::Config;
use crate::error::AppError;
use crate::models::{MovementRecord, ScanParams};
use crate::scan::camera::{probe_camera, Camera};
use crate::scan::decoder::{
    classify_start_failure, CameraConstraint, DecodeEvent, DecodeSink, Decoder, DecoderSession,
    ScanConfig,
};
use crate::scan::payload::parse_payload;
use crate::store::{find_item, RecordStore};

use super::amount::{Adjustment, Amount, QUICK_PICKS};
use super::state::{Detail, ErrorBanner, Notice, Pending, ViewState};

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub scan_config: ScanConfig,
    /// Gap between showing the scanning surface and attaching the decoder.
    pub scan_settle: Duration,
    pub success_dismiss: Duration,
    pub log_movements: bool,
    pub movement_actor: Option<String>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            scan_config: ScanConfig::default(),
            scan_settle: Duration::from_millis(100),
            success_dismiss: Duration::from_secs(3),
            log_movements: false,
            movement_actor: None,
        }
    }
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scan_config: ScanConfig::default(),
            scan_settle: config.scan_settle,
            success_dismiss: config.success_dismiss,
            log_movements: config.schema.movement_table.is_some(),
            movement_actor: config.movement_actor.clone(),
        }
    }
}

/// Drives one scan session from the scan button to the adjusted item.
///
/// The running decoder session is owned here and stopped on decode, cancel,
/// reset and shutdown.
pub struct Controller<S, C, D, A>
where
    D: Decoder,
{
    store: S,
    camera: C,
    decoder: D,
    address: A,
    settings: ControllerSettings,
    state: ViewState,
    session: Option<D::Session>,
}

impl<S, C, D, A> Controller<S, C, D, A>
where
    S: RecordStore + Clone + 'static,
    C: Camera,
    D: Decoder,
    A: AddressBar,
{
    pub fn new(store: S, camera: C, decoder: D, address: A, settings: ControllerSettings) -> Self {
        Self {
            store,
            camera,
            decoder,
            address,
            settings,
            state: ViewState::Idle,
            session: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn address(&self) -> &A {
        &self.address
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn decoder_running(&self) -> bool {
        self.session.is_some()
    }

    /// Opens the item named in the address, if any.
    pub async fn boot(&mut self) {
        if let Some(params) = read_session_params(&self.address) {
            tracing::info!("Deep link to item {}", params.id);
            self.load(params).await;
        }
    }

    pub async fn start_scan(&mut self) {
        if self.state.is_busy() {
            return;
        }
        self.stop_decoder().await;
        clear_session_params(&mut self.address);
        self.set_state(ViewState::PermissionCheck);

        match probe_camera(&self.camera, &self.address.current()).await {
            Ok(()) => self.set_state(ViewState::Scanning),
            Err(e) => self.fail(e),
        }
    }

    /// Starts the decoder once the scanning surface is on screen.
    pub async fn attach_decoder(&mut self, sink: DecodeSink) {
        if !matches!(self.state, ViewState::Scanning) || self.session.is_some() {
            return;
        }
        tokio::time::sleep(self.settings.scan_settle).await;

        let started = self
            .decoder
            .start(CameraConstraint::default(), self.settings.scan_config, sink)
            .await;
        match started {
            Ok(session) => {
                tracing::debug!("Decoder attached");
                self.session = Some(session);
            }
            Err(msg) => self.fail(classify_start_failure(&msg)),
        }
    }

    pub async fn cancel_scan(&mut self) {
        if !matches!(self.state, ViewState::Scanning) {
            return;
        }
        self.stop_decoder().await;
        self.set_state(ViewState::Idle);
    }

    pub async fn handle_decode_event(&mut self, event: DecodeEvent) {
        let DecodeEvent::Decoded(text) = event else {
            return;
        };
        if !matches!(self.state, ViewState::Scanning) {
            tracing::debug!("Ignoring decode outside of scanning");
            return;
        }
        // Stop first so a symbol still in view cannot fire again.
        self.stop_decoder().await;

        match parse_payload(&text) {
            Ok(params) => {
                write_session_params(&mut self.address, &params);
                self.load(params).await;
            }
            Err(e) => self.fail(e),
        }
    }

    /// Manual identifier entry. Any text is tried against both keys.
    pub async fn open(&mut self, id: &str) {
        let id = id.trim();
        if id.is_empty() || self.state.is_busy() {
            return;
        }
        self.stop_decoder().await;
        let params = ScanParams::bare(id);
        write_session_params(&mut self.address, &params);
        self.load(params).await;
    }

    async fn load(&mut self, params: ScanParams) {
        tracing::info!("Looking up item {}", params.id);
        self.set_state(ViewState::Loading(Pending::Lookup {
            params: params.clone(),
        }));

        match find_item(&self.store, &params.id).await {
            Ok(Some((item, _))) => {
                self.set_state(ViewState::Detail(Detail::new(item, Some(params))))
            }
            Ok(None) => {
                tracing::info!("Item not found for {}", params.id);
                self.fail(AppError::NotFound(params.id));
            }
            Err(e) => {
                tracing::error!("Failed to load item {}: {}", params.id, e);
                self.fail(e);
            }
        }
    }

    pub fn set_amount(&mut self, input: &str) {
        if let Some(detail) = self.detail_mut() {
            detail.amount = Amount::parse(input);
        }
    }

    pub fn step_up(&mut self) {
        if let Some(detail) = self.detail_mut() {
            detail.amount = detail.amount.step_up();
        }
    }

    pub fn step_down(&mut self) {
        if let Some(detail) = self.detail_mut() {
            detail.amount = detail.amount.step_down();
        }
    }

    /// Returns `false` for values outside the quick-pick set.
    pub fn quick_pick(&mut self, value: u32) -> bool {
        if !QUICK_PICKS.contains(&value) {
            return false;
        }
        match self.detail_mut() {
            Some(detail) => {
                detail.amount = Amount::new(value);
                true
            }
            None => false,
        }
    }

    pub async fn adjust(&mut self, adjustment: Adjustment) {
        let mut detail = match std::mem::take(&mut self.state) {
            ViewState::Detail(detail) => detail,
            other => {
                self.state = other;
                return;
            }
        };

        if adjustment == Adjustment::Take && !detail.can_take() {
            tracing::debug!(
                "Take of {} refused, only {} in stock",
                detail.amount.get(),
                detail.item.quantity
            );
            self.state = ViewState::Detail(detail);
            return;
        }

        let target = match adjustment.target(detail.item.quantity, detail.amount) {
            Ok(target) => target,
            Err(e) => {
                detail.notice = Some(Notice::Failure(e.user_message()));
                self.state = ViewState::Detail(detail);
                return;
            }
        };

        detail.notice = None;
        let item_id = detail.item.id.clone();
        let amount = detail.amount;
        self.set_state(ViewState::Loading(Pending::Update { detail, target }));

        let result = self.store.update_quantity(&item_id, target).await;

        let mut detail = match std::mem::take(&mut self.state) {
            ViewState::Loading(Pending::Update { detail, .. }) => detail,
            other => {
                self.state = other;
                return;
            }
        };

        match result {
            Ok(item) => {
                if item.quantity != target {
                    tracing::info!(
                        "Store returned {} for item {} (sent {})",
                        item.quantity,
                        item.id,
                        target
                    );
                }
                let message = format!(
                    "Stock {} to {} {}",
                    adjustment.verb(),
                    item.quantity,
                    item.unit_label()
                );
                detail.item = item;
                detail.amount = Amount::ONE;
                detail.notice = Some(Notice::Success {
                    message,
                    expires_at: Instant::now() + self.settings.success_dismiss,
                });
                if self.settings.log_movements {
                    self.spawn_movement_log(&item_id, adjustment, amount);
                }
            }
            Err(e) => {
                tracing::error!("Failed to update item {}: {}", item_id, e);
                let e = match e {
                    e @ AppError::Update(_) => e,
                    other => AppError::Update(other.to_string()),
                };
                detail.notice = Some(Notice::Failure(e.user_message()));
            }
        }
        self.set_state(ViewState::Detail(detail));
    }

    /// Fire-and-forget; the adjustment has already succeeded.
    fn spawn_movement_log(&self, item_id: &str, adjustment: Adjustment, amount: Amount) {
        let store = self.store.clone();
        let record = MovementRecord {
            item_id: item_id.to_string(),
            quantity: adjustment.movement_kind().signed(amount.get()),
            kind: adjustment.movement_kind(),
            note: format!("stock {} by scanner", adjustment.verb()),
            actor: self.settings.movement_actor.clone(),
            created_at: Utc::now(),
        };
        tokio::spawn(async move {
            if let Err(e) = store.log_movement(record).await {
                tracing::warn!("Movement log insert failed: {}", e);
            }
        });
    }

    /// When the success notice should disappear, if one is showing.
    pub fn notice_deadline(&self) -> Option<Instant> {
        match self.state.detail()?.notice.as_ref()? {
            Notice::Success { expires_at, .. } => Some(*expires_at),
            Notice::Failure(_) => None,
        }
    }

    pub fn expire_notice(&mut self, now: Instant) {
        if let Some(detail) = self.detail_mut() {
            let expired = matches!(
                detail.notice,
                Some(Notice::Success { expires_at, .. }) if expires_at <= now
            );
            if expired {
                detail.notice = None;
            }
        }
    }

    /// "Scan again": forget the item and return to the scan button.
    pub async fn reset(&mut self) {
        if self.state.is_busy() {
            return;
        }
        self.stop_decoder().await;
        clear_session_params(&mut self.address);
        self.set_state(ViewState::Idle);
    }

    pub async fn shutdown(&mut self) {
        self.stop_decoder().await;
    }

    async fn stop_decoder(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.stop().await {
                tracing::warn!("Failed to stop decoder: {}", e);
            }
        }
    }

    fn detail_mut(&mut self) -> Option<&mut Detail> {
        match &mut self.state {
            ViewState::Detail(detail) => Some(detail),
            _ => None,
        }
    }

    fn fail(&mut self, err: AppError) {
        tracing::warn!("{}", err);
        clear_session_params(&mut self.address);
        self.set_state(ViewState::Error(ErrorBanner {
            message: err.user_message(),
        }));
    }

    fn set_state(&mut self, state: ViewState) {
        tracing::debug!("View {} -> {}", self.state.name(), state.name());
        self.state = state;
    }
}
