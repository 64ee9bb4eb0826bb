use tokio::time::Instant;

use crate::models::{Item, ScanParams};

use super::amount::Amount;

/// Flash message inside the detail view.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success {
        message: String,
        expires_at: Instant,
    },
    Failure(String),
}

/// Item being shown, with everything the adjustment panel needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub item: Item,
    pub params: Option<ScanParams>,
    pub amount: Amount,
    pub notice: Option<Notice>,
}

impl Detail {
    pub fn new(item: Item, params: Option<ScanParams>) -> Self {
        Self {
            item,
            params,
            amount: Amount::ONE,
            notice: None,
        }
    }

    /// Taking is disabled while the amount exceeds the stock on hand.
    pub fn can_take(&self) -> bool {
        self.amount.get() <= self.item.quantity
    }

    /// Location hint carried by the scan, not the stored location.
    pub fn location_hint(&self) -> Option<&str> {
        self.params.as_ref().and_then(|p| p.location.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    Lookup { params: ScanParams },
    Update { detail: Detail, target: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
}

/// Render modes. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    PermissionCheck,
    Scanning,
    Loading(Pending),
    Detail(Detail),
    Error(ErrorBanner),
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::PermissionCheck => "permission-check",
            ViewState::Scanning => "scanning",
            ViewState::Loading(_) => "loading",
            ViewState::Detail(_) => "detail",
            ViewState::Error(_) => "error",
        }
    }

    pub fn detail(&self) -> Option<&Detail> {
        match self {
            ViewState::Detail(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, ViewState::PermissionCheck | ViewState::Loading(_))
    }
}
