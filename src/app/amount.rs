use crate::error::{AppError, AppResult};
use crate::models::MovementKind;

pub const QUICK_PICKS: [u32; 4] = [1, 5, 10, 25];

/// Requested change amount. Never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(u32);

impl Amount {
    pub const ONE: Amount = Amount(1);

    pub fn new(value: u32) -> Self {
        Self(value.max(1))
    }

    /// Direct numeric entry. Reads leading digits; anything unusable becomes 1.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().map(Self::new).unwrap_or(Self::ONE)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn step_up(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn step_down(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Stock leaves the shelf.
    Take,
    /// Stock arrives.
    Add,
}

impl Adjustment {
    /// Quantity to send for `current` changed by `amount`. Takes clamp at zero.
    pub fn target(self, current: u32, amount: Amount) -> AppResult<u32> {
        match self {
            Adjustment::Take => Ok(current.saturating_sub(amount.get())),
            Adjustment::Add => current.checked_add(amount.get()).ok_or_else(|| {
                AppError::Update(format!("{} + {} overflows", current, amount.get()))
            }),
        }
    }

    pub fn movement_kind(self) -> MovementKind {
        match self {
            Adjustment::Take => MovementKind::Decrement,
            Adjustment::Add => MovementKind::Increment,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Adjustment::Take => "reduced",
            Adjustment::Add => "increased",
        }
    }
}
