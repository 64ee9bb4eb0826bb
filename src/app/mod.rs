pub mod amount;
pub mod controller;
pub mod state;
pub mod view;

pub use amount::{Adjustment, Amount, QUICK_PICKS};
pub use controller::{Controller, ControllerSettings};
pub use state::{Detail, ErrorBanner, Notice, Pending, ViewState};
pub use view::render;
