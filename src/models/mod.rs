pub mod item;
pub mod movement;
pub mod session;

pub use item::*;
pub use movement::*;
pub use session::*;
