pub mod common;
pub mod player;
pub mod status;

pub use common::{EntityId, Position, Side};
pub use player::{Modifiers, PlayerState};
pub use status::{Buff, ControlFlags, Debuff};
