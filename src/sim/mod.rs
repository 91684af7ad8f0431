//! Fixed-step simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed per-frame step, no delta-time
//! - No rendering, storage or platform dependencies
//! - Wall-clock time only enters through `AdvanceTicket`

pub mod autopilot;
pub mod input;
pub mod progression;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use input::{InputOutcome, PointerEvent, apply_pointer, pointer_down, pointer_move, pointer_up};
pub use progression::{AdvanceTicket, Win, advance_level, check_win, is_settled, is_upright, schedule_advance};
pub use state::{SimulationState, Viewport};
pub use tick::tick;
