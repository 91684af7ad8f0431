//! Rope Bottle - a tethered bottle balancing toy
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (integrator, win detection, input mapping)
//! - `session`: Session owner (control surface, deferred level advance, events)
//! - `tuning`: Data-driven physics constants
//! - `persistence`: Best score storage
//! - `platform`: Browser bindings

pub mod error;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use persistence::{BestScoreStore, MemoryStore};
pub use session::{GameEvent, Hud, Session, Status};
pub use tuning::{SlipTrigger, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Virtual frame length (ms) at 60 Hz, used by headless hosts
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Arm length from base to ring (bottle body 135 + neck 35)
    pub const ARM_LENGTH: f32 = 170.0;
    /// Bottle body length (rendering)
    pub const BODY_LENGTH: f32 = 135.0;
    /// Ring radius (rendering)
    pub const RING_RADIUS: f32 = 22.0;

    /// Vertical orientation of the bottle
    pub const ANGLE_UPRIGHT: f32 = -std::f32::consts::FRAC_PI_2;
    /// Lying flat
    pub const ANGLE_FLAT: f32 = 0.0;

    /// Friction bounds
    pub const FRICTION_MIN: f32 = 0.4;
    pub const FRICTION_MAX: f32 = 0.95;
}

/// Clamp an angle to the bottle's legal range [-π/2, 0]
#[inline]
pub fn clamp_angle(angle: f32) -> f32 {
    angle.clamp(consts::ANGLE_UPRIGHT, consts::ANGLE_FLAT)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
