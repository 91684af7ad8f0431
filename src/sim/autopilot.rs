//! Idle/demo mode - a bot that plays the game
//!
//! Produces pointer samples the same way a player would: grab the ring, sweep it
//! up along the arm's circle, let go if it takes too long. Jitter comes from a
//! seeded RNG so runs are reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::input::PointerEvent;
use super::state::SimulationState;
use crate::consts::ANGLE_UPRIGHT;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Radians swept per frame while lifting
const SWEEP_STEP: f32 = 0.08;
/// Aim slightly past vertical so the clamp pins the bottle upright
const OVERSHOOT: f32 = 0.05;
/// Frames to hold a drag before giving up and releasing
const PATIENCE_FRAMES: u32 = 240;

/// Demo player
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    /// Max pointer noise per axis (canvas units)
    jitter: f32,
    drag_frames: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            jitter: 2.0,
            drag_frames: 0,
        }
    }

    /// Pointer noise amplitude (0 for a perfect hand)
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.abs();
        self
    }

    fn noise(&mut self) -> f32 {
        if self.jitter == 0.0 {
            0.0
        } else {
            self.rng.random_range(-self.jitter..=self.jitter)
        }
    }

    /// Next pointer sample for this frame, if any
    pub fn next_event(&mut self, state: &SimulationState, tuning: &Tuning) -> Option<PointerEvent> {
        if !state.is_active() {
            self.drag_frames = 0;
            return None;
        }

        if !state.is_dragging {
            self.drag_frames = 0;
            let ring = state.ring();
            return Some(PointerEvent::Down {
                x: ring.x + self.noise(),
                y: ring.y + self.noise(),
            });
        }

        self.drag_frames += 1;
        if self.drag_frames > PATIENCE_FRAMES {
            self.drag_frames = 0;
            return Some(PointerEvent::Up);
        }

        let angle = (state.angle() - SWEEP_STEP).max(ANGLE_UPRIGHT - OVERSHOOT);
        let target = state.base + polar_to_cartesian(tuning.arm_length, angle);
        Some(PointerEvent::Move {
            x: target.x + self.noise(),
            y: target.y + self.noise(),
        })
    }
}
