//! Pointer input mapping
//!
//! Turns raw pointer samples (canvas-local coordinates) into angle, rope and
//! slip perturbations. Samples that arrive out of order are ignored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::SimulationState;
use crate::cartesian_to_polar;
use crate::tuning::{SlipSample, Tuning};

/// A raw pointer sample from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
}

/// What a pointer sample did to the state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputOutcome {
    /// Sample had no effect
    Ignored,
    /// Pointer grabbed the ring
    DragStarted,
    /// Drag sample applied; `slipped` if it kicked the base
    Dragged { slipped: bool },
    /// Drag finished; carries the new attempt count
    DragEnded { attempts: u32 },
}

/// Route a sample to the matching handler
pub fn apply_pointer(state: &mut SimulationState, tuning: &Tuning, event: PointerEvent) -> InputOutcome {
    match event {
        PointerEvent::Down { x, y } => {
            if pointer_down(state, tuning, Vec2::new(x, y)) {
                InputOutcome::DragStarted
            } else {
                InputOutcome::Ignored
            }
        }
        PointerEvent::Move { x, y } => match pointer_move(state, tuning, Vec2::new(x, y)) {
            Some(slipped) => InputOutcome::Dragged { slipped },
            None => InputOutcome::Ignored,
        },
        PointerEvent::Up => {
            if pointer_up(state) {
                InputOutcome::DragEnded {
                    attempts: state.attempts,
                }
            } else {
                InputOutcome::Ignored
            }
        }
    }
}

/// Start a drag if the pointer lands on the ring
pub fn pointer_down(state: &mut SimulationState, tuning: &Tuning, pos: Vec2) -> bool {
    if !state.is_active() || !pos.is_finite() {
        return false;
    }
    if pos.distance(state.ring()) >= tuning.capture_radius {
        return false;
    }

    state.is_dragging = true;
    state.drag_ref_x = pos.x;
    log::debug!("Drag started at ({:.1}, {:.1})", pos.x, pos.y);
    true
}

/// Apply one drag sample
///
/// Returns `None` when not dragging, otherwise whether the base slipped.
pub fn pointer_move(state: &mut SimulationState, tuning: &Tuning, pos: Vec2) -> Option<bool> {
    if !state.is_dragging || !state.is_active() || !pos.is_finite() {
        return None;
    }

    // Horizontal speed since the last sample perturbs the rope
    let speed = pos.x - state.drag_ref_x;
    state.rope_velocity += speed * tuning.rope_input_gain;
    if speed.abs() > tuning.wobble_threshold {
        state.wobble = speed.abs() * tuning.wobble_gain;
    }

    // Pull is measured against the ring the player last saw
    let pull = (pos.x - state.ring().x).abs();

    let prev_angle = state.angle();
    let (_, theta) = cartesian_to_polar(pos - state.base);
    state.set_angle(theta);

    let sample = SlipSample {
        pull,
        speed,
        angular_speed: state.angle() - prev_angle,
    };
    let slipped = tuning.slip_trigger.fires(&sample);
    if slipped {
        let direction = if pos.x > state.base.x { 1.0 } else { -1.0 };
        state.base_velocity += direction * (tuning.slip_bias - state.friction());
    }

    state.drag_ref_x = pos.x;
    state.update_ring();
    Some(slipped)
}

/// End a drag; counts one attempt
pub fn pointer_up(state: &mut SimulationState) -> bool {
    if !state.is_dragging {
        return false;
    }
    state.is_dragging = false;
    state.attempts += 1;
    log::debug!("Drag ended (attempt {})", state.attempts);
    true
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::consts::ANGLE_UPRIGHT;
    use crate::polar_to_cartesian;
    use crate::sim::state::Viewport;
    use crate::sim::tick::tick;
    use proptest::prelude::*;

    fn pointer_event() -> impl Strategy<Value = PointerEvent> {
        prop_oneof![
            (-200.0f32..1000.0, -200.0f32..800.0).prop_map(|(x, y)| PointerEvent::Down { x, y }),
            (-200.0f32..1000.0, -200.0f32..800.0).prop_map(|(x, y)| PointerEvent::Move { x, y }),
            (-5.0f32..5.0, -5.0f32..5.0).prop_map(|(dx, dy)| PointerEvent::Down { x: 490.0 + dx, y: 510.0 + dy }),
            Just(PointerEvent::Up),
        ]
    }

    proptest! {
        /// Angle stays in range and the ring stays on the arm for any input sequence
        #[test]
        fn prop_angle_clamped_and_ring_consistent(
            events in prop::collection::vec(pointer_event(), 1..80),
        ) {
            let tuning = Tuning::default();
            let mut state = SimulationState::new(&tuning);
            state.layout(Viewport::new(800.0, 600.0), &tuning);
            state.paused = false;

            for event in events {
                apply_pointer(&mut state, &tuning, event);
                prop_assert!(state.angle() >= ANGLE_UPRIGHT && state.angle() <= 0.0);

                tick(&mut state, &tuning);
                prop_assert!(state.angle() >= ANGLE_UPRIGHT && state.angle() <= 0.0);

                let expected = state.base + polar_to_cartesian(tuning.arm_length, state.angle());
                prop_assert!((state.ring() - expected).length() < 1e-2);
            }
        }

        /// Attempts only grow, by at most one per sample
        #[test]
        fn prop_attempts_monotonic(
            events in prop::collection::vec(pointer_event(), 1..80),
        ) {
            let tuning = Tuning::default();
            let mut state = SimulationState::new(&tuning);
            state.layout(Viewport::new(800.0, 600.0), &tuning);
            state.paused = false;

            for event in events {
                let before = state.attempts;
                apply_pointer(&mut state, &tuning, event);
                prop_assert!(state.attempts == before || state.attempts == before + 1);
            }
        }
    }
}
