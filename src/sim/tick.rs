//! Fixed-step physics integrator
//!
//! One call advances the scene by one frame. There is no delta-time: every
//! constant in [`Tuning`] is expressed per tick.

use super::state::SimulationState;
use crate::tuning::Tuning;

/// Advance the simulation by one tick
///
/// No-op while paused, during the win celebration, or before layout.
pub fn tick(state: &mut SimulationState, tuning: &Tuning) {
    if !state.is_active() {
        return;
    }

    state.time_ticks += 1;

    // Rope midpoint: damped spring toward zero swing
    state.rope_velocity += (0.0 - state.rope_swing) * tuning.rope_stiffness;
    state.rope_velocity *= tuning.rope_damping;
    state.rope_swing += state.rope_velocity;

    state.wobble *= tuning.wobble_decay;

    if state.is_dragging {
        // Base coasts on its slip velocity; the player owns the angle
        state.base.x += state.base_velocity;
        state.base_velocity *= tuning.drag_base_damping;
    } else {
        // Base springs back to rest
        state.base_velocity += (state.original_base_x - state.base.x) * tuning.base_stiffness;
        state.base_velocity *= tuning.base_damping;
        state.base.x += state.base_velocity;

        // Gravity lays the bottle back down
        let angle = state.angle();
        if angle < 0.0 {
            state.set_angle(angle + tuning.relax_rate);
        }
    }

    state.update_ring();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;
    use crate::sim::state::Viewport;
    use std::f32::consts::FRAC_PI_2;

    fn playing() -> (SimulationState, Tuning) {
        let tuning = Tuning::default();
        let mut state = SimulationState::new(&tuning);
        state.layout(Viewport::new(800.0, 600.0), &tuning);
        state.paused = false;
        (state, tuning)
    }

    #[test]
    fn test_tick_noop_when_paused() {
        let (mut state, tuning) = playing();
        state.paused = true;
        state.rope_swing = 10.0;
        tick(&mut state, &tuning);
        assert_eq!(state.rope_swing, 10.0);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_tick_noop_when_won() {
        let (mut state, tuning) = playing();
        state.has_won = true;
        state.base_velocity = 3.0;
        let x = state.base.x;
        tick(&mut state, &tuning);
        assert_eq!(state.base.x, x);
        assert_eq!(state.base_velocity, 3.0);
    }

    #[test]
    fn test_tick_noop_without_layout() {
        let tuning = Tuning::default();
        let mut state = SimulationState::new(&tuning);
        state.paused = false;
        state.rope_swing = 5.0;
        tick(&mut state, &tuning);
        assert_eq!(state.rope_swing, 5.0);
        assert_eq!(state.ring(), glam::Vec2::ZERO);
    }

    #[test]
    fn test_rope_step_matches_formula() {
        let (mut state, tuning) = playing();
        state.rope_swing = 10.0;
        state.rope_velocity = 0.0;
        tick(&mut state, &tuning);
        // v = (0 - 10) * 0.1 * 0.92 = -0.92, swing = 9.08
        assert!((state.rope_velocity + 0.92).abs() < 1e-5);
        assert!((state.rope_swing - 9.08).abs() < 1e-5);
    }

    #[test]
    fn test_released_angle_relaxes_to_flat() {
        let (mut state, tuning) = playing();
        state.set_angle(-0.12);
        tick(&mut state, &tuning);
        assert!((state.angle() + 0.07).abs() < 1e-5);
        tick(&mut state, &tuning);
        tick(&mut state, &tuning);
        // Never overshoots above flat
        assert_eq!(state.angle(), 0.0);
    }

    #[test]
    fn test_dragging_keeps_angle_and_decays_velocity() {
        let (mut state, tuning) = playing();
        state.is_dragging = true;
        state.set_angle(-1.0);
        state.base_velocity = 2.0;
        let x = state.base.x;
        tick(&mut state, &tuning);
        assert_eq!(state.angle(), -1.0);
        assert!((state.base.x - (x + 2.0)).abs() < 1e-5);
        assert!((state.base_velocity - 1.8).abs() < 1e-5);
    }

    #[test]
    fn test_released_base_springs_back() {
        let (mut state, tuning) = playing();
        state.base.x = state.original_base_x + 20.0;
        tick(&mut state, &tuning);
        // v = (-20 * 0.05) * 0.8 = -0.8
        assert!((state.base_velocity + 0.8).abs() < 1e-5);
        assert!((state.base.x - (state.original_base_x + 19.2)).abs() < 1e-4);
    }

    #[test]
    fn test_ring_consistent_after_tick() {
        let (mut state, tuning) = playing();
        state.is_dragging = true;
        state.set_angle(-0.7);
        state.base_velocity = 1.5;
        for _ in 0..5 {
            tick(&mut state, &tuning);
            let expected = state.base + polar_to_cartesian(tuning.arm_length, state.angle());
            assert!((state.ring() - expected).length() < 1e-3);
        }
    }

    #[test]
    fn test_decay_convergence_when_released() {
        let (mut state, tuning) = playing();
        state.rope_swing = 50.0;
        state.rope_velocity = -8.0;
        state.base.x = state.original_base_x - 60.0;
        state.base_velocity = 5.0;
        state.wobble = 12.0;
        state.set_angle(-FRAC_PI_2);

        let start_rope = state.rope_swing.abs() + state.rope_velocity.abs();
        let start_base = (state.base.x - state.original_base_x).abs() + state.base_velocity.abs();

        for _ in 0..400 {
            tick(&mut state, &tuning);
            assert!(state.rope_swing.is_finite() && state.base_velocity.is_finite());
            // Never diverges past a generous multiple of the initial energy
            assert!(state.rope_swing.abs() <= 4.0 * start_rope);
            assert!(state.base_velocity.abs() <= 4.0 * start_base);
        }

        assert!(state.rope_swing.abs() < 1e-2);
        assert!(state.rope_velocity.abs() < 1e-2);
        assert!(state.base_velocity.abs() < 1e-2);
        assert!((state.base.x - state.original_base_x).abs() < 1e-2);
        assert!(state.wobble < 1e-6);
        assert_eq!(state.angle(), 0.0);
    }

    #[test]
    fn test_stiffest_accepted_springs_converge() {
        let tuning = Tuning::from_json(r#"{ "base_stiffness": 1.0, "rope_stiffness": 1.0 }"#)
            .expect("stiffness 1.0 is in range");
        let mut state = SimulationState::new(&tuning);
        state.layout(Viewport::new(800.0, 600.0), &tuning);
        state.paused = false;
        state.rope_swing = 10.0;
        state.base.x = state.original_base_x + 10.0;

        for _ in 0..400 {
            tick(&mut state, &tuning);
            assert!(state.rope_swing.is_finite() && state.base_velocity.is_finite());
            assert!(state.rope_swing.abs() <= 40.0);
            assert!((state.base.x - state.original_base_x).abs() <= 40.0);
        }

        assert!(state.rope_swing.abs() < 1e-2);
        assert!(state.base_velocity.abs() < 1e-2);
        assert!((state.base.x - state.original_base_x).abs() < 1e-2);
    }

    #[test]
    fn test_determinism() {
        let (mut a, tuning) = playing();
        let mut b = a.clone();
        a.rope_swing = 3.0;
        b.rope_swing = 3.0;
        a.base_velocity = -1.0;
        b.base_velocity = -1.0;
        for _ in 0..50 {
            tick(&mut a, &tuning);
            tick(&mut b, &tuning);
        }
        assert_eq!(a.rope_swing, b.rope_swing);
        assert_eq!(a.base, b.base);
        assert_eq!(a.time_ticks, 50);
    }
}
