//! Win detection and level progression
//!
//! A win locks input, awards points and hands back an [`AdvanceTicket`]. The
//! ticket is redeemed later (wall-clock delay) to move to the next level. A
//! ticket only redeems against the epoch and level it was issued for, so a
//! reset in between turns it into a no-op.

use serde::{Deserialize, Serialize};

use super::state::SimulationState;
use crate::tuning::Tuning;

/// Result of a successful win evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Win {
    /// Points awarded for this win
    pub points: u64,
    /// Score after the award
    pub score: u64,
    /// Level the win happened on
    pub level: u32,
    /// Score beat the previous best
    pub new_best: bool,
}

/// Pending level advance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvanceTicket {
    pub epoch: u64,
    pub level: u32,
    /// Wall-clock time (ms) at which the advance is due
    pub due_at_ms: f64,
}

impl AdvanceTicket {
    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms >= self.due_at_ms
    }
}

/// Bottle is within the win fraction of vertical
pub fn is_upright(state: &SimulationState, tuning: &Tuning) -> bool {
    state.angle() <= tuning.win_angle()
}

/// Base has stopped sliding
pub fn is_settled(state: &SimulationState, tuning: &Tuning) -> bool {
    state.base_velocity.abs() < tuning.settle_velocity
}

/// Evaluate the win condition once
///
/// Only runs on an active frame; while the celebration is running this never
/// fires again, so score is awarded exactly once per win.
pub fn check_win(state: &mut SimulationState, tuning: &Tuning) -> Option<Win> {
    if !state.is_active() {
        return None;
    }
    if !is_upright(state, tuning) || !is_settled(state, tuning) {
        return None;
    }

    state.has_won = true;
    state.is_dragging = false;

    let points = tuning.points_per_level * u64::from(state.level);
    state.score += points;

    let new_best = state.score > state.best_score;
    if new_best {
        state.best_score = state.score;
    }

    log::debug!(
        "Standing at level {} (+{} points, score {})",
        state.level,
        points,
        state.score
    );

    Some(Win {
        points,
        score: state.score,
        level: state.level,
        new_best,
    })
}

/// Issue the deferred advance for a win that just happened
pub fn schedule_advance(state: &SimulationState, tuning: &Tuning, now_ms: f64) -> AdvanceTicket {
    AdvanceTicket {
        epoch: state.epoch,
        level: state.level,
        due_at_ms: now_ms + tuning.level_advance_delay_ms,
    }
}

/// Redeem a ticket: next level, slipperier base, bottle back at rest
///
/// Returns false without touching the state if the ticket is stale.
pub fn advance_level(state: &mut SimulationState, tuning: &Tuning, ticket: &AdvanceTicket) -> bool {
    if ticket.epoch != state.epoch || ticket.level != state.level || !state.has_won {
        log::debug!(
            "Dropping stale level advance (epoch {} level {})",
            ticket.epoch,
            ticket.level
        );
        return false;
    }

    state.level += 1;
    state.set_friction(tuning.next_friction(state.friction()));
    state.reset_pose();
    state.has_won = false;

    log::info!(
        "Level {}: GO! (friction {:.2})",
        state.level,
        state.friction()
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRICTION_MIN;
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
    fn test_basic_win() {
        let (mut state, tuning) = playing();
        state.set_angle(-FRAC_PI_2);
        state.base_velocity = 0.0;
        state.is_dragging = true;

        let win = check_win(&mut state, &tuning).expect("should win");
        assert!(state.has_won);
        assert!(!state.is_dragging);
        assert_eq!(state.score, 100);
        assert_eq!(win.points, 100);
        assert_eq!(win.level, 1);
        assert!(win.new_best);
        assert_eq!(state.best_score, 100);
    }

    #[test]
    fn test_near_miss_rejected() {
        let (mut state, tuning) = playing();
        state.set_angle(-FRAC_PI_2 * 0.9);
        state.base_velocity = 0.0;
        assert!(check_win(&mut state, &tuning).is_none());
        assert!(!state.has_won);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_unstable_vertical_rejected() {
        let (mut state, tuning) = playing();
        state.set_angle(-FRAC_PI_2);
        state.base_velocity = 1.0;
        assert!(check_win(&mut state, &tuning).is_none());
        state.base_velocity = -0.3;
        assert!(check_win(&mut state, &tuning).is_none());
        assert!(!state.has_won);
    }

    #[test]
    fn test_threshold_edge_counts() {
        let (mut state, tuning) = playing();
        state.set_angle(tuning.win_angle());
        state.base_velocity = 0.29;
        assert!(check_win(&mut state, &tuning).is_some());
    }

    #[test]
    fn test_no_win_while_paused() {
        let (mut state, tuning) = playing();
        state.paused = true;
        state.set_angle(-FRAC_PI_2);
        assert!(check_win(&mut state, &tuning).is_none());
    }

    #[test]
    fn test_win_idempotent() {
        let (mut state, tuning) = playing();
        state.set_angle(-FRAC_PI_2);
        assert!(check_win(&mut state, &tuning).is_some());
        for _ in 0..10 {
            assert!(check_win(&mut state, &tuning).is_none());
        }
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_score_scales_with_level() {
        let (mut state, tuning) = playing();
        state.level = 3;
        state.best_score = 1000;
        state.set_angle(-FRAC_PI_2);
        let win = check_win(&mut state, &tuning).unwrap();
        assert_eq!(win.points, 300);
        assert!(!win.new_best);
        assert_eq!(state.best_score, 1000);
    }

    #[test]
    fn test_advance_level() {
        let (mut state, tuning) = playing();
        state.set_angle(-FRAC_PI_2);
        state.base.x += 12.0;
        check_win(&mut state, &tuning).unwrap();
        let ticket = schedule_advance(&state, &tuning, 1000.0);
        assert!(!ticket.is_due(2999.0));
        assert!(ticket.is_due(3000.0));

        assert!(advance_level(&mut state, &tuning, &ticket));
        assert_eq!(state.level, 2);
        assert!((state.friction() - 0.77).abs() < 1e-5);
        assert_eq!(state.angle(), 0.0);
        assert_eq!(state.base.x, state.original_base_x);
        assert!(!state.has_won);

        // Second redemption is a no-op
        assert!(!advance_level(&mut state, &tuning, &ticket));
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_stale_epoch_ticket_ignored() {
        let (mut state, tuning) = playing();
        state.set_angle(-FRAC_PI_2);
        check_win(&mut state, &tuning).unwrap();
        let ticket = schedule_advance(&state, &tuning, 0.0);
        state.epoch += 1;
        assert!(!advance_level(&mut state, &tuning, &ticket));
        assert_eq!(state.level, 1);
        assert!(state.has_won);
    }

    #[test]
    fn test_level_monotonicity() {
        let (mut state, tuning) = playing();
        let mut last_friction = state.friction();
        for expected_level in 2..=12 {
            state.set_angle(-FRAC_PI_2);
            check_win(&mut state, &tuning).unwrap();
            let ticket = schedule_advance(&state, &tuning, 0.0);
            assert!(advance_level(&mut state, &tuning, &ticket));
            assert_eq!(state.level, expected_level);
            assert!(state.friction() <= last_friction);
            assert!(state.friction() >= FRICTION_MIN);
            last_friction = state.friction();
        }
        assert_eq!(state.friction(), FRICTION_MIN);
    }
}
