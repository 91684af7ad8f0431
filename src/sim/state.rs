//! Simulation state and core types
//!
//! Everything the integrator, win detector and input mapper read or write lives here.
//! Angle and friction are only written through setters that clamp.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;
use crate::{clamp_angle, polar_to_cartesian};

/// Viewport dimensions supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A zero or non-finite viewport cannot be laid out
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Complete scene state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Bottle rotation (0 flat, -π/2 upright)
    angle: f32,
    /// Pivot position (x slides, y is the ground line)
    pub base: Vec2,
    /// Rest x of the base
    pub original_base_x: f32,
    /// Horizontal base velocity
    pub base_velocity: f32,
    /// Fixed rope attachment point
    pub rope_anchor: Vec2,
    /// Lateral deflection of the rope midpoint
    pub rope_swing: f32,
    pub rope_velocity: f32,
    /// Cosmetic shake magnitude; never consulted by win logic
    pub wobble: f32,
    /// Draggable ring at the end of the arm
    ring: Vec2,
    /// Arm length used for the ring projection
    arm_length: f32,
    /// Pointer x at the previous drag sample
    pub drag_ref_x: f32,

    pub is_dragging: bool,
    pub has_won: bool,
    pub paused: bool,

    pub level: u32,
    pub score: u64,
    pub best_score: u64,
    pub attempts: u32,
    friction: f32,

    /// Viewport the layout was computed from
    pub viewport: Viewport,
    /// Bumped on every reset; stale deferred advances compare against it
    pub epoch: u64,
    /// Frames integrated since the session began
    pub time_ticks: u64,
}

impl SimulationState {
    /// Create a state with all positional fields zeroed (layout not yet run)
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            angle: ANGLE_FLAT,
            base: Vec2::ZERO,
            original_base_x: 0.0,
            base_velocity: 0.0,
            rope_anchor: Vec2::ZERO,
            rope_swing: 0.0,
            rope_velocity: 0.0,
            wobble: 0.0,
            ring: Vec2::ZERO,
            arm_length: tuning.arm_length,
            drag_ref_x: 0.0,
            is_dragging: false,
            has_won: false,
            paused: true,
            level: 1,
            score: 0,
            best_score: 0,
            attempts: 0,
            friction: tuning.friction_start.clamp(FRICTION_MIN, FRICTION_MAX),
            viewport: Viewport::default(),
            epoch: 0,
            time_ticks: 0,
        }
    }

    /// Position the scene inside the viewport
    ///
    /// Returns false (and leaves the state untouched) for an unusable viewport.
    pub fn layout(&mut self, viewport: Viewport, tuning: &Tuning) -> bool {
        if !viewport.is_valid() {
            log::warn!(
                "Ignoring layout for invalid viewport {}x{}",
                viewport.width,
                viewport.height
            );
            return false;
        }

        self.viewport = viewport;
        self.original_base_x = viewport.width / 2.0 - tuning.base_offset;
        self.base = Vec2::new(self.original_base_x, viewport.height * tuning.ground_fraction);
        self.rope_anchor = Vec2::new(viewport.width / 2.0, tuning.rope_anchor_y);
        self.update_ring();
        true
    }

    /// Whether layout has produced usable geometry
    pub fn has_layout(&self) -> bool {
        self.viewport.is_valid()
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Write the angle, clamped to [-π/2, 0]; non-finite values are rejected
    pub fn set_angle(&mut self, angle: f32) {
        if angle.is_finite() {
            self.angle = clamp_angle(angle);
        }
    }

    #[inline]
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Write friction, clamped to [0.4, 0.95]; non-finite values are rejected
    pub fn set_friction(&mut self, friction: f32) {
        if friction.is_finite() {
            self.friction = friction.clamp(FRICTION_MIN, FRICTION_MAX);
        }
    }

    #[inline]
    pub fn ring(&self) -> Vec2 {
        self.ring
    }

    #[inline]
    pub fn arm_length(&self) -> f32 {
        self.arm_length
    }

    /// Recompute the ring from angle and base
    pub fn update_ring(&mut self) {
        self.ring = self.base + polar_to_cartesian(self.arm_length, self.angle);
    }

    /// Whether the integrator and win detector may run this frame
    pub fn is_active(&self) -> bool {
        !self.paused && !self.has_won && self.has_layout()
    }

    /// Put the bottle back flat at its rest position for a new level
    pub fn reset_pose(&mut self) {
        self.angle = ANGLE_FLAT;
        self.base.x = self.original_base_x;
        self.base_velocity = 0.0;
        self.update_ring();
    }
}
