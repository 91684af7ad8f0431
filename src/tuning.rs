//! Data-driven physics tuning
//!
//! Every constant the integrator, win detector and input mapper use lives here.
//! Defaults reproduce the hand-tuned feel; hosts can override any subset from JSON.

use serde::{Deserialize, Serialize};

use crate::consts::{ARM_LENGTH, FRICTION_MAX, FRICTION_MIN};
use crate::error::{Error, Result};

/// What makes the base slip while dragging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlipTrigger {
    /// Pointer is far (horizontally) from where the ring was drawn
    Pull { threshold: f32 },
    /// Horizontal pointer speed between samples
    PointerSpeed { threshold: f32 },
    /// Change in bottle angle between samples (radians)
    AngularSpeed { threshold: f32 },
}

impl Default for SlipTrigger {
    fn default() -> Self {
        SlipTrigger::Pull { threshold: 40.0 }
    }
}

/// Measurements of one drag sample, used to evaluate a [`SlipTrigger`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SlipSample {
    pub pull: f32,
    pub speed: f32,
    pub angular_speed: f32,
}

impl SlipTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlipTrigger::Pull { .. } => "pull",
            SlipTrigger::PointerSpeed { .. } => "pointer_speed",
            SlipTrigger::AngularSpeed { .. } => "angular_speed",
        }
    }

    pub fn threshold(&self) -> f32 {
        match *self {
            SlipTrigger::Pull { threshold }
            | SlipTrigger::PointerSpeed { threshold }
            | SlipTrigger::AngularSpeed { threshold } => threshold,
        }
    }

    /// Whether this sample should kick the base
    pub fn fires(&self, sample: &SlipSample) -> bool {
        match *self {
            SlipTrigger::Pull { threshold } => sample.pull > threshold,
            SlipTrigger::PointerSpeed { threshold } => sample.speed.abs() > threshold,
            SlipTrigger::AngularSpeed { threshold } => sample.angular_speed.abs() > threshold,
        }
    }
}

/// Physics and progression constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Rope ===
    /// Spring pull of the rope midpoint toward rest
    pub rope_stiffness: f32,
    /// Per-tick velocity retention of the rope
    pub rope_damping: f32,
    /// Rope velocity added per unit of horizontal pointer speed
    pub rope_input_gain: f32,

    // === Wobble (cosmetic) ===
    /// Per-tick wobble retention
    pub wobble_decay: f32,
    /// Pointer speed above which the bottle wobbles
    pub wobble_threshold: f32,
    /// Wobble magnitude per unit of pointer speed
    pub wobble_gain: f32,

    // === Base ===
    /// Spring pull of the base toward its rest position (released)
    pub base_stiffness: f32,
    /// Per-tick base velocity retention (released)
    pub base_damping: f32,
    /// Per-tick base velocity retention (dragging)
    pub drag_base_damping: f32,
    /// Angle restored toward flat per tick when released (radians)
    pub relax_rate: f32,

    // === Geometry / layout ===
    /// Distance from base to ring
    pub arm_length: f32,
    /// Pointer-down must land strictly within this distance of the ring
    pub capture_radius: f32,
    /// Rest base sits this far left of the viewport center
    pub base_offset: f32,
    /// Ground line as a fraction of viewport height
    pub ground_fraction: f32,
    /// Rope anchor height from the top of the viewport
    pub rope_anchor_y: f32,

    // === Slip ===
    /// What triggers a slip impulse
    pub slip_trigger: SlipTrigger,
    /// Slip impulse is `slip_bias - friction`
    pub slip_bias: f32,

    // === Win ===
    /// Fraction of vertical the bottle must reach
    pub win_angle_fraction: f32,
    /// Base speed below which the bottle counts as settled
    pub settle_velocity: f32,
    /// Points per win, multiplied by level
    pub points_per_level: u64,
    /// Wall-clock delay between a win and the next level (ms)
    pub level_advance_delay_ms: f64,

    // === Difficulty ===
    /// Friction at level 1
    pub friction_start: f32,
    /// Friction lost per level
    pub friction_step: f32,
    /// Friction never drops below this
    pub friction_floor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            rope_stiffness: 0.1,
            rope_damping: 0.92,
            rope_input_gain: 0.15,

            wobble_decay: 0.9,
            wobble_threshold: 10.0,
            wobble_gain: 0.4,

            base_stiffness: 0.05,
            base_damping: 0.8,
            drag_base_damping: 0.9,
            relax_rate: 0.05,

            arm_length: ARM_LENGTH,
            capture_radius: 50.0,
            base_offset: 80.0,
            ground_fraction: 0.85,
            rope_anchor_y: 40.0,

            slip_trigger: SlipTrigger::default(),
            slip_bias: 1.1,

            win_angle_fraction: 0.97,
            settle_velocity: 0.3,
            points_per_level: 100,
            level_advance_delay_ms: 2000.0,

            friction_start: 0.85,
            friction_step: 0.08,
            friction_floor: FRICTION_MIN,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every value is usable by the integrator
    pub fn validate(&self) -> Result<()> {
        let unit = |field: &'static str, value: f32| {
            if value > 0.0 && value <= 1.0 {
                Ok(())
            } else {
                Err(Error::TuningRange { field, value })
            }
        };
        let positive = |field: &'static str, value: f32| {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(Error::TuningRange { field, value })
            }
        };
        let non_negative = |field: &'static str, value: f32| {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(Error::TuningRange { field, value })
            }
        };
        // Per-tick retention factor: anything >= 1 never decays
        let decay = |field: &'static str, value: f32| {
            if value > 0.0 && value < 1.0 {
                Ok(())
            } else {
                Err(Error::TuningRange { field, value })
            }
        };
        let finite = |field: &'static str, value: f32| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(Error::TuningRange { field, value })
            }
        };

        // Stiffness in (0, 1] with damping in (0, 1) keeps both springs convergent
        unit("rope_stiffness", self.rope_stiffness)?;
        decay("rope_damping", self.rope_damping)?;
        non_negative("rope_input_gain", self.rope_input_gain)?;
        decay("wobble_decay", self.wobble_decay)?;
        non_negative("wobble_threshold", self.wobble_threshold)?;
        non_negative("wobble_gain", self.wobble_gain)?;
        unit("base_stiffness", self.base_stiffness)?;
        decay("base_damping", self.base_damping)?;
        decay("drag_base_damping", self.drag_base_damping)?;
        non_negative("relax_rate", self.relax_rate)?;
        positive("arm_length", self.arm_length)?;
        positive("capture_radius", self.capture_radius)?;
        finite("base_offset", self.base_offset)?;
        finite("rope_anchor_y", self.rope_anchor_y)?;
        unit("ground_fraction", self.ground_fraction)?;
        non_negative("slip_threshold", self.slip_trigger.threshold())?;
        non_negative("slip_bias", self.slip_bias)?;
        unit("win_angle_fraction", self.win_angle_fraction)?;
        positive("settle_velocity", self.settle_velocity)?;
        non_negative("friction_step", self.friction_step)?;

        if !(FRICTION_MIN..=FRICTION_MAX).contains(&self.friction_floor) {
            return Err(Error::TuningRange {
                field: "friction_floor",
                value: self.friction_floor,
            });
        }
        if !(self.friction_floor..=FRICTION_MAX).contains(&self.friction_start) {
            return Err(Error::TuningRange {
                field: "friction_start",
                value: self.friction_start,
            });
        }
        if !(self.level_advance_delay_ms >= 0.0 && self.level_advance_delay_ms.is_finite()) {
            return Err(Error::TuningRange {
                field: "level_advance_delay_ms",
                value: self.level_advance_delay_ms as f32,
            });
        }
        Ok(())
    }

    /// Angle at or beyond which the bottle counts as upright
    pub fn win_angle(&self) -> f32 {
        -std::f32::consts::FRAC_PI_2 * self.win_angle_fraction
    }

    /// Friction after one more level
    pub fn next_friction(&self, friction: f32) -> f32 {
        (friction - self.friction_step).max(self.friction_floor)
    }
}
