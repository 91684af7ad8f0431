//! Game session - the single owner of all mutable state
//!
//! Hosts drive a session from the outside: forward pointer samples as they
//! arrive, call [`Session::frame`] once per display refresh, then read
//! [`Session::render_view`] / [`Session::hud`] to draw. Nothing here draws or
//! touches the DOM.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::persistence::BestScoreStore;
use crate::sim::{
    AdvanceTicket, InputOutcome, PointerEvent, SimulationState, Viewport, Win, advance_level,
    apply_pointer, check_win, schedule_advance, tick,
};
use crate::tuning::Tuning;

/// Rope midpoint hangs this far below the straight line (render only)
const ROPE_SAG: f32 = 30.0;
/// Wobble below this renders as still
const WOBBLE_EPSILON: f32 = 1e-3;

/// What the status line should say
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Tutorial overlay showing, waiting for `start()`
    NotStarted,
    Playing,
    Paused,
    /// Win celebration; next level pending
    Standing,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotStarted => "Ready",
            Status::Playing => "GO!",
            Status::Paused => "Paused",
            Status::Standing => "STANDING!",
        }
    }
}

/// Notifications for the display layer, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    DragStarted,
    AttemptCounted { attempts: u32 },
    Won { points: u64, score: u64, level: u32 },
    NewBest { best_score: u64 },
    LevelAdvanced { level: u32, friction: f32 },
}

/// Values shown in the score/level/attempts display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub attempts: u32,
    pub friction: f32,
    pub best_score: u64,
}

/// Read-only snapshot for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderView {
    pub angle: f32,
    pub base: Vec2,
    pub ring: Vec2,
    pub rope_anchor: Vec2,
    /// Quadratic curve control point for the rope
    pub rope_control: Vec2,
    pub rope_swing: f32,
    /// Horizontal shake to add to the bottle (cosmetic)
    pub wobble_offset: f32,
    pub viewport: Viewport,
}

/// One game session
pub struct Session<S: BestScoreStore> {
    state: SimulationState,
    tuning: Tuning,
    store: S,
    started: bool,
    pending: Option<AdvanceTicket>,
    events: Vec<GameEvent>,
    /// Latest wall-clock time seen by `frame`
    now_ms: f64,
}

impl<S: BestScoreStore> Session<S> {
    /// Create a session; reads the best score once and lays out the scene
    pub fn new(tuning: Tuning, store: S, viewport: Viewport) -> Self {
        let mut state = SimulationState::new(&tuning);
        state.best_score = match store.load() {
            Ok(best) => best.unwrap_or(0),
            Err(e) => {
                log::warn!("Starting without a best score: {}", e);
                0
            }
        };
        state.layout(viewport, &tuning);

        log::info!(
            "Session created ({}x{}, best {})",
            viewport.width,
            viewport.height,
            state.best_score
        );

        Self {
            state,
            tuning,
            store,
            started: false,
            pending: None,
            events: Vec::new(),
            now_ms: 0.0,
        }
    }

    // === Session control ===

    /// Dismiss the tutorial and start playing; no-op once started
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        if self.state.has_layout() {
            let viewport = self.state.viewport;
            self.state.layout(viewport, &self.tuning);
        }
        self.started = true;
        self.state.paused = false;
        log::info!("Session started at level {}", self.state.level);
    }

    pub fn pause(&mut self) {
        if self.started && !self.state.paused {
            self.state.paused = true;
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.started && self.state.paused {
            self.state.paused = false;
            log::info!("Resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.state.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Throw the current game away and go back to the tutorial
    ///
    /// Any pending level advance is cancelled: the epoch moves on, so even a
    /// ticket a host kept around will no longer redeem.
    pub fn reset(&mut self) {
        let epoch = self.state.epoch + 1;
        let best_score = self.state.best_score;
        let viewport = self.state.viewport;

        self.state = SimulationState::new(&self.tuning);
        self.state.epoch = epoch;
        self.state.best_score = best_score;
        self.state.layout(viewport, &self.tuning);

        self.started = false;
        self.pending = None;
        self.events.clear();
        log::info!("Session reset (epoch {})", epoch);
    }

    /// Re-run layout for a new viewport size
    pub fn layout(&mut self, viewport: Viewport) -> bool {
        self.state.layout(viewport, &self.tuning)
    }

    // === Input ===

    /// Forward one pointer sample
    pub fn pointer(&mut self, event: PointerEvent) -> InputOutcome {
        let outcome = apply_pointer(&mut self.state, &self.tuning, event);
        match outcome {
            InputOutcome::DragStarted => self.events.push(GameEvent::DragStarted),
            InputOutcome::DragEnded { attempts } => {
                self.events.push(GameEvent::AttemptCounted { attempts })
            }
            InputOutcome::Dragged { .. } | InputOutcome::Ignored => {}
        }
        outcome
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> InputOutcome {
        self.pointer(PointerEvent::Down { x, y })
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> InputOutcome {
        self.pointer(PointerEvent::Move { x, y })
    }

    pub fn pointer_up(&mut self) -> InputOutcome {
        self.pointer(PointerEvent::Up)
    }

    // === Frame ===

    /// Run one frame: due level advance, integrator, win detector
    ///
    /// `now_ms` is wall-clock time; it only matters for the level-advance delay.
    pub fn frame(&mut self, now_ms: f64) -> Option<Win> {
        self.now_ms = now_ms;

        if let Some(ticket) = self.pending
            && ticket.is_due(now_ms)
        {
            self.complete_advance(&ticket);
        }

        tick(&mut self.state, &self.tuning);
        let win = check_win(&mut self.state, &self.tuning)?;
        self.on_win(&win);
        Some(win)
    }

    fn on_win(&mut self, win: &Win) {
        self.events.push(GameEvent::Won {
            points: win.points,
            score: win.score,
            level: win.level,
        });

        if win.new_best {
            let best_score = self.state.best_score;
            if let Err(e) = self.store.save(best_score) {
                log::warn!("Could not persist best score {}: {}", best_score, e);
            }
            self.events.push(GameEvent::NewBest { best_score });
        }

        self.pending = Some(schedule_advance(&self.state, &self.tuning, self.now_ms));
    }

    /// Redeem a level-advance ticket (for hosts running their own timers)
    ///
    /// Stale tickets are ignored and return false.
    pub fn complete_advance(&mut self, ticket: &AdvanceTicket) -> bool {
        if !advance_level(&mut self.state, &self.tuning, ticket) {
            return false;
        }
        if self.pending.as_ref() == Some(ticket) {
            self.pending = None;
        }
        self.events.push(GameEvent::LevelAdvanced {
            level: self.state.level,
            friction: self.state.friction(),
        });
        true
    }

    // === Read access ===

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        self.pending
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn status(&self) -> Status {
        if !self.started {
            Status::NotStarted
        } else if self.state.has_won {
            Status::Standing
        } else if self.state.paused {
            Status::Paused
        } else {
            Status::Playing
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.state.score,
            level: self.state.level,
            attempts: self.state.attempts,
            friction: self.state.friction(),
            best_score: self.state.best_score,
        }
    }

    /// Snapshot for drawing; `time_ms` only drives the cosmetic wobble phase
    pub fn render_view(&self, time_ms: f64) -> RenderView {
        let state = &self.state;
        let ring = state.ring();
        let mid = (state.rope_anchor + ring) / 2.0;
        let wobble = if state.wobble < WOBBLE_EPSILON {
            0.0
        } else {
            (time_ms * 0.05).sin() as f32 * state.wobble
        };

        RenderView {
            angle: state.angle(),
            base: state.base,
            ring,
            rope_anchor: state.rope_anchor,
            rope_control: mid + Vec2::new(state.rope_swing, ROPE_SAG),
            rope_swing: state.rope_swing,
            wobble_offset: wobble,
            viewport: state.viewport,
        }
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
