//! Rope Bottle entry point
//!
//! The browser build is driven from JS through `platform::web::WebGame`.
//! Natively there is no window: the binary runs a headless autopilot demo.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rope_bottle::consts::FRAME_MS;
    use rope_bottle::persistence::JsonFileStore;
    use rope_bottle::sim::{Autopilot, Viewport};
    use rope_bottle::{GameEvent, Session, Tuning};

    rope_bottle::platform::init_logging();
    log::info!("Rope Bottle (native) starting headless demo...");

    let frames: u32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(3600);

    let tuning = match std::env::var("ROPE_BOTTLE_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let store = JsonFileStore::new("rope_bottle_best.json");
    let mut session = Session::new(tuning, store, Viewport::new(800.0, 600.0));
    let mut pilot = Autopilot::new(0x5EED);

    session.start();
    let mut now = 0.0;
    for _ in 0..frames {
        if let Some(event) = pilot.next_event(session.state(), session.tuning()) {
            session.pointer(event);
        }
        session.frame(now);
        now += FRAME_MS;

        for event in session.drain_events() {
            match event {
                GameEvent::Won { points, score, level } => {
                    println!("Level {level}: STANDING! +{points} (score {score})");
                }
                GameEvent::NewBest { best_score } => println!("  new best: {best_score}"),
                GameEvent::LevelAdvanced { level, friction } => {
                    println!("Level {level}: GO! (friction {friction:.2})");
                }
                GameEvent::DragStarted | GameEvent::AttemptCounted { .. } => {}
            }
        }
    }

    let hud = session.hud();
    println!(
        "\n{} frames: level {}, score {}, best {}, attempts {}",
        frames, hud.level, hud.score, hud.best_score, hud.attempts
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WebGame, this is just to satisfy the compiler
}
