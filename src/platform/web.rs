//! Browser bindings
//!
//! The page owns the canvas, the animation loop and the DOM; it forwards pointer
//! events here, calls `frame()` from `requestAnimationFrame`, and reads values
//! back to draw.

use wasm_bindgen::prelude::*;

use crate::persistence::LocalStorageStore;
use crate::session::Session;
use crate::sim::Viewport;
use crate::tuning::Tuning;

#[wasm_bindgen]
pub struct WebGame {
    session: Session<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game for a canvas of the given size, with optional tuning JSON
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, tuning_json: Option<String>) -> Result<WebGame, JsValue> {
        super::init_logging();

        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Tuning::default(),
        };
        let session = Session::new(tuning, LocalStorageStore, Viewport::new(width, height));
        Ok(WebGame { session })
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn resume(&mut self) {
        self.session.resume();
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.session.layout(Viewport::new(width, height))
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.session.pointer_down(x, y);
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.session.pointer_move(x, y);
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.session.pointer_up();
    }

    /// Advance one frame; returns true on the frame the bottle stands up
    pub fn frame(&mut self) -> bool {
        self.session.frame(js_sys::Date::now()).is_some()
    }

    pub fn status(&self) -> String {
        self.session.status().as_str().to_string()
    }

    /// Score/level/attempts/friction/best as JSON
    #[wasm_bindgen(js_name = hudJson)]
    pub fn hud_json(&self) -> String {
        serde_json::to_string(&self.session.hud()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Everything the renderer needs this frame as JSON
    #[wasm_bindgen(js_name = renderJson)]
    pub fn render_json(&self) -> String {
        let view = self.session.render_view(js_sys::Date::now());
        serde_json::to_string(&view).unwrap_or_else(|_| "{}".to_string())
    }

    /// Events since the last call as a JSON array
    #[wasm_bindgen(js_name = drainEventsJson)]
    pub fn drain_events_json(&mut self) -> String {
        let events = self.session.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(getter)]
    pub fn angle(&self) -> f32 {
        self.session.state().angle()
    }

    #[wasm_bindgen(getter, js_name = ringX)]
    pub fn ring_x(&self) -> f32 {
        self.session.state().ring().x
    }

    #[wasm_bindgen(getter, js_name = ringY)]
    pub fn ring_y(&self) -> f32 {
        self.session.state().ring().y
    }

    #[wasm_bindgen(getter, js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.session.state().is_dragging
    }
}
