//! Browser embedding via wasm-bindgen
//!
//! The page owns the canvas, the animation-frame loop and the drawing; it
//! forwards resizes, clicks and frame times here and draws from the JSON
//! snapshot.

use wasm_bindgen::prelude::*;

use crate::catalog::Catalog;
use crate::game::Game;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"class-builder: logger already initialized".into());
    }
}

/// One embedded game instance
#[wasm_bindgen]
pub struct ClassBuilder {
    game: Game,
}

#[wasm_bindgen]
impl ClassBuilder {
    /// New game on the built-in catalog
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> ClassBuilder {
        Self {
            game: Game::new(width, height),
        }
    }

    /// New game on a JSON catalog; throws if the catalog is invalid
    #[wasm_bindgen(js_name = withCatalog)]
    pub fn with_catalog(json: &str, width: f32, height: f32) -> Result<ClassBuilder, JsValue> {
        let catalog = Catalog::from_json(json).map_err(|e| {
            log::error!("Rejected catalog: {e}");
            JsValue::from_str(&e.to_string())
        })?;
        Ok(Self {
            game: Game::with_catalog(catalog, width, height),
        })
    }

    /// Returns the height the canvas should be resized to
    pub fn resize(&mut self, width: f32, height: f32) -> f32 {
        self.game.resize(width, height)
    }

    pub fn click(&mut self, x: f32, y: f32) {
        self.game.click(x, y);
    }

    /// Advance by `dt_ms` milliseconds of wall time
    pub fn frame(&mut self, dt_ms: f64) -> u32 {
        self.game.frame((dt_ms / 1000.0) as f32)
    }

    pub fn restart(&mut self) {
        self.game.restart();
    }

    #[wasm_bindgen(js_name = contentHeight)]
    pub fn content_height(&self) -> f32 {
        self.game.state().content_height()
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events since the last call, as a JSON array
    #[wasm_bindgen(js_name = takeEventsJson)]
    pub fn take_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.drain_events()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
