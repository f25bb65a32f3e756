//! Class Builder - match each class card to the interface it implements
//!
//! Core modules:
//! - `sim`: Round state machine, card animation and layout (no rendering)
//! - `catalog`: Validated round content supplied at construction
//! - `game`: Host-facing controller (resize, click, frame, snapshot)
//! - `web`: wasm-bindgen facade for browser embedding

pub mod catalog;
pub mod game;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::{Catalog, CatalogError, ClassDef, InterfaceDef, RoundDef};
pub use game::{Game, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one ~60 Hz frame)
    pub const SIM_DT: f32 = 0.016;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Interface cards shown per round
    pub const TRIPLE_SIZE: usize = 3;

    /// Class card dimensions
    pub const CLASS_CARD_WIDTH: f32 = 280.0;
    pub const CLASS_CARD_HEIGHT: f32 = 180.0;
    /// Interface card dimensions
    pub const INTERFACE_CARD_WIDTH: f32 = 200.0;
    pub const INTERFACE_CARD_HEIGHT: f32 = 120.0;

    /// Fade-in step per tick for class cards
    pub const CLASS_FADE_STEP: f32 = 0.05;
    /// Fade-in and slide-in steps per tick for interface cards
    pub const INTERFACE_FADE_STEP: f32 = 0.08;
    pub const INTERFACE_SLIDE_STEP: f32 = 0.1;
    /// Horizontal offset of an interface card before it has slid in
    pub const SLIDE_DISTANCE: f32 = 50.0;

    /// Pulse: 1 + sin(t * freq) * amplitude
    pub const PULSE_FREQUENCY: f32 = 3.0;
    pub const PULSE_AMPLITUDE: f32 = 0.02;
    /// Glow: sin(t * freq) * 0.5 + 0.5
    pub const GLOW_FREQUENCY: f32 = 2.0;

    /// Viewport widths below this use the single-column stack
    pub const SINGLE_COLUMN_BELOW: f32 = 1000.0;
    /// Outer margin and inter-row gap
    pub const LAYOUT_MARGIN: f32 = 20.0;
    pub const LAYOUT_GAP: f32 = 20.0;
    /// Interface cards never start higher than this
    pub const INTERFACE_MIN_Y: f32 = 300.0;
    /// Row offset from the bottom edge in multi-column mode
    pub const INTERFACE_ROW_FROM_BOTTOM: f32 = 200.0;
    /// Class card vertical band
    pub const CLASS_MIN_Y: f32 = 24.0;
    pub const CLASS_MAX_Y: f32 = 100.0;
    pub const CLASS_Y_FRACTION: f32 = 0.15;

    /// Content height bounds and padding below the lowest card
    pub const MIN_CONTENT_HEIGHT: f32 = 360.0;
    pub const MAX_CONTENT_HEIGHT: f32 = 1200.0;
    pub const CONTENT_PADDING: f32 = 80.0;

    /// Seconds a feedback message stays on screen
    pub const MESSAGE_DURATION: f32 = 3.0;

    /// Points for a correct answer after 0, 1 and 2+ wrong guesses
    pub const POINTS_FIRST_TRY: u32 = 100;
    pub const POINTS_SECOND_TRY: u32 = 50;
    pub const POINTS_LATER: u32 = 0;
    /// Retry counter saturates here
    pub const MAX_RETRIES: u8 = 2;
}

/// Points awarded for a correct answer given the wrong guesses before it
#[inline]
pub fn points_for_retries(retries: u8) -> u32 {
    use consts::*;
    match retries {
        0 => POINTS_FIRST_TRY,
        1 => POINTS_SECOND_TRY,
        _ => POINTS_LATER,
    }
}
