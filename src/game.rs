//! Host-facing game controller
//!
//! Owns one `GameState` and turns host notifications (resize, click, animation
//! frame) into state transitions. Frames run a fixed-timestep accumulator so
//! animation speed does not depend on the host's frame rate. At construction
//! and on every resize the controller fits the viewport height to the content
//! with at most one correction pass; clicks and restarts never move cards.

use glam::Vec2;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::consts::*;
use crate::sim::{
    Card, CardTransform, ClassCard, ClickTarget, Feedback, GameEvent, GamePhase, GameState,
    InterfaceCard, Viewport, tick,
};

/// Game instance driven by the embedding host
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    accumulator: f32,
}

impl Game {
    /// Start a session on the built-in catalog
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_catalog(Catalog::default(), width, height)
    }

    pub fn with_catalog(catalog: Catalog, width: f32, height: f32) -> Self {
        log::info!("Starting session with {} rounds", catalog.len());
        let mut game = Self {
            state: GameState::new(catalog, Viewport::new(width, height)),
            accumulator: 0.0,
        };
        game.fit_content();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Re-layout for a new viewport; returns the height the host should use
    pub fn resize(&mut self, width: f32, height: f32) -> f32 {
        self.state.set_viewport(Viewport::new(width, height));
        let fitted = self.fit_content();
        log::info!("Resized to {}x{} (fitted height {})", width, height, fitted);
        fitted
    }

    /// Deliver a click in logical coordinates
    pub fn click(&mut self, x: f32, y: f32) -> ClickTarget {
        self.state.handle_click(Vec2::new(x, y))
    }

    /// Run fixed simulation ticks for `dt` seconds of wall time.
    /// Returns the number of ticks executed.
    pub fn frame(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Back to round 0 without waiting for a completion click
    pub fn restart(&mut self) {
        self.state.restart();
        self.accumulator = 0.0;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Read-only view of everything the renderer needs
    pub fn snapshot(&self) -> Snapshot<'_> {
        let state = &self.state;
        Snapshot {
            phase: state.phase(),
            round: (state.round() + 1).min(state.round_count()),
            round_count: state.round_count(),
            score: state.score(),
            retry_count: state.retry_count(),
            feedback: state.feedback(),
            viewport: state.viewport(),
            content_height: state.content_height(),
            classes: state.classes().iter().map(ClassView::new).collect(),
            interfaces: state.interfaces().iter().map(InterfaceView::new).collect(),
        }
    }

    /// Grow or shrink the viewport to the content height, once. The second
    /// layout pass uses the new height and is never followed by a third.
    fn fit_content(&mut self) -> f32 {
        let viewport = self.state.viewport();
        let needed = self.state.content_height();
        if needed != viewport.height {
            log::debug!("Fitting viewport height {} -> {}", viewport.height, needed);
            self.state.set_viewport(Viewport::new(viewport.width, needed));
        }
        self.state.viewport().height
    }
}

/// A class card plus its render transform
#[derive(Debug, Serialize)]
pub struct ClassView<'a> {
    #[serde(flatten)]
    pub card: &'a ClassCard,
    pub size: Vec2,
    pub transform: CardTransform,
}

impl<'a> ClassView<'a> {
    fn new(card: &'a ClassCard) -> Self {
        Self {
            card,
            size: card.size(),
            transform: card.transform(),
        }
    }
}

/// An interface card plus its render transform
#[derive(Debug, Serialize)]
pub struct InterfaceView<'a> {
    #[serde(flatten)]
    pub card: &'a InterfaceCard,
    pub size: Vec2,
    pub transform: CardTransform,
}

impl<'a> InterfaceView<'a> {
    fn new(card: &'a InterfaceCard) -> Self {
        Self {
            card,
            size: card.size(),
            transform: card.transform(),
        }
    }
}

/// Everything the host needs to draw one frame
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    /// 1-based round number for display
    pub round: usize,
    pub round_count: usize,
    pub score: u32,
    pub retry_count: u8,
    /// Latest message; hide it once `timer <= 0`
    pub feedback: &'a Feedback,
    pub viewport: Viewport,
    pub content_height: f32,
    pub classes: Vec<ClassView<'a>>,
    pub interfaces: Vec<InterfaceView<'a>>,
}
