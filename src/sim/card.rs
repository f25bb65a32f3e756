//! Class and interface cards
//!
//! Both kinds share the `Card` capability set (bounds, animation, hit test,
//! render transform) and differ only in content and animation parameters.

use glam::Vec2;
use serde::Serialize;

use crate::catalog::{ClassDef, InterfaceDef};
use crate::consts::*;

/// Axis-aligned rectangle in logical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Inclusive on every edge
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    /// True if the interiors intersect (shared edges don't count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a, b) = (self.max(), other.max());
        self.min.x < b.x && other.min.x < a.x && self.min.y < b.y && other.min.y < a.y
    }
}

/// How the renderer should place a card this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardTransform {
    /// Top-left corner after slide offset
    pub origin: Vec2,
    /// Uniform scale about `origin`
    pub scale: f32,
    /// Opacity (fade progress)
    pub alpha: f32,
}

/// Shared card behavior
pub trait Card {
    /// Layout position (top-left, before animation offsets)
    fn position(&self) -> Vec2;
    fn set_position(&mut self, pos: Vec2);
    fn size(&self) -> Vec2;
    /// Whether the card takes part in the current round
    fn is_shown(&self) -> bool;
    fn is_selected(&self) -> bool;
    /// Advance animation by one frame; no-op while hidden
    fn advance(&mut self, dt: f32);
    fn transform(&self) -> CardTransform;
    fn contains_point(&self, p: Vec2) -> bool;

    fn bounds(&self) -> Rect {
        Rect::new(self.position(), self.size())
    }
}

/// Steps `value` toward 1.0, clamping at 1.0
#[inline]
fn step_toward_one(value: f32, step: f32) -> f32 {
    (value + step).min(1.0)
}

/// The class being matched this round
#[derive(Debug, Clone, Serialize)]
pub struct ClassCard {
    pub id: usize,
    pub title: String,
    pub properties: Vec<String>,
    pub methods: Vec<String>,
    pub pos: Vec2,
    pub selected: bool,
    pub active: bool,
    /// Fade-in progress (0-1)
    pub fade: f32,
    /// Seconds spent active, drives the pulse
    pub elapsed: f32,
    /// Current pulse scale around 1.0
    pub pulse: f32,
}

impl ClassCard {
    pub fn new(id: usize, def: &ClassDef) -> Self {
        Self {
            id,
            title: def.title.clone(),
            properties: def.properties.clone(),
            methods: def.methods.clone(),
            pos: Vec2::ZERO,
            selected: false,
            active: false,
            fade: 0.0,
            elapsed: 0.0,
            pulse: 1.0,
        }
    }

    /// Make this the round's class and restart its fade-in and pulse
    pub fn activate(&mut self) {
        self.active = true;
        self.fade = 0.0;
        self.elapsed = 0.0;
        self.pulse = 1.0;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.selected = false;
        self.fade = 0.0;
        self.elapsed = 0.0;
        self.pulse = 1.0;
    }
}

impl Card for ClassCard {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    fn size(&self) -> Vec2 {
        Vec2::new(CLASS_CARD_WIDTH, CLASS_CARD_HEIGHT)
    }

    fn is_shown(&self) -> bool {
        self.active
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        self.pulse = 1.0 + (self.elapsed * PULSE_FREQUENCY).sin() * PULSE_AMPLITUDE;
        self.fade = step_toward_one(self.fade, CLASS_FADE_STEP);
    }

    fn transform(&self) -> CardTransform {
        CardTransform {
            origin: self.pos,
            scale: self.pulse,
            alpha: self.fade,
        }
    }

    /// Hit region grows and shrinks with the pulse, anchored at the top-left
    fn contains_point(&self, p: Vec2) -> bool {
        let bounds = self.bounds();
        self.is_shown() && Rect::new(bounds.min, bounds.size * self.pulse).contains(p)
    }
}

/// One of the three candidate interfaces of a round
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceCard {
    pub id: usize,
    pub name: String,
    pub requirements: Vec<String>,
    pub pos: Vec2,
    pub selected: bool,
    pub visible: bool,
    /// Fade-in progress (0-1)
    pub fade: f32,
    /// Slide-in progress (0-1)
    pub slide: f32,
    /// Seconds spent visible, drives the glow
    pub elapsed: f32,
    /// Selection halo intensity (0-1)
    pub glow: f32,
}

impl InterfaceCard {
    pub fn new(id: usize, def: &InterfaceDef) -> Self {
        Self {
            id,
            name: def.name.clone(),
            requirements: def.requirements.clone(),
            pos: Vec2::ZERO,
            selected: false,
            visible: false,
            fade: 0.0,
            slide: 0.0,
            elapsed: 0.0,
            glow: 0.0,
        }
    }

    /// Hide and rewind the entrance animation and glow
    pub fn reset(&mut self) {
        self.visible = false;
        self.selected = false;
        self.fade = 0.0;
        self.slide = 0.0;
        self.elapsed = 0.0;
        self.glow = 0.0;
    }

    /// Horizontal offset while sliding in from the right
    pub fn slide_offset(&self) -> f32 {
        (1.0 - self.slide) * SLIDE_DISTANCE
    }
}

impl Card for InterfaceCard {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    fn size(&self) -> Vec2 {
        Vec2::new(INTERFACE_CARD_WIDTH, INTERFACE_CARD_HEIGHT)
    }

    fn is_shown(&self) -> bool {
        self.visible
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn advance(&mut self, dt: f32) {
        if !self.visible {
            return;
        }
        self.elapsed += dt;
        self.glow = (self.elapsed * GLOW_FREQUENCY).sin() * 0.5 + 0.5;
        self.fade = step_toward_one(self.fade, INTERFACE_FADE_STEP);
        self.slide = step_toward_one(self.slide, INTERFACE_SLIDE_STEP);
    }

    fn transform(&self) -> CardTransform {
        CardTransform {
            origin: self.pos + Vec2::new(self.slide_offset(), 0.0),
            scale: 1.0,
            alpha: self.fade,
        }
    }

    /// Hit region follows the card while it slides in
    fn contains_point(&self, p: Vec2) -> bool {
        let bounds = self.bounds();
        let origin = bounds.min + Vec2::new(self.slide_offset(), 0.0);
        self.is_shown() && Rect::new(origin, bounds.size).contains(p)
    }
}
