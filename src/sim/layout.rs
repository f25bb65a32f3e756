//! Responsive card layout
//!
//! Pure functions of the viewport size: the same viewport always yields the
//! same positions, so re-running layout on resize never accumulates drift.
//! Narrow viewports stack the interface cards in one centered column; wide
//! ones spread them across a single row.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Logical drawing area supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Fallback used when the host reports a degenerate size
    pub const DEFAULT: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Replace non-positive or non-finite dimensions with the default
    pub fn sanitized(self) -> Self {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.height) {
            self
        } else {
            log::warn!(
                "Degenerate viewport {}x{}, using {}x{}",
                self.width,
                self.height,
                Self::DEFAULT.width,
                Self::DEFAULT.height
            );
            Self::DEFAULT
        }
    }
}

/// Target positions for one round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Number of interface columns in use (1 or 3)
    pub columns: usize,
    pub class_pos: Vec2,
    pub interface_pos: Vec<Vec2>,
    /// Height the host should give the drawing area to avoid clipping
    pub content_height: f32,
}

/// Interface columns for a viewport width
pub fn column_count(width: f32) -> usize {
    if width < SINGLE_COLUMN_BELOW {
        1
    } else {
        TRIPLE_SIZE
    }
}

/// Class card position: horizontally centered, pinned near the top
pub fn class_position(viewport: Viewport) -> Vec2 {
    let x = ((viewport.width - CLASS_CARD_WIDTH) / 2.0).max(LAYOUT_MARGIN);
    let y = (viewport.height * CLASS_Y_FRACTION)
        .floor()
        .clamp(CLASS_MIN_Y, CLASS_MAX_Y);
    Vec2::new(x, y)
}

/// Interface card positions for `count` cards
pub fn interface_positions(viewport: Viewport, count: usize) -> Vec<Vec2> {
    let cols = column_count(viewport.width);
    let rows = count.div_ceil(cols);
    let card = Vec2::new(INTERFACE_CARD_WIDTH, INTERFACE_CARD_HEIGHT);

    if cols == 1 {
        let x = ((viewport.width - card.x) / 2.0).max(LAYOUT_MARGIN);
        let stack = rows as f32 * card.y + rows.saturating_sub(1) as f32 * LAYOUT_GAP;
        let top = ((viewport.height - stack) / 2.0).max(INTERFACE_MIN_Y);
        (0..count)
            .map(|i| Vec2::new(x, top + i as f32 * (card.y + LAYOUT_GAP)))
            .collect()
    } else {
        let inner = (viewport.width - LAYOUT_MARGIN * 2.0 - card.x * cols as f32).max(0.0);
        let spacing = (inner / (cols + 1) as f32).max(10.0);
        let y = (viewport.height - INTERFACE_ROW_FROM_BOTTOM).max(INTERFACE_MIN_Y);
        (0..count)
            .map(|i| {
                let col = (i % cols) as f32;
                let row = (i / cols) as f32;
                let x = LAYOUT_MARGIN + spacing * (col + 1.0) + card.x * col;
                Vec2::new(x, y + row * (card.y + LAYOUT_GAP))
            })
            .collect()
    }
}

/// Height needed to show everything down to `lowest_bottom`
pub fn content_height(lowest_bottom: f32) -> f32 {
    (lowest_bottom + CONTENT_PADDING)
        .clamp(MIN_CONTENT_HEIGHT, MAX_CONTENT_HEIGHT)
        .ceil()
}

/// Full layout for a class card and `count` interface cards
pub fn compute(viewport: Viewport, count: usize) -> Layout {
    let class_pos = class_position(viewport);
    let interface_pos = interface_positions(viewport, count);

    let class_bottom = class_pos.y + CLASS_CARD_HEIGHT;
    let lowest_bottom = interface_pos
        .iter()
        .map(|p| p.y + INTERFACE_CARD_HEIGHT)
        .fold(class_bottom, f32::max);

    Layout {
        columns: column_count(viewport.width),
        class_pos,
        interface_pos,
        content_height: content_height(lowest_bottom),
    }
}
