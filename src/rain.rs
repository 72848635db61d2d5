//! Falling-glyph canvas effect, independent of any drawing backend.
//!
//! [`RainField`] owns the per-column drop positions and paints one logical
//! frame onto a [`GlyphSurface`]. [`RainLoop`] adds the frame throttle so the
//! effect advances at a fixed rate whatever the host callback frequency.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::frame::FrameThrottle;
use crate::theme::RainPalette;

/// Glyph pool drawn at random into each column.
pub const GLYPHS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789<>{}[]()+-*/=&|^%$#@!~;:,.?";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainSettings {
    pub fps: f64,
    /// Column width and row height in CSS pixels.
    pub cell_size: f64,
    /// Rows advanced per logical frame.
    pub drop_step: f64,
    /// Chance per frame that a drop below the bottom edge restarts at the top.
    pub reset_chance: f64,
    pub fade_alpha: f64,
    pub glyphs: String,
}

impl Default for RainSettings {
    fn default() -> Self {
        Self {
            fps: 30.0,
            cell_size: 14.0,
            drop_step: 0.5,
            reset_chance: 0.015,
            fade_alpha: 0.05,
            glyphs: GLYPHS.to_owned(),
        }
    }
}

/// Minimal 2D drawing interface the effect needs.
pub trait GlyphSurface {
    /// Cover the whole surface with a translucent fill, leaving a fading trail.
    fn fade(&mut self, fill: &str, width: f64, height: f64);
    fn set_glyph_style(&mut self, fill: &str, font: &str);
    fn draw_glyph(&mut self, glyph: char, x: f64, y: f64);
}

/// Number of whole columns that fit in `width`.
pub fn column_count(width: f64, cell_size: f64) -> usize {
    if !(width > 0.0 && cell_size > 0.0) {
        return 0;
    }
    (width / cell_size).floor() as usize
}

#[derive(Debug, Clone)]
pub struct RainField {
    settings: RainSettings,
    glyphs: Vec<char>,
    font: String,
    width: f64,
    height: f64,
    /// Drop position per column, in rows. Negative means above the top edge.
    drops: Vec<f64>,
    rng: SmallRng,
}

impl RainField {
    pub fn new(width: f64, height: f64, settings: RainSettings, seed: u64) -> Self {
        let glyphs = settings.glyphs.chars().collect();
        let font = format!("{}px monospace", settings.cell_size);
        let mut field = Self {
            settings,
            glyphs,
            font,
            width,
            height,
            drops: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        };
        field.reseed();
        field
    }

    /// Scatter every column to a fresh random offset above the visible area.
    pub fn reseed(&mut self) {
        let columns = column_count(self.width, self.settings.cell_size);
        self.drops.clear();
        for _ in 0..columns {
            let start = self.fresh_offset();
            self.drops.push(start);
        }
    }

    fn fresh_offset(&mut self) -> f64 {
        -(self.rng.gen::<f64>() * self.height.max(0.0))
    }

    /// Adapt to a new viewport. Surviving columns keep their drops.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        let columns = column_count(width, self.settings.cell_size);
        if columns <= self.drops.len() {
            self.drops.truncate(columns);
            return;
        }
        while self.drops.len() < columns {
            let start = self.fresh_offset();
            self.drops.push(start);
        }
    }

    /// Paint one logical frame and advance every drop.
    pub fn paint<S: GlyphSurface + ?Sized>(&mut self, surface: &mut S, palette: &RainPalette) {
        surface.fade(&palette.overlay, self.width, self.height);
        surface.set_glyph_style(&palette.glyph, &self.font);

        let cell = self.settings.cell_size;
        let reset_chance = self.settings.reset_chance.clamp(0.0, 1.0);
        for (column, drop) in self.drops.iter_mut().enumerate() {
            if let Some(&glyph) = self.glyphs.choose(&mut self.rng) {
                surface.draw_glyph(glyph, column as f64 * cell, *drop * cell);
            }
            if *drop * cell > self.height && self.rng.gen_bool(reset_chance) {
                *drop = 0.0;
            }
            *drop += self.settings.drop_step;
        }
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    pub fn drops(&self) -> &[f64] {
        &self.drops
    }
}

/// Throttled driver around a [`RainField`].
#[derive(Debug, Clone)]
pub struct RainLoop {
    throttle: FrameThrottle,
    field: RainField,
    palette: RainPalette,
}

impl RainLoop {
    pub fn new(field: RainField, palette: RainPalette) -> Self {
        Self {
            throttle: FrameThrottle::new(field.settings.fps),
            field,
            palette,
        }
    }

    /// Handle one host callback. Returns whether a frame was painted.
    pub fn tick<S: GlyphSurface + ?Sized>(&mut self, timestamp_ms: f64, surface: &mut S) -> bool {
        if !self.throttle.accept(timestamp_ms) {
            return false;
        }
        self.field.paint(surface, &self.palette);
        true
    }

    /// Restart after a pause: new columns, new palette, throttle rewound.
    pub fn reactivate(&mut self, palette: RainPalette) {
        self.palette = palette;
        self.field.reseed();
        self.throttle.reset();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.field.resize(width, height);
    }

    pub fn field(&self) -> &RainField {
        &self.field
    }
}

/// Decides whether the anchor section is still in view enough to keep the
/// effect running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorGate {
    /// Distance before the anchor's bottom edge at which the effect stops.
    pub buffer: f64,
}

impl Default for AnchorGate {
    fn default() -> Self {
        Self { buffer: 100.0 }
    }
}

impl AnchorGate {
    pub fn is_active(&self, scroll_y: f64, anchor_height: f64) -> bool {
        scroll_y < anchor_height - self.buffer
    }
}
