//! Surface layout: columns of pitch, and the mapping from screen
//! coordinates to raw (pre-snap) cents.

use serde::{Deserialize, Serialize};

/// Geometry of the playing surface. `base_x`/`base_y` is the point where
/// cents are 0; columns repeat to the right, each shifted by a fixed
/// cents offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub base_x: f64,
    pub base_y: f64,
    /// Cents added per column to the right of the base column.
    pub next_column_offset_cents: f64,
    pub column_width: f64,
    /// Vertical scale: pixels per cent.
    pub cents_to_pixels: f64,
    /// Wrap the columns around the base point; one revolution equals one
    /// column offset.
    pub spiral_mode: bool,
    /// Display alpha for the scale frets, 0..=1. Consumed by the render
    /// layer only.
    pub steps_visibility: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_x: 0.0,
            base_y: 0.0,
            next_column_offset_cents: 200.0,
            column_width: 54.0,
            cents_to_pixels: 0.5,
            spiral_mode: false,
            steps_visibility: 1.0,
        }
    }
}

impl LayoutConfig {
    /// Raw cents for a surface position. Screen Y grows downward, pitch
    /// grows upward; the base column is index 0 and covers
    /// `[base_x, base_x + column_width)`.
    pub fn cents_from_position(&self, x: f64, y: f64) -> f64 {
        let mut x = x - self.base_x;
        let mut y = y - self.base_y;

        if self.spiral_mode {
            // polar remap around the base point, same as the render layer:
            // the radius walks across the column, the angle (normalized
            // clockwise from the top) adds the column offset per revolution
            let radius = (x * x + y * y).sqrt();
            let angle_norm = (x.atan2(y) * 0.5) / std::f64::consts::PI + 0.5;
            let base_radius = 2.0 * self.column_width;
            x = radius - base_radius + angle_norm * (self.column_width - 1.0 / self.column_width);
            y = angle_norm * self.next_column_offset_cents;
        }

        let column_index = (x / self.column_width).floor();
        let cents_from_x = column_index * self.next_column_offset_cents;
        let cents_from_y = -y / self.cents_to_pixels;
        cents_from_x + cents_from_y
    }

    /// Place the base point for a viewport size: centered in spiral mode,
    /// otherwise in the left quarter at vertical center.
    pub fn place_base(&mut self, width: f64, height: f64) {
        if self.spiral_mode {
            self.base_x = (width / 2.0).floor();
            self.base_y = (height / 2.0).floor();
        } else {
            self.base_x = (width / 2.0 - 200.0).clamp(0.0, width * 0.25).floor();
            self.base_y = (height / 2.0).clamp(0.0, height).floor();
        }
    }
}
