//! FILENAME: chart-engine/src/color.rs
//! Dataset colors.
//!
//! Hues advance by the golden angle, which keeps consecutive datasets
//! visually distinct for any dataset count without a fixed palette.
//! The sequence is a pure function of the draw order, so re-building
//! the same chart yields the same colors.

use serde::{Deserialize, Serialize};

/// Golden angle in degrees.
const GOLDEN_ANGLE: f64 = 137.50776405003785;

/// An HSL color as placed into a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Color {
    /// CSS `hsl()` notation.
    pub fn to_css(&self) -> String {
        format!(
            "hsl({:.1}, {:.0}%, {:.0}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Hands out one color per dataset, in draw order.
#[derive(Debug)]
pub struct ColorDispenser {
    next_hue: f64,
}

impl ColorDispenser {
    pub fn new() -> Self {
        ColorDispenser { next_hue: 0.0 }
    }

    pub fn next(&mut self) -> Color {
        let hue = self.next_hue;
        self.next_hue = (self.next_hue + GOLDEN_ANGLE) % 360.0;
        Color {
            hue,
            saturation: 70.0,
            lightness: 50.0,
        }
    }
}

impl Default for ColorDispenser {
    fn default() -> Self {
        ColorDispenser::new()
    }
}
