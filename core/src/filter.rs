use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    Buttes,
    Water,
}

// Per-vertex height post-process, applied after the whole grid has been
// sampled so that the running maximum is final.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightFilter {
    // Logistic S-curve around half of the running maximum
    Buttes { sharpness: f32 },
    // Raises everything below `level` up to it
    WaterClamp { level: f32 },
}

impl HeightFilter {
    // max_height is the running maximum of the current build
    pub fn apply(&self, h: f32, max_height: f32) -> f32 {
        match *self {
            HeightFilter::Buttes { sharpness } => buttes(h, max_height, sharpness),
            HeightFilter::WaterClamp { level } => water_clamp(h, level),
        }
    }

    // Apply in place to the y component of every vertex.
    pub fn apply_all(&self, vertices: &mut [[f32; 3]], max_height: f32) {
        for v in vertices.iter_mut() {
            v[1] = self.apply(v[1], max_height);
        }
    }
}

// Logistic reshaping: heights above `max_height / 2` are pushed up, those
// below are pulled down, more sharply as `sharpness` grows.
// The output lies in `(max_height, 1.5 * max_height)`. A non-positive
// or non-finite `max_height` yields 0.
pub fn buttes(h: f32, max_height: f32, sharpness: f32) -> f32 {
    if !(max_height > 0.0) || !max_height.is_finite() {
        trace!(max_height, "degenerate buttes input");
        return 0.0;
    }
    let half = max_height / 2.0;
    let scaled = sharpness * (h - half) / half;
    let logistic = 1.0 / (1.0 + (-scaled).exp());
    max_height * (1.0 + logistic / 2.0)
}

pub fn water_clamp(h: f32, level: f32) -> f32 {
    if h <= level { level } else { h }
}
