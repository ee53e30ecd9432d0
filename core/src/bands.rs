use palette::Srgba;
use tracing::trace;

pub type Rgba = Srgba<f32>;

// Vertices that no band claims get plain opaque white
pub const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

pub fn default_color() -> Rgba {
    rgba(DEFAULT_COLOR)
}

pub fn rgba(c: [f32; 4]) -> Rgba {
    Srgba::new(c[0], c[1], c[2], c[3])
}

pub fn to_array(c: Rgba) -> [f32; 4] {
    [c.red, c.green, c.blue, c.alpha]
}

// 8-bit channels for upload to renderers that want bytes
pub fn to_rgba8(c: Rgba) -> [u8; 4] {
    let c = c.into_format::<u8, u8>();
    [c.red, c.green, c.blue, c.alpha]
}

// One elevation band: everything at or below `threshold` not already
// claimed by an earlier band gets `color`.
#[derive(Debug, Clone)]
pub struct TerrainBand {
    pub threshold: f32,
    pub color: Rgba,
    pub name: Option<String>,
}

impl TerrainBand {
    pub fn new(threshold: f32, color: [f32; 4]) -> Self {
        Self {
            threshold,
            color: rgba(color),
            name: None,
        }
    }

    pub fn named(name: &str, threshold: f32, color: [f32; 4]) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::new(threshold, color)
        }
    }
}

// First band (in table order) whose threshold is >= `elevation`.
// Tables are expected sorted by threshold but nothing enforces it;
// first match wins either way.
pub fn color_for(bands: &[TerrainBand], elevation: f32) -> Rgba {
    match bands.iter().find(|b| b.threshold >= elevation) {
        Some(band) => band.color,
        None => {
            trace!(elevation, "no band matched, using default color");
            default_color()
        }
    }
}

// World-space water level: the first band's threshold scaled by terrain height.
pub fn water_level(bands: &[TerrainBand], height: f32) -> Option<f32> {
    bands.first().map(|b| b.threshold * height)
}

// The two band tables a landscape switches between: the regular one and
// the one used while the buttes filter is on.
#[derive(Debug, Clone)]
pub struct TerrainPalette {
    pub standard: Vec<TerrainBand>,
    pub buttes: Vec<TerrainBand>,
}

impl TerrainPalette {
    pub fn new(standard: Vec<TerrainBand>, buttes: Vec<TerrainBand>) -> Self {
        Self { standard, buttes }
    }

    // Same table either way
    pub fn single(bands: Vec<TerrainBand>) -> Self {
        Self {
            standard: bands.clone(),
            buttes: bands,
        }
    }

    pub fn bands_for(&self, buttes_active: bool) -> &[TerrainBand] {
        if buttes_active {
            &self.buttes
        } else {
            &self.standard
        }
    }
}

impl Default for TerrainPalette {
    fn default() -> Self {
        Self {
            standard: standard_bands(),
            buttes: buttes_bands(),
        }
    }
}

// Thresholds are in raw elevation units; 4 octaves at gain 0.5 spans about [0, 1.9]
pub fn standard_bands() -> Vec<TerrainBand> {
    vec![
        TerrainBand::named("deep water", 0.70, [0.0, 0.0, 0.5, 1.0]),
        TerrainBand::named("shallow water", 0.78, [0.0, 0.5, 1.0, 1.0]),
        TerrainBand::named("sand", 0.84, [0.86, 0.78, 0.63, 1.0]),
        TerrainBand::named("grass", 1.00, [0.2, 0.8, 0.2, 1.0]),
        TerrainBand::named("forest", 1.15, [0.13, 0.55, 0.13, 1.0]),
        TerrainBand::named("rock", 1.30, [0.5, 0.5, 0.5, 1.0]),
        TerrainBand::named("snow", f32::MAX, [0.95, 0.95, 0.98, 1.0]),
    ]
}

pub fn buttes_bands() -> Vec<TerrainBand> {
    vec![
        TerrainBand::named("riverbed", 0.75, [0.18, 0.42, 0.40, 1.0]),
        TerrainBand::named("desert floor", 0.90, [0.87, 0.72, 0.53, 1.0]),
        TerrainBand::named("sandstone", 1.05, [0.80, 0.45, 0.25, 1.0]),
        TerrainBand::named("red rock", 1.20, [0.62, 0.27, 0.16, 1.0]),
        TerrainBand::named("mesa top", f32::MAX, [0.74, 0.56, 0.38, 1.0]),
    ]
}
