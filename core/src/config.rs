// JSON configuration: generation parameters plus optional band tables.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bands::{TerrainBand, TerrainPalette, to_array};
use crate::error::Result;
use crate::params::GenerationParameters;

// One band as written in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    pub threshold: f32,
    // `[r, g, b, a]`, each in 0..=1
    pub color: [f32; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&BandConfig> for TerrainBand {
    fn from(b: &BandConfig) -> Self {
        TerrainBand {
            name: b.name.clone(),
            ..TerrainBand::new(b.threshold, b.color)
        }
    }
}

impl From<&TerrainBand> for BandConfig {
    fn from(b: &TerrainBand) -> Self {
        BandConfig {
            threshold: b.threshold,
            color: to_array(b.color),
            name: b.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    pub standard: Vec<BandConfig>,
    // Table used while the buttes filter is on; falls back to `standard`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttes: Option<Vec<BandConfig>>,
}

impl PaletteConfig {
    pub fn to_palette(&self) -> TerrainPalette {
        let standard: Vec<TerrainBand> = self.standard.iter().map(TerrainBand::from).collect();
        match &self.buttes {
            Some(buttes) => {
                TerrainPalette::new(standard, buttes.iter().map(TerrainBand::from).collect())
            }
            None => TerrainPalette::single(standard),
        }
    }
}

impl From<&TerrainPalette> for PaletteConfig {
    fn from(p: &TerrainPalette) -> Self {
        PaletteConfig {
            standard: p.standard.iter().map(BandConfig::from).collect(),
            buttes: Some(p.buttes.iter().map(BandConfig::from).collect()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandscapeConfig {
    pub parameters: GenerationParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<PaletteConfig>,
}

impl LandscapeConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LandscapeConfig = serde_json::from_str(json)?;
        config.parameters.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!("loaded landscape config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // The configured palette, or the built-in one.
    pub fn palette(&self) -> TerrainPalette {
        self.palette
            .as_ref()
            .map(PaletteConfig::to_palette)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TerrainError;
    use crate::filter::FilterKind;

    #[test]
    fn empty_object_gives_defaults() {
        let config = LandscapeConfig::from_json_str("{}").unwrap();
        assert_eq!(config.parameters, GenerationParameters::default());
        assert_eq!(config.palette().standard.len(), TerrainPalette::default().standard.len());
    }

    #[test]
    fn partial_parameters_keep_other_defaults() {
        let json = r#"{
            "parameters": {
                "gain": 0.3,
                "octaves": 6,
                "shift": [1.0, -2.0],
                "filterEnabled": true,
                "filterKind": "water"
            }
        }"#;
        let p = LandscapeConfig::from_json_str(json).unwrap().parameters;
        assert_eq!(p.gain, 0.3);
        assert_eq!(p.octaves, 6);
        assert_eq!(p.shift, [1.0, -2.0]);
        assert!(p.filter_enabled);
        assert_eq!(p.filter_kind, FilterKind::Water);
        assert_eq!(p.resolution, 256);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let err = LandscapeConfig::from_json_str(r#"{"parameters": {"resolution": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, TerrainError::InvalidParameter { .. }));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = LandscapeConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TerrainError::Config(_)));
    }

    #[test]
    fn palette_without_buttes_table_reuses_standard() {
        let json = r#"{
            "palette": {
                "standard": [
                    { "threshold": 0.5, "color": [0.0, 0.0, 1.0, 1.0], "name": "water" },
                    { "threshold": 2.0, "color": [0.0, 1.0, 0.0, 1.0] }
                ]
            }
        }"#;
        let palette = LandscapeConfig::from_json_str(json).unwrap().palette();
        assert_eq!(palette.standard.len(), 2);
        assert_eq!(palette.buttes.len(), 2);
        assert_eq!(palette.standard[0].name.as_deref(), Some("water"));
        assert_eq!(to_array(palette.buttes[1].color), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn serialized_config_reloads() {
        let config = LandscapeConfig {
            parameters: GenerationParameters {
                seed: 42,
                sharpness: 5.0,
                ..Default::default()
            },
            palette: Some(PaletteConfig::from(&TerrainPalette::default())),
        };
        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"filterEnabled\""));
        assert_eq!(LandscapeConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LandscapeConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, TerrainError::Io(_)));
    }
}
