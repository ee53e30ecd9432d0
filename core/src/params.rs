use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{Result, TerrainError};
use crate::filter::{FilterKind, HeightFilter};

pub const MAX_OCTAVES: u32 = 16;
// (MAX_RESOLUTION + 1)^2 vertices must stay addressable by u32 indices
pub const MAX_RESOLUTION: u32 = 4096;
// Upper bound on length and height; keeps height * sum(gain^i) and the
// normal cross products finite in f32
pub const MAX_EXTENT: f32 = 1.0e6;

// Everything a terrain build depends on.
// Field names serialize in camelCase so config files use the same names
// as the setter entry point (`gain`, `filterEnabled`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationParameters {
    // Per-octave amplitude multiplier (persistence), in (0, 1]
    pub gain: f64,
    // Per-octave frequency multiplier, >= 1
    pub lacunarity: f64,
    pub octaves: u32,
    // Noise-space extent covered by the grid, > 0
    pub scale: f64,
    pub shift: [f64; 2],
    pub seed: u64,
    // Cells per side; the grid has (resolution + 1)^2 vertices
    pub resolution: u32,
    // World-space side length of the terrain
    pub length: f32,
    // World-space height of an elevation of 1.0
    pub height: f32,
    // Steepness of the buttes S-curve
    pub sharpness: f32,
    pub filter_enabled: bool,
    pub filter_kind: FilterKind,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            gain: 0.5,
            lacunarity: 2.0,
            octaves: 4,
            scale: 5.0,
            shift: [0.0, 0.0],
            seed: 0,
            resolution: 256,
            length: 256.0,
            height: 50.0,
            sharpness: 0.0,
            filter_enabled: false,
            filter_kind: FilterKind::Buttes,
        }
    }
}

impl GenerationParameters {
    // Check every field against the same rules the setters enforce.
    pub fn validate(&self) -> Result<()> {
        check_float(Parameter::Gain, self.gain)?;
        check_float(Parameter::Lacunarity, self.lacunarity)?;
        check_int(Parameter::Octaves, self.octaves as i64)?;
        check_float(Parameter::Scale, self.scale)?;
        check_float(Parameter::ShiftX, self.shift[0])?;
        check_float(Parameter::ShiftY, self.shift[1])?;
        check_int(Parameter::Resolution, self.resolution as i64)?;
        check_f32(Parameter::Length, self.length as f64)?;
        check_f32(Parameter::Height, self.height as f64)?;
        check_f32(Parameter::Sharpness, self.sharpness as f64)?;
        Ok(())
    }

    // Write one parameter. On error the previous value is left untouched.
    pub fn apply(&mut self, parameter: Parameter, value: ParamValue) -> Result<()> {
        match parameter {
            Parameter::Gain => self.gain = check_float(parameter, value.as_float(parameter)?)?,
            Parameter::Lacunarity => {
                self.lacunarity = check_float(parameter, value.as_float(parameter)?)?
            }
            Parameter::Octaves => {
                self.octaves = check_int(parameter, value.as_int(parameter)?)? as u32
            }
            Parameter::Scale => self.scale = check_float(parameter, value.as_float(parameter)?)?,
            Parameter::ShiftX => {
                self.shift[0] = check_float(parameter, value.as_float(parameter)?)?
            }
            Parameter::ShiftY => {
                self.shift[1] = check_float(parameter, value.as_float(parameter)?)?
            }
            // Any integer is a usable seed; negatives keep their bit pattern
            Parameter::Seed => self.seed = value.as_int(parameter)? as u64,
            Parameter::Resolution => {
                self.resolution = check_int(parameter, value.as_int(parameter)?)? as u32
            }
            Parameter::Length => {
                self.length = check_f32(parameter, value.as_float(parameter)?)?
            }
            Parameter::Height => {
                self.height = check_f32(parameter, value.as_float(parameter)?)?
            }
            Parameter::Sharpness => {
                self.sharpness = check_f32(parameter, value.as_float(parameter)?)?
            }
            Parameter::FilterEnabled => self.filter_enabled = value.as_bool(parameter)?,
            Parameter::FilterKind => self.filter_kind = value.as_filter(parameter)?,
        }
        Ok(())
    }

    pub fn buttes_active(&self) -> bool {
        self.filter_enabled && self.filter_kind == FilterKind::Buttes
    }

    // The filter a build with these parameters applies, if any.
    // `water_level` is the world-space clamp height, only consulted for
    // `FilterKind::Water`; `None` there means no band table to derive it from.
    pub fn height_filter(&self, water_level: Option<f32>) -> Option<HeightFilter> {
        if !self.filter_enabled {
            return None;
        }
        match self.filter_kind {
            FilterKind::Buttes => Some(HeightFilter::Buttes {
                sharpness: self.sharpness,
            }),
            FilterKind::Water => match water_level {
                Some(level) => Some(HeightFilter::WaterClamp { level }),
                None => {
                    trace!("water filter enabled without bands, skipping clamp");
                    None
                }
            },
        }
    }
}

fn check_float(parameter: Parameter, v: f64) -> Result<f64> {
    if !v.is_finite() {
        return Err(TerrainError::invalid(parameter, format!("{} is not finite", v)));
    }
    let ok = match parameter {
        Parameter::Gain => v > 0.0 && v <= 1.0,
        Parameter::Lacunarity => v >= 1.0,
        Parameter::Scale => v > 0.0,
        Parameter::Length | Parameter::Height => v > 0.0 && v <= MAX_EXTENT as f64,
        _ => true,
    };
    if ok {
        Ok(v)
    } else {
        let rule = match parameter {
            Parameter::Gain => "must be in (0, 1]".to_string(),
            Parameter::Lacunarity => "must be at least 1".to_string(),
            Parameter::Length | Parameter::Height => format!("must be in (0, {}]", MAX_EXTENT),
            _ => "must be positive".to_string(),
        };
        Err(TerrainError::invalid(parameter, format!("{} {}", v, rule)))
    }
}

// f32 fields are checked after narrowing, so values that overflow to inf
// or flush to 0 are caught here rather than in a build
fn check_f32(parameter: Parameter, v: f64) -> Result<f32> {
    let narrowed = v as f32;
    if v.is_finite() && !narrowed.is_finite() {
        return Err(TerrainError::invalid(
            parameter,
            format!("{} does not fit in f32", v),
        ));
    }
    check_float(parameter, narrowed as f64)?;
    Ok(narrowed)
}

fn check_int(parameter: Parameter, v: i64) -> Result<i64> {
    let max = match parameter {
        Parameter::Octaves => MAX_OCTAVES,
        Parameter::Resolution => MAX_RESOLUTION,
        _ => return Ok(v),
    };
    if (1..=max as i64).contains(&v) {
        Ok(v)
    } else {
        Err(TerrainError::invalid(
            parameter,
            format!("{} must be in 1..={}", v, max),
        ))
    }
}

// Tag for every settable generation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Gain,
    Lacunarity,
    Octaves,
    Scale,
    ShiftX,
    ShiftY,
    Seed,
    Resolution,
    Length,
    Height,
    Sharpness,
    FilterEnabled,
    FilterKind,
}

impl Parameter {
    pub const ALL: [Parameter; 13] = [
        Parameter::Gain,
        Parameter::Lacunarity,
        Parameter::Octaves,
        Parameter::Scale,
        Parameter::ShiftX,
        Parameter::ShiftY,
        Parameter::Seed,
        Parameter::Resolution,
        Parameter::Length,
        Parameter::Height,
        Parameter::Sharpness,
        Parameter::FilterEnabled,
        Parameter::FilterKind,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Gain => "gain",
            Parameter::Lacunarity => "lacunarity",
            Parameter::Octaves => "octaves",
            Parameter::Scale => "scale",
            Parameter::ShiftX => "shiftX",
            Parameter::ShiftY => "shiftY",
            Parameter::Seed => "seed",
            Parameter::Resolution => "resolution",
            Parameter::Length => "length",
            Parameter::Height => "height",
            Parameter::Sharpness => "sharpness",
            Parameter::FilterEnabled => "filterEnabled",
            Parameter::FilterKind => "filterKind",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parameter {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        let alias = match lower.as_str() {
            "persistence" => Some(Parameter::Gain),
            "filtertoggle" | "buttes" => Some(Parameter::FilterEnabled),
            _ => None,
        };
        alias
            .or_else(|| {
                Parameter::ALL
                    .into_iter()
                    .find(|p| p.name().eq_ignore_ascii_case(&lower))
            })
            .ok_or_else(|| TerrainError::UnknownParameter(s.to_string()))
    }
}

// A value handed in by the UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Filter(FilterKind),
}

impl ParamValue {
    fn as_float(self, parameter: Parameter) -> Result<f64> {
        match self {
            ParamValue::Float(v) => Ok(v),
            ParamValue::Int(v) => Ok(v as f64),
            _ => Err(TerrainError::TypeMismatch {
                parameter,
                expected: "numeric",
            }),
        }
    }

    // Sliders hand integers over as floats; truncate like a cast would
    fn as_int(self, parameter: Parameter) -> Result<i64> {
        match self {
            ParamValue::Int(v) => Ok(v),
            ParamValue::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
            ParamValue::Float(v) => Err(TerrainError::invalid(
                parameter,
                format!("{} is not finite", v),
            )),
            _ => Err(TerrainError::TypeMismatch {
                parameter,
                expected: "integer",
            }),
        }
    }

    fn as_bool(self, parameter: Parameter) -> Result<bool> {
        match self {
            ParamValue::Bool(v) => Ok(v),
            _ => Err(TerrainError::TypeMismatch {
                parameter,
                expected: "boolean",
            }),
        }
    }

    fn as_filter(self, parameter: Parameter) -> Result<FilterKind> {
        match self {
            ParamValue::Filter(kind) => Ok(kind),
            _ => Err(TerrainError::TypeMismatch {
                parameter,
                expected: "filter kind",
            }),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Float(v as f64)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<FilterKind> for ParamValue {
    fn from(v: FilterKind) -> Self {
        ParamValue::Filter(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenState {
    Clean,
    Dirty,
}

// Current parameters plus the dirty flag that schedules a rebuild.
// Every accepted mutation raises the flag; rejected ones leave both the
// value and the flag as they were.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    params: GenerationParameters,
    dirty: bool,
}

impl ParameterStore {
    pub fn new(params: GenerationParameters) -> Result<Self> {
        params.validate()?;
        // Dirty from the start so the first tick builds
        Ok(Self {
            params,
            dirty: true,
        })
    }

    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    pub fn state(&self) -> RegenState {
        if self.dirty {
            RegenState::Dirty
        } else {
            RegenState::Clean
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set(&mut self, parameter: Parameter, value: impl Into<ParamValue>) -> Result<()> {
        let value = value.into();
        match self.params.apply(parameter, value) {
            Ok(()) => {
                self.dirty = true;
                Ok(())
            }
            Err(e) => {
                warn!(%parameter, ?value, "rejected parameter update: {e}");
                Err(e)
            }
        }
    }

    // Setter keyed by name, for UI layers that only know strings.
    pub fn set_named(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<()> {
        let parameter = name.parse::<Parameter>()?;
        self.set(parameter, value)
    }

    // Swap in a whole parameter set, e.g. from a reloaded config.
    pub fn replace(&mut self, params: GenerationParameters) -> Result<()> {
        params.validate()?;
        self.params = params;
        self.dirty = true;
        Ok(())
    }

    // Force a rebuild without changing anything (inspector-style validation hook).
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self {
            params: GenerationParameters::default(),
            dirty: true,
        }
    }
}
