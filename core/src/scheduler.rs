use std::time::Instant;

use tracing::{debug, error};

use crate::NoiseSource;
use crate::bands::TerrainPalette;
use crate::error::Result;
use crate::mesh::{BuildStats, TerrainMesh, TerrainMeshBuilder};
use crate::params::{GenerationParameters, ParamValue, Parameter, ParameterStore, RegenState};
use crate::perlin2::Perlin2D;

// Owns the parameters, the builder and the mesh, and rebuilds the mesh
// on the first tick after any parameter change.
// Setting the flag and checking it happen on the same thread (`&mut self`),
// so a build never overlaps another build or a mutation.
pub struct RegenerationScheduler<N = Perlin2D> {
    store: ParameterStore,
    builder: TerrainMeshBuilder<N>,
    mesh: TerrainMesh,
    builds: u64,
    last_stats: Option<BuildStats>,
}

impl RegenerationScheduler<Perlin2D> {
    pub fn new(params: GenerationParameters, palette: TerrainPalette) -> Result<Self> {
        Ok(Self::with_builder(
            ParameterStore::new(params)?,
            TerrainMeshBuilder::new(palette),
        ))
    }
}

impl<N: NoiseSource> RegenerationScheduler<N> {
    pub fn with_builder(store: ParameterStore, builder: TerrainMeshBuilder<N>) -> Self {
        Self {
            store,
            builder,
            mesh: TerrainMesh::default(),
            builds: 0,
            last_stats: None,
        }
    }

    // Rebuild if dirty. Returns whether a build ran.
    // On error the previous mesh is kept and the state stays dirty.
    pub fn tick(&mut self) -> Result<bool> {
        if !self.store.is_dirty() {
            return Ok(false);
        }

        let start = Instant::now();
        let stats = match self.builder.build_into(self.store.params(), &mut self.mesh) {
            Ok(stats) => stats,
            Err(e) => {
                error!("terrain build failed: {e}");
                return Err(e);
            }
        };
        self.store.mark_clean();
        self.builds += 1;
        self.last_stats = Some(stats);

        debug!(
            vertices = stats.vertex_count,
            triangles = stats.triangle_count,
            max_height = stats.max_height,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "rebuilt terrain"
        );
        Ok(true)
    }

    pub fn set_parameter(
        &mut self,
        parameter: Parameter,
        value: impl Into<ParamValue>,
    ) -> Result<()> {
        self.store.set(parameter, value)
    }

    pub fn set_named(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<()> {
        self.store.set_named(name, value)
    }

    pub fn replace_parameters(&mut self, params: GenerationParameters) -> Result<()> {
        self.store.replace(params)
    }

    // New palette; colours change, so the next tick rebuilds.
    pub fn set_palette(&mut self, palette: TerrainPalette) {
        self.builder.set_palette(palette);
        self.store.mark_dirty();
    }

    pub fn mark_dirty(&mut self) {
        self.store.mark_dirty();
    }

    pub fn state(&self) -> RegenState {
        self.store.state()
    }

    pub fn params(&self) -> &GenerationParameters {
        self.store.params()
    }

    // Mesh from the last completed build; empty before the first tick.
    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    pub fn build_count(&self) -> u64 {
        self.builds
    }

    pub fn last_stats(&self) -> Option<BuildStats> {
        self.last_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> RegenerationScheduler {
        let params = GenerationParameters {
            resolution: 4,
            ..Default::default()
        };
        RegenerationScheduler::new(params, TerrainPalette::default()).unwrap()
    }

    #[test]
    fn first_tick_builds_once() {
        let mut s = scheduler();
        assert_eq!(s.state(), RegenState::Dirty);
        assert!(s.mesh().is_empty());

        assert!(s.tick().unwrap());
        assert_eq!(s.state(), RegenState::Clean);
        assert_eq!(s.build_count(), 1);
        assert_eq!(s.mesh().vertex_count(), 25);
    }

    #[test]
    fn clean_tick_is_a_no_op() {
        let mut s = scheduler();
        s.tick().unwrap();
        assert!(!s.tick().unwrap());
        assert!(!s.tick().unwrap());
        assert_eq!(s.build_count(), 1);
    }

    #[test]
    fn mutation_triggers_exactly_one_rebuild() {
        let mut s = scheduler();
        s.tick().unwrap();
        s.set_parameter(Parameter::Octaves, 2).unwrap();
        s.set_parameter(Parameter::ShiftX, 0.5).unwrap();
        assert_eq!(s.state(), RegenState::Dirty);
        s.tick().unwrap();
        s.tick().unwrap();
        assert_eq!(s.build_count(), 2);
    }

    #[test]
    fn rejected_mutation_does_not_rebuild() {
        let mut s = scheduler();
        s.tick().unwrap();
        assert!(s.set_parameter(Parameter::Scale, 0.0).is_err());
        assert_eq!(s.state(), RegenState::Clean);
        assert!(!s.tick().unwrap());
    }

    #[test]
    fn resolution_change_resizes_mesh() {
        let mut s = scheduler();
        s.tick().unwrap();
        s.set_named("resolution", 2).unwrap();
        s.tick().unwrap();
        assert_eq!(s.mesh().vertex_count(), 9);
        assert_eq!(s.last_stats().map(|st| st.triangle_count), Some(8));
    }

    #[test]
    fn palette_change_marks_dirty() {
        let mut s = scheduler();
        s.tick().unwrap();
        s.set_palette(TerrainPalette::single(Vec::new()));
        assert_eq!(s.state(), RegenState::Dirty);
        assert!(s.tick().unwrap());
    }
}
