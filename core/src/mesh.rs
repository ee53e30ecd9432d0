use crate::NoiseSource;
use crate::bands::{Rgba, TerrainBand, TerrainPalette, color_for, to_rgba8, water_level};
use crate::error::Result;
use crate::filter::HeightFilter;
use crate::fractal::FractalNoise;
use crate::params::GenerationParameters;
use crate::perlin2::Perlin2D;

// Vertex/colour/index/normal buffers for one terrain.
// `vertices`, `colors` and `normals` are parallel; `indices` holds
// counter-clockwise (seen from above) triangle triples.
#[derive(Debug, Clone, Default)]
pub struct TerrainMesh {
    pub vertices: Vec<[f32; 3]>,
    pub colors: Vec<Rgba>,
    pub indices: Vec<u32>,
    pub normals: Vec<[f32; 3]>,
}

impl TerrainMesh {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.colors.clear();
        self.indices.clear();
        self.normals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn colors_rgba8(&self) -> Vec<[u8; 4]> {
        self.colors.iter().map(|&c| to_rgba8(c)).collect()
    }

    // Parallel buffers line up and every index points at a vertex.
    pub fn is_consistent(&self) -> bool {
        let n = self.vertices.len();
        self.colors.len() == n
            && self.normals.len() == n
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildStats {
    pub vertex_count: usize,
    pub triangle_count: usize,
    // Largest world-space height before filtering
    pub max_height: f32,
}

// Turns generation parameters into a terrain mesh.
// The grid has `(resolution + 1)^2` vertices laid out row by row along z,
// spanning `length` on both horizontal axes.
#[derive(Clone, Default)]
pub struct TerrainMeshBuilder<N = Perlin2D> {
    noise: FractalNoise<N>,
    palette: TerrainPalette,
}

impl TerrainMeshBuilder<Perlin2D> {
    pub fn new(palette: TerrainPalette) -> Self {
        Self::with_noise(FractalNoise::default(), palette)
    }
}

impl<N: NoiseSource> TerrainMeshBuilder<N> {
    pub fn with_noise(noise: FractalNoise<N>, palette: TerrainPalette) -> Self {
        Self { noise, palette }
    }

    pub fn palette(&self) -> &TerrainPalette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: TerrainPalette) {
        self.palette = palette;
    }

    pub fn build(&self, params: &GenerationParameters) -> Result<TerrainMesh> {
        let mut mesh = TerrainMesh::default();
        self.build_into(params, &mut mesh)?;
        Ok(mesh)
    }

    // Rebuild `mesh` in place, picking the band table and filter from `params`.
    // With the buttes filter on, colouring switches to the palette's buttes
    // table; the water clamp sits at the active table's first threshold times height.
    pub fn build_into(
        &self,
        params: &GenerationParameters,
        mesh: &mut TerrainMesh,
    ) -> Result<BuildStats> {
        let bands = self.palette.bands_for(params.buttes_active());
        let filter = params.height_filter(water_level(bands, params.height));
        self.build_with(params, bands, filter, mesh)
    }

    // Rebuild `mesh` in place with an explicit band table and filter.
    // Parameters are validated before `mesh` is touched, so on error the
    // previous contents survive untouched.
    pub fn build_with(
        &self,
        params: &GenerationParameters,
        bands: &[TerrainBand],
        filter: Option<HeightFilter>,
        mesh: &mut TerrainMesh,
    ) -> Result<BuildStats> {
        params.validate()?;

        let res = params.resolution as usize;
        let row = res + 1;
        let denom = res.max(1) as f64;

        mesh.clear();
        mesh.vertices.reserve(row * row);
        mesh.colors.reserve(row * row);
        mesh.indices.reserve(res * res * 6);

        // Pass 1: sample, colour and place every vertex, tracking the max height
        let mut max_height = 0.0f32;
        for z in 0..row {
            for x in 0..row {
                let u = x as f64 / denom;
                let v = z as f64 / denom;
                let elevation = self.noise.sample(u, v, params) as f32;

                mesh.colors.push(color_for(bands, elevation));

                let world_height = params.height * elevation;
                max_height = max_height.max(world_height);
                mesh.vertices.push([
                    params.length * u as f32,
                    world_height,
                    params.length * v as f32,
                ]);
            }
        }

        // Pass 2: two triangles per cell, then the filter against the final max
        let r = row as u32;
        for z in 0..res {
            for x in 0..res {
                let i = (z * row + x) as u32;
                mesh.indices
                    .extend_from_slice(&[i, i + r, i + 1, i + 1, i + r, i + r + 1]);
            }
        }
        if let Some(filter) = filter {
            filter.apply_all(&mut mesh.vertices, max_height);
        }

        recalculate_normals(&mesh.vertices, &mesh.indices, &mut mesh.normals);

        Ok(BuildStats {
            vertex_count: mesh.vertices.len(),
            triangle_count: mesh.indices.len() / 3,
            max_height,
        })
    }
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

// Area-weighted vertex normals: each face adds its unnormalized cross
// product to its three corners. Isolated vertices point straight up.
pub fn recalculate_normals(vertices: &[[f32; 3]], indices: &[u32], normals: &mut Vec<[f32; 3]>) {
    normals.clear();
    normals.resize(vertices.len(), [0.0; 3]);

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let v0 = vertices[i0];
        let face = cross(sub(vertices[i1], v0), sub(vertices[i2], v0));
        for i in [i0, i1, i2] {
            for k in 0..3 {
                normals[i][k] += face[k];
            }
        }
    }

    for n in normals.iter_mut() {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        *n = if len > 1e-12 {
            [n[0] / len, n[1] / len, n[2] / len]
        } else {
            [0.0, 1.0, 0.0]
        };
    }
}
