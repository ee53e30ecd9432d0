use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::NoiseSource;
use crate::params::GenerationParameters;
use crate::perlin2::Perlin2D;

// Multi-octave (fBm) elevation sampler.
// Every call reseeds its own offset stream from `params.seed`, so each
// octave's random offset is the same for every grid point and the result
// does not depend on the order points are sampled in.
#[derive(Clone, Default)]
pub struct FractalNoise<N = Perlin2D> {
    base: N,
}

impl<N: NoiseSource> FractalNoise<N> {
    pub fn new(base: N) -> Self {
        Self { base }
    }

    // Elevation at normalized grid coordinates `u`, `v` in [0, 1].
    // Octave i samples at `u * lacunarity^i * scale + r_x + shift.x` (same
    // for y) and contributes `gain^i` of the base noise. With a [0, 1] base
    // the result lies in [0, sum(gain^i)]; it is not normalized.
    pub fn sample(&self, u: f64, v: f64, params: &GenerationParameters) -> f64 {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut noise = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;

        for _ in 0..params.octaves {
            // x offset first, then y
            let rx: f64 = rng.random();
            let ry: f64 = rng.random();
            let x = u * frequency * params.scale + rx + params.shift[0];
            let y = v * frequency * params.scale + ry + params.shift[1];

            noise += self.base.sample2(x, y) * amplitude;

            frequency *= params.lacunarity;
            amplitude *= params.gain;
        }

        noise
    }
}
