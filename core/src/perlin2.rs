use crate::NoiseSource;

// Seed of the shared gradient lattice. Per-terrain variation comes from the
// seeded octave offsets in `fractal`, not from reshuffling the lattice.
pub const LATTICE_SEED: u64 = 0;

// Classic 2D gradient (Perlin) noise over a shuffled permutation lattice
#[derive(Clone)]
pub struct Perlin2D {
    perm: [u8; 512], // permutation table (256 duplicated)
}

impl Perlin2D {
    pub fn new(seed: u64) -> Self {
        let mut p: Vec<u8> = (0..256).map(|i| i as u8).collect();
        // xorshift over a scrambled seed, only used for the shuffle
        let mut x = seed ^ 0xDEADBEEFCAFEBABE_u64;
        let mut rng = || {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x & 0xFF) as u8
        };
        // Fisher–Yates shuffle p[0..256]
        for i in (1..256).rev() {
            // pick from the not-yet-placed prefix [0..=i]
            let j = (rng() as usize) % (i + 1);
            p.swap(i, j);
        }
        // Duplicated so corner lookups never need a modulo
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }

        Self { perm }
    }

    // 6t^5 − 15t^4 + 10t^3: first and second derivatives vanish at 0 and 1
    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    // Linear blend from a (t = 0) to b (t = 1)
    #[inline]
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + t * (b - a)
    }

    // Dot product with one of the diagonal gradients picked by the hash
    #[inline]
    fn grad(hash: u8, x: f64, y: f64) -> f64 {
        // Low 4 bits select which axis leads and the sign of each term
        let h = (hash & 0xF) as usize;
        let u = if h < 8 { x } else { y };
        let v = if h < 8 { y } else { x };
        let sign_u = if (h & 1) == 0 { u } else { -u };
        let sign_v = if (h & 2) == 0 { v } else { -v };
        sign_u + sign_v
    }

    // Raw single-octave noise, roughly in [−1, 1]; exactly 0 on lattice points
    pub fn raw(&self, x: f64, y: f64) -> f64 {
        // Cell corner (wrapped onto the 256 lattice) and position inside the cell
        let xi = x.floor() as i32 & 255;
        let yi = y.floor() as i32 & 255;
        let xf = x - x.floor();
        let yf = y - y.floor();
        let u = Self::fade(xf);
        let v = Self::fade(yf);

        let xi0 = xi as usize;
        let xi1 = ((xi + 1) & 255) as usize;
        let yi0 = yi as usize;
        let yi1 = ((yi + 1) & 255) as usize;

        // Hash each of the four cell corners
        let aa = self.perm[(self.perm[xi0] as usize + yi0) & 255];
        let ab = self.perm[(self.perm[xi0] as usize + yi1) & 255];
        let ba = self.perm[(self.perm[xi1] as usize + yi0) & 255];
        let bb = self.perm[(self.perm[xi1] as usize + yi1) & 255];

        // Blend the corner contributions along x, then along y
        let x1 = Self::lerp(Self::grad(aa, xf, yf), Self::grad(ba, xf - 1.0, yf), u);
        let x2 = Self::lerp(
            Self::grad(ab, xf, yf - 1.0),
            Self::grad(bb, xf - 1.0, yf - 1.0),
            u,
        );
        Self::lerp(x1, x2, v)
    }
}

impl Default for Perlin2D {
    fn default() -> Self {
        Self::new(LATTICE_SEED)
    }
}

impl NoiseSource for Perlin2D {
    // Remapped to [0, 1]; lattice points sit at exactly 0.5
    fn sample2(&self, x: f64, y: f64) -> f64 {
        ((self.raw(x, y) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
