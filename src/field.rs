//! Scalar field sampled on a dyadic grid.
//!
//! A field has `(2^L + 1)²` samples. Generation is seeded and deterministic;
//! smoothing is a damped 4-neighbor stencil that leaves the boundary rows
//! and columns untouched, applied in scan order so each pass reads the
//! already-updated west and north samples.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

const RANDOM_SCALE: f64 = 0.15;
const SMOOTH_RETAIN: f64 = 0.9;
const SMOOTH_BLEND: f64 = 0.1;

#[derive(Clone, Debug)]
pub struct Field {
    side: usize,
    values: Vec<f64>,
}

impl Field {
    /// Grid side for `levels` refinement levels: `2^levels + 1`.
    #[inline]
    pub fn side_for(levels: u32) -> usize {
        (1usize << levels) + 1
    }

    /// Field populated from a closure over grid coordinates.
    pub fn from_fn(levels: u32, mut f: impl FnMut(i32, i32) -> f64) -> Self {
        let side = Self::side_for(levels);
        let mut values = Vec::with_capacity(side * side);
        for y in 0..side as i32 {
            for x in 0..side as i32 {
                values.push(f(x, y));
            }
        }
        Self { side, values }
    }

    /// Seeded uniform samples scaled down, with the origin pinned to zero.
    pub fn random(levels: u32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut field = Self::from_fn(levels, |_, _| RANDOM_SCALE * rng.random::<f64>());
        field.values[0] = 0.0;
        field
    }

    /// Zero field with a single spike at `(x, y)`.
    pub fn impulse(levels: u32, x: i32, y: i32, amplitude: f64) -> Self {
        Self::from_fn(levels, |px, py| {
            if (px, py) == (x, y) {
                amplitude
            } else {
                0.0
            }
        })
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Sample at `(x, y)`. Coordinates must be in range.
    #[inline]
    pub fn value(&self, x: i32, y: i32) -> f64 {
        debug_assert!(x >= 0 && y >= 0 && (x as usize) < self.side && (y as usize) < self.side);
        self.values[y as usize * self.side + x as usize]
    }

    /// Damped 4-neighbor smoothing over interior samples.
    ///
    /// Boundary samples are never written, so edge features survive every
    /// pass. Updates happen in place in scan order.
    pub fn smooth(&mut self, iterations: u32) {
        let side = self.side;
        for _ in 0..iterations {
            for idx in 0..self.values.len() {
                let x = idx % side;
                let y = idx / side;
                if x == 0 || y == 0 || x >= side - 1 || y >= side - 1 {
                    continue;
                }
                let around = self.values[idx - 1]
                    + self.values[idx + 1]
                    + self.values[idx - side]
                    + self.values[idx + side];
                self.values[idx] =
                    SMOOTH_RETAIN * self.values[idx] + SMOOTH_BLEND * around / 4.0;
            }
        }
    }
}
