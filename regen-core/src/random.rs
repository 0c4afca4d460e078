//! Integer random source
//!
//! Generation only ever asks for one thing: a uniform integer in an
//! inclusive range. [`RandInt`] is that seam. Closures implement it, which
//! makes scripted sources easy in tests, and [`RngSource`] adapts any
//! [`rand::Rng`].

use crate::error::GenerateError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform inclusive integer sampler
pub trait RandInt {
    /// Return `r` with `low <= r <= high`; `rand_int(a, a)` is `a`
    fn rand_int(&mut self, low: u32, high: u32) -> u32;
}

impl<F> RandInt for F
where
    F: FnMut(u32, u32) -> u32,
{
    fn rand_int(&mut self, low: u32, high: u32) -> u32 {
        self(low, high)
    }
}

/// Draw from `rand` and reject anything outside `[low, high]`
pub(crate) fn draw<R: RandInt + ?Sized>(
    rand: &mut R,
    low: u32,
    high: u32,
) -> Result<u32, GenerateError> {
    let value = rand.rand_int(low, high);
    if (low..=high).contains(&value) {
        Ok(value)
    } else {
        Err(GenerateError::RandomOutOfRange { low, high, value })
    }
}

/// `true` or `false` with equal odds
pub(crate) fn coin<R: RandInt + ?Sized>(rand: &mut R) -> Result<bool, GenerateError> {
    Ok(draw(rand, 0, 1)? == 0)
}

/// [`RandInt`] over a [`rand::Rng`]
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wrap an RNG
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandInt for RngSource<R> {
    fn rand_int(&mut self, low: u32, high: u32) -> u32 {
        if low >= high {
            return low;
        }
        self.rng.random_range(low..=high)
    }
}

/// The source a generator uses unless told otherwise
pub type DefaultRand = RngSource<ChaCha8Rng>;

impl DefaultRand {
    /// Seeded from the thread RNG
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Reproducible stream for a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for DefaultRand {
    fn default() -> Self {
        Self::from_entropy()
    }
}
