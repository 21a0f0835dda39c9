//! Deterministic synthetic images for tests

use image::{Rgb, RgbImage};

/// xorshift32, enough to make reproducible noise
pub struct Noise(u32);

impl Noise {
    pub fn new(seed: u32) -> Self {
        Self(seed.wrapping_mul(2_654_435_761).max(1))
    }

    pub fn next_u8(&mut self) -> u8 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x >> 24) as u8
    }

    pub fn next_rgb(&mut self) -> Rgb<u8> {
        Rgb([self.next_u8(), self.next_u8(), self.next_u8()])
    }
}

/// Uniform per-pixel RGB noise
pub fn noise(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut rng = Noise::new(seed);
    RgbImage::from_fn(width, height, |_, _| rng.next_rgb())
}

/// Noise made of `cell` x `cell` solid blocks, so it survives downscaling
pub fn block_noise(width: u32, height: u32, cell: u32, seed: u32) -> RgbImage {
    let mut rng = Noise::new(seed);
    let cols = width.div_ceil(cell);
    let rows = height.div_ceil(cell);
    let colors: Vec<Rgb<u8>> = (0..cols * rows).map(|_| rng.next_rgb()).collect();
    RgbImage::from_fn(width, height, |x, y| colors[((y / cell) * cols + x / cell) as usize])
}
