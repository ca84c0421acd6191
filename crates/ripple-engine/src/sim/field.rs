use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One cell: `(height, prev_height, unused, unused)`.
///
/// Matches the `Rgba32Float` texel layout of the GPU textures byte for byte.
pub type Texel = [f32; 4];

/// Square grid of texels, row-major (`idx = y * side + x`).
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    side: u32,
    texels: Vec<Texel>,
}

impl HeightField {
    /// Uniform field with `height` in both channels.
    pub fn flat(side: u32, height: f32) -> Self {
        Self {
            side,
            texels: vec![[height, height, 0.0, 1.0]; side as usize * side as usize],
        }
    }

    /// Field with heights drawn uniformly from `[0, amplitude)`, `prev == height`.
    ///
    /// A non-positive or non-finite amplitude gives a flat field at zero.
    pub fn noise(side: u32, amplitude: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let usable = amplitude.is_finite() && amplitude > 0.0;
        let texels = (0..side as usize * side as usize)
            .map(|_| {
                let h = if usable { rng.gen_range(0.0..amplitude) } else { 0.0 };
                [h, h, 0.0, 1.0]
            })
            .collect();
        Self { side, texels }
    }

    #[inline]
    pub fn side(&self) -> u32 {
        self.side
    }

    #[inline]
    pub fn texels(&self) -> &[Texel] {
        &self.texels
    }

    #[inline]
    pub(crate) fn texels_mut(&mut self) -> &mut [Texel] {
        &mut self.texels
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.side as usize + x as usize
    }

    pub fn height(&self, x: u32, y: u32) -> f32 {
        self.texels[self.index(x, y)][0]
    }

    pub fn prev_height(&self, x: u32, y: u32) -> f32 {
        self.texels[self.index(x, y)][1]
    }

    /// Sets both channels, so the cell starts at rest.
    pub fn set_height(&mut self, x: u32, y: u32, h: f32) {
        let i = self.index(x, y);
        self.texels[i][0] = h;
        self.texels[i][1] = h;
    }

    /// Texel at `(x, y)` with clamp-to-edge addressing.
    #[inline]
    pub fn clamped(&self, x: i64, y: i64) -> Texel {
        let max = self.side as i64 - 1;
        let cx = x.clamp(0, max) as u32;
        let cy = y.clamp(0, max) as u32;
        self.texels[self.index(cx, cy)]
    }

    /// Largest absolute height.
    pub fn max_abs_height(&self) -> f32 {
        self.texels.iter().fold(0.0f32, |m, t| m.max(t[0].abs()))
    }

    /// Smallest and largest height.
    pub fn height_range(&self) -> (f32, f32) {
        self.texels
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), t| (lo.min(t[0]), hi.max(t[0])))
    }

    /// Raw bytes for a texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_reproducible_and_bounded() {
        let a = HeightField::noise(16, 0.05, 7);
        let b = HeightField::noise(16, 0.05, 7);
        assert_eq!(a, b);

        let (lo, hi) = a.height_range();
        assert!(lo >= 0.0 && hi < 0.05);
        assert!(a.texels().iter().all(|t| t[0] == t[1]));
    }

    #[test]
    fn clamp_to_edge_addressing() {
        let mut f = HeightField::flat(4, 0.0);
        f.set_height(0, 0, 1.0);
        f.set_height(3, 3, 2.0);
        assert_eq!(f.clamped(-1, 0)[0], 1.0);
        assert_eq!(f.clamped(0, -5)[0], 1.0);
        assert_eq!(f.clamped(4, 3)[0], 2.0);
        assert_eq!(f.clamped(9, 9)[0], 2.0);
    }

    #[test]
    fn bytes_match_texel_layout() {
        let f = HeightField::flat(3, 0.5);
        assert_eq!(f.as_bytes().len(), 3 * 3 * 16);
    }

    #[test]
    fn unusable_amplitude_gives_flat_field() {
        for amp in [f32::INFINITY, f32::NAN, -1.0, 0.0] {
            let f = HeightField::noise(4, amp, 1);
            assert_eq!(f, HeightField::flat(4, 0.0), "amplitude {amp}");
        }
    }
}
