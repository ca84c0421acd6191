//! Per-cell update rules, shared by the CPU simulator and mirrored in
//! `shaders/heightmap.wgsl`.
//!
//! Edges use clamp-to-edge addressing: a neighbour outside the grid reads the
//! nearest edge cell.

use std::f32::consts::PI;

use glam::Vec2;

use super::{HeightField, SimulationParameters, StencilKind};

/// Simulation-space position of a cell centre.
///
/// The plane spans `[-bounds / 2, bounds / 2]` on both axes; `+y` is world `-z`.
#[inline]
pub fn cell_position(x: u32, y: u32, side: u32, bounds: f32) -> Vec2 {
    let uv = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / side as f32;
    (uv - Vec2::splat(0.5)) * bounds
}

/// Depression added at a cell at distance `distance` from the pointer.
///
/// `-depth * (cos(phase) + 1)` with `phase = clamp(distance * PI / radius, 0, PI)`:
/// `-2 * depth` at the centre, exactly zero from `radius` outward.
#[inline]
pub fn pointer_influence(distance: f32, radius: f32, depth: f32) -> f32 {
    let phase = (distance * PI / radius).clamp(0.0, PI);
    -depth * (phase.cos() + 1.0)
}

/// Writes one update step of `read` into `write`.
///
/// Output texel is `(new, old_height, 0, 1)`.
pub fn update(
    read: &HeightField,
    write: &mut HeightField,
    pointer: Vec2,
    params: &SimulationParameters,
) {
    debug_assert_eq!(read.side(), write.side());
    let side = read.side();

    for y in 0..side {
        for x in 0..side {
            let (xi, yi) = (x as i64, y as i64);
            let here = read.clamped(xi, yi);
            let sum = read.clamped(xi, yi + 1)[0]
                + read.clamped(xi, yi - 1)[0]
                + read.clamped(xi + 1, yi)[0]
                + read.clamped(xi - 1, yi)[0];

            let mut h = match params.stencil {
                StencilKind::Wave => (sum * 0.5 - here[1]) * params.viscosity,
                StencilKind::Diffuse => sum * 0.25 * params.viscosity,
            };

            let p = cell_position(x, y, side, params.bounds);
            h += pointer_influence(p.distance(pointer), params.mouse_size, params.depth);

            let i = write.index(x, y);
            write.texels_mut()[i] = [h, here[0], 0.0, 1.0];
        }
    }
}

/// Writes a 4-neighbour box average of `read` into `write`, both channels.
pub fn smooth(read: &HeightField, write: &mut HeightField) {
    debug_assert_eq!(read.side(), write.side());
    let side = read.side();

    for y in 0..side {
        for x in 0..side {
            let (xi, yi) = (x as i64, y as i64);
            let n = read.clamped(xi, yi + 1);
            let s = read.clamped(xi, yi - 1);
            let e = read.clamped(xi + 1, yi);
            let w = read.clamped(xi - 1, yi);

            let i = write.index(x, y);
            write.texels_mut()[i] = [
                (n[0] + s[0] + e[0] + w[0]) * 0.25,
                (n[1] + s[1] + e[1] + w[1]) * 0.25,
                0.0,
                1.0,
            ];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::POINTER_SENTINEL;

    fn params(stencil: StencilKind) -> SimulationParameters {
        SimulationParameters { resolution: 8, stencil, ..Default::default() }
    }

    #[test]
    fn influence_profile() {
        assert!((pointer_influence(0.0, 0.5, 0.01) + 0.02).abs() < 1e-7);
        assert_eq!(pointer_influence(0.5, 0.5, 0.01), 0.0);
        assert_eq!(pointer_influence(10.0, 0.5, 0.01), 0.0);
        let mid = pointer_influence(0.25, 0.5, 0.01);
        assert!((mid + 0.01).abs() < 1e-6);
    }

    #[test]
    fn cell_positions_are_centred() {
        let a = cell_position(0, 0, 4, 4.0);
        let b = cell_position(3, 3, 4, 4.0);
        assert_eq!(a, Vec2::new(-1.5, -1.5));
        assert_eq!(b, Vec2::new(1.5, 1.5));
    }

    #[test]
    fn wave_moves_height_into_prev() {
        let p = params(StencilKind::Wave);
        let mut read = HeightField::flat(8, 0.0);
        read.set_height(4, 4, 1.0);
        let mut write = HeightField::flat(8, 0.0);
        update(&read, &mut write, POINTER_SENTINEL, &p);

        assert_eq!(write.prev_height(4, 4), 1.0);
        // Centre: neighbours are 0, prev is 1 -> (0 - 1) * v.
        assert!((write.height(4, 4) + p.viscosity).abs() < 1e-6);
        // Neighbour: one raised neighbour -> 0.5 * v.
        assert!((write.height(5, 4) - 0.5 * p.viscosity).abs() < 1e-6);
    }

    #[test]
    fn diffuse_averages_neighbours() {
        let p = params(StencilKind::Diffuse);
        let mut read = HeightField::flat(8, 0.0);
        read.set_height(4, 4, 1.0);
        let mut write = HeightField::flat(8, 0.0);
        update(&read, &mut write, POINTER_SENTINEL, &p);

        assert_eq!(write.height(4, 4), 0.0);
        assert!((write.height(4, 5) - 0.25 * p.viscosity).abs() < 1e-6);
    }

    #[test]
    fn corner_reads_clamp_to_edge() {
        let p = SimulationParameters { viscosity: 1.0, ..params(StencilKind::Diffuse) };
        let mut read = HeightField::flat(8, 0.0);
        read.set_height(0, 0, 1.0);
        let mut write = HeightField::flat(8, 0.0);
        update(&read, &mut write, POINTER_SENTINEL, &p);

        // West and south neighbours of (0, 0) clamp back onto itself.
        assert!((write.height(0, 0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn pointer_depresses_the_cell_under_it() {
        let p = params(StencilKind::Wave);
        let read = HeightField::flat(8, 0.0);
        let mut write = HeightField::flat(8, 0.0);
        let at = cell_position(2, 5, 8, p.bounds);
        update(&read, &mut write, at, &p);

        assert!((write.height(2, 5) + 2.0 * p.depth).abs() < 1e-6);
        assert_eq!(write.height(7, 0), 0.0);
    }

    #[test]
    fn smoothing_averages_both_channels() {
        let mut read = HeightField::flat(8, 0.0);
        read.set_height(3, 3, 4.0);
        let mut write = HeightField::flat(8, 0.0);
        smooth(&read, &mut write);

        assert_eq!(write.height(3, 3), 0.0);
        assert_eq!(write.height(3, 4), 1.0);
        assert_eq!(write.prev_height(2, 3), 1.0);
    }
}
