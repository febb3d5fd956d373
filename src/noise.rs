//! Classic 3D gradient noise shared by the CPU evaluator and `shader.wgsl`.
//!
//! The lattice repeats every 289 cells on each axis. Hashing goes through a
//! fixed permutation `p(v) = (34v² + v) mod 289`, gradients come from a 7×7
//! octahedral layout, and corners are blended with the quintic fade curve.
//! Every step is done in `f32`, in the same order as the shader, so both
//! sides agree on the surface.

use noise::NoiseFn;

/// Lattice period on every axis.
pub const PERIOD: u32 = 289;

/// Output scale applied after trilinear blending (brings the range to ~[-1, 1]).
const OUTPUT_SCALE: f32 = 2.2;

const fn build_permutation() -> [u16; PERIOD as usize] {
    let mut table = [0u16; PERIOD as usize];
    let mut v = 0;
    while v < PERIOD as usize {
        table[v] = (((34 * v + 1) * v) % PERIOD as usize) as u16;
        v += 1;
    }
    table
}

/// Hash permutation over `0..PERIOD`.
pub static PERMUTATION: [u16; PERIOD as usize] = build_permutation();

#[inline]
fn permute(v: u32) -> u32 {
    PERMUTATION[(v % PERIOD) as usize] as u32
}

/// Split a coordinate into its wrapped lattice cell and fractional offset.
#[inline]
fn lattice(coord: f32) -> (u32, f32) {
    let cell = coord.floor();
    let wrapped = (cell as i64).rem_euclid(PERIOD as i64) as u32;
    (wrapped, coord - cell)
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[inline]
fn fract(v: f32) -> f32 {
    v - v.floor()
}

/// Normalised gradient for a hashed corner.
fn gradient(hash: u32) -> [f32; 3] {
    let scaled = hash as f32 / 7.0;
    let mut gy = fract(scaled.floor() / 7.0) - 0.5;
    let mut gx = fract(scaled);
    let gz = 0.5 - gx.abs() - gy.abs();

    // Fold the lower half of the octahedron back onto the upper half
    if gz <= 0.0 {
        gx -= if gx < 0.0 { -0.5 } else { 0.5 };
        gy -= if gy < 0.0 { -0.5 } else { 0.5 };
    }

    let norm = 1.792_842_9 - 0.853_734_7 * (gx * gx + gy * gy + gz * gz);
    [gx * norm, gy * norm, gz * norm]
}

/// Sample classic gradient noise at `(x, y, z)`.
///
/// Deterministic and continuously differentiable, exactly zero on integer
/// lattice points, and periodic with [`PERIOD`]. Non-finite input yields a
/// non-finite result instead of panicking.
pub fn classic_noise3(x: f32, y: f32, z: f32) -> f32 {
    let (x0, fx0) = lattice(x);
    let (y0, fy0) = lattice(y);
    let (z0, fz0) = lattice(z);
    let (x1, y1, z1) = ((x0 + 1) % PERIOD, (y0 + 1) % PERIOD, (z0 + 1) % PERIOD);
    let (fx1, fy1, fz1) = (fx0 - 1.0, fy0 - 1.0, fz0 - 1.0);

    let corner = |xi: u32, yi: u32, zi: u32, px: f32, py: f32, pz: f32| {
        let g = gradient(permute(permute(permute(xi) + yi) + zi));
        g[0] * px + g[1] * py + g[2] * pz
    };

    let n000 = corner(x0, y0, z0, fx0, fy0, fz0);
    let n100 = corner(x1, y0, z0, fx1, fy0, fz0);
    let n010 = corner(x0, y1, z0, fx0, fy1, fz0);
    let n110 = corner(x1, y1, z0, fx1, fy1, fz0);
    let n001 = corner(x0, y0, z1, fx0, fy0, fz1);
    let n101 = corner(x1, y0, z1, fx1, fy0, fz1);
    let n011 = corner(x0, y1, z1, fx0, fy1, fz1);
    let n111 = corner(x1, y1, z1, fx1, fy1, fz1);

    let (u, v, w) = (fade(fx0), fade(fy0), fade(fz0));

    let nz = [
        mix(n000, n001, w),
        mix(n100, n101, w),
        mix(n010, n011, w),
        mix(n110, n111, w),
    ];
    let ny = [mix(nz[0], nz[2], v), mix(nz[1], nz[3], v)];

    OUTPUT_SCALE * mix(ny[0], ny[1], u)
}

/// [`classic_noise3`] behind the `noise` crate's sampling trait, so it can be
/// swapped with the crate's own generators in previews.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicNoise;

impl NoiseFn<f64, 3> for ClassicNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        classic_noise3(point[0] as f32, point[1] as f32, point[2] as f32) as f64
    }
}
