//! Perlin gradient noise.

use glint_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::sampling::random_vec3;

const POINT_COUNT: usize = 256;

/// Lattice gradient noise with per-axis permutation tables.
pub struct Perlin {
    gradients: Box<[Vec3; POINT_COUNT]>,
    perm_x: [u8; POINT_COUNT],
    perm_y: [u8; POINT_COUNT],
    perm_z: [u8; POINT_COUNT],
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let mut gradients = Box::new([Vec3::ZERO; POINT_COUNT]);
        for g in gradients.iter_mut() {
            *g = loop {
                let v = random_vec3(rng, -1.0, 1.0);
                if v.length_squared() > 1e-12 {
                    break v.normalize();
                }
            };
        }

        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Noise value at `p`, roughly in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let (u, v, w) = (p.x - floor.x, p.y - floor.y, p.z - floor.z);
        let (i, j, k) = (floor.x as i32, floor.y as i32, floor.z as i32);

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize];
                    *cell = self.gradients[idx as usize];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves, each at half the weight and twice the frequency.
    pub fn turbulence(&self, p: Vec3, depth: usize) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

fn generate_perm(rng: &mut dyn RngCore) -> [u8; POINT_COUNT] {
    let mut perm = [0u8; POINT_COUNT];
    for (i, p) in perm.iter_mut().enumerate() {
        *p = i as u8;
    }
    perm.shuffle(rng);
    perm
}

/// Trilinear blend of the corner gradients' dot products, Hermite smoothed.
fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        let fi = i as f32;
        for (j, row) in plane.iter().enumerate() {
            let fj = j as f32;
            for (k, gradient) in row.iter().enumerate() {
                let fk = k as f32;
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight);
            }
        }
    }
    accum
}
