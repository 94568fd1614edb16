use nalgebra::{Matrix4, Vector3};

use crate::engine::mesh::Mesh;
use super::Lighting;

/// Y rotation advance per frame tick, in radians. Unbounded by design.
pub const SPIN_RATE: f32 = 0.008;

const SPHERE_STACKS: u32 = 16;
const SPHERE_SLICES: u32 = 16;

/// A portfolio sphere. The mesh is a unit sphere with lighting baked into
/// its vertex colors; radius is applied in the model matrix.
pub struct Planet {
    pub mesh: Mesh,
    pub position_z: f32,
    pub radius: f32,
    pub rotation_y: f32,
}

impl Planet {
    pub fn new(color: [f32; 3], radius: f32, position_z: f32, lighting: &Lighting) -> Self {
        let mut mesh = Mesh::sphere(1.0, SPHERE_STACKS, SPHERE_SLICES, color[0], color[1], color[2]);
        lighting.bake_sphere(&mut mesh, &Vector3::new(0.0, 0.0, position_z));

        Planet { mesh, position_z, radius, rotation_y: 0.0 }
    }

    pub fn spin(&mut self) {
        self.rotation_y += SPIN_RATE;
    }

    pub fn model(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(0.0, 0.0, self.position_z))
            * Matrix4::from_euler_angles(0.0, self.rotation_y, 0.0)
            * Matrix4::new_scaling(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet() -> Planet {
        Planet::new([0.0, 0.0, 1.0], 2.5, 0.0, &Lighting::default())
    }

    #[test]
    fn rotation_advances_by_a_fixed_step() {
        let mut planet = planet();
        for n in 1..=100u32 {
            let before = planet.rotation_y;
            planet.spin();
            assert!((planet.rotation_y - before - SPIN_RATE).abs() < 1e-7);
            assert!((planet.rotation_y - n as f32 * SPIN_RATE).abs() < 1e-4);
        }
    }

    #[test]
    fn rotation_is_monotonic_and_unbounded() {
        let mut planet = planet();
        let mut prev = planet.rotation_y;
        for _ in 0..2000 {
            planet.spin();
            assert!(planet.rotation_y > prev);
            prev = planet.rotation_y;
        }
        // well past a full turn, no wraparound
        assert!(planet.rotation_y > 2.0 * std::f32::consts::PI);
    }

    #[test]
    fn model_places_the_planet_on_its_axis_offset() {
        let planet = Planet::new([1.0, 0.0, 0.0], 2.0, -32.0, &Lighting::default());
        let model = planet.model();
        let origin = model.transform_point(&nalgebra::Point3::origin());
        assert!((origin.z - -32.0).abs() < 1e-6);
        assert!(origin.x.abs() < 1e-6);
    }
}
