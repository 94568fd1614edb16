use nalgebra::{Matrix4, Point3, Vector3};

/// Wheel delta to travel units.
pub const SCROLL_SENSITIVITY: f32 = 0.02;
/// Fraction of the remaining distance covered per frame tick.
const EASE_FACTOR: f32 = 0.1;

const FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

// Eye stays at a fixed lateral offset; only Z travels.
const EYE_X: f32 = 6.0;
const EYE_Y: f32 = 4.0;
// The camera aims at a point this far ahead of itself, slightly raised.
const AIM_AHEAD: f32 = 10.0;
const AIM_Y: f32 = 1.0;

/// Camera travelling along the Z axis. Wheel input moves `target_z` inside
/// the travel bounds; each frame `current_z` eases toward it.
pub struct CameraRig {
    current_z: f32,
    target_z: f32,
    travel_min: f32,
    travel_max: f32,
    aspect: f32,
}

impl CameraRig {
    pub fn new(start_z: f32, travel_min: f32, travel_max: f32, aspect: f32) -> Self {
        CameraRig {
            current_z: start_z,
            target_z: start_z,
            travel_min,
            travel_max,
            aspect,
        }
    }

    /// Applies one wheel event. Every event is applied immediately; the
    /// result is clamped to the travel bounds.
    pub fn scroll(&mut self, delta_y: f32) {
        self.target_z += delta_y * SCROLL_SENSITIVITY;
        self.target_z = self.target_z.clamp(self.travel_min, self.travel_max);
    }

    /// One frame tick of exponential easing. Never overshoots: each tick
    /// covers a fixed fraction of the remaining distance.
    pub fn ease(&mut self) {
        self.current_z += (self.target_z - self.current_z) * EASE_FACTOR;
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.aspect = width / height;
    }

    pub fn current_z(&self) -> f32 {
        self.current_z
    }

    pub fn target_z(&self) -> f32 {
        self.target_z
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            &Point3::new(EYE_X, EYE_Y, self.current_z),
            &Point3::new(0.0, AIM_Y, self.current_z - AIM_AHEAD),
            &Vector3::y(),
        )
    }

    pub fn projection(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, FOV_Y, NEAR, FAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PLANET_SPACING, TRAVEL_MAX};

    const START_Z: f32 = 16.0;

    fn rig() -> CameraRig {
        CameraRig::new(START_Z, PLANET_SPACING * 3.0 - 5.0, TRAVEL_MAX, 16.0 / 9.0)
    }

    #[test]
    fn single_scroll_scales_delta_before_clamping() {
        let mut rig = rig();
        rig.scroll(-120.0);
        assert!((rig.target_z() - (START_Z - 120.0 * 0.02)).abs() < 1e-6);
    }

    #[test]
    fn target_stays_within_travel_bounds() {
        // Deterministic pseudo-random wheel deltas, both directions.
        let mut rig = rig();
        let mut seed: u32 = 0x2545_F491;
        for _ in 0..10_000 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let delta = (seed % 2001) as f32 - 1000.0;
            rig.scroll(delta);
            assert!(rig.target_z() >= PLANET_SPACING * 3.0 - 5.0);
            assert!(rig.target_z() <= TRAVEL_MAX);
        }
    }

    #[test]
    fn easing_is_idempotent_at_rest() {
        let mut rig = rig();
        for _ in 0..100 {
            rig.ease();
        }
        // current has long since converged numerically onto target
        let settled = rig.current_z();
        rig.ease();
        assert_eq!(rig.current_z(), settled);
    }

    #[test]
    fn easing_converges_geometrically() {
        let mut rig = rig();
        rig.scroll(-500.0); // target 16 - 10 = 6
        let z0 = START_Z;
        let z1 = rig.target_z();
        for n in 1..=50u32 {
            rig.ease();
            let expected = z1 - (z1 - z0) * 0.9f32.powi(n as i32);
            assert!(
                (rig.current_z() - expected).abs() < 1e-3,
                "tick {n}: {} vs {expected}",
                rig.current_z()
            );
        }
    }

    #[test]
    fn scroll_past_the_near_bound_clamps_to_it() {
        // Camera starts at 16; one big positive wheel would put the target
        // at 26 and must clamp to the 15 limit.
        let mut rig = rig();
        rig.scroll(500.0);
        assert_eq!(rig.target_z(), TRAVEL_MAX);
    }

    #[test]
    fn scroll_past_the_far_bound_clamps_to_it() {
        let mut rig = rig();
        rig.scroll(-10_000.0);
        assert_eq!(rig.target_z(), PLANET_SPACING * 3.0 - 5.0);
    }

    #[test]
    fn resize_updates_aspect_ratio() {
        let mut rig = rig();
        rig.set_aspect(1920.0, 1080.0);
        assert!((rig.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn view_follows_the_current_offset() {
        let mut rig = rig();
        rig.scroll(-500.0);
        rig.ease();
        let view = rig.view();
        // Transforming the eye point by the view matrix lands at the origin.
        let eye = Point3::new(EYE_X, EYE_Y, rig.current_z());
        let moved = view.transform_point(&eye);
        assert!(moved.coords.norm() < 1e-4);
    }
}
