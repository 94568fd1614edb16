pub mod camera;
pub mod content;
pub mod label;
pub mod panel;
pub mod planet;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use nalgebra::Vector3;

use crate::engine::mesh::{Mesh, FLOATS_PER_VERTEX};
use crate::engine::renderer::Renderer;
use camera::CameraRig;
use content::AppConfig;
use label::LabelSprite;
use panel::Panel;
use planet::Planet;

/// Z distance between consecutive planets (travel runs toward -Z).
pub const PLANET_SPACING: f32 = -16.0;
/// Near clamp of the camera target. The far clamp is derived from the
/// spacing; the asymmetry is tuned, keep it as is.
pub const TRAVEL_MAX: f32 = 15.0;
pub const CAMERA_START_Z: f32 = 16.0;

const PANEL_X: f32 = 8.0;
const PANEL_WIDTH: f32 = 10.0;

/// One ambient term plus one point light, baked into sphere vertex colors
/// at build time. Panels and labels are unlit.
pub struct Lighting {
    pub ambient: [f32; 3],
    pub position: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Lighting {
            ambient: [0.333, 0.333, 0.333],
            position: Vector3::new(10.0, 10.0, 10.0),
            color: [1.0, 1.0, 1.0],
            intensity: 1.5,
        }
    }
}

impl Lighting {
    /// Lambert shading for a surface normal on a sphere centered at
    /// `center`, as a per-channel multiplier.
    pub fn shade(&self, normal: &Vector3<f32>, center: &Vector3<f32>) -> [f32; 3] {
        let to_light = (self.position - center).normalize();
        let diffuse = normal.dot(&to_light).max(0.0) * self.intensity;
        [
            self.ambient[0] + self.color[0] * diffuse,
            self.ambient[1] + self.color[1] * diffuse,
            self.ambient[2] + self.color[2] * diffuse,
        ]
    }

    /// Multiplies the vertex colors of a unit sphere mesh by the shading
    /// term. Sphere vertices double as their own normals.
    pub fn bake_sphere(&self, mesh: &mut Mesh, center: &Vector3<f32>) {
        for v in mesh.vertices.chunks_exact_mut(FLOATS_PER_VERTEX) {
            let normal = Vector3::new(v[0], v[1], v[2]).normalize();
            let shade = self.shade(&normal, center);
            for c in 0..3 {
                v[3 + c] = (v[3 + c] * shade[c]).min(1.0);
            }
        }
    }
}

pub struct Scene {
    renderer: Renderer,
    camera: CameraRig,
    planets: Vec<Planet>,
    labels: Vec<LabelSprite>,
    panels: Vec<Panel>,
}

impl Scene {
    pub fn new(renderer: Renderer, config: &AppConfig, aspect: f32) -> Result<Self, JsValue> {
        let lighting = Lighting::default();

        let mut planets = Vec::new();
        let mut labels = Vec::new();
        let mut panels = Vec::new();

        for (i, section) in config.sections.iter().enumerate() {
            let z = i as f32 * PLANET_SPACING;

            planets.push(Planet::new(section.color, section.radius, z, &lighting));
            labels.push(LabelSprite::new(
                &renderer,
                &section.label,
                Vector3::new(0.0, label::LABEL_HEIGHT, z),
            )?);

            let panel = Panel::new(
                &renderer,
                Vector3::new(PANEL_X, 0.0, z),
                PANEL_WIDTH,
                section.panel_height,
                |ctx| content::paint_section(ctx, section),
            )?;
            if let Some(image) = &section.image {
                panel.load_image(image)?;
            }
            panels.push(panel);
        }

        let camera = CameraRig::new(
            CAMERA_START_Z,
            PLANET_SPACING * 3.0 - 5.0,
            TRAVEL_MAX,
            aspect,
        );

        Ok(Scene { renderer, camera, planets, labels, panels })
    }

    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    /// One frame tick: ease the camera, spin the planets, pick up any panel
    /// whose canvas was repainted since the last tick.
    pub fn update(&mut self) {
        self.camera.ease();
        for planet in &mut self.planets {
            planet.spin();
        }
        for panel in &self.panels {
            if let Err(err) = panel.flush(&self.renderer) {
                log::warn!("panel texture update failed: {err:?}");
            }
        }
    }

    pub fn render(&self, width: i32, height: i32) {
        let renderer = &self.renderer;
        renderer.resize(width, height);
        renderer.clear(0.0, 0.0, 0.0);
        renderer.enable_depth_test();

        let projection = self.camera.projection();
        let view = self.camera.view();

        for planet in &self.planets {
            renderer.draw_mesh(&planet.mesh, &planet.model(), &projection, &view, None);
        }

        renderer.enable_blend();
        for panel in &self.panels {
            renderer.draw_mesh(&panel.mesh, &panel.model(), &projection, &view, Some(&panel.texture));
        }
        for sprite in &self.labels {
            renderer.draw_sprite(
                &sprite.texture,
                &sprite.position,
                sprite.scale.0,
                sprite.scale.1,
                &projection,
                &view,
            );
        }
        renderer.disable_blend();
    }
}

pub(crate) fn offscreen_canvas(width: u32, height: u32) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = canvas
        .get_context("2d")?
        .ok_or("No 2d context")?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((canvas, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_bounds_preserve_the_tuned_asymmetry() {
        assert_eq!(PLANET_SPACING * 3.0 - 5.0, -53.0);
        assert_eq!(TRAVEL_MAX, 15.0);
    }

    #[test]
    fn shading_peaks_toward_the_light() {
        let lighting = Lighting::default();
        let center = Vector3::new(0.0, 0.0, 0.0);
        let toward = lighting.shade(&Vector3::new(10.0f32, 10.0, 10.0).normalize(), &center);
        let away = lighting.shade(&Vector3::new(-10.0f32, -10.0, -10.0).normalize(), &center);
        assert!(toward[0] > away[0]);
        // The far side keeps only the ambient term.
        assert!((away[0] - lighting.ambient[0]).abs() < 1e-6);
    }

    #[test]
    fn baked_colors_stay_in_range() {
        let lighting = Lighting::default();
        let mut mesh = Mesh::sphere(1.0, 16, 16, 0.9, 0.9, 0.2);
        lighting.bake_sphere(&mut mesh, &Vector3::new(0.0, 0.0, -16.0));
        for v in mesh.vertices.chunks_exact(FLOATS_PER_VERTEX) {
            for c in 3..6 {
                assert!((0.0..=1.0).contains(&v[c]));
            }
        }
    }
}
