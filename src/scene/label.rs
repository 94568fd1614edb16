use wasm_bindgen::prelude::*;
use web_sys::WebGlTexture;
use nalgebra::Vector3;

use crate::engine::renderer::Renderer;
use super::offscreen_canvas;

/// Height of a label above its planet's center.
pub const LABEL_HEIGHT: f32 = 3.5;
/// World-space size of the billboard; labels never resize with content.
const LABEL_SCALE: (f32, f32) = (8.0, 2.0);

const CANVAS_WIDTH: u32 = 512;
const CANVAS_HEIGHT: u32 = 128;
const FONT: &str = "48px Arial";
const TEXT_X: f64 = 20.0;

/// A short text string painted onto a transparent canvas and drawn as a
/// camera-facing billboard. Overflowing text is simply cut off by the
/// canvas edge.
pub struct LabelSprite {
    pub texture: WebGlTexture,
    pub position: Vector3<f32>,
    pub scale: (f32, f32),
}

impl LabelSprite {
    pub fn new(renderer: &Renderer, text: &str, position: Vector3<f32>) -> Result<Self, JsValue> {
        let (canvas, ctx) = offscreen_canvas(CANVAS_WIDTH, CANVAS_HEIGHT)?;

        ctx.set_fill_style_str("white");
        ctx.set_font(FONT);
        ctx.set_text_baseline("middle");
        ctx.fill_text(text, TEXT_X, f64::from(CANVAS_HEIGHT) / 2.0)?;

        let texture = renderer.create_canvas_texture(&canvas)?;

        Ok(LabelSprite { texture, position, scale: LABEL_SCALE })
    }
}
