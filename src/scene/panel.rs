use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, WebGlTexture};
use nalgebra::{Matrix4, Vector3};

use crate::engine::mesh::Mesh;
use crate::engine::renderer::Renderer;
use super::content::ImageConfig;
use super::offscreen_canvas;

const CANVAS_WIDTH: u32 = 1024;
const CANVAS_HEIGHT: u32 = 512;
const BACKGROUND: &str = "#222";

/// A flat information board beside a planet: an offscreen canvas painted
/// once at startup, uploaded as the texture of a double-sided rectangle.
///
/// The canvas and 2D context stay live so the decorative image can be drawn
/// in after its asynchronous load; the `onload` closure only repaints and
/// sets the dirty flag, and the frame tick performs the GPU re-upload, so
/// all texture writes happen from the render loop.
pub struct Panel {
    pub mesh: Mesh,
    pub position: Vector3<f32>,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub texture: WebGlTexture,
    dirty: Rc<Cell<bool>>,
}

impl Panel {
    pub fn new(
        renderer: &Renderer,
        position: Vector3<f32>,
        width: f32,
        height: f32,
        paint: impl FnOnce(&CanvasRenderingContext2d) -> Result<(), JsValue>,
    ) -> Result<Self, JsValue> {
        let (canvas, ctx) = offscreen_canvas(CANVAS_WIDTH, CANVAS_HEIGHT)?;

        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, f64::from(CANVAS_WIDTH), f64::from(CANVAS_HEIGHT));
        paint(&ctx)?;

        let texture = renderer.create_canvas_texture(&canvas)?;
        let mesh = Mesh::plane(width, height);

        Ok(Panel {
            mesh,
            position,
            canvas,
            ctx,
            texture,
            dirty: Rc::new(Cell::new(false)),
        })
    }

    pub fn model(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
    }

    /// Starts the one decorative image load, fire-and-forget. On load the
    /// image is drawn onto the panel canvas and the texture marked dirty;
    /// on failure the panel simply keeps its painted content.
    pub fn load_image(&self, image: &ImageConfig) -> Result<(), JsValue> {
        let img = HtmlImageElement::new()?;
        img.set_cross_origin(Some("anonymous"));

        let ctx = self.ctx.clone();
        let dirty = Rc::clone(&self.dirty);
        let img_clone = img.clone();
        let place = image.clone();

        let onload = Closure::wrap(Box::new(move || {
            let drawn = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &img_clone, place.x, place.y, place.width, place.height,
            );
            if drawn.is_ok() {
                dirty.set(true);
            }
        }) as Box<dyn FnMut()>);
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let path = image.path.clone();
        let onerror = Closure::wrap(Box::new(move || {
            log::warn!("decorative image {path} failed to load");
        }) as Box<dyn FnMut()>);
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        img.set_src(&image.path);
        Ok(())
    }

    /// Consumes the dirty flag; re-uploads the canvas if the asynchronous
    /// repaint landed since the last tick.
    pub fn flush(&self, renderer: &Renderer) -> Result<(), JsValue> {
        if self.dirty.take() {
            renderer.update_canvas_texture(&self.texture, &self.canvas)?;
        }
        Ok(())
    }
}
