pub mod engine;
pub mod scene;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, Request, RequestInit, RequestMode, Response, WebGlRenderingContext, WheelEvent};
use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::renderer::Renderer;
use crate::scene::content::AppConfig;
use crate::scene::Scene;

const CONFIG_PATH: &str = "assets/config.json";

thread_local! {
    static SCENE: RefCell<Option<Scene>> = RefCell::new(None);
}

#[wasm_bindgen]
pub async fn init_app() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let canvas = document.get_element_by_id("canvas")
        .ok_or("No canvas")?
        .dyn_into::<HtmlCanvasElement>()?;

    let width = window.inner_width()?.as_f64().ok_or("Bad viewport width")?;
    let height = window.inner_height()?.as_f64().ok_or("Bad viewport height")?;
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);

    let gl = canvas
        .get_context("webgl")?
        .ok_or("No WebGL")?
        .dyn_into::<WebGlRenderingContext>()?;

    let renderer = Renderer::new(gl)?;

    // Section content is overridable from assets/config.json; anything
    // missing or malformed falls back to the compiled-in portfolio.
    let config = match fetch_config(&window).await {
        Some(config) => config,
        None => {
            log::info!("using built-in portfolio content");
            AppConfig::default()
        }
    };

    let scene = Scene::new(renderer, &config, (width / height) as f32)?;
    SCENE.with(|s| *s.borrow_mut() = Some(scene));
    log::info!("scene ready with {} sections", config.sections.len());

    // Scroll moves the camera target along the travel axis.
    let closure = Closure::wrap(Box::new(move |event: WheelEvent| {
        SCENE.with(|s| {
            if let Some(scene) = s.borrow_mut().as_mut() {
                scene.camera_mut().scroll(event.delta_y() as f32);
            }
        });
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref())?;
    closure.forget();

    // Resize keeps the backing surface and aspect ratio matched to the
    // viewport.
    let resize_window = window.clone();
    let resize_canvas = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        let width = resize_window.inner_width().ok().and_then(|v| v.as_f64());
        let height = resize_window.inner_height().ok().and_then(|v| v.as_f64());
        let (Some(width), Some(height)) = (width, height) else { return };

        resize_canvas.set_width(width as u32);
        resize_canvas.set_height(height as u32);
        SCENE.with(|s| {
            if let Some(scene) = s.borrow_mut().as_mut() {
                scene.camera_mut().set_aspect(width as f32, height as f32);
            }
        });
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();

    // Frame loop
    let f = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        SCENE.with(|s| {
            if let Some(scene) = s.borrow_mut().as_mut() {
                scene.update();
                scene.render(canvas.width() as i32, canvas.height() as i32);
            }
        });
        request_animation_frame(f.borrow().as_ref().unwrap());
    }) as Box<dyn FnMut()>));

    request_animation_frame(g.borrow().as_ref().unwrap());

    Ok(())
}

async fn fetch_config(window: &web_sys::Window) -> Option<AppConfig> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(CONFIG_PATH, &opts).ok()?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await.ok()?;
    let resp: Response = resp_value.dyn_into().ok()?;
    if !resp.ok() {
        return None;
    }
    let json = JsFuture::from(resp.json().ok()?).await.ok()?;
    serde_wasm_bindgen::from_value(json).ok()
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) {
    web_sys::window()
        .unwrap()
        .request_animation_frame(f.as_ref().unchecked_ref())
        .unwrap();
}
