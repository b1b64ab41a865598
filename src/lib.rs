pub mod config;
pub mod engine;
pub mod orrery;
pub mod scene;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, MouseEvent, Request, RequestInit, RequestMode, Response, WebGlRenderingContext, WheelEvent, Window};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use crate::config::OrreryConfig;
use crate::engine::renderer::Renderer;
use crate::orrery::{Controls, Orrery, Pointer};

const CONFIG_URL: &str = "assets/orrery.json";
const DEFAULT_CANVAS_ID: &str = "canvas";
/// Room left around the canvas for the page header and planet list.
const CANVAS_MARGIN: (f64, f64) = (25.0, 130.0);

struct App {
    orrery: Orrery,
    renderer: Renderer,
    canvas: HtmlCanvasElement,
    pointer: Pointer,
}

impl App {
    fn frame(&mut self) {
        let controls = CONTROLS.with(|c| c.borrow().clone());
        self.orrery.tick(&controls, &self.pointer);
        self.orrery.draw(&mut self.renderer);
    }

    fn resize(&mut self, window: &Window) {
        let (width, height) = canvas_size(window);
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.renderer.resize(width as i32, height as i32);
        self.pointer.canvas_width = width as f32;
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
    // Written by the page at any time, even before the scene is ready.
    static CONTROLS: RefCell<Controls> = RefCell::new(Controls::default());
    static STARTED: Cell<bool> = Cell::new(false);
}

/// Mark startup as begun. Only the first caller gets `true`, so a second
/// `init_orrery` never installs another loop or listener set.
fn claim_startup() -> bool {
    STARTED.with(|started| !started.replace(true))
}

fn release_startup() {
    STARTED.with(|started| started.set(false));
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|app| app.borrow_mut().as_mut().map(f))
}

#[wasm_bindgen]
pub async fn init_orrery(canvas_id: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if !claim_startup() {
        log::warn!("orrery: already initialized");
        return Ok(());
    }
    let result = start(canvas_id).await;
    if result.is_err() {
        release_startup();
    }
    result
}

async fn start(canvas_id: Option<String>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let canvas_id = canvas_id.unwrap_or_else(|| DEFAULT_CANVAS_ID.to_string());
    let canvas = document.get_element_by_id(&canvas_id)
        .ok_or("No canvas")?
        .dyn_into::<HtmlCanvasElement>()?;

    let gl = canvas
        .get_context("webgl")?
        .ok_or("No WebGL")?
        .dyn_into::<WebGlRenderingContext>()?;

    let mut renderer = Renderer::new(gl)?;

    let config = load_config(&window).await;
    let mut orrery = Orrery::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    orrery.scene_mut().assign_textures(|url| match renderer.load_texture(url) {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("texture {url}: request failed: {e:?}");
            None
        }
    });

    let mut app = App {
        orrery,
        renderer,
        canvas: canvas.clone(),
        pointer: Pointer::default(),
    };
    app.resize(&window);
    app.pointer.x = app.pointer.canvas_width / 2.0;

    let body_count = app.orrery.scene().bodies().len();
    APP.with(|cell| *cell.borrow_mut() = Some(app));

    install_listeners(&window, &canvas)?;
    start_loop();

    log::info!("orrery: initialized with {body_count} bodies");
    Ok(())
}

/// Fetch the optional scene override. Anything wrong with it is logged and
/// the built-in solar system is used instead.
async fn load_config(window: &Window) -> OrreryConfig {
    match fetch_config(window).await {
        Ok(Some(config)) => match config.validate() {
            Ok(()) => {
                log::info!("orrery: using {CONFIG_URL}");
                config
            }
            Err(e) => {
                log::warn!("orrery: {CONFIG_URL} rejected: {e}");
                OrreryConfig::default()
            }
        },
        Ok(None) => OrreryConfig::default(),
        Err(e) => {
            log::warn!("orrery: could not read {CONFIG_URL}: {e:?}");
            OrreryConfig::default()
        }
    }
}

async fn fetch_config(window: &Window) -> Result<Option<OrreryConfig>, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(CONFIG_URL, &opts)?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&request)).await?.dyn_into()?;
    if !resp.ok() {
        return Ok(None);
    }
    let json = JsFuture::from(resp.json()?).await?;
    let config = serde_wasm_bindgen::from_value(json)?;
    Ok(Some(config))
}

fn canvas_size(window: &Window) -> (u32, u32) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
    (
        (width - CANVAS_MARGIN.0).max(1.0) as u32,
        (height - CANVAS_MARGIN.1).max(1.0) as u32,
    )
}

fn install_listeners(window: &Window, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
        let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
        with_app(|app| {
            app.pointer.x = x;
            app.orrery.pointer_moved(x, y);
        });
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let on_down = Closure::wrap(Box::new(move |event: MouseEvent| {
        with_app(|app| app.orrery.pointer_down(event.offset_x() as f32, event.offset_y() as f32));
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref())?;
    on_down.forget();

    // On the window so releasing outside the canvas still ends the drag.
    let on_up = Closure::wrap(Box::new(move |_event: MouseEvent| {
        with_app(|app| app.orrery.pointer_up());
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref())?;
    on_up.forget();

    let on_wheel = Closure::wrap(Box::new(move |event: WheelEvent| {
        event.prevent_default();
        with_app(|app| app.orrery.wheel(event.delta_y() as f32));
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref())?;
    on_wheel.forget();

    let resize_window = window.clone();
    let on_resize = Closure::wrap(Box::new(move || {
        with_app(|app| app.resize(&resize_window));
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    Ok(())
}

fn start_loop() {
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        with_app(App::frame);
        if let Some(callback) = f.borrow().as_ref() {
            request_animation_frame(callback);
        }
    }) as Box<dyn FnMut()>));

    let callback = g.borrow();
    if let Some(callback) = callback.as_ref() {
        request_animation_frame(callback);
    }
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) {
    let Some(window) = web_sys::window() else { return };
    if let Err(e) = window.request_animation_frame(f.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
}

/// Point the camera at a body by name, or stop following with `None`.
#[wasm_bindgen]
pub fn select_body(name: Option<String>) {
    CONTROLS.with(|c| c.borrow_mut().selected_body = name);
}

#[wasm_bindgen]
pub fn selected_body() -> Option<String> {
    CONTROLS.with(|c| c.borrow().selected_body.clone())
}

/// Let the pointer's horizontal position scrub orbital speed.
#[wasm_bindgen]
pub fn set_interactive_speed(enabled: bool) {
    CONTROLS.with(|c| c.borrow_mut().interactive_speed = enabled);
}

#[wasm_bindgen]
pub fn set_show_orbits(visible: bool) {
    CONTROLS.with(|c| c.borrow_mut().show_orbits = visible);
}

/// Names the page can offer for selection, in draw order.
#[wasm_bindgen]
pub fn body_names() -> js_sys::Array {
    let names = js_sys::Array::new();
    with_app(|app| {
        for name in app.orrery.scene().body_names() {
            names.push(&JsValue::from_str(name));
        }
    });
    names
}

/// The active scene configuration as JSON.
#[wasm_bindgen]
pub fn export_config() -> Result<String, JsValue> {
    with_app(|app| app.orrery.config().to_json())
        .ok_or("Orrery not initialized")?
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
