//! Browser surface: a 2D canvas backend and a `requestAnimationFrame` loop around the
//! animation driver.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use glam::Vec2;
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::{
    animation::{AnimationDriver, CancelHandle, FrameSlot, GemSequence},
    clock::SystemClock,
    config::GemConfig,
    palette::Color,
    pillar::PillarCode,
    presets,
    raster::{DrawBackend, GradientStop, LinearGradient, RadialGradient},
};

fn init_logging() {
    console_error_panic_hook::set_once();
    // A second canvas on the page finds the logger already installed.
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
}

pub struct CanvasBackend {
    ctx: CanvasRenderingContext2d,
    size: f32,
    clipped: bool,
}

impl CanvasBackend {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2D canvas context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            size: canvas.width() as f32,
            clipped: false,
        })
    }

    fn trace(&self, triangle: &[Vec2; 3]) {
        let [a, b, c] = triangle;
        self.ctx.move_to(a.x as f64, a.y as f64);
        self.ctx.line_to(b.x as f64, b.y as f64);
        self.ctx.line_to(c.x as f64, c.y as f64);
        self.ctx.close_path();
    }

    fn add_stops(gradient: &CanvasGradient, stops: &[GradientStop]) {
        for stop in stops {
            if let Err(err) = gradient.add_color_stop(stop.offset, &stop.color.to_css()) {
                log::warn!("rejected gradient stop {:?}: {err:?}", stop.color);
            }
        }
    }
}

impl DrawBackend for CanvasBackend {
    fn size(&self) -> f32 {
        self.size
    }

    fn clear(&mut self) {
        self.reset_clip();
        let size = self.size as f64;
        self.ctx.clear_rect(0.0, 0.0, size, size);
    }

    fn fill_triangle(&mut self, triangle: [Vec2; 3], gradient: &LinearGradient, alpha: f32) {
        let fill = self.ctx.create_linear_gradient(
            gradient.start.x as f64,
            gradient.start.y as f64,
            gradient.end.x as f64,
            gradient.end.y as f64,
        );
        Self::add_stops(&fill, &gradient.stops);

        self.ctx.begin_path();
        self.trace(&triangle);
        self.ctx.set_fill_style(&fill.into());
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.fill();
        self.ctx.set_global_alpha(1.0);
    }

    fn stroke_triangle(&mut self, triangle: [Vec2; 3], color: Color, width: f32, alpha: f32) {
        self.ctx.begin_path();
        self.trace(&triangle);
        self.ctx
            .set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.ctx.set_line_width(width as f64);
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.stroke();
        self.ctx.set_global_alpha(1.0);
    }

    fn radial_glow(&mut self, gradient: &RadialGradient, alpha: f32) {
        let fill = match self.ctx.create_radial_gradient(
            gradient.inner_center.x as f64,
            gradient.inner_center.y as f64,
            gradient.inner_radius as f64,
            gradient.outer_center.x as f64,
            gradient.outer_center.y as f64,
            gradient.outer_radius as f64,
        ) {
            Ok(fill) => fill,
            Err(err) => {
                log::warn!("radial gradient rejected: {err:?}");
                return;
            }
        };
        Self::add_stops(&fill, &gradient.stops);

        let size = self.size as f64;
        self.ctx.set_fill_style(&fill.into());
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.fill_rect(0.0, 0.0, size, size);
        self.ctx.set_global_alpha(1.0);
    }

    fn clip_to_triangles(&mut self, triangles: &[[Vec2; 3]]) {
        self.reset_clip();
        self.ctx.save();
        self.ctx.begin_path();
        triangles.iter().for_each(|triangle| self.trace(triangle));
        self.ctx.clip();
        self.clipped = true;
    }

    fn reset_clip(&mut self) {
        if self.clipped {
            self.ctx.restore();
            self.clipped = false;
        }
    }
}

struct Scene {
    driver: AnimationDriver<SystemClock>,
    backend: CanvasBackend,
}

type FrameCallback = FrameSlot<Closure<dyn FnMut()>>;

fn request_frame(callback: &FrameCallback) -> Option<i32> {
    let window = web_sys::window()?;
    let queued = callback.with(|callback| {
        window.request_animation_frame(callback.as_ref().unchecked_ref())
    })?;
    match queued {
        Ok(id) => Some(id),
        Err(err) => {
            log::warn!("requestAnimationFrame failed: {err:?}");
            None
        }
    }
}

/// An animated gem bound to a canvas element.
#[wasm_bindgen]
pub struct GemCanvas {
    scene: Rc<RefCell<Scene>>,
    cancel: CancelHandle,
    frame_id: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
    running: Cell<bool>,
}

impl GemCanvas {
    fn with_sequence(canvas: HtmlCanvasElement, sequence: GemSequence) -> Result<GemCanvas, JsValue> {
        let backend = CanvasBackend::new(&canvas)?;
        let config = GemConfig {
            canvas_size: canvas.width(),
            ..Default::default()
        };
        let driver = AnimationDriver::new(config, sequence, SystemClock::new());
        let cancel = driver.cancel_handle();

        Ok(Self {
            scene: Rc::new(RefCell::new(Scene { driver, backend })),
            cancel,
            frame_id: Rc::new(Cell::new(None)),
            callback: FrameSlot::new(),
            running: Cell::new(false),
        })
    }
}

#[wasm_bindgen]
impl GemCanvas {
    /// `pillars` is a whitespace or comma separated list such as `"甲子 丙寅"`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, pillars: &str) -> Result<GemCanvas, JsValue> {
        init_logging();
        let pillars = pillars
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .map(PillarCode::parse)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Self::with_sequence(canvas, GemSequence::from_pillars(pillars))
    }

    /// The five-archetype wireframe loop.
    pub fn forge(canvas: HtmlCanvasElement) -> Result<GemCanvas, JsValue> {
        init_logging();
        Self::with_sequence(canvas, presets::forge_sequence())
    }

    /// Starts the frame loop. Does nothing if already running or stopped.
    pub fn start(&self) {
        if self.running.replace(true) || self.cancel.is_cancelled() {
            return;
        }

        let next = self.callback.clone();
        let scene = self.scene.clone();
        let cancel = self.cancel.clone();
        let frame_id = self.frame_id.clone();

        self.callback.set(Closure::wrap(Box::new(move || {
            if cancel.is_cancelled() {
                frame_id.set(None);
                return;
            }
            {
                let mut scene = scene.borrow_mut();
                let Scene { driver, backend } = &mut *scene;
                driver.frame(backend);
            }
            frame_id.set(request_frame(&next));
        }) as Box<dyn FnMut()>));

        self.frame_id.set(request_frame(&self.callback));
    }

    /// Stops the loop for good, including a frame that is already queued, and frees the
    /// callback together with the scene it holds.
    pub fn stop(&self) {
        self.cancel.cancel();
        let mut idle = true;
        if let Some(id) = self.frame_id.take() {
            idle = match web_sys::window().map(|window| window.cancel_animation_frame(id)) {
                Some(Ok(())) => true,
                Some(Err(err)) => {
                    log::warn!("cancelAnimationFrame failed: {err:?}");
                    false
                }
                None => false,
            };
        }
        // a frame that is still queued must find its closure alive
        if idle {
            drop(self.callback.release());
        }
    }

    #[wasm_bindgen(js_name = setLift)]
    pub fn set_lift(&self, lift: f32) {
        self.scene.borrow_mut().driver.set_lift(lift);
    }
}

impl Drop for GemCanvas {
    fn drop(&mut self) {
        self.stop();
    }
}
