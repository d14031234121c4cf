/// Pinview Web - WASM frontend drawing to a 2D canvas context
///
/// The host page owns the canvas element and forwards raw pointer events;
/// everything else (hit testing, drag state, projection, drawing) happens
/// here.

use nalgebra::Point2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use pinview_core::{DragSession, Scene};

/// Setup browser logging and readable panic messages.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(())
}

/// The interactive figure: a demo scene bound to one canvas element.
#[wasm_bindgen]
pub struct WebApp {
    scene: Scene,
    drag: Option<DragSession>,
    ctx: CanvasRenderingContext2d,
}

#[wasm_bindgen]
impl WebApp {
    /// Bind the demo scene to the canvas with the given element id and draw
    /// the initial frame.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebApp, JsValue> {
        let document = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas element not found"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("element is not a canvas"))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("context is not 2d"))?;

        let app = WebApp {
            scene: Scene::demo(),
            drag: None,
            ctx,
        };
        app.render()?;
        Ok(app)
    }

    /// Pointer pressed at canvas coordinates; starts a drag if a ball is hit.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag = DragSession::begin(&self.scene, Point2::new(x, y));
    }

    /// Pointer moved; forwards the drag into the scene and redraws.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        let Some(drag) = self.drag else {
            return Ok(());
        };
        if let Err(err) = drag.apply(&mut self.scene, Point2::new(x, y)) {
            // The ball keeps its (clamped) position; it just has no drawable
            // projection until it is dragged back out.
            log::warn!("drag update not drawable: {err}");
        }
        self.render()
    }

    /// Pointer released; ends the drag gesture.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Redraw the whole figure from current scene state.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let bounds = self.scene.bounds();
        ctx.clear_rect(0.0, 0.0, bounds.width, bounds.height);

        // Screen baseline at half opacity
        let screen = *self.scene.screen();
        ctx.set_global_alpha(0.5);
        ctx.set_stroke_style_str("#000000");
        ctx.set_line_width(1.0);
        ctx.begin_path();
        ctx.move_to(screen.left(), screen.y());
        ctx.line_to(screen.right(), screen.y());
        ctx.stroke();
        ctx.set_global_alpha(1.0);

        for view in self.scene.frame() {
            let color = view.object.color.hex();

            // Viewing cone, drawn before the ball so it never covers it
            ctx.set_global_alpha(0.3);
            ctx.set_fill_style_str(&color);
            ctx.begin_path();
            ctx.move_to(view.cone.apex.x, view.cone.apex.y);
            ctx.line_to(view.cone.tangent1.x, view.cone.tangent1.y);
            ctx.line_to(view.cone.tangent2.x, view.cone.tangent2.y);
            ctx.close_path();
            ctx.fill();
            ctx.set_global_alpha(1.0);

            // The ball itself
            ctx.begin_path();
            ctx.arc(
                view.object.position.x,
                view.object.position.y,
                view.object.radius,
                0.0,
                std::f64::consts::TAU,
            )?;
            ctx.fill();

            // Its 1D image on the screen line
            if view.image.visible {
                ctx.set_stroke_style_str(&color);
                ctx.set_line_width(4.0);
                ctx.begin_path();
                ctx.move_to(view.image.x1, screen.y());
                ctx.line_to(view.image.x2, screen.y());
                ctx.stroke();
            }
        }

        // Camera glyph and labels
        let camera = *self.scene.camera();
        ctx.set_fill_style_str("#000000");
        ctx.begin_path();
        ctx.arc(
            camera.position.x,
            camera.position.y,
            camera.radius,
            0.0,
            std::f64::consts::TAU,
        )?;
        ctx.fill();
        ctx.fill_text(
            "camera",
            camera.position.x + camera.radius + 20.0,
            camera.position.y,
        )?;
        ctx.fill_text("screen", screen.right() + 20.0, screen.y())?;

        Ok(())
    }
}
