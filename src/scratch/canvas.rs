//! Browser backend: canvas-backed surface plus the DOM wiring that feeds the
//! engine pointer, resize and reset events.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, PointerEvent, window,
};

use super::{RevealPresenter, ScratchCard, ScratchConfig, ScratchSurface};
use crate::confetti::ConfettiBurst;
use crate::rand::Lcg;

const COVER_SPECKLES: u32 = 2200;
const INITIAL_LAYOUT_DELAY_MS: i32 = 60;
const RESIZE_DEBOUNCE_MS: i32 = 120;

/// Canvas occlusion raster. Drawing happens in CSS pixels through a
/// device-pixel-ratio transform; after the cover paints, the context stays in
/// destination-out mode with an opaque brush, so a draw call only ever lowers
/// alpha.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
    css_width: f64,
    css_height: f64,
    rng: Lcg,
}

impl CanvasSurface {
    /// Wrap `canvas`. A missing 2d context leaves the surface permanently
    /// inert: every operation no-ops and the rest of the page keeps working.
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let ctx = acquire_context(&canvas);
        if ctx.is_none() {
            web_sys::console::warn_1(&"scratch card: no 2d context, card disabled".into());
        }
        Self {
            canvas,
            ctx,
            css_width: 0.0,
            css_height: 0.0,
            rng: crate::rand::seeded(),
        }
    }
}

fn acquire_context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    // Coverage sampling reads pixels back after every stroke.
    let opts = js_sys::Object::new();
    js_sys::Reflect::set(&opts, &"willReadFrequently".into(), &JsValue::TRUE).ok()?;
    canvas
        .get_context_with_context_options("2d", &opts)
        .ok()
        .flatten()?
        .dyn_into()
        .ok()
}

impl ScratchSurface for CanvasSurface {
    fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> bool {
        let Some(ctx) = self.ctx.clone() else {
            return false;
        };
        let pw = (css_width * pixel_ratio).floor();
        let ph = (css_height * pixel_ratio).floor();
        if pw < 1.0 || ph < 1.0 {
            return false;
        }
        self.canvas.set_width(pw as u32);
        self.canvas.set_height(ph as u32);
        self.css_width = css_width;
        self.css_height = css_height;
        // Draw in CSS pixel units from here on.
        ctx.set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0)
            .ok();
        true
    }

    fn logical_size(&self) -> (f64, f64) {
        (self.css_width, self.css_height)
    }

    fn paint_cover(&mut self) {
        let Some(ctx) = self.ctx.clone() else {
            return;
        };
        let (w, h) = (self.css_width, self.css_height);

        ctx.set_global_composite_operation("source-over").ok();
        ctx.clear_rect(0.0, 0.0, w, h);

        // Opaque foil gradient; decorative only, but it must be fully opaque
        // or the card shows through before any scratching.
        let g = ctx.create_linear_gradient(0.0, 0.0, w, h);
        g.add_color_stop(0.0, "rgba(120,120,130,1)").ok();
        g.add_color_stop(0.5, "rgba(210,210,220,1)").ok();
        g.add_color_stop(1.0, "rgba(110,110,125,1)").ok();
        ctx.set_fill_style_canvas_gradient(&g);
        ctx.fill_rect(0.0, 0.0, w, h);

        // Foil speckles
        for _ in 0..COVER_SPECKLES {
            let alpha = self.rng.next_unit() * 0.12;
            let x = self.rng.next_unit() * w;
            let y = self.rng.next_unit() * h;
            ctx.set_fill_style_str(&format!("rgba(255,255,255,{alpha:.3})"));
            ctx.fill_rect(x, y, 1.0, 1.0);
        }

        // Hint text on the cover
        ctx.set_fill_style_str("rgba(0,0,0,0.35)");
        ctx.set_font("800 28px system-ui, -apple-system, Segoe UI, Roboto, Arial");
        ctx.set_text_align("center");
        ctx.fill_text("Scratch here ✨", w / 2.0, h / 2.0 - 6.0).ok();
        ctx.set_font("600 14px system-ui, -apple-system, Segoe UI, Roboto, Arial");
        ctx.fill_text("Use mouse / finger", w / 2.0, h / 2.0 + 20.0)
            .ok();

        // Switch to erase mode with an opaque brush: destination-out with a
        // translucent fill would only thin the cover per pass.
        ctx.set_global_composite_operation("destination-out").ok();
        ctx.set_fill_style_str("rgba(0,0,0,1)");
    }

    fn erase_circle(&mut self, x: f64, y: f64, radius: f64) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        ctx.begin_path();
        ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU).ok();
        ctx.fill();
    }

    fn clear_all(&mut self) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        ctx.set_global_composite_operation("destination-out").ok();
        ctx.set_fill_style_str("rgba(0,0,0,1)");
        ctx.fill_rect(0.0, 0.0, self.css_width, self.css_height);
    }

    fn cleared_fraction(&self, stride: u32, alpha_cutoff: u8) -> f64 {
        let Some(ctx) = &self.ctx else {
            return 0.0;
        };
        let pw = self.canvas.width() as usize;
        let ph = self.canvas.height() as usize;
        if pw == 0 || ph == 0 {
            return 0.0;
        }
        let Ok(image) = ctx.get_image_data(0.0, 0.0, pw as f64, ph as f64) else {
            return 0.0;
        };
        let data = image.data();
        let step = stride.max(1) as usize;
        let row = pw * 4;
        let mut cleared = 0usize;
        let mut total = 0usize;
        let mut y = 0usize;
        while y < ph {
            let mut x = 0usize;
            while x < pw {
                total += 1;
                if data[y * row + x * 4 + 3] <= alpha_cutoff {
                    cleared += 1;
                }
                x += step;
            }
            y += step;
        }
        if total == 0 {
            0.0
        } else {
            cleared as f64 / total as f64
        }
    }
}

// -----------------------------------------------------------------------------
// DOM wiring
// -----------------------------------------------------------------------------

thread_local! {
    static SCRATCH_CARD: RefCell<Option<ScratchCard<CanvasSurface>>> = RefCell::new(None);
    static RESIZE_CB: RefCell<Option<Closure<dyn FnMut()>>> = RefCell::new(None);
}

/// Presenter toggling the wrapper's `revealed` class; the stylesheet derives
/// everything else from it.
struct WrapPresenter {
    wrap: Element,
}

impl RevealPresenter for WrapPresenter {
    fn show_revealed(&self) {
        self.wrap.class_list().add_1("revealed").ok();
    }

    fn show_unrevealed(&self) {
        self.wrap.class_list().remove_1("revealed").ok();
    }
}

/// Attach the scratch card to `#scratchWrap` / `#scratchCanvas` /
/// `#scratchResetBtn`. Missing markup simply leaves the feature out.
pub fn mount_scratch_card(config: ScratchConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let (Some(wrap), Some(canvas_el)) = (
        doc.get_element_by_id("scratchWrap"),
        doc.get_element_by_id("scratchCanvas"),
    ) else {
        return Ok(());
    };
    let canvas: HtmlCanvasElement = canvas_el.dyn_into()?;

    // The hidden image must be in place before the first cover paints.
    pick_reveal_image(&doc);

    let card = ScratchCard::new(CanvasSurface::new(canvas.clone()), config)
        .with_presenter(WrapPresenter { wrap })
        .with_celebration(ConfettiBurst::reveal());
    SCRATCH_CARD.with(|cell| cell.replace(Some(card)));

    // Pointer handlers; offset_x/offset_y are already canvas-local, so no
    // bounding-rect math is needed per event.
    {
        let canvas_down = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: PointerEvent| {
            canvas_down.set_pointer_capture(evt.pointer_id()).ok();
            SCRATCH_CARD.with(|cell| {
                if let Some(card) = cell.borrow_mut().as_mut() {
                    card.pointer_down(evt.offset_x() as f64, evt.offset_y() as f64);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: PointerEvent| {
            SCRATCH_CARD.with(|cell| {
                if let Some(card) = cell.borrow_mut().as_mut() {
                    card.pointer_move(evt.offset_x() as f64, evt.offset_y() as f64);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: PointerEvent| {
            SCRATCH_CARD.with(|cell| {
                if let Some(card) = cell.borrow_mut().as_mut() {
                    card.pointer_up();
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: PointerEvent| {
            SCRATCH_CARD.with(|cell| {
                if let Some(card) = cell.borrow_mut().as_mut() {
                    card.pointer_cancel();
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointercancel", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Reset: fresh image, fresh cover. Works even on an already revealed card.
    if let Some(btn) = doc.get_element_by_id("scratchResetBtn") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                pick_reveal_image(&doc);
            }
            SCRATCH_CARD.with(|cell| {
                if let Some(card) = cell.borrow_mut().as_mut() {
                    card.redraw_cover();
                }
            });
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Sizing is deferred past layout; the card rectangle is zero until then
    // and the engine skips zero-area rectangles on its own.
    let resize_cb = Closure::wrap(Box::new(resize_from_layout) as Box<dyn FnMut()>);
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        resize_cb.as_ref().unchecked_ref(),
        INITIAL_LAYOUT_DELAY_MS,
    )?;
    RESIZE_CB.with(|cell| cell.replace(Some(resize_cb)));

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            if let Some(win) = window() {
                RESIZE_CB.with(|cell| {
                    if let Some(cb) = cell.borrow().as_ref() {
                        win.set_timeout_with_callback_and_timeout_and_arguments_0(
                            cb.as_ref().unchecked_ref(),
                            RESIZE_DEBOUNCE_MS,
                        )
                        .ok();
                    }
                });
            }
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Read the card's layout rectangle and the device pixel ratio and push them
/// into the engine (which caps the ratio itself).
fn resize_from_layout() {
    let Some(win) = window() else {
        return;
    };
    let ratio = win.device_pixel_ratio();
    let Some(canvas) = win
        .document()
        .and_then(|d| d.get_element_by_id("scratchCanvas"))
    else {
        return;
    };
    let rect = canvas.get_bounding_client_rect();
    SCRATCH_CARD.with(|cell| {
        if let Some(card) = cell.borrow_mut().as_mut() {
            card.resize(rect.width(), rect.height(), ratio);
        }
    });
}

/// Presentation-side image selection: the engine only requires that some
/// image sits behind the cover, never which one.
fn pick_reveal_image(doc: &Document) {
    let Some(img) = doc.get_element_by_id("scratchImage") else {
        return;
    };
    let mut rng = crate::rand::seeded();
    let (src, caption) = crate::REVEAL_IMAGES[rng.next_index(crate::REVEAL_IMAGES.len())];
    img.set_attribute("src", src).ok();
    img.set_attribute("alt", caption).ok();
}
