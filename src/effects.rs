//! Decorative pointer trails: hearts on click, sparkles on mouse movement.
//!
//! Spawned spans animate via CSS and are swept out of the DOM by a single
//! shared reaper interval, so no per-element timeout closure sticks around.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent, window};

use crate::rand::Lcg;

pub const HEARTS: &[&str] = &["💛", "💖", "💘", "💝", "💗", "💞"];

const HEART_LIFETIME_MS: f64 = 950.0;
const SPARKLE_LIFETIME_MS: f64 = 560.0;
const SPARKLE_MIN_INTERVAL_MS: f64 = 28.0;
const REAPER_PERIOD_MS: i32 = 200;

/// Minimum-interval gate for high-frequency events.
#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    min_interval_ms: f64,
    last_ms: f64,
}

impl Throttle {
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms,
            last_ms: f64::NEG_INFINITY,
        }
    }

    /// True when the interval has elapsed, re-arming the gate.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_ms < self.min_interval_ms {
            return false;
        }
        self.last_ms = now_ms;
        true
    }
}

struct TrailState {
    rng: Lcg,
    sparkle_throttle: Throttle,
    // Spawned spans with their expiry timestamps; the CSS animation has long
    // finished (elements invisible) by the time the reaper removes them.
    live: Vec<(Element, f64)>,
}

thread_local! {
    static TRAIL: RefCell<TrailState> = RefCell::new(TrailState {
        rng: Lcg::new(0x7261),
        sparkle_throttle: Throttle::new(SPARKLE_MIN_INTERVAL_MS),
        live: Vec::new(),
    });
}

/// Wire the click-heart and mousemove-sparkle trails plus their reaper.
pub fn mount_pointer_trails() -> Result<(), JsValue> {
    let Some(win) = window() else {
        return Ok(());
    };
    let Some(doc) = win.document() else {
        return Ok(());
    };
    TRAIL.with(|cell| cell.borrow_mut().rng = crate::rand::seeded());

    {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            // No hearts over modal content or buttons.
            if let Some(target) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) {
                if matches!(target.closest(".modalCard"), Ok(Some(_)))
                    || matches!(target.closest("button"), Ok(Some(_)))
                {
                    return;
                }
            }
            spawn_heart(evt.client_x() as f64, evt.client_y() as f64);
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let now = crate::performance_now();
            let ready = TRAIL.with(|cell| cell.borrow_mut().sparkle_throttle.ready(now));
            if !ready {
                return;
            }
            // No sparkle shower behind an open letter.
            if let Some(doc) = window().and_then(|w| w.document()) {
                if let Some(modal) = doc.get_element_by_id("letterModal") {
                    if modal.class_list().contains("open") {
                        return;
                    }
                }
            }
            spawn_sparkle(evt.client_x() as f64, evt.client_y() as f64);
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(reap_expired) as Box<dyn FnMut()>);
        win.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            REAPER_PERIOD_MS,
        )?;
        closure.forget();
    }

    Ok(())
}

fn spawn_heart(x: f64, y: f64) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let Some(body) = doc.body() else {
        return;
    };
    let Ok(el) = doc.create_element("span") else {
        return;
    };
    TRAIL.with(|cell| {
        let mut trail = cell.borrow_mut();
        el.set_class_name("heart");
        el.set_text_content(Some(HEARTS[trail.rng.next_index(HEARTS.len())]));
        let ox = trail.rng.next_range(-6.0, 6.0);
        let oy = trail.rng.next_range(-5.0, 5.0);
        let size = 16.0 + (trail.rng.next_unit() * 10.0).floor();
        el.set_attribute(
            "style",
            &format!(
                "left:{:.0}px; top:{:.0}px; font-size:{size:.0}px;",
                x + ox,
                y + oy
            ),
        )
        .ok();
        if body.append_child(&el).is_ok() {
            let expiry = crate::performance_now() + HEART_LIFETIME_MS;
            trail.live.push((el, expiry));
        }
    });
}

fn spawn_sparkle(x: f64, y: f64) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let Some(body) = doc.body() else {
        return;
    };
    let Ok(el) = doc.create_element("span") else {
        return;
    };
    TRAIL.with(|cell| {
        let mut trail = cell.borrow_mut();
        el.set_class_name("sparkle");
        let ox = trail.rng.next_range(-5.0, 5.0);
        let oy = trail.rng.next_range(-5.0, 5.0);
        let size = 6.0 + (trail.rng.next_unit() * 6.0).floor();
        el.set_attribute(
            "style",
            &format!(
                "left:{:.0}px; top:{:.0}px; width:{size:.0}px; height:{size:.0}px;",
                x + ox,
                y + oy
            ),
        )
        .ok();
        if body.append_child(&el).is_ok() {
            let expiry = crate::performance_now() + SPARKLE_LIFETIME_MS;
            trail.live.push((el, expiry));
        }
    });
}

fn reap_expired() {
    let now = crate::performance_now();
    TRAIL.with(|cell| {
        cell.borrow_mut().live.retain(|(el, expiry)| {
            if now < *expiry {
                return true;
            }
            el.remove();
            false
        });
    });
}
