//! Boundary to the page's confetti library.
//!
//! The host page may load a global `confetti(opts)` function. Everything here
//! is fire-and-forget: when the global is absent the calls are silent no-ops,
//! and a throwing call is swallowed, so no caller ever fails because the
//! effect did. The scratch engine only sees this module through its
//! [`CelebrationHook`](crate::scratch::CelebrationHook) capability.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::scratch::CelebrationHook;

const HOVER_BURST_MIN_INTERVAL_MS: f64 = 450.0;
const HOVER_SECOND_BURST_DELAY_MS: i32 = 120;

/// Parameters for one burst (the subset of the library's options this page
/// uses). Origin is in viewport fractions.
#[derive(Clone, Copy, Debug)]
pub struct BurstOptions {
    pub particle_count: u32,
    pub spread: f64,
    pub origin: (f64, f64),
    pub start_velocity: Option<f64>,
    pub ticks: Option<u32>,
}

impl Default for BurstOptions {
    fn default() -> Self {
        Self {
            particle_count: 100,
            spread: 70.0,
            origin: (0.5, 0.5),
            start_velocity: None,
            ticks: None,
        }
    }
}

impl BurstOptions {
    fn to_js(self) -> js_sys::Object {
        let obj = js_sys::Object::new();
        let origin = js_sys::Object::new();
        js_sys::Reflect::set(&origin, &"x".into(), &self.origin.0.into()).ok();
        js_sys::Reflect::set(&origin, &"y".into(), &self.origin.1.into()).ok();
        js_sys::Reflect::set(
            &obj,
            &"particleCount".into(),
            &f64::from(self.particle_count).into(),
        )
        .ok();
        js_sys::Reflect::set(&obj, &"spread".into(), &self.spread.into()).ok();
        js_sys::Reflect::set(&obj, &"origin".into(), &origin.into()).ok();
        if let Some(v) = self.start_velocity {
            js_sys::Reflect::set(&obj, &"startVelocity".into(), &v.into()).ok();
        }
        if let Some(t) = self.ticks {
            js_sys::Reflect::set(&obj, &"ticks".into(), &f64::from(t).into()).ok();
        }
        obj
    }
}

/// Resolve the duck-typed global; None when the library never loaded.
fn confetti_fn() -> Option<js_sys::Function> {
    js_sys::Reflect::get(&js_sys::global(), &"confetti".into())
        .ok()?
        .dyn_into()
        .ok()
}

/// Fire one burst.
pub fn burst(opts: BurstOptions) {
    if let Some(f) = confetti_fn() {
        let _ = f.call1(&JsValue::NULL, &opts.to_js());
    }
}

/// Celebration hook implementations for the scratch card and the gate.
pub struct ConfettiBurst {
    opts: BurstOptions,
}

impl ConfettiBurst {
    pub fn new(opts: BurstOptions) -> Self {
        Self { opts }
    }

    /// The burst fired when the scratch card reveals.
    pub fn reveal() -> Self {
        Self::new(BurstOptions {
            particle_count: 140,
            spread: 90.0,
            origin: (0.5, 0.6),
            ..Default::default()
        })
    }
}

impl CelebrationHook for ConfettiBurst {
    fn celebrate(&self) {
        burst(self.opts);
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Firework volleys from the bottom edge until `duration_ms` elapses: paired
/// small bursts per animation frame, random horizontal origins.
pub fn run_fireworks(duration_ms: f64) {
    if confetti_fn().is_none() {
        return;
    }
    let Some(win) = window() else {
        return;
    };
    let end = js_sys::Date::now() + duration_ms;
    let mut rng = crate::rand::seeded();

    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        burst(BurstOptions {
            particle_count: 6,
            spread: 70.0,
            start_velocity: Some(45.0),
            ticks: Some(140),
            origin: (rng.next_unit(), 1.0),
        });
        burst(BurstOptions {
            particle_count: 6,
            spread: 90.0,
            start_velocity: Some(55.0),
            ticks: Some(160),
            origin: (rng.next_unit(), 1.0),
        });
        if js_sys::Date::now() < end {
            if let Some(w) = window() {
                let _ = w
                    .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut(f64)>));
    let _ = win.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
}

thread_local! {
    static HOVER_THROTTLE: RefCell<crate::effects::Throttle> =
        RefCell::new(crate::effects::Throttle::new(HOVER_BURST_MIN_INTERVAL_MS));
    static SECOND_BURST_CB: RefCell<Option<Closure<dyn FnMut()>>> = RefCell::new(None);
}

/// Confetti when the hero block is hovered, throttled; fireworks instead on
/// the celebration day.
pub fn mount_hover_burst() -> Result<(), JsValue> {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return Ok(());
    };
    let Some(hero) = doc.get_element_by_id("heroHover") else {
        return Ok(());
    };

    // The softer follow-up burst is one reusable callback, scheduled per
    // hover, rather than a fresh leaked closure each time.
    let second = Closure::wrap(Box::new(|| {
        burst(BurstOptions {
            particle_count: 70,
            spread: 110.0,
            origin: (0.5, 0.2),
            ..Default::default()
        });
    }) as Box<dyn FnMut()>);
    SECOND_BURST_CB.with(|cell| cell.replace(Some(second)));

    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        let now = js_sys::Date::now();
        let ready = HOVER_THROTTLE.with(|t| t.borrow_mut().ready(now));
        if !ready {
            return;
        }
        if crate::countdown::celebration_today() {
            run_fireworks(900.0);
            return;
        }
        burst(BurstOptions {
            particle_count: 110,
            spread: 70.0,
            origin: (0.5, 0.18),
            ..Default::default()
        });
        if let Some(win) = window() {
            SECOND_BURST_CB.with(|cell| {
                if let Some(cb) = cell.borrow().as_ref() {
                    win.set_timeout_with_callback_and_timeout_and_arguments_0(
                        cb.as_ref().unchecked_ref(),
                        HOVER_SECOND_BURST_DELAY_MS,
                    )
                    .ok();
                }
            });
        }
    }) as Box<dyn FnMut(_)>);
    hero.add_event_listener_with_callback("mouseenter", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
