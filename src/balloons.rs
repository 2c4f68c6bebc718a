//! Balloon-pop arcade.
//!
//! Balloons spawn on a fixed interval, rise via a CSS animation and either
//! get popped (click, +1 score, small burst) or escape (animation end).
//! Click and animation-end handling is delegated to the play area, so no
//! per-balloon closure is ever created. Scores are not persisted.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, MouseEvent, window};

use crate::confetti::{self, BurstOptions};
use crate::rand::Lcg;

pub const BALLOON_COLORS: &[&str] = &[
    "rgba(255, 214, 231, 0.9)",
    "rgba(255, 242, 182, 0.9)",
    "rgba(196, 241, 255, 0.9)",
    "rgba(215, 196, 255, 0.9)",
    "rgba(199, 255, 216, 0.9)",
    "rgba(255, 217, 182, 0.9)",
];

const SPAWN_INTERVAL_MS: i32 = 700;
const DOUBLE_SPAWN_CHANCE: f64 = 0.45;
const POP_REMOVE_MS: i32 = 180;
const BALLOON_WIDTH_PX: f64 = 60.0;

/// Spawn parameters drawn from the generator: (left offset px, rise duration
/// ms, color index). Kept free of DOM types so the ranges are checkable
/// anywhere.
pub fn spawn_params(rng: &mut Lcg, area_width: f64) -> (f64, f64, usize) {
    let x = rng.next_unit() * (area_width - BALLOON_WIDTH_PX).max(0.0);
    let duration = 2600.0 + (rng.next_unit() * 2400.0).floor();
    let color = rng.next_index(BALLOON_COLORS.len());
    (x, duration, color)
}

struct BalloonGame {
    score: u32,
    timer: Option<i32>,
    rng: Lcg,
}

thread_local! {
    static GAME: RefCell<BalloonGame> = RefCell::new(BalloonGame {
        score: 0,
        timer: None,
        rng: Lcg::new(0xba11),
    });
    static SPAWN_CB: RefCell<Option<Closure<dyn FnMut()>>> = RefCell::new(None);
    static POP_CLEANUP_CB: RefCell<Option<Closure<dyn FnMut()>>> = RefCell::new(None);
}

/// Wire `#balloonArea` and its start/reset buttons.
pub fn mount_balloon_game() -> Result<(), JsValue> {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return Ok(());
    };
    let Some(area) = doc.get_element_by_id("balloonArea") else {
        return Ok(());
    };
    GAME.with(|g| g.borrow_mut().rng = crate::rand::seeded());

    // Popped balloons linger briefly for their pop animation; one reusable
    // callback sweeps them out.
    let cleanup = Closure::wrap(Box::new(|| {
        if let Some(doc) = window().and_then(|w| w.document()) {
            remove_all(&doc, ".balloon.pop");
        }
    }) as Box<dyn FnMut()>);
    POP_CLEANUP_CB.with(|cell| cell.replace(Some(cleanup)));

    let spawn = Closure::wrap(Box::new(|| {
        let Some(doc) = window().and_then(|w| w.document()) else {
            return;
        };
        let Some(area) = doc.get_element_by_id("balloonArea") else {
            return;
        };
        GAME.with(|g| {
            let mut game = g.borrow_mut();
            spawn_balloon(&doc, &area, &mut game.rng);
            if game.rng.next_unit() < DOUBLE_SPAWN_CHANCE {
                spawn_balloon(&doc, &area, &mut game.rng);
            }
        });
    }) as Box<dyn FnMut()>);
    SPAWN_CB.with(|cell| cell.replace(Some(spawn)));

    // Delegated pop handling.
    {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let Some(target) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Ok(Some(balloon)) = target.closest(".balloon") else {
                return;
            };
            if balloon.class_list().contains("pop") {
                return;
            }
            balloon.class_list().add_1("pop").ok();
            let score = GAME.with(|g| {
                let mut game = g.borrow_mut();
                game.score += 1;
                game.score
            });
            show_score(score);
            confetti::burst(BurstOptions {
                particle_count: 18,
                spread: 60.0,
                origin: (0.5, 0.6),
                ..Default::default()
            });
            schedule_pop_cleanup();
        }) as Box<dyn FnMut(_)>);
        area.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Balloons that finish their rise escaped unpopped.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            if let Some(balloon) = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(".balloon").ok().flatten())
            {
                balloon.remove();
            }
        }) as Box<dyn FnMut(_)>);
        area.add_event_listener_with_callback("animationend", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(btn) = doc.get_element_by_id("balloonStartBtn") {
        let closure =
            Closure::wrap(Box::new(move |_evt: MouseEvent| start_game()) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(btn) = doc.get_element_by_id("balloonResetBtn") {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            stop_spawning();
            if let Some(doc) = window().and_then(|w| w.document()) {
                remove_all(&doc, ".balloon");
            }
            GAME.with(|g| g.borrow_mut().score = 0);
            show_score(0);
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn start_game() {
    stop_spawning();
    let Some(win) = window() else {
        return;
    };
    if let Some(doc) = win.document() {
        remove_all(&doc, ".balloon");
    }
    GAME.with(|g| g.borrow_mut().score = 0);
    show_score(0);

    let timer = SPAWN_CB.with(|cell| {
        cell.borrow().as_ref().and_then(|cb| {
            win.set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                SPAWN_INTERVAL_MS,
            )
            .ok()
        })
    });
    GAME.with(|g| g.borrow_mut().timer = timer);
}

fn stop_spawning() {
    GAME.with(|g| {
        if let Some(id) = g.borrow_mut().timer.take() {
            if let Some(win) = window() {
                win.clear_interval_with_handle(id);
            }
        }
    });
}

fn spawn_balloon(doc: &Document, area: &Element, rng: &mut Lcg) {
    let Ok(balloon) = doc.create_element("div") else {
        return;
    };
    balloon.set_class_name("balloon");
    let rect = area.get_bounding_client_rect();
    let (x, duration, color) = spawn_params(rng, rect.width());
    balloon
        .set_attribute(
            "style",
            &format!(
                "left:{x:.0}px; background:{}; animation-duration:{duration:.0}ms;",
                BALLOON_COLORS[color]
            ),
        )
        .ok();
    balloon.set_inner_html("<span>🎈</span>");
    area.append_child(&balloon).ok();
}

fn schedule_pop_cleanup() {
    let Some(win) = window() else {
        return;
    };
    POP_CLEANUP_CB.with(|cell| {
        if let Some(cb) = cell.borrow().as_ref() {
            win.set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                POP_REMOVE_MS,
            )
            .ok();
        }
    });
}

fn show_score(score: u32) {
    if let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("balloonScore"))
    {
        el.set_text_content(Some(&score.to_string()));
    }
}

fn remove_all(doc: &Document, selector: &str) {
    let Ok(nodes) = doc.query_selector_all(selector) else {
        return;
    };
    for i in 0..nodes.length() {
        if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            el.remove();
        }
    }
}
