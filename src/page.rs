//! Hero message, love-letter modal, flip cards and the title easter egg.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, KeyboardEvent, MouseEvent, window};

use crate::confetti::{self, BurstOptions};

const SECRET_CLICKS: u32 = 5;
const SECRET_CLICK_WINDOW_MS: f64 = 1200.0;
const SECRET_SHOW_MS: i32 = 4500;

/// Click-streak detector: `needed` clicks within a rolling window.
#[derive(Clone, Copy, Debug)]
pub struct ClickStreak {
    needed: u32,
    window_ms: f64,
    count: u32,
    last_ms: f64,
}

impl ClickStreak {
    pub fn new(needed: u32, window_ms: f64) -> Self {
        Self {
            needed,
            window_ms,
            count: 0,
            last_ms: f64::NEG_INFINITY,
        }
    }

    /// Register a click at `now_ms`; true exactly when the streak completes
    /// (which also resets it).
    pub fn register(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_ms > self.window_ms {
            self.count = 0;
        }
        self.last_ms = now_ms;
        self.count += 1;
        if self.count >= self.needed {
            self.count = 0;
            return true;
        }
        false
    }
}

thread_local! {
    static TITLE_STREAK: RefCell<ClickStreak> =
        RefCell::new(ClickStreak::new(SECRET_CLICKS, SECRET_CLICK_WINDOW_MS));
    static SECRET_HIDE_CB: RefCell<Option<Closure<dyn FnMut()>>> = RefCell::new(None);
}

/// Wire the static page pieces. Each block tolerates missing markup.
pub fn mount_page() -> Result<(), JsValue> {
    let Some(win) = window() else {
        return Ok(());
    };
    let Some(doc) = win.document() else {
        return Ok(());
    };

    set_hero_message(&doc);
    wire_letter_modal(&doc)?;
    wire_title_secret(&doc)?;
    wire_toggles(&doc, ".flipCard", "flipped", true)?;
    wire_toggles(&doc, ".imgCard", "showCaption", false)?;
    Ok(())
}

/// Dynamic hero copy: celebration-day greeting vs countdown tease.
fn set_hero_message(doc: &Document) {
    let (Some(title), Some(subtitle)) = (
        doc.get_element_by_id("heroTitle"),
        doc.get_element_by_id("heroSubtitle"),
    ) else {
        return;
    };
    if crate::countdown::celebration_today() {
        title.set_inner_html(r#"Happy Birthday, <span class="name">Baby</span> 🎉✨"#);
        subtitle.set_inner_html(
            r#"Today is your day 💛 I hope you feel loved, celebrated, and super happy.
            <br /><span class="small">(Open your letter and enjoy your surprise 🎁)</span>"#,
        );
    } else {
        title.set_inner_html(r#"Your birthday is almost here, <span class="name">Baby</span> ✨"#);
        subtitle.set_inner_html(
            r#"I'm counting down the days until we celebrate you 🎂💛
            <br /><span class="small">(A surprise is waiting for the big day 🎁)</span>"#,
        );
    }
}

fn open_letter(modal: &Element) {
    modal.class_list().add_1("open").ok();
    modal.set_attribute("aria-hidden", "false").ok();
    confetti::burst(BurstOptions {
        particle_count: 80,
        spread: 70.0,
        origin: (0.5, 0.3),
        ..Default::default()
    });
}

fn close_letter(modal: &Element) {
    modal.class_list().remove_1("open").ok();
    modal.set_attribute("aria-hidden", "true").ok();
}

fn wire_letter_modal(doc: &Document) -> Result<(), JsValue> {
    let Some(modal) = doc.get_element_by_id("letterModal") else {
        return Ok(());
    };

    if let Some(btn) = doc.get_element_by_id("openLetterBtn") {
        let modal = modal.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            open_letter(&modal);
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // One shared close handler serves both close buttons.
    let close_cb = Closure::wrap(Box::new({
        let modal = modal.clone();
        move |_evt: MouseEvent| close_letter(&modal)
    }) as Box<dyn FnMut(_)>);
    for id in ["closeLetterBtn", "closeLetterBtn2"] {
        if let Some(btn) = doc.get_element_by_id(id) {
            btn.add_event_listener_with_callback("click", close_cb.as_ref().unchecked_ref())?;
        }
    }
    close_cb.forget();

    // Backdrop click closes; clicks inside the card bubble up with a
    // different target and are ignored.
    {
        let modal_click = modal.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let target = evt.target().and_then(|t| t.dyn_into::<Element>().ok());
            if target.as_ref() == Some(&modal_click) {
                close_letter(&modal_click);
            }
        }) as Box<dyn FnMut(_)>);
        modal.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let modal = modal.clone();
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            if evt.key() == "Escape" {
                close_letter(&modal);
            }
        }) as Box<dyn FnMut(_)>);
        window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn wire_title_secret(doc: &Document) -> Result<(), JsValue> {
    let Some(title) = doc.get_element_by_id("heroTitle") else {
        return Ok(());
    };
    title.set_attribute("style", "cursor:pointer").ok();

    let hide = Closure::wrap(Box::new(|| {
        if let Some(msg) = window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("secretMsg"))
        {
            msg.class_list().remove_1("show").ok();
        }
    }) as Box<dyn FnMut()>);
    SECRET_HIDE_CB.with(|cell| cell.replace(Some(hide)));

    let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
        let now = js_sys::Date::now();
        let completed = TITLE_STREAK.with(|s| s.borrow_mut().register(now));
        if completed {
            show_secret();
        }
    }) as Box<dyn FnMut(_)>);
    title.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn show_secret() {
    let Some(win) = window() else {
        return;
    };
    let Some(msg) = win
        .document()
        .and_then(|d| d.get_element_by_id("secretMsg"))
    else {
        return;
    };
    msg.class_list().add_1("show").ok();
    SECRET_HIDE_CB.with(|cell| {
        if let Some(cb) = cell.borrow().as_ref() {
            win.set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                SECRET_SHOW_MS,
            )
            .ok();
        }
    });
    confetti::burst(BurstOptions {
        particle_count: 60,
        spread: 70.0,
        origin: (0.5, 0.25),
        ..Default::default()
    });
}

/// Tap-to-toggle helper for the flip cards and polaroid captions. One click
/// closure (and, for keyboard-reachable cards, one keydown closure) is
/// shared across every matching element.
fn wire_toggles(doc: &Document, selector: &str, class: &str, keyboard: bool) -> Result<(), JsValue> {
    let nodes = doc.query_selector_all(selector)?;
    if nodes.length() == 0 {
        return Ok(());
    }

    let class_owned = class.to_string();
    let click = Closure::wrap(Box::new(move |evt: MouseEvent| {
        if let Some(el) = evt
            .current_target()
            .and_then(|t| t.dyn_into::<Element>().ok())
        {
            el.class_list().toggle(&class_owned).ok();
        }
    }) as Box<dyn FnMut(_)>);

    let key = keyboard.then(|| {
        let class_owned = class.to_string();
        Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            let k = evt.key();
            if k == "Enter" || k == " " {
                evt.prevent_default();
                if let Some(el) = evt
                    .current_target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                {
                    el.class_list().toggle(&class_owned).ok();
                }
            }
        }) as Box<dyn FnMut(_)>)
    });

    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        el.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        if let Some(key) = &key {
            el.add_event_listener_with_callback("keydown", key.as_ref().unchecked_ref())?;
        }
    }
    click.forget();
    if let Some(key) = key {
        key.forget();
    }
    Ok(())
}
