//! Gift gate: the entry overlay hiding the page until opened.
//!
//! Unlock state persists on the device only (local storage); nothing is
//! validated anywhere else. Storage being unavailable (private mode,
//! disabled) degrades to a session-only gate.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent, ScrollBehavior, ScrollToOptions, Window, window};

use crate::confetti::{self, BurstOptions};

const UNLOCK_KEY: &str = "gift-day.unlocked";

/// Wire `#giftOverlay` / `#openGiftBtn` / `#siteContent`. A remembered
/// unlock skips the overlay immediately, without replaying the celebration.
pub fn mount_gift_gate() -> Result<(), JsValue> {
    let Some(win) = window() else {
        return Ok(());
    };
    let Some(doc) = win.document() else {
        return Ok(());
    };
    let (Some(overlay), Some(content)) = (
        doc.get_element_by_id("giftOverlay"),
        doc.get_element_by_id("siteContent"),
    ) else {
        return Ok(());
    };

    if stored_unlock(&win) {
        show_content(&overlay, &content, false);
    }

    if let Some(btn) = doc.get_element_by_id("openGiftBtn") {
        let overlay = overlay.clone();
        let content = content.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            if crate::countdown::celebration_today() {
                confetti::run_fireworks(2500.0);
            } else {
                confetti::burst(BurstOptions {
                    particle_count: 180,
                    spread: 90.0,
                    origin: (0.5, 0.45),
                    ..Default::default()
                });
            }
            show_content(&overlay, &content, true);
            if let Some(win) = window() {
                remember_unlock(&win);
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn show_content(overlay: &Element, content: &Element, scroll: bool) {
    overlay.class_list().add_1("hide").ok();
    content.class_list().remove_1("hiddenContent").ok();
    content.class_list().add_1("showContent").ok();
    if scroll {
        if let Some(win) = window() {
            let opts = ScrollToOptions::new();
            opts.set_top(0.0);
            opts.set_behavior(ScrollBehavior::Smooth);
            win.scroll_to_with_scroll_to_options(&opts);
        }
    }
}

fn stored_unlock(win: &Window) -> bool {
    win.local_storage()
        .ok()
        .flatten()
        .and_then(|s| s.get_item(UNLOCK_KEY).ok().flatten())
        .is_some_and(|v| v == "1")
}

fn remember_unlock(win: &Window) {
    if let Some(storage) = win.local_storage().ok().flatten() {
        storage.set_item(UNLOCK_KEY, "1").ok();
    }
}
