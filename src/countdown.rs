//! Countdown to the celebration date.
//!
//! Pure interval arithmetic lives up top so it can run anywhere; the DOM
//! updater below ticks once a second and pins to zeros (plus one-shot
//! fireworks and a big burst) on the day itself.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::confetti::{self, BurstOptions};
use crate::{CELEBRATION_DAY, CELEBRATION_MONTH};

/// A countdown interval split into clock segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountdownParts {
    pub days: u64,
    pub hours: u8,
    pub mins: u8,
    pub secs: u8,
}

impl CountdownParts {
    /// Split a whole-second interval; elapsed (negative) intervals clamp to
    /// zero.
    pub fn from_seconds(total: i64) -> Self {
        let total = total.max(0) as u64;
        Self {
            days: total / 86_400,
            hours: ((total % 86_400) / 3_600) as u8,
            mins: ((total % 3_600) / 60) as u8,
            secs: (total % 60) as u8,
        }
    }

    /// Split a millisecond interval, truncating partial seconds.
    pub fn from_millis(diff_ms: f64) -> Self {
        Self::from_seconds((diff_ms / 1000.0).floor() as i64)
    }
}

/// Two-digit clock segment.
pub fn pad2(n: u8) -> String {
    format!("{n:02}")
}

struct OneShots {
    fireworks_done: bool,
    confetti_done: bool,
}

thread_local! {
    static ONE_SHOTS: RefCell<OneShots> = RefCell::new(OneShots {
        fireworks_done: false,
        confetti_done: false,
    });
}

/// Whether today's local date is the celebration date.
pub(crate) fn celebration_today() -> bool {
    let now = js_sys::Date::new_0();
    now.get_month() + 1 == CELEBRATION_MONTH && now.get_date() == CELEBRATION_DAY
}

/// Next occurrence of the celebration date at local midnight: this year's if
/// still ahead, otherwise next year's.
fn next_celebration() -> js_sys::Date {
    let now = js_sys::Date::new_0();
    let year = now.get_full_year();
    let target = js_sys::Date::new_with_year_month_day(
        year,
        (CELEBRATION_MONTH - 1) as i32,
        CELEBRATION_DAY as i32,
    );
    if target.get_time() <= now.get_time() {
        js_sys::Date::new_with_year_month_day(
            year + 1,
            (CELEBRATION_MONTH - 1) as i32,
            CELEBRATION_DAY as i32,
        )
    } else {
        target
    }
}

/// Start the 1 Hz countdown updater. Pages without the countdown markup get
/// a silent no-op ticker.
pub fn mount_countdown() -> Result<(), JsValue> {
    let Some(win) = window() else {
        return Ok(());
    };
    tick();
    let closure = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
    win.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        1000,
    )?;
    closure.forget();
    Ok(())
}

fn tick() {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let (Some(days_el), Some(hours_el), Some(mins_el), Some(secs_el)) = (
        doc.get_element_by_id("cdDays"),
        doc.get_element_by_id("cdHours"),
        doc.get_element_by_id("cdMins"),
        doc.get_element_by_id("cdSecs"),
    ) else {
        return;
    };

    if celebration_today() {
        days_el.set_text_content(Some("0"));
        hours_el.set_text_content(Some("00"));
        mins_el.set_text_content(Some("00"));
        secs_el.set_text_content(Some("00"));
        if let Some(msg) = doc.get_element_by_id("countdownMsg") {
            msg.set_text_content(Some("🎉 It's the big day! Happy Birthday!"));
        }
        ONE_SHOTS.with(|cell| {
            let mut flags = cell.borrow_mut();
            if !flags.fireworks_done {
                flags.fireworks_done = true;
                confetti::run_fireworks(2600.0);
            }
            if !flags.confetti_done {
                flags.confetti_done = true;
                confetti::burst(BurstOptions {
                    particle_count: 260,
                    spread: 120.0,
                    origin: (0.5, 0.35),
                    ..Default::default()
                });
            }
        });
        return;
    }

    let target = next_celebration();
    let parts = CountdownParts::from_millis(target.get_time() - js_sys::Date::now());
    days_el.set_text_content(Some(&parts.days.to_string()));
    hours_el.set_text_content(Some(&pad2(parts.hours)));
    mins_el.set_text_content(Some(&pad2(parts.mins)));
    secs_el.set_text_content(Some(&pad2(parts.secs)));
    if let Some(msg) = doc.get_element_by_id("countdownMsg") {
        let date_str = String::from(target.to_date_string());
        msg.set_text_content(Some(&format!("Next celebration: {date_str}")));
    }

    // Re-arm the day-of effects for the following year.
    ONE_SHOTS.with(|cell| {
        let mut flags = cell.borrow_mut();
        flags.fireworks_done = false;
        flags.confetti_done = false;
    });
}
