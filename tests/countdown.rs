// Countdown arithmetic tests (native). The DOM ticker is browser-only; the
// splitting and formatting logic is what these cover.

use gift_day::countdown::{CountdownParts, pad2};

#[test]
fn zero_interval_is_all_zeros() {
    let p = CountdownParts::from_seconds(0);
    assert_eq!((p.days, p.hours, p.mins, p.secs), (0, 0, 0, 0));
}

#[test]
fn elapsed_targets_clamp_to_zero() {
    let p = CountdownParts::from_seconds(-42);
    assert_eq!((p.days, p.hours, p.mins, p.secs), (0, 0, 0, 0));
    let p = CountdownParts::from_millis(-5000.0);
    assert_eq!((p.days, p.hours, p.mins, p.secs), (0, 0, 0, 0));
}

#[test]
fn day_boundary_rolls_over() {
    let p = CountdownParts::from_seconds(86_399);
    assert_eq!((p.days, p.hours, p.mins, p.secs), (0, 23, 59, 59));
    let p = CountdownParts::from_seconds(86_400);
    assert_eq!((p.days, p.hours, p.mins, p.secs), (1, 0, 0, 0));
}

#[test]
fn mixed_interval_splits_correctly() {
    // 40 days, 3 hours, 7 minutes, 5 seconds
    let total = 40 * 86_400 + 3 * 3_600 + 7 * 60 + 5;
    let p = CountdownParts::from_seconds(total);
    assert_eq!((p.days, p.hours, p.mins, p.secs), (40, 3, 7, 5));
}

#[test]
fn millis_truncate_partial_seconds() {
    let p = CountdownParts::from_millis(1_999.0);
    assert_eq!(p.secs, 1);
    let p = CountdownParts::from_millis(61_000.0);
    assert_eq!((p.mins, p.secs), (1, 1));
}

#[test]
fn pad2_pads_single_digits() {
    assert_eq!(pad2(0), "00");
    assert_eq!(pad2(7), "07");
    assert_eq!(pad2(59), "59");
}

#[test]
fn celebration_date_constants_are_a_real_date() {
    assert!((1..=12).contains(&gift_day::CELEBRATION_MONTH));
    assert!((1..=31).contains(&gift_day::CELEBRATION_DAY));
}
