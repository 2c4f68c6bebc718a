// Native tests for the scratch reveal engine. These exercise the state
// machine over the in-memory raster so they run under `cargo test` on the
// host; browser-specific behavior stays out.

use std::cell::Cell;
use std::rc::Rc;

use gift_day::scratch::{
    AlphaRaster, CelebrationHook, RevealPresenter, RevealState, ScratchCard, ScratchConfig,
    ScratchSurface,
};

fn test_config() -> ScratchConfig {
    ScratchConfig {
        brush_radius: 22.0,
        reveal_threshold: 50.0,
        ..ScratchConfig::default()
    }
}

// 300x200 CSS card at device pixel ratio 2 -> 600x400 physical buffer.
fn card_300x200() -> ScratchCard<AlphaRaster> {
    let mut card = ScratchCard::new(AlphaRaster::new(), test_config());
    card.resize(300.0, 200.0, 2.0);
    card
}

// 24 disjoint brush circles (radius 22) on a 50px grid: ~60% of the card.
fn heavy_grid() -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for xi in 0..6 {
        for yi in 0..4 {
            points.push((25.0 + 50.0 * xi as f64, 25.0 + 50.0 * yi as f64));
        }
    }
    points
}

fn scratch_stroke(card: &mut ScratchCard<AlphaRaster>, points: &[(f64, f64)]) {
    let (first, rest) = points.split_first().expect("stroke needs a point");
    card.pointer_down(first.0, first.1);
    for &(x, y) in rest {
        card.pointer_move(x, y);
    }
}

#[derive(Clone, Default)]
struct SignalLog {
    revealed: Rc<Cell<u32>>,
    unrevealed: Rc<Cell<u32>>,
}

impl RevealPresenter for SignalLog {
    fn show_revealed(&self) {
        self.revealed.set(self.revealed.get() + 1);
    }
    fn show_unrevealed(&self) {
        self.unrevealed.set(self.unrevealed.get() + 1);
    }
}

#[derive(Clone, Default)]
struct CountingHook {
    fired: Rc<Cell<u32>>,
}

impl CelebrationHook for CountingHook {
    fn celebrate(&self) {
        self.fired.set(self.fired.get() + 1);
    }
}

#[test]
fn fresh_card_starts_unrevealed_with_zero_coverage() {
    let card = card_300x200();
    assert_eq!(card.state(), RevealState::Unrevealed);
    assert_eq!(card.coverage_percent(), 0.0);
    assert_eq!(card.surface().physical_size(), (600, 400));
    assert_eq!(card.surface().logical_size(), (300.0, 200.0));
    assert_eq!(card.surface().max_alpha(), 255);
}

#[test]
fn reset_is_idempotent() {
    let mut card = card_300x200();
    scratch_stroke(&mut card, &[(50.0, 50.0), (90.0, 50.0)]);
    card.pointer_up();
    assert!(card.coverage_percent() > 0.0);

    for _ in 0..3 {
        card.redraw_cover();
        assert_eq!(card.state(), RevealState::Unrevealed);
        assert_eq!(card.coverage_percent(), 0.0);
    }
}

#[test]
fn reset_recovers_a_revealed_card() {
    let mut card = card_300x200();
    card.reveal();
    assert!(card.is_revealed());

    card.redraw_cover();
    assert_eq!(card.state(), RevealState::Unrevealed);
    assert_eq!(card.coverage_percent(), 0.0);
    assert_eq!(card.surface().max_alpha(), 255);

    // The fresh cycle scratches and reveals again like the first one.
    scratch_stroke(&mut card, &heavy_grid());
    card.pointer_up();
    assert!(card.is_revealed());
}

#[test]
fn coverage_is_monotonic_while_unrevealed() {
    let mut card = card_300x200();
    let mut last = card.coverage_percent();
    let points = heavy_grid();
    card.pointer_down(points[0].0, points[0].1);
    for &(x, y) in &points[1..8] {
        card.pointer_move(x, y);
        let now = card.coverage_percent();
        assert!(now >= last, "coverage dropped from {last} to {now}");
        last = now;
    }
    // Re-scratching an already cleared spot must not lower the estimate.
    card.pointer_move(points[0].0, points[0].1);
    assert!(card.coverage_percent() >= last);
}

#[test]
fn threshold_crossing_reveals_exactly_once() {
    let log = SignalLog::default();
    let hook = CountingHook::default();
    let mut card = ScratchCard::new(AlphaRaster::new(), test_config())
        .with_presenter(log.clone())
        .with_celebration(hook.clone());
    card.resize(300.0, 200.0, 2.0);
    assert_eq!(log.unrevealed.get(), 1);

    scratch_stroke(&mut card, &heavy_grid());
    assert_eq!(card.state(), RevealState::Unrevealed, "no reveal mid-stroke");
    card.pointer_up();

    assert_eq!(card.state(), RevealState::Revealed);
    assert_eq!(log.revealed.get(), 1);
    assert_eq!(hook.fired.get(), 1);
    // Full-clear postcondition: every alpha byte is zero.
    assert_eq!(card.surface().max_alpha(), 0);
    assert_eq!(card.coverage_percent(), 100.0);

    // Later gestures are inert: no second signal, no state change.
    card.pointer_down(10.0, 10.0);
    card.pointer_move(20.0, 20.0);
    card.pointer_up();
    assert_eq!(log.revealed.get(), 1);
    assert_eq!(hook.fired.get(), 1);
    assert_eq!(card.state(), RevealState::Revealed);
}

#[test]
fn explicit_reveal_is_idempotent() {
    let hook = CountingHook::default();
    let mut card =
        ScratchCard::new(AlphaRaster::new(), test_config()).with_celebration(hook.clone());
    card.resize(300.0, 200.0, 2.0);

    card.reveal();
    card.reveal();
    card.reveal();
    assert_eq!(hook.fired.get(), 1);
    assert_eq!(card.surface().max_alpha(), 0);
}

#[test]
fn below_threshold_stroke_does_not_reveal() {
    let mut card = card_300x200();
    scratch_stroke(&mut card, &[(150.0, 100.0)]);
    card.pointer_up();

    assert_eq!(card.state(), RevealState::Unrevealed);
    let single = card.coverage_percent();
    assert!(single > 0.0 && single < 50.0);

    // Scratching stays possible after the failed check.
    scratch_stroke(&mut card, &[(50.0, 50.0), (250.0, 150.0)]);
    card.pointer_up();
    assert!(card.coverage_percent() > single);
}

#[test]
fn cancel_skips_the_coverage_check() {
    let mut card = card_300x200();
    scratch_stroke(&mut card, &heavy_grid());
    card.pointer_cancel();
    assert_eq!(
        card.state(),
        RevealState::Unrevealed,
        "aborted gesture must not reveal"
    );

    // The next completed gesture runs the check against the accumulated
    // coverage and reveals.
    card.pointer_down(150.0, 100.0);
    card.pointer_up();
    assert_eq!(card.state(), RevealState::Revealed);
}

#[test]
fn moves_without_a_pointer_down_do_not_erase() {
    let mut card = card_300x200();
    card.pointer_move(150.0, 100.0);
    card.pointer_move(50.0, 50.0);
    assert_eq!(card.coverage_percent(), 0.0);
}

#[test]
fn pointer_down_is_ignored_once_revealed() {
    let mut card = card_300x200();
    card.reveal();
    card.pointer_down(150.0, 100.0);

    // A reset follows; since the down was ignored no stroke is in flight,
    // so a stray move must leave the fresh cover intact.
    card.redraw_cover();
    card.pointer_move(150.0, 100.0);
    assert_eq!(card.coverage_percent(), 0.0);
}

#[test]
fn zero_area_resize_is_skipped_and_recoverable() {
    let mut card = ScratchCard::new(AlphaRaster::new(), test_config());
    card.resize(0.0, 0.0, 2.0);
    card.resize(0.0, 150.0, 2.0);
    card.resize(300.0, 0.0, 2.0);
    assert_eq!(card.surface().physical_size(), (0, 0));
    assert_eq!(card.coverage_percent(), 0.0);

    // Input before layout is harmless.
    card.pointer_down(10.0, 10.0);
    card.pointer_up();

    // Once layout reports a real rectangle, the card works normally.
    card.resize(300.0, 200.0, 2.0);
    assert_eq!(card.surface().physical_size(), (600, 400));
    scratch_stroke(&mut card, &heavy_grid());
    card.pointer_up();
    assert!(card.is_revealed());
}

#[test]
fn pixel_ratio_is_capped() {
    let mut card = ScratchCard::new(AlphaRaster::new(), test_config());
    card.resize(100.0, 100.0, 3.5);
    assert_eq!(card.surface().physical_size(), (200, 200));

    // Sub-1 ratios are lifted to 1 rather than shrinking the buffer.
    card.resize(100.0, 100.0, 0.5);
    assert_eq!(card.surface().physical_size(), (100, 100));
}

#[test]
fn resize_repaints_and_restarts_the_cycle() {
    let log = SignalLog::default();
    let mut card = ScratchCard::new(AlphaRaster::new(), test_config()).with_presenter(log.clone());
    card.resize(300.0, 200.0, 2.0);
    scratch_stroke(&mut card, &heavy_grid());
    card.pointer_up();
    assert!(card.is_revealed());

    // A mid-cycle layout change rebuilds the buffer: fully covered again and
    // scratchable, with the unrevealed signal re-emitted.
    card.resize(320.0, 200.0, 2.0);
    assert_eq!(card.state(), RevealState::Unrevealed);
    assert_eq!(card.coverage_percent(), 0.0);
    assert_eq!(card.surface().max_alpha(), 255);
    assert_eq!(log.unrevealed.get(), 2);
}

#[test]
fn single_brush_estimate_matches_geometry() {
    // One radius-22 circle on a 300x200 card is ~2.5% of the area; the
    // strided estimate should land near that, not wildly off.
    let mut card = card_300x200();
    card.pointer_down(150.0, 100.0);
    card.pointer_cancel();
    let pct = card.coverage_percent();
    assert!((1.5..=3.5).contains(&pct), "estimate {pct} out of range");
}

#[test]
fn default_hooks_are_noops() {
    // No presenter or celebration injected: reveal still works.
    let mut card = card_300x200();
    scratch_stroke(&mut card, &heavy_grid());
    card.pointer_up();
    assert!(card.is_revealed());
}
