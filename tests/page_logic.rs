// Native tests for the pure page helpers: throttling, the title click
// streak, the decorative RNG, balloon spawn parameters and the data tables.

use std::collections::HashSet;

use gift_day::balloons::{BALLOON_COLORS, spawn_params};
use gift_day::effects::{HEARTS, Throttle};
use gift_day::page::ClickStreak;
use gift_day::rand::Lcg;
use gift_day::scratch::ScratchConfig;

#[test]
fn click_streak_completes_on_the_fifth_click() {
    let mut streak = ClickStreak::new(5, 1200.0);
    for i in 0..4 {
        assert!(!streak.register(i as f64 * 100.0), "click {i} fired early");
    }
    assert!(streak.register(400.0));
}

#[test]
fn click_streak_resets_after_completion() {
    let mut streak = ClickStreak::new(5, 1200.0);
    for i in 0..5 {
        streak.register(i as f64 * 10.0);
    }
    // Next run starts from zero again.
    for i in 5..9 {
        assert!(!streak.register(i as f64 * 10.0));
    }
    assert!(streak.register(90.0 + 10.0));
}

#[test]
fn click_streak_resets_after_a_gap() {
    let mut streak = ClickStreak::new(5, 1200.0);
    for i in 0..4 {
        streak.register(i as f64 * 100.0);
    }
    // Long pause: the next five clicks are a fresh streak.
    assert!(!streak.register(5_000.0));
    assert!(!streak.register(5_100.0));
    assert!(!streak.register(5_200.0));
    assert!(!streak.register(5_300.0));
    assert!(streak.register(5_400.0));
}

#[test]
fn throttle_gates_by_minimum_interval() {
    let mut t = Throttle::new(28.0);
    assert!(t.ready(1_000.0), "first event always passes");
    assert!(!t.ready(1_010.0));
    assert!(!t.ready(1_027.9));
    assert!(t.ready(1_028.0));
    assert!(!t.ready(1_030.0));
}

#[test]
fn lcg_is_deterministic_per_seed() {
    let mut a = Lcg::new(12345);
    let mut b = Lcg::new(12345);
    for _ in 0..10 {
        assert_eq!(a.next_u32(), b.next_u32());
    }
    let mut c = Lcg::new(54321);
    assert_ne!(Lcg::new(12345).next_u32(), c.next_u32());
}

#[test]
fn lcg_units_stay_in_range() {
    let mut rng = Lcg::new(7);
    for _ in 0..1_000 {
        let u = rng.next_unit();
        assert!((0.0..1.0).contains(&u));
        let r = rng.next_range(2.0, 5.0);
        assert!((2.0..5.0).contains(&r));
    }
}

#[test]
fn lcg_indices_stay_in_bounds() {
    let mut rng = Lcg::new(99);
    assert_eq!(rng.next_index(0), 0);
    for len in 1..10usize {
        for _ in 0..200 {
            assert!(rng.next_index(len) < len);
        }
    }
}

#[test]
fn balloon_spawn_params_stay_in_bounds() {
    let mut rng = Lcg::new(0xb100);
    for _ in 0..500 {
        let (x, duration, color) = spawn_params(&mut rng, 480.0);
        assert!((0.0..=420.0).contains(&x));
        assert!((2_600.0..5_000.0).contains(&duration));
        assert!(color < BALLOON_COLORS.len());
    }
}

#[test]
fn balloon_spawn_handles_narrow_areas() {
    let mut rng = Lcg::new(1);
    for _ in 0..50 {
        let (x, _, _) = spawn_params(&mut rng, 40.0);
        assert_eq!(x, 0.0, "narrow area pins balloons to the left edge");
    }
}

#[test]
fn reveal_image_pool_is_sane() {
    assert!(!gift_day::REVEAL_IMAGES.is_empty());
    let mut seen = HashSet::new();
    for (src, caption) in gift_day::REVEAL_IMAGES {
        assert!(!src.is_empty() && !caption.is_empty());
        assert!(seen.insert(*src), "duplicate reveal image '{src}'");
    }
}

#[test]
fn decorative_tables_are_nonempty() {
    assert!(!HEARTS.is_empty());
    assert!(!BALLOON_COLORS.is_empty());
}

#[test]
fn scratch_config_defaults_are_usable() {
    let cfg = ScratchConfig::default();
    assert!(cfg.brush_radius > 0.0);
    assert!(cfg.reveal_threshold > 0.0 && cfg.reveal_threshold <= 100.0);
    assert!(cfg.sample_stride >= 1);
    assert!(cfg.max_pixel_ratio >= 1.0);
}

#[cfg(feature = "serde_json")]
#[test]
fn scratch_config_parses_partial_json() {
    let cfg = ScratchConfig::from_json(r#"{"reveal_threshold": 50.0}"#).unwrap();
    assert_eq!(cfg.reveal_threshold, 50.0);
    // Unmentioned fields keep their defaults.
    assert_eq!(cfg.sample_stride, ScratchConfig::default().sample_stride);
}
