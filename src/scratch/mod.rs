//! Scratch-card reveal engine.
//!
//! An opaque occlusion layer is painted over a hidden image. Pointer strokes
//! erase circles out of it; when a completed stroke leaves the estimated
//! erased share at or above a threshold, the card reveals itself exactly once
//! per cycle. [`ScratchCard`] is the state machine, generic over an abstract
//! [`ScratchSurface`] raster: the browser canvas backend lives in [`canvas`],
//! the in-memory reference raster in [`AlphaRaster`]. Presentation styling
//! and the celebration effect are injected capabilities with no-op defaults,
//! so the engine works unchanged without either.

pub mod canvas;
mod engine;
mod raster;

pub use engine::ScratchCard;
pub use raster::AlphaRaster;

/// Reveal lifecycle of one scratch cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    /// Cover (partially) opaque: strokes erase, completed strokes check
    /// coverage.
    Unrevealed,
    /// Terminal for the cycle: erasure and coverage checks are inert until
    /// the next cover repaint.
    Revealed,
}

/// Engine tunables. The two historical variants of this card differed only
/// in threshold and sampling density, so both are plain fields here.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScratchConfig {
    /// Brush radius in CSS pixels.
    pub brush_radius: f64,
    /// Erased percentage (0-100) at which a completed stroke reveals.
    pub reveal_threshold: f64,
    /// Physical-pixel stride of the coverage sampler.
    pub sample_stride: u32,
    /// Alpha at/below this counts as cleared; tolerates anti-aliased rims.
    pub alpha_cutoff: u8,
    /// Device-pixel-ratio cap bounding buffer size on dense displays.
    pub max_pixel_ratio: f64,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            brush_radius: 28.0,
            reveal_threshold: 35.0,
            sample_stride: 8,
            alpha_cutoff: 20,
            max_pixel_ratio: 2.0,
        }
    }
}

#[cfg(feature = "serde_json")]
impl ScratchConfig {
    /// Parse a JSON object; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Raster the engine scratches. Coordinates handed in are CSS pixels; the
/// surface owns the device-pixel-ratio transform. Erasure may only ever
/// lower alpha within one cycle; only [`paint_cover`](Self::paint_cover)
/// raises it again.
pub trait ScratchSurface {
    /// Reallocate the physical buffer for a new layout rectangle. Returns
    /// false without touching the buffer when the rectangle has zero area or
    /// the drawing backend is unavailable.
    fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> bool;

    /// Current logical (CSS-pixel) size.
    fn logical_size(&self) -> (f64, f64);

    /// Repaint the fully opaque cover and arm the erasing draw mode.
    fn paint_cover(&mut self);

    /// Erase a filled circle centered at CSS-pixel (x, y).
    fn erase_circle(&mut self, x: f64, y: f64, radius: f64);

    /// Erase the whole buffer to alpha 0.
    fn clear_all(&mut self);

    /// Fraction in [0, 1] of strided samples whose alpha is at/below
    /// `alpha_cutoff`. 0.0 when no buffer exists.
    fn cleared_fraction(&self, stride: u32, alpha_cutoff: u8) -> f64;
}

/// Where the engine pushes reveal transitions so the page can restyle.
pub trait RevealPresenter {
    fn show_revealed(&self);
    fn show_unrevealed(&self);
}

/// Presenter that does nothing; used until the wiring injects a real one.
pub struct NoPresenter;

impl RevealPresenter for NoPresenter {
    fn show_revealed(&self) {}
    fn show_unrevealed(&self) {}
}

/// Fire-and-forget celebration trigger, invoked once per reveal. Implementors
/// swallow their own failures; the engine never inspects an outcome.
pub trait CelebrationHook {
    fn celebrate(&self);
}

/// Hook that does nothing (celebration collaborator absent).
pub struct NoCelebration;

impl CelebrationHook for NoCelebration {
    fn celebrate(&self) {}
}
