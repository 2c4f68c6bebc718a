use super::{
    CelebrationHook, NoCelebration, NoPresenter, RevealPresenter, RevealState, ScratchConfig,
    ScratchSurface,
};

/// One scratch card: surface, reveal state machine and tunables.
///
/// Every operation runs to completion inside whatever handler invoked it and
/// the surface is exclusively owned, so there is no aliasing or interleaving
/// hazard. A resize landing mid-stroke rebuilds the buffer and forfeits the
/// stroke's progress.
pub struct ScratchCard<S: ScratchSurface> {
    surface: S,
    config: ScratchConfig,
    state: RevealState,
    scratching: bool,
    presenter: Box<dyn RevealPresenter>,
    celebration: Box<dyn CelebrationHook>,
}

impl<S: ScratchSurface> ScratchCard<S> {
    /// Build a card over `surface`. The cover is not painted yet; call
    /// [`resize`](Self::resize) once the layout rectangle is known.
    pub fn new(surface: S, config: ScratchConfig) -> Self {
        Self {
            surface,
            config,
            state: RevealState::Unrevealed,
            scratching: false,
            presenter: Box::new(NoPresenter),
            celebration: Box::new(NoCelebration),
        }
    }

    pub fn with_presenter(mut self, presenter: impl RevealPresenter + 'static) -> Self {
        self.presenter = Box::new(presenter);
        self
    }

    pub fn with_celebration(mut self, hook: impl CelebrationHook + 'static) -> Self {
        self.celebration = Box::new(hook);
        self
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn is_revealed(&self) -> bool {
        self.state == RevealState::Revealed
    }

    pub fn config(&self) -> &ScratchConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Adopt a new layout rectangle. A zero-area rectangle means the card is
    /// not laid out yet: skip silently, the next layout event retries. A
    /// successful reallocation always repaints the cover, since the old
    /// buffer contents are gone with the old physical size.
    pub fn resize(&mut self, css_width: f64, css_height: f64, device_pixel_ratio: f64) {
        if css_width <= 0.0 || css_height <= 0.0 {
            return;
        }
        let ratio = device_pixel_ratio.clamp(1.0, self.config.max_pixel_ratio);
        if self.surface.resize(css_width, css_height, ratio) {
            self.redraw_cover();
        }
    }

    /// Repaint the opaque cover and start a fresh cycle. Doubles as the
    /// reset path: it succeeds from any state, including after a reveal.
    pub fn redraw_cover(&mut self) {
        self.surface.paint_cover();
        self.state = RevealState::Unrevealed;
        self.presenter.show_unrevealed();
    }

    /// Pointer pressed at card-local CSS coordinates. Ignored once revealed.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if self.is_revealed() {
            return;
        }
        self.scratching = true;
        self.erase_at(x, y);
    }

    /// Pointer moved; erases only while a stroke is in progress.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.scratching || self.is_revealed() {
            return;
        }
        self.erase_at(x, y);
    }

    /// Pointer released: the stroke is complete, so the coverage check runs.
    pub fn pointer_up(&mut self) {
        self.scratching = false;
        if self.is_revealed() {
            return;
        }
        if self.coverage_percent() >= self.config.reveal_threshold {
            self.reveal();
        }
    }

    /// Aborted gesture: the stroke ends without a coverage check.
    pub fn pointer_cancel(&mut self) {
        self.scratching = false;
    }

    /// Estimated erased share of the cover, in percent. Derived from the
    /// buffer on demand, never cached: the occlusion layer is the source of
    /// truth.
    pub fn coverage_percent(&self) -> f64 {
        self.surface
            .cleared_fraction(self.config.sample_stride, self.config.alpha_cutoff)
            * 100.0
    }

    /// One-shot transition: erase the whole cover, flip to `Revealed`,
    /// signal the presenter and fire the celebration hook. Calling it again
    /// while revealed is a no-op.
    pub fn reveal(&mut self) {
        if self.is_revealed() {
            return;
        }
        self.surface.clear_all();
        self.state = RevealState::Revealed;
        self.presenter.show_revealed();
        self.celebration.celebrate();
    }

    fn erase_at(&mut self, x: f64, y: f64) {
        if self.is_revealed() {
            return;
        }
        self.surface.erase_circle(x, y, self.config.brush_radius);
    }
}
