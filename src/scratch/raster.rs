use super::ScratchSurface;

/// In-memory occlusion raster: one alpha byte per physical pixel, 255 where
/// the cover is intact, 0 where it has been scratched away.
///
/// This is the reference model of the canvas surface and drives the engine
/// anywhere there is no DOM (headless hosts, native tests). The same
/// invariant holds as on canvas: between cover repaints, alpha only goes
/// down.
pub struct AlphaRaster {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    alpha: Vec<u8>,
}

impl AlphaRaster {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            pixel_ratio: 1.0,
            alpha: Vec::new(),
        }
    }

    /// Physical buffer dimensions in device pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Alpha at a physical pixel; 0 for out-of-range probes.
    pub fn alpha_at(&self, px: u32, py: u32) -> u8 {
        if px >= self.width || py >= self.height {
            return 0;
        }
        self.alpha[(py * self.width + px) as usize]
    }

    /// Highest alpha anywhere in the buffer; 0 once fully erased.
    pub fn max_alpha(&self) -> u8 {
        self.alpha.iter().copied().max().unwrap_or(0)
    }
}

impl Default for AlphaRaster {
    fn default() -> Self {
        Self::new()
    }
}

impl ScratchSurface for AlphaRaster {
    fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> bool {
        let w = (css_width * pixel_ratio).floor() as u32;
        let h = (css_height * pixel_ratio).floor() as u32;
        if w == 0 || h == 0 {
            return false;
        }
        self.width = w;
        self.height = h;
        self.pixel_ratio = pixel_ratio;
        // Fresh buffer starts transparent; paint_cover opacifies it.
        self.alpha = vec![0; (w * h) as usize];
        true
    }

    fn logical_size(&self) -> (f64, f64) {
        (
            self.width as f64 / self.pixel_ratio,
            self.height as f64 / self.pixel_ratio,
        )
    }

    fn paint_cover(&mut self) {
        for a in &mut self.alpha {
            *a = 255;
        }
    }

    fn erase_circle(&mut self, x: f64, y: f64, radius: f64) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let cx = x * self.pixel_ratio;
        let cy = y * self.pixel_ratio;
        let r = radius * self.pixel_ratio;
        let r2 = r * r;
        let x0 = (cx - r).floor().max(0.0) as u32;
        let y0 = (cy - r).floor().max(0.0) as u32;
        let x1 = (cx + r).ceil().min(self.width as f64).max(0.0) as u32;
        let y1 = (cy + r).ceil().min(self.height as f64).max(0.0) as u32;
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.alpha[(py * self.width + px) as usize] = 0;
                }
            }
        }
    }

    fn clear_all(&mut self) {
        for a in &mut self.alpha {
            *a = 0;
        }
    }

    fn cleared_fraction(&self, stride: u32, alpha_cutoff: u8) -> f64 {
        if self.alpha.is_empty() {
            return 0.0;
        }
        let step = stride.max(1);
        let mut cleared = 0usize;
        let mut total = 0usize;
        let mut py = 0;
        while py < self.height {
            let mut px = 0;
            while px < self.width {
                total += 1;
                if self.alpha[(py * self.width + px) as usize] <= alpha_cutoff {
                    cleared += 1;
                }
                px += step;
            }
            py += step;
        }
        cleared as f64 / total as f64
    }
}
