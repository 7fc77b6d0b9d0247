/// Backing-store size in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Pixel ratio actually rendered at: the host ratio capped by `dpi_cap`.
/// A missing or nonsensical host ratio counts as 1.
pub fn effective_pixel_ratio(device_pixel_ratio: f64, dpi_cap: f64) -> f64 {
    let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    ratio.min(dpi_cap)
}

/// `floor(css size × effective ratio)`, never negative.
pub fn backing_size(css_width: f64, css_height: f64, device_pixel_ratio: f64, dpi_cap: f64) -> SurfaceSize {
    let ratio = effective_pixel_ratio(device_pixel_ratio, dpi_cap);
    let scale = |v: f64| {
        let px = (v * ratio).floor();
        if px.is_finite() && px > 0.0 {
            px.min(u32::MAX as f64) as u32
        } else {
            0
        }
    };
    SurfaceSize::new(scale(css_width), scale(css_height))
}

/// Last size pushed to the drawable and viewport.
#[derive(Clone, Copy, Debug, Default)]
pub struct SurfaceState {
    current: SurfaceSize,
}

impl SurfaceState {
    pub fn size(&self) -> SurfaceSize {
        self.current
    }

    /// Records `next`; returns whether it differs from what was applied last.
    pub fn apply(&mut self, next: SurfaceSize) -> bool {
        if next == self.current {
            return false;
        }
        self.current = next;
        true
    }
}
