//! Frame driver: owns the pipeline and runs the resize/animation-frame loop.
//!
//! ```text
//!   Idle --mount--> Running --unmount--> Idle
//!     \                |
//!      \--dispose--> Disposed <--dispose
//! ```
//!
//! A configuration change while running is unmount + mount. Only `Running`
//! holds a pipeline and a pending frame, so nothing can draw once the driver
//! has left it.

use std::mem;

use tracing::{debug, error, info, warn};

use crate::config::FluidConfig;
use crate::error::{RenderError, RenderResult};
use crate::gl::{FrameUniforms, GraphicsContext, Pipeline};
use crate::palette::Palette;
use crate::surface::{backing_size, SurfaceSize, SurfaceState};

/// Id returned by the host's frame scheduler.
pub type FrameHandle = i32;

/// Callbacks the page provides: frame scheduling, resize notifications and
/// the device pixel ratio.
pub trait FrameHost {
    fn request_frame(&mut self) -> RenderResult<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn attach_resize(&mut self) -> RenderResult<()>;
    fn detach_resize(&mut self);
    fn device_pixel_ratio(&self) -> f64;
}

/// The element being drawn into.
pub trait Drawable {
    /// Layout size in CSS pixels.
    fn css_size(&self) -> (f64, f64);
    fn backing_size(&self) -> SurfaceSize;
    fn set_backing_size(&self, size: SurfaceSize);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverPhase {
    Idle,
    Running,
    Disposed,
}

enum DriverState<C: GraphicsContext> {
    Idle,
    Running {
        pipeline: Pipeline<C>,
        pending: Option<FrameHandle>,
    },
    Disposed,
}

pub struct FrameDriver<C: GraphicsContext, H: FrameHost, D: Drawable> {
    ctx: C,
    host: H,
    drawable: D,
    config: FluidConfig,
    palette: Palette,
    surface: SurfaceState,
    state: DriverState<C>,
    frames: u64,
}

impl<C: GraphicsContext, H: FrameHost, D: Drawable> FrameDriver<C, H, D> {
    pub fn new(ctx: C, host: H, drawable: D, config: FluidConfig) -> Self {
        Self {
            ctx,
            host,
            drawable,
            config,
            palette: Palette::default(),
            surface: SurfaceState::default(),
            state: DriverState::Idle,
            frames: 0,
        }
    }

    pub fn phase(&self) -> DriverPhase {
        match self.state {
            DriverState::Idle => DriverPhase::Idle,
            DriverState::Running { .. } => DriverPhase::Running,
            DriverState::Disposed => DriverPhase::Disposed,
        }
    }

    pub fn config(&self) -> &FluidConfig {
        &self.config
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.surface.size()
    }

    /// Frames drawn since construction.
    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    /// Builds the pipeline, starts listening for resizes, sizes the surface
    /// and schedules the first frame. A no-op when already running.
    pub fn mount(&mut self) -> RenderResult<()> {
        match self.state {
            DriverState::Disposed => return Err(RenderError::Disposed),
            DriverState::Running { .. } => return Ok(()),
            DriverState::Idle => {}
        }

        let palette = self.config.palette().inspect_err(|e| error!("{e}"))?;
        let pipeline = Pipeline::bootstrap(&self.ctx)?;
        if let Err(e) = self.host.attach_resize() {
            error!("{e}");
            pipeline.release(&self.ctx);
            return Err(e);
        }

        self.palette = palette;
        self.surface = SurfaceState::default();
        self.state = DriverState::Running {
            pipeline,
            pending: None,
        };
        self.resize();

        match self.host.request_frame() {
            Ok(handle) => {
                if let DriverState::Running { pending, .. } = &mut self.state {
                    *pending = Some(handle);
                }
            }
            Err(e) => {
                error!("{e}");
                self.unmount();
                return Err(e);
            }
        }

        info!(
            colors = self.palette.len(),
            dpi = self.config.dpi_cap(),
            width = self.surface.size().width,
            height = self.surface.size().height,
            "fluid background mounted"
        );
        Ok(())
    }

    /// Recomputes the backing size from the drawable's layout size. The
    /// drawable and viewport are only touched when the size actually changed.
    /// Returns whether they were.
    pub fn resize(&mut self) -> bool {
        if !matches!(self.state, DriverState::Running { .. }) {
            return false;
        }

        let (css_width, css_height) = self.drawable.css_size();
        let next = backing_size(
            css_width,
            css_height,
            self.host.device_pixel_ratio(),
            self.config.dpi_cap(),
        );
        if self.surface.apply(next) {
            debug!(width = next.width, height = next.height, "surface size changed");
        }

        if self.drawable.backing_size() == next {
            return false;
        }
        self.drawable.set_backing_size(next);
        self.ctx.viewport(next.width, next.height);
        true
    }

    /// Draws one frame at host timestamp `timestamp_ms` and schedules the next.
    /// Returns false without drawing unless the driver is running. If the next
    /// frame cannot be scheduled the driver unmounts and is left `Idle`.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        let DriverState::Running { pipeline, pending } = &mut self.state else {
            return false;
        };
        *pending = None;

        let size = self.surface.size();
        let uniforms = FrameUniforms {
            time: (timestamp_ms * 0.001) as f32,
            resolution: [size.width as f32, size.height as f32],
            colors: self.palette.flatten(),
            color_count: self.palette.len() as i32,
        };
        pipeline.draw(&self.ctx, &uniforms);
        self.frames += 1;

        match self.host.request_frame() {
            Ok(handle) => *pending = Some(handle),
            Err(e) => {
                warn!("animation loop stopped: {e}");
                self.unmount();
            }
        }
        true
    }

    /// Applies new options. A running driver is torn down and rebuilt.
    pub fn reconfigure(&mut self, config: FluidConfig) -> RenderResult<()> {
        match self.phase() {
            DriverPhase::Disposed => Err(RenderError::Disposed),
            DriverPhase::Idle => {
                self.config = config;
                Ok(())
            }
            DriverPhase::Running => {
                self.unmount();
                self.config = config;
                self.mount()
            }
        }
    }

    /// Cancels the pending frame, stops listening for resizes and releases
    /// the pipeline.
    pub fn unmount(&mut self) {
        let state = mem::replace(&mut self.state, DriverState::Idle);
        match state {
            DriverState::Running { pipeline, pending } => {
                if let Some(handle) = pending {
                    self.host.cancel_frame(handle);
                }
                self.host.detach_resize();
                pipeline.release(&self.ctx);
                debug!(frames = self.frames, "fluid background unmounted");
            }
            other => self.state = other,
        }
    }

    /// Unmounts for good; every later call is refused or ignored.
    pub fn dispose(&mut self) {
        self.unmount();
        self.state = DriverState::Disposed;
    }
}

impl<C: GraphicsContext, H: FrameHost, D: Drawable> Drop for FrameDriver<C, H, D> {
    fn drop(&mut self) {
        self.unmount();
    }
}
