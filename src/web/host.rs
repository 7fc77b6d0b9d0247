use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use crate::driver::{Drawable, FrameHandle, FrameHost};
use crate::error::{RenderError, RenderResult};
use crate::surface::SurfaceSize;
use crate::web::describe;

pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
pub type ResizeCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` and window `resize` events. The closures are
/// installed after the driver exists, hence the shared slots.
pub struct BrowserHost {
    window: Window,
    on_frame: FrameCallback,
    on_resize: ResizeCallback,
    listening: bool,
}

impl BrowserHost {
    pub fn new(window: Window, on_frame: FrameCallback, on_resize: ResizeCallback) -> Self {
        Self {
            window,
            on_frame,
            on_resize,
            listening: false,
        }
    }
}

impl FrameHost for BrowserHost {
    fn request_frame(&mut self) -> RenderResult<FrameHandle> {
        let slot = self.on_frame.borrow();
        let callback = slot
            .as_ref()
            .ok_or_else(|| RenderError::host("frame callback not installed"))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| RenderError::host(describe(&e)))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            warn!("cancelAnimationFrame failed: {}", describe(&e));
        }
    }

    fn attach_resize(&mut self) -> RenderResult<()> {
        if self.listening {
            return Ok(());
        }
        let slot = self.on_resize.borrow();
        let callback = slot
            .as_ref()
            .ok_or_else(|| RenderError::host("resize callback not installed"))?;
        self.window
            .add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
            .map_err(|e| RenderError::host(describe(&e)))?;
        self.listening = true;
        Ok(())
    }

    fn detach_resize(&mut self) {
        if !self.listening {
            return;
        }
        if let Some(callback) = self.on_resize.borrow().as_ref() {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
            {
                warn!("removeEventListener failed: {}", describe(&e));
            }
        }
        self.listening = false;
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }
}

/// The `<canvas>` the background draws into.
pub struct CanvasDrawable {
    canvas: HtmlCanvasElement,
}

impl CanvasDrawable {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }
}

impl Drawable for CanvasDrawable {
    fn css_size(&self) -> (f64, f64) {
        let rect = self.canvas.get_bounding_client_rect();
        (rect.width(), rect.height())
    }

    fn backing_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width(), self.canvas.height())
    }

    fn set_backing_size(&self, size: SurfaceSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }
}
