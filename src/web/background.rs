use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{error, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::config::FluidConfig;
use crate::driver::{DriverPhase, FrameDriver};
use crate::error::RenderError;
use crate::web::gl::WebGlContext;
use crate::web::host::{BrowserHost, CanvasDrawable, FrameCallback, ResizeCallback};
use crate::web::to_js;

type WebDriver = FrameDriver<WebGlContext, BrowserHost, CanvasDrawable>;

/// Animated fluid gradient drawn into a canvas.
///
/// ```js
/// const bg = new FluidBackground(canvas, JSON.stringify({ colors: ["#ff0000", "#0000ff"], dpi: 2 }));
/// bg.setOptions(JSON.stringify({ colors: ["#00ff00"] }));
/// bg.dispose();
/// ```
#[wasm_bindgen]
pub struct FluidBackground {
    /// `None` when the browser has no WebGL2; the canvas stays blank.
    driver: Option<Rc<RefCell<WebDriver>>>,
    on_frame: FrameCallback,
    on_resize: ResizeCallback,
}

#[wasm_bindgen]
impl FluidBackground {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options: Option<String>) -> Result<FluidBackground, JsValue> {
        let config = match options {
            Some(json) => FluidConfig::from_json(&json).map_err(to_js)?,
            None => FluidConfig::default(),
        };
        Self::create(canvas, config)
    }

    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&self, options: &str) -> Result<(), JsValue> {
        let config = FluidConfig::from_json(options).map_err(to_js)?;
        let Some(driver) = &self.driver else {
            return Ok(());
        };
        let result = driver.borrow_mut().reconfigure(config);
        match result {
            Ok(()) => Ok(()),
            // surface stays blank; already logged by the driver
            Err(RenderError::Compile { .. } | RenderError::Link(_)) => Ok(()),
            Err(e) => Err(to_js(e)),
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.driver
            .as_ref()
            .is_some_and(|d| d.borrow().phase() == DriverPhase::Running)
    }

    #[wasm_bindgen(js_name = framesDrawn)]
    pub fn frames_drawn(&self) -> f64 {
        self.driver
            .as_ref()
            .map_or(0.0, |d| d.borrow().frames_drawn() as f64)
    }

    /// Stops the animation loop and frees GPU resources. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.borrow_mut().dispose();
        }
        self.on_frame.borrow_mut().take();
        self.on_resize.borrow_mut().take();
    }
}

impl FluidBackground {
    pub(crate) fn create(canvas: HtmlCanvasElement, config: FluidConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let on_frame: FrameCallback = Rc::new(RefCell::new(None));
        let on_resize: ResizeCallback = Rc::new(RefCell::new(None));

        let ctx = match WebGlContext::acquire(&canvas) {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!("fluid background disabled: {e}");
                return Ok(Self {
                    driver: None,
                    on_frame,
                    on_resize,
                });
            }
        };

        let host = BrowserHost::new(window, on_frame.clone(), on_resize.clone());
        let driver = Rc::new(RefCell::new(FrameDriver::new(
            ctx,
            host,
            CanvasDrawable::new(canvas),
            config,
        )));

        let weak = Rc::downgrade(&driver);
        *on_frame.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            with_driver(&weak, |d| {
                d.frame(timestamp);
            });
        }) as Box<dyn FnMut(f64)>));

        let weak = Rc::downgrade(&driver);
        *on_resize.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            with_driver(&weak, |d| {
                d.resize();
            });
        }) as Box<dyn FnMut()>));

        let mounted = driver.borrow_mut().mount();
        match mounted {
            Ok(()) => {}
            Err(RenderError::Compile { .. } | RenderError::Link(_)) => {}
            Err(e) => return Err(to_js(e)),
        }

        Ok(Self {
            driver: Some(driver),
            on_frame,
            on_resize,
        })
    }
}

impl Drop for FluidBackground {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn with_driver(weak: &Weak<RefCell<WebDriver>>, f: impl FnOnce(&mut WebDriver)) {
    let Some(driver) = weak.upgrade() else {
        return;
    };
    match driver.try_borrow_mut() {
        Ok(mut d) => f(&mut d),
        Err(_) => error!("fluid background callback re-entered"),
    };
}
