//! Recording stand-ins for the browser used by the driver tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::driver::{Drawable, FrameHandle, FrameHost};
use crate::error::{RenderError, RenderResult};
use crate::gl::{GraphicsContext, ShaderStage};
use crate::surface::SurfaceSize;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Compile(ShaderStage),
    Link,
    UseProgram,
    Upload(&'static str, usize),
    SetF32(String, f32),
    SetVec2(String, f32, f32),
    SetVec4Array(String, Vec<f32>),
    SetI32(String, i32),
    Viewport(u32, u32),
    Draw(i32),
    DeleteShader,
    DeleteProgram,
    DeleteBuffer,
}

#[derive(Default)]
pub struct GlLog {
    pub calls: Vec<Call>,
    pub fail_compile: Option<ShaderStage>,
    pub fail_link: bool,
    pub live_objects: i32,
}

impl GlLog {
    pub fn draws(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Draw(_))).count()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

#[derive(Clone, Default)]
pub struct RecordingContext {
    pub log: Rc<RefCell<GlLog>>,
}

impl RecordingContext {
    fn record(&self, call: Call) {
        self.log.borrow_mut().calls.push(call);
    }

    fn create(&self) {
        self.log.borrow_mut().live_objects += 1;
    }

    fn destroy(&self, call: Call) {
        let mut log = self.log.borrow_mut();
        log.live_objects -= 1;
        log.calls.push(call);
    }
}

impl GraphicsContext for RecordingContext {
    type Shader = ShaderStage;
    type Program = ();
    type Buffer = ();
    type Uniform = String;

    fn compile_shader(&self, stage: ShaderStage, _source: &str) -> RenderResult<ShaderStage> {
        self.record(Call::Compile(stage));
        if self.log.borrow().fail_compile == Some(stage) {
            return Err(RenderError::Compile {
                stage,
                log: "ERROR: 0:1: forced".into(),
            });
        }
        self.create();
        Ok(stage)
    }

    fn link_program(&self, _vertex: &ShaderStage, _fragment: &ShaderStage) -> RenderResult<()> {
        self.record(Call::Link);
        if self.log.borrow().fail_link {
            return Err(RenderError::Link("forced".into()));
        }
        self.create();
        Ok(())
    }

    fn use_program(&self, _program: &()) {
        self.record(Call::UseProgram);
    }

    fn upload_vertices(&self, _program: &(), attribute: &'static str, vertices: &[f32]) -> RenderResult<()> {
        self.record(Call::Upload(attribute, vertices.len()));
        self.create();
        Ok(())
    }

    fn uniform_location(&self, _program: &(), name: &str) -> Option<String> {
        Some(name.to_string())
    }

    fn set_f32(&self, location: Option<&String>, value: f32) {
        if let Some(name) = location {
            self.record(Call::SetF32(name.clone(), value));
        }
    }

    fn set_vec2(&self, location: Option<&String>, x: f32, y: f32) {
        if let Some(name) = location {
            self.record(Call::SetVec2(name.clone(), x, y));
        }
    }

    fn set_vec4_array(&self, location: Option<&String>, values: &[f32]) {
        if let Some(name) = location {
            self.record(Call::SetVec4Array(name.clone(), values.to_vec()));
        }
    }

    fn set_i32(&self, location: Option<&String>, value: i32) {
        if let Some(name) = location {
            self.record(Call::SetI32(name.clone(), value));
        }
    }

    fn viewport(&self, width: u32, height: u32) {
        self.record(Call::Viewport(width, height));
    }

    fn draw_triangles(&self, vertex_count: i32) {
        self.record(Call::Draw(vertex_count));
    }

    fn delete_shader(&self, _shader: ShaderStage) {
        self.destroy(Call::DeleteShader);
    }

    fn delete_program(&self, _program: ()) {
        self.destroy(Call::DeleteProgram);
    }

    fn delete_buffer(&self, _buffer: ()) {
        self.destroy(Call::DeleteBuffer);
    }
}

pub struct HostLog {
    pub device_pixel_ratio: f64,
    pub next_handle: FrameHandle,
    pub pending: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
    pub resize_attached: bool,
    pub fail_request: bool,
}

impl Default for HostLog {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            next_handle: 1,
            pending: Vec::new(),
            cancelled: Vec::new(),
            resize_attached: false,
            fail_request: false,
        }
    }
}

#[derive(Clone, Default)]
pub struct ManualHost {
    pub log: Rc<RefCell<HostLog>>,
}

impl ManualHost {
    /// Takes the oldest scheduled callback, as the browser would fire it.
    pub fn fire(&self) -> Option<FrameHandle> {
        let mut log = self.log.borrow_mut();
        if log.pending.is_empty() {
            None
        } else {
            Some(log.pending.remove(0))
        }
    }
}

impl FrameHost for ManualHost {
    fn request_frame(&mut self) -> RenderResult<FrameHandle> {
        let mut log = self.log.borrow_mut();
        if log.fail_request {
            return Err(RenderError::host("requestAnimationFrame refused"));
        }
        let handle = log.next_handle;
        log.next_handle += 1;
        log.pending.push(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut log = self.log.borrow_mut();
        log.pending.retain(|h| *h != handle);
        log.cancelled.push(handle);
    }

    fn attach_resize(&mut self) -> RenderResult<()> {
        self.log.borrow_mut().resize_attached = true;
        Ok(())
    }

    fn detach_resize(&mut self) {
        self.log.borrow_mut().resize_attached = false;
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.log.borrow().device_pixel_ratio
    }
}

#[derive(Default)]
pub struct CanvasState {
    pub css: (f64, f64),
    pub backing: SurfaceSize,
    pub resizes: u32,
}

#[derive(Clone, Default)]
pub struct FakeCanvas {
    pub state: Rc<RefCell<CanvasState>>,
}

impl FakeCanvas {
    pub fn with_css(width: f64, height: f64) -> Self {
        let canvas = Self::default();
        canvas.state.borrow_mut().css = (width, height);
        canvas
    }

    pub fn set_css(&self, width: f64, height: f64) {
        self.state.borrow_mut().css = (width, height);
    }
}

impl Drawable for FakeCanvas {
    fn css_size(&self) -> (f64, f64) {
        self.state.borrow().css
    }

    fn backing_size(&self) -> SurfaceSize {
        self.state.borrow().backing
    }

    fn set_backing_size(&self, size: SurfaceSize) {
        let mut state = self.state.borrow_mut();
        state.backing = size;
        state.resizes += 1;
    }
}
