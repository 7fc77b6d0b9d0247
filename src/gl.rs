//! Graphics seam of the background: the handful of GL calls the pipeline
//! needs, and the one-time bootstrap that turns them into a [`Pipeline`].

use std::fmt;

use tracing::{debug, error};

use crate::error::{RenderError, RenderResult};
use crate::shader;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Operations on a WebGL2-style context. Handles are owned values; releasing
/// them is explicit through the `delete_*` calls.
pub trait GraphicsContext {
    type Shader;
    type Program;
    type Buffer;
    type Uniform;

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> RenderResult<Self::Shader>;
    fn link_program(&self, vertex: &Self::Shader, fragment: &Self::Shader) -> RenderResult<Self::Program>;
    fn use_program(&self, program: &Self::Program);

    /// Uploads static `vertices` (xy pairs) and binds them to `attribute`.
    fn upload_vertices(
        &self,
        program: &Self::Program,
        attribute: &'static str,
        vertices: &[f32],
    ) -> RenderResult<Self::Buffer>;

    fn uniform_location(&self, program: &Self::Program, name: &str) -> Option<Self::Uniform>;

    fn set_f32(&self, location: Option<&Self::Uniform>, value: f32);
    fn set_vec2(&self, location: Option<&Self::Uniform>, x: f32, y: f32);
    fn set_vec4_array(&self, location: Option<&Self::Uniform>, values: &[f32]);
    fn set_i32(&self, location: Option<&Self::Uniform>, value: i32);

    fn viewport(&self, width: u32, height: u32);
    fn draw_triangles(&self, vertex_count: i32);

    fn delete_shader(&self, shader: Self::Shader);
    fn delete_program(&self, program: Self::Program);
    fn delete_buffer(&self, buffer: Self::Buffer);
}

/// Values pushed before every draw.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameUniforms {
    pub time: f32,
    pub resolution: [f32; 2],
    /// Flattened RGBA, at most ten entries.
    pub colors: Vec<f32>,
    pub color_count: i32,
}

struct UniformSlots<U> {
    time: Option<U>,
    resolution: Option<U>,
    colors: Option<U>,
    color_count: Option<U>,
}

/// Compiled program, its shaders and the quad buffer. Owned by exactly one
/// driver and released with [`Pipeline::release`].
pub struct Pipeline<C: GraphicsContext> {
    program: C::Program,
    vertex: C::Shader,
    fragment: C::Shader,
    quad: C::Buffer,
    uniforms: UniformSlots<C::Uniform>,
}

impl<C: GraphicsContext> Pipeline<C> {
    /// Compiles and links the background shaders, activates the program and
    /// uploads the full-screen quad. Everything created so far is deleted
    /// again when a step fails.
    pub fn bootstrap(ctx: &C) -> RenderResult<Self> {
        let vertex = ctx
            .compile_shader(ShaderStage::Vertex, shader::VERTEX_SHADER)
            .inspect_err(|e| error!("{e}"))?;
        let fragment = match ctx.compile_shader(ShaderStage::Fragment, shader::FRAGMENT_SHADER) {
            Ok(s) => s,
            Err(e) => {
                error!("{e}");
                ctx.delete_shader(vertex);
                return Err(e);
            }
        };

        let program = match ctx.link_program(&vertex, &fragment) {
            Ok(p) => p,
            Err(e) => {
                error!("{e}");
                ctx.delete_shader(vertex);
                ctx.delete_shader(fragment);
                return Err(e);
            }
        };
        ctx.use_program(&program);

        let quad = match ctx.upload_vertices(&program, shader::POSITION_ATTRIBUTE, &shader::QUAD_VERTICES) {
            Ok(b) => b,
            Err(e) => {
                error!("{e}");
                ctx.delete_program(program);
                ctx.delete_shader(vertex);
                ctx.delete_shader(fragment);
                return Err(e);
            }
        };

        let uniforms = UniformSlots {
            time: ctx.uniform_location(&program, shader::U_TIME),
            resolution: ctx.uniform_location(&program, shader::U_RESOLUTION),
            colors: ctx.uniform_location(&program, shader::U_COLORS),
            color_count: ctx.uniform_location(&program, shader::U_COLORS_COUNT),
        };
        debug!(
            time = uniforms.time.is_some(),
            resolution = uniforms.resolution.is_some(),
            colors = uniforms.colors.is_some(),
            color_count = uniforms.color_count.is_some(),
            "resolved uniforms"
        );

        Ok(Self {
            program,
            vertex,
            fragment,
            quad,
            uniforms,
        })
    }

    /// Uploads `frame` and issues the single draw call for the quad.
    pub fn draw(&self, ctx: &C, frame: &FrameUniforms) {
        ctx.set_f32(self.uniforms.time.as_ref(), frame.time);
        ctx.set_vec2(self.uniforms.resolution.as_ref(), frame.resolution[0], frame.resolution[1]);
        if !frame.colors.is_empty() {
            ctx.set_vec4_array(self.uniforms.colors.as_ref(), &frame.colors);
        }
        ctx.set_i32(self.uniforms.color_count.as_ref(), frame.color_count);
        ctx.draw_triangles(shader::QUAD_VERTEX_COUNT);
    }

    pub fn release(self, ctx: &C) {
        ctx.delete_buffer(self.quad);
        ctx.delete_program(self.program);
        ctx.delete_shader(self.vertex);
        ctx.delete_shader(self.fragment);
    }
}
