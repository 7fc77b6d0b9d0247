use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

use crate::error::{RenderError, RenderResult};
use crate::gl::{GraphicsContext, ShaderStage};
use crate::web::describe;

/// WebGL2 implementation of [`GraphicsContext`].
pub struct WebGlContext {
    gl: GL,
}

impl WebGlContext {
    /// Requests a `webgl2` context with alpha and antialiasing.
    pub fn acquire(canvas: &HtmlCanvasElement) -> RenderResult<Self> {
        let options = js_sys::Object::new();
        for key in ["alpha", "antialias"] {
            js_sys::Reflect::set(&options, &JsValue::from_str(key), &JsValue::TRUE)
                .map_err(|e| RenderError::ContextUnavailable(describe(&e)))?;
        }

        let gl = canvas
            .get_context_with_context_options("webgl2", &options)
            .map_err(|e| RenderError::ContextUnavailable(describe(&e)))?
            .ok_or_else(|| RenderError::ContextUnavailable("WebGL2 not supported".into()))?
            .dyn_into::<GL>()
            .map_err(|_| RenderError::ContextUnavailable("context is not WebGL2".into()))?;
        Ok(Self { gl })
    }
}

impl GraphicsContext for WebGlContext {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Buffer = WebGlBuffer;
    type Uniform = WebGlUniformLocation;

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> RenderResult<WebGlShader> {
        let kind = match stage {
            ShaderStage::Vertex => GL::VERTEX_SHADER,
            ShaderStage::Fragment => GL::FRAGMENT_SHADER,
        };
        let shader = self
            .gl
            .create_shader(kind)
            .ok_or(RenderError::Allocation("shader"))?;
        self.gl.shader_source(&shader, source);
        self.gl.compile_shader(&shader);

        let compiled = self
            .gl
            .get_shader_parameter(&shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if compiled {
            Ok(shader)
        } else {
            let log = self.gl.get_shader_info_log(&shader).unwrap_or_default();
            self.gl.delete_shader(Some(&shader));
            Err(RenderError::Compile { stage, log })
        }
    }

    fn link_program(&self, vertex: &WebGlShader, fragment: &WebGlShader) -> RenderResult<WebGlProgram> {
        let program = self
            .gl
            .create_program()
            .ok_or(RenderError::Allocation("program"))?;
        self.gl.attach_shader(&program, vertex);
        self.gl.attach_shader(&program, fragment);
        self.gl.link_program(&program);

        let linked = self
            .gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if linked {
            Ok(program)
        } else {
            let log = self.gl.get_program_info_log(&program).unwrap_or_default();
            self.gl.delete_program(Some(&program));
            Err(RenderError::Link(log))
        }
    }

    fn use_program(&self, program: &WebGlProgram) {
        self.gl.use_program(Some(program));
    }

    fn upload_vertices(
        &self,
        program: &WebGlProgram,
        attribute: &'static str,
        vertices: &[f32],
    ) -> RenderResult<WebGlBuffer> {
        let location = self.gl.get_attrib_location(program, attribute);
        if location < 0 {
            return Err(RenderError::MissingAttribute(attribute));
        }

        let buffer = self
            .gl
            .create_buffer()
            .ok_or(RenderError::Allocation("vertex buffer"))?;
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let data = js_sys::Float32Array::from(vertices);
        self.gl
            .buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);

        let location = location as u32;
        self.gl.enable_vertex_attrib_array(location);
        self.gl
            .vertex_attrib_pointer_with_i32(location, 2, GL::FLOAT, false, 0, 0);
        Ok(buffer)
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    fn set_f32(&self, location: Option<&WebGlUniformLocation>, value: f32) {
        self.gl.uniform1f(location, value);
    }

    fn set_vec2(&self, location: Option<&WebGlUniformLocation>, x: f32, y: f32) {
        self.gl.uniform2f(location, x, y);
    }

    fn set_vec4_array(&self, location: Option<&WebGlUniformLocation>, values: &[f32]) {
        self.gl.uniform4fv_with_f32_array(location, values);
    }

    fn set_i32(&self, location: Option<&WebGlUniformLocation>, value: i32) {
        self.gl.uniform1i(location, value);
    }

    fn viewport(&self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    fn draw_triangles(&self, vertex_count: i32) {
        self.gl.draw_arrays(GL::TRIANGLES, 0, vertex_count);
    }

    fn delete_shader(&self, shader: WebGlShader) {
        self.gl.delete_shader(Some(&shader));
    }

    fn delete_program(&self, program: WebGlProgram) {
        self.gl.delete_program(Some(&program));
    }

    fn delete_buffer(&self, buffer: WebGlBuffer) {
        self.gl.delete_buffer(Some(&buffer));
    }
}
