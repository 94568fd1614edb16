use wasm_bindgen::prelude::*;
use web_sys::{WebGlRenderingContext, WebGlProgram, WebGlBuffer, WebGlUniformLocation, HtmlCanvasElement, WebGlTexture};
use nalgebra::{Matrix3, Matrix4, Vector3};
use crate::engine::mesh::Mesh;

const VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute vec3 aColor;
    attribute vec2 aTexCoord;
    uniform mat4 uModelViewProjection;
    varying vec3 vColor;
    varying vec2 vTexCoord;
    void main() {
        gl_Position = uModelViewProjection * vec4(aPosition, 1.0);
        vColor = aColor;
        vTexCoord = aTexCoord;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    varying vec3 vColor;
    varying vec2 vTexCoord;
    uniform sampler2D uTexture;
    uniform int uUseTexture;

    void main() {
        vec4 color = vec4(vColor, 1.0);
        if (uUseTexture == 1) {
            color *= texture2D(uTexture, vTexCoord);
        }
        gl_FragColor = color;
    }
"#;

const STRIDE: i32 = 32; // 8 floats per vertex

pub struct Renderer {
    pub gl: WebGlRenderingContext,
    mvp_location: WebGlUniformLocation,
    u_use_texture_location: WebGlUniformLocation,
    position_location: u32,
    color_location: u32,
    texcoord_location: u32,
    quad_vertex_buffer: WebGlBuffer,
    quad_index_buffer: WebGlBuffer,
    quad_index_count: i32,
    dynamic_vertex_buffer: WebGlBuffer,
    dynamic_index_buffer: WebGlBuffer,
}

impl Renderer {
    pub fn new(gl: WebGlRenderingContext) -> Result<Self, JsValue> {
        let program = create_program(&gl)?;
        gl.use_program(Some(&program));

        let mvp_location = gl.get_uniform_location(&program, "uModelViewProjection")
            .ok_or("Failed to get uModelViewProjection location")?;
        let u_use_texture_location = gl.get_uniform_location(&program, "uUseTexture")
            .ok_or("Failed to get uUseTexture location")?;

        let position_location = gl.get_attrib_location(&program, "aPosition") as u32;
        let color_location = gl.get_attrib_location(&program, "aColor") as u32;
        let texcoord_location = gl.get_attrib_location(&program, "aTexCoord") as u32;

        let dynamic_vertex_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;
        let dynamic_index_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;

        // Shared unit quad for billboard sprites.
        let quad_vertex_buffer = gl.create_buffer().ok_or("Failed to create quad buffer")?;
        let quad_index_buffer = gl.create_buffer().ok_or("Failed to create quad index buffer")?;

        let quad = Mesh::plane(1.0, 1.0);

        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&quad_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(&quad.vertices);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::STATIC_DRAW,
            );
        }

        gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&quad_index_buffer));
        unsafe {
            let idx_array = js_sys::Uint16Array::view(&quad.indices);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
                &idx_array,
                WebGlRenderingContext::STATIC_DRAW,
            );
        }
        let quad_index_count = quad.indices.len() as i32;

        Ok(Renderer {
            gl,
            mvp_location,
            u_use_texture_location,
            position_location,
            color_location,
            texcoord_location,
            quad_vertex_buffer,
            quad_index_buffer,
            quad_index_count,
            dynamic_vertex_buffer,
            dynamic_index_buffer,
        })
    }

    pub fn clear(&self, r: f32, g: f32, b: f32) {
        self.gl.clear_color(r, g, b, 1.0);
        self.gl.clear(WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self) {
        self.gl.enable(WebGlRenderingContext::DEPTH_TEST);
    }

    pub fn enable_blend(&self) {
        self.gl.enable(WebGlRenderingContext::BLEND);
        self.gl.blend_func(WebGlRenderingContext::SRC_ALPHA, WebGlRenderingContext::ONE_MINUS_SRC_ALPHA);
    }

    pub fn disable_blend(&self) {
        self.gl.disable(WebGlRenderingContext::BLEND);
    }

    pub fn resize(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    fn bind_vertex_layout(&self) {
        self.gl.vertex_attrib_pointer_with_i32(self.position_location, 3, WebGlRenderingContext::FLOAT, false, STRIDE, 0);
        self.gl.enable_vertex_attrib_array(self.position_location);

        self.gl.vertex_attrib_pointer_with_i32(self.color_location, 3, WebGlRenderingContext::FLOAT, false, STRIDE, 12);
        self.gl.enable_vertex_attrib_array(self.color_location);

        self.gl.vertex_attrib_pointer_with_i32(self.texcoord_location, 2, WebGlRenderingContext::FLOAT, false, STRIDE, 24);
        self.gl.enable_vertex_attrib_array(self.texcoord_location);
    }

    fn set_mvp(&self, mvp: &Matrix4<f32>) {
        let mvp_array: [f32; 16] = mvp.as_slice().try_into().unwrap();
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.mvp_location), false, &mvp_array);
    }

    fn bind_texture_slot(&self, texture: Option<&WebGlTexture>) {
        if let Some(tex) = texture {
            self.gl.active_texture(WebGlRenderingContext::TEXTURE0);
            self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(tex));
            self.gl.uniform1i(Some(&self.u_use_texture_location), 1);
        } else {
            self.gl.uniform1i(Some(&self.u_use_texture_location), 0);
        }
    }

    pub fn draw_mesh(
        &self,
        mesh: &Mesh,
        model: &Matrix4<f32>,
        projection: &Matrix4<f32>,
        view: &Matrix4<f32>,
        texture: Option<&WebGlTexture>,
    ) {
        self.bind_texture_slot(texture);

        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.dynamic_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(&mesh.vertices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }

        self.gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&self.dynamic_index_buffer));
        unsafe {
            let idx_array = js_sys::Uint16Array::view(&mesh.indices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
                &idx_array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }

        self.bind_vertex_layout();
        self.set_mvp(&(projection * view * model));

        self.gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            mesh.indices.len() as i32,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0,
        );
    }

    /// Draws the shared unit quad as a camera-facing billboard at a fixed
    /// world-space scale, textured with `texture`.
    pub fn draw_sprite(
        &self,
        texture: &WebGlTexture,
        position: &Vector3<f32>,
        scale_x: f32,
        scale_y: f32,
        projection: &Matrix4<f32>,
        view: &Matrix4<f32>,
    ) {
        self.bind_texture_slot(Some(texture));

        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.quad_vertex_buffer));
        self.gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&self.quad_index_buffer));
        self.bind_vertex_layout();

        // Cancel the view rotation so the quad always faces the camera.
        let facing: Matrix3<f32> = view.fixed_view::<3, 3>(0, 0).transpose();
        let scaled = facing * Matrix3::from_diagonal(&Vector3::new(scale_x, scale_y, 1.0));

        let mut model = Matrix4::identity();
        model.fixed_view_mut::<3, 3>(0, 0).copy_from(&scaled);
        model[(0, 3)] = position.x;
        model[(1, 3)] = position.y;
        model[(2, 3)] = position.z;

        self.set_mvp(&(projection * view * model));

        self.gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            self.quad_index_count,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0,
        );
    }

    /// Uploads an offscreen 2D canvas as a new texture.
    pub fn create_canvas_texture(&self, canvas: &HtmlCanvasElement) -> Result<WebGlTexture, JsValue> {
        let texture = self.gl.create_texture().ok_or("Failed to create texture")?;
        self.upload_canvas(&texture, canvas)?;
        Ok(texture)
    }

    /// Re-uploads a canvas into an existing texture, for panels repainted
    /// after creation.
    pub fn update_canvas_texture(&self, texture: &WebGlTexture, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        self.upload_canvas(texture, canvas)
    }

    fn upload_canvas(&self, texture: &WebGlTexture, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(texture));
        // Canvas rows are top-down, texture coordinates bottom-up.
        self.gl.pixel_storei(WebGlRenderingContext::UNPACK_FLIP_Y_WEBGL, 1);
        self.gl.tex_image_2d_with_u32_and_u32_and_canvas(
            WebGlRenderingContext::TEXTURE_2D,
            0,
            WebGlRenderingContext::RGBA as i32,
            WebGlRenderingContext::RGBA,
            WebGlRenderingContext::UNSIGNED_BYTE,
            canvas,
        )?;

        if is_power_of_2(canvas.width()) && is_power_of_2(canvas.height()) {
            self.gl.generate_mipmap(WebGlRenderingContext::TEXTURE_2D);
        } else {
            self.gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_S, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
            self.gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_T, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
            self.gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_MIN_FILTER, WebGlRenderingContext::LINEAR as i32);
        }

        Ok(())
    }
}

fn is_power_of_2(value: u32) -> bool {
    (value & (value - 1)) == 0
}

fn create_program(gl: &WebGlRenderingContext) -> Result<WebGlProgram, JsValue> {
    let vert_shader = compile_shader(gl, WebGlRenderingContext::VERTEX_SHADER, VERTEX_SHADER)?;
    let frag_shader = compile_shader(gl, WebGlRenderingContext::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl.create_program().ok_or("Unable to create program")?;
    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);

    if gl.get_program_parameter(&program, WebGlRenderingContext::LINK_STATUS).as_bool().unwrap_or(false) {
        Ok(program)
    } else {
        Err(JsValue::from_str(&gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn compile_shader(gl: &WebGlRenderingContext, shader_type: u32, source: &str) -> Result<web_sys::WebGlShader, JsValue> {
    let shader = gl.create_shader(shader_type).ok_or("Unable to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.get_shader_parameter(&shader, WebGlRenderingContext::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        Err(JsValue::from_str(&gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}
