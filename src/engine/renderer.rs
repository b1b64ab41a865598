use wasm_bindgen::prelude::*;
use web_sys::{WebGlBuffer, WebGlProgram, WebGlRenderingContext, WebGlUniformLocation};
use nalgebra::Matrix4;

use crate::engine::mesh::{self, Mesh, VERTEX_FLOATS};
use crate::engine::surface::{DrawSurface, Lighting, Material, Rgb, Stroke, TextureId};
use crate::engine::texture::Texture;

const SPHERE_STACKS: u16 = 24;
const SPHERE_SLICES: u16 = 32;
const CIRCLE_SEGMENTS: u16 = 50;

const VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute vec3 aNormal;
    attribute vec2 aTexCoord;
    uniform mat4 uViewProjection;
    uniform mat4 uModel;
    varying vec3 vNormal;
    varying vec3 vWorldPos;
    varying vec2 vTexCoord;
    void main() {
        vec4 world = uModel * vec4(aPosition, 1.0);
        vWorldPos = world.xyz;
        vNormal = (uModel * vec4(aNormal, 0.0)).xyz;
        vTexCoord = aTexCoord;
        gl_Position = uViewProjection * world;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    varying vec3 vNormal;
    varying vec3 vWorldPos;
    varying vec2 vTexCoord;
    uniform sampler2D uTexture;
    uniform int uUseTexture;
    uniform bool uLit;
    uniform vec3 uBaseColor;
    uniform vec3 uAmbient;
    uniform vec3 uDirColor;
    uniform vec3 uDirDirection;
    uniform vec3 uPointColor;
    uniform vec3 uPointPosition;

    void main() {
        vec3 color = uBaseColor;
        if (uUseTexture == 1) {
            color = texture2D(uTexture, vTexCoord).rgb;
        }

        if (uLit) {
            vec3 n = normalize(vNormal);
            float diffuseDir = max(dot(n, -normalize(uDirDirection)), 0.0);
            float diffusePoint = max(dot(n, normalize(uPointPosition - vWorldPos)), 0.0);
            vec3 light = uAmbient + uDirColor * diffuseDir + uPointColor * diffusePoint;
            color *= min(light, vec3(1.0));
        }

        gl_FragColor = vec4(color, 1.0);
    }
"#;

pub struct Renderer {
    pub gl: WebGlRenderingContext,
    a_position: u32,
    a_normal: u32,
    a_tex_coord: u32,
    u_view_projection: WebGlUniformLocation,
    u_model: WebGlUniformLocation,
    u_texture: WebGlUniformLocation,
    u_use_texture: WebGlUniformLocation,
    u_lit: WebGlUniformLocation,
    u_base_color: WebGlUniformLocation,
    u_ambient: WebGlUniformLocation,
    u_dir_color: WebGlUniformLocation,
    u_dir_direction: WebGlUniformLocation,
    u_point_color: WebGlUniformLocation,
    u_point_position: WebGlUniformLocation,
    sphere_vertex_buffer: WebGlBuffer,
    sphere_index_buffer: WebGlBuffer,
    sphere_index_count: i32,
    circle_buffer: WebGlBuffer,
    circle_vertex_count: i32,
    width: i32,
    height: i32,
    textures: Vec<Texture>,
}

impl Renderer {
    pub fn new(gl: WebGlRenderingContext) -> Result<Self, JsValue> {
        let program = create_program(&gl)?;
        gl.use_program(Some(&program));

        let a_position = attrib(&gl, &program, "aPosition")?;
        let a_normal = attrib(&gl, &program, "aNormal")?;
        let a_tex_coord = attrib(&gl, &program, "aTexCoord")?;

        let sphere = Mesh::sphere(SPHERE_STACKS, SPHERE_SLICES);
        if sphere.vertex_count() > u16::MAX as usize + 1 {
            return Err("Sphere mesh exceeds u16 index range".into());
        }
        let sphere_vertex_buffer = gl.create_buffer().ok_or("Failed to create sphere buffer")?;
        let sphere_index_buffer = gl.create_buffer().ok_or("Failed to create sphere index buffer")?;

        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&sphere_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(&sphere.vertices);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::STATIC_DRAW,
            );
        }

        gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&sphere_index_buffer));
        unsafe {
            let idx_array = js_sys::Uint16Array::view(&sphere.indices);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
                &idx_array,
                WebGlRenderingContext::STATIC_DRAW,
            );
        }

        let circle = mesh::circle(CIRCLE_SEGMENTS);
        let circle_buffer = gl.create_buffer().ok_or("Failed to create circle buffer")?;
        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&circle_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(&circle);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::STATIC_DRAW,
            );
        }

        let renderer = Renderer {
            u_view_projection: uniform(&gl, &program, "uViewProjection")?,
            u_model: uniform(&gl, &program, "uModel")?,
            u_texture: uniform(&gl, &program, "uTexture")?,
            u_use_texture: uniform(&gl, &program, "uUseTexture")?,
            u_lit: uniform(&gl, &program, "uLit")?,
            u_base_color: uniform(&gl, &program, "uBaseColor")?,
            u_ambient: uniform(&gl, &program, "uAmbient")?,
            u_dir_color: uniform(&gl, &program, "uDirColor")?,
            u_dir_direction: uniform(&gl, &program, "uDirDirection")?,
            u_point_color: uniform(&gl, &program, "uPointColor")?,
            u_point_position: uniform(&gl, &program, "uPointPosition")?,
            gl,
            a_position,
            a_normal,
            a_tex_coord,
            sphere_vertex_buffer,
            sphere_index_buffer,
            sphere_index_count: sphere.indices.len() as i32,
            circle_buffer,
            circle_vertex_count: (circle.len() / 3) as i32,
            width: 1,
            height: 1,
            textures: Vec::new(),
        };

        renderer.gl.enable(WebGlRenderingContext::DEPTH_TEST);
        renderer.gl.uniform1i(Some(&renderer.u_texture), 0);

        Ok(renderer)
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.gl.viewport(0, 0, self.width, self.height);
    }

    /// Start loading a texture; it becomes drawable once the image arrives.
    pub fn load_texture(&mut self, url: &str) -> Result<TextureId, JsValue> {
        let texture = Texture::load(&self.gl, url)?;
        self.textures.push(texture);
        Ok(TextureId(self.textures.len() - 1))
    }

    fn set_model(&self, model: &Matrix4<f32>) {
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.u_model), false, model.as_slice());
    }

    fn set_color(&self, location: &WebGlUniformLocation, color: Rgb) {
        self.gl.uniform3f(Some(location), color.r, color.g, color.b);
    }
}

impl DrawSurface for Renderer {
    fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    fn texture_ready(&self, texture: TextureId) -> bool {
        self.textures.get(texture.0).map_or(false, Texture::is_loaded)
    }

    fn clear(&mut self, color: Rgb) {
        self.gl.clear_color(color.r, color.g, color.b, 1.0);
        self.gl.clear(WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT);
    }

    fn set_lighting(&mut self, lighting: &Lighting) {
        self.set_color(&self.u_ambient, lighting.ambient);
        self.set_color(&self.u_dir_color, lighting.directional.color);
        let d = lighting.directional.direction;
        self.gl.uniform3f(Some(&self.u_dir_direction), d.x, d.y, d.z);
        self.set_color(&self.u_point_color, lighting.point.color);
        let p = lighting.point.position;
        self.gl.uniform3f(Some(&self.u_point_position), p.x, p.y, p.z);
    }

    fn set_camera(&mut self, view: &Matrix4<f32>, projection: &Matrix4<f32>) {
        let view_projection = projection * view;
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.u_view_projection), false, view_projection.as_slice());
    }

    fn draw_sphere(&mut self, model: &Matrix4<f32>, radius: f32, material: &Material) {
        match *material {
            Material::Textured(id) => match self.textures.get(id.0) {
                Some(texture) => {
                    self.gl.active_texture(WebGlRenderingContext::TEXTURE0);
                    self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture.texture));
                    self.gl.uniform1i(Some(&self.u_use_texture), 1);
                }
                None => {
                    self.gl.uniform1i(Some(&self.u_use_texture), 0);
                    self.set_color(&self.u_base_color, Rgb::WHITE);
                }
            },
            Material::Flat(color) => {
                self.gl.uniform1i(Some(&self.u_use_texture), 0);
                self.set_color(&self.u_base_color, color);
            }
        }
        self.gl.uniform1i(Some(&self.u_lit), 1);

        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.sphere_vertex_buffer));
        self.gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&self.sphere_index_buffer));

        let stride = (VERTEX_FLOATS * 4) as i32;
        self.gl.vertex_attrib_pointer_with_i32(self.a_position, 3, WebGlRenderingContext::FLOAT, false, stride, 0);
        self.gl.enable_vertex_attrib_array(self.a_position);
        self.gl.vertex_attrib_pointer_with_i32(self.a_normal, 3, WebGlRenderingContext::FLOAT, false, stride, 12);
        self.gl.enable_vertex_attrib_array(self.a_normal);
        self.gl.vertex_attrib_pointer_with_i32(self.a_tex_coord, 2, WebGlRenderingContext::FLOAT, false, stride, 24);
        self.gl.enable_vertex_attrib_array(self.a_tex_coord);

        self.set_model(&(model * Matrix4::new_scaling(radius)));

        self.gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            self.sphere_index_count,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0,
        );
    }

    fn draw_ring(&mut self, model: &Matrix4<f32>, radius: f32, stroke: &Stroke) {
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.circle_buffer));

        self.gl.vertex_attrib_pointer_with_i32(self.a_position, 3, WebGlRenderingContext::FLOAT, false, 0, 0);
        self.gl.enable_vertex_attrib_array(self.a_position);
        self.gl.disable_vertex_attrib_array(self.a_normal);
        self.gl.disable_vertex_attrib_array(self.a_tex_coord);

        self.gl.uniform1i(Some(&self.u_use_texture), 0);
        self.gl.uniform1i(Some(&self.u_lit), 0);
        self.set_color(&self.u_base_color, stroke.color);
        // Browsers clamp this to their supported range, often exactly 1.0.
        self.gl.line_width(stroke.weight);

        self.set_model(&(model * Matrix4::new_scaling(radius)));

        self.gl.draw_arrays(WebGlRenderingContext::LINE_LOOP, 0, self.circle_vertex_count);
    }
}

fn attrib(gl: &WebGlRenderingContext, program: &WebGlProgram, name: &str) -> Result<u32, JsValue> {
    let location = gl.get_attrib_location(program, name);
    u32::try_from(location).map_err(|_| JsValue::from_str(&format!("Failed to get {name} location")))
}

fn uniform(gl: &WebGlRenderingContext, program: &WebGlProgram, name: &str) -> Result<WebGlUniformLocation, JsValue> {
    gl.get_uniform_location(program, name)
        .ok_or_else(|| JsValue::from_str(&format!("Failed to get {name} location")))
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
