//! [`GlApi`] for a live `glow::Context`.

use super::{ActiveUniform, GlApi, ProgramBinary, ShaderStage, UniformValue};
use crate::uniform::dispatch::BindingFunction;
use glow::HasContext;

/// First four values of `v`, zero-filled when it is shorter.
fn lanes<T: Copy + Default>(v: &[T]) -> [T; 4] {
    let mut out = [T::default(); 4];
    for (slot, value) in out.iter_mut().zip(v) {
        *slot = *value;
    }
    out
}

// SAFETY (whole impl): glow marks every GL entry point unsafe. Each call
// below passes handles obtained from this same context, and the trait is
// only used on the thread that made the context current.
#[allow(unsafe_code)]
impl GlApi for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<glow::Shader, String> {
        unsafe { HasContext::create_shader(self, stage.gl_enum()) }
    }

    fn shader_source(&self, shader: glow::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: glow::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: glow::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: glow::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn program_binary_retrievable_hint(&self, program: glow::Program) {
        unsafe { HasContext::program_binary_retrievable_hint(self, program, true) }
    }

    fn attach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: glow::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: glow::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn num_program_binary_formats(&self) -> i32 {
        unsafe { self.get_parameter_i32(glow::NUM_PROGRAM_BINARY_FORMATS) }
    }

    fn program_binary(&self, program: glow::Program) -> Option<ProgramBinary> {
        unsafe { self.get_program_binary(program) }.map(|b| ProgramBinary {
            format: b.format,
            bytes: b.buffer,
        })
    }

    fn attrib_location(&self, program: glow::Program, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program, name) }
    }

    fn bind_new_vertex_array(&self) -> Result<(), String> {
        unsafe {
            let vao = self.create_vertex_array()?;
            self.bind_vertex_array(Some(vao));
        }
        Ok(())
    }

    fn upload_positions(&self, location: u32, vertices: &[f32]) -> Result<(), String> {
        unsafe {
            let vbo = self.create_buffer()?;
            self.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );
            self.enable_vertex_attrib_array(location);
            self.vertex_attrib_pointer_f32(location, 2, glow::FLOAT, false, 0, 0);
        }
        Ok(())
    }

    fn use_program(&self, program: glow::Program) {
        unsafe { HasContext::use_program(self, Some(program)) }
    }

    fn active_uniform_count(&self, program: glow::Program) -> u32 {
        unsafe { self.get_active_uniforms(program) }
    }

    fn active_uniform(&self, program: glow::Program, index: u32) -> Option<ActiveUniform> {
        unsafe { self.get_active_uniform(program, index) }.map(|u| ActiveUniform {
            name: u.name,
            size: u.size,
            utype: u.utype,
        })
    }

    fn uniform_location(&self, program: glow::Program, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn set_uniform(
        &self,
        location: &glow::UniformLocation,
        func: &BindingFunction,
        value: &UniformValue,
    ) {
        let loc = Some(location);
        unsafe {
            match (value, func.array) {
                (UniformValue::Float(v), false) => {
                    let [x, y, z, w] = lanes(v.as_slice());
                    match func.components {
                        1 => self.uniform_1_f32(loc, x),
                        2 => self.uniform_2_f32(loc, x, y),
                        3 => self.uniform_3_f32(loc, x, y, z),
                        _ => self.uniform_4_f32(loc, x, y, z, w),
                    }
                }
                (UniformValue::Int(v), false) => {
                    let [x, y, z, w] = lanes(v.as_slice());
                    match func.components {
                        1 => self.uniform_1_i32(loc, x),
                        2 => self.uniform_2_i32(loc, x, y),
                        3 => self.uniform_3_i32(loc, x, y, z),
                        _ => self.uniform_4_i32(loc, x, y, z, w),
                    }
                }
                (UniformValue::Uint(v), false) => {
                    let [x, y, z, w] = lanes(v.as_slice());
                    match func.components {
                        1 => self.uniform_1_u32(loc, x),
                        2 => self.uniform_2_u32(loc, x, y),
                        3 => self.uniform_3_u32(loc, x, y, z),
                        _ => self.uniform_4_u32(loc, x, y, z, w),
                    }
                }
                (UniformValue::Float(v), true) => match func.components {
                    1 => self.uniform_1_f32_slice(loc, v),
                    2 => self.uniform_2_f32_slice(loc, v),
                    3 => self.uniform_3_f32_slice(loc, v),
                    _ => self.uniform_4_f32_slice(loc, v),
                },
                (UniformValue::Int(v), true) => match func.components {
                    1 => self.uniform_1_i32_slice(loc, v),
                    2 => self.uniform_2_i32_slice(loc, v),
                    3 => self.uniform_3_i32_slice(loc, v),
                    _ => self.uniform_4_i32_slice(loc, v),
                },
                (UniformValue::Uint(v), true) => match func.components {
                    1 => self.uniform_1_u32_slice(loc, v),
                    2 => self.uniform_2_u32_slice(loc, v),
                    3 => self.uniform_3_u32_slice(loc, v),
                    _ => self.uniform_4_u32_slice(loc, v),
                },
            }
        }
    }

    fn error(&self) -> u32 {
        unsafe { self.get_error() }
    }

    fn viewport(&self, width: u32, height: u32) {
        unsafe { HasContext::viewport(self, 0, 0, width as i32, height as i32) }
    }

    fn clear(&self, [r, g, b, a]: [f32; 4]) {
        unsafe {
            self.clear_color(r, g, b, a);
            HasContext::clear(self, glow::COLOR_BUFFER_BIT);
        }
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { self.draw_arrays(glow::TRIANGLES, first, count) }
    }

    fn flush(&self) {
        unsafe { HasContext::flush(self) }
    }

    fn read_pixels(&self, width: u32, height: u32) -> Vec<u8> {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        unsafe {
            self.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
            HasContext::read_pixels(
                self,
                0,
                0,
                width as i32,
                height as i32,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(pixels.as_mut_slice())),
            );
        }
        pixels
    }
}
