//! Recording doubles for [`GlApi`] and [`FileSystem`], used by unit tests.

use crate::error::RenderError;
use crate::fs::FileSystem;
use crate::gl::{ActiveUniform, GlApi, ProgramBinary, ShaderStage, UniformValue};
use crate::uniform::BindingFunction;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A fake GL context: hands out integer handles and records every call.
#[derive(Debug)]
pub struct RecordingGl {
    next_handle: Cell<u32>,
    stages: RefCell<HashMap<u32, ShaderStage>>,
    calls: RefCell<Vec<String>>,
    uniforms: Vec<ActiveUniform>,
    hidden_locations: RefCell<Vec<String>>,
    uniform_calls: RefCell<Vec<(String, String, UniformValue)>>,
    pending_error: Cell<u32>,
    uniform_error: Cell<Option<u32>>,
    failing_stage: Cell<Option<ShaderStage>>,
    link_log: RefCell<Option<String>>,
    binary_formats: Cell<i32>,
    binary: RefCell<Option<ProgramBinary>>,
    position_attribute: Cell<Option<u32>>,
    framebuffer: RefCell<Option<Vec<u8>>>,
    refuse_objects: Cell<bool>,
}

impl Default for RecordingGl {
    fn default() -> Self {
        Self {
            next_handle: Cell::new(1),
            stages: RefCell::default(),
            calls: RefCell::default(),
            uniforms: Vec::new(),
            hidden_locations: RefCell::default(),
            uniform_calls: RefCell::default(),
            pending_error: Cell::new(glow::NO_ERROR),
            uniform_error: Cell::new(None),
            failing_stage: Cell::new(None),
            link_log: RefCell::new(None),
            binary_formats: Cell::new(1),
            binary: RefCell::new(None),
            position_attribute: Cell::new(Some(0)),
            framebuffer: RefCell::new(None),
            refuse_objects: Cell::new(false),
        }
    }
}

impl RecordingGl {
    pub fn with_uniforms(uniforms: Vec<ActiveUniform>) -> Self {
        Self {
            uniforms,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// `(uniform name, binding function, values)` per `set_uniform` call.
    pub fn uniform_calls(&self) -> Vec<(String, String, UniformValue)> {
        self.uniform_calls.borrow().clone()
    }

    pub fn hide_location(&self, name: &str) {
        self.hidden_locations.borrow_mut().push(name.to_string());
    }

    pub fn fail_uniform_calls(&self, code: u32) {
        self.uniform_error.set(Some(code));
    }

    pub fn fail_compile(&self, stage: ShaderStage) {
        self.failing_stage.set(Some(stage));
    }

    pub fn fail_link(&self, log: &str) {
        *self.link_log.borrow_mut() = Some(log.to_string());
    }

    pub fn set_binary_formats(&self, n: i32) {
        self.binary_formats.set(n);
    }

    pub fn set_binary(&self, binary: ProgramBinary) {
        *self.binary.borrow_mut() = Some(binary);
    }

    pub fn drop_position_attribute(&self) {
        self.position_attribute.set(None);
    }

    pub fn set_framebuffer(&self, pixels: Vec<u8>) {
        *self.framebuffer.borrow_mut() = Some(pixels);
    }

    /// Makes every `create_*` call fail, as a driver out of handles would.
    pub fn refuse_objects(&self) {
        self.refuse_objects.set(true);
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn handle(&self) -> u32 {
        let h = self.next_handle.get();
        self.next_handle.set(h + 1);
        h
    }
}

impl GlApi for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = String;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        if self.refuse_objects.get() {
            return Err("out of shader handles".into());
        }
        let h = self.handle();
        self.stages.borrow_mut().insert(h, stage);
        self.record(format!("create_shader {}", stage.name()));
        Ok(h)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.record(format!("shader_source {shader} {source}"));
    }

    fn compile_shader(&self, shader: u32) {
        self.record(format!("compile_shader {shader}"));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        let stage = self.stages.borrow().get(&shader).copied();
        stage.is_none() || stage != self.failing_stage.get()
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        "0:1(1): error: syntax error, unexpected IDENTIFIER".to_string()
    }

    fn create_program(&self) -> Result<u32, String> {
        if self.refuse_objects.get() {
            return Err("out of program handles".into());
        }
        let h = self.handle();
        self.record("create_program");
        Ok(h)
    }

    fn program_binary_retrievable_hint(&self, _program: u32) {
        self.record("program_binary_retrievable_hint");
    }

    fn attach_shader(&self, _program: u32, shader: u32) {
        self.record(format!("attach_shader {shader}"));
    }

    fn link_program(&self, _program: u32) {
        self.record("link_program");
    }

    fn program_link_status(&self, _program: u32) -> bool {
        self.link_log.borrow().is_none()
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.link_log.borrow().clone().unwrap_or_default()
    }

    fn num_program_binary_formats(&self) -> i32 {
        self.binary_formats.get()
    }

    fn program_binary(&self, _program: u32) -> Option<ProgramBinary> {
        self.record("program_binary");
        self.binary.borrow().clone()
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.record(format!("attrib_location {name}"));
        self.position_attribute.get()
    }

    fn bind_new_vertex_array(&self) -> Result<(), String> {
        self.record("bind_new_vertex_array");
        Ok(())
    }

    fn upload_positions(&self, location: u32, vertices: &[f32]) -> Result<(), String> {
        self.record(format!("upload_positions {location} {}", vertices.len()));
        Ok(())
    }

    fn use_program(&self, program: u32) {
        self.record(format!("use_program {program}"));
    }

    fn active_uniform_count(&self, _program: u32) -> u32 {
        self.uniforms.len() as u32
    }

    fn active_uniform(&self, _program: u32, index: u32) -> Option<ActiveUniform> {
        self.uniforms.get(index as usize).cloned()
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<String> {
        if self.hidden_locations.borrow().iter().any(|n| n == name) {
            None
        } else {
            Some(name.to_string())
        }
    }

    fn set_uniform(&self, location: &String, func: &BindingFunction, value: &UniformValue) {
        self.uniform_calls
            .borrow_mut()
            .push((location.clone(), func.name.to_string(), value.clone()));
        if let Some(code) = self.uniform_error.get() {
            self.pending_error.set(code);
        }
    }

    fn error(&self) -> u32 {
        self.pending_error.replace(glow::NO_ERROR)
    }

    fn viewport(&self, width: u32, height: u32) {
        self.record(format!("viewport {width}x{height}"));
    }

    fn clear(&self, rgba: [f32; 4]) {
        self.record(format!("clear {rgba:?}"));
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(format!("draw_triangles {first} {count}"));
    }

    fn flush(&self) {
        self.record("flush");
    }

    fn read_pixels(&self, width: u32, height: u32) -> Vec<u8> {
        self.record(format!("read_pixels {width}x{height}"));
        self.framebuffer
            .borrow()
            .clone()
            .unwrap_or_else(|| vec![0; (width * height * 4) as usize])
    }
}

/// In-memory file system that logs every access as `"<op> <path>"`.
#[derive(Debug, Default)]
pub struct SpyFileSystem {
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
    accessed: RefCell<Vec<String>>,
}

impl SpyFileSystem {
    pub fn with_file(path: impl Into<PathBuf>, contents: &str) -> Self {
        let fs = Self::default();
        fs.files
            .borrow_mut()
            .insert(path.into(), contents.as_bytes().to_vec());
        fs
    }

    pub fn accessed(&self) -> Vec<String> {
        self.accessed.borrow().clone()
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    fn log(&self, op: &str, path: &Path) {
        self.accessed
            .borrow_mut()
            .push(format!("{op} {}", path.display()));
    }
}

impl FileSystem for SpyFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.log("exists", path);
        self.files.borrow().contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, RenderError> {
        self.log("read", path);
        self.files
            .borrow()
            .get(path)
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .ok_or_else(|| RenderError::FileNotFound {
                path: path.display().to_string(),
            })
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
        self.log("write", path);
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}
