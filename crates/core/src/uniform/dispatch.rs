//! The closed table of uniform binding functions.
//!
//! Each entry names a `glUniform*` call and records what it takes: element
//! type, components per element, and whether it is the array (`*v`) form.
//! JSON `args` are checked and converted against the entry before any GL
//! call is made.

use crate::gl::UniformValue;
use crate::params::Api;
use serde_json::Value;

/// Scalar type a binding function consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Float,
    Int,
    Uint,
}

/// One supported `glUniform*` function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingFunction {
    pub name: &'static str,
    pub element: ElementType,
    /// Components per element, 1 to 4.
    pub components: usize,
    /// Array form: `args` holds any whole number of elements.
    pub array: bool,
}

const fn func(
    name: &'static str,
    element: ElementType,
    components: usize,
    array: bool,
) -> BindingFunction {
    BindingFunction {
        name,
        element,
        components,
        array,
    }
}

/// Every binding function a uniform sidecar may name.
pub const BINDING_FUNCTIONS: [BindingFunction; 20] = [
    func("glUniform1f", ElementType::Float, 1, false),
    func("glUniform2f", ElementType::Float, 2, false),
    func("glUniform3f", ElementType::Float, 3, false),
    func("glUniform4f", ElementType::Float, 4, false),
    func("glUniform1i", ElementType::Int, 1, false),
    func("glUniform2i", ElementType::Int, 2, false),
    func("glUniform3i", ElementType::Int, 3, false),
    func("glUniform4i", ElementType::Int, 4, false),
    func("glUniform1ui", ElementType::Uint, 1, false),
    func("glUniform2ui", ElementType::Uint, 2, false),
    func("glUniform3ui", ElementType::Uint, 3, false),
    func("glUniform4ui", ElementType::Uint, 4, false),
    func("glUniform1fv", ElementType::Float, 1, true),
    func("glUniform2fv", ElementType::Float, 2, true),
    func("glUniform3fv", ElementType::Float, 3, true),
    func("glUniform4fv", ElementType::Float, 4, true),
    func("glUniform1iv", ElementType::Int, 1, true),
    func("glUniform2iv", ElementType::Int, 2, true),
    func("glUniform3iv", ElementType::Int, 3, true),
    func("glUniform4iv", ElementType::Int, 4, true),
];

/// Finds the binding function called `name`.
pub fn lookup(name: &str) -> Option<&'static BindingFunction> {
    BINDING_FUNCTIONS.iter().find(|f| f.name == name)
}

impl BindingFunction {
    /// Whether the function may be called on a context of this API family.
    ///
    /// Unsigned variants are treated as unavailable on OpenGL ES.
    pub fn available_on(&self, api: Api) -> bool {
        !(api == Api::OpenGlEs && self.element == ElementType::Uint)
    }

    /// Checks `args` against this function's arity and converts them.
    ///
    /// Returns a human-readable reason on mismatch.
    pub fn convert_args(&self, args: &[Value]) -> Result<UniformValue, String> {
        if self.array {
            if args.len() % self.components != 0 {
                return Err(format!(
                    "expected a multiple of {} values, got {}",
                    self.components,
                    args.len()
                ));
            }
        } else if args.len() != self.components {
            return Err(format!(
                "expected {} values, got {}",
                self.components,
                args.len()
            ));
        }

        match self.element {
            ElementType::Float => args
                .iter()
                .map(|v| v.as_f64().map(|f| f as f32).ok_or_else(|| not_a("number", v)))
                .collect::<Result<Vec<_>, _>>()
                .map(UniformValue::Float),
            ElementType::Int => args
                .iter()
                .map(|v| {
                    integral(v)
                        .and_then(|i| i32::try_from(i).ok())
                        .ok_or_else(|| not_a("32-bit integer", v))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(UniformValue::Int),
            ElementType::Uint => args
                .iter()
                .map(|v| {
                    integral(v)
                        .and_then(|i| u32::try_from(i).ok())
                        .ok_or_else(|| not_a("32-bit unsigned integer", v))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(UniformValue::Uint),
        }
    }
}

/// Integer value of a JSON number, accepting floats with no fractional part.
fn integral(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| {
        v.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn not_a(what: &str, v: &Value) -> String {
    format!("{v} is not a {what}")
}
