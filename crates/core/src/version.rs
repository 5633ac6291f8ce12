//! GLSL `#version` detection.
//!
//! Only the first line of the fragment shader is inspected. The line is
//! split into runs of ASCII digits and the runs are compared, whole, against
//! a fixed table of known versions. The table order is the priority order:
//! when the line holds several known numbers, the one listed first wins.

use crate::error::RenderError;

/// Known GLSL versions in match priority order. Desktop first, then ES.
pub const SUPPORTED_VERSIONS: [u32; 14] = [
    110, 120, 130, 140, 150, 330, 400, 410, 420, 430, 440, 450, // desktop GL
    100, 300, // GLSL ES
];

/// Longest excerpt of the first line quoted in diagnostics.
const MAX_QUOTED_LINE: usize = 80;

/// Detects the GLSL version named on the first line of `source`.
///
/// # Errors
///
/// - `MalformedShader` if `source` has no newline at all, or its first line
///   does not contain `#version`.
/// - `UnsupportedVersion` if no number on the first line is in
///   [`SUPPORTED_VERSIONS`].
pub fn detect_version(source: &str) -> Result<u32, RenderError> {
    let line = match source.find('\n') {
        Some(end) => &source[..end],
        None => {
            return Err(RenderError::MalformedShader(
                "cannot find end-of-line in fragment shader".into(),
            ))
        }
    };

    if !line.contains("#version") {
        return Err(RenderError::MalformedShader(
            "cannot find ``#version'' in first line of fragment shader".into(),
        ));
    }

    let tokens: Vec<u32> = line
        .split(|c: char| !c.is_ascii_digit())
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse().ok())
        .collect();

    SUPPORTED_VERSIONS
        .iter()
        .copied()
        .find(|v| tokens.contains(v))
        .ok_or_else(|| RenderError::UnsupportedVersion {
            line: line.chars().take(MAX_QUOTED_LINE).collect(),
        })
}
