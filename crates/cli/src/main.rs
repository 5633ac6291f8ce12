#![deny(unsafe_code)]
//! CLI binary for frag-capture.
//!
//! Compiles a GLSL fragment shader, renders it on a full-window quad for a
//! few frames and writes the result to a PNG. Exit codes: 0 success, 1 any
//! error, 101 compile failure, 102 link failure.

mod error;
mod window;

use clap::{Parser, ValueEnum};
use error::CliError;
use frag_capture_core::{
    context_for_glsl, detect_version, prepare_program, run_frames, Api, FileSystem,
    GraphicsContext, Prepared, RenderParams, StdFileSystem,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use window::GlWindow;

#[derive(Parser, Debug)]
#[command(
    name = "frag-capture",
    about = "Render a GLSL fragment shader and capture a frame as PNG",
    after_help = "Uniform values are read from <FRAGMENT> with its extension replaced by \
                  .json, when that file exists.\n\nReturn values: 0 success, 1 error, \
                  101 shader compilation error, 102 program linking error."
)]
struct Cli {
    /// Fragment shader to render.
    fragment: PathBuf,

    /// Number of frames rendered before the capture.
    #[arg(long, default_value_t = 5)]
    delay: u32,

    /// Keep the window open after the capture until a key is pressed.
    #[arg(long)]
    persist: bool,

    /// Exit once the fragment shader compiles.
    #[arg(long)]
    exit_compile: bool,

    /// Exit once the program links.
    #[arg(long)]
    exit_linking: bool,

    /// PNG destination.
    #[arg(long, default_value = "output.png")]
    output: PathBuf,

    /// Framebuffer size in pixels.
    #[arg(
        long,
        num_args = 2,
        value_names = ["WIDTH", "HEIGHT"],
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    resolution: Option<Vec<u32>>,

    /// Vertex shader to use instead of the generated one.
    #[arg(long, value_name = "FILE")]
    vertex: Option<PathBuf>,

    /// Write the linked program binary to FILE.
    #[arg(long = "dump_bin", value_name = "FILE")]
    dump_bin: Option<PathBuf>,

    /// API family to request; derived from the shader's #version by default.
    #[arg(long, value_enum)]
    api: Option<ApiArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ApiArg {
    Opengl,
    Opengles,
}

impl From<ApiArg> for Api {
    fn from(arg: ApiArg) -> Self {
        match arg {
            ApiArg::Opengl => Api::OpenGl,
            ApiArg::Opengles => Api::OpenGlEs,
        }
    }
}

impl Cli {
    fn render_params(&self) -> RenderParams {
        let mut params = RenderParams::new(&self.fragment);
        if let Some([width, height]) = self.resolution.as_deref() {
            params.width = *width;
            params.height = *height;
        }
        params.vert_path = self.vertex.clone();
        params.output = self.output.clone();
        params.binary_out = self.dump_bin.clone();
        params.delay = self.delay;
        params.exit_after_compile = self.exit_compile;
        params.exit_after_link = self.exit_linking;
        params.persist = self.persist;
        params
    }
}

/// Context to ask for: the one the GLSL version calls for, unless `--api`
/// names the other family, in which case any version of it will do.
fn requested_context(glsl_version: u32, api: Option<ApiArg>) -> (Api, u32) {
    let derived = context_for_glsl(glsl_version);
    match api.map(Api::from) {
        Some(family) if family != derived.0 => (family, 0),
        _ => derived,
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let fs = StdFileSystem;
    let mut params = cli.render_params();

    let frag_source = fs.read_to_string(&params.frag_path)?;
    params.shader_version = detect_version(&frag_source)?;
    (params.api, params.api_version) = requested_context(params.shader_version, cli.api);
    tracing::debug!(
        glsl = params.shader_version,
        requested = %params.api_description(),
        "requesting context"
    );

    let (mut window, gl) = GlWindow::create(&mut params)?;
    tracing::info!("API version: {}", params.api_version);

    match prepare_program(&gl, &params, &frag_source, &fs) {
        Ok(Prepared::Ready(_)) => {}
        Ok(Prepared::ExitAfterCompile) => {
            tracing::info!("fragment shader compiled, exiting");
            window.terminate();
            return Ok(());
        }
        Ok(Prepared::ExitAfterLink) => {
            tracing::info!("program linked, exiting");
            window.terminate();
            return Ok(());
        }
        Err(e) => {
            window.terminate();
            return Err(e.into());
        }
    }

    let outcome = run_frames(&mut window, &gl, &params)?;
    if !outcome.captured {
        tracing::warn!(frames = outcome.frames, "window closed before the capture frame");
    }
    Ok(())
}

fn fail(e: CliError) -> ! {
    if let Some(log) = e.driver_log() {
        eprintln!("{log}");
    }
    match &e {
        CliError::Usage(rendered) => eprint!("{rendered}"),
        CliError::Render(_) => eprintln!("error: {e}"),
    }
    process::exit(e.exit_code());
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => fail(CliError::Usage(e.render().to_string())),
        Err(e) => e.exit(),
    };
    initialise_tracing();
    if let Err(e) = run(cli) {
        fail(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("frag-capture").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_flags() {
        let cli = parse(&["shader.frag"]).unwrap();
        let params = cli.render_params();
        assert_eq!(params.frag_path, PathBuf::from("shader.frag"));
        assert_eq!((params.width, params.height), (256, 256));
        assert_eq!(params.output, PathBuf::from("output.png"));
        assert_eq!(params.delay, 5);
        assert!(params.vert_path.is_none());
        assert!(params.binary_out.is_none());
        assert!(!params.persist && !params.exit_after_compile && !params.exit_after_link);
    }

    #[test]
    fn all_flags_reach_params() {
        let cli = parse(&[
            "--delay",
            "0",
            "--persist",
            "--exit-compile",
            "--exit-linking",
            "--output",
            "out/frame.png",
            "--resolution",
            "640",
            "480",
            "--vertex",
            "quad.vert",
            "--dump_bin",
            "prog.bin",
            "shader.frag",
        ])
        .unwrap();
        let params = cli.render_params();
        assert_eq!(params.delay, 0);
        assert!(params.persist);
        assert!(params.exit_after_compile);
        assert!(params.exit_after_link);
        assert_eq!(params.output, PathBuf::from("out/frame.png"));
        assert_eq!((params.width, params.height), (640, 480));
        assert_eq!(params.vert_path, Some(PathBuf::from("quad.vert")));
        assert_eq!(params.binary_out, Some(PathBuf::from("prog.bin")));
    }

    #[test]
    fn missing_fragment_is_an_error() {
        let err = parse(&["--delay", "3"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn zero_resolution_is_rejected() {
        assert!(parse(&["--resolution", "0", "10", "a.frag"]).is_err());
    }

    #[test]
    fn resolution_needs_two_values() {
        assert!(parse(&["a.frag", "--resolution", "10"]).is_err());
    }

    #[test]
    fn dump_bin_keeps_its_underscore() {
        assert!(parse(&["--dump-bin", "x.bin", "a.frag"]).is_err());
        assert!(parse(&["--dump_bin", "x.bin", "a.frag"]).is_ok());
    }

    #[test]
    fn requested_context_follows_glsl_version() {
        assert_eq!(requested_context(330, None), (Api::OpenGl, 330));
        assert_eq!(requested_context(100, None), (Api::OpenGlEs, 200));
        assert_eq!(
            requested_context(300, Some(ApiArg::Opengles)),
            (Api::OpenGlEs, 300)
        );
    }

    #[test]
    fn api_override_to_other_family_drops_the_version() {
        assert_eq!(
            requested_context(300, Some(ApiArg::Opengl)),
            (Api::OpenGl, 0)
        );
        assert_eq!(
            requested_context(450, Some(ApiArg::Opengles)),
            (Api::OpenGlEs, 0)
        );
    }

    #[test]
    fn unreadable_fragment_exits_with_1() {
        let cli = parse(&["/nonexistent/dir/shader.frag"]).unwrap();
        let err = run(cli).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("shader.frag"));
    }

    #[test]
    fn fragment_without_version_exits_with_1() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.frag");
        std::fs::write(&path, "void main() {}\n").unwrap();
        let cli = parse(&[path.to_str().unwrap()]).unwrap();
        let err = run(cli).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(matches!(
            err,
            CliError::Render(frag_capture_core::RenderError::MalformedShader(_))
        ));
    }

    #[test]
    #[ignore = "requires GL context"]
    fn solid_red_shader_renders_red_png() {
        let dir = tempfile::tempdir().unwrap();
        let frag = dir.path().join("red.frag");
        let out = dir.path().join("red.png");
        std::fs::write(
            &frag,
            "#version 330\nout vec4 color;\nvoid main() { color = vec4(1.0, 0.0, 0.0, 1.0); }\n",
        )
        .unwrap();

        let cli = parse(&[
            frag.to_str().unwrap(),
            "--delay",
            "1",
            "--output",
            out.to_str().unwrap(),
        ])
        .unwrap();
        if let Err(e) = run(cli) {
            panic!("render failed: {e}");
        }

        let img = image::open(&out).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (256, 256));
        assert!(
            img.pixels().all(|p| p.0 == [255, 0, 0, 255]),
            "every pixel should be opaque red"
        );
    }

    #[test]
    #[ignore = "requires GL context"]
    fn syntax_error_exits_101_with_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let frag = dir.path().join("broken.frag");
        std::fs::write(&frag, "#version 330\nvoid main(){ oops }\n").unwrap();

        let out = dir.path().join("x.png");
        let cli = parse(&[frag.to_str().unwrap(), "--output", out.to_str().unwrap()]).unwrap();
        let err = run(cli).unwrap_err();
        assert_eq!(err.exit_code(), 101);
        assert!(
            err.driver_log().is_some_and(|log| !log.is_empty()),
            "compiler diagnostic should be non-empty"
        );
    }
}
