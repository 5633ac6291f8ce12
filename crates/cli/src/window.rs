//! Window and OpenGL context, built with winit + glutin.
//!
//! The window is sized to the capture resolution so the default framebuffer
//! matches the PNG. Events are pumped without blocking once per frame.

use frag_capture_core::{Api, GraphicsContext, RenderError, RenderParams};
use glow::HasContext;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{
    ContextApi, ContextAttributes, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext,
    Version,
};
use glutin::display::{Display, DisplayApiPreference};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle, RawWindowHandle};
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowBuilder};

/// A window with a current OpenGL (ES) context.
pub struct GlWindow {
    // Field order is drop order: context, surface, window, then the event loop.
    context: Option<PossiblyCurrentContext>,
    surface: Surface<WindowSurface>,
    window: Window,
    event_loop: EventLoop<()>,
    close_requested: bool,
    close_on_key: bool,
}

fn context_error(step: &str, e: impl fmt::Display) -> RenderError {
    RenderError::Context(format!("{step}: {e}"))
}

/// Context API for the requested family and version (`major*100 + minor*10`, 0 for any).
fn context_api(api: Api, version: u32) -> ContextApi {
    let version = (version > 0)
        .then(|| Version::new((version / 100) as u8, ((version % 100) / 10) as u8));
    match api {
        Api::OpenGl => ContextApi::OpenGl(version),
        Api::OpenGlEs => ContextApi::Gles(version),
    }
}

fn context_attributes(api: Api, version: u32, handle: RawWindowHandle) -> ContextAttributes {
    let builder = ContextAttributesBuilder::new().with_context_api(context_api(api, version));
    let builder = match api {
        // Legacy GLSL (gl_FragColor, attribute) must keep compiling.
        Api::OpenGl => builder.with_profile(GlProfile::Compatibility),
        Api::OpenGlEs => builder,
    };
    builder.build(Some(handle))
}

/// The config with the deepest alpha channel, or an error when there is none.
fn deepest_alpha<C>(
    configs: impl Iterator<Item = C>,
    alpha_size: impl Fn(&C) -> u8,
) -> Result<C, RenderError> {
    configs
        .max_by_key(|config| alpha_size(config))
        .ok_or_else(|| RenderError::Context("no GL config matches the window".into()))
}

/// Platform display APIs, most preferred first. WGL needs the window up front.
#[cfg(target_os = "windows")]
fn display_preference(window: Option<&Window>) -> DisplayApiPreference {
    DisplayApiPreference::WglThenEgl(window.map(|w| w.raw_window_handle()))
}

#[cfg(target_os = "macos")]
fn display_preference(_window: Option<&Window>) -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(target_os = "android")]
fn display_preference(_window: Option<&Window>) -> DisplayApiPreference {
    DisplayApiPreference::Egl
}

#[cfg(all(unix, not(any(target_os = "macos", target_os = "android"))))]
fn display_preference(_window: Option<&Window>) -> DisplayApiPreference {
    DisplayApiPreference::EglThenGlx(Box::new(winit::platform::x11::register_xlib_error_hook))
}

impl GlWindow {
    /// Opens the window and makes a context current.
    ///
    /// The context is requested for `params.api` / `params.api_version`;
    /// if the driver refuses, any version of the same family is accepted.
    /// On return both fields hold what the live context reports.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Context` if any windowing or context step fails.
    #[allow(unsafe_code)]
    pub fn create(params: &mut RenderParams) -> Result<(Self, glow::Context), RenderError> {
        let event_loop = EventLoop::new().map_err(|e| context_error("event loop", e))?;

        let window_builder = WindowBuilder::new()
            .with_title(format!("frag-capture: {}", params.frag_path.display()))
            .with_inner_size(PhysicalSize::new(params.width, params.height))
            .with_resizable(false);
        let early_window = if cfg!(target_os = "windows") {
            let window = window_builder
                .clone()
                .build(&event_loop)
                .map_err(|e| context_error("window", e))?;
            Some(window)
        } else {
            None
        };

        // SAFETY: the display handle belongs to `event_loop`, which outlives
        // every GL object created from this display.
        let gl_display = unsafe {
            Display::new(
                event_loop.raw_display_handle(),
                display_preference(early_window.as_ref()),
            )
        }
        .map_err(|e| context_error("display", e))?;

        let mut template = ConfigTemplateBuilder::new().with_alpha_size(8);
        if let Some(window) = &early_window {
            template = template.compatible_with_native_window(window.raw_window_handle());
        }
        // SAFETY: the template only references the window built above.
        let configs = unsafe { gl_display.find_configs(template.build()) }
            .map_err(|e| context_error("find_configs", e))?;
        let gl_config = deepest_alpha(configs, |config| config.alpha_size())?;

        let window = match early_window {
            Some(window) => window,
            None => glutin_winit::finalize_window(&event_loop, window_builder, &gl_config)
                .map_err(|e| context_error("window", e))?,
        };

        let handle = window.raw_window_handle();
        let requested = context_attributes(params.api, params.api_version, handle);
        let fallback = context_attributes(params.api, 0, handle);

        // SAFETY: the raw window handle belongs to `window`, which outlives
        // the context and surface (see field order).
        let not_current = unsafe {
            gl_display
                .create_context(&gl_config, &requested)
                .or_else(|e| {
                    tracing::warn!(
                        error = %e,
                        requested = %params.api_description(),
                        "requested context unavailable, retrying without a version"
                    );
                    gl_display.create_context(&gl_config, &fallback)
                })
        }
        .map_err(|e| context_error("create_context", e))?;

        let width = NonZeroU32::new(params.width)
            .ok_or_else(|| RenderError::Context("width must be non-zero".into()))?;
        let height = NonZeroU32::new(params.height)
            .ok_or_else(|| RenderError::Context("height must be non-zero".into()))?;
        let surface_attributes =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(handle, width, height);
        // SAFETY: as above, the handle stays valid for the surface's lifetime.
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|e| context_error("create_window_surface", e))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| context_error("make_current", e))?;

        // SAFETY: the context is current on this thread and the loader
        // resolves symbols from the display that created it.
        let gl =
            unsafe { glow::Context::from_loader_function_cstr(|s| gl_display.get_proc_address(s)) };

        let version = gl.version();
        params.api = if version.is_embedded {
            Api::OpenGlEs
        } else {
            Api::OpenGl
        };
        params.api_version = version.major * 100 + version.minor * 10;

        Ok((
            Self {
                context: Some(context),
                surface,
                window,
                event_loop,
                close_requested: false,
                close_on_key: false,
            },
            gl,
        ))
    }
}

impl GraphicsContext for GlWindow {
    fn should_continue_looping(&mut self) -> bool {
        let window_id = self.window.id();
        let close_on_key = self.close_on_key;
        let mut close = false;

        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, _| {
                if let Event::WindowEvent { window_id: id, event } = event {
                    if id != window_id {
                        return;
                    }
                    match event {
                        WindowEvent::CloseRequested => close = true,
                        WindowEvent::KeyboardInput { event, .. }
                            if close_on_key && event.state == ElementState::Pressed =>
                        {
                            close = true
                        }
                        _ => {}
                    }
                }
            });

        self.close_requested |= close || matches!(status, PumpStatus::Exit(_));
        self.context.is_some() && !self.close_requested
    }

    fn swap_buffers(&mut self) -> Result<(), RenderError> {
        let context = self
            .context
            .as_ref()
            .ok_or_else(|| RenderError::Context("context already terminated".into()))?;
        self.surface
            .swap_buffers(context)
            .map_err(|e| context_error("swap_buffers", e))
    }

    fn wait_for_keypress(&mut self) {
        self.close_on_key = true;
    }

    fn terminate(&mut self) {
        self.context.take();
        self.window.set_visible(false);
    }
}
