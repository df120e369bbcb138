//! The experiment window: a winit window presenting compositor frames
//! through pixels, driven by pumping the event loop from the presenter.

use std::sync::Arc;
use std::time::Duration;

use ab_glyph::FontVec;
use anyhow::{Context, Result};
use pixels::{Pixels, SurfaceTexture};
use recmem_core::{DisplaySurface, Error, KeyPress, Stimulus, TextStim};
use recmem_experiment::DisplayConfig;
use recmem_render::{Compositor, load_font};
use tracing::{debug, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::Key,
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Fullscreen, Window, WindowId},
};

use crate::keys::KeyQueue;

const STARTUP_PUMP: Duration = Duration::from_millis(10);
const STARTUP_ATTEMPTS: usize = 500;

/// Lowercase key names: characters as typed, named keys by their winit name
/// ("space", "escape", "arrowleft").
fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(s) => Some(s.to_lowercase()),
        Key::Named(named) => Some(format!("{named:?}").to_lowercase()),
        _ => None,
    }
}

struct Shell {
    options: DisplayConfig,
    font: Option<FontVec>,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    compositor: Option<Compositor>,
    keys: KeyQueue,
    closed: bool,
    failure: Option<String>,
}

impl Shell {
    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut attributes = Window::default_attributes()
            .with_title("Recognition Memory")
            .with_inner_size(PhysicalSize::new(self.options.width, self.options.height))
            .with_resizable(false);
        if self.options.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();
        info!(
            width = size.width,
            height = size.height,
            scale_factor = window.scale_factor(),
            "window created"
        );

        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        self.pixels = Some(Pixels::new(size.width, size.height, surface)?);

        let mut compositor = Compositor::new(size.width, size.height)?;
        if let Some(font) = self.font.take() {
            compositor = compositor.with_font(font);
        }
        self.compositor = Some(compositor);

        if self.options.fullscreen {
            window.set_cursor_visible(false);
        }
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(size.width, size.height) {
                warn!("failed to resize surface: {e}");
            }
            if let Err(e) = pixels.resize_buffer(size.width, size.height) {
                warn!("failed to resize buffer: {e}");
            }
        }
        if let Some(compositor) = &mut self.compositor {
            if let Err(e) = compositor.resize(size.width, size.height) {
                warn!("failed to resize canvas: {e:#}");
            }
        }
    }

    fn handle_key(&mut self, event: KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        if let Some(name) = key_name(&event.logical_key) {
            debug!(key = %name, "key down");
            self.keys.push(KeyPress::new(name));
        }
    }
}

impl ApplicationHandler for Shell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                self.failure = Some(format!("failed to create window and surface: {e:#}"));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.closed = true;
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event),
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.handle_resize(size);
                }
            }
            _ => {}
        }
    }
}

/// Fields drop in order, so the window goes before its event loop.
pub struct WindowDisplay {
    shell: Shell,
    event_loop: EventLoop<()>,
    stimulus_scale: f32,
}

impl WindowDisplay {
    /// Opens the window and waits until its surface is ready.
    pub fn open(options: &DisplayConfig) -> Result<Self> {
        let font = match &options.font_path {
            Some(path) => Some(load_font(path)?),
            None => {
                warn!("no font configured, text screens will be blank");
                None
            }
        };

        let event_loop = EventLoop::new().context("creating event loop")?;
        let mut display = Self {
            shell: Shell {
                options: options.clone(),
                font,
                window: None,
                pixels: None,
                compositor: None,
                keys: KeyQueue::default(),
                closed: false,
                failure: None,
            },
            event_loop,
            stimulus_scale: options.stimulus_scale,
        };

        for _ in 0..STARTUP_ATTEMPTS {
            display.pump_for(Some(STARTUP_PUMP))?;
            if display.shell.compositor.is_some() {
                return Ok(display);
            }
        }
        anyhow::bail!("window did not become ready")
    }

    fn pump_for(&mut self, timeout: Option<Duration>) -> recmem_core::Result<()> {
        let status = self.event_loop.pump_app_events(timeout, &mut self.shell);
        if let Some(failure) = self.shell.failure.take() {
            return Err(Error::Display(failure));
        }
        if self.shell.closed || matches!(status, PumpStatus::Exit(_)) {
            return Err(Error::Display("window closed".into()));
        }
        Ok(())
    }

    fn pump(&mut self) -> recmem_core::Result<()> {
        self.pump_for(Some(Duration::ZERO))
    }

    fn compositor(&mut self) -> recmem_core::Result<&mut Compositor> {
        self.shell
            .compositor
            .as_mut()
            .ok_or_else(|| Error::Display("window not ready".into()))
    }
}

impl DisplaySurface for WindowDisplay {
    fn draw_stimulus(&mut self, stimulus: &Stimulus) -> recmem_core::Result<()> {
        let scale = self.stimulus_scale;
        self.compositor()?
            .draw_image_file(&stimulus.path, scale)
            .map_err(|e| Error::Display(format!("{e:#}")))
    }

    fn draw_text(&mut self, text: &TextStim) -> recmem_core::Result<()> {
        self.compositor()?.draw_text(text);
        Ok(())
    }

    fn flip(&mut self) -> recmem_core::Result<()> {
        let shell = &mut self.shell;
        let (Some(pixels), Some(compositor)) = (shell.pixels.as_mut(), shell.compositor.as_mut())
        else {
            return Err(Error::Display("window not ready".into()));
        };

        let frame = pixels.frame_mut();
        let source = compositor.frame();
        if frame.len() == source.len() {
            frame.copy_from_slice(source);
        } else {
            warn!(buffer = frame.len(), canvas = source.len(), "frame size mismatch, skipped");
        }
        pixels
            .render()
            .map_err(|e| Error::Display(format!("render failed: {e}")))?;
        compositor.clear();
        self.pump()
    }

    fn clear_events(&mut self) -> recmem_core::Result<()> {
        self.pump()?;
        self.shell.keys.clear();
        Ok(())
    }

    fn poll_key(&mut self) -> recmem_core::Result<Option<KeyPress>> {
        self.pump()?;
        Ok(self.shell.keys.take_first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{NamedKey, SmolStr};

    #[test]
    fn key_names_are_lowercase() {
        assert_eq!(key_name(&Key::Character(SmolStr::new("A"))), Some("a".into()));
        assert_eq!(key_name(&Key::Named(NamedKey::Space)), Some("space".into()));
        assert_eq!(key_name(&Key::Named(NamedKey::Escape)), Some("escape".into()));
    }
}
