//! GTK4 host window.
//!
//! Opens an undecorated, translucent window, renders frame 0 right away and
//! then one frame per `frame_interval` from a glib timeout. The draw
//! function presents the retained target by copying it onto the window
//! with the SOURCE operator, so the window shows exactly what the target
//! holds. One interval after the last frame the application quits.
//!
//! A setup or rendering failure also quits, and makes [`run`] return an
//! error so the process exits with a failure status.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use gtk4::prelude::*;
use gtk4::{glib, Application, ApplicationWindow, CssProvider, DrawingArea};

use crate::config::DemoConfig;
use crate::errors::DemoError;
use crate::frame_loop::FrameLoop;
use crate::render::backends::cairo::{CairoBackend, CairoSurface};
#[cfg(feature = "x11")]
use crate::x11_hints::DockHints;

const APP_ID: &str = "io.github.translucent-demo";
const CSS_CLASS: &str = "translucent-demo";
const CSS: &str = "window.translucent-demo { background-color: transparent; }";

/// Connects to the display and runs the demo until the last frame has been shown.
pub fn run(config: DemoConfig) -> Result<glib::ExitCode, DemoError> {
    gtk4::init().map_err(|e| DemoError::Display(e.to_string()))?;

    let app = Application::builder().application_id(APP_ID).build();
    let failure = Failure::default();

    let setup_failure = failure.clone();
    app.connect_activate(move |app| {
        if let Err(e) = build_window(app, config.clone(), setup_failure.clone()) {
            log::error!("cannot set up the demo window: {e:#}");
            setup_failure.record(e);
            app.quit();
        }
    });

    // Arguments were already consumed by main; don't let GTK parse them.
    let code = app.run_with_args::<&str>(&[]);
    failure.into_result(code)
}

/// First error that stopped the main loop, if any.
#[derive(Clone, Default)]
struct Failure(Rc<RefCell<Option<anyhow::Error>>>);

impl Failure {
    fn record(&self, err: anyhow::Error) {
        self.0.borrow_mut().get_or_insert(err);
    }

    fn into_result(self, code: glib::ExitCode) -> Result<glib::ExitCode, DemoError> {
        let err = self.0.borrow_mut().take();
        match err {
            Some(err) => Err(DemoError::Aborted(format!("{err:#}"))),
            None => Ok(code),
        }
    }
}

fn build_window(app: &Application, config: DemoConfig, failure: Failure) -> anyhow::Result<()> {
    let display = gdk4::Display::default()
        .ok_or_else(|| DemoError::Display("no default display".to_string()))?;

    log::info!(
        "display {}: composited = {}, rgba = {}",
        display.name(),
        display.is_composited(),
        display.is_rgba()
    );
    if !display.is_composited() {
        log::warn!("no compositing manager is running, translucent pixels will look opaque");
    }

    let provider = CssProvider::new();
    provider.load_from_data(CSS);
    gtk4::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );

    let geometry = config.geometry;
    let border = config.border_width;
    let (content_width, content_height) = config.content_size();
    let dock_hints = config.dock_hints.then(|| DockHints::for_config(&config));
    let interval = config.frame_interval();

    let frame_loop = Rc::new(RefCell::new(FrameLoop::new(config, Box::new(CairoBackend::new()))?));

    let drawing_area = DrawingArea::new();
    drawing_area.set_content_width(content_width);
    drawing_area.set_content_height(content_height);

    let fl_draw = frame_loop.clone();
    drawing_area.set_draw_func(move |_area, cr, w, h| {
        if let Err(e) = present(&fl_draw.borrow(), cr, border as f64, w, h) {
            log::error!("present failed: {e:#}");
        }
    });

    let window = ApplicationWindow::builder()
        .application(app)
        .title("translucent-demo")
        .decorated(false)
        .resizable(false)
        .child(&drawing_area)
        .build();
    window.add_css_class(CSS_CLASS);

    match dock_hints {
        // The surface exists once the window is realized, before it is mapped.
        Some(hints) => {
            window.connect_realize(move |w| apply_dock_hints(w, &hints));
        }
        None => log::info!(
            "requested origin ({}, {}) is left to the window manager",
            geometry.x,
            geometry.y
        ),
    }

    window.present();

    // Frame 0 goes up as soon as the window is mapped.
    frame_loop.borrow_mut().step()?;
    drawing_area.queue_draw();

    let app = app.clone();
    glib::timeout_add_local(interval, move || {
        let result = frame_loop.borrow_mut().step();
        match result {
            Ok(Some(index)) => {
                log::info!("frame {index}");
                drawing_area.queue_draw();
                glib::ControlFlow::Continue
            }
            Ok(None) => {
                log::info!("all frames shown, exiting");
                app.quit();
                glib::ControlFlow::Break
            }
            Err(e) => {
                log::error!("rendering failed: {e:#}");
                failure.record(e);
                app.quit();
                glib::ControlFlow::Break
            }
        }
    });

    Ok(())
}

/// Copies the retained target onto the window and draws the border.
fn present(frame_loop: &FrameLoop, cr: &cairo::Context, border: f64, width: i32, height: i32) -> anyhow::Result<()> {
    let surface = frame_loop
        .surface()
        .as_any()
        .downcast_ref::<CairoSurface>()
        .ok_or_else(|| anyhow!("frame loop is not rendering to a cairo surface"))?;

    cr.save()?;
    cr.set_operator(cairo::Operator::Source);
    cr.set_source_surface(surface.image(), border, border)?;
    cr.paint()?;
    cr.restore()?;

    if border > 0.0 {
        cr.set_source_rgba(0.0, 0.0, 0.0, 1.0);
        cr.set_line_width(border);
        cr.rectangle(
            border / 2.0,
            border / 2.0,
            width as f64 - border,
            height as f64 - border,
        );
        cr.stroke()?;
    }
    Ok(())
}

#[cfg(feature = "x11")]
fn apply_dock_hints(window: &ApplicationWindow, hints: &DockHints) {
    let surface = window.surface();
    let Some(x11) = surface.downcast_ref::<gdk4_x11::X11Surface>() else {
        log::debug!("not running on X11, skipping dock hints");
        return;
    };

    x11.set_skip_taskbar_hint(true);
    x11.set_skip_pager_hint(true);
    if let Err(e) = hints.apply(x11.xid() as u32) {
        log::warn!("cannot apply dock hints: {e:#}");
    }
}

/// Placement data kept when there is no X11 support to apply it with.
#[cfg(not(feature = "x11"))]
struct DockHints {
    x: i32,
    y: i32,
}

#[cfg(not(feature = "x11"))]
impl DockHints {
    fn for_config(config: &DemoConfig) -> Self {
        Self { x: config.geometry.x, y: config.geometry.y }
    }
}

#[cfg(not(feature = "x11"))]
fn apply_dock_hints(_window: &ApplicationWindow, hints: &DockHints) {
    log::info!(
        "built without X11 support, origin ({}, {}) is left to the window manager",
        hints.x,
        hints.y
    );
}
