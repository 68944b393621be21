// src/main.rs
use nannou::prelude::*;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use kinesis::{
    config::*,
    controllers::{Editor, EditorCommand, EditorKey, EditorMode, FeedController},
    draw::{color, NannouSurface},
    models::{AgentStore, Viewport},
    render::{
        render_agents, render_obstacles, render_trace, render_track,
        trace_renderer::BACKDROP_FALLBACK, track_renderer::BACKGROUND, Backdrop, CurbStyle,
    },
    services::{CanvasCapture, Exporter, ImageLoader, LoadStatus},
    utilities::Smoothing,
    views::{StatusBar, Toolbar, TOOLBAR_HEIGHT},
};

struct Model {
    editor: Editor,
    toolbar: Toolbar,
    status: StatusBar,

    // Live feed
    feed: Option<FeedController>,
    agents: AgentStore,

    // Reference image for tracing
    loader: ImageLoader,
    reference: Option<wgpu::Texture>,

    // Trace styling and export
    smoothing: Smoothing,
    curb_style: CurbStyle,
    exporter: Exporter,
    capture: Option<CanvasCapture>,
}

// How long exit waits for PNG writes still in flight
const SAVE_GRACE: Duration = Duration::from_secs(2);

fn main() {
    // RUST_LOG overrides the default level
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    nannou::app(model).update(update).exit(exit).run();
}

fn model(app: &App) -> Model {
    let config = Config::load_or_default();

    let canvas_w = config.window.width as f32;
    let canvas_h = config.window.height as f32;
    let viewport = Viewport::new(canvas_w, canvas_h, vec2(0.0, TOOLBAR_HEIGHT));

    // Create window: canvas plus the toolbar strip above it
    let window_id = app
        .new_window()
        .title("kinesis 0.1.0")
        .size(config.window.width, config.window.height + TOOLBAR_HEIGHT as u32)
        .resizable(false)
        .view(view)
        .mouse_pressed(mouse_pressed)
        .mouse_moved(mouse_moved)
        .mouse_released(mouse_released)
        .mouse_exited(mouse_exited)
        .key_pressed(key_pressed)
        .received_character(received_character)
        .build();

    // Offscreen canvas for PNG export, sized to the canvas without the toolbar
    let capture = match window_id {
        Ok(id) => app.window(id).map(|window| {
            CanvasCapture::new(
                window.device_queue_pair().clone(),
                config.window.width,
                config.window.height,
            )
        }),
        Err(e) => {
            log::error!("Failed to create window: {:?}", e);
            app.quit();
            None
        }
    };

    // Feed receiver; the editor still works without it
    let feed = if config.feed.enabled {
        match FeedController::new(config.feed.rx_port) {
            Ok(feed) => Some(feed),
            Err(e) => {
                log::warn!("Live feed disabled, port {}: {}", config.feed.rx_port, e);
                None
            }
        }
    } else {
        None
    };

    let loader = match config.resolve_reference_image() {
        Some(path) => ImageLoader::spawn(&path),
        None => ImageLoader::idle(),
    };

    Model {
        editor: Editor::new(viewport, config.track.kind),
        toolbar: Toolbar::new(),
        status: StatusBar::new(),
        feed,
        agents: AgentStore::new(),
        loader,
        reference: None,
        smoothing: config.trace.smoothing(),
        curb_style: CurbStyle::from_config(&config.trace.style),
        exporter: Exporter::new(config.resolve_output_dir()),
        capture,
    }
}

fn window_size(app: &App) -> Vec2 {
    app.main_window().rect().wh()
}

fn page_position(app: &App, window_point: Point2) -> Point2 {
    Viewport::window_to_page(window_size(app), window_point)
}

// ******************************* Input *******************************

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }
    let page = page_position(app, app.mouse.position());
    if model.editor.mode() == EditorMode::Obstacles && model.toolbar.begin_drag(page) {
        return;
    }
    model.editor.pointer_down(page);
}

fn mouse_moved(app: &App, model: &mut Model, position: Point2) {
    let page = page_position(app, position);
    model.toolbar.drag_to(page);
    model.editor.pointer_move(page);
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }
    match model.toolbar.end_drag() {
        Some((token, page)) => model.editor.drop(token, page),
        None => model.editor.pointer_up(),
    }
}

fn mouse_exited(_app: &App, model: &mut Model) {
    model.toolbar.cancel();
    model.editor.pointer_leave();
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    match key {
        Key::Tab => {
            model.toolbar.cancel();
            model.editor.toggle_mode();
        }
        Key::Delete => model.editor.key(EditorKey::Delete),
        Key::Back => model.editor.key(EditorKey::Backspace),
        Key::Return | Key::NumpadEnter => model.editor.key(EditorKey::Enter),
        Key::Escape => model.toolbar.cancel(),
        _ => (),
    }
}

// Printable keys arrive here so '+', '_' and friends follow the keyboard layout
fn received_character(_app: &App, model: &mut Model, ch: char) {
    if !ch.is_control() {
        model.editor.key(EditorKey::Char(ch));
    }
}

// ******************************* Update *******************************

fn update(app: &App, model: &mut Model, _update: Update) {
    poll_reference_image(app, model);

    if let Some(feed) = model.feed.as_mut() {
        model.agents.apply_batch(feed.poll());
    }

    launch_commands(app, model);

    if let Some(capture) = model.capture.as_mut() {
        for saved in capture.poll() {
            report_export(&mut model.status, app.time, saved);
        }
    }
}

fn poll_reference_image(app: &App, model: &mut Model) {
    match model.loader.poll() {
        LoadStatus::Ready(image) => {
            let texture = wgpu::Texture::from_image(app, &image);
            let [w, h] = texture.size();
            log::info!("Reference image ready ({}x{})", w, h);
            model.reference = Some(texture);
        }
        LoadStatus::Failed(e) => {
            log::warn!("No reference image: {}", e);
            model.status.notify("Reference image failed to load", app.time);
        }
        LoadStatus::Pending | LoadStatus::Idle => (),
    }
}

fn launch_commands(app: &App, model: &mut Model) {
    for command in model.editor.drain_commands() {
        match command {
            EditorCommand::Notice(text) => model.status.notify(text, app.time),
            EditorCommand::ExportImage => match model.exporter.image_path() {
                Ok(path) => capture_canvas(model, path),
                Err(e) => report_export(&mut model.status, app.time, Err::<PathBuf, _>(e)),
            },
            EditorCommand::ExportCode => {
                let snapshot = model.editor.trace().snapshot();
                let written = model
                    .exporter
                    .write_code(&snapshot, model.smoothing, &model.curb_style);
                report_export(&mut model.status, app.time, written);
            }
            EditorCommand::ExportObstacles => {
                let written = model
                    .exporter
                    .write_obstacles(model.editor.interaction().obstacles());
                report_export(&mut model.status, app.time, written);
            }
        }
    }
}

// The PNG is reported from `update` once the capture worker has written it
fn capture_canvas(model: &mut Model, path: PathBuf) {
    let Some(size) = model.capture.as_ref().map(CanvasCapture::size) else {
        log::warn!("No canvas capture available, skipping {}", path.display());
        return;
    };
    let draw = Draw::new();
    draw.background().color(color(BACKGROUND));
    let placement = model.editor.viewport().detached();
    draw_canvas(&draw, size, placement, model);

    if let Some(capture) = model.capture.as_mut() {
        capture.capture(&draw, path);
    }
}

fn report_export<E: Display>(status: &mut StatusBar, now: f32, result: Result<PathBuf, E>) {
    match result {
        Ok(path) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            status.notify(format!("Saved {}", name), now);
        }
        Err(e) => {
            log::error!("Export failed: {}", e);
            status.notify(format!("Export failed: {}", e), now);
        }
    }
}

// ******************************* View *******************************

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(color(BACKGROUND));

    let size = window_size(app);
    draw_canvas(&draw, size, *model.editor.viewport(), model);

    model.toolbar.draw(&draw, size);
    model
        .status
        .draw(&draw, size, &model.editor, model.agents.len(), app.time);

    if let Err(e) = draw.to_frame(app, &frame) {
        log::error!("Failed to draw frame: {:?}", e);
    }
}

/// Everything inside the canvas. `placement` puts the canvas on a target of
/// `target_size`: the window for display, the offscreen texture for export.
fn draw_canvas(draw: &Draw, target_size: Vec2, placement: Viewport, model: &Model) {
    let mut surface = NannouSurface::new(draw, target_size, placement, color(BACKDROP_FALLBACK));
    match model.editor.mode() {
        EditorMode::Obstacles => {
            let interaction = model.editor.interaction();
            render_track(&mut surface, model.editor.track());
            render_agents(&mut surface, &model.agents.snapshot());
            render_obstacles(&mut surface, interaction.obstacles(), interaction.selected());
            model.toolbar.draw_ghost(&mut surface, model.editor.viewport());
        }
        EditorMode::Trace => {
            let backdrop = model.reference.as_ref().map(|texture| {
                let [w, h] = texture.size();
                Backdrop {
                    image: texture,
                    size: vec2(w as f32, h as f32),
                }
            });
            render_trace(
                &mut surface,
                model.editor.trace(),
                model.editor.canvas_pointer(),
                backdrop,
                &model.curb_style,
                model.smoothing,
            );
        }
    }
}

// ******************************* Exit *******************************

fn exit(_app: &App, mut model: Model) {
    model.loader.cancel();
    if let Some(mut capture) = model.capture.take() {
        for saved in capture.finish(SAVE_GRACE) {
            match saved {
                Ok(path) => log::info!("Saved {}", path.display()),
                Err(e) => log::error!("Export failed: {}", e),
            }
        }
    }
    if let Some(feed) = model.feed.take() {
        if feed.dropped() > 0 {
            log::info!("Feed closed, {} malformed message(s) dropped", feed.dropped());
        }
    }
    log::info!("Bye");
}
