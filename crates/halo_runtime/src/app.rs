//! Window event handling and the per-frame loop.

use anyhow::anyhow;
use halo_core::ambient::AmbientField;
use halo_core::radial::RadialField;
use halo_core::time::FrameClock;
use halo_core::{DrawList, DrawSurface, FrameReport, SurfaceSize};
use halo_metrics::{FieldStats, FrameSample, FrameTimer};
use halo_render::window::{surface_size, window_attributes, WindowConfig};
use halo_render::wgpu::SurfaceError;
use halo_render::{CanvasRenderer, Tessellator};
use halo_services::Settings;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

/// Frames kept for the rolling statistics.
const STATS_WINDOW: usize = 120;

/// One running effect and the draw list it records into.
struct Layer<F> {
    field: F,
    list: DrawList,
}

impl<F> Layer<F> {
    fn new(field: F) -> Self {
        Self {
            field,
            list: DrawList::new(),
        }
    }
}

pub struct App {
    settings: Settings,
    rng: StdRng,
    window: Option<Arc<Window>>,
    renderer: Option<CanvasRenderer>,
    ambient: Option<Layer<AmbientField>>,
    radial: Option<Layer<RadialField>>,
    /// Set once the window has had a drawable size and the fields started.
    started: bool,
    clock: FrameClock,
    timer: FrameTimer,
    ambient_stats: FieldStats,
    radial_stats: FieldStats,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(settings: Settings, rng: StdRng) -> Self {
        Self {
            settings,
            rng,
            window: None,
            renderer: None,
            ambient: None,
            radial: None,
            started: false,
            clock: FrameClock::new(),
            timer: FrameTimer::new(STATS_WINDOW),
            ambient_stats: FieldStats::new(STATS_WINDOW),
            radial_stats: FieldStats::new(STATS_WINDOW),
            error: None,
        }
    }

    /// Fatal error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    /// Start the enabled fields on `size`, once. A window without a
    /// drawable size yet leaves them pending until the first real resize.
    fn start_fields(&mut self, size: Option<SurfaceSize>) {
        if self.started {
            return;
        }
        let Some(size) = size else {
            tracing::debug!("window has no drawable size yet, deferring effects");
            return;
        };
        self.started = true;

        let effects = self.settings.effects;
        let ambient_target = Some(size).filter(|_| effects.ambient);
        let radial_target = Some(size).filter(|_| effects.radial);

        self.ambient = AmbientField::start(ambient_target, self.settings.ambient.clone(), &mut self.rng)
            .map(Layer::new);
        self.radial = RadialField::start(radial_target, self.settings.radial.clone(), &mut self.rng)
            .map(Layer::new);
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
        }
        let Some(size) = surface_size(winit::dpi::PhysicalSize::new(width, height)) else {
            return;
        };
        if !self.started {
            self.start_fields(Some(size));
            return;
        }
        if let Some(layer) = &mut self.ambient {
            layer.field.resize(size);
        }
        if let Some(layer) = &mut self.radial {
            layer.field.resize(size);
        }
    }

    /// Run the fixed-rate updates that are due, then record one frame.
    fn step(&mut self) -> (FrameReport, FrameReport) {
        let ticks = self.clock.update(Instant::now());

        let mut ambient_report = FrameReport::default();
        if let Some(layer) = &mut self.ambient {
            for _ in 0..ticks {
                layer.field.update();
            }
            layer.list.clear();
            ambient_report = layer.field.draw(&mut layer.list);
        }

        let mut radial_report = FrameReport::default();
        if let Some(layer) = &mut self.radial {
            let mut respawns = 0;
            for _ in 0..ticks {
                respawns += layer.field.update(&mut self.rng);
            }
            layer.list.clear();
            radial_report = layer.field.draw(&mut layer.list);
            radial_report.respawns = respawns;
        }

        (ambient_report, radial_report)
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.timer.begin();
        let (ambient_report, radial_report) = self.step();

        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let (width, height) = renderer.size();
        let size = SurfaceSize::new(width as f32, height as f32);

        // The radial backdrop sits beneath the ambient particles.
        let meshes: Vec<_> = [
            self.radial.as_ref().map(|l| &l.list),
            self.ambient.as_ref().map(|l| &l.list),
        ]
        .into_iter()
        .flatten()
        .map(|list| Tessellator::tessellate(list, size))
        .collect();
        let layers: Vec<_> = meshes.iter().collect();

        let result = renderer.render(&layers);
        match result {
            Ok(()) => {}
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                tracing::debug!("Surface lost, reconfiguring");
                renderer.resize(width, height);
            }
            Err(SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow!("GPU out of memory"));
                return;
            }
            Err(e) => tracing::warn!("Render error: {e:?}"),
        }

        self.timer.end();
        self.record_stats(ambient_report, radial_report);
    }

    fn record_stats(&mut self, ambient: FrameReport, radial: FrameReport) {
        if self.ambient.is_some() {
            self.ambient_stats.record(sample(ambient));
        }
        if self.radial.is_some() {
            self.radial_stats.record(sample(radial));
        }

        let interval = u64::from(self.settings.stats_interval);
        if interval == 0 || self.timer.frames() == 0 || self.timer.frames() % interval != 0 {
            return;
        }

        let (min_ms, max_ms) = self.timer.frame_time_range_ms();
        tracing::info!(
            fps = format_args!("{:.1}", self.timer.fps()),
            frame_ms = format_args!("{:.2}", self.timer.frame_time_ms()),
            min_ms = format_args!("{min_ms:.2}"),
            max_ms = format_args!("{max_ms:.2}"),
            ticks = self.clock.tick_count(),
            "Frame stats"
        );
        if self.ambient.is_some() {
            let mean = self.ambient_stats.mean();
            tracing::info!(
                circles = format_args!("{:.0}", mean.circles),
                links = format_args!("{:.1}", mean.lines),
                "Ambient field"
            );
        }
        if self.radial.is_some() {
            let mean = self.radial_stats.mean();
            tracing::info!(
                circles = format_args!("{:.0}", mean.circles),
                arcs = format_args!("{:.0}", mean.arcs),
                respawns = self.radial_stats.total_respawns(),
                "Radial field"
            );
        }
    }
}

fn sample(report: FrameReport) -> FrameSample {
    FrameSample {
        circles: report.circles,
        lines: report.lines,
        arcs: report.arcs,
        respawns: report.respawns,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = WindowConfig {
            title: self.settings.window.title.clone(),
            width: self.settings.window.width,
            height: self.settings.window.height,
        };
        let window = match event_loop.create_window(window_attributes(&config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow!("failed to create window: {e}"));
                return;
            }
        };

        let background = self.settings.window.background;
        let renderer = match pollster::block_on(CanvasRenderer::new(window.clone(), background)) {
            Ok(renderer) => renderer,
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        self.start_fields(surface_size(window.inner_size()));
        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(frames = self.timer.frames(), "Closing");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn app(settings: Settings) -> App {
        App::new(settings, StdRng::seed_from_u64(3))
    }

    #[test]
    fn minimized_launch_starts_fields_on_first_real_size() {
        let mut app = app(Settings::default());
        app.start_fields(None);
        assert!(app.ambient.is_none() && app.radial.is_none());

        app.resize(0, 0);
        assert!(app.ambient.is_none() && app.radial.is_none());

        app.resize(1280, 720);
        let ambient = app.ambient.as_ref().map(|l| l.field.bounds());
        let radial = app.radial.as_ref().map(|l| l.field.bounds());
        assert_eq!(ambient, Some(SurfaceSize::new(1280.0, 720.0)));
        assert_eq!(radial, Some(SurfaceSize::new(1280.0, 720.0)));
    }

    #[test]
    fn later_resizes_keep_the_running_fields() {
        let mut app = app(Settings::default());
        app.start_fields(Some(SurfaceSize::new(800.0, 600.0)));
        let first = app.ambient.as_ref().map(|l| l.field.particles()[0].position);

        app.resize(1024, 768);
        let layer = app.ambient.as_ref().expect("ambient running");
        assert_eq!(layer.field.bounds(), SurfaceSize::new(1024.0, 768.0));
        assert_eq!(Some(layer.field.particles()[0].position), first);
    }

    #[test]
    fn disabled_effect_stays_off_after_restore() {
        let mut settings = Settings::default();
        settings.effects.ambient = false;
        let mut app = app(settings);
        app.resize(0, 0);
        app.resize(800, 600);
        assert!(app.ambient.is_none());
        assert!(app.radial.is_some());

        app.resize(900, 700);
        assert!(app.ambient.is_none());
    }
}
