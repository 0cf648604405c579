use eframe::{egui, egui_wgpu::CallbackTrait, App, Frame};
use fibonacci_spiral::config::{SpiralSettings, INPUT_PANEL_WIDTH};
use fibonacci_spiral::session::{
    RenderedFrame, SaveTargets, SessionEvent, SpiralRequest, SpiralSession,
};
use fibonacci_spiral::spiral::Viewport;
use fibonacci_spiral::visualization::renderer::{
    calculate_mvp, SpiralGeometry, SpiralPipeline, WgpuSpiralRenderer,
};
use parking_lot::Mutex;
use std::sync::Arc;
use type_map::concurrent::TypeMap;

const RECT_STROKE_WIDTH: f32 = 1.0;

struct SpiralPaintCallback {
    pipeline: Arc<SpiralPipeline>,
    geometry: Arc<SpiralGeometry>,
    mvp_matrix: glam::Mat4,
    queue: Arc<wgpu::Queue>,
}

impl CallbackTrait for SpiralPaintCallback {
    fn paint<'a>(
        &'a self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'a>,
        _resources: &'a TypeMap,
    ) {
        WgpuSpiralRenderer::paint_primitive(
            &self.pipeline,
            &self.geometry,
            &self.mvp_matrix,
            render_pass,
            &self.queue,
        );
    }
}

pub struct FibonacciSpiralApp {
    settings: SpiralSettings,
    first_input: String,
    second_input: String,
    load_path_input: String,
    generating: bool,
    saving: bool,
    loading: bool,
    session: SpiralSession,
    // Last completed frame, repainted until a newer one arrives
    last_frame: Option<RenderedFrame>,
    canvas_size: Viewport,
    status_message: Option<String>,
    spiral_renderer: Arc<Mutex<WgpuSpiralRenderer>>,
    wgpu_device: Option<Arc<wgpu::Device>>,
    wgpu_queue: Option<Arc<wgpu::Queue>>,
}

impl FibonacciSpiralApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: SpiralSettings) -> Self {
        let mut local_spiral_renderer = WgpuSpiralRenderer::new();
        let mut app_wgpu_device_arc = None;
        let mut app_wgpu_queue_arc = None;
        if let Some(wgpu_render_state) = &cc.wgpu_render_state {
            let device_arc = wgpu_render_state.device.clone();
            let queue_arc = wgpu_render_state.queue.clone();
            let target_format = wgpu_render_state.target_format;
            if let Err(e) = local_spiral_renderer.prepare(&device_arc, target_format) {
                tracing::error!("Failed to prepare WGPU spiral renderer: {}", e);
            } else {
                app_wgpu_device_arc = Some(device_arc);
                app_wgpu_queue_arc = Some(queue_arc);
            }
        } else {
            tracing::warn!("WGPU render state not available at creation.");
        }

        Self {
            first_input: settings.first_input.clone(),
            second_input: settings.second_input.clone(),
            load_path_input: String::new(),
            generating: false,
            saving: false,
            loading: false,
            session: SpiralSession::new(settings.ready_timeout),
            last_frame: None,
            canvas_size: settings.initial_canvas(),
            status_message: None,
            spiral_renderer: Arc::new(Mutex::new(local_spiral_renderer)),
            wgpu_device: app_wgpu_device_arc,
            wgpu_queue: app_wgpu_queue_arc,
            settings,
        }
    }

    fn save_targets(&self) -> Option<SaveTargets> {
        self.saving.then(|| SaveTargets {
            binary: self.settings.binary_output_path(),
            text: self.settings.text_output_path(),
        })
    }

    // Generating from numbers takes precedence over loading a file
    fn next_request(&mut self) -> Option<SpiralRequest> {
        let request = if self.generating {
            match SpiralRequest::parse(&self.first_input, &self.second_input) {
                Ok(request) => request,
                Err(e) => {
                    self.status_message = Some(e.to_string());
                    return None;
                }
            }
        } else if self.loading {
            match SpiralRequest::from_file(self.load_path_input.trim()) {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!("{}", e);
                    self.status_message = Some(e.to_string());
                    self.loading = false;
                    return None;
                }
            }
        } else {
            return None;
        };

        Some(match self.save_targets() {
            Some(targets) => request.with_save(targets),
            None => request,
        })
    }

    /// One step of the handshake per UI frame: start a session when idle,
    /// release and collect it once ready.
    fn drive_session(&mut self) {
        match self.session.poll() {
            SessionEvent::Inactive => {
                if let Some(request) = self.next_request() {
                    if let Err(e) = self.session.start(request, self.canvas_size) {
                        self.status_message = Some(e.to_string());
                    }
                }
            }
            SessionEvent::Ready => {
                if let Some(count) = self.session.with_output(|o| o.points.len()) {
                    tracing::trace!("Spiral ready with {} points", count);
                }
                self.session.proceed();
                if let Some(frame) = self.session.finish() {
                    self.status_message = None;
                    self.accept_frame(frame);
                }
            }
            SessionEvent::Failed => {
                self.status_message = Some("Spiral session failed to read its source".to_string());
                self.loading = false;
            }
            SessionEvent::TimedOut => {
                self.status_message = Some("Spiral session timed out".to_string());
            }
            SessionEvent::Pending | SessionEvent::Draining => {}
        }
    }

    fn accept_frame(&mut self, frame: RenderedFrame) {
        if let Some(device) = &self.wgpu_device {
            self.spiral_renderer
                .lock()
                .upload_points(device, &frame.points);
        }
        self.last_frame = Some(frame);
    }

    fn input_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Input");
        ui.separator();

        ui.label("First fibonacci number");
        ui.text_edit_singleline(&mut self.first_input);
        ui.label("Second fibonacci number");
        ui.text_edit_singleline(&mut self.second_input);

        let generate_text = if self.generating {
            "Stop generating from numbers"
        } else {
            "Generate"
        };
        if ui.button(generate_text).clicked() {
            self.generating = !self.generating;
            self.status_message = None;
        }
        if self.generating {
            ui.label("Generating from numbers");
        }

        ui.add_space(5.0);
        let save_text = if self.saving {
            "Stop saving to file"
        } else {
            "Save fibonacci sequence"
        };
        if ui.button(save_text).clicked() {
            self.saving = !self.saving;
        }
        if self.saving {
            ui.label(format!(
                "Saving to '{}'",
                self.settings.binary_output_path().display()
            ));
        }

        ui.add_space(5.0);
        let load_text = if self.loading {
            "Stop generating from file"
        } else {
            "Load .bin fibonacci sequence"
        };
        if ui.button(load_text).clicked() {
            self.loading = !self.loading;
            self.status_message = None;
        }
        ui.label("Path to .bin file");
        ui.add(
            egui::TextEdit::singleline(&mut self.load_path_input).hint_text("/path/to/fibonacci.bin"),
        );
        if self.loading && !self.generating {
            ui.label("Generating from file");
        }

        ui.separator();
        let status = match (&self.status_message, &self.last_frame) {
            (Some(message), _) => format!("Error: {}", message),
            (None, Some(frame)) => format!(
                "State: {:?}, Points: {}, Squares: {}",
                self.session.state(),
                frame.points.len(),
                frame.rects.len()
            ),
            (None, None) => format!("State: {:?}", self.session.state()),
        };
        ui.label(status);
    }

    fn paint_spiral(&self, ui: &mut egui::Ui, rect: egui::Rect, frame: &RenderedFrame) {
        let (pipeline, geometry) = {
            let renderer_guard = self.spiral_renderer.lock();
            (
                renderer_guard.get_pipeline_arc(),
                renderer_guard.get_geometry_arc(),
            )
        };

        if let (Some(pipeline), Some(geometry), Some(queue), Some(extent)) =
            (pipeline, geometry, &self.wgpu_queue, &frame.extent)
        {
            // The rects were mapped for the frame's viewport, not the current canvas
            let spiral_rect = egui::Rect::from_min_size(
                rect.min,
                egui::vec2(frame.viewport.width, frame.viewport.height),
            );
            let cb = eframe::egui_wgpu::Callback::new_paint_callback(
                spiral_rect,
                SpiralPaintCallback {
                    pipeline,
                    geometry,
                    mvp_matrix: calculate_mvp(extent, frame.viewport),
                    queue: queue.clone(),
                },
            );
            ui.painter().add(cb);
        }

        let painter = ui.painter_at(rect);
        let stroke = egui::Stroke::new(RECT_STROKE_WIDTH, egui::Color32::WHITE);
        for square in &frame.rects {
            let screen_rect = egui::Rect::from_min_max(
                rect.min + egui::vec2(square.min.x, square.min.y),
                rect.min + egui::vec2(square.max.x, square.max.y),
            );
            painter.rect_stroke(screen_rect, 0.0, stroke);
        }
    }
}

impl App for FibonacciSpiralApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::SidePanel::left("input_panel")
            .exact_width(INPUT_PANEL_WIDTH)
            .show(ctx, |ui| self.input_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let desired_size = ui.available_size_before_wrap();
            let (rect, _response) = ui.allocate_exact_size(desired_size, egui::Sense::hover());
            self.canvas_size = Viewport::new(rect.width(), rect.height());

            ui.painter().rect_filled(rect, 0.0, egui::Color32::from_gray(20));
            match &self.last_frame {
                Some(frame) => self.paint_spiral(ui, rect, frame),
                None => {
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "Press Generate or load a .bin file",
                        egui::FontId::default(),
                        egui::Color32::WHITE,
                    );
                }
            }
        });

        // After layout, so a new session sees this frame's canvas size
        self.drive_session();
        ctx.request_repaint();
    }
}
