use std::time::Instant;

use eframe::{App, Frame, NativeOptions, egui, run_native};
use egui::epaint::{self, Color32, Pos2};
use egui::Sense;
use landscape::{
    FilterKind, GenerationParameters, LandscapeConfig, ParamValue, Parameter,
    RegenerationScheduler, TerrainMesh, bands::to_rgba8,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const LIGHT: [f32; 3] = [-0.4, 0.8, -0.45];
const PITCH: f32 = 0.6;

struct LandscapeApp {
    scheduler: RegenerationScheduler,
    // slider mirror of the scheduler's parameters
    ui: GenerationParameters,
    yaw: f32,

    // projected around the origin, cached per (build, yaw); placed at paint time
    preview: epaint::Mesh,
    preview_key: Option<(u64, u32)>,

    status_message: String,
}

impl LandscapeApp {
    fn new(scheduler: RegenerationScheduler) -> Self {
        Self {
            ui: *scheduler.params(),
            scheduler,
            yaw: std::f32::consts::FRAC_PI_4,
            preview: epaint::Mesh::default(),
            preview_key: None,
            status_message: String::new(),
        }
    }

    // Push one slider value through the validated setter
    fn apply(&mut self, parameter: Parameter, value: impl Into<ParamValue>) {
        if let Err(e) = self.scheduler.set_parameter(parameter, value) {
            warn!("{e}");
            self.status_message = e.to_string();
            self.ui = *self.scheduler.params();
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Landscape");
        ui.separator();

        ui.label("Persistence");
        if ui
            .add(egui::Slider::new(&mut self.ui.gain, 0.01..=1.0))
            .changed()
        {
            self.apply(Parameter::Gain, self.ui.gain);
        }

        ui.label("Lacunarity");
        if ui
            .add(egui::Slider::new(&mut self.ui.lacunarity, 1.0..=3.0))
            .changed()
        {
            self.apply(Parameter::Lacunarity, self.ui.lacunarity);
        }

        ui.label("Octaves");
        if ui
            .add(egui::Slider::new(&mut self.ui.octaves, 1..=8))
            .changed()
        {
            self.apply(Parameter::Octaves, self.ui.octaves);
        }

        ui.label("Scale");
        if ui
            .add(egui::Slider::new(&mut self.ui.scale, 0.1..=20.0))
            .changed()
        {
            self.apply(Parameter::Scale, self.ui.scale);
        }

        ui.label("Shift X");
        if ui
            .add(egui::Slider::new(&mut self.ui.shift[0], -10.0..=10.0))
            .changed()
        {
            self.apply(Parameter::ShiftX, self.ui.shift[0]);
        }

        ui.label("Shift Y");
        if ui
            .add(egui::Slider::new(&mut self.ui.shift[1], -10.0..=10.0))
            .changed()
        {
            self.apply(Parameter::ShiftY, self.ui.shift[1]);
        }

        ui.label("Seed");
        if ui
            .add(egui::DragValue::new(&mut self.ui.seed).speed(1.0))
            .changed()
        {
            self.apply(Parameter::Seed, self.ui.seed);
        }

        ui.label("Resolution");
        if ui
            .add(egui::Slider::new(&mut self.ui.resolution, 8..=256))
            .changed()
        {
            self.apply(Parameter::Resolution, self.ui.resolution);
        }

        ui.separator();

        if ui
            .checkbox(&mut self.ui.filter_enabled, "Height filter")
            .changed()
        {
            self.apply(Parameter::FilterEnabled, self.ui.filter_enabled);
        }
        let before = self.ui.filter_kind;
        egui::ComboBox::from_label("Filter")
            .selected_text(format!("{:?}", self.ui.filter_kind))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.ui.filter_kind, FilterKind::Buttes, "Buttes");
                ui.selectable_value(&mut self.ui.filter_kind, FilterKind::Water, "Water");
            });
        if self.ui.filter_kind != before {
            self.apply(Parameter::FilterKind, self.ui.filter_kind);
        }
        if self.ui.filter_kind == FilterKind::Buttes {
            ui.label("Sharpness");
            if ui
                .add(egui::Slider::new(&mut self.ui.sharpness, 0.0..=20.0))
                .changed()
            {
                self.apply(Parameter::Sharpness, self.ui.sharpness);
            }
        }

        ui.separator();
        ui.label("View angle");
        ui.add(egui::Slider::new(&mut self.yaw, 0.0..=std::f32::consts::TAU));

        ui.separator();
        ui.label(&self.status_message);
    }

    fn regenerate(&mut self) {
        let start = Instant::now();
        match self.scheduler.tick() {
            Ok(true) => {
                let ms = start.elapsed().as_secs_f32() * 1000.0;
                let mesh = self.scheduler.mesh();
                self.status_message = format!(
                    "{} vertices, {} triangles in {:.2} ms",
                    mesh.vertex_count(),
                    mesh.triangle_count(),
                    ms
                );
            }
            Ok(false) => {}
            Err(e) => {
                error!("{e}");
                self.status_message = e.to_string();
            }
        }
    }

    fn refresh_preview(&mut self) {
        let key = (self.scheduler.build_count(), self.yaw.to_bits());
        if self.preview_key == Some(key) {
            return;
        }
        self.preview = project(self.scheduler.mesh(), self.scheduler.params().length, self.yaw);
        self.preview_key = Some(key);
    }
}

impl App for LandscapeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| self.controls(ui));

        // Parameter changes from this frame are picked up here
        self.regenerate();

        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::drag());
            self.yaw = (self.yaw + response.drag_delta().x * 0.01).rem_euclid(std::f32::consts::TAU);
            if self.scheduler.mesh().is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("Generating…");
                });
                return;
            }
            self.refresh_preview();

            let fit = rect.width().min(rect.height()) * 0.45;
            let mut mesh = self.preview.clone();
            for v in mesh.vertices.iter_mut() {
                v.pos = rect.center() + v.pos.to_vec2() * fit;
            }
            ui.painter_at(rect).add(epaint::Shape::mesh(mesh));
        });
    }
}

// Project the terrain into unit screen space around the origin, shaded
// with a fixed light and sorted far-to-near (egui has no depth buffer).
fn project(mesh: &TerrainMesh, length: f32, yaw: f32) -> epaint::Mesh {
    let half = length * 0.5;
    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = PITCH.sin_cos();
    let light_len = (LIGHT[0] * LIGHT[0] + LIGHT[1] * LIGHT[1] + LIGHT[2] * LIGHT[2]).sqrt();

    let mut depth = Vec::with_capacity(mesh.vertex_count());
    let mut out = epaint::Mesh::default();
    for ((v, n), c) in mesh.vertices.iter().zip(&mesh.normals).zip(&mesh.colors) {
        let x = v[0] - half;
        let z = v[2] - half;
        let rx = x * cy - z * sy;
        let rz = x * sy + z * cy;
        let screen = Pos2::new(rx / length, (rz * sp - v[1] * cp) / length);
        depth.push(rz * cp + v[1] * sp);

        let lambert = (n[0] * LIGHT[0] + n[1] * LIGHT[1] + n[2] * LIGHT[2]) / light_len;
        let shade = 0.35 + 0.65 * lambert.max(0.0);
        let [r, g, b, a] = to_rgba8(*c);
        let lit = |ch: u8| (ch as f32 * shade).round().clamp(0.0, 255.0) as u8;
        out.vertices.push(epaint::Vertex {
            pos: screen,
            uv: epaint::WHITE_UV,
            color: Color32::from_rgba_unmultiplied(lit(r), lit(g), lit(b), a),
        });
    }

    let mut tris: Vec<[u32; 3]> = mesh.triangles().collect();
    let tri_depth = |t: &[u32; 3]| t.iter().map(|&i| depth[i as usize]).sum::<f32>();
    tris.sort_by(|a, b| tri_depth(a).total_cmp(&tri_depth(b)));
    out.indices = tris.into_iter().flatten().collect();
    out
}

fn load_config() -> LandscapeConfig {
    match std::env::args().nth(1) {
        Some(path) => LandscapeConfig::load(&path).unwrap_or_else(|e| {
            error!("could not load {path}: {e}; using defaults");
            LandscapeConfig::default()
        }),
        None => LandscapeConfig {
            parameters: GenerationParameters {
                resolution: 128,
                sharpness: 5.0,
                ..Default::default()
            },
            palette: None,
        },
    }
}

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config();
    let scheduler = match RegenerationScheduler::new(config.parameters, config.palette()) {
        Ok(s) => s,
        Err(e) => {
            error!("{e}; using default parameters");
            RegenerationScheduler::new(GenerationParameters::default(), config.palette())
                .expect("default parameters are valid")
        }
    };
    info!(resolution = scheduler.params().resolution, "starting landscape viewer");

    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([500.0, 350.0]),
        ..Default::default()
    };
    run_native(
        "Landscape",
        opts,
        Box::new(|_cc| Ok(Box::new(LandscapeApp::new(scheduler)))),
    )
}
