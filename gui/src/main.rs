mod canvas;
mod settings;

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use eframe::egui;
use eframe::egui::{pos2, vec2, Color32, Rect, Sense, Stroke, TextureHandle, TextureOptions, Ui};
use eframe::run_native;
use life_shared::{lock_recovering, Letterbox, Simulation, TickOutcome, Ticker};
use log::{error, info};

use crate::canvas::CellCanvas;
use crate::settings::Settings;

const DEFAULT_RANDOM_DENSITY: f64 = 0.5;
const GRID_LINE_COLOR: Color32 = Color32::from_rgb(0, 125, 125);

/// Everything the ticker thread and the UI share.
struct Board {
    simulation: Simulation,
    canvas: CellCanvas,
}

impl Board {
    fn new(simulation: Simulation) -> Self {
        let grid = simulation.grid();
        let mut canvas = CellCanvas::new(grid.rows(), grid.cols());
        canvas.sync(grid);
        Board { simulation, canvas }
    }

    fn sync(&mut self) {
        self.canvas.sync(self.simulation.grid());
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::load()?;
    info!("starting with {settings:?}");

    let mut simulation = Simulation::new(settings.geometry).context("building the board")?;
    if let Some(pattern) = settings.seed_pattern()? {
        simulation.place_centered(&pattern).context("placing seed_pattern")?;
    }
    if settings.seed_density > 0.0 {
        simulation.randomize(&mut rand::rng(), settings.seed_density);
    }
    simulation.set_running(settings.start_running);

    // Shared board wrapped in Arc<Mutex<T>> so generations and clicks never overlap
    let board = Arc::new(Mutex::new(Board::new(simulation)));
    let interval = settings.generation_interval();
    let random_density = if settings.seed_density > 0.0 {
        settings.seed_density
    } else {
        DEFAULT_RANDOM_DENSITY
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Conway's Game of Life")
            .with_inner_size([settings.window_width, settings.window_height]),
        ..Default::default()
    };

    run_native(
        "Conway's Game of Life",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let ticking = Arc::clone(&board);

            let ticker = Ticker::spawn(interval, move || {
                let mut board = lock_recovering(&ticking);
                match board.simulation.tick() {
                    Ok(TickOutcome::Advanced { changed, .. }) => {
                        if changed {
                            board.sync();
                        }
                        ctx.request_repaint();
                    }
                    Ok(TickOutcome::Paused) => {}
                    Err(err) => error!("generation failed: {err}"),
                }
            })?;

            Ok(Box::new(GuiOfLife::new(board, ticker, random_density)))
        }),
    )
    .map_err(|err| anyhow!("running the window: {err}"))
}

struct GuiOfLife {
    board: Arc<Mutex<Board>>,
    texture: Option<TextureHandle>,
    random_density: f64,
    // Stops the generation thread when the window closes
    _ticker: Ticker,
}

impl GuiOfLife {
    fn new(board: Arc<Mutex<Board>>, ticker: Ticker, random_density: f64) -> Self {
        Self {
            board,
            texture: None,
            random_density,
            _ticker: ticker,
        }
    }

    fn controls(&mut self, ui: &mut Ui) {
        let mut board = lock_recovering(&self.board);
        let running = board.simulation.is_running();

        ui.horizontal(|ui| {
            let label = if running { "Stop Simulation" } else { "Run Simulation" };
            if ui.button(label).clicked() {
                board.simulation.toggle_running();
            }
            if ui.add_enabled(!running, egui::Button::new("Step")).clicked() {
                match board.simulation.advance() {
                    Ok(_) => board.sync(),
                    Err(err) => error!("generation failed: {err}"),
                }
            }
            if ui.button("Randomize").clicked() {
                board.simulation.randomize(&mut rand::rng(), self.random_density);
                board.sync();
            }
            if ui.button("Clear").clicked() {
                board.simulation.clear();
                board.sync();
            }

            ui.separator();
            ui.label(format!("Generation {}", board.simulation.generation()));
            ui.label(format!("{} alive", board.simulation.grid().live_count()));
        });
    }

    fn create_grid(&mut self, ui: &mut Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
        let rect = response.rect;
        let mut board = lock_recovering(&self.board);

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let local = pointer - rect.min;
                match board.simulation.click(local.x, local.y, rect.width(), rect.height()) {
                    Ok(Some(_)) => board.sync(),
                    Ok(None) => {}
                    Err(err) => error!("ignoring click: {err}"),
                }
            }
        }

        if let Some(image) = board.canvas.take_update() {
            match &mut self.texture {
                Some(texture) => texture.set(image, TextureOptions::NEAREST),
                None => self.texture = Some(ui.ctx().load_texture("cells", image, TextureOptions::NEAREST)),
            }
        }

        // Fails only while the panel has no area, e.g. when minimized
        let Ok(fit) = Letterbox::fit(rect.width(), rect.height(), board.simulation.geometry()) else {
            return;
        };
        drop(board);

        let (x, y) = fit.origin();
        let (width, height) = fit.grid_size();
        let grid_rect = Rect::from_min_size(rect.min + vec2(x, y), vec2(width, height));
        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            painter.image(texture.id(), grid_rect, uv, Color32::WHITE);
        }

        let stroke = Stroke::new(1.0, GRID_LINE_COLOR);
        for ((x0, y0), (x1, y1)) in fit.grid_lines() {
            painter.line_segment([rect.min + vec2(x0, y0), rect.min + vec2(x1, y1)], stroke);
        }
    }
}

impl eframe::App for GuiOfLife {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.heading("Game of Life");
            self.controls(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.create_grid(ui);
        });
    }
}
