use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context as _;
use bubble_chart::chart::{BubbleChart, LayoutMode};
use bubble_chart::config::ChartConfig;
use bubble_chart::records::{Record, load_records};
use eframe::egui::{self, Context, Pos2, Vec2};

mod canvas;
mod render_utils;
mod ui;

type LoadResult = Result<Vec<Record>, String>;

pub struct BubbleApp {
    data_path: PathBuf,
    config: ChartConfig,
    initial_mode: LayoutMode,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    chart: BubbleChart,
    data_label: String,
    hovered: Option<String>,
    reload_error: Option<String>,
    pan: Vec2,
    zoom: f32,
    view_scratch: ViewScratch,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
}

impl BubbleApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        data_path: PathBuf,
        config: ChartConfig,
        initial_mode: LayoutMode,
    ) -> Self {
        let state = AppState::Loading {
            rx: Self::spawn_load(data_path.clone()),
        };
        Self {
            data_path,
            config,
            initial_mode,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_records(&data_path)
                .with_context(|| format!("failed to load {}", data_path.display()))
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn ready_state(&self, records: LoadResult) -> AppState {
        let chart = records.and_then(|records| {
            BubbleChart::new(self.config.clone(), &records).map_err(|error| error.to_string())
        });
        match chart {
            Ok(mut chart) => {
                if self.initial_mode != LayoutMode::Grouped {
                    chart.switch_mode(self.initial_mode);
                }
                AppState::Ready(Box::new(ViewModel::new(chart, &self.data_path)))
            }
            Err(error) => {
                tracing::error!(%error, "failed to build chart");
                AppState::Error(error)
            }
        }
    }
}

impl ViewModel {
    /// Swaps in reloaded records. On failure the current chart stays on
    /// screen and the error goes to the status bar.
    fn apply_reload(&mut self, result: LoadResult) {
        let outcome = result.and_then(|records| {
            self.chart
                .load(&records)
                .map_err(|error| error.to_string())
        });
        match outcome {
            Ok(()) => self.reload_error = None,
            Err(error) => {
                tracing::error!(%error, "reload failed");
                self.reload_error = Some(error);
            }
        }
    }
}

impl eframe::App for BubbleApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading records...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load records");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.state = AppState::Loading {
                        rx: Self::spawn_load(self.data_path.clone()),
                    };
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.data_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => model.apply_reload(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => model.apply_reload(Err(
                            "Background load worker disconnected".to_owned(),
                        )),
                    }
                }
            }
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = self.ready_state(result);
        }
    }
}
