use crate::detail::{SelectedFood, Unit};
use crate::search::{self, SearchOutcome};
use crate::table::{self, ColumnKind, PAGE_SIZE_OPTIONS, ViewState};
use crate::{AppConfig, Dataset, DatasetError, statics};
use anyhow::Context as _;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, TryRecvError},
};
use tracing::{error, info};

type LoadResult = (PathBuf, Result<Dataset, DatasetError>);

pub fn run_gui(config: AppConfig) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1400.0, 900.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            if !config.dark_theme {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }
            let mut app = NutritionApp::new(&config);
            app.start_load(&cc.egui_ctx, config.data_path.clone());
            Ok(Box::new(app))
        }),
    )
}

/// The main application state and GUI logic.
/// Owns the dataset, the table view state and the current selection.
struct NutritionApp {
    dataset: Dataset,
    pending_load: Option<Receiver<LoadResult>>,
    load_failed: bool,
    dialog_dir: Option<PathBuf>,

    view: ViewState,

    search_query: String,
    search_request_focus: bool,
    search_outcome: Option<SearchOutcome>,

    selected: Option<SelectedFood>,

    status: String,
    last_error: Option<String>,
    about_open: bool,
    theme_dark: bool,
}

impl NutritionApp {
    fn new(config: &AppConfig) -> Self {
        Self {
            dataset: Dataset::default(),
            pending_load: None,
            load_failed: false,
            dialog_dir: config.data_path.parent().map(PathBuf::from),
            view: ViewState::new(config.page_size),
            search_query: String::new(),
            search_request_focus: true,
            search_outcome: None,
            selected: None,
            status: String::new(),
            last_error: None,
            about_open: false,
            theme_dark: config.dark_theme,
        }
    }

    /// Reads the dataset on a worker thread; `poll_load` picks up the result.
    fn start_load(&mut self, ctx: &egui::Context, path: PathBuf) {
        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();
        info!("Loading food data from {}", path.display());
        std::thread::spawn(move || {
            let result = Dataset::load_path(&path);
            // The receiver only disappears when the app is closing.
            let _ = tx.send((path, result));
            ctx.request_repaint();
        });
        self.pending_load = Some(rx);
    }

    fn poll_load(&mut self) {
        let Some(rx) = self.pending_load.as_ref() else {
            return;
        };
        match rx.try_recv() {
            Ok((path, result)) => {
                self.pending_load = None;
                self.apply_load(&path, result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending_load = None;
                self.load_failed = true;
                self.last_error = Some(statics::EN_ERR_LOAD.to_string());
            }
        }
    }

    fn apply_load(&mut self, path: &Path, result: Result<Dataset, DatasetError>) {
        self.search_outcome = None;
        self.selected = None;
        self.view = ViewState::new(self.view.page_size());

        match result.with_context(|| format!("loading {path:?}")) {
            Ok(dataset) => {
                self.dialog_dir = path.parent().map(PathBuf::from);
                self.status = format!("Loaded {} food items", dataset.len());
                self.dataset = dataset;
                self.load_failed = false;
                self.last_error = None;
            }
            Err(e) => {
                error!("Could not load food data: {e:#}");
                self.dataset = Dataset::default();
                self.load_failed = true;
                self.status.clear();
                self.last_error = Some(format!("{} ({e:#})", statics::EN_ERR_LOAD));
            }
        }
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let mut dlg =
            rfd::FileDialog::new().add_filter(statics::EN_FILTER_FOOD_DATA, &["json", "gz"]);
        if let Some(dir) = self.dialog_dir.clone() {
            dlg = dlg.set_directory(dir);
        }
        dlg
    }

    fn open_file(&mut self, ctx: &egui::Context) {
        let Some(path) = self.file_dialog().pick_file() else {
            return;
        };
        self.start_load(ctx, path);
    }

    fn export_json(&mut self) {
        let Some(path) = self
            .file_dialog()
            .set_file_name(statics::EXPORT_FILE_NAME)
            .save_file()
        else {
            return;
        };

        if let Err(e) = self.dataset.export_to_path(&path) {
            error!("Export failed: {e:#}");
            self.last_error = Some(format!("Failed to export: {e:#}"));
        } else {
            self.dialog_dir = path.parent().map(PathBuf::from);
            self.status = format!("Exported {}", path.display());
            self.last_error = None;
        }
    }

    fn run_search(&mut self) {
        // A new search hides the previous detail, as the result list takes over.
        self.selected = None;
        self.search_outcome = Some(search::search(&self.dataset.records, &self.search_query));
    }

    fn select_food(&mut self, index: usize) {
        let Some(record) = self.dataset.get(index) else {
            return;
        };
        info!(fdc_id = ?record.fdc_id(), "selected {}", record.name());
        self.search_outcome = None;
        self.selected = Some(SelectedFood::new(index, record));
    }

    fn recompute_detail(&mut self) {
        if let Some(selected) = self.selected.as_mut()
            && let Some(record) = self.dataset.get(selected.index)
        {
            selected.recompute(record);
        }
    }

    fn total_foods_label(&self) -> String {
        if self.load_failed {
            format!("{} {}", statics::EN_LABEL_TOTAL_FOODS, statics::EN_COUNT_ERROR)
        } else {
            format!("{} {}", statics::EN_LABEL_TOTAL_FOODS, self.dataset.len())
        }
    }

    fn page_info(view: &ViewState, record_count: usize) -> String {
        format!(
            "Page {} of {}",
            view.page(),
            view.total_pages(record_count).max(1)
        )
    }

    fn render_search_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading(statics::EN_HEADING_SEARCH);
        ui.separator();

        let mut do_search = false;
        ui.horizontal(|ui| {
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.search_query)
                    .hint_text(statics::EN_HINT_SEARCH)
                    .desired_width(ui.available_width() - 70.0),
            );
            if self.search_request_focus {
                resp.request_focus();
                self.search_request_focus = false;
            }
            if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                do_search = true;
            }
            if ui.button(statics::EN_BTN_SEARCH).clicked() {
                do_search = true;
            }
        });
        if do_search {
            self.run_search();
        }
        ui.separator();

        let mut picked = None;
        match &self.search_outcome {
            None => {}
            Some(SearchOutcome::Prompt) => {
                ui.label(statics::EN_SEARCH_ENTER_QUERY);
            }
            Some(SearchOutcome::NoMatches { query }) => {
                ui.label(format!(
                    "No food found matching \"{query}\". Try a different search term."
                ));
            }
            Some(outcome @ SearchOutcome::Matches { .. }) => {
                ui.push_id("search_results_scroll", |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, true])
                        .show(ui, |ui| {
                            for &idx in outcome.hits() {
                                let Some(record) = self.dataset.get(idx) else {
                                    continue;
                                };
                                let text =
                                    format!("{} (FDC ID: {})", record.name(), record.fdc_id_label());
                                if ui.selectable_label(false, text).clicked() {
                                    picked = Some(idx);
                                }
                            }
                            if let Some(more) = outcome.remaining_message() {
                                ui.weak(more);
                            }
                        });
                });
            }
        }

        if let Some(idx) = picked {
            self.select_food(idx);
        }
    }

    fn render_detail_panel(&mut self, ui: &mut egui::Ui) {
        let Some(selected) = self.selected.as_mut() else {
            return;
        };

        let mut inputs_changed = false;
        let mut close = false;

        ui.horizontal(|ui| {
            ui.heading(statics::EN_HEADING_DETAILS);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button(statics::EN_BTN_CLOSE).clicked() {
                    close = true;
                }
            });
        });
        ui.separator();

        let detail = selected.detail();
        ui.strong(detail.name.as_str());
        ui.label(format!("FDC ID: {}", detail.fdc_id));
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label(statics::EN_LABEL_QUANTITY);
            let resp = ui.add(
                egui::TextEdit::singleline(&mut selected.quantity_input)
                    .hint_text(statics::EN_HINT_QUANTITY)
                    .desired_width(80.0),
            );
            inputs_changed |= resp.changed();

            ui.label(statics::EN_LABEL_UNIT);
            for unit in Unit::ALL {
                inputs_changed |= ui
                    .selectable_value(&mut selected.unit, unit, unit.label())
                    .changed();
            }
        });
        ui.separator();

        ui.push_id("detail_scroll", |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for group in &selected.detail().groups {
                        ui.strong(group.name);
                        egui::Grid::new(("detail_group", group.name))
                            .striped(true)
                            .num_columns(2)
                            .show(ui, |ui| {
                                for row in &group.rows {
                                    ui.label(row.label);
                                    let text = egui::RichText::new(row.text());
                                    if row.amount.is_estimated() {
                                        ui.label(text.italics());
                                    } else {
                                        ui.label(text);
                                    }
                                    ui.end_row();
                                }
                            });
                        ui.add_space(6.0);
                    }
                });
        });

        if close {
            self.selected = None;
        } else if inputs_changed {
            self.recompute_detail();
        }
    }

    fn render_table(&mut self, ui: &mut egui::Ui) {
        ui.heading(statics::EN_HEADING_FOODS);
        ui.separator();

        let record_count = self.dataset.len();
        if record_count == 0 {
            ui.label(statics::EN_TABLE_NO_DATA);
            return;
        }

        let visible = self.view.visible_rows(&self.dataset.records);

        let mut new_page_size = None;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.view.has_prev(), egui::Button::new(statics::EN_BTN_PREV_PAGE))
                .clicked()
            {
                self.view.prev_page();
            }
            ui.label(Self::page_info(&self.view, record_count));
            if ui
                .add_enabled(
                    self.view.has_next(record_count),
                    egui::Button::new(statics::EN_BTN_NEXT_PAGE),
                )
                .clicked()
            {
                self.view.next_page(record_count);
            }

            ui.separator();
            ui.label(statics::EN_LABEL_PER_PAGE);
            let current = self.view.page_size();
            egui::ComboBox::from_id_salt("page_size")
                .selected_text(current.to_string())
                .show_ui(ui, |ui| {
                    for &size in PAGE_SIZE_OPTIONS {
                        if ui.selectable_label(current == size, size.to_string()).clicked() {
                            new_page_size = Some(size);
                        }
                    }
                });
        });
        if let Some(size) = new_page_size {
            self.view.set_page_size(size);
        }
        ui.separator();

        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
        let columns = &self.dataset.columns;
        let records = &self.dataset.records;
        let sort = self.view.sort().cloned();
        let mut sort_clicked: Option<String> = None;
        let mut view_clicked: Option<usize> = None;

        ui.push_id("foods_table", |ui| {
            let mut builder = TableBuilder::new(ui)
                .striped(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
            for column in columns.iter() {
                builder = match column.kind {
                    ColumnKind::Text => builder.column(Column::initial(320.0).resizable(true)),
                    ColumnKind::Number => builder.column(Column::initial(120.0).resizable(true)),
                };
            }
            builder
                .column(Column::remainder())
                .header(row_h, |mut header| {
                    for column in columns.iter() {
                        header.col(|ui| {
                            let clicked = ui
                                .add(egui::Button::new(column.label()).frame(false))
                                .clicked();
                            if let Some(sort) = sort.as_ref()
                                && sort.column == column.key
                            {
                                ui.label(sort.direction.glyph());
                            }
                            if clicked {
                                sort_clicked = Some(column.key.clone());
                            }
                        });
                    }
                    header.col(|ui| {
                        ui.strong(statics::EN_COL_DETAILS);
                    });
                })
                .body(|mut body| {
                    for &idx in &visible {
                        let record = &records[idx];
                        body.row(row_h, |mut row| {
                            for column in columns.iter() {
                                row.col(|ui| {
                                    let cell = table::format_cell(record, &column.key);
                                    let text = egui::RichText::new(cell.text);
                                    if cell.estimated {
                                        ui.label(text.italics());
                                    } else {
                                        ui.label(text);
                                    }
                                });
                            }
                            row.col(|ui| {
                                if ui.small_button(statics::EN_BTN_VIEW).clicked() {
                                    view_clicked = Some(idx);
                                }
                            });
                        });
                    }
                });
        });

        if let Some(column) = sort_clicked {
            self.view.toggle_sort(&column);
        }
        if let Some(idx) = view_clicked {
            self.select_food(idx);
        }
    }
}

impl eframe::App for NutritionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                let idle = self.pending_load.is_none();
                if ui
                    .add_enabled(idle, egui::Button::new(statics::EN_BTN_OPEN))
                    .clicked()
                {
                    self.open_file(ctx);
                }

                let has_data = idle && !self.dataset.is_empty();
                if ui
                    .add_enabled(has_data, egui::Button::new(statics::EN_BTN_EXPORT_JSON))
                    .clicked()
                {
                    self.export_json();
                }

                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }

                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }

                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        if self.about_open {
            let mut open = self.about_open;
            egui::Window::new(statics::EN_WINDOW_ABOUT)
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.heading(statics::EN_ABOUT_HEADING);
                    ui.label(format!(
                        "{} {}",
                        statics::EN_ABOUT_VERSION,
                        env!("CARGO_PKG_VERSION")
                    ));
                    ui.separator();
                    ui.label(statics::EN_ABOUT_ESTIMATE_NOTE);
                });
            self.about_open = open;
        }

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        // The bottom status bar must be shown before side/central panels so it
        // spans the full window width.
        egui::TopBottomPanel::bottom("bottom_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let file_label = self
                    .dataset
                    .source_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                ui.label(file_label);
                ui.separator();
                if self.load_failed {
                    ui.colored_label(egui::Color32::RED, self.total_foods_label());
                } else {
                    ui.label(self.total_foods_label());
                }
                ui.separator();
                ui.label(format!("columns: {}", self.dataset.columns.len()));
            });
        });

        if self.pending_load.is_some() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading(statics::EN_HOME_HEADING);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(statics::EN_HOME_LOADING);
                });
            });
            return;
        }

        if self.dataset.is_empty() && self.load_failed {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading(statics::EN_HOME_HEADING);
                ui.label(statics::EN_HOME_INSTRUCTIONS);
            });
            return;
        }

        egui::SidePanel::left("search_panel")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                self.render_search_panel(ui);
            });

        egui::SidePanel::right("details_panel")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                if self.selected.is_some() {
                    self.render_detail_panel(ui);
                } else {
                    ui.heading(statics::EN_HEADING_DETAILS);
                    ui.separator();
                    ui.label(statics::EN_SELECT_FOOD);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_table(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::NutritionApp;
    use crate::search::SearchOutcome;
    use crate::table::ViewState;
    use crate::{AppConfig, Dataset, DatasetError, FoodRecord, statics};
    use eframe::egui;
    use std::path::Path;
    use std::time::{Duration, Instant};

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            FoodRecord::named("Cheese, cheddar", 1).with_number("Protein (per gram)", 0.25),
            FoodRecord::named("Cheese, swiss", 2),
            FoodRecord::named("Apples, raw", 3),
        ])
    }

    fn loaded_app() -> NutritionApp {
        let mut app = NutritionApp::new(&AppConfig::default());
        app.apply_load(Path::new("food_data.json"), Ok(dataset()));
        app
    }

    #[test]
    fn failed_load_leaves_empty_dataset_and_error_marker() {
        let mut app = loaded_app();
        let err = DatasetError::NotAnArray { found: "object" };
        app.apply_load(Path::new("food_data.json"), Err(err));

        assert!(app.dataset.is_empty());
        assert!(app.load_failed);
        assert!(app.last_error.as_deref().unwrap().starts_with(statics::EN_ERR_LOAD));
        assert_eq!(app.total_foods_label(), "Total foods: Error");
    }

    #[test]
    fn successful_load_reports_count_and_keeps_page_size() {
        let config = AppConfig {
            page_size: 50,
            ..AppConfig::default()
        };
        let mut app = NutritionApp::new(&config);
        app.apply_load(Path::new("data/food_data.json"), Ok(dataset()));

        assert_eq!(app.total_foods_label(), "Total foods: 3");
        assert_eq!(app.view.page_size(), 50);
        assert_eq!(app.dialog_dir.as_deref(), Some(Path::new("data")));
    }

    #[test]
    fn selecting_a_search_result_clears_results_and_opens_detail() {
        let mut app = loaded_app();
        app.search_query = "cheese".to_string();
        app.run_search();
        assert_eq!(app.search_outcome.as_ref().unwrap().hits(), &[0, 1]);

        app.select_food(1);
        assert!(app.search_outcome.is_none());
        let selected = app.selected.as_ref().unwrap();
        assert_eq!(selected.detail().name, "Cheese, swiss");
    }

    #[test]
    fn empty_search_prompts_instead_of_listing_everything() {
        let mut app = loaded_app();
        app.run_search();
        assert_eq!(app.search_outcome, Some(SearchOutcome::Prompt));
    }

    #[test]
    fn quantity_edits_recompute_detail() {
        let mut app = loaded_app();
        app.select_food(0);
        if let Some(selected) = app.selected.as_mut() {
            selected.quantity_input = "40".to_string();
        }
        app.recompute_detail();

        let detail = app.selected.as_ref().unwrap().detail();
        assert_eq!(detail.quantity, 40.0);
        assert_eq!(detail.row("Protein").unwrap().text(), "10.00 g");
    }

    #[test]
    fn worker_load_is_picked_up_by_polling() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("picked.json");
        std::fs::write(&path, r#"[{ "Food Name": "Kale, raw", "fdc_id": 323505 }]"#)?;

        let mut app = loaded_app();
        app.start_load(&egui::Context::default(), path.clone());
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.pending_load.is_some() && Instant::now() < deadline {
            app.poll_load();
            std::thread::sleep(Duration::from_millis(5));
        }

        assert!(app.pending_load.is_none());
        assert_eq!(app.total_foods_label(), "Total foods: 1");
        assert_eq!(app.dataset.source_path.as_deref(), Some(path.as_path()));
        Ok(())
    }

    #[test]
    fn page_info_never_reports_zero_pages() {
        let view = ViewState::new(10);
        assert_eq!(NutritionApp::page_info(&view, 0), "Page 1 of 1");
        assert_eq!(NutritionApp::page_info(&view, 21), "Page 1 of 3");
    }
}
