//! Fridge Chef window: egui/eframe application.
//!
//! # Architecture
//!
//! [`KitchenApp`] is the top-level [`eframe::App`].  It never mutates the
//! session itself:
//!
//! * `session`: [`SharedSession`] snapshot taken once per frame under a
//!   short lock.
//! * `command_tx`: sends [`Command`]s to the [`SessionRunner`](crate::session::SessionRunner).
//! * `narrator`: read-only access to the speaking flag.
//!
//! # Screens
//!
//! | Screen | Content |
//! |--------|---------|
//! | `Home` | Title, scan button |
//! | `Scanning` | Camera source, capture / cancel |
//! | `Recipes` | Spinner while loading, then diet filter + recipe cards |
//! | `Cooking` | Current step, prev / repeat / next, speaking indicator |
//! | `Shopping` | Shopping list with remove buttons |

use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::recipe::Recipe;
use crate::session::{Command, Screen, SessionState, SharedSession};
use crate::voice::Narrator;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
const MISSING: egui::Color32 = egui::Color32::from_rgb(255, 136, 68);
const DIM: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);

// ---------------------------------------------------------------------------
// KitchenApp
// ---------------------------------------------------------------------------

/// eframe application: the Fridge Chef window.
pub struct KitchenApp {
    session: SharedSession,
    narrator: Narrator,
    command_tx: mpsc::Sender<Command>,
    config: AppConfig,
    /// Last title sent to the viewport.
    title: &'static str,
}

impl KitchenApp {
    /// Create a new [`KitchenApp`].
    ///
    /// * `session`: shared session written by the runner.
    /// * `narrator`: narrator shared with the runner.
    /// * `command_tx`: sender end of the runner's command channel.
    /// * `config`: loaded application configuration.
    pub fn new(
        session: SharedSession,
        narrator: Narrator,
        command_tx: mpsc::Sender<Command>,
        config: AppConfig,
    ) -> Self {
        Self {
            session,
            narrator,
            command_tx,
            config,
            title: "",
        }
    }

    fn send(&self, command: Command) {
        if let Err(e) = self.command_tx.try_send(command) {
            log::warn!("ui: command dropped: {e}");
        }
    }

    /// Copy of the session for this frame.
    fn snapshot(&self) -> SessionState {
        match self.session.lock() {
            Ok(st) => st.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    // ── Shared chrome ────────────────────────────────────────────────────

    fn draw_header(&self, ui: &mut egui::Ui, st: &SessionState) {
        ui.horizontal(|ui| {
            if st.screen != Screen::Home && ui.button("< Back").clicked() {
                self.send(Command::GoBack);
            }
            ui.heading(st.screen.label());
            if st.screen == Screen::Recipes && !st.loading {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = format!("Shopping ({})", st.shopping_list.len());
                    if ui.button(label).clicked() {
                        self.send(Command::ShowShoppingList);
                    }
                });
            }
        });
    }

    fn draw_notice(&self, ui: &mut egui::Ui, notice: &str) {
        egui::Frame::group(ui.style())
            .fill(egui::Color32::from_rgb(70, 40, 30))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(notice).color(MISSING));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("x").clicked() {
                            self.send(Command::DismissNotice);
                        }
                    });
                });
            });
        ui.add_space(6.0);
    }

    // ── Screen renderers ─────────────────────────────────────────────────

    fn draw_home(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.label(egui::RichText::new("Fridge Chef").size(28.0).strong());
            ui.label(
                egui::RichText::new("Snap your fridge, get recipes, cook along.").color(DIM),
            );
            ui.add_space(24.0);
            if ui
                .add(egui::Button::new(egui::RichText::new("Scan fridge").size(18.0)))
                .clicked()
            {
                self.send(Command::StartScan);
            }
        });
    }

    fn draw_scanning(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label("Point the camera at your open fridge.");
            ui.label(
                egui::RichText::new(self.config.camera_source().display().to_string())
                    .color(DIM)
                    .size(11.0),
            );
            ui.add_space(24.0);
            if ui
                .add(egui::Button::new(egui::RichText::new("Capture").size(18.0)))
                .clicked()
            {
                self.send(Command::Capture);
            }
        });
    }

    fn draw_loading(&self, ui: &mut egui::Ui, st: &SessionState) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.spinner();
            ui.add_space(8.0);
            ui.label(st.loading_text.as_str());
        });
    }

    fn draw_recipes(&self, ui: &mut egui::Ui, st: &SessionState) {
        if !st.fridge_ingredients.is_empty() {
            ui.label(
                egui::RichText::new(format!("In your fridge: {}", st.fridge_ingredients.join(", ")))
                    .color(DIM)
                    .size(11.0),
            );
            ui.add_space(4.0);
        }

        egui::ComboBox::from_label("Diet")
            .selected_text(st.selected_diet.as_str())
            .show_ui(ui, |ui| {
                for option in &self.config.ui.dietary_options {
                    if ui
                        .selectable_label(*option == st.selected_diet, option.as_str())
                        .clicked()
                    {
                        self.send(Command::SetDiet(option.clone()));
                    }
                }
            });
        ui.add_space(6.0);

        let recipes = st.filtered_recipes();
        if recipes.is_empty() {
            ui.label(egui::RichText::new("No recipes match this diet.").color(DIM));
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for recipe in recipes {
                self.draw_recipe_card(ui, recipe, st);
                ui.add_space(6.0);
            }
        });
    }

    fn draw_recipe_card(&self, ui: &mut egui::Ui, recipe: &Recipe, st: &SessionState) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&recipe.name).strong().size(15.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Cook").clicked() {
                        self.send(Command::SelectRecipe(recipe.id.clone()));
                    }
                });
            });
            if !recipe.description.is_empty() {
                ui.label(recipe.description.as_str());
            }
            ui.label(
                egui::RichText::new(format!(
                    "{:.0} min · {:.0} kcal · {}",
                    recipe.prep_time,
                    recipe.calories,
                    recipe.difficulty.label()
                ))
                .color(DIM)
                .size(11.0),
            );
            if !recipe.dietary_tags.is_empty() {
                ui.label(egui::RichText::new(recipe.dietary_tags.join(" · ")).color(ACCENT).size(11.0));
            }

            for ingredient in recipe.missing_ingredients() {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!("Missing: {} {}", ingredient.amount, ingredient.name))
                            .color(MISSING)
                            .size(11.0),
                    );
                    if st.in_shopping_list(&ingredient.name) {
                        ui.label(egui::RichText::new("on list").color(DIM).size(11.0));
                    } else if ui.small_button("+ list").clicked() {
                        self.send(Command::AddToShoppingList(ingredient.name.clone()));
                    }
                });
            }
        });
    }

    fn draw_cooking(&self, ui: &mut egui::Ui, st: &SessionState) {
        let Some(recipe) = st.current_recipe.as_ref() else {
            return;
        };

        ui.label(egui::RichText::new(&recipe.name).strong().size(16.0));
        ui.label(
            egui::RichText::new(format!(
                "Step {} of {}",
                st.current_step_index + 1,
                st.step_count()
            ))
            .color(DIM),
        );
        ui.add_space(12.0);

        if let Some(step) = st.current_step() {
            ui.label(egui::RichText::new(step).size(18.0));
        }
        ui.add_space(12.0);

        if self.narrator.is_speaking() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(egui::RichText::new("Speaking...").color(ACCENT));
            });
        }
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            let first = st.current_step_index == 0;
            if ui.add_enabled(!first, egui::Button::new("Previous")).clicked() {
                self.send(Command::PrevStep);
            }
            if ui.button("Repeat").clicked() {
                self.send(Command::RepeatStep);
            }
            if ui.add_enabled(!st.is_last_step(), egui::Button::new("Next")).clicked() {
                self.send(Command::NextStep);
            }
        });
    }

    fn draw_shopping(&self, ui: &mut egui::Ui, st: &SessionState) {
        if st.shopping_list.is_empty() {
            ui.label(egui::RichText::new("Your shopping list is empty.").color(DIM));
            return;
        }
        egui::ScrollArea::vertical().show(ui, |ui| {
            for item in &st.shopping_list {
                ui.horizontal(|ui| {
                    ui.label(item.as_str());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("Remove").clicked() {
                            self.send(Command::RemoveFromShoppingList(item.clone()));
                        }
                    });
                });
            }
        });
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for KitchenApp {
    /// Called every frame by eframe.  Snapshots the session, then renders the
    /// current screen.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let st = self.snapshot();

        if self.title != st.screen.label() {
            self.title = st.screen.label();
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                "Fridge Chef · {}",
                self.title
            )));
        }

        // The runner changes state without waking the UI; poll faster while
        // something is in flight.
        let busy = st.loading || self.narrator.is_speaking();
        ctx.request_repaint_after(Duration::from_millis(if busy { 66 } else { 250 }));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_header(ui, &st);
            ui.separator();

            if let Some(notice) = st.notice.as_deref() {
                self.draw_notice(ui, notice);
            }

            match st.screen {
                Screen::Home => self.draw_home(ui),
                Screen::Scanning => self.draw_scanning(ui),
                Screen::Recipes if st.loading => self.draw_loading(ui, &st),
                Screen::Recipes => self.draw_recipes(ui, &st),
                Screen::Cooking => self.draw_cooking(ui, &st),
                Screen::Shopping => self.draw_shopping(ui, &st),
            }
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.narrator.cancel();
        log::info!("Fridge Chef window closing");
    }
}
