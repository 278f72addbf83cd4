//! Control Panel Widget
//! Left side panel with the state filter.

use crate::data::StateSelection;
use egui::{Color32, RichText, ScrollArea};

/// Left side control panel with the state multi-select.
pub struct ControlPanel {
    pub selection: StateSelection,
    pub states: Vec<String>,
    pub search: String,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selection: StateSelection::new(),
            states: Vec::new(),
            search: String::new(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update available states after the data is loaded
    pub fn update_states(&mut self, states: Vec<String>) {
        self.states = states;
        self.selection.clear();
    }

    /// Select every loaded state.
    pub fn select_all(&mut self) {
        for state in &self.states {
            self.selection.insert(state.as_str());
        }
    }

    /// States whose name contains the search text, case-insensitive.
    pub fn visible_states(&self) -> Vec<&str> {
        let needle = self.search.trim().to_lowercase();
        self.states
            .iter()
            .map(String::as_str)
            .filter(|state| needle.is_empty() || state.to_lowercase().contains(&needle))
            .collect()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌱 US Ag Exports")
                    .size(22.0)
                    .color(Color32::from_rgb(170, 68, 153)),
            );
            ui.label(RichText::new("2011, million USD").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== State Filter Section =====
        ui.label(RichText::new("Filter Data by State(s):").size(14.0).strong());
        ui.add_space(5.0);
        ui.label("Choose the state(s)");

        ui.horizontal(|ui| {
            ui.label("🔍");
            ui.text_edit_singleline(&mut self.search);
        });
        ui.add_space(5.0);

        let visible: Vec<String> = self.visible_states().into_iter().map(String::from).collect();
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                    for state in &visible {
                        let mut checked = self.selection.contains(state);
                        if ui.checkbox(&mut checked, state.as_str()).changed() {
                            self.selection.toggle(state);
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.select_all();
                action = ControlPanelAction::SelectionChanged;
            }
            let enabled = !self.selection.is_empty();
            if ui
                .add_enabled(enabled, egui::Button::new("Clear").small())
                .clicked()
            {
                self.selection.clear();
                action = ControlPanelAction::SelectionChanged;
            }
            ui.label(
                RichText::new(if self.selection.is_empty() {
                    "All states".to_string()
                } else {
                    format!("{} selected", self.selection.len())
                })
                .size(11.0)
                .color(Color32::GRAY),
            );
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") || self.status.starts_with("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
}
