use std::collections::BTreeSet;
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use career_dash::data::filter::FilterField;

use crate::state::{toggle, AppState, Tab};
use crate::ui::format;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Hold our own handle so options can be read while the selection mutates.
    let dataset = Arc::clone(&state.dataset);
    let options = &dataset.options;
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in FilterField::ALL {
                let n_selected = state.selection.selected_count(field);
                let n_total = options.available_count(field);
                let header_text = if n_selected == 0 {
                    format!("{}  (no filter)", field.label())
                } else {
                    format!("{}  ({n_selected}/{n_total})", field.label())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(field.label())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        // Select all / clear buttons
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                options.select_field(&mut state.selection, field);
                                changed = true;
                            }
                            if ui
                                .small_button("Clear")
                                .on_hover_text("An empty selection does not filter this field")
                                .clicked()
                            {
                                state.selection.clear(field);
                                changed = true;
                            }
                        });

                        let sel = &mut state.selection;
                        changed |= match field {
                            FilterField::Year => checklist(ui, &options.years, &mut sel.years),
                            FilterField::Seniority => {
                                checklist(ui, &options.seniority, &mut sel.seniority)
                            }
                            FilterField::Role => checklist(ui, &options.roles, &mut sel.roles),
                            FilterField::Modality => {
                                checklist(ui, &options.modality, &mut sel.modality)
                            }
                            FilterField::CompanySize => {
                                checklist(ui, &options.company_size, &mut sel.company_size)
                            }
                            FilterField::ContractType => {
                                checklist(ui, &options.contract_type, &mut sel.contract_type)
                            }
                        };
                    });
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset();
            }

            ui.separator();
            let c = &state.model.coverage;
            ui.strong("Filtered data");
            ui.label(format!(
                "Postings: {} / {}",
                format::thousands(c.rows.0 as i64),
                format::thousands(c.rows.1 as i64)
            ));
            ui.label(format!("Roles: {} / {}", c.roles.0, c.roles.1));
            ui.label(format!("Years: {} / {}", c.years.0, c.years.1));
        });

    // Recompute the render model after any checkbox changes.
    if changed {
        state.refilter();
    }
}

/// One checkbox per available value. Returns whether anything changed.
fn checklist<T>(ui: &mut Ui, available: &BTreeSet<T>, selected: &mut BTreeSet<T>) -> bool
where
    T: Ord + Clone + std::fmt::Display,
{
    let mut changed = false;
    for value in available {
        let mut checked = selected.contains(value);
        if ui.checkbox(&mut checked, value.to_string()).changed() {
            toggle(selected, value);
            changed = true;
        }
    }
    changed
}

// ---------------------------------------------------------------------------
// Top bar – headline metrics
// ---------------------------------------------------------------------------

/// Render the four headline figures with their deltas.
pub fn headline_bar(ui: &mut Ui, state: &AppState) {
    let h = &state.model.headline;
    ui.horizontal(|ui: &mut Ui| {
        metric(
            ui,
            "Mean salary (USD)",
            &format::usd_opt(h.mean_salary),
            Some(format::usd_delta(h.mean_salary_delta)),
        );
        ui.separator();
        let count_delta = (h.row_count_delta != 0).then(|| format::thousands(h.row_count_delta));
        metric(
            ui,
            "Postings",
            &format::thousands(h.row_count as i64),
            count_delta,
        );
        ui.separator();
        metric(ui, "Remote work", &format::pct_opt(h.pct_remote), None);
        ui.separator();
        metric(ui, "Junior postings", &format::pct_opt(h.pct_junior), None);
    });

    if !state.model.has_data() {
        ui.label(
            RichText::new("No postings match the current filters.").color(Color32::YELLOW),
        );
    }
}

fn metric(ui: &mut Ui, label: &str, value: &str, delta: Option<String>) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.heading(value);
        if let Some(delta) = delta {
            let color = if delta.starts_with('-') {
                Color32::LIGHT_RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(delta).small().color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Tabs and footer
// ---------------------------------------------------------------------------

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }
    });
}

/// Facts about the whole dataset, independent of filters.
pub fn footer(ui: &mut Ui, state: &AppState) {
    let s = &state.model.summary;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label(format!(
            "Data: {} – {}",
            format::label_opt(s.first_year),
            format::label_opt(s.last_year)
        ));
        ui.separator();
        ui.label(format!("{} postings", format::thousands(s.total_rows as i64)));
        ui.separator();
        ui.label(format!("{} roles", s.unique_roles));
        ui.separator();
        ui.label(format!("{} employer countries", s.unique_company_countries));
        ui.separator();
        ui.label(format!("{} salary currencies", s.unique_currencies));
    });
}
