use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use career_dash::data::aggregate::{GroupStats, Pivot};
use career_dash::data::junior::RoleProfile;
use career_dash::data::metrics::SegmentProfile;
use career_dash::data::model::{CompanySize, Seniority};

use crate::color::ramp;
use crate::ui::format;

const ROW_HEIGHT: f32 = 20.0;
const HEAT_LOW: Color32 = Color32::from_rgb(255, 247, 188);
const HEAT_HIGH: Color32 = Color32::from_rgb(204, 76, 2);

/// Header row plus one body row per item, each cell produced by `cells`.
fn simple_table<T>(
    ui: &mut Ui,
    id: &str,
    headers: &[&str],
    items: &[T],
    cells: impl Fn(&T) -> Vec<String>,
) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(140.0))
            .columns(Column::auto().at_least(80.0), headers.len().saturating_sub(1))
            .header(ROW_HEIGHT, |mut header| {
                for h in headers {
                    header.col(|ui| {
                        ui.strong(*h);
                    });
                }
            })
            .body(|mut body| {
                for item in items {
                    body.row(ROW_HEIGHT, |mut row| {
                        for text in cells(item) {
                            row.col(|ui| {
                                ui.label(text);
                            });
                        }
                    });
                }
            });
    });
}

pub fn company_size_table(ui: &mut Ui, groups: &[GroupStats<CompanySize>]) {
    if groups.is_empty() {
        ui.label(format::UNAVAILABLE);
        return;
    }
    simple_table(
        ui,
        "company_size_table",
        &["Company size", "Postings", "Mean", "Median", "Std dev"],
        groups,
        |g| {
            vec![
                g.key.to_string(),
                format::thousands(g.stats.count as i64),
                format::usd(g.stats.mean),
                format::usd(g.stats.median),
                format::usd_opt(g.stats.std_dev),
            ]
        },
    );
}

pub fn role_profile_table(ui: &mut Ui, profiles: &[RoleProfile]) {
    simple_table(
        ui,
        "junior_profiles",
        &["Role", "Postings", "Mean", "Median", "Min", "Max", "Modality", "Company size"],
        profiles,
        |p| {
            vec![
                p.role.clone(),
                p.stats.count.to_string(),
                format::usd(p.stats.mean),
                format::usd(p.stats.median),
                format::usd(p.stats.min),
                format::usd(p.stats.max),
                format::label_opt(p.modal_modality),
                format::label_opt(p.modal_company_size),
            ]
        },
    );
}

/// Side-by-side profile of the junior slice against the filtered market.
pub fn segment_comparison(ui: &mut Ui, junior: &SegmentProfile, market: &SegmentProfile) {
    let lines: [(&str, String, String); 5] = [
        (
            "Mean salary",
            format::usd_opt(junior.mean_salary),
            format::usd_opt(market.mean_salary),
        ),
        (
            "Remote",
            format::pct_opt(junior.pct_remote),
            format::pct_opt(market.pct_remote),
        ),
        (
            "Hybrid",
            format::pct_opt(junior.pct_hybrid),
            format::pct_opt(market.pct_hybrid),
        ),
        (
            "On-site",
            format::pct_opt(junior.pct_on_site),
            format::pct_opt(market.pct_on_site),
        ),
        (
            "Medium or large company",
            format::pct_opt(junior.pct_medium_or_large),
            format::pct_opt(market.pct_medium_or_large),
        ),
    ];
    simple_table(
        ui,
        "segment_comparison",
        &["Metric", "Juniors", "All filtered"],
        &lines,
        |(label, j, m)| vec![label.to_string(), j.clone(), m.clone()],
    );
}

/// Mean salary per (seniority, year), shaded from the lowest to the highest cell.
pub fn heatmap(ui: &mut Ui, pivot: &Pivot<Seniority, i32>) {
    if pivot.columns.is_empty() {
        ui.label(format::UNAVAILABLE);
        return;
    }
    let (lo, hi) = pivot
        .rows
        .iter()
        .flat_map(|r| r.cells.iter().flatten())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;

    ui.push_id("seniority_year_heatmap", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .column(Column::auto().at_least(90.0))
            .columns(Column::auto().at_least(80.0), pivot.columns.len())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("Seniority");
                });
                for year in &pivot.columns {
                    header.col(|ui| {
                        ui.strong(year.to_string());
                    });
                }
            })
            .body(|mut body| {
                for row in &pivot.rows {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        table_row.col(|ui| {
                            ui.label(row.key.label());
                        });
                        for cell in &row.cells {
                            table_row.col(|ui| match cell {
                                Some(v) => {
                                    let t = if range > 0.0 { (v - lo) / range } else { 0.5 };
                                    ui.label(
                                        RichText::new(format::usd(*v))
                                            .color(Color32::BLACK)
                                            .background_color(ramp(HEAT_LOW, HEAT_HIGH, t)),
                                    );
                                }
                                None => {
                                    ui.label(format::UNAVAILABLE);
                                }
                            });
                        }
                    });
                }
            });
    });
}
