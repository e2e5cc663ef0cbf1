use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points,
};

use career_dash::data::aggregate::{CrossTab, GroupStats};
use career_dash::data::dashboard::{JuniorTab, LocationTab, SalaryTab, TrendsTab};
use career_dash::data::model::{Modality, Seniority};
use career_dash::data::stats::BoxSummary;

use crate::color::SeriesColors;
use crate::state::{AppState, Tab};
use crate::ui::{format, tables};

const CHART_HEIGHT: f32 = 320.0;
const BAR_FILL: Color32 = Color32::from_rgb(70, 130, 180);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render whichever tab is active.
pub fn active_tab(ui: &mut Ui, state: &AppState) {
    let model = &state.model;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::Salary => salary_tab(ui, &model.salary, &state.colors),
            Tab::Location => location_tab(ui, &model.location),
            Tab::Trends => trends_tab(ui, &model.trends, &state.colors),
            Tab::Junior => junior_tab(ui, &model.junior, &state.colors),
        });
}

fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("No data for the current filters.").italics());
}

// ---------------------------------------------------------------------------
// Shared chart builders
// ---------------------------------------------------------------------------

/// Horizontal bars of mean salary, best first at the top.
fn mean_salary_bars<K: ToString>(ui: &mut Ui, id: &str, title: &str, groups: &[GroupStats<K>]) {
    ui.strong(title);
    if groups.is_empty() {
        no_data(ui);
        return;
    }
    let n = groups.len();
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new((n - i) as f64, g.stats.mean)
                .name(format!("{} (n={})", g.key.to_string(), g.stats.count))
                .fill(BAR_FILL)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label("Mean salary (USD)")
        .show_axes([true, false])
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

fn box_elem(argument: f64, name: &str, spread: &BoxSummary, color: Color32) -> BoxElem {
    BoxElem::new(
        argument,
        BoxSpread::new(spread.min, spread.q1, spread.median, spread.q3, spread.max),
    )
    .name(name)
    .fill(color.gamma_multiply(0.4))
    .stroke(egui::Stroke::new(1.5, color))
}

/// One line per crosstab column, percentages over the row keys (years).
fn crosstab_lines<C: ToString>(
    ui: &mut Ui,
    id: &str,
    title: &str,
    tab: &CrossTab<i32, C>,
    colors: &SeriesColors,
) {
    ui.strong(title);
    if tab.is_empty() {
        no_data(ui);
        return;
    }
    Plot::new(id)
        .height(CHART_HEIGHT * 0.8)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("%")
        .include_y(0.0)
        .include_y(100.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (col, column) in tab.columns.iter().enumerate() {
                let label = column.to_string();
                let points: PlotPoints = tab
                    .rows
                    .iter()
                    .map(|row| [row.key as f64, row.percents[col]])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&label)
                        .color(colors.color_for(&label))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Tab: salary analysis
// ---------------------------------------------------------------------------

fn salary_tab(ui: &mut Ui, tab: &SalaryTab, colors: &SeriesColors) {
    ui.columns(2, |cols| {
        mean_salary_bars(&mut cols[0], "top_roles", "Best-paid roles", &tab.top_roles);

        let ui = &mut cols[1];
        ui.strong("Salary distribution by seniority");
        if tab.by_seniority.is_empty() {
            no_data(ui);
        } else {
            let boxes: Vec<BoxElem> = tab
                .by_seniority
                .iter()
                .map(|g| {
                    let label = g.seniority.label();
                    box_elem(g.seniority.rank() as f64, label, &g.spread, colors.color_for(label))
                })
                .collect();
            Plot::new("seniority_box")
                .height(CHART_HEIGHT)
                .legend(Legend::default())
                .x_axis_label("Seniority (1 = Junior, 4 = Executive)")
                .y_axis_label("Salary (USD)")
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    plot_ui.box_plot(BoxPlot::new(boxes).name("Seniority"));
                });
        }
    });

    ui.separator();
    ui.heading("Salary vs work modality");
    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        ui.strong("Mean salary by modality");
        if tab.by_modality.is_empty() {
            no_data(ui);
        } else {
            Plot::new("modality_bars")
                .height(CHART_HEIGHT * 0.8)
                .legend(Legend::default())
                .y_axis_label("Mean salary (USD)")
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    for (i, g) in tab.by_modality.iter().enumerate() {
                        let label = g.key.label();
                        let bar = Bar::new(i as f64, g.stats.mean)
                            .name(format!("{label} (n={})", g.stats.count));
                        plot_ui.bar_chart(
                            BarChart::new(vec![bar])
                                .name(label)
                                .color(colors.color_for(label)),
                        );
                    }
                });
        }

        let ui = &mut cols[1];
        ui.strong("Seniority vs salary by modality");
        if tab.seniority_points.is_empty() {
            no_data(ui);
        } else {
            Plot::new("seniority_scatter")
                .height(CHART_HEIGHT * 0.8)
                .legend(Legend::default())
                .x_axis_label("Seniority (1 = Junior, 4 = Executive)")
                .y_axis_label("Salary (USD)")
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    for modality in Modality::ALL {
                        let points: PlotPoints = tab
                            .seniority_points
                            .iter()
                            .filter(|(_, _, m)| *m == modality)
                            .map(|&(rank, salary, _)| [rank as f64, salary])
                            .collect();
                        plot_ui.points(
                            Points::new(points)
                                .name(modality.label())
                                .color(colors.color_for(modality.label()))
                                .radius(2.5),
                        );
                    }
                });
        }
    });
}

// ---------------------------------------------------------------------------
// Tab: location and companies
// ---------------------------------------------------------------------------

fn location_tab(ui: &mut Ui, tab: &LocationTab) {
    ui.columns(2, |cols| {
        mean_salary_bars(
            &mut cols[0],
            "top_countries",
            "Best-paid employer countries (at least 5 postings)",
            &tab.top_countries,
        );

        let ui = &mut cols[1];
        ui.strong("Postings by company size");
        if tab.size_shares.is_empty() {
            no_data(ui);
        } else {
            let bars: Vec<Bar> = tab
                .size_shares
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    Bar::new(i as f64, s.percent)
                        .name(format!("{} ({:.1}%, n={})", s.key, s.percent, s.count))
                        .fill(BAR_FILL)
                })
                .collect();
            Plot::new("size_shares")
                .height(CHART_HEIGHT * 0.6)
                .y_axis_label("% of postings")
                .include_y(0.0)
                .allow_scroll(false)
                .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
        }

        ui.add_space(8.0);
        ui.strong("Salary by company size");
        tables::company_size_table(ui, &tab.by_company_size);
    });

    ui.separator();
    ui.heading("Residence vs employer location");
    let cb = &tab.cross_border;
    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        ui.label("International work (worker abroad)");
        ui.heading(format::pct_opt(cb.pct_international));
        if cb.unknown > 0 {
            ui.label(
                RichText::new(format!("{} postings with unknown residence excluded", cb.unknown))
                    .small(),
            );
        }

        let ui = &mut cols[1];
        let buckets = [("International", cb.international), ("Local", cb.local)];
        if buckets.iter().all(|(_, s)| s.is_none()) {
            no_data(ui);
            return;
        }
        let bars: Vec<Bar> = buckets
            .iter()
            .enumerate()
            .filter_map(|(i, (label, stats))| {
                let s = stats.as_ref()?;
                Some(Bar::new(i as f64, s.mean).name(format!("{label} (n={})", s.count)))
            })
            .collect();
        Plot::new("cross_border")
            .height(CHART_HEIGHT * 0.6)
            .y_axis_label("Mean salary (USD)")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(Color32::DARK_GREEN))
            });
    });
}

// ---------------------------------------------------------------------------
// Tab: trends
// ---------------------------------------------------------------------------

fn trends_tab(ui: &mut Ui, tab: &TrendsTab, colors: &SeriesColors) {
    ui.strong("Mean salary over time (band = ±1 standard deviation)");
    if tab.salary_by_year.is_empty() {
        no_data(ui);
    } else {
        let mean: PlotPoints = tab
            .salary_by_year
            .iter()
            .map(|g| [g.key as f64, g.stats.mean])
            .collect();
        // Years with a single posting have no spread and are left out of the band.
        let band = |sign: f64| -> PlotPoints {
            tab.salary_by_year
                .iter()
                .filter_map(|g| Some([g.key as f64, g.stats.mean + sign * g.stats.std_dev?]))
                .collect()
        };
        Plot::new("salary_by_year")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label("Year")
            .y_axis_label("Salary (USD)")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(mean).name("Mean").width(2.5));
                plot_ui.points(
                    Points::new(
                        tab.salary_by_year
                            .iter()
                            .map(|g| [g.key as f64, g.stats.median])
                            .collect::<PlotPoints>(),
                    )
                    .name("Median")
                    .radius(3.0),
                );
                let band_color = Color32::from_rgba_unmultiplied(0, 100, 80, 120);
                plot_ui.line(Line::new(band(1.0)).name("±1 std").color(band_color));
                plot_ui.line(Line::new(band(-1.0)).name("±1 std").color(band_color));
            });
    }

    ui.separator();
    ui.columns(2, |cols| {
        crosstab_lines(
            &mut cols[0],
            "modality_by_year",
            "Work modality share by year (%)",
            &tab.modality_by_year,
            colors,
        );
        crosstab_lines(
            &mut cols[1],
            "size_by_year",
            "Company size share by year (%)",
            &tab.size_by_year,
            colors,
        );
    });

    ui.separator();
    ui.strong("Mean salary by year and seniority (USD)");
    tables::heatmap(ui, &tab.seniority_year_mean);
}

// ---------------------------------------------------------------------------
// Tab: beginners
// ---------------------------------------------------------------------------

fn junior_tab(ui: &mut Ui, tab: &JuniorTab, colors: &SeriesColors) {
    if tab.postings == 0 {
        ui.label(
            RichText::new("No junior postings match the current filters. Try widening them.")
                .color(Color32::YELLOW),
        );
        return;
    }

    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        ui.strong("Most common entry-level roles");
        let n = tab.top_roles.len();
        let bars: Vec<Bar> = tab
            .top_roles
            .iter()
            .enumerate()
            .map(|(i, (role, count))| {
                Bar::new((n - i) as f64, *count as f64)
                    .name(format!("{role} ({count})"))
                    .fill(Color32::from_rgb(60, 160, 90))
            })
            .collect();
        Plot::new("junior_roles")
            .height(CHART_HEIGHT)
            .x_axis_label("Postings")
            .show_axes([true, false])
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });

        let ui = &mut cols[1];
        ui.strong("Salary distribution, top entry-level roles");
        let palette = crate::color::generate_palette(tab.role_spreads.len());
        let boxes: Vec<BoxElem> = tab
            .role_spreads
            .iter()
            .zip(palette)
            .enumerate()
            .map(|(i, (r, color))| box_elem(i as f64, &r.role, &r.spread, color))
            .collect();
        Plot::new("junior_role_box")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .y_axis_label("Salary (USD)")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.box_plot(BoxPlot::new(boxes).name("Role"));
            });
    });

    ui.separator();
    ui.strong("Entry-level role details");
    tables::role_profile_table(ui, &tab.role_profiles);

    if let Some(rec) = &tab.recommendations {
        ui.separator();
        ui.heading("Data-driven pointers");
        ui.columns(3, |cols| {
            let best = &rec.best_paid;
            cols[0].strong("Best-paid opportunity");
            cols[0].label(format!("Role: {}", best.role));
            cols[0].label(format!("Mean salary: {}", format::usd(best.stats.mean)));
            cols[0].label(format!("Postings: {}", best.stats.count));

            let demand = &rec.most_demand;
            cols[1].strong("Highest demand");
            cols[1].label(format!("Role: {}", demand.role));
            cols[1].label(format!("Postings: {}", demand.stats.count));
            cols[1].label(format!("Mean salary: {}", format::usd(demand.stats.mean)));
            cols[1].label(format!(
                "Mostly at {} companies",
                format::label_opt(demand.modal_company_size).to_lowercase()
            ));

            cols[2].strong("Predominant modality");
            match rec.predominant_modality {
                Some((modality, share)) => {
                    cols[2].colored_label(
                        colors.color_for(modality.label()),
                        format!("{modality}: {share:.1}%"),
                    );
                }
                None => {
                    cols[2].label(format::UNAVAILABLE);
                }
            }
        });
    }

    ui.separator();
    ui.strong("Juniors vs the whole filtered market");
    tables::segment_comparison(ui, &tab.junior_profile, &tab.market_profile);
    ui.label(
        RichText::new(format!(
            "Seniority levels shown elsewhere follow career order: {}",
            Seniority::ALL.map(|s| s.label()).join(" → ")
        ))
        .small(),
    );
}
