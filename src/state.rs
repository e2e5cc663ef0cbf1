use std::collections::BTreeSet;
use std::sync::Arc;

use career_dash::config::AnalysisConfig;
use career_dash::data::dashboard::RenderModel;
use career_dash::data::filter::{FilterField, FilterSelection};
use career_dash::data::model::Dataset;

use crate::color::SeriesColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Salary,
    Location,
    Trends,
    Junior,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Salary, Tab::Location, Tab::Trends, Tab::Junior];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Salary => "Salary analysis",
            Tab::Location => "Location & companies",
            Tab::Trends => "Trends over time",
            Tab::Junior => "For beginners",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Base table, shared read-only with the loader cache.
    pub dataset: Arc<Dataset>,

    /// Per-field filter selections.
    pub selection: FilterSelection,

    /// Everything derived from `selection`, rebuilt on every change.
    pub model: RenderModel,

    pub analysis: AnalysisConfig,

    pub colors: SeriesColors,

    pub tab: Tab,
}

impl AppState {
    /// Start with the presentation defaults selected.
    pub fn new(dataset: Arc<Dataset>, analysis: AnalysisConfig) -> Self {
        let selection = dataset.options.default_selection();
        let model = RenderModel::build(&dataset, &selection, &analysis);
        Self {
            dataset,
            selection,
            model,
            analysis,
            colors: SeriesColors::for_domains(),
            tab: Tab::Salary,
        }
    }

    /// Recompute the render model after a filter change.
    pub fn refilter(&mut self) {
        self.model = RenderModel::build(&self.dataset, &self.selection, &self.analysis);
    }

    /// Select every value of a field.
    pub fn select_all(&mut self, field: FilterField) {
        self.dataset.options.select_field(&mut self.selection, field);
        self.refilter();
    }

    /// Clear a field's selection, which lifts its constraint.
    pub fn clear(&mut self, field: FilterField) {
        self.selection.clear(field);
        self.refilter();
    }

    /// Back to the startup selection.
    pub fn reset(&mut self) {
        self.selection = self.dataset.options.default_selection();
        self.refilter();
    }
}

/// Toggle a single value in a field's selected set.
pub fn toggle<T: Ord + Clone>(selected: &mut BTreeSet<T>, value: &T) {
    if !selected.remove(value) {
        selected.insert(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use career_dash::data::model::{CompanySize, Modality, Row, Seniority};

    fn dataset() -> Arc<Dataset> {
        let row = |year, seniority, salary| Row {
            year,
            seniority: Some(seniority),
            role: Some("Data Scientist".to_string()),
            modality: Some(Modality::Remote),
            company_size: Some(CompanySize::Large),
            contract_type: Some("Full-time".to_string()),
            company_country: Some("US".to_string()),
            residence_country: Some("US".to_string()),
            salary_usd: salary,
            salary_currency: Some("USD".to_string()),
        };
        Arc::new(Dataset::from_rows(vec![
            row(2021, Seniority::Junior, 50_000.0),
            row(2022, Seniority::Senior, 150_000.0),
        ]))
    }

    #[test]
    fn toggling_a_year_rebuilds_the_model() {
        let mut state = AppState::new(dataset(), AnalysisConfig::default());
        assert_eq!(state.model.headline.row_count, 2);

        toggle(&mut state.selection.years, &2022);
        state.refilter();
        assert_eq!(state.model.headline.row_count, 1);

        state.clear(FilterField::Year);
        assert_eq!(state.model.headline.row_count, 2);

        state.select_all(FilterField::Year);
        assert_eq!(state.selection.years.len(), 2);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = AppState::new(dataset(), AnalysisConfig::default());
        state.selection.seniority.clear();
        state.selection.seniority.insert(Seniority::Senior);
        state.refilter();
        assert_eq!(state.model.headline.row_count, 1);

        state.reset();
        assert_eq!(state.model.headline.row_count, 2);
    }
}
