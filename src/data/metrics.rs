use serde::Serialize;

use super::model::{CompanySize, Dataset, Modality, Row, Seniority, View};
use super::stats::{mean, percent};

/// Percentage of rows in `view` satisfying `pred`; `None` for an empty view.
pub fn share_where(view: &View<'_>, pred: impl Fn(&Row) -> bool) -> Option<f64> {
    let hits = view.iter().filter(|r| pred(*r)).count();
    percent(hits, view.len())
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// The four headline figures shown above every tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineMetrics {
    pub mean_salary: Option<f64>,
    /// Filtered mean minus base mean.
    pub mean_salary_delta: Option<f64>,
    pub row_count: usize,
    /// Filtered count minus base count (zero or negative).
    pub row_count_delta: i64,
    pub pct_remote: Option<f64>,
    pub pct_junior: Option<f64>,
}

impl HeadlineMetrics {
    pub fn compute(base: &Dataset, view: &View<'_>) -> Self {
        let mean_salary = mean(&view.salaries());
        let base_mean = mean(&base.view().salaries());
        let mean_salary_delta = match (mean_salary, base_mean) {
            (Some(m), Some(b)) => Some(m - b),
            _ => None,
        };

        HeadlineMetrics {
            mean_salary,
            mean_salary_delta,
            row_count: view.len(),
            row_count_delta: view.len() as i64 - base.len() as i64,
            pct_remote: share_where(view, |r| r.modality == Some(Modality::Remote)),
            pct_junior: share_where(view, |r| r.seniority == Some(Seniority::Junior)),
        }
    }
}

// ---------------------------------------------------------------------------
// Segment comparison
// ---------------------------------------------------------------------------

/// Work-pattern profile of a segment, used to set juniors against the
/// whole filtered market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentProfile {
    pub mean_salary: Option<f64>,
    pub pct_remote: Option<f64>,
    pub pct_hybrid: Option<f64>,
    pub pct_on_site: Option<f64>,
    pub pct_medium_or_large: Option<f64>,
}

impl SegmentProfile {
    pub fn compute(view: &View<'_>) -> Self {
        SegmentProfile {
            mean_salary: mean(&view.salaries()),
            pct_remote: share_where(view, |r| r.modality == Some(Modality::Remote)),
            pct_hybrid: share_where(view, |r| r.modality == Some(Modality::Hybrid)),
            pct_on_site: share_where(view, |r| r.modality == Some(Modality::OnSite)),
            pct_medium_or_large: share_where(view, |r| {
                matches!(r.company_size, Some(CompanySize::Medium | CompanySize::Large))
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset summary and filter coverage
// ---------------------------------------------------------------------------

/// Facts about the base table, independent of filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub total_rows: usize,
    pub unique_roles: usize,
    pub unique_company_countries: usize,
    pub unique_currencies: usize,
}

impl DatasetSummary {
    pub fn compute(base: &Dataset) -> Self {
        let all = base.view();
        DatasetSummary {
            first_year: base.options.years.first().copied(),
            last_year: base.options.years.last().copied(),
            total_rows: base.len(),
            unique_roles: base.options.roles.len(),
            unique_company_countries: all.distinct(|r| r.company_country.as_deref()),
            unique_currencies: all.distinct(|r| r.salary_currency.as_deref()),
        }
    }
}

/// How much of the base table the current filters keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub rows: (usize, usize),
    pub roles: (usize, usize),
    pub years: (usize, usize),
}

impl Coverage {
    pub fn compute(base: &Dataset, view: &View<'_>) -> Self {
        Coverage {
            rows: (view.len(), base.len()),
            roles: (view.distinct(|r| r.role.as_deref()), base.options.roles.len()),
            years: (view.distinct(|r| Some(r.year)), base.options.years.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterSelection;
    use crate::data::model::fixtures::three_rows;

    #[test]
    fn headline_for_year_filter() {
        let ds = three_rows();
        let mut sel = FilterSelection::default();
        sel.years.insert(2021);
        let view = ds.filtered(&sel);

        let m = HeadlineMetrics::compute(&ds, &view);
        assert_eq!(m.row_count, 2);
        assert_eq!(m.row_count_delta, -1);
        assert_eq!(m.mean_salary, Some(85_000.0));
        let base_mean = 230_000.0 / 3.0;
        assert!((m.mean_salary_delta.unwrap() - (85_000.0 - base_mean)).abs() < 1e-6);
        assert_eq!(m.pct_remote, Some(50.0));
        assert_eq!(m.pct_junior, Some(50.0));
    }

    #[test]
    fn headline_on_empty_view_is_undefined_not_zero() {
        let ds = three_rows();
        let m = HeadlineMetrics::compute(&ds, &View::default());
        assert_eq!(m.row_count, 0);
        assert_eq!(m.row_count_delta, -3);
        assert_eq!(m.mean_salary, None);
        assert_eq!(m.mean_salary_delta, None);
        assert_eq!(m.pct_remote, None);
        assert_eq!(m.pct_junior, None);
    }

    #[test]
    fn segment_profile_shares() {
        let ds = three_rows();
        let p = SegmentProfile::compute(&ds.view());
        assert!((p.pct_remote.unwrap() - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(p.pct_hybrid, Some(0.0));
        assert_eq!(p.pct_medium_or_large, Some(100.0));
    }

    #[test]
    fn summary_and_coverage() {
        let ds = three_rows();
        let s = DatasetSummary::compute(&ds);
        assert_eq!((s.first_year, s.last_year), (Some(2021), Some(2022)));
        assert_eq!(s.unique_roles, 1);
        assert_eq!(s.unique_currencies, 1);

        let mut sel = FilterSelection::default();
        sel.years.insert(2022);
        let c = Coverage::compute(&ds, &ds.filtered(&sel));
        assert_eq!(c.rows, (1, 3));
        assert_eq!(c.years, (1, 2));
    }
}
