use serde::Serialize;

use super::aggregate::{
    by_seniority, cross_border_summary, crosstab_percent, salary_by_year, seniority_year_heatmap,
    share_by, summary_by, top_paid_countries, top_paid_roles, value_counts, CrossBorderSummary,
    CrossTab, GroupStats, Pivot, SeniorityGroup, Share,
};
use super::filter::FilterSelection;
use super::junior::{
    junior_slice, recommendations, role_profiles, top_role_spreads, Recommendations, RoleProfile,
    RoleSpread,
};
use super::metrics::{Coverage, DatasetSummary, HeadlineMetrics, SegmentProfile};
use super::model::{CompanySize, Dataset, Modality, Seniority, View};
use crate::config::AnalysisConfig;

/// Salary analysis tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryTab {
    pub top_roles: Vec<GroupStats<String>>,
    pub by_seniority: Vec<SeniorityGroup>,
    pub by_modality: Vec<GroupStats<Modality>>,
    /// (seniority rank, salary, modality) for the scatter chart.
    pub seniority_points: Vec<(u8, f64, Modality)>,
}

/// Location and company tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationTab {
    pub top_countries: Vec<GroupStats<String>>,
    pub size_shares: Vec<Share<CompanySize>>,
    pub by_company_size: Vec<GroupStats<CompanySize>>,
    pub cross_border: CrossBorderSummary,
}

/// Trends over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendsTab {
    pub salary_by_year: Vec<GroupStats<i32>>,
    pub modality_by_year: CrossTab<i32, Modality>,
    pub size_by_year: CrossTab<i32, CompanySize>,
    pub seniority_year_mean: Pivot<Seniority, i32>,
}

/// Entry-level guide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JuniorTab {
    pub postings: usize,
    pub top_roles: Vec<(String, usize)>,
    pub role_spreads: Vec<RoleSpread>,
    pub role_profiles: Vec<RoleProfile>,
    pub recommendations: Option<Recommendations>,
    pub junior_profile: SegmentProfile,
    pub market_profile: SegmentProfile,
}

/// Everything the presentation layer draws for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub selection: FilterSelection,
    pub headline: HeadlineMetrics,
    pub coverage: Coverage,
    pub summary: DatasetSummary,
    pub salary: SalaryTab,
    pub location: LocationTab,
    pub trends: TrendsTab,
    pub junior: JuniorTab,
}

impl RenderModel {
    /// One full recomputation pass: filter the base table, then derive every
    /// aggregate from the filtered view. Pure in `(base, selection, config)`.
    pub fn build(base: &Dataset, selection: &FilterSelection, config: &AnalysisConfig) -> Self {
        let view = base.filtered(selection);
        log::debug!("Recomputing dashboard over {} of {} rows", view.len(), base.len());

        RenderModel {
            selection: selection.clone(),
            headline: HeadlineMetrics::compute(base, &view),
            coverage: Coverage::compute(base, &view),
            summary: DatasetSummary::compute(base),
            salary: salary_tab(&view, config),
            location: location_tab(&view, config),
            trends: trends_tab(&view),
            junior: junior_tab(&view, config),
        }
    }

    /// Whether the current filters leave any rows.
    pub fn has_data(&self) -> bool {
        self.headline.row_count > 0
    }
}

fn salary_tab(view: &View<'_>, config: &AnalysisConfig) -> SalaryTab {
    SalaryTab {
        top_roles: top_paid_roles(view, config.top_roles),
        by_seniority: by_seniority(view),
        by_modality: summary_by(view, |r| r.modality),
        seniority_points: view
            .iter()
            .filter_map(|r| Some((r.seniority?.rank(), r.salary_usd, r.modality?)))
            .collect(),
    }
}

fn location_tab(view: &View<'_>, config: &AnalysisConfig) -> LocationTab {
    LocationTab {
        top_countries: top_paid_countries(view, config.top_countries, config.min_country_support),
        size_shares: share_by(view, |r| r.company_size),
        by_company_size: summary_by(view, |r| r.company_size),
        cross_border: cross_border_summary(view),
    }
}

fn trends_tab(view: &View<'_>) -> TrendsTab {
    TrendsTab {
        salary_by_year: salary_by_year(view),
        modality_by_year: crosstab_percent(view, |r| Some(r.year), |r| r.modality),
        size_by_year: crosstab_percent(view, |r| Some(r.year), |r| r.company_size),
        seniority_year_mean: seniority_year_heatmap(view),
    }
}

fn junior_tab(view: &View<'_>, config: &AnalysisConfig) -> JuniorTab {
    let juniors = junior_slice(view);
    let profiles = role_profiles(&juniors, config.junior_profile_roles);

    JuniorTab {
        postings: juniors.len(),
        top_roles: value_counts(&juniors, |r| r.role.clone(), config.top_junior_roles),
        role_spreads: top_role_spreads(&juniors, config.junior_spread_roles),
        recommendations: recommendations(&juniors, &profiles),
        role_profiles: profiles,
        junior_profile: SegmentProfile::compute(&juniors),
        market_profile: SegmentProfile::compute(view),
    }
}
