//! Entry-level analyses over the junior slice of a view.

use serde::Serialize;

use super::aggregate::{group_by, mode, share_by, value_counts};
use super::model::{CompanySize, Modality, Seniority, View};
use super::stats::{BoxSummary, SalaryStats};

/// Junior-only rows of a view.
pub fn junior_slice<'a>(view: &View<'a>) -> View<'a> {
    view.slice(|r| r.seniority == Some(Seniority::Junior))
}

/// Per-role salary profile of junior postings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleProfile {
    pub role: String,
    pub stats: SalaryStats,
    /// Most common modality; `None` renders as "N/A".
    pub modal_modality: Option<Modality>,
    pub modal_company_size: Option<CompanySize>,
}

/// Role profiles sorted by posting count descending, top `n`.
pub fn role_profiles(juniors: &View<'_>, n: usize) -> Vec<RoleProfile> {
    let mut profiles: Vec<RoleProfile> = group_by(juniors, |r| r.role.clone())
        .into_iter()
        .filter_map(|(role, rows)| {
            Some(RoleProfile {
                stats: SalaryStats::from_values(&rows.salaries())?,
                modal_modality: mode(&rows, |r| r.modality),
                modal_company_size: mode(&rows, |r| r.company_size),
                role,
            })
        })
        .collect();
    profiles.sort_by(|a, b| b.stats.count.cmp(&a.stats.count));
    profiles.truncate(n);
    profiles
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleSpread {
    pub role: String,
    pub spread: BoxSummary,
}

/// Salary box summaries for the `n` most common junior roles, most common
/// first.
pub fn top_role_spreads(juniors: &View<'_>, n: usize) -> Vec<RoleSpread> {
    value_counts(juniors, |r| r.role.clone(), n)
        .into_iter()
        .filter_map(|(role, _)| {
            let rows = juniors.slice(|r| r.role.as_deref() == Some(role.as_str()));
            let spread = BoxSummary::from_values(&rows.salaries())?;
            Some(RoleSpread { role, spread })
        })
        .collect()
}

/// Data-driven pointers for someone entering the field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    /// Highest mean salary among the profiled roles.
    pub best_paid: RoleProfile,
    /// Most postings among the profiled roles.
    pub most_demand: RoleProfile,
    /// Most common junior modality and its share of juniors with a known
    /// modality.
    pub predominant_modality: Option<(Modality, f64)>,
}

/// `None` when there are no junior profiles to draw from.
pub fn recommendations(juniors: &View<'_>, profiles: &[RoleProfile]) -> Option<Recommendations> {
    let best_paid = profiles
        .iter()
        .reduce(|best, p| if p.stats.mean > best.stats.mean { p } else { best })?
        .clone();
    let most_demand = profiles
        .iter()
        .reduce(|best, p| if p.stats.count > best.stats.count { p } else { best })?
        .clone();

    // Share among juniors with a known modality.
    let top = value_counts(juniors, |r| r.modality, 1).into_iter().next();
    let predominant_modality = top.and_then(|(m, _)| {
        share_by(juniors, |r| r.modality)
            .into_iter()
            .find(|s| s.key == m)
            .map(|s| (m, s.percent))
    });

    Some(Recommendations {
        best_paid,
        most_demand,
        predominant_modality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::row;
    use crate::data::model::{Dataset, Row};

    fn junior(role: &str, modality: Modality, size: CompanySize, salary: f64) -> Row {
        let mut r = row(2023, Seniority::Junior, modality, salary);
        r.role = Some(role.to_string());
        r.company_size = Some(size);
        r
    }

    fn sample() -> Dataset {
        Dataset::from_rows(vec![
            junior("Analyst", Modality::Remote, CompanySize::Small, 40_000.0),
            junior("Analyst", Modality::Remote, CompanySize::Large, 50_000.0),
            junior("Analyst", Modality::Hybrid, CompanySize::Large, 60_000.0),
            junior("Engineer", Modality::OnSite, CompanySize::Medium, 90_000.0),
            row(2023, Seniority::Senior, Modality::OnSite, 200_000.0),
        ])
    }

    #[test]
    fn profiles_sorted_by_count_with_modes() {
        let ds = sample();
        let juniors = junior_slice(&ds.view());
        assert_eq!(juniors.len(), 4);

        let profiles = role_profiles(&juniors, 10);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].role, "Analyst");
        assert_eq!(profiles[0].stats.count, 3);
        assert_eq!(profiles[0].modal_modality, Some(Modality::Remote));
        assert_eq!(profiles[0].modal_company_size, Some(CompanySize::Large));
        assert_eq!(profiles[1].role, "Engineer");
    }

    #[test]
    fn recommendations_pick_best_paid_and_most_demand() {
        let ds = sample();
        let juniors = junior_slice(&ds.view());
        let profiles = role_profiles(&juniors, 10);
        let rec = recommendations(&juniors, &profiles).unwrap();
        assert_eq!(rec.best_paid.role, "Engineer");
        assert_eq!(rec.most_demand.role, "Analyst");
        assert_eq!(rec.predominant_modality, Some((Modality::Remote, 50.0)));
    }

    #[test]
    fn modality_share_ignores_unknown_modality() {
        let mut blank = junior("Analyst", Modality::Remote, CompanySize::Small, 45_000.0);
        blank.modality = None;
        let ds = Dataset::from_rows(vec![
            junior("Analyst", Modality::Remote, CompanySize::Small, 40_000.0),
            blank,
        ]);
        let juniors = junior_slice(&ds.view());
        let profiles = role_profiles(&juniors, 10);
        let rec = recommendations(&juniors, &profiles).unwrap();
        assert_eq!(rec.predominant_modality, Some((Modality::Remote, 100.0)));
    }

    #[test]
    fn spreads_follow_frequency() {
        let ds = sample();
        let juniors = junior_slice(&ds.view());
        let spreads = top_role_spreads(&juniors, 5);
        assert_eq!(spreads[0].role, "Analyst");
        assert_eq!(spreads[0].spread.median, 50_000.0);
    }

    #[test]
    fn no_juniors_means_no_recommendations() {
        let empty = View::default();
        let profiles = role_profiles(&empty, 10);
        assert!(profiles.is_empty());
        assert!(recommendations(&empty, &profiles).is_none());
        assert!(top_role_spreads(&empty, 5).is_empty());
    }
}
