use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::filter::{FilterOptions, FilterSelection};

// ---------------------------------------------------------------------------
// Ordered categorical domains
// ---------------------------------------------------------------------------

/// Career level. Declaration order is the career progression and drives
/// `Ord`, so sorting a seniority column never falls back to alphabetical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
    Executive,
}

impl Seniority {
    pub const ALL: [Seniority; 4] = [
        Seniority::Junior,
        Seniority::Mid,
        Seniority::Senior,
        Seniority::Executive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Seniority::Junior => "Junior",
            Seniority::Mid => "Mid",
            Seniority::Senior => "Senior",
            Seniority::Executive => "Executive",
        }
    }

    /// 1-based position on the career ladder (used as a numeric axis).
    pub fn rank(self) -> u8 {
        match self {
            Seniority::Junior => 1,
            Seniority::Mid => 2,
            Seniority::Senior => 3,
            Seniority::Executive => 4,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "júnior" | "junior" => Some(Seniority::Junior),
            "pleno" | "mid" => Some(Seniority::Mid),
            "sênior" | "senior" => Some(Seniority::Senior),
            "executivo" | "executive" => Some(Seniority::Executive),
            _ => None,
        }
    }
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Modality {
    OnSite,
    Hybrid,
    Remote,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::OnSite, Modality::Hybrid, Modality::Remote];

    pub fn label(self) -> &'static str {
        match self {
            Modality::OnSite => "On-site",
            Modality::Hybrid => "Hybrid",
            Modality::Remote => "Remote",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "presencial" | "onsite" | "on-site" => Some(Modality::OnSite),
            "híbrido" | "hibrido" | "hybrid" => Some(Modality::Hybrid),
            "remoto" | "remote" => Some(Modality::Remote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CompanySize {
    Small,
    Medium,
    Large,
}

impl CompanySize {
    pub const ALL: [CompanySize; 3] = [CompanySize::Small, CompanySize::Medium, CompanySize::Large];

    pub fn label(self) -> &'static str {
        match self {
            CompanySize::Small => "Small",
            CompanySize::Medium => "Medium",
            CompanySize::Large => "Large",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pequeno" | "small" => Some(CompanySize::Small),
            "médio" | "medio" | "medium" => Some(CompanySize::Medium),
            "grande" | "large" => Some(CompanySize::Large),
            _ => None,
        }
    }
}

macro_rules! impl_display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

impl_display_via_label!(Seniority, Modality, CompanySize);

/// A value's text as written in the published dataset. Frequency ties in
/// [`mode`](super::aggregate::mode) go to the smallest source label.
pub trait SourceLabel {
    fn source_label(&self) -> &str;
}

impl SourceLabel for Seniority {
    fn source_label(&self) -> &str {
        match self {
            Seniority::Junior => "Júnior",
            Seniority::Mid => "Pleno",
            Seniority::Senior => "Sênior",
            Seniority::Executive => "Executivo",
        }
    }
}

impl SourceLabel for Modality {
    fn source_label(&self) -> &str {
        match self {
            Modality::OnSite => "Presencial",
            Modality::Hybrid => "Híbrido",
            Modality::Remote => "Remoto",
        }
    }
}

impl SourceLabel for CompanySize {
    fn source_label(&self) -> &str {
        match self {
            CompanySize::Small => "Pequeno",
            CompanySize::Medium => "Médio",
            CompanySize::Large => "Grande",
        }
    }
}

impl SourceLabel for String {
    fn source_label(&self) -> &str {
        self
    }
}

// ---------------------------------------------------------------------------
// Row – one job posting
// ---------------------------------------------------------------------------

/// A single job-posting record. Blank CSV cells become `None` and are
/// excluded from every grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub year: i32,
    pub seniority: Option<Seniority>,
    pub role: Option<String>,
    pub modality: Option<Modality>,
    pub company_size: Option<CompanySize>,
    pub contract_type: Option<String>,
    pub company_country: Option<String>,
    pub residence_country: Option<String>,
    pub salary_usd: f64,
    pub salary_currency: Option<String>,
}

impl Row {
    /// Whether the worker lives outside the employer's country.
    ///
    /// `None` when either side is unknown; such rows count as neither
    /// international nor local.
    pub fn cross_border(&self) -> Option<bool> {
        let residence = self.residence_country.as_deref()?;
        let company = self.company_country.as_deref()?;
        Some(residence != company)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the immutable base table
// ---------------------------------------------------------------------------

/// The full loaded table. Rows are shared behind an `Arc` and never mutated;
/// every filter produces a [`View`] borrowing from it.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Arc<[Row]>,
    /// Distinct values per filterable field, sorted in natural order.
    pub options: FilterOptions,
}

impl Dataset {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let options = FilterOptions::from_rows(&rows);
        Dataset {
            rows: rows.into(),
            options,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A view over every row, in file order.
    pub fn view(&self) -> View<'_> {
        View {
            rows: self.rows.iter().collect(),
        }
    }

    /// Shorthand for applying `selection` to the whole table.
    pub fn filtered(&self, selection: &FilterSelection) -> View<'_> {
        super::filter::apply(&self.view(), selection)
    }
}

// ---------------------------------------------------------------------------
// View – a filtered subset
// ---------------------------------------------------------------------------

/// An ordered subset of a [`Dataset`]'s rows. Always a subset of its base,
/// preserving base order.
#[derive(Debug, Clone, Default)]
pub struct View<'a> {
    rows: Vec<&'a Row>,
}

impl<'a> View<'a> {
    pub fn from_refs(rows: Vec<&'a Row>) -> Self {
        View { rows }
    }

    pub fn rows(&self) -> &[&'a Row] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Row> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Further slice of this view (e.g. junior-only rows).
    pub fn slice(&self, pred: impl Fn(&Row) -> bool) -> View<'a> {
        View {
            rows: self.rows.iter().copied().filter(|r| pred(*r)).collect(),
        }
    }

    pub fn salaries(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.salary_usd).collect()
    }

    /// Number of distinct non-missing values a field takes in this view.
    pub fn distinct<K: Ord>(&self, key: impl Fn(&'a Row) -> Option<K>) -> usize {
        self.rows
            .iter()
            .copied()
            .filter_map(|r| key(r))
            .collect::<BTreeSet<K>>()
            .len()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Compact row constructor for tests.
    pub fn row(year: i32, seniority: Seniority, modality: Modality, salary: f64) -> Row {
        Row {
            year,
            seniority: Some(seniority),
            role: Some("Data Analyst".to_string()),
            modality: Some(modality),
            company_size: Some(CompanySize::Medium),
            contract_type: Some("Full-time".to_string()),
            company_country: Some("US".to_string()),
            residence_country: Some("US".to_string()),
            salary_usd: salary,
            salary_currency: Some("USD".to_string()),
        }
    }

    /// The three-row table used throughout the analysis tests.
    pub fn three_rows() -> Dataset {
        Dataset::from_rows(vec![
            row(2021, Seniority::Junior, Modality::Remote, 50_000.0),
            row(2021, Seniority::Senior, Modality::OnSite, 120_000.0),
            row(2022, Seniority::Junior, Modality::Remote, 60_000.0),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::row;
    use super::*;

    #[test]
    fn seniority_orders_by_career_not_alphabet() {
        let mut levels = vec![
            Seniority::Senior,
            Seniority::Executive,
            Seniority::Junior,
            Seniority::Mid,
        ];
        levels.sort();
        assert_eq!(levels, Seniority::ALL.to_vec());
    }

    #[test]
    fn parses_portuguese_and_english_labels() {
        assert_eq!(Seniority::parse("Júnior"), Some(Seniority::Junior));
        assert_eq!(Seniority::parse("Pleno"), Some(Seniority::Mid));
        assert_eq!(Seniority::parse(" sênior "), Some(Seniority::Senior));
        assert_eq!(Modality::parse("Híbrido"), Some(Modality::Hybrid));
        assert_eq!(Modality::parse("Remote"), Some(Modality::Remote));
        assert_eq!(CompanySize::parse("Médio"), Some(CompanySize::Medium));
        assert_eq!(CompanySize::parse("huge"), None);
    }

    #[test]
    fn cross_border_is_unknown_when_a_country_is_missing() {
        let mut r = row(2021, Seniority::Junior, Modality::Remote, 1.0);
        r.residence_country = None;
        assert_eq!(r.cross_border(), None);

        r.residence_country = Some("BR".to_string());
        assert_eq!(r.cross_border(), Some(true));

        r.residence_country = Some("US".to_string());
        assert_eq!(r.cross_border(), Some(false));
    }

    #[test]
    fn slice_preserves_base_order() {
        let ds = fixtures::three_rows();
        let juniors = ds.view().slice(|r| r.seniority == Some(Seniority::Junior));
        let years: Vec<i32> = juniors.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2021, 2022]);
    }
}
