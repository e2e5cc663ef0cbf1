use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{CompanySize, Modality, Row, Seniority, View};

/// How many roles the presentation layer pre-selects on startup.
pub const DEFAULT_SELECTED_ROLES: usize = 10;

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per field
// ---------------------------------------------------------------------------

/// The six filterable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Year,
    Seniority,
    Role,
    Modality,
    CompanySize,
    ContractType,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::Year,
        FilterField::Seniority,
        FilterField::Role,
        FilterField::Modality,
        FilterField::CompanySize,
        FilterField::ContractType,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Year => "Year",
            FilterField::Seniority => "Seniority",
            FilterField::Role => "Role",
            FilterField::Modality => "Work modality",
            FilterField::CompanySize => "Company size",
            FilterField::ContractType => "Contract type",
        }
    }
}

/// Per-field selection state.
///
/// An empty set means "no constraint on this field", never "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub seniority: BTreeSet<Seniority>,
    pub roles: BTreeSet<String>,
    pub modality: BTreeSet<Modality>,
    pub company_size: BTreeSet<CompanySize>,
    pub contract_type: BTreeSet<String>,
}

/// Membership test for one field: empty set passes everything, a missing
/// value fails any non-empty set.
fn admits<T: Ord>(selected: &BTreeSet<T>, value: Option<&T>) -> bool {
    selected.is_empty() || value.is_some_and(|v| selected.contains(v))
}

impl FilterSelection {
    /// Whether a row passes every active field constraint.
    pub fn matches(&self, row: &Row) -> bool {
        admits(&self.years, Some(&row.year))
            && admits(&self.seniority, row.seniority.as_ref())
            && admits(&self.roles, row.role.as_ref())
            && admits(&self.modality, row.modality.as_ref())
            && admits(&self.company_size, row.company_size.as_ref())
            && admits(&self.contract_type, row.contract_type.as_ref())
    }

    /// Number of selected values for a field.
    pub fn selected_count(&self, field: FilterField) -> usize {
        match field {
            FilterField::Year => self.years.len(),
            FilterField::Seniority => self.seniority.len(),
            FilterField::Role => self.roles.len(),
            FilterField::Modality => self.modality.len(),
            FilterField::CompanySize => self.company_size.len(),
            FilterField::ContractType => self.contract_type.len(),
        }
    }

    /// Drop every selected value for a field, lifting its constraint.
    pub fn clear(&mut self, field: FilterField) {
        match field {
            FilterField::Year => self.years.clear(),
            FilterField::Seniority => self.seniority.clear(),
            FilterField::Role => self.roles.clear(),
            FilterField::Modality => self.modality.clear(),
            FilterField::CompanySize => self.company_size.clear(),
            FilterField::ContractType => self.contract_type.clear(),
        }
    }
}

/// Return the rows of `view` that pass all active filters.
///
/// A row passes a field filter when:
/// * The field's selected set is empty → passes (no constraint)
/// * The row's value is in the selected set → passes
/// * The row's value is missing → fails
pub fn apply<'a>(view: &View<'a>, selection: &FilterSelection) -> View<'a> {
    View::from_refs(
        view.iter()
            .filter(|row| selection.matches(row))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Available values, for building widgets and default selections
// ---------------------------------------------------------------------------

/// Distinct non-missing values per filterable field, in natural order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub years: BTreeSet<i32>,
    pub seniority: BTreeSet<Seniority>,
    pub roles: BTreeSet<String>,
    pub modality: BTreeSet<Modality>,
    pub company_size: BTreeSet<CompanySize>,
    pub contract_type: BTreeSet<String>,
}

impl FilterOptions {
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut options = FilterOptions::default();
        for row in rows {
            options.years.insert(row.year);
            options.seniority.extend(row.seniority);
            options.roles.extend(row.role.clone());
            options.modality.extend(row.modality);
            options.company_size.extend(row.company_size);
            options.contract_type.extend(row.contract_type.clone());
        }
        options
    }

    /// Every available value selected.
    pub fn select_all(&self) -> FilterSelection {
        FilterSelection {
            years: self.years.clone(),
            seniority: self.seniority.clone(),
            roles: self.roles.clone(),
            modality: self.modality.clone(),
            company_size: self.company_size.clone(),
            contract_type: self.contract_type.clone(),
        }
    }

    /// Startup selection for the dashboard: everything, except that only the
    /// first [`DEFAULT_SELECTED_ROLES`] roles (sorted) are pre-selected.
    pub fn default_selection(&self) -> FilterSelection {
        let mut selection = self.select_all();
        selection.roles = self
            .roles
            .iter()
            .take(DEFAULT_SELECTED_ROLES)
            .cloned()
            .collect();
        selection
    }

    /// Copy the full value set of one field into `selection`.
    pub fn select_field(&self, selection: &mut FilterSelection, field: FilterField) {
        match field {
            FilterField::Year => selection.years = self.years.clone(),
            FilterField::Seniority => selection.seniority = self.seniority.clone(),
            FilterField::Role => selection.roles = self.roles.clone(),
            FilterField::Modality => selection.modality = self.modality.clone(),
            FilterField::CompanySize => selection.company_size = self.company_size.clone(),
            FilterField::ContractType => selection.contract_type = self.contract_type.clone(),
        }
    }

    pub fn available_count(&self, field: FilterField) -> usize {
        match field {
            FilterField::Year => self.years.len(),
            FilterField::Seniority => self.seniority.len(),
            FilterField::Role => self.roles.len(),
            FilterField::Modality => self.modality.len(),
            FilterField::CompanySize => self.company_size.len(),
            FilterField::ContractType => self.contract_type.len(),
        }
    }
}
