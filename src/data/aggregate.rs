use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

use serde::Serialize;

use super::model::{Row, Seniority, SourceLabel, View};
use super::stats::{percent, BoxSummary, SalaryStats};

// ---------------------------------------------------------------------------
// Grouping primitive
// ---------------------------------------------------------------------------

/// Split a view into groups by `key`, keeping groups in first-appearance
/// order. Rows whose key is missing belong to no group.
pub fn group_by<'a, K>(view: &View<'a>, key: impl Fn(&'a Row) -> Option<K>) -> Vec<(K, View<'a>)>
where
    K: Eq + Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a Row>)> = Vec::new();

    for row in view.iter() {
        let Some(k) = key(row) else {
            continue;
        };
        match index.get(&k) {
            Some(&slot) => groups[slot].1.push(row),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![row]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(k, rows)| (k, View::from_refs(rows)))
        .collect()
}

/// Salary statistics for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats<K> {
    pub key: K,
    pub stats: SalaryStats,
}

fn group_stats<'a, K>(view: &View<'a>, key: impl Fn(&'a Row) -> Option<K>) -> Vec<GroupStats<K>>
where
    K: Eq + Hash + Clone,
{
    group_by(view, key)
        .into_iter()
        .filter_map(|(key, rows)| {
            SalaryStats::from_values(&rows.salaries()).map(|stats| GroupStats { key, stats })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Ranked salary summaries
// ---------------------------------------------------------------------------

/// Top `n` groups by mean salary, descending.
///
/// Groups with fewer than `min_support` rows are dropped before ranking.
/// Equal means keep first-appearance order (the sort is stable).
pub fn top_by_mean<'a, K>(
    view: &View<'a>,
    key: impl Fn(&'a Row) -> Option<K>,
    n: usize,
    min_support: usize,
) -> Vec<GroupStats<K>>
where
    K: Eq + Hash + Clone,
{
    let mut groups: Vec<GroupStats<K>> = group_stats(view, key)
        .into_iter()
        .filter(|g| g.stats.count >= min_support)
        .collect();
    groups.sort_by(|a, b| b.stats.mean.total_cmp(&a.stats.mean));
    groups.truncate(n);
    groups
}

/// Every group, ranked by mean salary descending.
pub fn summary_by<'a, K>(view: &View<'a>, key: impl Fn(&'a Row) -> Option<K>) -> Vec<GroupStats<K>>
where
    K: Eq + Hash + Clone,
{
    top_by_mean(view, key, usize::MAX, 1)
}

/// Best-paid roles.
pub fn top_paid_roles(view: &View<'_>, n: usize) -> Vec<GroupStats<String>> {
    top_by_mean(view, |r| r.role.clone(), n, 1)
}

/// Best-paid employer countries, ignoring countries with fewer than
/// `min_support` postings.
pub fn top_paid_countries(view: &View<'_>, n: usize, min_support: usize) -> Vec<GroupStats<String>> {
    top_by_mean(view, |r| r.company_country.clone(), n, min_support)
}

// ---------------------------------------------------------------------------
// Seniority and time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeniorityGroup {
    pub seniority: Seniority,
    pub stats: SalaryStats,
    pub spread: BoxSummary,
}

/// Salary per seniority level, always in career order (Junior → Executive).
/// Levels absent from the view are skipped.
pub fn by_seniority(view: &View<'_>) -> Vec<SeniorityGroup> {
    Seniority::ALL
        .iter()
        .filter_map(|&level| {
            let salaries = view.slice(|r| r.seniority == Some(level)).salaries();
            Some(SeniorityGroup {
                seniority: level,
                stats: SalaryStats::from_values(&salaries)?,
                spread: BoxSummary::from_values(&salaries)?,
            })
        })
        .collect()
}

/// Mean/median/std/count per year, ascending by year.
pub fn salary_by_year(view: &View<'_>) -> Vec<GroupStats<i32>> {
    let mut years = group_stats(view, |r| Some(r.year));
    years.sort_by_key(|g| g.key);
    years
}

// ---------------------------------------------------------------------------
// Cross tabulation and pivots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTabRow<R> {
    pub key: R,
    /// Rows counted for this key.
    pub total: usize,
    /// One percentage per column; sums to 100.
    pub percents: Vec<f64>,
}

/// Row-normalised cross tabulation (percent of each row over columns).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab<R, C> {
    pub columns: Vec<C>,
    pub rows: Vec<CrossTabRow<R>>,
}

impl<R, C> CrossTab<R, C> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// For each `row_key` value, the percentage distribution over `col_key`
/// values. Rows and columns are sorted by natural order. Rows missing
/// either key are not counted, so no emitted row is all zeros.
pub fn crosstab_percent<'a, R, C>(
    view: &View<'a>,
    row_key: impl Fn(&'a Row) -> Option<R>,
    col_key: impl Fn(&'a Row) -> Option<C>,
) -> CrossTab<R, C>
where
    R: Ord + Clone,
    C: Ord + Clone,
{
    let mut counts: BTreeMap<R, BTreeMap<C, usize>> = BTreeMap::new();
    let mut columns: BTreeSet<C> = BTreeSet::new();

    for row in view.iter() {
        let (Some(r), Some(c)) = (row_key(row), col_key(row)) else {
            continue;
        };
        columns.insert(c.clone());
        *counts.entry(r).or_default().entry(c).or_default() += 1;
    }

    let rows = counts
        .into_iter()
        .map(|(key, cells)| {
            let total: usize = cells.values().sum();
            let percents = columns
                .iter()
                .map(|c| percent(cells.get(c).copied().unwrap_or(0), total).unwrap_or(0.0))
                .collect();
            CrossTabRow {
                key,
                total,
                percents,
            }
        })
        .collect();

    CrossTab {
        columns: columns.into_iter().collect(),
        rows,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow<R> {
    pub key: R,
    /// Mean salary per column; `None` where no rows fall in the cell.
    pub cells: Vec<Option<f64>>,
}

/// Mean salary pivot with a fixed row domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pivot<R, C> {
    pub columns: Vec<C>,
    pub rows: Vec<PivotRow<R>>,
}

/// Mean salary for every (`row_domain` value, observed column) pair.
///
/// Every value of `row_domain` gets a row, in the given order, even if it
/// has no data. Columns are the observed `col_key` values, ascending.
pub fn pivot_mean<'a, R, C>(
    view: &View<'a>,
    row_domain: &[R],
    row_key: impl Fn(&'a Row) -> Option<R>,
    col_key: impl Fn(&'a Row) -> Option<C>,
) -> Pivot<R, C>
where
    R: Ord + Clone,
    C: Ord + Clone,
{
    let mut sums: BTreeMap<(R, C), (f64, usize)> = BTreeMap::new();
    let mut columns: BTreeSet<C> = BTreeSet::new();

    for row in view.iter() {
        let (Some(r), Some(c)) = (row_key(row), col_key(row)) else {
            continue;
        };
        columns.insert(c.clone());
        let cell = sums.entry((r, c)).or_insert((0.0, 0));
        cell.0 += row.salary_usd;
        cell.1 += 1;
    }

    let columns: Vec<C> = columns.into_iter().collect();
    let rows = row_domain
        .iter()
        .map(|r| PivotRow {
            key: r.clone(),
            cells: columns
                .iter()
                .map(|c| {
                    sums.get(&(r.clone(), c.clone()))
                        .map(|&(sum, n)| sum / n as f64)
                })
                .collect(),
        })
        .collect();

    Pivot { columns, rows }
}

/// Mean salary by seniority (rows, career order) and year (columns).
pub fn seniority_year_heatmap(view: &View<'_>) -> Pivot<Seniority, i32> {
    pivot_mean(view, &Seniority::ALL, |r| r.seniority, |r| Some(r.year))
}

// ---------------------------------------------------------------------------
// Counts, shares and modes
// ---------------------------------------------------------------------------

/// The `n` most frequent values, by count descending; equal counts keep
/// first-appearance order.
pub fn value_counts<'a, K>(view: &View<'a>, key: impl Fn(&'a Row) -> Option<K>, n: usize) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
{
    let mut counts: Vec<(K, usize)> = group_by(view, key)
        .into_iter()
        .map(|(k, rows)| (k, rows.len()))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share<K> {
    pub key: K,
    pub count: usize,
    pub percent: f64,
}

/// Count and share of each value in natural order. The denominator is the
/// number of rows where the value is known.
pub fn share_by<'a, K: Ord>(view: &View<'a>, key: impl Fn(&'a Row) -> Option<K>) -> Vec<Share<K>> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for k in view.iter().filter_map(&key) {
        *counts.entry(k).or_default() += 1;
    }
    let total: usize = counts.values().sum();
    counts
        .into_iter()
        .map(|(key, count)| Share {
            key,
            count,
            percent: percent(count, total).unwrap_or(0.0),
        })
        .collect()
}

/// Most frequent value of a field; ties go to the smallest source label
/// (`Híbrido` before `Presencial`, `Grande` before `Pequeno`). `None` when
/// no row has the field.
pub fn mode<'a, V>(view: &View<'a>, value: impl Fn(&'a Row) -> Option<V>) -> Option<V>
where
    V: Ord + SourceLabel,
{
    let mut counts: BTreeMap<V, usize> = BTreeMap::new();
    for v in view.iter().filter_map(&value) {
        *counts.entry(v).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(a, na), (b, nb)| {
            na.cmp(nb).then_with(|| b.source_label().cmp(a.source_label()))
        })
        .map(|(v, _)| v)
}

/// Mode of `value` within each `group`, groups in first-appearance order.
pub fn mode_by<'a, K, V>(
    view: &View<'a>,
    group: impl Fn(&'a Row) -> Option<K>,
    value: impl Fn(&'a Row) -> Option<V>,
) -> Vec<(K, Option<V>)>
where
    K: Eq + Hash + Clone,
    V: Ord + SourceLabel,
{
    group_by(view, group)
        .into_iter()
        .map(|(k, rows)| {
            let m = mode(&rows, &value);
            (k, m)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Cross-border work
// ---------------------------------------------------------------------------

/// Salaries of workers living outside vs inside their employer's country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossBorderSummary {
    pub international: Option<SalaryStats>,
    pub local: Option<SalaryStats>,
    /// Rows where either country is missing; counted in neither bucket.
    pub unknown: usize,
    /// Share of international rows among rows with both countries known.
    pub pct_international: Option<f64>,
}

pub fn cross_border_summary(view: &View<'_>) -> CrossBorderSummary {
    let mut international = Vec::new();
    let mut local = Vec::new();
    let mut unknown = 0;

    for row in view.iter() {
        match row.cross_border() {
            Some(true) => international.push(row.salary_usd),
            Some(false) => local.push(row.salary_usd),
            None => unknown += 1,
        }
    }

    CrossBorderSummary {
        pct_international: percent(international.len(), international.len() + local.len()),
        international: SalaryStats::from_values(&international),
        local: SalaryStats::from_values(&local),
        unknown,
    }
}
