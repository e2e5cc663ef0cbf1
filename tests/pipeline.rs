use std::io::Write;

use tempfile::NamedTempFile;

use career_dash::config::AnalysisConfig;
use career_dash::data::aggregate::{
    by_seniority, cross_border_summary, crosstab_percent, salary_by_year, top_paid_countries,
};
use career_dash::data::filter::{apply, FilterSelection};
use career_dash::data::loader::{load_file, parse_csv, DatasetCache};
use career_dash::data::metrics::HeadlineMetrics;
use career_dash::data::model::{Dataset, Modality, Seniority};
use career_dash::{DataUnavailable, RenderModel};

const HEADER: &str = "ano,senioridade,cargo,modalidade,tamanho_empresa,periodo,localizacao_empresa,residencia,salario_em_dolar_americano,moeda_salario";

const BODY: &str = "\
2021,Júnior,Data Analyst,Remoto,Médio,Integral,US,US,50000,USD
2021,Sênior,Data Scientist,Presencial,Grande,Integral,US,BR,120000,USD
2022,Júnior,Data Analyst,Remoto,Pequeno,Integral,US,US,60000,USD
2022,Pleno,Data Engineer,Híbrido,Médio,Integral,US,US,90000,USD
2023,Executivo,Head of Data,Presencial,Grande,Integral,US,,200000,USD
2023,Sênior,ML Engineer,Remoto,Grande,Integral,CA,CA,300000,CAD
2023,Sênior,ML Engineer,Remoto,Grande,Integral,CA,CA,300000,CAD
2023,Sênior,ML Engineer,Remoto,Grande,Integral,CA,CA,300000,CAD
2023,Sênior,ML Engineer,Remoto,Grande,Integral,CA,CA,300000,CAD
";

fn load_fixture() -> Dataset {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{HEADER}\n{BODY}").unwrap();
    load_file(tmp.path()).unwrap()
}

fn years(years: &[i32]) -> FilterSelection {
    let mut sel = FilterSelection::default();
    sel.years.extend(years.iter().copied());
    sel
}

#[test]
fn test_loads_published_layout_from_disk() {
    let ds = load_fixture();
    assert_eq!(ds.len(), 9);
    assert_eq!(ds.options.years.len(), 3);
    assert_eq!(ds.options.roles.len(), 5);
    assert!(ds.options.seniority.contains(&Seniority::Executive));
}

#[test]
fn test_missing_file_is_reported() {
    let err = load_file(std::path::Path::new("/nonexistent/postings.csv")).unwrap_err();
    assert!(matches!(err, DataUnavailable::Io { .. }));
}

#[test]
fn test_missing_salary_column_is_reported() {
    let csv = "ano,senioridade,cargo,modalidade,tamanho_empresa,periodo,localizacao_empresa,moeda_salario\n\
               2023,Júnior,Data Analyst,Remoto,Médio,Integral,US,USD\n";
    let err = parse_csv(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, DataUnavailable::MissingColumn("salario_em_dolar_americano")));
}

#[test]
fn test_header_only_file_is_empty() {
    let err = parse_csv(format!("{HEADER}\n").as_bytes()).unwrap_err();
    assert!(matches!(err, DataUnavailable::Empty));
}

#[test]
fn test_cache_serves_the_same_table() {
    let cache = DatasetCache::new();
    let mut calls = 0;
    let first = cache
        .get_or_try_init(|| {
            calls += 1;
            Ok(load_fixture())
        })
        .unwrap();
    let second = cache
        .get_or_try_init(|| {
            calls += 1;
            Ok(load_fixture())
        })
        .unwrap();
    assert_eq!(calls, 1);
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn test_filtering_yields_an_idempotent_subset() {
    let ds = load_fixture();
    let sel = years(&[2021, 2022]);

    let once = ds.filtered(&sel);
    assert_eq!(once.len(), 4);
    assert!(once.iter().all(|r| r.year == 2021 || r.year == 2022));

    let twice = apply(&once, &sel);
    assert_eq!(twice.len(), once.len());
}

#[test]
fn test_empty_selection_keeps_every_row() {
    let ds = load_fixture();
    assert_eq!(ds.filtered(&FilterSelection::default()).len(), ds.len());
    assert_eq!(ds.filtered(&ds.options.select_all()).len(), ds.len());
}

#[test]
fn test_headline_for_a_single_year() {
    let ds = load_fixture();
    let view = ds.filtered(&years(&[2021]));
    let h = HeadlineMetrics::compute(&ds, &view);

    assert_eq!(h.row_count, 2);
    assert_eq!(h.row_count_delta, -7);
    assert_eq!(h.mean_salary, Some(85_000.0));
    assert_eq!(h.pct_remote, Some(50.0));
    assert_eq!(h.pct_junior, Some(50.0));
    assert!(h.mean_salary_delta.unwrap() < 0.0);
}

#[test]
fn test_no_matching_rows_gives_undefined_metrics() {
    let ds = load_fixture();
    let view = ds.filtered(&years(&[2019]));
    let h = HeadlineMetrics::compute(&ds, &view);

    assert_eq!(h.row_count, 0);
    assert_eq!(h.mean_salary, None);
    assert_eq!(h.mean_salary_delta, None);
    assert_eq!(h.pct_remote, None);
    assert_eq!(h.pct_junior, None);
}

#[test]
fn test_seniority_follows_career_order() {
    let ds = load_fixture();
    let order: Vec<Seniority> = by_seniority(&ds.view())
        .into_iter()
        .map(|g| g.seniority)
        .collect();
    assert_eq!(order, Seniority::ALL.to_vec());
}

#[test]
fn test_countries_need_five_postings() {
    let ds = load_fixture();
    let view = ds.view();

    // CA has four postings, all better paid than US.
    let strict = top_paid_countries(&view, 10, 5);
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].key, "US");
    assert_eq!(strict[0].stats.count, 5);

    let relaxed = top_paid_countries(&view, 10, 4);
    assert_eq!(relaxed[0].key, "CA");
    assert_eq!(relaxed[0].stats.mean, 300_000.0);
}

#[test]
fn test_modality_shares_sum_to_one_hundred() {
    let ds = load_fixture();
    let tab = crosstab_percent(&ds.view(), |r| Some(r.year), |r| r.modality);

    assert_eq!(tab.columns, Modality::ALL.to_vec());
    assert_eq!(tab.rows.len(), 3);
    for row in &tab.rows {
        let sum: f64 = row.percents.iter().sum();
        assert!((sum - 100.0).abs() < 1e-9, "year {} sums to {sum}", row.key);
    }
}

#[test]
fn test_yearly_std_is_undefined_for_a_single_posting() {
    let ds = load_fixture();
    let mut sel = years(&[2021, 2022]);
    sel.seniority.insert(Seniority::Senior);
    let series = salary_by_year(&ds.filtered(&sel));

    assert_eq!(series.len(), 1);
    assert_eq!(series[0].key, 2021);
    assert_eq!(series[0].stats.std_dev, None);
}

#[test]
fn test_cross_border_skips_unknown_residence() {
    let ds = load_fixture();
    let cb = cross_border_summary(&ds.view());

    assert_eq!(cb.unknown, 1);
    assert_eq!(cb.international.as_ref().map(|s| s.count), Some(1));
    assert_eq!(cb.local.as_ref().map(|s| s.count), Some(7));
    assert_eq!(cb.pct_international, Some(12.5));
}

#[test]
fn test_render_model_over_whole_table() {
    let ds = load_fixture();
    let model = RenderModel::build(&ds, &ds.options.select_all(), &AnalysisConfig::default());

    assert_eq!(model.headline.row_count, 9);
    assert_eq!(model.headline.row_count_delta, 0);
    assert_eq!(model.junior.postings, 2);
    assert_eq!(model.salary.by_seniority.len(), 4);
    assert_eq!(model.location.top_countries.len(), 1);
    assert_eq!(model.summary.first_year, Some(2021));
    assert_eq!(model.summary.last_year, Some(2023));
}
