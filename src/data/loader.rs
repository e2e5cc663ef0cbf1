use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use super::error::DataUnavailable;
use super::model::{CompanySize, Dataset, Modality, Row, Seniority};

// ---------------------------------------------------------------------------
// Source location
// ---------------------------------------------------------------------------

/// Where the dataset lives: a remote CSV or a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs, anything else a path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Process-wide memoised base table
// ---------------------------------------------------------------------------

/// A write-once slot for the base table.
///
/// The first successful initialisation wins and every later call gets the
/// same `Arc` without I/O. Concurrent first callers serialise on `init`, so
/// the source is fetched at most once. A failed initialisation leaves the
/// slot empty.
pub struct DatasetCache {
    cell: OnceLock<Arc<Dataset>>,
    init: Mutex<()>,
}

impl DatasetCache {
    pub const fn new() -> Self {
        DatasetCache {
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    pub fn get(&self) -> Option<Arc<Dataset>> {
        self.cell.get().cloned()
    }

    pub fn get_or_try_init(
        &self,
        init: impl FnOnce() -> Result<Dataset, DataUnavailable>,
    ) -> Result<Arc<Dataset>, DataUnavailable> {
        if let Some(ds) = self.cell.get() {
            return Ok(Arc::clone(ds));
        }
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ds) = self.cell.get() {
            return Ok(Arc::clone(ds));
        }
        let ds = Arc::new(init()?);
        // Only this thread can be writing while the guard is held.
        let _ = self.cell.set(Arc::clone(&ds));
        Ok(ds)
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

static BASE_TABLE: DatasetCache = DatasetCache::new();

/// Load the base table, fetching it on the first call only.
///
/// Later calls return the cached table and ignore `source`; the table lives
/// until the process exits.
pub fn load(source: &DataSource, timeout: Duration) -> Result<Arc<Dataset>, DataUnavailable> {
    BASE_TABLE.get_or_try_init(|| load_uncached(source, timeout))
}

/// Fetch and parse without touching the process cache.
pub fn load_uncached(source: &DataSource, timeout: Duration) -> Result<Dataset, DataUnavailable> {
    log::info!("Loading dataset from {source}");
    let dataset = match source {
        DataSource::Url(url) => {
            let bytes = fetch_url(url, timeout)?;
            parse_csv(bytes.as_slice())?
        }
        DataSource::Path(path) => load_file(path)?,
    };
    log::info!(
        "Loaded {} postings ({} roles, years {:?})",
        dataset.len(),
        dataset.options.roles.len(),
        dataset.options.years
    );
    Ok(dataset)
}

fn fetch_url(url: &str, timeout: Duration) -> Result<Vec<u8>, DataUnavailable> {
    let http_err = |source| DataUnavailable::Http {
        url: url.to_string(),
        source,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(http_err)?;
    let resp = client.get(url).send().map_err(http_err)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(DataUnavailable::Status {
            url: url.to_string(),
            status,
        });
    }
    let body = resp.bytes().map_err(http_err)?;
    Ok(body.to_vec())
}

/// Read a CSV dataset from disk.
pub fn load_file(path: &Path) -> Result<Dataset, DataUnavailable> {
    let file = std::fs::File::open(path).map_err(|source| DataUnavailable::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(file)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Header names accepted for each field: the published dataset's own names
/// first, then English aliases.
const YEAR: &[&str] = &["ano", "year"];
const SENIORITY: &[&str] = &["senoridade", "senioridade", "seniority"];
const ROLE: &[&str] = &["cargo", "role"];
const MODALITY: &[&str] = &["modalidade", "modality"];
const COMPANY_SIZE: &[&str] = &["tamanho_empresa", "company_size"];
const CONTRACT_TYPE: &[&str] = &["periodo", "contract_type"];
const COMPANY_COUNTRY: &[&str] = &["localizacao_empresa", "company_country"];
const RESIDENCE_COUNTRY: &[&str] = &["residencia", "residence_country"];
const SALARY_USD: &[&str] = &["salario_em_dolar_americano", "salary_usd"];
const SALARY_CURRENCY: &[&str] = &["moeda_salario", "salary_currency"];

/// Position of every field in the header row.
struct ColumnIndex {
    year: usize,
    seniority: usize,
    role: usize,
    modality: usize,
    company_size: usize,
    contract_type: usize,
    company_country: usize,
    residence_country: Option<usize>,
    salary_usd: usize,
    salary_currency: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &[String]) -> Result<Self, DataUnavailable> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };
        let require = |names: &'static [&'static str]| {
            find(names).ok_or(DataUnavailable::MissingColumn(names[0]))
        };

        Ok(ColumnIndex {
            year: require(YEAR)?,
            seniority: require(SENIORITY)?,
            role: require(ROLE)?,
            modality: require(MODALITY)?,
            company_size: require(COMPANY_SIZE)?,
            contract_type: require(CONTRACT_TYPE)?,
            company_country: require(COMPANY_COUNTRY)?,
            residence_country: find(RESIDENCE_COUNTRY),
            salary_usd: require(SALARY_USD)?,
            salary_currency: require(SALARY_CURRENCY)?,
        })
    }
}

/// Parse a CSV table with a header row. Unknown columns are ignored.
pub fn parse_csv<R: Read>(input: R) -> Result<Dataset, DataUnavailable> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let cols = ColumnIndex::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        rows.push(parse_record(&record, &cols, i + 1)?);
    }

    if rows.is_empty() {
        return Err(DataUnavailable::Empty);
    }
    Ok(Dataset::from_rows(rows))
}

fn parse_record(
    record: &csv::StringRecord,
    cols: &ColumnIndex,
    row: usize,
) -> Result<Row, DataUnavailable> {
    let text = |idx: usize| {
        record
            .get(idx)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let invalid = |column: &'static str, value: &str| DataUnavailable::InvalidValue {
        row,
        column,
        value: value.to_string(),
    };

    let year_text = text(cols.year).ok_or(DataUnavailable::MissingValue { row, column: "year" })?;
    let year = parse_year(&year_text).ok_or_else(|| invalid("year", &year_text))?;

    let salary_text = text(cols.salary_usd).ok_or(DataUnavailable::MissingValue {
        row,
        column: "salary_usd",
    })?;
    let salary_usd = salary_text
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
        .ok_or_else(|| invalid("salary_usd", &salary_text))?;

    let seniority = match text(cols.seniority) {
        Some(s) => Some(Seniority::parse(&s).ok_or_else(|| invalid("seniority", &s))?),
        None => None,
    };
    let modality = match text(cols.modality) {
        Some(s) => Some(Modality::parse(&s).ok_or_else(|| invalid("modality", &s))?),
        None => None,
    };
    let company_size = match text(cols.company_size) {
        Some(s) => Some(CompanySize::parse(&s).ok_or_else(|| invalid("company_size", &s))?),
        None => None,
    };

    Ok(Row {
        year,
        seniority,
        role: text(cols.role),
        modality,
        company_size,
        contract_type: text(cols.contract_type),
        company_country: text(cols.company_country),
        residence_country: cols.residence_country.and_then(text),
        salary_usd,
        salary_currency: text(cols.salary_currency),
    })
}

/// Years may be written as `2023` or, after a float round-trip, `2023.0`.
fn parse_year(s: &str) -> Option<i32> {
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    (f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64).then_some(f as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ano,senoridade,cargo,modalidade,tamanho_empresa,periodo,localizacao_empresa,residencia,salario_em_dolar_americano,moeda_salario";

    fn csv(body: &str) -> String {
        format!("{HEADER}\n{body}")
    }

    #[test]
    fn parses_published_headers_and_labels() {
        let data = csv(
            "2023,Júnior,Data Analyst,Remoto,Médio,Integral,US,BR,55000.5,USD\n\
             2022.0,Sênior,Data Engineer,Presencial,Grande,Integral,DE,,140000,EUR\n",
        );
        let ds = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.rows()[0];
        assert_eq!(first.year, 2023);
        assert_eq!(first.seniority, Some(Seniority::Junior));
        assert_eq!(first.modality, Some(Modality::Remote));
        assert_eq!(first.company_size, Some(CompanySize::Medium));
        assert_eq!(first.salary_usd, 55000.5);
        assert_eq!(first.cross_border(), Some(true));

        let second = &ds.rows()[1];
        assert_eq!(second.year, 2022);
        assert_eq!(second.residence_country, None);
        assert_eq!(second.cross_border(), None);
    }

    #[test]
    fn english_headers_and_missing_residence_column() {
        let data = "year,seniority,role,modality,company_size,contract_type,company_country,salary_usd,salary_currency,extra\n\
                    2024,Mid,ML Engineer,Hybrid,Small,Contract,PT,70000,EUR,ignored\n";
        let ds = parse_csv(data.as_bytes()).unwrap();
        let row = &ds.rows()[0];
        assert_eq!(row.seniority, Some(Seniority::Mid));
        assert_eq!(row.residence_country, None);
        assert_eq!(row.contract_type.as_deref(), Some("Contract"));
    }

    #[test]
    fn blank_categoricals_are_missing() {
        let data = csv("2023,,,,,,US,US,1000,USD\n");
        let ds = parse_csv(data.as_bytes()).unwrap();
        let row = &ds.rows()[0];
        assert_eq!(row.seniority, None);
        assert_eq!(row.role, None);
        assert_eq!(row.modality, None);
    }

    #[test]
    fn rejects_missing_column() {
        let data = "ano,cargo\n2023,Analyst\n";
        let err = parse_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataUnavailable::MissingColumn("senoridade")));
    }

    #[test]
    fn rejects_unknown_label_and_bad_salary() {
        let bad_level = csv("2023,Intern,Analyst,Remoto,Médio,Integral,US,US,1000,USD\n");
        assert!(matches!(
            parse_csv(bad_level.as_bytes()),
            Err(DataUnavailable::InvalidValue { column: "seniority", row: 1, .. })
        ));

        let negative = csv("2023,Júnior,Analyst,Remoto,Médio,Integral,US,US,-5,USD\n");
        assert!(matches!(
            parse_csv(negative.as_bytes()),
            Err(DataUnavailable::InvalidValue { column: "salary_usd", .. })
        ));

        let no_year = csv(",Júnior,Analyst,Remoto,Médio,Integral,US,US,5,USD\n");
        assert!(matches!(
            parse_csv(no_year.as_bytes()),
            Err(DataUnavailable::MissingValue { column: "year", .. })
        ));
    }

    #[test]
    fn header_only_is_empty() {
        let err = parse_csv(csv("").as_bytes()).unwrap_err();
        assert!(matches!(err, DataUnavailable::Empty));
    }

    #[test]
    fn source_kind_from_location() {
        assert_eq!(
            DataSource::parse("https://example.com/a.csv"),
            DataSource::Url("https://example.com/a.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data/a.csv"),
            DataSource::Path(PathBuf::from("data/a.csv"))
        );
    }

    #[test]
    fn cache_runs_initialiser_once() {
        let cache = DatasetCache::new();
        let mut calls = 0;
        let first = cache
            .get_or_try_init(|| {
                calls += 1;
                parse_csv(csv("2023,Júnior,A,Remoto,Médio,I,US,US,1,USD\n").as_bytes())
            })
            .unwrap();
        let second = cache
            .get_or_try_init(|| {
                calls += 1;
                Err(DataUnavailable::Empty)
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn concurrent_first_callers_fetch_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::thread;

        let cache = Arc::new(DatasetCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    cache.get_or_try_init(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(50));
                        parse_csv(csv("2023,Júnior,A,Remoto,Médio,I,US,US,1,USD\n").as_bytes())
                    })
                })
            })
            .collect();

        let tables: Vec<Arc<Dataset>> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(tables.iter().all(|t| Arc::ptr_eq(t, &tables[0])));
    }

    #[test]
    fn failed_initialisation_leaves_cache_empty() {
        let cache = DatasetCache::new();
        assert!(cache.get_or_try_init(|| Err(DataUnavailable::Empty)).is_err());
        assert!(cache.get().is_none());
    }
}
