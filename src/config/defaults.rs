//! Built-in defaults used when no config file sets a value.

/// Published cleaned dataset of data-career job postings.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/heldjow/ImersaoDadosAlura/main/df_limpo.csv";

/// Upper bound on the one-time dataset fetch (seconds).
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// Roles shown in the best-paid ranking.
pub const TOP_ROLES: usize = 10;

/// Employer countries shown in the best-paid ranking.
pub const TOP_COUNTRIES: usize = 15;

/// Postings a country needs before it may be ranked, so a single outlier
/// cannot top the list.
pub const MIN_COUNTRY_SUPPORT: usize = 5;

/// Most common entry-level roles listed.
pub const TOP_JUNIOR_ROLES: usize = 15;

/// Entry-level roles given a salary box plot.
pub const JUNIOR_SPREAD_ROLES: usize = 5;

/// Entry-level roles in the detailed profile table.
pub const JUNIOR_PROFILE_ROLES: usize = 10;

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "CAREER_DASH_CONFIG";

/// Environment variable overriding the dataset location.
pub const SOURCE_ENV: &str = "CAREER_DASH_SOURCE";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "career_dash.toml";
