//! Text formatting for figures that may be undefined.

/// Placeholder shown wherever a statistic is undefined.
pub const UNAVAILABLE: &str = "N/A";

/// Group an integer's digits in thousands: `1234567` → `1,234,567`.
pub fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-dollar amount, e.g. `$85,000`.
pub fn usd(value: f64) -> String {
    let rounded = value.round() as i64;
    if rounded < 0 {
        format!("-${}", thousands(-rounded))
    } else {
        format!("${}", thousands(rounded))
    }
}

pub fn usd_opt(value: Option<f64>) -> String {
    value.map(usd).unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// Signed dollar delta, e.g. `+$1,200`.
pub fn usd_delta(value: Option<f64>) -> String {
    match value {
        Some(v) if v >= 0.0 => format!("+{}", usd(v)),
        Some(v) => usd(v),
        None => UNAVAILABLE.to_string(),
    }
}

pub fn pct_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}%"))
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

pub fn label_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}
