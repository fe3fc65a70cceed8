use chrono::NaiveDate;

const MONTH_NAMES: [(&str, u32); 24] = [
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

/// Parses a month as published by the regulator: `3`, `03`, `3.0`, `March` or `Marzo`.
pub fn parse_month(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.fract() == 0.0 && (1.0..=12.0).contains(&f) {
            return Some(f as u32);
        }
        return None;
    }
    let lower = trimmed.to_lowercase();
    // "Setiembre" is a common regional spelling.
    let lower = if lower == "setiembre" { "septiembre".to_string() } else { lower };
    MONTH_NAMES
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, n)| *n)
}

/// Parses a year cell, accepting spreadsheet-style floats such as `2023.0`.
pub fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if let Ok(y) = trimmed.parse::<i32>() {
        return Some(y);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < i32::MAX as f64 => Some(f as i32),
        _ => None,
    }
}

/// The first calendar day of the given period, if the month is recognizable.
pub fn period_start(year: i32, month: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, parse_month(month)?, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_months() {
        assert_eq!(parse_month("3"), Some(3));
        assert_eq!(parse_month(" 12 "), Some(12));
        assert_eq!(parse_month("07"), Some(7));
        assert_eq!(parse_month("4.0"), Some(4));
        assert_eq!(parse_month("13"), None);
        assert_eq!(parse_month("0"), None);
    }

    #[test]
    fn named_months_in_both_languages() {
        assert_eq!(parse_month("March"), Some(3));
        assert_eq!(parse_month("marzo"), Some(3));
        assert_eq!(parse_month("DICIEMBRE"), Some(12));
        assert_eq!(parse_month("Setiembre"), Some(9));
        assert_eq!(parse_month("Q1"), None);
    }

    #[test]
    fn years_accept_float_cells() {
        assert_eq!(parse_year("2023"), Some(2023));
        assert_eq!(parse_year("2023.0"), Some(2023));
        assert_eq!(parse_year("2023.5"), None);
        assert_eq!(parse_year("n/a"), None);
    }

    #[test]
    fn period_start_is_first_of_month() {
        assert_eq!(period_start(2022, "Junio"), NaiveDate::from_ymd_opt(2022, 6, 1));
        assert_eq!(period_start(2022, "???"), None);
    }
}
