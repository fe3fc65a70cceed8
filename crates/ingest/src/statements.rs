use crate::error::IngestError;
use crate::pivot::StatementPivot;
use core_types::calendar::parse_year;
use core_types::{LineItem, PeriodKey};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const REQUIRED_COLUMNS: [&str; 6] = ["Subgrupo", "Año", "Mes", "Categoría", "Indicador", "Valor"];

/// One row of the regulator's long-format export.
#[derive(Debug, Deserialize)]
struct RawObservation {
    #[serde(rename = "Subgrupo")]
    bank: String,
    #[serde(rename = "Año")]
    year: String,
    #[serde(rename = "Mes")]
    month: String,
    #[serde(rename = "Categoría")]
    category: String,
    #[serde(rename = "Indicador")]
    indicator: String,
    #[serde(rename = "Valor")]
    value: String,
}

/// Counters describing one load of the raw export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub periods: usize,
}

/// Coerces an amount cell. Blank or non-numeric cells yield `None`.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Reads and pivots a long-format export.
///
/// Rows with an unreadable year or amount are skipped and counted rather than
/// aborting the load. A period whose amounts are all unreadable is still kept,
/// with every cell at zero.
pub fn read_observations<R: Read>(
    reader: R,
    delimiter: u8,
) -> Result<(StatementPivot, IngestStats), IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(IngestError::MissingColumn(column.to_string()));
        }
    }

    let mut pivot = StatementPivot::new();
    let mut stats = IngestStats::default();
    let mut usable_rows = 0usize;

    for result in rdr.deserialize::<RawObservation>() {
        stats.rows_read += 1;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed row.");
                stats.rows_skipped += 1;
                continue;
            }
        };

        let Some(year) = parse_year(&row.year) else {
            tracing::debug!(bank = %row.bank, year = %row.year, "Skipping row with non-numeric year.");
            stats.rows_skipped += 1;
            continue;
        };
        let key = PeriodKey::new(row.bank, year, row.month);
        let Some(amount) = parse_amount(&row.value) else {
            tracing::debug!(bank = %key.bank, value = %row.value, "Skipping row with non-numeric amount.");
            stats.rows_skipped += 1;
            pivot.register(key);
            continue;
        };

        let item = LineItem::new(row.category, row.indicator);
        if pivot.add(key, item, amount).is_none() {
            return Err(IngestError::Overflow(format!("data row {}", stats.rows_read)));
        }
        usable_rows += 1;
    }

    if usable_rows == 0 {
        return Err(IngestError::Empty);
    }
    stats.periods = pivot.len();

    if stats.rows_skipped > 0 {
        tracing::warn!(
            skipped = stats.rows_skipped,
            read = stats.rows_read,
            "Some input rows could not be used."
        );
    }
    tracing::info!(periods = stats.periods, rows = stats.rows_read, "Pivoted statement data.");

    Ok((pivot, stats))
}

/// Opens `path` and pivots it with [`read_observations`].
pub fn load_statements(
    path: &Path,
    delimiter: u8,
) -> Result<(StatementPivot, IngestStats), IngestError> {
    let file = File::open(path)?;
    read_observations(file, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
Subgrupo,Año,Mes,Categoría,Indicador,Valor
Banco A,2023,1,Patrimonio,Capital,500
Banco A,2023,1,Patrimonio,Capital,250
Banco A,2023,1,Depositos,A Plazo,1e3
Banco A,2023.0,2,Patrimonio,Capital,510
Banco B,2023,1,Patrimonio,Capital,n/d
Banco B,abc,1,Patrimonio,Capital,40
Banco B,2023,1,Patrimonio,Utilidad De Periodo, 12.5
";

    #[test]
    fn pivots_and_counts_skips() {
        let (pivot, stats) = read_observations(SAMPLE.as_bytes(), b',').unwrap();
        assert_eq!(stats.rows_read, 7);
        assert_eq!(stats.rows_skipped, 2);
        assert_eq!(stats.periods, 3);

        let jan = PeriodKey::new("Banco A", 2023, "1");
        assert_eq!(pivot.get(&jan, &LineItem::new("Patrimonio", "Capital")), dec!(750));
        assert_eq!(pivot.get(&jan, &LineItem::new("Depositos", "A Plazo")), dec!(1000));

        let feb = PeriodKey::new("Banco A", 2023, "2");
        assert_eq!(pivot.get(&feb, &LineItem::new("Patrimonio", "Capital")), dec!(510));

        let b = PeriodKey::new("Banco B", 2023, "1");
        assert_eq!(
            pivot.get(&b, &LineItem::new("Patrimonio", "Utilidad De Periodo")),
            dec!(12.5)
        );
    }

    #[test]
    fn period_with_only_unreadable_amounts_is_kept_as_zeros() {
        let data = "\
Subgrupo,Año,Mes,Categoría,Indicador,Valor
Banco A,2023,1,Patrimonio,Capital,500
Banco C,2023,1,Patrimonio,Capital,n/d
Banco C,2023,1,Patrimonio,Utilidad De Periodo,
";
        let (pivot, stats) = read_observations(data.as_bytes(), b',').unwrap();
        assert_eq!(stats.rows_skipped, 2);
        assert_eq!(stats.periods, 2);

        let c = PeriodKey::new("Banco C", 2023, "1");
        assert!(pivot.periods().any(|k| *k == c));
        assert_eq!(pivot.get(&c, &LineItem::new("Patrimonio", "Capital")), Decimal::ZERO);
    }

    #[test]
    fn honours_custom_delimiter() {
        let data = "Subgrupo;Año;Mes;Categoría;Indicador;Valor\nBanco A;2022;Enero;Patrimonio;Capital;1,5\n";
        // "1,5" is not a decimal number under a ';' delimiter and is skipped.
        let err = read_observations(data.as_bytes(), b';').unwrap_err();
        assert!(matches!(err, IngestError::Empty));

        let data = "Subgrupo;Año;Mes;Categoría;Indicador;Valor\nBanco A;2022;Enero;Patrimonio;Capital;1.5\n";
        let (pivot, _) = read_observations(data.as_bytes(), b';').unwrap();
        let key = PeriodKey::new("Banco A", 2022, "Enero");
        assert_eq!(pivot.get(&key, &LineItem::new("Patrimonio", "Capital")), dec!(1.5));
    }

    #[test]
    fn missing_column_is_an_error() {
        let data = "Subgrupo,Año,Mes,Indicador,Valor\nBanco A,2022,1,Capital,1\n";
        let err = read_observations(data.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(c) if c == "Categoría"));
    }
}
