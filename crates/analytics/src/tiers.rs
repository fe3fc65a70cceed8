use core_types::PerformanceTier;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

/// ROE cut points splitting bank-periods into thirds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierThresholds {
    pub q33: Decimal,
    pub q66: Decimal,
}

impl TierThresholds {
    /// Derives the 0.33 and 0.66 quantiles from every defined ROE.
    ///
    /// With two or fewer values there is nothing to split, and both cut points are zero.
    pub fn from_roe(values: impl IntoIterator<Item = Decimal>) -> Self {
        let mut sorted: Vec<Decimal> = values.into_iter().collect();
        if sorted.len() <= 2 {
            return Self {
                q33: Decimal::ZERO,
                q66: Decimal::ZERO,
            };
        }
        sorted.sort();
        Self {
            q33: quantile(&sorted, Decimal::new(33, 2)).unwrap_or(Decimal::ZERO),
            q66: quantile(&sorted, Decimal::new(66, 2)).unwrap_or(Decimal::ZERO),
        }
    }

    pub fn classify(&self, roe: Option<Decimal>) -> PerformanceTier {
        match roe {
            None => PerformanceTier::Unknown,
            Some(x) if x <= self.q33 => PerformanceTier::Low,
            Some(x) if x <= self.q66 => PerformanceTier::Medium,
            Some(_) => PerformanceTier::High,
        }
    }
}

/// Quantile of an ascending slice with linear interpolation between the two
/// nearest ranks. `None` for an empty slice or on overflow.
pub fn quantile(sorted: &[Decimal], q: Decimal) -> Option<Decimal> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.checked_mul(Decimal::from(last))?;
    let lower = position.floor().to_usize()?.min(last);
    let upper = (lower + 1).min(last);
    let fraction = position.checked_sub(Decimal::from(lower))?;
    let spread = sorted[upper].checked_sub(sorted[lower])?;
    sorted[lower].checked_add(spread.checked_mul(fraction)?)
}
