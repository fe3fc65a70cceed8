use core_types::{LineItem, PeriodKey};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Statement amounts pivoted to `bank-period → line item → amount`.
///
/// Duplicate observations for the same cell are summed. Reading a cell that
/// was never observed yields zero.
#[derive(Debug, Clone, Default)]
pub struct StatementPivot {
    periods: BTreeMap<PeriodKey, BTreeMap<LineItem, Decimal>>,
}

impl StatementPivot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to a cell. Returns `None` if the running sum overflows.
    pub fn add(&mut self, key: PeriodKey, item: LineItem, amount: Decimal) -> Option<()> {
        let cell = self
            .periods
            .entry(key)
            .or_default()
            .entry(item)
            .or_insert(Decimal::ZERO);
        *cell = cell.checked_add(amount)?;
        Some(())
    }

    /// Records that a period exists even if none of its cells could be read.
    pub fn register(&mut self, key: PeriodKey) {
        self.periods.entry(key).or_default();
    }

    pub fn get(&self, key: &PeriodKey, item: &LineItem) -> Decimal {
        self.periods
            .get(key)
            .and_then(|items| items.get(item))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of several cells, `None` on overflow.
    pub fn sum<'a>(
        &self,
        key: &PeriodKey,
        items: impl IntoIterator<Item = &'a LineItem>,
    ) -> Option<Decimal> {
        items
            .into_iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(self.get(key, item)))
    }

    /// Sum of every indicator reported under `category`, `None` on overflow.
    pub fn category_total(&self, key: &PeriodKey, category: &str) -> Option<Decimal> {
        let Some(items) = self.periods.get(key) else {
            return Some(Decimal::ZERO);
        };
        items
            .iter()
            .filter(|(item, _)| item.category == category)
            .try_fold(Decimal::ZERO, |acc, (_, amount)| acc.checked_add(*amount))
    }

    /// Every bank-period in ascending order.
    pub fn periods(&self) -> impl Iterator<Item = &PeriodKey> {
        self.periods.keys()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
