use std::collections::BTreeMap;

use polars::prelude::*;
use salesflux_parser::TransactionTable;

/// Summed `Total_Sales` per category label, kept in ascending label order.
///
/// Rows with a missing label are skipped; missing amounts contribute nothing,
/// so a label whose amounts are all missing still appears with a zero total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateView {
    entries: Vec<(String, f64)>,
}

impl AggregateView {
    pub fn by_product(table: &TransactionTable) -> PolarsResult<Self> {
        let products = table.products()?;
        let sales = table.total_sales()?;
        Ok(Self::from_pairs(products.into_iter().zip(sales)))
    }

    pub fn by_region(table: &TransactionTable) -> PolarsResult<Self> {
        let regions = table.regions()?;
        let sales = table.total_sales()?;
        Ok(Self::from_pairs(regions.into_iter().zip(sales)))
    }

    /// Single-pass reduction of `(label, amount)` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Option<&'a str>, Option<f64>)>,
    {
        let mut sums: BTreeMap<String, f64> = BTreeMap::new();
        for (label, amount) in pairs {
            let Some(label) = label else {
                continue;
            };
            let total = sums.entry(label.to_string()).or_insert(0.0);
            if let Some(amount) = amount {
                *total += amount;
            }
        }

        Self {
            entries: sums.into_iter().collect(),
        }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label with the largest total. Ties go to the alphabetically first label.
    pub fn top(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (label, value) in &self.entries {
            match best {
                Some((_, best_value)) if *value <= best_value => {}
                _ => best = Some((label.as_str(), *value)),
            }
        }
        best
    }

    /// Entries ordered by ascending total; equal totals keep label order.
    pub fn sorted_by_value(&self) -> Vec<(String, f64)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
        sorted
    }

    /// Percentage share of each strictly positive total, in label order.
    ///
    /// Non-positive totals cannot be drawn as pie wedges and are left out, so the
    /// returned shares sum to 100 whenever any total is positive.
    pub fn shares(&self) -> Vec<(String, f64)> {
        let positive: f64 = self
            .entries
            .iter()
            .map(|(_, value)| *value)
            .filter(|value| *value > 0.0)
            .sum();
        if positive <= 0.0 {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|(_, value)| *value > 0.0)
            .map(|(label, value)| (label.clone(), value / positive * 100.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(pairs: &[(Option<&str>, Option<f64>)]) -> AggregateView {
        AggregateView::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn sums_per_label_in_label_order() {
        let view = view(&[
            (Some("Widget"), Some(100.0)),
            (Some("Gadget"), Some(300.0)),
            (Some("Widget"), Some(50.5)),
        ]);

        assert_eq!(
            view.entries(),
            &[("Gadget".to_string(), 300.0), ("Widget".to_string(), 150.5)]
        );
    }

    #[test]
    fn missing_labels_are_skipped_and_missing_amounts_add_nothing() {
        let view = view(&[
            (None, Some(999.0)),
            (Some("Widget"), None),
            (Some("Widget"), Some(10.0)),
            (Some("Gizmo"), None),
        ]);

        assert_eq!(
            view.entries(),
            &[("Gizmo".to_string(), 0.0), ("Widget".to_string(), 10.0)]
        );
    }

    #[test]
    fn top_prefers_alphabetically_first_on_ties() {
        let view = view(&[
            (Some("Zeta"), Some(500.0)),
            (Some("Alpha"), Some(500.0)),
            (Some("Mid"), Some(100.0)),
        ]);

        assert_eq!(view.top(), Some(("Alpha", 500.0)));
        assert_eq!(AggregateView::default().top(), None);
    }

    #[test]
    fn top_handles_all_negative_totals() {
        let view = view(&[(Some("Returns"), Some(-20.0)), (Some("Refunds"), Some(-5.0))]);
        assert_eq!(view.top(), Some(("Refunds", -5.0)));
    }

    #[test]
    fn sorted_by_value_is_ascending() {
        let view = view(&[
            (Some("Laptop"), Some(300.0)),
            (Some("Cable"), Some(20.0)),
            (Some("Tablet"), Some(150.0)),
        ]);

        let labels: Vec<String> = view
            .sorted_by_value()
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(labels, vec!["Cable", "Tablet", "Laptop"]);
    }

    #[test]
    fn shares_sum_to_one_hundred() {
        let view = view(&[
            (Some("North"), Some(182500.0)),
            (Some("South"), Some(124000.0)),
            (Some("East"), Some(103500.0)),
            (Some("West"), Some(113000.0)),
        ]);

        let shares = view.shares();
        let total: f64 = shares.iter().map(|(_, pct)| pct).sum();
        assert_eq!(shares.len(), 4);
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(shares[0].0, "East");
    }

    #[test]
    fn shares_exclude_non_positive_totals() {
        let view = view(&[
            (Some("North"), Some(75.0)),
            (Some("South"), Some(25.0)),
            (Some("Returns"), Some(-40.0)),
        ]);

        let shares = view.shares();
        assert_eq!(
            shares,
            vec![("North".to_string(), 75.0), ("South".to_string(), 25.0)]
        );
        assert!(AggregateView::default().shares().is_empty());
    }
}
