//! Grouped totals over the record set: sales, profit and cost per type and
//! per zone.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::extract::rules::normalize;
use crate::models::record::CanonicalRecord;

/// Totals for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// Group key (a type or a zone); empty groups are kept as "".
    pub group: String,
    /// Sum of net approved value.
    pub sales: Decimal,
    pub profit: Decimal,
    /// Sum of total cost.
    pub costs: Decimal,
    /// Records with a work order number.
    pub orders: usize,
}

impl SummaryRow {
    fn new(group: &str) -> Self {
        Self {
            group: group.to_string(),
            sales: Decimal::ZERO,
            profit: Decimal::ZERO,
            costs: Decimal::ZERO,
            orders: 0,
        }
    }

    fn add(&mut self, record: &CanonicalRecord) {
        let orders = usize::from(!record.wo_number.trim().is_empty());
        self.accumulate(record.net_approved_value, record.profit, record.total_cost, orders);
    }

    /// Sums saturate at the `Decimal` bounds instead of overflowing.
    fn accumulate(&mut self, sales: Decimal, profit: Decimal, costs: Decimal, orders: usize) {
        self.sales = self.sales.saturating_add(sales);
        self.profit = self.profit.saturating_add(profit);
        self.costs = self.costs.saturating_add(costs);
        self.orders += orders;
    }
}

/// A named summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub name: String,
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    /// Grand total over all rows.
    pub fn total(&self) -> SummaryRow {
        let mut total = SummaryRow::new("Total");
        for row in &self.rows {
            total.accumulate(row.sales, row.profit, row.costs, row.orders);
        }
        total
    }
}

fn group_by<'a, I, F>(records: I, key: F) -> Vec<SummaryRow>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
    F: Fn(&CanonicalRecord) -> &str,
{
    let mut groups: BTreeMap<String, SummaryRow> = BTreeMap::new();
    for record in records {
        let group = key(record).trim();
        groups
            .entry(group.to_string())
            .or_insert_with(|| SummaryRow::new(group))
            .add(record);
    }
    groups.into_values().collect()
}

/// Totals per transaction type.
pub fn by_type(records: &[CanonicalRecord]) -> Vec<SummaryRow> {
    group_by(records, |r| r.kind.as_str())
}

/// Totals per zone, restricted to records of one transaction type.
pub fn by_zone(records: &[CanonicalRecord], kind: &str) -> Vec<SummaryRow> {
    let wanted = normalize(kind);
    group_by(
        records.iter().filter(|r| normalize(&r.kind) == wanted),
        |r| r.zone.as_str(),
    )
}

/// The three standard tables: overall by type, WO by zone, PO by zone.
pub fn standard_summaries(records: &[CanonicalRecord]) -> Vec<Summary> {
    vec![
        Summary {
            name: "By Type".to_string(),
            rows: by_type(records),
        },
        Summary {
            name: "WO by Zone".to_string(),
            rows: by_zone(records, "WO"),
        },
        Summary {
            name: "PO by Zone".to_string(),
            rows: by_zone(records, "PO"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(kind: &str, zone: &str, net: i64, cost: i64, wo: &str) -> CanonicalRecord {
        let net = Decimal::from(net);
        let cost = Decimal::from(cost);
        CanonicalRecord {
            project: String::new(),
            zone: zone.to_string(),
            kind: kind.to_string(),
            task_gid: String::new(),
            task_url: String::new(),
            wo_number: wo.to_string(),
            task_name: String::new(),
            column: String::new(),
            logical_status: String::new(),
            client: String::new(),
            priority: String::new(),
            custom_status: String::new(),
            approved_value: net,
            net_approved_value: net,
            materials_cost: cost,
            labor_cost: Decimal::ZERO,
            total_cost: cost,
            profit: net - cost,
            profit_ratio: Decimal::ZERO,
            invoice_date: String::new(),
            invoice_month: String::new(),
            paid: false,
            paid_date: String::new(),
            paid_amount: None,
            created_at: String::new(),
            modified_at: String::new(),
            canceled: false,
            canceled_date: String::new(),
        }
    }

    fn records() -> Vec<CanonicalRecord> {
        vec![
            record("WO", "North", 900, 300, "WO 1"),
            record("WO", "South", 100, 50, ""),
            record("wo", "North", 50, 10, "WO 2"),
            record("PO", "North", 400, 100, "WO 3"),
            record("", "East", 10, 0, ""),
        ]
    }

    #[test]
    fn test_by_type() {
        let rows = by_type(&records());
        let groups: Vec<_> = rows.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(groups, vec!["", "PO", "WO", "wo"]);

        let wo = &rows[2];
        assert_eq!(wo.sales, Decimal::from(1000));
        assert_eq!(wo.costs, Decimal::from(350));
        assert_eq!(wo.profit, Decimal::from(650));
        assert_eq!(wo.orders, 1);
    }

    #[test]
    fn test_by_zone_filters_type_case_insensitively() {
        let rows = by_zone(&records(), "WO");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group, "North");
        assert_eq!(rows[0].sales, Decimal::from(950));
        assert_eq!(rows[0].orders, 2);
        assert_eq!(rows[1].group, "South");

        let po = by_zone(&records(), "PO");
        assert_eq!(po.len(), 1);
        assert_eq!(po[0].profit, Decimal::from(300));
    }

    #[test]
    fn test_standard_summaries_and_totals() {
        let summaries = standard_summaries(&records());
        assert_eq!(summaries.len(), 3);
        let total = summaries[0].total();
        assert_eq!(total.sales, Decimal::from(1460));
        assert_eq!(total.orders, 3);
        assert!(standard_summaries(&[])[1].rows.is_empty());
    }

    #[test]
    fn test_huge_sums_saturate() {
        let mut big = record("WO", "North", 0, 0, "WO 9");
        big.net_approved_value = Decimal::MAX;
        big.total_cost = Decimal::MAX;
        big.profit = Decimal::MIN;
        let records = vec![big.clone(), big, record("WO", "North", 5, 1, "")];

        let rows = by_type(&records);
        assert_eq!(rows[0].sales, Decimal::MAX);
        assert_eq!(rows[0].costs, Decimal::MAX);
        assert_eq!(rows[0].profit, Decimal::MIN);
        assert_eq!(rows[0].orders, 2);

        let summary = Summary {
            name: "By Type".to_string(),
            rows: vec![rows[0].clone(), rows[0].clone()],
        };
        let total = summary.total();
        assert_eq!(total.sales, Decimal::MAX);
        assert_eq!(total.profit, Decimal::MIN);
        assert_eq!(total.orders, 4);
    }
}
