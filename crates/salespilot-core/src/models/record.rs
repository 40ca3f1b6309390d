//! Canonical output record and the column contract handed to renderers.

use std::fmt;

use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Column headers, in natural record order.
pub mod columns {
    pub const PROJECT: &str = "Project";
    pub const ZONE: &str = "Zone";
    pub const TYPE: &str = "Type";
    pub const TASK_GID: &str = "Task GID";
    pub const TASK_URL: &str = "Task URL";
    pub const WO_NUMBER: &str = "# de orden";
    pub const TASK_NAME: &str = "Task Name";
    pub const COLUMN: &str = "Column";
    pub const LOGICAL_STATUS: &str = "Logical Status";
    pub const CLIENT: &str = "Client";
    pub const PRIORITY: &str = "Priority";
    pub const CUSTOM_STATUS: &str = "Status (CF)";
    pub const APPROVED_VALUE: &str = "Approved Value";
    pub const NET_APPROVED_VALUE: &str = "Valor Aprobado (Real)";
    pub const MATERIALS_COST: &str = "Gasto Materiales";
    pub const LABOR_COST: &str = "Gasto Labor";
    pub const TOTAL_COST: &str = "Gastos Total";
    pub const PROFIT: &str = "Utilidad ($)";
    pub const PROFIT_RATIO: &str = "Utilidad (%)";
    pub const INVOICE_DATE: &str = "Invoice Date";
    pub const INVOICE_MONTH: &str = "Invoice Month";
    pub const PAID: &str = "Paid?";
    pub const PAID_DATE: &str = "Paid Date";
    pub const PAID_AMOUNT: &str = "Paid Amount";
    pub const CREATED_AT: &str = "Created At (Asana)";
    pub const MODIFIED_AT: &str = "Modified At";
    pub const CANCELED: &str = "Canceled?";
    pub const CANCELED_DATE: &str = "Canceled Date";

    /// Every column, in the order fields appear on the record.
    pub const NATURAL: &[&str] = &[
        PROJECT, ZONE, TYPE, TASK_GID, TASK_URL, WO_NUMBER, TASK_NAME, COLUMN,
        LOGICAL_STATUS, CLIENT, PRIORITY, CUSTOM_STATUS, APPROVED_VALUE,
        NET_APPROVED_VALUE, MATERIALS_COST, LABOR_COST, TOTAL_COST, PROFIT,
        PROFIT_RATIO, INVOICE_DATE, INVOICE_MONTH, PAID, PAID_DATE, PAID_AMOUNT,
        CREATED_AT, MODIFIED_AT, CANCELED, CANCELED_DATE,
    ];

    /// Columns renderers should place first.
    pub const PREFERRED: &[&str] = &[
        PROJECT, ZONE, TYPE, WO_NUMBER, PRIORITY, CLIENT, COLUMN, CUSTOM_STATUS,
        APPROVED_VALUE, NET_APPROVED_VALUE, MATERIALS_COST, LABOR_COST, TOTAL_COST,
        PROFIT, PROFIT_RATIO, INVOICE_DATE, INVOICE_MONTH, PAID, PAID_DATE,
        PAID_AMOUNT,
    ];
}

/// Final column order: preferred columns that exist, then the rest in
/// their natural order.
pub fn column_order<'a>(preferred: &[&'a str], natural: &[&'a str]) -> Vec<&'a str> {
    let mut order: Vec<&str> = preferred
        .iter()
        .copied()
        .filter(|c| natural.contains(c))
        .collect();
    order.extend(natural.iter().copied().filter(|c| !preferred.contains(c)));
    order
}

/// Default column order for canonical records.
pub fn default_column_order() -> Vec<&'static str> {
    column_order(columns::PREFERRED, columns::NATURAL)
}

/// One normalized, fully derived output row. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Zone")]
    pub zone: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Task GID")]
    pub task_gid: String,
    #[serde(rename = "Task URL")]
    pub task_url: String,
    #[serde(rename = "# de orden")]
    pub wo_number: String,
    #[serde(rename = "Task Name")]
    pub task_name: String,
    /// Raw section label.
    #[serde(rename = "Column")]
    pub column: String,
    #[serde(rename = "Logical Status")]
    pub logical_status: String,
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "Priority")]
    pub priority: String,
    /// Status custom field, independent of the board column.
    #[serde(rename = "Status (CF)")]
    pub custom_status: String,
    #[serde(rename = "Approved Value")]
    pub approved_value: Decimal,
    /// Approved value after the client's fee.
    #[serde(rename = "Valor Aprobado (Real)")]
    pub net_approved_value: Decimal,
    #[serde(rename = "Gasto Materiales")]
    pub materials_cost: Decimal,
    #[serde(rename = "Gasto Labor")]
    pub labor_cost: Decimal,
    #[serde(rename = "Gastos Total")]
    pub total_cost: Decimal,
    #[serde(rename = "Utilidad ($)")]
    pub profit: Decimal,
    #[serde(rename = "Utilidad (%)")]
    pub profit_ratio: Decimal,
    /// `MM/DD/YYYY` when parseable, raw text otherwise.
    #[serde(rename = "Invoice Date")]
    pub invoice_date: String,
    /// `YYYY-MM`, empty when the invoice date is unparseable.
    #[serde(rename = "Invoice Month")]
    pub invoice_month: String,
    #[serde(rename = "Paid?")]
    pub paid: bool,
    #[serde(rename = "Paid Date")]
    pub paid_date: String,
    #[serde(rename = "Paid Amount")]
    pub paid_amount: Option<Decimal>,
    #[serde(rename = "Created At (Asana)")]
    pub created_at: String,
    #[serde(rename = "Modified At")]
    pub modified_at: String,
    #[serde(rename = "Canceled?")]
    pub canceled: bool,
    #[serde(rename = "Canceled Date")]
    pub canceled_date: String,
}

/// A single typed cell of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Money(Decimal),
    MaybeMoney(Option<Decimal>),
    Ratio(Decimal),
    Flag(bool),
}

impl Serialize for Cell<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Money(d) | Cell::Ratio(d) => Serialize::serialize(d, serializer),
            Cell::MaybeMoney(d) => d.serialize(serializer),
            Cell::Flag(b) => serializer.serialize_bool(*b),
        }
    }
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Money(d) | Cell::MaybeMoney(Some(d)) => write!(f, "{:.2}", d.round_dp(2)),
            Cell::MaybeMoney(None) => Ok(()),
            Cell::Ratio(d) => write!(f, "{:.4}", d.round_dp(4)),
            Cell::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl CanonicalRecord {
    /// Look up a cell by column header.
    pub fn cell(&self, column: &str) -> Option<Cell<'_>> {
        use columns::*;

        let cell = match column {
            PROJECT => Cell::Text(&self.project),
            ZONE => Cell::Text(&self.zone),
            TYPE => Cell::Text(&self.kind),
            TASK_GID => Cell::Text(&self.task_gid),
            TASK_URL => Cell::Text(&self.task_url),
            WO_NUMBER => Cell::Text(&self.wo_number),
            TASK_NAME => Cell::Text(&self.task_name),
            COLUMN => Cell::Text(&self.column),
            LOGICAL_STATUS => Cell::Text(&self.logical_status),
            CLIENT => Cell::Text(&self.client),
            PRIORITY => Cell::Text(&self.priority),
            CUSTOM_STATUS => Cell::Text(&self.custom_status),
            APPROVED_VALUE => Cell::Money(self.approved_value),
            NET_APPROVED_VALUE => Cell::Money(self.net_approved_value),
            MATERIALS_COST => Cell::Money(self.materials_cost),
            LABOR_COST => Cell::Money(self.labor_cost),
            TOTAL_COST => Cell::Money(self.total_cost),
            PROFIT => Cell::Money(self.profit),
            PROFIT_RATIO => Cell::Ratio(self.profit_ratio),
            INVOICE_DATE => Cell::Text(&self.invoice_date),
            INVOICE_MONTH => Cell::Text(&self.invoice_month),
            PAID => Cell::Flag(self.paid),
            PAID_DATE => Cell::Text(&self.paid_date),
            PAID_AMOUNT => Cell::MaybeMoney(self.paid_amount),
            CREATED_AT => Cell::Text(&self.created_at),
            MODIFIED_AT => Cell::Text(&self.modified_at),
            CANCELED => Cell::Flag(self.canceled),
            CANCELED_DATE => Cell::Text(&self.canceled_date),
            _ => return None,
        };
        Some(cell)
    }

    /// Render the record as strings in the given column order.
    pub fn row(&self, order: &[&str]) -> Vec<String> {
        order
            .iter()
            .map(|c| self.cell(c).map(|cell| cell.to_string()).unwrap_or_default())
            .collect()
    }

    /// View of the record that serializes as an object with keys in `order`.
    /// Unknown columns are skipped.
    pub fn in_order<'a>(&'a self, order: &'a [&'a str]) -> OrderedRecord<'a> {
        OrderedRecord {
            record: self,
            order,
        }
    }
}

/// See [`CanonicalRecord::in_order`].
#[derive(Debug, Clone, Copy)]
pub struct OrderedRecord<'a> {
    record: &'a CanonicalRecord,
    order: &'a [&'a str],
}

impl Serialize for OrderedRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let cells: Vec<_> = self
            .order
            .iter()
            .filter_map(|column| self.record.cell(column).map(|cell| (*column, cell)))
            .collect();
        let mut map = serializer.serialize_map(Some(cells.len()))?;
        for (column, cell) in cells {
            map.serialize_entry(column, &cell)?;
        }
        map.end()
    }
}
