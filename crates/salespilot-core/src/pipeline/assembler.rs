//! Assembly of one canonical record from a task and its project.

use tracing::trace;

use crate::extract::rules::{display_date, mine_client, month_bucket, type_hint, zone_from_project};
use crate::extract::{extract_fields, AliasTable, ExtractionIssue};
use crate::finance::{FeeTable, Financials};
use crate::models::record::CanonicalRecord;
use crate::models::task::{Project, RawTask};

use super::status::StatusMap;

/// Combines extraction, fallbacks and financial derivation into records.
///
/// Holds only read-only lookup tables, so one assembler serves a whole run.
#[derive(Debug, Clone, Default)]
pub struct RecordAssembler {
    aliases: AliasTable,
    fees: FeeTable,
    statuses: StatusMap,
}

impl RecordAssembler {
    pub fn new(aliases: AliasTable, fees: FeeTable, statuses: StatusMap) -> Self {
        Self {
            aliases,
            fees,
            statuses,
        }
    }

    /// Build the record for a task that passed filtering. `section` is the
    /// task's raw section label in `project`.
    pub fn assemble(
        &self,
        project: &Project,
        task: &RawTask,
        section: &str,
    ) -> (CanonicalRecord, Vec<ExtractionIssue>) {
        let extraction = extract_fields(task, &self.aliases);
        let fields = extraction.fields;

        let zone = if fields.zone.is_empty() {
            zone_from_project(&project.name)
        } else {
            fields.zone
        };
        let client = if fields.client.is_empty() {
            mine_client(&task.name, &task.notes)
        } else {
            fields.client
        };

        // The fee is keyed on the project's WO/PO hint, not the Type field
        let hint = type_hint(&project.name);
        let kind = if fields.kind.is_empty() {
            hint.to_string()
        } else {
            fields.kind
        };
        let fee_pct = self.fees.fee_pct(&client, hint);

        let mut issues = extraction.issues;
        let money = Financials::derive(
            fields.approved_value,
            fee_pct,
            fields.materials_cost,
            fields.labor_cost,
        );
        trace!(
            "Task {}: approved {} fee {} net {} cost {}",
            task.gid, money.approved_value, fee_pct, money.net_value, money.total_cost
        );
        issues.extend(money.zeroed.iter().map(|(field, value)| ExtractionIssue {
            field: *field,
            label: field.as_str().to_string(),
            raw: value.to_string(),
        }));

        let record = CanonicalRecord {
            project: project.name.clone(),
            zone,
            kind,
            task_gid: task.gid.clone(),
            task_url: task.permalink_url.clone(),
            wo_number: fields.wo_number.trim().to_string(),
            task_name: task.name.clone(),
            column: section.to_string(),
            logical_status: self.statuses.logical_status(section),
            client,
            priority: fields.priority,
            custom_status: fields.status,
            approved_value: money.approved_value,
            net_approved_value: money.net_value,
            materials_cost: money.materials_cost,
            labor_cost: money.labor_cost,
            total_cost: money.total_cost,
            profit: money.profit,
            profit_ratio: money.profit_ratio,
            invoice_month: month_bucket(&fields.invoice_date),
            invoice_date: display_date(&fields.invoice_date),
            paid: fields.paid_flag || !fields.paid_date.is_empty(),
            paid_date: display_date(&fields.paid_date),
            paid_amount: fields.paid_amount,
            created_at: task.created_at.clone(),
            modified_at: task.modified_at.clone(),
            canceled: fields.canceled_flag,
            canceled_date: display_date(&fields.canceled_date),
        };

        (record, issues)
    }
}
