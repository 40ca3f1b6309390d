//! Typed value extraction from a task's custom fields.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use super::fields::{AliasTable, CanonicalField};
use super::rules::{mine_wo, parse_money};
use crate::models::task::{CustomField, RawTask};

/// Tokens accepted as "true" for flag fields, compared lower-cased.
const TRUTHY: &[&str] = &["1", "true", "yes", "si", "sí"];

/// Values pulled from a task's custom fields, before any fallback other
/// than the work-order miner.
///
/// Numeric fields stay `None` when absent or unparsable; the canonical
/// defaults are applied when the record is assembled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedFields {
    pub client: String,
    pub zone: String,
    pub approved_value: Option<Decimal>,
    pub invoice_date: String,
    pub paid_flag: bool,
    pub paid_date: String,
    pub paid_amount: Option<Decimal>,
    pub priority: String,
    pub status: String,
    pub canceled_flag: bool,
    pub canceled_date: String,
    pub kind: String,
    pub wo_number: String,
    pub materials_cost: Option<Decimal>,
    pub labor_cost: Option<Decimal>,
}

/// A custom field that resolved to a key but whose value could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionIssue {
    pub field: CanonicalField,
    /// Label of the offending custom field, or the key name when the value
    /// was dropped during derivation.
    pub label: String,
    /// Text that failed to parse.
    pub raw: String,
}

/// Result of extracting one task.
#[derive(Debug, Clone, Default)]
pub struct FieldExtraction {
    pub fields: ExtractedFields,
    pub issues: Vec<ExtractionIssue>,
}

/// Map every custom field of `task` onto its canonical key and read its value.
///
/// Fields are visited in the task's native order; a later field resolving to
/// the same key overwrites an earlier one. When no field supplies a work
/// order number it is mined from the task name.
pub fn extract_fields(task: &RawTask, aliases: &AliasTable) -> FieldExtraction {
    let mut out = FieldExtraction::default();

    for cf in &task.custom_fields {
        let Some(field) = aliases.resolve(&cf.name) else {
            trace!("Custom field {:?} has no canonical key", cf.name);
            continue;
        };
        apply(&mut out, field, cf);
    }

    if out.fields.wo_number.is_empty() {
        out.fields.wo_number = mine_wo(&task.name);
    }

    out
}

fn apply(out: &mut FieldExtraction, field: CanonicalField, cf: &CustomField) {
    let f = &mut out.fields;
    match field {
        CanonicalField::Client => f.client = free_text(cf),
        CanonicalField::Zone => f.zone = zone_text(cf),
        CanonicalField::InvoiceDate => f.invoice_date = free_text(cf),
        CanonicalField::PaidDate => f.paid_date = free_text(cf),
        CanonicalField::CanceledDate => f.canceled_date = free_text(cf),
        CanonicalField::WoNumber => f.wo_number = free_text(cf),
        CanonicalField::Priority => f.priority = choice_text(cf),
        CanonicalField::Status => f.status = choice_text(cf),
        CanonicalField::Type => f.kind = choice_text(cf),
        CanonicalField::PaidFlag => f.paid_flag = flag(cf, "paid"),
        CanonicalField::CanceledFlag => f.canceled_flag = flag(cf, "canceled"),
        CanonicalField::ApprovedValue => f.approved_value = number(&mut out.issues, field, cf),
        CanonicalField::PaidAmount => f.paid_amount = number(&mut out.issues, field, cf),
        CanonicalField::MaterialsCost => f.materials_cost = number(&mut out.issues, field, cf),
        CanonicalField::LaborCost => f.labor_cost = number(&mut out.issues, field, cf),
    }
}

/// Display text, else raw text.
fn free_text(cf: &CustomField) -> String {
    cf.display_text()
        .or_else(|| cf.raw_text())
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Display text, else raw text, else the chosen option.
fn zone_text(cf: &CustomField) -> String {
    cf.display_text()
        .or_else(|| cf.raw_text())
        .or_else(|| cf.chosen_option())
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Chosen option, else display text, else raw text.
fn choice_text(cf: &CustomField) -> String {
    cf.chosen_option()
        .or_else(|| cf.display_text())
        .or_else(|| cf.raw_text())
        .unwrap_or("")
        .trim()
        .to_string()
}

fn flag(cf: &CustomField, literal: &str) -> bool {
    let token = cf
        .display_text()
        .or_else(|| cf.raw_text())
        .or_else(|| cf.chosen_option())
        .unwrap_or("")
        .trim()
        .to_lowercase();
    TRUTHY.contains(&token.as_str()) || token == literal
}

/// Native number, else the money parser over display text then raw text.
/// A native number outside the `Decimal` range counts as unreadable.
fn number(
    issues: &mut Vec<ExtractionIssue>,
    field: CanonicalField,
    cf: &CustomField,
) -> Option<Decimal> {
    let out_of_range = match cf.native_number() {
        Some(Ok(n)) => return Some(n),
        Some(Err(text)) => Some(text),
        None => None,
    };

    let candidates = [cf.display_text(), cf.raw_text()];
    if let Some(parsed) = candidates.iter().flatten().find_map(|t| parse_money(t)) {
        return Some(parsed);
    }

    let raw = out_of_range.or_else(|| candidates.iter().flatten().next().map(|t| t.to_string()));
    if let Some(raw) = raw {
        debug!("Unparsable {} value {:?} in field {:?}", field, raw, cf.name);
        issues.push(ExtractionIssue {
            field,
            label: cf.name.clone(),
            raw,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn task_with(fields: Vec<CustomField>) -> RawTask {
        RawTask {
            name: "Leak repair".to_string(),
            custom_fields: fields,
            ..RawTask::default()
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_basic_mapping() {
        let task = task_with(vec![
            CustomField::display("CLIENTE", " Acme "),
            CustomField::number("VALOR APROBADO", dec("1000")),
            CustomField::number("GASTO MATERIALES", dec("200")),
            CustomField::number("GASTO LABOR", dec("100")),
            CustomField::choice("Prioridad", "High"),
            CustomField::display("WO #", "WO 77"),
        ]);

        let result = extract_fields(&task, &AliasTable::builtin());
        let f = result.fields;
        assert_eq!(f.client, "Acme");
        assert_eq!(f.approved_value, Some(dec("1000")));
        assert_eq!(f.materials_cost, Some(dec("200")));
        assert_eq!(f.labor_cost, Some(dec("100")));
        assert_eq!(f.priority, "High");
        assert_eq!(f.wo_number, "WO 77");
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_choice_prefers_option_and_text_prefers_display() {
        let cf = CustomField {
            name: "Estado".to_string(),
            display_value: Some("shown".to_string()),
            text_value: Some("raw".to_string()),
            enum_value: Some(crate::models::task::EnumOption {
                name: Some("In Progress".to_string()),
            }),
            ..CustomField::default()
        };
        assert_eq!(choice_text(&cf), "In Progress");
        assert_eq!(free_text(&cf), "shown");

        let zone_only_option = CustomField {
            name: "Zona".to_string(),
            enum_value: Some(crate::models::task::EnumOption {
                name: Some("Norte".to_string()),
            }),
            ..CustomField::default()
        };
        assert_eq!(zone_text(&zone_only_option), "Norte");
        assert_eq!(free_text(&zone_only_option), "");
    }

    #[test]
    fn test_money_from_text_when_no_number() {
        let task = task_with(vec![
            CustomField::display("Approved Value", "$1.234,50"),
            CustomField {
                name: "Labor Cost".to_string(),
                display_value: Some("TBD".to_string()),
                text_value: Some("300".to_string()),
                ..CustomField::default()
            },
        ]);

        let f = extract_fields(&task, &AliasTable::builtin()).fields;
        assert_eq!(f.approved_value, Some(dec("1234.50")));
        assert_eq!(f.labor_cost, Some(dec("300")));
    }

    #[test]
    fn test_unparsable_number_is_reported() {
        let task = task_with(vec![CustomField::display("Material Cost", "pending")]);

        let result = extract_fields(&task, &AliasTable::builtin());
        assert_eq!(result.fields.materials_cost, None);
        assert_eq!(
            result.issues,
            vec![ExtractionIssue {
                field: CanonicalField::MaterialsCost,
                label: "Material Cost".to_string(),
                raw: "pending".to_string(),
            }]
        );
    }

    #[test]
    fn test_out_of_range_native_number_is_reported() {
        let huge: CustomField =
            serde_json::from_str(r#"{"name": "Valor Aprobado", "number_value": 1e30}"#).unwrap();
        let with_text: CustomField = serde_json::from_str(
            r#"{"name": "Gasto Labor", "number_value": 1e30, "display_value": "$40.00"}"#,
        )
        .unwrap();

        let result = extract_fields(&task_with(vec![huge, with_text]), &AliasTable::builtin());
        assert_eq!(result.fields.approved_value, None);
        assert_eq!(result.fields.labor_cost, Some(dec("40.00")));
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].field, CanonicalField::ApprovedValue);
        assert_eq!(result.issues[0].label, "Valor Aprobado");
        assert!(result.issues[0].raw.starts_with("1e"));
    }

    #[test]
    fn test_absent_number_is_not_an_issue() {
        let task = task_with(vec![CustomField {
            name: "Gasto Labor".to_string(),
            ..CustomField::default()
        }]);
        let result = extract_fields(&task, &AliasTable::builtin());
        assert_eq!(result.fields.labor_cost, None);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_flags() {
        for (value, expected) in [("Sí", true), ("YES", true), ("1", true), (" paid ", true), ("no", false), ("", false)] {
            let task = task_with(vec![CustomField::choice("Pagado", value)]);
            assert_eq!(
                extract_fields(&task, &AliasTable::builtin()).fields.paid_flag,
                expected,
                "{value:?}"
            );
        }

        let task = task_with(vec![CustomField::display("Cancelada", "Canceled")]);
        assert!(extract_fields(&task, &AliasTable::builtin()).fields.canceled_flag);

        let task = task_with(vec![CustomField::display("Cancelada", "paid")]);
        assert!(!extract_fields(&task, &AliasTable::builtin()).fields.canceled_flag);
    }

    #[test]
    fn test_work_order_mined_from_name_when_missing() {
        let mut task = task_with(vec![]);
        task.name = "Bathroom WO 123-4/5 PRIORITY HIGH".to_string();
        assert_eq!(
            extract_fields(&task, &AliasTable::builtin()).fields.wo_number,
            "WO 123-4/5"
        );
    }

    #[test]
    fn test_later_field_overwrites_earlier() {
        let task = task_with(vec![
            CustomField::display("Client", "First"),
            CustomField::display("Customer", "Second"),
        ]);
        assert_eq!(extract_fields(&task, &AliasTable::builtin()).fields.client, "Second");
    }
}
