//! Canonical field keys and the alias table that maps free-form custom
//! field labels onto them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::rules::normalize;
use crate::error::ConfigError;
use crate::models::config::MappingConfig;

/// Semantic keys a custom field can resolve to.
///
/// Declaration order is resolution priority: when a label matches aliases of
/// several keys, the earliest key wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Client,
    Zone,
    ApprovedValue,
    InvoiceDate,
    PaidFlag,
    PaidDate,
    PaidAmount,
    Priority,
    Status,
    CanceledFlag,
    CanceledDate,
    Type,
    WoNumber,
    MaterialsCost,
    LaborCost,
}

impl CanonicalField {
    /// Every key, in resolution priority order.
    pub const ALL: [CanonicalField; 15] = [
        CanonicalField::Client,
        CanonicalField::Zone,
        CanonicalField::ApprovedValue,
        CanonicalField::InvoiceDate,
        CanonicalField::PaidFlag,
        CanonicalField::PaidDate,
        CanonicalField::PaidAmount,
        CanonicalField::Priority,
        CanonicalField::Status,
        CanonicalField::CanceledFlag,
        CanonicalField::CanceledDate,
        CanonicalField::Type,
        CanonicalField::WoNumber,
        CanonicalField::MaterialsCost,
        CanonicalField::LaborCost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Client => "client",
            CanonicalField::Zone => "zone",
            CanonicalField::ApprovedValue => "approved_value",
            CanonicalField::InvoiceDate => "invoice_date",
            CanonicalField::PaidFlag => "paid_flag",
            CanonicalField::PaidDate => "paid_date",
            CanonicalField::PaidAmount => "paid_amount",
            CanonicalField::Priority => "priority",
            CanonicalField::Status => "status",
            CanonicalField::CanceledFlag => "canceled_flag",
            CanonicalField::CanceledDate => "canceled_date",
            CanonicalField::Type => "type",
            CanonicalField::WoNumber => "wo_number",
            CanonicalField::MaterialsCost => "materials_cost",
            CanonicalField::LaborCost => "labor_cost",
        }
    }

    /// Labels recognized out of the box (English and Spanish board setups).
    fn builtin_aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Client => &["CLIENTE", "CLIENT", "CLIENT NAME", "CLIENTE NOMBRE", "CUSTOMER"],
            CanonicalField::Zone => &["ZONA", "ZONE"],
            CanonicalField::ApprovedValue => &[
                "VALOR APROBADO",
                "VALOR TOTAL",
                "APPROVED AMOUNT",
                "AMOUNT APPROVED",
                "APPROVED VALUE",
            ],
            CanonicalField::InvoiceDate => &["FECHA DE INVOICE", "FECHA FACTURA", "INVOICE ENVIADO", "INVOICE DATE"],
            CanonicalField::PaidFlag => &["PAGADO", "PAID"],
            CanonicalField::PaidDate => &["FECHA DE PAGO", "PAID DATE"],
            CanonicalField::PaidAmount => &["MONTO PAGADO", "PAGADO (MONTO)", "PAID AMOUNT"],
            CanonicalField::Priority => &["PRIORITY", "PRIORIDAD"],
            CanonicalField::Status => &["STATUS", "ESTADO", "ESTATUS"],
            CanonicalField::CanceledFlag => &["CANCELADA", "CANCELED"],
            CanonicalField::CanceledDate => &["FECHA DE CANCELACION", "FECHA DE CANCELACIÓN", "CANCEL DATE"],
            CanonicalField::Type => &["TIPO", "TYPE"],
            CanonicalField::WoNumber => &["WO #", "WO", "WORK ORDER"],
            CanonicalField::MaterialsCost => &["GASTO MATERIALES", "MATERIALES", "MATERIAL COST", "COSTO MATERIALES"],
            CanonicalField::LaborCost => &[
                "GASTO LABOR",
                "GATOS LABOR",
                "GASTO MANO DE OBRA",
                "LABOR COST",
                "MANO DE OBRA",
                "GASTO LABOUR",
                "GASTOS LABOR",
            ],
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CanonicalField::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownField(s.to_string()))
    }
}

/// Ordered (key, aliases) pairs. Aliases are stored normalized.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<(CanonicalField, Vec<String>)>,
}

impl AliasTable {
    /// The built-in table.
    pub fn builtin() -> Self {
        let entries = CanonicalField::ALL
            .into_iter()
            .map(|field| (field, Vec::new()))
            .collect();
        let mut table = Self { entries };
        for field in CanonicalField::ALL {
            table.add_aliases(field, field.builtin_aliases());
        }
        table
    }

    /// Built-in table extended with the aliases from a mapping config.
    pub fn from_config(mapping: &MappingConfig) -> Result<Self, ConfigError> {
        let mut table = Self::builtin();
        for (name, aliases) in &mapping.extra_aliases {
            let field: CanonicalField = name.parse()?;
            table.add_aliases(field, aliases);
        }
        Ok(table)
    }

    /// Append aliases for a key. Blank and duplicate aliases are dropped.
    pub fn with_aliases<I, S>(mut self, field: CanonicalField, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_aliases(field, aliases);
        self
    }

    fn add_aliases<I, S>(&mut self, field: CanonicalField, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some((_, known)) = self.entries.iter_mut().find(|(f, _)| *f == field) else {
            return;
        };
        for alias in aliases {
            let alias = normalize(alias.as_ref());
            if !alias.is_empty() && !known.contains(&alias) {
                known.push(alias);
            }
        }
    }

    /// Normalized aliases registered for a key.
    pub fn aliases(&self, field: CanonicalField) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, a)| a.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a normalized label denotes `field`: exact alias match, or any
    /// alias contained in the label.
    pub fn resolves(&self, normalized_label: &str, field: CanonicalField) -> bool {
        let aliases = self.aliases(field);
        aliases.iter().any(|a| a == normalized_label)
            || aliases.iter().any(|a| normalized_label.contains(a.as_str()))
    }

    /// Resolve a raw label to the first key, in priority order, that it
    /// denotes.
    pub fn resolve(&self, label: &str) -> Option<CanonicalField> {
        let normalized = normalize(label);
        if normalized.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .map(|(field, _)| *field)
            .find(|field| self.resolves(&normalized, *field))
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_exact_and_accented_labels() {
        let table = AliasTable::builtin();
        assert_eq!(table.resolve("Cliente"), Some(CanonicalField::Client));
        assert_eq!(table.resolve("Valor Aprobado"), Some(CanonicalField::ApprovedValue));
        assert_eq!(table.resolve("Fecha de Cancelación"), Some(CanonicalField::CanceledDate));
        assert_eq!(table.resolve("Gasto Mano de Obra"), Some(CanonicalField::LaborCost));
        assert_eq!(table.resolve("Tipo"), Some(CanonicalField::Type));
        assert_eq!(table.resolve("Notes"), None);
        assert_eq!(table.resolve(""), None);
    }

    #[test]
    fn test_substring_catches_suffixed_labels() {
        let table = AliasTable::builtin();
        assert_eq!(table.resolve("ZONA (FL)"), Some(CanonicalField::Zone));
        assert_eq!(table.resolve("Gasto Materiales USD"), Some(CanonicalField::MaterialsCost));
    }

    // Containment is permissive; these document where it over-matches.
    #[test]
    fn test_containment_prefers_earlier_keys() {
        let table = AliasTable::builtin();

        // "PAID" is contained in both labels and paid_flag outranks them
        assert_eq!(table.resolve("Paid Amount"), Some(CanonicalField::PaidFlag));
        assert_eq!(table.resolve("Paid Date"), Some(CanonicalField::PaidFlag));
        assert_eq!(table.resolve("Monto Pagado"), Some(CanonicalField::PaidFlag));

        // Spanish date label has no "PAGADO" in it
        assert_eq!(table.resolve("Fecha de Pago"), Some(CanonicalField::PaidDate));

        // "WO" inside an unrelated word
        assert_eq!(table.resolve("Network"), Some(CanonicalField::WoNumber));

        // "CLIENT" outranks "TYPE"
        assert_eq!(table.resolve("Client Type"), Some(CanonicalField::Client));
    }

    #[test]
    fn test_resolves_checks_one_key() {
        let table = AliasTable::builtin();
        assert!(table.resolves("PAID AMOUNT", CanonicalField::PaidAmount));
        assert!(table.resolves("PAID AMOUNT", CanonicalField::PaidFlag));
        assert!(!table.resolves("PAID AMOUNT", CanonicalField::Client));
    }

    #[test]
    fn test_builtin_aliases_are_normalized_and_unique() {
        let table = AliasTable::builtin();
        assert_eq!(
            table.aliases(CanonicalField::CanceledDate),
            &["FECHA DE CANCELACION".to_string(), "CANCEL DATE".to_string()]
        );
    }

    #[test]
    fn test_extra_aliases_from_config() {
        let mut mapping = MappingConfig::default();
        mapping
            .extra_aliases
            .insert("client".to_string(), vec!["Comprador".to_string(), " ".to_string()]);
        let table = AliasTable::from_config(&mapping).unwrap();
        assert_eq!(table.resolve("COMPRADOR"), Some(CanonicalField::Client));
        assert_eq!(table.aliases(CanonicalField::Client).len(), 6);

        let mut bad = MappingConfig::default();
        bad.extra_aliases = BTreeMap::from([("budget".to_string(), vec!["X".to_string()])]);
        assert!(matches!(
            AliasTable::from_config(&bad),
            Err(ConfigError::UnknownField(_))
        ));
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in CanonicalField::ALL {
            assert_eq!(field.as_str().parse::<CanonicalField>().unwrap(), field);
        }
    }
}
