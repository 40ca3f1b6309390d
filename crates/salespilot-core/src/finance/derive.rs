//! Derived financial metrics for one task.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::extract::CanonicalField;

/// Net value, cost and profit figures derived from a task's amounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Financials {
    pub approved_value: Decimal,
    pub fee_pct: Decimal,
    /// `approved_value × (1 − fee_pct)`.
    pub net_value: Decimal,
    pub materials_cost: Decimal,
    pub labor_cost: Decimal,
    /// `materials_cost + labor_cost`.
    pub total_cost: Decimal,
    /// `net_value − total_cost`.
    pub profit: Decimal,
    /// `profit / net_value`, zero when the net value is zero.
    pub profit_ratio: Decimal,
    /// Inputs replaced by zero because a derived figure overflowed, with the
    /// value that was dropped.
    #[serde(skip)]
    pub zeroed: Vec<(CanonicalField, Decimal)>,
}

impl Financials {
    /// Derive the figures. Missing amounts count as zero and negative costs
    /// are clamped to zero. Never fails: an input that would overflow a
    /// figure is zeroed and listed in `zeroed`.
    pub fn derive(
        approved_value: Option<Decimal>,
        fee_pct: Decimal,
        materials_cost: Option<Decimal>,
        labor_cost: Option<Decimal>,
    ) -> Self {
        let mut approved_value = approved_value.unwrap_or(Decimal::ZERO);
        let mut materials_cost = materials_cost.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
        let mut labor_cost = labor_cost.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
        let mut zeroed = Vec::new();

        let keep = Decimal::ONE.checked_sub(fee_pct).unwrap_or(Decimal::ONE);
        let net_value = match approved_value.checked_mul(keep) {
            Some(net) => net,
            None => {
                zeroed.push((CanonicalField::ApprovedValue, approved_value));
                approved_value = Decimal::ZERO;
                Decimal::ZERO
            }
        };

        let total_cost = match materials_cost.checked_add(labor_cost) {
            Some(total) => total,
            None => {
                zeroed.push((CanonicalField::LaborCost, labor_cost));
                labor_cost = Decimal::ZERO;
                materials_cost
            }
        };

        let (total_cost, profit) = match net_value.checked_sub(total_cost) {
            Some(profit) => (total_cost, profit),
            None => {
                for (field, cost) in [
                    (CanonicalField::MaterialsCost, materials_cost),
                    (CanonicalField::LaborCost, labor_cost),
                ] {
                    if !cost.is_zero() {
                        zeroed.push((field, cost));
                    }
                }
                materials_cost = Decimal::ZERO;
                labor_cost = Decimal::ZERO;
                (Decimal::ZERO, net_value)
            }
        };

        let profit_ratio = if net_value.is_zero() {
            Decimal::ZERO
        } else {
            profit.checked_div(net_value).unwrap_or(Decimal::ZERO)
        };

        for (field, value) in &zeroed {
            warn!("{} value {} overflows the derived figures, using 0", field, value);
        }

        Self {
            approved_value,
            fee_pct,
            net_value,
            materials_cost,
            labor_cost,
            total_cost,
            profit,
            profit_ratio,
            zeroed,
        }
    }
}
