//! Age rebates and medical scheme fees tax credits.

use rust_decimal::Decimal;

use crate::config::{MedicalCreditTable, RebateTable};

/// Returns the annual rebate for an age.
///
/// Every taxpayer gets the primary rebate. The secondary rebate is added from
/// `secondary_age` (65) and the tertiary rebate from `tertiary_age` (75).
pub fn age_rebate(age: u32, table: &RebateTable) -> Decimal {
    let mut rebate = table.primary;
    if age >= table.secondary_age {
        rebate += table.secondary;
    }
    if age >= table.tertiary_age {
        rebate += table.tertiary;
    }
    rebate
}

/// Returns the monthly medical scheme fees tax credit.
///
/// A member alone receives the main member credit. With dependants the first
/// dependant adds `first_dependant` and each further one adds
/// `additional_dependant`.
///
/// # Examples
///
/// ```
/// use estimator_engine::calculation::medical_credit;
/// use estimator_engine::config::MedicalCreditTable;
/// use rust_decimal_macros::dec;
///
/// let table = MedicalCreditTable {
///     main_member: dec!(364),
///     first_dependant: dec!(364),
///     additional_dependant: dec!(246),
/// };
///
/// assert_eq!(medical_credit(0, &table), dec!(364));
/// assert_eq!(medical_credit(3, &table), dec!(1220));
/// ```
pub fn medical_credit(dependants: u32, table: &MedicalCreditTable) -> Decimal {
    match dependants {
        0 => table.main_member,
        n => {
            table.main_member
                + table.first_dependant
                + table.additional_dependant * Decimal::from(n - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rebates() -> RebateTable {
        RebateTable {
            primary: dec!(17235),
            secondary: dec!(9444),
            tertiary: dec!(3145),
            secondary_age: 65,
            tertiary_age: 75,
        }
    }

    #[test]
    fn test_primary_rebate_under_65() {
        assert_eq!(age_rebate(35, &rebates()), dec!(17235));
        assert_eq!(age_rebate(64, &rebates()), dec!(17235));
    }

    #[test]
    fn test_secondary_rebate_from_65() {
        assert_eq!(age_rebate(65, &rebates()), dec!(26679));
        assert_eq!(age_rebate(74, &rebates()), dec!(26679));
    }

    #[test]
    fn test_tertiary_rebate_from_75() {
        assert_eq!(age_rebate(75, &rebates()), dec!(29824));
    }

    #[test]
    fn test_medical_credit_with_one_dependant() {
        let table = MedicalCreditTable {
            main_member: dec!(364),
            first_dependant: dec!(364),
            additional_dependant: dec!(246),
        };
        assert_eq!(medical_credit(1, &table), dec!(728));
    }
}
