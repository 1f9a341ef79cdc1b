use chrono::{DateTime, Utc};
use hrdesk_core::AppError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PAY_PERIOD: &str = "Monthly";
pub const DEFAULT_REGION: &str = "I";
pub const DEFAULT_STATUS: &str = "Completed";

/// Statutory rates in basis points of the base salary.
pub const SOCIAL_INSURANCE_BPS: i64 = 800;
pub const HEALTH_INSURANCE_BPS: i64 = 150;
pub const UNEMPLOYMENT_INSURANCE_BPS: i64 = 100;
pub const PERSONAL_INCOME_TAX_BPS: i64 = 1000;

/// Largest amount accepted in any payroll field, in VND.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payroll {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub base_salary: i64,
    pub allowances: i64,
    pub deductions: i64,
    pub social_insurance: i64,
    pub health_insurance: i64,
    pub unemployment_insurance: i64,
    pub personal_income_tax: i64,
    pub total_deductions: i64,
    pub net_salary: i64,
    pub pay_period: String,
    pub region: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PayrollWithEmployee {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payroll: Payroll,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Amounts and labels a client may send when creating or updating a payroll.
///
/// Statutory fields left out are derived from `base_salary`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PayrollAmounts {
    #[validate(range(
        min = 0_i64,
        max = 1_000_000_000_000_i64,
        message = "base_salary must be between 0 and 1000000000000"
    ))]
    pub base_salary: i64,
    #[validate(range(
        min = 0_i64,
        max = 1_000_000_000_000_i64,
        message = "allowances must be between 0 and 1000000000000"
    ))]
    pub allowances: Option<i64>,
    #[validate(range(
        min = 0_i64,
        max = 1_000_000_000_000_i64,
        message = "deductions must be between 0 and 1000000000000"
    ))]
    pub deductions: Option<i64>,
    #[validate(range(
        min = 0_i64,
        max = 1_000_000_000_000_i64,
        message = "social_insurance must be between 0 and 1000000000000"
    ))]
    pub social_insurance: Option<i64>,
    #[validate(range(
        min = 0_i64,
        max = 1_000_000_000_000_i64,
        message = "health_insurance must be between 0 and 1000000000000"
    ))]
    pub health_insurance: Option<i64>,
    #[validate(range(
        min = 0_i64,
        max = 1_000_000_000_000_i64,
        message = "unemployment_insurance must be between 0 and 1000000000000"
    ))]
    pub unemployment_insurance: Option<i64>,
    #[validate(range(
        min = 0_i64,
        max = 1_000_000_000_000_i64,
        message = "personal_income_tax must be between 0 and 1000000000000"
    ))]
    pub personal_income_tax: Option<i64>,
    pub pay_period: Option<String>,
    pub region: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePayrollDto {
    pub employee_id: Uuid,
    #[serde(flatten)]
    #[validate(nested)]
    pub amounts: PayrollAmounts,
}

pub type UpdatePayrollDto = PayrollAmounts;

/// Fully resolved figures ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollFigures {
    pub base_salary: i64,
    pub allowances: i64,
    pub deductions: i64,
    pub social_insurance: i64,
    pub health_insurance: i64,
    pub unemployment_insurance: i64,
    pub personal_income_tax: i64,
    pub total_deductions: i64,
    pub net_salary: i64,
    pub pay_period: String,
    pub region: String,
    pub status: String,
}

/// `amount * bps / 10_000`, rounded half up. `None` on overflow.
fn rate_of(amount: i64, bps: i64) -> Option<i64> {
    amount
        .checked_mul(bps)?
        .checked_add(5_000)
        .map(|scaled| scaled / 10_000)
}

fn statutory(value: Option<i64>, base: i64, bps: i64) -> Option<i64> {
    value.or_else(|| rate_of(base, bps))
}

fn too_large() -> AppError {
    AppError::bad_request(anyhow::anyhow!("Payroll amounts are too large"))
}

impl PayrollFigures {
    /// Resolves the statutory fields and totals.
    ///
    /// Fails with 400 when the figures do not fit in an `i64`.
    pub fn compute(amounts: &PayrollAmounts) -> Result<Self, AppError> {
        let base = amounts.base_salary;
        let allowances = amounts.allowances.unwrap_or(0);
        let deductions = amounts.deductions.unwrap_or(0);

        let social_insurance = statutory(amounts.social_insurance, base, SOCIAL_INSURANCE_BPS)
            .ok_or_else(too_large)?;
        let health_insurance = statutory(amounts.health_insurance, base, HEALTH_INSURANCE_BPS)
            .ok_or_else(too_large)?;
        let unemployment_insurance = statutory(
            amounts.unemployment_insurance,
            base,
            UNEMPLOYMENT_INSURANCE_BPS,
        )
        .ok_or_else(too_large)?;
        let personal_income_tax =
            statutory(amounts.personal_income_tax, base, PERSONAL_INCOME_TAX_BPS)
                .ok_or_else(too_large)?;

        let total_deductions = [
            health_insurance,
            unemployment_insurance,
            personal_income_tax,
            deductions,
        ]
        .into_iter()
        .try_fold(social_insurance, i64::checked_add)
        .ok_or_else(too_large)?;

        let net_salary = base
            .checked_add(allowances)
            .and_then(|gross| gross.checked_sub(total_deductions))
            .ok_or_else(too_large)?;

        Ok(Self {
            base_salary: base,
            allowances,
            deductions,
            social_insurance,
            health_insurance,
            unemployment_insurance,
            personal_income_tax,
            total_deductions,
            net_salary,
            pay_period: amounts
                .pay_period
                .clone()
                .unwrap_or_else(|| DEFAULT_PAY_PERIOD.to_string()),
            region: amounts
                .region
                .clone()
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            status: amounts
                .status
                .clone()
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        })
    }
}

/// Base64 payslip handed back by the export endpoint.
#[derive(Debug, Serialize)]
pub struct PayslipExport {
    pub success: bool,
    pub data: String,
    pub filename: String,
    pub content_type: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(base: i64) -> PayrollAmounts {
        PayrollAmounts {
            base_salary: base,
            ..Default::default()
        }
    }

    #[test]
    fn test_statutory_fields_are_derived_from_base() {
        let figures = PayrollFigures::compute(&amounts(10_000_000)).unwrap();
        assert_eq!(figures.social_insurance, 800_000);
        assert_eq!(figures.health_insurance, 150_000);
        assert_eq!(figures.unemployment_insurance, 100_000);
        assert_eq!(figures.personal_income_tax, 1_000_000);
        assert_eq!(figures.total_deductions, 2_050_000);
        assert_eq!(figures.net_salary, 7_950_000);
    }

    #[test]
    fn test_defaults_for_labels() {
        let figures = PayrollFigures::compute(&amounts(1)).unwrap();
        assert_eq!(figures.pay_period, "Monthly");
        assert_eq!(figures.region, "I");
        assert_eq!(figures.status, "Completed");
    }

    #[test]
    fn test_client_values_override_rates() {
        let figures = PayrollFigures::compute(&PayrollAmounts {
            base_salary: 20_000_000,
            allowances: Some(1_000_000),
            deductions: Some(500_000),
            personal_income_tax: Some(0),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(figures.personal_income_tax, 0);
        assert_eq!(figures.total_deductions, 1_600_000 + 300_000 + 200_000 + 500_000);
        assert_eq!(
            figures.net_salary,
            20_000_000 + 1_000_000 - figures.total_deductions
        );
    }

    #[test]
    fn test_rates_round_half_up() {
        // 1.5% of 33 is 0.495, 1% of 50 is 0.5
        assert_eq!(rate_of(33, HEALTH_INSURANCE_BPS), Some(0));
        assert_eq!(rate_of(50, UNEMPLOYMENT_INSURANCE_BPS), Some(1));
    }

    #[test]
    fn test_amounts_above_ceiling_are_invalid() {
        assert!(amounts(MAX_AMOUNT).validate().is_ok());
        assert!(amounts(MAX_AMOUNT + 1).validate().is_err());
        assert!(amounts(10_000_000_000_000_000).validate().is_err());

        let negative_override = PayrollAmounts {
            base_salary: 10_000_000,
            personal_income_tax: Some(-5_000_000),
            ..Default::default()
        };
        assert!(negative_override.validate().is_err());

        let huge_allowance = PayrollAmounts {
            base_salary: 10_000_000,
            allowances: Some(MAX_AMOUNT + 1),
            ..Default::default()
        };
        assert!(huge_allowance.validate().is_err());
    }

    #[test]
    fn test_largest_valid_amounts_compute() {
        let figures = PayrollFigures::compute(&PayrollAmounts {
            base_salary: MAX_AMOUNT,
            allowances: Some(MAX_AMOUNT),
            deductions: Some(MAX_AMOUNT),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(figures.social_insurance, 80_000_000_000);
        assert_eq!(figures.total_deductions, 1_205_000_000_000);
        assert_eq!(figures.net_salary, 795_000_000_000);
    }

    #[test]
    fn test_overflowing_base_is_rejected_not_panicking() {
        let err = PayrollFigures::compute(&amounts(10_000_000_000_000_000)).unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert_eq!(err.public_message(), "Payroll amounts are too large");

        let err = PayrollFigures::compute(&PayrollAmounts {
            base_salary: i64::MAX,
            social_insurance: Some(0),
            health_insurance: Some(0),
            unemployment_insurance: Some(0),
            personal_income_tax: Some(0),
            allowances: Some(1),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }

    #[test]
    fn test_create_dto_reads_flattened_amounts() {
        let dto: CreatePayrollDto = serde_json::from_value(serde_json::json!({
            "employee_id": "00000000-0000-0000-0000-000000000001",
            "base_salary": 5_000_000,
            "region": "II"
        }))
        .unwrap();
        assert_eq!(dto.amounts.base_salary, 5_000_000);
        assert_eq!(dto.amounts.region.as_deref(), Some("II"));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_negative_base_is_invalid() {
        assert!(amounts(-1).validate().is_err());
    }
}
