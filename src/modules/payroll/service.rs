use anyhow::Context;
use data_encoding::BASE64;
use hrdesk_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    CreatePayrollDto, Payroll, PayrollFigures, PayrollWithEmployee, PayslipExport,
    UpdatePayrollDto,
};
use super::renderer::PayslipRenderer;

const PAYROLL_COLUMNS: &str = "id, employee_id, base_salary, allowances, deductions, \
    social_insurance, health_insurance, unemployment_insurance, personal_income_tax, \
    total_deductions, net_salary, pay_period, region, status, created_at, updated_at";
const JOINED_COLUMNS: &str = "p.id, p.employee_id, p.base_salary, p.allowances, p.deductions, \
    p.social_insurance, p.health_insurance, p.unemployment_insurance, p.personal_income_tax, \
    p.total_deductions, p.net_salary, p.pay_period, p.region, p.status, p.created_at, \
    p.updated_at, u.full_name, u.email";

fn payroll_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Payroll not found"))
}

pub struct PayrollService;

impl PayrollService {
    #[instrument(skip(db, dto), fields(employee_id = %dto.employee_id))]
    pub async fn create_payroll(db: &PgPool, dto: CreatePayrollDto) -> Result<Payroll, AppError> {
        let f = PayrollFigures::compute(&dto.amounts)?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND is_deleted = false)",
        )
        .bind(dto.employee_id)
        .fetch_one(db)
        .await
        .context("Failed to check employee")
        .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Employee not found")));
        }

        let query = format!(
            "INSERT INTO payrolls (employee_id, base_salary, allowances, deductions, \
             social_insurance, health_insurance, unemployment_insurance, personal_income_tax, \
             total_deductions, net_salary, pay_period, region, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {PAYROLL_COLUMNS}"
        );

        sqlx::query_as::<_, Payroll>(&query)
            .bind(dto.employee_id)
            .bind(f.base_salary)
            .bind(f.allowances)
            .bind(f.deductions)
            .bind(f.social_insurance)
            .bind(f.health_insurance)
            .bind(f.unemployment_insurance)
            .bind(f.personal_income_tax)
            .bind(f.total_deductions)
            .bind(f.net_salary)
            .bind(&f.pay_period)
            .bind(&f.region)
            .bind(&f.status)
            .fetch_one(db)
            .await
            .context("Failed to create payroll")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_payrolls(db: &PgPool) -> Result<Vec<PayrollWithEmployee>, AppError> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM payrolls p \
             LEFT JOIN users u ON p.employee_id = u.id \
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, PayrollWithEmployee>(&query)
            .fetch_all(db)
            .await
            .context("Failed to fetch payrolls")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_payroll(db: &PgPool, id: Uuid) -> Result<PayrollWithEmployee, AppError> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM payrolls p \
             LEFT JOIN users u ON p.employee_id = u.id \
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, PayrollWithEmployee>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch payroll")
            .map_err(AppError::database)?
            .ok_or_else(payroll_not_found)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_payroll(
        db: &PgPool,
        id: Uuid,
        dto: UpdatePayrollDto,
    ) -> Result<Payroll, AppError> {
        let f = PayrollFigures::compute(&dto)?;
        let query = format!(
            "UPDATE payrolls SET base_salary = $2, allowances = $3, deductions = $4, \
             social_insurance = $5, health_insurance = $6, unemployment_insurance = $7, \
             personal_income_tax = $8, total_deductions = $9, net_salary = $10, \
             pay_period = $11, region = $12, status = $13, updated_at = NOW() \
             WHERE id = $1 RETURNING {PAYROLL_COLUMNS}"
        );

        sqlx::query_as::<_, Payroll>(&query)
            .bind(id)
            .bind(f.base_salary)
            .bind(f.allowances)
            .bind(f.deductions)
            .bind(f.social_insurance)
            .bind(f.health_insurance)
            .bind(f.unemployment_insurance)
            .bind(f.personal_income_tax)
            .bind(f.total_deductions)
            .bind(f.net_salary)
            .bind(&f.pay_period)
            .bind(&f.region)
            .bind(&f.status)
            .fetch_optional(db)
            .await
            .context("Failed to update payroll")
            .map_err(AppError::database)?
            .ok_or_else(payroll_not_found)
    }

    #[instrument(skip(db))]
    pub async fn delete_payroll(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM payrolls WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete payroll")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(payroll_not_found());
        }

        Ok(())
    }

    #[instrument(skip(db, renderer))]
    pub async fn export_payslip(
        db: &PgPool,
        id: Uuid,
        renderer: &dyn PayslipRenderer,
    ) -> Result<PayslipExport, AppError> {
        let payslip = Self::get_payroll(db, id).await?;
        let document = renderer.render(&payslip)?;

        Ok(PayslipExport {
            success: true,
            data: BASE64.encode(&document),
            filename: format!("payroll_{}.{}", id, renderer.extension()),
            content_type: renderer.content_type(),
        })
    }
}
