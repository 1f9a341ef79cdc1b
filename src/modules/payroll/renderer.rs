//! Payslip rendering for the export endpoint.

use hrdesk_core::AppError;

use super::model::PayrollWithEmployee;

/// Turns a payroll row into a downloadable document.
pub trait PayslipRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn extension(&self) -> &'static str;

    fn render(&self, payslip: &PayrollWithEmployee) -> Result<Vec<u8>, AppError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPayslipRenderer;

impl PayslipRenderer for HtmlPayslipRenderer {
    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    fn render(&self, payslip: &PayrollWithEmployee) -> Result<Vec<u8>, AppError> {
        let p = &payslip.payroll;
        let rows = [
            ("Base salary", p.base_salary),
            ("Allowances", p.allowances),
            ("Other deductions", p.deductions),
            ("Social insurance", p.social_insurance),
            ("Health insurance", p.health_insurance),
            ("Unemployment insurance", p.unemployment_insurance),
            ("Personal income tax", p.personal_income_tax),
            ("Total deductions", p.total_deductions),
            ("Net salary", p.net_salary),
        ];

        let mut html = String::from(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Payslip</title></head><body>\n<h1>Payslip</h1>\n",
        );
        html.push_str(&format!(
            "<p>Employee: {}</p>\n<p>Email: {}</p>\n<p>Period: {} (region {})</p>\n<table>\n",
            escape_html(payslip.full_name.as_deref().unwrap_or("")),
            escape_html(payslip.email.as_deref().unwrap_or("")),
            escape_html(&p.pay_period),
            escape_html(&p.region),
        ));
        for (label, amount) in rows {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                label,
                format_vnd(amount)
            ));
        }
        html.push_str("</table>\n</body></html>\n");

        Ok(html.into_bytes())
    }
}

/// Formats whole dong with `.` as the thousands separator, e.g. `1.250.000 VND`.
pub fn format_vnd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped} VND")
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
