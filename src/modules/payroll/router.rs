use hrdesk_auth::Role;
use hrdesk_router::RouteTable;

use super::controller;
use crate::middleware::{authenticated, roles};
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table.group(authenticated(), |t| {
        t.group(roles(&[Role::Admin, Role::Accountant]), |t| {
            t.post("/api/payroll/create", controller::create_payroll)
                .get("/api/payroll/all", controller::list_payrolls)
                .put("/api/payroll/update/:id", controller::update_payroll)
                .delete("/api/payroll/delete/:id", controller::delete_payroll);
        });

        t.get("/api/payroll/:id", controller::get_payroll)
            .get("/api/payroll/export/:id", controller::export_payslip);
    });
}
