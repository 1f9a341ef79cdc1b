use hrdesk_auth::Role;
use hrdesk_router::RouteTable;

use super::controller;
use crate::middleware::{authenticated, roles};
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table.group(authenticated(), |t| {
        t.post("/api/attendance/check-in", controller::check_in)
            .post("/api/attendance/check-out", controller::check_out)
            .get("/api/attendance/currentuser", controller::current_user_status)
            .get("/api/attendance/history", controller::history);

        t.group(roles(&[Role::Admin]), |t| {
            t.get("/api/attendance/today", controller::today);
        });
    });
}
