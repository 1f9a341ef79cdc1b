use hrdesk_router::RouteTable;

use super::controller;
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table.post("/api/auth/login", controller::login_user);
}
