use hrdesk_auth::Role;
use hrdesk_router::RouteTable;

use super::controller;
use crate::middleware::{authenticated, roles};
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table.group(authenticated(), |t| {
        t.post("/api/leave/request", controller::request_leave)
            .get("/api/leave/balance", controller::get_balance)
            .get("/api/leave/my-requests", controller::my_requests);

        t.group(roles(&[Role::Admin, Role::Manager]), |t| {
            t.post("/api/leave/process", controller::process_request)
                .get("/api/leave/all", controller::list_requests);
        });

        t.group(roles(&[Role::Admin]), |t| {
            t.post("/api/leave/initialize-balance", controller::initialize_balance);
        });
    });
}
