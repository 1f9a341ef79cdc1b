use hrdesk_router::RouteTable;

use super::controller;
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table
        .get("/", controller::home)
        .get("/api", controller::api_index)
        .get("/api/test", controller::api_test)
        .get("/metrics", controller::metrics)
        .not_found(controller::not_found);
}
