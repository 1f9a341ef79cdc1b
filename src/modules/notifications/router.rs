use hrdesk_router::RouteTable;

use super::controller;
use crate::middleware::authenticated;
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table.group(authenticated(), |t| {
        t.get("/api/notifications", controller::list_notifications)
            .put("/api/notifications/:id/read", controller::mark_read);
    });
}
