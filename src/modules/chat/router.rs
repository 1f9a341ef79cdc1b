use hrdesk_router::RouteTable;

use super::controller;
use crate::middleware::authenticated;
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table.group(authenticated(), |t| {
        t.post("/api/chat/send", controller::send_message)
            .get("/api/chat/messages", controller::get_messages);
    });
}
