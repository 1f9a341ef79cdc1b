use hrdesk_router::RouteTable;

use super::controller;
use crate::middleware::authenticated;
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table.group(authenticated(), |t| {
        t.post("/api/project-members", controller::add_member)
            .get("/api/project-members", controller::list_members)
            .delete("/api/project-members", controller::remove_member)
            .get("/api/project-members/user/:user_id", controller::member_projects)
            .get("/api/project-members/:project_id", controller::project_members);
    });
}
