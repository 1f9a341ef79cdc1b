use hrdesk_router::RouteTable;

use super::controller;
use crate::middleware::authenticated;
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table.group(authenticated(), |t| {
        t.post("/api/tasks", controller::create_task)
            .get("/api/tasks", controller::list_tasks)
            .get("/api/tasks/project/:project_id", controller::list_for_project)
            .get("/api/tasks/user/:user_id", controller::list_for_user)
            .get("/api/tasks/:id", controller::get_task)
            .delete("/api/tasks/:id", controller::delete_task)
            .put("/api/tasks/:id/status", controller::update_status)
            .put("/api/tasks/:id/priority", controller::update_priority)
            .put("/api/tasks/:id/assignee", controller::change_assignee);
    });
}
