use hrdesk_router::RouteTable;

use super::controller;
use crate::middleware::authenticated;
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table.group(authenticated(), |t| {
        t.post("/api/projects", controller::create_project)
            .get("/api/projects", controller::list_projects)
            .get("/api/projects/search", controller::search)
            .get("/api/projects/user/:user_id", controller::list_for_user)
            .get("/api/projects/manager/:manager_id", controller::list_for_manager)
            .get("/api/projects/:id", controller::get_project)
            .put("/api/projects/:id", controller::update_project)
            .delete("/api/projects/:id", controller::delete_project)
            .get("/api/projects/:id/progress", controller::get_progress);
    });
}
