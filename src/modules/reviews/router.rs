use hrdesk_auth::Role;
use hrdesk_router::RouteTable;

use super::controller;
use crate::middleware::{authenticated, roles};
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table.group(authenticated(), |t| {
        t.get("/api/pr", controller::list_reviews)
            .get("/api/pr/user/:user_id", controller::list_for_user)
            .get("/api/pr/reviewer/:reviewer_id", controller::list_by_reviewer)
            .get("/api/pr/stats/monthly/:year/:month", controller::monthly_stats)
            .get("/api/pr/stats/quarterly/:year/:quarter", controller::quarterly_stats)
            .get("/api/pr/stats/yearly/:year", controller::yearly_stats)
            .get("/api/pr/:id", controller::get_review);

        t.group(roles(&[Role::Admin, Role::Manager]), |t| {
            t.post("/api/pr", controller::create_review)
                .put("/api/pr/:id", controller::update_review)
                .delete("/api/pr/:id", controller::delete_review);
        });
    });
}
