use hrdesk_auth::Role;
use hrdesk_router::RouteTable;

use super::controller;
use crate::middleware::{authenticated, roles};
use crate::state::AppState;

pub fn register(table: &mut RouteTable<AppState>) {
    table.group(authenticated(), |t| {
        t.get("/api/users", controller::list_users)
            .get("/api/users/me", controller::get_me)
            .put("/api/users/me/password", controller::change_password)
            .get("/api/users/:id", controller::get_user);

        t.group(roles(&[Role::Admin]), |t| {
            t.post("/api/register", controller::register_user)
                .get("/api/users/blocked", controller::list_blocked_users)
                .put("/api/users/:id", controller::update_user)
                .delete("/api/users/:id", controller::delete_user)
                .put("/api/users/:id/block", controller::block_user)
                .put("/api/users/:id/unblock", controller::unblock_user);
        });
    });
}
