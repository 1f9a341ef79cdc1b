pub mod attendance;
pub mod auth;
pub mod chat;
pub mod leave;
pub mod notifications;
pub mod payroll;
pub mod project_members;
pub mod projects;
pub mod reviews;
pub mod tasks;
pub mod users;
pub mod web;

use hrdesk_router::RouteTable;

use crate::state::AppState;

/// Registers every feature module's routes on `table`.
pub fn register_all(table: &mut RouteTable<AppState>) {
    web::router::register(table);
    auth::router::register(table);
    users::router::register(table);
    attendance::router::register(table);
    leave::router::register(table);
    payroll::router::register(table);
    projects::router::register(table);
    project_members::router::register(table);
    tasks::router::register(table);
    reviews::router::register(table);
    notifications::router::register(table);
    chat::router::register(table);
}
