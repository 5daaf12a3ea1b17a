use axum::routing::get;
use axum::Router;

use crate::app_state::AppState;

mod contacts;
mod health;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route("/contacts/all", get(contacts::list_all_contacts))
        .route("/contacts/search", get(contacts::search_contacts))
        .route(
            "/contacts/upcoming_birthdays",
            get(contacts::upcoming_birthdays),
        )
        .route(
            "/contacts/:id",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        .with_state(state)
}
