pub mod lots;
pub mod reservations;
pub mod users;
pub mod web;

use axum::Router;

pub fn routes() -> Router<crate::AppState> {
    let api = Router::new()
        .merge(users::routes())
        .merge(lots::routes())
        .merge(reservations::routes());

    Router::new().nest("/api", api).merge(web::routes())
}
