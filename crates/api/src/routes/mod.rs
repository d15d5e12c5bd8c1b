pub mod auth;
pub mod health;
pub mod notes;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                  register (public)
/// /auth/login                     login (public)
/// /auth/validate                  validate (bearer token)
/// /auth/logout                    logout (bearer token, optional)
///
/// /notes                          list (?archived, ?tag), create
/// /notes/{id}                     get, update, delete
///
/// /tags                           list, create
/// /tags/{id}                      get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/notes", notes::router())
        .nest("/tags", tags::router())
}
