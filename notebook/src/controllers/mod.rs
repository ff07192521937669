use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::AppState;
use crate::auth::Workspace;

pub mod auth;
pub mod health;
pub mod notebook;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "notebook_session";

pub fn configure(cfg: &mut web::ServiceConfig) {
    health::config_routes(cfg);
    auth::config_routes(cfg);
    notebook::config_routes(cfg);
}

/// Workspace of the signed-in user making this request, if any.
pub(crate) fn current_workspace(state: &AppState, req: &HttpRequest) -> Option<Arc<Workspace>> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    state.sessions.get(cookie.value())
}

/// 303 so the browser follows up with a GET
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}
