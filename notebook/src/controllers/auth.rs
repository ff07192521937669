//! Sign-in gate: nothing reaches the notebook until the identity provider
//! has accepted the user.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, web};
use serde::Deserialize;

use super::{SESSION_COOKIE, current_workspace, html, see_other};
use crate::AppState;
use crate::auth::Workspace;
use crate::reconciler::Reconciler;
use crate::render;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .route(web::get().to(login_form))
            .route(web::post().to(login)),
    );
    cfg.service(web::resource("/logout").route(web::post().to(logout)));
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn login_form(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if current_workspace(&data, &req).is_some() {
        return see_other("/");
    }
    html(StatusCode::OK, render::login_page("", None))
}

async fn login(data: web::Data<AppState>, form: web::Form<LoginForm>) -> impl Responder {
    let form = form.into_inner();

    let session = match data.identity.sign_in(&form.username, &form.password).await {
        Ok(s) => s,
        Err(e) => {
            return html(
                StatusCode::UNAUTHORIZED,
                render::login_page(&form.username, Some(&e.to_string())),
            );
        }
    };

    let service = data.notes.for_session(&session);
    let workspace = Workspace::new(session, Reconciler::new(service));

    // Listing failures leave the list empty; the user still gets in.
    if let Err(e) = workspace.reconciler.initialize().await {
        workspace.set_notice(format!("Could not load notes: {}", e));
    }

    let (token, workspace) = data.sessions.open(workspace);
    log::info!("[WEB] {} signed in", workspace.username());

    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();

    let mut resp = see_other("/");
    if let Err(e) = resp.add_cookie(&cookie) {
        log::error!("[WEB] Failed to set session cookie: {}", e);
    }
    resp
}

async fn logout(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if data.sessions.close(cookie.value()) {
            log::info!("[WEB] Session signed out");
        }
    }

    let mut resp = see_other("/login");
    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();
    if let Err(e) = resp.add_cookie(&removal) {
        log::error!("[WEB] Failed to clear session cookie: {}", e);
    }
    resp
}
