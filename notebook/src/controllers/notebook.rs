//! Notebook page and the user intents it posts back.
//!
//! Each intent runs one reconciler operation, stores any error as a notice
//! and redirects back to the page.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use notebook_types::{RpcResponse, ViewSnapshot};
use serde::Deserialize;
use std::sync::Arc;

use super::{current_workspace, html, see_other};
use crate::AppState;
use crate::auth::Workspace;
use crate::error::Result;
use crate::render;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(notebook_page)));
    cfg.service(web::resource("/notes").route(web::post().to(submit_note)));
    cfg.service(web::resource("/notes/{id}/select").route(web::post().to(select_note)));
    cfg.service(web::resource("/notes/{id}/delete").route(web::post().to(delete_note)));
    cfg.service(web::resource("/api/notes").route(web::get().to(notes_snapshot)));
}

#[derive(Debug, Deserialize)]
struct NoteForm {
    #[serde(default)]
    text: String,
}

/// Keep the outcome of an intent for the next render.
fn report(workspace: &Workspace, action: &str, result: Result<()>) {
    if let Err(e) = result {
        if e.is_user_error() {
            log::debug!("[WEB] {} for {}: {}", action, workspace.username(), e);
        } else {
            log::warn!("[WEB] {} for {} failed: {}", action, workspace.username(), e);
        }
        workspace.set_notice(e.to_string());
    }
}

fn signed_in(data: &AppState, req: &HttpRequest) -> std::result::Result<Arc<Workspace>, HttpResponse> {
    current_workspace(data, req).ok_or_else(|| see_other("/login"))
}

async fn notebook_page(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let workspace = match signed_in(&data, &req) {
        Ok(w) => w,
        Err(resp) => return resp,
    };

    let notice = workspace.take_notice();
    let view = workspace.reconciler.snapshot();
    html(
        StatusCode::OK,
        render::notebook_page(workspace.username(), &view, notice.as_deref()),
    )
}

async fn submit_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<NoteForm>,
) -> impl Responder {
    let workspace = match signed_in(&data, &req) {
        Ok(w) => w,
        Err(resp) => return resp,
    };

    let result = workspace.reconciler.submit(&form.text).await;
    report(&workspace, "Submit", result);
    see_other("/")
}

async fn select_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let workspace = match signed_in(&data, &req) {
        Ok(w) => w,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    match workspace.reconciler.note(&id) {
        Some(note) => {
            let result = workspace.reconciler.select(&note);
            report(&workspace, "Select", result);
        }
        None => {
            log::warn!("[WEB] Select of unknown note {}", id);
            workspace.set_notice("That note is no longer in the list");
        }
    }
    see_other("/")
}

async fn delete_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let workspace = match signed_in(&data, &req) {
        Ok(w) => w,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    let result = workspace.reconciler.remove(&id).await;
    report(&workspace, "Delete", result);
    see_other("/")
}

async fn notes_snapshot(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    match current_workspace(&data, &req) {
        Some(workspace) => HttpResponse::Ok().json(RpcResponse::ok(workspace.reconciler.snapshot())),
        None => HttpResponse::Unauthorized().json(RpcResponse::<ViewSnapshot>::err("Not signed in")),
    }
}
