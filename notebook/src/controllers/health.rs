use actix_web::{HttpResponse, Responder, web};

use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
}

async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": VERSION,
        "active_sessions": state.sessions.len()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::fake::FakeIdentity;
    use crate::remote::fake::{FakeNoteService, SharedFake};
    use actix_web::{App, test};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_reports_version() {
        let data = web::Data::new(AppState::new(
            Arc::new(FakeIdentity::new("duc", "secret")),
            Arc::new(SharedFake(Arc::new(FakeNoteService::new()))),
        ));
        let app = test::init_service(App::new().app_data(data).configure(config_routes)).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["status"], "ok");
        assert_eq!(resp["version"], VERSION);
        assert_eq!(resp["active_sessions"], 0);
    }
}
