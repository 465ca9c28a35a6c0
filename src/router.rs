// src/router.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Builds the application router over the given state.
pub fn build_router(app_state: AppState) -> Router {
    let guidebook_routes = Router::new()
        .route(
            "/guidebook_list/{company_id}/",
            get(handlers::guidebook::list_guidebooks),
        )
        .route(
            "/guidebook_create/{company_id}/",
            post(handlers::guidebook::create_guidebook),
        )
        .route(
            "/change/{guidebook_id}/",
            put(handlers::guidebook::update_guidebook).delete(handlers::guidebook::delete_guidebook),
        )
        .route("/work_list/{guidebook_id}/", get(handlers::work::list_works))
        .route("/work/{work_id}/", get(handlers::work::get_work))
        .route("/work_create/", post(handlers::work::create_work))
        .route(
            "/change_work/{work_id}/",
            put(handlers::work::update_work).delete(handlers::work::delete_work),
        )
        // Catch-all id route last; static segments above win over it
        .route("/{guidebook_id}/", get(handlers::guidebook::get_guidebook))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let mut app = Router::new()
        .route("/api/health", get(handlers::health))
        .nest("/api/guidebook", guidebook_routes);

    if app_state.enable_docs {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app.layer(TraceLayer::new_for_http()).with_state(app_state)
}
