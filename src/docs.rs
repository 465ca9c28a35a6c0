// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Guidebooks ---
        handlers::guidebook::list_guidebooks,
        handlers::guidebook::get_guidebook,
        handlers::guidebook::create_guidebook,
        handlers::guidebook::update_guidebook,
        handlers::guidebook::delete_guidebook,

        // --- Works ---
        handlers::work::list_works,
        handlers::work::get_work,
        handlers::work::create_work,
        handlers::work::update_work,
        handlers::work::delete_work,
    ),
    components(
        schemas(
            handlers::guidebook::GuideBookPayload,
            handlers::work::WorkPayload,
            models::guidebook::UnitOfMeasurement,
            models::guidebook::Currency,
            models::guidebook::GuideBookTitle,
            models::guidebook::GuideBookView,
            models::guidebook::GuideBookDetail,
            models::guidebook::NestedWork,
            models::guidebook::WorkView,
            models::company::CompanySummary,
            models::pagination::Paginated<models::guidebook::GuideBookTitle>,
            models::pagination::Paginated<models::guidebook::WorkView>,
        )
    ),
    tags(
        (name = "Guidebooks", description = "Company guidebooks and their hierarchy"),
        (name = "Works", description = "Priced works inside a guidebook")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
