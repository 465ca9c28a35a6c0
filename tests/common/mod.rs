// tests/common/mod.rs

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use guidebook_api::{
    config::AppState,
    db::{GuideBookRepository, MemoryStore, Repositories, WorkRepository},
    models::{
        company::{Company, CompanyRole},
        guidebook::{Currency, GuideBook, NewWork, UnitOfMeasurement, Work},
    },
    router::build_router,
};

pub const JWT_SECRET: &str = "test-secret";

/// Seeded catalog shared by the API tests.
///
/// `director` is director and author of `company`, `master` only a master there,
/// `outsider` is the author of `other_company`.
pub struct Fixture {
    pub store: MemoryStore,
    pub app: Router,
    pub company: Company,
    pub other_company: Company,
    pub interior: GuideBook,
    pub exterior: GuideBook,
    pub walls: Work,
    pub ceilings: Work,
    pub director_token: String,
    pub master_token: String,
    pub outsider_token: String,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = MemoryStore::new();

        let director = store.add_user("user_1@gmail.com").await;
        let master = store.add_user("user_2@gmail.com").await;
        let outsider = store.add_user("user_3@gmail.com").await;

        let company = store.add_company("ООО").await;
        let other_company = store.add_company("ОАО").await;

        store.assign_role(director.id, company.id, CompanyRole::Director).await;
        store.assign_role(director.id, company.id, CompanyRole::Author).await;
        store.assign_role(master.id, company.id, CompanyRole::Master).await;
        store.assign_role(outsider.id, other_company.id, CompanyRole::Author).await;

        let interior = GuideBookRepository::create(&store, company.id, "Внутренняя отделка", None)
            .await
            .unwrap();
        let exterior =
            GuideBookRepository::create(&store, company.id, "Внешняя отделка", Some(interior.id))
                .await
                .unwrap();

        let walls = WorkRepository::create(&store, &square_meters(interior.id, "Покраска стен", 1000))
            .await
            .unwrap();
        let ceilings =
            WorkRepository::create(&store, &square_meters(interior.id, "Покраска потолков", 2000))
                .await
                .unwrap();

        let state = AppState::from_repositories(
            Repositories::in_memory(store.clone()),
            JWT_SECRET.to_string(),
            false,
        );
        let director_token = state.auth_service.issue_token(director.id).unwrap();
        let master_token = state.auth_service.issue_token(master.id).unwrap();
        let outsider_token = state.auth_service.issue_token(outsider.id).unwrap();

        Self {
            store,
            app: build_router(state),
            company,
            other_company,
            interior,
            exterior,
            walls,
            ceilings,
            director_token,
            master_token,
            outsider_token,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, Some(token), None).await
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send_in(Some("en"), method, uri, token, body).await
    }

    /// Like `send`, with an explicit `Accept-Language` (none when `None`).
    pub async fn send_in(
        &self,
        language: Option<&str>,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let authorization = token.map(|token| format!("Bearer {token}"));
        self.dispatch(language, method, uri, authorization.as_deref(), body)
            .await
    }

    /// GET with a raw `Authorization` header value.
    pub async fn get_authorized_as(&self, uri: &str, authorization: &str) -> (StatusCode, Value) {
        self.dispatch(Some("en"), "GET", uri, Some(authorization), None)
            .await
    }

    async fn dispatch(
        &self,
        language: Option<&str>,
        method: &str,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(language) = language {
            builder = builder.header(header::ACCEPT_LANGUAGE, language);
        }
        if let Some(authorization) = authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        // Every error is JSON; a non-JSON body fails the test here
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn add_guidebook(&self, title: &str, parent: Option<i64>) -> GuideBook {
        GuideBookRepository::create(&self.store, self.company.id, title, parent)
            .await
            .unwrap()
    }

    pub async fn add_work(&self, guidebook_id: i64, title: &str) -> Work {
        WorkRepository::create(&self.store, &square_meters(guidebook_id, title, 500))
            .await
            .unwrap()
    }

    pub async fn find_guidebook(&self, id: i64) -> GuideBook {
        GuideBookRepository::find_by_id(&self.store, id).await.unwrap().unwrap()
    }

    pub async fn find_work(&self, id: i64) -> Work {
        WorkRepository::find_by_id(&self.store, id).await.unwrap().unwrap()
    }
}

fn square_meters(guidebook_id: i64, title: &str, price: i32) -> NewWork {
    NewWork {
        guidebook_id,
        title: title.to_string(),
        price_by_unit: price,
        unit_of_measurement: UnitOfMeasurement::SquareMeter,
        currency: Currency::Rub,
    }
}
