// tests/work_api.rs

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::Fixture;

// "потолк", percent-encoded
const CEILING_QUERY: &str = "%D0%BF%D0%BE%D1%82%D0%BE%D0%BB%D0%BA";

fn work_body(guidebook: i64, title: &str, price: i64) -> Value {
    json!({
        "guidebook": guidebook,
        "title": title,
        "price_by_unit": price,
        "unit_of_measurement": "square_meter",
        "currency": "rub",
    })
}

#[tokio::test]
async fn members_list_works_of_a_guidebook() {
    let fx = Fixture::new().await;
    let uri = format!("/api/guidebook/work_list/{}/", fx.interior.id);

    let (status, body) = fx.get(&uri, Some(&fx.master_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(
        body["results"][0],
        json!({
            "id": fx.walls.id,
            "guidebook": { "id": fx.interior.id, "title": "Внутренняя отделка" },
            "title": "Покраска стен",
            "price_by_unit": 1000,
            "unit_of_measurement": "square_meter",
            "currency": "rub",
        })
    );
    assert_eq!(body["results"][1]["id"], fx.ceilings.id);

    let (status, _) = fx.get(&uri, Some(&fx.outsider_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn guidebooks_without_works_are_not_found() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .get(
            &format!("/api/guidebook/work_list/{}/", fx.exterior.id),
            Some(&fx.director_token),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No works found in the guidebook.");
}

#[tokio::test]
async fn works_filter_by_title() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .get(
            &format!("/api/guidebook/work_list/{}/?title={CEILING_QUERY}", fx.interior.id),
            Some(&fx.director_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["title"], "Покраска потолков");
}

#[tokio::test]
async fn duplicated_query_parameters_are_bad_requests() {
    let fx = Fixture::new().await;
    let (status, body) = fx
        .get(
            &format!("/api/guidebook/work_list/{}/?title=a&title=b", fx.interior.id),
            Some(&fx.director_token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn page_size_cannot_shrink_pages() {
    let fx = Fixture::new().await;
    for i in 0..10 {
        fx.add_work(fx.interior.id, &format!("Шпаклёвка {i}")).await;
    }
    let base = format!("/api/guidebook/work_list/{}/", fx.interior.id);

    let (_, body) = fx
        .get(&format!("{base}?page_size=5"), Some(&fx.director_token))
        .await;
    assert_eq!(body["count"], 12);
    assert_eq!(body["results"].as_array().unwrap().len(), 10);

    let (_, body) = fx
        .get(&format!("{base}?page=2&page_size=5"), Some(&fx.director_token))
        .await;
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["previous"], format!("{base}?page_size=5"));
}

#[tokio::test]
async fn work_detail_requires_membership() {
    let fx = Fixture::new().await;
    let uri = format!("/api/guidebook/work/{}/", fx.ceilings.id);

    let (status, body) = fx.get(&uri, Some(&fx.master_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Покраска потолков");
    assert_eq!(body["guidebook"]["id"], fx.interior.id);
    assert_eq!(body["price_by_unit"], 2000);

    let (status, _) = fx.get(&uri, Some(&fx.outsider_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = fx.get("/api/guidebook/work/999/", Some(&fx.director_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn authors_create_works() {
    let fx = Fixture::new().await;
    let before = fx.store.work_count().await;

    let (status, body) = fx
        .post(
            "/api/guidebook/work_create/",
            &fx.director_token,
            work_body(fx.exterior.id, "Штукатурка фасада", 750),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["guidebook"],
        json!({ "id": fx.exterior.id, "title": "Внешняя отделка" })
    );
    assert_eq!(body["price_by_unit"], 750);
    assert_eq!(fx.store.work_count().await, before + 1);

    let (status, _) = fx
        .get(
            &format!("/api/guidebook/work_list/{}/", fx.exterior.id),
            Some(&fx.director_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn non_authors_cannot_create_works() {
    let fx = Fixture::new().await;
    let before = fx.store.work_count().await;

    for token in [&fx.master_token, &fx.outsider_token] {
        let (status, _) = fx
            .post(
                "/api/guidebook/work_create/",
                token,
                work_body(fx.interior.id, "Покраска пола", 900),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    // No guidebook in the body means nothing to authorise against
    let (status, _) = fx
        .post(
            "/api/guidebook/work_create/",
            &fx.director_token,
            json!({ "title": "Покраска пола" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(fx.store.work_count().await, before);
}

#[tokio::test]
async fn invalid_work_payloads_are_bad_requests() {
    let fx = Fixture::new().await;
    let before = fx.store.work_count().await;

    let (status, body) = fx
        .post(
            "/api/guidebook/work_create/",
            &fx.director_token,
            work_body(fx.interior.id, "Покраска пола", -5),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"],
        json!({ "price_by_unit": ["Ensure this value is greater than or equal to 0."] })
    );

    let (status, body) = fx
        .post(
            "/api/guidebook/work_create/",
            &fx.director_token,
            json!({ "guidebook": fx.interior.id, "title": "Покраска пола" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["details"].as_object().unwrap();
    assert!(details.contains_key("price_by_unit"));
    assert!(details.contains_key("unit_of_measurement"));
    assert!(details.contains_key("currency"));

    let mut bad_unit = work_body(fx.interior.id, "Покраска пола", 10);
    bad_unit["unit_of_measurement"] = json!("pound");
    let (status, _) = fx
        .post("/api/guidebook/work_create/", &fx.director_token, bad_unit)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(fx.store.work_count().await, before);
}

#[tokio::test]
async fn authors_update_works() {
    let fx = Fixture::new().await;
    let uri = format!("/api/guidebook/change_work/{}/", fx.walls.id);

    let mut body = work_body(fx.exterior.id, "Покраска стен в два слоя", 1200);
    body["currency"] = json!("usd");
    let (status, body) = fx.put(&uri, &fx.director_token, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Покраска стен в два слоя");
    assert_eq!(body["currency"], "usd");
    assert_eq!(body["guidebook"]["id"], fx.exterior.id);

    let stored = fx.find_work(fx.walls.id).await;
    assert_eq!(stored.price_by_unit, 1200);
    assert_eq!(stored.guidebook_id, fx.exterior.id);

    for token in [&fx.master_token, &fx.outsider_token] {
        let (status, _) = fx
            .put(&uri, token, work_body(fx.interior.id, "X", 1))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
    assert_eq!(fx.find_work(fx.walls.id).await.price_by_unit, 1200);
}

#[tokio::test]
async fn works_stay_within_their_company() {
    let fx = Fixture::new().await;
    let foreign = guidebook_api::db::GuideBookRepository::create(
        &fx.store,
        fx.other_company.id,
        "Чужой",
        None,
    )
    .await
    .unwrap();

    let (status, body) = fx
        .put(
            &format!("/api/guidebook/change_work/{}/", fx.walls.id),
            &fx.director_token,
            work_body(foreign.id, "Покраска стен", 1000),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"],
        json!({ "guidebook": ["Guidebook belongs to another company."] })
    );
    assert_eq!(fx.find_work(fx.walls.id).await.guidebook_id, fx.interior.id);
}

#[tokio::test]
async fn changing_a_missing_work_is_not_found() {
    let fx = Fixture::new().await;

    let (status, body) = fx
        .put(
            "/api/guidebook/change_work/999/",
            &fx.director_token,
            work_body(fx.interior.id, "X", 1),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Work not found.");

    let (status, _) = fx.delete("/api/guidebook/change_work/999/", &fx.outsider_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn soft_deleted_works_are_flagged_not_removed() {
    let fx = Fixture::new().await;
    let uri = format!("/api/guidebook/change_work/{}/", fx.walls.id);

    let (status, _) = fx.delete(&uri, &fx.outsider_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = fx.delete(&uri, &fx.director_token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(fx.find_work(fx.walls.id).await.is_delete);

    let (_, body) = fx
        .get(
            &format!("/api/guidebook/work_list/{}/", fx.interior.id),
            Some(&fx.director_token),
        )
        .await;
    assert_eq!(body["count"], 2);
}
