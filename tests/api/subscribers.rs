use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::{assert_error_body, nikolina, TestApp};

#[tokio::test]
async fn subscriber_lifecycle() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_subscriber(&nikolina()).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["ime"], "Nikolina");
    assert_eq!(created["ocena"], "-1");

    let res = app.get_subscriber(3).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await?;
    assert_eq!(
        fetched,
        json!({
            "id": 3,
            "ime": "Nikolina",
            "priimek": "Kraševka",
            "uporabnisko_ime": "nk_fuzine",
            "telefonska_stevilka": "999999999",
            "ocena": "-1"
        })
    );

    let res = app
        .put_subscriber(3, &json!({"atribut": "ime", "vrednost": "Teolina"}))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let prior: Value = res.json().await?;
    assert_eq!(prior["ime"], "Nikolina", "update should return the prior snapshot");

    let fetched: Value = app.get_subscriber(3).await?.json().await?;
    assert_eq!(fetched["ime"], "Teolina");

    let res = app.delete_subscriber(3).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await?.is_empty());

    let res = app.get_subscriber(3).await?;
    assert_error_body(res, 404, "SUBSCRIBER_NOT_FOUND").await?;

    Ok(())
}

#[tokio::test]
async fn list_returns_everything_ordered_by_id() -> Result<()> {
    let app = TestApp::spawn().await?;

    let body: Value = app.get("/narocniki").await?.json().await?;
    assert_eq!(body, json!({"narocniki": []}));

    for id in [7, 2, 5] {
        app.create_scored_subscriber(id, "10").await?;
    }

    let body: Value = app.get("/narocniki").await?.json().await?;
    let ids: Vec<i64> = body["narocniki"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 5, 7]);

    Ok(())
}

#[tokio::test]
async fn create_with_missing_or_invalid_fields_is_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let tests = [
        (
            json!({"ime": "Peter", "priimek": "Skala", "uporabnisko_ime": "ps4348"}),
            "Missing id",
        ),
        (
            json!({"id": 1, "priimek": "Skala", "uporabnisko_ime": "ps4348"}),
            "Missing ime",
        ),
        (
            json!({"id": 1, "ime": "Peter", "uporabnisko_ime": "ps4348"}),
            "Missing priimek",
        ),
        (
            json!({"id": 1, "ime": "Peter", "priimek": "Skala"}),
            "Missing uporabnisko_ime",
        ),
        (
            json!({"id": 1, "ime": " ", "priimek": "Skala", "uporabnisko_ime": "ps4348"}),
            "Blank ime",
        ),
        (
            json!({"id": 1, "ime": "Peter", "priimek": "Skala", "uporabnisko_ime": "ps4348", "ocena": "veliko"}),
            "Non numeric ocena",
        ),
        (
            json!({"id": 1, "ime": "a".repeat(65), "priimek": "Skala", "uporabnisko_ime": "ps4348"}),
            "Too long ime",
        ),
        (json!({"id": "ena", "ime": "Peter"}), "Wrong id type"),
    ];

    for (body, case) in tests {
        let res = app.post_subscriber(&body).await?;
        assert_eq!(
            res.status().as_u16(),
            400,
            "The API did not fail with 400 Bad Request when the payload was: {case}"
        );
        assert_error_body(res, 400, "INVALID_INPUT").await?;
    }

    let body: Value = app.get("/narocniki").await?.json().await?;
    assert_eq!(body["narocniki"], json!([]), "nothing should have been stored");

    Ok(())
}

#[tokio::test]
async fn create_with_malformed_json_is_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .post(app.url("/narocniki"))
        .header("content-type", "application/json")
        .body("{\"id\": 1,")
        .send()
        .await?;

    assert_error_body(res, 400, "INVALID_INPUT").await?;

    Ok(())
}

#[tokio::test]
async fn create_with_taken_id_is_409() -> Result<()> {
    let app = TestApp::spawn().await?;
    assert_eq!(app.post_subscriber(&nikolina()).await?.status(), StatusCode::CREATED);

    let mut duplicate = nikolina();
    duplicate["ime"] = json!("Druga");
    let res = app.post_subscriber(&duplicate).await?;

    let detail = assert_error_body(res, 409, "SUBSCRIBER_EXISTS").await?;
    assert_eq!(detail, 3);
    let fetched: Value = app.get_subscriber(3).await?.json().await?;
    assert_eq!(fetched["ime"], "Nikolina");

    Ok(())
}

#[tokio::test]
async fn update_changes_only_the_named_attribute() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.post_subscriber(&nikolina()).await?;

    let res = app
        .put_subscriber(3, &json!({"atribut": "ocena", "vrednost": 42}))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let fetched: Value = app.get_subscriber(3).await?.json().await?;
    assert_eq!(fetched["ocena"], "42");
    assert_eq!(fetched["ime"], "Nikolina");
    assert_eq!(fetched["priimek"], "Kraševka");
    assert_eq!(fetched["uporabnisko_ime"], "nk_fuzine");
    assert_eq!(fetched["telefonska_stevilka"], "999999999");

    Ok(())
}

#[tokio::test]
async fn update_of_unknown_attribute_is_400() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.post_subscriber(&nikolina()).await?;

    for atribut in ["id", "geslo", "ime = 'x' --"] {
        let res = app
            .put_subscriber(3, &json!({"atribut": atribut, "vrednost": "1"}))
            .await?;
        assert_error_body(res, 400, "INVALID_INPUT").await?;
    }

    let fetched: Value = app.get_subscriber(3).await?.json().await?;
    assert_eq!(fetched["id"], 3);
    assert_eq!(fetched["ime"], "Nikolina");

    Ok(())
}

#[tokio::test]
async fn missing_subscriber_is_404_everywhere() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get_subscriber(99).await?;
    assert_error_body(res, 404, "SUBSCRIBER_NOT_FOUND").await?;

    let res = app
        .put_subscriber(99, &json!({"atribut": "ime", "vrednost": "Teolina"}))
        .await?;
    assert_error_body(res, 404, "SUBSCRIBER_NOT_FOUND").await?;

    let res = app.delete_subscriber(99).await?;
    assert_error_body(res, 404, "SUBSCRIBER_NOT_FOUND").await?;

    Ok(())
}

#[tokio::test]
async fn non_numeric_id_in_path_is_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/narocniki/tri").await?;

    assert_error_body(res, 400, "INVALID_INPUT").await?;

    Ok(())
}
