mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};

use common::{delete, get, post_json, put_empty, put_json, send, setup_app};

// HTTP flow over the order endpoints: statuses, headers, filters and
// the error body shape.
#[tokio::test]
async fn order_endpoints_flow() -> anyhow::Result<()> {
    let Some(database_url) = common::test_database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run API tests.");
        return Ok(());
    };
    let app = setup_app(&database_url).await?;

    // Landing page and health probe.
    let (status, _, body) = send(&app, get("/")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body)?.contains("Orders Service"));

    let (status, _, body) = send(&app, get("/health")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_slice::<Value>(&body)?,
        json!({ "status": 200, "message": "Healthy" })
    );

    // An empty collection lists as a bare array.
    let (status, _, body) = send(&app, get("/api/orders")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body)?, json!([]));

    // Create; the Location header points at the new resource.
    let payload = json!({
        "date": "2024-06-03",
        "status": 1,
        "amount": 0.0,
        "address": "725 Broadway",
        "customer_id": 42
    });
    let (status, headers, body) = send(&app, post_json("/api/orders", &payload)?).await?;
    assert_eq!(status, StatusCode::CREATED);
    let order: Value = serde_json::from_slice(&body)?;
    let id = order["id"].as_i64().unwrap();
    assert_eq!(order["amount"], json!(0.0));
    let location = headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert_eq!(location, format!("/api/orders/{id}"));

    // The record is served back from its Location.
    let (status, _, body) = send(&app, get(&location)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body)?, order);

    // Content type is enforced before anything else.
    let no_type = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .body(Body::from(payload.to_string()))?;
    let (status, _, _) = send(&app, no_type).await?;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let wrong_type = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(payload.to_string()))?;
    let (status, _, _) = send(&app, wrong_type).await?;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    // Bad bodies come back as 400 in the standard error shape.
    let (status, _, body) =
        send(&app, post_json("/api/orders", &json!({ "date": "2024-06-03" }))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body)?;
    assert_eq!(error["status"], json!(400));
    assert_eq!(error["error"], json!("Bad Request"));

    let mut bad_status = payload.clone();
    bad_status["status"] = json!(9);
    let (status, _, _) = send(&app, post_json("/api/orders", &bad_status)?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A missing order is a 404 naming the id.
    let (status, _, body) = send(&app, get("/api/orders/12345")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_slice(&body)?;
    assert!(error["message"].as_str().unwrap().contains("12345"));

    // So is an id that is not an integer, in the same JSON shape.
    let (status, _, body) = send(&app, get("/api/orders/notanumber")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_slice(&body)?;
    assert_eq!(error["error"], json!("Not Found"));

    // The lookup runs before body parsing: updating a missing order
    // with an empty body still reports 404, not 400.
    let empty_put = Request::builder()
        .method("PUT")
        .uri("/api/orders/12345")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())?;
    let (status, _, _) = send(&app, empty_put).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The same empty body against an existing order is a 400.
    let empty_put = Request::builder()
        .method("PUT")
        .uri(format!("/api/orders/{id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())?;
    let (status, _, _) = send(&app, empty_put).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Full-document update.
    let update = json!({
        "date": "2024-06-04",
        "status": 2,
        "amount": 1.5,
        "address": "1 Main St",
        "customer_id": 42
    });
    let (status, _, body) = send(&app, put_json(&format!("/api/orders/{id}"), &update)?).await?;
    assert_eq!(status, StatusCode::OK);
    let updated: Value = serde_json::from_slice(&body)?;
    assert_eq!(updated["address"], json!("1 Main St"));
    assert_eq!(updated["status"], json!(2));

    // The collection itself only supports GET and POST.
    let (status, _, _) = send(&app, put_json("/api/orders", &update)?).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    // Lifecycle: cancelling wins once and conflicts afterwards.
    let (status, _, body) = send(&app, put_empty(&format!("/api/orders/{id}/cancel"))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body)?["status"], json!(0));

    let (status, _, _) = send(&app, put_empty(&format!("/api/orders/{id}/cancel"))?).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send(&app, put_empty(&format!("/api/orders/{id}/deliver"))?).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    // A live order can be delivered.
    let second = json!({
        "date": "2024-06-10",
        "status": 1,
        "amount": 0.0,
        "address": "48 Grove St",
        "customer_id": 7
    });
    let (_, _, body) = send(&app, post_json("/api/orders", &second)?).await?;
    let second_id = serde_json::from_slice::<Value>(&body)?["id"].as_i64().unwrap();

    let (status, _, body) =
        send(&app, put_empty(&format!("/api/orders/{second_id}/deliver"))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body)?["status"], json!(3));

    // Filters single out orders; the unfiltered list is date-descending.
    let (status, _, body) = send(&app, get("/api/orders?customer_id=7")?).await?;
    assert_eq!(status, StatusCode::OK);
    let filtered: Value = serde_json::from_slice(&body)?;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["id"], json!(second_id));

    let (_, _, body) = send(&app, get("/api/orders?date=2024-06-04")?).await?;
    let by_date: Value = serde_json::from_slice(&body)?;
    assert_eq!(by_date.as_array().unwrap().len(), 1);
    assert_eq!(by_date[0]["id"], json!(id));

    let (_, _, body) = send(&app, get("/api/orders?status=3")?).await?;
    let by_status: Value = serde_json::from_slice(&body)?;
    assert_eq!(by_status.as_array().unwrap().len(), 1);
    assert_eq!(by_status[0]["id"], json!(second_id));

    let (status, _, _) = send(&app, get("/api/orders?status=9")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(&app, get("/api/orders?date=notadate")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, body) = send(&app, get("/api/orders")?).await?;
    let all: Value = serde_json::from_slice(&body)?;
    let dates: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["date"].as_str().unwrap())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted, "orders must list newest date first");

    // Deletes are idempotent.
    let (status, _, _) = send(&app, delete(&format!("/api/orders/{id}"))?).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&app, delete(&format!("/api/orders/{id}"))?).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&app, get(&format!("/api/orders/{id}"))?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unknown paths share the JSON error shape.
    let (status, _, body) = send(&app, get("/no/such/path")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(serde_json::from_slice::<Value>(&body)?["status"], json!(404));

    Ok(())
}
