use axum::response::IntoResponse;
use marketplace_admin_api::{
    db::split_statements,
    error::AppError,
    response::{ApiResponse, Meta},
};

#[test]
fn paged_meta_counts_pages() {
    let meta = Meta::paged(2, 20, 41);
    assert_eq!(meta.total_pages, Some(3));
    assert_eq!(Meta::paged(1, 20, 0).total_pages, Some(0));
    assert_eq!(Meta::paged(1, 20, 20).total_pages, Some(1));
}

#[test]
fn unpaged_meta_serializes_only_total() {
    let json = serde_json::to_value(Meta::count(4)).expect("meta json");
    assert_eq!(json, serde_json::json!({ "total": 4 }));

    let json = serde_json::to_value(Meta::empty()).expect("meta json");
    assert_eq!(json, serde_json::json!({}));
}

#[test]
fn success_envelope_carries_data() {
    let resp = ApiResponse::success("Ok", vec![1, 2], Some(Meta::count(2)));
    let json = serde_json::to_value(&resp).expect("json");
    assert_eq!(json["message"], "Ok");
    assert_eq!(json["data"], serde_json::json!([1, 2]));
    assert_eq!(json["meta"]["total"], 2);
}

#[test]
fn errors_map_to_status_codes() {
    assert_eq!(AppError::NotFound.into_response().status(), 404);
    assert_eq!(AppError::BadRequest("nope".into()).into_response().status(), 400);
    assert_eq!(AppError::Unauthorized("token".into()).into_response().status(), 401);
    assert_eq!(AppError::Forbidden.into_response().status(), 403);
    assert_eq!(AppError::PayloadTooLarge.into_response().status(), 413);
    assert_eq!(
        AppError::Internal(anyhow::anyhow!("boom")).into_response().status(),
        500
    );
}

#[test]
fn bad_request_message_is_the_reason() {
    assert_eq!(AppError::BadRequest("Cart is empty".into()).to_string(), "Cart is empty");
}

#[test]
fn migration_sql_is_split_per_statement() {
    let sql = "-- users\nCREATE TABLE a (id INT);\n\n-- trailing comment\nCREATE INDEX i ON a(id);\n-- done\n";
    let statements = split_statements(sql);
    assert_eq!(statements.len(), 2);
    assert!(statements[0].ends_with("CREATE TABLE a (id INT);"));
    assert!(statements[1].ends_with("CREATE INDEX i ON a(id);"));
}
