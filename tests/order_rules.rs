use chrono::Utc;
use marketplace_admin_api::{
    dto::orders::CheckoutItem,
    entity::products::Model as ProductModel,
    error::AppError,
    models::{OrderStatus, Role},
    routes::params::{OrderListQuery, Pagination, like_pattern},
    services::order_service::{line_total, merge_lines, validate_line},
};
use uuid::Uuid;

fn product(stock: i32, min_order: i32, max_order: Option<i32>) -> ProductModel {
    ProductModel {
        id: Uuid::new_v4(),
        name: "Apples".into(),
        description: None,
        price: 1500,
        stock,
        image_url: None,
        store_id: Uuid::new_v4(),
        category_id: None,
        is_active: true,
        sale_type: "by_weight".into(),
        package_type: None,
        min_order,
        max_order,
        badge: None,
        created_at: Utc::now().into(),
    }
}

#[test]
fn order_status_parses_known_values_only() {
    for status in OrderStatus::ALL {
        assert_eq!(status.as_str().parse::<OrderStatus>().ok(), Some(status));
    }
    assert!(matches!(
        "shipped".parse::<OrderStatus>(),
        Err(AppError::BadRequest(_))
    ));
    assert!("Pending".parse::<OrderStatus>().is_err());
}

#[test]
fn open_statuses_are_the_unfinished_ones() {
    let open: Vec<_> = OrderStatus::ALL.into_iter().filter(|s| s.is_open()).collect();
    assert_eq!(
        open,
        vec![
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Delivering
        ]
    );
}

#[test]
fn roles_land_on_their_home_page() {
    assert_eq!("admin".parse::<Role>().ok().map(|r| r.home_path()), Some("/admin"));
    assert_eq!("store".parse::<Role>().ok().map(|r| r.home_path()), Some("/store"));
    assert_eq!(Role::Client.home_path(), "/client");
    assert!("user".parse::<Role>().is_err());
}

#[test]
fn status_filter_treats_all_and_blank_as_no_filter() {
    let mut query = OrderListQuery::default();
    assert_eq!(query.status_filter().ok(), Some(None));

    query.status = Some("all".into());
    assert_eq!(query.status_filter().ok(), Some(None));

    query.status = Some("  ".into());
    assert_eq!(query.status_filter().ok(), Some(None));

    query.status = Some("delivering".into());
    assert_eq!(
        query.status_filter().ok(),
        Some(Some(OrderStatus::Delivering))
    );

    query.status = Some("lost".into());
    assert!(query.status_filter().is_err());
}

#[test]
fn pagination_is_clamped() {
    let (page, per_page, offset) = Pagination::default().normalize();
    assert_eq!((page, per_page, offset), (1, 20, 0));

    let (page, per_page, offset) = Pagination {
        page: Some(3),
        per_page: Some(500),
    }
    .normalize();
    assert_eq!((page, per_page, offset), (3, 100, 200));

    let (page, per_page, _) = Pagination {
        page: Some(-4),
        per_page: Some(0),
    }
    .normalize();
    assert_eq!((page, per_page), (1, 1));
}

#[test]
fn like_pattern_wraps_and_escapes() {
    assert_eq!(like_pattern(Some(" tom ")), Some("%tom%".to_string()));
    assert_eq!(like_pattern(Some("50%_off")), Some("%50\\%\\_off%".to_string()));
    assert_eq!(like_pattern(Some("   ")), None);
    assert_eq!(like_pattern(None), None);
}

#[test]
fn merge_lines_folds_repeated_products() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let merged = merge_lines(&[
        CheckoutItem { product_id: a, quantity: 2 },
        CheckoutItem { product_id: b, quantity: 1 },
        CheckoutItem { product_id: a, quantity: 3 },
    ])
    .expect("merged");

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].product_id, a);
    assert_eq!(merged[0].quantity, 5);
    assert_eq!(merged[1].product_id, b);
    assert_eq!(merged[1].quantity, 1);
}

#[test]
fn merge_lines_rejects_quantity_overflow() {
    let a = Uuid::new_v4();
    let merged = merge_lines(&[
        CheckoutItem { product_id: a, quantity: i32::MAX },
        CheckoutItem { product_id: a, quantity: 1 },
    ]);

    assert!(matches!(merged, Err(AppError::BadRequest(_))));
}

#[test]
fn line_total_rejects_overflow() {
    assert_eq!(line_total(1500, 4).expect("total"), 6000);
    assert!(matches!(
        line_total(i64::MAX, 2),
        Err(AppError::BadRequest(_))
    ));
}

#[test]
fn validate_line_enforces_quantity_rules() {
    let apples = product(1000, 250, Some(800));

    assert!(validate_line(&apples, 250).is_ok());
    assert!(validate_line(&apples, 800).is_ok());
    assert!(validate_line(&apples, 0).is_err());
    assert!(validate_line(&apples, -5).is_err());
    assert!(validate_line(&apples, 100).is_err());
    assert!(validate_line(&apples, 900).is_err());
}

#[test]
fn validate_line_rejects_inactive_and_out_of_stock() {
    let mut scarce = product(2, 1, None);
    assert!(validate_line(&scarce, 2).is_ok());
    assert!(matches!(
        validate_line(&scarce, 3),
        Err(AppError::BadRequest(msg)) if msg.contains("Insufficient stock")
    ));

    scarce.is_active = false;
    assert!(matches!(
        validate_line(&scarce, 1),
        Err(AppError::BadRequest(msg)) if msg.contains("not available")
    ));
}
