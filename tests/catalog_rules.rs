use marketplace_admin_api::{
    dto::{
        bot::{BecomeSellerPage, DEFAULT_BECOME_SELLER_TITLE},
        products::{UpdateProductRequest, non_blank},
        uploads::ImageFolder,
    },
    error::AppError,
    models::{ResponseKey, SaleType, StoreStatus},
    services::{
        product_service::validate_product_numbers,
        upload_service::{extension_for, object_path, validate_image},
    },
};
use uuid::Uuid;

#[test]
fn product_numbers_are_checked() {
    assert!(validate_product_numbers(1000, 5, 1, None).is_ok());
    assert!(validate_product_numbers(0, 0, 1, Some(1)).is_ok());
    assert!(validate_product_numbers(-1, 5, 1, None).is_err());
    assert!(validate_product_numbers(1000, -1, 1, None).is_err());
    assert!(validate_product_numbers(1000, 5, 0, None).is_err());
    assert!(validate_product_numbers(1000, 5, 10, Some(5)).is_err());
}

#[test]
fn blank_text_becomes_none() {
    assert_eq!(non_blank(Some("  ".into())), None);
    assert_eq!(non_blank(None), None);
    assert_eq!(non_blank(Some(" /img/a.png ".into())), Some("/img/a.png".into()));
}

#[test]
fn sale_type_defaults_to_by_piece() {
    assert_eq!(SaleType::default(), SaleType::ByPiece);
    assert_eq!("by_weight".parse::<SaleType>().ok(), Some(SaleType::ByWeight));
    assert!("per_kg".parse::<SaleType>().is_err());
}

#[test]
fn product_update_tells_null_from_absent() {
    let cleared: UpdateProductRequest =
        serde_json::from_str(r#"{"max_order": null, "category_id": null}"#).expect("json");
    assert_eq!(cleared.max_order, Some(None));
    assert_eq!(cleared.category_id, Some(None));

    let untouched: UpdateProductRequest = serde_json::from_str(r#"{"name": "Pears"}"#).expect("json");
    assert_eq!(untouched.max_order, None);
    assert_eq!(untouched.category_id, None);

    let set: UpdateProductRequest = serde_json::from_str(r#"{"max_order": 12}"#).expect("json");
    assert_eq!(set.max_order, Some(Some(12)));
}

#[test]
fn store_status_parse() {
    assert_eq!("paused".parse::<StoreStatus>().ok(), Some(StoreStatus::Paused));
    assert!("open".parse::<StoreStatus>().is_err());
}

#[test]
fn become_seller_text_splits_title_and_content() {
    let page = BecomeSellerPage::from_text("  Join us \nStep one\n\nStep two\n");
    assert_eq!(page.title, "Join us");
    assert_eq!(page.content, "Step one\n\nStep two");
    assert_eq!(page.to_text(), "Join us\n\nStep one\n\nStep two");

    let untitled = BecomeSellerPage::from_text("\nOnly content");
    assert_eq!(untitled.title, DEFAULT_BECOME_SELLER_TITLE);
    assert_eq!(untitled.content, "Only content");

    let reparsed = BecomeSellerPage::from_text(&page.to_text());
    assert_eq!(reparsed.title, page.title);
    assert_eq!(reparsed.content, page.content);
}

#[test]
fn response_key_follows_button_label() {
    assert_eq!(
        ResponseKey::for_button_text("ℹ️ Sayt haqida"),
        Some(ResponseKey::SiteAbout)
    );
    assert_eq!(
        ResponseKey::for_button_text("Sotuvchi bo'lish"),
        Some(ResponseKey::BecomeSeller)
    );
    assert_eq!(ResponseKey::for_button_text("Katalog"), None);
}

#[test]
fn upload_folder_must_be_known() {
    assert_eq!("banners".parse::<ImageFolder>().ok(), Some(ImageFolder::Banners));
    assert!("avatars".parse::<ImageFolder>().is_err());
}

#[test]
fn only_images_within_the_limit_pass() {
    assert_eq!(
        validate_image(Some("Image/PNG"), 10, 100).ok(),
        Some("image/png".to_string())
    );
    assert!(matches!(
        validate_image(Some("application/pdf"), 10, 100),
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(validate_image(None, 10, 100), Err(AppError::BadRequest(_))));
    assert!(matches!(
        validate_image(Some("image/jpeg"), 0, 100),
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        validate_image(Some("image/jpeg"), 101, 100),
        Err(AppError::PayloadTooLarge)
    ));
}

#[test]
fn extension_comes_from_type_then_file_name() {
    assert_eq!(extension_for("image/jpeg", Some("photo.jpeg")), "jpg");
    assert_eq!(extension_for("image/webp", None), "webp");
    assert_eq!(extension_for("image/heic", Some("IMG_001.HEIC")), "heic");
    assert_eq!(extension_for("image/x-unknown", Some("../../etc/passwd")), "img");
    assert_eq!(extension_for("image/x-unknown", None), "img");
}

#[test]
fn object_path_is_scoped_by_folder_and_user() {
    let user_id = Uuid::new_v4();
    let path = object_path(ImageFolder::Products, user_id, "png");
    let parts: Vec<&str> = path.split('/').collect();

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "products");
    assert_eq!(parts[1], user_id.to_string());
    assert!(parts[2].ends_with(".png"));
    assert_ne!(path, object_path(ImageFolder::Products, user_id, "png"));
}
