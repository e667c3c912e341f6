use serde_json::json;

use super::*;

#[test]
fn decodes_backend_catalog_shape() {
    let entry: CatalogEntry = serde_json::from_value(json!({
        "id": 7,
        "catalogName": "Bridal",
        "catalogDescription": "Wedding sets",
        "catalogImage": "/img/bridal.jpg",
        "products": [{
            "id": 11,
            "productName": "Royal Kundan Set",
            "productImage": "/img/kundan.jpg",
            "realPrice": 3499,
            "discountPrice": "1999",
            "polishType": "Antique Finish",
            "size": "Large",
            "aboutProduct": "Perfect for weddings"
        }]
    }))
    .unwrap();

    assert_eq!(entry.id.as_str(), "7");
    assert_eq!(entry.category_name, "Bridal");
    assert_eq!(entry.description.as_deref(), Some("Wedding sets"));
    assert_eq!(entry.image_ref.as_deref(), Some("/img/bridal.jpg"));
    assert_eq!(entry.products.len(), 1);

    let product = &entry.products[0];
    assert_eq!(product.name, "Royal Kundan Set");
    assert_eq!(product.images, vec!["/img/kundan.jpg"]);
    assert_eq!(product.real_price, Money::from(3499));
    assert_eq!(product.discount_price, Money::from(1999));
    assert_eq!(product.polish_type, Some(PolishType::AntiqueFinish));
    assert_eq!(product.size, Some(ProductSize::Large));
    assert_eq!(product.discount_percent(), 43);
}

#[test]
fn decodes_draft_style_product_with_image_links() {
    let product: ProductEntry = serde_json::from_value(json!({
        "id": 1,
        "name": "Viva Drop Victorian Set",
        "realPrice": 2199,
        "discountPrice": 1249,
        "polishType": "High Polish",
        "size": "Medium",
        "about": "Victorian style",
        "imageLinks": ["/a.jpg", "/b.jpg"]
    }))
    .unwrap();
    assert_eq!(product.images, vec!["/a.jpg", "/b.jpg"]);
    assert_eq!(product.polish_type, Some(PolishType::HighPolish));
}

#[test]
fn products_null_is_empty() {
    let entry: CatalogEntry =
        serde_json::from_value(json!({ "id": "x", "catalogName": "Rings", "products": null }))
            .unwrap();
    assert!(entry.products.is_empty());
}

#[test]
fn unknown_polish_and_size_are_preserved() {
    assert_eq!(
        PolishType::from("Rose Gold".to_string()),
        PolishType::Other("Rose Gold".to_string())
    );
    assert_eq!(ProductSize::from("extra large".to_string()), ProductSize::ExtraLarge);
    assert_eq!(ProductSize::Other("XXS".into()).to_string(), "XXS");
}

#[test]
fn polish_type_serializes_as_label() {
    let value = serde_json::to_value(PolishType::SatinFinish).unwrap();
    assert_eq!(value, json!("Satin Finish"));
}

#[test]
fn shop_all_is_recognised() {
    let shop_all = CatalogEntry::shop_all();
    assert!(shop_all.is_shop_all());
    assert_eq!(shop_all.id.as_str(), SHOP_ALL_ID);
    let other = CatalogEntry {
        id: RecordId::from("5"),
        category_name: "Rings".into(),
        ..CatalogEntry::default()
    };
    assert!(!other.is_shop_all());
}

#[test]
fn category_draft_requires_name() {
    let draft = CategoryDraft {
        name: "   ".into(),
        ..CategoryDraft::default()
    };
    assert_eq!(
        draft.validate(),
        Err(ValidationError::Required { field: "name" })
    );
    let draft = CategoryDraft {
        name: "Earrings".into(),
        ..CategoryDraft::default()
    };
    assert!(draft.validate().is_ok());
}

#[test]
fn product_draft_requires_name_and_prices() {
    let mut draft = ProductDraft {
        name: "Choker".into(),
        ..ProductDraft::default()
    };
    assert_eq!(
        draft.validate(),
        Err(ValidationError::Required {
            field: "real price"
        })
    );
    draft.real_price = Some(Money::from(1200));
    assert_eq!(
        draft.validate(),
        Err(ValidationError::Required {
            field: "discount price"
        })
    );
    draft.discount_price = Some(Money::from(699));
    assert!(draft.validate().is_ok());
}

#[test]
fn draft_from_product_round_trips_fields() {
    let product = ProductEntry {
        id: RecordId::from("9"),
        name: "Anklet".into(),
        real_price: Money::from(800),
        discount_price: Money::from(600),
        images: vec!["/x.jpg".into()],
        ..ProductEntry::default()
    };
    let draft = ProductDraft::from(&product);
    assert_eq!(draft.name, "Anklet");
    assert_eq!(draft.real_price, Some(Money::from(800)));
    assert_eq!(draft.image_links(), vec!["/x.jpg"]);
}

#[test]
fn catalog_search_uses_name_and_description() {
    let entry = CatalogEntry {
        category_name: "Bridal".into(),
        description: Some("Wedding sets".into()),
        ..CatalogEntry::default()
    };
    assert_eq!(entry.search_fields(), vec!["Bridal", "Wedding sets"]);
}

#[test]
fn product_with_every_image_spelling_merges_links() {
    let product: ProductEntry = serde_json::from_value(json!({
        "id": 2,
        "productName": "Temple Jhumka",
        "name": "ignored when productName is present",
        "productImage": "/img/cover.jpg",
        "images": ["/img/cover.jpg", "/img/side.jpg"],
        "imageLinks": "/img/back.jpg"
    }))
    .unwrap();
    assert_eq!(product.name, "Temple Jhumka");
    assert_eq!(
        product.images,
        vec!["/img/cover.jpg", "/img/side.jpg", "/img/back.jpg"]
    );
}
