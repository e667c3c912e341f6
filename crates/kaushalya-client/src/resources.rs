//! Backend collections and their endpoint sets.
//!
//! Each marker type ties a record type to the paths that serve it and to the
//! request bodies the backend expects. [`crate::SyncController`] is generic
//! over these traits, so one controller drives every admin page.

use kaushalya_core::catalog::SHOP_ALL_ID;
use kaushalya_core::{
    CatalogEntry, CategoryDraft, CustomerRecord, NewArrivalDraft, NewArrivalEntry, OrderRecord,
    ProductDraft, RecordId, Searchable, Validate,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

/// A collection served by `GET {PATH}`.
pub trait Resource {
    type Record: DeserializeOwned + Searchable + Clone + Send + Sync;

    /// Human-readable name used in logs and errors.
    const NAME: &'static str;
    const PATH: &'static str;

    fn record_id(record: &Self::Record) -> &RecordId;

    /// Id that may never be deleted.
    fn protected_id() -> Option<&'static str> {
        None
    }

    /// Whether a loaded record may never be deleted, whatever its id.
    fn is_protected(_record: &Self::Record) -> bool {
        false
    }

    /// Adjusts a freshly loaded list before it replaces local state.
    fn after_load(_records: &mut Vec<Self::Record>) {}
}

/// A collection that accepts `POST {PATH}` and `DELETE {PATH}/{id}`.
pub trait MutableResource: Resource {
    type Draft: Validate + Sync;

    /// Endpoint for editing an existing record, if the backend has one.
    const UPDATE_PATH: Option<&'static str>;

    fn create_body(draft: &Self::Draft) -> Value;

    fn update_body(id: &RecordId, draft: &Self::Draft) -> Value;
}

/// A grouping whose products are saved through a dedicated endpoint.
///
/// Products are addressed by the parent's name, which is how the backend
/// keys them.
pub trait ProductCollection: MutableResource<Record = CatalogEntry> {
    const PRODUCT_PATH: &'static str;

    /// Prefix of the grouping's wire fields, e.g. `catalog` → `catalogName`.
    const FIELD_PREFIX: &'static str;

    fn product_body(
        parent: &CatalogEntry,
        product_id: Option<&RecordId>,
        draft: &ProductDraft,
    ) -> Value {
        let mut body = Map::new();
        body.insert(
            format!("{}Name", Self::FIELD_PREFIX),
            Value::String(parent.category_name.clone()),
        );
        if !parent.id.is_empty() {
            body.insert(
                format!("{}Id", Self::FIELD_PREFIX),
                Value::String(parent.id.to_string()),
            );
        }
        if let Some(id) = product_id {
            body.insert("productId".to_owned(), Value::String(id.to_string()));
        }
        let links = draft.image_links();
        body.insert("productName".to_owned(), json!(draft.name.trim()));
        body.insert("productImage".to_owned(), json!(links.first()));
        body.insert("imageLinks".to_owned(), json!(links));
        body.insert("realPrice".to_owned(), json!(draft.real_price));
        body.insert("discountPrice".to_owned(), json!(draft.discount_price));
        body.insert(
            "polishType".to_owned(),
            json!(draft.polish_type.as_ref().map(ToString::to_string)),
        );
        body.insert(
            "size".to_owned(),
            json!(draft.size.as_ref().map(ToString::to_string)),
        );
        body.insert("aboutProduct".to_owned(), json!(blank_to_none(draft.about.as_deref())));
        Value::Object(body)
    }
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `{<prefix>Name, <prefix>Description, <prefix>Image}`
fn grouping_body(prefix: &str, draft: &CategoryDraft) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert(format!("{prefix}Name"), json!(draft.name.trim()));
    body.insert(
        format!("{prefix}Description"),
        json!(blank_to_none(draft.description.as_deref()).unwrap_or_default()),
    );
    body.insert(
        format!("{prefix}Image"),
        json!(blank_to_none(draft.image.as_deref()).unwrap_or_default()),
    );
    body
}

fn grouping_update_body(prefix: &str, id: &RecordId, draft: &CategoryDraft) -> Value {
    let mut body = grouping_body(prefix, draft);
    body.insert("id".to_owned(), Value::String(id.to_string()));
    Value::Object(body)
}

/// Shop catalogs. Includes the undeletable "Shop All" entry.
#[derive(Debug, Clone, Copy)]
pub struct Catalog;

impl Resource for Catalog {
    type Record = CatalogEntry;
    const NAME: &'static str = "catalog";
    const PATH: &'static str = "/catalog";

    fn record_id(record: &CatalogEntry) -> &RecordId {
        &record.id
    }

    fn protected_id() -> Option<&'static str> {
        Some(SHOP_ALL_ID)
    }

    fn is_protected(record: &CatalogEntry) -> bool {
        record.is_shop_all()
    }

    fn after_load(records: &mut Vec<CatalogEntry>) {
        if !records.iter().any(CatalogEntry::is_shop_all) {
            records.insert(0, CatalogEntry::shop_all());
        }
    }
}

impl MutableResource for Catalog {
    type Draft = CategoryDraft;
    const UPDATE_PATH: Option<&'static str> = None;

    fn create_body(draft: &CategoryDraft) -> Value {
        Value::Object(grouping_body(Self::FIELD_PREFIX, draft))
    }

    fn update_body(id: &RecordId, draft: &CategoryDraft) -> Value {
        grouping_update_body(Self::FIELD_PREFIX, id, draft)
    }
}

impl ProductCollection for Catalog {
    const PRODUCT_PATH: &'static str = "/catalog/save-product";
    const FIELD_PREFIX: &'static str = "catalog";
}

/// Shop accessories.
#[derive(Debug, Clone, Copy)]
pub struct Accessory;

impl Resource for Accessory {
    type Record = CatalogEntry;
    const NAME: &'static str = "accessory";
    const PATH: &'static str = "/accessory";

    fn record_id(record: &CatalogEntry) -> &RecordId {
        &record.id
    }
}

impl MutableResource for Accessory {
    type Draft = CategoryDraft;
    const UPDATE_PATH: Option<&'static str> = Some("/accessory/save");

    fn create_body(draft: &CategoryDraft) -> Value {
        Value::Object(grouping_body(Self::FIELD_PREFIX, draft))
    }

    fn update_body(id: &RecordId, draft: &CategoryDraft) -> Value {
        grouping_update_body(Self::FIELD_PREFIX, id, draft)
    }
}

impl ProductCollection for Accessory {
    const PRODUCT_PATH: &'static str = "/accessory/save";
    const FIELD_PREFIX: &'static str = "accessory";
}

/// Best-seller groupings.
#[derive(Debug, Clone, Copy)]
pub struct BestSeller;

impl Resource for BestSeller {
    type Record = CatalogEntry;
    const NAME: &'static str = "best-seller";
    const PATH: &'static str = "/bestseller";

    fn record_id(record: &CatalogEntry) -> &RecordId {
        &record.id
    }
}

impl MutableResource for BestSeller {
    type Draft = CategoryDraft;
    const UPDATE_PATH: Option<&'static str> = Some("/bestseller/save");

    fn create_body(draft: &CategoryDraft) -> Value {
        Value::Object(grouping_body(Self::FIELD_PREFIX, draft))
    }

    fn update_body(id: &RecordId, draft: &CategoryDraft) -> Value {
        grouping_update_body(Self::FIELD_PREFIX, id, draft)
    }
}

impl ProductCollection for BestSeller {
    const PRODUCT_PATH: &'static str = "/bestseller/save";
    const FIELD_PREFIX: &'static str = "bestSeller";
}

/// New-arrival showcase records. Saving with an id edits in place.
#[derive(Debug, Clone, Copy)]
pub struct NewArrivals;

impl Resource for NewArrivals {
    type Record = NewArrivalEntry;
    const NAME: &'static str = "new arrival";
    const PATH: &'static str = "/new-arrivals";

    fn record_id(record: &NewArrivalEntry) -> &RecordId {
        &record.id
    }
}

impl MutableResource for NewArrivals {
    type Draft = NewArrivalDraft;
    const UPDATE_PATH: Option<&'static str> = Some("/new-arrivals");

    fn create_body(draft: &NewArrivalDraft) -> Value {
        json!({
            "title": draft.title.trim(),
            "description": blank_to_none(draft.description.as_deref()).unwrap_or_default(),
            "imageUrl": blank_to_none(draft.image_url.as_deref()).unwrap_or_default(),
        })
    }

    fn update_body(id: &RecordId, draft: &NewArrivalDraft) -> Value {
        let mut body = Self::create_body(draft);
        if let Value::Object(map) = &mut body {
            map.insert("id".to_owned(), Value::String(id.to_string()));
        }
        body
    }
}

/// Customer orders. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct Orders;

impl Resource for Orders {
    type Record = OrderRecord;
    const NAME: &'static str = "order";
    const PATH: &'static str = "/orders";

    fn record_id(record: &OrderRecord) -> &RecordId {
        &record.id
    }
}

/// Registered customers. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct Customers;

impl Resource for Customers {
    type Record = CustomerRecord;
    const NAME: &'static str = "customer";
    const PATH: &'static str = "/user";

    fn record_id(record: &CustomerRecord) -> &RecordId {
        &record.id
    }
}
