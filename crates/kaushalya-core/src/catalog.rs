//! Product groupings (catalog, accessory, best-seller) and their products.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::search::Searchable;
use crate::wire::{self, RecordId};
use crate::{Validate, ValidationError};

/// Id of the catch-all catalog that is never deletable.
pub const SHOP_ALL_ID: &str = "shopall";
pub const SHOP_ALL_NAME: &str = "Shop All";
pub const SHOP_ALL_DESCRIPTION: &str = "Complete jewelry collection";

/// A named grouping that owns zero or more products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: RecordId,
    #[serde(
        default,
        alias = "catalogName",
        alias = "accessoryName",
        alias = "bestSellerName",
        alias = "name",
        deserialize_with = "wire::string"
    )]
    pub category_name: String,
    #[serde(
        default,
        alias = "catalogDescription",
        alias = "accessoryDescription",
        alias = "bestSellerDescription",
        deserialize_with = "wire::text"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "catalogImage",
        alias = "accessoryImage",
        alias = "bestSellerImage",
        alias = "image",
        alias = "imageUrl",
        deserialize_with = "wire::text"
    )]
    pub image_ref: Option<String>,
    #[serde(default, deserialize_with = "wire::list_or_empty")]
    pub products: Vec<ProductEntry>,
}

impl CatalogEntry {
    /// The synthetic "Shop All" entry shown when the backend has none.
    #[must_use]
    pub fn shop_all() -> Self {
        Self {
            id: RecordId::from(SHOP_ALL_ID),
            category_name: SHOP_ALL_NAME.to_owned(),
            description: Some(SHOP_ALL_DESCRIPTION.to_owned()),
            image_ref: None,
            products: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_shop_all(&self) -> bool {
        self.id.as_str() == SHOP_ALL_ID || self.category_name == SHOP_ALL_NAME
    }

    #[must_use]
    pub fn product(&self, id: &RecordId) -> Option<&ProductEntry> {
        self.products.iter().find(|p| &p.id == id)
    }
}

impl Searchable for CatalogEntry {
    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.category_name.as_str())
            .chain(self.description.as_deref())
            .collect()
    }
}

/// A product owned by exactly one [`CatalogEntry`].
///
/// The backend and older drafts disagree on field names (`productName` and
/// `name`, `aboutProduct` and `about`, `productImage`, `images` and
/// `imageLinks`), so decoding accepts every spelling at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEntry {
    pub id: RecordId,
    pub name: String,
    pub real_price: Money,
    pub discount_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polish_type: Option<PolishType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<ProductSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    pub images: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    #[serde(default)]
    id: RecordId,
    #[serde(default, deserialize_with = "wire::text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "wire::text")]
    product_name: Option<String>,
    #[serde(default)]
    real_price: Money,
    #[serde(default)]
    discount_price: Money,
    #[serde(default, deserialize_with = "wire::parsed_text")]
    polish_type: Option<PolishType>,
    #[serde(default, deserialize_with = "wire::parsed_text")]
    size: Option<ProductSize>,
    #[serde(default, deserialize_with = "wire::text")]
    about: Option<String>,
    #[serde(default, deserialize_with = "wire::text")]
    about_product: Option<String>,
    #[serde(default, deserialize_with = "wire::one_or_many")]
    product_image: Vec<String>,
    #[serde(default, deserialize_with = "wire::one_or_many")]
    images: Vec<String>,
    #[serde(default, deserialize_with = "wire::one_or_many")]
    image_links: Vec<String>,
}

impl<'de> Deserialize<'de> for ProductEntry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawProduct::deserialize(deserializer)?;
        let mut images: Vec<String> = Vec::new();
        for link in raw
            .product_image
            .into_iter()
            .chain(raw.images)
            .chain(raw.image_links)
        {
            if !images.contains(&link) {
                images.push(link);
            }
        }
        Ok(Self {
            id: raw.id,
            name: raw
                .product_name
                .filter(|n| !n.trim().is_empty())
                .or(raw.name)
                .unwrap_or_default(),
            real_price: raw.real_price,
            discount_price: raw.discount_price,
            polish_type: raw.polish_type,
            size: raw.size,
            about: raw.about_product.or(raw.about),
            images,
        })
    }
}

impl ProductEntry {
    #[must_use]
    pub fn discount_percent(&self) -> i64 {
        crate::pricing::discount_percent(self.real_price, self.discount_price)
    }
}

impl Searchable for ProductEntry {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum PolishType {
    HighPolish,
    MatteFinish,
    AntiqueFinish,
    SatinFinish,
    Other(String),
}

impl From<String> for PolishType {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "high polish" => Self::HighPolish,
            "matte finish" => Self::MatteFinish,
            "antique finish" => Self::AntiqueFinish,
            "satin finish" => Self::SatinFinish,
            _ => Self::Other(value),
        }
    }
}

impl From<PolishType> for String {
    fn from(value: PolishType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for PolishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighPolish => write!(f, "High Polish"),
            Self::MatteFinish => write!(f, "Matte Finish"),
            Self::AntiqueFinish => write!(f, "Antique Finish"),
            Self::SatinFinish => write!(f, "Satin Finish"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ProductSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
    Other(String),
}

impl From<String> for ProductSize {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "small" => Self::Small,
            "medium" => Self::Medium,
            "large" => Self::Large,
            "extra large" => Self::ExtraLarge,
            _ => Self::Other(value),
        }
    }
}

impl From<ProductSize> for String {
    fn from(value: ProductSize) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ProductSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => write!(f, "Small"),
            Self::Medium => write!(f, "Medium"),
            Self::Large => write!(f, "Large"),
            Self::ExtraLarge => write!(f, "Extra Large"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Form input for a new grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl Validate for CategoryDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required { field: "name" });
        }
        Ok(())
    }
}

/// Form input for adding or editing a product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub real_price: Option<Money>,
    pub discount_price: Option<Money>,
    pub polish_type: Option<PolishType>,
    pub size: Option<ProductSize>,
    pub about: Option<String>,
    pub images: Vec<String>,
}

impl ProductDraft {
    /// Image links with blank entries removed.
    #[must_use]
    pub fn image_links(&self) -> Vec<&str> {
        self.images
            .iter()
            .map(|link| link.trim())
            .filter(|link| !link.is_empty())
            .collect()
    }
}

impl From<&ProductEntry> for ProductDraft {
    fn from(product: &ProductEntry) -> Self {
        Self {
            name: product.name.clone(),
            real_price: Some(product.real_price),
            discount_price: Some(product.discount_price),
            polish_type: product.polish_type.clone(),
            size: product.size.clone(),
            about: product.about.clone(),
            images: product.images.clone(),
        }
    }
}

impl Validate for ProductDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product name",
            });
        }
        if self.real_price.is_none() {
            return Err(ValidationError::Required {
                field: "real price",
            });
        }
        if self.discount_price.is_none() {
            return Err(ValidationError::Required {
                field: "discount price",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
