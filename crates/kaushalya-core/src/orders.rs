//! Orders, customers and the dashboard aggregate. Read-only from the admin side.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::money::Money;
use crate::search::Searchable;
use crate::wire::{self, RecordId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "wire::string")]
    pub order_id: String,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, deserialize_with = "wire::list_or_empty")]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub subtotal: Money,
    #[serde(default)]
    pub tax: Money,
    #[serde(default)]
    pub shipping: Money,
    #[serde(default)]
    pub total: Money,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(
        default,
        deserialize_with = "wire::parsed_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Backend fields this client does not model, kept so exports carry the
    /// record's full field set.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderRecord {
    /// `"First Last"`, or `None` when both parts are blank.
    #[must_use]
    pub fn customer_name(&self) -> Option<String> {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
    }

    /// `"address, city, state - pincode"` built from the parts that exist.
    #[must_use]
    pub fn shipping_address(&self) -> Option<String> {
        let street: Vec<&str> = [&self.address, &self.city, &self.state]
            .into_iter()
            .filter_map(|part| non_blank(part.as_deref()))
            .collect();
        let mut line = street.join(", ");
        if let Some(pincode) = non_blank(self.pincode.as_deref()) {
            if line.is_empty() {
                line.push_str(pincode);
            } else {
                line.push_str(" - ");
                line.push_str(pincode);
            }
        }
        (!line.is_empty()).then_some(line)
    }

    #[must_use]
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

impl Searchable for OrderRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.order_id.as_str()]
    }
}

/// One invoice line. Decoding never fails: a non-object element becomes a
/// placeholder line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: Option<String>,
    pub quantity: Option<u64>,
    pub price: Money,
    pub total: Money,
}

impl OrderItem {
    /// Missing or zero quantities count as one.
    #[must_use]
    pub fn effective_quantity(&self) -> u64 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }
}

#[derive(Deserialize)]
struct RawOrderItem {
    #[serde(default, deserialize_with = "wire::text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_count")]
    quantity: Option<u64>,
    #[serde(default)]
    price: Money,
    #[serde(default)]
    total: Money,
}

impl<'de> Deserialize<'de> for OrderItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value::<RawOrderItem>(value)
            .map(|raw| Self {
                name: raw.name.filter(|n| !n.trim().is_empty()),
                quantity: raw.quantity,
                price: raw.price,
                total: raw.total,
            })
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Other(String),
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("pending") {
            Self::Pending
        } else if value.eq_ignore_ascii_case("shipped") {
            Self::Shipped
        } else if value.eq_ignore_ascii_case("delivered") {
            Self::Delivered
        } else {
            Self::Other(value)
        }
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Shipped => write!(f, "Shipped"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "wire::text", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomerRecord {
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
    }

    #[must_use]
    pub fn joined_on(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

impl Searchable for CustomerRecord {
    fn search_fields(&self) -> Vec<&str> {
        [&self.first_name, &self.last_name, &self.email]
            .into_iter()
            .filter_map(Option::as_deref)
            .collect()
    }
}

/// Aggregate served by `GET /stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_revenue: Money,
    #[serde(default, deserialize_with = "wire::count")]
    pub total_orders: u64,
    #[serde(default, deserialize_with = "wire::count")]
    pub total_customers: u64,
    #[serde(default, deserialize_with = "wire::list_or_empty")]
    pub top_states: Vec<StateCount>,
    #[serde(default, deserialize_with = "wire::list_or_empty")]
    pub recent_orders: Vec<OrderRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCount {
    #[serde(default, deserialize_with = "wire::string")]
    pub state: String,
    #[serde(default, deserialize_with = "wire::count")]
    pub order_count: u64,
}

/// Reads RFC 3339, naive ISO date-times, plain dates and epoch milliseconds.
/// Timestamps with an offset are converted to their UTC date.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

fn non_blank(part: Option<&str>) -> Option<&str> {
    part.map(str::trim).filter(|s| !s.is_empty())
}

fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [first, last].into_iter().filter_map(non_blank).collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

#[cfg(test)]
#[path = "orders_test.rs"]
mod tests;
