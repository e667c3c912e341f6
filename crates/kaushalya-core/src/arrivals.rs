use serde::{Deserialize, Serialize};

use crate::search::Searchable;
use crate::wire::{self, RecordId};
use crate::{Validate, ValidationError};

/// A flat "new arrival" showcase record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArrivalEntry {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "wire::string")]
    pub title: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub description: Option<String>,
    #[serde(default, alias = "image", deserialize_with = "wire::text")]
    pub image_url: Option<String>,
}

impl Searchable for NewArrivalEntry {
    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.title.as_str())
            .chain(self.description.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewArrivalDraft {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<&NewArrivalEntry> for NewArrivalDraft {
    fn from(entry: &NewArrivalEntry) -> Self {
        Self {
            title: entry.title.clone(),
            description: entry.description.clone(),
            image_url: entry.image_url.clone(),
        }
    }
}

impl Validate for NewArrivalDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required { field: "title" });
        }
        Ok(())
    }
}
