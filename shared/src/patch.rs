//! Tri-state update field
//!
//! A partial update has to distinguish three cases per field: the key was not
//! sent (leave the column alone), the key was sent as `null` (clear the column)
//! and the key was sent with a value (overwrite the column). `Option<T>` folds the
//! first two together, so update payloads use [`Patch`] instead.
//!
//! Fields must be declared with `#[serde(default)]` so a missing key becomes
//! [`Patch::Unset`]:
//!
//! ```
//! use shared::patch::Patch;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Body {
//!     #[serde(default)]
//!     geojson: Patch<serde_json::Value>,
//! }
//!
//! let body: Body = serde_json::from_str("{}").unwrap();
//! assert!(body.geojson.is_unset());
//!
//! let body: Body = serde_json::from_str(r#"{"geojson": null}"#).unwrap();
//! assert!(body.geojson.is_clear());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Patch<T> {
    /// Key absent: leave untouched
    #[default]
    Unset,
    /// Key present with `null`: clear
    Clear,
    /// Key present with a value: overwrite
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Patch::Unset)
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Patch::Clear)
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Clear => Patch::Clear,
            Patch::Set(v) => Patch::Set(v),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Clear => Patch::Clear,
            Patch::Set(v) => Patch::Set(f(v)),
        }
    }

    /// Fallible [`Patch::map`]; only `Set` values reach `f`.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        Ok(match self {
            Patch::Unset => Patch::Unset,
            Patch::Clear => Patch::Clear,
            Patch::Set(v) => Patch::Set(f(v)?),
        })
    }

    /// `None` for `Unset`, `Some(None)` for `Clear`, `Some(Some(v))` for `Set`.
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Patch::Unset => None,
            Patch::Clear => Some(None),
            Patch::Set(v) => Some(Some(v)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Set(v),
            None => Patch::Clear,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            // Only reached when the field lacks `skip_serializing_if = "Patch::is_unset"`
            Patch::Unset | Patch::Clear => serializer.serialize_none(),
            Patch::Set(v) => serializer.serialize_some(v),
        }
    }
}
