//! Sparse filter criteria for listing queries.

use serde::{Deserialize, Serialize};

use crate::types::Gender;

/// Sparse criteria narrowing a listing query.
///
/// Every field is optional; a filter with no populated fields means "all
/// listings". Budget bounds are inclusive and pass through to the backend
/// unvalidated: an inverted range (`min_budget > max_budget`) is forwarded
/// as-is rather than swapped or rejected, and the backend decides what it
/// returns for it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    /// Substring match on the listing location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Inclusive lower budget bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_budget: Option<f64>,
    /// Inclusive upper budget bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_budget: Option<f64>,
    /// Roommate gender preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_gender: Option<Gender>,
}

impl PropertyFilter {
    /// Returns `true` if no field is populated.
    ///
    /// A location that is present but blank counts as absent: a form with an
    /// emptied text box must not turn into "filter by empty string".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effective_location().is_none()
            && self.min_budget.is_none()
            && self.max_budget.is_none()
            && self.preferred_gender.is_none()
    }

    /// Build the query string pairs for the filtered-listing endpoint.
    ///
    /// Only populated fields are emitted; absent fields are never sent as
    /// empty or zero values.
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(location) = self.effective_location() {
            params.push(("location", location.to_string()));
        }
        if let Some(min) = self.min_budget {
            params.push(("minBudget", min.to_string()));
        }
        if let Some(max) = self.max_budget {
            params.push(("maxBudget", max.to_string()));
        }
        if let Some(gender) = self.preferred_gender {
            params.push(("preferredGender", gender.to_string()));
        }

        params
    }

    /// The location criterion, with blank input normalized to absent.
    fn effective_location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
