//! The listing query service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use roomly_api::{paths, ApiClient, Result};
use roomly_core::{NewProperty, Property, PropertyFilter, PropertyUpdate};

#[derive(Default)]
struct Applied {
    listings: Vec<Property>,
}

/// Maps filter criteria to backend queries and sequences in-flight fetches.
///
/// Every [`fetch`](Self::fetch) is assigned a monotone ticket at start. A
/// response is applied only if its ticket is still the newest issued:
/// last-request-wins by request start order, not response arrival order.
/// Cheap to clone; clones share the sequence and the applied results.
#[derive(Clone)]
pub struct ListingService {
    inner: Arc<Inner>,
}

struct Inner {
    api: ApiClient,
    /// The newest ticket issued so far.
    seq: AtomicU64,
    current: Mutex<Applied>,
}

impl ListingService {
    /// Create the service over the shared gateway client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                seq: AtomicU64::new(0),
                current: Mutex::new(Applied::default()),
            }),
        }
    }

    /// Fetch listings for the given filter.
    ///
    /// A filter with zero populated fields issues the list-all query; any
    /// populated field switches to the filtered query carrying only the
    /// populated fields. Budget bounds pass through unvalidated; an inverted
    /// range is the backend's to answer.
    ///
    /// Returns `Ok(Some(listings))` when this fetch was still the newest on
    /// completion, `Ok(None)` when a newer fetch (or an
    /// [`invalidate`](Self::invalidate)) superseded it. A superseded fetch
    /// also swallows its failure rather than surfacing it for a query nobody
    /// is waiting on anymore.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure when this fetch is current.
    pub async fn fetch(&self, filter: &PropertyFilter) -> Result<Option<Vec<Property>>> {
        let ticket = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;

        let result: Result<Vec<Property>> = if filter.is_empty() {
            self.inner.api.get(paths::PROPERTIES_ALL).await
        } else {
            let params = filter.query_params();
            self.inner
                .api
                .get_query(paths::PROPERTIES_FILTER, &params)
                .await
        };

        let mut current = self.inner.current.lock();
        if self.inner.seq.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, "Discarding superseded listing fetch");
            return Ok(None);
        }

        match result {
            Ok(listings) => {
                current.listings.clone_from(&listings);
                Ok(Some(listings))
            }
            Err(e) => Err(e),
        }
    }

    /// Drop any in-flight fetch: its result will arrive with a stale ticket
    /// and be discarded instead of mutating state for a view that is gone.
    pub fn invalidate(&self) {
        self.inner.seq.fetch_add(1, Ordering::SeqCst);
    }

    /// The most recently applied listings.
    #[must_use]
    pub fn current(&self) -> Vec<Property> {
        self.inner.current.lock().listings.clone()
    }

    /// Fetch a single listing by id.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure.
    pub async fn get(&self, id: &str) -> Result<Property> {
        self.inner.api.get(&paths::property(id)).await
    }

    /// Fetch the current session's own listings.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure.
    pub async fn my_listings(&self) -> Result<Vec<Property>> {
        self.inner.api.get(paths::PROPERTIES_MINE).await
    }

    /// Create a listing owned by the current session's user.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure.
    pub async fn create(&self, listing: &NewProperty) -> Result<Property> {
        let created: Property = self.inner.api.post(paths::PROPERTY_CREATE, listing).await?;
        tracing::info!(id = %created.id, "Listing created");
        Ok(created)
    }

    /// Update an owned listing; only populated fields change.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure.
    pub async fn update(&self, id: &str, changes: &PropertyUpdate) -> Result<Property> {
        self.inner.api.put(&paths::property_update(id), changes).await
    }

    /// Delete an owned listing.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.inner.api.delete(&paths::property_delete(id)).await?;
        tracing::info!(id, "Listing deleted");
        Ok(())
    }
}
