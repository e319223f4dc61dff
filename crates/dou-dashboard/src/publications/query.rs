use std::sync::Arc;

use tracing::debug;

use super::domain::{PublicationFilter, PublicationRecord};
use super::store::{PublicationStore, StoreError};

/// Forwards search filters to the store and returns matching records.
pub struct PublicationQueryService<S> {
    store: Arc<S>,
}

impl<S> PublicationQueryService<S>
where
    S: PublicationStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn search(
        &self,
        filter: &PublicationFilter,
    ) -> Result<Vec<PublicationRecord>, StoreError> {
        debug!(?filter, unfiltered = filter.is_empty(), "searching publications");
        self.store.search(filter).await
    }
}
