use super::traits::Portal;
use super::types::FeatureTable;
use crate::AppError;
use crate::core::pipeline::AnalysisSnapshot;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Query loader: all records, all fields of the selected layer
pub struct QueryService {
    portal: Arc<dyn Portal>,
}

impl QueryService {
    pub fn new(portal: Arc<dyn Portal>) -> Self {
        Self { portal }
    }

    /// Fetch every record of the selected layer into a fresh table.
    ///
    /// Fails with `StateError::NoLayer` before touching the network when no
    /// layer is selected. Each call queries again; nothing is cached.
    pub async fn load_all(&self, snapshot: &AnalysisSnapshot) -> Result<FeatureTable, AppError> {
        let layer = snapshot.require_layer()?;
        let session = snapshot.require_session()?;
        if session.is_expired_at(Utc::now()) {
            warn!(layer = %layer.name, "session token has expired; the query may be rejected");
        }

        let response = self.portal.query_all(session, layer).await?;
        let table = FeatureTable::from_query(&layer.name, response);

        if table.truncated {
            warn!(
                layer = %layer.name,
                rows = table.len(),
                "server record limit reached; table is incomplete"
            );
        }
        info!(layer = %layer.name, rows = table.len(), columns = table.columns.len(), "layer loaded");
        Ok(table)
    }
}
