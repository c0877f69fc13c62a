//! Immutable snapshots passed from one phase to the next.
//!
//! Session → item → layer are only ever added by producing a new snapshot,
//! so a phase always sees either complete upstream state or a `StateError`.

use crate::AppError;
use crate::core::services::types::{Item, Layer, Session};
use crate::error::{CliError, StateError};

#[derive(Debug, Clone, Default)]
pub struct AnalysisSnapshot {
    session: Option<Session>,
    item: Option<Item>,
    layer: Option<Layer>,
}

impl AnalysisSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticator output; any previous layer selection is dropped
    pub fn with_item(&self, session: Session, item: Item) -> Self {
        Self {
            session: Some(session),
            item: Some(item),
            layer: None,
        }
    }

    /// Bind `index` back into the item's layer list
    pub fn with_layer(&self, index: usize) -> Result<Self, AppError> {
        let item = self.require_item()?;
        let layer = item.layers.get(index).cloned().ok_or_else(|| {
            CliError::InvalidArguments(format!(
                "Layer index {} is out of range (item has {} layers)",
                index,
                item.layers.len()
            ))
        })?;

        Ok(Self {
            session: self.session.clone(),
            item: self.item.clone(),
            layer: Some(layer),
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn layer(&self) -> Option<&Layer> {
        self.layer.as_ref()
    }

    pub fn require_session(&self) -> Result<&Session, StateError> {
        self.session.as_ref().ok_or(StateError::NoSession)
    }

    pub fn require_item(&self) -> Result<&Item, StateError> {
        self.item.as_ref().ok_or(StateError::NoItem)
    }

    pub fn require_layer(&self) -> Result<&Layer, StateError> {
        self.layer.as_ref().ok_or(StateError::NoLayer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::traits::mock::MockPortal;

    fn item(layers: &[&str]) -> Item {
        Item {
            id: "abc123".to_string(),
            title: "Assets".to_string(),
            item_type: "Feature Service".to_string(),
            owner: None,
            layers: layers
                .iter()
                .enumerate()
                .map(|(i, name)| MockPortal::layer(i as i64, name))
                .collect(),
        }
    }

    #[test]
    fn test_empty_snapshot_requires_everything() {
        let snapshot = AnalysisSnapshot::new();
        assert_eq!(snapshot.require_session().unwrap_err(), StateError::NoSession);
        assert_eq!(snapshot.require_item().unwrap_err(), StateError::NoItem);
        assert_eq!(snapshot.require_layer().unwrap_err(), StateError::NoLayer);
    }

    #[test]
    fn test_with_layer_requires_item() {
        let result = AnalysisSnapshot::new().with_layer(0);
        assert!(matches!(result, Err(AppError::State(StateError::NoItem))));
    }

    #[test]
    fn test_phases_produce_new_snapshots() {
        let start = AnalysisSnapshot::new();
        let authed = start.with_item(MockPortal::session(), item(&["Parcels", "Roads"]));
        let selected = authed.with_layer(1).unwrap();

        // Earlier snapshots are untouched
        assert!(start.item().is_none());
        assert!(authed.layer().is_none());
        assert_eq!(selected.require_layer().unwrap().name, "Roads");
        assert_eq!(selected.require_item().unwrap().id, "abc123");
        assert!(selected.session().is_some());
    }

    #[test]
    fn test_with_layer_out_of_range() {
        let authed = AnalysisSnapshot::new().with_item(MockPortal::session(), item(&["Parcels"]));
        let result = authed.with_layer(3);
        assert!(matches!(
            result,
            Err(AppError::Cli(CliError::InvalidArguments(_)))
        ));
    }

    #[test]
    fn test_with_item_resets_layer() {
        let selected = AnalysisSnapshot::new()
            .with_item(MockPortal::session(), item(&["Parcels"]))
            .with_layer(0)
            .unwrap();
        let reauthed = selected.with_item(MockPortal::session(), item(&["Roads"]));
        assert!(reauthed.layer().is_none());
    }
}
