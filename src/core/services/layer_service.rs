use super::types::{Item, Layer, LayerOption};
use crate::AppError;
use crate::core::pipeline::AnalysisSnapshot;
use crate::core::prompt::LayerPicker;
use crate::error::StateError;
use tracing::info;

pub const SELECT_LAYER_PROMPT: &str = "Select Layer:";

/// How the layer ended up selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Automatic,
    Chosen,
}

/// Snapshot with a selected layer, plus how it was chosen
#[derive(Debug, Clone)]
pub struct Selection {
    pub snapshot: AnalysisSnapshot,
    pub mode: SelectionMode,
}

impl Selection {
    pub fn layer(&self) -> Result<&Layer, StateError> {
        self.snapshot.require_layer()
    }

    /// Human-readable line naming the selected layer
    pub fn confirmation(&self) -> String {
        let name = self
            .snapshot
            .layer()
            .map(|l| l.name.as_str())
            .unwrap_or_default();
        match self.mode {
            SelectionMode::Automatic => format!("Automatically selected layer: {}", name),
            SelectionMode::Chosen => format!("Selected layer: {}", name),
        }
    }
}

/// Layer selector
#[derive(Default)]
pub struct LayerService;

impl LayerService {
    pub fn new() -> Self {
        Self
    }

    /// (name, index) pairs in the item's own order
    pub fn layer_options(item: &Item) -> Vec<LayerOption> {
        item.layers
            .iter()
            .enumerate()
            .map(|(index, layer)| LayerOption {
                label: layer.name.clone(),
                index,
            })
            .collect()
    }

    /// Select a layer of the snapshot's item.
    ///
    /// A single layer is taken without asking; otherwise `picker` blocks
    /// until the user chooses.
    pub fn select_layer(
        &self,
        snapshot: &AnalysisSnapshot,
        picker: &mut dyn LayerPicker,
    ) -> Result<Selection, AppError> {
        let item = snapshot.require_item()?;
        let options = Self::layer_options(item);

        let (index, mode) = match options.len() {
            0 => {
                return Err(StateError::NoLayers {
                    item_id: item.id.clone(),
                }
                .into());
            }
            1 => (0, SelectionMode::Automatic),
            _ => (
                picker.pick(SELECT_LAYER_PROMPT, &options)?,
                SelectionMode::Chosen,
            ),
        };

        let selection = Selection {
            snapshot: snapshot.with_layer(index)?,
            mode,
        };
        info!(index, mode = ?mode, "layer selected");
        Ok(selection)
    }
}
