//! Interaction seams between the pipeline and the human at the terminal

use crate::Result;
use crate::core::services::types::LayerOption;

/// Line-oriented input used by the authenticator
pub trait Prompter {
    /// Read a line; an empty answer falls back to `default` when given
    fn prompt(&mut self, label: &str, default: Option<&str>) -> Result<String>;

    /// Read a line without echoing it
    fn prompt_secret(&mut self, label: &str) -> Result<String>;

    /// Informational output (e.g. a URL the user must open)
    fn message(&mut self, text: &str);
}

/// Single-choice selector over a list of layers
pub trait LayerPicker {
    /// Blocks until the user picks one of `options` and returns its `index`
    fn pick(&mut self, prompt: &str, options: &[LayerOption]) -> Result<usize>;
}
