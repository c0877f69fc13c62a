pub mod dispatcher;
pub mod layer_picker;
pub mod main_types;
pub mod prompt;
