//! The drop zone widget and the selection it owns.

mod file_picker_component;
mod state;

pub use file_picker_component::{FilePickerWidget, describe_rejection};
pub use state::FilePickerState;
