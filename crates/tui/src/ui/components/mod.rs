//! UI components: the drop zone and the shared file dialog.

pub mod common;
pub mod component;
pub mod file_picker;

pub(crate) use component::Component;
