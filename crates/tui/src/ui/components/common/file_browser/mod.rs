//! File dialog shown when the drop zone is activated.

mod file_browser_component;
mod state;

pub use file_browser_component::FileBrowserModal;
pub use state::FileBrowserState;
