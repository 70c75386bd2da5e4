mod file_browser;

pub mod text_input;

pub use file_browser::{FileBrowserModal, FileBrowserState};
pub use text_input::TextInputState;
