//! Utility helpers shared by the pdfdrop crates.

pub mod path_processing;
pub mod preferences;
pub mod size_formatting;
pub mod text_processing;

pub use path_processing::{candidate_from_path, expand_tilde, parse_dropped_paths, read_directory_entries, resolve_user_path};
pub use size_formatting::{SIZE_UNITS, format_size, format_size_with_precision};
pub use text_processing::truncate_to_width;
