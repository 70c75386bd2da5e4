//! Shared type definitions for pdfdrop.
//!
//! The picker, the drop collaborator, and the CLI exchange the records defined
//! here: the file currently selected, the files offered by a drop or a file
//! dialog, and the acceptance policy that decides between the two.

mod file;
mod policy;

pub use file::{CandidateFile, DirectoryEntry, SelectedFile, mime_type_for_name};
pub use policy::{AcceptPolicy, DEFAULT_MAX_SIZE, DropOutcome, FileRejection, RejectionReason};
