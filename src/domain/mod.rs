pub mod common;
pub mod entry;
pub mod numeric;
pub mod project;
pub mod session;

pub use entry::{Entry, EntryForm, EntryKind, EntryPatch};
pub use project::Project;
pub use session::Session;
