pub mod common;
pub mod entry;
pub mod settings;

pub use common::{Displayable, Identifiable, NamedEntity};
pub use entry::{Entry, EntryDraft, Label};
pub use settings::Settings;
