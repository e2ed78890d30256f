//! Repository layer for save games.
//!
//! Repositories hold the data that changes during play: the roster, the
//! group and the round counter. Level layouts and monsters are content and
//! are reloaded from the data directory instead.

mod error;
mod file;
mod memory;
mod save;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepository;
pub use save::{SAVE_VERSION, SaveGame};
pub use traits::SaveRepository;
