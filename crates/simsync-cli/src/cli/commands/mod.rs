//! CLI command handlers. Each command is in its own file.

mod categories;
mod completions;
mod man;
mod sync;
mod where_dir;

pub use categories::run_categories;
pub use completions::run_completions;
pub use man::run_man;
pub use sync::{run_sync, SyncArgs, SyncExit};
pub use where_dir::run_where;
