//! Command implementations for the CLI.

mod current;
mod export;
mod init;
mod locations;
mod query;
mod reset;
mod status;
mod sync;

pub use current::cmd_current;
pub use export::cmd_export;
pub use init::cmd_init;
pub use locations::cmd_locations;
pub use query::cmd_query;
pub use reset::cmd_reset;
pub use status::cmd_status;
pub use sync::cmd_sync;
