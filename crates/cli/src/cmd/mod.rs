mod info;
mod package;
mod resolve;

pub use info::cmd_info;
pub use package::cmd_package;
pub use resolve::cmd_resolve;
