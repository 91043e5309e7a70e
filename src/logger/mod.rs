mod base;
mod file;
mod in_memory;
mod install;

pub use base::*;
pub use file::*;
pub use in_memory::*;
pub use install::*;
