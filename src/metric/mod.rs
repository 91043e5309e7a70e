mod duration;
mod snapshot;

pub use duration::*;
pub use snapshot::*;
