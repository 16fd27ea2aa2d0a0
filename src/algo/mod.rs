pub mod classify;
pub mod partition;
pub mod split;

pub use self::classify::*;
pub use self::partition::*;
pub use self::split::*;
