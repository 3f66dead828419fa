mod claim;
mod nameserver;
mod record;

pub use claim::*;
pub use nameserver::*;
pub use record::*;
