mod interval;
mod session;

pub use interval::{Interval, Phase, TickOutcome};
pub use session::{Session, SessionConfig};
