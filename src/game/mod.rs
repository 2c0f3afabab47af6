//! Game core: move resolution, per-session actor, session registry.

pub mod registry;
pub mod round;
pub mod session;

pub use registry::{GameInfo, SessionRegistry};
pub use round::{Move, RoundOutcome};
pub use session::{PlayerEvent, PlayerLink, SessionHandle};
