mod config;
mod lifecycle;
mod session;
mod track_state;
mod visibility;

pub use config::SessionConfig;
pub use lifecycle::{Departure, TrackerLifecycle};
pub use session::{Session, SessionBuilder};
pub use track_state::TrackState;
pub use visibility::VisibilityCoordinator;
