//! The coordinator is the single authority sequencing state
//! persistence, visual-indicator updates, and broadcast to the
//! page-resident engines, for every toggle, tab load, activation and
//! keyboard command.

mod background;
pub mod host;
pub mod indicator;

pub use background::Coordinator;
pub use host::{is_restricted_url, HostError, TabHost};
pub use indicator::Indicator;
