//! Mock live token listings: a timer-driven feed simulator and the
//! filter/sort pipeline that derives each tab's rows from it.

pub mod chart;
pub mod cli;
pub mod constants;
pub mod format;
pub mod logging;
pub mod model;
pub mod simulator;
pub mod snapshot;
pub mod view;
pub mod watch;

pub use model::{Category, SortDirection, SortKey, SortSpec, Token, Trend};
pub use simulator::{FeedEvent, FeedPhase, FeedSimulator, FeedSubscription, SimulatorConfig};
pub use view::{derive_view, ViewQuery};
