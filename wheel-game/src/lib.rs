//! Live prize wheel gameplay
//!
//! Turns the shared store from `wheel-core` into a playable wheel: a timed
//! spin state machine, angle-to-prize resolution, play-once enforcement and
//! live config sync. Each participant process owns one [`WheelController`].

pub mod controller;
pub mod enforcer;
pub mod error;
pub mod moderator;
pub mod resolver;
pub mod session;
pub mod spin;
pub mod sync;
pub mod wheel;

pub use controller::{RecordStatus, SpinFrame, SpinOutcome, SpinResult, SpinTick, WheelController};
pub use enforcer::{Eligibility, UniquenessEnforcer};
pub use error::{GameError, Result};
pub use moderator::Moderator;
pub use resolver::{resolve, resolve_index, slice_arc};
pub use session::Session;
pub use spin::{SpinPhase, SpinState, SpinStep};
pub use sync::ConfigSync;
pub use wheel::{shared_wheel, SharedWheel, Wheel};

use std::sync::Arc;
use tokio::task::JoinHandle;
use wheel_core::{ConfigDocument, RecordCollection, WheelSettings};

/// Builds a participant controller whose wheel follows the config document.
///
/// The current document (or the fallback list) is applied before returning.
/// The sync task keeps running until aborted or the subscription ends.
pub async fn join_wheel(
    config: &dyn ConfigDocument,
    records: Arc<dyn RecordCollection>,
    settings: &WheelSettings,
) -> Result<(WheelController, JoinHandle<()>)> {
    let wheel = shared_wheel();
    let mut sync = ConfigSync::new(wheel.clone(), settings.fallback_items.clone());

    let mut subscription = config.subscribe();
    if let Some(update) = subscription.next().await {
        sync.apply(update)?;
    }

    let controller = WheelController::new(wheel, records, settings.spin.clone());
    Ok((controller, sync.spawn(subscription)))
}
