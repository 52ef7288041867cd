use crate::enforcer::{Eligibility, UniquenessEnforcer};
use crate::resolver;
use crate::session::Session;
use crate::spin::{SpinState, SpinStep};
use crate::wheel::SharedWheel;
use crate::{GameError, Result};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use wheel_core::{normalize_name, PlayRecord, RecordCollection, SpinSettings, WheelConfig};

/// What a renderer gets on each tick. Carries the slice number under the
/// pointer but never its label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpinFrame {
    pub angle: f64,
    pub progress: f64,
    pub slice: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinResult {
    pub player: String,
    pub index: usize,
    pub prize: String,
    pub angle: f64,
}

/// Whether the shown result made it into the shared ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordStatus {
    Saved { record: PlayRecord },
    /// Another session already claimed this name.
    Rejected,
    /// The result was shown but not stored.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinOutcome {
    pub result: SpinResult,
    pub record: RecordStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinTick {
    Frame(SpinFrame),
    Finished(SpinResult),
}

/// Per-client state: session, wheel rotation and the spin in flight.
pub struct WheelController {
    wheel: SharedWheel,
    enforcer: UniquenessEnforcer,
    settings: SpinSettings,
    session: Option<Session>,
    rotation: f64,
    spin: Option<SpinState>,
}

impl WheelController {
    pub fn new(
        wheel: SharedWheel,
        records: Arc<dyn RecordCollection>,
        settings: SpinSettings,
    ) -> Self {
        Self {
            wheel,
            enforcer: UniquenessEnforcer::new(records),
            settings,
            session: None,
            rotation: 0.0,
            spin: None,
        }
    }

    pub fn wheel(&self) -> SharedWheel {
        self.wheel.clone()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Accumulated rotation; each spin continues from here.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn spin_state(&self) -> Option<&SpinState> {
        self.spin.as_ref()
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.as_ref().is_some_and(SpinState::is_spinning)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_spinning() {
            return Err(GameError::AlreadySpinning);
        }
        Ok(())
    }

    pub async fn login(&mut self, name: &str) -> Result<&Session> {
        self.ensure_idle()?;

        let name = normalize_name(name);
        if name.is_empty() {
            return Err(GameError::InvalidName);
        }

        match self.enforcer.may_play(&name).await? {
            Eligibility::AlreadyPlayed => Err(GameError::AlreadyPlayed { name }),
            Eligibility::Allowed => {
                tracing::info!("{} logged in", name);
                Ok(self.session.insert(Session::authorized(name)))
            }
        }
    }

    /// Reorders the local list. The next config update overrides it.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.ensure_idle()?;
        self.wheel.write().shuffle(rng);
        Ok(())
    }

    /// Replaces the local list from free text. The next config update
    /// overrides it.
    pub fn edit_items(&mut self, text: &str) -> Result<usize> {
        self.ensure_idle()?;
        let config = WheelConfig::parse(text);
        let count = config.len();
        self.wheel.write().replace(config.items);
        Ok(count)
    }

    pub fn start_spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&SpinState> {
        self.ensure_idle()?;

        let item_count = self.wheel.read().len();
        if item_count == 0 {
            return Err(GameError::EmptyWheel);
        }

        let player = match &self.session {
            Some(session) if session.is_authorized() => session.name().to_string(),
            _ => return Err(GameError::NotAuthorized),
        };

        let state = SpinState::start(self.rotation, item_count, &self.settings, rng)?;

        tracing::info!(
            "{} spins: {:.0} ms at {:.2} deg/tick over {} items",
            player,
            state.total(),
            state.start_velocity(),
            item_count
        );
        Ok(self.spin.insert(state))
    }

    /// Advances the spin in flight by one tick. `None` when idle.
    pub fn tick(&mut self) -> Result<Option<SpinTick>> {
        let Some(state) = self.spin.as_mut() else {
            return Ok(None);
        };

        match state.advance() {
            SpinStep::Frame { angle } => {
                let progress = state.progress();
                let slice = resolver::resolve_index(angle, self.wheel.read().len());
                Ok(Some(SpinTick::Frame(SpinFrame {
                    angle,
                    progress,
                    slice,
                })))
            }
            SpinStep::Stopped { angle } => {
                self.spin = None;
                self.finish(angle).map(|result| Some(SpinTick::Finished(result)))
            }
            SpinStep::Idle => {
                self.spin = None;
                Ok(None)
            }
        }
    }

    /// Resolves against the list as it is now, which may differ from the
    /// list the spin started with.
    fn finish(&mut self, angle: f64) -> Result<SpinResult> {
        self.rotation = angle;

        let wheel = self.wheel.read();
        let Some((index, prize)) = resolver::resolve(angle, wheel.items()) else {
            tracing::warn!("Wheel emptied during the spin, no result");
            return Err(GameError::EmptyWheel);
        };

        let session = self.session.as_mut().ok_or(GameError::NotAuthorized)?;
        session.spend();

        let result = SpinResult {
            player: session.name().to_string(),
            index,
            prize: prize.to_string(),
            angle,
        };

        tracing::info!(
            "{} landed on slice {} of {}",
            result.player,
            index + 1,
            wheel.len()
        );
        Ok(result)
    }

    /// Writes the result. Failures are reported, never rolled back into the
    /// already-shown outcome.
    pub async fn record(&self, result: &SpinResult) -> RecordStatus {
        match self.enforcer.claim(&result.player, &result.prize).await {
            Ok(record) => RecordStatus::Saved { record },
            Err(GameError::AlreadyPlayed { name }) => {
                tracing::warn!("Result for {} not saved, name already claimed", name);
                RecordStatus::Rejected
            }
            Err(e) => {
                tracing::error!("Error saving result for {}: {}", result.player, e);
                RecordStatus::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Runs a whole spin on a fixed-interval timer, calling `on_frame` every
    /// tick, then records the result.
    pub async fn run_spin<R, F>(&mut self, rng: &mut R, mut on_frame: F) -> Result<SpinOutcome>
    where
        R: Rng + ?Sized,
        F: FnMut(&SpinFrame),
    {
        self.start_spin(rng)?;

        let mut ticker = tokio::time::interval(self.settings.tick());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        let result = loop {
            ticker.tick().await;
            match self.tick()? {
                Some(SpinTick::Frame(frame)) => on_frame(&frame),
                Some(SpinTick::Finished(result)) => break result,
                None => {
                    return Err(GameError::Core(wheel_core::WheelError::internal(
                        "spin ended without a result",
                    )))
                }
            }
        };

        let record = self.record(&result).await;
        Ok(SpinOutcome { result, record })
    }
}
