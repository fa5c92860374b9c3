//! Bean of the day rotation.
//!
//! A cycle reads the current bean of the day, picks a random different bean and moves the
//! flag to it in one transaction. The ticker task runs one cycle per interval and awaits
//! each cycle before waiting for the next tick, so cycles never overlap. Failures are
//! logged and the next tick simply tries again.

use crate::{
    core::bean as store,
    entities::bean,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{error, info, warn};

/// Result of one rotation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The flag moved to `current`
    Rotated {
        /// Id of the bean that held the flag before, if any
        previous: Option<String>,
        /// The new bean of the day
        current: bean::Model,
    },
    /// No bean other than the current one exists; nothing changed
    NoCandidate {
        /// Id of the bean that still holds the flag, if any
        current: Option<String>,
    },
}

/// Runs one rotation cycle and reports what happened.
///
/// # Errors
/// Returns an error if any database step fails. The flag update itself is atomic, so a
/// failure never leaves the catalog with zero or two beans of the day.
pub async fn rotate_botd(db: &DatabaseConnection) -> Result<RotationOutcome> {
    let previous = store::get_current_botd(db).await?.map(|bean| bean.id);

    let Some(mut candidate) = store::pick_random_other_than(db, previous.as_deref()).await?
    else {
        return Ok(RotationOutcome::NoCandidate { current: previous });
    };

    store::set_botd(db, &candidate.id).await?;
    candidate.is_botd = true;

    Ok(RotationOutcome::Rotated {
        previous,
        current: candidate,
    })
}

/// Runs one cycle, logging the outcome. Never returns an error.
pub async fn run_rotation_cycle(db: &DatabaseConnection) -> Option<RotationOutcome> {
    match rotate_botd(db).await {
        Ok(outcome) => {
            match &outcome {
                RotationOutcome::Rotated { current, .. } => {
                    info!("New bean of the day selected: {} ({})", current.name, current.id);
                }
                RotationOutcome::NoCandidate { .. } => {
                    warn!("No candidate bean found for bean of the day");
                }
            }
            Some(outcome)
        }
        Err(e) => {
            error!("Failed to select bean of the day: {}", e);
            None
        }
    }
}

/// Spawns the rotation ticker on the tokio runtime.
///
/// The first cycle runs one `period` after spawning. Abort the returned handle to stop
/// the task at shutdown.
///
/// # Errors
/// Returns [`Error::Config`] if `period` is zero.
pub fn spawn_rotation_task(db: DatabaseConnection, period: Duration) -> Result<JoinHandle<()>> {
    if period.is_zero() {
        return Err(Error::Config {
            message: "bean of the day rotation interval must be greater than zero".to_string(),
        });
    }

    Ok(tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(?period, "Bean of the day rotation scheduled");

        loop {
            ticker.tick().await;
            run_rotation_cycle(&db).await;
        }
    }))
}
