use std::{thread::sleep, time::Duration};

use crate::{error::Error, prelude::*, snapshot::Readings};

/// Where the readings come from.
pub trait ReadingsSource {
    fn read(&mut self) -> Result<Readings>;

    /// Reload the view and wait until it is populated again.
    fn refresh(&mut self) -> Result;
}

/// What to do when the readings never become consistent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Policy {
    /// Skip the customer.
    #[default]
    Fail,

    /// Log a warning and publish the last readings anyway.
    Warn,
}

#[must_use]
#[derive(Copy, Clone, Debug, bon::Builder)]
pub struct Validator {
    #[builder(default = 5)]
    pub max_attempts: usize,

    #[builder(default = Duration::from_secs(1))]
    pub settle_delay: Duration,

    #[builder(default)]
    pub on_exhausted: Policy,
}

impl Validator {
    /// Read until the consistency gate passes or the attempts run out.
    #[instrument(skip_all, fields(max_attempts = self.max_attempts))]
    pub fn validate(&self, source: &mut impl ReadingsSource) -> Result<Readings> {
        let mut last_readings = None;
        for attempt in 1..=self.max_attempts {
            match source.read() {
                Ok(readings) if readings.is_consistent() => {
                    debug!(attempt, ?readings, "consistent");
                    return Ok(readings);
                }
                Ok(readings) => {
                    warn!(attempt, ?readings, "inconsistent readings");
                    last_readings = Some(readings);
                }
                Err(error) if Self::is_retryable(&error) && attempt < self.max_attempts => {
                    warn!(attempt, "failed to read: {error:#}");
                }
                Err(error) => return Err(error),
            }
            if attempt < self.max_attempts {
                source.refresh().context("failed to refresh the readings")?;
                sleep(self.settle_delay);
            }
        }

        // The loop always returns unless the final read was inconsistent.
        let readings = last_readings.context("no attempts were made")?;
        match self.on_exhausted {
            Policy::Fail => Err(Error::InconsistentData { attempts: self.max_attempts }.into()),
            Policy::Warn => {
                warn!(?readings, "readings might be inconsistent, publishing anyway");
                Ok(readings)
            }
        }
    }

    fn is_retryable(error: &anyhow::Error) -> bool {
        error.downcast_ref::<Error>().is_some_and(Error::is_field_error)
    }
}
