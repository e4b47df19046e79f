//! Timer-paced progress ticks for the "analyzing" indicator.
//!
//! The simulator knows nothing about the real request; it only paces a fixed
//! number of steps so the front end has something to animate.

use futures_core::Stream;
use std::pin::Pin;
use std::time::Duration;

use crate::core::config::ProgressConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTick {
    /// 1-based index of the step just reached
    pub step: usize,
    pub total: usize,
}

impl ProgressTick {
    pub fn is_last(&self) -> bool {
        self.step == self.total
    }
}

pub type ProgressStream = Pin<Box<dyn Stream<Item = ProgressTick> + Send>>;

#[derive(Debug, Clone)]
pub struct ProgressSimulator {
    total: usize,
    interval: Duration,
    settle: Duration,
}

impl ProgressSimulator {
    pub fn new(total: usize, interval: Duration, settle: Duration) -> Self {
        Self {
            total,
            interval,
            settle,
        }
    }

    pub fn from_config(config: &ProgressConfig) -> Self {
        Self::new(config.steps.len(), config.interval(), config.settle())
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Consume the simulator into its tick stream. Nothing happens until the
    /// stream is polled, and the stream ends after the settle delay that
    /// follows the last tick.
    pub fn ticks(self) -> ProgressStream {
        let Self {
            total,
            interval,
            settle,
        } = self;
        Box::pin(async_stream::stream! {
            for step in 1..=total {
                tokio::time::sleep(interval).await;
                yield ProgressTick { step, total };
            }
            tokio::time::sleep(settle).await;
        })
    }
}
