//! Bounded polling for results that arrive asynchronously.
//!
//! A poll sequence repeats one probe (an HTTP request) until it reports a
//! ready result or the time budget runs out. The retry logic lives in
//! [`PollState::transition`], a pure function of the current state and the
//! last event, so it can be tested without a clock or a network. [`drive`]
//! performs the effects it asks for: issuing the probe and sleeping.

use crate::{Error, Result};
use reqwest::header::HeaderMap;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Response header carrying the server-suggested retry delays.
const DELAY_HEADER: &str = "x-ms-delay";

/// Delay used when the server suggests none, or suggests garbage.
const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Slack added on top of the poll timeout before the outer ceiling fires.
const CEILING_MARGIN: Duration = Duration::from_millis(10_000);

/// Ordered delays to wait between attempts, clamped at the last entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelaySchedule(Vec<Duration>);

impl DelaySchedule {
    /// Parse a comma separated list of milliseconds.
    ///
    /// A missing header yields the single default delay. Entries that are not
    /// non-negative integers are replaced by the default.
    pub fn parse(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::default();
        };

        let delays = header
            .split(',')
            .map(|entry| {
                entry
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .unwrap_or(DEFAULT_DELAY)
            })
            .collect();

        Self(delays)
    }

    /// Delay before the attempt following attempt number `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let index = (attempt as usize).min(self.0.len().saturating_sub(1));
        self.0.get(index).copied().unwrap_or(DEFAULT_DELAY)
    }
}

impl Default for DelaySchedule {
    fn default() -> Self {
        Self(vec![DEFAULT_DELAY])
    }
}

/// Normalized settings for one poll sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Total time budget. Zero means a single attempt.
    pub timeout: Duration,
    /// Whether running out of time is an error or an empty success.
    pub error_on_timeout: bool,
}

impl PollConfig {
    /// Build a config from raw options: no timeout means zero, no flag means
    /// error on timeout.
    pub fn new(timeout_ms: Option<u64>, error_on_timeout: Option<bool>) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms.unwrap_or(0)),
            error_on_timeout: error_on_timeout.unwrap_or(true),
        }
    }

    /// Upper bound on the whole sequence, past the point where the state
    /// machine would have given up on its own.
    pub fn ceiling(&self) -> Duration {
        self.timeout.saturating_add(CEILING_MARGIN)
    }

    pub(crate) fn timeout_ms(&self) -> u64 {
        millis(self.timeout)
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// How a finished sequence ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The last probe was ready.
    Found,
    /// Nothing ready, resolved without error (single attempt or soft timeout).
    Empty,
    /// Nothing ready and the budget ran out.
    TimedOut,
    /// The probe failed.
    Failed,
}

/// Phase of a poll sequence plus the number of retries scheduled so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// A probe is in flight.
    Attempting { attempts: u32 },
    /// Waiting for the retry timer.
    Waiting { attempts: u32, delay: Duration },
    Done(Outcome),
}

/// Something that happened to a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The probe returned.
    Probed {
        ready: bool,
        schedule: DelaySchedule,
        elapsed: Duration,
    },
    /// The probe failed at the transport level.
    Failed,
    /// The retry timer fired.
    TimerFired,
}

/// What the driver must do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Request,
    Sleep(Duration),
    Finish,
}

impl PollState {
    /// Initial state and the first effect of a new sequence.
    pub fn start() -> (Self, Effect) {
        (Self::Attempting { attempts: 0 }, Effect::Request)
    }

    /// Advance the sequence by one event.
    ///
    /// Events that do not apply to the current phase leave the state
    /// unchanged and repeat the effect it is waiting on.
    pub fn transition(self, event: Event, config: &PollConfig) -> (Self, Effect) {
        match (self, event) {
            (Self::Done(outcome), _) => (Self::Done(outcome), Effect::Finish),
            (Self::Attempting { .. }, Event::Failed) => {
                (Self::Done(Outcome::Failed), Effect::Finish)
            }
            (Self::Attempting { .. }, Event::Probed { ready: true, .. }) => {
                (Self::Done(Outcome::Found), Effect::Finish)
            }
            (Self::Attempting { .. }, Event::Probed { .. }) if config.timeout.is_zero() => {
                (Self::Done(Outcome::Empty), Effect::Finish)
            }
            (
                Self::Attempting { attempts },
                Event::Probed {
                    schedule, elapsed, ..
                },
            ) => {
                let delay = schedule.delay_for(attempts);
                let attempts = attempts + 1;

                if elapsed + delay > config.timeout {
                    let outcome = if config.error_on_timeout {
                        Outcome::TimedOut
                    } else {
                        Outcome::Empty
                    };
                    return (Self::Done(outcome), Effect::Finish);
                }

                (Self::Waiting { attempts, delay }, Effect::Sleep(delay))
            }
            (Self::Waiting { attempts, .. }, Event::TimerFired) => {
                (Self::Attempting { attempts }, Effect::Request)
            }
            (state @ Self::Attempting { .. }, Event::TimerFired) => (state, Effect::Request),
            (state @ Self::Waiting { delay, .. }, _) => (state, Effect::Sleep(delay)),
        }
    }
}

/// Raw delay schedule suggested by a response, if any.
pub(crate) fn suggested_delay(headers: &HeaderMap) -> Option<String> {
    headers
        .get(DELAY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Result of one probe.
#[derive(Debug)]
pub(crate) struct Probe<T> {
    pub value: T,
    pub ready: bool,
    /// Raw delay schedule header, if the server sent one.
    pub delay: Option<String>,
}

/// How a driven sequence resolved.
#[derive(Debug)]
pub(crate) enum Polled<T> {
    /// The last probe was ready.
    Ready(T),
    /// Resolved without a ready probe; holds the last value seen.
    Pending(T),
    /// The budget ran out and the config asks for an error.
    TimedOut,
}

/// Run a poll sequence, calling `probe` once per attempt.
///
/// Only one probe is in flight at a time. Probe errors end the sequence
/// immediately. The whole sequence is bounded by [`PollConfig::ceiling`].
pub(crate) async fn drive<T, F, Fut>(config: PollConfig, probe: F) -> Result<Polled<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Probe<T>>>,
{
    let ceiling = config.ceiling();
    tokio::time::timeout(ceiling, run(config, probe))
        .await
        .map_err(|_| Error::Deadline {
            after_ms: millis(ceiling),
        })?
}

async fn run<T, F, Fut>(config: PollConfig, mut probe: F) -> Result<Polled<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Probe<T>>>,
{
    let started = Instant::now();
    let (mut state, mut effect) = PollState::start();
    let mut last = None;
    let mut failure = None;

    loop {
        let event = match effect {
            Effect::Request => match probe().await {
                Ok(result) => {
                    let event = Event::Probed {
                        ready: result.ready,
                        schedule: DelaySchedule::parse(result.delay.as_deref()),
                        elapsed: started.elapsed(),
                    };
                    last = Some(result.value);
                    event
                }
                Err(err) => {
                    tracing::debug!(error = %err, "poll attempt failed");
                    failure = Some(err);
                    Event::Failed
                }
            },
            Effect::Sleep(delay) => {
                tracing::trace!(delay_ms = millis(delay), "waiting before next attempt");
                tokio::time::sleep(delay).await;
                Event::TimerFired
            }
            Effect::Finish => break,
        };

        (state, effect) = state.transition(event, &config);
    }

    if let Some(err) = failure {
        return Err(err);
    }

    match (state, last) {
        (PollState::Done(Outcome::Found), Some(value)) => Ok(Polled::Ready(value)),
        (PollState::Done(Outcome::TimedOut), _) => {
            tracing::debug!(
                elapsed_ms = millis(started.elapsed()),
                timeout_ms = config.timeout_ms(),
                "poll timed out"
            );
            Ok(Polled::TimedOut)
        }
        (_, Some(value)) => Ok(Polled::Pending(value)),
        (_, None) => Err(Error::NoMatch),
    }
}
