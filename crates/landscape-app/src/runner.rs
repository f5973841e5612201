//! Single-threaded host loop driver.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use landscape_core::{ServerEvent, Status};
use tracing::{debug, error, info};

use crate::config::HostConfig;
use crate::lifecycle::SpatialApplicationLifecycle;

/// A message the host delivers between lifecycle calls.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    /// Advance one tick by the given number of seconds.
    Tick(f32),
    /// A server event arrived.
    Event(ServerEvent),
    /// The host wants to shut the application down.
    Shutdown,
}

/// Source of host messages, in delivery order.
pub trait HostSource {
    /// Next message, or `None` when the host has nothing more to deliver.
    fn next_message(&mut self) -> Option<HostMessage>;

    /// Default handling for events the application did not consume.
    ///
    /// Default implementation drops the event.
    #[allow(unused_variables)]
    fn unhandled_event(&mut self, event: ServerEvent) {}
}

/// Why the host loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `init` returned a nonzero status.
    InitFailed,
    /// `update` returned `false`.
    AppRequested,
    /// The source delivered [`HostMessage::Shutdown`].
    Shutdown,
    /// The source ran out of messages.
    SourceExhausted,
}

/// Summary of one hosted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostOutcome {
    pub init: Status,
    pub deinit: Status,
    pub ticks: u64,
    pub events: u64,
    pub events_consumed: u64,
    pub stop: StopReason,
}

impl HostOutcome {
    /// Both `init` and `deinit` succeeded.
    pub const fn is_success(&self) -> bool {
        self.init.is_success() && self.deinit.is_success()
    }

    /// First nonzero status, or success.
    pub const fn status(&self) -> Status {
        if self.init.is_success() {
            self.deinit
        } else {
            self.init
        }
    }
}

/// Drive `app` through one complete lifecycle.
///
/// Calls `init` once. If it fails, `deinit` is still called once so any
/// scenes spawned before the failure are detached. Otherwise messages are
/// dispatched until `update` returns `false`, the source sends
/// [`HostMessage::Shutdown`], or the source is exhausted; then `deinit` is
/// called exactly once and nothing else reaches the application.
pub fn run_host<A, H>(app: &mut A, source: &mut H) -> HostOutcome
where
    A: SpatialApplicationLifecycle + ?Sized,
    H: HostSource + ?Sized,
{
    info!("Host starting application");

    let init = app.init();
    if !init.is_success() {
        error!("Application init failed with status {init}");
        let deinit = app.deinit();
        return HostOutcome {
            init,
            deinit,
            ticks: 0,
            events: 0,
            events_consumed: 0,
            stop: StopReason::InitFailed,
        };
    }

    let mut ticks = 0u64;
    let mut events = 0u64;
    let mut events_consumed = 0u64;

    let stop = loop {
        let Some(message) = source.next_message() else {
            break StopReason::SourceExhausted;
        };

        match message {
            HostMessage::Tick(dt) => {
                ticks += 1;
                if !app.update(dt) {
                    break StopReason::AppRequested;
                }
            }
            HostMessage::Event(event) => {
                events += 1;
                if app.handle_event(&event) {
                    events_consumed += 1;
                } else {
                    debug!("Event {:?} not consumed, using default handling", event.kind());
                    source.unhandled_event(event);
                }
            }
            HostMessage::Shutdown => break StopReason::Shutdown,
        }
    };

    info!("Host stopping application ({stop:?})");
    let deinit = app.deinit();
    if !deinit.is_success() {
        error!("Application deinit failed with status {deinit}");
    }

    HostOutcome {
        init,
        deinit,
        ticks,
        events,
        events_consumed,
        stop,
    }
}

/// Fixed-step tick source.
///
/// Queued events are delivered before the next tick. With real-time pacing
/// enabled the source sleeps so ticks are at least `dt` apart.
#[derive(Debug)]
pub struct FixedTickSource {
    dt: f32,
    max_ticks: Option<u64>,
    emitted: u64,
    pending: VecDeque<ServerEvent>,
    shutdown_requested: bool,
    realtime: bool,
    last_tick: Option<Instant>,
    unhandled: Vec<ServerEvent>,
}

impl FixedTickSource {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            max_ticks: None,
            emitted: 0,
            pending: VecDeque::new(),
            shutdown_requested: false,
            realtime: false,
            last_tick: None,
            unhandled: Vec::new(),
        }
    }

    /// Build a source from host configuration.
    pub fn from_config(config: &HostConfig) -> Self {
        let mut source = Self::new(config.tick_seconds());
        source.max_ticks = config.max_ticks;
        source.realtime = config.tick_rate_hz.is_some();
        source
    }

    /// Stop after `max` ticks.
    pub fn with_max_ticks(mut self, max: u64) -> Self {
        self.max_ticks = Some(max);
        self
    }

    /// Sleep between ticks to hold the tick rate.
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Queue an event for delivery before the next tick.
    pub fn push_event(&mut self, event: ServerEvent) {
        self.pending.push_back(event);
    }

    /// Deliver `Shutdown` after any queued events.
    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }

    /// Ticks delivered so far.
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Events the application declined.
    pub fn unhandled(&self) -> &[ServerEvent] {
        &self.unhandled
    }

    fn pace(&mut self) {
        if !self.realtime {
            return;
        }
        // Steps that do not fit a `Duration` (negative, NaN, infinite) are
        // delivered unpaced.
        let Ok(target) = Duration::try_from_secs_f32(self.dt) else {
            return;
        };
        if let Some(last) = self.last_tick {
            let elapsed = last.elapsed();
            if elapsed < target {
                thread::sleep(target - elapsed);
            }
        }
        self.last_tick = Some(Instant::now());
    }
}

impl HostSource for FixedTickSource {
    fn next_message(&mut self) -> Option<HostMessage> {
        if let Some(event) = self.pending.pop_front() {
            return Some(HostMessage::Event(event));
        }
        if self.shutdown_requested {
            self.shutdown_requested = false;
            return Some(HostMessage::Shutdown);
        }
        if self.max_ticks.is_some_and(|max| self.emitted >= max) {
            return None;
        }

        self.pace();
        self.emitted += 1;
        Some(HostMessage::Tick(self.dt))
    }

    fn unhandled_event(&mut self, event: ServerEvent) {
        self.unhandled.push(event);
    }
}
