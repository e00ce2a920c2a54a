//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use procvisor::{
    Config, Event, EventKind, Payload, Process, ProcessError, ProcessRef, ProcessSpec, Subscribe,
    Supervisor,
};

// =============================================================================
// Journal
// =============================================================================

/// Ordered log of callbacks shared by every fixture of one test.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Journal::default()
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().clone()
}

pub fn count(journal: &Journal, entry: &str) -> usize {
    journal.lock().iter().filter(|e| e.as_str() == entry).count()
}

pub fn position(journal: &Journal, entry: &str) -> usize {
    journal
        .lock()
        .iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("{entry} not in journal"))
}

// =============================================================================
// Scripted process
// =============================================================================

/// Scriptable process that journals every callback as `<name>.<callback>`.
pub struct Scripted {
    name: &'static str,
    journal: Journal,
    init_error: Option<&'static str>,
    ticks: Mutex<VecDeque<Result<bool, ProcessError>>>,
    panic_on_tick: bool,
    panic_on_successor: bool,
    reject_messages: bool,
    next: Mutex<Option<ProcessSpec>>,
    pub received: Mutex<Vec<&'static str>>,
}

impl Scripted {
    pub fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: journal.clone(),
            init_error: None,
            ticks: Mutex::new(VecDeque::new()),
            panic_on_tick: false,
            panic_on_successor: false,
            reject_messages: false,
            next: Mutex::new(None),
            received: Mutex::new(Vec::new()),
        }
    }

    /// `init` fails with `msg`.
    pub fn failing_init(mut self, msg: &'static str) -> Self {
        self.init_error = Some(msg);
        self
    }

    /// Results returned by successive ticks; once exhausted ticks return `Ok(false)`.
    pub fn ticks(self, script: impl IntoIterator<Item = Result<bool, ProcessError>>) -> Self {
        self.ticks.lock().extend(script);
        self
    }

    /// Every tick keeps the process alive.
    pub fn endless(self) -> Self {
        self.ticks(std::iter::repeat_n(Ok(true), 10_000))
    }

    pub fn panicking(mut self) -> Self {
        self.panic_on_tick = true;
        self
    }

    /// `successor()` panics after journaling.
    pub fn panicking_successor(mut self) -> Self {
        self.panic_on_successor = true;
        self
    }

    pub fn rejecting_messages(mut self) -> Self {
        self.reject_messages = true;
        self
    }

    /// Successor returned after a normal stop.
    pub fn then(self, next: impl Into<ProcessSpec>) -> Self {
        *self.next.lock() = Some(next.into());
        self
    }

    pub fn into_ref(self) -> ProcessRef {
        Arc::new(self)
    }

    fn note(&self, what: &str) {
        self.journal.lock().push(format!("{}.{what}", self.name));
    }
}

#[async_trait]
impl Process for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn init(&self) -> Result<(), ProcessError> {
        self.note("init");
        match self.init_error {
            Some(msg) => Err(ProcessError::fail(msg)),
            None => Ok(()),
        }
    }

    async fn handle_message(&self, payload: Payload) -> Result<(), ProcessError> {
        self.note("message");
        if self.reject_messages {
            return Err(ProcessError::fail("bad message"));
        }
        if let Some(text) = payload.downcast_ref::<&'static str>() {
            self.received.lock().push(text);
        }
        Ok(())
    }

    async fn tick(&self) -> Result<bool, ProcessError> {
        self.note("tick");
        if self.panic_on_tick {
            panic!("tick exploded");
        }
        self.ticks.lock().pop_front().unwrap_or(Ok(false))
    }

    async fn cleanup(&self) {
        self.note("cleanup");
    }

    fn successor(&self) -> Option<ProcessSpec> {
        self.note("successor");
        if self.panic_on_successor {
            panic!("no next level");
        }
        self.next.lock().take()
    }
}

// =============================================================================
// Event recorder
// =============================================================================

#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn of(&self, kind: EventKind) -> Vec<Event> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, ev: &Event) {
        self.events.lock().push(ev.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

// =============================================================================
// Harness
// =============================================================================

/// Supervisor without stderr output, plus a recorder of every event.
pub fn harness() -> (Arc<Supervisor>, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let subs: Vec<Arc<dyn Subscribe>> = vec![recorder.clone()];
    let sup = Supervisor::builder(Config {
        stderr_diagnostics: false,
        ..Config::default()
    })
    .with_subscribers(subs)
    .build();
    (sup, recorder)
}

/// Polls `cond` every few milliseconds for up to two seconds.
pub async fn eventually(cond: impl Fn() -> bool) -> bool {
    for _ in 0..400 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}

/// Drains the supervisor, failing the test if it takes longer than two seconds.
pub async fn drained(sup: &Supervisor) {
    tokio::time::timeout(Duration::from_secs(2), sup.drain())
        .await
        .expect("registry should drain");
}
