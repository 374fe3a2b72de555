//! Test adapters shared by the integration tests

#![allow(dead_code)]

use fanout_logger::core::diagnostic::DiagnosticSink;
use fanout_logger::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Init(String),
    Write(String, LogLevel),
    Refused(String),
    Flush,
    Destroy,
}

/// Shared record of everything an adapter instance was asked to do
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: Event) {
        self.0.lock().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().clone()
    }

    pub fn writes(&self) -> Vec<(String, LogLevel)> {
        self.0
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Write(message, level) => Some((message.clone(), *level)),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.writes().into_iter().map(|(message, _)| message).collect()
    }

    /// Writes that reached the adapter and were rejected
    pub fn refused_count(&self) -> usize {
        self.0
            .lock()
            .iter()
            .filter(|e| matches!(e, Event::Refused(_)))
            .count()
    }

    pub fn flush_count(&self) -> usize {
        self.0.lock().iter().filter(|e| **e == Event::Flush).count()
    }

    pub fn destroy_count(&self) -> usize {
        self.0.lock().iter().filter(|e| **e == Event::Destroy).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Record,
    FailInit,
    FailWrites,
    PanicOnWrite,
}

pub struct RecordingAdapter {
    journal: Journal,
    behavior: Behavior,
}

impl Adapter for RecordingAdapter {
    fn init(&mut self, config: &str) -> Result<()> {
        self.journal.push(Event::Init(config.to_string()));
        if self.behavior == Behavior::FailInit {
            return Err(LoggerError::adapter_init("recording", "rejected config"));
        }
        Ok(())
    }

    fn write_msg(&mut self, message: &str, level: LogLevel) -> Result<()> {
        match self.behavior {
            Behavior::FailWrites => {
                self.journal.push(Event::Refused(message.to_string()));
                Err(LoggerError::adapter_write("recording", "sink unavailable"))
            }
            Behavior::PanicOnWrite => panic!("adapter exploded"),
            _ => {
                self.journal.push(Event::Write(message.to_string(), level));
                Ok(())
            }
        }
    }

    fn flush(&mut self) {
        self.journal.push(Event::Flush);
    }

    fn destroy(&mut self) {
        self.journal.push(Event::Destroy);
    }
}

/// Register an adapter under `name` whose instances all share `journal`
pub fn register(registry: &AdapterRegistry, name: &str, journal: &Journal, behavior: Behavior) {
    let journal = journal.clone();
    registry.register(name, move || {
        Box::new(RecordingAdapter {
            journal: journal.clone(),
            behavior,
        }) as Box<dyn Adapter>
    });
}

/// Diagnostic sink that keeps every line
pub fn capture_diagnostics() -> (DiagnosticSink, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let lines_clone = Arc::clone(&lines);
    let sink: DiagnosticSink = Arc::new(move |line: &str| lines_clone.lock().push(line.to_string()));
    (sink, lines)
}

/// Logger with one recording adapter named "recording" already attached
pub fn recording_logger(queue_capacity: usize) -> (Logger, Journal) {
    let journal = Journal::new();
    let registry = Arc::new(AdapterRegistry::new());
    register(&registry, "recording", &journal, Behavior::Record);

    let (sink, _) = capture_diagnostics();
    let logger = Logger::with_diagnostics(registry, queue_capacity, sink);
    logger
        .add_adapter("recording", "")
        .expect("recording adapter attaches");
    (logger, journal)
}
