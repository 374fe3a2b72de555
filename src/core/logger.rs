//! Main logger implementation

use super::{
    adapter::Adapter,
    config::{LoggerConfig, DEFAULT_QUEUE_CAPACITY},
    diagnostic::{panic_message, stderr_sink, DiagnosticSink},
    error::{LoggerError, Result},
    format::{format_message, CallerLocation, DEFAULT_CALLER_SKIP},
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    registry::AdapterRegistry,
};
use crossbeam_channel::{bounded, select, Receiver, SendTimeoutError, Sender, TrySendError};
use parking_lot::{Condvar, Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe, Location};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Name of the background delivery thread
pub const DISPATCHER_THREAD_NAME: &str = "log-dispatcher";

/// How often a producer blocked on a full queue checks that an adapter is still active
const STALL_CHECK_INTERVAL: Duration = Duration::from_millis(10);

/// What a delivery does with the remaining adapters once one write fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFailureMode {
    /// Return the first error; adapters after the failing one miss the record
    StopAtFirst,
    /// Report each failure and keep writing to every adapter
    Continue,
}

/// The three places a record can be handed to the adapters from.
///
/// Synchronous calls stop at the first failing adapter and hand its error
/// back to the caller. The dispatcher and the close-time drain have no
/// caller to report to, so they report every failure and keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPath {
    Direct,
    Dispatcher,
    Drain,
}

impl DeliveryPath {
    pub fn failure_mode(self) -> WriteFailureMode {
        match self {
            DeliveryPath::Direct => WriteFailureMode::StopAtFirst,
            DeliveryPath::Dispatcher | DeliveryPath::Drain => WriteFailureMode::Continue,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            DeliveryPath::Direct => "",
            DeliveryPath::Dispatcher => " (async)",
            DeliveryPath::Drain => " (while closing logger)",
        }
    }
}

type AdapterMap = HashMap<String, Box<dyn Adapter>>;

/// State shared with the dispatcher thread
struct Shared {
    adapters: Mutex<AdapterMap>,
    /// Signalled when adapters are added or the logger starts closing
    adapters_changed: Condvar,
    closing: AtomicBool,
    metrics: LoggerMetrics,
    diagnostics: DiagnosticSink,
}

impl Shared {
    fn report(&self, line: &str) {
        (self.diagnostics)(line);
    }

    /// Write one record to every active adapter.
    ///
    /// Holds the adapter lock for the whole record, so structural changes
    /// never interleave with a delivery.
    fn deliver(&self, record: &LogRecord, path: DeliveryPath) -> Result<()> {
        let mut adapters = self.adapters.lock();
        self.deliver_locked(&mut adapters, record, path)
    }

    /// Deliver a dequeued record, or hand it back if no adapter is active.
    ///
    /// The emptiness check and the writes happen under one lock, so an
    /// adapter removed after the dispatcher woke up cannot swallow the record.
    fn deliver_queued(&self, record: LogRecord) -> Option<LogRecord> {
        let mut adapters = self.adapters.lock();
        if adapters.is_empty() {
            return Some(record);
        }
        // Failures are reported by deliver_locked; there is no caller to return them to
        let _ = self.deliver_locked(&mut adapters, &record, DeliveryPath::Dispatcher);
        None
    }

    fn has_active_adapters(&self) -> bool {
        !self.adapters.lock().is_empty()
    }

    fn deliver_locked(
        &self,
        adapters: &mut AdapterMap,
        record: &LogRecord,
        path: DeliveryPath,
    ) -> Result<()> {
        let mut first_error = None;

        for (name, adapter) in adapters.iter_mut() {
            let result = guarded(name, || adapter.write_msg(&record.message, record.level))
                .and_then(|written| written);

            if let Err(e) = result {
                self.report(&format!(
                    "unable to write to adapter '{}'{}: {}",
                    name,
                    path.describe(),
                    e
                ));
                if first_error.is_none() {
                    first_error = Some(e);
                }
                if path.failure_mode() == WriteFailureMode::StopAtFirst {
                    break;
                }
            }
        }

        self.metrics.record_dispatched();
        match first_error {
            Some(e) => {
                self.metrics.record_write_failure();
                Err(e)
            }
            None => Ok(()),
        }
    }

    fn flush_all(&self, adapters: &mut AdapterMap) {
        for (name, adapter) in adapters.iter_mut() {
            if let Err(e) = guarded(name, || adapter.flush()) {
                self.report(&format!("flush failed: {}", e));
            }
        }
    }

    fn destroy(&self, name: &str, mut adapter: Box<dyn Adapter>) {
        if let Err(e) = guarded(name, || adapter.destroy()) {
            self.report(&format!("destroy failed: {}", e));
        }
    }
}

/// Run an adapter call, turning a panic into an error
fn guarded<T>(name: &str, call: impl FnOnce() -> T) -> Result<T> {
    catch_unwind(AssertUnwindSafe(call))
        .map_err(|payload| LoggerError::adapter_panicked(name, panic_message(payload.as_ref())))
}

struct Dispatcher {
    /// Yields the record the dispatcher was holding when it stopped, if any
    handle: thread::JoinHandle<Option<LogRecord>>,
    /// Dropping this wakes the dispatcher and tells it to exit
    shutdown: Sender<()>,
}

impl Dispatcher {
    /// Deliver queued records until shutdown.
    ///
    /// Returns the record taken off the queue but not yet delivered because
    /// every adapter was removed in the meantime; it is older than anything
    /// still queued.
    fn run(
        shared: Arc<Shared>,
        records: Receiver<LogRecord>,
        shutdown: Receiver<()>,
    ) -> Option<LogRecord> {
        let mut pending = None;
        loop {
            // Records stay queued until there is somewhere to write them
            {
                let mut adapters = shared.adapters.lock();
                while adapters.is_empty() && !shared.closing.load(Ordering::Acquire) {
                    shared.adapters_changed.wait(&mut adapters);
                }
            }
            if shared.closing.load(Ordering::Acquire) {
                return pending;
            }

            let record = match pending.take() {
                Some(record) => record,
                None => select! {
                    recv(records) -> record => match record {
                        Ok(record) => record,
                        Err(_) => return None,
                    },
                    recv(shutdown) -> _ => return None,
                },
            };
            pending = shared.deliver_queued(record);
        }
    }
}

/// A logger that fans each message out to its active adapters.
///
/// Adapters are built by name from an [`AdapterRegistry`]. Every method
/// takes `&self`, so a logger can be shared between threads through an
/// `Arc`.
///
/// # Example
///
/// ```
/// use fanout_logger::prelude::*;
/// use fanout_logger::error;
/// use std::sync::Arc;
///
/// let registry = Arc::new(AdapterRegistry::new());
/// let logger = Logger::new(registry, 1000);
/// logger.set_min_level(LogLevel::Warning);
///
/// error!(logger, "disk {} is full", "/dev/sda1").unwrap();
/// logger.close();
/// ```
pub struct Logger {
    registry: Arc<AdapterRegistry>,
    shared: Arc<Shared>,
    sender: Sender<LogRecord>,
    receiver: Receiver<LogRecord>,
    queue_capacity: usize,
    min_level: AtomicU8,
    caller_location: AtomicBool,
    caller_skip: AtomicUsize,
    tag: RwLock<String>,
    async_mode: AtomicBool,
    dispatcher: Mutex<Option<Dispatcher>>,
    closed: AtomicBool,
}

impl Logger {
    /// Create a synchronous logger with no adapters.
    ///
    /// `queue_capacity` sizes the buffer used once asynchronous mode is
    /// enabled. The minimum level starts at [`LogLevel::Debug`] and caller
    /// location is off.
    #[must_use]
    pub fn new(registry: Arc<AdapterRegistry>, queue_capacity: usize) -> Self {
        Self::with_diagnostics(registry, queue_capacity, stderr_sink())
    }

    /// Create a logger that reports its own failures to `diagnostics`
    #[must_use]
    pub fn with_diagnostics(
        registry: Arc<AdapterRegistry>,
        queue_capacity: usize,
        diagnostics: DiagnosticSink,
    ) -> Self {
        let (sender, receiver) = bounded(queue_capacity);

        Self {
            registry,
            shared: Arc::new(Shared {
                adapters: Mutex::new(HashMap::new()),
                adapters_changed: Condvar::new(),
                closing: AtomicBool::new(false),
                metrics: LoggerMetrics::new(),
                diagnostics,
            }),
            sender,
            receiver,
            queue_capacity,
            min_level: AtomicU8::new(LogLevel::Debug.as_u8()),
            caller_location: AtomicBool::new(false),
            caller_skip: AtomicUsize::new(DEFAULT_CALLER_SKIP),
            tag: RwLock::new(String::new()),
            async_mode: AtomicBool::new(false),
            dispatcher: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder(registry: Arc<AdapterRegistry>) -> LoggerBuilder {
        LoggerBuilder::new(registry)
    }

    /// Switch to queued delivery and start the dispatcher thread.
    ///
    /// Calling this again is a no-op; there is never more than one
    /// dispatcher per logger.
    ///
    /// The dispatcher only takes records off the queue while an adapter is
    /// active. Until then records are buffered up to the queue capacity, and
    /// a log call that finds the queue full with no adapter active fails
    /// with [`LoggerError::QueueFull`] instead of blocking. With a capacity
    /// of zero that is every call made before the first adapter is added.
    pub fn enable_async(&self) -> Result<()> {
        let mut dispatcher = self.dispatcher.lock();
        if self.closed.load(Ordering::Acquire) {
            return Err(LoggerError::LoggerStopped);
        }

        if dispatcher.is_none() {
            let (shutdown, shutdown_rx) = bounded(0);
            let shared = Arc::clone(&self.shared);
            let records = self.receiver.clone();

            let handle = thread::Builder::new()
                .name(DISPATCHER_THREAD_NAME.to_string())
                .spawn(move || Dispatcher::run(shared, records, shutdown_rx))?;

            *dispatcher = Some(Dispatcher { handle, shutdown });
        }

        self.async_mode.store(true, Ordering::Release);
        Ok(())
    }

    /// Build adapter `name` from the registry, initialize it with `config`,
    /// and make it active.
    ///
    /// The adapter is installed even when initialization fails; the
    /// initialization error is still returned. An adapter already active
    /// under the same name is destroyed and replaced.
    pub fn add_adapter(&self, name: &str, config: &str) -> Result<()> {
        let init_result = {
            let mut adapters = self.shared.adapters.lock();
            if self.closed.load(Ordering::Acquire) {
                return Err(LoggerError::LoggerStopped);
            }

            let mut adapter = self
                .registry
                .create(name)
                .ok_or_else(|| LoggerError::unknown_adapter(name))?;
            let init_result = guarded(name, || adapter.init(config)).and_then(|init| init);

            if let Some(previous) = adapters.insert(name.to_string(), adapter) {
                self.shared.destroy(name, previous);
            }
            self.shared.adapters_changed.notify_all();
            init_result
        };

        if let Err(ref e) = init_result {
            self.shared
                .report(&format!("adapter '{}' failed to initialize: {}", name, e));
        }
        init_result
    }

    /// Destroy and remove the active adapter `name`
    pub fn remove_adapter(&self, name: &str) -> Result<()> {
        let mut adapters = self.shared.adapters.lock();

        match adapters.remove(name) {
            Some(adapter) => {
                self.shared.destroy(name, adapter);
                Ok(())
            }
            None => Err(LoggerError::unknown_adapter(name)),
        }
    }

    /// Names of the active adapters, sorted
    pub fn adapter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.shared.adapters.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_adapter(&self, name: &str) -> bool {
        self.shared.adapters.lock().contains_key(name)
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level.as_u8(), Ordering::Relaxed);
    }

    pub fn min_level(&self) -> LogLevel {
        // Only ever stores valid level values
        LogLevel::try_from(self.min_level.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Set the free-form tag written in front of each message
    pub fn set_tag(&self, tag: impl Into<String>) {
        *self.tag.write() = tag.into();
    }

    pub fn tag(&self) -> String {
        self.tag.read().clone()
    }

    /// Set which stack frame is reported when caller location is enabled.
    ///
    /// Depth 2 (the default) is the code that called the logging method or
    /// macro; depths 0 and 1 point inside the logger. Depth 3 and above are
    /// not tracked and always produce the `???:0` placeholder.
    pub fn set_caller_skip(&self, depth: usize) {
        self.caller_skip.store(depth, Ordering::Relaxed);
    }

    pub fn caller_skip(&self) -> usize {
        self.caller_skip.load(Ordering::Relaxed)
    }

    pub fn enable_caller_location(&self, enabled: bool) {
        self.caller_location.store(enabled, Ordering::Relaxed);
    }

    pub fn is_caller_location_enabled(&self) -> bool {
        self.caller_location.load(Ordering::Relaxed)
    }

    pub fn is_async(&self) -> bool {
        self.async_mode.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Records currently waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.receiver.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Log a message at `level`.
    ///
    /// Messages less urgent than the minimum level return immediately
    /// without being formatted. In synchronous mode the first failing
    /// adapter's error is returned and the remaining adapters are skipped;
    /// in asynchronous mode this blocks while the queue is full and an
    /// adapter is active to drain it. It fails once the logger is closed, or
    /// with [`LoggerError::QueueFull`] when the queue is full and no adapter
    /// is active.
    #[track_caller]
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) -> Result<()> {
        if !level.is_enabled_at(self.min_level()) {
            self.shared.metrics.record_filtered();
            return Ok(());
        }
        if self.closed.load(Ordering::Acquire) {
            return Err(LoggerError::LoggerStopped);
        }

        let caller = if self.caller_location.load(Ordering::Relaxed) {
            Some(CallerLocation::resolve(self.caller_skip(), Location::caller()))
        } else {
            None
        };
        let message = format_message(level, args, &self.tag.read(), caller);

        self.shared.metrics.record_logged();
        self.dispatch(LogRecord::new(level, message))
    }

    fn dispatch(&self, record: LogRecord) -> Result<()> {
        if self.async_mode.load(Ordering::Acquire) {
            self.enqueue(record)
        } else {
            self.shared.deliver(&record, DeliveryPath::Direct)
        }
    }

    /// Push onto the queue, waiting for space when it is full.
    ///
    /// Waiting only makes sense while the dispatcher has an adapter to write
    /// to, so the wait gives up with [`LoggerError::QueueFull`] as soon as the
    /// adapter set is empty.
    fn enqueue(&self, record: LogRecord) -> Result<()> {
        let mut record = match self.sender.try_send(record) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Full(record)) => record,
            Err(TrySendError::Disconnected(_)) => return Err(LoggerError::LoggerStopped),
        };
        self.shared.metrics.record_queue_full();

        loop {
            if self.closed.load(Ordering::Acquire) {
                return Err(LoggerError::LoggerStopped);
            }
            if !self.shared.has_active_adapters() {
                return Err(LoggerError::queue_full(self.queue_len(), self.queue_capacity));
            }
            match self.sender.send_timeout(record, STALL_CHECK_INTERVAL) {
                Ok(()) => return Ok(()),
                Err(SendTimeoutError::Timeout(r)) => record = r,
                Err(SendTimeoutError::Disconnected(_)) => return Err(LoggerError::LoggerStopped),
            }
        }
    }

    #[track_caller]
    #[inline]
    pub fn emergency(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(LogLevel::Emergency, args)
    }

    #[track_caller]
    #[inline]
    pub fn alert(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(LogLevel::Alert, args)
    }

    #[track_caller]
    #[inline]
    pub fn critical(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(LogLevel::Critical, args)
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(LogLevel::Error, args)
    }

    #[track_caller]
    #[inline]
    pub fn warning(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(LogLevel::Warning, args)
    }

    #[track_caller]
    #[inline]
    pub fn notice(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(LogLevel::Notice, args)
    }

    #[track_caller]
    #[inline]
    pub fn informational(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(LogLevel::Informational, args)
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(LogLevel::Debug, args)
    }

    /// Alias for [`warning`](Self::warning)
    #[track_caller]
    #[inline]
    pub fn warn(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(LogLevel::WARN, args)
    }

    /// Alias for [`informational`](Self::informational)
    #[track_caller]
    #[inline]
    pub fn info(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(LogLevel::INFO, args)
    }

    /// Alias for [`debug`](Self::debug)
    #[track_caller]
    #[inline]
    pub fn trace(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(LogLevel::TRACE, args)
    }

    /// Flush every active adapter. Queued records are not drained.
    pub fn flush(&self) {
        let mut adapters = self.shared.adapters.lock();
        self.shared.flush_all(&mut adapters);
    }

    /// Drain the queue, then flush and destroy every adapter.
    ///
    /// The dispatcher is stopped first so the drain is the only consumer
    /// and queued records reach the adapters in FIFO order. Write failures
    /// during the drain are reported and skipped. Calling `close` again is
    /// a no-op, and logging afterwards returns [`LoggerError::LoggerStopped`].
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        {
            let _adapters = self.shared.adapters.lock();
            self.shared.closing.store(true, Ordering::Release);
            self.shared.adapters_changed.notify_all();
        }

        if let Some(Dispatcher { handle, shutdown }) = self.dispatcher.lock().take() {
            drop(shutdown);
            match handle.join() {
                Ok(Some(held)) => {
                    let _ = self.shared.deliver(&held, DeliveryPath::Drain);
                }
                Ok(None) => {}
                Err(e) => self.shared.report(&format!(
                    "dispatcher thread panicked: {}",
                    panic_message(e.as_ref())
                )),
            }
        }

        while let Ok(record) = self.receiver.try_recv() {
            // Failures are reported by deliver and do not stop the drain
            let _ = self.shared.deliver(&record, DeliveryPath::Drain);
        }

        let mut adapters = self.shared.adapters.lock();
        self.shared.flush_all(&mut adapters);
        for (name, adapter) in adapters.drain() {
            self.shared.destroy(&name, adapter);
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.min_level())
            .field("adapters", &self.adapter_names())
            .field("async", &self.is_async())
            .field("queue_capacity", &self.queue_capacity)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use fanout_logger::prelude::*;
/// use std::sync::Arc;
///
/// let registry = Arc::new(AdapterRegistry::new());
/// let logger = Logger::builder(registry)
///     .min_level(LogLevel::Notice)
///     .tag("api")
///     .queue_capacity(256)
///     .async_mode(true)
///     .build()
///     .unwrap();
///
/// assert!(logger.is_async());
/// ```
pub struct LoggerBuilder {
    registry: Arc<AdapterRegistry>,
    queue_capacity: usize,
    min_level: LogLevel,
    tag: String,
    caller_location: bool,
    caller_skip: usize,
    async_mode: bool,
    adapters: Vec<(String, String)>,
    diagnostics: Option<DiagnosticSink>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        Self {
            registry,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            min_level: LogLevel::Debug,
            tag: String::new(),
            caller_location: false,
            caller_skip: DEFAULT_CALLER_SKIP,
            async_mode: false,
            adapters: Vec::new(),
            diagnostics: None,
        }
    }

    /// Start from a deserialized settings bundle
    pub fn from_config(registry: Arc<AdapterRegistry>, config: &LoggerConfig) -> Self {
        let mut builder = Self::new(registry)
            .queue_capacity(config.queue_capacity)
            .min_level(config.min_level)
            .tag(config.tag.clone())
            .caller_location(config.caller_location)
            .caller_skip(config.caller_skip)
            .async_mode(config.async_mode);

        for adapter in &config.adapters {
            builder = builder.adapter(adapter.name.clone(), adapter.config_blob());
        }
        builder
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller_location(mut self, enabled: bool) -> Self {
        self.caller_location = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller_skip(mut self, depth: usize) -> Self {
        self.caller_skip = depth;
        self
    }

    /// Deliver through the queue and a dispatcher thread
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, enabled: bool) -> Self {
        self.async_mode = enabled;
        self
    }

    /// Attach a registered adapter with its configuration blob
    #[must_use = "builder methods return a new value"]
    pub fn adapter(mut self, name: impl Into<String>, config: impl Into<String>) -> Self {
        self.adapters.push((name.into(), config.into()));
        self
    }

    /// Send the logger's own failure reports to `sink` instead of stderr
    #[must_use = "builder methods return a new value"]
    pub fn on_diagnostic(mut self, sink: DiagnosticSink) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Build the Logger.
    ///
    /// Fails with the first adapter that is unknown or fails to
    /// initialize, or if the dispatcher thread cannot be started.
    pub fn build(self) -> Result<Logger> {
        let diagnostics = self.diagnostics.unwrap_or_else(stderr_sink);
        let logger = Logger::with_diagnostics(self.registry, self.queue_capacity, diagnostics);

        logger.set_min_level(self.min_level);
        logger.set_tag(self.tag);
        logger.enable_caller_location(self.caller_location);
        logger.set_caller_skip(self.caller_skip);

        for (name, config) in &self.adapters {
            logger.add_adapter(name, config)?;
        }
        if self.async_mode {
            logger.enable_async()?;
        }

        Ok(logger)
    }
}
