use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::{Arguments, Display, Write};
use std::io::stdout;
use std::num::NonZeroU64;
use std::ops::RangeInclusive;
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

use thread_local::ThreadLocal;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber, span};
use tracing::span::Id;
use tracing_core::Interest;

struct SpanState {
    parent: Option<Id>,
    /// how many handles to the span currently exist; used for reference counting,
    /// to remove the span from map of spans when it is no longer used
    reference_counter: AtomicUsize,
    /// name of the span, followed by its fields
    description: String,
    metadata: &'static Metadata<'static>,
    /// when the span was entered, in microseconds since creation of the subscriber
    entered_timestamp: AtomicU64,
    /// on which level of the span tree this span is
    level: usize
}

///
/// A [`Subscriber`] that prints the progress of algorithms in a compact form.
///
/// Info-level spans (like the one opened by [`crate::algorithms::buchberger::buchberger()`])
/// are printed as `name(fields)` when entered and as `done(<time>us)` when exited, and info-level
/// events in between are printed as their message, without separators. For Buchberger's
/// algorithm, this gives lines like
/// ```text
/// buchberger(len=2, vars=2)s(b=3)(S=2)s(b=4)(S=4)s(b=5)(S=7)---c-c-...done(112us)
/// ```
/// Events and spans nested deeper than `max_depth` are not printed. Warnings, e.g. about
/// numeric instabilities (see [`crate::rings::float_real::Real64`]), are printed on a
/// separate line.
///
pub struct LogAlgorithmSubscriber {
    span_ids: AtomicU64,
    span_map: RwLock<HashMap<Id, SpanState>>,
    current_span: ThreadLocal<Cell<Option<NonZeroU64>>>,
    default_instant: Instant,
    interested_level: RangeInclusive<Level>,
    max_depth: usize,
    out: Mutex<Box<dyn std::io::Write + Send>>
}

impl LogAlgorithmSubscriber {

    ///
    /// Creates a new [`LogAlgorithmSubscriber`] that writes to `out`.
    ///
    pub fn new(levels: RangeInclusive<Level>, max_depth: usize, out: Box<dyn std::io::Write + Send>) -> Self {
        Self {
            span_ids: AtomicU64::new(1),
            span_map: RwLock::new(HashMap::new()),
            current_span: ThreadLocal::new(),
            default_instant: Instant::now(),
            interested_level: levels,
            max_depth: max_depth,
            out: Mutex::new(out)
        }
    }

    ///
    /// Installs a [`LogAlgorithmSubscriber`] writing to stdout as global default.
    ///
    /// Panics if a global default subscriber has already been set.
    ///
    pub fn init(levels: RangeInclusive<Level>, max_depth: usize) {
        tracing::subscriber::set_global_default(Self::new(levels, max_depth, Box::new(stdout()))).unwrap()
    }

    ///
    /// Like [`LogAlgorithmSubscriber::init()`], but does nothing if a global default
    /// subscriber already exists, so it can be called by every test.
    ///
    pub fn init_test() {
        _ = tracing::subscriber::set_global_default(Self::new(Level::WARN..=Level::INFO, 2, Box::new(stdout())))
    }

    fn span_map<'a>(&'a self) -> RwLockReadGuard<'a, HashMap<Id, SpanState>> {
        self.span_map.read().unwrap()
    }

    fn span_map_mut<'a>(&'a self) -> RwLockWriteGuard<'a, HashMap<Id, SpanState>> {
        self.span_map.write().unwrap()
    }

    fn current_span_id(&self) -> Option<Id> {
        self.current_span.get_or(|| Cell::new(None)).get().map(Id::from_non_zero_u64)
    }

    fn print(&self, args: Arguments) {
        let mut out = self.out.lock().unwrap();
        _ = std::io::Write::write_fmt(&mut *out, args);
        _ = std::io::Write::flush(&mut *out);
    }

    fn now(&self) -> u64 {
        Instant::now().duration_since(self.default_instant).as_micros() as u64
    }
}

struct FieldRecorder {
    message: Option<String>,
    fields: Option<String>
}

impl FieldRecorder {

    fn new() -> Self {
        Self { message: None, fields: None }
    }
}

impl Display for FieldRecorder {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(message) = &self.message {
            write!(f, "{}", message)?;
        }
        if let Some(fields) = &self.fields {
            write!(f, "({})", fields)?;
        }
        return Ok(());
    }
}

impl Visit for FieldRecorder {

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            if let Some(fields) = &mut self.fields {
                _ = write!(fields, ", {}={:?}", field.name(), value);
            } else {
                self.fields = Some(format!("{}={:?}", field.name(), value));
            }
        }
    }
}

impl Subscriber for LogAlgorithmSubscriber {

    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.interested_level.contains(metadata.level()) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.interested_level.contains(metadata.level())
    }

    fn current_span(&self) -> tracing_core::span::Current {
        if let Some(id) = self.current_span_id() {
            tracing_core::span::Current::new(id.clone(), self.span_map().get(&id).unwrap().metadata)
        } else {
            tracing_core::span::Current::none()
        }
    }

    fn new_span(&self, span: &span::Attributes<'_>) -> Id {
        let id = Id::from_non_zero_u64(NonZeroU64::try_from(self.span_ids.fetch_add(1, Ordering::Relaxed)).unwrap());
        let parent = span.parent().cloned().or_else(|| self.current_span_id());
        let mut spans = self.span_map_mut();
        let level = parent.as_ref().and_then(|id| spans.get(id)).map(|parent| parent.level + 1).unwrap_or(0);

        let mut description = FieldRecorder::new();
        span.record(&mut description);
        description.message = Some(span.metadata().name().to_owned());

        assert!(spans.insert(id.clone(), SpanState {
            parent: parent,
            level: level,
            metadata: span.metadata(),
            reference_counter: AtomicUsize::new(1),
            description: description.to_string(),
            entered_timestamp: AtomicU64::new(0)
        }).is_none());
        return id;
    }

    fn record(&self, _span: &Id, _values: &span::Record<'_>) {
        // spans are described only by the fields given on creation
    }

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {
        // we only care about parent spans currently
    }

    fn event(&self, event: &Event<'_>) {
        let mut description = FieldRecorder::new();
        if *event.metadata().level() == Level::INFO {
            let depth = self.current_span_id().and_then(|id| self.span_map().get(&id).map(|span| span.level));
            if depth.is_none() || depth.unwrap() < self.max_depth {
                event.record(&mut description);
                self.print(format_args!("{}", description));
            }
        } else if *event.metadata().level() <= Level::WARN {
            event.record(&mut description);
            self.print(format_args!("\n[{}] {}\n", event.metadata().level(), description));
        }
    }

    fn enter(&self, span: &Id) {
        self.current_span.get_or(|| Cell::new(None)).set(Some(span.into_non_zero_u64()));
        let span_map = self.span_map();
        let entered_span = span_map.get(span).unwrap();
        if entered_span.level < self.max_depth {
            self.print(format_args!("{}", entered_span.description));
        } else if entered_span.level == self.max_depth {
            self.print(format_args!("{}...", entered_span.description));
        }
        assert!(entered_span.entered_timestamp.compare_exchange(0, self.now().max(1), Ordering::SeqCst, Ordering::SeqCst).is_ok(), "entered an already running span");
    }

    fn exit(&self, span: &Id) {
        let span_map = self.span_map();
        let exited_span = span_map.get(span).unwrap();
        let entered_timestamp = exited_span.entered_timestamp.swap(0, Ordering::SeqCst);
        let time = self.now().saturating_sub(entered_timestamp);
        if exited_span.level <= self.max_depth {
            if exited_span.level == 0 {
                self.print(format_args!("done({}us)\n", time));
            } else {
                self.print(format_args!("done({}us)", time));
            }
        }
        self.current_span.get_or(|| Cell::new(None)).set(exited_span.parent.as_ref().map(|id| id.into_non_zero_u64()));
    }

    fn clone_span(&self, id: &Id) -> Id {
        _ = self.span_map().get(id).unwrap().reference_counter.fetch_add(1, Ordering::Relaxed);
        return id.clone();
    }

    fn try_close(&self, id: Id) -> bool {
        let remaining_handles = self.span_map().get(&id).unwrap().reference_counter.fetch_sub(1, Ordering::Relaxed) - 1;
        if remaining_handles == 0 {
            _ = self.span_map_mut().remove(&id).unwrap();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(std::sync::Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl SharedBuffer {

    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[cfg(test)]
impl std::io::Write for SharedBuffer {

    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_log_algorithm_subscriber() {
    let buffer = SharedBuffer::default();
    let subscriber = LogAlgorithmSubscriber::new(Level::WARN..=Level::INFO, 1, Box::new(buffer.clone()));
    tracing::subscriber::with_default(subscriber, || {
        let outer = tracing::info_span!("outer", n = 2);
        let _outer = outer.enter();
        tracing::info!("s");
        tracing::info!(b = 3, "x");
        {
            let inner = tracing::info_span!("inner");
            let _inner = inner.enter();
            // deeper than max_depth
            tracing::info!("hidden");
        }
        tracing::debug!("not interested");
        tracing::warn!(count = 1, "unstable");
    });
    let output = buffer.contents();
    assert!(output.starts_with("outer(n=2)sx(b=3)inner...done("), "unexpected output {:?}", output);
    assert!(output.contains("\n[WARN] unstable(count=1)\n"), "unexpected output {:?}", output);
    assert!(!output.contains("hidden"));
    assert!(!output.contains("not interested"));
    assert!(output.ends_with("us)\n"));
}
