//! Event types and sinks for observing sampling runs.
//!
//! This module defines [`SampleEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while a [`crate::sampler::PoissonDiscSampler`] is
//! ticked. Events are delivered synchronously from inside `start`/`tick`.
use glam::Vec3;

/// Describes events emitted by a sampling run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum SampleEvent {
    /// Emitted for every accepted point, in acceptance order.
    PointAdded {
        /// Zero-based acceptance ordinal.
        index: usize,
        /// The accepted point.
        point: Vec3,
    },

    /// Emitted once, after the active list empties.
    Finished {
        /// Total number of accepted points.
        total_points: usize,
    },
}

impl SampleEvent {
    pub fn kind(&self) -> SampleEventKind {
        match self {
            SampleEvent::PointAdded { .. } => SampleEventKind::PointAdded,
            SampleEvent::Finished { .. } => SampleEventKind::Finished,
        }
    }
}

/// Discriminant of [`SampleEvent`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleEventKind {
    PointAdded,
    Finished,
}

/// A generic event sink that accepts [`SampleEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SampleEvent);

    /// Whether the sink cares about events of `kind`. Emitters skip building
    /// events nobody wants.
    #[inline]
    fn wants(&self, _kind: SampleEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SampleEvent) {}

    #[inline]
    fn wants(&self, _kind: SampleEventKind) -> bool {
        false
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: SampleEvent) {
        (**self).send(event);
    }

    #[inline]
    fn wants(&self, kind: SampleEventKind) -> bool {
        (**self).wants(kind)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    #[inline]
    fn send(&mut self, event: SampleEvent) {
        (**self).send(event);
    }

    #[inline]
    fn wants(&self, kind: SampleEventKind) -> bool {
        (**self).wants(kind)
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SampleEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SampleEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SampleEvent),
{
    #[inline]
    fn send(&mut self, event: SampleEvent) {
        (self.f)(event);
    }
}

/// Sink with separate callbacks for added points and completion.
pub struct Observer<A, D>
where
    A: FnMut(usize, Vec3),
    D: FnMut(usize),
{
    on_point_added: A,
    on_finished: D,
}

impl<A, D> Observer<A, D>
where
    A: FnMut(usize, Vec3),
    D: FnMut(usize),
{
    pub fn new(on_point_added: A, on_finished: D) -> Self {
        Self {
            on_point_added,
            on_finished,
        }
    }
}

impl<A, D> EventSink for Observer<A, D>
where
    A: FnMut(usize, Vec3),
    D: FnMut(usize),
{
    fn send(&mut self, event: SampleEvent) {
        match event {
            SampleEvent::PointAdded { index, point } => (self.on_point_added)(index, point),
            SampleEvent::Finished { total_points } => (self.on_finished)(total_points),
        }
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<SampleEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<SampleEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SampleEvent] {
        &self.events
    }

    /// Points carried by the collected `PointAdded` events, in order.
    pub fn points(&self) -> Vec<Vec3> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SampleEvent::PointAdded { point, .. } => Some(*point),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SampleEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: SampleEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            if self.sinks[i].wants(event.kind()) {
                self.sinks[i].send(event.clone());
            }
        }
        if self.sinks[last_idx].wants(event.kind()) {
            self.sinks[last_idx].send(event);
        }
    }

    fn wants(&self, kind: SampleEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

/// Sink that only forwards events of the given kinds.
pub struct FilterSink<S: EventSink> {
    inner: S,
    kinds: Vec<SampleEventKind>,
}

impl<S: EventSink> FilterSink<S> {
    pub fn new(inner: S, kinds: impl IntoIterator<Item = SampleEventKind>) -> Self {
        Self {
            inner,
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for FilterSink<S> {
    #[inline]
    fn send(&mut self, event: SampleEvent) {
        if self.wants(event.kind()) {
            self.inner.send(event);
        }
    }

    #[inline]
    fn wants(&self, kind: SampleEventKind) -> bool {
        self.kinds.contains(&kind) && self.inner.wants(kind)
    }
}
