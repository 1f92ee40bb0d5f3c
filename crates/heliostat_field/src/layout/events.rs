//! Event types and sinks for observing layout runs.
//!
//! This module defines [`LayoutEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while executing a layout via
//! [`crate::layout::runner::LayoutRunner`] or
//! [`crate::layout::runner::generate_layout_with_events`].
use crate::config::FieldConfig;
use crate::layout::runner::LayoutSummary;
use crate::layout::RingKind;

/// Describes events emitted by a layout run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum LayoutEvent {
    /// Emitted when a run starts, after validation.
    RunStarted {
        /// The configuration used.
        config: FieldConfig,
    },

    /// Emitted when a group receives its first ring.
    GroupOpened {
        /// Index of the group.
        group: usize,
        /// Angular unit shared by the rings of the group.
        angular_unit: f64,
        /// Radius of the first ring, after gap correction.
        first_radius: f64,
    },

    /// Emitted when a ring beyond the first is appended to a group.
    RingAdded {
        group: usize,
        ring: usize,
        radius: f64,
        kind: RingKind,
    },

    /// Emitted when a new group's first ring was pushed out to keep one characteristic
    /// diameter of clearance from the previous group.
    GapCorrected {
        group: usize,
        /// Radius produced by the view-limited solver.
        computed: f64,
        /// Radius actually used.
        corrected: f64,
    },

    /// Emitted when a group is finalized.
    GroupFinished {
        group: usize,
        /// Number of rings the group kept.
        rings: usize,
    },

    /// Emitted when a ring reaches the outer radial bound.
    GrowthTerminated {
        /// The first radius at or beyond the outer bound; not placed.
        terminal_radius: f64,
        /// Number of groups produced.
        groups: usize,
    },

    /// Emitted after all heliostats of a group were placed.
    GroupPlaced {
        group: usize,
        /// Heliostats placed for the group.
        heliostats: usize,
        /// Highest angular index that fits the angular extent.
        max_index: usize,
    },

    /// Emitted when the layout is complete.
    RunFinished {
        /// Summary of the produced layout.
        summary: LayoutSummary,
    },

    /// Non-fatal warning generated during the run.
    Warning {
        /// Context string (e.g. group index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of a [`LayoutEvent`], used for sink filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutEventKind {
    RunStarted,
    GroupOpened,
    RingAdded,
    GapCorrected,
    GroupFinished,
    GrowthTerminated,
    GroupPlaced,
    RunFinished,
    Warning,
}

impl LayoutEvent {
    pub fn kind(&self) -> LayoutEventKind {
        match self {
            LayoutEvent::RunStarted { .. } => LayoutEventKind::RunStarted,
            LayoutEvent::GroupOpened { .. } => LayoutEventKind::GroupOpened,
            LayoutEvent::RingAdded { .. } => LayoutEventKind::RingAdded,
            LayoutEvent::GapCorrected { .. } => LayoutEventKind::GapCorrected,
            LayoutEvent::GroupFinished { .. } => LayoutEventKind::GroupFinished,
            LayoutEvent::GrowthTerminated { .. } => LayoutEventKind::GrowthTerminated,
            LayoutEvent::GroupPlaced { .. } => LayoutEventKind::GroupPlaced,
            LayoutEvent::RunFinished { .. } => LayoutEventKind::RunFinished,
            LayoutEvent::Warning { .. } => LayoutEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`LayoutEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: LayoutEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&mut self, _kind: LayoutEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: LayoutEvent) {}

    #[inline]
    fn wants(&mut self, _kind: LayoutEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(LayoutEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(LayoutEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(LayoutEvent),
{
    #[inline]
    fn send(&mut self, event: LayoutEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally restricted to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<LayoutEvent>,
    only: Option<Vec<LayoutEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            only: None,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            only: None,
        }
    }

    /// Collect only events whose kind is in `kinds`.
    pub fn only(mut self, kinds: impl IntoIterator<Item = LayoutEventKind>) -> Self {
        self.only = Some(kinds.into_iter().collect());
        self
    }

    pub fn into_inner(self) -> Vec<LayoutEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[LayoutEvent] {
        &self.events
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
    fn send(&mut self, event: LayoutEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&mut self, kind: LayoutEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
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
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: LayoutEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&mut self, kind: LayoutEventKind) -> bool {
        self.sinks.iter_mut().any(|s| s.wants(kind))
    }
}
