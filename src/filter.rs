use std::fmt;

use crate::config::ExportThresholds;
use crate::model::{EventDetection, ObservedArrival, PhaseDetection, Receiver};
use crate::phase::{PhaseKind, PhaseLabels};

/// Why an event was left out of the export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventRejection {
    LowSemblance(f64),
    TooFewReceivers(usize),
}

impl fmt::Display for EventRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventRejection::LowSemblance(semblance) => write!(f, "semblance {semblance:.3} too low"),
            EventRejection::TooFewReceivers(n) => write!(f, "only {n} receivers with P arrival"),
        }
    }
}

/// An arrival that passed every pick threshold.
#[derive(Debug, Clone, Copy)]
pub struct SelectedArrival<'e> {
    pub receiver: &'e Receiver,
    pub detection: &'e PhaseDetection,
    pub observed: &'e ObservedArrival,
    pub kind: PhaseKind,
}

/// Decides which events and picks make it into the phase file.
#[derive(Debug, Clone, Copy)]
pub struct ArrivalFilter<'a> {
    thresholds: &'a ExportThresholds,
    labels: &'a PhaseLabels,
}

impl<'a> ArrivalFilter<'a> {
    pub fn new(thresholds: &'a ExportThresholds, labels: &'a PhaseLabels) -> Self {
        Self { thresholds, labels }
    }

    /// `None` if the event qualifies for export.
    pub fn check_event(&self, event: &EventDetection) -> Option<EventRejection> {
        if event.semblance < self.thresholds.min_pick_semblance {
            return Some(EventRejection::LowSemblance(event.semblance));
        }
        let n_receivers = event.n_observations(&self.labels.p);
        if n_receivers < self.thresholds.min_receivers_number {
            return Some(EventRejection::TooFewReceivers(n_receivers));
        }
        None
    }

    /// Phase type and observation of an acceptable pick.
    pub fn check_arrival<'e>(
        &self,
        detection: &'e PhaseDetection,
    ) -> Option<(PhaseKind, &'e ObservedArrival)> {
        let observed = detection.observed.as_ref()?;
        let kind = self.labels.classify(&detection.phase)?;
        let min_confidence = match kind {
            PhaseKind::P => self.thresholds.min_p_phase_confidence,
            PhaseKind::S => self.thresholds.min_s_phase_confidence,
        };
        if observed.detection_value <= min_confidence {
            return None;
        }
        if detection.traveltime_delay.abs() > self.thresholds.max_traveltime_delay {
            return None;
        }
        Some((kind, observed))
    }

    /// Acceptable picks of an event, in receiver order.
    ///
    /// Does not apply the event-level checks, see [`Self::check_event`].
    pub fn select_arrivals<'e>(&self, event: &'e EventDetection) -> Vec<SelectedArrival<'e>> {
        let mut selected = Vec::new();
        for receiver in &event.receivers {
            for detection in &receiver.phase_arrivals {
                match self.check_arrival(detection) {
                    Some((kind, observed)) => selected.push(SelectedArrival {
                        receiver,
                        detection,
                        observed,
                        kind,
                    }),
                    None => log::trace!(
                        "{} {}: pick of {} rejected",
                        event.time,
                        detection.phase,
                        receiver.station
                    ),
                }
            }
        }
        selected
    }
}
