use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Phase type as understood by VELEST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PhaseKind {
    P,
    S,
}

impl PhaseKind {
    /// Single-letter phase code of a phase record.
    pub fn letter(self) -> char {
        match self {
            PhaseKind::P => 'P',
            PhaseKind::S => 'S',
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The P and S phase labels of one detection run.
///
/// The detection engine names its phases freely (`cake:P`, `constant:S`, ...).
/// Resolution picks the single label mentioning `P` and the single label
/// mentioning `S`, anything else is a [`Error::DataIntegrity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseLabels {
    pub p: String,
    pub s: String,
}

impl PhaseLabels {
    pub fn resolve<I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let labels: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();
        let p = Self::single(&labels, 'P')?;
        let s = Self::single(&labels, 'S')?;
        if p == s {
            return Err(Error::DataIntegrity(format!(
                "phase label {p} cannot be both the P and the S phase"
            )));
        }
        log::debug!("resolved phase labels P={} S={}", p, s);
        Ok(Self { p, s })
    }

    fn single(labels: &BTreeSet<String>, marker: char) -> Result<String> {
        let mut candidates = labels.iter().filter(|label| label.contains(marker));
        match (candidates.next(), candidates.next()) {
            (Some(label), None) => Ok(label.clone()),
            (None, _) => Err(Error::DataIntegrity(format!(
                "no {marker} phase among labels {labels:?}"
            ))),
            (Some(first), Some(second)) => Err(Error::DataIntegrity(format!(
                "ambiguous {marker} phase, {first} and {second} both qualify"
            ))),
        }
    }

    /// Phase type of a detection label, `None` for labels of neither phase.
    pub fn classify(&self, label: &str) -> Option<PhaseKind> {
        if label == self.p {
            Some(PhaseKind::P)
        } else if label == self.s {
            Some(PhaseKind::S)
        } else {
            None
        }
    }
}
