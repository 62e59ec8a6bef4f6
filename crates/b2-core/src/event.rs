//! B→hhh decay record model.
//!
//! One [`Event`] is a single collision record with three hadron candidate
//! slots (H1, H2, H3). Records are plain owned values: the reader yields a
//! fresh `Event` per iteration step and the scan loop only ever reads it.

/// One hadron candidate slot of a decay record.
///
/// Momentum components are in MeV, PID probabilities in `[0, 1]`.
/// `is_muon` is a boolean-valued flag; `1` marks the candidate muon-like.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KaonCandidate {
    /// Momentum x component.
    pub px: f64,
    /// Momentum y component.
    pub py: f64,
    /// Momentum z component.
    pub pz: f64,
    /// Kaon hypothesis probability.
    pub prob_k: f64,
    /// Pion hypothesis probability.
    pub prob_pi: f64,
    /// Electric charge, widened to `f64` for summation.
    pub charge: i32,
    /// Muon tag; `1` means muon-like.
    pub is_muon: i32,
}

impl KaonCandidate {
    /// Whether the muon tag is set.
    #[inline]
    pub fn muon_tagged(&self) -> bool {
        self.is_muon == 1
    }

    /// Sum of the six accumulated fields of this slot:
    /// `px + py + pz + prob_k + prob_pi + charge`.
    #[inline]
    pub fn kinematic_sum(&self) -> f64 {
        self.px + self.py + self.pz + self.prob_k + self.prob_pi + f64::from(self.charge)
    }
}

/// One collision record with three hadron candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Event {
    /// The H1, H2, H3 candidate slots, in that order.
    pub candidates: [KaonCandidate; 3],
}

impl Event {
    /// Build a record from its three candidate slots.
    pub fn new(h1: KaonCandidate, h2: KaonCandidate, h3: KaonCandidate) -> Self {
        Self { candidates: [h1, h2, h3] }
    }

    /// First candidate slot (H1).
    #[inline]
    pub fn h1(&self) -> &KaonCandidate {
        &self.candidates[0]
    }

    /// Second candidate slot (H2).
    #[inline]
    pub fn h2(&self) -> &KaonCandidate {
        &self.candidates[1]
    }

    /// Third candidate slot (H3).
    #[inline]
    pub fn h3(&self) -> &KaonCandidate {
        &self.candidates[2]
    }

    /// Whether any of the three candidates carries the muon tag.
    #[inline]
    pub fn has_muon(&self) -> bool {
        self.candidates.iter().any(KaonCandidate::muon_tagged)
    }

    /// The 18-term accumulation value: px, py, pz, prob_k, prob_pi and
    /// charge for each of the three candidates.
    #[inline]
    pub fn kinematic_sum(&self) -> f64 {
        self.candidates.iter().map(KaonCandidate::kinematic_sum).sum()
    }
}
