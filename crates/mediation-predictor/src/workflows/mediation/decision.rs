use serde::{Deserialize, Serialize};

/// Lower edge of the borderline band; settlement is scored from here up.
pub const BORDERLINE_FLOOR: f64 = 0.40;
/// Upper edge of the borderline band, inclusive.
pub const BORDERLINE_CEILING: f64 = 0.50;
pub const SETTLED_THRESHOLD: f64 = 0.5;

/// Coarse classification of the proceed-to-mediation probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProceedBand {
    Unlikely,
    Borderline,
    Likely,
}

impl ProceedBand {
    pub fn classify(proceed_probability: f64) -> Self {
        if proceed_probability > BORDERLINE_CEILING {
            Self::Likely
        } else if proceed_probability >= BORDERLINE_FLOOR {
            Self::Borderline
        } else {
            Self::Unlikely
        }
    }

    /// Whether the settlement model should be consulted for this band.
    pub const fn requires_settlement(self) -> bool {
        !matches!(self, Self::Unlikely)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outlook", rename_all = "snake_case")]
pub enum SettlementOutlook {
    SettledLikely { probability: f64 },
    SettledUnlikely { probability: f64 },
    NotApplicable,
}

impl SettlementOutlook {
    pub fn classify(settled_probability: f64) -> Self {
        if settled_probability >= SETTLED_THRESHOLD {
            Self::SettledLikely {
                probability: settled_probability,
            }
        } else {
            Self::SettledUnlikely {
                probability: settled_probability,
            }
        }
    }

    pub fn probability(&self) -> Option<f64> {
        match self {
            Self::SettledLikely { probability } | Self::SettledUnlikely { probability } => {
                Some(*probability)
            }
            Self::NotApplicable => None,
        }
    }
}

/// What the result area shows for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayState {
    Borderline {
        proceed_probability: f64,
        settlement: SettlementOutlook,
    },
    ProceedLikely {
        proceed_probability: f64,
        settlement: SettlementOutlook,
    },
    ProceedUnlikely {
        proceed_probability: f64,
    },
}

impl DisplayState {
    pub fn band(&self) -> ProceedBand {
        match self {
            Self::Borderline { .. } => ProceedBand::Borderline,
            Self::ProceedLikely { .. } => ProceedBand::Likely,
            Self::ProceedUnlikely { .. } => ProceedBand::Unlikely,
        }
    }

    pub fn proceed_probability(&self) -> f64 {
        match self {
            Self::Borderline {
                proceed_probability,
                ..
            }
            | Self::ProceedLikely {
                proceed_probability,
                ..
            }
            | Self::ProceedUnlikely {
                proceed_probability,
            } => *proceed_probability,
        }
    }

    pub fn settlement(&self) -> SettlementOutlook {
        match self {
            Self::Borderline { settlement, .. } | Self::ProceedLikely { settlement, .. } => {
                *settlement
            }
            Self::ProceedUnlikely { .. } => SettlementOutlook::NotApplicable,
        }
    }
}

/// Pick the display state for a scored case.
///
/// `settled_probability` is ignored below the borderline floor. A band that
/// expects a settlement score but receives none reports it as not applicable.
pub fn decide(proceed_probability: f64, settled_probability: Option<f64>) -> DisplayState {
    let settlement = settled_probability
        .map(SettlementOutlook::classify)
        .unwrap_or(SettlementOutlook::NotApplicable);

    match ProceedBand::classify(proceed_probability) {
        ProceedBand::Borderline => DisplayState::Borderline {
            proceed_probability,
            settlement,
        },
        ProceedBand::Likely => DisplayState::ProceedLikely {
            proceed_probability,
            settlement,
        },
        ProceedBand::Unlikely => DisplayState::ProceedUnlikely {
            proceed_probability,
        },
    }
}
