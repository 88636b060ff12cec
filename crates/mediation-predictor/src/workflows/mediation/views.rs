use serde::Serialize;

use super::decision::{DisplayState, SettlementOutlook};

pub const FOLLOW_UP_NOTE: &str =
    "Staff may consider following up, as the first model may underestimate attendance.";
pub const NOT_APPLICABLE_NOTE: &str =
    "If a case does not proceed to mediation, settlement is not applicable.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelTone {
    Positive,
    Caution,
    Negative,
}

/// Border, background, heading and body colors for a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub border: &'static str,
    pub background: &'static str,
    pub heading: &'static str,
    pub body: &'static str,
}

impl PanelTone {
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Positive => "✅",
            Self::Caution => "⚠️",
            Self::Negative => "❌",
        }
    }

    pub const fn palette(self) -> Palette {
        match self {
            Self::Positive => Palette {
                border: "#4CAF50",
                background: "#E8F5E9",
                heading: "#2E7D32",
                body: "#388E3C",
            },
            Self::Caution => Palette {
                border: "#FF9800",
                background: "#FFF3E0",
                heading: "#F57C00",
                body: "#E65100",
            },
            Self::Negative => Palette {
                border: "#F44336",
                background: "#FFEBEE",
                heading: "#D32F2F",
                body: "#B71C1C",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Mediation,
    Settlement,
}

/// One styled result box, independent of how it is finally drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPanel {
    pub kind: PanelKind,
    pub tone: PanelTone,
    pub icon: &'static str,
    pub headline: &'static str,
    pub probability_label: &'static str,
    pub percentage: String,
    pub notes: Vec<&'static str>,
}

/// Two decimal places, e.g. `0.62` -> `"62.00%"`.
pub fn format_percentage(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

fn mediation_panel(
    tone: PanelTone,
    headline: &'static str,
    probability: f64,
    notes: Vec<&'static str>,
) -> ResultPanel {
    ResultPanel {
        kind: PanelKind::Mediation,
        tone,
        icon: tone.icon(),
        headline,
        probability_label: "Probability of proceeding to mediation",
        percentage: format_percentage(probability),
        notes,
    }
}

fn settlement_panel(outlook: SettlementOutlook, label: &'static str) -> Option<ResultPanel> {
    let (tone, headline, probability) = match outlook {
        SettlementOutlook::SettledLikely { probability } => {
            (PanelTone::Positive, "Likely to be settled", probability)
        }
        SettlementOutlook::SettledUnlikely { probability } => {
            (PanelTone::Negative, "Unlikely to be settled", probability)
        }
        SettlementOutlook::NotApplicable => return None,
    };

    Some(ResultPanel {
        kind: PanelKind::Settlement,
        tone,
        icon: tone.icon(),
        headline,
        probability_label: label,
        percentage: format_percentage(probability),
        notes: Vec::new(),
    })
}

/// Panels in display order: mediation first, settlement (if any) second.
pub fn panels(display: &DisplayState) -> Vec<ResultPanel> {
    match *display {
        DisplayState::Borderline {
            proceed_probability,
            settlement,
        } => {
            let mut panels = vec![mediation_panel(
                PanelTone::Caution,
                "Borderline chance to proceed to mediation",
                proceed_probability,
                vec![FOLLOW_UP_NOTE],
            )];
            panels.extend(settlement_panel(
                settlement,
                "Probability of settlement if mediated",
            ));
            panels
        }
        DisplayState::ProceedLikely {
            proceed_probability,
            settlement,
        } => {
            let mut panels = vec![mediation_panel(
                PanelTone::Positive,
                "Case likely to proceed to mediation",
                proceed_probability,
                Vec::new(),
            )];
            panels.extend(settlement_panel(settlement, "Probability of settlement"));
            panels
        }
        DisplayState::ProceedUnlikely {
            proceed_probability,
        } => vec![mediation_panel(
            PanelTone::Negative,
            "Case unlikely to proceed to mediation",
            proceed_probability,
            vec![NOT_APPLICABLE_NOTE],
        )],
    }
}
