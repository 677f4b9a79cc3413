//! # Maturity Stages
//!
//! The five finance maturity stages and their static descriptor table.
//!
//! ## Stage Definitions
//!
//! | Stage | Subtitle | Typical engagement |
//! |-------|----------|--------------------|
//! | 1 | Manual & Fragmented | Diagnostic reviews, quick-win automations |
//! | 2 | Standardised & Controlled | Process standardisation, ERP fitment |
//! | 3 | Automated & Integrated | Full ERP implementation, RPA |
//! | 4 | Data-Driven & Predictive | FPA as a service, CFO support |
//! | 5 | Strategic & Scalable | Technical accounting, IFRS/US GAAP advisory |
//!
//! Lookup is total: any number outside 1..=5 resolves to stage 1.

use crate::primitives::{MAX_STAGE, MIN_STAGE};
use serde::{Deserialize, Serialize};

// =============================================================================
// STAGE ENUM
// =============================================================================

/// Finance maturity stage, ordered from least to most mature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Stage {
    S1,
    S2,
    S3,
    S4,
    S5,
}

impl Stage {
    /// All stages in ascending order.
    pub const ALL: [Stage; 5] = [Stage::S1, Stage::S2, Stage::S3, Stage::S4, Stage::S5];

    /// Default stage for an empty or fully skipped questionnaire.
    pub const DEFAULT: Stage = Stage::S1;

    /// Get the stage number (1..=5).
    #[must_use]
    pub const fn number(self) -> i64 {
        match self {
            Stage::S1 => 1,
            Stage::S2 => 2,
            Stage::S3 => 3,
            Stage::S4 => 4,
            Stage::S5 => 5,
        }
    }

    /// Convert a stage number, returning `None` outside 1..=5.
    #[must_use]
    pub const fn from_number(n: i64) -> Option<Stage> {
        match n {
            1 => Some(Stage::S1),
            2 => Some(Stage::S2),
            3 => Some(Stage::S3),
            4 => Some(Stage::S4),
            5 => Some(Stage::S5),
            _ => None,
        }
    }

    /// Convert a stage number, falling back to stage 1 outside 1..=5.
    #[must_use]
    pub const fn from_number_or_default(n: i64) -> Stage {
        match Stage::from_number(n) {
            Some(stage) => stage,
            None => Stage::DEFAULT,
        }
    }

    /// Get the static descriptor for this stage.
    #[must_use]
    pub fn descriptor(self) -> &'static StageDescriptor {
        match self {
            Stage::S1 => &STAGE_TABLE[0],
            Stage::S2 => &STAGE_TABLE[1],
            Stage::S3 => &STAGE_TABLE[2],
            Stage::S4 => &STAGE_TABLE[3],
            Stage::S5 => &STAGE_TABLE[4],
        }
    }

    /// Get the next stage, if any.
    #[must_use]
    pub fn next(self) -> Option<Stage> {
        Stage::from_number(self.number().saturating_add(1))
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::DEFAULT
    }
}

impl From<Stage> for i64 {
    fn from(stage: Stage) -> Self {
        stage.number()
    }
}

impl TryFrom<i64> for Stage {
    type Error = String;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Stage::from_number(n)
            .ok_or_else(|| format!("stage must be between {} and {}, got {}", MIN_STAGE, MAX_STAGE, n))
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let descriptor = self.descriptor();
        write!(f, "{}: {}", descriptor.title, descriptor.subtitle)
    }
}

/// Total descriptor lookup by raw stage number (fallback: stage 1).
#[must_use]
pub fn descriptor_for(n: i64) -> &'static StageDescriptor {
    Stage::from_number_or_default(n).descriptor()
}

// =============================================================================
// STAGE DESCRIPTOR
// =============================================================================

/// Results-page call-to-action for a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallToAction {
    pub heading: &'static str,
    pub paragraph: &'static str,
}

/// Immutable metadata shown on the results page for a stage.
///
/// `problems` and `solutions` are parallel lists paired by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageDescriptor {
    pub stage: Stage,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub problems: &'static [&'static str],
    pub solutions: &'static [&'static str],
    pub call_to_action: CallToAction,
    /// Services line shown in the stage callout.
    pub services: &'static str,
}

impl StageDescriptor {
    /// Iterate `(problem, solution)` pairs in display order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        self.problems
            .iter()
            .copied()
            .zip(self.solutions.iter().copied())
    }

    /// The callout line, e.g. `"Stage 1 - Diagnostic reviews, ..."`.
    #[must_use]
    pub fn callout(&self) -> String {
        format!("{} - {}", self.title, self.services)
    }
}

/// The process-wide descriptor table, indexed by `stage - 1`.
pub static STAGE_TABLE: [StageDescriptor; 5] = [
    StageDescriptor {
        stage: Stage::S1,
        title: "Stage 1",
        subtitle: "Manual & Fragmented",
        description: "Diagnostic reviews, quick-win automations, books clean-up, MIS services",
        problems: &[
            "Heavy reliance on manual Excel processes",
            "Basic accounting system with limited integration",
            "Excessive manual work in finance operations",
            "No documented standard operating procedures",
        ],
        solutions: &[
            "Conduct diagnostic review of current processes",
            "Implement quick-win automation solutions",
            "Clean up and organize financial books",
            "Establish basic MIS reporting services",
        ],
        call_to_action: CallToAction {
            heading: "You’ve built your business on grit. Now it’s time to build it on systems.",
            paragraph: "You’ve come this far despite fragmented processes, imagine the growth if the basics were streamlined.",
        },
        services: "Diagnostic reviews, quick-win automations, books clean-up, MIS services",
    },
    StageDescriptor {
        stage: Stage::S2,
        title: "Stage 2",
        subtitle: "Standardised & Controlled",
        description: "Finance process standardisation, data clean-ups, ERP fitment/rollout, FPA as a service",
        problems: &[
            "Basic dashboards without real-time data",
            "Patchwork systems operating in silos",
            "Mostly manual work with basic ERP accounting",
            "Consistent processes but not linked to best practices",
        ],
        solutions: &[
            "Standardize finance processes across organization",
            "Conduct comprehensive data clean-up",
            "Assess and implement proper ERP fitment",
            "Provide FPA (Financial Planning & Analysis) as a service",
        ],
        call_to_action: CallToAction {
            heading: "You’ve built consistency now, it’s time to build momentum.",
            paragraph: "Your foundations are in place, but growth gets stuck without integration. There’s an easier, faster way to scale without burning out your teams. Let’s talk about how you can evolve from stable to scalable.",
        },
        services: "Finance process standardisation, data clean-ups, ERP fitment/rollout, FPA as a service",
    },
    StageDescriptor {
        stage: Stage::S3,
        title: "Stage 3",
        subtitle: "Automated & Integrated",
        description: "Full ERP implementation, automation scripts, RPA, reporting automation",
        problems: &[
            "Real-time data flows between spreadsheets need optimization",
            "Sophisticated ERP but lacks integrations",
            "Core finance on ERP but reconciliations done outside",
            "Best practices adopted but adherence uncertain",
        ],
        solutions: &[
            "Implement full ERP system integration",
            "Deploy automation scripts for routine tasks",
            "Introduce RPA (Robotic Process Automation)",
            "Automate reporting processes completely",
        ],
        call_to_action: CallToAction {
            heading: "You’re running steady, the next leap is strategic speed.",
            paragraph: "You’ve achieved operational flow, but there’s untapped value in sharper insights and faster decisions. Let’s explore how you can shift your team’s energy from operational firefighting to strategic growth.",
        },
        services: "Full ERP implementation, automation scripts, RPA, reporting automation, FPA as a service",
    },
    StageDescriptor {
        stage: Stage::S4,
        title: "Stage 4",
        subtitle: "Data-Driven & Predictive",
        description: "FPA as a service, CFO support, predictive analytics automation",
        problems: &[
            "Dynamic MIS and macros need enhancement",
            "Highly automated but integration gaps exist",
            "Completely automated but scope for improvement",
            "Documented best practices need better adherence monitoring",
        ],
        solutions: &[
            "Enhance FPA services with advanced analytics",
            "Provide CFO support and strategic guidance",
            "Implement predictive analytics automation",
            "Deploy advanced business intelligence tools",
        ],
        call_to_action: CallToAction {
            heading: "You’ve unlocked the power of data, are you using it to lead?",
            paragraph: "With dashboards and predictive tools running, the next level is sharper decision-making and cross-functional alignment. Let’s discuss how your leadership team can harness this ecosystem for competitive advantage.",
        },
        services: "FPA as a service, CFO support, predictive analytics, Automation, Diagnostic Reviews",
    },
    StageDescriptor {
        stage: Stage::S5,
        title: "Stage 5",
        subtitle: "Strategic & Scalable",
        description: "Technical Acc, Outsourcing, IFRS/US GAAP advisory, legacy ERP overhaul",
        problems: &[
            "Predictive analysis capabilities need refinement",
            "Only financial statement preparation remains manual",
            "Investment-ready processes need global alignment",
            "IFC/ICFR controls need continuous improvement",
        ],
        solutions: &[
            "Provide technical accounting expertise",
            "Offer comprehensive finance outsourcing",
            "Implement IFRS/US GAAP advisory services",
            "Overhaul legacy ERP systems for global standards",
        ],
        call_to_action: CallToAction {
            heading: "Your house is in order now it’s time to build your legacy.",
            paragraph: "Your organization is structured, investor-ready, and future-proofed. The conversation now is about scaling impact, new markets, sharper agility, and long-term resilience. Let’s talk about shaping a finance and systems roadmap worthy of your ambitions.",
        },
        services: "Technical Accounting outsourcing, IFRS/US GAAP advisory, Legacy ERP Overhaul",
    },
];

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_ordering() {
        assert!(Stage::S1 < Stage::S2);
        assert!(Stage::S2 < Stage::S3);
        assert!(Stage::S3 < Stage::S4);
        assert!(Stage::S4 < Stage::S5);
    }

    #[test]
    fn table_is_indexed_by_stage() {
        for stage in Stage::ALL {
            assert_eq!(stage.descriptor().stage, stage);
            assert_eq!(
                stage.descriptor().title,
                format!("Stage {}", stage.number())
            );
        }
    }

    #[test]
    fn descriptors_are_well_formed() {
        for descriptor in &STAGE_TABLE {
            assert!(!descriptor.title.is_empty());
            assert!(!descriptor.subtitle.is_empty());
            assert!(!descriptor.description.is_empty());
            assert!(!descriptor.problems.is_empty());
            assert_eq!(descriptor.problems.len(), descriptor.solutions.len());
            assert_eq!(descriptor.pairs().count(), descriptor.problems.len());
        }
    }

    #[test]
    fn lookup_falls_back_to_stage_one() {
        assert_eq!(descriptor_for(0).stage, Stage::S1);
        assert_eq!(descriptor_for(6).stage, Stage::S1);
        assert_eq!(descriptor_for(-3).stage, Stage::S1);
        assert_eq!(descriptor_for(4).stage, Stage::S4);
    }

    #[test]
    fn next_stops_at_five() {
        assert_eq!(Stage::S1.next(), Some(Stage::S2));
        assert_eq!(Stage::S4.next(), Some(Stage::S5));
        assert_eq!(Stage::S5.next(), None);
    }

    #[test]
    fn stage_display() {
        assert_eq!(format!("{}", Stage::S1), "Stage 1: Manual & Fragmented");
        assert_eq!(format!("{}", Stage::S5), "Stage 5: Strategic & Scalable");
    }

    #[test]
    fn stage_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Stage::S3).expect("serialize"), "3");
        let parsed: Stage = serde_json::from_str("2").expect("parse");
        assert_eq!(parsed, Stage::S2);
        assert!(serde_json::from_str::<Stage>("9").is_err());
    }

    #[test]
    fn callout_prefixes_title() {
        assert_eq!(
            Stage::S2.descriptor().callout(),
            "Stage 2 - Finance process standardisation, data clean-ups, ERP fitment/rollout, FPA as a service"
        );
    }
}
