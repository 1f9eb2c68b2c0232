//! Template Selector — maps a weekly frequency (or an explicit override) to a
//! program template and its ordered session names.
//!
//! Pure and deterministic. `structure_for` is the only place session layouts are defined.
//!
//! | Frequency | Template          | Sessions                                   |
//! |-----------|-------------------|--------------------------------------------|
//! | 1–2       | FULL_BODY         | Full Body ×n                               |
//! | 3         | PUSH_PULL_LEGS    | Push, Pull, Legs                           |
//! | 4         | UPPER_LOWER       | Upper, Lower, Upper, Lower                 |
//! | 5         | PPL_UPPER_LOWER   | Push, Pull, Legs, Upper, Lower             |
//! | 6         | PPL_X2            | Push, Pull, Legs ×2                        |
//! | 7         | PPL_X2_FULL_BODY  | Push, Pull, Legs ×2, Full Body             |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::profile::{MAX_FREQUENCY, MIN_FREQUENCY};
use crate::models::program::ProgramTemplate;

pub const FULL_BODY: &str = "Full Body";
pub const PUSH: &str = "Push";
pub const PULL: &str = "Pull";
pub const LEGS: &str = "Legs";
pub const UPPER: &str = "Upper";
pub const LOWER: &str = "Lower";

/// A template together with the exact sessions a program built on it must contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSelection {
    pub template: ProgramTemplate,
    pub session_structure: Vec<String>,
    pub description: String,
}

impl fmt::Display for TemplateSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({})",
            self.template,
            self.session_structure.join(" → "),
            self.description
        )
    }
}

/// Weekly frequencies a template is considered feasible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateConstraints {
    pub min_frequency: i32,
    pub max_frequency: i32,
}

impl TemplateConstraints {
    pub fn for_template(template: ProgramTemplate) -> Self {
        let (min_frequency, max_frequency) = match template {
            ProgramTemplate::FullBody => (1, 6),
            ProgramTemplate::UpperLower => (4, 4),
            ProgramTemplate::PushPullLegs => (3, 3),
            ProgramTemplate::PplUpperLower => (5, 5),
            ProgramTemplate::PplX2 => (6, 6),
            ProgramTemplate::PplX2FullBody => (7, 7),
            ProgramTemplate::Custom => (MIN_FREQUENCY, MAX_FREQUENCY),
        };
        Self {
            min_frequency,
            max_frequency,
        }
    }

    pub fn is_feasible(&self, frequency: i32) -> bool {
        (self.min_frequency..=self.max_frequency).contains(&frequency)
    }
}

/// Template for a weekly frequency. Out-of-range values clamp to 1 or 7.
pub fn template_for_frequency(frequency: i32) -> ProgramTemplate {
    match frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY) {
        1 | 2 => ProgramTemplate::FullBody,
        3 => ProgramTemplate::PushPullLegs,
        4 => ProgramTemplate::UpperLower,
        5 => ProgramTemplate::PplUpperLower,
        6 => ProgramTemplate::PplX2,
        _ => ProgramTemplate::PplX2FullBody,
    }
}

/// Ordered session names for `template`.
///
/// Fixed-layout templates ignore `frequency`. FULL_BODY and CUSTOM repeat
/// "Full Body" once per (clamped) weekly session.
pub fn structure_for(template: ProgramTemplate, frequency: i32) -> Vec<String> {
    let frequency = frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY) as usize;
    let names: Vec<&str> = match template {
        ProgramTemplate::FullBody | ProgramTemplate::Custom => vec![FULL_BODY; frequency],
        ProgramTemplate::PushPullLegs => vec![PUSH, PULL, LEGS],
        ProgramTemplate::UpperLower => vec![UPPER, LOWER, UPPER, LOWER],
        ProgramTemplate::PplUpperLower => vec![PUSH, PULL, LEGS, UPPER, LOWER],
        ProgramTemplate::PplX2 => vec![PUSH, PULL, LEGS, PUSH, PULL, LEGS],
        ProgramTemplate::PplX2FullBody => vec![PUSH, PULL, LEGS, PUSH, PULL, LEGS, FULL_BODY],
    };
    names.into_iter().map(str::to_string).collect()
}

fn describe(template: ProgramTemplate, sessions: usize) -> String {
    match template {
        ProgramTemplate::FullBody => format!("{sessions} Full Body session(s) per week"),
        ProgramTemplate::PushPullLegs => "Classic Push/Pull/Legs - one cycle per week".to_string(),
        ProgramTemplate::UpperLower => "Upper/Lower x2 - each half trained twice a week".to_string(),
        ProgramTemplate::PplUpperLower => "PPL + Upper/Lower - balanced weekly volume".to_string(),
        ProgramTemplate::PplX2 => "PPL x2 - every muscle trained twice a week".to_string(),
        ProgramTemplate::PplX2FullBody => "PPL x2 + Full Body - maximal weekly volume".to_string(),
        ProgramTemplate::Custom => format!("Custom program - {sessions} Full Body session(s)"),
    }
}

/// Selects the template for `frequency`, or builds the layout of `override_template`
/// when one is given.
pub fn select(frequency: i32, override_template: Option<ProgramTemplate>) -> TemplateSelection {
    let template = override_template.unwrap_or_else(|| template_for_frequency(frequency));
    let session_structure = structure_for(template, frequency);
    let description = describe(template, session_structure.len());

    TemplateSelection {
        template,
        session_structure,
        description,
    }
}
