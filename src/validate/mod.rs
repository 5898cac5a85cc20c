//! Cross-tag integrity checks.
//!
//! The rules run over a fully decoded tag sequence and attach
//! [`Finding`]s to the tags that look wrong. They never fail: a stream
//! that cannot be checked (no AudioSpecificConfig, a single video frame)
//! simply produces no findings.

use crate::format::flv::{FlvTag, Finding};

mod rules;

pub use rules::{AudioDurationIntegrity, IdrIntegrity, VideoDurationIntegrity};

/// Relative tolerance shared by the duration rules.
pub const DURATION_TOLERANCE: f64 = 0.05;

/// A check over a decoded tag sequence.
pub trait ValidationRule {
    /// Name reported in every finding the rule produces.
    fn name(&self) -> &'static str;

    /// Inspects `tags` and attaches findings to the offending ones.
    fn check(&self, tags: &mut [FlvTag<'_>]);

    /// Builds a warning carrying this rule's name.
    fn warning(&self, message: String) -> Finding {
        Finding::warning(self.name(), message)
    }
}

/// The rules run by [`run_validation_rules`], in order.
pub fn default_rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(IdrIntegrity),
        Box::new(AudioDurationIntegrity),
        Box::new(VideoDurationIntegrity),
    ]
}

/// Runs the IDR, audio duration and video duration rules over `tags`.
///
/// Findings land on the tags in rule order, so a tag flagged by two rules
/// lists the IDR finding first.
pub fn run_validation_rules(tags: &mut [FlvTag<'_>]) {
    for rule in default_rules() {
        rule.check(tags);
    }

    let findings: usize = tags.iter().map(|tag| tag.validations.len()).sum();
    if findings > 0 {
        log::info!("Validation produced {} findings over {} tags", findings, tags.len());
    }
}
