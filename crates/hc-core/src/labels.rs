//! Substring-keyed display labels.
//!
//! Rules are scanned in order and the first pattern contained in the name wins,
//! so more specific patterns must precede the general ones they overlap with if
//! they are meant to take effect.

use serde::{Deserialize, Serialize};

/// Map names containing `pattern` to `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRule {
    /// Substring searched for in the object name.
    pub pattern: String,
    /// Display label (TLatex-style markup allowed).
    pub label: String,
}

impl LabelRule {
    /// Create a rule.
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), label: label.into() }
    }
}

/// Ordered list of label rules with first-match semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelRules(Vec<LabelRule>);

impl LabelRules {
    /// Build from `(pattern, label)` pairs, keeping their order.
    pub fn from_pairs<I, P, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, L)>,
        P: Into<String>,
        L: Into<String>,
    {
        Self(pairs.into_iter().map(|(p, l)| LabelRule::new(p, l)).collect())
    }

    /// Label of the first rule whose pattern occurs in `name`.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|r| name.contains(r.pattern.as_str())).map(|r| r.label.as_str())
    }

    /// Rules in scan order.
    pub fn rules(&self) -> &[LabelRule] {
        &self.0
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short kinematic x-axis titles.
    pub fn kinematics_short() -> Self {
        Self::from_pairs([
            ("pt", "p_{t} [GeV]"),
            ("eta", "#eta"),
            ("phi", "#phi [rad]"),
            ("E", "E [GeV]"),
            ("pz", " p_{z} [GeV]"),
            ("m", " m [GeV]"),
            ("Et", "Rest Energy [GeV]"),
        ])
    }

    /// Descriptive kinematic x-axis titles.
    pub fn kinematics_verbose() -> Self {
        Self::from_pairs([
            ("pt", "Transverse Momentum (p_t) [GeV]"),
            ("eta", "Pseudorapidity (#eta)"),
            ("phi", "Azimuthal Angle (#phi) [rad]"),
            ("E", "Energy of Particle (E) [GeV]"),
            ("pz", "Longitudinal Momentum (p_z) [GeV]"),
            ("m", "Mass (m) [GeV]"),
        ])
    }

    /// Particle / process labels for dark-matter Higgs-portal samples.
    pub fn particles() -> Self {
        Self::from_pairs([
            ("higgs", "Higgs Boson (h1)"),
            ("xd", "Dark Matter (xd)"),
            ("xd_", "Anti-Dark Matter (xd~)"),
            ("xd_xd", "DM-(Anti DM)"),
            ("ps_a", "Pseudoscalar (a)"),
            ("ps_A", "Heavy Pseudoscalar (A)"),
            ("bj", "Bottom Quark Jet"),
            ("bj_", "Bottom Anti_Quark Jet"),
        ])
    }
}

impl FromIterator<LabelRule> for LabelRules {
    fn from_iter<T: IntoIterator<Item = LabelRule>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
