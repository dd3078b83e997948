//! Power structure analysis
//!
//! Looks past individual risky phrases at who holds control in the
//! agreement. Five stages feed each other:
//!
//! 1. Power imbalance over sentences (who can change, end or decide things)
//! 2. Structural dark patterns over the full text
//! 3. Data commodification over the full text
//! 4. Damage-weighted risk with persona adjustment and escalation floors
//! 5. Quoted, explained flags for every company-held clause and match
//!
//! Alongside those, the rights-stripping index, compound traps, empowerment
//! factors and the power-flow map round out the picture.

pub mod commodification;
pub mod flags;
pub mod imbalance;
pub mod persona;
pub mod rights;
pub mod structural;
pub mod weighting;

use shared_types::{Persona, PowerAnalysis};
use tracing::debug;

use crate::catalog::PowerCatalog;
use crate::segmenter::split_sentences;

pub use persona::{profile, PersonaProfile};

pub struct PowerStructureAnalyzer<'c> {
    catalog: &'c PowerCatalog,
}

impl<'c> PowerStructureAnalyzer<'c> {
    pub fn new(catalog: &'c PowerCatalog) -> Self {
        Self { catalog }
    }

    pub fn analyze(&self, text: &str, persona: Persona) -> PowerAnalysis {
        let sentences = split_sentences(text);

        let power_imbalance = imbalance::power_imbalance(self.catalog, &sentences);
        let structural = structural::scan_structural(self.catalog, text);
        let commodification = commodification::scan_commodification(self.catalog, text);
        let weighted_risk = weighting::weighted_risk(
            &power_imbalance,
            &structural,
            &commodification,
            profile(persona),
        );
        let flags = flags::explanatory_flags(&power_imbalance, &structural, &commodification);

        debug!(
            sentences = sentences.len(),
            company_power = power_imbalance.company_power_percentage,
            friction = structural.friction_score,
            commodification = commodification.risk_score,
            weighted = weighted_risk.overall_score,
            flags = flags.total_flags,
            "power analysis finished"
        );

        PowerAnalysis {
            user_persona: persona,
            sentences_analyzed: sentences.len(),
            rights_stripping: rights::rights_stripping(self.catalog, &sentences, persona),
            transparency_empowerment: rights::empowerment(self.catalog, text),
            power_flow: imbalance::power_flow(self.catalog, &sentences),
            power_imbalance,
            structural_dark_patterns: structural,
            data_commodification: commodification,
            weighted_risk,
            flags,
        }
    }
}
