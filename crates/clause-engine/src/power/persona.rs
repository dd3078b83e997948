//! Persona risk profiles

use shared_types::Persona;

/// How strongly a persona is hurt by particular rights-erosion categories
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonaProfile {
    /// Rights-erosion categories weighted by `multiplier` for this persona
    pub high_risk_categories: &'static [&'static str],
    pub multiplier: f64,
    /// Contribution to the weighted risk (10% weight)
    pub risk_modifier: f64,
    pub description: &'static str,
}

const INDIVIDUAL_USER: PersonaProfile = PersonaProfile {
    high_risk_categories: &["privacy_rights", "due_process"],
    multiplier: 1.0,
    risk_modifier: 10.0,
    description: "Personal data and consumer protection",
};

const SMALL_BUSINESS: PersonaProfile = PersonaProfile {
    high_risk_categories: &["due_process", "irreversible_consequences"],
    multiplier: 1.5,
    risk_modifier: 5.0,
    description: "Limited legal resources for disputes",
};

const DEVELOPER: PersonaProfile = PersonaProfile {
    high_risk_categories: &["data_control", "unilateral_changes"],
    multiplier: 1.3,
    risk_modifier: 8.0,
    description: "API dependencies and code integration",
};

const HEALTHCARE_PROVIDER: PersonaProfile = PersonaProfile {
    high_risk_categories: &["privacy_rights", "data_control"],
    multiplier: 2.0,
    risk_modifier: 15.0,
    description: "Patient data protection required",
};

pub fn profile(persona: Persona) -> &'static PersonaProfile {
    match persona {
        Persona::IndividualUser => &INDIVIDUAL_USER,
        Persona::SmallBusiness => &SMALL_BUSINESS,
        Persona::Developer => &DEVELOPER,
        Persona::HealthcareProvider => &HEALTHCARE_PROVIDER,
    }
}

impl PersonaProfile {
    pub fn is_high_risk(&self, category: &str) -> bool {
        self.high_risk_categories.contains(&category)
    }
}
