//! Power-structure catalog
//!
//! Separate taxonomy from the basic catalog: categories here overlap in
//! meaning (arbitration, data sharing) but are scored only by the power
//! analyzer.

use regex::Regex;
use shared_types::{CommodificationKind, PowerHolder, Severity, TransparencyLevel};

use super::{compile_expressions, CatalogError, DetectionRule, RuleSet, RuleSetKind, RuleSpec};

/// Who a clause hands control to, and over what
pub struct ControlSpec {
    pub rule: RuleSpec,
    pub holder: PowerHolder,
}

pub struct StructuralSpec {
    pub rule: RuleSpec,
    pub manipulation_type: &'static str,
}

pub struct CommodificationSpec {
    pub rule: RuleSpec,
    pub kind: CommodificationKind,
    pub opt_out_available: bool,
    pub transparency: TransparencyLevel,
}

/// The four decisions tracked by the power-flow map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDecision {
    RuleChanges,
    ServiceTermination,
    DataOwnership,
    DisputeResolution,
}

/// Company expressions are checked first; the alternative only applies to
/// sentences without a company hit.
pub struct FlowSpec {
    pub decision: FlowDecision,
    pub company: &'static [&'static str],
    pub alternative: &'static [&'static str],
    pub alternative_holder: PowerHolder,
}

pub const CONTROL_RULES: &[ControlSpec] = &[
    ControlSpec {
        rule: RuleSpec {
            category: "rule_modification_power",
            patterns: &[
                r"(?i)(?:we|company|service provider).*?(?:may|can|will|shall|reserve|retain).*?(?:modify|change|update|alter|amend).*?(?:terms|agreement|policy|rules).*?(?:at.*?(?:our|sole|absolute|complete).*?discretion|without.*?(?:notice|consent)|any.*?time|anytime)",
                r"(?i)(?:terms|agreement|policy).*?(?:may.*?be|can.*?be|are|will.*?be).*?(?:changed|modified|updated|revised).*?(?:at.*?(?:our|sole|complete).*?discretion|without.*?(?:notice|consent)|any.*?time)",
            ],
            weight: 30,
            severity: Severity::High,
            confidence_base: 0.8,
            description: "Company can rewrite the rules",
        },
        holder: PowerHolder::Company,
    },
    ControlSpec {
        rule: RuleSpec {
            category: "data_ownership_control",
            patterns: &[
                r"(?i)(?:we|company|service provider).*?(?:own|retain|control|possess).*?(?:all|any|your|user).*?(?:data|information|content|intellectual.*?property)",
                r"(?i)(?:you|user).*?(?:grant|give|assign|transfer|provide).*?(?:us|company|service provider).*?(?:unlimited|perpetual|irrevocable|worldwide|exclusive).*?(?:license|right|permission)",
            ],
            weight: 35,
            severity: Severity::Critical,
            confidence_base: 0.85,
            description: "Company claims control of user data",
        },
        holder: PowerHolder::Company,
    },
    ControlSpec {
        rule: RuleSpec {
            category: "termination_power",
            patterns: &[
                r"(?i)(?:we|company|service provider).*?(?:may|can|will|shall|reserve|retain).*?(?:terminate|suspend|end|discontinue|cancel).*?(?:your|user).*?(?:account|access|service).*?(?:at.*?(?:our|sole|absolute|complete).*?discretion|without.*?(?:notice|cause|reason)|any.*?time|immediately)",
                r"(?i)(?:immediate|instant|without.*?notice).*?(?:termination|suspension|cancellation).*?(?:of|for).*?(?:account|service|access)",
            ],
            weight: 25,
            severity: Severity::High,
            confidence_base: 0.8,
            description: "Company can cut off access at will",
        },
        holder: PowerHolder::Company,
    },
    ControlSpec {
        rule: RuleSpec {
            category: "dispute_resolution_power",
            patterns: &[
                r"(?i)(?:all|any).*?(?:disputes?|claims?|controversies?).*?(?:shall|must|will|are.*?required.*?to).*?(?:be.*?(?:resolved|settled|decided|handled)|go.*?to).*?(?:binding.*?arbitration|arbitration|specific.*?court|designated.*?jurisdiction)",
                r"(?i)(?:you|user).*?(?:waive|give.*?up|surrender|forfeit).*?(?:right|claim).*?(?:to|for).*?(?:jury.*?trial|class.*?action|court.*?proceedings|legal.*?action)",
            ],
            weight: 40,
            severity: Severity::Critical,
            confidence_base: 0.85,
            description: "Company chooses how disputes are decided",
        },
        holder: PowerHolder::Company,
    },
    ControlSpec {
        rule: RuleSpec {
            category: "user_empowerment",
            patterns: &[
                r"(?i)(?:you|user).*?(?:may|can|have.*?the.*?right|are.*?entitled).*?(?:to|for).*?(?:opt.*?out|withdraw|cancel|modify|delete|access|control|refuse|object)",
                r"(?i)(?:with.*?(?:your|user).*?(?:explicit|express|written|prior|informed).*?consent|only.*?with.*?(?:your|user).*?permission)",
                r"(?i)(?:you|user).*?(?:retain|keep|maintain).*?(?:full|complete|absolute).*?(?:control|ownership|rights).*?(?:over|to|of).*?(?:your|user).*?(?:data|content|information)",
            ],
            weight: -15,
            severity: Severity::Low,
            confidence_base: 0.75,
            description: "User keeps meaningful control",
        },
        holder: PowerHolder::User,
    },
];

pub const STRUCTURAL_RULES: &[StructuralSpec] = &[
    StructuralSpec {
        rule: RuleSpec {
            category: "exit_friction",
            patterns: &[
                r"(?i)(?:cancel|terminate|close|delete).*?(?:account|subscription|service).*?(?:must|shall|require|need).*?(?:contact|call|write|email|submit.*?request)",
                r"(?i)(?:deletion|removal|cancellation).*?(?:request|application).*?(?:processed|completed|take|require).*?(?:up.*?to|within|may.*?take).*?(?:\d+.*?(?:business.*?)?days?|\d+.*?weeks?|\d+.*?months?)",
                r"(?i)(?:verification|authentication|confirmation).*?(?:process|procedure|steps?).*?(?:required|necessary|mandatory).*?(?:before|prior.*?to).*?(?:deletion|cancellation|termination)",
            ],
            weight: 25,
            severity: Severity::High,
            confidence_base: 0.75,
            description: "Leaving is made deliberately hard",
        },
        manipulation_type: "exit_barriers",
    },
    StructuralSpec {
        rule: RuleSpec {
            category: "data_retention_trap",
            patterns: &[
                r"(?i)(?:data|information|records?).*?(?:may.*?be.*?retained|retained|kept|stored).*?(?:indefinitely|permanently|for.*?legitimate.*?business.*?purposes|after.*?(?:termination|cancellation|deletion))",
                r"(?i)(?:anonymized?|aggregated?|de-identified).*?(?:data|information).*?(?:may.*?be.*?retained|kept|used).*?(?:indefinitely|permanently|without.*?limitation)",
                r"(?i)(?:we|company).*?(?:may|will).*?(?:retain|keep).*?(?:backup|archived|historical).*?(?:copies|versions).*?(?:of|containing).*?(?:your|user).*?(?:data|information)",
            ],
            weight: 30,
            severity: Severity::Critical,
            confidence_base: 0.8,
            description: "Data outlives the relationship",
        },
        manipulation_type: "data_hoarding",
    },
    StructuralSpec {
        rule: RuleSpec {
            category: "asymmetric_obligations",
            patterns: &[
                r"(?i)(?:you|user).*?(?:must|shall|are.*?required.*?to|have.*?obligation.*?to).*?(?:provide|give|maintain|ensure).*?(?:accurate|current|complete|truthful).*?(?:information|data)",
                r"(?i)(?:failure|inability).*?(?:to|of).*?(?:you|user).*?(?:to|for).*?(?:comply|meet|satisfy|fulfill).*?(?:may.*?result.*?in|will.*?result.*?in|results.*?in).*?(?:immediate.*?)?(?:termination|suspension|cancellation)",
                r"(?i)(?:you|user).*?(?:agree|consent|acknowledge).*?(?:to|that).*?(?:indemnify|hold.*?harmless|defend).*?(?:us|company|provider)",
            ],
            weight: 20,
            severity: Severity::High,
            confidence_base: 0.75,
            description: "Obligations run one way",
        },
        manipulation_type: "power_asymmetry",
    },
    StructuralSpec {
        rule: RuleSpec {
            category: "modification_asymmetry",
            patterns: &[
                r"(?i)(?:we|company).*?(?:may|can|reserve.*?right).*?(?:modify|change|update|alter).*?(?:at.*?any.*?time|without.*?(?:notice|consent)|with.*?(?:little|minimal|brief).*?notice)",
                r"(?i)(?:continued.*?use|use.*?after.*?changes|accessing.*?after.*?modification).*?(?:constitutes|means|indicates|represents).*?(?:acceptance|agreement|consent)",
                r"(?i)(?:you|user).*?(?:may.*?not|cannot|are.*?not.*?permitted.*?to).*?(?:modify|change|alter|negotiate).*?(?:these.*?terms|this.*?agreement|any.*?part)",
            ],
            weight: 25,
            severity: Severity::High,
            confidence_base: 0.75,
            description: "Only one party may change the deal",
        },
        manipulation_type: "unilateral_control",
    },
];

pub const COMMODIFICATION_RULES: &[CommodificationSpec] = &[
    CommodificationSpec {
        rule: RuleSpec {
            category: "ai_training_extraction",
            patterns: &[
                r"(?i)(?:anonymized?|aggregated?|de-identified).*?(?:data|information|content).*?(?:may.*?be.*?used|used.*?to|for|can.*?be.*?used).*?(?:train|improve|enhance|develop|create|build).*?(?:machine.*?learning|artificial.*?intelligence|ai|ml|algorithms?|models?)",
                r"(?i)(?:your|user).*?(?:interactions?|behavior|usage|activity|content).*?(?:may.*?be.*?used|used.*?to|for|can.*?be.*?used).*?(?:improve|enhance|develop|train|create).*?(?:our|the).*?(?:services?|products?|algorithms?|ai|ml)",
                r"(?i)(?:machine.*?learning|artificial.*?intelligence|ai|ml|algorithms?).*?(?:training|development|improvement|enhancement).*?(?:using|with|from|based.*?on).*?(?:your|user|customer).*?(?:data|information|content|inputs?)",
            ],
            weight: 35,
            severity: Severity::Critical,
            confidence_base: 0.8,
            description: "User data feeds model training",
        },
        kind: CommodificationKind::AiTraining,
        opt_out_available: false,
        transparency: TransparencyLevel::Hidden,
    },
    CommodificationSpec {
        rule: RuleSpec {
            category: "behavioral_profiling",
            patterns: &[
                r"(?i)(?:behavioral|usage|interaction|activity).*?(?:data|information|patterns?|profiles?).*?(?:collect|gather|analyze|process|use|create|build|develop)",
                r"(?i)(?:analytics?|metrics|insights?|profiles?).*?(?:derive|extract|generate|create|build).*?(?:from|using|based.*?on).*?(?:your|user).*?(?:data|behavior|activity|usage)",
                r"(?i)(?:personalization|targeted|customized).*?(?:advertising|marketing|recommendations|content).*?(?:based.*?on|using|from).*?(?:your|user).*?(?:data|behavior|preferences)",
            ],
            weight: 25,
            severity: Severity::High,
            confidence_base: 0.75,
            description: "Behaviour is profiled for targeting",
        },
        kind: CommodificationKind::BehavioralProfiling,
        opt_out_available: false,
        transparency: TransparencyLevel::Vague,
    },
    CommodificationSpec {
        rule: RuleSpec {
            category: "data_resale_licensing",
            patterns: &[
                r"(?i)(?:share|provide|disclose|sell|license|transfer).*?(?:your|user|anonymized|aggregated).*?(?:data|information).*?(?:with|to).*?(?:third.*?parties|partners|affiliates|advertisers|business.*?partners).*?(?:for.*?their.*?(?:business.*?purposes|commercial.*?use)|for.*?marketing)",
                r"(?i)(?:third.*?parties|partners|affiliates).*?(?:may|can|will).*?(?:receive|access|use|process).*?(?:your|user).*?(?:data|information).*?(?:for.*?their.*?(?:own|business|commercial).*?purposes)",
                r"(?i)(?:monetize|commercial.*?use|business.*?purposes).*?(?:of|using|from).*?(?:your|user|customer).*?(?:data|information|content)",
            ],
            weight: 40,
            severity: Severity::Critical,
            confidence_base: 0.85,
            description: "User data is resold or licensed",
        },
        kind: CommodificationKind::DataResale,
        opt_out_available: false,
        transparency: TransparencyLevel::Buried,
    },
    CommodificationSpec {
        rule: RuleSpec {
            category: "perpetual_licensing",
            patterns: &[
                r"(?i)(?:you|user).*?(?:grant|give|provide|assign).*?(?:us|company|service.*?provider).*?(?:perpetual|irrevocable|worldwide|unlimited|unrestricted|royalty-free).*?(?:license|right|permission).*?(?:to|for).*?(?:use|exploit|monetize|commercialize)",
                r"(?i)(?:perpetual|irrevocable|unlimited|worldwide).*?(?:license|right|permission).*?(?:to|for).*?(?:use|modify|distribute|display|perform|create.*?derivative.*?works)",
                r"(?i)(?:rights?|license).*?(?:survive|continue|remain.*?in.*?effect|persist).*?(?:termination|cancellation|end.*?of.*?service|account.*?closure)",
            ],
            weight: 30,
            severity: Severity::High,
            confidence_base: 0.8,
            description: "Content licensed to the company forever",
        },
        kind: CommodificationKind::PerpetualRights,
        opt_out_available: false,
        transparency: TransparencyLevel::LegalJargon,
    },
];

/// Rights-erosion categories; `weight` is the severity points per hit
pub const RIGHTS_EROSION_RULES: &[RuleSpec] = &[
    RuleSpec {
        category: "privacy_rights",
        patterns: &[
            r"(?i)(?:share|sell|transfer|disclose).*?(?:personal|private).*?(?:information|data).*?(?:third.*?parties|partners|affiliates|anyone)",
            r"(?i)(?:no.*?privacy|waive.*?privacy|give.*?up.*?privacy|forfeit.*?privacy)",
            r"(?i)(?:monitor|track|record|log).*?(?:all|any|your).*?(?:activity|actions|communications|behavior)",
        ],
        weight: 25,
        severity: Severity::Critical,
        confidence_base: 0.8,
        description: "Privacy rights compromised",
    },
    RuleSpec {
        category: "due_process",
        patterns: &[
            r"(?i)(?:waive|give.*?up|forfeit|surrender).*?(?:right.*?to|rights.*?of).*?(?:trial|jury|court|appeal|hearing)",
            r"(?i)(?:binding|mandatory|required).*?arbitration.*?(?:individual|private).*?basis",
            r"(?i)(?:no.*?class.*?action|waive.*?class.*?action|individual.*?claims.*?only)",
        ],
        weight: 20,
        severity: Severity::High,
        confidence_base: 0.8,
        description: "Legal rights and due process removed",
    },
    RuleSpec {
        category: "data_control",
        patterns: &[
            r"(?i)(?:cannot|unable|not.*?possible|refuse|deny).*?(?:delete|remove|access|download|export).*?(?:data|information|account)",
            r"(?i)(?:retain|keep|maintain).*?(?:data|information).*?(?:indefinitely|permanently|as.*?long.*?as)",
            r"(?i)(?:no.*?data.*?portability|cannot.*?export|not.*?transferable)",
        ],
        weight: 15,
        severity: Severity::Medium,
        confidence_base: 0.75,
        description: "Data ownership and control stripped",
    },
    RuleSpec {
        category: "unilateral_changes",
        patterns: &[
            r"(?i)(?:modify|change|update|alter).*?(?:terms|agreement|policy).*?(?:without.*?notice|any.*?time|sole.*?discretion)",
            r"(?i)(?:continued.*?use|ongoing.*?use).*?(?:constitutes|means|deemed).*?(?:acceptance|agreement)",
            r"(?i)(?:effective.*?immediately|immediate.*?effect).*?(?:upon.*?posting|when.*?posted)",
        ],
        weight: 15,
        severity: Severity::Medium,
        confidence_base: 0.75,
        description: "Unilateral modification rights",
    },
    RuleSpec {
        category: "irreversible_consequences",
        patterns: &[
            r"(?i)(?:permanent|permanently|irreversible|irreversibly|final|irrevocable).*?(?:deletion|removal|termination|suspension|ban)",
            r"(?i)(?:no.*?refund|non-refundable).*?(?:under.*?any|in.*?any|regardless)",
            r"(?i)(?:auto.*?renew|automatic.*?renewal).*?(?:unless|until).*?(?:cancel|opt.*?out).*?(?:before|prior)",
        ],
        weight: 18,
        severity: Severity::High,
        confidence_base: 0.75,
        description: "Irreversible consequences imposed",
    },
];

/// Empowerment factors; each present factor is worth `weight` points
pub const EMPOWERMENT_RULES: &[RuleSpec] = &[
    RuleSpec {
        category: "meaningful_notice",
        patterns: &[
            r"(?i)(?:advance|prior|reasonable).*?(?:notice|notification).*?(?:before|prior.*?to).*?(?:changes|modifications)",
            r"(?i)(?:notify|inform|alert).*?(?:you|users).*?(?:before|in.*?advance).*?(?:important|significant).*?(?:changes|updates)",
        ],
        weight: 25,
        severity: Severity::Low,
        confidence_base: 0.75,
        description: "Changes are announced before they apply",
    },
    RuleSpec {
        category: "meaningful_opt_out",
        patterns: &[
            r"(?i)(?:easy|simple|straightforward).*?(?:to|process.*?to).*?(?:cancel|unsubscribe|opt.*?out)",
            r"(?i)(?:one.*?click|single.*?click|online).*?(?:cancellation|unsubscribe|opt.*?out)",
            r"(?i)(?:no.*?questions.*?asked|immediate|instant).*?(?:cancellation|termination)",
        ],
        weight: 25,
        severity: Severity::Low,
        confidence_base: 0.75,
        description: "Opting out is simple",
    },
    RuleSpec {
        category: "data_deletion_possible",
        patterns: &[
            r"(?i)(?:you.*?can|users.*?may|right.*?to).*?(?:delete|remove|erase).*?(?:all|your|personal).*?(?:data|information)",
            r"(?i)(?:complete|full|permanent).*?(?:data|account).*?(?:deletion|removal).*?(?:available|possible)",
        ],
        weight: 25,
        severity: Severity::Low,
        confidence_base: 0.75,
        description: "Data can actually be deleted",
    },
    RuleSpec {
        category: "comparison_enabled",
        patterns: &[
            r"(?i)(?:compare|comparison).*?(?:plans|options|alternatives).*?(?:available|provided)",
            r"(?i)(?:clear|transparent).*?(?:pricing|costs|fees).*?(?:structure|breakdown|comparison)",
        ],
        weight: 25,
        severity: Severity::Low,
        confidence_base: 0.75,
        description: "Plans and prices can be compared",
    },
];

pub const FLOW_RULES: &[FlowSpec] = &[
    FlowSpec {
        decision: FlowDecision::RuleChanges,
        company: &[r"(?i)(?:we|company).*?(?:may|can|will).*?(?:modify|change|update).*?(?:terms|rules|policy)"],
        alternative: &[r"(?i)(?:you|user).*?(?:can|may).*?(?:modify|negotiate|change).*?(?:terms|agreement)"],
        alternative_holder: PowerHolder::User,
    },
    FlowSpec {
        decision: FlowDecision::ServiceTermination,
        company: &[r"(?i)(?:we|company).*?(?:may|can|will).*?(?:terminate|suspend|end).*?(?:service|account)"],
        alternative: &[r"(?i)(?:you|user).*?(?:can|may).*?(?:terminate|cancel|end).*?(?:service|account)"],
        alternative_holder: PowerHolder::Shared,
    },
    FlowSpec {
        decision: FlowDecision::DataOwnership,
        company: &[r"(?i)(?:we|company).*?(?:own|control|retain).*?(?:data|information)"],
        alternative: &[r"(?i)(?:you|user).*?(?:own|control|retain).*?(?:data|information)"],
        alternative_holder: PowerHolder::User,
    },
    FlowSpec {
        decision: FlowDecision::DisputeResolution,
        // Courts picked by the company are still company power
        company: &[
            r"(?i)(?:arbitration|company.*?decides|binding.*?arbitration)",
            r"(?i)(?:disputes?|claims?).*?(?:shall|must|will).*?(?:be.*?governed|resolved|subject).*?(?:by|in|under).*?(?:laws?.*?of|courts?.*?of|jurisdiction.*?of)",
        ],
        alternative: &[r"(?i)(?:you.*?may.*?choose|user.*?choice|multiple.*?options).*?(?:court|arbitration|dispute)"],
        alternative_holder: PowerHolder::User,
    },
];

pub struct ControlRule {
    pub rule: DetectionRule,
    pub holder: PowerHolder,
}

pub struct StructuralRule {
    pub rule: DetectionRule,
    pub manipulation_type: &'static str,
}

pub struct CommodificationRule {
    pub rule: DetectionRule,
    pub kind: CommodificationKind,
    pub opt_out_available: bool,
    pub transparency: TransparencyLevel,
}

pub struct FlowRule {
    pub decision: FlowDecision,
    pub company: Vec<Regex>,
    pub alternative: Vec<Regex>,
    pub alternative_holder: PowerHolder,
}

/// Compiled power-structure rule sets
pub struct PowerCatalog {
    pub control: Vec<ControlRule>,
    pub structural: Vec<StructuralRule>,
    pub commodification: Vec<CommodificationRule>,
    pub rights_erosion: RuleSet,
    pub empowerment: RuleSet,
    pub flow: Vec<FlowRule>,
}

impl PowerCatalog {
    pub fn compile() -> Result<Self, CatalogError> {
        let control = CONTROL_RULES
            .iter()
            .map(|spec| {
                Ok(ControlRule {
                    rule: DetectionRule::compile(RuleSetKind::PowerControl, &spec.rule)?,
                    holder: spec.holder,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let structural = STRUCTURAL_RULES
            .iter()
            .map(|spec| {
                Ok(StructuralRule {
                    rule: DetectionRule::compile(RuleSetKind::Structural, &spec.rule)?,
                    manipulation_type: spec.manipulation_type,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let commodification = COMMODIFICATION_RULES
            .iter()
            .map(|spec| {
                Ok(CommodificationRule {
                    rule: DetectionRule::compile(RuleSetKind::Commodification, &spec.rule)?,
                    kind: spec.kind,
                    opt_out_available: spec.opt_out_available,
                    transparency: spec.transparency,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let flow = FLOW_RULES
            .iter()
            .map(|spec| {
                Ok(FlowRule {
                    decision: spec.decision,
                    company: compile_expressions(RuleSetKind::PowerFlow, "flow", spec.company)?,
                    alternative: compile_expressions(
                        RuleSetKind::PowerFlow,
                        "flow",
                        spec.alternative,
                    )?,
                    alternative_holder: spec.alternative_holder,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(Self {
            control,
            structural,
            commodification,
            rights_erosion: RuleSet::compile(RuleSetKind::RightsErosion, RIGHTS_EROSION_RULES)?,
            empowerment: RuleSet::compile(RuleSetKind::Empowerment, EMPOWERMENT_RULES)?,
            flow,
        })
    }

    pub fn control_rule(&self, category: &str) -> Option<&ControlRule> {
        self.control.iter().find(|r| r.rule.category == category)
    }
}
