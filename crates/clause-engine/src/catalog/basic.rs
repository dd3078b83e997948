//! Basic clause catalog: risk clauses, dark patterns and positive indicators
//!
//! Scanned section by section by the clause matcher. Expressions are lazy
//! (`.*?`) chains of lexical anchors so paraphrases with the same anchors in
//! the same order still hit.

use shared_types::Severity;

use super::RuleSpec;

pub const RISK_RULES: &[RuleSpec] = &[
    RuleSpec {
        category: "data_sharing",
        patterns: &[
            r"(?i)we may share.*?information.*?with.*?third parties",
            r"(?i)your data.*?may be.*?disclosed.*?to.*?partners",
            r"(?i)information.*?shared.*?with.*?affiliates",
            r"(?i)sell.*?personal.*?information",
            r"(?i)transfer.*?data.*?to.*?other.*?companies",
            r"(?i)provide.*?information.*?to.*?advertisers",
        ],
        weight: 25,
        severity: Severity::Critical,
        confidence_base: 0.9,
        description: "Data sharing with third parties",
    },
    RuleSpec {
        category: "arbitration_waiver",
        patterns: &[
            r"(?i)binding.*?arbitration",
            r"(?i)waive.*?right.*?to.*?jury.*?trial",
            r"(?i)class.*?action.*?waiver",
            r"(?i)individual.*?arbitration.*?only",
            r"(?i)resolve.*?disputes.*?through.*?arbitration",
            r"(?i)mandatory.*?arbitration",
        ],
        weight: 20,
        severity: Severity::Critical,
        confidence_base: 0.85,
        description: "Arbitration clauses that limit legal rights",
    },
    RuleSpec {
        category: "unilateral_changes",
        patterns: &[
            r"(?i)we.*?reserve.*?the.*?right.*?to.*?modify",
            r"(?i)may.*?change.*?these.*?terms.*?at.*?any.*?time",
            r"(?i)update.*?terms.*?without.*?notice",
            r"(?i)sole.*?discretion.*?to.*?change",
            r"(?i)modify.*?agreement.*?unilaterally",
        ],
        weight: 15,
        severity: Severity::High,
        confidence_base: 0.8,
        description: "Unilateral right to change terms",
    },
    RuleSpec {
        category: "account_suspension",
        patterns: &[
            r"(?i)suspend.*?terminate.*?account.*?at.*?any.*?time",
            r"(?i)discontinue.*?service.*?without.*?notice",
            r"(?i)sole.*?discretion.*?to.*?terminate",
            r"(?i)ban.*?user.*?without.*?cause",
            r"(?i)immediate.*?termination.*?without.*?warning",
        ],
        weight: 15,
        severity: Severity::High,
        confidence_base: 0.75,
        description: "Unfair account termination clauses",
    },
    RuleSpec {
        category: "broad_liability_waiver",
        patterns: &[
            r"(?i)not.*?liable.*?for.*?any.*?damages",
            r"(?i)disclaim.*?all.*?warranties",
            r"(?i)use.*?at.*?your.*?own.*?risk",
            r"(?i)no.*?responsibility.*?for.*?content",
            r"(?i)maximum.*?liability.*?limited.*?to",
        ],
        weight: 12,
        severity: Severity::Medium,
        confidence_base: 0.7,
        description: "Broad liability limitations",
    },
    RuleSpec {
        category: "consent_by_default",
        patterns: &[
            r"(?i)by.*?using.*?this.*?service.*?you.*?agree",
            r"(?i)continued.*?use.*?constitutes.*?acceptance",
            r"(?i)accessing.*?implies.*?consent",
            r"(?i)deemed.*?to.*?have.*?accepted",
        ],
        weight: 10,
        severity: Severity::Medium,
        confidence_base: 0.7,
        description: "Implied consent through usage",
    },
];

pub const DARK_PATTERN_RULES: &[RuleSpec] = &[
    RuleSpec {
        category: "urgency_pressure",
        patterns: &[
            r"(?i)limited.*?time.*?offer",
            r"(?i)act.*?now.*?or",
            r"(?i)expires.*?soon",
            r"(?i)last.*?chance",
            r"(?i)must.*?act.*?immediately",
            r"(?i)offer.*?expires.*?midnight",
        ],
        weight: 8,
        severity: Severity::Medium,
        confidence_base: 0.7,
        description: "Potentially manipulative: urgency pressure",
    },
    RuleSpec {
        category: "hidden_costs",
        patterns: &[
            r"(?i)additional.*?fees.*?may.*?apply",
            r"(?i)subject.*?to.*?additional.*?charges",
            r"(?i)plus.*?applicable.*?taxes",
            r"(?i)excluding.*?processing.*?fees",
            r"(?i)may.*?incur.*?additional.*?costs",
            r"(?i)supplemental.*?charges.*?may.*?apply",
        ],
        weight: 8,
        severity: Severity::Critical,
        confidence_base: 0.75,
        description: "Potentially manipulative: hidden costs",
    },
    RuleSpec {
        category: "confusing_language",
        patterns: &[
            r"(?i)notwithstanding.*?the.*?foregoing",
            r"(?i)subject.*?to.*?the.*?provisions.*?herein",
            r"(?i)without.*?prejudice.*?to",
            r"(?i)save.*?as.*?otherwise.*?provided",
            r"(?i)pursuant.*?to.*?the.*?aforementioned",
            r"(?i)heretofore.*?and.*?hereafter",
        ],
        weight: 8,
        severity: Severity::Low,
        confidence_base: 0.7,
        description: "Potentially manipulative: confusing language",
    },
    RuleSpec {
        category: "opt_out_difficulty",
        patterns: &[
            r"(?i)to.*?opt.*?out.*?you.*?must.*?contact",
            r"(?i)unsubscribe.*?by.*?writing.*?to",
            r"(?i)cancellation.*?requires.*?30.*?days",
            r"(?i)written.*?notice.*?required.*?for",
            r"(?i)must.*?provide.*?90.*?days.*?notice",
            r"(?i)cancellation.*?must.*?be.*?in.*?writing",
        ],
        weight: 8,
        severity: Severity::Medium,
        confidence_base: 0.8,
        description: "Potentially manipulative: opt out difficulty",
    },
    RuleSpec {
        category: "auto_renewal",
        patterns: &[
            r"(?i)automatically.*?renew",
            r"(?i)auto.*?renewal",
            r"(?i)subscription.*?will.*?continue",
            r"(?i)recurring.*?billing",
            r"(?i)charged.*?automatically",
        ],
        weight: 8,
        severity: Severity::Critical,
        confidence_base: 0.8,
        description: "Potentially manipulative: auto renewal",
    },
    RuleSpec {
        category: "data_harvesting",
        patterns: &[
            r"(?i)collect.*?device.*?information",
            r"(?i)track.*?your.*?browsing",
            r"(?i)analytics.*?and.*?tracking",
            r"(?i)behavioral.*?data",
            r"(?i)usage.*?patterns.*?and.*?preferences",
        ],
        weight: 8,
        severity: Severity::High,
        confidence_base: 0.7,
        description: "Potentially manipulative: data harvesting",
    },
];

pub const POSITIVE_RULES: &[RuleSpec] = &[
    RuleSpec {
        category: "user_rights",
        patterns: &[
            r"(?i)you.*?have.*?the.*?right.*?to",
            r"(?i)users.*?may.*?request.*?deletion",
            r"(?i)data.*?portability",
            r"(?i)right.*?to.*?access.*?your.*?data",
            r"(?i)opt.*?out.*?at.*?any.*?time",
        ],
        weight: 5,
        severity: Severity::Low,
        confidence_base: 0.8,
        description: "User rights are spelled out",
    },
    RuleSpec {
        category: "transparency",
        patterns: &[
            r"(?i)we.*?will.*?notify.*?you",
            r"(?i)advance.*?notice",
            r"(?i)clear.*?and.*?conspicuous",
            r"(?i)plain.*?language",
            r"(?i)easy.*?to.*?understand",
        ],
        weight: 5,
        severity: Severity::Low,
        confidence_base: 0.75,
        description: "Changes and practices are communicated openly",
    },
    RuleSpec {
        category: "data_protection",
        patterns: &[
            r"(?i)encrypt.*?your.*?data",
            r"(?i)secure.*?transmission",
            r"(?i)gdpr.*?compliant",
            r"(?i)data.*?protection.*?measures",
            r"(?i)privacy.*?by.*?design",
        ],
        weight: 5,
        severity: Severity::Low,
        confidence_base: 0.8,
        description: "Data is actively protected",
    },
];
