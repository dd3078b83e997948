//! Sentence-level rule sets for the pattern classifier
//!
//! Richer, longer-context expressions keyed by the same category ids as the
//! basic catalog so that classifier results merge into the matcher's maps.

use shared_types::Severity;

use super::RuleSpec;

pub const ENHANCED_RISK_RULES: &[RuleSpec] = &[
    RuleSpec {
        category: "data_sharing",
        patterns: &[
            r"(?i)(?:share|sell|transfer|disclose|provide).*?(?:personal|private|user).*?(?:information|data).*?(?:third parties|partners|affiliates|advertisers|vendors)",
            r"(?i)(?:your|user).*?(?:information|data).*?(?:may be|will be|can be).*?(?:shared|disclosed|sold|transferred).*?(?:to|with)",
            r"(?i)(?:marketing|advertising|commercial).*?(?:partners|companies).*?(?:receive|access).*?(?:your|user).*?(?:information|data)",
            r"(?i)(?:business|corporate).*?(?:sale|merger|acquisition|transfer).*?(?:personal|user).*?(?:information|data)",
        ],
        weight: 25,
        severity: Severity::Critical,
        confidence_base: 0.9,
        description: "Personal data shared with or sold to third parties",
    },
    RuleSpec {
        category: "arbitration_waiver",
        patterns: &[
            r"(?i)(?:binding|mandatory|required).*?arbitration.*?(?:waive|waiver|give up|forfeit).*?(?:right|rights).*?(?:jury|court|class action)",
            r"(?i)(?:agree|consent).*?(?:binding|mandatory).*?arbitration.*?(?:individual|one-on-one|private).*?basis",
            r"(?i)(?:class action|collective action).*?(?:waiver|waive|prohibited|forbidden|not permitted)",
            r"(?i)(?:disputes|claims|disagreements).*?(?:resolved|settled|decided).*?(?:exclusively|only).*?(?:through|via|by).*?arbitration",
        ],
        weight: 20,
        severity: Severity::Critical,
        confidence_base: 0.85,
        description: "Mandatory arbitration replaces court access",
    },
    RuleSpec {
        category: "unilateral_changes",
        patterns: &[
            r"(?i)(?:reserve|retain).*?(?:right|ability|option).*?(?:modify|change|update|alter).*?(?:terms|agreement|policy).*?(?:any time|anytime|without notice)",
            r"(?i)(?:terms|agreement|policy).*?(?:may be|can be|will be).*?(?:changed|modified|updated).*?(?:unilaterally|at will|sole discretion)",
            r"(?i)(?:continued|ongoing).*?(?:use|access).*?(?:constitutes|means|implies).*?(?:acceptance|agreement).*?(?:changes|modifications)",
            r"(?i)(?:posting|publication).*?(?:revised|updated|new).*?(?:terms|policy).*?(?:effective|binding).*?(?:immediately|upon posting)",
        ],
        weight: 15,
        severity: Severity::High,
        confidence_base: 0.8,
        description: "Terms can be modified unilaterally",
    },
    RuleSpec {
        category: "account_suspension",
        patterns: &[
            r"(?i)(?:terminate|suspend|close|disable).*?(?:account|access|service).*?(?:any time|anytime|immediately).*?(?:without|no).*?(?:notice|warning|cause|reason)",
            r"(?i)(?:sole|absolute|complete).*?(?:discretion|judgment).*?(?:terminate|suspend|ban).*?(?:user|account|access)",
            r"(?i)(?:reserves|retains).*?(?:right|ability).*?(?:refuse|deny|revoke).*?(?:service|access).*?(?:any reason|no reason)",
            r"(?i)(?:immediate|instant).*?(?:termination|suspension).*?(?:violation|breach).*?(?:suspected|alleged)",
        ],
        weight: 15,
        severity: Severity::High,
        confidence_base: 0.75,
        description: "Accounts can be terminated broadly",
    },
    RuleSpec {
        category: "broad_liability_waiver",
        patterns: &[
            r"(?i)(?:not liable|no liability|disclaim.*?liability).*?(?:any|all).*?(?:damages|losses|harm|injury).*?(?:direct|indirect|incidental|consequential)",
            r"(?i)(?:maximum|total).*?liability.*?(?:limited|capped|restricted).*?(?:amount paid|fees paid|\$\d+)",
            r"(?i)(?:use.*?at.*?own.*?risk|as-is|without.*?warranty).*?(?:disclaim|exclude).*?(?:warranties|guarantees)",
            r"(?i)(?:force majeure|act of god|circumstances beyond control).*?(?:not responsible|no liability)",
        ],
        weight: 12,
        severity: Severity::Medium,
        confidence_base: 0.7,
        description: "Liability broadly excluded",
    },
];

pub const ENHANCED_DARK_PATTERN_RULES: &[RuleSpec] = &[
    RuleSpec {
        category: "auto_renewal",
        patterns: &[
            r"(?i)(?:automatic|auto).*?(?:renewal|billing|charge|payment).*?(?:unless|until).*?(?:cancel|opt.*?out)",
            r"(?i)(?:subscription|service).*?(?:continues|renews).*?(?:automatically|auto).*?(?:same|current).*?(?:rate|price)",
            r"(?i)(?:cancel|stop).*?(?:before|prior to).*?(?:renewal|billing).*?(?:date|period).*?(?:avoid|prevent).*?(?:charge|fee)",
            r"(?i)(?:trial|promotional).*?(?:period|offer).*?(?:ends|expires).*?(?:automatic|auto).*?(?:billing|charge)",
        ],
        weight: 8,
        severity: Severity::Critical,
        confidence_base: 0.8,
        description: "Renewal happens automatically unless cancelled in time",
    },
    RuleSpec {
        category: "hidden_costs",
        patterns: &[
            r"(?i)(?:additional|extra|other).*?(?:fees|charges|costs).*?(?:may|might|could).*?(?:apply|occur|be charged)",
            r"(?i)(?:taxes|shipping|handling|processing).*?(?:fees|charges).*?(?:additional|extra|separate)",
            r"(?i)(?:subject to|plus).*?(?:applicable|current|prevailing).*?(?:taxes|fees|charges|surcharges)",
            r"(?i)(?:excluding|not including|separate).*?(?:delivery|shipping|processing|transaction).*?(?:fees|costs)",
        ],
        weight: 8,
        severity: Severity::Critical,
        confidence_base: 0.75,
        description: "Costs beyond the headline price",
    },
    RuleSpec {
        category: "opt_out_difficulty",
        patterns: &[
            r"(?i)(?:cancel|unsubscribe|opt.*?out).*?(?:must|required to|need to).*?(?:call|phone|contact|write|mail)",
            r"(?i)(?:cancellation|termination).*?(?:requires|needs).*?(?:\d+.*?days|weeks|months).*?(?:notice|advance notice)",
            r"(?i)(?:written|physical|postal).*?(?:notice|request|form).*?(?:required|necessary).*?(?:cancel|terminate)",
            r"(?i)(?:online|website).*?(?:cancellation|termination).*?(?:not available|not permitted|not allowed)",
        ],
        weight: 8,
        severity: Severity::Medium,
        confidence_base: 0.8,
        description: "Leaving requires extra effort",
    },
];

pub const ENHANCED_POSITIVE_RULES: &[RuleSpec] = &[
    RuleSpec {
        category: "user_rights",
        patterns: &[
            r"(?i)(?:you have|users have|user has).*?(?:right|rights).*?(?:access|obtain|request|delete|modify).*?(?:personal|your).*?(?:data|information)",
            r"(?i)(?:data|information).*?(?:portability|export|download).*?(?:available|provided|offered)",
            r"(?i)(?:opt.*?out|withdraw|revoke).*?(?:consent|permission).*?(?:any time|anytime|at will)",
            r"(?i)(?:gdpr|ccpa|privacy).*?(?:rights|protections).*?(?:respected|honored|maintained)",
        ],
        weight: 5,
        severity: Severity::Low,
        confidence_base: 0.8,
        description: "Explicit user data rights",
    },
    RuleSpec {
        category: "transparency",
        patterns: &[
            r"(?i)(?:clear|plain|simple|easy).*?(?:language|terms|explanation).*?(?:provided|used|written)",
            r"(?i)(?:advance|prior).*?(?:notice|notification|warning).*?(?:changes|modifications|updates)",
            r"(?i)(?:transparent|open|honest).*?(?:about|regarding).*?(?:data|information|practices)",
            r"(?i)(?:explain|describe|detail).*?(?:how|why|when).*?(?:data|information).*?(?:used|processed|shared)",
        ],
        weight: 5,
        severity: Severity::Low,
        confidence_base: 0.75,
        description: "Transparent practices",
    },
    RuleSpec {
        category: "data_protection",
        patterns: &[
            r"(?i)(?:encrypt|secure|protect).*?(?:your|user|personal).*?(?:data|information).*?(?:transmission|storage|processing)",
            r"(?i)(?:industry.*?standard|best.*?practices|state.*?of.*?art).*?(?:security|protection|encryption)",
            r"(?i)(?:privacy.*?by.*?design|data.*?minimization|purpose.*?limitation).*?(?:principles|practices)",
            r"(?i)(?:regular|periodic|ongoing).*?(?:security|privacy).*?(?:audits|assessments|reviews)",
        ],
        weight: 5,
        severity: Severity::Low,
        confidence_base: 0.8,
        description: "Strong data protection",
    },
];
