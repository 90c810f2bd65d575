// playbook-core/src/domain/session/defaults.rs
//
// Built-in content of a fresh session. Loaded snapshots fall back to these
// tables when their stored counterpart is unusable.

use indexmap::IndexMap;
use serde_json::{Value, json};

use crate::domain::dataset::{Cell, Table};

pub const SECTORS: [&str; 7] = [
    "Mobility",
    "Resilience",
    "Utilities",
    "Healthcare",
    "Finance",
    "Retail",
    "Technology",
];

pub const COMPLIANCE_STANDARDS: [&str; 6] = [
    "GDPR",
    "CCPA",
    "HIPAA",
    "SOX",
    "ISO 27001",
    "Internal Policy v2.0",
];

pub const MATURITY_DIMENSIONS: [&str; 7] = [
    "Strategy & Vision",
    "Data Governance",
    "Data Quality",
    "Technology & Architecture",
    "People & Skills",
    "Data Usage & Analytics",
    "Innovation & Value",
];

pub const MATURITY_LEVELS: [&str; 5] = [
    "1 - Initial",
    "2 - Managed",
    "3 - Defined",
    "4 - Quantitatively Managed",
    "5 - Optimizing",
];

pub const ROADMAP_CATEGORIES: [&str; 3] = [
    "Quick Wins (0-3 Months)",
    "Mid-Term (3-12 Months)",
    "Long-Term (12+ Months)",
];

pub const REPORT_SECTIONS: [&str; 8] = [
    "Landing Page",
    "Executive Summary",
    "Stakeholder Interviews",
    "Data Upload & Analysis",
    "Data Governance",
    "Maturity Assessment",
    "Roadmap Builder",
    "Export",
];

/// Identifier column of the role-assignment table.
pub const RACI_ID_COLUMN: &str = "Activity";
pub const RACI_LEGEND: &str = "R: Responsible, A: Accountable, C: Consulted, I: Informed, S: Support";

pub const DEFAULT_MATURITY_LEVEL: u8 = 2;

const RACI_ROLES: [&str; 7] = [
    "CDO",
    "Head of Operations",
    "Lead Data Architect",
    "Data Steward (Sales)",
    "IT Security",
    "Compliance Officer",
    "Data Scientist",
];

// One row per activity, one letter per role (same order as RACI_ROLES).
const RACI_ROWS: [(&str, [&str; 7]); 7] = [
    ("Define Data Quality Rules", ["A", "C", "S", "R", "I", "C", "I"]),
    ("Approve Master Data Changes", ["A", "R", "I", "C", "I", "I", "I"]),
    ("Monitor Data Pipeline Health", ["R", "A", "R", "I", "C", "I", "C"]),
    ("Ensure GDPR Compliance", ["A", "C", "I", "R", "R", "A", "I"]),
    ("Develop Analytics Models", ["S", "I", "R", "C", "I", "C", "A"]),
    ("Manage Data Dictionary", ["A", "C", "R", "R", "I", "C", "C"]),
    ("Set Data Access Policy", ["A", "C", "S", "I", "R", "A", "I"]),
];

/// Default role-assignment table, indexed by `Activity`.
pub fn raci_table() -> Table {
    let mut names = vec![RACI_ID_COLUMN.to_string()];
    names.extend(RACI_ROLES.iter().map(|r| r.to_string()));

    let rows = RACI_ROWS
        .iter()
        .map(|(activity, letters)| {
            std::iter::once(Cell::from(*activity))
                .chain(letters.iter().map(|l| Cell::from(*l)))
                .collect()
        })
        .collect();

    // Static content: shape and uniqueness hold by construction.
    let mut table = Table::from_rows(names, rows).unwrap_or_default();
    let _ = table.set_index(RACI_ID_COLUMN);
    table
}

struct RoadmapItem {
    id: &'static str,
    task: &'static str,
    owner: &'static str,
    effort: &'static str,
    cost: &'static str,
    dependencies: &'static str,
}

const fn item(
    id: &'static str,
    task: &'static str,
    owner: &'static str,
    effort: &'static str,
    cost: &'static str,
    dependencies: &'static str,
) -> RoadmapItem {
    RoadmapItem {
        id,
        task,
        owner,
        effort,
        cost,
        dependencies,
    }
}

const ROADMAP_ITEMS: [[RoadmapItem; 3]; 3] = [
    [
        item("QW1", "Implement Basic Data Quality Dashboard", "Data Steward (Sales)", "Medium", "$", ""),
        item("QW2", "Document Top 5 Critical Data Elements", "Lead Data Architect", "Low", "$", ""),
        item("QW3", "Conduct Data Literacy Survey", "CDO", "Low", "$", ""),
    ],
    [
        item("MT1", "Establish Data Governance Council", "CDO", "High", "$$", "QW3"),
        item(
            "MT2",
            "Implement Master Data Management (MDM) for Customer Domain",
            "Lead Data Architect",
            "High",
            "$$$",
            "QW2,MT1",
        ),
        item("MT3", "Roll out Self-Service BI Tool Training", "Head of Operations", "Medium", "$$", "MT1"),
    ],
    [
        item("LT1", "Migrate to Cloud Data Warehouse", "Lead Data Architect", "Very High", "$$$$$", "MT2"),
        item("LT2", "Develop Predictive Maintenance Model", "Data Scientist", "High", "$$$", "LT1"),
        item("LT3", "Integrate AI for Customer Personalization", "Marketing Manager", "High", "$$$$", "MT2,LT1"),
    ],
];

/// Default roadmap: one table per category.
pub fn roadmap_tables() -> IndexMap<String, Table> {
    ROADMAP_CATEGORIES
        .iter()
        .zip(ROADMAP_ITEMS.iter())
        .map(|(category, items)| {
            let records: Vec<Value> = items
                .iter()
                .map(|i| {
                    json!({
                        "ID": i.id,
                        "Task": i.task,
                        "Owner": i.owner,
                        "Effort": i.effort,
                        "Cost": i.cost,
                        "Status": "Not Started",
                        "Progress (%)": 0,
                        "Dependencies (IDs)": i.dependencies,
                    })
                })
                .collect();
            let table = Table::from_records(&records).unwrap_or_default();
            (category.to_string(), table)
        })
        .collect()
}

const INTERVIEW_QUESTIONS: [(&str, [&str; 10]); 6] = [
    (
        "Chief Data Officer (CDO)",
        [
            "What are the top 3 strategic goals data should support?",
            "How is data literacy perceived?",
            "Biggest roadblocks to being data-driven?",
            "How is data value measured?",
            "Current state of data governance maturity?",
            "Using data for competitive advantage?",
            "Needed investments in platforms/tools?",
            "Impact of privacy/security concerns?",
            "Role of AI/ML in future strategy?",
            "Satisfaction with reporting capabilities?",
        ],
    ),
    (
        "Head of Operations",
        [
            "Reliability of operational reporting data?",
            "Biggest data quality issues impacting ops?",
            "Are dashboards timely and actionable?",
            "Manual effort in data collection/prep?",
            "Do front-line staff have needed data?",
            "Impact of data inconsistencies?",
            "Processes most improved with better data?",
            "Sufficient training on data tools?",
            "How is data used for operational KPIs?",
            "Challenges accessing cross-departmental data?",
        ],
    ),
    (
        "Lead Data Architect",
        [
            "Current state of data architecture (scalability, flexibility)?",
            "Main data integration challenges?",
            "Documentation state of sources/pipelines?",
            "Is data storage optimized (cost/performance)?",
            "Process for introducing new data tech?",
            "Robustness of data security framework?",
            "Effectiveness of MDM/reference data management?",
            "Technical limitations hindering advanced analytics?",
            "How is data lineage tracked?",
            "Improvements needed in data modeling?",
        ],
    ),
    (
        "Marketing Manager",
        [
            "Effectiveness of customer segmentation?",
            "Accuracy/timeliness of campaign tracking?",
            "Challenges accessing customer journey data?",
            "Confidence in personalization data?",
            "Ability to calculate marketing ROI accurately?",
            "Missing data sources for complete customer view?",
            "Ease of A/B testing and analysis?",
            "Right tools for marketing analytics?",
            "How does data inform content strategy?",
            "Data privacy constraints limiting activities?",
        ],
    ),
    (
        "Data Scientist",
        [
            "Accessibility of data for model building?",
            "Quality of data available for analysis?",
            "Availability of tools/platforms for ML?",
            "Collaboration process with domain experts?",
            "Process for deploying models into production?",
            "Monitoring model performance and drift?",
            "Challenges in feature engineering?",
            "Ethical considerations in model development?",
            "Availability of compute resources?",
            "Integration of external datasets?",
        ],
    ),
    (
        "Compliance Officer",
        [
            "Effectiveness of current data privacy controls?",
            "Process for handling data subject requests (DSRs)?",
            "Data retention policy adherence?",
            "Audit trails for sensitive data access?",
            "Training level on data compliance requirements?",
            "Challenges in monitoring regulatory changes?",
            "Data classification accuracy?",
            "Incident response plan for data breaches?",
            "Third-party data sharing risk management?",
            "Alignment with specific regulations (GDPR, CCPA etc.)?",
        ],
    ),
];

pub fn interview_questions() -> IndexMap<String, Vec<String>> {
    INTERVIEW_QUESTIONS
        .iter()
        .map(|(persona, questions)| {
            (
                persona.to_string(),
                questions.iter().map(|q| q.to_string()).collect(),
            )
        })
        .collect()
}

pub fn governance_scores() -> IndexMap<String, f64> {
    [
        ("Policy & Standards", 50.0),
        ("Data Stewardship", 40.0),
        ("Data Quality Framework", 60.0),
        ("Metadata Management", 30.0),
        ("Security & Privacy", 70.0),
        ("Compliance Adherence", 65.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

pub fn business_glossary() -> IndexMap<String, String> {
    [
        (
            "Data Maturity",
            "The extent to which an organization utilizes its data resources...",
        ),
        (
            "Data Governance",
            "The exercise of authority and control over data assets...",
        ),
        ("MDM", "Master Data Management disciplines..."),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn maturity_scores() -> IndexMap<String, u8> {
    MATURITY_DIMENSIONS
        .iter()
        .map(|d| (d.to_string(), DEFAULT_MATURITY_LEVEL))
        .collect()
}

pub fn maturity_evidence() -> IndexMap<String, String> {
    MATURITY_DIMENSIONS
        .iter()
        .map(|d| (d.to_string(), String::new()))
        .collect()
}

pub fn selected_compliance() -> Vec<String> {
    COMPLIANCE_STANDARDS[..2].iter().map(|s| s.to_string()).collect()
}
