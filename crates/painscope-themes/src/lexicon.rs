//! Keyword lexicons for the heuristic summarizer.

use painscope_core::SolutionComplexity;

/// A pain-point category recognised by keyword hits.
pub(crate) struct Category {
    pub name: &'static str,
    /// Lowercase single words. A text's score for the category is the number
    /// of its tokens found here.
    pub keywords: &'static [&'static str],
    pub complexity: SolutionComplexity,
    pub personas: &'static str,
}

/// Category order is significant: it breaks ties between equal hit counts.
pub(crate) const CATEGORIES: &[Category] = &[
    Category {
        name: "Billing & Invoicing",
        keywords: &[
            "invoice", "invoices", "invoicing", "billing", "billed", "payment", "payments",
            "refund", "refunds", "chargeback", "subscription", "subscriptions", "quickbooks",
            "stripe", "overdue",
        ],
        complexity: SolutionComplexity::Moderate,
        personas: "Freelancers, agencies and small-business owners",
    },
    Category {
        name: "Customer Support",
        keywords: &[
            "support", "ticket", "tickets", "helpdesk", "complaint", "complaints", "inbox",
            "zendesk", "livechat", "chatbot", "response",
        ],
        complexity: SolutionComplexity::Moderate,
        personas: "Support leads and customer-success teams",
    },
    Category {
        name: "Onboarding & Adoption",
        keywords: &[
            "onboarding", "onboard", "setup", "adoption", "tutorial", "tutorials", "training",
            "confusing", "signup", "churn",
        ],
        complexity: SolutionComplexity::Simple,
        personas: "Founders and product managers at early-stage SaaS companies",
    },
    Category {
        name: "Integrations & Sync",
        keywords: &[
            "integration", "integrations", "integrate", "sync", "syncing", "api", "zapier",
            "webhook", "webhooks", "import", "export", "migrate", "migration",
        ],
        complexity: SolutionComplexity::Complex,
        personas: "Operations teams stitching tools together",
    },
    Category {
        name: "Reporting & Analytics",
        keywords: &[
            "report", "reports", "reporting", "dashboard", "dashboards", "analytics", "metrics",
            "kpi", "kpis", "insights", "tracking",
        ],
        complexity: SolutionComplexity::Moderate,
        personas: "Managers and analysts who report upward",
    },
    Category {
        name: "Scheduling & Booking",
        keywords: &[
            "schedule", "scheduling", "calendar", "booking", "bookings", "appointment",
            "appointments", "shift", "shifts", "rota", "availability", "reschedule",
        ],
        complexity: SolutionComplexity::Simple,
        personas: "Service businesses, clinics and shift-based teams",
    },
    Category {
        name: "Spreadsheets & Manual Data Entry",
        keywords: &[
            "spreadsheet", "spreadsheets", "excel", "manual", "manually", "copy", "paste",
            "csv", "retyping", "entry",
        ],
        complexity: SolutionComplexity::Simple,
        personas: "Back-office staff doing repetitive data work",
    },
    Category {
        name: "Marketing & Lead Generation",
        keywords: &[
            "marketing", "lead", "leads", "outreach", "seo", "ads", "newsletter", "funnel",
            "prospects", "prospecting", "cold", "campaign", "campaigns",
        ],
        complexity: SolutionComplexity::Moderate,
        personas: "Founders and marketers at small companies",
    },
    Category {
        name: "Hiring & HR",
        keywords: &[
            "hiring", "hire", "recruit", "recruiting", "recruiter", "candidates", "interview",
            "interviews", "payroll", "employees", "timesheet", "timesheets", "pto",
        ],
        complexity: SolutionComplexity::Complex,
        personas: "HR generalists and small-team managers",
    },
    Category {
        name: "Project & Task Management",
        keywords: &[
            "project", "projects", "task", "tasks", "deadline", "deadlines", "jira", "trello",
            "asana", "kanban", "workflow", "workflows",
        ],
        complexity: SolutionComplexity::Moderate,
        personas: "Team leads coordinating distributed work",
    },
];

/// Words that mark a complaint as pressing.
pub(crate) const URGENCY_WORDS: &[&str] = &[
    "urgent", "asap", "nightmare", "hate", "hates", "killing", "desperate", "frustrated",
    "frustrating", "broken", "losing", "lost", "painful", "struggling", "struggle", "wasting",
    "waste", "impossible", "awful", "terrible", "worst", "blocker", "deadline",
];

/// Persona words and the label they contribute, in display order.
pub(crate) const PERSONA_WORDS: &[(&str, &str)] = &[
    ("freelancer", "Freelancers"),
    ("freelancers", "Freelancers"),
    ("agency", "Agencies"),
    ("agencies", "Agencies"),
    ("founder", "Founders"),
    ("founders", "Founders"),
    ("startup", "Startups"),
    ("startups", "Startups"),
    ("smb", "Small businesses"),
    ("smbs", "Small businesses"),
    ("developer", "Developers"),
    ("developers", "Developers"),
    ("devs", "Developers"),
    ("clinic", "Clinics"),
    ("clinics", "Clinics"),
    ("restaurant", "Restaurants"),
    ("restaurants", "Restaurants"),
    ("contractor", "Contractors"),
    ("contractors", "Contractors"),
    ("teacher", "Teachers"),
    ("teachers", "Teachers"),
    ("recruiter", "Recruiters"),
    ("recruiters", "Recruiters"),
    ("accountant", "Accountants"),
    ("accountants", "Accountants"),
];

/// Words ignored when picking frequent terms.
pub(crate) const STOPWORDS: &[&str] = &[
    "about", "after", "again", "also", "anyone", "because", "been", "before", "being",
    "best", "better", "between", "both", "cant", "could", "does", "doing", "dont", "each",
    "even", "every", "from", "getting", "good", "have", "having", "help", "here", "into",
    "just", "know", "like", "looking", "make", "many", "more", "most", "much", "need",
    "needs", "only", "other", "over", "really", "same", "should", "some", "still", "such",
    "than", "that", "their", "them", "then", "there", "these", "they", "thing", "things",
    "this", "those", "through", "time", "tool", "tools", "very", "want", "well", "were",
    "what", "when", "where", "which", "while", "with", "without", "would", "your", "yours",
    "something", "anything", "someone", "using", "used", "around", "work", "works",
];

/// Lowercase alphanumeric tokens of `text`, apostrophes removed.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|word| word.replace('\'', "").to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Index of the best-matching category, or `None` when no keyword hits.
///
/// Ties go to the category listed first.
pub(crate) fn categorize(tokens: &[String]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, category) in CATEGORIES.iter().enumerate() {
        let hits = tokens
            .iter()
            .filter(|t| category.keywords.contains(&t.as_str()))
            .count();
        if hits > 0 && best.is_none_or(|(_, best_hits)| hits > best_hits) {
            best = Some((index, hits));
        }
    }
    best.map(|(index, _)| index)
}

pub(crate) fn is_urgent(tokens: &[String]) -> bool {
    tokens.iter().any(|t| URGENCY_WORDS.contains(&t.as_str()))
}

/// Whether `token` is worth counting as a frequent term.
pub(crate) fn is_salient(token: &str) -> bool {
    token.len() >= 4 && !STOPWORDS.contains(&token) && !token.chars().all(|c| c.is_ascii_digit())
}
