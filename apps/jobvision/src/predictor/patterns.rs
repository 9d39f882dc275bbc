// Phrase patterns for the rule-based predictor. Matched against lowercased
// text; the matched span becomes the indicator text.

/// Phrases common in scam postings.
pub const CONCERNING: &[&str] = &[
    r"\bno\s+experience\b",
    r"\bimmediate\s+(cash|payment|hire)",
    r"\bguaranteed\s+income",
    r"\bwork\s+from\s+home.*\b(no|without|any)\s+(experience|qualification)",
    r"\bno\s+interview",
    r"\beasy\s+money",
    r"\brisk\s+free",
    r"\bno\s+experience\s+required",
    r"\bhigh\s+pay.*\bno\s+skill",
    r"\bphone\s+interview\s+only",
    r"\bupfront\s+(payment|fee|deposit)",
    r"\breferral\s+bonus.*\$",
    r"\bget\s+paid\s+(today|immediately|now)",
    r"\bwork\s+from\s+anywhere",
    r"\bno\s+(qualification|requirement)",
];

/// Signals typical of legitimate listings.
pub const SUPPORTING: &[&str] = &[
    r"\bcompany\s+(website|address|phone)",
    r"\bdetailed\s+job\s+description",
    r"\bspecific\s+requirement",
    r"\byears?\s+of\s+experience",
    r"\bqualification",
    r"\bdegree\s+in",
    r"\bsalary\s+range",
    r"\bbenef(it)?s",
    r"\bapply\s+(now|at|via)",
    r"\bhiring\s+team",
];
