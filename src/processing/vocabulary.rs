//! Built-in skill vocabulary and stop-word sets
//!
//! Both sets can be replaced from files (see `VocabularyConfig`). Files hold
//! one entry per line; blank lines and lines starting with `#` are ignored.

use crate::error::{Result, ScreenerError};
use std::collections::HashSet;
use std::path::Path;

/// Canonical skill names, grouped by discipline.
pub const DEFAULT_SKILLS: &[&str] = &[
    // Product & project management
    "Product Strategy", "Roadmap Development", "Agile Methodologies", "Scrum", "Kanban",
    "Jira", "Trello", "Feature Prioritization", "OKRs", "KPIs", "Stakeholder Management",
    "A/B Testing", "User Stories", "Product Lifecycle", "Sprint Planning", "MVP",
    "Backlog Grooming", "Risk Management", "Change Management", "Program Management",
    "Portfolio Management", "PMP", "Scrum Master", "Product Owner", "Release Management",
    "Project Management", "Lean Six Sigma", "Six Sigma", "Kaizen", "Root Cause Analysis",
    // Software engineering
    "Python", "Java", "JavaScript", "TypeScript", "C++", "C#", "Golang", "Rust", "Ruby",
    "PHP", "Swift", "Kotlin", "Scala", "Haskell", "Elixir", "HTML5", "CSS3", "HTML", "CSS",
    "React", "Angular", "Vue.js", "Node.js", "Django", "Flask", "FastAPI", "Spring Boot",
    "Express.js", "Next.js", ".NET", "Git", "GitHub", "GitLab", "Bitbucket", "REST APIs",
    "GraphQL", "gRPC", "Microservices", "System Design", "Unit Testing", "Integration Testing",
    "End-to-End Testing", "Test Automation", "CI/CD", "Docker", "Kubernetes", "Helm",
    "Serverless", "AWS Lambda", "Azure Functions", "WebSockets", "Kafka", "RabbitMQ", "Redis",
    "SQL", "NoSQL", "PostgreSQL", "MySQL", "SQLite", "MongoDB", "Cassandra", "DynamoDB",
    "Elasticsearch", "Neo4j", "Data Structures", "Algorithms", "Object-Oriented Programming",
    "Functional Programming", "Bash Scripting", "Shell Scripting", "DevOps", "DevSecOps", "SRE",
    "CloudFormation", "Terraform", "Ansible", "Puppet", "Chef", "Jenkins", "CircleCI",
    "GitHub Actions", "Azure DevOps", "Confluence", "Swagger", "OpenAPI", "Linux", "Unix",
    "Distributed Systems", "Concurrency", "Performance Tuning", "Embedded Systems",
    // Data science & machine learning
    "Machine Learning", "Deep Learning", "Natural Language Processing", "NLP",
    "Computer Vision", "Reinforcement Learning", "Scikit-learn", "TensorFlow", "PyTorch",
    "Keras", "XGBoost", "LightGBM", "Pandas", "NumPy", "Data Cleaning", "Feature Engineering",
    "Model Evaluation", "Statistical Modeling", "Time Series Analysis", "Predictive Modeling",
    "Clustering", "Classification", "Regression", "Neural Networks", "Transformers", "LLMs",
    "Prompt Engineering", "Generative AI", "MLOps", "Experiment Design", "Hypothesis Testing",
    "Bayesian Statistics", "Causal Inference", "Data Science", "Data", "AI",
    // Data analytics & BI
    "Excel", "Tableau", "Power BI", "Looker", "Qlik Sense", "DAX", "ETL", "ELT",
    "Data Warehousing", "Data Lake", "Data Modeling", "Business Intelligence",
    "Data Visualization", "Dashboarding", "Google Analytics", "BigQuery", "Snowflake",
    "Redshift", "Databricks", "Spark", "Hadoop", "Airflow", "dbt", "Data Governance",
    "Data Quality", "Statistical Analysis", "Requirements Gathering", "Data Storytelling",
    "Data Analysis", "Data Engineering", "Data Migration", "Data Integration", "Big Data",
    // Cloud & infrastructure
    "AWS", "Azure", "Google Cloud Platform", "GCP", "Cloud Architecture", "Hybrid Cloud",
    "Multi-Cloud", "Cloud Computing", "Virtualization", "VMware", "Hyper-V",
    "Linux Administration", "Windows Server", "Networking", "TCP/IP", "DNS", "VPN",
    "Firewalls", "Load Balancing", "CDN", "Monitoring", "Logging", "Alerting", "Prometheus",
    "Grafana", "Splunk", "ELK Stack", "Datadog", "New Relic", "Cloud Security", "IAM", "VPC",
    "Container Orchestration", "Infrastructure as Code", "Nginx",
    // Security
    "Cybersecurity", "Information Security", "Risk Assessment", "Compliance", "GDPR", "HIPAA",
    "ISO 27001", "SOC 2", "PCI DSS", "Penetration Testing", "Vulnerability Management",
    "Incident Response", "Security Audits", "Forensics", "Threat Intelligence", "SIEM",
    "Endpoint Security", "Identity and Access Management", "Cryptography", "Network Security",
    "Application Security", "OWASP", "Wireshark", "Nmap", "Metasploit", "Burp Suite", "Okta",
    "Active Directory", "LDAP", "OAuth", "JWT", "OpenID Connect", "SAML", "MFA", "SSO", "PKI",
    "TLS/SSL", "CISSP", "CISM", "CEH", "OSCP", "CompTIA Security+",
    // UI/UX & design
    "Figma", "Adobe XD", "Sketch", "Photoshop", "Illustrator", "InDesign", "User Research",
    "Usability Testing", "Wireframing", "Prototyping", "UI Design", "UX Design",
    "Interaction Design", "Information Architecture", "Design Systems", "Accessibility",
    "Responsive Design", "User Flows", "Journey Mapping", "Design Thinking", "Visual Design",
    // Marketing & sales
    "Digital Marketing", "SEO", "SEM", "Content Marketing", "Email Marketing",
    "Social Media Marketing", "Google Ads", "Marketing Automation", "HubSpot", "Salesforce",
    "CRM", "Lead Generation", "Sales Strategy", "Negotiation", "Account Management",
    "Market Research", "Campaign Management", "Conversion Rate Optimization",
    "Brand Management", "Public Relations", "Copywriting", "Content Creation",
    // Finance & accounting
    "Financial Modeling", "Valuation", "Financial Reporting", "GAAP", "IFRS", "Budgeting",
    "Forecasting", "Variance Analysis", "Auditing", "Taxation", "Accounts Payable",
    "Accounts Receivable", "Payroll", "QuickBooks", "SAP", "Oracle", "NetSuite",
    "Cost Accounting", "Treasury Management", "Investment Analysis", "CFA", "CPA",
    // Human resources
    "Talent Acquisition", "Recruitment", "Onboarding", "Employee Relations", "Workday",
    "Compensation and Benefits", "Performance Management", "Workforce Planning",
    "Labor Law", "Training and Development", "Diversity and Inclusion", "Conflict Resolution",
    "Employee Engagement", "SHRM-CP", "PHR",
    // Customer service & support
    "Customer Relationship Management", "Zendesk", "ServiceNow", "Intercom",
    "Ticketing Systems", "Issue Resolution", "Technical Support", "Customer Success",
    "Client Retention", "ITIL",
    // General business & soft skills
    "Strategic Planning", "Business Development", "Vendor Management", "Process Improvement",
    "Operations Management", "Public Speaking", "Presentation Skills",
    "Cross-functional Collaboration", "Problem Solving", "Critical Thinking",
    "Analytical Skills", "Adaptability", "Time Management", "Attention to Detail",
    "Leadership", "Mentorship", "Team Leadership", "Decision Making", "Client Management",
    "Stakeholder Communication", "Communication Skills", "Active Listening", "Creativity",
    "Research", "Report Writing", "Documentation", "Microsoft Office", "Google Workspace",
    "SharePoint", "Visio", "MS Project", "AutoCAD", "SolidWorks", "MATLAB", "ArcGIS",
    "OpenCV", "spaCy", "Hugging Face",
];

/// General English stop words.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Resume and job-posting boilerplate that carries no matching signal.
pub const DOMAIN_STOP_WORDS: &[&str] = &[
    "work", "worked", "working", "experience", "experienced", "years", "year", "months",
    "month", "day", "days", "project", "projects", "team", "teams", "developed", "managed",
    "led", "created", "implemented", "designed", "responsible", "responsibilities",
    "proficient", "knowledge", "ability", "strong", "proven", "demonstrated", "solution",
    "solutions", "role", "position", "candidate", "candidates", "company", "join", "looking",
    "seeking", "required", "requirements", "preferred", "plus", "including", "etc", "using",
    "use", "used", "skills", "skill", "excellent", "good", "great", "ideal", "must", "across",
    "within", "new", "various", "multiple", "well", "related", "relevant", "environment",
    "opportunity", "opportunities", "degree", "bachelor", "bachelors", "master", "masters",
    "university", "college", "present", "current", "currently", "inc", "llc", "ltd",
    "resume", "curriculum", "vitae", "summary", "objective", "profile", "references",
    "available", "upon", "request", "email", "phone", "address", "location", "remote",
    "hybrid", "onsite", "full", "time", "part", "contract", "salary", "benefits",
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "sept", "oct", "nov",
    "dec", "january", "february", "march", "april", "june", "july", "august", "september",
    "october", "november", "december",
];

pub fn default_skills() -> Vec<String> {
    DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
}

pub fn default_stop_words() -> HashSet<String> {
    ENGLISH_STOP_WORDS
        .iter()
        .chain(DOMAIN_STOP_WORDS.iter())
        .map(|s| s.to_string())
        .collect()
}

/// Read a one-entry-per-line list file.
pub fn load_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ScreenerError::Configuration(format!(
            "Failed to read list file '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(parse_list(&content))
}

pub fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
