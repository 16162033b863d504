//! Controlled vocabulary for domain and technology labels.

use std::collections::HashSet;

/// Industry domains an issue can be tagged with.
pub const DOMAINS: &[&str] = &[
    "agriculture-and-agritech",
    "ai-and-machine-learning",
    "architecture-and-construction",
    "automotive",
    "aviation-marine-and-railroad",
    "biotechnology",
    "business-intelligence-and-analytics",
    "chemical-and-materials-science",
    "consumer-goods-and-retail",
    "cryptocurrencies-and-blockchain",
    "customer-relationship-management",
    "cybersecurity",
    "defense-and-aerospace",
    "document-and-content-management",
    "education-and-edtech",
    "electronics-and-hardware",
    "energy-environment-and-sustainability",
    "entertainment-and-media",
    "financial-services-and-banking",
    "food-and-beverage",
    "gaming-and-gambling",
    "government-and-public-services",
    "healthcare-and-pharmaceutical",
    "hospitality-and-travel",
    "human-resources-and-recruitment",
    "insurance",
    "iot-and-smart-devices",
    "legal-and-compliance",
    "logistics-and-supply-chain",
    "manufacturing-and-industrial-automation",
    "marketing-and-communications",
    "mining-and-natural-resources",
    "mobile-applications",
    "nonprofits-and-charities",
    "petcare-and-veterinary",
    "publishing-and-content",
    "real-estate-and-property",
    "religious-organizations",
    "science-and-research",
    "security-and-investigations",
    "social-networks-and-communications",
    "sports-and-fitness",
    "telecom-and-networking",
    "transport-and-logistics",
    "wellness-and-health",
];

/// Technology families an issue can be tagged with.
pub const TECHNOLOGIES: &[&str] = &[
    "aws",
    "azure",
    "gcp",
    "salesforce",
    "sap",
    "dynamics-365",
    "native-mobile-apps",
    "flutter",
    "react-native",
    "unity-unreal-engine",
    // TensorFlow, PyTorch, scikit-learn
    "machine-learning-frameworks",
    "docker-kubernetes",
    // Ansible, Terraform
    "infrastructure-as-code",
    // Jenkins, CircleCI, GitHub Actions
    "ci-cd-tools",
    // Spark, Hadoop
    "big-data-frameworks",
    // MongoDB, PostgreSQL, MySQL, Oracle, SQL Server, Redis
    "databases",
    // Elasticsearch, RabbitMQ, Kafka
    "search-and-streaming",
    "web-servers",
    // REST, GraphQL, gRPC
    "api-architecture",
    "blockchain-solutions",
    // Power BI, Tableau, Qlik
    "bi-tools",
    "serverless-computing",
    "edge-computing",
    "iot",
    "vr-ar",
    "cybersecurity",
    "compliance-tools",
    "event-driven-architecture",
    "microservices",
    "headless-cms",
    "auth-tools",
    "collaboration-tools",
    "integration-platforms",
    "data-pipelines",
];

/// Tags written by earlier taxonomies that are no longer produced.
///
/// Only removed from issues when legacy purging is enabled.
pub const LEGACY_LABELS: &[&str] = &[
    "artificial-intelligence-and-machine-learning",
    "internet-and-software",
];

/// Two ordered lists of permitted labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    domains: Vec<String>,
    technologies: Vec<String>,
}

impl Vocabulary {
    /// Create a vocabulary from caller-supplied lists.
    pub fn new<D, T>(domains: D, technologies: T) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            domains: domains.into_iter().map(Into::into).collect(),
            technologies: technologies.into_iter().map(Into::into).collect(),
        }
    }

    /// The full compiled-in vocabulary.
    pub fn standard() -> Self {
        Self::new(DOMAINS.iter().copied(), TECHNOLOGIES.iter().copied())
    }

    /// Restrict the standard vocabulary to the given subsets.
    ///
    /// `None` keeps the full list for that category. Unknown entries are
    /// ignored and reported back.
    pub fn subset(domains: Option<&[String]>, technologies: Option<&[String]>) -> (Self, Vec<String>) {
        let mut unknown = Vec::new();
        let mut pick = |wanted: Option<&[String]>, all: &[&str]| -> Vec<String> {
            match wanted {
                None => all.iter().map(|s| (*s).to_string()).collect(),
                Some(wanted) => wanted
                    .iter()
                    .filter(|w| {
                        let known = all.contains(&w.as_str());
                        if !known {
                            unknown.push((*w).clone());
                        }
                        known
                    })
                    .cloned()
                    .collect(),
            }
        };
        let domains = pick(domains, DOMAINS);
        let technologies = pick(technologies, TECHNOLOGIES);
        (Self::new(domains, technologies), unknown)
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn technologies(&self) -> &[String] {
        &self.technologies
    }

    pub fn is_domain(&self, label: &str) -> bool {
        self.domains.iter().any(|d| d == label)
    }

    pub fn is_technology(&self, label: &str) -> bool {
        self.technologies.iter().any(|t| t == label)
    }

    /// Labels this tool owns and may remove from an issue.
    ///
    /// Always the full standard vocabulary, even when prompting with a
    /// subset, so classifications from earlier runs are cleared.
    pub fn controlled_labels(purge_legacy: bool) -> HashSet<String> {
        let mut labels: HashSet<String> = DOMAINS
            .iter()
            .chain(TECHNOLOGIES)
            .map(|s| (*s).to_string())
            .collect();
        if purge_legacy {
            labels.extend(LEGACY_LABELS.iter().map(|s| (*s).to_string()));
        }
        labels
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::standard()
    }
}
