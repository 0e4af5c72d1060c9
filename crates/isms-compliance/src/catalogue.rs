//! ISO 27001 Checklist Catalogue
//!
//! Static reference data for the Annex A checklist families assessed by the
//! analysis service. Read-only; used for display and as a fallback title.

use crate::record::ChecklistId;
use serde::Serialize;

/// Checklist definition
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Checklist {
    /// Checklist id, matches `AnalysisResult::checklist_id`
    pub id: ChecklistId,
    /// Display title, e.g. "A.9 Access Control"
    pub title: &'static str,
    /// One-line scope description
    pub description: &'static str,
    /// Annex A controls covered by the checklist
    pub controls: &'static [&'static str],
    /// Topics the keyword analyzer looks for
    pub keywords: &'static [&'static str],
}

/// Checklist catalogue
#[derive(Debug, Clone, Copy)]
pub struct ChecklistCatalogue {
    checklists: &'static [Checklist],
}

impl ChecklistCatalogue {
    /// Built-in ISO 27001 Annex A catalogue
    pub fn iso27001() -> Self {
        Self { checklists: ISO27001_CHECKLISTS }
    }

    /// Catalogue over caller-provided entries
    pub fn from_static(checklists: &'static [Checklist]) -> Self {
        Self { checklists }
    }

    /// Checklist by id
    pub fn get(&self, id: ChecklistId) -> Option<&'static Checklist> {
        self.checklists.iter().find(|c| c.id == id)
    }

    /// Title by id
    pub fn title(&self, id: ChecklistId) -> Option<&'static str> {
        self.get(id).map(|c| c.title)
    }

    /// Checklist ids in catalogue order
    pub fn ids(&self) -> impl Iterator<Item = ChecklistId> {
        let checklists = self.checklists;
        checklists.iter().map(|c| c.id)
    }

    /// Every checklist, in catalogue order
    pub fn all(&self) -> &'static [Checklist] {
        self.checklists
    }

    /// Number of checklists
    pub fn len(&self) -> usize {
        self.checklists.len()
    }

    /// Whether the catalogue has no checklists
    pub fn is_empty(&self) -> bool {
        self.checklists.is_empty()
    }
}

impl Default for ChecklistCatalogue {
    fn default() -> Self {
        Self::iso27001()
    }
}

static ISO27001_CHECKLISTS: &[Checklist] = &[
    // A.5 - Policies
    Checklist {
        id: 1,
        title: "A.5 Information Security Policies",
        description: "Management direction and support for information security",
        controls: &[
            "A.5.1 Management direction for information security",
            "A.5.1.1 Policies for information security",
            "A.5.1.2 Review of the policies for information security",
        ],
        keywords: &[
            "information security policy",
            "security policy",
            "policy review",
            "management commitment",
            "policy approval",
            "policy communication",
        ],
    },
    // A.6 - Organization
    Checklist {
        id: 2,
        title: "A.6 Organization of Information Security",
        description: "Internal organization, mobile devices and teleworking",
        controls: &[
            "A.6.1 Internal organization",
            "A.6.1.1 Information security roles and responsibilities",
            "A.6.1.2 Segregation of duties",
            "A.6.1.3 Contact with authorities",
            "A.6.1.4 Contact with special interest groups",
            "A.6.1.5 Information security in project management",
            "A.6.2 Mobile devices and teleworking",
            "A.6.2.1 Mobile device policy",
            "A.6.2.2 Teleworking",
        ],
        keywords: &[
            "roles",
            "responsibilities",
            "segregation",
            "duties",
            "mobile device",
            "teleworking",
            "remote work",
            "project management",
        ],
    },
    // A.7 - People
    Checklist {
        id: 3,
        title: "A.7 Human Resource Security",
        description: "Security before, during and after employment",
        controls: &[
            "A.7.1 Prior to employment",
            "A.7.1.1 Screening",
            "A.7.1.2 Terms and conditions of employment",
            "A.7.2 During employment",
            "A.7.2.1 Management responsibilities",
            "A.7.2.2 Information security awareness, education and training",
            "A.7.2.3 Disciplinary process",
            "A.7.3 Termination and change of employment",
            "A.7.3.1 Termination or change of employment responsibilities",
        ],
        keywords: &[
            "screening",
            "background check",
            "employment",
            "training",
            "awareness",
            "disciplinary",
            "termination",
            "onboarding",
            "offboarding",
        ],
    },
    // A.8 - Assets
    Checklist {
        id: 4,
        title: "A.8 Asset Management",
        description: "Asset responsibility, information classification and media handling",
        controls: &[
            "A.8.1 Responsibility for assets",
            "A.8.1.1 Inventory of assets",
            "A.8.1.2 Ownership of assets",
            "A.8.1.3 Acceptable use of assets",
            "A.8.1.4 Return of assets",
            "A.8.2 Information classification",
            "A.8.2.1 Classification of information",
            "A.8.2.2 Labelling of information",
            "A.8.2.3 Handling of assets",
            "A.8.3 Media handling",
            "A.8.3.1 Management of removable media",
            "A.8.3.2 Disposal of media",
            "A.8.3.3 Physical media transfer",
        ],
        keywords: &[
            "asset inventory",
            "asset management",
            "classification",
            "labelling",
            "media handling",
            "removable media",
            "disposal",
            "asset ownership",
        ],
    },
    // A.9 - Access
    Checklist {
        id: 5,
        title: "A.9 Access Control",
        description: "Business requirements, user access management and system access control",
        controls: &[
            "A.9.1 Business requirements of access control",
            "A.9.1.1 Access control policy",
            "A.9.1.2 Access to networks and network services",
            "A.9.2 User access management",
            "A.9.2.1 User registration and de-registration",
            "A.9.2.2 User access provisioning",
            "A.9.2.3 Management of privileged access rights",
            "A.9.2.4 Management of secret authentication information of users",
            "A.9.2.5 Review of user access rights",
            "A.9.2.6 Removal or adjustment of access rights",
            "A.9.3 User responsibilities",
            "A.9.3.1 Use of secret authentication information",
            "A.9.4 System and application access control",
            "A.9.4.1 Information access restriction",
            "A.9.4.2 Secure log-on procedures",
            "A.9.4.3 Password management system",
            "A.9.4.4 Use of privileged utility programs",
            "A.9.4.5 Access control to program source code",
        ],
        keywords: &[
            "access control",
            "authentication",
            "authorization",
            "password",
            "user management",
            "privileged access",
            "access rights",
            "login",
            "user registration",
        ],
    },
    // A.10 - Cryptography
    Checklist {
        id: 6,
        title: "A.10 Cryptography",
        description: "Proper and effective use of cryptography",
        controls: &[
            "A.10.1 Cryptographic controls",
            "A.10.1.1 Policy on the use of cryptographic controls",
            "A.10.1.2 Key management",
        ],
        keywords: &[
            "encryption",
            "cryptographic",
            "key management",
            "certificate",
            "tls",
        ],
    },
    // A.11 - Physical
    Checklist {
        id: 7,
        title: "A.11 Physical and Environmental Security",
        description: "Secure areas and equipment protection",
        controls: &[
            "A.11.1 Secure areas",
            "A.11.1.1 Physical security perimeter",
            "A.11.1.2 Physical entry controls",
            "A.11.1.4 Protecting against external and environmental threats",
            "A.11.2 Equipment",
            "A.11.2.1 Equipment siting and protection",
            "A.11.2.8 Unattended user equipment",
            "A.11.2.9 Clear desk and clear screen policy",
        ],
        keywords: &[
            "physical security",
            "perimeter",
            "entry control",
            "visitor",
            "clear desk",
            "equipment",
        ],
    },
    // A.12 - Operations
    Checklist {
        id: 8,
        title: "A.12 Operations Security",
        description: "Operational procedures, malware protection, backup, logging and vulnerability management",
        controls: &[
            "A.12.1 Operational procedures and responsibilities",
            "A.12.1.2 Change management",
            "A.12.2.1 Controls against malware",
            "A.12.3.1 Information backup",
            "A.12.4.1 Event logging",
            "A.12.4.3 Administrator and operator logs",
            "A.12.6.1 Management of technical vulnerabilities",
        ],
        keywords: &[
            "change management",
            "malware",
            "antivirus",
            "backup",
            "logging",
            "monitoring",
            "vulnerability",
            "patch",
        ],
    },
    // A.13 - Communications
    Checklist {
        id: 9,
        title: "A.13 Communications Security",
        description: "Network security management and information transfer",
        controls: &[
            "A.13.1 Network security management",
            "A.13.1.1 Network controls",
            "A.13.1.3 Segregation in networks",
            "A.13.2 Information transfer",
            "A.13.2.1 Information transfer policies and procedures",
            "A.13.2.4 Confidentiality or non-disclosure agreements",
        ],
        keywords: &[
            "network security",
            "firewall",
            "segregation",
            "information transfer",
            "non-disclosure",
            "email security",
        ],
    },
    // A.14 - Development
    Checklist {
        id: 10,
        title: "A.14 System Acquisition, Development and Maintenance",
        description: "Security requirements and security in development and support processes",
        controls: &[
            "A.14.1 Security requirements of information systems",
            "A.14.1.1 Information security requirements analysis and specification",
            "A.14.2 Security in development and support processes",
            "A.14.2.1 Secure development policy",
            "A.14.2.8 System security testing",
            "A.14.3.1 Protection of test data",
        ],
        keywords: &[
            "secure development",
            "security requirements",
            "code review",
            "security testing",
            "test data",
            "sdlc",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_ids() {
        let catalogue = ChecklistCatalogue::iso27001();
        let ids: Vec<_> = catalogue.ids().collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_title_lookup() {
        let catalogue = ChecklistCatalogue::default();
        assert_eq!(catalogue.title(5), Some("A.9 Access Control"));
        assert_eq!(catalogue.title(42), None);
        assert!(catalogue.get(1).unwrap().controls.len() >= 3);
    }
}
