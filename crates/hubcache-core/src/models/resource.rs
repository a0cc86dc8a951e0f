use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

/// One entry from `data/resources.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub location: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Resource {
    /// Display name for the resource type, falling back to the raw key.
    pub fn type_display(&self) -> &str {
        match self.resource_type.as_str() {
            "hospital" => "Hospital",
            "health_center" => "Health Center",
            "cooperative" => "Cooperative",
            "government" => "Government Office",
            "library" => "Library",
            "training_center" => "Training Center",
            "veterinary" => "Veterinary Service",
            "education_office" => "Education Office",
            "administration" => "Administration",
            other => other,
        }
    }

    /// Free-text match over name, location, services, and type.
    pub fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
            || contains_ignore_case(&self.location, query)
            || self.services.iter().any(|s| contains_ignore_case(s, query))
            || contains_ignore_case(&self.resource_type, query)
    }
}

/// Display name for a resource category key, falling back to the raw key.
pub fn category_display(key: &str) -> &str {
    match key {
        "health_facilities" => "Health Facilities",
        "agricultural_services" => "Agricultural Services",
        "educational_resources" => "Educational Resources",
        "government_offices" => "Government Offices",
        other => other,
    }
}

/// Top-level shape of `data/resources.json`: a map from category key to
/// resource list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDirectory {
    pub categories: BTreeMap<String, Vec<Resource>>,
}

impl ResourceDirectory {
    /// All resources across every category, in category order.
    pub fn all(&self) -> Vec<&Resource> {
        self.categories.values().flatten().collect()
    }

    pub fn category(&self, key: &str) -> &[Resource] {
        self.categories.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn category_keys(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Which category a resource id belongs to.
    pub fn category_of(&self, id: i64) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, resources)| resources.iter().any(|r| r.id == id))
            .map(|(key, _)| key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResourceDirectory {
        let json = r#"{
            "health_facilities": [
                {
                    "id": 1,
                    "type": "hospital",
                    "name": "Tenwek Hospital",
                    "location": "Bomet East",
                    "services": ["Emergency Care", "Maternity", "Surgery"],
                    "hours": "24 hours",
                    "contact": "0712345678"
                },
                {
                    "id": 2,
                    "type": "health_center",
                    "name": "Longisa Health Centre",
                    "location": "Longisa",
                    "services": ["Outpatient", "Immunization"]
                }
            ],
            "agricultural_services": [
                {
                    "id": 3,
                    "type": "cooperative",
                    "name": "Tea Growers Cooperative",
                    "location": "Sotik",
                    "services": ["Tea Collection", "Farm Inputs"]
                }
            ]
        }"#;
        serde_json::from_str(json).expect("Failed to parse resources")
    }

    #[test]
    fn test_parse_resource_directory() {
        let directory = sample();
        assert_eq!(directory.len(), 3);
        assert_eq!(directory.category("health_facilities").len(), 2);
        assert_eq!(directory.category("missing").len(), 0);

        let hospital = &directory.category("health_facilities")[0];
        assert_eq!(hospital.type_display(), "Hospital");
        assert_eq!(hospital.hours.as_deref(), Some("24 hours"));
    }

    #[test]
    fn test_category_of() {
        let directory = sample();
        assert_eq!(directory.category_of(3), Some("agricultural_services"));
        assert_eq!(directory.category_of(99), None);
    }

    #[test]
    fn test_matches_searches_all_fields() {
        let directory = sample();
        let hospital = &directory.category("health_facilities")[0];

        assert!(hospital.matches("tenwek"));      // name
        assert!(hospital.matches("bomet"));       // location
        assert!(hospital.matches("maternity"));   // services
        assert!(hospital.matches("hospital"));    // type
        assert!(!hospital.matches("veterinary"));
    }

    #[test]
    fn test_category_display_names() {
        assert_eq!(category_display("health_facilities"), "Health Facilities");
        assert_eq!(category_display("markets"), "markets");
    }
}
