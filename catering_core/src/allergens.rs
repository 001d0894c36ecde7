//! Allergen information for menu items, grouped by service.

use crate::booking::Service;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allergen {
    Gluten,
    Dairy,
    Eggs,
    Nuts,
    Peanuts,
    Soy,
    Fish,
    Shellfish,
    Sesame,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergenEntry {
    pub service: Service,
    pub item_name: String,
    pub contains: Vec<Allergen>,
    pub vegetarian: bool,
    pub vegan: bool,
}

impl AllergenEntry {
    fn new(service: Service, item_name: &str, contains: &[Allergen], vegetarian: bool, vegan: bool) -> Self {
        Self {
            service,
            item_name: item_name.to_string(),
            contains: contains.to_vec(),
            vegetarian,
            vegan,
        }
    }

    pub fn contains(&self, allergen: Allergen) -> bool {
        self.contains.contains(&allergen)
    }
}

#[derive(Debug, Clone)]
pub struct AllergenCatalog {
    entries: Vec<AllergenEntry>,
}

impl Default for AllergenCatalog {
    fn default() -> Self {
        use Allergen::*;

        Self::new(vec![
            AllergenEntry::new(Service::HogRoast, "Roasted Pork", &[], false, false),
            AllergenEntry::new(Service::HogRoast, "Bread Rolls", &[Gluten], true, false),
            AllergenEntry::new(Service::HogRoast, "Apple Sauce", &[], true, true),
            AllergenEntry::new(Service::Pizza, "Pizza Base", &[Gluten], true, false),
            AllergenEntry::new(Service::Pizza, "Mozzarella Cheese", &[Dairy], true, false),
            AllergenEntry::new(Service::Buffet, "Mixed Sandwiches", &[Gluten, Dairy], true, false),
        ])
    }
}

impl AllergenCatalog {
    pub fn new(entries: Vec<AllergenEntry>) -> Self {
        Self { entries }
    }

    /// Ordered by service.
    pub fn all(&self) -> Vec<AllergenEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|entry| entry.service);
        entries
    }

    pub fn for_service(&self, service: Service) -> Vec<AllergenEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.service == service)
            .cloned()
            .collect()
    }

    /// Services without any listed items are left out.
    pub fn matrix(&self) -> BTreeMap<Service, Vec<AllergenEntry>> {
        let mut matrix: BTreeMap<Service, Vec<AllergenEntry>> = BTreeMap::new();
        for entry in &self.entries {
            matrix.entry(entry.service).or_default().push(entry.clone());
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = AllergenCatalog::default();
        assert_eq!(catalog.all().len(), 6);

        let pizza = catalog.for_service(Service::Pizza);
        assert_eq!(pizza.len(), 2);
        assert!(pizza[1].contains(Allergen::Dairy));
        assert!(catalog.for_service(Service::Bar).is_empty());
    }

    #[test]
    fn test_matrix_groups_by_service() {
        let catalog = AllergenCatalog::default();
        let matrix = catalog.matrix();

        assert_eq!(
            matrix.keys().copied().collect::<Vec<_>>(),
            vec![Service::HogRoast, Service::Pizza, Service::Buffet]
        );
        assert_eq!(matrix[&Service::HogRoast].len(), 3);

        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(json["buffet"][0]["itemName"], "Mixed Sandwiches");
        assert_eq!(json["buffet"][0]["contains"], serde_json::json!(["gluten", "dairy"]));
    }

    #[test]
    fn test_vegan_items() {
        let catalog = AllergenCatalog::default();
        let vegan: Vec<String> = catalog
            .all()
            .into_iter()
            .filter(|entry| entry.vegan)
            .map(|entry| entry.item_name)
            .collect();

        assert_eq!(vegan, vec!["Apple Sauce"]);
    }
}
