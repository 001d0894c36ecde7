//! Price list and quote estimates. All amounts are in pence.

use crate::booking::{BuffetPackage, GuestCountEntry, GuestMinimums, Service, ServiceSelection};
use serde::{Deserialize, Serialize};

pub const CURRENCY: &str = "GBP";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceUnit {
    Person,
    Pizza,
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceList {
    pub hog_roast_per_person: u64,
    pub pizza_per_pizza: u64,
    /// Pizzas estimated per ten guests.
    pub pizzas_per_ten_guests: u32,
    pub bar_per_event: u64,
    pub buffet_package1_per_person: u64,
    pub buffet_package2_per_person: u64,
    pub buffet_package3_per_person: u64,
    pub deposit_percent: u64,
    pub minimum_deposit: u64,
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            hog_roast_per_person: 850,
            pizza_per_pizza: 1200,
            pizzas_per_ten_guests: 15,
            bar_per_event: 30_000,
            buffet_package1_per_person: 650,
            buffet_package2_per_person: 850,
            buffet_package3_per_person: 1250,
            deposit_percent: 20,
            minimum_deposit: 50_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    pub service: Service,
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<BuffetPackage>,
    pub unit: PriceUnit,
    pub price_per_unit_pence: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_quantity: Option<u32>,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub service: Service,
    pub description: String,
    pub quantity: u32,
    pub unit: PriceUnit,
    pub price_per_unit_pence: u64,
    pub total_pence: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    pub total_pence: u64,
    pub deposit_pence: u64,
    pub currency: &'static str,
}

impl PriceList {
    pub fn buffet_per_person(&self, package: BuffetPackage) -> u64 {
        match package {
            BuffetPackage::Package1 => self.buffet_package1_per_person,
            BuffetPackage::Package2 => self.buffet_package2_per_person,
            BuffetPackage::Package3 => self.buffet_package3_per_person,
        }
    }

    /// At least one pizza for any non-zero guest count.
    pub fn estimated_pizzas(&self, guests: u32) -> u32 {
        let pizzas = u64::from(guests) * u64::from(self.pizzas_per_ten_guests) / 10;
        u32::try_from(pizzas).unwrap_or(u32::MAX).max(1)
    }

    pub fn entries(&self, minimums: &GuestMinimums) -> Vec<PriceEntry> {
        let mut entries = vec![
            PriceEntry {
                service: Service::HogRoast,
                service_name: Service::HogRoast.display_name().to_string(),
                package: None,
                unit: PriceUnit::Person,
                price_per_unit_pence: self.hog_roast_per_person,
                minimum_quantity: Some(minimums.hog_roast),
                description: "Traditional slow-cooked hog roast with all accompaniments",
            },
            PriceEntry {
                service: Service::Pizza,
                service_name: Service::Pizza.display_name().to_string(),
                package: None,
                unit: PriceUnit::Pizza,
                price_per_unit_pence: self.pizza_per_pizza,
                minimum_quantity: None,
                description: "Wood-fired pizzas made fresh on-site",
            },
            PriceEntry {
                service: Service::Bar,
                service_name: Service::Bar.display_name().to_string(),
                package: None,
                unit: PriceUnit::Event,
                price_per_unit_pence: self.bar_per_event,
                minimum_quantity: None,
                description: "Professional licensed mobile bar with bartender",
            },
        ];

        let descriptions = [
            "Basic buffet package",
            "Standard buffet package",
            "Premium buffet package",
        ];
        for (package, description) in BuffetPackage::ALL.into_iter().zip(descriptions) {
            entries.push(PriceEntry {
                service: Service::Buffet,
                service_name: format!("Buffet {}", package.label()),
                package: Some(package),
                unit: PriceUnit::Person,
                price_per_unit_pence: self.buffet_per_person(package),
                minimum_quantity: Some(minimums.buffet),
                description,
            });
        }

        entries
    }

    pub fn entries_for(&self, service: Service, minimums: &GuestMinimums) -> Vec<PriceEntry> {
        self.entries(minimums)
            .into_iter()
            .filter(|entry| entry.service == service)
            .collect()
    }

    /// Estimate for the selected services. Guest counts that are missing,
    /// zero or invalid contribute nothing; the bar is a flat fee. A buffet
    /// without a package is priced as package 1.
    pub fn quote(&self, selection: &ServiceSelection) -> Quote {
        let mut lines = Vec::new();
        let guests = |service| {
            selection
                .guest_count(service)
                .and_then(|entry: GuestCountEntry| entry.count())
                .filter(|count| *count > 0)
        };

        if let Some(count) = guests(Service::HogRoast) {
            lines.push(QuoteLine {
                service: Service::HogRoast,
                description: Service::HogRoast.display_name().to_string(),
                quantity: count,
                unit: PriceUnit::Person,
                price_per_unit_pence: self.hog_roast_per_person,
                total_pence: u64::from(count) * self.hog_roast_per_person,
                note: None,
            });
        }

        if let Some(count) = guests(Service::Pizza) {
            let pizzas = self.estimated_pizzas(count);
            lines.push(QuoteLine {
                service: Service::Pizza,
                description: Service::Pizza.display_name().to_string(),
                quantity: pizzas,
                unit: PriceUnit::Pizza,
                price_per_unit_pence: self.pizza_per_pizza,
                total_pence: u64::from(pizzas) * self.pizza_per_pizza,
                note: Some(format!("Estimated {} pizzas for {} guests", pizzas, count)),
            });
        }

        if selection.is_selected(Service::Bar) {
            lines.push(QuoteLine {
                service: Service::Bar,
                description: Service::Bar.display_name().to_string(),
                quantity: 1,
                unit: PriceUnit::Event,
                price_per_unit_pence: self.bar_per_event,
                total_pence: self.bar_per_event,
                note: None,
            });
        }

        if let (Some(count), Some(buffet)) = (guests(Service::Buffet), selection.buffet()) {
            let package = buffet.package.unwrap_or(BuffetPackage::Package1);
            let per_person = self.buffet_per_person(package);
            lines.push(QuoteLine {
                service: Service::Buffet,
                description: format!("{} ({})", Service::Buffet.display_name(), package.label()),
                quantity: count,
                unit: PriceUnit::Person,
                price_per_unit_pence: per_person,
                total_pence: u64::from(count) * per_person,
                note: None,
            });
        }

        let total_pence: u64 = lines.iter().map(|line| line.total_pence).sum();

        Quote {
            lines,
            total_pence,
            deposit_pence: self.deposit_for(total_pence),
            currency: CURRENCY,
        }
    }

    /// Percentage of the total with a floor; nothing is due on an empty quote.
    pub fn deposit_for(&self, total_pence: u64) -> u64 {
        if total_pence == 0 {
            return 0;
        }
        (total_pence * self.deposit_percent / 100).max(self.minimum_deposit)
    }
}
