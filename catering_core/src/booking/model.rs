//! Booking request draft: the state a customer builds up field by field.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Service {
    HogRoast,
    Pizza,
    Bar,
    Buffet,
}

impl Service {
    pub const ALL: [Service; 4] = [Service::HogRoast, Service::Pizza, Service::Bar, Service::Buffet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::HogRoast => "hogRoast",
            Service::Pizza => "pizza",
            Service::Bar => "bar",
            Service::Buffet => "buffet",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Service::HogRoast => "Hog Roast Catering",
            Service::Pizza => "Mobile Pizza Van",
            Service::Bar => "Mobile Bar Service",
            Service::Buffet => "Buffet Catering",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Accepts `hogRoast`, `hog_roast` and `hog-roast` alike.
impl FromStr for Service {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "hogroast" => Ok(Service::HogRoast),
            "pizza" => Ok(Service::Pizza),
            "bar" => Ok(Service::Bar),
            "buffet" => Ok(Service::Buffet),
            _ => Err(UnknownVariant::new("service", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuffetPackage {
    Package1,
    Package2,
    Package3,
}

impl BuffetPackage {
    pub const ALL: [BuffetPackage; 3] = [
        BuffetPackage::Package1,
        BuffetPackage::Package2,
        BuffetPackage::Package3,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BuffetPackage::Package1 => "Package 1",
            BuffetPackage::Package2 => "Package 2",
            BuffetPackage::Package3 => "Package 3",
        }
    }
}

impl FromStr for BuffetPackage {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "package1" => Ok(BuffetPackage::Package1),
            "package2" => Ok(BuffetPackage::Package2),
            "package3" => Ok(BuffetPackage::Package3),
            _ => Err(UnknownVariant::new("buffet package", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuffetAddOn {
    Canapes,
    Sandwiches,
    Cakes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerWaterAvailability {
    Both,
    Power,
    Water,
    Neither,
}

impl FromStr for PowerWaterAvailability {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "both" => Ok(PowerWaterAvailability::Both),
            "power" => Ok(PowerWaterAvailability::Power),
            "water" => Ok(PowerWaterAvailability::Water),
            "neither" => Ok(PowerWaterAvailability::Neither),
            _ => Err(UnknownVariant::new("power/water availability", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    EventLocation,
}

/// One tagged update to the event section of the form.
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    EventDate(Option<NaiveDate>),
    ArrivalTime(Option<NaiveTime>),
    PowerWaterAvailability(Option<PowerWaterAvailability>),
    DietaryNotes(Option<String>),
    SpecialRequests(Option<String>),
}

/// What the customer typed into a guest-count box. Rejected input is
/// remembered as `Invalid` so it can be reported, never as the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuestCountEntry {
    #[default]
    Empty,
    Count(u32),
    Invalid,
}

impl GuestCountEntry {
    /// Whole numbers too large for a `u32` saturate at `u32::MAX`; they are
    /// still non-negative integers and must not read as `InvalidNumber`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return GuestCountEntry::Empty;
        }

        let digits = raw.strip_prefix('+').unwrap_or(raw);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return GuestCountEntry::Invalid;
        }

        GuestCountEntry::Count(digits.parse::<u32>().unwrap_or(u32::MAX))
    }

    pub fn count(&self) -> Option<u32> {
        match self {
            GuestCountEntry::Count(count) => Some(*count),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuffetSelection {
    pub guests: GuestCountEntry,
    pub package: Option<BuffetPackage>,
    pub add_ons: BTreeSet<BuffetAddOn>,
}

/// Selected services and their dependent fields. A `None` slot means the
/// service is not selected and has no dependent state at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceSelection {
    hog_roast: Option<GuestCountEntry>,
    pizza: Option<GuestCountEntry>,
    bar: Option<GuestCountEntry>,
    buffet: Option<BuffetSelection>,
}

impl ServiceSelection {
    pub fn is_selected(&self, service: Service) -> bool {
        match service {
            Service::HogRoast => self.hog_roast.is_some(),
            Service::Pizza => self.pizza.is_some(),
            Service::Bar => self.bar.is_some(),
            Service::Buffet => self.buffet.is_some(),
        }
    }

    pub fn selected(&self) -> BTreeSet<Service> {
        Service::ALL
            .into_iter()
            .filter(|service| self.is_selected(*service))
            .collect()
    }

    /// `None` when the service is not selected.
    pub fn guest_count(&self, service: Service) -> Option<GuestCountEntry> {
        match service {
            Service::HogRoast => self.hog_roast,
            Service::Pizza => self.pizza,
            Service::Bar => self.bar,
            Service::Buffet => self.buffet.as_ref().map(|buffet| buffet.guests),
        }
    }

    pub fn buffet(&self) -> Option<&BuffetSelection> {
        self.buffet.as_ref()
    }

    pub(crate) fn buffet_mut(&mut self) -> Option<&mut BuffetSelection> {
        self.buffet.as_mut()
    }

    pub(crate) fn guest_count_mut(&mut self, service: Service) -> Option<&mut GuestCountEntry> {
        match service {
            Service::HogRoast => self.hog_roast.as_mut(),
            Service::Pizza => self.pizza.as_mut(),
            Service::Bar => self.bar.as_mut(),
            Service::Buffet => self.buffet.as_mut().map(|buffet| &mut buffet.guests),
        }
    }

    /// Selecting always starts from empty dependent fields; deselecting drops them.
    pub(crate) fn set_selected(&mut self, service: Service, selected: bool) {
        match service {
            Service::HogRoast => self.hog_roast = selected.then(GuestCountEntry::default),
            Service::Pizza => self.pizza = selected.then(GuestCountEntry::default),
            Service::Bar => self.bar = selected.then(GuestCountEntry::default),
            Service::Buffet => self.buffet = selected.then(BuffetSelection::default),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventDetails {
    pub event_date: Option<NaiveDate>,
    pub arrival_time: Option<NaiveTime>,
    pub power_water: Option<PowerWaterAvailability>,
    pub dietary_notes: Option<String>,
    pub special_requests: Option<String>,
}

/// The in-progress booking inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookingRequest {
    pub contact: ContactDetails,
    pub services: ServiceSelection,
    pub event: EventDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_from_str_accepts_spellings() {
        assert_eq!("hogRoast".parse::<Service>().unwrap(), Service::HogRoast);
        assert_eq!("hog_roast".parse::<Service>().unwrap(), Service::HogRoast);
        assert_eq!("hog-roast".parse::<Service>().unwrap(), Service::HogRoast);
        assert_eq!("Buffet".parse::<Service>().unwrap(), Service::Buffet);
        assert!("karaoke".parse::<Service>().is_err());
    }

    #[test]
    fn test_guest_count_entry_parse() {
        assert_eq!(GuestCountEntry::parse(""), GuestCountEntry::Empty);
        assert_eq!(GuestCountEntry::parse("  "), GuestCountEntry::Empty);
        assert_eq!(GuestCountEntry::parse(" 60 "), GuestCountEntry::Count(60));
        assert_eq!(GuestCountEntry::parse("0"), GuestCountEntry::Count(0));
        assert_eq!(GuestCountEntry::parse("-5"), GuestCountEntry::Invalid);
        assert_eq!(GuestCountEntry::parse("twelve"), GuestCountEntry::Invalid);
        assert_eq!(GuestCountEntry::parse("10.5"), GuestCountEntry::Invalid);
        assert_eq!(GuestCountEntry::parse("+12"), GuestCountEntry::Count(12));
        assert_eq!(GuestCountEntry::parse("+"), GuestCountEntry::Invalid);
        assert_eq!(
            GuestCountEntry::parse("99999999999"),
            GuestCountEntry::Count(u32::MAX)
        );
    }

    #[test]
    fn test_service_selection_slots() {
        let mut selection = ServiceSelection::default();
        assert!(selection.selected().is_empty());

        selection.set_selected(Service::Buffet, true);
        selection.set_selected(Service::Pizza, true);

        assert_eq!(
            selection.selected().into_iter().collect::<Vec<_>>(),
            vec![Service::Pizza, Service::Buffet]
        );
        assert_eq!(selection.guest_count(Service::Buffet), Some(GuestCountEntry::Empty));
        assert_eq!(selection.guest_count(Service::HogRoast), None);

        selection.set_selected(Service::Buffet, false);
        assert!(selection.buffet().is_none());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_value(Service::HogRoast).unwrap(), "hogRoast");
        assert_eq!(serde_json::to_value(BuffetPackage::Package2).unwrap(), "package2");
        assert_eq!(serde_json::to_value(BuffetAddOn::Canapes).unwrap(), "canapes");
        assert_eq!(serde_json::to_value(PowerWaterAvailability::Neither).unwrap(), "neither");
        assert_eq!("power".parse::<PowerWaterAvailability>().unwrap(), PowerWaterAvailability::Power);
    }
}
