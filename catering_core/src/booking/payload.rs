//! Finalised booking submitted to a sink.

use super::model::{BuffetAddOn, BuffetPackage, PowerWaterAvailability, Service};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_location: String,
}

/// Fields belonging to unselected services are absent from the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub contact: BookingContact,
    pub services: BTreeSet<Service>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hog_roast_guest_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pizza_guest_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_guest_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffet_guest_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffet_package: Option<BuffetPackage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffet_add_ons: Option<BTreeSet<BuffetAddOn>>,
    pub event_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_water_availability: Option<PowerWaterAvailability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

impl BookingPayload {
    pub fn guest_count(&self, service: Service) -> Option<u32> {
        match service {
            Service::HogRoast => self.hog_roast_guest_count,
            Service::Pizza => self.pizza_guest_count,
            Service::Bar => self.bar_guest_count,
            Service::Buffet => self.buffet_guest_count,
        }
    }
}
