use super::model::Service;
use serde::{Deserialize, Serialize};

/// Smallest guest count the business accepts per service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestMinimums {
    pub hog_roast: u32,
    pub pizza: u32,
    pub bar: u32,
    pub buffet: u32,
}

impl GuestMinimums {
    pub const DEFAULT_HOG_ROAST: u32 = 50;
    pub const DEFAULT_PIZZA: u32 = 1;
    pub const DEFAULT_BAR: u32 = 1;
    pub const DEFAULT_BUFFET: u32 = 20;

    pub fn for_service(&self, service: Service) -> u32 {
        match service {
            Service::HogRoast => self.hog_roast,
            Service::Pizza => self.pizza,
            Service::Bar => self.bar,
            Service::Buffet => self.buffet,
        }
    }
}

impl Default for GuestMinimums {
    fn default() -> Self {
        Self {
            hog_roast: Self::DEFAULT_HOG_ROAST,
            pizza: Self::DEFAULT_PIZZA,
            bar: Self::DEFAULT_BAR,
            buffet: Self::DEFAULT_BUFFET,
        }
    }
}
