//! Emission factor reference table.
//!
//! Illustrative coefficients in kg CO₂ per unit of activity. Every lookup is
//! an exhaustive `match` over the input enum, so each fallback (unknown fuel
//! to petrol, unknown shopping category to general, unknown flight type to
//! domestic) is spelled out next to the factor it lands on.

use crate::types::{CommuteMode, FlightType, FuelType, ShoppingCategory};

/// Nominal cruise speed used to turn flight hours into distance.
pub const FLIGHT_KM_PER_HOUR: f64 = 500.0;

/// Food items with a known footprint per serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodType {
    Beef,
    Chicken,
    Pork,
    Fish,
    Dairy,
    Vegetables,
    Grains,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarFactors {
    pub petrol: f64,
    pub diesel: f64,
    pub electric: f64,
    pub hybrid: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportFactors {
    pub car: CarFactors,
    pub bus: f64,
    pub train: f64,
    pub metro: f64,
    pub bike: f64,
    pub walk: f64,
    pub flight_domestic: f64,
    pub flight_international: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodFactors {
    pub beef: f64,
    pub chicken: f64,
    pub pork: f64,
    pub fish: f64,
    pub dairy: f64,
    pub vegetables: f64,
    pub grains: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyFactors {
    /// per kWh
    pub electricity: f64,
    /// per m³
    pub gas: f64,
    pub heating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShoppingFactors {
    pub clothing: f64,
    pub electronics: f64,
    pub books: f64,
    pub general: f64,
}

/// Per-kg waste factors. Recycling and compost are credits (negative).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WasteFactors {
    pub general: f64,
    pub recycling: f64,
    pub compost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionFactorTable {
    pub transport: TransportFactors,
    pub food: FoodFactors,
    pub energy: EnergyFactors,
    pub shopping: ShoppingFactors,
    pub waste: WasteFactors,
}

/// The table every default computation uses.
pub const STANDARD_FACTORS: EmissionFactorTable = EmissionFactorTable {
    transport: TransportFactors {
        car: CarFactors {
            petrol: 0.21,
            diesel: 0.24,
            electric: 0.05,
            hybrid: 0.12,
        },
        bus: 0.08,
        train: 0.06,
        metro: 0.04,
        bike: 0.0,
        walk: 0.0,
        flight_domestic: 0.25,
        flight_international: 0.18,
    },
    food: FoodFactors {
        beef: 6.8,
        chicken: 2.1,
        pork: 3.2,
        fish: 1.8,
        dairy: 0.9,
        vegetables: 0.2,
        grains: 0.4,
    },
    energy: EnergyFactors {
        electricity: 0.5,
        gas: 2.0,
        heating: 0.3,
    },
    shopping: ShoppingFactors {
        clothing: 8.0,
        electronics: 50.0,
        books: 1.0,
        general: 2.0,
    },
    waste: WasteFactors {
        general: 0.5,
        recycling: -0.1,
        compost: -0.2,
    },
};

impl Default for EmissionFactorTable {
    fn default() -> Self {
        STANDARD_FACTORS
    }
}

impl EmissionFactorTable {
    /// kg per km for a car burning `fuel`.
    pub fn car(&self, fuel: &FuelType) -> f64 {
        let car = &self.transport.car;
        match fuel {
            FuelType::Petrol => car.petrol,
            FuelType::Diesel => car.diesel,
            FuelType::Electric => car.electric,
            FuelType::Hybrid => car.hybrid,
            FuelType::Other(_) => car.petrol,
        }
    }

    /// kg per km for a non-car commute mode.
    ///
    /// `None` for `Car` (fuel dependent, see [`Self::car`]) and for modes
    /// the table does not know, which contribute nothing.
    pub fn mode(&self, mode: &CommuteMode) -> Option<f64> {
        let t = &self.transport;
        match mode {
            CommuteMode::Bus => Some(t.bus),
            CommuteMode::Train => Some(t.train),
            CommuteMode::Metro => Some(t.metro),
            CommuteMode::Bike => Some(t.bike),
            CommuteMode::Walk => Some(t.walk),
            CommuteMode::Car | CommuteMode::Other(_) => None,
        }
    }

    /// kg per km flown.
    pub fn flight(&self, flight_type: &FlightType) -> f64 {
        match flight_type {
            FlightType::Domestic => self.transport.flight_domestic,
            FlightType::International => self.transport.flight_international,
            FlightType::Other(_) => self.transport.flight_domestic,
        }
    }

    pub fn food(&self, food: FoodType) -> f64 {
        let f = &self.food;
        match food {
            FoodType::Beef => f.beef,
            FoodType::Chicken => f.chicken,
            FoodType::Pork => f.pork,
            FoodType::Fish => f.fish,
            FoodType::Dairy => f.dairy,
            FoodType::Vegetables => f.vegetables,
            FoodType::Grains => f.grains,
        }
    }

    /// kg per item bought.
    pub fn shopping(&self, category: &ShoppingCategory) -> f64 {
        let s = &self.shopping;
        match category {
            ShoppingCategory::Clothing => s.clothing,
            ShoppingCategory::Electronics => s.electronics,
            ShoppingCategory::Books => s.books,
            ShoppingCategory::General | ShoppingCategory::Other(_) => s.general,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fuel_costs_as_petrol() {
        let t = STANDARD_FACTORS;
        assert_eq!(t.car(&FuelType::from("lpg")), t.car(&FuelType::Petrol));
        assert_eq!(t.car(&FuelType::Diesel), 0.24);
    }

    #[test]
    fn test_car_mode_has_no_scalar_factor() {
        let t = STANDARD_FACTORS;
        assert_eq!(t.mode(&CommuteMode::Car), None);
        assert_eq!(t.mode(&CommuteMode::from("hoverboard")), None);
        assert_eq!(t.mode(&CommuteMode::Walk), Some(0.0));
        assert_eq!(t.mode(&CommuteMode::Train), Some(0.06));
    }

    #[test]
    fn test_unknown_shopping_category_costs_as_general() {
        let t = STANDARD_FACTORS;
        assert_eq!(t.shopping(&ShoppingCategory::from("furniture")), 2.0);
        assert_eq!(t.shopping(&ShoppingCategory::Electronics), 50.0);
    }

    #[test]
    fn test_waste_credits_are_negative() {
        let w = STANDARD_FACTORS.waste;
        assert!(w.general > 0.0);
        assert!(w.recycling < 0.0);
        assert!(w.compost < 0.0);
    }

    #[test]
    fn test_flight_fallback_is_domestic() {
        let t = STANDARD_FACTORS;
        assert_eq!(t.flight(&FlightType::International), 0.18);
        assert_eq!(t.flight(&FlightType::from("charter")), 0.25);
    }

    #[test]
    fn test_food_lookup() {
        assert_eq!(STANDARD_FACTORS.food(FoodType::Beef), 6.8);
        assert_eq!(STANDARD_FACTORS.food(FoodType::Dairy), 0.9);
    }
}
