//! Emissions engine: pure arithmetic from a day's inputs to kg CO₂.
//!
//! Nothing here touches storage or global state. The only write is
//! [`Engine::compute_all`] replacing the record's own `emissions` block.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::factors::{EmissionFactorTable, FoodType, FLIGHT_KM_PER_HOUR, STANDARD_FACTORS};
use crate::types::{CategoryEmissions, CommuteMode, DayRecord};

/// Multiplier for food that is not locally produced.
const IMPORT_PENALTY: f64 = 1.2;
/// Extra multiplier for imported food in the winter months.
const WINTER_IMPORT_PENALTY: f64 = 1.4;
/// Dec, Jan, Feb, Mar
const WINTER_MONTHS: [u32; 4] = [12, 1, 2, 3];

/// Which import penalty applies to food.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodPolicy {
    /// Flat 20% on non-local produce.
    #[default]
    Locality,
    /// Locality penalty, then a further 40% for non-local produce in winter.
    Seasonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnginePolicy {
    pub food: FoodPolicy,
    /// Split car-commute emissions between `commute.occupancy` riders.
    pub share_commute_by_occupancy: bool,
}

/// Transport emissions by source. Sums to the transport category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportBreakdown {
    pub commute: f64,
    pub additional_car: f64,
    pub public: f64,
    pub flight: f64,
}

impl TransportBreakdown {
    pub fn total(&self) -> f64 {
        self.commute + self.additional_car + self.public + self.flight
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Engine {
    pub factors: EmissionFactorTable,
    pub policy: EnginePolicy,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(STANDARD_FACTORS, EnginePolicy::default())
    }
}

impl Engine {
    pub fn new(factors: EmissionFactorTable, policy: EnginePolicy) -> Self {
        Self { factors, policy }
    }

    pub fn with_policy(policy: EnginePolicy) -> Self {
        Self::new(STANDARD_FACTORS, policy)
    }

    pub fn transport_breakdown(&self, record: &DayRecord) -> TransportBreakdown {
        let t = &record.transport;
        let commute = &t.commute;

        let mut commute_kg = match commute.mode {
            CommuteMode::Car => commute.distance * self.factors.car(&commute.fuel_type),
            ref mode => self
                .factors
                .mode(mode)
                .map(|factor| commute.distance * factor)
                .unwrap_or(0.0),
        };
        if self.policy.share_commute_by_occupancy && commute.mode == CommuteMode::Car {
            let riders = commute.occupancy.unwrap_or(1).max(1);
            commute_kg /= f64::from(riders);
        }

        // Extra car trips are always costed at the petrol rate, whatever the
        // commute vehicle burns.
        let additional_car = if t.car.enabled {
            t.car.km * self.factors.transport.car.petrol
        } else {
            0.0
        };
        let public = if t.public.enabled {
            t.public.km * self.factors.transport.bus
        } else {
            0.0
        };
        let flight = if t.flight.enabled {
            t.flight.hours * FLIGHT_KM_PER_HOUR * self.factors.flight(&t.flight.flight_type)
        } else {
            0.0
        };

        TransportBreakdown {
            commute: commute_kg,
            additional_car,
            public,
            flight,
        }
    }

    pub fn transport(&self, record: &DayRecord) -> f64 {
        self.transport_breakdown(record).total()
    }

    /// Food emissions for a record evaluated on `date`.
    ///
    /// `date` only matters under [`FoodPolicy::Seasonal`].
    pub fn food(&self, record: &DayRecord, date: NaiveDate) -> f64 {
        let food = &record.food;
        let mut total = food.meat_meals * self.factors.food(FoodType::Beef)
            + food.dairy_servings * self.factors.food(FoodType::Dairy);

        if !food.local_produce {
            total *= IMPORT_PENALTY;
            if self.policy.food == FoodPolicy::Seasonal && WINTER_MONTHS.contains(&date.month()) {
                total *= WINTER_IMPORT_PENALTY;
            }
        }
        total
    }

    pub fn energy(&self, record: &DayRecord) -> f64 {
        let e = &record.energy;
        let f = &self.factors.energy;
        e.electricity * f.electricity + e.gas * f.gas + e.heating * f.heating
    }

    pub fn shopping(&self, record: &DayRecord) -> f64 {
        record
            .shopping
            .items
            .iter()
            .map(|item| item.quantity * self.factors.shopping(&item.category))
            .sum()
    }

    /// Waste emissions, floored at zero: recycling and compost credits can
    /// cancel general waste but never push the category negative.
    pub fn waste(&self, record: &DayRecord) -> f64 {
        let w = &record.waste;
        let f = &self.factors.waste;
        let net = w.general * f.general + w.recycling * f.recycling + w.compost * f.compost;
        net.max(0.0)
    }

    pub fn other(&self, record: &DayRecord) -> f64 {
        record.other.activities.iter().map(|a| a.emissions).sum()
    }

    /// Recompute every category for `record` on `date`, overwrite
    /// `record.emissions` with the result and return it.
    pub fn compute_all(&self, record: &mut DayRecord, date: NaiveDate) -> CategoryEmissions {
        let mut emissions = CategoryEmissions {
            transport: self.transport(record),
            food: self.food(record, date),
            energy: self.energy(record),
            shopping: self.shopping(record),
            waste: self.waste(record),
            other: self.other(record),
            total: 0.0,
        };
        emissions.total = emissions.category_sum();
        record.emissions = emissions;
        emissions
    }
}

/// Recompute with the standard table and default policy.
///
/// The evaluation date is the record's own timestamp, which the default food
/// policy ignores anyway.
pub fn compute_all(record: &mut DayRecord) -> CategoryEmissions {
    let date = record.timestamp.date_naive();
    Engine::default().compute_all(record, date)
}
