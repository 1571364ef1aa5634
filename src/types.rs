use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Declares a string-keyed input enum whose unknown values are kept verbatim
/// in an `Other` variant, so payloads written by older or foreign front ends
/// survive a load/save cycle unchanged.
macro_rules! lenient_key {
    ($(#[$meta:meta])* $name:ident, default = $default:ident, { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $key,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }

            /// True for values outside the known key set.
            pub fn is_other(&self) -> bool {
                matches!(self, $name::Other(_))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($key => $name::$variant,)+
                    _ => $name::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                $name::from(raw.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

lenient_key!(
    /// Fuel used by a car commute.
    FuelType, default = Petrol, {
        Petrol => "petrol",
        Diesel => "diesel",
        Electric => "electric",
        Hybrid => "hybrid",
    }
);

lenient_key!(
    /// How the daily commute is made.
    CommuteMode, default = Car, {
        Car => "car",
        Bus => "bus",
        Train => "train",
        Metro => "metro",
        Bike => "bike",
        Walk => "walk",
    }
);

lenient_key!(
    FlightType, default = Domestic, {
        Domestic => "domestic",
        International => "international",
    }
);

lenient_key!(
    /// Shopping category; anything unrecognised is costed as `general`.
    ShoppingCategory, default = General, {
        Clothing => "clothing",
        Electronics => "electronics",
        Books => "books",
        General => "general",
    }
);

/// The six emission categories shown in the daily breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Transport,
    Food,
    Energy,
    Shopping,
    Waste,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Transport,
        Category::Food,
        Category::Energy,
        Category::Shopping,
        Category::Waste,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Transport => "transport",
            Category::Food => "food",
            Category::Energy => "energy",
            Category::Shopping => "shopping",
            Category::Waste => "waste",
            Category::Other => "other",
        }
    }
}

/// Optional trips that sit beside the commute and can be toggled on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdditionalMode {
    Car,
    Public,
    Flight,
}

/// Decoders for numbers written by browser front ends, where an empty input
/// is saved as `null` (`NaN` through `JSON.stringify`).
mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// A number, a numeric string, or `null` (read as 0).
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(0.0),
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| D::Error::custom(format!("{} is not a finite number", n))),
            Value::String(raw) if raw.trim().is_empty() => Ok(0.0),
            Value::String(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("'{}' is not a number", raw))),
            other => Err(D::Error::custom(format!("expected a number, got {}", other))),
        }
    }

    /// Car occupancy; `null`, zero-or-less and unreadable counts are unset.
    pub fn occupancy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let riders = number(deserializer)?;
        if riders.is_finite() && riders >= 1.0 {
            Ok(Some(riders.round().min(f64::from(u32::MAX)) as u32))
        } else {
            Ok(None)
        }
    }
}

// =============================================================================
// Day record
// =============================================================================

/// All activity inputs and derived emissions for one calendar date.
///
/// The date itself is the key in the record store and is not repeated here.
/// `emissions` is derived: it is overwritten by `engine::compute_all` and
/// should never be edited by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default)]
    pub food: Food,
    #[serde(default)]
    pub energy: Energy,
    #[serde(default)]
    pub shopping: Shopping,
    #[serde(default)]
    pub waste: Waste,
    #[serde(default)]
    pub other: OtherActivities,
    #[serde(default)]
    pub emissions: CategoryEmissions,
}

impl DayRecord {
    /// An empty day stamped with the given instant.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            transport: Transport::default(),
            food: Food::default(),
            energy: Energy::default(),
            shopping: Shopping::default(),
            waste: Waste::default(),
            other: OtherActivities::default(),
            emissions: CategoryEmissions::default(),
        }
    }

    /// Turn one of the optional trip types on or off.
    ///
    /// Disabling clears the trip's distance (or flight hours) so a later
    /// re-enable starts from zero.
    pub fn set_mode_enabled(&mut self, mode: AdditionalMode, enabled: bool) {
        match mode {
            AdditionalMode::Car => {
                self.transport.car.enabled = enabled;
                if !enabled {
                    self.transport.car.km = 0.0;
                }
            }
            AdditionalMode::Public => {
                self.transport.public.enabled = enabled;
                if !enabled {
                    self.transport.public.km = 0.0;
                }
            }
            AdditionalMode::Flight => {
                self.transport.flight.enabled = enabled;
                if !enabled {
                    self.transport.flight.hours = 0.0;
                }
            }
        }
    }

    /// Strict input check: every quantity must be finite and non-negative.
    ///
    /// The engine itself never calls this; lenient callers may skip it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let t = &self.transport;
        check("transport.commute.distance", t.commute.distance)?;
        check("transport.car.km", t.car.km)?;
        check("transport.public.km", t.public.km)?;
        check("transport.flight.hours", t.flight.hours)?;

        check("food.meatMeals", self.food.meat_meals)?;
        check("food.dairyServings", self.food.dairy_servings)?;

        check("energy.electricity", self.energy.electricity)?;
        check("energy.gas", self.energy.gas)?;
        check("energy.heating", self.energy.heating)?;

        for (i, item) in self.shopping.items.iter().enumerate() {
            check(&format!("shopping.items[{}].quantity", i), item.quantity)?;
        }
        check("shopping.totalSpent", self.shopping.total_spent)?;

        check("waste.general", self.waste.general)?;
        check("waste.recycling", self.waste.recycling)?;
        check("waste.compost", self.waste.compost)?;

        for (i, activity) in self.other.activities.iter().enumerate() {
            check(&format!("other.activities[{}].emissions", i), activity.emissions)?;
        }
        Ok(())
    }
}

impl Default for DayRecord {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

fn check(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite {
            field: field.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transport {
    pub commute: Commute,
    pub car: ExtraTrips,
    pub public: ExtraTrips,
    pub flight: Flight,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Commute {
    /// km, one day's total
    #[serde(deserialize_with = "lenient::number")]
    pub distance: f64,
    pub mode: CommuteMode,
    pub fuel_type: FuelType,
    /// People sharing the car. Only read by the occupancy-sharing policy.
    #[serde(
        deserialize_with = "lenient::occupancy",
        skip_serializing_if = "Option::is_none"
    )]
    pub occupancy: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraTrips {
    pub enabled: bool,
    #[serde(deserialize_with = "lenient::number")]
    pub km: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Flight {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub flight_type: FlightType,
    #[serde(deserialize_with = "lenient::number")]
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Food {
    pub meals: Meals,
    #[serde(deserialize_with = "lenient::number")]
    pub meat_meals: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub dairy_servings: f64,
    pub local_produce: bool,
}

impl Default for Food {
    fn default() -> Self {
        Self {
            meals: Meals::default(),
            meat_meals: 0.0,
            dairy_servings: 0.0,
            local_produce: true,
        }
    }
}

/// Free-text meal notes. Not costed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Meals {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Energy {
    /// kWh
    #[serde(deserialize_with = "lenient::number")]
    pub electricity: f64,
    /// m³
    #[serde(deserialize_with = "lenient::number")]
    pub gas: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub heating: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shopping {
    pub items: Vec<ShoppingItem>,
    #[serde(deserialize_with = "lenient::number")]
    pub total_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingItem {
    pub category: ShoppingCategory,
    #[serde(deserialize_with = "lenient::number")]
    pub quantity: f64,
}

/// Waste by stream, in kg.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Waste {
    #[serde(deserialize_with = "lenient::number")]
    pub general: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub recycling: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub compost: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherActivities {
    pub activities: Vec<OtherActivity>,
}

/// An activity whose emissions were worked out elsewhere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherActivity {
    pub description: String,
    /// kg CO₂, precomputed
    #[serde(deserialize_with = "lenient::number")]
    pub emissions: f64,
}

/// Per-category emissions for one day, in kg CO₂.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryEmissions {
    #[serde(deserialize_with = "lenient::number")]
    pub transport: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub food: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub energy: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub shopping: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub waste: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub other: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub total: f64,
}

impl CategoryEmissions {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Transport => self.transport,
            Category::Food => self.food,
            Category::Energy => self.energy,
            Category::Shopping => self.shopping,
            Category::Waste => self.waste,
            Category::Other => self.other,
        }
    }

    /// Sum of the six categories, ignoring the stored `total`.
    pub fn category_sum(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

// =============================================================================
// Shared test fixtures
// =============================================================================

#[cfg(test)]
pub mod test_utils {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{CategoryEmissions, DayRecord};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    /// A blank record with a fixed timestamp so equality checks are stable.
    pub fn blank_record() -> DayRecord {
        DayRecord::new(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
    }

    /// A record whose derived emissions are set directly, for analytics tests.
    pub fn record_with_emissions(transport: f64, food: f64, rest: f64) -> DayRecord {
        let mut record = blank_record();
        record.emissions = CategoryEmissions {
            transport,
            food,
            energy: rest,
            shopping: 0.0,
            waste: 0.0,
            other: 0.0,
            total: transport + food + rest,
        };
        record
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::blank_record;
    use super::*;

    #[test]
    fn test_default_record_shape() {
        let record = blank_record();
        assert_eq!(record.transport.commute.mode, CommuteMode::Car);
        assert_eq!(record.transport.commute.fuel_type, FuelType::Petrol);
        assert_eq!(record.transport.flight.flight_type, FlightType::Domestic);
        assert!(!record.transport.car.enabled);
        assert!(record.food.local_produce);
        assert_eq!(record.emissions, CategoryEmissions::default());
    }

    #[test]
    fn test_serializes_front_end_field_names() {
        let json = serde_json::to_value(blank_record()).unwrap();
        assert_eq!(json["transport"]["commute"]["fuelType"], "petrol");
        assert_eq!(json["transport"]["flight"]["type"], "domestic");
        assert_eq!(json["food"]["localProduce"], true);
        assert_eq!(json["shopping"]["totalSpent"], 0.0);
        assert!(json["transport"]["commute"].get("occupancy").is_none());
    }

    #[test]
    fn test_lenient_decode_fills_missing_sections() {
        let raw = r#"{
            "timestamp": "2024-05-02T09:30:00.000Z",
            "transport": { "commute": { "distance": 12, "mode": "bus" } },
            "food": { "meatMeals": 1 }
        }"#;
        let record: DayRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.transport.commute.distance, 12.0);
        assert_eq!(record.transport.commute.mode, CommuteMode::Bus);
        assert_eq!(record.transport.commute.fuel_type, FuelType::Petrol);
        assert_eq!(record.food.meat_meals, 1.0);
        assert!(record.food.local_produce, "missing flag defaults to local");
        assert!(record.shopping.items.is_empty());
    }

    #[test]
    fn test_null_and_blank_numbers_read_as_zero() {
        let raw = r#"{
            "transport": {
                "commute": { "distance": null, "mode": "car", "occupancy": null },
                "car": { "enabled": true, "km": "" }
            },
            "food": { "meatMeals": null, "dairyServings": "2" },
            "energy": { "electricity": null, "gas": 1.5 },
            "emissions": { "total": null }
        }"#;
        let record: DayRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.transport.commute.distance, 0.0);
        assert_eq!(record.transport.commute.occupancy, None);
        assert_eq!(record.transport.car.km, 0.0);
        assert_eq!(record.food.meat_meals, 0.0);
        assert_eq!(record.food.dairy_servings, 2.0);
        assert_eq!(record.energy.gas, 1.5);
        assert_eq!(record.emissions.total, 0.0);
    }

    #[test]
    fn test_fractional_counts_survive_round_trip() {
        let raw = r#"{ "food": { "meatMeals": 1.5 }, "transport": { "commute": { "occupancy": 2.0 } } }"#;
        let record: DayRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.food.meat_meals, 1.5);
        assert_eq!(record.transport.commute.occupancy, Some(2));

        let back: DayRecord = serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_non_numeric_quantity_is_an_error() {
        let raw = r#"{ "energy": { "gas": "lots" } }"#;
        assert!(serde_json::from_str::<DayRecord>(raw).is_err());
        let raw = r#"{ "energy": { "gas": true } }"#;
        assert!(serde_json::from_str::<DayRecord>(raw).is_err());
    }

    #[test]
    fn test_unknown_keys_round_trip_verbatim() {
        let mut record = blank_record();
        record.transport.commute.mode = CommuteMode::from("scooter");
        record.shopping.items.push(ShoppingItem {
            category: ShoppingCategory::from("furniture"),
            quantity: 1.0,
        });

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"scooter\""));
        let back: DayRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(back.shopping.items[0].category.is_other());
        assert_eq!(back.shopping.items[0].category.as_str(), "furniture");
    }

    #[test]
    fn test_known_keys_are_case_sensitive() {
        assert_eq!(FuelType::from("Diesel"), FuelType::Other("Diesel".to_string()));
        assert_eq!(FuelType::from("diesel"), FuelType::Diesel);
    }

    #[test]
    fn test_disabling_mode_clears_distance() {
        let mut record = blank_record();
        record.set_mode_enabled(AdditionalMode::Public, true);
        record.transport.public.km = 14.0;
        record.set_mode_enabled(AdditionalMode::Flight, true);
        record.transport.flight.hours = 2.5;

        record.set_mode_enabled(AdditionalMode::Public, false);
        record.set_mode_enabled(AdditionalMode::Flight, false);

        assert!(!record.transport.public.enabled);
        assert_eq!(record.transport.public.km, 0.0);
        assert_eq!(record.transport.flight.hours, 0.0);
    }

    #[test]
    fn test_validate_reports_field_path() {
        let mut record = blank_record();
        assert!(record.validate().is_ok());

        record.shopping.items.push(ShoppingItem {
            category: ShoppingCategory::Books,
            quantity: 2.0,
        });
        record.shopping.items.push(ShoppingItem {
            category: ShoppingCategory::Books,
            quantity: -1.0,
        });
        let err = record.validate().unwrap_err();
        assert_eq!(err.field(), "shopping.items[1].quantity");
        assert!(matches!(err, ValidationError::Negative { value, .. } if value == -1.0));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut record = blank_record();
        record.energy.gas = f64::NAN;
        assert_eq!(
            record.validate(),
            Err(ValidationError::NonFinite {
                field: "energy.gas".to_string()
            })
        );
    }

    #[test]
    fn test_category_sum_ignores_stored_total() {
        let emissions = CategoryEmissions {
            transport: 1.0,
            food: 2.0,
            energy: 3.0,
            shopping: 4.0,
            waste: 0.5,
            other: 0.5,
            total: 999.0,
        };
        assert_eq!(emissions.category_sum(), 11.0);
        assert_eq!(emissions.get(Category::Shopping), 4.0);
    }
}
