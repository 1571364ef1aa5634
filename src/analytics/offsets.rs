use serde::Serialize;

/// kg CO₂ one tree absorbs in a year.
pub const KG_PER_TREE_YEAR: f64 = 22.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetKind {
    TreePlanting,
    RenewableEnergy,
    CarbonCapture,
}

impl OffsetKind {
    pub const ALL: [OffsetKind; 3] = [
        OffsetKind::TreePlanting,
        OffsetKind::RenewableEnergy,
        OffsetKind::CarbonCapture,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OffsetKind::TreePlanting => "Tree Planting",
            OffsetKind::RenewableEnergy => "Renewable Energy",
            OffsetKind::CarbonCapture => "Carbon Capture",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OffsetKind::TreePlanting => "Plant trees to absorb CO2 from atmosphere",
            OffsetKind::RenewableEnergy => "Support renewable energy projects",
            OffsetKind::CarbonCapture => "Direct air capture technology",
        }
    }

    /// Price in dollars per kg CO₂ offset.
    pub fn cost_per_kg(&self) -> f64 {
        match self {
            OffsetKind::TreePlanting => 0.02,
            OffsetKind::RenewableEnergy => 0.015,
            OffsetKind::CarbonCapture => 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetOption {
    pub kind: OffsetKind,
    pub name: String,
    pub description: String,
    pub cost_per_kg: f64,
    /// Rounded to cents.
    pub cost: f64,
    /// Only set for tree planting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trees_needed: Option<u32>,
}

/// The three purchasable offsets priced for `total_kg`.
pub fn carbon_offset_options(total_kg: f64) -> Vec<OffsetOption> {
    let total_kg = total_kg.max(0.0);
    OffsetKind::ALL
        .iter()
        .map(|kind| OffsetOption {
            kind: *kind,
            name: kind.name().to_string(),
            description: kind.description().to_string(),
            cost_per_kg: kind.cost_per_kg(),
            cost: round_cents(total_kg * kind.cost_per_kg()),
            trees_needed: (*kind == OffsetKind::TreePlanting)
                .then(|| (total_kg / KG_PER_TREE_YEAR).ceil() as u32),
        })
        .collect()
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_options_priced() {
        let options = carbon_offset_options(100.0);
        assert_eq!(options.len(), 3);

        assert_eq!(options[0].kind, OffsetKind::TreePlanting);
        assert_eq!(options[0].cost, 2.0);
        assert_eq!(options[0].trees_needed, Some(5));

        assert_eq!(options[1].cost, 1.5);
        assert_eq!(options[1].trees_needed, None);
        assert_eq!(options[2].cost, 5.0);
    }

    #[test]
    fn test_cost_rounds_to_cents_and_trees_round_up() {
        let options = carbon_offset_options(23.3);
        // 23.3 × 0.015 = 0.3495
        assert_eq!(options[1].cost, 0.35);
        assert_eq!(options[0].trees_needed, Some(2));

        let exact = carbon_offset_options(44.0);
        assert_eq!(exact[0].trees_needed, Some(2));
    }

    #[test]
    fn test_nothing_to_offset() {
        let options = carbon_offset_options(0.0);
        assert!(options.iter().all(|o| o.cost == 0.0));
        assert_eq!(options[0].trees_needed, Some(0));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(carbon_offset_options(10.0)).unwrap();
        assert_eq!(json[0]["kind"], "tree_planting");
        assert_eq!(json[0]["costPerKg"], 0.02);
        assert!(json[2].get("treesNeeded").is_none());
    }
}
