use serde::{Deserialize, Serialize};

const WEEK_WARRIOR_DAYS: u32 = 7;
const FOREST_GUARDIAN_TREES: f64 = 10.0;

/// Aggregate counters supplied by the caller; see
/// [`crate::store::RecordStore::consecutive_days_under_target`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
    pub consecutive_days_under_target: u32,
    pub total_trees_equivalent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

const WEEK_WARRIOR: Achievement = Achievement {
    name: "Week Warrior",
    description: "Stayed under target for 7 consecutive days",
    icon: "fas fa-trophy",
    color: "gold",
};

const FOREST_GUARDIAN: Achievement = Achievement {
    name: "Forest Guardian",
    description: "Saved emissions equivalent to 10 trees",
    icon: "fas fa-tree",
    color: "green",
};

pub fn achievements(progress: &AchievementProgress) -> Vec<Achievement> {
    let mut earned = Vec::new();
    if progress.consecutive_days_under_target >= WEEK_WARRIOR_DAYS {
        earned.push(WEEK_WARRIOR);
    }
    if progress.total_trees_equivalent >= FOREST_GUARDIAN_TREES {
        earned.push(FOREST_GUARDIAN);
    }
    earned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert!(achievements(&AchievementProgress::default()).is_empty());

        let six_days = AchievementProgress {
            consecutive_days_under_target: 6,
            total_trees_equivalent: 9.99,
        };
        assert!(achievements(&six_days).is_empty());

        let both = AchievementProgress {
            consecutive_days_under_target: 7,
            total_trees_equivalent: 10.0,
        };
        let names: Vec<&str> = achievements(&both).iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Week Warrior", "Forest Guardian"]);
    }

    #[test]
    fn test_forest_guardian_alone() {
        let progress = AchievementProgress {
            consecutive_days_under_target: 2,
            total_trees_equivalent: 12.5,
        };
        let earned = achievements(&progress);
        assert_eq!(earned.len(), 1);
        assert_eq!(earned[0].icon, "fas fa-tree");
        assert_eq!(earned[0].color, "green");
    }
}
