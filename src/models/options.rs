use serde::Serialize;

use super::enums::*;

/// Every enumerated choice the UI offers, in display order.
#[derive(Debug, Clone, Serialize)]
pub struct OptionSets {
    pub risk_factors: Vec<&'static str>,
    pub goals: Vec<&'static str>,
    pub frequencies: Vec<&'static str>,
    pub durations: Vec<&'static str>,
    pub conditions: Vec<&'static str>,
}

pub fn option_sets() -> OptionSets {
    OptionSets {
        risk_factors: RiskFactor::ALL.iter().map(|r| r.as_str()).collect(),
        goals: Goal::ALL.iter().map(|g| g.as_str()).collect(),
        frequencies: Frequency::ALL.iter().map(|f| f.as_str()).collect(),
        durations: SessionDuration::ALL.iter().map(|d| d.as_str()).collect(),
        conditions: CONDITION_LABELS.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_sets_keep_display_order() {
        let sets = option_sets();
        assert_eq!(sets.frequencies[0], "2 times per week");
        assert_eq!(sets.durations[3], "45 minutes");
        assert_eq!(sets.conditions[0], "Fall Prevention");
        assert_eq!(sets.risk_factors[3], "Osteoporosis");
        assert_eq!(sets.goals[0], "Improve Balance");
    }
}
