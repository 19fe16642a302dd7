use serde::{Deserialize, Serialize};

/// Escalation cut-offs. Index bounds are exclusive upper limits (`score < bound`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub self_help_below: u8,
    pub counselor_below: u8,
    pub sustained_window: usize,
    pub mental_health_below: u8,
    pub parent_below: u8,
    pub crisis_mental_health_below: u8,
    pub crisis_lifestyle_below: u8,
    pub crisis_index_below: u8,
    pub crisis_min_flags: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            self_help_below: 70,
            counselor_below: 40,
            sustained_window: 3,
            mental_health_below: 40,
            parent_below: 30,
            crisis_mental_health_below: 30,
            crisis_lifestyle_below: 30,
            crisis_index_below: 25,
            crisis_min_flags: 2,
        }
    }
}
