use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier the browser assigns to a tab. Unique among open tabs; the host
/// may reuse an id after the original tab closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Server verdict for a URL, carried as a numeric code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficLight {
    Unknown,
    Safe,
    Caution,
    Danger,
}

impl TrafficLight {
    /// Codes outside 1-3 render gray, same as the original extension.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => TrafficLight::Safe,
            2 => TrafficLight::Caution,
            3 => TrafficLight::Danger,
            _ => TrafficLight::Unknown,
        }
    }
}

/// One completed analysis for a URL. Replaced wholesale if the tab is
/// reclassified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub score: f64,
    pub light: TrafficLight,
    pub received_at: DateTime<Utc>,
}

/// What the result store holds per tab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TabResult {
    Classified(Classification),
    /// The server answered 200 but the body carried no usable verdict.
    Inconclusive,
}

impl TabResult {
    pub fn indicator(&self) -> IndicatorState {
        match self {
            TabResult::Classified(classification) => classification.light.into(),
            TabResult::Inconclusive => IndicatorState::Error,
        }
    }
}

/// Everything the toolbar indicator can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Unknown,
    Safe,
    Caution,
    Danger,
    Error,
}

impl From<TrafficLight> for IndicatorState {
    fn from(light: TrafficLight) -> Self {
        match light {
            TrafficLight::Unknown => IndicatorState::Unknown,
            TrafficLight::Safe => IndicatorState::Safe,
            TrafficLight::Caution => IndicatorState::Caution,
            TrafficLight::Danger => IndicatorState::Danger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_light_codes_map_to_variants() {
        assert_eq!(TrafficLight::from_code(1), TrafficLight::Safe);
        assert_eq!(TrafficLight::from_code(2), TrafficLight::Caution);
        assert_eq!(TrafficLight::from_code(3), TrafficLight::Danger);
    }

    #[test]
    fn out_of_range_codes_fall_back_to_unknown() {
        assert_eq!(TrafficLight::from_code(0), TrafficLight::Unknown);
        assert_eq!(TrafficLight::from_code(-1), TrafficLight::Unknown);
        assert_eq!(TrafficLight::from_code(42), TrafficLight::Unknown);
    }

    #[test]
    fn inconclusive_results_surface_as_error() {
        assert_eq!(TabResult::Inconclusive.indicator(), IndicatorState::Error);
    }
}
