use serde::Serialize;

use crate::domain::IndicatorState;

/// Toolbar icon assets for one traffic-light color, keyed by pixel size the way
/// the browser's `setIcon` call expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconSet {
    #[serde(rename = "16")]
    pub size_16: &'static str,
    #[serde(rename = "32")]
    pub size_32: &'static str,
    #[serde(rename = "48")]
    pub size_48: &'static str,
}

pub const GRAY_ICONS: IconSet = IconSet {
    size_16: "icons/gray_16.png",
    size_32: "icons/gray_32.png",
    size_48: "icons/gray_48.png",
};

pub const GREEN_ICONS: IconSet = IconSet {
    size_16: "icons/green_16.png",
    size_32: "icons/green_32.png",
    size_48: "icons/green_48.png",
};

pub const YELLOW_ICONS: IconSet = IconSet {
    size_16: "icons/yellow_16.png",
    size_32: "icons/yellow_32.png",
    size_48: "icons/yellow_48.png",
};

pub const RED_ICONS: IconSet = IconSet {
    size_16: "icons/red_16.png",
    size_32: "icons/red_32.png",
    size_48: "icons/red_48.png",
};

/// Total mapping from indicator state to assets; a new state fails to compile
/// until it gets an arm here.
pub fn icon_for(state: IndicatorState) -> IconSet {
    match state {
        IndicatorState::Unknown => GRAY_ICONS,
        IndicatorState::Safe => GREEN_ICONS,
        IndicatorState::Caution => YELLOW_ICONS,
        IndicatorState::Danger => RED_ICONS,
        // No dedicated error asset; the failed state shows gray like the
        // original extension.
        IndicatorState::Error => GRAY_ICONS,
    }
}

/// Capability to push an icon set to the browser toolbar. Injected into the
/// controller so tests can observe renders without a host attached.
pub trait IconSink: Send + Sync {
    fn show(&self, icons: IconSet);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_map_to_their_color() {
        assert_eq!(icon_for(IndicatorState::Safe), GREEN_ICONS);
        assert_eq!(icon_for(IndicatorState::Caution), YELLOW_ICONS);
        assert_eq!(icon_for(IndicatorState::Danger), RED_ICONS);
    }

    #[test]
    fn unknown_and_error_both_render_gray() {
        assert_eq!(icon_for(IndicatorState::Unknown), GRAY_ICONS);
        assert_eq!(icon_for(IndicatorState::Error), GRAY_ICONS);
    }
}
