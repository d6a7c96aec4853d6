use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scene::surface::DeviceClass;

/// How the snowman simulation trades collision fidelity for frame budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityMode {
    /// Full collision handling on every frame.
    Full,
    /// Above the governor threshold, every other frame skips pairwise
    /// separation and only reflects off the walls.
    Adaptive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnowConfig {
    pub max_snowmen: usize,
    pub monster_threshold: usize,
    pub initial_snowmen: usize,
    pub flake_count: usize,
    pub auto_spawn_every: Option<Duration>,
    pub governor_threshold: usize,
    pub quality: QualityMode,
    pub click_window: Duration,
    pub bounce_cooldown: Duration,
    pub instructions_delay: Duration,
}

impl SnowConfig {
    #[must_use]
    pub fn for_device(class: DeviceClass) -> Self {
        let shared = Self {
            max_snowmen: 30,
            monster_threshold: 15,
            initial_snowmen: 1,
            flake_count: 250,
            auto_spawn_every: None,
            governor_threshold: 10,
            quality: QualityMode::Adaptive,
            click_window: Duration::from_millis(400),
            bounce_cooldown: Duration::from_secs(1),
            instructions_delay: Duration::from_secs(6),
        };
        match class {
            DeviceClass::Desktop => shared,
            DeviceClass::Constrained => Self {
                max_snowmen: 12,
                monster_threshold: 8,
                governor_threshold: 5,
                flake_count: 80,
                auto_spawn_every: Some(Duration::from_secs(4)),
                ..shared
            },
        }
    }
}

/// User-supplied adjustments layered over the per-device defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnowOverrides {
    pub max_snowmen: Option<usize>,
    pub monster_threshold: Option<usize>,
    pub initial_snowmen: Option<usize>,
    pub quality: Option<QualityMode>,
}

impl SnowOverrides {
    #[must_use]
    pub fn apply(&self, mut config: SnowConfig) -> SnowConfig {
        if let Some(cap) = self.max_snowmen {
            config.max_snowmen = cap.max(1);
        }
        if let Some(threshold) = self.monster_threshold {
            config.monster_threshold = threshold.max(1);
        }
        if let Some(initial) = self.initial_snowmen {
            config.initial_snowmen = initial;
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        config.monster_threshold = config.monster_threshold.min(config.max_snowmen);
        config.initial_snowmen = config.initial_snowmen.min(config.max_snowmen);
        // The governor must engage before the monster clears the field.
        config.governor_threshold = config
            .governor_threshold
            .min(config.monster_threshold.saturating_sub(1));
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constrained_devices_get_smaller_limits_and_auto_spawn() {
        let desktop = SnowConfig::for_device(DeviceClass::Desktop);
        let constrained = SnowConfig::for_device(DeviceClass::Constrained);
        assert!(constrained.max_snowmen < desktop.max_snowmen);
        assert!(constrained.monster_threshold < desktop.monster_threshold);
        assert!(desktop.auto_spawn_every.is_none());
        assert_eq!(constrained.auto_spawn_every, Some(Duration::from_secs(4)));
    }

    #[test]
    fn overrides_keep_threshold_within_cap() {
        let overrides = SnowOverrides {
            max_snowmen: Some(6),
            monster_threshold: Some(10),
            ..SnowOverrides::default()
        };
        let config = overrides.apply(SnowConfig::for_device(DeviceClass::Desktop));
        assert_eq!(config.max_snowmen, 6);
        assert_eq!(config.monster_threshold, 6);
    }

    #[test]
    fn governor_engages_below_the_monster_trigger_on_every_device() {
        for class in [DeviceClass::Desktop, DeviceClass::Constrained] {
            let config = SnowOverrides::default().apply(SnowConfig::for_device(class));
            assert!(
                config.governor_threshold < config.monster_threshold,
                "{class:?}: governor {} trigger {}",
                config.governor_threshold,
                config.monster_threshold
            );
        }
        let constrained = SnowConfig::for_device(DeviceClass::Constrained);
        assert_eq!(constrained.governor_threshold, 5);
    }

    #[test]
    fn lowered_trigger_pulls_the_governor_down_with_it() {
        let overrides = SnowOverrides {
            monster_threshold: Some(4),
            ..SnowOverrides::default()
        };
        let config = overrides.apply(SnowConfig::for_device(DeviceClass::Desktop));
        assert_eq!(config.governor_threshold, 3);
    }
}
