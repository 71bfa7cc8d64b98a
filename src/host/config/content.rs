use serde::Deserialize;

use crate::domain::entity::{PhaseDuration, ScheduleConfig};

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    pub schedule: ScheduleContent,
    pub notification: NotificationContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleContent {
    pub intervals: u32,
    pub rest_before_start: bool,
    pub rest_enabled: bool,
    pub work: PhaseDuration,
    pub rest: PhaseDuration,
}

impl Default for ScheduleContent {
    fn default() -> Self {
        ScheduleConfig::default().into()
    }
}

impl From<ScheduleConfig> for ScheduleContent {
    fn from(config: ScheduleConfig) -> Self {
        Self {
            intervals: config.work_intervals,
            rest_before_start: config.rest_before_start,
            rest_enabled: config.rest_enabled,
            work: config.work_duration,
            rest: config.rest_duration,
        }
    }
}

impl From<ScheduleContent> for ScheduleConfig {
    fn from(content: ScheduleContent) -> Self {
        Self {
            work_intervals: content.intervals,
            work_duration: content.work,
            rest_duration: content.rest,
            rest_before_start: content.rest_before_start,
            rest_enabled: content.rest_enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationContent {
    pub enabled: bool,
    /// Shown when the whole run completed.
    pub run_summary: String,
    pub run_body: Option<String>,
}

impl Default for NotificationContent {
    fn default() -> Self {
        Self {
            enabled: true,
            run_summary: "Timer done!".to_owned(),
            run_body: None,
        }
    }
}
