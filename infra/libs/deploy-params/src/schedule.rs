/// Cron-style maintenance window for the backing relational store.
use serde::{Deserialize, Serialize};

use crate::error::{ParamsError, Result};

/// One cron expression, field by field. Unset fields default to `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_day: Option<String>,
}

impl CronSchedule {
    /// Render the scheduler expression consumed by the event rule resource.
    pub fn expression(&self) -> String {
        let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "*".to_string());
        format!(
            "cron({} {} {} {} {} *)",
            field(&self.minute),
            field(&self.hour),
            field(&self.day),
            field(&self.month),
            field(&self.week_day),
        )
    }
}

/// Paired stop/start schedules. Either both are configured or neither is:
/// a stop without a start would leave the store down indefinitely, so a
/// partial window fails context loading instead of provisioning half a pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<CronSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<CronSchedule>,
}

impl MaintenanceWindow {
    pub fn validated(self) -> Result<Self> {
        match (&self.start, &self.stop) {
            (Some(_), None) => Err(ParamsError::PartialMaintenanceWindow("start")),
            (None, Some(_)) => Err(ParamsError::PartialMaintenanceWindow("stop")),
            _ => Ok(self),
        }
    }

    pub fn has_schedule(&self) -> bool {
        self.start.is_some() && self.stop.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_defaults_to_wildcards() {
        assert_eq!(CronSchedule::default().expression(), "cron(* * * * * *)");
    }

    #[test]
    fn expression_uses_configured_fields() {
        let cron = CronSchedule {
            minute: Some("0".into()),
            hour: Some("22".into()),
            week_day: Some("MON-FRI".into()),
            ..Default::default()
        };
        assert_eq!(cron.expression(), "cron(0 22 * * MON-FRI *)");
    }

    #[test]
    fn partial_window_rejected() {
        let only_stop = MaintenanceWindow {
            stop: Some(CronSchedule::default()),
            start: None,
        };
        assert!(only_stop.validated().is_err());

        let only_start = MaintenanceWindow {
            stop: None,
            start: Some(CronSchedule::default()),
        };
        assert!(only_start.validated().is_err());
    }

    #[test]
    fn full_or_empty_window_accepted() {
        assert!(!MaintenanceWindow::default().validated().unwrap().has_schedule());

        let full = MaintenanceWindow {
            stop: Some(CronSchedule::default()),
            start: Some(CronSchedule::default()),
        };
        assert!(full.validated().unwrap().has_schedule());
    }
}
