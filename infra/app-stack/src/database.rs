//! Maintenance scheduler for the backing relational store.
//!
//! The store itself is provisioned elsewhere; this only declares the paired
//! stop/start event rules from the operator's cron window. No window, no
//! resources.

use deploy_params::MaintenanceWindow;
use serde_json::json;
use synth_graph::{Resource, Stack};
use tracing::info;

use crate::error::Result;

pub fn declare_maintenance(stack: &mut Stack, window: &MaintenanceWindow) -> Result<()> {
    if !window.has_schedule() {
        return Ok(());
    }
    // validated() guarantees both halves once has_schedule() holds.
    let (start, stop) = match (&window.start, &window.stop) {
        (Some(start), Some(stop)) => (start, stop),
        _ => return Ok(()),
    };

    stack.add_resource(Resource::new(
        "DatabaseStopRule",
        "AWS::Events::Rule",
        json!({
            "scheduleExpression": stop.expression(),
            "action": "stop-database",
        }),
    ))?;
    stack.add_resource(Resource::new(
        "DatabaseStartRule",
        "AWS::Events::Rule",
        json!({
            "scheduleExpression": start.expression(),
            "action": "start-database",
        }),
    ))?;

    info!(
        stop = %stop.expression(),
        start = %start.expression(),
        "declared database maintenance window"
    );
    Ok(())
}
