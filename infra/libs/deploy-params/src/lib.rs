//! Operator-supplied deployment parameters.
//!
//! Everything the provisioning run reads from the outside world lives here:
//! IP allow-lists, identity federation configuration, the maintenance window
//! for the backing relational store, and the context file that carries them.
//! All validation is provisioning-time; nothing in this crate runs per
//! request.

pub mod address;
pub mod context;
pub mod error;
pub mod federation;
pub mod schedule;

pub use address::{AddressFamily, AddressRangeSet};
pub use context::{DeploymentContext, RawContext};
pub use error::{ParamsError, Result};
pub use federation::{CustomProvider, IdentityFederation, IdentityProvider};
pub use schedule::{CronSchedule, MaintenanceWindow};
