//! Subscription Runtime - the async half of the subscription form
//!
//! * [`SubscriptionForm`]: the state machine
//! * [`smoother`]: minimum-duration helpers for the loading indicator
//! * [`View`]: what the presentation layer renders
//! * [`sim`]: an in-process gateway for demos and tests

pub mod machine;
pub mod sim;
pub mod smoother;
mod task;
pub mod view;

pub mod prelude {
    pub use crate::machine::SubscriptionForm;
    pub use crate::sim::{Behavior, SimulatedGateway};
    pub use crate::smoother::{run_with_floor, run_with_floor_since};
    pub use crate::view::{Indicator, View};
    pub use subscription_core::prelude::*;
}

pub use machine::SubscriptionForm;
pub use smoother::{run_with_floor, run_with_floor_since};
pub use view::{Indicator, View};
