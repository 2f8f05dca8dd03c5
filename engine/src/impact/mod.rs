//! Impact Module
//!
//! Ground impacts and the ripples they leave in the grass.

pub mod bus;
pub mod drops;
pub mod ring;
pub mod ripple;

pub use bus::{DEFAULT_IMPACT_STRENGTH, ImpactBus, ImpactEvent};
pub use drops::{DropScheduler, FallingDrop, GRAVITY};
pub use ring::{IMPACT_CAPACITY, Impact, ImpactRing};
pub use ripple::{MIN_RIPPLE_STRENGTH, RippleParams, ripple_displacement, total_displacement};
