//! Carbon passport engine.
//!
//! Turns station-to-station rail legs into distances, CO2 estimates and
//! aggregate "passport" summaries. Everything in this crate except the
//! [`gateway`] module is pure, synchronous computation over an immutable
//! station [`repository::Repository`], so it can be shared freely between
//! request handlers.

pub mod assembler;
pub mod emissions;
pub mod form;
pub mod gateway;
pub mod passport;
pub mod repository;
pub mod shared;

pub mod prelude {
    pub use crate::assembler::{Assembly, Leg, LegError, assemble};
    pub use crate::emissions::{
        Co2Emissions, TransportMode, emissions_for, savings_percentage, trees_equivalent,
    };
    pub use crate::gateway::{Gateway, MemoryGateway};
    pub use crate::passport::{
        DisplayOptions, ImpactTier, Passport, PassportDisplayData, Route, ShareHash, to_display,
    };
    pub use crate::repository::{Repository, Station};
    pub use crate::shared::{Coordinate, Distance, Locale};
}
