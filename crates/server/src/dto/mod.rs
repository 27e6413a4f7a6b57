mod calculation;
mod passport;
mod station;

pub use calculation::*;
pub use passport::*;
pub use station::*;
