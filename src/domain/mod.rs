mod insured;
mod money;
mod params;
mod rates;

pub use insured::*;
pub use money::*;
pub use params::*;
pub use rates::*;
