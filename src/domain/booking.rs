mod draft;
mod error;
mod motorcycle;
mod period;
mod pricing;
mod rate;
mod slot;

pub use self::draft::*;
pub use self::error::*;
pub use self::motorcycle::*;
pub use self::period::*;
pub use self::pricing::*;
pub use self::rate::*;
pub use self::slot::*;
