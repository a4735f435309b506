/*!
 * Core Module
 * Fundamental types, clock, limits and error handling
 */

pub mod clock;
pub mod errors;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use clock::{system_clock, Clock, ManualClock, SystemClock};
pub use errors::*;
pub use types::*;
