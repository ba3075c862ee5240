//! Identity-matching engine: enroll named face signatures, recognize new
//! faces against them, and throttle repeated greetings per identity.

pub mod notification;
pub mod pipeline;
pub mod preprocessing;
pub mod recognition;
pub mod shared;
