//! Button and relay drivers over `embedded-hal` digital traits.

pub mod button;
pub mod pump;
