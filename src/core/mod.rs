//! Foundational value types shared by every calculator.

pub mod department;
pub mod input;
pub mod money;
