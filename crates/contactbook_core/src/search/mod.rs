//! Query builders for contact search and birthday windows.
//!
//! # Responsibility
//! - Translate search criteria and a reference date into SQL predicates.
//! - Keep the compatible and corrected matching policies side by side.

pub mod birthdays;
pub mod filter;
