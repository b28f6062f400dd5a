//! Salary income tax under the Old and New regimes.
//!
//! [`crate::core::compute_comparison`] validates a raw [`crate::core::ProfileInput`],
//! computes both regimes and recommends the cheaper one. Everything in
//! [`crate::core`] is pure and synchronous.

pub mod core;
