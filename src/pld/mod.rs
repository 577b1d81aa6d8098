//! pld — privacy loss distributions: representation, construction, queries.
//!
//! Purpose
//! -------
//! Provide the [`PrivacyLossDistribution`] type together with everything
//! needed to build and validate one: the error type, `(ε, δ)` parameters,
//! discretization options, and the explicit-PMF discretization engine.
//!
//! Key behaviors
//! -------------
//! - [`distribution`]: the PLD value type, `delta`/`epsilon` queries,
//!   composition, and the closed-form factories (privacy parameters,
//!   randomized response).
//! - [`discretization`]: PLDs from two explicit log-PMFs with truncation.
//! - [`options`]: rounding direction and grid width shared by all factories.
//! - [`errors`] / [`validation`]: the crate error type and input checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - Stored histogram masses are strictly positive; `infinity_mass ∈ [0, 1]`.
//! - PLDs compose only with PLDs on the same grid.
//!
//! Downstream usage
//! ----------------
//! - Mechanism-specific PLDs live in [`crate::mechanisms`] and produce
//!   values of this module's [`PrivacyLossDistribution`].
//! - Most callers only need the re-exports below or the [`prelude`].

pub mod discretization;
pub mod distribution;
pub mod errors;
pub mod options;
pub mod params;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::distribution::PrivacyLossDistribution;
pub use self::errors::{PLDError, PLDResult};
pub use self::options::{DiscretizationOptions, EstimateType};
pub use self::params::DifferentialPrivacyParameters;

pub mod prelude {
    pub use super::{
        DifferentialPrivacyParameters, DiscretizationOptions, EstimateType, PLDError, PLDResult,
        PrivacyLossDistribution,
    };
}
