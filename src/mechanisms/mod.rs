//! mechanisms — privacy loss distributions of additive-noise mechanisms.
//!
//! Purpose
//! -------
//! Describe the Laplace, Gaussian, and discrete Laplace mechanisms through
//! one capability trait and turn any of them into a discretized
//! [`PrivacyLossDistribution`](crate::pld::PrivacyLossDistribution) with a
//! single shared routine.
//!
//! Key behaviors
//! -------------
//! - [`traits`]: [`AdditiveNoiseMechanism`], [`NoiseKind`], and
//!   [`TailPrivacyLossDistribution`].
//! - [`construction`]: [`discretize_additive_noise`], the shared
//!   tail-seeding plus body-walking discretization.
//! - [`laplace`], [`gaussian`], [`discrete_laplace`]: closed-form losses,
//!   inverses, CDFs, tails, and guarantee-based factories.
//! - [`search`]: Gaussian standard-deviation calibration.
//! - [`additive`]: [`AdditiveNoisePrivacyLoss`], a mechanism bundled with
//!   its PLD, answering `delta` queries exactly.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every mechanism has a strictly positive sensitivity and a privacy loss
//!   that is non-increasing in the noise value.
//!
//! Testing notes
//! -------------
//! - Per-family unit tests check the closed forms against direct
//!   computations; construction tests check mass conservation and that the
//!   pessimistic and optimistic PLDs bracket the exact delta.

pub mod additive;
pub mod construction;
pub mod discrete_laplace;
pub mod gaussian;
pub mod laplace;
pub mod search;
pub mod traits;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::additive::{
    AdditiveNoisePrivacyLoss, DiscreteLaplacePrivacyLoss, GaussianPrivacyLoss, LaplacePrivacyLoss,
};
pub use self::construction::discretize_additive_noise;
pub use self::discrete_laplace::DiscreteLaplaceMechanism;
pub use self::gaussian::GaussianMechanism;
pub use self::laplace::LaplaceMechanism;
pub use self::search::{SearchOptions, minimal_standard_deviation};
pub use self::traits::{AdditiveNoiseMechanism, NoiseKind, TailPrivacyLossDistribution};
