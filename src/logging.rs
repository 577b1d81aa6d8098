//! Structured logging for the iterative parts of the crate.
//!
//! The only long-running routine is the Gaussian standard-deviation search;
//! it takes a `slog::Logger` from [`search_logger`]. With the `obs_slog`
//! feature enabled and `verbose == true` this is a non-blocking terminal
//! logger (`slog-term` behind `slog-async`); otherwise every record is
//! discarded, so call sites log unconditionally.
#[cfg(feature = "obs_slog")]
use slog::Drain;
use slog::{Discard, Logger, o};

/// Logger for the standard-deviation search.
///
/// Records carry the key `"search" => "gaussian_standard_deviation"`.
pub fn search_logger(verbose: bool) -> Logger {
    #[cfg(feature = "obs_slog")]
    if verbose {
        let decorator = slog_term::TermDecorator::new().build();
        let drain = slog_term::FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        return Logger::root(drain, o!("search" => "gaussian_standard_deviation"));
    }
    #[cfg(not(feature = "obs_slog"))]
    let _ = verbose;
    Logger::root(Discard, o!("search" => "gaussian_standard_deviation"))
}
