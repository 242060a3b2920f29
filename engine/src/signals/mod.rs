// Pivots, divergence, levels and scoring built on the indicator library
pub mod divergence;
pub mod levels;
pub mod pivots;
pub mod reversal;
pub mod scanner;
pub mod scorer;

pub use divergence::detect_divergence;
pub use levels::locate_levels;
pub use reversal::evaluate_reversal;
pub use scanner::{rank_top, score_candidate, select_universe};
pub use scorer::{evaluate_signal, IndicatorSnapshot};
