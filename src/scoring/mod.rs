pub mod distribution;
pub mod engine;
mod errors;
pub mod validation;

pub use distribution::{
    coerce_distribution, default_distribution, normalize_distribution, Distribution,
    RawDistribution, RECOGNIZED_PLACEMENTS,
};
pub use engine::{
    check_points_within_max, resolve_score, resolve_score_points, set_captain, PointsSource,
    ScoreResolution,
};
pub use errors::{ScoringError, ScoringResult};
pub use validation::validate_records;
