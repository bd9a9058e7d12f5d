//! ld-assess: damage metrics, damage-level assessment and engagement
//! effectiveness.
//!
//! Every step is a pure function over already computed results; none ever
//! calls back into a solver.

pub mod assessment;
pub mod domains;
pub mod effectiveness;
pub mod error;
pub mod metrics;
pub mod policy;

pub use assessment::{AssessmentInput, Indicators, assess};
pub use domains::{DomainCriteria, classify_domains};
pub use effectiveness::{
    EffectivenessComparison, EffectivenessMetrics, EffectivenessParams, EffectivenessRating,
    calculate_effectiveness, compare_effectiveness,
};
pub use error::{AssessError, AssessResult};
pub use metrics::{NOMINAL_MELT_DEPTH_MM, derive_damage_metrics, persist_damage_metrics};
pub use policy::AssessmentPolicy;
