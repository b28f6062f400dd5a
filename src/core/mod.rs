pub mod collaborators;
pub mod compare;
pub mod deductions;
pub mod hra;
pub mod profile;
pub mod rebate;
pub mod regime;
pub mod schema;
pub mod slab;
pub mod surcharge;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use collaborators::{
    assess, extract_profile, AdviceError, AdviceGenerator, Assessment, Document,
    DocumentExtractor, Extracted, ExtractedProfile, ExtractionError, UploadPolicy,
};
pub use compare::{
    compare_regimes, compare_regimes_parallel, compute_comparison, compute_regime,
    compute_with_rules, ComparisonResult, RegimeResult,
};
pub use deductions::{
    aggregate_deductions, cap_deduction, AllowedDeduction, DeductionBreakdown, DeductionCategory,
    STANDARD_DEDUCTION,
};
pub use hra::hra_exemption;
pub use profile::{
    AgeBracket, ClaimedDeductions, FinancialProfile, InvalidInputError, Locality, ProfileInput,
    MAX_AMOUNT,
};
pub use rebate::RebateRule;
pub use regime::{Regime, RegimeRules};
pub use schema::{FieldKind, InputField};
pub use slab::{new_regime_schedule, old_regime_schedule, SlabBand, SlabSchedule};
pub use surcharge::{SurchargeSchedule, SurchargeStep, CESS_RATE};
pub use warnings::{profile_warnings, Warning};
