//! Loan Decision Policy
//!
//! Turns raw classifier output into the decision shown to the applicant,
//! applying the business rules that take precedence over the model.

mod policy;

pub use policy::{Decision, DecisionPolicy, DecisionReason, PredictionResult};
