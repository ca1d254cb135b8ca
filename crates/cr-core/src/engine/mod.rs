//! The recommendation explanation engine.
//!
//! Pure, synchronous request/response computation: one normalized input row
//! in, one assembled report out. Sub-modules mirror the pipeline stages:
//!
//! - [`normalize`]: schema alignment and absent markers
//! - [`ranking`]: top-K selection and trust assessment
//! - [`narrate`]: attribution narration and per-feature impact records
//! - [`advisor`]: directional adjustment suggestions
//! - [`counterfactual`]: cheapest-alternative-class search
//! - [`report`]: orchestration and final assembly

pub mod advisor;
pub mod counterfactual;
pub mod narrate;
pub mod normalize;
pub mod ranking;
pub mod report;

/// Round to `dp` decimal places for reporting.
///
/// All rounding in the engine goes through here so the reported precision
/// (4 dp margins, 5 dp attributions, 2 dp deviations, 1 dp targets) stays in
/// one place.
pub(crate) fn round_to(value: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (value * factor).round() / factor
}
