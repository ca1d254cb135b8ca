//! Report assembly.
//!
//! Orchestrates the pipeline across the top-K predictions and composes the
//! final structured result plus the plain-text narrative. Sparse inputs
//! degrade to caveat text; only malformed input fails the request.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::EngineContext;
use crate::engine::advisor::{suggest_adjustments, Adjustment};
use crate::engine::counterfactual::{self, CounterfactualSuggestion};
use crate::engine::narrate::{narrate, FeatureImpact};
use crate::engine::normalize::{normalize, InputRow, NormalizedInput};
use crate::engine::ranking::{assess_trust, rank_top_k, TrustAssessment, DEFAULT_TOP_K};
use crate::engine::round_to;
use crate::plot::{image_filename, reset_output_dir, PlotRenderer, WaterfallChart, WaterfallEntry};
use cr_common::{Error, Result};

/// Fixed preamble of the narrative report.
const PREAMBLE: &str = "As per our prediction:\n";

/// Where plot artifacts go, and what renders them.
pub struct PlotSink<'a> {
    pub dir: &'a Path,
    pub renderer: &'a dyn PlotRenderer,
}

/// One fully-explained ranked prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPrediction {
    /// 1-based rank.
    pub rank: u32,
    /// Class label.
    pub crop: String,
    /// Probability rounded to 4 decimals.
    pub probability: f64,
    /// Narrative paragraph for this class.
    pub report: String,
    /// Complete per-feature explanation payload.
    pub feature_impact: Vec<FeatureImpact>,
    /// Directional suggestions for modifiable, present features.
    pub suggestions: Vec<Adjustment>,
    /// Written image artifact, when rendering succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

/// Complete structured recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Ranked predictions, strongest first.
    pub top_predictions: Vec<RankedPrediction>,
    /// Full narrative text.
    pub full_report: String,
    /// Confidence margin classification.
    pub trust: TrustAssessment,
    /// Cheapest alternative class, if computable.
    pub counterfactual: CounterfactualSuggestion,
    /// Display names of features absent from the input, in schema order.
    pub missing_features: Vec<String>,
}

/// Generate a recommendation for one input row.
///
/// The engine is deterministic: identical input against an unchanged context
/// yields byte-identical structured output.
pub fn generate_recommendation(
    ctx: &EngineContext,
    row: &InputRow,
    plots: Option<PlotSink<'_>>,
) -> Result<Recommendation> {
    let catalog = ctx.catalog();
    let input = normalize(catalog, row)?;

    let probs = ctx.classifier().predict_proba(&input)?;
    let ranked = rank_top_k(ctx.bundle(), &probs, DEFAULT_TOP_K)?;
    let trust = assess_trust(&ranked);

    let attributions = ctx.explainer().explain(&input)?;
    attributions.validate(catalog.len(), ctx.bundle().num_classes())?;

    // Directory reset is part of the best-effort plotting side; a failure
    // here degrades to a text-only report, it does not abort.
    let plots = match plots {
        Some(sink) => match reset_output_dir(sink.dir) {
            Ok(_) => Some(sink),
            Err(e) => {
                warn!(error = %e, "output directory reset failed; skipping plots");
                None
            }
        },
        None => None,
    };

    let mut report_lines = vec![PREAMBLE.to_string()];
    let mut top_predictions = Vec::with_capacity(ranked.len());

    for (i, entry) in ranked.iter().enumerate() {
        let rank = (i + 1) as u32;
        let (class_attributions, baseline) = attributions.for_class(entry.index);
        let narrative = narrate(catalog, &input, class_attributions)?;

        let means = ctx.profile().get(&entry.label).ok_or_else(|| {
            Error::DatasetInvalid {
                line: 0,
                reason: format!("reference profile lost class '{}'", entry.label),
            }
        })?;
        let suggestions = suggest_adjustments(catalog, &input, means);

        let probability = round_to(entry.probability, 4);
        let text = prediction_text(&entry.label, probability, &narrative, &suggestions);
        report_lines.push(text.clone());

        let image_path = plots.as_ref().and_then(|sink| {
            render_class_plot(sink, &entry.label, baseline, &narrative.impacts, &input)
        });

        debug!(rank, crop = %entry.label, probability, "ranked prediction assembled");
        top_predictions.push(RankedPrediction {
            rank,
            crop: entry.label.clone(),
            probability,
            report: text,
            feature_impact: narrative.impacts,
            suggestions,
            image_path,
        });
    }

    let missing_features: Vec<String> = input
        .missing_displays(catalog)
        .into_iter()
        .map(str::to_string)
        .collect();
    if !missing_features.is_empty() {
        report_lines.push(format!(
            "NOTE: This prediction was made in absence of {}. For more accurate results, please rerun.",
            missing_features.join(", ")
        ));
    }

    // Computed once, independent of K, against the rank-1 class. A
    // single-class bundle has no alternatives; degrade, not error.
    let counterfactual = match ranked.first() {
        Some(top) if ctx.bundle().num_classes() >= 2 => {
            counterfactual::search(catalog, &input, ctx.profile(), &top.label)
        }
        _ => CounterfactualSuggestion::none(),
    };

    Ok(Recommendation {
        top_predictions,
        full_report: report_lines.join("\n\n"),
        trust,
        counterfactual,
        missing_features,
    })
}

/// Narrative paragraph for one ranked class. The "consider" clause is
/// omitted entirely when there are no suggestions, rather than emitting a
/// dangling list.
fn prediction_text(
    crop: &str,
    probability: f64,
    narrative: &crate::engine::narrate::Narrative,
    suggestions: &[Adjustment],
) -> String {
    let mut text = format!(
        "{} is suggested with a probability of {:.2}%. {} {}",
        crop,
        probability * 100.0,
        narrative.supporting,
        narrative.hindering,
    );
    if !suggestions.is_empty() {
        let lines: Vec<String> = suggestions.iter().map(Adjustment::text).collect();
        text.push_str(&format!(
            " For better results, consider :\n{}.",
            lines.join("\n")
        ));
    }
    text
}

/// Best-effort waterfall render for one class. Returns the written path, or
/// None after logging the failure.
fn render_class_plot(
    sink: &PlotSink<'_>,
    label: &str,
    baseline: f64,
    impacts: &[FeatureImpact],
    input: &NormalizedInput,
) -> Option<String> {
    let path = sink.dir.join(image_filename(label));
    let chart = WaterfallChart {
        title: label.to_string(),
        baseline,
        entries: impacts
            .iter()
            .enumerate()
            .map(|(i, impact)| WaterfallEntry {
                label: impact.feature.clone(),
                value: impact.attribution,
                raw: input.value(i).value(),
            })
            .collect(),
    };
    match sink.renderer.render_waterfall(&path, &chart) {
        Ok(()) => Some(path.display().to_string()),
        Err(e) => {
            warn!(crop = %label, error = %e, "plot rendering failed; report proceeds without image");
            None
        }
    }
}
