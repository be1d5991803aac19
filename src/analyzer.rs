use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::Value;

use crate::config::DetectConfig;
use crate::detect::detectors_for;
use crate::detection::{Detection, DetectorKind};
use crate::walker::{walk, DetectorWalker};

pub struct AnalysisResult<'a> {
    pub detections: Vec<Detection<'a>>,
    pub node_count: usize,
}

impl AnalysisResult<'_> {
    pub fn count(&self, kind: DetectorKind) -> usize {
        self.detections.iter().filter(|d| d.kind == kind).count()
    }
}

/// Run the enabled detectors over one program tree in document order.
///
/// Detector memory lives only for this call, so class names seen in one tree
/// never leak into another.
pub fn analyze_program<'a>(
    program: &'a Value,
    config: &DetectConfig,
) -> Result<AnalysisResult<'a>> {
    let start = Instant::now();
    let mut walker = DetectorWalker::new(detectors_for(config), config.debug);
    walk(program, &mut walker)?;

    let result = AnalysisResult {
        detections: walker.detections,
        node_count: walker.node_count,
    };

    if config.debug {
        eprintln!(
            "debug: visited {} nodes in {:.0?}",
            result.node_count,
            start.elapsed()
        );
        for kind in [DetectorKind::UtilInherits, DetectorKind::Prototypal] {
            if config.is_enabled(kind) {
                eprintln!("debug:   {kind}: {} detections", result.count(kind));
            }
        }
    }

    Ok(result)
}

/// Detections for one program tree.
pub fn analyze<'a>(program: &'a Value, config: &DetectConfig) -> Result<Vec<Detection<'a>>> {
    Ok(analyze_program(program, config)?.detections)
}

/// Analyze independent trees in parallel, each with its own detectors.
/// Results come back in input order.
pub fn analyze_many<'a>(
    programs: &'a [Value],
    config: &DetectConfig,
) -> Result<Vec<AnalysisResult<'a>>> {
    programs
        .par_iter()
        .enumerate()
        .map(|(i, program)| {
            analyze_program(program, config)
                .with_context(|| format!("failed to analyze tree #{i}"))
        })
        .collect()
}
