pub mod prototypal;
pub mod util_inherits;

use serde_json::Value;

use crate::config::DetectConfig;
use crate::detection::{Detection, DetectorKind};
use crate::node_pattern::PatternError;

pub use prototypal::Prototypal;
pub use util_inherits::UtilInheritsMatcher;

/// An inheritance detector. Instances hold per-traversal memory borrowed
/// from the tree being walked, so a detector must never outlive or be
/// reused across trees.
pub trait Detector<'a>: Send {
    fn kind(&self) -> DetectorKind;

    /// Pre-pass hook run on every node before `process`. Returns whether the
    /// node was consumed as detector setup (e.g. an import).
    #[allow(unused_variables)]
    fn discover(
        &mut self,
        node: &'a Value,
        parent: Option<&'a Value>,
    ) -> Result<bool, PatternError> {
        Ok(false)
    }

    /// Inspect one node. `Ok(None)` means the node carries no inheritance
    /// information.
    fn process(
        &mut self,
        node: &'a Value,
        parent: Option<&'a Value>,
    ) -> Result<Option<Detection<'a>>, PatternError>;
}

/// Fresh detector instances for one traversal, in the order they run.
pub fn detectors_for<'a>(config: &DetectConfig) -> Vec<Box<dyn Detector<'a> + 'a>> {
    let mut detectors: Vec<Box<dyn Detector<'a> + 'a>> = Vec::new();
    if config.is_enabled(DetectorKind::UtilInherits) {
        detectors.push(Box::new(UtilInheritsMatcher::new()));
    }
    if config.is_enabled(DetectorKind::Prototypal) {
        detectors.push(Box::new(Prototypal::new()));
    }
    detectors
}
