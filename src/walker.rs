use anyhow::{Context, Result};
use serde_json::Value;

use crate::detect::Detector;
use crate::detection::Detection;
use crate::js::node_type;

/// Callback for `walk`, invoked once per node in document order.
pub trait Visit<'a> {
    type Error;

    fn visit_node(&mut self, node: &'a Value, parent: Option<&'a Value>) -> Result<(), Self::Error>;
}

/// A node is any JSON object carrying a string `type` tag.
pub fn is_node(value: &Value) -> bool {
    value.is_object() && node_type(value).is_some()
}

/// Visit every node under `root` (root included) in document order.
///
/// `parent` is the nearest enclosing node; arrays and untyped objects such as
/// `loc` are transparent. Stops at the first visitor error.
pub fn walk<'a, V: Visit<'a>>(root: &'a Value, visitor: &mut V) -> Result<(), V::Error> {
    let mut stack: Vec<(&'a Value, Option<&'a Value>)> = vec![(root, None)];
    while let Some((value, parent)) = stack.pop() {
        let enclosing = if is_node(value) {
            visitor.visit_node(value, parent)?;
            Some(value)
        } else {
            parent
        };
        match value {
            Value::Object(map) => {
                for child in map.values().rev() {
                    if child.is_object() || child.is_array() {
                        stack.push((child, enclosing));
                    }
                }
            }
            Value::Array(items) => {
                for child in items.iter().rev() {
                    if child.is_object() || child.is_array() {
                        stack.push((child, enclosing));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Runs a set of detectors over every node, collecting detections.
pub struct DetectorWalker<'a> {
    pub detectors: Vec<Box<dyn Detector<'a> + 'a>>,
    pub detections: Vec<Detection<'a>>,
    pub node_count: usize,
    pub debug: bool,
}

impl<'a> DetectorWalker<'a> {
    pub fn new(detectors: Vec<Box<dyn Detector<'a> + 'a>>, debug: bool) -> Self {
        Self {
            detectors,
            detections: Vec::new(),
            node_count: 0,
            debug,
        }
    }
}

impl<'a> Visit<'a> for DetectorWalker<'a> {
    type Error = anyhow::Error;

    fn visit_node(&mut self, node: &'a Value, parent: Option<&'a Value>) -> Result<()> {
        self.node_count += 1;
        let index = self.node_count;
        let at = || format!("{} node #{index}", node_type(node).unwrap_or("untyped"));
        for detector in &mut self.detectors {
            let kind = detector.kind();
            if detector
                .discover(node, parent)
                .with_context(|| format!("{kind} detector pattern error at {}", at()))?
            {
                if self.debug {
                    eprintln!("debug: {kind}: import recognized at node #{}", self.node_count);
                }
                return Ok(());
            }
            if let Some(detection) = detector
                .process(node, parent)
                .with_context(|| format!("{kind} detector pattern error at {}", at()))?
            {
                self.detections.push(detection);
                return Ok(());
            }
        }
        Ok(())
    }
}
