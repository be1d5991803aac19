//! Recognizes pre-ES6 inheritance idioms in ESTree syntax trees:
//!
//! ```js
//! Dog.prototype = Object.create(Animal.prototype);
//! Dog.prototype = new Animal();
//! Dog.prototype.constructor = Dog;
//! util.inherits(Dog, Animal);
//! ```
//!
//! and reports each class/superclass pair together with the statements that
//! encode it, for a rewriter to turn into `class Dog extends Animal`.
//!
//! Trees are plain `serde_json::Value`s in ESTree shape, as produced by any
//! ESTree-compatible JavaScript parser.

pub mod analyzer;
pub mod config;
pub mod detect;
pub mod detection;
pub mod js;
pub mod node_pattern;
pub mod walker;

#[cfg(test)]
pub mod testutil;

pub use analyzer::{analyze, analyze_many, analyze_program, AnalysisResult};
pub use config::DetectConfig;
pub use detection::{Detection, DetectorKind, RelatedExpression};
