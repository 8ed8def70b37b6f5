//! Semantic optimization (level 2)
//!
//! Specializes nodes whose annotations tie them to the `aggregation`
//! concept with confidence strictly above 0.8: the operation becomes
//! `optimized_aggregate` and the cost is discounted by 30%. Annotator
//! output caps at 0.8, so only higher-confidence annotations (external or
//! hand-attached) trigger this rewrite.

use crate::{Pass, PassParams};
use flowc_ir::IrProgram;

const CONCEPT: &str = "aggregation";
const CONFIDENCE_FLOOR: f64 = 0.8;
const COST_DISCOUNT: f64 = 0.7;

pub struct SemanticOptimization;

impl Pass for SemanticOptimization {
    fn name(&self) -> &'static str {
        "semantic-optimization"
    }

    fn level(&self) -> u8 {
        2
    }

    fn run(&self, program: &mut IrProgram, _params: &PassParams) -> Result<usize, String> {
        let mut rewritten = 0;
        for node in &mut program.nodes {
            let confident = node
                .semantic_annotations
                .iter()
                .any(|a| a.concept == CONCEPT && a.confidence > CONFIDENCE_FLOOR);
            if !confident || node.operation == "optimized_aggregate" {
                continue;
            }
            node.operation = "optimized_aggregate".to_string();
            node.metadata.cost *= COST_DISCOUNT;
            rewritten += 1;
        }
        Ok(rewritten)
    }
}
