//! Loop optimization (level 3)
//!
//! Two rewrites on loop nodes:
//! - unroll when the `iterator` input is constant and at most the unroll
//!   limit (default 10, overridable via the `unrollLimit` pass parameter)
//! - vectorize when the loop is parallelizable and not already unrolled
//!
//! Either rewrite raises the node's optimization level to 2.

use crate::{Pass, PassParams};
use flowc_ir::{IrProgram, NodeKind};

const DEFAULT_UNROLL_LIMIT: f64 = 10.0;
const REWRITE_LEVEL: u8 = 2;

pub struct LoopOptimization;

impl Pass for LoopOptimization {
    fn name(&self) -> &'static str {
        "loop-optimization"
    }

    fn level(&self) -> u8 {
        3
    }

    fn run(&self, program: &mut IrProgram, params: &PassParams) -> Result<usize, String> {
        let unroll_limit = params
            .get("unrollLimit")
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_UNROLL_LIMIT);

        let mut rewritten = 0;
        for node in &mut program.nodes {
            if node.kind != NodeKind::Loop {
                continue;
            }
            let trip_count = node
                .input("iterator")
                .and_then(|i| i.const_value())
                .and_then(|v| v.trim().parse::<f64>().ok());

            match trip_count {
                Some(count) if count <= unroll_limit => {
                    node.operation = "unrolled_loop".to_string();
                    node.raise_optimization_level(REWRITE_LEVEL);
                    rewritten += 1;
                }
                _ if node.parallelizable && node.operation != "unrolled_loop" => {
                    node.operation = "vectorized_loop".to_string();
                    node.raise_optimization_level(REWRITE_LEVEL);
                    rewritten += 1;
                }
                _ => {}
            }
        }
        Ok(rewritten)
    }
}
