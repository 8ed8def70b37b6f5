//! Constant folding (level 1)
//!
//! A node is foldable only when every input source is `const:`-tagged.
//! Supported folds: `add` and `multiply` (numeric, parsed as float) and
//! `concat` (string). A successful fold replaces the node with a constant:
//! no inputs, a single valued output, zero cost. Any other operation is
//! left untouched; partial coverage is the contract, not an error.

use crate::{Pass, PassParams};
use flowc_ir::{DataType, IrOutput, IrProgram};
use serde_json::Value;

pub struct ConstantFolding;

impl Pass for ConstantFolding {
    fn name(&self) -> &'static str {
        "constant-folding"
    }

    fn level(&self) -> u8 {
        1
    }

    fn run(&self, program: &mut IrProgram, _params: &PassParams) -> Result<usize, String> {
        let mut folded = 0;
        let mut port_seq = 0;

        for node in &mut program.nodes {
            if !node.all_inputs_const() {
                continue;
            }
            let result = {
                let literals: Vec<&str> = node
                    .inputs
                    .iter()
                    .filter_map(|i| i.const_value())
                    .collect();
                match node.operation.as_str() {
                    "add" => fold_numeric(&literals, 0.0, |acc, v| acc + v),
                    "multiply" => fold_numeric(&literals, 1.0, |acc, v| acc * v),
                    "concat" => Some((Value::String(literals.concat()), DataType::String)),
                    _ => None,
                }
            };

            let (value, data_type) = match result {
                Some(r) => r,
                None => continue,
            };

            let port_id = format!("cf{}", port_seq);
            port_seq += 1;
            node.operation = "constant".to_string();
            node.inputs.clear();
            node.outputs = vec![IrOutput::new(port_id, "value", data_type).with_value(value)];
            node.metadata.cost = 0.0;
            node.metadata.complexity = 0.0;
            folded += 1;
        }

        Ok(folded)
    }
}

/// Folds numeric literals; integral results stay JSON integers
fn fold_numeric(
    literals: &[&str],
    init: f64,
    combine: fn(f64, f64) -> f64,
) -> Option<(Value, DataType)> {
    let mut acc = init;
    for literal in literals {
        acc = combine(acc, literal.trim().parse::<f64>().ok()?);
    }
    if acc.fract() == 0.0 && acc.abs() < i64::MAX as f64 {
        Some((Value::from(acc as i64), DataType::Int))
    } else {
        Some((Value::from(acc), DataType::Float))
    }
}
