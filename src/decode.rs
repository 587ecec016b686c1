use anyhow::Result;
use num::complex::Complex64;

use crate::graph::Differentiable;
use crate::matrix::Matrix;
use crate::train::Trainer;
use crate::update::Update;

/// Column of the largest magnitude in every row of `output`. Ties keep the
/// lowest column.
pub fn argmax(output: &Matrix<Complex64>) -> Vec<usize> {
    (0..output.rows)
        .map(|i| {
            let mut max = 0.0;
            let mut max_j = 0;

            for (j, value) in output.row(i).iter().enumerate() {
                let v = value.norm();
                if v > max {
                    max = v;
                    max_j = j;
                }
            }

            max_j
        })
        .collect()
}

/// Two digit binary code of `index`.
pub fn bits(index: usize) -> String {
    format!("{index:02b}")
}

/// Re-run the forward pass of `trainer` and decode every row.
pub fn decode<D, U>(trainer: &Trainer<D, U>) -> Result<Vec<String>>
where
    D: Differentiable,
    U: Update,
{
    let hidden = trainer.hidden()?;
    Ok(argmax(&hidden).into_iter().map(bits).collect())
}
