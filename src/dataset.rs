use anyhow::Result;
use num::complex::Complex64;
use num::Zero;

use crate::graph::TensorId;
use crate::graph::TensorSet;

/// Width of a one-hot row, one slot per 2-bit code.
pub const WIDTH: usize = 4;

/// Two input bits followed by two output bits.
pub type Sample = [u8; 4];

/// The truth table the network learns.
pub const SAMPLES: [Sample; 4] = [
    [0, 0, 0, 0],
    [0, 1, 0, 1],
    [1, 0, 1, 1],
    [1, 1, 1, 0],
];

/// Slot of the 2-bit code `(high << 1) | low`.
pub fn code(high: u8, low: u8) -> usize {
    (((1 & high) << 1) | (1 & low)) as usize
}

/// A row with `1 + 0i` at `index` and zero elsewhere.
pub fn one_hot(index: usize) -> [Complex64; WIDTH] {
    let mut row = [Complex64::zero(); WIDTH];
    row[index] = Complex64::new(1.0, 0.0);
    row
}

/// Register `inputs` and `outputs` in `set` and fill them from `samples`,
/// one one-hot row per sample.
pub fn encode(set: &mut TensorSet, samples: &[Sample]) -> Result<(TensorId, TensorId)> {
    let inputs = set.add("inputs", WIDTH, samples.len(), false)?;
    let outputs = set.add("outputs", WIDTH, samples.len(), false)?;

    for sample in samples {
        let x = code(sample[0], sample[1]);
        set.tensor_mut(inputs).value.push_row(&one_hot(x));

        let y = code(sample[2], sample[3]);
        set.tensor_mut(outputs).value.push_row(&one_hot(y));
    }

    Ok((inputs, outputs))
}
