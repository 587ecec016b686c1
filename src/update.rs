use num::complex::Complex64;
use num::Zero;

/// Implement this trait to plug a custom update rule into the trainer.
pub trait Update {
    /// Move `values` against `grads`. `slot` identifies the learnable tensor
    /// so stateful rules can keep one buffer per tensor.
    fn step(
        &mut self,
        slot: usize,
        values: &mut [Complex64],
        grads: &[Complex64],
        eta: Complex64,
        scaling: f64,
    );
}

/// Builtin update rules.
#[derive(Default, Debug, Clone)]
pub enum UpdateVariant {
    /// `w -= eta * d * scaling`
    #[default]
    Gradient,
    /// `delta = alpha * delta - eta * d * scaling; w += delta`
    Momentum {
        alpha: Complex64,
        deltas: Vec<Vec<Complex64>>,
    },
}

impl UpdateVariant {
    pub fn momentum(alpha: f64) -> Self {
        Self::Momentum {
            alpha: Complex64::new(alpha, 0.0),
            deltas: Vec::new(),
        }
    }
}

impl Update for UpdateVariant {
    fn step(
        &mut self,
        slot: usize,
        values: &mut [Complex64],
        grads: &[Complex64],
        eta: Complex64,
        scaling: f64,
    ) {
        use UpdateVariant::*;

        match self {
            Gradient => {
                for (w, &d) in values.iter_mut().zip(grads.iter()) {
                    *w -= eta * d * scaling;
                }
            }
            Momentum { alpha, deltas } => {
                while deltas.len() <= slot {
                    deltas.push(Vec::new());
                }

                let delta = &mut deltas[slot];
                delta.resize(values.len(), Complex64::zero());

                for ((w, &d), m) in values.iter_mut().zip(grads.iter()).zip(delta.iter_mut()) {
                    *m = *alpha * *m - eta * d * scaling;
                    *w += *m;
                }
            }
        }
    }
}
