use std::time::Duration;
use std::time::Instant;

use anyhow::Result;
use num::complex::Complex64;
use rand::Rng;
use tracing::debug;
use tracing::info;
use tracing::trace;

use crate::dataset;
use crate::dataset::Sample;
use crate::graph;
use crate::graph::Differentiable;
use crate::graph::Expr;
use crate::graph::TensorSet;
use crate::matrix::Matrix;
use crate::update::Update;

/// Name of the learned weight tensor.
pub const WEIGHTS: &str = "aw1";

/// Hyperparameters of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    /// Real and imaginary parts of the initial weights are drawn from
    /// `init_range.0..init_range.1`.
    pub init_range: (f64, f64),
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 128,
            learning_rate: 0.3,
            init_range: (-1.0, 1.0),
            seed: 7,
        }
    }
}

/// Diagnostics of one completed epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochRecord {
    pub epoch: usize,
    /// Magnitude of the value returned by the backward pass root.
    pub cost: f64,
    pub elapsed: Duration,
}

/// Factor that brings a gradient of the given norm down to norm 1.
pub fn clip_scaling(norm: f64) -> f64 {
    if norm > 1.0 {
        1.0 / norm
    } else {
        1.0
    }
}

/// Euclidean norm over the gradients of every learnable tensor.
pub fn gradient_norm(set: &TensorSet) -> f64 {
    set.learnable()
        .flat_map(|t| t.grad.items.iter())
        .map(|d| d.norm_sqr())
        .sum::<f64>()
        .sqrt()
}

/// Drives gradient descent over the learnable tensors of a [`TensorSet`].
#[derive(Debug)]
pub struct Trainer<D, U>
where
    D: Differentiable,
    U: Update,
{
    set: TensorSet,
    /// Scalar the loop minimizes.
    cost: D,
    /// Network output, evaluated again for decoding.
    hidden: D,
    update: U,
    eta: Complex64,
    history: Vec<EpochRecord>,
}

impl<U> Trainer<Expr, U>
where
    U: Update,
{
    /// Build the single 4x4 complex layer over `samples` and randomize its
    /// weights from `rng`.
    pub fn build<R: Rng>(
        samples: &[Sample],
        config: &TrainConfig,
        update: U,
        rng: &mut R,
    ) -> Result<Self> {
        let mut set = TensorSet::new();
        let weights = set.add(WEIGHTS, dataset::WIDTH, dataset::WIDTH, true)?;
        let (inputs, outputs) = dataset::encode(&mut set, samples)?;

        let (low, high) = config.init_range;
        for tensor in set.learnable_mut() {
            tensor.value.randomize(rng, low, high);
        }

        let hidden = graph::mul(graph::var(weights), graph::var(inputs));
        let cost = graph::avg(graph::quadratic(graph::var(outputs), hidden.clone()));

        Ok(Self::new(set, cost, hidden, update, config))
    }
}

impl<D, U> Trainer<D, U>
where
    D: Differentiable,
    U: Update,
{
    pub fn new(set: TensorSet, cost: D, hidden: D, update: U, config: &TrainConfig) -> Self {
        Self {
            set,
            cost,
            hidden,
            update,
            eta: Complex64::new(config.learning_rate, 0.0),
            history: Vec::with_capacity(config.epochs),
        }
    }

    pub fn set(&self) -> &TensorSet {
        &self.set
    }

    /// Records of every epoch run so far, in epoch order.
    pub fn history(&self) -> &[EpochRecord] {
        &self.history
    }

    /// Run one epoch: zero, differentiate, clip, update, record.
    pub fn step(&mut self) -> Result<EpochRecord> {
        let start = Instant::now();
        let epoch = self.history.len();

        self.set.zero();
        let total = self.cost.gradient(&mut self.set)?;

        let norm = gradient_norm(&self.set);
        let scaling = clip_scaling(norm);
        if norm > 1.0 {
            trace!(epoch, norm, "clipping gradient");
        }

        for (slot, tensor) in self.set.learnable_mut().enumerate() {
            self.update.step(
                slot,
                &mut tensor.value.items,
                &tensor.grad.items,
                self.eta,
                scaling,
            );
        }

        let record = EpochRecord {
            epoch,
            cost: total.norm(),
            elapsed: start.elapsed(),
        };
        debug!(epoch, cost = record.cost, elapsed = ?record.elapsed, "epoch finished");

        self.history.push(record);
        Ok(record)
    }

    /// Run `epochs` epochs. There is no early exit.
    pub fn train(&mut self, epochs: usize) -> Result<&[EpochRecord]> {
        info!(epochs, eta = self.eta.re, "training started");

        for _ in 0..epochs {
            self.step()?;
        }

        if let Some(last) = self.history.last() {
            info!(epochs = self.history.len(), cost = last.cost, "training finished");
        }

        Ok(&self.history)
    }

    /// Forward pass of the network with the current weights.
    pub fn hidden(&self) -> Result<Matrix<Complex64>> {
        self.hidden.forward(&self.set)
    }
}
