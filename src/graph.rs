use anyhow::bail;
use anyhow::ensure;
use anyhow::Result;
use num::complex::Complex64;
use num::One;
use num::Zero;

use crate::matrix::Matrix;

/// A named complex tensor together with its gradient buffer.
#[derive(Debug, Clone)]
pub struct Tensor {
    pub name: String,
    pub value: Matrix<Complex64>,
    pub grad: Matrix<Complex64>,
    /// Whether the update rule is allowed to touch this tensor.
    pub learnable: bool,
}

/// Handle to a tensor inside a [`TensorSet`]. Only valid for the set that
/// issued it; looking it up in another set panics or returns the wrong tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorId(usize);

/// Owns every tensor a computation refers to.
#[derive(Debug, Default, Clone)]
pub struct TensorSet {
    tensors: Vec<Tensor>,
}

impl TensorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tensor. Its value storage is reserved but left empty, the
    /// caller appends rows or fills it afterwards.
    pub fn add(&mut self, name: &str, cols: usize, rows: usize, learnable: bool) -> Result<TensorId> {
        if self.tensors.iter().any(|t| t.name == name) {
            bail!("Tensor `{name}` is already registered.");
        }

        self.tensors.push(Tensor {
            name: name.to_owned(),
            value: Matrix::with_capacity(cols, rows),
            grad: Matrix::new(cols, rows),
            learnable,
        });

        Ok(TensorId(self.tensors.len() - 1))
    }

    pub fn get(&self, name: &str) -> Result<TensorId> {
        match self.tensors.iter().position(|t| t.name == name) {
            Some(index) => Ok(TensorId(index)),
            None => bail!("Unknown tensor `{name}`."),
        }
    }

    pub fn tensor(&self, id: TensorId) -> &Tensor {
        &self.tensors[id.0]
    }

    pub fn tensor_mut(&mut self, id: TensorId) -> &mut Tensor {
        &mut self.tensors[id.0]
    }

    pub fn learnable(&self) -> impl Iterator<Item = &Tensor> {
        self.tensors.iter().filter(|t| t.learnable)
    }

    pub fn learnable_mut(&mut self) -> impl Iterator<Item = &mut Tensor> {
        self.tensors.iter_mut().filter(|t| t.learnable)
    }

    /// Reset every gradient buffer to zero.
    pub fn zero(&mut self) {
        for tensor in self.tensors.iter_mut() {
            tensor.grad.zero();
        }
    }
}

/// What the training loop needs from an automatic differentiation engine.
pub trait Differentiable {
    /// Evaluate the computation with the current tensor values.
    fn forward(&self, set: &TensorSet) -> Result<Matrix<Complex64>>;

    /// Run the forward and reverse passes, accumulating into the gradient
    /// buffers of every tensor reachable from the root. Returns the first
    /// entry of the root's output.
    fn gradient(&self, set: &mut TensorSet) -> Result<Complex64>;
}

/// Expression tree over the tensors of a [`TensorSet`].
#[derive(Debug, Clone)]
pub enum Expr {
    Var(TensorId),
    Mul(Box<Expr>, Box<Expr>),
    Quadratic(Box<Expr>, Box<Expr>),
    Avg(Box<Expr>),
}

pub fn var(id: TensorId) -> Expr {
    Expr::Var(id)
}

/// Apply `a` to every row of `b`: row `i` of the result is `a * b[i]`.
pub fn mul(a: Expr, b: Expr) -> Expr {
    Expr::Mul(Box::new(a), Box::new(b))
}

/// Half of the summed squared difference of each row of `a` and `b`.
pub fn quadratic(a: Expr, b: Expr) -> Expr {
    Expr::Quadratic(Box::new(a), Box::new(b))
}

/// Mean of every entry.
pub fn avg(a: Expr) -> Expr {
    Expr::Avg(Box::new(a))
}

/// Forward value of an expression together with the values of its inputs.
struct Node<'a> {
    expr: &'a Expr,
    value: Matrix<Complex64>,
    inputs: Vec<Node<'a>>,
}

impl Expr {
    fn eval<'a>(&'a self, set: &TensorSet) -> Result<Node<'a>> {
        let (value, inputs) = match self {
            Expr::Var(id) => {
                let tensor = set.tensor(*id);
                ensure!(
                    tensor.value.is_filled(),
                    "Tensor `{}` is not fully initialized.",
                    tensor.name
                );

                (tensor.value.clone(), Vec::new())
            }
            Expr::Mul(a, b) => {
                let a = a.eval(set)?;
                let b = b.eval(set)?;
                ensure!(
                    a.value.cols == b.value.cols,
                    "Invalid dimensions for mul, {} columns against {}.",
                    a.value.cols,
                    b.value.cols
                );

                let value = &b.value * &a.value.transpose();
                (value, vec![a, b])
            }
            Expr::Quadratic(a, b) => {
                let a = a.eval(set)?;
                let b = b.eval(set)?;
                ensure!(
                    a.value.same_shape(&b.value),
                    "Invalid dimensions for quadratic, {}x{} against {}x{}.",
                    a.value.rows,
                    a.value.cols,
                    b.value.rows,
                    b.value.cols
                );

                let mut value = Matrix::new(1, a.value.rows);
                for i in 0..a.value.rows {
                    let sum: Complex64 = a
                        .value
                        .row(i)
                        .iter()
                        .zip(b.value.row(i))
                        .map(|(&x, &y)| (x - y) * (x - y))
                        .sum();
                    value[(0, i)] = sum * 0.5;
                }

                (value, vec![a, b])
            }
            Expr::Avg(a) => {
                let a = a.eval(set)?;
                ensure!(!a.value.items.is_empty(), "Cannot average an empty tensor.");

                let n = a.value.items.len() as f64;
                let sum: Complex64 = a.value.items.iter().sum();
                let value = Matrix::with_items(vec![sum / n], 1usize, 1usize);
                (value, vec![a])
            }
        };

        Ok(Node {
            expr: self,
            value,
            inputs,
        })
    }
}

impl Node<'_> {
    /// Push `grad`, the derivative of the root with respect to this node,
    /// down to the tensors.
    fn backward(&self, grad: &Matrix<Complex64>, set: &mut TensorSet) {
        match self.expr {
            Expr::Var(id) => {
                let tensor = set.tensor_mut(*id);
                for (d, &g) in tensor.grad.items.iter_mut().zip(grad.items.iter()) {
                    *d += g;
                }
            }
            Expr::Mul(..) => {
                let (a, b) = (&self.inputs[0], &self.inputs[1]);
                let da = &grad.transpose() * &b.value;
                let db = grad * &a.value;

                a.backward(&da, set);
                b.backward(&db, set);
            }
            Expr::Quadratic(..) => {
                let (a, b) = (&self.inputs[0], &self.inputs[1]);
                let mut da = Matrix::new(a.value.cols, a.value.rows);
                let mut db = Matrix::new(b.value.cols, b.value.rows);

                for j in 0..a.value.rows {
                    let g = grad[(0, j)];
                    for i in 0..a.value.cols {
                        let diff = a.value[(i, j)] - b.value[(i, j)];
                        da[(i, j)] = diff * g;
                        db[(i, j)] = -diff * g;
                    }
                }

                a.backward(&da, set);
                b.backward(&db, set);
            }
            Expr::Avg(..) => {
                let a = &self.inputs[0];
                let n = a.value.items.len() as f64;
                let g = grad.items[0] / n;

                let mut da = Matrix::new(a.value.cols, a.value.rows);
                for item in da.items.iter_mut() {
                    *item = g;
                }

                a.backward(&da, set);
            }
        }
    }
}

impl Differentiable for Expr {
    fn forward(&self, set: &TensorSet) -> Result<Matrix<Complex64>> {
        Ok(self.eval(set)?.value)
    }

    fn gradient(&self, set: &mut TensorSet) -> Result<Complex64> {
        let root = self.eval(set)?;
        ensure!(!root.value.items.is_empty(), "Cannot differentiate an empty tensor.");

        let mut seed = Matrix::new(root.value.cols, root.value.rows);
        for item in seed.items.iter_mut() {
            *item = Complex64::one();
        }

        root.backward(&seed, set);

        Ok(root.value.items.first().copied().unwrap_or_else(Complex64::zero))
    }
}
