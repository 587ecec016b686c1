use num::complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;

use qxor::dataset;
use qxor::dataset::SAMPLES;
use qxor::graph;
use qxor::graph::Differentiable;
use qxor::graph::TensorSet;
use qxor::matrix::Matrix;

fn network(seed: u64) -> (TensorSet, graph::Expr, graph::Expr) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut set = TensorSet::new();
    let w = set.add("aw1", 4, 4, true).unwrap();
    let (inputs, outputs) = dataset::encode(&mut set, &SAMPLES).unwrap();
    set.tensor_mut(w).value.randomize(&mut rng, -1.0, 1.0);

    let hidden = graph::mul(graph::var(w), graph::var(inputs));
    let cost = graph::avg(graph::quadratic(graph::var(outputs), hidden.clone()));

    (set, hidden, cost)
}

#[test]
fn test_mul_applies_weights_to_each_row() {
    let (set, hidden, _) = network(1);
    let w = &set.tensor(set.get("aw1").unwrap()).value;
    let output = hidden.forward(&set).unwrap();

    assert_eq!((output.cols, output.rows), (4, 4));
    for (i, sample) in SAMPLES.iter().enumerate() {
        let k = dataset::code(sample[0], sample[1]);
        for j in 0..4 {
            assert_eq!(output[(j, i)], w[(k, j)]);
        }
    }
}

#[test]
fn test_gradient_matches_finite_differences() {
    let (mut set, _, cost) = network(3);
    let w = set.get("aw1").unwrap();

    set.zero();
    let root = cost.gradient(&mut set).unwrap();
    assert_eq!(root, cost.forward(&set).unwrap().items[0]);

    let grads = set.tensor(w).grad.items.clone();
    let h = 1e-6;

    for index in 0..grads.len() {
        for step in [Complex64::new(h, 0.0), Complex64::new(0.0, h)] {
            let mut plus = set.clone();
            plus.tensor_mut(w).value.items[index] += step;
            let mut minus = set.clone();
            minus.tensor_mut(w).value.items[index] -= step;

            let f_plus = cost.forward(&plus).unwrap().items[0];
            let f_minus = cost.forward(&minus).unwrap().items[0];
            let numeric = (f_plus - f_minus) / (step * 2.0);

            assert!(
                (numeric - grads[index]).norm() < 1e-6,
                "entry {index}: {numeric} != {}",
                grads[index]
            );
        }
    }
}

#[test]
fn test_zero_resets_gradients() {
    let (mut set, _, cost) = network(5);

    cost.gradient(&mut set).unwrap();
    let once = set.tensor(set.get("aw1").unwrap()).grad.items.clone();
    cost.gradient(&mut set).unwrap();
    let twice = set.tensor(set.get("aw1").unwrap()).grad.items.clone();

    for (a, b) in once.iter().zip(twice.iter()) {
        assert!((*a * 2.0 - *b).norm() < 1e-12);
    }

    set.zero();
    let w = set.get("aw1").unwrap();
    assert!(set.tensor(w).grad.items.iter().all(|d| d.norm() == 0.0));
}

#[test]
fn test_shape_mismatch_is_an_error() {
    let mut set = TensorSet::new();
    let a = set.add("a", 3, 2, true).unwrap();
    let b = set.add("b", 4, 2, false).unwrap();
    set.tensor_mut(a).value.fill_with(|| Complex64::new(1.0, 0.0));
    set.tensor_mut(b).value.fill_with(|| Complex64::new(1.0, 0.0));

    let product = graph::mul(graph::var(a), graph::var(b));
    assert!(product.forward(&set).is_err());

    let loss = graph::avg(graph::quadratic(graph::var(a), graph::var(b)));
    assert!(loss.gradient(&mut set).is_err());
}

#[test]
fn test_uninitialized_tensor_is_an_error() {
    let mut set = TensorSet::new();
    let a = set.add("a", 2, 2, true).unwrap();

    assert!(graph::avg(graph::var(a)).forward(&set).is_err());
}

#[test]
fn test_tensor_names() {
    let mut set = TensorSet::new();
    set.add("a", 1, 1, true).unwrap();

    assert!(set.add("a", 1, 1, true).is_err());
    assert!(set.get("missing").is_err());
    assert_eq!(set.learnable().count(), 1);
}

#[test]
#[should_panic]
fn test_push_row_past_capacity() {
    let mut matrix = Matrix::<Complex64>::with_capacity(2usize, 1usize);
    matrix.push_row(&[Complex64::new(1.0, 0.0); 2]);
    matrix.push_row(&[Complex64::new(1.0, 0.0); 2]);
}

#[test]
fn test_randomize_fills_capacity() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut matrix = Matrix::<Complex64>::with_capacity(4usize, 4usize);
    matrix.randomize(&mut rng, -1.0, 1.0);

    assert!(matrix.is_filled());
    assert_eq!(matrix.items.len(), 16);
}

#[test]
#[should_panic]
fn test_tensor_id_from_other_set() {
    let mut first = TensorSet::new();
    first.add("a", 1, 1, true).unwrap();
    let b = first.add("b", 1, 1, true).unwrap();

    let mut second = TensorSet::new();
    second.add("a", 1, 1, true).unwrap();
    second.tensor(b);
}
