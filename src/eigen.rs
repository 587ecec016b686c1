use anyhow::ensure;
use anyhow::Result;
use nalgebra::Matrix4;
use nalgebra::SymmetricEigen;

/// The permutation matrix swapping the last two basis vectors.
#[rustfmt::skip]
pub fn swap_matrix() -> Matrix4<f64> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
        0.0, 0.0, 1.0, 0.0,
    )
}

/// Eigenvalues and right eigenvectors (as columns) of a matrix.
#[derive(Debug, Clone)]
pub struct Eigen {
    pub values: Vec<f64>,
    pub vectors: Matrix4<f64>,
}

pub fn decompose(matrix: Matrix4<f64>) -> Result<Eigen> {
    ensure!(
        matrix == matrix.transpose(),
        "Eigendecomposition failed, matrix is not symmetric."
    );

    let eigen = SymmetricEigen::new(matrix);
    let values = eigen.eigenvalues.iter().copied().collect();

    Ok(Eigen {
        values,
        vectors: eigen.eigenvectors,
    })
}

pub fn print(eigen: &Eigen) {
    println!("\neigenvalues");
    for (i, value) in eigen.values.iter().enumerate() {
        println!("{i} {}", value.abs());
    }

    println!("\neigenvectors");
    for row in eigen.vectors.row_iter() {
        for value in row.iter() {
            print!(" {value:.6}");
        }
        println!();
    }
}
