//! MNA matrix assembly and LU solving.

use crate::error::{ProtoboardError, Result};

/// MNA matrix system Ax = z.
///
/// Rows and columns are matrix indices, not net identities; the caller owns
/// the mapping. `None` in a stamp position means the ground net, which has
/// no row.
#[derive(Debug)]
pub struct MnaMatrix {
    /// System matrix A (row-major)
    a: Vec<f64>,
    /// Source vector z
    z: Vec<f64>,
    /// Solution vector x
    x: Vec<f64>,
    /// Matrix dimension
    size: usize,
    /// LU decomposition of A
    lu: Vec<f64>,
    /// Pivot indices for the LU decomposition
    pivots: Vec<usize>,
}

impl MnaMatrix {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; size * size],
            pivots: vec![0; size],
        }
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Clear the matrix and source vector to zero.
    pub fn clear(&mut self) {
        self.a.fill(0.0);
        self.z.fill(0.0);
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Add to source vector element.
    pub fn add_source(&mut self, row: usize, value: f64) {
        self.z[row] += value;
    }

    /// Stamp a conductance G between two nets:
    ///   A[n1,n1] += G, A[n2,n2] += G, A[n1,n2] -= G, A[n2,n1] -= G
    pub fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: f64) {
        if let Some(i) = n1 {
            self.add(i, i, g);
        }
        if let Some(j) = n2 {
            self.add(j, j, g);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -g);
            self.add(j, i, -g);
        }
    }

    /// Stamp an ideal voltage source between two nets with its branch
    /// current at row `br`, enforcing V[n+] - V[n-] = E.
    pub fn stamp_voltage_source(
        &mut self,
        n_pos: Option<usize>,
        n_neg: Option<usize>,
        br: usize,
        voltage: f64,
    ) {
        if let Some(i) = n_pos {
            self.add(br, i, 1.0);
            self.add(i, br, 1.0);
        }
        if let Some(j) = n_neg {
            self.add(br, j, -1.0);
            self.add(j, br, -1.0);
        }
        self.z[br] = voltage;
    }

    /// Stamp a current source driving current from n+ to n-.
    pub fn stamp_current_source(&mut self, n_pos: Option<usize>, n_neg: Option<usize>, current: f64) {
        if let Some(i) = n_pos {
            self.add_source(i, -current);
        }
        if let Some(j) = n_neg {
            self.add_source(j, current);
        }
    }

    /// LU-factor A with partial pivoting.
    pub fn factor(&mut self) -> Result<()> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);

        for i in 0..n {
            self.pivots[i] = i;
        }

        for k in 0..n {
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val < 1e-15 {
                return Err(ProtoboardError::SingularMatrix);
            }

            if max_row != k {
                self.pivots.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        Ok(())
    }

    /// Solve the system using the prior factorization.
    pub fn solve(&mut self) -> Result<()> {
        let n = self.size;

        // Apply the pivot permutation to z
        let b = self.z.clone();
        for i in 0..n {
            self.x[i] = b[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            let diag = self.lu[i * n + i];
            if diag.abs() < 1e-15 {
                return Err(ProtoboardError::SingularMatrix);
            }
            self.x[i] /= diag;
        }

        Ok(())
    }

    /// The solved value at a matrix index, or 0 for ground.
    pub fn voltage(&self, index: Option<usize>) -> f64 {
        match index {
            Some(i) => self.x[i],
            None => 0.0,
        }
    }

    /// The full solution vector.
    pub fn solution(&self) -> &[f64] {
        &self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn solves_a_resistor_ladder() {
        // 10V source feeding two equal 1k resistors in series to ground:
        // index 0 = source net, index 1 = midpoint, index 2 = branch current
        let g = 1e-3;
        let mut m = MnaMatrix::new(3);
        m.stamp_conductance(Some(0), Some(1), g);
        m.stamp_conductance(Some(1), None, g);
        m.stamp_voltage_source(Some(0), None, 2, 10.0);

        m.factor().unwrap();
        m.solve().unwrap();
        assert_relative_eq!(m.voltage(Some(0)), 10.0, epsilon = 1e-9);
        assert_relative_eq!(m.voltage(Some(1)), 5.0, epsilon = 1e-9);
        assert_relative_eq!(m.voltage(None), 0.0);
    }

    #[test]
    fn floating_net_is_singular() {
        // One net with no connection at all
        let mut m = MnaMatrix::new(1);
        assert!(matches!(m.factor(), Err(ProtoboardError::SingularMatrix)));
    }
}
