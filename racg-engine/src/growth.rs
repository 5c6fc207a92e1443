use crate::automaton::{Automaton, StateLabel, Symbol};
use crate::error::{AutomatonError, Result};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use std::collections::BTreeMap;

/// Transfer matrix of an automaton: entry `(i, j)` counts the symbols leading
/// from state `i` to state `j`.
///
/// Counting accepted words by length and estimating the exponential growth
/// rate of a language both reduce to linear algebra on this matrix.
#[derive(Debug, Clone)]
pub struct TransferMatrix {
    labels: Vec<StateLabel>,
    counts: DMatrix<u64>,
    initial: usize,
    finals: Vec<bool>,
    coaccessible: Vec<bool>,
}

impl TransferMatrix {
    /// Indexes the states of `automaton` in label order.
    pub fn new<S: Symbol>(automaton: &Automaton<S>) -> Self {
        let labels: Vec<StateLabel> = automaton.states().map(|state| state.label().clone()).collect();
        let index: BTreeMap<&StateLabel, usize> =
            labels.iter().enumerate().map(|(i, label)| (label, i)).collect();

        let dimension = labels.len();
        let mut counts = DMatrix::<u64>::zeros(dimension, dimension);
        for (from, _, to) in automaton.all_transitions() {
            if let (Some(&i), Some(&j)) = (index.get(from), index.get(to)) {
                counts[(i, j)] += 1;
            }
        }

        let coaccessible_labels = automaton.coaccessible_states();
        let initial = index
            .get(automaton.initial_state().label())
            .copied()
            .unwrap_or_default();
        let finals = labels.iter().map(|label| automaton.is_final(label)).collect();
        let coaccessible = labels
            .iter()
            .map(|label| coaccessible_labels.contains(label))
            .collect();

        TransferMatrix {
            labels,
            counts,
            initial,
            finals,
            coaccessible,
        }
    }

    pub fn dimension(&self) -> usize {
        self.labels.len()
    }

    /// State labels, in row order.
    pub fn labels(&self) -> &[StateLabel] {
        &self.labels
    }

    pub fn counts(&self) -> &DMatrix<u64> {
        &self.counts
    }

    /// Number of accepted words of each length `0..=max_len`.
    ///
    /// # Errors
    /// `CountOverflow` at the first length whose count exceeds `u64::MAX`.
    /// Languages growing like `2^n` get there near length 64.
    pub fn word_counts(&self, max_len: usize) -> Result<Vec<u64>> {
        let mut paths = DVector::<u64>::zeros(self.dimension());
        paths[self.initial] = 1;

        let mut counts = Vec::with_capacity(max_len + 1);
        for length in 0..=max_len {
            let accepted = paths
                .iter()
                .zip(&self.finals)
                .filter(|(_, is_final)| **is_final)
                .try_fold(0u64, |total, (count, _)| total.checked_add(*count))
                .ok_or(AutomatonError::CountOverflow { length })?;
            counts.push(accepted);
            if length < max_len {
                paths = self
                    .step(&paths)
                    .ok_or(AutomatonError::CountOverflow { length: length + 1 })?;
            }
        }
        Ok(counts)
    }

    /// Paths one symbol longer, or `None` if a count overflows.
    fn step(&self, paths: &DVector<u64>) -> Option<DVector<u64>> {
        let dimension = self.dimension();
        let mut next = DVector::<u64>::zeros(dimension);
        for from in 0..dimension {
            if paths[from] == 0 {
                continue;
            }
            for to in 0..dimension {
                let symbols = self.counts[(from, to)];
                if symbols > 0 {
                    next[to] = next[to].checked_add(symbols.checked_mul(paths[from])?)?;
                }
            }
        }
        Some(next)
    }

    /// Exponential growth rate of the accepted language.
    ///
    /// This is the spectral radius of the matrix restricted to states from
    /// which a final state is reachable. Finite languages give 0.
    pub fn growth_rate(&self) -> f64 {
        let kept: Vec<usize> = (0..self.dimension()).filter(|&i| self.coaccessible[i]).collect();
        if kept.is_empty() {
            return 0.0;
        }

        let restricted = DMatrix::<f64>::from_fn(kept.len(), kept.len(), |row, column| {
            self.counts[(kept[row], kept[column])] as f64
        });
        restricted
            .complex_eigenvalues()
            .iter()
            .map(|eigenvalue: &Complex<f64>| eigenvalue.norm())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{geodesic_machine, shortlex_machine};
    use crate::presentation::Presentation;

    fn pentagon() -> Presentation {
        Presentation::from_edges(
            "abcde",
            &[('a', 'b'), ('b', 'c'), ('c', 'd'), ('d', 'e'), ('e', 'a')],
        )
        .unwrap()
    }

    #[test]
    fn test_matrix_shape() {
        let machine = shortlex_machine(&pentagon(), None).unwrap();
        let matrix = TransferMatrix::new(&machine);
        assert_eq!(matrix.dimension(), 8);
        assert_eq!(matrix.counts().sum(), 24);
    }

    #[test]
    fn test_word_counts() {
        let machine = shortlex_machine(&pentagon(), None).unwrap();
        let matrix = TransferMatrix::new(&machine);
        assert_eq!(matrix.word_counts(6).unwrap(), vec![1, 5, 15, 40, 105, 275, 720]);
    }

    #[test]
    fn test_finite_group() {
        // Z/2 x Z/2 has four elements, but `ab` and `ba` are both geodesic.
        let p = Presentation::from_edges("ab", &[('a', 'b')]).unwrap();
        let elements = TransferMatrix::new(&shortlex_machine(&p, None).unwrap());
        assert_eq!(elements.word_counts(3).unwrap(), vec![1, 2, 1, 0]);
        assert!(elements.growth_rate() < 1e-3);

        let geodesics = TransferMatrix::new(&geodesic_machine(&p, None).unwrap());
        assert_eq!(geodesics.word_counts(3).unwrap(), vec![1, 2, 2, 0]);
        assert!(geodesics.growth_rate() < 1e-3);
    }

    #[test]
    fn test_infinite_dihedral_growth() {
        let p = Presentation::from_edges("ab", &[]).unwrap();
        let matrix = TransferMatrix::new(&geodesic_machine(&p, None).unwrap());
        assert_eq!(matrix.word_counts(4).unwrap(), vec![1, 2, 2, 2, 2]);
        assert!((matrix.growth_rate() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_free_product_growth() {
        let p = Presentation::from_edges("abc", &[]).unwrap();
        let matrix = TransferMatrix::new(&geodesic_machine(&p, None).unwrap());
        assert!((matrix.growth_rate() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_word_counts_overflow() {
        // 3 * 2^(n-1) geodesics of length n: the sum leaves u64 at n = 64.
        let p = Presentation::from_edges("abc", &[]).unwrap();
        let matrix = TransferMatrix::new(&geodesic_machine(&p, None).unwrap());
        let counts = matrix.word_counts(63).unwrap();
        assert_eq!(counts[63], 3 << 62);
        assert_eq!(
            matrix.word_counts(70).unwrap_err(),
            AutomatonError::CountOverflow { length: 64 }
        );
    }

    #[test]
    fn test_pentagon_growth_rate() {
        let machine = shortlex_machine(&pentagon(), None).unwrap();
        let rate = TransferMatrix::new(&machine).growth_rate();
        let golden_square = (3.0 + 5.0_f64.sqrt()) / 2.0;
        assert!((rate - golden_square).abs() < 1e-6);
    }
}
