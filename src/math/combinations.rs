//! Index-based combination enumeration.
//!
//! [`Combinations`] yields every `k`-sized subset of `0..n` as an increasing
//! index tuple, in lexicographic order:
//!
//! ```text
//! n = 4, k = 2:  [0,1] [0,2] [0,3] [1,2] [1,3] [2,3]
//! ```
//!
//! The iterator is lazy (one tuple held at a time), finite, and can be
//! restarted with [`Combinations::reset`].

/// Lexicographic `k`-combinations of `0..n`.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            indices: (0..k).collect(),
            started: false,
            done: k > n,
        }
    }

    /// Rewind to the first combination.
    pub fn reset(&mut self) {
        *self = Self::new(self.n, self.k);
    }

    /// Total number of combinations this iterator produces, `C(n, k)`.
    pub fn count_total(&self) -> u128 {
        binomial(self.n, self.k)
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        // Rightmost position that can still be incremented.
        let (n, k) = (self.n, self.k);
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.indices[i] != i + n - k {
                break;
            }
        }

        self.indices[i] += 1;
        for j in (i + 1)..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

/// `C(n, k)`; zero when `k > n`.
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // Exact at every step: acc * (n - i) is divisible by (i + 1).
        acc = acc * (n - i) as u128 / (i + 1) as u128;
    }
    acc
}
