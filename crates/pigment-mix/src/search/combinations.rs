//! Enumeration of paint subsets and reduced fraction vectors.

use crate::paint::gcd_all;

/// All `k`-element subsets of `0..n` as ascending index lists, in
/// lexicographic order.
///
/// ```
/// use pigment_mix::search::Combinations;
///
/// let all: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
/// assert_eq!(all.len(), 6);
/// assert_eq!(all[0], vec![0, 1]);
/// assert_eq!(all[5], vec![2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            done: k == 0 || k > n,
        }
    }

    fn advance(&mut self) -> bool {
        let k = self.indices.len();
        let mut i = k;
        while i > 0 {
            i -= 1;
            if self.indices[i] < self.n - k + i {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.started {
            if !self.advance() {
                self.done = true;
                return None;
            }
        } else {
            self.started = true;
        }
        Some(self.indices.clone())
    }
}

/// Number of `k`-element subsets of `n` items.
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1u64, |acc, i| acc * (n - i) as u64 / (i + 1) as u64)
}

/// Every vector of `k` values in `1..=granularity` whose gcd is 1, in
/// lexicographic order.
///
/// A single paint only ever takes `[1]`.
pub fn coprime_ratios(k: usize, granularity: u8) -> Vec<Vec<u8>> {
    if k == 0 || granularity == 0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut current = vec![1u8; k];
    loop {
        if gcd_all(&current) == 1 {
            out.push(current.clone());
        }
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if current[i] < granularity {
                current[i] += 1;
                for v in current.iter_mut().skip(i + 1) {
                    *v = 1;
                }
                break;
            }
        }
    }
}
