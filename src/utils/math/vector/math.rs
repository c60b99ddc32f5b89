use num::Float;

use super::ZeroSpVec;

impl<N> ZeroSpVec<N>
where
    N: Float,
{
    #[inline]
    pub fn norm_sq(&self) -> N {
        self.raw_iter().fold(N::zero(), |acc, (_, v)| acc + v * v)
    }

    #[inline]
    pub fn norm(&self) -> N {
        self.norm_sq().sqrt()
    }

    /// Scale to unit L2 norm. A zero vector stays zero.
    pub fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm > N::zero() {
            for val in self.values.iter_mut() {
                *val = *val / norm;
            }
        }
    }
}
