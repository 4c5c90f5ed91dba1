/// Trait for floating-point types, so that geometry can be generic over {f32, f64}.
pub trait Float:
    num_traits::Float
    + nalgebra::Scalar
    + nalgebra::SimdPartialOrd
    + std::ops::AddAssign
    + std::ops::SubAssign
    + Copy
    + Send
    + Sync
{
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;

    /// Convert a tally into this type, for writing counts into a result matrix.
    fn from_count(count: usize) -> Self;
}

macro_rules! impl_float {
    ($($Real:ty),+) => {
        $(
            impl Float for $Real {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;
                const TWO: Self = 2.0;

                #[inline]
                fn from_count(count: usize) -> Self {
                    count as Self
                }
            }
        )+
    };
}

impl_float!(f32, f64);
