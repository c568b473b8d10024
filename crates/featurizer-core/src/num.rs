//! Null-value abstractions for featurizer outputs.
//!
//! Rolling featurizers emit a "null" slot whenever a window does not have
//! enough history. Floating-point outputs use NaN for this, every other
//! output type is wrapped in `Option`.

/// A type with a distinguished "no value" representation.
///
/// # Example
///
/// ```rust
/// use featurizer_core::Nullable;
///
/// assert!(f64::null().is_nan());
/// assert!(<Option<i32> as Nullable>::null().is_none());
/// assert!(!Some(3).is_null());
/// ```
pub trait Nullable: Clone + Send + Sync + 'static {
    /// Returns the null value.
    #[must_use]
    fn null() -> Self;

    /// Returns `true` if this value is the null value.
    #[must_use]
    fn is_null(&self) -> bool;
}

impl Nullable for f32 {
    #[inline]
    fn null() -> Self {
        f32::NAN
    }

    #[inline]
    fn is_null(&self) -> bool {
        self.is_nan()
    }
}

impl Nullable for f64 {
    #[inline]
    fn null() -> Self {
        f64::NAN
    }

    #[inline]
    fn is_null(&self) -> bool {
        self.is_nan()
    }
}

impl<T: Clone + Send + Sync + 'static> Nullable for Option<T> {
    #[inline]
    fn null() -> Self {
        None
    }

    #[inline]
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

/// Maps an input scalar type to the nullable type used to emit it.
///
/// Floats already carry NaN and map onto themselves. Integers have no spare
/// bit pattern and map onto `Option<Self>`.
pub trait HasNullable: Copy + PartialOrd + Send + Sync + 'static {
    /// The nullable representation of `Self`.
    type Nullable: Nullable;

    /// Wrap a concrete value in its nullable representation.
    #[must_use]
    fn into_nullable(self) -> Self::Nullable;
}

impl HasNullable for f32 {
    type Nullable = f32;

    #[inline]
    fn into_nullable(self) -> Self::Nullable {
        self
    }
}

impl HasNullable for f64 {
    type Nullable = f64;

    #[inline]
    fn into_nullable(self) -> Self::Nullable {
        self
    }
}

macro_rules! impl_has_nullable_option {
    ($($t:ty),* $(,)?) => {
        $(
            impl HasNullable for $t {
                type Nullable = Option<$t>;

                #[inline]
                fn into_nullable(self) -> Self::Nullable {
                    Some(self)
                }
            }
        )*
    };
}

impl_has_nullable_option!(i8, i16, i32, i64, u8, u16, u32, u64, bool);
