//! Truthiness of condition results.

/// A condition result that can be read as satisfied or not.
///
/// Polling treats a truthy result as "done". The implementations follow the
/// natural reading of each type: `true`, `Some(_)`, `Ok(_)`, non-zero numbers
/// and non-empty strings are truthy.
///
/// # Examples
///
/// ```rust
/// use tidewait::wait::Truthy;
///
/// assert!(true.is_truthy());
/// assert!(Some(3).is_truthy());
/// assert!(!None::<u8>.is_truthy());
/// assert!(!Err::<(), _>("pending").is_truthy());
/// assert!(!0u64.is_truthy());
/// assert!("0xabc".is_truthy());
/// ```
pub trait Truthy {
    /// Returns true if the value satisfies a poll.
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl<T, E> Truthy for Result<T, E> {
    fn is_truthy(&self) -> bool {
        self.is_ok()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for &str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

macro_rules! impl_truthy_for_int {
    ($($t:ty),*) => {
        $(
            impl Truthy for $t {
                fn is_truthy(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

impl_truthy_for_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_truthiness() {
        assert!(!String::new().is_truthy());
        assert!(String::from("done").is_truthy());
        assert!(!"".is_truthy());
    }

    #[test]
    fn test_signed_numbers() {
        assert!((-1i32).is_truthy());
        assert!(!0i64.is_truthy());
    }
}
