//! Prime capacity sizing.

/// The largest capacity a table is allowed to request.
///
/// Odd candidates are searched upwards two at a time, so the search must never come close to
/// `usize::MAX`.
const MAXIMUM_CAPACITY: usize = 1_usize << (usize::BITS - 2);

/// Returns `true` if `n` is a prime number.
///
/// # Examples
///
/// ```
/// use primemap::is_prime;
///
/// assert!(is_prime(2));
/// assert!(is_prime(97));
/// assert!(!is_prime(1));
/// assert!(!is_prime(91));
/// ```
#[inline]
#[must_use]
pub const fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }
    let mut factor = 3;
    while factor <= n / factor {
        if n % factor == 0 {
            return false;
        }
        factor += 2;
    }
    true
}

/// Returns the first prime reached from `n` by stepping through odd numbers.
///
/// An even `n` is bumped to the next odd number first, therefore the result is never `2`, and
/// the smallest capacity a table can have is `3`.
///
/// # Examples
///
/// ```
/// use primemap::next_prime;
///
/// assert_eq!(next_prime(0), 3);
/// assert_eq!(next_prime(20), 23);
/// assert_eq!(next_prime(53), 53);
/// assert_eq!(next_prime(106), 107);
/// ```
#[inline]
#[must_use]
pub const fn next_prime(n: usize) -> usize {
    let mut candidate = if n > MAXIMUM_CAPACITY {
        MAXIMUM_CAPACITY
    } else {
        n
    };
    if candidate % 2 == 0 {
        candidate += 1;
    }
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}

/// Returns the capacity a table grows into when its load crosses the threshold.
#[inline]
pub(crate) const fn grown_capacity(capacity: usize) -> usize {
    next_prime(capacity.saturating_mul(2))
}
