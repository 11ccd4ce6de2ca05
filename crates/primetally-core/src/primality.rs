//! Trial-division primality test and the sieve used as the reference count.

/// Whether `x` is prime, by trial division against every candidate divisor
/// from 2 up to ⌊√x⌋. The bound is a truncated floating-point square root,
/// so 2 and 3 classify prime without entering the loop. Pure and O(√x) per
/// call; nothing is shared between calls.
pub fn is_prime(x: u64) -> bool {
    if x < 2 {
        return false;
    }
    let last = (x as f64).sqrt() as u64;
    for divisor in 2..=last {
        if x % divisor == 0 {
            return false;
        }
    }
    true
}

/// Number of primes in [2, upper) by a Sieve of Eratosthenes. Independent of
/// [`is_prime`] on purpose: this is the trusted reference the parallel count
/// is checked against.
pub fn sieve_count(upper: u64) -> u64 {
    if upper <= 2 {
        return 0;
    }
    let n = upper as usize;
    let mut composite = vec![false; n];
    let mut p = 2;
    while p * p < n {
        if !composite[p] {
            let mut multiple = p * p;
            while multiple < n {
                composite[multiple] = true;
                multiple += p;
            }
        }
        p += 1;
    }
    (2..n).filter(|&i| !composite[i]).count() as u64
}
