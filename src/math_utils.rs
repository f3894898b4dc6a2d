// math_utils.rs

/// Returns the greatest common divisor of `m` and `n` using the Euclidean
/// algorithm. `gcd(0, 0)` is defined as 0.
pub fn gcd(mut m: u64, mut n: u64) -> u64 {
    while n != 0 {
        let r = m % n;
        m = n;
        n = r;
    }
    m
}

/// Returns the least common multiple of `m` and `n`, or 0 when either
/// argument is 0. Divides before multiplying to keep intermediates small.
pub fn lcm(m: u64, n: u64) -> u64 {
    if m == 0 || n == 0 {
        return 0;
    }
    m / gcd(m, n) * n
}

/// Returns every divisor of `x` in ascending order.
pub fn divisors(x: u64) -> Vec<u64> {
    (1..=x).filter(|i| x % i == 0).collect()
}

/// Trial-division primality test.
pub fn is_prime(x: u64) -> bool {
    if x < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= x {
        if x % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}
