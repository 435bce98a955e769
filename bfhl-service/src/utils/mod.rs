pub mod coerce;
pub mod primes;

pub use coerce::{is_numeric, parse_int, MAX_SAFE_INTEGER};
pub use primes::is_prime;
