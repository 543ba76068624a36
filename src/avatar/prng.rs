//! Seeded pseudo-random numbers for avatar generation.
//!
//! A 32-bit xorshift generator whose state is derived from the UTF-16 code
//! units of the seed, so the same seed yields the same sequence everywhere.

const MIN: f64 = i32::MIN as f64;
const MAX: f64 = i32::MAX as f64;

fn xorshift(mut value: i32) -> i32 {
    value ^= value << 13;
    value ^= value >> 17;
    value ^= value << 5;
    value
}

fn hash_seed(seed: &str) -> i32 {
    seed.encode_utf16().fold(0i32, |hash, unit| {
        xorshift(hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(unit as i32))
    })
}

pub struct Prng {
    value: i32,
}

impl Prng {
    pub fn new(seed: &str) -> Self {
        // xorshift never leaves zero, so zero state must be avoided
        let value = match hash_seed(seed) {
            0 => 1,
            hash => hash,
        };
        Self { value }
    }

    pub fn next(&mut self) -> i32 {
        self.value = xorshift(self.value);
        self.value
    }

    /// Uniform integer in `min..=max`.
    pub fn integer(&mut self, min: i32, max: i32) -> i32 {
        let unit = (self.next() as f64 - MIN) / (MAX - MIN);
        let value = (unit * (max as f64 + 1.0 - min as f64) + min as f64).floor() as i32;
        value.min(max)
    }

    /// True with `likelihood` percent probability.
    pub fn bool(&mut self, likelihood: i32) -> bool {
        self.integer(1, 100) <= likelihood
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            self.next();
            return None;
        }
        let index = self.integer(0, items.len() as i32 - 1);
        items.get(index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Prng::new("Ada Lovelace");
        let mut b = Prng::new("Ada Lovelace");
        for _ in 0..32 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a: Vec<i32> = {
            let mut prng = Prng::new("alpha");
            (0..8).map(|_| prng.next()).collect()
        };
        let b: Vec<i32> = {
            let mut prng = Prng::new("beta");
            (0..8).map(|_| prng.next()).collect()
        };
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_seed_is_usable() {
        let mut prng = Prng::new("");
        assert_ne!(prng.next(), 0);
    }

    #[test]
    fn test_integer_stays_in_range() {
        let mut prng = Prng::new("range");
        for _ in 0..1000 {
            let n = prng.integer(3, 7);
            assert!((3..=7).contains(&n));
        }
    }

    #[test]
    fn test_bool_extremes() {
        let mut prng = Prng::new("coin");
        for _ in 0..100 {
            assert!(prng.bool(100));
            assert!(!prng.bool(0));
        }
    }

    #[test]
    fn test_pick() {
        let mut prng = Prng::new("pick");
        let items = ["a", "b", "c"];
        for _ in 0..50 {
            assert!(items.contains(prng.pick(&items).unwrap()));
        }
        let empty: [&str; 0] = [];
        assert!(prng.pick(&empty).is_none());
    }
}
