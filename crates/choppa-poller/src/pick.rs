use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Chooses one entry out of a table.
pub trait Picker {
    fn pick<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T>;
}

#[derive(Debug, Clone)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Picker for RandomPicker {
    fn pick<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
        options.choose(&mut self.rng)
    }
}

/// Always the first entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPicker;

impl Picker for FirstPicker {
    fn pick<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
        options.first()
    }
}

/// Walks each table in order, wrapping around.
#[derive(Debug, Clone, Default)]
pub struct CyclePicker {
    next: usize,
}

impl Picker for CyclePicker {
    fn pick<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
        if options.is_empty() {
            return None;
        }
        let choice = &options[self.next % options.len()];
        self.next += 1;
        Some(choice)
    }
}
