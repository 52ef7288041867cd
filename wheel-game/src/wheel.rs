use parking_lot::RwLock;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Item list shared between config sync and the controller.
pub type SharedWheel = Arc<RwLock<Wheel>>;

pub fn shared_wheel() -> SharedWheel {
    Arc::new(RwLock::new(Wheel::default()))
}

/// The prize list a client currently shows. Slice width is captured per
/// spin by [`SpinState`](crate::spin::SpinState).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wheel {
    items: Vec<String>,
}

impl Wheel {
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }

    /// Swaps the whole list; an empty list leaves the wheel inert.
    pub fn replace(&mut self, items: Vec<String>) {
        self.items = items;
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.items.shuffle(rng);
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_replace_swaps_whole_list() {
        let mut wheel = Wheel::new(vec!["A".into(), "B".into(), "C".into(), "D".into()]);

        wheel.replace(vec!["X".into(), "Y".into()]);
        assert_eq!(wheel.items(), ["X", "Y"]);
        assert_eq!(wheel.len(), 2);

        wheel.replace(Vec::new());
        assert!(wheel.is_empty());
    }

    #[test]
    fn test_shuffle_keeps_labels() {
        let labels: Vec<String> = (1..=10).map(|i| format!("Prize {}", i)).collect();
        let mut wheel = Wheel::new(labels.clone());
        wheel.shuffle(&mut StdRng::seed_from_u64(3));

        let mut shuffled = wheel.items().to_vec();
        shuffled.sort();
        let mut expected = labels;
        expected.sort();
        assert_eq!(shuffled, expected);
    }
}
