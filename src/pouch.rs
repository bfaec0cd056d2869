// src/pouch.rs
// The pouch of callable numbers shared by both boards of a game.

use std::collections::BTreeSet;

use crate::defs::{FIRSTNUMBER, LASTNUMBER, Number};

/// Numbers already called in the current game. Only grows until the game is reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pouch {
    called: BTreeSet<Number>,
}

impl Pouch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_called<I: IntoIterator<Item = Number>>(called: I) -> Self {
        Pouch {
            called: called.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.called.len()
    }

    pub fn is_empty(&self) -> bool {
        self.called.is_empty()
    }

    pub fn contains(&self, number: Number) -> bool {
        self.called.contains(&number)
    }

    /// Record a call. Returns false if the number had already been called.
    pub fn call(&mut self, number: Number) -> bool {
        self.called.insert(number)
    }

    pub fn called(&self) -> impl Iterator<Item = Number> + '_ {
        self.called.iter().copied()
    }

    /// Numbers that can still be called, ascending.
    pub fn remaining(&self) -> Vec<Number> {
        (FIRSTNUMBER..=LASTNUMBER)
            .filter(|number| !self.called.contains(number))
            .collect()
    }

    pub fn clear(&mut self) {
        self.called.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_is_monotonic() {
        let mut pouch = Pouch::new();
        assert!(pouch.is_empty());
        assert!(pouch.call(7));
        assert!(!pouch.call(7));
        assert!(pouch.call(1));
        assert_eq!(pouch.len(), 2);
        assert_eq!(pouch.called().collect::<Vec<_>>(), vec![1, 7]);
        assert_eq!(pouch.remaining().len(), 23);
        assert!(!pouch.remaining().contains(&7));
    }

    #[test]
    fn test_from_called_and_clear() {
        let mut pouch = Pouch::from_called([3, 3, 9]);
        assert_eq!(pouch.len(), 2);
        assert!(pouch.contains(9));
        pouch.clear();
        assert_eq!(pouch.remaining().len(), 25);
    }
}
