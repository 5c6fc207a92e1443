use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A generator of the right-angled Coxeter group.
/// Every generator is an involution, so a letter is its own inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Letter(pub char);

impl Letter {
    pub fn new(symbol: char) -> Self {
        Letter(symbol)
    }

    /// Returns the character naming this letter.
    pub fn as_char(&self) -> char {
        self.0
    }
}

impl From<char> for Letter {
    fn from(symbol: char) -> Self {
        Letter(symbol)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable, canonically ordered set of letters.
///
/// Used both for alphabets and as the payload of generator state labels.
/// Set operations return new values instead of mutating in place, so a label
/// can be hashed and compared structurally for its whole lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LetterSet(BTreeSet<Letter>);

impl LetterSet {
    /// Creates a new empty set.
    pub const fn new() -> Self {
        LetterSet(BTreeSet::new())
    }

    /// Builds a set from the characters of a string, e.g. `"abc"`.
    pub fn from_chars(symbols: &str) -> Self {
        symbols
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(Letter)
            .collect()
    }

    pub fn contains(&self, letter: Letter) -> bool {
        self.0.contains(&letter)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the letters in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Letter> + '_ {
        self.0.iter().copied()
    }

    pub fn is_subset(&self, other: &LetterSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn intersection(&self, other: &LetterSet) -> LetterSet {
        LetterSet(self.0.intersection(&other.0).copied().collect())
    }

    pub fn union(&self, other: &LetterSet) -> LetterSet {
        LetterSet(self.0.union(&other.0).copied().collect())
    }

    pub fn difference(&self, other: &LetterSet) -> LetterSet {
        LetterSet(self.0.difference(&other.0).copied().collect())
    }

    /// Returns a copy of this set with `letter` added.
    pub fn with(&self, letter: Letter) -> LetterSet {
        let mut letters = self.0.clone();
        letters.insert(letter);
        LetterSet(letters)
    }
}

impl FromIterator<Letter> for LetterSet {
    fn from_iter<I: IntoIterator<Item = Letter>>(iter: I) -> Self {
        LetterSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LetterSet {
    type Item = &'a Letter;
    type IntoIter = std::collections::btree_set::Iter<'a, Letter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, letter) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", letter)?;
        }
        write!(f, "}}")
    }
}

/// A word is a sequence of letters, read left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word {
    letters: Vec<Letter>,
}

impl Word {
    /// Creates a new empty word.
    pub fn new() -> Self {
        Word {
            letters: Vec::new(),
        }
    }

    /// Creates a word from a vector of letters.
    pub fn from_letters(letters: Vec<Letter>) -> Self {
        Word { letters }
    }

    /// Appends a letter without any reduction.
    pub fn push(&mut self, letter: Letter) {
        self.letters.push(letter);
    }

    /// Extends the word with the letters of another word.
    pub fn extend(&mut self, other: &Word) {
        self.letters.extend_from_slice(&other.letters);
    }

    /// Returns an iterator over the letters.
    pub fn iter(&self) -> impl Iterator<Item = &Letter> {
        self.letters.iter()
    }

    pub fn as_slice(&self) -> &[Letter] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub(crate) fn insert(&mut self, index: usize, letter: Letter) {
        self.letters.insert(index, letter);
    }

    pub(crate) fn remove(&mut self, index: usize) -> Letter {
        self.letters.remove(index)
    }
}

impl From<Vec<Letter>> for Word {
    fn from(letters: Vec<Letter>) -> Self {
        Word::from_letters(letters)
    }
}

impl From<&str> for Word {
    fn from(symbols: &str) -> Self {
        Word::from_letters(symbols.chars().map(Letter).collect())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in &self.letters {
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}
