use crate::error::{AutomatonError, Result};
use crate::types::{Letter, LetterSet};
use std::collections::{BTreeMap, BTreeSet};

static NO_LETTERS: LetterSet = LetterSet::new();

/// Defining data of a right-angled Coxeter group: an alphabet, a symmetric
/// commutation relation and a total order used for ShortLex tie-breaking.
///
/// This is the explicit context handed to every generator; nothing in the
/// crate keeps a global default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    alphabet: LetterSet,
    commutation: BTreeMap<Letter, LetterSet>,
    order: BTreeMap<Letter, usize>,
    lesser_star: BTreeMap<Letter, LetterSet>,
    greater_star: BTreeMap<Letter, LetterSet>,
}

impl Presentation {
    /// Validates and assembles a presentation.
    ///
    /// The alphabet is the key set of `order`. Letters missing from
    /// `commutation` commute with nothing.
    ///
    /// # Errors
    /// `MalformedInput` if the order is not injective, the relation mentions a
    /// letter outside the alphabet, relates a letter to itself, or is not
    /// symmetric.
    pub fn new(
        commutation: BTreeMap<Letter, LetterSet>,
        order: BTreeMap<Letter, usize>,
    ) -> Result<Self> {
        let alphabet: LetterSet = order.keys().copied().collect();

        let mut seen_ranks = BTreeMap::new();
        for (&letter, &rank) in &order {
            if let Some(other) = seen_ranks.insert(rank, letter) {
                return Err(AutomatonError::MalformedInput(format!(
                    "order is not injective: {} and {} share rank {}",
                    other, letter, rank
                )));
            }
        }

        for (&letter, neighbours) in &commutation {
            if !alphabet.contains(letter) {
                return Err(AutomatonError::MalformedInput(format!(
                    "commutation relation mentions {} which has no rank",
                    letter
                )));
            }
            for neighbour in neighbours.iter() {
                if neighbour == letter {
                    return Err(AutomatonError::MalformedInput(format!(
                        "{} cannot commute with itself",
                        letter
                    )));
                }
                if !alphabet.contains(neighbour) {
                    return Err(AutomatonError::MalformedInput(format!(
                        "{} commutes with {} which has no rank",
                        letter, neighbour
                    )));
                }
                let symmetric = commutation
                    .get(&neighbour)
                    .map_or(false, |back| back.contains(letter));
                if !symmetric {
                    return Err(AutomatonError::MalformedInput(format!(
                        "commutation relation is not symmetric: {} commutes with {} but not conversely",
                        letter, neighbour
                    )));
                }
            }
        }

        let commutation: BTreeMap<Letter, LetterSet> = alphabet
            .iter()
            .map(|letter| {
                let neighbours = commutation.get(&letter).cloned().unwrap_or_default();
                (letter, neighbours)
            })
            .collect();

        // Star_<(x): letters commuting with x and strictly preceding it.
        let mut lesser_star = BTreeMap::new();
        let mut greater_star = BTreeMap::new();
        for (&letter, neighbours) in &commutation {
            let rank = order[&letter];
            let lesser: LetterSet = neighbours.iter().filter(|n| order[n] < rank).collect();
            greater_star.insert(letter, neighbours.difference(&lesser));
            lesser_star.insert(letter, lesser);
        }

        Ok(Presentation {
            alphabet,
            commutation,
            order,
            lesser_star,
            greater_star,
        })
    }

    /// Builds a presentation from letters listed in increasing order and a
    /// list of commuting pairs. Each pair is added in both directions.
    ///
    /// # Example
    /// ```
    /// use racg_engine::Presentation;
    ///
    /// let pentagon = Presentation::from_edges(
    ///     "abcde",
    ///     &[('a', 'b'), ('b', 'c'), ('c', 'd'), ('d', 'e'), ('e', 'a')],
    /// )
    /// .unwrap();
    /// assert!(pentagon.commutes('a'.into(), 'e'.into()));
    /// ```
    pub fn from_edges(letters_in_order: &str, edges: &[(char, char)]) -> Result<Self> {
        let mut order = BTreeMap::new();
        for (rank, symbol) in letters_in_order.chars().filter(|c| !c.is_whitespace()).enumerate() {
            if order.insert(Letter(symbol), rank).is_some() {
                return Err(AutomatonError::MalformedInput(format!(
                    "letter {} listed twice",
                    symbol
                )));
            }
        }

        let mut commutation: BTreeMap<Letter, BTreeSet<Letter>> = BTreeMap::new();
        for &(left, right) in edges {
            commutation.entry(Letter(left)).or_default().insert(Letter(right));
            commutation.entry(Letter(right)).or_default().insert(Letter(left));
        }
        let commutation = commutation
            .into_iter()
            .map(|(letter, neighbours)| (letter, neighbours.into_iter().collect()))
            .collect();

        Presentation::new(commutation, order)
    }

    pub fn alphabet(&self) -> &LetterSet {
        &self.alphabet
    }

    /// Returns the letters commuting with `letter` (empty for unknown letters).
    pub fn commute(&self, letter: Letter) -> &LetterSet {
        self.commutation.get(&letter).unwrap_or(&NO_LETTERS)
    }

    pub fn commutes(&self, left: Letter, right: Letter) -> bool {
        self.commute(left).contains(right)
    }

    /// Returns the rank of `letter` in the total order.
    pub fn rank(&self, letter: Letter) -> Option<usize> {
        self.order.get(&letter).copied()
    }

    /// Letters that commute with `letter` and precede it in the order.
    pub fn lesser_star(&self, letter: Letter) -> &LetterSet {
        self.lesser_star.get(&letter).unwrap_or(&NO_LETTERS)
    }

    /// Letters that commute with `letter` and follow it in the order.
    pub fn greater_star(&self, letter: Letter) -> &LetterSet {
        self.greater_star.get(&letter).unwrap_or(&NO_LETTERS)
    }

    /// Returns `true` if `left` strictly precedes `right` in the total order.
    pub fn precedes(&self, left: Letter, right: Letter) -> bool {
        match (self.rank(left), self.rank(right)) {
            (Some(l), Some(r)) => l < r,
            _ => false,
        }
    }

    /// Returns the letters of `set` sorted by rank.
    pub fn sorted(&self, set: &LetterSet) -> Vec<Letter> {
        let mut letters: Vec<Letter> = set.iter().collect();
        letters.sort_by_key(|letter| self.rank(*letter));
        letters
    }

    /// Checks that `subset` only uses letters of the alphabet.
    pub fn check_subset(&self, subset: &LetterSet, role: &str) -> Result<()> {
        if subset.is_subset(&self.alphabet) {
            Ok(())
        } else {
            Err(AutomatonError::MalformedInput(format!(
                "{} {} is not a subset of the alphabet {}",
                role,
                subset.difference(&self.alphabet),
                self.alphabet
            )))
        }
    }
}
