use crate::automaton::IncrementalUpdate;
use crate::presentation::Presentation;
use crate::types::{Letter, Word};

/// Finds an occurrence of `letter` that can be shuffled to the end of `word`.
///
/// Scans from the right and stops at the first letter that does not commute
/// with `letter`. Since generators are involutions, that occurrence cancels
/// with an appended copy of `letter`.
fn cancelling_index(word: &Word, letter: Letter, presentation: &Presentation) -> Option<usize> {
    for (index, &current) in word.as_slice().iter().enumerate().rev() {
        if current == letter {
            return Some(index);
        }
        if !presentation.commutes(current, letter) {
            return None;
        }
    }
    None
}

/// Reduces a word to a geodesic representative of the same group element.
///
/// Letters are appended one at a time; an appended letter that meets an equal
/// letter across a run of commuting letters cancels with it. The relative
/// order of the surviving letters is unchanged, so an already geodesic word
/// is returned as is.
///
/// # Example
/// ```
/// use racg_engine::{reduce, Presentation, Word};
///
/// let pentagon = Presentation::from_edges(
///     "abcde",
///     &[('a', 'b'), ('b', 'c'), ('c', 'd'), ('d', 'e'), ('e', 'a')],
/// )
/// .unwrap();
/// let mut word = Word::from("abac");
/// reduce(&mut word, &pentagon);
/// assert_eq!(word.to_string(), "bc");
/// ```
pub fn reduce(word: &mut Word, presentation: &Presentation) {
    let mut reduced = Word::new();
    for &letter in word.iter() {
        match cancelling_index(&reduced, letter, presentation) {
            Some(index) => {
                reduced.remove(index);
            }
            None => reduced.push(letter),
        }
    }
    *word = reduced;
}

/// Returns `true` if no letter of `word` cancels.
pub fn is_geodesic(word: &Word, presentation: &Presentation) -> bool {
    let mut reduced = word.clone();
    reduce(&mut reduced, presentation);
    reduced.len() == word.len()
}

/// Right-multiplies a ShortLex normal form by `letter`, keeping it normal.
///
/// The letter either cancels, or travels left through the commuting tail of
/// the word and settles before the leftmost letter of larger rank.
pub fn shortlex_append(word: &mut Word, letter: Letter, presentation: &Presentation) {
    if let Some(index) = cancelling_index(word, letter, presentation) {
        word.remove(index);
        return;
    }

    let mut insert_at = word.len();
    for (index, &current) in word.as_slice().iter().enumerate().rev() {
        if !presentation.commutes(current, letter) {
            break;
        }
        if presentation.precedes(letter, current) {
            insert_at = index;
        }
    }
    word.insert(insert_at, letter);
}

/// Returns the ShortLex normal form of the element spelled by `word`.
pub fn shortlex_normal_form(word: &Word, presentation: &Presentation) -> Word {
    let mut accumulator = ShortlexAccumulator::new(presentation);
    for letter in word.iter() {
        accumulator.update(letter);
    }
    accumulator.into_word()
}

/// Streaming ShortLex normal form of the letters fed so far.
#[derive(Debug, Clone)]
pub struct ShortlexAccumulator<'a> {
    presentation: &'a Presentation,
    word: Word,
}

impl<'a> ShortlexAccumulator<'a> {
    pub fn new(presentation: &'a Presentation) -> Self {
        ShortlexAccumulator {
            presentation,
            word: Word::new(),
        }
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn into_word(self) -> Word {
        self.word
    }
}

impl<'a> IncrementalUpdate<Letter> for ShortlexAccumulator<'a> {
    fn update(&mut self, letter: &Letter) {
        shortlex_append(&mut self.word, *letter, self.presentation);
    }
}
