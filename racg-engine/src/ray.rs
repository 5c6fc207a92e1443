use crate::error::{AutomatonError, Result};
use crate::presentation::Presentation;
use crate::types::{Letter, LetterSet, Word};

/// A geodesic ray to infinity, generated by two non-commuting letters.
///
/// The ray is the infinite word `a_i a_j a_i a_j ...`; its two letters are the
/// ones suffix machines keep away from the front of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ray {
    first: Letter,
    second: Letter,
}

impl Ray {
    /// Creates a ray from its two letters.
    ///
    /// # Errors
    /// `MalformedInput` if either letter is outside the alphabet, the letters
    /// coincide, or they commute.
    pub fn new(presentation: &Presentation, first: Letter, second: Letter) -> Result<Self> {
        let ray = Ray { first, second };
        ray.validate(presentation)?;
        Ok(ray)
    }

    /// Creates a ray from a slice that must hold exactly two letters.
    pub fn from_letters(presentation: &Presentation, letters: &[Letter]) -> Result<Self> {
        match letters {
            [first, second] => Ray::new(presentation, *first, *second),
            _ => Err(AutomatonError::MalformedInput(format!(
                "a ray is defined by exactly two letters, got {}",
                letters.len()
            ))),
        }
    }

    /// Re-checks the ray against a presentation.
    ///
    /// Generators call this before exploring, since a ray may have been built
    /// against different defining data.
    pub fn validate(&self, presentation: &Presentation) -> Result<()> {
        for letter in [self.first, self.second] {
            if !presentation.alphabet().contains(letter) {
                return Err(AutomatonError::MalformedInput(format!(
                    "ray letter {} is not in the alphabet",
                    letter
                )));
            }
        }
        if self.first == self.second {
            return Err(AutomatonError::MalformedInput(format!(
                "the ray needs two distinct letters, got {} twice",
                self.first
            )));
        }
        if presentation.commutes(self.first, self.second) {
            return Err(AutomatonError::MalformedInput(format!(
                "the ray letters {} and {} commute",
                self.first, self.second
            )));
        }
        Ok(())
    }

    /// The first letter, `a_i`.
    pub fn first(&self) -> Letter {
        self.first
    }

    /// The second letter, `a_j`.
    pub fn second(&self) -> Letter {
        self.second
    }

    /// Both ray letters as a set.
    pub fn letters(&self) -> LetterSet {
        [self.first, self.second].into_iter().collect()
    }

    /// Returns the letter at `position` along the ray (0-based).
    pub fn letter_at(&self, position: usize) -> Letter {
        if position % 2 == 0 {
            self.first
        } else {
            self.second
        }
    }

    /// Returns the first `length` letters of the ray as a word.
    ///
    /// # Example
    /// ```
    /// use racg_engine::{Letter, Presentation, Ray};
    ///
    /// let p = Presentation::from_edges("abc", &[('a', 'b')]).unwrap();
    /// let ray = Ray::new(&p, Letter('a'), Letter('c')).unwrap();
    /// assert_eq!(ray.prefix(3).to_string(), "aca");
    /// ```
    pub fn prefix(&self, length: usize) -> Word {
        (0..length).map(|position| self.letter_at(position)).collect::<Vec<_>>().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pentagon() -> Presentation {
        Presentation::from_edges(
            "abcde",
            &[('a', 'b'), ('b', 'c'), ('c', 'd'), ('d', 'e'), ('e', 'a')],
        )
        .unwrap()
    }

    #[test]
    fn test_valid_ray() {
        let p = pentagon();
        let ray = Ray::new(&p, Letter('a'), Letter('c')).unwrap();
        assert_eq!(ray.letters(), LetterSet::from_chars("ac"));
        assert_eq!(ray.letter_at(0), Letter('a'));
        assert_eq!(ray.letter_at(5), Letter('c'));
    }

    #[test]
    fn test_commuting_ray_rejected() {
        let p = pentagon();
        assert!(Ray::new(&p, Letter('a'), Letter('b')).is_err());
    }

    #[test]
    fn test_degenerate_ray_rejected() {
        let p = pentagon();
        assert!(Ray::new(&p, Letter('a'), Letter('a')).is_err());
        assert!(Ray::new(&p, Letter('a'), Letter('z')).is_err());
    }

    #[test]
    fn test_ray_needs_exactly_two_letters() {
        let p = pentagon();
        assert!(Ray::from_letters(&p, &[Letter('a')]).is_err());
        assert!(Ray::from_letters(&p, &[Letter('a'), Letter('c'), Letter('e')]).is_err());
        assert!(Ray::from_letters(&p, &[Letter('a'), Letter('c')]).is_ok());
    }

    #[test]
    fn test_prefix() {
        let p = pentagon();
        let ray = Ray::new(&p, Letter('c'), Letter('a')).unwrap();
        assert_eq!(ray.prefix(0), Word::new());
        assert_eq!(ray.prefix(4).to_string(), "caca");
    }
}
