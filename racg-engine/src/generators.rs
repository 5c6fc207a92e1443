use crate::automaton::{Automaton, AutomatonBuilder, Parity, StateLabel};
use crate::composition::{intersection, parity_machine};
use crate::error::Result;
use crate::presentation::Presentation;
use crate::ray::Ray;
use crate::types::{Letter, LetterSet};
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::{debug, info};

/// Breadth-first construction shared by every generator.
///
/// Labels are letter sets naming the letters forbidden next. From each label,
/// every candidate letter outside it gets a transition to `step(label, letter)`.
/// All states are final since the languages are prefix-closed.
fn explore<F>(
    machine: &'static str,
    initial: LetterSet,
    candidates: &LetterSet,
    step: F,
) -> Result<Automaton<Letter>>
where
    F: Fn(&LetterSet, Letter) -> LetterSet,
{
    let mut builder = AutomatonBuilder::new(StateLabel::Letters(initial.clone()), true);
    let mut frontier = VecDeque::from([initial.clone()]);
    let mut discovered: HashSet<LetterSet> = HashSet::from([initial]);

    while let Some(label) = frontier.pop_front() {
        let source = StateLabel::Letters(label.clone());
        for letter in candidates.iter().filter(|letter| !label.contains(*letter)) {
            let next = step(&label, letter);
            if discovered.insert(next.clone()) {
                builder.add_state(StateLabel::Letters(next.clone()), true);
                frontier.push_back(next.clone());
            }
            builder.add_transition(source.clone(), letter, StateLabel::Letters(next))?;
        }
    }

    let automaton = builder.build();
    debug!(
        machine,
        states = automaton.state_count(),
        transitions = automaton.transition_count(),
        "machine constructed"
    );
    Ok(automaton)
}

/// Resolves an optional restricted alphabet against the presentation.
fn restriction<'a>(presentation: &'a Presentation, restricted: Option<&'a LetterSet>) -> Result<&'a LetterSet> {
    match restricted {
        Some(subset) => {
            presentation.check_subset(subset, "restricted alphabet")?;
            Ok(subset)
        }
        None => Ok(presentation.alphabet()),
    }
}

/// Accepts exactly the words that cannot be rearranged, using commutations,
/// to begin with a letter of `excluded`.
///
/// A state is the part of `excluded` that could still be moved to the front.
/// Reading `l` keeps only the excluded letters commuting with `l`.
///
/// # Errors
/// `MalformedInput` if `excluded` is not contained in the alphabet.
pub fn first_letter_excluder(presentation: &Presentation, excluded: &LetterSet) -> Result<Automaton<Letter>> {
    presentation.check_subset(excluded, "excluded set")?;
    if excluded == presentation.alphabet() {
        info!(excluded = %excluded, "every letter excluded, accepting only the empty word");
        return Ok(Automaton::empty_word());
    }

    explore(
        "first_letter_excluder",
        excluded.clone(),
        presentation.alphabet(),
        |label, letter| label.intersection(presentation.commute(letter)),
    )
}

/// Accepts the ShortLex normal forms of the elements spelled with letters of
/// `restricted` (the whole alphabet when `None`).
///
/// A state is the set of letters that may not come next: the last letter,
/// the earlier letters it commutes with, and the smaller letters it commutes
/// with, since any of these could be shuffled leftwards to a smaller word.
///
/// # Example
/// ```
/// use racg_engine::{shortlex_machine, Letter, Presentation};
///
/// let pentagon = Presentation::from_edges(
///     "abcde",
///     &[('a', 'b'), ('b', 'c'), ('c', 'd'), ('d', 'e'), ('e', 'a')],
/// )
/// .unwrap();
/// let machine = shortlex_machine(&pentagon, None).unwrap();
/// assert!(machine.accepts([Letter('a'), Letter('b')]));
/// assert!(!machine.accepts([Letter('b'), Letter('a')]));
/// ```
pub fn shortlex_machine(presentation: &Presentation, restricted: Option<&LetterSet>) -> Result<Automaton<Letter>> {
    let restricted = restriction(presentation, restricted)?;
    if restricted.is_empty() {
        info!("empty restricted alphabet, accepting only the empty word");
        return Ok(Automaton::empty_word());
    }

    explore("shortlex_machine", LetterSet::new(), restricted, |label, letter| {
        label
            .intersection(presentation.commute(letter))
            .union(&presentation.lesser_star(letter).intersection(restricted))
            .with(letter)
    })
}

/// Accepts the geodesic words over `restricted` (the whole alphabet when
/// `None`): those in which no letter can be shuffled next to an equal one.
pub fn geodesic_machine(presentation: &Presentation, restricted: Option<&LetterSet>) -> Result<Automaton<Letter>> {
    let restricted = restriction(presentation, restricted)?;
    if restricted.is_empty() {
        info!("empty restricted alphabet, accepting only the empty word");
        return Ok(Automaton::empty_word());
    }

    explore("geodesic_machine", LetterSet::new(), restricted, |label, letter| {
        label.intersection(presentation.commute(letter)).with(letter)
    })
}

/// ShortLex words that cannot be rearranged to start with a ray letter.
pub fn shortlex_suffix_machine(presentation: &Presentation, ray: &Ray) -> Result<Automaton<Letter>> {
    ray.validate(presentation)?;
    intersection(
        &shortlex_machine(presentation, None)?,
        &first_letter_excluder(presentation, &ray.letters())?,
    )
}

/// Geodesic words that cannot be rearranged to start with a ray letter.
pub fn geodesic_suffix_machine(presentation: &Presentation, ray: &Ray) -> Result<Automaton<Letter>> {
    ray.validate(presentation)?;
    intersection(
        &geodesic_machine(presentation, None)?,
        &first_letter_excluder(presentation, &ray.letters())?,
    )
}

/// Accepts every word over the alphabet whose length has the given parity.
///
/// # Errors
/// `EmptyLanguage` for odd lengths over an empty alphabet.
pub fn length_parity_machine(presentation: &Presentation, parity: Parity) -> Result<Automaton<Letter>> {
    let alphabet: BTreeSet<Letter> = presentation.alphabet().iter().collect();
    parity_machine(&alphabet, parity == Parity::Even, parity == Parity::Odd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutomatonError;

    fn pentagon() -> Presentation {
        Presentation::from_edges(
            "abcde",
            &[('a', 'b'), ('b', 'c'), ('c', 'd'), ('d', 'e'), ('e', 'a')],
        )
        .unwrap()
    }

    fn word(symbols: &str) -> Vec<Letter> {
        symbols.chars().map(Letter).collect()
    }

    fn words(automaton: &Automaton<Letter>, max_len: usize) -> Vec<String> {
        automaton
            .accepted_words(max_len)
            .into_iter()
            .map(|word| word.into_iter().map(|l| l.as_char()).collect())
            .collect()
    }

    fn counts_by_length(automaton: &Automaton<Letter>, max_len: usize) -> Vec<usize> {
        let mut counts = vec![0; max_len + 1];
        for word in automaton.accepted_words(max_len) {
            counts[word.len()] += 1;
        }
        counts
    }

    #[test]
    fn test_pentagon_sizes() {
        let p = pentagon();
        let shortlex = shortlex_machine(&p, None).unwrap();
        assert_eq!((shortlex.state_count(), shortlex.transition_count()), (8, 24));
        let geodesic = geodesic_machine(&p, None).unwrap();
        assert_eq!((geodesic.state_count(), geodesic.transition_count()), (11, 40));
    }

    #[test]
    fn test_restricted_sizes() {
        let p = pentagon();
        let abc = LetterSet::from_chars("abc");
        let shortlex = shortlex_machine(&p, Some(&abc)).unwrap();
        assert_eq!((shortlex.state_count(), shortlex.transition_count()), (4, 7));
        let geodesic = geodesic_machine(&p, Some(&abc)).unwrap();
        assert_eq!((geodesic.state_count(), geodesic.transition_count()), (6, 11));
    }

    #[test]
    fn test_restricted_shortlex_words() {
        let p = pentagon();
        let machine = shortlex_machine(&p, Some(&LetterSet::from_chars("abc"))).unwrap();
        assert_eq!(
            words(&machine, 3),
            vec!["", "a", "b", "c", "ab", "ac", "bc", "ca", "abc", "aca", "bca", "cac"]
        );
    }

    #[test]
    fn test_pentagon_growth_series() {
        let p = pentagon();
        let shortlex = shortlex_machine(&p, None).unwrap();
        assert_eq!(counts_by_length(&shortlex, 6), vec![1, 5, 15, 40, 105, 275, 720]);
        let geodesic = geodesic_machine(&p, None).unwrap();
        assert_eq!(counts_by_length(&geodesic, 4), vec![1, 5, 20, 70, 240]);
    }

    #[test]
    fn test_geodesic_scenario() {
        let machine = geodesic_machine(&pentagon(), None).unwrap();
        assert!(machine.accepts(word("a")));
        assert!(machine.accepts(word("ac")));
        // `bab` shuffles to `abb`.
        assert!(!machine.accepts(word("bab")));
        assert!(machine.accepts(word("ba")));
        assert!(machine.accepts(word("ab")));
    }

    #[test]
    fn test_excluder() {
        let p = pentagon();
        let machine = first_letter_excluder(&p, &LetterSet::from_chars("d")).unwrap();
        assert_eq!((machine.state_count(), machine.transition_count()), (2, 9));

        let machine = first_letter_excluder(&p, &LetterSet::from_chars("ac")).unwrap();
        assert_eq!(
            words(&machine, 2),
            vec!["", "b", "d", "e", "bb", "bd", "be", "da", "db", "dd", "de", "eb", "ec", "ed", "ee"]
        );
    }

    #[test]
    fn test_excluder_extremes() {
        let p = pentagon();
        let nothing = first_letter_excluder(&p, &LetterSet::new()).unwrap();
        assert_eq!(nothing.state_count(), 1);
        assert!(nothing.accepts(word("aabbcceedd")));

        let everything = first_letter_excluder(&p, p.alphabet()).unwrap();
        assert!(everything.is_empty_word_automaton());
        assert!(everything.accepts(word("")));
        assert!(!everything.accepts(word("a")));
    }

    #[test]
    fn test_empty_restriction() {
        let p = pentagon();
        let machine = shortlex_machine(&p, Some(&LetterSet::new())).unwrap();
        assert!(machine.is_empty_word_automaton());
        let machine = geodesic_machine(&p, Some(&LetterSet::new())).unwrap();
        assert!(machine.is_empty_word_automaton());
    }

    #[test]
    fn test_restriction_outside_alphabet() {
        let p = pentagon();
        let err = shortlex_machine(&p, Some(&LetterSet::from_chars("az"))).unwrap_err();
        assert!(matches!(err, AutomatonError::MalformedInput(_)));
        assert!(geodesic_machine(&p, Some(&LetterSet::from_chars("q"))).is_err());
        assert!(first_letter_excluder(&p, &LetterSet::from_chars("q")).is_err());
    }

    #[test]
    fn test_suffix_machines() {
        let p = pentagon();
        let ray = Ray::new(&p, Letter('a'), Letter('c')).unwrap();
        let shortlex = shortlex_suffix_machine(&p, &ray).unwrap();
        assert_eq!((shortlex.state_count(), shortlex.transition_count()), (13, 34));
        assert_eq!(
            words(&shortlex, 2),
            vec!["", "b", "d", "e", "bd", "be", "da", "db", "de", "eb", "ec"]
        );
        let geodesic = geodesic_suffix_machine(&p, &ray).unwrap();
        assert_eq!((geodesic.state_count(), geodesic.transition_count()), (16, 52));
    }

    #[test]
    fn test_suffix_machine_checks_ray() {
        let p = pentagon();
        let other = Presentation::from_edges("ab", &[]).unwrap();
        let ray = Ray::new(&other, Letter('a'), Letter('b')).unwrap();
        // `a` and `b` commute in the pentagon.
        assert!(shortlex_suffix_machine(&p, &ray).is_err());
    }

    #[test]
    fn test_length_parity_machine() {
        let p = pentagon();
        let odd = length_parity_machine(&p, Parity::Odd).unwrap();
        assert!(odd.accepts(word("abe")));
        assert!(!odd.accepts(word("")));
        let even = length_parity_machine(&p, Parity::Even).unwrap();
        assert!(even.accepts(word("")));
        assert!(even.accepts(word("aa")));
        assert_eq!(even.transition_count(), 10);
    }

    #[test]
    fn test_length_parity_over_empty_alphabet() {
        let p = Presentation::from_edges("", &[]).unwrap();
        assert!(length_parity_machine(&p, Parity::Even).unwrap().is_empty_word_automaton());
        assert_eq!(
            length_parity_machine(&p, Parity::Odd).unwrap_err(),
            AutomatonError::EmptyLanguage
        );
    }
}
