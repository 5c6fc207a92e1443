use racg_engine::{
    first_letter_excluder, geodesic_machine, geodesic_suffix_machine, intersection, reduce,
    shortlex_machine, shortlex_normal_form, shortlex_suffix_machine, suffix_machine_1234,
    IncrementalUpdate, Letter, LetterSet, Presentation, Ray, StateLabel, TransferMatrix, Word,
};

/// The right-angled Coxeter group of the pentagon: each letter commutes with
/// its two neighbours on the 5-cycle a-b-c-d-e-a.
fn pentagon() -> Presentation {
    Presentation::from_edges(
        "abcde",
        &[('a', 'b'), ('b', 'c'), ('c', 'd'), ('d', 'e'), ('e', 'a')],
    )
    .unwrap()
}

fn letters(symbols: &str) -> Vec<Letter> {
    symbols.chars().map(Letter).collect()
}

/// Walks a single word through the geodesic machine and checks every
/// intermediate forbidden set.
#[test]
fn test_geodesic_walk() {
    let p = pentagon();
    let machine = geodesic_machine(&p, None).unwrap();

    let mut run = machine.run();
    let expected = [
        // `a` is forbidden right after `a`.
        ('a', "a"),
        // `c` does not commute with `a`, so `a` is free again.
        ('c', "c"),
        // `d` commutes with `c`: both are now forbidden.
        ('d', "cd"),
        // `b` commutes with `c` only.
        ('b', "bc"),
    ];
    for (symbol, forbidden) in expected {
        run.update(&Letter(symbol));
        assert_eq!(
            run.current(),
            Some(&StateLabel::Letters(LetterSet::from_chars(forbidden))),
            "after reading {}",
            symbol
        );
        assert!(run.is_accepting());
    }

    // The second `c` meets the first across `d` and `b`, which both commute
    // with it.
    let word = letters("acdbc");
    assert!(!machine.accepts(&word));
    let mut reduced = Word::from_letters(word);
    reduce(&mut reduced, &p);
    assert_eq!(reduced.to_string(), "adb");
}

#[test]
fn test_machine_sizes() {
    let p = pentagon();
    let ray = Ray::new(&p, Letter('a'), Letter('c')).unwrap();

    let sizes = |automaton: &racg_engine::Automaton<Letter>| {
        (automaton.state_count(), automaton.transition_count())
    };
    assert_eq!(sizes(&shortlex_machine(&p, None).unwrap()), (8, 24));
    assert_eq!(sizes(&geodesic_machine(&p, None).unwrap()), (11, 40));
    assert_eq!(sizes(&first_letter_excluder(&p, &LetterSet::from_chars("d")).unwrap()), (2, 9));
    assert_eq!(sizes(&shortlex_suffix_machine(&p, &ray).unwrap()), (13, 34));
    assert_eq!(sizes(&geodesic_suffix_machine(&p, &ray).unwrap()), (16, 52));
}

/// The suffix machine is exactly the base machine intersected with the
/// excluder for the ray letters.
#[test]
fn test_suffix_machine_is_an_intersection() {
    let p = pentagon();
    let ray = Ray::new(&p, Letter('a'), Letter('c')).unwrap();
    let direct = shortlex_suffix_machine(&p, &ray).unwrap();
    let composed = intersection(
        &shortlex_machine(&p, None).unwrap(),
        &first_letter_excluder(&p, &ray.letters()).unwrap(),
    )
    .unwrap();
    assert_eq!(direct, composed);

    for word in direct.accepted_words(4) {
        // No accepted word can be shuffled to start with a ray letter.
        let first = word.first().copied();
        assert_ne!(first, Some(Letter('a')));
        assert_ne!(first, Some(Letter('c')));
    }
}

#[test]
fn test_normal_forms_are_accepted() {
    let p = pentagon();
    let machine = shortlex_machine(&p, None).unwrap();
    for symbols in ["edcba", "ebebeb", "dacbe", "cadbec"] {
        let normal = shortlex_normal_form(&Word::from(symbols), &p);
        assert!(machine.accepts(normal.iter()), "{} -> {}", symbols, normal);
    }
}

#[test]
fn test_growth_matches_enumeration() {
    let p = pentagon();
    let ray = Ray::new(&p, Letter('a'), Letter('c')).unwrap();
    let machine = suffix_machine_1234(&p, &ray).unwrap();

    let mut enumerated = vec![0u64; 5];
    for word in machine.accepted_words(4) {
        enumerated[word.len()] += 1;
    }
    assert_eq!(TransferMatrix::new(&machine).word_counts(4).unwrap(), enumerated);
}
