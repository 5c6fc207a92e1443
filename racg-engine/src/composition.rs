use crate::automaton::{Automaton, AutomatonBuilder, Parity, State, StateLabel, Symbol};
use crate::error::{AutomatonError, Result};
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::debug;

/// Product construction over the pairs reachable from the initial pair.
///
/// A pair gets a transition on `s` exactly when both components have one.
/// `is_final` decides the final flag of each discovered pair.
fn product<S, F>(left: &Automaton<S>, right: &Automaton<S>, is_final: F) -> Result<Automaton<S>>
where
    S: Symbol,
    F: Fn(&State, &State) -> bool,
{
    let finality = |l: &StateLabel, r: &StateLabel| match (left.state(l), right.state(r)) {
        (Some(l), Some(r)) => is_final(l, r),
        _ => false,
    };

    let start = (left.initial_state().label(), right.initial_state().label());
    let mut builder = AutomatonBuilder::new(
        StateLabel::pair(start.0, start.1),
        finality(start.0, start.1),
    );

    let mut frontier = VecDeque::from([start]);
    let mut discovered: HashSet<(&StateLabel, &StateLabel)> = HashSet::from([start]);

    while let Some((l, r)) = frontier.pop_front() {
        let source = StateLabel::pair(l, r);
        for (symbol, l_next) in left.iter_transitions(l) {
            let Some(r_next) = right.next(r, symbol) else {
                continue;
            };
            let target = StateLabel::pair(l_next, r_next);
            if discovered.insert((l_next, r_next)) {
                builder.add_state(target.clone(), finality(l_next, r_next));
                frontier.push_back((l_next, r_next));
            }
            builder.add_transition(source.clone(), symbol.clone(), target)?;
        }
    }

    Ok(builder.build())
}

/// Accepts exactly the words accepted by both operands.
///
/// States are the reachable pairs `(left, right)`; a pair is final iff both
/// components are.
///
/// # Errors
/// `EmptyLanguage` if no final pair is reachable.
pub fn intersection<S: Symbol>(left: &Automaton<S>, right: &Automaton<S>) -> Result<Automaton<S>> {
    let result = product(left, right, |l, r| l.is_final() && r.is_final())?;
    if result.final_states().next().is_none() {
        return Err(AutomatonError::EmptyLanguage);
    }
    debug!(
        states = result.state_count(),
        transitions = result.transition_count(),
        "intersection constructed"
    );
    Ok(result)
}

/// Builds an epsilon-free automaton for `L(first) · L(second)`.
///
/// Valid when no word of `L(first)` ends with a letter that a word of
/// `L(second)` begins with, and `L(second)` contains the empty word. Final
/// states of `first` stay final, and the edges leaving the initial state of
/// `second` are grafted onto every one of them.
///
/// The initial state of `second` and its edges are not copied, so `second`
/// must never return to it.
///
/// # Errors
/// `PreconditionViolation` if `second` rejects the empty word, re-enters its
/// initial state, or if a final state of `first` already reads a letter that
/// leaves the initial state of `second`.
pub fn unambiguous_concatenation<S: Symbol>(
    first: &Automaton<S>,
    second: &Automaton<S>,
) -> Result<Automaton<S>> {
    if first.is_empty_word_automaton() && second.is_empty_word_automaton() {
        return Ok(first.clone());
    }

    let second_initial = second.initial_state();
    if !second_initial.is_final() {
        return Err(AutomatonError::PreconditionViolation(
            "the second operand must accept the empty word".to_string(),
        ));
    }
    if second
        .all_transitions()
        .any(|(_, _, to)| to == second_initial.label())
    {
        return Err(AutomatonError::PreconditionViolation(
            "the second operand re-enters its initial state".to_string(),
        ));
    }

    let grafted: Vec<(&S, &StateLabel)> = second.iter_transitions(second_initial.label()).collect();
    for state in first.final_states() {
        for (symbol, _) in &grafted {
            if first.next(state.label(), symbol).is_some() {
                return Err(AutomatonError::PreconditionViolation(format!(
                    "final state {} of the first operand reads {:?}, which also begins the second operand",
                    state.label(),
                    symbol
                )));
            }
        }
    }

    let first_initial = first.initial_state();
    let mut builder = AutomatonBuilder::new(
        StateLabel::tagged(0, first_initial.label()),
        first_initial.is_final(),
    );
    for state in first.states() {
        builder.add_state(StateLabel::tagged(0, state.label()), state.is_final());
    }
    for state in second.states().filter(|state| !state.is_initial()) {
        builder.add_state(StateLabel::tagged(1, state.label()), state.is_final());
    }

    for (from, symbol, to) in first.all_transitions() {
        builder.add_transition(
            StateLabel::tagged(0, from),
            symbol.clone(),
            StateLabel::tagged(0, to),
        )?;
    }
    for (from, symbol, to) in second.all_transitions() {
        if from == second_initial.label() {
            continue;
        }
        builder.add_transition(
            StateLabel::tagged(1, from),
            symbol.clone(),
            StateLabel::tagged(1, to),
        )?;
    }
    for state in first.final_states() {
        for (symbol, to) in &grafted {
            builder.add_transition(
                StateLabel::tagged(0, state.label()),
                (*symbol).clone(),
                StateLabel::tagged(1, to),
            )?;
        }
    }

    let result = builder.build();
    debug!(
        states = result.state_count(),
        transitions = result.transition_count(),
        "concatenation constructed"
    );
    Ok(result)
}

/// Adds a non-final sink so every state reads every symbol of `alphabet`
/// (and of the automaton's own alphabet). Already complete automata are
/// returned unchanged.
///
/// The sink is labelled `Sink`, wrapped in `Tagged(0, _)` until the label is
/// not already taken by a state of `automaton`.
pub fn complete<S: Symbol>(automaton: &Automaton<S>, alphabet: &BTreeSet<S>) -> Result<Automaton<S>> {
    let alphabet: BTreeSet<S> = automaton.alphabet().union(alphabet).cloned().collect();
    if automaton.is_complete_over(&alphabet) {
        return Ok(automaton.clone());
    }

    let mut sink = StateLabel::Sink;
    while automaton.state(&sink).is_some() {
        sink = StateLabel::tagged(0, &sink);
    }

    let initial = automaton.initial_state();
    let mut builder = AutomatonBuilder::new(initial.label().clone(), initial.is_final());
    for state in automaton.states() {
        builder.add_state(state.label().clone(), state.is_final());
    }
    builder.add_state(sink.clone(), false);

    for (from, symbol, to) in automaton.all_transitions() {
        builder.add_transition(from.clone(), symbol.clone(), to.clone())?;
    }
    let labels = automaton
        .states()
        .map(|state| state.label().clone())
        .chain(std::iter::once(sink.clone()));
    for label in labels {
        for symbol in &alphabet {
            if automaton.next(&label, symbol).is_none() {
                builder.add_transition(label.clone(), symbol.clone(), sink.clone())?;
            }
        }
    }
    Ok(builder.build())
}

/// Two-state machine flipping parity on every symbol of `alphabet`.
///
/// # Errors
/// `EmptyLanguage` if no reachable parity is final. Over an empty alphabet
/// only the even state exists.
pub fn parity_machine<S: Symbol>(
    alphabet: &BTreeSet<S>,
    even_final: bool,
    odd_final: bool,
) -> Result<Automaton<S>> {
    if !even_final && (alphabet.is_empty() || !odd_final) {
        return Err(AutomatonError::EmptyLanguage);
    }

    let even = StateLabel::Parity(Parity::Even);
    let odd = StateLabel::Parity(Parity::Odd);
    let mut builder = AutomatonBuilder::new(even.clone(), even_final);
    if alphabet.is_empty() {
        return Ok(builder.build());
    }
    builder.add_state(odd.clone(), odd_final);
    for symbol in alphabet {
        builder.add_transition(even.clone(), symbol.clone(), odd.clone())?;
        builder.add_transition(odd.clone(), symbol.clone(), even.clone())?;
    }
    Ok(builder.build())
}

/// Accepts the even-length words of `L(even)` and the odd-length words of
/// `L(odd)`.
///
/// Both operands are completed first, so the product keeps tracking a word
/// in one operand after the other has rejected it. The parity component of
/// each state then selects which operand decides finality.
///
/// # Errors
/// `EmptyLanguage` if no final state is reachable.
pub fn interspersal<S: Symbol>(even: &Automaton<S>, odd: &Automaton<S>) -> Result<Automaton<S>> {
    let alphabet: BTreeSet<S> = even.alphabet().union(odd.alphabet()).cloned().collect();
    let complete_even = complete(even, &alphabet)?;
    let complete_odd = complete(odd, &alphabet)?;
    let parity = parity_machine(&alphabet, true, true)?;

    let both_final = |l: &State, r: &State| l.is_final() && r.is_final();
    let tracked = product(&complete_even, &complete_odd, both_final)?;
    // Final flags of this product are placeholders, recomputed from the
    // parity component below.
    let approximate = product(&parity, &tracked, both_final)?;

    let result = approximate.with_final_flags(|state| {
        let Some((parity, tracked)) = state.label().components() else {
            return false;
        };
        let Some((even_label, odd_label)) = tracked.components() else {
            return false;
        };
        match parity {
            StateLabel::Parity(Parity::Even) => complete_even.is_final(even_label),
            StateLabel::Parity(Parity::Odd) => complete_odd.is_final(odd_label),
            _ => false,
        }
    });

    if result.final_states().next().is_none() {
        return Err(AutomatonError::EmptyLanguage);
    }
    debug!(
        states = result.state_count(),
        transitions = result.transition_count(),
        "interspersal constructed"
    );
    Ok(result)
}
