use crate::error::{AutomatonError, Result};
use crate::types::LetterSet;
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

/// Anything usable as a transition symbol.
pub trait Symbol: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug> Symbol for T {}

/// Trait for consuming input one symbol at a time.
/// Implemented by automaton runs and by normal-form accumulators.
pub trait IncrementalUpdate<S> {
    /// Feeds the next symbol.
    fn update(&mut self, symbol: &S);
}

/// Parity of a word length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn of(length: usize) -> Self {
        if length % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        }
    }
}

/// Immutable, structurally compared name of a state.
///
/// Two states with equal labels are the same state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateLabel {
    /// The only state of the automaton accepting just the empty word.
    Origin,
    /// A set of letters, as used by every generator.
    Letters(LetterSet),
    /// Length parity tracker.
    Parity(Parity),
    /// Non-final sink added by completion.
    Sink,
    /// State of a product automaton.
    Pair(Box<StateLabel>, Box<StateLabel>),
    /// State copied from operand `0` or `1` of a concatenation.
    Tagged(u8, Box<StateLabel>),
}

impl StateLabel {
    pub fn pair(left: &StateLabel, right: &StateLabel) -> Self {
        StateLabel::Pair(Box::new(left.clone()), Box::new(right.clone()))
    }

    pub fn tagged(tag: u8, label: &StateLabel) -> Self {
        StateLabel::Tagged(tag, Box::new(label.clone()))
    }

    /// Returns the letter set carried by a generator label.
    pub fn letters(&self) -> Option<&LetterSet> {
        match self {
            StateLabel::Letters(set) => Some(set),
            _ => None,
        }
    }

    /// Returns the components of a product label.
    pub fn components(&self) -> Option<(&StateLabel, &StateLabel)> {
        match self {
            StateLabel::Pair(left, right) => Some((left.as_ref(), right.as_ref())),
            _ => None,
        }
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateLabel::Origin => write!(f, "origin"),
            StateLabel::Letters(set) => write!(f, "{}", set),
            StateLabel::Parity(Parity::Even) => write!(f, "even"),
            StateLabel::Parity(Parity::Odd) => write!(f, "odd"),
            StateLabel::Sink => write!(f, "sink"),
            StateLabel::Pair(left, right) => write!(f, "({}, {})", left, right),
            StateLabel::Tagged(tag, label) => write!(f, "({}, {})", tag, label),
        }
    }
}

/// A state: its label plus initial and final flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    label: StateLabel,
    is_initial: bool,
    is_final: bool,
}

impl State {
    pub fn label(&self) -> &StateLabel {
        &self.label
    }

    pub fn is_initial(&self) -> bool {
        self.is_initial
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }
}

/// A transition `from --symbol--> to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition<S> {
    pub from: StateLabel,
    pub to: StateLabel,
    pub symbol: S,
}

/// Incremental constructor for [`Automaton`].
///
/// The initial state is fixed at creation, so the result always has exactly
/// one initial state. Determinism is checked on every inserted transition.
#[derive(Debug, Clone)]
pub struct AutomatonBuilder<S> {
    initial: StateLabel,
    states: BTreeMap<StateLabel, State>,
    edges: BTreeMap<StateLabel, BTreeMap<S, StateLabel>>,
}

impl<S: Symbol> AutomatonBuilder<S> {
    pub fn new(initial: StateLabel, is_final: bool) -> Self {
        let mut states = BTreeMap::new();
        states.insert(
            initial.clone(),
            State {
                label: initial.clone(),
                is_initial: true,
                is_final,
            },
        );
        AutomatonBuilder {
            initial,
            states,
            edges: BTreeMap::new(),
        }
    }

    /// Adds a state, or updates the final flag of an existing one.
    /// Returns `true` if the label was new.
    pub fn add_state(&mut self, label: StateLabel, is_final: bool) -> bool {
        match self.states.get_mut(&label) {
            Some(state) => {
                state.is_final = is_final;
                false
            }
            None => {
                self.states.insert(
                    label.clone(),
                    State {
                        label,
                        is_initial: false,
                        is_final,
                    },
                );
                true
            }
        }
    }

    pub fn contains(&self, label: &StateLabel) -> bool {
        self.states.contains_key(label)
    }

    /// Adds `from --symbol--> to`. Both states must already exist.
    ///
    /// Re-adding an identical transition is a no-op.
    ///
    /// # Errors
    /// `DeterminismViolation` if `(from, symbol)` already leads elsewhere,
    /// `UnknownState` if either endpoint was never added.
    pub fn add_transition(&mut self, from: StateLabel, symbol: S, to: StateLabel) -> Result<()> {
        for label in [&from, &to] {
            if !self.states.contains_key(label) {
                return Err(AutomatonError::UnknownState(label.to_string()));
            }
        }

        let outgoing = self.edges.entry(from.clone()).or_default();
        match outgoing.get(&symbol) {
            Some(existing) if *existing != to => Err(AutomatonError::DeterminismViolation {
                state: from.to_string(),
                symbol: format!("{:?}", symbol),
                existing: existing.to_string(),
                attempted: to.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                outgoing.insert(symbol, to);
                Ok(())
            }
        }
    }

    pub fn build(self) -> Automaton<S> {
        let alphabet = self
            .edges
            .values()
            .flat_map(|outgoing| outgoing.keys().cloned())
            .collect();
        Automaton {
            initial: self.initial,
            states: self.states,
            edges: self.edges,
            alphabet,
        }
    }
}

/// A deterministic finite automaton over symbols `S`.
///
/// Built whole by a generator or composition operator and immutable afterwards.
/// States live in a map keyed by label; transitions in a second map keyed by
/// (label, symbol), so lookups never scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton<S> {
    initial: StateLabel,
    states: BTreeMap<StateLabel, State>,
    edges: BTreeMap<StateLabel, BTreeMap<S, StateLabel>>,
    alphabet: BTreeSet<S>,
}

impl<S: Symbol> Automaton<S> {
    /// The single-state automaton accepting only the empty word.
    pub fn empty_word() -> Self {
        AutomatonBuilder::new(StateLabel::Origin, true).build()
    }

    pub fn initial_state(&self) -> &State {
        // The builder inserts the initial state up front and never removes it.
        &self.states[&self.initial]
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub fn state(&self, label: &StateLabel) -> Option<&State> {
        self.states.get(label)
    }

    pub fn final_states(&self) -> impl Iterator<Item = &State> {
        self.states.values().filter(|state| state.is_final)
    }

    /// Returns `true` if `label` names a final state of this automaton.
    pub fn is_final(&self, label: &StateLabel) -> bool {
        self.states.get(label).map_or(false, State::is_final)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    /// Symbols that label at least one transition.
    pub fn alphabet(&self) -> &BTreeSet<S> {
        &self.alphabet
    }

    /// Outgoing transitions of `label`, ordered by symbol.
    pub fn iter_transitions<'a>(
        &'a self,
        label: &StateLabel,
    ) -> impl Iterator<Item = (&'a S, &'a StateLabel)> + 'a {
        self.edges.get(label).into_iter().flat_map(|outgoing| outgoing.iter())
    }

    pub fn transitions(&self, label: &StateLabel) -> Vec<Transition<S>> {
        self.iter_transitions(label)
            .map(|(symbol, to)| Transition {
                from: label.clone(),
                to: to.clone(),
                symbol: symbol.clone(),
            })
            .collect()
    }

    /// Every transition, grouped by source state.
    pub fn all_transitions(&self) -> impl Iterator<Item = (&StateLabel, &S, &StateLabel)> {
        self.edges
            .iter()
            .flat_map(|(from, outgoing)| outgoing.iter().map(move |(symbol, to)| (from, symbol, to)))
    }

    /// Follows the transition from `label` on `symbol`, if any.
    pub fn next(&self, label: &StateLabel, symbol: &S) -> Option<&StateLabel> {
        self.edges.get(label).and_then(|outgoing| outgoing.get(symbol))
    }

    /// The letters that may be read next from `label`, including those
    /// leading to states from which no final state is reachable.
    pub fn next_letters(&self, label: &StateLabel) -> Result<BTreeSet<S>> {
        if !self.states.contains_key(label) {
            return Err(AutomatonError::UnknownState(label.to_string()));
        }
        Ok(self.iter_transitions(label).map(|(symbol, _)| symbol.clone()).collect())
    }

    /// Starts a streaming run at the initial state.
    pub fn run(&self) -> Run<'_, S> {
        Run {
            automaton: self,
            current: Some(&self.initial),
            consumed: 0,
        }
    }

    /// Consumes `symbols` from the initial state.
    ///
    /// Returns whether the word is accepted and the state reached. If some
    /// symbol has no transition the word is rejected and no state is returned.
    pub fn process<I>(&self, symbols: I) -> (bool, Option<&StateLabel>)
    where
        I: IntoIterator,
        I::Item: Borrow<S>,
    {
        let mut run = self.run();
        for symbol in symbols {
            run.update(symbol.borrow());
            if run.is_stuck() {
                return (false, None);
            }
        }
        (run.is_accepting(), run.current())
    }

    pub fn accepts<I>(&self, symbols: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<S>,
    {
        self.process(symbols).0
    }

    /// Every accepted word of length at most `max_len`, shortest first and
    /// ordered by symbol within a length.
    pub fn accepted_words(&self, max_len: usize) -> Vec<Vec<S>> {
        let mut accepted = Vec::new();
        let mut frontier: VecDeque<(&StateLabel, Vec<S>)> = VecDeque::new();
        frontier.push_back((&self.initial, Vec::new()));

        while let Some((label, word)) = frontier.pop_front() {
            if self.is_final(label) {
                accepted.push(word.clone());
            }
            if word.len() == max_len {
                continue;
            }
            for (symbol, to) in self.iter_transitions(label) {
                let mut longer = word.clone();
                longer.push(symbol.clone());
                frontier.push_back((to, longer));
            }
        }
        accepted
    }

    /// Returns `true` if every state has a transition on every symbol of the
    /// alphabet.
    pub fn is_complete(&self) -> bool {
        self.is_complete_over(&self.alphabet)
    }

    pub(crate) fn is_complete_over(&self, alphabet: &BTreeSet<S>) -> bool {
        self.states.keys().all(|label| {
            alphabet
                .iter()
                .all(|symbol| self.next(label, symbol).is_some())
        })
    }

    /// A single state and no transitions: the language is `{ε}` or empty.
    pub fn is_empty_word_automaton(&self) -> bool {
        self.states.len() == 1 && self.transition_count() == 0
    }

    /// States from which some final state is reachable.
    pub fn coaccessible_states(&self) -> HashSet<&StateLabel> {
        let mut incoming: BTreeMap<&StateLabel, Vec<&StateLabel>> = BTreeMap::new();
        for (from, _, to) in self.all_transitions() {
            incoming.entry(to).or_default().push(from);
        }

        let mut reached: HashSet<&StateLabel> = self.final_states().map(State::label).collect();
        let mut frontier: VecDeque<&StateLabel> = reached.iter().copied().collect();
        while let Some(label) = frontier.pop_front() {
            for &source in incoming.get(label).into_iter().flatten() {
                if reached.insert(source) {
                    frontier.push_back(source);
                }
            }
        }
        reached
    }

    /// Returns this automaton with every final flag recomputed by `is_final`.
    pub fn with_final_flags<F>(mut self, is_final: F) -> Self
    where
        F: Fn(&State) -> bool,
    {
        for state in self.states.values_mut() {
            let flag = is_final(state);
            state.is_final = flag;
        }
        self
    }
}

/// A run of an automaton, advanced one symbol at a time.
///
/// Once a symbol without a transition is read the run is stuck for good.
#[derive(Debug, Clone)]
pub struct Run<'a, S> {
    automaton: &'a Automaton<S>,
    current: Option<&'a StateLabel>,
    consumed: usize,
}

impl<'a, S: Symbol> Run<'a, S> {
    /// The current state, or `None` once stuck.
    pub fn current(&self) -> Option<&'a StateLabel> {
        self.current
    }

    pub fn is_stuck(&self) -> bool {
        self.current.is_none()
    }

    pub fn is_accepting(&self) -> bool {
        self.current
            .map_or(false, |label| self.automaton.is_final(label))
    }

    /// Number of symbols fed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl<'a, S: Symbol> IncrementalUpdate<S> for Run<'a, S> {
    fn update(&mut self, symbol: &S) {
        let automaton = self.automaton;
        self.current = self.current.and_then(|label| automaton.next(label, symbol));
        self.consumed += 1;
    }
}
