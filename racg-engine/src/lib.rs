pub mod automaton;
pub mod composition;
pub mod error;
pub mod generators;
pub mod growth;
pub mod horocyclic;
pub mod normalization;
pub mod presentation;
pub mod ray;
pub mod types;

pub use automaton::{
    Automaton, AutomatonBuilder, IncrementalUpdate, Parity, Run, State, StateLabel, Symbol, Transition,
};
pub use composition::{complete, interspersal, intersection, parity_machine, unambiguous_concatenation};
pub use error::{AutomatonError, Result};
pub use generators::{
    first_letter_excluder, geodesic_machine, geodesic_suffix_machine, length_parity_machine,
    shortlex_machine, shortlex_suffix_machine,
};
pub use growth::TransferMatrix;
pub use horocyclic::{
    even_horocyclic_suffix_machine, odd_horocyclic_suffix_machine, suffix_machine_1234,
    suffix_machine_1256, w12_machine, w1_machine, w2_machine,
};
pub use normalization::{is_geodesic, reduce, shortlex_append, shortlex_normal_form, ShortlexAccumulator};
pub use presentation::Presentation;
pub use ray::Ray;
pub use types::{Letter, LetterSet, Word};
