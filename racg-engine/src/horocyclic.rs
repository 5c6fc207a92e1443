use crate::automaton::Automaton;
use crate::composition::{interspersal, intersection, unambiguous_concatenation};
use crate::error::Result;
use crate::generators::{first_letter_excluder, shortlex_machine};
use crate::presentation::Presentation;
use crate::ray::Ray;
use crate::types::{Letter, LetterSet};
use tracing::debug;

/// ShortLex words over the letters commuting with `a_i` and preceding `a_j`.
///
/// This is the first piece of a horocyclic suffix relative to the ray
/// `(a_i, a_j)`. Such a suffix is written `w1 w2 w3 w4` or `w1 w2 w5 w6`,
/// each piece a ShortLex word over a prescribed set of letters, glued with
/// unambiguous concatenation and trimmed with first-letter excluders.
pub fn w1_machine(presentation: &Presentation, ray: &Ray) -> Result<Automaton<Letter>> {
    ray.validate(presentation)?;
    let letters = presentation
        .commute(ray.first())
        .intersection(presentation.lesser_star(ray.second()));
    shortlex_machine(presentation, Some(&letters))
}

/// ShortLex words over the letters commuting with both ray letters that
/// precede `a_i` and follow `a_j`.
pub fn w2_machine(presentation: &Presentation, ray: &Ray) -> Result<Automaton<Letter>> {
    ray.validate(presentation)?;
    let letters = presentation
        .lesser_star(ray.first())
        .intersection(presentation.greater_star(ray.second()));
    shortlex_machine(presentation, Some(&letters))
}

/// The common prefix `w1 w2` of both suffix forms.
pub fn w12_machine(presentation: &Presentation, ray: &Ray) -> Result<Automaton<Letter>> {
    unambiguous_concatenation(&w1_machine(presentation, ray)?, &w2_machine(presentation, ray)?)
}

/// The tail of a suffix form, with `near` the ray letter whose commuting
/// letters are kept out of the middle piece and `far` the other one.
///
/// The middle piece is ShortLex over `lesser_star(far)` and cannot start with
/// a letter commuting with `near`. The last piece cannot start with `near`,
/// `far`, or a letter of `lesser_star(far)`. The whole tail cannot start with
/// `near` or a letter of `lesser_star(near)` commuting with `far`.
fn tail_machine(presentation: &Presentation, near: Letter, far: Letter) -> Result<Automaton<Letter>> {
    let middle = intersection(
        &shortlex_machine(presentation, Some(presentation.lesser_star(far)))?,
        &first_letter_excluder(presentation, presentation.commute(near))?,
    )?;

    let last_excluded = presentation.lesser_star(far).with(near).with(far);
    let last = intersection(
        &shortlex_machine(presentation, None)?,
        &first_letter_excluder(presentation, &last_excluded)?,
    )?;

    let tail_excluded: LetterSet = presentation
        .lesser_star(near)
        .intersection(presentation.commute(far))
        .with(near);
    intersection(
        &unambiguous_concatenation(&middle, &last)?,
        &first_letter_excluder(presentation, &tail_excluded)?,
    )
}

/// Accepts the horocyclic suffixes of the form `w1 w2 w3 w4`.
pub fn suffix_machine_1234(presentation: &Presentation, ray: &Ray) -> Result<Automaton<Letter>> {
    let prefix = w12_machine(presentation, ray)?;
    let tail = tail_machine(presentation, ray.first(), ray.second())?;
    let machine = unambiguous_concatenation(&prefix, &tail)?;
    debug!(
        states = machine.state_count(),
        transitions = machine.transition_count(),
        "suffix machine 1234 constructed"
    );
    Ok(machine)
}

/// Accepts the horocyclic suffixes of the form `w1 w2 w5 w6`.
pub fn suffix_machine_1256(presentation: &Presentation, ray: &Ray) -> Result<Automaton<Letter>> {
    let prefix = w12_machine(presentation, ray)?;
    let tail = tail_machine(presentation, ray.second(), ray.first())?;
    let machine = unambiguous_concatenation(&prefix, &tail)?;
    debug!(
        states = machine.state_count(),
        transitions = machine.transition_count(),
        "suffix machine 1256 constructed"
    );
    Ok(machine)
}

/// Even-length `1256` suffixes together with odd-length `1234` suffixes.
pub fn even_horocyclic_suffix_machine(presentation: &Presentation, ray: &Ray) -> Result<Automaton<Letter>> {
    interspersal(
        &suffix_machine_1256(presentation, ray)?,
        &suffix_machine_1234(presentation, ray)?,
    )
}

/// Even-length `1234` suffixes together with odd-length `1256` suffixes.
pub fn odd_horocyclic_suffix_machine(presentation: &Presentation, ray: &Ray) -> Result<Automaton<Letter>> {
    interspersal(
        &suffix_machine_1234(presentation, ray)?,
        &suffix_machine_1256(presentation, ray)?,
    )
}
