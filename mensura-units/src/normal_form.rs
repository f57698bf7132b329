//! Canonical composition of converter chains
//!
//! Composing two converters flattens both into primitive steps, fuses
//! neighbours, sorts runs of commuting (linear) steps, and repeats until
//! nothing changes. The result is rebuilt as a right-nested pair chain, so
//! equal chains end up with equal structure.

use serde::{Deserialize, Serialize};

use crate::Converter;

/// Rank of each converter kind inside a run of commuting converters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalFormOrder {
    Identity,
    PowerOfInt,
    MultiplyRational,
    PowerOfPi,
    MultiplyDouble,
    Add,
    Log,
    Exp,
    Pair,
}

/// `left ∘ right` in normal form.
///
/// `can_reduce(outer, inner)` decides whether two neighbouring steps fuse
/// and `reduce(outer, inner)` produces the fused converter.
pub fn compose<C, R>(left: &Converter, right: &Converter, can_reduce: C, reduce: R) -> Converter
where
    C: Fn(&Converter, &Converter) -> bool,
    R: Fn(&Converter, &Converter) -> Converter,
{
    let mut steps = right.conversion_steps();
    steps.extend(left.conversion_steps());

    let mut round = 0usize;
    loop {
        round += 1;
        let (fused, fusions) = fuse_neighbours(steps, &can_reduce, &reduce);
        steps = fused;
        let reordered = sort_linear_runs(&mut steps);
        tracing::trace!(round, fusions, reordered, len = steps.len(), "normal form round");
        if fusions == 0 && !reordered {
            break;
        }
    }

    rebuild(steps)
}

/// One left-to-right fusion pass; returns the new steps and the number of
/// fusions applied
fn fuse_neighbours<C, R>(steps: Vec<Converter>, can_reduce: &C, reduce: &R) -> (Vec<Converter>, usize)
where
    C: Fn(&Converter, &Converter) -> bool,
    R: Fn(&Converter, &Converter) -> Converter,
{
    let mut out: Vec<Converter> = Vec::with_capacity(steps.len());
    let mut fusions = 0;
    for step in steps {
        if step.is_identity() {
            fusions += 1;
            continue;
        }
        // `out` holds earlier steps, so the new step is the outer one
        let fused = out
            .last()
            .filter(|inner| can_reduce(&step, *inner))
            .map(|inner| reduce(&step, inner).conversion_steps());
        match fused {
            Some(fused) if fused.len() < 2 => {
                out.pop();
                out.extend(fused);
                fusions += 1;
            }
            _ => out.push(step),
        }
    }
    (out, fusions)
}

/// Stable-sort every maximal run of linear steps; true if anything moved
fn sort_linear_runs(steps: &mut [Converter]) -> bool {
    let mut moved = false;
    let mut start = 0;
    while start < steps.len() {
        if !steps[start].is_linear() {
            start += 1;
            continue;
        }
        let end = steps[start..]
            .iter()
            .position(|c| !c.is_linear())
            .map_or(steps.len(), |offset| start + offset);
        let run = &mut steps[start..end];
        if run.windows(2).any(|w| w[0] > w[1]) {
            run.sort();
            moved = true;
        }
        start = end;
    }
    moved
}

/// Steps in application order to a right-nested pair chain
fn rebuild(steps: Vec<Converter>) -> Converter {
    let mut steps = steps.into_iter();
    let Some(first) = steps.next() else {
        return Converter::Identity;
    };
    steps.fold(first, |inner, outer| Converter::pair(outer, inner))
}
