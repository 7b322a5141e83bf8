use std::cmp::Ordering;

use log::debug;

use crate::{Result, VideoError};

/// Derive the text grid size for a source image of `original` pixels.
///
/// Without `force` the grid keeps the exact source aspect ratio: the largest
/// grid whose width (or height) divides out evenly within the bounds wins,
/// ranked by cell count. A missing bound leaves that dimension unconstrained.
/// With `force` the bounds are taken as given, and a single bound has its
/// partner derived by rounding.
pub fn solve(
    original: (u32, u32),
    max_width: Option<u32>,
    max_height: Option<u32>,
    force: bool,
) -> Result<(u32, u32)> {
    let (source_width, source_height) = (u64::from(original.0), u64::from(original.1));
    if source_width == 0 || source_height == 0 {
        return Err(VideoError::NoFeasibleSize);
    }

    if force {
        return match (max_width, max_height) {
            (Some(width), Some(height)) => Ok((width, height)),
            (Some(width), None) => Ok((width, scale(width, source_height, source_width))),
            (None, Some(height)) => Ok((scale(height, source_width, source_height), height)),
            (None, None) => Err(VideoError::NoFeasibleSize),
        };
    }

    let mut candidates = Vec::with_capacity(2);
    if let Some(limit) = max_width {
        if let Some((width, height)) = search(limit, max_height, source_width, source_height) {
            candidates.push((width, height));
        }
    }
    if let Some(limit) = max_height {
        if let Some((height, width)) = search(limit, max_width, source_height, source_width) {
            candidates.push((width, height));
        }
    }

    debug_assert!(candidates
        .iter()
        .all(|&(w, h)| source_width * u64::from(h) == source_height * u64::from(w)));
    debug!("grid candidates for {}x{}: {:?}", original.0, original.1, candidates);

    // Ties keep the earlier candidate, so the width search wins.
    candidates
        .into_iter()
        .fold(None, |best: Option<(u32, u32)>, candidate| match best {
            Some(best) if cells(best) >= cells(candidate) => Some(best),
            _ => Some(candidate),
        })
        .ok_or(VideoError::NoFeasibleSize)
}

/// Scan `limit` downward along one axis for the first value whose partner
/// divides out exactly and fits `partner_limit`.
fn search(limit: u32, partner_limit: Option<u32>, along: u64, across: u64) -> Option<(u32, u32)> {
    (1..=limit).rev().find_map(|value| {
        let product = across * u64::from(value);
        if product % along != 0 {
            return None;
        }

        let partner = u32::try_from(product / along).ok()?;
        match partner_limit {
            Some(bound) if partner > bound => None,
            _ => Some((value, partner)),
        }
    })
}

/// `value * numerator / denominator` rounded to nearest, halves to even, never zero.
fn scale(value: u32, numerator: u64, denominator: u64) -> u32 {
    let product = u64::from(value) * numerator;
    let (quotient, remainder) = (product / denominator, product % denominator);
    let scaled = match (2 * remainder).cmp(&denominator) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal => quotient + (quotient & 1),
    };
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

fn cells((width, height): (u32, u32)) -> u64 {
    u64::from(width) * u64::from(height)
}
