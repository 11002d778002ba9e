//! Reading coordinates and strand out of GenBank feature locations.

use crate::genome_dataset::Strand;
use gb_io::seq::Location;

/// Strand of every leaf of `location`, outermost first. A leaf under an odd
/// number of `complement(...)` wrappers is [`Strand::Reverse`].
fn leaf_strands(location: &Location, reverse: bool) -> Vec<Strand> {
    match location {
        Location::Range(_, _) | Location::Between(_, _) => vec![if reverse {
            Strand::Reverse
        } else {
            Strand::Forward
        }],
        Location::Complement(inner) => leaf_strands(inner, !reverse),
        Location::Join(parts)
        | Location::Order(parts)
        | Location::Bond(parts)
        | Location::OneOf(parts) => parts
            .iter()
            .flat_map(|part| leaf_strands(part, reverse))
            .collect(),
        Location::External(_, Some(inner)) => leaf_strands(inner, reverse),
        Location::External(_, None) | Location::Gap(_) => Vec::new(),
    }
}

/// `+` when every leaf is forward, `-` when every leaf is reversed, `.` for
/// mixed or leafless locations.
pub fn location_strand(location: &Location) -> Strand {
    leaf_strands(location, false)
        .into_iter()
        .reduce(|acc, strand| if acc == strand { acc } else { Strand::Unknown })
        .unwrap_or(Strand::Unknown)
}

/// Collects the 0-based, end-exclusive leaf ranges. Returns `None` as soon as a
/// leaf has no integer coordinates (external reference without a local
/// location, a gap, a negative position).
pub fn collect_location_ranges(location: &Location, ranges: &mut Vec<(i64, i64)>) -> Option<()> {
    match location {
        Location::Range((from, _), (to, _)) | Location::Between(from, to) => {
            if *from < 0 || *to < 0 {
                return None;
            }
            ranges.push((*from, *to));
        }
        Location::Complement(inner) => collect_location_ranges(inner, ranges)?,
        Location::Join(parts)
        | Location::Order(parts)
        | Location::Bond(parts)
        | Location::OneOf(parts) => {
            for part in parts {
                collect_location_ranges(part, ranges)?;
            }
        }
        Location::External(_, maybe_loc) => match maybe_loc {
            Some(loc) => collect_location_ranges(loc, ranges)?,
            None => return None,
        },
        Location::Gap(_) => return None,
    }
    Some(())
}

/// Outer bounds of a location: smallest leaf start, largest leaf end.
pub fn location_bounds(location: &Location) -> Option<(usize, usize)> {
    let mut ranges = Vec::new();
    collect_location_ranges(location, &mut ranges)?;
    let start = ranges.iter().map(|(from, _)| *from).min()?;
    let end = ranges.iter().map(|(_, to)| *to).max()?;
    if end < start {
        return None;
    }
    Some((usize::try_from(start).ok()?, usize::try_from(end).ok()?))
}

/// Rewrites `N..N` spans as `N`, the way the GenBank writer prints a single
/// base. Spans with an open `<` start are left alone.
fn collapse_single_base_spans(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("..") {
        let (head, tail) = rest.split_at(pos);
        let after = &tail[2..];
        let left_start = head.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let right_end = after.len() - after.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let left = &head[left_start..];
        let right = &after[..right_end];
        out.push_str(head);
        if !left.is_empty() && left == right && !head[..left_start].ends_with('<') {
            rest = &after[right_end..];
        } else {
            out.push_str("..");
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

/// Whether `location` accounts for all of `text`, the location as written in
/// the feature table. The gb-io parser stops at the first token it cannot
/// read, so `1..abc` comes back as the single base `1`.
pub fn location_matches_text(location: &Location, text: &str) -> bool {
    let written: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    collapse_single_base_spans(&written) == collapse_single_base_spans(&location.to_gb_format())
}
