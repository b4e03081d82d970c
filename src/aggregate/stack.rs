use super::keys::{KeyPart, Lookup};
use crate::models::Segment;

/// Stack each entity's subgroups in the given fixed order.
///
/// `lookup` must be keyed by (entity, subgroup). Zero-valued subgroups emit no segment
/// at all, so hover targets and end-of-bar labels only cover drawn pieces. An entity
/// with nothing to stack emits nothing.
pub fn build_stack_segments<E: AsRef<str>, S: AsRef<str>>(
    entities: &[E],
    subgroups: &[S],
    lookup: &Lookup,
    year: Option<i32>,
) -> Vec<Segment> {
    let mut segments = Vec::new();
    for e in entities {
        let group = e.as_ref();
        let mut cum = 0.0;
        for s in subgroups {
            let subgroup = s.as_ref();
            let value = lookup.value(&[KeyPart::from(group), KeyPart::from(subgroup)]);
            if value == 0.0 {
                continue;
            }
            let start = cum;
            cum += value;
            segments.push(Segment {
                group: group.to_string(),
                subgroup: subgroup.to_string(),
                value,
                start,
                end: cum,
                year,
            });
        }
    }
    segments
}

/// Stack height per group (the last segment's `end`), in order of first appearance.
pub fn stack_totals(segments: &[Segment]) -> Vec<(String, f64)> {
    let mut out: Vec<(String, f64)> = Vec::new();
    for s in segments {
        match out.last_mut() {
            Some((g, total)) if *g == s.group => *total = s.end,
            _ => out.push((s.group.clone(), s.end)),
        }
    }
    out
}

/// Stack height for one group; 0 when it has no segments.
pub fn stack_total_for(segments: &[Segment], group: &str) -> f64 {
    segments
        .iter()
        .rev()
        .find(|s| s.group == group)
        .map(|s| s.end)
        .unwrap_or(0.0)
}
