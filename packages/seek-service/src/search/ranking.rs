use std::cmp::Ordering;

use seek_domain::Record;

/// A candidate record with the score one matcher assigned to it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scored<'a> {
	pub(crate) record: &'a Record,
	pub(crate) score: f32,
}

pub(crate) fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

/// Score descending, then record id ascending.
pub(crate) fn sort_scored(items: &mut [Scored<'_>]) {
	items.sort_by(|left, right| {
		cmp_f32_desc(left.score, right.score).then_with(|| left.record.id.cmp(&right.record.id))
	});
}

/// Keeps the `top_k` best entries in ranked order.
pub(crate) fn top_k_scored(mut items: Vec<Scored<'_>>, top_k: usize) -> Vec<Scored<'_>> {
	sort_scored(&mut items);
	items.truncate(top_k);

	items
}
