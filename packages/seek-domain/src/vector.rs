pub fn dot(a: &[f32], b: &[f32]) -> f32 {
	a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn norm(v: &[f32]) -> f32 {
	dot(v, v).sqrt()
}

/// Cosine similarity of `query` and `v`, with the query norm computed once by the caller.
///
/// Returns `0.0` when either vector has zero magnitude, so callers never see `NaN` from an
/// all-zero embedding. Returns `None` on a dimension mismatch.
pub fn cosine_similarity_with_norm(query: &[f32], query_norm: f32, v: &[f32]) -> Option<f32> {
	if query.len() != v.len() {
		return None;
	}

	let denom = query_norm * norm(v);

	if denom <= 0.0 || !denom.is_finite() {
		return Some(0.0);
	}

	Some(dot(query, v) / denom)
}

pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
	let n = norm(v);

	if n > 0.0 { v.iter().map(|x| x / n).collect() } else { v.to_vec() }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cosine(a: &[f32], b: &[f32]) -> Option<f32> {
		cosine_similarity_with_norm(a, norm(a), b)
	}

	#[test]
	fn zero_vectors_have_zero_similarity() {
		assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), Some(0.0));
		assert_eq!(cosine(&[1.0, 0.0], &[0.0, 0.0]), Some(0.0));
	}

	#[test]
	fn mismatched_dimensions_are_rejected() {
		assert_eq!(cosine(&[1.0, 0.0], &[1.0, 0.0, 0.0]), None);
	}

	#[test]
	fn similarity_ignores_magnitude() {
		let sim = cosine(&[2.0, 0.0], &[5.0, 0.0]).expect("same dimension");

		assert!((sim - 1.0).abs() < 1e-6);

		let opposite = cosine(&[1.0, 1.0], &[-3.0, -3.0]).expect("same dimension");

		assert!((opposite + 1.0).abs() < 1e-6);
	}

	#[test]
	fn normalize_produces_unit_length() {
		let unit = l2_normalize(&[3.0, 4.0]);

		assert!((norm(&unit) - 1.0).abs() < 1e-6);
		assert_eq!(l2_normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
	}
}
