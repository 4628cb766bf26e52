use ndarray::{Array1, ArrayView1};

pub(crate) fn l2_normalize(vec: &Array1<f32>) -> Array1<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if norm > 1e-10 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

/// Numerically stable softmax.
pub(crate) fn softmax(raw: ArrayView1<f64>) -> Array1<f64> {
    let max = raw.fold(f64::NEG_INFINITY, |m, &x| m.max(x));
    let exp = raw.mapv(|x| (x - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Index of the largest value; the earliest index wins ties.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    values.iter().enumerate().fold(None, |best, (i, &v)| match best {
        Some((_, bv)) if v <= bv => best,
        _ => Some((i, v)),
    })
    .map(|(i, _)| i)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(array![1.0, 2.0, 3.0].view());
        assert!((p.sum() - 1.0).abs() < 1e-12);
        assert!(p[2] > p[1] && p[1] > p[0]);

        let big = softmax(array![1000.0, 1000.0].view());
        assert!((big[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), Some(1));
        assert_eq!(argmax(&[2.0, 2.0]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.33333), 33.33);
        assert_eq!(round2(66.666), 66.67);
    }
}
