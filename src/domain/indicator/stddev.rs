//! Mean and population standard deviation.
//!
//! STDDEV = sqrt(sum((x - mean)^2) / n). Both return 0 for an empty slice.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - avg;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stddev_constant_values() {
        assert!((population_stddev(&[100.0; 5]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stddev_basic_calculation() {
        let values = [10.0, 20.0, 30.0];
        let avg: f64 = 20.0;
        let expected = (((10.0 - avg).powi(2) + 0.0 + (30.0 - avg).powi(2)) / 3.0).sqrt();
        assert!((population_stddev(&values) - expected).abs() < 1e-10);
    }

    #[test]
    fn stddev_known_values() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_stddev(&values) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn mean_known_values() {
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_stddev(&[]), 0.0);
    }
}
