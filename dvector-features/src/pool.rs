//! Frame pooling: collapse a feature matrix into one fixed-length vector

use crate::error::{FeatureError, Result};
use ndarray::{Array1, Array2, Axis};
use std::fmt;
use std::str::FromStr;

/// Statistic used to pool frames into a d-vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolingMethod {
    /// Arithmetic mean per feature dimension
    Mean,
    /// Elementwise maximum per feature dimension
    Max,
    /// Population variance per feature dimension
    Var,
}

impl fmt::Display for PoolingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean => write!(f, "mean"),
            Self::Max => write!(f, "max"),
            Self::Var => write!(f, "var"),
        }
    }
}

impl FromStr for PoolingMethod {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Self::Mean),
            "max" => Ok(Self::Max),
            "var" => Ok(Self::Var),
            other => Err(FeatureError::format(format!(
                "unknown extraction method '{other}' (expected mean, max or var)"
            ))),
        }
    }
}

/// Reduce a feature matrix across its frame axis.
///
/// The output length equals the feature dimension; pooling never touches
/// the dimension axis. A zero-frame matrix is an error, never a NaN
/// vector.
pub fn pool(features: &Array2<f64>, method: PoolingMethod) -> Result<Array1<f64>> {
    if features.nrows() == 0 {
        return Err(FeatureError::empty_input(
            "cannot pool a feature matrix with zero frames",
        ));
    }
    let pooled = match method {
        PoolingMethod::Mean => features
            .mean_axis(Axis(0))
            .ok_or_else(|| FeatureError::empty_input("mean over an empty frame axis"))?,
        PoolingMethod::Max => {
            features.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v))
        }
        PoolingMethod::Var => features.var_axis(Axis(0), 0.0),
    };
    Ok(pooled)
}

/// Pooling path used when L2 normalization is disabled.
///
/// The reduction runs over an inserted singleton axis, so every aggregate
/// sees exactly one value: mean and max reproduce the frame values and var
/// is identically zero. The first frame's result is returned.
pub fn pool_singleton(features: &Array2<f64>, method: PoolingMethod) -> Result<Array1<f64>> {
    if features.nrows() == 0 {
        return Err(FeatureError::empty_input(
            "cannot pool a feature matrix with zero frames",
        ));
    }
    let expanded = features.view().insert_axis(Axis(1));
    let reduced = match method {
        PoolingMethod::Mean => expanded
            .mean_axis(Axis(1))
            .ok_or_else(|| FeatureError::empty_input("mean over an empty singleton axis"))?,
        PoolingMethod::Max => {
            expanded.fold_axis(Axis(1), f64::NEG_INFINITY, |acc, &v| acc.max(v))
        }
        PoolingMethod::Var => expanded.var_axis(Axis(1), 0.0),
    };
    Ok(reduced.row(0).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_single_row_matrix() {
        let features = array![[0.25, -1.5, 3.0]];

        let mean = pool(&features, PoolingMethod::Mean).unwrap();
        let max = pool(&features, PoolingMethod::Max).unwrap();
        let var = pool(&features, PoolingMethod::Var).unwrap();

        assert_eq!(mean, array![0.25, -1.5, 3.0]);
        assert_eq!(max, array![0.25, -1.5, 3.0]);
        assert_eq!(var, array![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_mean_pooling() {
        let features = array![[1.0, 2.0], [3.0, 6.0]];
        let mean = pool(&features, PoolingMethod::Mean).unwrap();
        assert_eq!(mean, array![2.0, 4.0]);
    }

    #[test]
    fn test_max_pooling() {
        let features = array![[1.0, 6.0], [3.0, 2.0], [-5.0, 4.0]];
        let max = pool(&features, PoolingMethod::Max).unwrap();
        assert_eq!(max, array![3.0, 6.0]);
    }

    #[test]
    fn test_population_variance() {
        let features = array![[1.0, 0.0], [3.0, 0.0]];
        let var = pool(&features, PoolingMethod::Var).unwrap();
        // Population variance of {1, 3} is 1, not the sample variance 2.
        assert_abs_diff_eq!(var[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(var[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_matrix_is_an_error() {
        let features = ndarray::Array2::<f64>::zeros((0, 4));
        assert!(matches!(
            pool(&features, PoolingMethod::Mean),
            Err(FeatureError::EmptyInput(_))
        ));
        assert!(matches!(
            pool_singleton(&features, PoolingMethod::Var),
            Err(FeatureError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_singleton_path_returns_first_frame() {
        let features = array![[1.0, 2.0], [9.0, 9.0]];

        let mean = pool_singleton(&features, PoolingMethod::Mean).unwrap();
        let max = pool_singleton(&features, PoolingMethod::Max).unwrap();
        let var = pool_singleton(&features, PoolingMethod::Var).unwrap();

        assert_eq!(mean, array![1.0, 2.0]);
        assert_eq!(max, array![1.0, 2.0]);
        assert_eq!(var, array![0.0, 0.0]);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("mean".parse::<PoolingMethod>().unwrap(), PoolingMethod::Mean);
        assert_eq!("max".parse::<PoolingMethod>().unwrap(), PoolingMethod::Max);
        assert_eq!("var".parse::<PoolingMethod>().unwrap(), PoolingMethod::Var);
        assert!("median".parse::<PoolingMethod>().is_err());
        assert_eq!(PoolingMethod::Mean.to_string(), "mean");
    }
}
