use polars::prelude::*;
use rayon::prelude::*;

use std::sync::Arc;

use crate::error::{Error, Result};
use super::values::*;


/// Always-resident input vectors, one per input variable.
///
/// The vectors are populated eagerly, once per learning run,
/// by decomposing each training object into its per-variable values.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub(super) names: Vec<String>,
    pub(super) vectors: Vec<Arc<Values>>,
    pub(super) n_instances: usize,
}


impl Inputs {
    /// Construct `Inputs` from named columns.
    /// All the columns must have the same length.
    pub fn from_columns<S>(columns: Vec<(S, Values)>) -> Self
        where S: Into<String>,
    {
        let n_instances = columns.first()
            .map_or(0, |(_, values)| values.len());
        assert!(
            columns.iter().all(|(_, values)| values.len() == n_instances),
            "all the input columns must have the same length"
        );

        let (names, vectors) = columns.into_iter()
            .map(|(name, values)| (name.into(), Arc::new(values)))
            .unzip();

        Self { names, vectors, n_instances, }
    }


    /// Decompose each training object into its per-variable values.
    /// The arity and the kind of each variable are
    /// fixed by the first object.
    pub fn from_objects<T, F>(objects: &[T], decompose: F) -> Result<Self>
        where F: Fn(&T) -> Vec<Value>,
    {
        let mut columns: Vec<Values> = Vec::new();
        for (object, item) in objects.iter().enumerate() {
            let values = decompose(item);
            if object == 0 {
                columns = values.iter()
                    .map(|v| Values::with_capacity(v.kind(), objects.len()))
                    .collect();
            }

            if values.len() != columns.len() {
                return Err(Error::ArityMismatch {
                    object,
                    expected: columns.len(),
                    found: values.len(),
                });
            }

            for (variable, (column, value)) in columns.iter_mut()
                .zip(values)
                .enumerate()
            {
                if column.kind() != value.kind() {
                    return Err(Error::KindMismatch {
                        object,
                        variable,
                        expected: column.kind(),
                        found: value.kind(),
                    });
                }
                column.push(value);
            }
        }

        let columns = columns.into_iter()
            .enumerate()
            .map(|(j, values)| (format!("Var. [{j}]"), values))
            .collect::<Vec<_>>();
        Ok(Self::from_columns(columns))
    }


    /// Convert a `polars::DataFrame` into `Inputs`.
    /// Boolean columns become ternary inputs,
    /// numeric columns become real inputs.
    /// Null entries become missing values.
    pub fn from_dataframe(data: &DataFrame) -> Result<Self> {
        let columns = data.get_columns()
            .par_iter()
            .map(|series| {
                column_values(series)
                    .map(|values| (series.name().to_string(), values))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_columns(columns))
    }


    /// Returns the population size `N`.
    #[inline]
    pub fn n_instances(&self) -> usize {
        self.n_instances
    }


    /// Returns the number of input variables.
    #[inline]
    pub fn n_variables(&self) -> usize {
        self.vectors.len()
    }


    /// Returns the vector of the `variable`-th input.
    #[inline]
    pub fn vector(&self, variable: usize) -> &Arc<Values> {
        &self.vectors[variable]
    }


    /// Returns the kind of the `variable`-th input.
    #[inline]
    pub fn kind(&self, variable: usize) -> OutputKind {
        self.vectors[variable].kind()
    }


    /// Returns the name of the `variable`-th input.
    #[inline]
    pub fn name(&self, variable: usize) -> &str {
        &self.names[variable]
    }


    /// Returns the position of the input named `name`.
    pub fn position<S: AsRef<str>>(&self, name: S) -> Option<usize> {
        let name = name.as_ref();
        self.names.iter().position(|n| n == name)
    }


    /// Returns the number of bytes occupied by the input vectors.
    pub fn byte_size(&self) -> usize {
        self.vectors.iter()
            .map(|values| values.byte_size())
            .sum()
    }
}


fn column_values(series: &Series) -> Result<Values> {
    match series.dtype() {
        DataType::Boolean => {
            let values = series.bool()?
                .into_iter()
                .map(Ternary::from)
                .collect::<Vec<_>>();
            Ok(Values::Ternary(values))
        },
        dtype if dtype.is_numeric() => {
            let series = series.cast(&DataType::Float64)?;
            let values = series.f64()?
                .into_iter()
                .map(|x| x.unwrap_or(f64::NAN))
                .collect::<Vec<_>>();
            Ok(Values::Real(values))
        },
        dtype => Err(Error::UnsupportedDtype {
            name: series.name().to_string(),
            dtype: dtype.to_string(),
        }),
    }
}
