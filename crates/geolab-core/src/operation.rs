//! The shared operation catalogue
//!
//! Every backend registers implementations under these names. The arity is
//! the number of positional (dispatch-relevant) arguments; everything else is
//! passed as a keyword.

use std::fmt;
use std::str::FromStr;

/// Built-in primitive operations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// Gather `a` along `axis` at `index` locations
    TakeAlongAxis,
    /// Convert a literal or foreign array into the backend of a marker value
    FromLiteral,
    /// Composite trapezoidal integration
    Trapz,
    /// QR factorisation
    Qr,
    /// Vector or matrix norm
    Norm,
    /// Numbers spaced evenly on a log scale
    Logspace,
    /// Degree matrix of an adjacency matrix
    Degree,
    /// Leading eigenpairs of a symmetric PSD matrix
    Eigenpairs,
    /// Copy of an array with one entry replaced
    SetValue,
    DtypeDouble,
    DtypeInteger,
    DtypeComplex,
    FloatLike,
    GetRandomState,
    RestoreRandomState,
    /// `real + i * imag`
    CreateComplex,
    /// Cumulative sum
    Cumsum,
    /// Sign and log of the determinant
    Slogdet,
    /// Eigenvalues of a symmetric or Hermitian matrix
    Eigvalsh,
    /// Reciprocal with zeros mapped to zero
    ReciprocalNoNan,
    /// Complex conjugate
    ComplexConj,
}

impl Operation {
    pub const ALL: [Operation; 21] = [
        Operation::TakeAlongAxis,
        Operation::FromLiteral,
        Operation::Trapz,
        Operation::Qr,
        Operation::Norm,
        Operation::Logspace,
        Operation::Degree,
        Operation::Eigenpairs,
        Operation::SetValue,
        Operation::DtypeDouble,
        Operation::DtypeInteger,
        Operation::DtypeComplex,
        Operation::FloatLike,
        Operation::GetRandomState,
        Operation::RestoreRandomState,
        Operation::CreateComplex,
        Operation::Cumsum,
        Operation::Slogdet,
        Operation::Eigvalsh,
        Operation::ReciprocalNoNan,
        Operation::ComplexConj,
    ];

    /// Registry name
    pub fn name(self) -> &'static str {
        match self {
            Self::TakeAlongAxis => "take_along_axis",
            Self::FromLiteral => "from_literal",
            Self::Trapz => "trapz",
            Self::Qr => "qr",
            Self::Norm => "norm",
            Self::Logspace => "logspace",
            Self::Degree => "degree",
            Self::Eigenpairs => "eigenpairs",
            Self::SetValue => "set_value",
            Self::DtypeDouble => "dtype_double",
            Self::DtypeInteger => "dtype_integer",
            Self::DtypeComplex => "dtype_complex",
            Self::FloatLike => "float_like",
            Self::GetRandomState => "get_random_state",
            Self::RestoreRandomState => "restore_random_state",
            Self::CreateComplex => "create_complex",
            Self::Cumsum => "cumsum",
            Self::Slogdet => "slogdet",
            Self::Eigvalsh => "eigvalsh",
            Self::ReciprocalNoNan => "reciprocal_no_nan",
            Self::ComplexConj => "complex_conj",
        }
    }

    /// Number of positional arguments
    pub fn arity(self) -> usize {
        match self {
            Self::TakeAlongAxis
            | Self::FromLiteral
            | Self::Logspace
            | Self::RestoreRandomState
            | Self::CreateComplex => 2,
            _ => 1,
        }
    }
}

impl AsRef<str> for Operation {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter().copied().find(|op| op.name() == s).ok_or(())
    }
}
