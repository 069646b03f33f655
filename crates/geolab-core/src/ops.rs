//! Typed entry points for the operation catalogue
//!
//! Each function packs its arguments into [`CallArgs`], dispatches through the
//! registry and unpacks the result. Callers never name a backend: the runtime
//! types of the [`Value`]s decide which implementation runs.
//!
//! Keyword names used here are the contract every backend reads.

use crate::dtype::DType;
use crate::error::Result;
use crate::operation::Operation;
use crate::options::{NormOrder, QrMode, Triangle};
use crate::registry::DispatchRegistry;
use crate::value::{CallArgs, Value};

/// Keyword argument names
pub mod kw {
    pub const AXIS: &str = "axis";
    pub const X: &str = "x";
    pub const DX: &str = "dx";
    pub const MODE: &str = "mode";
    pub const ORD: &str = "ord";
    pub const NUM: &str = "num";
    pub const BASE: &str = "base";
    pub const K: &str = "k";
    pub const INDEX: &str = "index";
    pub const VALUE: &str = "value";
    pub const UPLO: &str = "uplo";
}

/// Default sample count of [`logspace`]
pub const LOGSPACE_DEFAULT_NUM: usize = 50;
/// Default base of [`logspace`]
pub const LOGSPACE_DEFAULT_BASE: f64 = 50.0;

fn single(registry: &DispatchRegistry, op: Operation, args: CallArgs) -> Result<Value> {
    registry.call(op, &args)?.into_value()
}

fn pair(registry: &DispatchRegistry, op: Operation, args: CallArgs) -> Result<(Value, Value)> {
    registry.call(op, &args)?.into_pair()
}

fn dtype(registry: &DispatchRegistry, op: Operation, reference: &Value) -> Result<DType> {
    single(registry, op, CallArgs::new([reference.clone()]))?.take::<DType>()
}

/// Gather elements of `a` along `axis` at `index` locations
pub fn take_along_axis(
    registry: &DispatchRegistry,
    a: &Value,
    index: &Value,
    axis: isize,
) -> Result<Value> {
    let args = CallArgs::new([a.clone(), index.clone()]).with(kw::AXIS, axis);
    single(registry, Operation::TakeAlongAxis, args)
}

/// Convert `source` into the backend that `marker` belongs to
pub fn from_literal(registry: &DispatchRegistry, marker: &Value, source: &Value) -> Result<Value> {
    let args = CallArgs::new([marker.clone(), source.clone()]);
    single(registry, Operation::FromLiteral, args)
}

/// Integrate `y` along `axis` with the composite trapezoidal rule
///
/// Sample points come from `x` when given, otherwise a uniform spacing `dx`
/// (1.0 when `None`).
pub fn trapz(
    registry: &DispatchRegistry,
    y: &Value,
    x: Option<&Value>,
    dx: Option<f64>,
    axis: isize,
) -> Result<Value> {
    let mut args = CallArgs::new([y.clone()]).with(kw::AXIS, axis);
    if let Some(x) = x {
        args = args.with_value(kw::X, x.clone());
    }
    if let Some(dx) = dx {
        args = args.with(kw::DX, dx);
    }
    single(registry, Operation::Trapz, args)
}

/// QR factorisation, returning `(Q, R)`
pub fn qr(registry: &DispatchRegistry, a: &Value, mode: QrMode) -> Result<(Value, Value)> {
    let args = CallArgs::new([a.clone()]).with(kw::MODE, mode);
    pair(registry, Operation::Qr, args)
}

/// Vector or matrix norm
pub fn norm(
    registry: &DispatchRegistry,
    x: &Value,
    ord: NormOrder,
    axis: Option<isize>,
) -> Result<Value> {
    let mut args = CallArgs::new([x.clone()]).with(kw::ORD, ord);
    if let Some(axis) = axis {
        args = args.with(kw::AXIS, axis);
    }
    single(registry, Operation::Norm, args)
}

/// `num` numbers spaced evenly on a log scale from `base^start` to `base^stop`
pub fn logspace(
    registry: &DispatchRegistry,
    start: &Value,
    stop: &Value,
    num: usize,
    base: f64,
) -> Result<Value> {
    let args = CallArgs::new([start.clone(), stop.clone()])
        .with(kw::NUM, num)
        .with(kw::BASE, base);
    single(registry, Operation::Logspace, args)
}

/// Diagonal matrix of the column sums of adjacency matrix `a`
pub fn degree(registry: &DispatchRegistry, a: &Value) -> Result<Value> {
    single(registry, Operation::Degree, CallArgs::new([a.clone()]))
}

/// First `k` eigenpairs of symmetric `l` in ascending eigenvalue order
pub fn eigenpairs(registry: &DispatchRegistry, l: &Value, k: usize) -> Result<(Value, Value)> {
    let args = CallArgs::new([l.clone()]).with(kw::K, k);
    pair(registry, Operation::Eigenpairs, args)
}

/// Copy of `a` with the entry at flat `index` replaced by `value`
pub fn set_value(registry: &DispatchRegistry, a: &Value, index: usize, value: f64) -> Result<Value> {
    let args = CallArgs::new([a.clone()])
        .with(kw::INDEX, index)
        .with(kw::VALUE, value);
    single(registry, Operation::SetValue, args)
}

/// Canonical double dtype of the backend `reference` belongs to
pub fn dtype_double(registry: &DispatchRegistry, reference: &Value) -> Result<DType> {
    dtype(registry, Operation::DtypeDouble, reference)
}

/// Canonical integer dtype of the backend `reference` belongs to
pub fn dtype_integer(registry: &DispatchRegistry, reference: &Value) -> Result<DType> {
    dtype(registry, Operation::DtypeInteger, reference)
}

/// Complex dtype matching the precision of `reference`
pub fn dtype_complex(registry: &DispatchRegistry, reference: &Value) -> Result<DType> {
    dtype(registry, Operation::DtypeComplex, reference)
}

/// Dtype of `reference` if floating, the backend's double otherwise
pub fn float_like(registry: &DispatchRegistry, reference: &Value) -> Result<DType> {
    dtype(registry, Operation::FloatLike, reference)
}

/// Snapshot of a random generator's state
pub fn get_random_state(registry: &DispatchRegistry, key: &Value) -> Result<Value> {
    single(registry, Operation::GetRandomState, CallArgs::new([key.clone()]))
}

/// New generator of `key`'s kind continuing from `state`
pub fn restore_random_state(
    registry: &DispatchRegistry,
    key: &Value,
    state: &Value,
) -> Result<Value> {
    let args = CallArgs::new([key.clone(), state.clone()]);
    single(registry, Operation::RestoreRandomState, args)
}

/// `real + i * imag` in the backend's complex type
pub fn create_complex(registry: &DispatchRegistry, real: &Value, imag: &Value) -> Result<Value> {
    let args = CallArgs::new([real.clone(), imag.clone()]);
    single(registry, Operation::CreateComplex, args)
}

/// Cumulative sum, along `axis` when given
pub fn cumsum(registry: &DispatchRegistry, a: &Value, axis: Option<isize>) -> Result<Value> {
    let mut args = CallArgs::new([a.clone()]);
    if let Some(axis) = axis {
        args = args.with(kw::AXIS, axis);
    }
    single(registry, Operation::Cumsum, args)
}

/// `(sign, logdet)` of a square matrix
pub fn slogdet(registry: &DispatchRegistry, a: &Value) -> Result<(Value, Value)> {
    pair(registry, Operation::Slogdet, CallArgs::new([a.clone()]))
}

/// Ascending eigenvalues of a symmetric or Hermitian matrix
///
/// `uplo` selects the triangle that is read; `None` keeps the backend default.
pub fn eigvalsh(registry: &DispatchRegistry, a: &Value, uplo: Option<Triangle>) -> Result<Value> {
    let mut args = CallArgs::new([a.clone()]);
    if let Some(uplo) = uplo {
        args = args.with(kw::UPLO, uplo);
    }
    single(registry, Operation::Eigvalsh, args)
}

/// Elementwise `1/x` with zeros mapped to zero
pub fn reciprocal_no_nan(registry: &DispatchRegistry, x: &Value) -> Result<Value> {
    single(registry, Operation::ReciprocalNoNan, CallArgs::new([x.clone()]))
}

/// Elementwise complex conjugate
pub fn complex_conj(registry: &DispatchRegistry, x: &Value) -> Result<Value> {
    single(registry, Operation::ComplexConj, CallArgs::new([x.clone()]))
}
