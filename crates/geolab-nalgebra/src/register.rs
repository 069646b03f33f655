//! Dispatch entries of the matrix backend

use crate::random::{self, RandomState};
use crate::tensor::Tensor;
use crate::{array, linalg, numeric};
use geolab_core::ops::{kw, LOGSPACE_DEFAULT_BASE, LOGSPACE_DEFAULT_NUM};
use geolab_core::{
    normalize_axis, CallArgs, DType, DispatchRegistry, Element, Error, Literal, NormOrder,
    Operation, QrMode, Result, Returned, Signature, Triangle, TypeKey, TypePattern,
};
use nalgebra::{DMatrix, DVector, Matrix1};
use ndarray::ArrayD;
use num_complex::Complex;
use rand_chacha::ChaCha20Rng;

fn exact<T: 'static>() -> TypePattern {
    TypePattern::of::<T>()
}

fn tensor_arg(args: &CallArgs, index: usize) -> Result<Tensor> {
    Tensor::from_value(args.value(index)?)
}

fn single(t: Tensor) -> Returned {
    Returned::Value(t.into_value())
}

pub(crate) fn register_all(registry: &DispatchRegistry) -> Result<()> {
    register_numeric_ops(registry)?;
    register_matrix_ops(registry)?;
    register_linalg_ops(registry)?;
    register_dtype_ops(registry)?;
    register_random_ops(registry)?;
    register_complex_ops(registry)?;
    Ok(())
}

/// Operations that accept any numeric value, foreign ones included
fn register_numeric_ops(registry: &DispatchRegistry) -> Result<()> {
    let indices = TypePattern::union([TypeKey::of::<DVector<i32>>(), TypeKey::of::<DMatrix<i32>>()]);
    registry.register(
        Operation::TakeAlongAxis,
        Signature::new([numeric(), indices]),
        |args| {
            let a = tensor_arg(args, 0)?;
            let index = args.value(1)?;
            let flat: Vec<i32> = match index.downcast_ref::<DVector<i32>>() {
                Some(v) => v.iter().copied().collect(),
                None => index.get::<DMatrix<i32>>()?.transpose().iter().copied().collect(),
            };
            let axis = args.keyword_or(kw::AXIS, 0isize)?;
            Ok(single(array::take_along_axis(&a, &flat, axis)?))
        },
    )?;

    let markers = TypePattern::named_union(
        "Matrix",
        [
            TypeKey::of::<DMatrix<f64>>(),
            TypeKey::of::<DVector<f64>>(),
            TypeKey::of::<Matrix1<f64>>(),
        ],
    );
    let sources = TypePattern::named_union(
        "Literal | Dense | Matrix",
        [
            TypeKey::of::<Literal>(),
            TypeKey::of::<f64>(),
            TypeKey::of::<ArrayD<f64>>(),
            TypeKey::of::<DMatrix<f64>>(),
            TypeKey::of::<DVector<f64>>(),
            TypeKey::of::<Matrix1<f64>>(),
        ],
    );
    registry.register(
        Operation::FromLiteral,
        Signature::new([markers, sources]),
        |args| Ok(single(tensor_arg(args, 1)?)),
    )?;

    registry.register(
        Operation::Trapz,
        Signature::new([numeric()]).keyword(kw::X, numeric()),
        |args| {
            let y = tensor_arg(args, 0)?;
            let x = args.keyword_value(kw::X).map(Tensor::from_value).transpose()?;
            let dx = args.keyword_or(kw::DX, 1.0f64)?;
            let axis = args.keyword_or(kw::AXIS, -1isize)?;
            Ok(single(array::trapz(&y, x.as_ref(), dx, axis)?))
        },
    )?;

    registry.register(Operation::Norm, Signature::new([numeric()]), |args| {
        let x = tensor_arg(args, 0)?;
        let ord = args.keyword_or(kw::ORD, NormOrder::default())?;
        let axis = args.keyword::<isize>(kw::AXIS)?.copied();
        Ok(single(array::norm(&x, ord, axis)?))
    })?;

    registry.register(
        Operation::Logspace,
        Signature::new([numeric(), numeric()]),
        |args| {
            let start = tensor_arg(args, 0)?;
            let stop = tensor_arg(args, 1)?;
            let num = args.keyword_or(kw::NUM, LOGSPACE_DEFAULT_NUM)?;
            let base = args.keyword_or(kw::BASE, LOGSPACE_DEFAULT_BASE)?;
            Ok(single(array::logspace(&start, &stop, num, base)?))
        },
    )?;

    Ok(())
}

fn register_matrix_ops(registry: &DispatchRegistry) -> Result<()> {
    registry.register(
        Operation::Degree,
        Signature::new([exact::<DMatrix<f64>>()]),
        |args| Ok(Returned::single(array::degree(args.arg::<DMatrix<f64>>(0)?))),
    )?;

    registry.register(
        Operation::SetValue,
        Signature::new([exact::<DVector<f64>>()]),
        |args| {
            let a = args.arg::<DVector<f64>>(0)?;
            let index = *args.require::<usize>(kw::INDEX)?;
            let value = *args.require::<f64>(kw::VALUE)?;
            Ok(Returned::single(array::set_value(a, index, value)?))
        },
    )?;

    // without an axis the running sum goes down axis 0
    registry.register(
        Operation::Cumsum,
        Signature::new([exact::<DMatrix<f64>>()]),
        |args| {
            let a = args.arg::<DMatrix<f64>>(0)?;
            let axis = normalize_axis(args.keyword_or(kw::AXIS, 0isize)?, 2)?;
            Ok(Returned::single(array::cumsum_matrix(a, axis)))
        },
    )?;
    registry.register(
        Operation::Cumsum,
        Signature::new([exact::<DVector<f64>>()]),
        |args| {
            let a = args.arg::<DVector<f64>>(0)?;
            normalize_axis(args.keyword_or(kw::AXIS, 0isize)?, 1)?;
            Ok(Returned::single(array::cumsum_vector(a)))
        },
    )?;

    registry.register(
        Operation::ReciprocalNoNan,
        Signature::new([exact::<DMatrix<f64>>()]),
        |args| {
            let x = args.arg::<DMatrix<f64>>(0)?;
            Ok(Returned::single(x.map(array::reciprocal_or_zero)))
        },
    )?;
    registry.register(
        Operation::ReciprocalNoNan,
        Signature::new([exact::<DVector<f64>>()]),
        |args| {
            let x = args.arg::<DVector<f64>>(0)?;
            Ok(Returned::single(x.map(array::reciprocal_or_zero)))
        },
    )
}

fn register_linalg_ops(registry: &DispatchRegistry) -> Result<()> {
    registry.register(Operation::Qr, Signature::new([exact::<DMatrix<f64>>()]), |args| {
        let a = args.arg::<DMatrix<f64>>(0)?;
        let mode = args.keyword_or(kw::MODE, QrMode::default())?;
        let (q, r) = linalg::qr(a, mode);
        Ok(Returned::pair(q, r))
    })?;

    registry.register(
        Operation::Slogdet,
        Signature::new([exact::<DMatrix<f64>>()]),
        |args| {
            let (sign, logdet) = linalg::slogdet(args.arg::<DMatrix<f64>>(0)?)?;
            Ok(Returned::pair(Matrix1::new(sign), Matrix1::new(logdet)))
        },
    )?;

    registry.register(
        Operation::Eigvalsh,
        Signature::new([exact::<DMatrix<f64>>()]),
        |args| {
            let a = args.arg::<DMatrix<f64>>(0)?;
            let uplo = args.keyword_or(kw::UPLO, Triangle::Lower)?;
            Ok(Returned::single(linalg::eigvalsh(a, uplo)?))
        },
    )?;

    registry.register(
        Operation::Eigenpairs,
        Signature::new([exact::<DMatrix<f64>>()]),
        |args| {
            let l = args.arg::<DMatrix<f64>>(0)?;
            let k = *args.require::<usize>(kw::K)?;
            let (values, vectors) = linalg::eigenpairs(l, k)?;
            Ok(Returned::pair(values, vectors))
        },
    )
}

fn register_dtype_queries<T: Element>(registry: &DispatchRegistry) -> Result<()> {
    for pattern in [exact::<DMatrix<T>>(), exact::<DVector<T>>()] {
        registry.register(
            Operation::DtypeComplex,
            Signature::new([pattern.clone()]),
            |_| Ok(Returned::single(T::DTYPE.complex_of())),
        )?;
        registry.register(
            Operation::FloatLike,
            Signature::new([pattern]),
            |_| Ok(Returned::single(T::DTYPE.float_like())),
        )?;
    }
    Ok(())
}

fn register_dtype_ops(registry: &DispatchRegistry) -> Result<()> {
    registry.register(
        Operation::DtypeDouble,
        Signature::new([exact::<ChaCha20Rng>()]),
        |_| Ok(Returned::single(DType::F64)),
    )?;
    registry.register(
        Operation::DtypeInteger,
        Signature::new([exact::<ChaCha20Rng>()]),
        |_| Ok(Returned::single(DType::I32)),
    )?;

    register_dtype_queries::<f32>(registry)?;
    register_dtype_queries::<f64>(registry)?;
    register_dtype_queries::<i32>(registry)?;
    register_dtype_queries::<Complex<f32>>(registry)?;
    register_dtype_queries::<Complex<f64>>(registry)
}

fn register_random_ops(registry: &DispatchRegistry) -> Result<()> {
    registry.register(
        Operation::GetRandomState,
        Signature::new([exact::<ChaCha20Rng>()]),
        |args| Ok(Returned::single(random::snapshot(args.arg::<ChaCha20Rng>(0)?))),
    )?;
    registry.register(
        Operation::RestoreRandomState,
        Signature::new([exact::<ChaCha20Rng>(), exact::<RandomState>()]),
        |args| Ok(Returned::single(random::restore(args.arg::<RandomState>(1)?))),
    )
}

fn register_complex_ops(registry: &DispatchRegistry) -> Result<()> {
    // the real part takes the shape of the imaginary part
    registry.register(
        Operation::CreateComplex,
        Signature::new([numeric(), exact::<DMatrix<f64>>()]),
        |args| {
            let imag = args.arg::<DMatrix<f64>>(1)?;
            let real = match tensor_arg(args, 0)? {
                Tensor::Scalar(s) => DMatrix::from_element(imag.nrows(), imag.ncols(), s),
                Tensor::Matrix(m) => m,
                Tensor::Vector(v) => {
                    return Err(Error::shape(
                        "create_complex",
                        format!("vector real part of length {} for a matrix imaginary part", v.len()),
                    ))
                }
            };
            Ok(Returned::single(array::create_complex(&real, imag)?))
        },
    )?;
    registry.register(
        Operation::CreateComplex,
        Signature::new([numeric(), exact::<DVector<f64>>()]),
        |args| {
            let imag = args.arg::<DVector<f64>>(1)?;
            let real = match tensor_arg(args, 0)? {
                Tensor::Scalar(s) => DVector::from_element(imag.len(), s),
                Tensor::Vector(v) => v,
                Tensor::Matrix(m) => {
                    return Err(Error::shape(
                        "create_complex",
                        format!(
                            "{}x{} real part for a vector imaginary part",
                            m.nrows(),
                            m.ncols()
                        ),
                    ))
                }
            };
            Ok(Returned::single(array::create_complex(&real, imag)?))
        },
    )?;
    registry.register(
        Operation::CreateComplex,
        Signature::new([exact::<DMatrix<f32>>(), exact::<DMatrix<f32>>()]),
        |args| {
            let (re, im) = (args.arg::<DMatrix<f32>>(0)?, args.arg::<DMatrix<f32>>(1)?);
            Ok(Returned::single(array::create_complex(re, im)?))
        },
    )?;
    registry.register(
        Operation::CreateComplex,
        Signature::new([exact::<DVector<f32>>(), exact::<DVector<f32>>()]),
        |args| {
            let (re, im) = (args.arg::<DVector<f32>>(0)?, args.arg::<DVector<f32>>(1)?);
            Ok(Returned::single(array::create_complex(re, im)?))
        },
    )?;

    registry.register(
        Operation::ComplexConj,
        Signature::new([exact::<DMatrix<Complex<f64>>>()]),
        |args| Ok(Returned::single(args.arg::<DMatrix<Complex<f64>>>(0)?.conjugate())),
    )?;
    registry.register(
        Operation::ComplexConj,
        Signature::new([exact::<DVector<Complex<f64>>>()]),
        |args| Ok(Returned::single(args.arg::<DVector<Complex<f64>>>(0)?.conjugate())),
    )?;
    registry.register(
        Operation::ComplexConj,
        Signature::new([exact::<DMatrix<Complex<f32>>>()]),
        |args| Ok(Returned::single(args.arg::<DMatrix<Complex<f32>>>(0)?.conjugate())),
    )?;
    registry.register(
        Operation::ComplexConj,
        Signature::new([exact::<DVector<Complex<f32>>>()]),
        |args| Ok(Returned::single(args.arg::<DVector<Complex<f32>>>(0)?.conjugate())),
    )
}
