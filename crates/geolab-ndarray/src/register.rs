//! Dispatch entries of the dense backend

use crate::convert::{self, numeric_arg};
use crate::random::DenseRandomState;
use crate::sparse::CsrMatrix;
use crate::{array, linalg, numeric};
use geolab_core::ops::{kw, LOGSPACE_DEFAULT_BASE, LOGSPACE_DEFAULT_NUM};
use geolab_core::{
    DType, DispatchRegistry, Element, Literal, NormOrder, Operation, QrMode, Result, Returned,
    Signature, Triangle, TypeKey, TypePattern,
};
use nalgebra::{DMatrix, DVector, Matrix1};
use ndarray::ArrayD;
use num_complex::Complex;
use rand_chacha::ChaCha8Rng;

/// 0-d results come back as plain scalars, as NumPy returns them
fn scalar_or_array<T: Copy + Send + Sync + 'static>(out: ArrayD<T>) -> Returned {
    let first = out.iter().next().copied();
    match (out.ndim(), first) {
        (0, Some(v)) => Returned::single(v),
        _ => Returned::single(out),
    }
}

fn exact<T: 'static>() -> TypePattern {
    TypePattern::of::<T>()
}

pub(crate) fn register_all(registry: &DispatchRegistry) -> Result<()> {
    register_array_ops(registry)?;
    register_linalg_ops(registry)?;
    register_dtype_ops(registry)?;
    register_random_ops(registry)?;
    register_elementwise_ops(registry)?;
    Ok(())
}

fn register_array_ops(registry: &DispatchRegistry) -> Result<()> {
    registry.register(
        Operation::TakeAlongAxis,
        Signature::new([numeric(), exact::<ArrayD<i64>>()]),
        |args| {
            let a = numeric_arg(args, 0)?;
            let index = args.arg::<ArrayD<i64>>(1)?;
            let axis = args.keyword_or(kw::AXIS, 0isize)?;
            Ok(Returned::single(array::take_along_axis(
                &a.view(),
                &index.view(),
                axis,
            )?))
        },
    )?;

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
        Signature::new([exact::<ArrayD<f64>>(), sources]),
        |args| Ok(Returned::single(convert::to_array(args.value(1)?)?)),
    )?;

    registry.register(
        Operation::Trapz,
        Signature::new([numeric()]).keyword(kw::X, exact::<ArrayD<f64>>()),
        |args| {
            let y = numeric_arg(args, 0)?;
            let x = args.keyword::<ArrayD<f64>>(kw::X)?.map(|x| x.view());
            let dx = args.keyword_or(kw::DX, 1.0f64)?;
            let axis = args.keyword_or(kw::AXIS, -1isize)?;
            let out = array::trapz(&y.view(), x.as_ref(), dx, axis)?;
            Ok(scalar_or_array(out))
        },
    )?;

    registry.register(
        Operation::Norm,
        Signature::new([numeric()]),
        |args| {
            let x = numeric_arg(args, 0)?;
            let ord = args.keyword_or(kw::ORD, NormOrder::default())?;
            let axis = args.keyword::<isize>(kw::AXIS)?.copied();
            Ok(scalar_or_array(array::norm(&x.view(), ord, axis)?))
        },
    )?;

    registry.register(
        Operation::Logspace,
        Signature::new([numeric(), numeric()]),
        |args| {
            let start = numeric_arg(args, 0)?;
            let stop = numeric_arg(args, 1)?;
            let num = args.keyword_or(kw::NUM, LOGSPACE_DEFAULT_NUM)?;
            let base = args.keyword_or(kw::BASE, LOGSPACE_DEFAULT_BASE)?;
            Ok(Returned::single(array::logspace(
                &start.view(),
                &stop.view(),
                num,
                base,
            )?))
        },
    )?;

    registry.register(Operation::Degree, Signature::new([numeric()]), |args| {
        let a = numeric_arg(args, 0)?;
        Ok(Returned::single(array::degree(&a.view())?))
    })?;

    registry.register(
        Operation::SetValue,
        Signature::new([exact::<ArrayD<f64>>()]),
        |args| {
            let a = args.arg::<ArrayD<f64>>(0)?;
            let index = *args.require::<usize>(kw::INDEX)?;
            let value = *args.require::<f64>(kw::VALUE)?;
            Ok(Returned::single(array::set_value(&a.view(), index, value)?))
        },
    )?;

    registry.register(Operation::Cumsum, Signature::new([numeric()]), |args| {
        let a = numeric_arg(args, 0)?;
        let axis = args.keyword::<isize>(kw::AXIS)?.copied();
        Ok(Returned::single(array::cumsum(&a.view(), axis)?))
    })?;

    Ok(())
}

fn register_linalg_ops(registry: &DispatchRegistry) -> Result<()> {
    registry.register(Operation::Qr, Signature::new([numeric()]), |args| {
        let a = numeric_arg(args, 0)?;
        let mode = args.keyword_or(kw::MODE, QrMode::default())?;
        let (q, r) = linalg::qr(&convert::matrix(&a.view(), "qr")?, mode);
        Ok(Returned::pair(q.into_dyn(), r.into_dyn()))
    })?;

    registry.register(Operation::Slogdet, Signature::new([numeric()]), |args| {
        let a = numeric_arg(args, 0)?;
        let (sign, logdet) = linalg::slogdet(&a.view())?;
        Ok(Returned::pair(sign, logdet))
    })?;

    registry.register(Operation::Eigvalsh, Signature::new([numeric()]), |args| {
        let a = numeric_arg(args, 0)?;
        let uplo = args.keyword_or(kw::UPLO, Triangle::Upper)?;
        Ok(Returned::single(linalg::eigvalsh(&a.view(), uplo)?.into_dyn()))
    })?;

    registry.register(
        Operation::Eigenpairs,
        Signature::new([exact::<ArrayD<f64>>()]),
        |args| {
            let l = args.arg::<ArrayD<f64>>(0)?;
            let k = *args.require::<usize>(kw::K)?;
            let (values, vectors) = linalg::eigenpairs(&l.view(), k)?;
            Ok(Returned::pair(values.into_dyn(), vectors.into_dyn()))
        },
    )?;

    Ok(())
}

fn register_dtype_queries<T: Element>(registry: &DispatchRegistry) -> Result<()> {
    registry.register(
        Operation::DtypeComplex,
        Signature::new([exact::<ArrayD<T>>()]),
        |_| Ok(Returned::single(T::DTYPE.complex_of())),
    )?;
    registry.register(
        Operation::FloatLike,
        Signature::new([exact::<ArrayD<T>>()]),
        |_| Ok(Returned::single(T::DTYPE.float_like())),
    )
}

fn register_dtype_ops(registry: &DispatchRegistry) -> Result<()> {
    registry.register(
        Operation::DtypeDouble,
        Signature::new([exact::<ChaCha8Rng>()]),
        |_| Ok(Returned::single(DType::F64)),
    )?;
    registry.register(
        Operation::DtypeInteger,
        Signature::new([exact::<ChaCha8Rng>()]),
        |_| Ok(Returned::single(DType::I64)),
    )?;

    register_dtype_queries::<f32>(registry)?;
    register_dtype_queries::<f64>(registry)?;
    register_dtype_queries::<i64>(registry)?;
    register_dtype_queries::<Complex<f32>>(registry)?;
    register_dtype_queries::<Complex<f64>>(registry)?;

    // plain scalars behave like float64 arrays
    registry.register(Operation::DtypeComplex, Signature::new([exact::<f64>()]), |_| {
        Ok(Returned::single(DType::Complex128))
    })?;
    registry.register(Operation::FloatLike, Signature::new([exact::<f64>()]), |_| {
        Ok(Returned::single(DType::F64))
    })
}

fn register_random_ops(registry: &DispatchRegistry) -> Result<()> {
    registry.register(
        Operation::GetRandomState,
        Signature::new([exact::<ChaCha8Rng>()]),
        |args| {
            let rng = args.arg::<ChaCha8Rng>(0)?;
            Ok(Returned::single(DenseRandomState::capture(rng)))
        },
    )?;
    registry.register(
        Operation::RestoreRandomState,
        Signature::new([exact::<ChaCha8Rng>(), exact::<DenseRandomState>()]),
        |args| {
            let state = args.arg::<DenseRandomState>(1)?;
            Ok(Returned::single(state.restore()))
        },
    )
}

fn register_elementwise_ops(registry: &DispatchRegistry) -> Result<()> {
    registry.register(
        Operation::CreateComplex,
        Signature::new([numeric(), numeric()]),
        |args| {
            let re = numeric_arg(args, 0)?;
            let im = numeric_arg(args, 1)?;
            Ok(scalar_or_array(array::create_complex(&re.view(), &im.view())?))
        },
    )?;
    registry.register(
        Operation::CreateComplex,
        Signature::new([exact::<ArrayD<f32>>(), exact::<ArrayD<f32>>()]),
        |args| {
            let re = args.arg::<ArrayD<f32>>(0)?;
            let im = args.arg::<ArrayD<f32>>(1)?;
            Ok(scalar_or_array(array::create_complex(&re.view(), &im.view())?))
        },
    )?;

    registry.register(
        Operation::ComplexConj,
        Signature::new([exact::<ArrayD<Complex<f64>>>()]),
        |args| {
            let z = args.arg::<ArrayD<Complex<f64>>>(0)?;
            Ok(Returned::single(array::complex_conj(&z.view())))
        },
    )?;
    registry.register(
        Operation::ComplexConj,
        Signature::new([exact::<ArrayD<Complex<f32>>>()]),
        |args| {
            let z = args.arg::<ArrayD<Complex<f32>>>(0)?;
            Ok(Returned::single(array::complex_conj(&z.view())))
        },
    )?;

    registry.register(
        Operation::ComplexConj,
        Signature::new([exact::<Complex<f64>>()]),
        |args| Ok(Returned::single(args.arg::<Complex<f64>>(0)?.conj())),
    )?;
    registry.register(
        Operation::ComplexConj,
        Signature::new([exact::<Complex<f32>>()]),
        |args| Ok(Returned::single(args.arg::<Complex<f32>>(0)?.conj())),
    )?;

    registry.register(
        Operation::ReciprocalNoNan,
        Signature::new([exact::<ArrayD<f64>>()]),
        |args| {
            let x = args.arg::<ArrayD<f64>>(0)?;
            Ok(Returned::single(array::reciprocal_no_nan(&x.view())))
        },
    )?;
    registry.register(
        Operation::ReciprocalNoNan,
        Signature::new([exact::<CsrMatrix<f64>>()]),
        |args| {
            let x = args.arg::<CsrMatrix<f64>>(0)?;
            Ok(Returned::single(x.map_stored(|&v| array::reciprocal_or_zero(v))))
        },
    )
}
