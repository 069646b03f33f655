//! Both backends installed side by side

mod common;

use common::{dense, matrix, registry};
use geolab::dense::{ChaCha8Rng, CsrMatrix};
use geolab::matrix::ChaCha20Rng;
use geolab::nalgebra::{DMatrix, DVector, Matrix1};
use geolab::ndarray::{array, ArrayD};
use geolab::{ops, CallArgs, DispatchRegistry, Error, NormOrder, Operation, Returned, Signature, TypePattern, Value};
use rand::SeedableRng;
use rayon::prelude::*;

#[test]
fn test_backends_coexist_without_ambiguity() {
    let registry = registry();
    for op in Operation::ALL {
        assert!(registry.signatures(op).len() >= 2, "{op} lacks a backend");
    }
    assert_eq!(registry.ambiguities(), vec![]);
}

#[test]
fn test_plain_scalars_resolve_to_dense_backend() {
    let registry = registry();
    let args = CallArgs::new([Value::new(3.0f64)]);
    assert_eq!(registry.resolve(Operation::Norm, &args).unwrap().to_string(), "(Numeric)");

    let out = ops::norm(&registry, &Value::new(-3.0f64), NormOrder::Default, None).unwrap();
    assert_eq!(*out.get::<f64>().unwrap(), 3.0);

    let start = Value::new(0.0f64);
    let stop = Value::new(1.0f64);
    let out = ops::logspace(&registry, &start, &stop, 2, 10.0).unwrap();
    assert!(out.is::<ArrayD<f64>>());
}

#[test]
fn test_native_types_stay_in_their_backend() {
    let registry = registry();
    let out = ops::norm(&registry, &matrix(1, 2, &[3.0, 4.0]), NormOrder::Default, None).unwrap();
    assert_eq!(out.get::<Matrix1<f64>>().unwrap()[(0, 0)], 5.0);

    let out = ops::norm(&registry, &dense(&[2], &[3.0, 4.0]), NormOrder::Default, None).unwrap();
    assert_eq!(*out.get::<f64>().unwrap(), 5.0);
}

#[test]
fn test_designated_keyword_steers_dispatch() {
    let registry = registry();
    let y = dense(&[3], &[1.0, 2.0, 3.0]);

    // dense coordinates keep the dense entry
    let x = dense(&[3], &[0.0, 1.0, 2.0]);
    let out = ops::trapz(&registry, &y, Some(&x), None, -1).unwrap();
    assert_eq!(*out.get::<f64>().unwrap(), 4.0);

    // matrix coordinates only fit the wider entry
    let x = Value::new(DVector::from_vec(vec![0.0, 1.0, 2.0]));
    let out = ops::trapz(&registry, &y, Some(&x), None, -1).unwrap();
    assert_eq!(out.get::<Matrix1<f64>>().unwrap()[(0, 0)], 4.0);
}

#[test]
fn test_mixed_backend_arguments_fail_cleanly() {
    let registry = registry();
    let err = ops::create_complex(
        &registry,
        &dense(&[1], &[1.0]),
        &Value::new(DVector::from_vec(vec![1.0f32])),
    )
    .unwrap_err();
    assert!(matches!(err, Error::NoMatchingImplementation { .. }));
}

#[test]
fn test_collaborator_operations_share_the_registry() {
    let registry = registry();
    registry
        .register(
            "trace",
            Signature::new([TypePattern::of::<DMatrix<f64>>()]),
            |args| Ok(Returned::single(args.arg::<DMatrix<f64>>(0)?.trace())),
        )
        .unwrap();
    let out = registry
        .call("trace", &CallArgs::new([matrix(2, 2, &[1.0, 9.0, 9.0, 2.0])]))
        .unwrap()
        .into_value()
        .unwrap();
    assert_eq!(*out.get::<f64>().unwrap(), 3.0);

    // built-in names keep their arity
    let err = registry
        .register(Operation::Qr, Signature::new([TypePattern::Any, TypePattern::Any]), |_| {
            Ok(Returned::single(0.0f64))
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRegistration { .. }));
}

#[test]
fn test_sparse_and_dense_reciprocal_side_by_side() {
    let registry = registry();
    let sparse = CsrMatrix::from_triplets(2, 2, vec![(0, 0, 4.0), (1, 1, 0.0)]).unwrap();
    let out = ops::reciprocal_no_nan(&registry, &Value::new(sparse)).unwrap();
    let out = out.get::<CsrMatrix<f64>>().unwrap();
    assert_eq!(out.data(), &[0.25, 0.0]);
    assert_eq!(out.nnz(), 2);
}

#[test]
fn test_generators_identify_their_backend() {
    let registry = registry();
    let dense_key = Value::new(ChaCha8Rng::seed_from_u64(1));
    let matrix_key = Value::new(ChaCha20Rng::seed_from_u64(1));
    assert_eq!(ops::dtype_integer(&registry, &dense_key).unwrap(), geolab::DType::I64);
    assert_eq!(ops::dtype_integer(&registry, &matrix_key).unwrap(), geolab::DType::I32);

    // a snapshot only restores into its own backend
    let state = ops::get_random_state(&registry, &dense_key).unwrap();
    assert!(ops::restore_random_state(&registry, &matrix_key, &state).is_err());
}

#[test]
fn test_concurrent_calls_across_backends() {
    let registry = registry();
    let a = Value::new(array![[0.0, 1.0, 1.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0]].into_dyn());
    let m = matrix(3, 3, &[0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    let traces: Vec<f64> = (0..256)
        .into_par_iter()
        .map(|i| {
            if i % 2 == 0 {
                let d = ops::degree(&registry, &a).unwrap();
                d.get::<ArrayD<f64>>().unwrap().sum()
            } else {
                let d = ops::degree(&registry, &m).unwrap();
                d.get::<DMatrix<f64>>().unwrap().trace()
            }
        })
        .collect();
    assert!(traces.iter().all(|&t| t == 4.0));
}

#[test]
fn test_global_registry_is_shared() {
    let first = geolab::global_registry().unwrap();
    let second = geolab::global_registry().unwrap();
    assert!(std::ptr::eq(first, second));
    assert!(first.ambiguities().is_empty());

    let from_threads: Vec<usize> = (0..8)
        .into_par_iter()
        .map(|_| geolab::global_registry().unwrap() as *const DispatchRegistry as usize)
        .collect();
    assert!(from_threads.iter().all(|&p| p == first as *const DispatchRegistry as usize));
}
