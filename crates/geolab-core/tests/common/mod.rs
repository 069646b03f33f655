//! Shared utilities for integration tests

#![allow(dead_code)]

use geolab_core::{CallArgs, DispatchRegistry, Result, Returned, TypeKey, TypePattern, Value};

/// Implementation that returns a fixed label, so tests can see which entry ran
pub fn tag(label: &'static str) -> impl Fn(&CallArgs) -> Result<Returned> + Send + Sync + 'static {
    move |_| Ok(Returned::single(label))
}

/// Call `op` and return the label produced by the selected entry
pub fn selected(registry: &DispatchRegistry, op: &str, args: &CallArgs) -> Result<&'static str> {
    let value = registry.call(op, args)?.into_value()?;
    Ok(*value.get::<&'static str>()?)
}

/// Union of the scalar types used throughout the tests
pub fn scalars() -> TypePattern {
    TypePattern::named_union(
        "Scalar",
        [TypeKey::of::<f64>(), TypeKey::of::<f32>(), TypeKey::of::<i64>()],
    )
}

pub fn floats() -> TypePattern {
    TypePattern::named_union("Float", [TypeKey::of::<f64>(), TypeKey::of::<f32>()])
}

pub fn f64_args(values: &[f64]) -> CallArgs {
    CallArgs::new(values.iter().map(|&v| Value::new(v)))
}
