use pyhost::interop::{self, arg, IntoDynamic};
use pyhost::{
    Callable, DynamicValue, ExceptionKind, HostMethod, Invoke, KeywordArguments,
    PositionalArguments, PyException, PyResult, RuntimeConfig, StaticNativeCallable, Visibility,
};
use proptest::prelude::*;
use rayon::prelude::*;

fn add(args: &[DynamicValue], _kwargs: &KeywordArguments) -> PyResult<DynamicValue> {
    let a: i64 = arg(args, 0)?;
    let b: i64 = arg(args, 1)?;
    Ok(a.wrapping_add(b).into_dynamic())
}

/// Describes exactly what the body received
fn describe(args: &[DynamicValue], kwargs: &KeywordArguments) -> PyResult<DynamicValue> {
    let scale = kwargs.get("scale").and_then(DynamicValue::as_int).unwrap_or(1);
    let total: i64 = args
        .iter()
        .filter_map(DynamicValue::as_int)
        .fold(0i64, |acc, v| acc.wrapping_add(v.wrapping_mul(scale)));
    Ok(DynamicValue::from_list(vec![
        DynamicValue::from_list(args.to_vec()),
        DynamicValue::from_kwargs(kwargs),
        DynamicValue::from_int(total),
    ]))
}

fn raise_value_error(_args: &[DynamicValue], _kwargs: &KeywordArguments) -> PyResult<DynamicValue> {
    Err(PyException::value_error("bad"))
}

fn wrap(owner: &str, name: &str, body: fn(&[DynamicValue], &KeywordArguments) -> PyResult<DynamicValue>) -> StaticNativeCallable {
    StaticNativeCallable::new(HostMethod::new(owner, name, body)).unwrap()
}

#[test]
fn test_add_returns_five() {
    let callable = wrap("demo.Math", "add", add);
    let args: PositionalArguments = [DynamicValue::from_int(2), DynamicValue::from_int(3)]
        .into_iter()
        .collect();

    let result = callable.invoke(&args, &KeywordArguments::new()).unwrap();
    assert_eq!(result, DynamicValue::from_int(5));
}

#[test]
fn test_value_error_becomes_runtime_error() {
    let callable = wrap("demo.Errors", "raise_value_error", raise_value_error);
    let err = callable.invoke(&[], &KeywordArguments::new()).unwrap_err();

    assert_eq!(err.kind(), ExceptionKind::RuntimeError);
    assert_eq!(err.message(), "ValueError: bad");
    assert!(err.is_instance(ExceptionKind::Exception));
    assert!(!err.is_instance(ExceptionKind::ValueError));
}

#[test]
fn test_inaccessible_method_identified() {
    let method = HostMethod::builder("demo.Internal", "helper")
        .visibility(Visibility::Private)
        .body(add);
    let callable = StaticNativeCallable::new(method).unwrap();

    let err = callable
        .invoke(&[DynamicValue::from_int(1), DynamicValue::from_int(2)], &KeywordArguments::new())
        .unwrap_err();
    assert_eq!(err.kind(), ExceptionKind::RuntimeError);
    assert_eq!(
        err.message(),
        "Illegal access to host static method private static demo.Internal.helper(*args, **kwargs)"
    );
    assert_eq!(interop::method_calls("demo.Internal.helper"), 1);
}

#[test]
fn test_native_indistinguishable_from_closure() {
    let native: Callable = wrap("demo.Math", "add", add).into();
    let closure: Callable = pyhost::Closure::new("add", add).into();
    let args = [DynamicValue::from_int(40), DynamicValue::from_int(2)];

    for callable in [native, closure] {
        let value = callable.into_value();
        assert_eq!(
            value.call(&args, &KeywordArguments::new()).unwrap(),
            DynamicValue::from_int(42)
        );
    }
}

#[test]
fn test_concurrent_invocation() {
    let callable = wrap("demo.Concurrent", "add", add);

    let results: Vec<i64> = (0..256i64)
        .into_par_iter()
        .map(|i| {
            callable
                .invoke(&[DynamicValue::from_int(i), DynamicValue::from_int(i)], &KeywordArguments::new())
                .unwrap()
                .as_int()
                .unwrap()
        })
        .collect();

    assert_eq!(results, (0..256i64).map(|i| i * 2).collect::<Vec<_>>());
    assert_eq!(interop::method_calls("demo.Concurrent.add"), 256);
}

#[test]
fn test_init_with_config() {
    let config = RuntimeConfig::parse("[logging]\nlevel = \"warn\"\n").unwrap();
    pyhost::init_with_config(&config);
    assert!(pyhost::logging::is_initialized());
    pyhost::cleanup();
}

fn small_value() -> impl Strategy<Value = DynamicValue> {
    prop_oneof![
        Just(DynamicValue::none()),
        any::<bool>().prop_map(DynamicValue::from_bool),
        any::<i64>().prop_map(DynamicValue::from_int),
        "[a-z]{0,8}".prop_map(|s| DynamicValue::from_str(&s)),
    ]
}

proptest! {
    #[test]
    fn prop_invoke_matches_direct_call(
        args in prop::collection::vec(small_value(), 0..6),
        kwargs in prop::collection::hash_map("[a-z]{1,6}", small_value(), 0..4),
    ) {
        let callable = wrap("demo.Props", "describe", describe);
        let direct = describe(&args, &kwargs).unwrap();
        let bridged = callable.invoke(&args, &kwargs).unwrap();
        prop_assert_eq!(bridged, direct);
    }

    #[test]
    fn prop_kwargs_forwarded_unchanged(key in "[a-z]{1,6}", value in any::<i64>()) {
        let callable = wrap("demo.Props", "describe", describe);
        let mut kwargs = KeywordArguments::new();
        kwargs.insert(key.clone(), DynamicValue::from_int(value));

        let result = callable.invoke(&[], &kwargs).unwrap();
        let observed = result.as_list().unwrap()[1].as_dict().unwrap().clone();
        prop_assert_eq!(observed.len(), 1);
        prop_assert_eq!(observed.get(&key), Some(&DynamicValue::from_int(value)));
    }

    #[test]
    fn prop_raised_message_is_cause_text(message in "[ -~]{0,20}") {
        let cause = PyException::new(ExceptionKind::KeyError, message);
        let expected = cause.to_string();
        let body = move |_: &[DynamicValue], _: &KeywordArguments| -> PyResult<DynamicValue> {
            Err(cause.clone())
        };
        let callable = StaticNativeCallable::new(HostMethod::new("demo.Props", "raise", body)).unwrap();

        let err = callable.invoke(&[], &KeywordArguments::new()).unwrap_err();
        prop_assert_eq!(err.kind(), ExceptionKind::RuntimeError);
        prop_assert_eq!(err.message(), expected.as_str());
    }
}
