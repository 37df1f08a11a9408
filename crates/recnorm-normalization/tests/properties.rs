//! Property tests for coercion and configuration round trips.

use std::collections::BTreeMap;

use proptest::prelude::*;
use recnorm_model::{DtypeToken, FieldValue, Record};
use recnorm_normalization::coercion::{
    coerce_boolean, coerce_float, coerce_integer, coerce_string,
};
use recnorm_normalization::{
    CoerceOptions, DtypeRegistry, ModuleConfigBuilder, coerce, coerce_tokens,
};

fn field_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        Just(FieldValue::Null),
        ".*".prop_map(FieldValue::String),
        any::<f64>().prop_map(FieldValue::Float),
        any::<i64>().prop_map(FieldValue::Integer),
        any::<bool>().prop_map(FieldValue::Boolean),
    ]
}

fn dtype_token() -> impl Strategy<Value = DtypeToken> {
    prop::sample::select(DtypeToken::ALL.to_vec())
}

proptest! {
    #[test]
    fn lenient_coerce_never_fails(
        record in prop::collection::btree_map("[a-z]{1,6}", field_value(), 0..8),
        dtype_map in prop::collection::btree_map("[a-z]{1,6}", dtype_token(), 0..8),
    ) {
        let partial = DtypeRegistry::empty().with_coercer(DtypeToken::Float, coerce_float);
        for registry in [DtypeRegistry::standard(), partial] {
            let coerced = coerce(&registry, &record, &dtype_map, CoerceOptions::lenient());
            prop_assert!(coerced.is_ok());
            prop_assert_eq!(coerced.unwrap().len(), record.len());
        }
    }

    #[test]
    fn lenient_token_coerce_never_fails(
        record in prop::collection::btree_map("[a-z]{1,4}", field_value(), 0..8),
        dtype_map in prop::collection::btree_map("[a-z]{1,4}", ".{0,10}", 0..8),
    ) {
        let registry = DtypeRegistry::standard();
        prop_assert!(coerce_tokens(&registry, &record, &dtype_map, CoerceOptions::lenient()).is_ok());
    }

    #[test]
    fn falsy_spellings_survive_case_and_padding(
        word in prop::sample::select(vec!["no", "false", "null", "", "none", "na", "nan", "nat", "0"]),
        upper in any::<bool>(),
        left in " {0,3}",
        right in "[ \t]{0,3}",
    ) {
        let word = if upper { word.to_uppercase() } else { word.to_string() };
        let input = FieldValue::String(format!("{left}{word}{right}"));
        prop_assert_eq!(coerce_boolean(&input), FieldValue::Boolean(false));
    }

    #[test]
    fn integers_survive_integer_coercion(n in -1_000_000_000i64..1_000_000_000) {
        prop_assert_eq!(coerce_integer(&FieldValue::Integer(n)), FieldValue::Integer(n));
        prop_assert_eq!(coerce_integer(&FieldValue::String(n.to_string())), FieldValue::Integer(n));
    }

    #[test]
    fn built_configs_resolve_to_canonical_tokens(
        fields in prop::collection::btree_map(
            "[A-Za-z ]{1,10}",
            (
                prop::option::of(prop_oneof![Just("NA".to_string()), Just("null".to_string()), "[a-z_]{1,8}"]),
                prop::option::of(prop::sample::select(vec![
                    "str", "float", "int", "bool", "Timestamp", "DateTime", "datetime", "NA", "None", "null",
                ])),
            ),
            0..10,
        ),
    ) {
        let renames: BTreeMap<String, Option<String>> =
            fields.iter().map(|(k, (rename, _))| (k.clone(), rename.clone())).collect();
        let dtypes: BTreeMap<String, Option<&str>> =
            fields.iter().map(|(k, (_, dtype))| (k.clone(), *dtype)).collect();

        let registry = DtypeRegistry::standard();
        let raw = ModuleConfigBuilder::build("Module", &renames, &dtypes);
        let resolved = ModuleConfigBuilder::new(&registry).resolve(&raw).unwrap();
        let module = &resolved["Module"];

        prop_assert_eq!(module.fields.len(), fields.len());
        for field in module.fields.values() {
            prop_assert!(DtypeToken::ALL.contains(&field.dtype));
            if field.include {
                prop_assert!(field.rename_target.is_some());
            }
        }
    }
}

#[test]
fn default_coercer_is_applied_to_raw_value() {
    let registry = DtypeRegistry::standard();
    let record: Record = [("n".to_string(), FieldValue::Integer(5))].into();
    let coerced = coerce(&registry, &record, &BTreeMap::new(), CoerceOptions::lenient()).unwrap();
    assert_eq!(coerced["n"], coerce_string(&FieldValue::Integer(5)));
}
