use crate::{
    ComponentSpec, FinderResult, LiteralValue, ObjectMember, ObjectSpec, PropSpec, PropType,
    SchemaError,
};
use serde_json::json;

fn sample() -> FinderResult {
    FinderResult {
        components: vec![ComponentSpec {
            name: "Button".into(),
            props_ref_index: 0,
        }],
        refs: vec![ObjectSpec {
            name: Some("Props".into()),
            members: vec![
                ObjectMember::new("label", PropSpec::new(PropType::String)),
                ObjectMember::new(
                    "size",
                    PropSpec::with_nullable(
                        PropType::union(vec![
                            PropType::literal("small"),
                            PropType::literal("large"),
                        ]),
                        true,
                    ),
                ),
                ObjectMember::new(
                    "onClick",
                    PropSpec::new(PropType::function(
                        vec![PropSpec::new(PropType::Event)],
                        PropSpec::new(PropType::Void),
                    )),
                ),
                ObjectMember::new("parent", PropSpec::with_nullable(PropType::reference(0), true)),
            ],
        }],
    }
}

#[test]
fn test_wire_format_uses_kind_tags_and_camel_case() {
    let value = serde_json::to_value(sample()).unwrap();
    assert_eq!(
        value,
        json!({
            "components": [{ "name": "Button", "propsRefIndex": 0 }],
            "refs": [{
                "name": "Props",
                "members": [
                    { "name": "label", "propType": { "kind": "string" }, "isNullable": false },
                    {
                        "name": "size",
                        "propType": {
                            "kind": "union",
                            "options": [
                                { "kind": "literal", "value": "small" },
                                { "kind": "literal", "value": "large" }
                            ]
                        },
                        "isNullable": true
                    },
                    {
                        "name": "onClick",
                        "propType": {
                            "kind": "fn",
                            "args": [{ "propType": { "kind": "event" }, "isNullable": false }],
                            "returnType": { "propType": { "kind": "void" }, "isNullable": false }
                        },
                        "isNullable": false
                    },
                    {
                        "name": "parent",
                        "propType": { "kind": "ref", "index": 0 },
                        "isNullable": true
                    }
                ]
            }]
        })
    );
}

#[test]
fn test_result_reads_back() {
    let text = serde_json::to_string(&sample()).unwrap();
    let parsed: FinderResult = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, sample());
}

#[test]
fn test_framework_kinds_and_anonymous_records() {
    let spec = ObjectSpec {
        name: None,
        members: vec![
            ObjectMember::new("children", PropSpec::new(PropType::ReactNode)),
            ObjectMember::new("icon", PropSpec::new(PropType::ReactElement)),
            ObjectMember::new("rest", PropSpec::new(PropType::partial(2))),
        ],
    };
    let value = serde_json::to_value(&spec).unwrap();
    assert_eq!(value["name"], json!(null));
    assert_eq!(value["members"][0]["propType"]["kind"], "reactNode");
    assert_eq!(value["members"][1]["propType"]["kind"], "reactElement");
    assert_eq!(
        value["members"][2]["propType"],
        json!({ "kind": "partial", "index": 2 })
    );
}

#[test]
fn test_literal_numbers_keep_integer_form() {
    let whole = serde_json::to_value(PropType::literal(3.0)).unwrap();
    assert_eq!(whole, json!({ "kind": "literal", "value": 3 }));
    let fraction = serde_json::to_value(PropType::literal(0.5)).unwrap();
    assert_eq!(fraction, json!({ "kind": "literal", "value": 0.5 }));

    let parsed: PropType = serde_json::from_value(json!({ "kind": "literal", "value": 3 })).unwrap();
    assert_eq!(parsed, PropType::Literal { value: LiteralValue::Number(3.0) });
    let parsed: PropType =
        serde_json::from_value(json!({ "kind": "literal", "value": true })).unwrap();
    assert_eq!(parsed, PropType::literal(true));
}

#[test]
fn test_void_is_never_nullable() {
    assert!(!PropSpec::with_nullable(PropType::Void, true).is_nullable);
    assert!(PropSpec::with_nullable(PropType::String, true).is_nullable);
}

#[test]
fn test_kind_matches_serialized_tag() {
    for prop_type in [
        PropType::Any,
        PropType::Boolean,
        PropType::array(PropType::Number),
        PropType::tuple(vec![PropType::String]),
        PropType::reference(1),
        PropType::function(Vec::new(), PropSpec::new(PropType::Void)),
        PropType::ReactElement,
    ] {
        let value = serde_json::to_value(&prop_type).unwrap();
        assert_eq!(value["kind"], prop_type.kind());
    }
}

#[test]
fn test_validate_accepts_self_reference() {
    assert_eq!(sample().validate(), Ok(()));
    assert_eq!(sample().props_of("Button").map(|s| s.members.len()), Some(4));
    assert!(sample().props_of("Missing").is_none());
}

#[test]
fn test_validate_reports_dangling_indices() {
    let mut result = sample();
    result.components[0].props_ref_index = 5;
    assert!(matches!(
        result.validate(),
        Err(SchemaError::DanglingRef { index: 5, len: 1, .. })
    ));

    let mut result = sample();
    result.refs[0].members.push(ObjectMember::new(
        "nested",
        PropSpec::new(PropType::array(PropType::union(vec![
            PropType::String,
            PropType::reference(3),
        ]))),
    ));
    assert!(matches!(
        result.validate(),
        Err(SchemaError::DanglingRef { index: 3, .. })
    ));
}
