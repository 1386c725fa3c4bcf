use crate::db::TypeGraph;
use crate::intern::TypeInterner;
use crate::snapshot::{GraphSnapshot, SnapshotError};
use crate::types::{DeclKind, TypeData, TypeId};
use serde_json::json;

fn load(value: serde_json::Value) -> Result<TypeInterner, SnapshotError> {
    let snapshot: GraphSnapshot = serde_json::from_value(value)?;
    TypeInterner::from_snapshot(&snapshot)
}

#[test]
fn test_lowers_component_file() {
    let interner = load(json!({
        "types": {
            "Component": {
                "kind": "object",
                "name": "Component",
                "symbol": { "name": "Component", "qualifiedName": "React.Component" },
                "typeParams": ["P"]
            },
            "P": { "kind": "typeParameter", "name": "P" },
            "Props": {
                "kind": "object",
                "name": "Props",
                "properties": [
                    { "name": "foo", "type": "string" },
                    { "name": "size", "type": "Size", "optional": true }
                ]
            },
            "Size": { "kind": "union", "members": ["Small", "Large"] },
            "Small": { "kind": "literal", "value": "small" },
            "Large": { "kind": "literal", "value": "large" },
            "ComponentOfProps": { "kind": "application", "base": "Component", "args": ["Props"] },
            "Button": {
                "kind": "object",
                "name": "Button",
                "bases": ["ComponentOfProps"]
            }
        },
        "declarations": {
            "Button": { "name": "Button", "kind": "class", "type": "Button" },
            "default": { "name": "default", "kind": "exportAlias", "target": "Button" }
        },
        "files": [{ "name": "Button.tsx", "exports": ["Button", "default"] }]
    }))
    .expect("valid snapshot");

    let files = interner.files();
    assert_eq!(files.len(), 1);
    let file = interner.file(files[0]).expect("file");
    assert_eq!(&*interner.resolve_atom(file.name), "Button.tsx");
    assert_eq!(file.exports.len(), 2);

    let button_decl = interner.declaration(file.exports[0]).expect("decl");
    assert!(button_decl.is_class());
    let alias = interner.declaration(file.exports[1]).expect("alias");
    assert_eq!(alias.kind, DeclKind::ExportAlias(file.exports[0]));

    let button = button_decl.type_id.expect("class type");
    let bases = interner.base_types(button);
    assert_eq!(bases.len(), 1);
    assert_eq!(
        interner.qualified_name(bases[0]).as_deref(),
        Some("React.Component")
    );
    let props = interner.type_arguments(bases[0])[0];
    assert_eq!(interner.type_name(props).as_deref(), Some("Props"));

    let members = interner.properties(props);
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].type_id, Some(TypeId::STRING));
    let size = members[1].type_id.expect("size type");
    assert!(interner.is_nullable(size));
    assert_eq!(
        interner.type_to_string(interner.non_nullable(size)),
        "\"small\" | \"large\""
    );
}

#[test]
fn test_self_referential_record() {
    let interner = load(json!({
        "types": {
            "Foo": {
                "kind": "object",
                "properties": [{ "name": "foo", "type": "Foo", "optional": true }],
                "alias": { "name": "Foo" }
            }
        }
    }))
    .expect("valid snapshot");

    let foo = TypeId(TypeId::FIRST_USER);
    assert!(matches!(interner.lookup(foo), Some(TypeData::Object(_))));
    let members = interner.properties(foo);
    assert_eq!(
        members[0].type_id,
        Some(interner.union2(foo, TypeId::UNDEFINED))
    );
    assert_eq!(interner.type_name(foo).as_deref(), Some("Foo"));
}

#[test]
fn test_forward_references_between_structural_types() {
    let interner = load(json!({
        "types": {
            "List": { "kind": "array", "element": "Pair" },
            "Pair": { "kind": "tuple", "elements": ["string", "Flag"] },
            "Flag": { "kind": "literal", "value": true }
        }
    }))
    .expect("valid snapshot");

    let pair = interner.tuple(vec![TypeId::STRING, interner.literal_boolean(true)]);
    assert!(interner.lookup(interner.array(pair)).is_some());
    assert_eq!(interner.type_to_string(interner.array(pair)), "[string, true][]");
}

#[test]
fn test_function_types() {
    let interner = load(json!({
        "types": {
            "OnChange": {
                "kind": "function",
                "params": [
                    { "name": "value", "type": "string" },
                    { "name": "index", "type": "number", "optional": true }
                ],
                "returns": "void"
            }
        }
    }))
    .expect("valid snapshot");

    let callback = TypeId(TypeId::FIRST_USER);
    let signature = interner.signature(callback).expect("signature");
    assert_eq!(signature.params.len(), 2);
    assert_eq!(signature.return_type, TypeId::VOID);
    assert_eq!(
        interner.type_to_string(callback),
        "(value: string, index?: number) => void"
    );
}

#[test]
fn test_dangling_type_reference_is_rejected() {
    let err = load(json!({
        "types": {
            "Props": {
                "kind": "object",
                "properties": [{ "name": "x", "type": "Missing" }]
            }
        }
    }))
    .err()
    .expect("dangling reference");
    assert!(matches!(
        err,
        SnapshotError::DanglingType { ref to, .. } if to == "Missing"
    ));
}

#[test]
fn test_structural_cycle_is_rejected() {
    let err = load(json!({
        "types": {
            "A": { "kind": "array", "element": "B" },
            "B": { "kind": "union", "members": ["A", "string"] }
        }
    }))
    .err()
    .expect("cycle");
    assert!(matches!(err, SnapshotError::StructuralCycle(_)));
}

#[test]
fn test_keyword_ids_are_reserved() {
    let err = load(json!({
        "types": { "string": { "kind": "literal", "value": "s" } }
    }))
    .err()
    .expect("reserved id");
    assert!(matches!(err, SnapshotError::ReservedId(ref id) if id == "string"));
}

#[test]
fn test_export_alias_needs_known_target() {
    let missing_target = load(json!({
        "declarations": { "default": { "name": "default", "kind": "exportAlias" } }
    }))
    .err()
    .expect("no target");
    assert!(matches!(missing_target, SnapshotError::MissingAliasTarget(_)));

    let dangling = load(json!({
        "declarations": {
            "default": { "name": "default", "kind": "exportAlias", "target": "Nope" }
        }
    }))
    .err()
    .expect("dangling target");
    assert!(matches!(dangling, SnapshotError::DanglingDeclaration { .. }));
}

#[test]
fn test_unknown_export_is_rejected() {
    let err = load(json!({
        "files": [{ "name": "a.tsx", "exports": ["Ghost"] }]
    }))
    .err()
    .expect("unknown export");
    assert!(matches!(err, SnapshotError::DanglingDeclaration { .. }));
}

#[test]
fn test_from_json_reports_syntax_errors() {
    assert!(matches!(
        GraphSnapshot::from_json("{ not json"),
        Err(SnapshotError::Json(_))
    ));
}
