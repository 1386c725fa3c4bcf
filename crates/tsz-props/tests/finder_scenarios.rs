//! End-to-end extraction over small component files.

use serde_json::json;
use tsz_props::{
    ExtractError, ExtractOptions, FinderResult, KnownSymbol, KnownSymbols, ObjectMember, PropSpec,
    PropType, PropsFinder,
};
use tsz_typegraph::{
    DeclId, DeclKind, FileId, GraphSnapshot, PropertyInfo, SourceLocation, TypeId, TypeInterner,
};

struct ReactLib {
    component: TypeId,
    pure_component: TypeId,
    mouse_event: TypeId,
    react_node: TypeId,
}

fn react(interner: &TypeInterner) -> ReactLib {
    let marker = |name: &str| {
        let p = interner.type_param("P", None);
        let symbol = interner.symbol(name, &format!("React.{name}"));
        let ty = interner.declare_object(Some(name), Some(symbol));
        interner.set_type_params(ty, vec![p]);
        ty
    };
    let component = marker("Component");
    let pure_component = marker("PureComponent");

    let target = interner.intern_string("target");
    let mouse_event = interner.named_object(
        "MouseEvent",
        Some(interner.symbol("MouseEvent", "React.MouseEvent")),
        vec![PropertyInfo::new(target, TypeId::ANY)],
    );

    let element = interner.named_object(
        "ReactElement",
        Some(interner.symbol("ReactElement", "React.ReactElement")),
        Vec::new(),
    );
    let react_node = interner.union(vec![
        element,
        TypeId::STRING,
        TypeId::NUMBER,
        TypeId::NULL,
        TypeId::UNDEFINED,
    ]);
    interner.set_alias_symbol(
        react_node,
        interner.symbol("ReactNode", "React.ReactNode"),
    );

    ReactLib {
        component,
        pure_component,
        mouse_event,
        react_node,
    }
}

fn component_class(interner: &TypeInterner, name: &str, base: TypeId) -> DeclId {
    let ty = interner.declare_object(Some(name), Some(interner.symbol(name, name)));
    interner.set_bases(ty, vec![base]);
    interner.declare(
        name,
        DeclKind::Class,
        Some(ty),
        Some(SourceLocation::new(format!("{name}.tsx"), 3, 1)),
    )
}

#[test]
fn test_single_component_with_string_prop() {
    let interner = TypeInterner::new();
    let lib = react(&interner);
    let foo = interner.intern_string("foo");
    let props = interner.named_object("Props", None, vec![PropertyInfo::new(foo, TypeId::STRING)]);
    let decl = component_class(
        &interner,
        "Button",
        interner.application(lib.component, vec![props]),
    );
    let file = interner.add_file("Button.tsx", vec![decl]);

    let result = PropsFinder::new(&interner).find_in_file(file).unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "components": [{ "name": "Button", "propsRefIndex": 0 }],
            "refs": [{
                "name": "Props",
                "members": [
                    { "name": "foo", "propType": { "kind": "string" }, "isNullable": false }
                ]
            }]
        })
    );
}

#[test]
fn test_sibling_components_share_props_entry() {
    let interner = TypeInterner::new();
    let lib = react(&interner);
    let label = interner.intern_string("label");
    let props = interner.named_object("Props", None, vec![PropertyInfo::new(label, TypeId::STRING)]);
    let a = component_class(
        &interner,
        "Primary",
        interner.application(lib.component, vec![props]),
    );
    let b = component_class(
        &interner,
        "Secondary",
        interner.application(lib.pure_component, vec![props]),
    );

    let result = PropsFinder::new(&interner).find(&[a, b]).unwrap();
    assert_eq!(result.components.len(), 2);
    assert_eq!(result.refs.len(), 1);
    assert!(result.components.iter().all(|c| c.props_ref_index == 0));
}

#[test]
fn test_marker_found_through_two_levels_of_inheritance() {
    let interner = TypeInterner::new();
    let lib = react(&interner);

    // class Themed<P> extends React.Component<P>
    let p = interner.type_param("P", None);
    let themed = interner.declare_object(Some("Themed"), Some(interner.symbol("Themed", "Themed")));
    interner.set_type_params(themed, vec![p]);
    interner.set_bases(themed, vec![interner.application(lib.component, vec![p])]);

    // class Card extends Themed<CardProps>
    let title = interner.intern_string("title");
    let card_props =
        interner.named_object("CardProps", None, vec![PropertyInfo::new(title, TypeId::STRING)]);
    let card = component_class(
        &interner,
        "Card",
        interner.application(themed, vec![card_props]),
    );

    let result = PropsFinder::new(&interner).find(&[card]).unwrap();
    assert_eq!(result.components.len(), 1);
    assert_eq!(result.components[0].name, "Card");
    assert_eq!(
        result.props_of("Card").and_then(|p| p.name.as_deref()),
        Some("CardProps")
    );
}

#[test]
fn test_non_components_contribute_nothing() {
    let interner = TypeInterner::new();
    let lib = react(&interner);
    let plain = interner.declare_object(Some("Store"), None);
    let store = interner.declare("Store", DeclKind::Class, Some(plain), None);
    let props_alias = interner.declare("Props", DeclKind::TypeAlias, Some(lib.mouse_event), None);
    // Marker base without a props argument.
    let bare = component_class(&interner, "Bare", lib.component);

    let result = PropsFinder::new(&interner)
        .find(&[store, props_alias, bare])
        .unwrap();
    assert_eq!(result, FinderResult::default());
}

#[test]
fn test_framework_types_and_nullability() {
    let interner = TypeInterner::new();
    let lib = react(&interner);
    let on_click = interner.intern_string("onClick");
    let children = interner.intern_string("children");
    let size = interner.intern_string("size");
    let event = interner.intern_string("event");

    let handler = interner.function_of(
        vec![tsz_typegraph::ParamInfo::new(event, lib.mouse_event)],
        TypeId::VOID,
    );
    let props = interner.named_object(
        "Props",
        None,
        vec![
            PropertyInfo::opt(on_click, handler),
            PropertyInfo::new(children, lib.react_node),
            PropertyInfo::opt(
                size,
                interner.union(vec![
                    interner.literal_string("small"),
                    interner.literal_string("large"),
                    TypeId::NUMBER,
                ]),
            ),
        ],
    );
    let decl = component_class(
        &interner,
        "Button",
        interner.application(lib.component, vec![props]),
    );

    let result = PropsFinder::new(&interner).find(&[decl]).unwrap();
    assert_eq!(result.refs.len(), 1);
    assert_eq!(
        result.refs[0].members,
        vec![
            ObjectMember::new(
                "onClick",
                PropSpec::with_nullable(
                    PropType::function(
                        vec![PropSpec::new(PropType::Event)],
                        PropSpec::new(PropType::Void),
                    ),
                    true,
                ),
            ),
            ObjectMember::new(
                "children",
                PropSpec::with_nullable(PropType::ReactNode, true),
            ),
            ObjectMember::new(
                "size",
                PropSpec::with_nullable(
                    PropType::union(vec![
                        PropType::literal("small"),
                        PropType::literal("large"),
                        PropType::Number,
                    ]),
                    true,
                ),
            ),
        ]
    );
}

#[test]
fn test_batch_pass_dedupes_across_files() {
    let interner = TypeInterner::new();
    let lib = react(&interner);
    let shared = interner.named_object("Shared", None, Vec::new());
    let a = component_class(
        &interner,
        "A",
        interner.application(lib.component, vec![shared]),
    );
    let b = component_class(
        &interner,
        "B",
        interner.application(lib.component, vec![shared]),
    );
    let file_a = interner.add_file("A.tsx", vec![a]);
    let file_b = interner.add_file("B.tsx", vec![b]);

    let finder = PropsFinder::new(&interner);
    let batch = finder.find_in_files(&[file_a, file_b]).unwrap();
    assert_eq!(batch.components.len(), 2);
    assert_eq!(batch.refs.len(), 1);

    // Separate passes each get their own table.
    assert_eq!(finder.find_in_file(file_a).unwrap().refs.len(), 1);
    assert_eq!(finder.find_in_file(file_b).unwrap().refs.len(), 1);

    assert!(matches!(
        finder.find_in_file(FileId(9)),
        Err(ExtractError::UnknownFile { id: 9 })
    ));
}

#[test]
fn test_strict_pass_fails_entirely() {
    let interner = TypeInterner::new();
    let lib = react(&interner);
    let ok = interner.intern_string("ok");
    let bad = interner.intern_string("bad");
    let props = interner.named_object(
        "Props",
        None,
        vec![
            PropertyInfo::new(ok, TypeId::STRING),
            PropertyInfo::new(bad, TypeId::SYMBOL),
        ],
    );
    let decl = component_class(
        &interner,
        "Widget",
        interner.application(lib.component, vec![props]),
    );

    let err = PropsFinder::with_options(&interner, ExtractOptions::strict())
        .find(&[decl])
        .unwrap_err();
    assert!(matches!(err, ExtractError::Unclassifiable { .. }));
    assert!(err.to_string().contains("symbol"), "{err}");

    let lenient = PropsFinder::new(&interner).find(&[decl]).unwrap();
    assert_eq!(lenient.refs[0].members[1].prop_type, PropType::Any);
}

#[test]
fn test_configured_known_symbols_are_honoured() {
    let interner = TypeInterner::new();
    let lib = react(&interner);
    let icon = interner.intern_string("icon");
    let svg = interner.named_object(
        "IconElement",
        Some(interner.symbol("IconElement", "icons.IconElement")),
        Vec::new(),
    );
    let props = interner.named_object("Props", None, vec![PropertyInfo::new(icon, svg)]);
    let decl = component_class(
        &interner,
        "Toolbar",
        interner.application(lib.component, vec![props]),
    );

    let options = ExtractOptions::default().with_known_symbols(KnownSymbols::with_extra([(
        "icons.IconElement",
        KnownSymbol::ReactElement,
    )]));
    let result = PropsFinder::with_options(&interner, options)
        .find(&[decl])
        .unwrap();
    assert_eq!(result.refs.len(), 1);
    assert_eq!(result.refs[0].members[0].prop_type, PropType::ReactElement);
}

#[test]
fn test_snapshot_round_through_finder() {
    let snapshot: GraphSnapshot = serde_json::from_value(json!({
        "types": {
            "Component": {
                "kind": "object",
                "name": "Component",
                "symbol": { "name": "Component", "qualifiedName": "React.Component" },
                "typeParams": ["P"]
            },
            "P": { "kind": "typeParameter", "name": "P" },
            "TreeProps": {
                "kind": "object",
                "properties": [
                    { "name": "label", "type": "string" },
                    { "name": "children", "type": "TreeList", "optional": true },
                    { "name": "pair", "type": "Pair" }
                ],
                "alias": { "name": "TreeProps" }
            },
            "TreeList": { "kind": "array", "element": "TreeProps" },
            "Pair": { "kind": "tuple", "elements": ["string", "boolean"] },
            "Base": { "kind": "application", "base": "Component", "args": ["TreeProps"] },
            "Tree": { "kind": "object", "name": "Tree", "bases": ["Base"] }
        },
        "declarations": {
            "Tree": { "name": "Tree", "kind": "class", "type": "Tree" },
            "default": { "name": "default", "kind": "exportAlias", "target": "Tree" }
        },
        "files": [{ "name": "Tree.tsx", "exports": ["default"] }]
    }))
    .unwrap();
    let interner = TypeInterner::from_snapshot(&snapshot).unwrap();

    let file = interner.files()[0];
    let result = PropsFinder::new(&interner).find_in_file(file).unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "components": [{ "name": "Tree", "propsRefIndex": 0 }],
            "refs": [{
                "name": "TreeProps",
                "members": [
                    { "name": "label", "propType": { "kind": "string" }, "isNullable": false },
                    {
                        "name": "children",
                        "propType": { "kind": "array", "element": { "kind": "ref", "index": 0 } },
                        "isNullable": true
                    },
                    {
                        "name": "pair",
                        "propType": {
                            "kind": "tuple",
                            "elements": [{ "kind": "string" }, { "kind": "boolean" }]
                        },
                        "isNullable": false
                    }
                ]
            }]
        })
    );
}
