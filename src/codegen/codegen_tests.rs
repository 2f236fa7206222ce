#![allow(non_snake_case)]

use super::*;
use crate::config::GeneratorConfig;
use test_case::test_case;

fn render_schema(src: &str) -> String {
    let config = GeneratorConfig {
        core_includes: vec!["core.hpp".into()],
        ..GeneratorConfig::default()
    };
    crate::generate_source(src, &config).unwrap()
}

fn has_line(out: &str, expected: &str) -> bool {
    out.lines().any(|line| line == expected)
}

#[test_case("idx_t", "idx_t" ; "scalar unchanged")]
#[test_case("ParsedExpression*", "unique_ptr<ParsedExpression>" ; "owning pointer")]
#[test_case("vector<ParsedExpression*>", "vector<unique_ptr<ParsedExpression>>" ; "nested pointer")]
#[test_case("unordered_map<string, Expr*>", "unordered_map<string, unique_ptr<Expr>>" ; "map value pointer")]
#[test_case("duckdb::TableRef *", "unique_ptr<duckdb::TableRef>" ; "qualified pointer with space")]
#[test_case("shared_ptr<ExtraTypeInfo>", "shared_ptr<ExtraTypeInfo>" ; "shared pointer unchanged")]
fn spell_type___spells_owning_pointers(raw: &str, expected: &str) {
    assert_eq!(spell_type(raw), expected);
}

#[test]
fn render___small_hierarchy___exact_text() {
    let out = render_schema(
        r#"[
        {"class": "Base", "class_type": "type",
         "members": [{"name": "type", "type": "BaseType"}, {"name": "alias", "type": "string"}]},
        {"class": "Child", "base": "Base", "enum": "CHILD", "constructor": ["child"],
         "members": [{"name": "child", "type": "ParsedExpression*"}, {"name": "count", "type": "idx_t"}]}
    ]"#,
    );

    let expected = [
        RULE,
        "// This file is automatically generated by serialgen",
        "// Do not edit this file manually, your changes will be overwritten",
        RULE,
        "",
        "#include \"core.hpp\"",
        "",
        "namespace duckdb {",
        "",
        "void Base::FormatSerialize(FormatSerializer &serializer) const {",
        "\tserializer.WriteProperty(\"type\", type);",
        "\tserializer.WriteProperty(\"alias\", alias);",
        "}",
        "",
        "unique_ptr<Base> Base::FormatDeserialize(FormatDeserializer &deserializer) {",
        "\tauto type = deserializer.ReadProperty<BaseType>(\"type\");",
        "\tauto alias = deserializer.ReadProperty<string>(\"alias\");",
        "\tunique_ptr<Base> result;",
        "\tswitch (type) {",
        "\tcase BaseType::CHILD:",
        "\t\tresult = Child::FormatDeserialize(deserializer);",
        "\t\tbreak;",
        "\tdefault:",
        "\t\tthrow SerializationException(\"Unsupported type for deserialization of Base!\");",
        "\t}",
        "\tresult->alias = std::move(alias);",
        "\treturn result;",
        "}",
        "",
        "void Child::FormatSerialize(FormatSerializer &serializer) const {",
        "\tBase::FormatSerialize(serializer);",
        "\tserializer.WriteProperty(\"child\", *child);",
        "\tserializer.WriteProperty(\"count\", count);",
        "}",
        "",
        "unique_ptr<Base> Child::FormatDeserialize(FormatDeserializer &deserializer) {",
        "\tauto child = deserializer.ReadProperty<unique_ptr<ParsedExpression>>(\"child\");",
        "\tauto count = deserializer.ReadProperty<idx_t>(\"count\");",
        "\tauto result = duckdb::unique_ptr<Child>(new Child(std::move(child)));",
        "\tresult->count = count;",
        "\treturn std::move(result);",
        "}",
        "",
        "} // namespace duckdb",
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect::<String>();

    assert_eq!(out, expected);
}

#[test]
fn render___optional_and_upcast_members___use_matching_calls() {
    let out = render_schema(
        r#"[{"class": "SubqueryRef", "members": [
            {"name": "filter", "type": "ParsedExpression*", "optional": true},
            {"name": "subquery", "type": "SelectStatement*", "base": "SQLStatement", "property": "node"}
        ]}]"#,
    );

    assert!(has_line(&out, "\tserializer.WriteOptionalProperty(\"filter\", filter);"));
    assert!(has_line(
        &out,
        "\tauto filter = deserializer.ReadOptionalProperty<unique_ptr<ParsedExpression>>(\"filter\");"
    ));
    assert!(has_line(&out, "\tserializer.WriteProperty(\"node\", (SQLStatement &)*subquery);"));
    assert!(has_line(
        &out,
        "\tauto subquery = unique_ptr_cast<SQLStatement, SelectStatement>(deserializer.ReadProperty<unique_ptr<SQLStatement>>(\"node\"));"
    ));
}

#[test]
fn render___extra_parameters___precede_deserializer_and_are_forwarded() {
    let out = render_schema(
        r#"[
        {"class": "TableRef", "class_type": "type", "extra_parameters": ["context"],
         "members": [{"name": "type", "type": "TableReferenceType"}, {"name": "context", "type": "ClientContext&"}]},
        {"class": "SubqueryRef", "base": "TableRef", "enum": "SUBQUERY",
         "members": [{"name": "limit", "type": "idx_t"}]}
    ]"#,
    );

    assert!(has_line(
        &out,
        "unique_ptr<TableRef> SubqueryRef::FormatDeserialize(ClientContext& context, FormatDeserializer &deserializer) {"
    ));
    assert!(has_line(&out, "\t\tresult = SubqueryRef::FormatDeserialize(context, deserializer);"));
    assert!(has_line(&out, "\tauto result = duckdb::unique_ptr<SubqueryRef>(new SubqueryRef(context));"));
}

#[test]
fn render___custom_dispatch_body___spliced_line_by_line_before_break() {
    let out = render_schema(
        r#"[
        {"class": "Base", "class_type": "type", "members": [{"name": "type", "type": "BaseType"}]},
        {"class": "Empty", "base": "Base", "enum": "EMPTY",
         "custom_switch_code": "result = Empty::Create();\nresult->flag = true;"}
    ]"#,
    );

    let lines = out.lines().collect::<Vec<_>>();
    let at = lines.iter().position(|l| *l == "\tcase BaseType::EMPTY:").unwrap();
    assert_eq!(
        &lines[at + 1..at + 4],
        &["\t\tresult = Empty::Create();", "\t\tresult->flag = true;", "\t\tbreak;"]
    );
}

#[test]
fn render___by_value_root___plain_declaration_and_return() {
    let out = render_schema(
        r#"[{"class": "BoundOrderByNode", "pointer_type": "value", "constructor": ["type"],
             "members": [{"name": "type", "type": "OrderType"}, {"name": "name", "type": "string"}]}]"#,
    );

    assert!(has_line(
        &out,
        "BoundOrderByNode BoundOrderByNode::FormatDeserialize(FormatDeserializer &deserializer) {"
    ));
    assert!(has_line(&out, "\tBoundOrderByNode result(type);"));
    assert!(has_line(&out, "\tresult.name = std::move(name);"));
    assert!(has_line(&out, "\treturn result;"));
}

#[test]
fn render___same_schema___byte_identical() {
    let src = r#"[{"class": "A", "members": [{"name": "x", "type": "idx_t"}]}]"#;

    assert_eq!(render_schema(src), render_schema(src));
}
