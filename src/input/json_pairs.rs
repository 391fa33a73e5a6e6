//! JSON テキストからソース順にキーと値を取り出す
//!
//! `serde_json` は重複キーをまとめてしまうが、シード資産では後のリテラルが
//! 前を上書きする必要があるため tree-sitter の構文木から読む。

use serde::de::IgnoredAny;

use super::error::JsonInputError;
use crate::types::SourceRange;

/// ソース順の `"key": value` ペア
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPair {
    /// デコード済みのキー（平坦化時は親と連結）
    pub key: String,
    pub key_range: SourceRange,
    pub value: PairValue,
    pub value_range: SourceRange,
}

/// [`JsonPair`] の値
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairValue {
    /// デコード済みの文字列
    String(String),
    /// オブジェクト値の生テキスト（平坦化しない場合のみ）
    Object(String),
    /// その他の JSON 値（tree-sitter のノード種別）
    Other(String),
}

/// トップレベルの JSON オブジェクトのペアをソース順に集める
///
/// `separator` があればネストしたオブジェクトを平坦化する
/// （`{"login": {"title": "Login"}}` → `login.title`）。なければオブジェクト値は生のまま返す。
///
/// # Errors
/// - 無効な JSON
/// - トップレベルがオブジェクトではない
pub fn collect_pairs(
    json_text: &str,
    separator: Option<&str>,
) -> Result<Vec<JsonPair>, JsonInputError> {
    // tree-sitter は構文エラーから回復するので serde_json で先に検証する
    serde_json::from_str::<IgnoredAny>(json_text)?;

    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&tree_sitter_json::LANGUAGE.into())?;
    let tree = parser.parse(json_text, None).ok_or(JsonInputError::ParseFailed)?;

    let root_node = tree.root_node();
    let mut cursor = root_node.walk();
    let Some(top) = root_node.named_children(&mut cursor).find(|node| node.kind() != "comment")
    else {
        return Err(JsonInputError::NotAnObject("nothing".to_string()));
    };
    if top.kind() != "object" {
        return Err(JsonInputError::NotAnObject(top.kind().to_string()));
    }

    let mut pairs = Vec::new();
    extract_object(top, json_text.as_bytes(), separator, None, &mut pairs);
    Ok(pairs)
}

fn extract_object(
    node: tree_sitter::Node<'_>,
    source: &[u8],
    separator: Option<&str>,
    prefix: Option<&str>,
    pairs: &mut Vec<JsonPair>,
) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "pair" {
            extract_pair(child, source, separator, prefix, pairs);
        }
    }
}

fn extract_pair(
    node: tree_sitter::Node<'_>,
    source: &[u8],
    separator: Option<&str>,
    prefix: Option<&str>,
    pairs: &mut Vec<JsonPair>,
) {
    let Some(key_node) = node.child_by_field_name("key") else {
        return;
    };
    let Some(value_node) = node.child_by_field_name("value") else {
        return;
    };

    let Some(key) = decode_string(key_node, source) else {
        tracing::warn!("Failed to decode key text from node");
        return;
    };
    let full_key = match (prefix, separator) {
        (Some(p), Some(sep)) => format!("{p}{sep}{key}"),
        _ => key,
    };

    let value = match value_node.kind() {
        "object" if separator.is_some() => {
            extract_object(value_node, source, separator, Some(&full_key), pairs);
            return;
        }
        "object" => match value_node.utf8_text(source) {
            Ok(text) => PairValue::Object(text.to_string()),
            Err(_) => PairValue::Other("object".to_string()),
        },
        "string" => match decode_string(value_node, source) {
            Some(text) => PairValue::String(text),
            None => PairValue::Other("string".to_string()),
        },
        kind => PairValue::Other(kind.to_string()),
    };

    pairs.push(JsonPair {
        key: full_key,
        key_range: SourceRange::from_node(&key_node),
        value,
        value_range: SourceRange::from_node(&value_node),
    });
}

/// JSON 文字列ノードをデコードする（引用符とエスケープを処理）
fn decode_string(node: tree_sitter::Node<'_>, source: &[u8]) -> Option<String> {
    let text = node.utf8_text(source).ok()?;
    serde_json::from_str::<String>(text).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn keys_and_values(pairs: &[JsonPair]) -> Vec<(String, PairValue)> {
        pairs.iter().map(|pair| (pair.key.clone(), pair.value.clone())).collect()
    }

    fn string(text: &str) -> PairValue {
        PairValue::String(text.to_string())
    }

    #[rstest]
    fn test_pairs_keep_source_order_and_duplicates() {
        let json = r#"{
            "project.form.name": "Project Name",
            "common.buttons.create": "Create",
            "project.form.name": "Name"
        }"#;

        let pairs = collect_pairs(json, Some(".")).unwrap();

        assert_eq!(
            keys_and_values(&pairs),
            vec![
                ("project.form.name".to_string(), string("Project Name")),
                ("common.buttons.create".to_string(), string("Create")),
                ("project.form.name".to_string(), string("Name")),
            ]
        );
    }

    #[rstest]
    fn test_nested_objects_are_flattened() {
        let json = r#"{"login": {"title": "Login", "error": {"failed": "Login failed"}}}"#;

        let pairs = collect_pairs(json, Some(".")).unwrap();

        assert_eq!(
            keys_and_values(&pairs),
            vec![
                ("login.title".to_string(), string("Login")),
                ("login.error.failed".to_string(), string("Login failed")),
            ]
        );
    }

    #[rstest]
    fn test_custom_separator() {
        let json = r#"{"login": {"title": "Login"}}"#;

        let pairs = collect_pairs(json, Some(":")).unwrap();

        assert_that!(pairs[0].key, eq("login:title"));
    }

    #[rstest]
    fn test_objects_are_kept_raw_without_separator() {
        let json = r#"{"login.title": {"category": "login"}}"#;

        let pairs = collect_pairs(json, None).unwrap();

        assert_eq!(pairs[0].value, PairValue::Object(r#"{"category": "login"}"#.to_string()));
    }

    #[rstest]
    fn test_escapes_are_decoded() {
        let json = r#"{"msg.partial": "Failed:\n{count} \"items\"", "kéy": "한"}"#;

        let pairs = collect_pairs(json, Some(".")).unwrap();

        assert_eq!(pairs[0].value, string("Failed:\n{count} \"items\""));
        assert_that!(pairs[1].key, eq("kéy"));
        assert_eq!(pairs[1].value, string("한"));
    }

    #[rstest]
    #[case::number(r#"{"a": 1}"#, "number")]
    #[case::boolean(r#"{"a": true}"#, "true")]
    #[case::null(r#"{"a": null}"#, "null")]
    #[case::array(r#"{"a": ["x"]}"#, "array")]
    fn test_non_string_values(#[case] json: &str, #[case] kind: &str) {
        let pairs = collect_pairs(json, Some(".")).unwrap();

        assert_eq!(pairs[0].value, PairValue::Other(kind.to_string()));
    }

    #[rstest]
    fn test_ranges_point_at_key_and_value() {
        let json = "{\n  \"login.title\": \"Login\"\n}";

        let pairs = collect_pairs(json, Some(".")).unwrap();

        assert_that!(pairs[0].key_range.start.line, eq(1));
        assert_that!(pairs[0].key_range.start.character, eq(2));
        assert_that!(pairs[0].value_range.start.character, eq(17));
    }

    #[rstest]
    fn test_invalid_json_is_rejected() {
        let result = collect_pairs(r#"{"a": "b""#, Some("."));

        assert!(matches!(result, Err(JsonInputError::Syntax(_))));
    }

    #[rstest]
    #[case::array(r#"["a"]"#, "array")]
    #[case::string(r#""a""#, "string")]
    fn test_top_level_must_be_object(#[case] json: &str, #[case] found: &str) {
        let result = collect_pairs(json, Some("."));

        assert!(matches!(result, Err(JsonInputError::NotAnObject(kind)) if kind == found));
    }

    #[rstest]
    fn test_empty_object_has_no_pairs() {
        let pairs = collect_pairs("{}", Some(".")).unwrap();

        assert_that!(pairs, is_empty());
    }
}
