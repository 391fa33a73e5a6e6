//! プロジェクト全体で使う基本型

use std::fmt;

use serde::Serialize;

/// シード資産内の範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SourceRange {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

/// シード資産内の位置（0 始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize)]
pub struct SourcePosition {
    pub line: u32,
    pub character: u32,
}

impl From<tree_sitter::Point> for SourcePosition {
    #[allow(clippy::cast_possible_truncation)]
    fn from(point: tree_sitter::Point) -> Self {
        Self { line: point.row as u32, character: point.column as u32 }
    }
}

/// エディタやコンパイラと同じく 1 始まりで表示する
impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

impl SourceRange {
    #[must_use]
    pub fn from_node(node: &tree_sitter::Node<'_>) -> Self {
        Self { start: node.start_position().into(), end: node.end_position().into() }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    const fn pos(line: u32, character: u32) -> SourcePosition {
        SourcePosition { line, character }
    }

    #[rstest]
    #[case::origin(pos(0, 0), "1:1")]
    #[case::later(pos(41, 2), "42:3")]
    fn test_display_is_one_indexed(#[case] position: SourcePosition, #[case] expected: &str) {
        assert_that!(position.to_string(), eq(expected));
    }
}
