//! Content-type detection.
//!
//! A language hint naming a known programming language wins outright; without
//! one, the combined text is scored against code-syntax patterns, then
//! document markers, falling back to generic.

use std::sync::LazyLock;

use regex::Regex;

use super::types::ContentType;

/// Languages that force `Code` when named in the request options.
const KNOWN_LANGUAGES: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "rust",
    "go",
    "java",
    "c",
    "cpp",
    "c++",
    "csharp",
    "c#",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "scala",
    "haskell",
    "lua",
    "perl",
    "shell",
    "bash",
    "sql",
];

/// Minimum code-pattern hits for a `Code` classification.
const CODE_SCORE_THRESHOLD: usize = 3;

/// Minimum document-marker hits for a `Document` classification.
const DOC_SCORE_THRESHOLD: usize = 2;

static CODE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Function definitions across mainstream syntaxes.
        r"\bfunction\s+\w+|\bfn\s+\w+|\bdef\s+\w+",
        // Type definitions.
        r"\bclass\s+\w+|\bstruct\s+\w+|\binterface\s+\w+|\benum\s+\w+",
        // Control flow keywords.
        r"\b(if|else|for|while|switch|match|return)\b",
        // Variable declarations.
        r"\b(let|const|var)\s+\w+",
        // Block braces.
        r"[{}]",
        // Statement terminators at line ends.
        r"(?m);\s*$",
        // Line or block comments.
        r"//|/\*|(?m)^\s*#(?:\s|!)",
        // Arrows and path separators.
        r"=>|->|::",
        // Imports.
        r"\b(import|include|require|use)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static code pattern must compile"))
    .collect()
});

static DOC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Markdown headings.
        r"(?m)^#{1,6}\s+\S",
        // Bullet or numbered lists.
        r"(?m)^\s*(?:[-*+]|\d+\.)\s+\S",
        // Fenced code blocks.
        r"```",
        // Bold/italic emphasis.
        r"\*\*[^*\n]+\*\*|__[^_\n]+__",
        // Inline links.
        r"\[[^\]\n]+\]\([^)\n]+\)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static document pattern must compile"))
    .collect()
});

/// Returns `true` if `language` names a programming language we recognize.
pub fn is_known_language(language: &str) -> bool {
    let lowered = language.to_ascii_lowercase();
    KNOWN_LANGUAGES.contains(&lowered.as_str())
}

/// Number of code-syntax patterns matching `content`.
pub fn code_pattern_score(content: &str) -> usize {
    CODE_PATTERNS
        .iter()
        .filter(|pattern| pattern.is_match(content))
        .count()
}

/// Number of document-marker patterns matching `content`.
pub fn document_pattern_score(content: &str) -> usize {
    DOC_PATTERNS
        .iter()
        .filter(|pattern| pattern.is_match(content))
        .count()
}

/// Classifies combined content, honoring an optional language hint.
pub fn detect_content_type(combined: &str, language: Option<&str>) -> ContentType {
    if let Some(language) = language {
        if is_known_language(language) {
            return ContentType::Code;
        }
    }

    if code_pattern_score(combined) >= CODE_SCORE_THRESHOLD {
        return ContentType::Code;
    }

    if document_pattern_score(combined) >= DOC_SCORE_THRESHOLD {
        return ContentType::Document;
    }

    ContentType::Generic
}
