//! Strips formatting artifacts from free-text model responses.
//!
//! Models tend to wrap file content in markdown code fences despite being
//! told not to. This removes any backtick fence, with or without a
//! language tag, and trims the result. Removal only touches the fence
//! markers themselves, so applying it twice is a no-op.

use std::sync::LazyLock;

use regex::Regex;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[a-zA-Z]*").expect("invalid fence regex"));

/// Removes markdown code-fence markers and trims surrounding whitespace
#[must_use]
pub fn strip_code_fences(response: &str) -> String {
    FENCE_RE.replace_all(response, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fence_with_language_tag() {
        let input = "```python\nprint('hi')\n```";
        assert_eq!(strip_code_fences(input), "print('hi')");
    }

    #[test]
    fn test_strips_fence_without_language_tag() {
        let input = "```\nbody { color: red; }\n```";
        assert_eq!(strip_code_fences(input), "body { color: red; }");
    }

    #[test]
    fn test_strips_multiple_fences() {
        let input = "```html\n<p>a</p>\n```\nsome text\n```css\np { margin: 0; }\n```";
        let expected = "<p>a</p>\n\nsome text\n\np { margin: 0; }";
        assert_eq!(strip_code_fences(input), expected);
    }

    #[test]
    fn test_strips_nested_fences() {
        let input = "```markdown\nUse a fence:\n```js\nconsole.log(1)\n```\n```";
        let output = strip_code_fences(input);
        assert!(!output.contains("```"));
        assert!(output.contains("console.log(1)"));
    }

    #[test]
    fn test_untouched_content_is_only_trimmed() {
        let input = "  plain content, no fences \n";
        assert_eq!(strip_code_fences(input), "plain content, no fences");
    }

    #[test]
    fn test_is_idempotent() {
        let inputs = [
            "```python\nprint('hi')\n```",
            "```\na\n```\n```\nb\n```",
            "plain",
            "",
            "UNCHANGED",
        ];

        for input in inputs {
            let once = strip_code_fences(input);
            let twice = strip_code_fences(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }
}
