/*!
 * Line wrapping for translated Markdown.
 *
 * Prose lines are wrapped to a target width. Structure-bearing lines are
 * exempt: blank lines, headings, table rows, code fence delimiters and
 * everything inside a code fence. Words are never broken, so a single word
 * longer than the width stays on its own overlong line.
 */

/// Wrap Markdown content to the given line width.
pub fn wrap_markdown_lines(content: &str, width: usize) -> String {
    let mut wrapped = Vec::new();
    let mut in_code_fence = false;

    for line in content.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") {
            in_code_fence = !in_code_fence;
            wrapped.push(line.to_string());
            continue;
        }

        if in_code_fence || is_exempt(line, width) {
            wrapped.push(line.to_string());
        } else {
            wrapped.push(fill(line, width));
        }
    }

    let mut out = wrapped.join("\n");
    if content.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Lines that are never wrapped regardless of length.
fn is_exempt(line: &str, width: usize) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with('|')
        || line.chars().count() <= width
}

/// Greedy word fill. Whitespace between words collapses to single spaces,
/// which is harmless in Markdown prose.
fn fill(line: &str, width: usize) -> String {
    let mut out = String::new();
    let mut current_len = 0usize;

    for word in line.split_whitespace() {
        let word_len = word.chars().count();
        if current_len == 0 {
            out.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            out.push(' ');
            out.push_str(word);
            current_len += 1 + word_len;
        } else {
            out.push('\n');
            out.push_str(word);
            current_len = word_len;
        }
    }

    out
}
