//! Pulls the JSON body out of model text.
//!
//! JSON-mode responses are usually bare, but some arrive fenced in markdown or
//! with a sentence in front.

/// Extract the first JSON array or object from `response`.
pub(crate) fn extract_json(response: &str) -> Option<String> {
    if let Some(fenced) = extract_from_code_block(response) {
        return Some(fenced);
    }

    let bracket = response.find('[');
    let brace = response.find('{');
    match (bracket, brace) {
        (Some(b), Some(c)) if b < c => extract_balanced(response, '[', ']')
            .or_else(|| extract_balanced(response, '{', '}')),
        (Some(_), None) => extract_balanced(response, '[', ']'),
        _ => extract_balanced(response, '{', '}')
            .or_else(|| extract_balanced(response, '[', ']')),
    }
}

fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")? + 3;
    // Skip an optional language tag on the fence line.
    let body_start = response[start..]
        .find('\n')
        .map(|n| start + n + 1)
        .unwrap_or(start);
    let body = match response[body_start..].find("```") {
        Some(end) => &response[body_start..body_start + end],
        None => &response[body_start..],
    };
    let body = body.trim();
    (!body.is_empty()).then(|| body.to_string())
}

fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + c.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array_passes_through() {
        let text = r#"["a", "b"]"#;
        assert_eq!(extract_json(text).as_deref(), Some(text));
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let text = "Sure!\n```json\n{\"caption\": \"x\"}\n```\nEnjoy.";
        assert_eq!(extract_json(text).as_deref(), Some("{\"caption\": \"x\"}"));
    }

    #[test]
    fn brackets_inside_strings_do_not_close_early() {
        let text = r#"Scenes: ["The Protagonist says (Don: \"[hola]\")", "b"] done"#;
        assert_eq!(
            extract_json(text).as_deref(),
            Some(r#"["The Protagonist says (Don: \"[hola]\")", "b"]"#)
        );
    }

    #[test]
    fn no_json_yields_none() {
        assert!(extract_json("I cannot help with that.").is_none());
    }
}
