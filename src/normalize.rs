// src/normalize.rs

/// Strip generic type arguments and turn tabs into spaces.
///
/// Characters are copied only while outside of any `<...>` span, so nested
/// arguments disappear together with their brackets. An unbalanced `<` drops
/// the rest of the text; a stray `>` is kept and suspends copying until a
/// later `<` brings the depth back to zero.
pub fn normalize(raw_text: &str) -> String {
    let mut out = String::with_capacity(raw_text.len());
    let mut depth: i32 = 0;

    for c in raw_text.chars() {
        if c == '<' {
            depth += 1;
        }
        let c = if c == '\t' { ' ' } else { c };
        if depth == 0 {
            out.push(c);
        }
        if c == '>' {
            depth -= 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_generics() {
        assert_eq!(
            normalize("Extract Method foo() extracted from bar() in class X<T>"),
            "Extract Method foo() extracted from bar() in class X"
        );
        assert_eq!(
            normalize("Rename Method get(Map<String, List<Integer>>) renamed to fetch(Map) in class a.B"),
            "Rename Method get(Map) renamed to fetch(Map) in class a.B"
        );
    }

    #[test]
    fn test_tabs_become_spaces() {
        assert_eq!(normalize("Move Class\ta.B moved to\tc.B"), "Move Class a.B moved to c.B");
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert_eq!(normalize("Inline Method f(List<T) inlined"), "Inline Method f(List");
        assert_eq!(normalize("a -> b"), "a ->");
        assert_eq!(normalize("x>y<z"), "x><z");
        assert_eq!(normalize("x><z"), "x><z");
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "Pull Up Method m() from class a.B to m() from class a.C";
        assert_eq!(normalize(text), text);
        assert_eq!(normalize(""), "");
    }
}
