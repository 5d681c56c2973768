use crate::types::{FragmentPath, PathStep};
use crate::PathError;

/// Sentinel segment every fragment path is rooted at.
pub const ROOT: &str = "root";

/// Parse a fragment path such as `root.items[0].name` into typed steps.
///
/// - `""` and `"root"` are the document root.
/// - The `root` sentinel may be omitted: `items[0]` is the same as `root.items[0]`.
/// - `[<digits>]` is an array index; dotted segments are always member names.
/// - `["..."]` is a member name given as a JSON string literal.
///
/// # Example
///
/// ```
/// use json_stitch_path::{parse_fragment_path, PathStep};
///
/// assert!(parse_fragment_path("root").unwrap().is_empty());
/// assert_eq!(
///     parse_fragment_path("root.items[0].name").unwrap(),
///     vec![
///         PathStep::Key("items".into()),
///         PathStep::Index(0),
///         PathStep::Key("name".into()),
///     ]
/// );
/// assert!(parse_fragment_path("root.items[0").is_err());
/// ```
pub fn parse_fragment_path(path: &str) -> Result<FragmentPath, PathError> {
    let bytes = path.as_bytes();
    let mut steps = Vec::new();
    let mut pos = 0;

    if let Some(rest) = path.strip_prefix(ROOT) {
        if rest.is_empty() || rest.starts_with('.') || rest.starts_with('[') {
            pos = ROOT.len();
        }
    }

    // A bare leading member name (`items[0]`, `name`).
    if pos == 0 && !bytes.is_empty() && bytes[0] != b'.' && bytes[0] != b'[' {
        let end = scan_key(bytes, 0);
        steps.push(PathStep::Key(path[..end].to_string()));
        pos = end;
    }

    while pos < bytes.len() {
        match bytes[pos] {
            b'.' => {
                let start = pos + 1;
                let end = scan_key(bytes, start);
                if end == start {
                    return Err(PathError::EmptySegment(pos));
                }
                steps.push(PathStep::Key(path[start..end].to_string()));
                pos = end;
            }
            b'[' => {
                let (step, next) = parse_bracket(path, pos)?;
                steps.push(step);
                pos = next;
            }
            _ => {
                let ch = path[pos..].chars().next().unwrap_or_default();
                return Err(PathError::UnexpectedChar { pos, ch });
            }
        }
    }

    Ok(steps)
}

/// Returns the end of a dotted member name starting at `start`.
fn scan_key(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'.' || b == b'[')
        .map_or(bytes.len(), |offset| start + offset)
}

/// Parses `[<digits>]` or `["key"]` at `open`, returning the step and the
/// position just past the closing bracket.
fn parse_bracket(path: &str, open: usize) -> Result<(PathStep, usize), PathError> {
    let bytes = path.as_bytes();
    let start = open + 1;
    match bytes.get(start) {
        Some(b'"') => {
            let mut i = start + 1;
            let mut escaped = false;
            while i < bytes.len() {
                match bytes[i] {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => break,
                    _ => {}
                }
                i += 1;
            }
            if i >= bytes.len() {
                return Err(PathError::UnterminatedBracket(open));
            }
            let key: String =
                serde_json::from_str(&path[start..=i]).map_err(|_| PathError::InvalidKey(start))?;
            if bytes.get(i + 1) != Some(&b']') {
                return Err(PathError::UnterminatedBracket(open));
            }
            Ok((PathStep::Key(key), i + 2))
        }
        Some(b) if b.is_ascii_digit() => {
            let close = bytes[start..]
                .iter()
                .position(|&b| b == b']')
                .map(|offset| start + offset)
                .ok_or(PathError::UnterminatedBracket(open))?;
            let digits = &path[start..close];
            if !is_integer(digits) {
                return Err(PathError::InvalidIndex(start));
            }
            let index = digits.parse().map_err(|_| PathError::InvalidIndex(start))?;
            Ok((PathStep::Index(index), close + 1))
        }
        Some(_) => Err(PathError::InvalidIndex(start)),
        None => Err(PathError::UnterminatedBracket(open)),
    }
}

/// Format typed steps back into a fragment path.
///
/// Always starts with the `root` sentinel. Member names that would not survive
/// dotted notation are written as bracketed JSON strings.
///
/// # Example
///
/// ```
/// use json_stitch_path::{format_fragment_path, PathStep};
///
/// assert_eq!(format_fragment_path(&[]), "root");
/// assert_eq!(
///     format_fragment_path(&[PathStep::Key("items".into()), PathStep::Index(2)]),
///     "root.items[2]"
/// );
/// assert_eq!(format_fragment_path(&[PathStep::Key("a.b".into())]), "root[\"a.b\"]");
/// ```
pub fn format_fragment_path(path: &[PathStep]) -> String {
    let mut out = String::from(ROOT);
    for step in path {
        out.push_str(&step.to_string());
    }
    out
}

/// Whether a member name can be written in dotted form and parsed back unchanged.
pub fn is_plain_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(|c| matches!(c, '.' | '[' | ']' | '"'))
}

/// Check if a string consists only of ASCII digits.
pub fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> PathStep {
        PathStep::Key(k.to_string())
    }

    #[test]
    fn test_parse_root() {
        assert_eq!(parse_fragment_path("").unwrap(), Vec::<PathStep>::new());
        assert_eq!(parse_fragment_path("root").unwrap(), Vec::<PathStep>::new());
    }

    #[test]
    fn test_parse_members_and_indices() {
        assert_eq!(parse_fragment_path("root.name").unwrap(), vec![key("name")]);
        assert_eq!(
            parse_fragment_path("root.a.b.c").unwrap(),
            vec![key("a"), key("b"), key("c")]
        );
        assert_eq!(
            parse_fragment_path("root[1][2]").unwrap(),
            vec![PathStep::Index(1), PathStep::Index(2)]
        );
        assert_eq!(
            parse_fragment_path("root.items[10].tags[0]").unwrap(),
            vec![key("items"), PathStep::Index(10), key("tags"), PathStep::Index(0)]
        );
    }

    #[test]
    fn test_parse_without_sentinel() {
        assert_eq!(
            parse_fragment_path("items[0]").unwrap(),
            vec![key("items"), PathStep::Index(0)]
        );
        assert_eq!(parse_fragment_path("[3]").unwrap(), vec![PathStep::Index(3)]);
        assert_eq!(parse_fragment_path(".x").unwrap(), vec![key("x")]);
        // Only a whole `root` segment is the sentinel.
        assert_eq!(parse_fragment_path("rooted.x").unwrap(), vec![key("rooted"), key("x")]);
    }

    #[test]
    fn test_parse_sentinel_named_member() {
        assert_eq!(parse_fragment_path("root.root").unwrap(), vec![key("root")]);
    }

    #[test]
    fn test_parse_dotted_digits_are_keys() {
        assert_eq!(parse_fragment_path("root.0").unwrap(), vec![key("0")]);
    }

    #[test]
    fn test_parse_quoted_keys() {
        assert_eq!(parse_fragment_path("root[\"a.b\"]").unwrap(), vec![key("a.b")]);
        assert_eq!(
            parse_fragment_path(r#"root["say \"hi\""].x"#).unwrap(),
            vec![key("say \"hi\""), key("x")]
        );
        assert_eq!(parse_fragment_path(r#"root["a]b"]"#).unwrap(), vec![key("a]b")]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_fragment_path("root."), Err(PathError::EmptySegment(4)));
        assert_eq!(parse_fragment_path("root..a"), Err(PathError::EmptySegment(4)));
        assert_eq!(parse_fragment_path("root[0"), Err(PathError::UnterminatedBracket(4)));
        assert_eq!(parse_fragment_path("root["), Err(PathError::UnterminatedBracket(4)));
        assert_eq!(parse_fragment_path("root[-1]"), Err(PathError::InvalidIndex(5)));
        assert_eq!(parse_fragment_path("root[1a]"), Err(PathError::InvalidIndex(5)));
        assert_eq!(parse_fragment_path("root[\"x]"), Err(PathError::UnterminatedBracket(4)));
        assert_eq!(
            parse_fragment_path("root[0]x"),
            Err(PathError::UnexpectedChar { pos: 7, ch: 'x' })
        );
    }

    #[test]
    fn test_parse_index_overflow() {
        let path = format!("root[{}0]", usize::MAX);
        assert!(matches!(parse_fragment_path(&path), Err(PathError::InvalidIndex(_))));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_fragment_path(&[]), "root");
        assert_eq!(
            format_fragment_path(&[key("items"), PathStep::Index(0), key("name")]),
            "root.items[0].name"
        );
        assert_eq!(format_fragment_path(&[key("")]), "root[\"\"]");
    }

    #[test]
    fn test_roundtrip() {
        let paths = [
            "root",
            "root.a",
            "root.items[0].name",
            "root[0][1]",
            "root[\"a.b\"].c",
            "root[\"\"]",
            "root.0",
        ];
        for path in paths {
            let parsed = parse_fragment_path(path).unwrap();
            assert_eq!(format_fragment_path(&parsed), path, "Failed roundtrip for: {:?}", path);
        }
    }

    #[test]
    fn test_is_plain_key() {
        assert!(is_plain_key("name"));
        assert!(is_plain_key("0"));
        assert!(is_plain_key("with space"));
        assert!(!is_plain_key(""));
        assert!(!is_plain_key("a.b"));
        assert!(!is_plain_key("a[0]"));
    }
}
