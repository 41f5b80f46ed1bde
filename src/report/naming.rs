use crate::outcome::TestIdentity;

pub const ERROR_FILE_SUFFIX: &str = ".err.json";
pub const MESSAGES_FILE_SUFFIX: &str = ".err.messages.txt";

/// Report file name for a test: `<query_set>_<query_id>.err.json`.
pub fn error_file_name(identity: &TestIdentity) -> String {
    format!("{}{}", stem(identity), ERROR_FILE_SUFFIX)
}

/// Consolidated failure-message file name for a test.
pub fn messages_file_name(identity: &TestIdentity) -> String {
    format!("{}{}", stem(identity), MESSAGES_FILE_SUFFIX)
}

fn stem(identity: &TestIdentity) -> String {
    format!(
        "{}_{}",
        file_safe(&identity.query_set_id),
        file_safe(&identity.query_id)
    )
}

// Alphanumerics, '-' and '.' pass through. Everything else, '_' and '%'
// included, is percent-encoded byte by byte, so an encoded component never
// contains the '_' separator and distinct identities get distinct names.
fn file_safe(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for c in component.chars() {
        if c.is_alphanumeric() || matches!(c, '-' | '.') {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", b));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_deterministic() {
        let id = TestIdentity::new("TestQuerySet", "Query1");
        assert_eq!(error_file_name(&id), "TestQuerySet_Query1.err.json");
        assert_eq!(messages_file_name(&id), "TestQuerySet_Query1.err.messages.txt");
        assert_eq!(error_file_name(&id), error_file_name(&id.clone()));
    }

    #[test]
    fn separators_are_encoded() {
        let id = TestIdentity::new("sets/a", "q 1\\x");
        assert_eq!(error_file_name(&id), "sets%2Fa_q%201%5Cx.err.json");
    }

    #[test]
    fn underscores_cannot_collide() {
        let names = [
            error_file_name(&TestIdentity::new("a_b", "c")),
            error_file_name(&TestIdentity::new("a", "b_c")),
            error_file_name(&TestIdentity::new("s/a", "q")),
            error_file_name(&TestIdentity::new("s_a", "q")),
            error_file_name(&TestIdentity::new("s%5Fa", "q")),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(names[0], "a%5Fb_c.err.json");
    }
}
