//! Qualified-name helpers
//!
//! Qualified names are `/`-separated and parent-prefixed:
//! `default/snowflake/1700000000/DB/SCHEMA/TABLE`. The first three segments
//! always identify the connection.

/// Number of leading segments that make up a connection's qualified name
pub const CONNECTION_SEGMENTS: usize = 3;

/// The first `count` segments of a qualified name, or `None` if it has fewer
pub fn prefix_segments(qualified_name: &str, count: usize) -> Option<String> {
    let parts: Vec<&str> = qualified_name.split('/').collect();
    if count == 0 || parts.len() < count {
        return None;
    }
    Some(parts[..count].join("/"))
}

/// The connection qualified name embedded in any asset's qualified name
pub fn connection_qualified_name(qualified_name: &str) -> Option<String> {
    prefix_segments(qualified_name, CONNECTION_SEGMENTS)
}

/// Everything after the last `/`
pub fn last_segment(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('/')
        .map(|(_, last)| last)
        .unwrap_or(qualified_name)
}

/// Everything before the last `/`
pub fn parent_qualified_name(qualified_name: &str) -> Option<&str> {
    qualified_name.rsplit_once('/').map(|(parent, _)| parent)
}

/// Join a parent qualified name and a child segment
pub fn child_qualified_name(parent: &str, child: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), child)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_prefix() {
        assert_eq!(
            connection_qualified_name("default/snowflake/123/DB/SCH/T").as_deref(),
            Some("default/snowflake/123")
        );
        assert_eq!(connection_qualified_name("default/snowflake"), None);
    }

    #[test]
    fn test_last_and_parent() {
        assert_eq!(last_segment("a/b/c"), "c");
        assert_eq!(last_segment("plain"), "plain");
        assert_eq!(parent_qualified_name("a/b/c"), Some("a/b"));
        assert_eq!(parent_qualified_name("plain"), None);
    }

    #[test]
    fn test_child() {
        assert_eq!(child_qualified_name("a/b/", "c"), "a/b/c");
    }
}
