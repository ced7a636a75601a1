//! `namespace/resource/name` tokens as typed on the command line
//!
//! Accepted forms:
//! - `mytemplate` - implicit namespace, implicit resource kind
//! - `template/mytemplate` - implicit namespace, explicit resource kind
//! - `ns/template/mytemplate` - explicit namespace, explicit resource kind
//! - `ns//mytemplate` - explicit namespace, implicit resource kind

use std::fmt;

use serde::Serialize;

/// A parsed token. An empty `resource` means the caller's default kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    pub namespace: String,
    pub resource: String,
    pub name: String,
}

impl ResourceRef {
    /// Resource kind, falling back to `default_kind` when left implicit
    pub fn resource_or<'a>(&'a self, default_kind: &'a str) -> &'a str {
        if self.resource.is_empty() {
            default_kind
        } else {
            &self.resource
        }
    }

    pub fn into_parts(self) -> (String, String, String) {
        (self.namespace, self.resource, self.name)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.resource, self.name)
    }
}

/// Split `value` into namespace, resource kind and name.
///
/// Two segments are read as `resource/name`, not `namespace/name`; the
/// namespace then comes from `default_namespace`. Returns `None` for any
/// segment count other than 1, 2 or 3.
pub fn parse_namespace_resource_name(value: &str, default_namespace: &str) -> Option<ResourceRef> {
    let parts: Vec<&str> = value.trim().split('/').collect();
    let (namespace, resource, name) = match parts.as_slice() {
        [namespace, resource, name] => (*namespace, *resource, *name),
        [resource, name] => (default_namespace, *resource, *name),
        [name] => (default_namespace, "", *name),
        _ => return None,
    };

    Some(ResourceRef {
        namespace: namespace.to_string(),
        resource: resource.to_string(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn parts(value: &str) -> Option<(String, String, String)> {
        parse_namespace_resource_name(value, "default").map(ResourceRef::into_parts)
    }

    fn owned(ns: &str, resource: &str, name: &str) -> Option<(String, String, String)> {
        Some((ns.to_string(), resource.to_string(), name.to_string()))
    }

    #[test]
    fn test_three_segments() {
        assert_eq!(parts("ns/tmpl/name"), owned("ns", "tmpl", "name"));
    }

    #[test]
    fn test_two_segments_are_resource_and_name() {
        assert_eq!(parts("tmpl/name"), owned("default", "tmpl", "name"));
    }

    #[test]
    fn test_one_segment() {
        assert_eq!(parts("name"), owned("default", "", "name"));
    }

    #[test]
    fn test_too_many_segments() {
        assert_eq!(parts("a/b/c/d"), None);
    }

    #[test]
    fn test_explicit_namespace_implicit_resource() {
        let parsed = parse_namespace_resource_name("ns//mytemplate", "default").unwrap();
        assert_eq!(parsed.namespace, "ns");
        assert_eq!(parsed.resource_or("template"), "template");
        assert_eq!(parsed.name, "mytemplate");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(parts("  tmpl/name\n"), owned("default", "tmpl", "name"));
    }

    #[test]
    fn test_empty_input_is_a_single_empty_segment() {
        assert_eq!(parts(""), owned("default", "", ""));
    }

    #[test]
    fn test_display() {
        let parsed = parse_namespace_resource_name("tmpl/name", "proj").unwrap();
        assert_eq!(parsed.to_string(), "proj/tmpl/name");
    }

    proptest! {
        #[test]
        fn prop_more_than_three_segments_fail(segments in prop::collection::vec("[a-z0-9-]{0,8}", 4..8)) {
            let token = segments.join("/");
            prop_assert!(parse_namespace_resource_name(&token, "default").is_none());
        }

        #[test]
        fn prop_name_is_always_last_segment(segments in prop::collection::vec("[a-z0-9-]{1,8}", 1..4)) {
            let token = segments.join("/");
            let parsed = parse_namespace_resource_name(&token, "default").unwrap();
            prop_assert_eq!(&parsed.name, segments.last().unwrap());
            if segments.len() < 3 {
                prop_assert_eq!(parsed.namespace, "default");
            }
        }
    }
}
