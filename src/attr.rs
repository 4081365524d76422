//! Attribute system for tree elements
//!
//! Attributes stay a plain `Vec<(String, String)>` so document order is
//! preserved when rendering. The `class` attribute gets list semantics on
//! top, since reveal transitions are expressed as class swaps.

/// Element attributes as simple key-value pairs
pub type Attrs = Vec<(String, String)>;

/// Annotation naming how an element takes part in the reveal
pub const DRAW_ATTR: &str = "data-draw";

/// Annotation naming the reveal style of a `data-draw="element"` node
pub const DRAW_TYPE_ATTR: &str = "data-draw-type";

/// Extension trait for attribute operations on Attrs
pub trait AttrsExt {
    /// Get an attribute value by name
    fn get_attr(&self, name: &str) -> Option<&str>;

    /// Check if an attribute exists
    fn has_attr(&self, name: &str) -> bool;

    /// Set an attribute value (insert or update)
    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>);

    /// Remove an attribute by name, returning the old value if present
    fn remove_attr(&mut self, name: &str) -> Option<String>;

    /// Iterate over the whitespace-separated entries of `class`
    fn classes(&self) -> impl Iterator<Item = &str>;

    /// Check if `class` contains the given name
    fn has_class(&self, name: &str) -> bool;

    /// Append a class name unless already present
    fn add_class(&mut self, name: &str);

    /// Remove a class name; drops the attribute when it becomes empty
    fn remove_class(&mut self, name: &str);
}

impl AttrsExt for Attrs {
    fn get_attr(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_attr(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(attr) = self.iter_mut().find(|(k, _)| k == &name) {
            attr.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attr("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    fn has_class(&self, name: &str) -> bool {
        self.classes().any(|c| c == name)
    }

    fn add_class(&mut self, name: &str) {
        if name.is_empty() || self.has_class(name) {
            return;
        }
        let joined = match self.get_attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), name),
            _ => name.to_string(),
        };
        self.set_attr("class", joined);
    }

    fn remove_class(&mut self, name: &str) {
        if !self.has_class(name) {
            return;
        }
        let kept: Vec<&str> = self.classes().filter(|c| *c != name).collect();
        let joined = kept.join(" ");
        if joined.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", joined);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrs_operations() {
        let mut attrs: Attrs = Vec::new();

        attrs.set_attr(DRAW_ATTR, "element");
        attrs.set_attr(DRAW_TYPE_ATTR, "text-body");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get_attr(DRAW_ATTR), Some("element"));
        assert_eq!(attrs.get_attr("href"), None);

        attrs.set_attr(DRAW_ATTR, "container");
        assert_eq!(attrs.get_attr(DRAW_ATTR), Some("container"));
        assert_eq!(attrs.len(), 2);

        let removed = attrs.remove_attr(DRAW_TYPE_ATTR);
        assert_eq!(removed.as_deref(), Some("text-body"));
        assert!(!attrs.has_attr(DRAW_TYPE_ATTR));
    }

    #[test]
    fn test_class_list() {
        let mut attrs: Attrs = vec![("class".into(), "nav  link".into())];

        attrs.add_class("drawing-element-pre");
        attrs.add_class("link");
        assert_eq!(attrs.get_attr("class"), Some("nav  link drawing-element-pre"));
        assert!(attrs.has_class("nav"));

        attrs.remove_class("nav");
        assert_eq!(attrs.get_attr("class"), Some("link drawing-element-pre"));

        attrs.remove_class("link");
        attrs.remove_class("drawing-element-pre");
        assert!(!attrs.has_attr("class"));
    }
}
