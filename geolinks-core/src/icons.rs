use std::collections::HashMap;

pub const DEFAULT_ICONS: [&str; 5] = [
    "https://maps.google.com/mapfiles/ms/icons/blue-dot.png",
    "https://maps.google.com/mapfiles/ms/icons/red-dot.png",
    "https://maps.google.com/mapfiles/ms/icons/purple-dot.png",
    "https://maps.google.com/mapfiles/ms/icons/yellow-dot.png",
    "https://maps.google.com/mapfiles/ms/icons/green-dot.png",
];

/// Assigns palette icons to RDF types in first-seen order.
///
/// The n-th distinct type gets `palette[n % palette.len()]`, so icons are
/// recycled once there are more types than icons. Assignments never change.
#[derive(Debug, Clone)]
pub struct TypeIcons {
    palette: Vec<String>,
    assigned: HashMap<String, usize>,
}

impl TypeIcons {
    pub fn new(palette: Vec<String>) -> Self {
        Self {
            palette,
            assigned: HashMap::new(),
        }
    }

    /// Icon for `rdf_type`, assigning the next one if the type is new.
    /// Returns `None` only when the palette is empty.
    pub fn icon_for(&mut self, rdf_type: &str) -> Option<&str> {
        if self.palette.is_empty() {
            return None;
        }
        let next = self.assigned.len() % self.palette.len();
        let index = *self.assigned.entry(rdf_type.to_string()).or_insert(next);
        self.palette.get(index).map(String::as_str)
    }

    pub fn get(&self, rdf_type: &str) -> Option<&str> {
        let index = *self.assigned.get(rdf_type)?;
        self.palette.get(index).map(String::as_str)
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    /// Number of distinct types seen so far.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

impl Default for TypeIcons {
    fn default() -> Self {
        Self::new(DEFAULT_ICONS.iter().map(|icon| icon.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let mut icons = TypeIcons::default();
        assert_eq!(icons.icon_for("urn:T1"), Some(DEFAULT_ICONS[0]));
        assert_eq!(icons.icon_for("urn:T2"), Some(DEFAULT_ICONS[1]));
        assert_eq!(icons.icon_for("urn:T1"), Some(DEFAULT_ICONS[0]));
        assert_eq!(icons.len(), 2);
    }

    #[test]
    fn test_icons_recycle_after_palette_is_exhausted() {
        let mut icons = TypeIcons::default();
        for i in 1..=5 {
            icons.icon_for(&format!("urn:T{}", i));
        }
        let sixth = icons.icon_for("urn:T6").map(str::to_string);
        assert_eq!(sixth.as_deref(), icons.get("urn:T1"));
        assert_eq!(sixth.as_deref(), Some(DEFAULT_ICONS[0]));
        assert_eq!(icons.icon_for("urn:T7"), Some(DEFAULT_ICONS[1]));
    }

    #[test]
    fn test_empty_palette_assigns_nothing() {
        let mut icons = TypeIcons::new(Vec::new());
        assert_eq!(icons.icon_for("urn:T1"), None);
        assert!(icons.is_empty());
    }
}
