//! Name resolution over a rendered list snapshot.
//!
//! A [`ListItem`] is only valid for the render it was read from. Callers
//! fetch a fresh snapshot for every resolution; nothing here caches.
//!
//! Display names are the only identity the list offers and they are not
//! unique. Resolution is exact string equality and the earliest-rendered
//! match wins.
//!
//! Rows whose name cannot be read are left out of a snapshot, so a
//! position in the snapshot is not always a position on screen. Anything
//! addressed by row (the per-row delete entries) goes through
//! [`row_of`].

use crate::driver::ElementHandle;
use serde::Serialize;

/// One folder or label as rendered in the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    /// Position among all rendered rows, named or not
    pub row: usize,
    /// Text of the row's name element
    pub display_name: String,
    /// Inline style of the row's colour icon, if it has one
    pub color_style: Option<String>,
    /// Row element (valid until the next re-render)
    #[serde(skip)]
    pub handle: ElementHandle,
}

impl ListItem {
    /// Create a list item
    #[must_use]
    pub fn new(
        row: usize,
        display_name: impl Into<String>,
        color_style: Option<String>,
        handle: ElementHandle,
    ) -> Self {
        Self {
            row,
            display_name: display_name.into(),
            color_style,
            handle,
        }
    }
}

/// First item whose display name is exactly `name`
#[must_use]
pub fn find_by_name<'a>(items: &'a [ListItem], name: &str) -> Option<&'a ListItem> {
    items.iter().find(|item| item.display_name == name)
}

/// Position of the first item whose display name is exactly `name`.
///
/// `Some(0)` is a valid hit; only `None` means absent.
#[must_use]
pub fn index_of(items: &[ListItem], name: &str) -> Option<usize> {
    items.iter().position(|item| item.display_name == name)
}

/// Rendered row of the first item whose display name is exactly `name`
#[must_use]
pub fn row_of(items: &[ListItem], name: &str) -> Option<usize> {
    find_by_name(items, name).map(|item| item.row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(name: &str, id: usize) -> ListItem {
        ListItem::new(id, name, None, ElementHandle::new(format!("0:{id}")))
    }

    fn items(names: &[&str]) -> Vec<ListItem> {
        names.iter().enumerate().map(|(i, n)| item(n, i)).collect()
    }

    #[test]
    fn test_index_zero_is_a_hit() {
        let list = items(&["A", "B"]);
        assert_eq!(index_of(&list, "A"), Some(0));
        assert_eq!(index_of(&list, "B"), Some(1));
        assert_eq!(index_of(&list, "Z"), None);
    }

    #[test]
    fn test_empty_list_resolves_nothing() {
        assert!(find_by_name(&[], "folder1").is_none());
        assert_eq!(index_of(&[], "folder1"), None);
    }

    #[test]
    fn test_exact_match_only() {
        let list = items(&["folder1_modified", "Folder1", " folder1"]);
        assert!(find_by_name(&list, "folder1").is_none());
        assert!(find_by_name(&list, "folder1_modified").is_some());
    }

    #[test]
    fn test_duplicates_resolve_to_first_rendered() {
        let list = items(&["x", "dup", "dup"]);
        let found = find_by_name(&list, "dup").unwrap();
        assert_eq!(found.handle, ElementHandle::new("0:1"));
        assert_eq!(index_of(&list, "dup"), Some(1));
    }

    #[test]
    fn test_row_of_skips_over_unnamed_rows() {
        // Row 0 rendered without a readable name.
        let list = vec![item("keep", 1), item("drop", 2)];
        assert_eq!(index_of(&list, "drop"), Some(1));
        assert_eq!(row_of(&list, "drop"), Some(2));
        assert_eq!(row_of(&list, "gone"), None);
    }

    #[test]
    fn test_serialization_skips_handle() {
        let mut it = item("news", 0);
        it.color_style = Some("color: rgb(1, 2, 3);".to_string());
        let json = serde_json::to_value(&it).unwrap();
        assert_eq!(json["display_name"], "news");
        assert!(json.get("handle").is_none());
    }

    proptest! {
        #[test]
        fn prop_index_and_find_agree(names in prop::collection::vec("[a-c]{1,2}", 0..8), target in "[a-c]{1,2}") {
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let list = items(&refs);
            let idx = index_of(&list, &target);
            let found = find_by_name(&list, &target);
            prop_assert_eq!(idx.map(|i| &list[i]), found);
            prop_assert_eq!(row_of(&list, &target), idx);
            if let Some(i) = idx {
                prop_assert_eq!(&list[i].display_name, &target);
                prop_assert!(list[..i].iter().all(|it| it.display_name != target));
            } else {
                prop_assert!(list.iter().all(|it| it.display_name != target));
            }
        }
    }
}
