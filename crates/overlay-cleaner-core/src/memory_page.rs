#![forbid(unsafe_code)]

//! In-memory [`Page`] implementation.
//!
//! Elements are tagged with the exact selector strings they match; there is
//! no CSS engine. Queries are counted per selector so callers can assert that
//! settled targets are never looked up again.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::page::{Page, PageError};

/// Handle to an element inside a [`MemoryPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// Inline style entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleValue {
    pub value: String,
    pub important: bool,
}

#[derive(Debug, Clone, Default)]
struct MemoryElement {
    matches: Vec<String>,
    styles: BTreeMap<String, StyleValue>,
    attached: bool,
}

/// Document double with selector-tagged elements.
#[derive(Debug, Default)]
pub struct MemoryPage {
    elements: Vec<MemoryElement>,
    failing: HashSet<String>,
    queries: RefCell<HashMap<String, u32>>,
    style_writes: u32,
    detaches: u32,
}

impl MemoryPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new element that matches each of `selectors`.
    pub fn insert(&mut self, selectors: &[&str]) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(MemoryElement {
            matches: selectors.iter().map(|s| (*s).to_string()).collect(),
            styles: BTreeMap::new(),
            attached: true,
        });
        id
    }

    /// Detach an element without going through [`Page::detach`], as a page
    /// re-render would.
    pub fn remove(&mut self, id: ElementId) {
        if let Some(element) = self.elements.get_mut(id.0) {
            element.attached = false;
        }
    }

    /// Re-attach a previously removed element.
    pub fn restore(&mut self, id: ElementId) {
        if let Some(element) = self.elements.get_mut(id.0) {
            element.attached = true;
        }
    }

    /// Make every query for `selector` fail as a malformed selector would.
    pub fn fail_queries_for(&mut self, selector: &str) {
        self.failing.insert(selector.to_string());
    }

    #[must_use]
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.elements.get(id.0).is_some_and(|e| e.attached)
    }

    #[must_use]
    pub fn style(&self, id: ElementId, property: &str) -> Option<&StyleValue> {
        self.elements.get(id.0)?.styles.get(property)
    }

    /// Number of times `selector` has been queried.
    #[must_use]
    pub fn query_count(&self, selector: &str) -> u32 {
        self.queries.borrow().get(selector).copied().unwrap_or(0)
    }

    #[must_use]
    pub const fn style_writes(&self) -> u32 {
        self.style_writes
    }

    #[must_use]
    pub const fn detaches(&self) -> u32 {
        self.detaches
    }
}

impl Page for MemoryPage {
    type Node = ElementId;

    fn query(&self, selector: &str) -> Result<Option<ElementId>, PageError> {
        *self
            .queries
            .borrow_mut()
            .entry(selector.to_string())
            .or_insert(0) += 1;
        if self.failing.contains(selector) {
            return Err(PageError::InvalidSelector(selector.to_string()));
        }
        Ok(self
            .elements
            .iter()
            .position(|e| e.attached && e.matches.iter().any(|m| m == selector))
            .map(ElementId))
    }

    fn set_style_important(
        &mut self,
        node: &ElementId,
        property: &str,
        value: &str,
    ) -> Result<(), PageError> {
        let element = self.elements.get_mut(node.0).ok_or(PageError::Detached)?;
        element.styles.insert(
            property.to_string(),
            StyleValue {
                value: value.to_string(),
                important: true,
            },
        );
        self.style_writes += 1;
        Ok(())
    }

    fn detach(&mut self, node: &ElementId) -> Result<(), PageError> {
        let element = self.elements.get_mut(node.0).ok_or(PageError::Detached)?;
        // Removing an already-detached node is a no-op, as in the DOM.
        element.attached = false;
        self.detaches += 1;
        Ok(())
    }
}
