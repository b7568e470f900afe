//! Tracks the one `<style>` element each tenant's CSS lives in.
//!
//! A [`StyleRegistry`] is a cheap, cloneable handle onto shared state. Every
//! rendering surface that shows a tenant acquires a [`StyleHandle`] for that
//! tenant's [`ThemeScope`]; all handles for the same tenant share a single
//! element. The element disappears when the last handle is dropped.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::theming::scope::ThemeScope;

#[derive(Debug, Default)]
struct StyleSlot {
    css: String,
    holders: usize,
    revision: u64,
}

/// Snapshot of a registered style element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleElement {
    pub id: String,
    pub css: String,
    /// Bumped every time the CSS text actually changes.
    pub revision: u64,
}

/// Shared registry of per-tenant style elements, keyed by element id.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    slots: Arc<Mutex<BTreeMap<String, StyleSlot>>>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locates or creates the element for `scope` and registers a new holder.
    pub fn acquire(&self, scope: &ThemeScope) -> StyleHandle {
        let element_id = scope.style_element_id().to_string();
        let mut slots = self.lock();
        let slot = slots.entry(element_id.clone()).or_default();
        slot.holders += 1;
        if slot.holders == 1 {
            tracing::debug!(element_id = %element_id, "Created style element");
        } else {
            tracing::trace!(element_id = %element_id, holders = slot.holders, "Reusing style element");
        }
        drop(slots);

        StyleHandle {
            registry: self.clone(),
            element_id,
        }
    }

    pub fn element(&self, element_id: &str) -> Option<StyleElement> {
        self.lock().get(element_id).map(|slot| StyleElement {
            id: element_id.to_string(),
            css: slot.css.clone(),
            revision: slot.revision,
        })
    }

    /// Ids of all live elements, in sorted order.
    pub fn element_ids(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, StyleSlot>> {
        // A panic while holding the lock cannot leave a slot half-written.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, element_id: &str) {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(element_id) else {
            return;
        };
        slot.holders = slot.holders.saturating_sub(1);
        if slot.holders == 0 {
            slots.remove(element_id);
            tracing::debug!(element_id = %element_id, "Removed style element");
        }
    }
}

/// A holder's claim on one tenant's style element. Releases it on drop.
#[derive(Debug)]
pub struct StyleHandle {
    registry: StyleRegistry,
    element_id: String,
}

impl StyleHandle {
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Replaces the element's CSS. Returns `false` when the text was already identical.
    pub fn apply(&self, css: &str) -> bool {
        let mut slots = self.registry.lock();
        let slot = slots.entry(self.element_id.clone()).or_default();
        if slot.holders == 0 {
            // Only reachable if the entry was removed out from under a live handle.
            slot.holders = 1;
        }
        if slot.css == css {
            tracing::trace!(element_id = %self.element_id, "Style unchanged, skipping update");
            return false;
        }
        slot.css = css.to_string();
        slot.revision += 1;
        tracing::trace!(element_id = %self.element_id, revision = slot.revision, "Style updated");
        true
    }

    /// Current CSS text of the element.
    pub fn css(&self) -> String {
        self.registry
            .lock()
            .get(&self.element_id)
            .map(|slot| slot.css.clone())
            .unwrap_or_default()
    }
}

impl Drop for StyleHandle {
    fn drop(&mut self) {
        self.registry.release(&self.element_id);
    }
}
