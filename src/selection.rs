/// Per-form slot state for one ranked pick list. Each open form owns one of
/// these; two users editing concurrently never share an instance.
///
/// `active_key` makes re-initialization explicit: switching users or races is
/// a new key and reseeds every slot, while re-running `initialize` with the
/// same key is a no-op so in-progress edits survive incidental re-renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    active_key: Option<String>,
    slots: Vec<Option<String>>,
}

impl FormState {
    pub fn new(slot_count: usize) -> Self {
        Self {
            active_key: None,
            slots: vec![None; slot_count],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active_key.as_deref()
    }

    /// Seed slots from a previously stored record. Only values that still
    /// exist in the current catalog are accepted; stale references from
    /// renamed or removed entries silently become unset.
    pub fn initialize(&mut self, key: &str, existing: Option<&[String]>, catalog: &[String]) {
        if self.active_key.as_deref() == Some(key) {
            return;
        }
        for slot in &mut self.slots {
            *slot = None;
        }
        if let Some(stored) = existing {
            for (slot, value) in self.slots.iter_mut().zip(stored.iter()) {
                if catalog.iter().any(|name| name == value) {
                    *slot = Some(value.clone());
                }
            }
        }
        self.active_key = Some(key.to_string());
    }

    /// Forget the active key and all slots. Called when a delete invalidates
    /// whatever was seeded for that key; the next `initialize` reseeds.
    pub fn reset(&mut self) {
        self.active_key = None;
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    pub fn slot(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|s| s.as_deref())
    }

    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    /// Narrowing assignment: callers only offer values coming out of
    /// `available_options_for`, so this records without re-validating.
    pub fn set_slot(&mut self, index: usize, value: Option<String>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = value;
        }
    }

    /// Catalog order minus values held by every *other* slot, keeping this
    /// slot's own current value visible even though it is "taken".
    pub fn available_options_for(&self, index: usize, catalog: &[String]) -> Vec<String> {
        let own = self.slot(index);
        catalog
            .iter()
            .filter(|name| {
                own == Some(name.as_str()) || !self.is_taken_elsewhere(index, name)
            })
            .cloned()
            .collect()
    }

    fn is_taken_elsewhere(&self, index: usize, name: &str) -> bool {
        self.slots
            .iter()
            .enumerate()
            .any(|(i, slot)| i != index && slot.as_deref() == Some(name))
    }
}
