use std::collections::{BTreeMap, HashSet};

use crate::api::types::ObjectRef;
use crate::components::proxy::{ListenerId, MapObjectData, MapObjectProxy};
use crate::input::queue::ProxySink;

/// Id type of the data behind proxy `P`.
pub type ProxyIdOf<P> = <<P as MapObjectProxy>::Data as MapObjectData>::Id;

/// One registered proxy plus the engine-side state that goes with it.
pub struct ProxyEntry<P: MapObjectProxy> {
    /// Latest snapshot data for the entity.
    pub data: P::Data,
    pub proxy: P,
    pub selected: bool,
    pub interactive: bool,
    listeners: Vec<ListenerId>,
}

impl<P: MapObjectProxy> ProxyEntry<P> {
    fn new(data: P::Data, proxy: P) -> Self {
        Self {
            data,
            proxy,
            selected: false,
            interactive: true,
            listeners: Vec::new(),
        }
    }

    /// Subscribe once per event kind the entity type reports.
    fn attach(&mut self, sink: &ProxySink) {
        for kind in <P::Data as MapObjectData>::EVENT_KINDS {
            let listener = self.proxy.listen(*kind, sink.clone());
            self.listeners.push(listener);
        }
    }

    fn detach(&mut self) {
        for listener in self.listeners.drain(..) {
            self.proxy.unlisten(listener);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Ids touched by one snapshot reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<Id> {
    pub added: Vec<Id>,
    pub updated: Vec<Id>,
    pub removed: Vec<Id>,
    /// Map references for `removed`, for indexes keyed across kinds.
    pub removed_objects: Vec<ObjectRef>,
}

impl<Id> Default for Reconciliation<Id> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            updated: Vec::new(),
            removed: Vec::new(),
            removed_objects: Vec::new(),
        }
    }
}

/// Proxies for one kind of map object, keyed by stable id.
pub struct ProxyRegistry<P: MapObjectProxy> {
    entries: BTreeMap<ProxyIdOf<P>, ProxyEntry<P>>,
}

impl<P: MapObjectProxy> ProxyRegistry<P> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register a proxy and attach its listeners. An existing proxy with the
    /// same id is torn down first.
    pub fn insert(&mut self, data: P::Data, proxy: P, sink: &ProxySink) -> &mut ProxyEntry<P> {
        let id = data.id().clone();
        self.remove(&id);

        let mut entry = ProxyEntry::new(data, proxy);
        entry.attach(sink);
        self.entries.entry(id).or_insert(entry)
    }

    /// Detach listeners, destroy the proxy, and return its last data.
    pub fn remove(&mut self, id: &ProxyIdOf<P>) -> Option<P::Data> {
        let mut entry = self.entries.remove(id)?;
        entry.detach();
        entry.proxy.destroy();
        Some(entry.data)
    }

    /// Bring the registry in line with `items`: drop proxies whose entity is
    /// gone, update survivors in place, and create proxies for newcomers.
    pub fn reconcile(
        &mut self,
        items: &[P::Data],
        mut create: impl FnMut(&P::Data) -> P,
        sink: &ProxySink,
    ) -> Reconciliation<ProxyIdOf<P>> {
        let mut report = Reconciliation::default();

        let live: HashSet<&ProxyIdOf<P>> = items.iter().map(|d| d.id()).collect();
        let gone: Vec<ProxyIdOf<P>> = self
            .entries
            .keys()
            .filter(|id| !live.contains(id))
            .cloned()
            .collect();
        for id in gone {
            if let Some(data) = self.remove(&id) {
                report.removed_objects.push(data.object_ref());
            }
            report.removed.push(id);
        }

        for item in items {
            let id = item.id().clone();
            if let Some(entry) = self.entries.get_mut(&id) {
                entry.proxy.update(item);
                entry.data = item.clone();
                report.updated.push(id);
            } else {
                let proxy = create(item);
                self.insert(item.clone(), proxy, sink);
                report.added.push(id);
            }
        }

        report
    }

    /// Tear down every proxy. Returns how many were destroyed.
    pub fn destroy_all(&mut self) -> usize {
        let ids: Vec<ProxyIdOf<P>> = self.entries.keys().cloned().collect();
        let count = ids.len();
        for id in ids {
            self.remove(&id);
        }
        count
    }

    pub fn get(&self, id: &ProxyIdOf<P>) -> Option<&ProxyEntry<P>> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &ProxyIdOf<P>) -> Option<&mut ProxyEntry<P>> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &ProxyIdOf<P>) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProxyEntry<P>> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ProxyEntry<P>> {
        self.entries.values_mut()
    }

    /// Ids of every currently selected proxy.
    pub fn selected_ids(&self) -> Vec<ProxyIdOf<P>> {
        self.entries
            .iter()
            .filter(|(_, e)| e.selected)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: MapObjectProxy> Default for ProxyRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
