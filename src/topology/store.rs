/*!
Storage for the links collected from all captured devices.

This module defines:
- `LinkStore`: every link in capture order, partitioned by the reporting host, plus the two
  lookup indexes the correlation passes run on:
  - host -> router-id -> links on which the host reports that neighbor
  - router-id -> hosts that report it

The store is built once from the full link list and never mutated afterwards.
*/

use std::collections::{BTreeMap, BTreeSet};

use crate::network::{
    link::Link,
    router::{Hostname, RouterId},
};

#[derive(Debug, Clone, Default)]
pub struct LinkStore {
    links: Vec<Link>,
    /// Link indices per reporting host, in capture order.
    partitions: BTreeMap<Hostname, Vec<usize>>,
    host_sees: BTreeMap<Hostname, BTreeMap<RouterId, Vec<usize>>>,
    seen_by: BTreeMap<RouterId, BTreeSet<Hostname>>,
}

impl LinkStore {
    pub fn from_links(links: Vec<Link>) -> Self {
        let mut partitions: BTreeMap<Hostname, Vec<usize>> = BTreeMap::new();
        let mut host_sees: BTreeMap<Hostname, BTreeMap<RouterId, Vec<usize>>> = BTreeMap::new();
        let mut seen_by: BTreeMap<RouterId, BTreeSet<Hostname>> = BTreeMap::new();

        for (idx, link) in links.iter().enumerate() {
            partitions
                .entry(link.local_host.clone())
                .or_default()
                .push(idx);
            host_sees
                .entry(link.local_host.clone())
                .or_default()
                .entry(link.remote_router_id.clone())
                .or_default()
                .push(idx);
            seen_by
                .entry(link.remote_router_id.clone())
                .or_default()
                .insert(link.local_host.clone());
        }

        LinkStore {
            links,
            partitions,
            host_sees,
            seen_by,
        }
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Hosts that reported at least one link, sorted.
    pub fn hosts(&self) -> impl Iterator<Item = &Hostname> + '_ {
        self.partitions.keys()
    }

    /// Links reported by `host`, in capture order.
    pub fn links_from<'s>(&'s self, host: &str) -> impl Iterator<Item = &'s Link> + use<'s> {
        self.partitions
            .get(host)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.links[idx])
    }

    /// Router-ids `host` reports, sorted, each with the first link it was reported on.
    pub fn sees<'s>(
        &'s self,
        host: &str,
    ) -> impl Iterator<Item = (&'s RouterId, &'s Link)> + use<'s> {
        self.host_sees
            .get(host)
            .into_iter()
            .flatten()
            .map(move |(rid, indices)| (rid, &self.links[indices[0]]))
    }

    /// Every `(rid, link)` pair `host` reports, parallel links included, sorted by router-id.
    pub fn seen_links<'s>(
        &'s self,
        host: &str,
    ) -> impl Iterator<Item = (&'s RouterId, &'s Link)> + use<'s> {
        self.host_sees
            .get(host)
            .into_iter()
            .flatten()
            .flat_map(move |(rid, indices)| indices.iter().map(move |&idx| (rid, &self.links[idx])))
    }

    /// All links on which `host` reports `rid`, in capture order.
    pub fn links_to<'s>(&'s self, host: &str, rid: &RouterId) -> Vec<&'s Link> {
        self.host_sees
            .get(host)
            .and_then(|seen| seen.get(rid))
            .map(|indices| indices.iter().map(|&idx| &self.links[idx]).collect())
            .unwrap_or_default()
    }

    /// First link on which `host` reports `rid`.
    pub fn seen_link(&self, host: &str, rid: &RouterId) -> Option<&Link> {
        self.host_sees
            .get(host)
            .and_then(|seen| seen.get(rid))
            .map(|indices| &self.links[indices[0]])
    }

    pub fn reports(&self, host: &str, rid: &RouterId) -> bool {
        self.host_sees
            .get(host)
            .is_some_and(|seen| seen.contains_key(rid))
    }

    /// Number of parallel links on which `host` reports `rid`.
    pub fn link_count(&self, host: &str, rid: &RouterId) -> usize {
        self.host_sees
            .get(host)
            .and_then(|seen| seen.get(rid))
            .map_or(0, Vec::len)
    }

    /// Hosts that report `rid` as a neighbor, sorted.
    pub fn seen_by<'s>(&'s self, rid: &RouterId) -> impl Iterator<Item = &'s Hostname> + use<'s> {
        self.seen_by.get(rid).into_iter().flatten()
    }

    /// Every router-id reported by any host, sorted.
    pub fn router_ids(&self) -> impl Iterator<Item = &RouterId> + '_ {
        self.seen_by.keys()
    }
}

impl FromIterator<Link> for LinkStore {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        LinkStore::from_links(iter.into_iter().collect())
    }
}
