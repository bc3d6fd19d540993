/*!
Router-id to hostname correlation.

Neighbor tables only name neighbors by router-id, while captures are named by hostname. This
module works out which hostname owns which router-id, using nothing but the links in a
`LinkStore` and optional authoritative seeds.

Passes, in order:
1. Subnet adjacency: two hosts that see each other on the same link own each other's
   reported router-ids. Runs once.
2. Mutual visibility: H sees R owned by O; the unmapped router-id O sees on the same link as
   H's view of O belongs to H.
3. Reverse neighbor: the mirror of 2 starting from a mapped host and its unmapped observers.
4. Neighborhood pattern: an unmapped router-id X belongs to the only unmapped host whose view
   of X's observers matches their view of X (areas, parallel-link count, subnet or
   subinterface unit).
5. Link-local elimination: for OSPFv3 link-local adjacencies; when H is the only unmapped
   host seeing R and R's owner reports exactly one unmapped router-id H does not, that
   router-id is H's.

Passes 2-5 each repeat until a sweep assigns nothing or the iteration cap is reached.

Invariants:
- The mapping is injective in both directions and only ever grows.
- A host never owns a router-id it itself reports as a neighbor.
- Iteration is over sorted collections only, so the same input always yields the same mapping.
*/

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::{
    network::{
        address::{address_distance, same_link_addresses},
        link::Link,
        router::{Hostname, RouterId},
    },
    topology::store::LinkStore,
};

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Stage that produced an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Seed,
    SubnetAdjacency,
    MutualVisibility,
    ReverseNeighbor,
    NeighborhoodPattern,
    LinkLocalElimination,
}

impl Pass {
    pub const ALL: [Pass; 6] = [
        Pass::Seed,
        Pass::SubnetAdjacency,
        Pass::MutualVisibility,
        Pass::ReverseNeighbor,
        Pass::NeighborhoodPattern,
        Pass::LinkLocalElimination,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Pass::Seed => "seed",
            Pass::SubnetAdjacency => "subnet-adjacency",
            Pass::MutualVisibility => "mutual-visibility",
            Pass::ReverseNeighbor => "reverse-neighbor",
            Pass::NeighborhoodPattern => "neighborhood-pattern",
            Pass::LinkLocalElimination => "link-local-elimination",
        }
    }
}

/// What the neighborhood pass does when several hosts match equally well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TieBreak {
    /// Leave the router-id unmapped.
    #[default]
    Strict,
    /// Take the first candidate in hostname order.
    FirstCandidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationConfig {
    pub max_iterations: usize,
    pub tie_break: TieBreak,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        CorrelationConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tie_break: TieBreak::default(),
        }
    }
}

/// Bidirectional router-id <-> hostname map. Entries are never replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterIdMap {
    by_router_id: BTreeMap<RouterId, Hostname>,
    by_host: BTreeMap<Hostname, RouterId>,
}

impl RouterIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `rid -> host` if neither side is mapped yet. Returns whether it was recorded.
    pub fn insert(&mut self, rid: RouterId, host: &str) -> bool {
        if self.by_router_id.contains_key(&rid) || self.by_host.contains_key(host) {
            return false;
        }
        self.by_host.insert(host.to_string(), rid.clone());
        self.by_router_id.insert(rid, host.to_string());
        true
    }

    pub fn host_of(&self, rid: &RouterId) -> Option<&Hostname> {
        self.by_router_id.get(rid)
    }

    pub fn router_id_of(&self, host: &str) -> Option<&RouterId> {
        self.by_host.get(host)
    }

    pub fn contains_router_id(&self, rid: &RouterId) -> bool {
        self.by_router_id.contains_key(rid)
    }

    pub fn contains_host(&self, host: &str) -> bool {
        self.by_host.contains_key(host)
    }

    pub fn len(&self) -> usize {
        self.by_router_id.len()
    }

    /// Pairs sorted by router-id.
    pub fn iter(&self) -> impl Iterator<Item = (&RouterId, &Hostname)> {
        self.by_router_id.iter()
    }
}

/// One recorded ownership decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub router_id: RouterId,
    pub host: Hostname,
    pub pass: Pass,
    /// Sweep of `pass` that made the decision, starting at 1.
    pub iteration: usize,
}

#[derive(Debug, Clone)]
pub struct CorrelationOutcome {
    pub map: RouterIdMap,
    /// Every assignment in the order it was made.
    pub assignments: Vec<Assignment>,
    /// Reported router-ids no host could be found for.
    pub unmapped: BTreeSet<RouterId>,
    /// Passes whose iteration cap was reached before they converged.
    pub capped: Vec<Pass>,
}

impl CorrelationOutcome {
    pub fn count_for(&self, pass: Pass) -> usize {
        self.assignments.iter().filter(|a| a.pass == pass).count()
    }
}

pub struct CorrelationEngine<'a> {
    store: &'a LinkStore,
    config: CorrelationConfig,
    map: RouterIdMap,
    assignments: Vec<Assignment>,
    capped: Vec<Pass>,
    iteration: usize,
}

impl<'a> CorrelationEngine<'a> {
    pub fn new(store: &'a LinkStore, config: CorrelationConfig) -> Self {
        CorrelationEngine {
            store,
            config,
            map: RouterIdMap::new(),
            assignments: Vec::new(),
            capped: Vec::new(),
            iteration: 1,
        }
    }

    /// Records an authoritative router-id. The first seed for a router-id or host wins.
    pub fn seed(&mut self, host: &str, rid: RouterId) -> bool {
        if let Some(owner) = self.map.host_of(&rid) {
            if owner != host {
                warn!(router_id = %rid, host, owner = %owner, "conflicting router-id seed ignored");
            }
            return false;
        }
        if let Some(existing) = self.map.router_id_of(host) {
            warn!(router_id = %rid, host, existing = %existing, "host already seeded, ignoring second router-id");
            return false;
        }
        self.map.insert(rid.clone(), host);
        debug!(router_id = %rid, host, pass = Pass::Seed.label(), "router-id seeded");
        self.assignments.push(Assignment {
            router_id: rid,
            host: host.to_string(),
            pass: Pass::Seed,
            iteration: 1,
        });
        true
    }

    pub fn run(mut self) -> CorrelationOutcome {
        self.iteration = 1;
        let assigned = self.subnet_adjacency();
        debug!(pass = Pass::SubnetAdjacency.label(), assigned, "pass finished");

        self.iterate(Pass::MutualVisibility, Self::mutual_visibility);
        self.iterate(Pass::ReverseNeighbor, Self::reverse_neighbor);
        self.iterate(Pass::NeighborhoodPattern, Self::neighborhood_pattern);
        self.iterate(Pass::LinkLocalElimination, Self::link_local_elimination);

        let unmapped: BTreeSet<RouterId> = self
            .store
            .router_ids()
            .filter(|rid| !self.map.contains_router_id(rid))
            .cloned()
            .collect();
        debug!(
            mapped = self.map.len(),
            unmapped = unmapped.len(),
            "correlation finished"
        );

        CorrelationOutcome {
            map: self.map,
            assignments: self.assignments,
            unmapped,
            capped: self.capped,
        }
    }

    fn iterate(&mut self, pass: Pass, sweep: fn(&mut Self) -> usize) -> usize {
        let mut total = 0;
        for iteration in 1..=self.config.max_iterations {
            self.iteration = iteration;
            let assigned = sweep(self);
            trace!(pass = pass.label(), iteration, assigned, "sweep finished");
            total += assigned;
            if assigned == 0 {
                debug!(pass = pass.label(), assigned = total, iterations = iteration, "pass converged");
                return total;
            }
        }
        warn!(
            pass = pass.label(),
            max_iterations = self.config.max_iterations,
            assigned = total,
            "pass stopped at the iteration cap before converging"
        );
        self.capped.push(pass);
        total
    }

    fn assign(&mut self, rid: &RouterId, host: &str, pass: Pass) -> bool {
        if self.store.reports(host, rid) {
            trace!(router_id = %rid, host, "host reports this router-id as a neighbor, not assigning");
            return false;
        }
        if !self.map.insert(rid.clone(), host) {
            return false;
        }
        debug!(
            router_id = %rid,
            host,
            pass = pass.label(),
            iteration = self.iteration,
            "router-id assigned"
        );
        self.assignments.push(Assignment {
            router_id: rid.clone(),
            host: host.to_string(),
            pass,
            iteration: self.iteration,
        });
        true
    }

    /// Pass 1. All same-link pairs, parallel links included, are collected first and applied
    /// closest pair first.
    fn subnet_adjacency(&mut self) -> usize {
        let store = self.store;
        let hosts: Vec<&Hostname> = store.hosts().collect();
        let mut evidence: Vec<(u128, &Hostname, &RouterId, &Hostname, &RouterId)> = Vec::new();

        for (i, &a) in hosts.iter().enumerate() {
            for &b in &hosts[i + 1..] {
                if self.map.contains_host(a) && self.map.contains_host(b) {
                    continue;
                }
                for (rid_a, link_a) in store.seen_links(a) {
                    for (rid_b, link_b) in store.seen_links(b) {
                        if rid_a == rid_b || link_a.remote_ip == link_b.remote_ip {
                            continue;
                        }
                        if let Some(distance) = same_link_distance(link_a, link_b) {
                            evidence.push((distance, a, rid_a, b, rid_b));
                        }
                    }
                }
            }
        }

        evidence.sort();
        evidence.dedup();
        let mut assigned = 0;
        for (_, a, rid_a, b, rid_b) in evidence {
            assigned += usize::from(self.assign(rid_a, b, Pass::SubnetAdjacency));
            assigned += usize::from(self.assign(rid_b, a, Pass::SubnetAdjacency));
        }
        assigned
    }

    /// Pass 2.
    fn mutual_visibility(&mut self) -> usize {
        let store = self.store;
        let mut assigned = 0;
        for host in store.hosts() {
            if self.map.contains_host(host) {
                continue;
            }
            for (rid, _) in store.sees(host) {
                let Some(owner) = self.map.host_of(rid) else {
                    continue;
                };
                let anchors = store.links_to(host, rid);
                let candidates = store
                    .seen_links(owner)
                    .filter(|(candidate, _)| !self.map.contains_router_id(candidate));
                let Some(candidate) = closest_same_link(&anchors, candidates) else {
                    continue;
                };
                if self.assign(candidate, host, Pass::MutualVisibility) {
                    assigned += 1;
                    break;
                }
            }
        }
        assigned
    }

    /// Pass 3.
    fn reverse_neighbor(&mut self) -> usize {
        let store = self.store;
        let mapped: Vec<(Hostname, RouterId)> = self
            .map
            .iter()
            .map(|(rid, host)| (host.clone(), rid.clone()))
            .collect();
        let mut assigned = 0;
        for (host, rid) in mapped {
            for observer in store.seen_by(&rid) {
                if self.map.contains_host(observer) {
                    continue;
                }
                let anchors = store.links_to(observer, &rid);
                let candidates = store
                    .seen_links(&host)
                    .filter(|(candidate, _)| !self.map.contains_router_id(candidate));
                let Some(candidate) = closest_same_link(&anchors, candidates) else {
                    continue;
                };
                if self.assign(candidate, observer, Pass::ReverseNeighbor) {
                    assigned += 1;
                }
            }
        }
        assigned
    }

    /// Pass 4.
    fn neighborhood_pattern(&mut self) -> usize {
        let store = self.store;
        let unmapped: Vec<&RouterId> = store
            .router_ids()
            .filter(|rid| !self.map.contains_router_id(rid))
            .collect();
        let mut assigned = 0;

        for rid in unmapped {
            let observers: Vec<(&Hostname, RouterId)> = store
                .seen_by(rid)
                .filter_map(|t| self.map.router_id_of(t).map(|t_rid| (t, t_rid.clone())))
                .collect();
            if observers.is_empty() {
                continue;
            }

            let candidates: Vec<&Hostname> = store
                .hosts()
                .filter(|h| !self.map.contains_host(h) && !store.reports(h, rid))
                .filter(|h| self.matches_neighborhood(h, &observers, rid))
                .collect();

            let chosen = match (candidates.as_slice(), self.config.tie_break) {
                ([], _) => None,
                ([only], _) => Some(*only),
                ([first, ..], TieBreak::FirstCandidate) => Some(*first),
                (tied, TieBreak::Strict) => {
                    debug!(
                        router_id = %rid,
                        candidates = ?tied,
                        "several hosts match the neighborhood, leaving unmapped"
                    );
                    None
                }
            };
            if let Some(host) = chosen {
                if self.assign(rid, host, Pass::NeighborhoodPattern) {
                    assigned += 1;
                }
            }
        }
        assigned
    }

    /// True when `host` could be the device behind `rid` as seen by every mapped observer.
    ///
    /// Each observer T must be reported by `host`, with a compatible area and the same number
    /// of parallel links as T has towards `rid`. Geometric addresses that disagree rule the
    /// host out. At least one observer has to give positive evidence: a shared subnet or a
    /// shared subinterface unit.
    fn matches_neighborhood(
        &self,
        host: &str,
        observers: &[(&Hostname, RouterId)],
        rid: &RouterId,
    ) -> bool {
        let store = self.store;
        let mut positive = false;
        for (observer, observer_rid) in observers {
            let (Some(host_link), Some(observer_link)) = (
                store.seen_link(host, observer_rid),
                store.seen_link(observer, rid),
            ) else {
                return false;
            };
            if !host_link.area_compatible(observer_link)
                || store.link_count(host, observer_rid) != store.link_count(observer, rid)
            {
                return false;
            }
            let (a, b) = (host_link.remote_address(), observer_link.remote_address());
            if a.is_geometric() && b.is_geometric() {
                if !same_link_addresses(a, b) {
                    return false;
                }
                positive = true;
            }
            if host_link
                .interface_unit()
                .is_some_and(|unit| observer_link.interface_unit() == Some(unit))
            {
                positive = true;
            }
        }
        positive
    }

    /// Pass 5.
    fn link_local_elimination(&mut self) -> usize {
        let store = self.store;
        let mut assigned = 0;
        for host in store.hosts() {
            if self.map.contains_host(host) {
                continue;
            }
            for (rid, link_h) in store.sees(host) {
                let Some(owner) = self.map.host_of(rid) else {
                    continue;
                };
                let sole_unmapped_observer = {
                    let mut unmapped = store
                        .seen_by(rid)
                        .filter(|observer| !self.map.contains_host(observer));
                    unmapped.next() == Some(host) && unmapped.next().is_none()
                };
                if !sole_unmapped_observer {
                    continue;
                }

                let candidates: Vec<&RouterId> = store
                    .sees(owner)
                    .filter(|(candidate, link_o)| {
                        !self.map.contains_router_id(candidate)
                            && !store.reports(host, candidate)
                            && link_h.area_compatible(link_o)
                    })
                    .map(|(candidate, _)| candidate)
                    .collect();
                if let [candidate] = candidates.as_slice() {
                    if self.assign(candidate, host, Pass::LinkLocalElimination) {
                        assigned += 1;
                        break;
                    }
                }
            }
        }
        assigned
    }
}

/// Address distance of two links in compatible areas that share a subnet.
fn same_link_distance(a: &Link, b: &Link) -> Option<u128> {
    if !a.area_compatible(b) {
        return None;
    }
    let (a, b) = (a.remote_address(), b.remote_address());
    if same_link_addresses(a, b) {
        address_distance(a, b)
    } else {
        None
    }
}

/// Router-id of the candidate link sharing a subnet with any of `anchors`, closest address first.
fn closest_same_link<'s>(
    anchors: &[&Link],
    candidates: impl Iterator<Item = (&'s RouterId, &'s Link)>,
) -> Option<&'s RouterId> {
    candidates
        .filter_map(|(rid, link)| {
            anchors
                .iter()
                .filter_map(|anchor| same_link_distance(anchor, link))
                .min()
                .map(|d| (d, rid))
        })
        .min_by_key(|(d, _)| *d)
        .map(|(_, rid)| rid)
}

/// Runs seeding and every pass over `store`.
pub fn correlate(
    store: &LinkStore,
    seeds: &[(Hostname, RouterId)],
    config: CorrelationConfig,
) -> CorrelationOutcome {
    let mut engine = CorrelationEngine::new(store, config);
    for (host, rid) in seeds {
        engine.seed(host, rid.clone());
    }
    engine.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(host: &str, interface: &str, rid: &str, ip: &str) -> Link {
        Link {
            local_host: host.to_string(),
            local_interface: interface.to_string(),
            remote_router_id: rid.parse().unwrap(),
            remote_ip: ip.to_string(),
            area: "0.0.0.0".to_string(),
            state: "FULL".to_string(),
        }
    }

    fn rid(s: &str) -> RouterId {
        s.parse().unwrap()
    }

    fn seed(host: &str, r: &str) -> (Hostname, RouterId) {
        (host.to_string(), rid(r))
    }

    fn owner<'o>(outcome: &'o CorrelationOutcome, r: &str) -> Option<&'o str> {
        outcome.map.host_of(&rid(r)).map(String::as_str)
    }

    /// R1 - R2 - R3 chain, every link in its own /24.
    fn chain() -> LinkStore {
        LinkStore::from_links(vec![
            link("R1", "ge-0/0/0", "2.2.2.2", "10.0.12.2"),
            link("R2", "ge-0/0/1", "1.1.1.1", "10.0.12.1"),
            link("R2", "ge-0/0/2", "3.3.3.3", "10.0.23.3"),
            link("R3", "ge-0/0/0", "2.2.2.2", "10.0.23.2"),
        ])
    }

    #[test]
    fn test_router_id_map_is_injective() {
        let mut map = RouterIdMap::new();
        assert!(map.insert(rid("1.1.1.1"), "R1"));
        assert!(!map.insert(rid("1.1.1.1"), "R2"));
        assert!(!map.insert(rid("2.2.2.2"), "R1"));
        assert_eq!(map.host_of(&rid("1.1.1.1")).unwrap(), "R1");
        assert_eq!(map.router_id_of("R1"), Some(&rid("1.1.1.1")));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_subnet_adjacency_maps_chain() {
        let store = chain();
        let outcome = correlate(&store, &[], CorrelationConfig::default());
        assert_eq!(owner(&outcome, "1.1.1.1"), Some("R1"));
        assert_eq!(owner(&outcome, "2.2.2.2"), Some("R2"));
        assert_eq!(owner(&outcome, "3.3.3.3"), Some("R3"));
        assert!(outcome.unmapped.is_empty());
        assert_eq!(outcome.count_for(Pass::SubnetAdjacency), 3);
    }

    #[test]
    fn test_closest_evidence_wins_in_shared_slash_24() {
        // /30s carved from one /24: R2 sees R1 at .1 and R3 at .6.
        let store = LinkStore::from_links(vec![
            link("R1", "ge-0/0/0", "2.2.2.2", "10.0.0.2"),
            link("R2", "ge-0/0/0", "9.9.9.1", "10.0.0.1"),
            link("R2", "ge-0/0/1", "0.0.0.3", "10.0.0.6"),
            link("R3", "ge-0/0/0", "2.2.2.2", "10.0.0.5"),
        ]);
        let outcome = correlate(&store, &[], CorrelationConfig::default());
        assert_eq!(owner(&outcome, "9.9.9.1"), Some("R1"));
        assert_eq!(owner(&outcome, "0.0.0.3"), Some("R3"));
        assert_eq!(owner(&outcome, "2.2.2.2"), Some("R2"));
    }

    #[test]
    fn test_parallel_links_listed_in_different_order() {
        // Neither device's first link to the other shares a subnet with the other's first link.
        let store = LinkStore::from_links(vec![
            link("R1", "Gi0/0", "2.2.2.2", "10.0.12.2"),
            link("R1", "Gi0/1", "2.2.2.2", "10.0.21.2"),
            link("R2", "ge-0/0/1", "1.1.1.1", "10.0.21.1"),
            link("R2", "ge-0/0/0", "1.1.1.1", "10.0.12.1"),
        ]);
        let outcome = correlate(&store, &[], CorrelationConfig::default());
        assert_eq!(owner(&outcome, "2.2.2.2"), Some("R2"));
        assert_eq!(owner(&outcome, "1.1.1.1"), Some("R1"));
        assert!(outcome.unmapped.is_empty());
        assert_eq!(outcome.count_for(Pass::SubnetAdjacency), 2);
    }

    #[test]
    fn test_mutual_visibility_on_second_parallel_link() {
        // R3 reaches seeded R2 over two links; R2 lists the matching one last.
        let store = LinkStore::from_links(vec![
            link("R2", "ge-0/0/1", "1.1.1.1", "10.0.12.1"),
            link("R2", "ge-0/0/2", "3.3.3.3", "10.0.23.3"),
            link("R3", "Et1", "2.2.2.2", "10.0.32.2"),
            link("R3", "Et2", "2.2.2.2", "10.0.23.2"),
        ]);
        let mut engine = CorrelationEngine::new(&store, CorrelationConfig::default());
        engine.seed("R2", rid("2.2.2.2"));
        assert_eq!(engine.mutual_visibility(), 1);
        assert_eq!(engine.map.host_of(&rid("3.3.3.3")).unwrap(), "R3");
    }

    /// Link-local A - C - B chain with A seeded. B sorts before C, so elimination reaches B
    /// only on the sweep after C was mapped.
    fn link_local_chain() -> LinkStore {
        LinkStore::from_links(vec![
            link("A", "ge-0/0/0", "3.3.3.3", "fe80::3"),
            link("C", "ge-0/0/0", "1.1.1.1", "fe80::1"),
            link("C", "ge-0/0/1", "2.2.2.2", "fe80::2"),
            link("B", "ge-0/0/0", "3.3.3.3", "fe80::3"),
        ])
    }

    #[test]
    fn test_elimination_converges_over_several_sweeps() {
        let store = link_local_chain();
        let outcome = correlate(&store, &[seed("A", "1.1.1.1")], CorrelationConfig::default());
        assert_eq!(owner(&outcome, "3.3.3.3"), Some("C"));
        assert_eq!(owner(&outcome, "2.2.2.2"), Some("B"));
        assert!(outcome.unmapped.is_empty());
        assert!(outcome.capped.is_empty());

        let b = outcome.assignments.iter().find(|a| a.host == "B").unwrap();
        assert_eq!(b.pass, Pass::LinkLocalElimination);
        assert_eq!(b.iteration, 2);
    }

    #[test]
    fn test_iteration_cap_stops_a_pass() {
        let store = link_local_chain();
        let config = CorrelationConfig {
            max_iterations: 1,
            ..CorrelationConfig::default()
        };
        let outcome = correlate(&store, &[seed("A", "1.1.1.1")], config);
        assert_eq!(outcome.capped, vec![Pass::LinkLocalElimination]);
        assert_eq!(owner(&outcome, "3.3.3.3"), Some("C"));
        assert_eq!(owner(&outcome, "2.2.2.2"), None);
        assert!(outcome.unmapped.contains(&rid("2.2.2.2")));
    }

    #[test]
    fn test_host_never_owns_a_router_id_it_reports() {
        let store = chain();
        let outcome = correlate(&store, &[], CorrelationConfig::default());
        for (r, host) in outcome.map.iter() {
            assert!(!store.reports(host, r), "{host} owns {r} but reports it");
        }
    }

    #[test]
    fn test_seed_conflicts_keep_first() {
        let store = chain();
        let mut engine = CorrelationEngine::new(&store, CorrelationConfig::default());
        assert!(engine.seed("R1", rid("1.1.1.1")));
        assert!(!engine.seed("R9", rid("1.1.1.1")));
        assert!(!engine.seed("R1", rid("7.7.7.7")));
        let outcome = engine.run();
        assert_eq!(owner(&outcome, "1.1.1.1"), Some("R1"));
        assert_eq!(outcome.assignments[0].pass, Pass::Seed);
        assert!(outcome.map.host_of(&rid("7.7.7.7")).is_none());
    }

    /// R2 is seeded; R3 sees R2 on 10.0.23.0/24. R1 left no capture.
    fn partial_capture() -> LinkStore {
        LinkStore::from_links(vec![
            link("R2", "ge-0/0/1", "1.1.1.1", "10.0.12.1"),
            link("R2", "ge-0/0/2", "3.3.3.3", "10.0.23.3"),
            link("R3", "ge-0/0/0", "2.2.2.2", "10.0.23.2"),
            link("R3", "ge-0/0/5", "5.5.5.5", "10.0.35.5"),
        ])
    }

    #[test]
    fn test_mutual_visibility_sweep() {
        let store = partial_capture();
        let mut engine = CorrelationEngine::new(&store, CorrelationConfig::default());
        engine.seed("R2", rid("2.2.2.2"));
        assert_eq!(engine.mutual_visibility(), 1);
        assert_eq!(engine.map.host_of(&rid("3.3.3.3")).unwrap(), "R3");
        assert_eq!(engine.mutual_visibility(), 0);
    }

    #[test]
    fn test_reverse_neighbor_sweep() {
        let store = partial_capture();
        let mut engine = CorrelationEngine::new(&store, CorrelationConfig::default());
        engine.seed("R2", rid("2.2.2.2"));
        assert_eq!(engine.reverse_neighbor(), 1);
        assert_eq!(engine.map.host_of(&rid("3.3.3.3")).unwrap(), "R3");
        assert!(engine.map.host_of(&rid("1.1.1.1")).is_none());
    }

    #[test]
    fn test_ospfv3_link_local_pair_via_elimination() {
        let mut a = link("A", "ge-0/0/0", "2.2.2.2", "fe80::2");
        let mut b = link("B", "ge-0/0/1", "1.1.1.1", "fe80::1");
        a.area.clear();
        b.area.clear();
        let store = LinkStore::from_links(vec![a, b]);
        let outcome = correlate(&store, &[seed("A", "1.1.1.1")], CorrelationConfig::default());
        assert_eq!(owner(&outcome, "2.2.2.2"), Some("B"));
        let assignment = outcome
            .assignments
            .iter()
            .find(|a| a.router_id == rid("2.2.2.2"))
            .unwrap();
        assert_eq!(assignment.pass, Pass::LinkLocalElimination);
    }

    #[test]
    fn test_link_local_without_seed_stays_unmapped() {
        let store = LinkStore::from_links(vec![
            link("A", "ge-0/0/0", "2.2.2.2", "fe80::2"),
            link("B", "ge-0/0/1", "1.1.1.1", "fe80::1"),
        ]);
        let outcome = correlate(&store, &[], CorrelationConfig::default());
        assert_eq!(outcome.map.len(), 0);
        assert_eq!(outcome.unmapped.len(), 2);
    }

    #[test]
    fn test_neighborhood_pattern_uses_subinterface_units() {
        let store = LinkStore::from_links(vec![
            link("A", "ae0.120", "2.2.2.2", "fe80::2"),
            link("A", "ae0.130", "3.3.3.3", "fe80::3"),
            link("B", "xe-0/0/0.120", "1.1.1.1", "fe80::1"),
            link("C", "et-0/0/0.130", "1.1.1.1", "fe80::1"),
        ]);
        let outcome = correlate(&store, &[seed("A", "1.1.1.1")], CorrelationConfig::default());
        assert_eq!(owner(&outcome, "2.2.2.2"), Some("B"));
        assert_eq!(owner(&outcome, "3.3.3.3"), Some("C"));
        assert_eq!(outcome.count_for(Pass::NeighborhoodPattern), 2);
    }

    fn shared_vlan() -> LinkStore {
        LinkStore::from_links(vec![
            link("T", "ae0.120", "9.9.9.9", "fe80::9"),
            link("H1", "xe-0/0/0.120", "1.1.1.1", "fe80::1"),
            link("H2", "xe-0/0/3.120", "1.1.1.1", "fe80::1"),
        ])
    }

    #[test]
    fn test_neighborhood_tie_strict_leaves_unmapped() {
        let store = shared_vlan();
        let outcome = correlate(&store, &[seed("T", "1.1.1.1")], CorrelationConfig::default());
        assert!(outcome.unmapped.contains(&rid("9.9.9.9")));
    }

    #[test]
    fn test_neighborhood_tie_first_candidate() {
        let store = shared_vlan();
        let config = CorrelationConfig {
            tie_break: TieBreak::FirstCandidate,
            ..CorrelationConfig::default()
        };
        let outcome = correlate(&store, &[seed("T", "1.1.1.1")], config);
        assert_eq!(owner(&outcome, "9.9.9.9"), Some("H1"));
    }

    #[test]
    fn test_correlation_is_deterministic() {
        let store = chain();
        let first = correlate(&store, &[], CorrelationConfig::default());
        let second = correlate(&store, &[], CorrelationConfig::default());
        assert_eq!(first.map, second.map);
        assert_eq!(first.assignments, second.assignments);
    }

    #[test]
    fn test_assignments_are_never_overwritten() {
        let store = chain();
        let outcome = correlate(&store, &[seed("R1", "1.1.1.1")], CorrelationConfig::default());
        for a in &outcome.assignments {
            assert_eq!(outcome.map.host_of(&a.router_id), Some(&a.host));
        }
        let mut rids: Vec<_> = outcome.assignments.iter().map(|a| &a.router_id).collect();
        rids.sort();
        rids.dedup();
        assert_eq!(rids.len(), outcome.assignments.len());
    }
}
