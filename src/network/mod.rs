/*
 * This module defines the value types shared by parsing, correlation and output:
 * router-ids, neighbor addresses and the same-link test, link records, and the
 * serializable topology with its graph view.
 */

pub mod address;
pub mod link;
pub mod network_graph;
pub mod node;
pub mod router;
