//! Points-to Graph
//!
//! Solved relation from method locals to abstract locations, queried by the
//! purity oracle and the array reference stage through `PointsToOracle`.

use super::abstract_location::{AbstractLocation, LocationId};
use crate::shared::ports::{PointsToOracle, VarKey};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct PointsToGraph {
    points_to: FxHashMap<VarKey, BTreeSet<LocationId>>,
    locations: Vec<AbstractLocation>,
    pub stats: GraphStats,
}

#[derive(Debug, Clone, Default)]
pub struct GraphStats {
    pub total_variables: usize,
    pub total_locations: usize,
    pub max_points_to_size: usize,
}

impl PointsToGraph {
    pub fn new(
        points_to: FxHashMap<VarKey, BTreeSet<LocationId>>,
        locations: Vec<AbstractLocation>,
    ) -> Self {
        let stats = GraphStats {
            total_variables: points_to.len(),
            total_locations: locations.len(),
            max_points_to_size: points_to.values().map(BTreeSet::len).max().unwrap_or(0),
        };
        Self {
            points_to,
            locations,
            stats,
        }
    }

    pub fn points_to(&self, var: VarKey) -> Option<&BTreeSet<LocationId>> {
        self.points_to.get(&var)
    }

    pub fn location(&self, id: LocationId) -> Option<&AbstractLocation> {
        self.locations.get(id as usize)
    }
}

impl PointsToOracle for PointsToGraph {
    fn may_alias(&self, a: VarKey, b: VarKey) -> bool {
        if a == b {
            return true;
        }
        match (self.points_to.get(&a), self.points_to.get(&b)) {
            (Some(pa), Some(pb)) => !pa.is_disjoint(pb),
            _ => false,
        }
    }
}
