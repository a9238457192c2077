//! Fluent builder for constructing the entity stores in one step.
//!
//! # Usage
//!
//! ```rust
//! use wh_core::{NodeId, Tick};
//! use wh_model::WorldBuilder;
//! use wh_model::station::StationKind;
//!
//! let mut b = WorldBuilder::new();
//! let bot = b.add_bot(0, NodeId(0));
//! let pod = b.add_pod(0, NodeId(1), vec![]);
//! let station = b.add_station(StationKind::Output, 0, NodeId(2), 4);
//! let world = b.build();
//! assert_eq!(world.bots.len(), 1);
//! let _ = (bot, pod, station);
//! ```

use std::collections::HashMap;

use wh_core::{BotId, ItemId, NodeId, OrderId, PodId, StationId, Tick};

use crate::bot::Bot;
use crate::order::Order;
use crate::pod::Pod;
use crate::station::{Station, StationKind};
use crate::store::{BotStore, OrderStore, PodStore, StationStore};

/// All entity stores for one warehouse instance.
pub struct World {
    pub pods: PodStore,
    pub bots: BotStore,
    pub stations: StationStore,
    pub orders: OrderStore,
}

/// Accumulates pods, bots, stations, and orders, then produces a [`World`].
#[derive(Default)]
pub struct WorldBuilder {
    pods: Vec<Pod>,
    bots: Vec<Bot>,
    stations: Vec<Station>,
    orders: Vec<Order>,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pod(&mut self, tier: u8, node: NodeId, contained: Vec<(ItemId, u32)>) -> PodId {
        let id = PodId(self.pods.len() as u32);
        let contained: HashMap<ItemId, u32> = contained.into_iter().collect();
        self.pods.push(Pod::new(id, tier, node, contained));
        id
    }

    pub fn add_bot(&mut self, tier: u8, node: NodeId) -> BotId {
        let id = BotId(self.bots.len() as u32);
        self.bots.push(Bot::new(id, tier, node));
        id
    }

    pub fn add_station(&mut self, kind: StationKind, tier: u8, node: NodeId, capacity: u32) -> StationId {
        let id = StationId(self.stations.len() as u16);
        self.stations.push(Station::new(id, kind, tier, node, capacity));
        id
    }

    pub fn add_order(&mut self, positions: Vec<(ItemId, u32)>, time_placed: Tick, due_time: Tick) -> OrderId {
        let id = OrderId(self.orders.len() as u32);
        self.orders.push(Order::new(id, positions, time_placed, due_time));
        id
    }

    pub fn build(self) -> World {
        World {
            pods: PodStore::new(self.pods),
            bots: BotStore::new(self.bots),
            stations: StationStore::new(self.stations),
            orders: OrderStore::new(self.orders),
        }
    }
}
