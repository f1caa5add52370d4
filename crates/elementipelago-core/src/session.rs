//! A player's session: the generated graph plus the drawer state it drives.
//!
//! The multiplayer client feeds two kinds of events into a [`Session`]:
//! items received and locations checked. Each event is applied, the drawer
//! is recomputed, and any resulting [`SessionEvent`]s are queued for the
//! caller to drain. The goal is forwarded to the server through the
//! [`SessionClient`] seam.

use crate::element::{Element, ElementKind, NON_ELEMENT_ITEMS};
use crate::goal::GoalTracker;
use crate::graph::{Graph, GraphConfig, GraphError};
use crate::reachability::Reachability;
use serde::{Deserialize, Serialize};

/// Base elements every player starts with.
pub const START_ITEMS: u32 = 4;

/// Field size before any "Progressive Item Limit" upgrade.
pub const BASE_FIELD_SIZE: u32 = 10;

// ---------------------------------------------------------------------------
// Configuration and inputs
// ---------------------------------------------------------------------------

/// Room configuration handed out by the server. Fixed for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub graph_seed: u64,
    pub element_amount: u32,
    pub compound_amount: u32,
    pub intermediate_amount: u32,
    pub compounds_are_ingredients: bool,
}

impl SessionConfig {
    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            seed: self.graph_seed,
            inputs: self.element_amount,
            outputs: self.compound_amount,
            intermediates: self.intermediate_amount,
            start_items: START_ITEMS,
            compounds_are_ingredients: self.compounds_are_ingredients,
        }
    }

    /// Whether `element` is one of this room's discoverable elements.
    pub fn has_location(&self, element: &Element) -> bool {
        let amount = match element.kind {
            ElementKind::Input => return false,
            ElementKind::Intermediate => self.intermediate_amount,
            ElementKind::Output => self.compound_amount,
        };
        (1..=amount).contains(&element.id)
    }
}

/// An item delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedItem {
    pub name: String,
    pub id: u32,
}

/// Room state at connection time, used to resume a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    #[serde(default)]
    pub received: Vec<ReceivedItem>,
    #[serde(default)]
    pub checked_locations: Vec<u32>,
    #[serde(default)]
    pub missing_locations: Vec<u32>,
}

impl RoomSnapshot {
    /// A room nobody has played yet: every compound and intermediate
    /// location is missing.
    pub fn fresh(config: &SessionConfig) -> Self {
        let missing_locations = (1..=config.compound_amount)
            .map(Element::output)
            .chain((1..=config.intermediate_amount).map(Element::intermediate))
            .filter_map(|el| el.location_id())
            .collect();
        Self {
            missing_locations,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Upgrades
// ---------------------------------------------------------------------------

/// Non-element items that change the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upgrade {
    ProgressiveFilter,
    ProgressiveItemLimit,
}

impl Upgrade {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Progressive Filter" => Some(Upgrade::ProgressiveFilter),
            "Progressive Item Limit" => Some(Upgrade::ProgressiveItemLimit),
            _ => None,
        }
    }
}

/// Current upgrade levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    pub progressive_filter: u32,
    pub field_size: u32,
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            progressive_filter: 0,
            field_size: BASE_FIELD_SIZE,
        }
    }
}

impl Upgrades {
    fn apply(&mut self, upgrade: Upgrade) {
        match upgrade {
            Upgrade::ProgressiveFilter => self.progressive_filter += 1,
            Upgrade::ProgressiveItemLimit => self.field_size += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events emitted by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new element entered the player's inventory.
    ElementReceived(Element),

    /// An upgrade item arrived.
    UpgradeReceived(Upgrade),

    /// A location was checked for the first time.
    LocationChecked { location: u32, element: Element },

    /// Every intermediate has been discovered. Emitted once per session.
    GoalReached,
}

/// The server-facing side of the multiplayer client.
pub trait SessionClient {
    /// Tell the server this slot has completed its goal.
    fn declare_goal(&mut self);
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    graph: Graph,
    reachability: Reachability,
    goal: GoalTracker,
    upgrades: Upgrades,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Generate the room's graph and replay the room snapshot into it.
    ///
    /// If the snapshot has no intermediate locations left, the goal is
    /// reached immediately.
    pub fn start(config: SessionConfig, snapshot: &RoomSnapshot) -> Result<Self, GraphError> {
        let graph = config.graph_config().build()?;
        let mut session = Self {
            reachability: Reachability::new(config.compounds_are_ingredients),
            goal: GoalTracker::from_missing(
                snapshot.missing_locations.iter().copied(),
                config.intermediate_amount,
            ),
            config,
            graph,
            upgrades: Upgrades::default(),
            events: Vec::new(),
        };

        session.extend_received(&snapshot.received);
        session.extend_sent(&snapshot.checked_locations);
        session.refresh();
        session.check_goal(&[]);

        Ok(session)
    }

    // -- Event API --

    /// Apply items delivered by the server.
    pub fn on_items_received(&mut self, items: &[ReceivedItem]) {
        self.extend_received(items);
        self.refresh();
    }

    /// Apply newly checked locations.
    pub fn on_locations_checked(&mut self, locations: &[u32]) {
        self.extend_sent(locations);
        self.refresh();
        self.check_goal(locations);
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get a read-only view of pending events.
    pub fn pending_events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Drain pending events, declaring the goal to `client` if it was
    /// reached. Returns the drained events.
    pub fn dispatch_events(&mut self, client: &mut impl SessionClient) -> Vec<SessionEvent> {
        let events = self.drain_events();
        if events.contains(&SessionEvent::GoalReached) {
            client.declare_goal();
        }
        events
    }

    // -- Query API --

    /// Whether the named element is explorable. Unknown names are not.
    pub fn is_explorable(&self, name: &str) -> bool {
        Element::parse(name).is_some_and(|el| self.reachability.is_explorable(&el))
    }

    /// Whether the named element is exhausted. Unknown names are not.
    pub fn is_exhausted(&self, name: &str) -> bool {
        Element::parse(name).is_some_and(|el| self.reachability.is_exhausted(&el))
    }

    /// Products of combining two elements on the playfield.
    pub fn combine(&self, a: &Element, b: &Element) -> Option<&[Element]> {
        self.graph.combine(a, b)
    }

    /// Location ids to report for discovered products.
    pub fn location_checks(products: &[Element]) -> Vec<u32> {
        products.iter().filter_map(Element::location_id).collect()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn reachability(&self) -> &Reachability {
        &self.reachability
    }

    pub fn goal(&self) -> &GoalTracker {
        &self.goal
    }

    pub fn upgrades(&self) -> &Upgrades {
        &self.upgrades
    }

    // -- Internal helpers --

    fn extend_received(&mut self, items: &[ReceivedItem]) {
        for item in items {
            if item.id < NON_ELEMENT_ITEMS {
                if let Some(upgrade) = Upgrade::from_name(&item.name) {
                    self.upgrades.apply(upgrade);
                    self.events.push(SessionEvent::UpgradeReceived(upgrade));
                }
                continue;
            }

            let Some(element) = Element::parse(&item.name) else {
                log::warn!("ignoring received item {:?} (id {})", item.name, item.id);
                continue;
            };
            if self.reachability.receive(element) {
                self.events.push(SessionEvent::ElementReceived(element));
            }
        }
    }

    fn extend_sent(&mut self, locations: &[u32]) {
        for &location in locations {
            let Some(element) = Element::from_location_id(location)
                .filter(|el| self.config.has_location(el))
            else {
                log::warn!("ignoring unknown location {location}");
                continue;
            };
            if self.reachability.mark_sent(element) {
                self.events
                    .push(SessionEvent::LocationChecked { location, element });
            }
        }
    }

    fn refresh(&mut self) {
        self.reachability.recompute(self.graph.recipes());
    }

    fn check_goal(&mut self, locations: &[u32]) {
        self.goal.check(locations);
        if self.goal.evaluate() {
            log::info!("goal reached for seed {}", self.config.graph_seed);
            self.events.push(SessionEvent::GoalReached);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::LOCATION_AMOUNT;
    use crate::test_utils::*;

    #[derive(Default)]
    struct RecordingClient {
        goals: u32,
    }

    impl SessionClient for RecordingClient {
        fn declare_goal(&mut self) {
            self.goals += 1;
        }
    }

    fn intermediate_locations(config: &SessionConfig) -> Vec<u32> {
        (1..=config.intermediate_amount)
            .map(|id| LOCATION_AMOUNT + id)
            .collect()
    }

    fn fresh_snapshot(config: &SessionConfig) -> RoomSnapshot {
        RoomSnapshot::fresh(config)
    }

    fn start_received(session: &Session) -> Vec<ReceivedItem> {
        session
            .graph()
            .start_elements()
            .enumerate()
            .map(|(i, el)| received(el, NON_ELEMENT_ITEMS + i as u32))
            .collect()
    }

    #[test]
    fn graph_config_uses_four_start_items() {
        let cfg = sample_session_config().graph_config();
        assert_eq!(cfg.start_items, START_ITEMS);
        assert_eq!(cfg.inputs, 10);
        assert_eq!(cfg.outputs, 40);
        assert_eq!(cfg.intermediates, 15);
    }

    #[test]
    fn received_start_elements_become_explorable() {
        let config = sample_session_config();
        let mut session = Session::start(config.clone(), &fresh_snapshot(&config)).unwrap();
        let items = start_received(&session);

        session.on_items_received(&items);

        // The first layer always combines start elements.
        assert!(!session.reachability().explorable().is_empty());
        for name in session.reachability().explorable().iter().map(Element::to_string) {
            assert!(session.is_explorable(&name));
            assert!(!session.is_exhausted(&name));
        }
        let received_events = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::ElementReceived(_)))
            .count();
        assert_eq!(received_events, START_ITEMS as usize);
    }

    #[test]
    fn malformed_names_are_lookup_misses() {
        let config = sample_session_config();
        let mut session = Session::start(config.clone(), &fresh_snapshot(&config)).unwrap();
        session.on_items_received(&[ReceivedItem {
            name: "Philosopher's Stone".to_string(),
            id: 500,
        }]);

        assert!(session.reachability().received().is_empty());
        assert!(!session.is_explorable("Philosopher's Stone"));
        assert!(!session.is_exhausted("Element"));
    }

    #[test]
    fn upgrades_are_counted_not_received() {
        let config = sample_session_config();
        let mut session = Session::start(config.clone(), &fresh_snapshot(&config)).unwrap();
        session.on_items_received(&[
            ReceivedItem {
                name: "Progressive Filter".to_string(),
                id: 1,
            },
            ReceivedItem {
                name: "Progressive Item Limit".to_string(),
                id: 2,
            },
            ReceivedItem {
                name: "Progressive Item Limit".to_string(),
                id: 2,
            },
            ReceivedItem {
                name: "TODO".to_string(),
                id: 3,
            },
        ]);

        assert_eq!(session.upgrades().progressive_filter, 1);
        assert_eq!(session.upgrades().field_size, BASE_FIELD_SIZE + 2);
        assert!(session.reachability().received().is_empty());
        assert_eq!(session.drain_events().len(), 3);
    }

    #[test]
    fn checked_locations_are_sent() {
        let config = sample_session_config();
        let mut session = Session::start(config.clone(), &fresh_snapshot(&config)).unwrap();
        session.on_locations_checked(&[5, LOCATION_AMOUNT + 2, 0]);

        let sent: Vec<_> = session.reachability().sent().iter().copied().collect();
        assert_eq!(sent, vec![Element::intermediate(2), Element::output(5)]);
        assert_eq!(
            session.drain_events(),
            vec![
                SessionEvent::LocationChecked {
                    location: 5,
                    element: Element::output(5)
                },
                SessionEvent::LocationChecked {
                    location: LOCATION_AMOUNT + 2,
                    element: Element::intermediate(2)
                },
            ]
        );
    }

    #[test]
    fn locations_outside_the_room_are_skipped() {
        let config = sample_session_config();
        let mut session = Session::start(config.clone(), &fresh_snapshot(&config)).unwrap();
        session.on_locations_checked(&[LOCATION_AMOUNT + 999, 1500, LOCATION_AMOUNT + 16, 41]);

        assert!(session.reachability().sent().is_empty());
        assert!(session.drain_events().is_empty());

        session.on_locations_checked(&[40, LOCATION_AMOUNT + 15]);
        let sent: Vec<_> = session.reachability().sent().iter().copied().collect();
        assert_eq!(sent, vec![Element::intermediate(15), Element::output(40)]);
    }

    #[test]
    fn out_of_range_compounds_stay_out_of_the_drawer() {
        let config = SessionConfig {
            compounds_are_ingredients: true,
            ..sample_session_config()
        };
        let mut session = Session::start(config.clone(), &fresh_snapshot(&config)).unwrap();
        session.on_locations_checked(&[1500]);

        assert!(!session.reachability().in_drawer(&Element::output(1500)));
        assert!(session.reachability().drawer().is_empty());
    }

    #[test]
    fn has_location_follows_room_amounts() {
        let config = sample_session_config();
        assert!(config.has_location(&Element::output(1)));
        assert!(config.has_location(&Element::output(40)));
        assert!(!config.has_location(&Element::output(41)));
        assert!(config.has_location(&Element::intermediate(15)));
        assert!(!config.has_location(&Element::intermediate(16)));
        assert!(!config.has_location(&Element::input(1)));
    }

    #[test]
    fn goal_fires_once_after_last_intermediate() {
        let config = sample_session_config();
        let mut session = Session::start(config.clone(), &fresh_snapshot(&config)).unwrap();
        let mut client = RecordingClient::default();
        let locations = intermediate_locations(&config);
        let (last, rest) = locations.split_last().unwrap();

        session.on_locations_checked(rest);
        session.dispatch_events(&mut client);
        assert_eq!(client.goals, 0);
        assert!(!session.goal().is_reached());

        session.on_locations_checked(&[*last]);
        let events = session.dispatch_events(&mut client);
        assert!(events.contains(&SessionEvent::GoalReached));
        assert_eq!(client.goals, 1);

        session.on_locations_checked(&[*last, 1]);
        session.dispatch_events(&mut client);
        assert_eq!(client.goals, 1);
    }

    #[test]
    fn completed_room_reaches_goal_on_start() {
        let config = sample_session_config();
        let snapshot = RoomSnapshot {
            checked_locations: intermediate_locations(&config),
            ..RoomSnapshot::default()
        };
        let mut session = Session::start(config, &snapshot).unwrap();
        assert!(session.goal().is_reached());
        assert_eq!(
            session.drain_events().last(),
            Some(&SessionEvent::GoalReached)
        );
    }

    #[test]
    fn combine_products_map_to_locations() {
        let config = sample_session_config();
        let session = Session::start(config.clone(), &fresh_snapshot(&config)).unwrap();

        let (pair, outputs) = session.graph().recipes().iter().next().unwrap();
        let products = session.combine(&pair.second(), &pair.first()).unwrap();
        assert_eq!(products, outputs);

        let checks = Session::location_checks(products);
        let expected: Vec<u32> = outputs.iter().filter_map(Element::location_id).collect();
        assert_eq!(checks, expected);
        assert_eq!(Session::location_checks(&[Element::input(1)]), Vec::<u32>::new());
    }

    #[test]
    fn fresh_snapshot_misses_every_location() {
        let config = sample_session_config();
        let snapshot = RoomSnapshot::fresh(&config);
        assert_eq!(snapshot.missing_locations.len(), 40 + 15);
        assert_eq!(snapshot.missing_locations.first(), Some(&1));
        assert_eq!(snapshot.missing_locations.last(), Some(&(LOCATION_AMOUNT + 15)));

        let session = Session::start(config, &snapshot).unwrap();
        assert_eq!(session.goal().needed().len(), 15);
    }

    #[test]
    fn unsatisfiable_room_fails_to_start() {
        let config = SessionConfig {
            graph_seed: 1,
            element_amount: 3,
            compound_amount: 5,
            intermediate_amount: 5,
            compounds_are_ingredients: false,
        };
        let err = Session::start(config, &RoomSnapshot::default()).unwrap_err();
        assert!(matches!(err, GraphError::TooManyStartItems { .. }));
    }
}
