//! Solo room example: plays a single-player room to completion.
//!
//! Generates the room's graph, then repeatedly combines the first
//! explorable pair, checks the products' locations, and feeds back the
//! items a vanilla single-player world would hold at those locations:
//! intermediates reward themselves, compounds reward the next base element.
//!
//! Run with: `cargo run -p elementipelago-core --example solo_room`

use elementipelago_core::element::{Element, ElementKind, NON_ELEMENT_ITEMS};
use elementipelago_core::session::{
    ReceivedItem, RoomSnapshot, Session, SessionClient, SessionConfig, SessionEvent,
};

/// Stand-in for the multiplayer server.
struct LocalServer {
    next_input: u32,
    element_amount: u32,
    next_item_id: u32,
    goal_declared: bool,
}

impl LocalServer {
    fn item(&mut self, element: Element) -> ReceivedItem {
        self.next_item_id += 1;
        ReceivedItem {
            name: element.to_string(),
            id: self.next_item_id,
        }
    }

    /// Items found at the given locations.
    fn rewards(&mut self, products: &[Element]) -> Vec<ReceivedItem> {
        let mut items = Vec::new();
        for product in products {
            match product.kind {
                ElementKind::Intermediate => items.push(self.item(*product)),
                ElementKind::Output if self.next_input <= self.element_amount => {
                    let input = Element::input(self.next_input);
                    self.next_input += 1;
                    items.push(self.item(input));
                }
                _ => {}
            }
        }
        items
    }
}

impl SessionClient for LocalServer {
    fn declare_goal(&mut self) {
        self.goal_declared = true;
    }
}

fn main() {
    let config = SessionConfig {
        graph_seed: 2_827_108,
        element_amount: 10,
        compound_amount: 40,
        intermediate_amount: 15,
        compounds_are_ingredients: false,
    };

    let snapshot = RoomSnapshot::fresh(&config);
    let mut session = Session::start(config.clone(), &snapshot).expect("room generates");
    println!(
        "Generated {} placements, {} recipe pairs",
        session.graph().edges().len(),
        session.graph().recipes().len()
    );

    let mut server = LocalServer {
        next_input: 5,
        element_amount: config.element_amount,
        next_item_id: NON_ELEMENT_ITEMS,
        goal_declared: false,
    };
    let start: Vec<ReceivedItem> = session
        .graph()
        .start_elements()
        .map(|el| server.item(el))
        .collect();
    session.on_items_received(&start);
    session.dispatch_events(&mut server);

    let mut combinations = 0;
    loop {
        let reach = session.reachability();
        let next = session.graph().recipes().iter().find_map(|(pair, outputs)| {
            let ready = reach.in_drawer(&pair.first()) && reach.in_drawer(&pair.second());
            let new = outputs.iter().any(|o| !reach.sent().contains(o));
            (ready && new).then(|| outputs.to_vec())
        });
        let Some(products) = next else {
            break;
        };
        combinations += 1;

        let checks = Session::location_checks(&products);
        session.on_locations_checked(&checks);
        let rewards = server.rewards(&products);
        session.on_items_received(&rewards);

        for event in session.dispatch_events(&mut server) {
            if let SessionEvent::LocationChecked { element, .. } = event {
                println!("  [{combinations:>3}] discovered {element}");
            }
        }
    }

    let reach = session.reachability();
    println!(
        "After {combinations} combinations: {} in drawer, {} explorable, {} exhausted",
        reach.drawer().len(),
        reach.explorable().len(),
        reach.exhausted().len()
    );
    println!(
        "Goal: {} ({} intermediates still missing)",
        if server.goal_declared { "reached" } else { "not reached" },
        session.goal().needed().len()
    );
}
