//! Probe against hand-built hosts with damaged structures

use active_handles::{
    CallbackRef, Handle, HandleId, HandleKind, HostView, IoField, IoObject, NodeId, Probe,
    ProbeOptions, Reflect, Reflection, TimerNode, UNKNOWN_FUNCTION_NAME,
};

#[derive(Default)]
struct FixtureHost {
    handles: Vec<Handle>,
    nodes: Vec<Option<TimerNode>>,
}

impl FixtureHost {
    fn node(&mut self, msecs: u64, callback: Option<CallbackRef>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(TimerNode {
            idle_timeout: msecs,
            on_timeout: callback,
            ..Default::default()
        }));
        id
    }

    fn link(&mut self, from: NodeId, to: NodeId) {
        if let Some(Some(node)) = self.nodes.get_mut(from.index()) {
            node.idle_next = Some(to);
        }
    }

    fn timer_root(&mut self, head: NodeId) -> HandleId {
        self.push_handle(Some(head), None)
    }

    fn push_handle(&mut self, idle_next: Option<NodeId>, io: Option<IoObject>) -> HandleId {
        let id = HandleId::new(self.handles.len() as u64 + 1);
        self.handles.push(Handle {
            id,
            type_name: "Fixture".to_string(),
            idle_next,
            io,
        });
        id
    }
}

impl HostView for FixtureHost {
    fn active_handles(&self) -> Vec<&Handle> {
        self.handles.iter().collect()
    }

    fn handle(&self, id: HandleId) -> Option<&Handle> {
        self.handles.iter().find(|h| h.id == id)
    }

    fn timer_node(&self, id: NodeId) -> Option<&TimerNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }
}

fn named(name: &str) -> CallbackRef {
    CallbackRef::new(
        || {},
        active_handles::RegistrationMetadata {
            declared_name: Some(name.to_string()),
            ..Default::default()
        },
    )
}

#[test]
fn test_cycle_without_head_terminates() {
    let mut host = FixtureHost::default();
    let a = host.node(10, Some(named("a")));
    let b = host.node(10, Some(named("b")));
    host.link(a, b);
    host.link(b, a);
    host.timer_root(a);

    let found = Probe::new(&host).enumerate(&ProbeOptions::default());
    let names: Vec<&str> = found.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_self_loop_terminates() {
    let mut host = FixtureHost::default();
    let a = host.node(10, Some(named("a")));
    host.link(a, a);
    host.timer_root(a);

    assert_eq!(Probe::new(&host).enumerate(&ProbeOptions::default()).len(), 1);
}

#[test]
fn test_cycle_entered_midway() {
    let mut host = FixtureHost::default();
    let a = host.node(10, Some(named("a")));
    let b = host.node(10, Some(named("b")));
    let c = host.node(10, Some(named("c")));
    host.link(a, b);
    host.link(b, c);
    host.link(c, b);
    host.timer_root(a);

    assert_eq!(Probe::new(&host).enumerate(&ProbeOptions::default()).len(), 3);
}

#[test]
fn test_vanished_node_stops_walk() {
    let mut host = FixtureHost::default();
    let a = host.node(10, Some(named("a")));
    host.link(a, NodeId(99));
    host.timer_root(a);

    let found = Probe::new(&host).enumerate(&ProbeOptions::default());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "a");
}

#[test]
fn test_shared_chain_described_once() {
    let mut host = FixtureHost::default();
    let a = host.node(10, Some(named("a")));
    let b = host.node(10, Some(named("b")));
    host.link(a, b);
    host.timer_root(a);
    host.timer_root(b);

    let found = Probe::new(&host).enumerate(&ProbeOptions::default());
    assert_eq!(found.len(), 2);
}

#[test]
fn test_malformed_socket_skipped() {
    let mut host = FixtureHost::default();
    let a = host.node(10, Some(named("a")));
    let broken = IoObject {
        fd: Some(3),
        fields: vec![
            IoField::callback("onread", named("first")),
            IoField::callback("onread", named("second")),
        ],
    };
    host.push_handle(Some(a), Some(broken));
    host.push_handle(
        None,
        Some(IoObject {
            fd: Some(4),
            fields: vec![IoField::callback("onconnection", named("server"))],
        }),
    );

    let found = Probe::new(&host).enumerate(&ProbeOptions::default());
    let names: Vec<&str> = found.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["a", "server"]);
    assert_eq!(found[1].kind, HandleKind::InboundConnectionAccept);
    assert_eq!(found[1].file_descriptor, Some(4));
}

struct Blind;

impl Reflect for Blind {
    fn reflect(&self, _callback: &CallbackRef) -> Reflection {
        Reflection::default()
    }
}

#[test]
fn test_blind_reflection_degrades_to_sentinel() {
    let mut host = FixtureHost::default();
    let a = host.node(10, Some(named("a")));
    host.timer_root(a);

    let found = Probe::new(&host)
        .with_reflect(&Blind)
        .enumerate(&ProbeOptions::default());
    assert_eq!(found[0].name, UNKNOWN_FUNCTION_NAME);
    assert!(found[0].anonymous);
    assert!(found[0].location.is_none());
    assert_eq!(found[0].delay_millis, Some(10));
}
