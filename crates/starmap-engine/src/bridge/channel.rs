use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::bridge::protocol::{MapCommand, MapNotification};

#[derive(Debug, Default)]
struct ChannelState {
    /// Listener count per command name.
    listeners: HashMap<&'static str, usize>,
    inbox: VecDeque<MapCommand>,
    outbox: Vec<MapNotification>,
}

/// Command inbox plus notification outbox shared by the engine and the
/// application. Clones share the same queues.
///
/// Commands nobody subscribed to are dropped on send, like events on a bus
/// with no listener.
#[derive(Debug, Clone, Default)]
pub struct MapChannel {
    state: Rc<RefCell<ChannelState>>,
}

impl MapChannel {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Application side ----

    /// Queue a command. Returns false if nothing listens for it.
    pub fn send(&self, command: MapCommand) -> bool {
        let mut state = self.state.borrow_mut();
        if state.listeners.get(command.name()).copied().unwrap_or(0) == 0 {
            log::debug!("dropping {} command: no listener", command.name());
            return false;
        }
        state.inbox.push_back(command);
        true
    }

    /// Decode and queue a JSON command.
    pub fn send_json(&self, json: &str) -> Result<bool, serde_json::Error> {
        let command = MapCommand::from_json(json)?;
        Ok(self.send(command))
    }

    pub fn drain_notifications(&self) -> Vec<MapNotification> {
        std::mem::take(&mut self.state.borrow_mut().outbox)
    }

    /// Drain notifications as a JSON array.
    pub fn drain_notifications_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.drain_notifications())
    }

    pub fn has_listener(&self, name: &str) -> bool {
        self.state.borrow().listeners.get(name).copied().unwrap_or(0) > 0
    }

    // ---- Engine side ----

    /// Listen for the named commands until the returned handle is torn down.
    pub fn subscribe(&self, names: &[&'static str]) -> Subscription {
        let mut state = self.state.borrow_mut();
        for name in names {
            *state.listeners.entry(*name).or_insert(0) += 1;
        }
        Subscription {
            channel: Some(self.clone()),
            names: names.to_vec(),
        }
    }

    pub fn next_command(&self) -> Option<MapCommand> {
        self.state.borrow_mut().inbox.pop_front()
    }

    pub fn notify(&self, notification: MapNotification) {
        log::debug!("notify {}", notification.name());
        self.state.borrow_mut().outbox.push(notification);
    }

    pub fn pending_commands(&self) -> usize {
        self.state.borrow().inbox.len()
    }
}

/// Teardown handle for a set of command listeners.
///
/// All listeners go at once; calling [`Subscription::unsubscribe`] again is a
/// no-op. Dropping the handle unsubscribes too.
#[derive(Debug)]
pub struct Subscription {
    channel: Option<MapChannel>,
    names: Vec<&'static str>,
}

impl Subscription {
    /// Detach every listener. Returns false if already detached.
    pub fn unsubscribe(&mut self) -> bool {
        let Some(channel) = self.channel.take() else {
            return false;
        };

        let mut state = channel.state.borrow_mut();
        for name in &self.names {
            if let Some(count) = state.listeners.get_mut(name) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    state.listeners.remove(name);
                }
            }
        }
        // Commands queued for listeners that no longer exist are stale.
        let ChannelState { listeners, inbox, .. } = &mut *state;
        inbox.retain(|c| listeners.contains_key(c.name()));
        true
    }

    pub fn is_active(&self) -> bool {
        self.channel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_without_listener_are_dropped() {
        let ch = MapChannel::new();
        assert!(!ch.send(MapCommand::PanToUser));
        assert_eq!(ch.pending_commands(), 0);
    }

    #[test]
    fn subscribed_commands_are_queued_in_order() {
        let ch = MapChannel::new();
        let _sub = ch.subscribe(&MapCommand::NAMES);
        assert!(ch.send(MapCommand::PanToUser));
        assert!(ch.send(MapCommand::ResetMode));
        assert_eq!(ch.next_command(), Some(MapCommand::PanToUser));
        assert_eq!(ch.next_command(), Some(MapCommand::ResetMode));
        assert_eq!(ch.next_command(), None);
    }

    #[test]
    fn unsubscribe_is_atomic_and_idempotent() {
        let ch = MapChannel::new();
        let mut sub = ch.subscribe(&MapCommand::NAMES);
        ch.send(MapCommand::PanToUser);

        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        assert!(!sub.is_active());
        for name in MapCommand::NAMES {
            assert!(!ch.has_listener(name));
        }
        assert_eq!(ch.pending_commands(), 0);
        assert!(!ch.send(MapCommand::ResetMode));
    }

    #[test]
    fn other_subscribers_survive_an_unsubscribe() {
        let ch = MapChannel::new();
        let mut a = ch.subscribe(&["resetMode"]);
        let _b = ch.subscribe(&["resetMode"]);
        a.unsubscribe();
        assert!(ch.has_listener("resetMode"));
    }

    #[test]
    fn dropping_the_handle_unsubscribes() {
        let ch = MapChannel::new();
        {
            let _sub = ch.subscribe(&["panToUser"]);
            assert!(ch.has_listener("panToUser"));
        }
        assert!(!ch.has_listener("panToUser"));
    }

    #[test]
    fn notifications_drain_as_json() {
        let ch = MapChannel::new();
        ch.notify(MapNotification::WaypointOutOfRange);
        let json = ch.drain_notifications_json().unwrap();
        assert_eq!(json, r#"[{"name":"waypointOutOfRange"}]"#);
        assert!(ch.drain_notifications().is_empty());
    }

    #[test]
    fn send_json_decodes_commands() {
        let ch = MapChannel::new();
        let _sub = ch.subscribe(&MapCommand::NAMES);
        assert!(ch.send_json(r#"{ "name": "unselectAllStars" }"#).unwrap());
        assert!(ch.send_json("not json").is_err());
        assert_eq!(ch.next_command(), Some(MapCommand::UnselectAllStars));
    }
}
