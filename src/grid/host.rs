//! Host side of the selection channel.
//!
//! Surfaces post raw JSON values into one shared channel; the single
//! [`HostListener`] drains it, drops anything that is not a selection
//! message for a registered grid, and replaces that grid's selection
//! wholesale. Delivery is at most once and in send order.

use std::sync::mpsc;

use rustc_hash::FxHashMap;
use serde_json::Value;

use super::SelectionMessage;

/// Host-side model of one grid: the only state synchronized back from the
/// surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridModel {
    id: String,
    selection: Vec<usize>,
}

impl GridModel {
    /// Empty selection for `id`.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            selection: Vec::new(),
        }
    }

    /// Grid id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Selected item identities, ascending.
    #[must_use]
    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    /// Persisted form: the selection as a JSON array string.
    #[must_use]
    pub fn selection_json(&self) -> String {
        serde_json::to_string(&self.selection).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Replace the selection if `msg` is addressed to this grid.
    pub fn apply(&mut self, msg: &SelectionMessage) -> bool {
        if msg.grid_id != self.id {
            return false;
        }
        self.selection.clone_from(&msg.selection);
        true
    }
}

/// Sending half, held by grid surfaces.
#[derive(Debug, Clone)]
pub struct SurfacePort {
    tx: mpsc::Sender<Value>,
}

impl SurfacePort {
    /// Post any value. Returns `false` once the listener is gone.
    pub fn post(&self, msg: Value) -> bool {
        self.tx.send(msg).is_ok()
    }

    /// Post the full selection of `grid_id`.
    pub fn post_selection(&self, grid_id: &str, selection: &[usize]) -> bool {
        self.post(SelectionMessage::new(grid_id, selection).to_value())
    }
}

/// The single host subscription, routing messages by grid id.
#[derive(Debug)]
pub struct HostListener {
    rx: mpsc::Receiver<Value>,
    grids: FxHashMap<String, GridModel>,
}

/// Create a connected port/listener pair.
#[must_use]
pub fn channel() -> (SurfacePort, HostListener) {
    let (tx, rx) = mpsc::channel();
    (
        SurfacePort { tx },
        HostListener {
            rx,
            grids: FxHashMap::default(),
        },
    )
}

impl HostListener {
    /// Start routing messages for `id`. Re-registering keeps the current
    /// selection.
    pub fn register(&mut self, id: &str) -> &GridModel {
        self.grids
            .entry(id.to_owned())
            .or_insert_with(|| GridModel::new(id))
    }

    /// Model for `id`, if registered.
    #[must_use]
    pub fn model(&self, id: &str) -> Option<&GridModel> {
        self.grids.get(id)
    }

    /// Deliver everything queued so far. Returns how many messages updated
    /// a grid.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(raw) = self.rx.try_recv() {
            let Some(msg) = SelectionMessage::parse(&raw) else {
                log::trace!("ignoring non-selection message");
                continue;
            };
            match self.grids.get_mut(&msg.grid_id) {
                Some(model) => {
                    if model.apply(&msg) {
                        applied += 1;
                    }
                }
                None => log::trace!("ignoring selection for unknown grid '{}'", msg.grid_id),
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn selection_replaces_wholesale() {
        let (port, mut host) = channel();
        let _ = host.register("g1");
        assert!(port.post_selection("g1", &[2, 5, 7]));
        assert_eq!(host.pump(), 1);
        assert_eq!(host.model("g1").unwrap().selection(), &[2, 5, 7]);

        assert!(port.post_selection("g1", &[5]));
        assert_eq!(host.pump(), 1);
        assert_eq!(host.model("g1").unwrap().selection(), &[5]);
        assert_eq!(host.model("g1").unwrap().selection_json(), "[5]");
    }

    #[test]
    fn grids_do_not_cross_deliver() {
        let (port, mut host) = channel();
        let _ = host.register("g1");
        let _ = host.register("g2");
        let _ = port.post_selection("g2", &[1]);
        let _ = port.post_selection("g3", &[9]);
        assert_eq!(host.pump(), 1);
        assert!(host.model("g1").unwrap().selection().is_empty());
        assert_eq!(host.model("g2").unwrap().selection(), &[1]);
        assert!(host.model("g3").is_none());
    }

    #[test]
    fn unrelated_traffic_is_ignored() {
        let (port, mut host) = channel();
        let _ = host.register("g1");
        let _ = port.post(json!({"kind": "resize", "width": 300}));
        let _ = port.post(json!({"gridId": "g1", "selection": [1]}));
        let _ = port.post(json!({"gridId": "g1", "type": "MOLGRID_SELECTION", "selection": [3]}));
        assert_eq!(host.pump(), 1);
        assert_eq!(host.model("g1").unwrap().selection(), &[3]);
    }

    #[test]
    fn last_delivered_wins() {
        let (port, mut host) = channel();
        let _ = host.register("g1");
        let _ = port.post_selection("g1", &[1, 2]);
        let _ = port.post_selection("g1", &[]);
        assert_eq!(host.pump(), 2);
        assert_eq!(host.model("g1").unwrap().selection_json(), "[]");
    }

    #[test]
    fn re_register_keeps_selection() {
        let (port, mut host) = channel();
        let _ = host.register("g1");
        let _ = port.post_selection("g1", &[4]);
        let _ = host.pump();
        assert_eq!(host.register("g1").selection(), &[4]);
    }
}
