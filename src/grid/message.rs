use serde_json::{json, Value};

/// Envelope `type` of selection messages.
pub const SELECTION_TYPE: &str = "MOLGRID_SELECTION";

/// Full selection snapshot posted by a grid surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionMessage {
    /// Grid the message belongs to.
    pub grid_id: String,
    /// Selected item identities, ascending.
    pub selection: Vec<usize>,
}

impl SelectionMessage {
    /// Snapshot for `grid_id`; the selection is sorted and deduplicated.
    #[must_use]
    pub fn new(grid_id: &str, selection: &[usize]) -> Self {
        let mut selection = selection.to_vec();
        selection.sort_unstable();
        selection.dedup();
        Self {
            grid_id: grid_id.to_owned(),
            selection,
        }
    }

    /// Wire form: `{gridId, type, selection}`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "gridId": self.grid_id,
            "type": SELECTION_TYPE,
            "selection": self.selection,
        })
    }

    /// Read a message off the shared channel. Anything that is not a
    /// well-formed selection message yields `None`.
    #[must_use]
    pub fn parse(msg: &Value) -> Option<Self> {
        if msg.get("type")?.as_str()? != SELECTION_TYPE {
            return None;
        }
        let grid_id = msg.get("gridId")?.as_str()?;
        let selection = msg
            .get("selection")?
            .as_array()?
            .iter()
            .map(|v| v.as_u64().and_then(|n| usize::try_from(n).ok()))
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(grid_id, &selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form() {
        let msg = SelectionMessage::new("g1", &[7, 2, 5, 2]);
        assert_eq!(
            msg.to_value(),
            json!({"gridId": "g1", "type": "MOLGRID_SELECTION", "selection": [2, 5, 7]})
        );
        assert_eq!(SelectionMessage::parse(&msg.to_value()), Some(msg));
    }

    #[test]
    fn malformed_messages_are_dropped() {
        for bad in [
            json!(null),
            json!("MOLGRID_SELECTION"),
            json!({"gridId": "g1", "selection": [1]}),
            json!({"gridId": "g1", "type": "OTHER", "selection": [1]}),
            json!({"type": "MOLGRID_SELECTION", "selection": [1]}),
            json!({"gridId": 3, "type": "MOLGRID_SELECTION", "selection": [1]}),
            json!({"gridId": "g1", "type": "MOLGRID_SELECTION", "selection": "1"}),
            json!({"gridId": "g1", "type": "MOLGRID_SELECTION", "selection": [1, -2]}),
            json!({"gridId": "g1", "type": "MOLGRID_SELECTION", "selection": [1.5]}),
        ] {
            assert_eq!(SelectionMessage::parse(&bad), None, "{bad}");
        }
    }
}
