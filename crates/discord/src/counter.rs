use gridbot_core::ValidationError;

use crate::custom_id::{self, DecodedCustomId, EncodeError};
use crate::response::{ActionRow, Button, ButtonStyle, MessageData, ModalData, TextInput};

/// Registry kind segment for counter identifiers.
pub const KIND: &str = "counter";

/// Trailing action verb on a counter control's custom_id. `Edit` and
/// `Delete` are not state transitions; they open a modal and start the
/// delete flow respectively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterAction {
    Increment,
    Decrement,
    Reset,
    Edit,
    Delete,
}

impl CounterAction {
    pub const fn as_verb(self) -> &'static str {
        match self {
            Self::Increment => "inc",
            Self::Decrement => "dec",
            Self::Reset => "res",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "inc" => Some(Self::Increment),
            "dec" => Some(Self::Decrement),
            "res" => Some(Self::Reset),
            "edit" => Some(Self::Edit),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// A counter's entire state. It has no server-side representation: it lives
/// only in the custom_ids of the currently displayed message, recovered and
/// re-encoded on every activation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterState {
    pub name: String,
    pub count: i64,
    pub initial: i64,
}

impl CounterState {
    /// Validates the display name once, at creation. Decoding trusts the
    /// wire format the codec itself produced and does not re-validate.
    pub fn new(name: impl Into<String>, initial: i64) -> Result<Self, ValidationError> {
        let name = name.into();
        if custom_id::contains_reserved_delimiter(&name) {
            return Err(ValidationError::new("Counter name cannot contain `;` or `/`"));
        }
        Ok(Self { name, count: initial, initial })
    }

    pub fn increment(&self) -> Self {
        Self { count: self.count + 1, ..self.clone() }
    }

    /// No floor; negative counts are valid.
    pub fn decrement(&self) -> Self {
        Self { count: self.count - 1, ..self.clone() }
    }

    pub fn reset(&self) -> Self {
        Self { count: self.initial, ..self.clone() }
    }

    /// Recovers the positional triple `[name, count, initial]`. Corrupt or
    /// missing numeric fields fall back rather than failing: `initial` to
    /// zero, `count` to the recovered `initial`. Extra trailing fields from
    /// a newer schema revision are ignored.
    pub fn from_decoded(decoded: &DecodedCustomId) -> Self {
        let name = decoded.fields.first().cloned().unwrap_or_default();
        let initial =
            decoded.fields.get(2).map(|raw| custom_id::parse_or(raw, 0)).unwrap_or(0);
        let count =
            decoded.fields.get(1).map(|raw| custom_id::parse_or(raw, initial)).unwrap_or(initial);
        Self { name, count, initial }
    }

    pub fn encoded(&self, action: Option<CounterAction>) -> Result<String, EncodeError> {
        custom_id::encode(
            KIND,
            &[&self.name, &self.count.to_string(), &self.initial.to_string()],
            action.map(CounterAction::as_verb),
        )
    }
}

/// Merges modal-submitted fields over the pre-edit state. The tolerant
/// policy applies uniformly: an unparsable numeric input keeps the pre-edit
/// number, and a submitted name carrying a reserved delimiter keeps the
/// pre-edit name (re-validation before anything is re-encoded).
pub fn apply_edit<'a, I>(pre_edit: &CounterState, submitted: I) -> CounterState
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut next = pre_edit.clone();
    for (field, value) in submitted {
        match field {
            "name" => {
                if !value.is_empty() && !custom_id::contains_reserved_delimiter(value) {
                    next.name = value.to_string();
                }
            }
            "value" => next.count = custom_id::parse_or(value, pre_edit.count),
            "initial" => next.initial = custom_id::parse_or(value, pre_edit.initial),
            _ => {}
        }
    }
    next
}

/// Renders the counter message body with its five controls. Each control
/// embeds the state that *results* from pressing it, so whichever one fires
/// next is self-contained.
pub fn render_message(state: &CounterState) -> Result<MessageData, EncodeError> {
    let row = ActionRow::buttons(vec![
        Button::emoji("➕", state.increment().encoded(Some(CounterAction::Increment))?)
            .style(ButtonStyle::Primary),
        Button::emoji("➖", state.decrement().encoded(Some(CounterAction::Decrement))?)
            .style(ButtonStyle::Primary),
        Button::emoji("🔄", state.reset().encoded(Some(CounterAction::Reset))?),
        Button::emoji("✏️", state.encoded(Some(CounterAction::Edit))?),
        Button::emoji("🗑️", state.encoded(Some(CounterAction::Delete))?)
            .style(ButtonStyle::Danger),
    ]);

    Ok(MessageData::new(format!("**{}**: {}", state.name, state.count))
        .suppress_mentions()
        .component_row(row))
}

/// Builds the edit modal, pre-filled from the current state. The modal's
/// own custom_id carries the pre-edit triple (no action verb) so the submit
/// handler has a fallback basis.
pub fn edit_modal(state: &CounterState) -> Result<ModalData, EncodeError> {
    Ok(ModalData {
        custom_id: state.encoded(None)?,
        title: format!("Edit \"{}\"", state.name),
        components: vec![
            ActionRow::text_input(
                TextInput::short("name", "Name").value(&state.name).max_length(32),
            ),
            ActionRow::text_input(
                TextInput::short("value", "Value").value(state.count.to_string()),
            ),
            ActionRow::text_input(
                TextInput::short("initial", "Initial Value").value(state.initial.to_string()),
            ),
        ],
    })
}
