use thiserror::Error;

use crate::custom_id;
use crate::interaction::{CommandData, ComponentData, Interaction, InteractionPayload, ModalSubmitData};

/// Closed command registry. Adding a command means adding a variant here,
/// which the dispatcher's exhaustive match then forces you to handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandName {
    Ping,
    Sleep,
    Wiki,
    Counter,
}

impl CommandName {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ping" => Some(Self::Ping),
            "sleep" => Some(Self::Sleep),
            "wiki" => Some(Self::Wiki),
            "counter" => Some(Self::Counter),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Sleep => "sleep",
            Self::Wiki => "wiki",
            Self::Counter => "counter",
        }
    }
}

/// Commands whose options support autocompletion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutocompleteName {
    Wiki,
}

impl AutocompleteName {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "wiki" => Some(Self::Wiki),
            _ => None,
        }
    }
}

/// Stateful component kinds, keyed by the custom_id's kind segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    Counter,
}

impl ComponentKind {
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "counter" => Some(Self::Counter),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalKind {
    Counter,
}

impl ModalKind {
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "counter" => Some(Self::Counter),
            _ => None,
        }
    }
}

/// A classified event: the registry entry it resolved to, plus a borrow of
/// its category payload so handlers get the right data by construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Route<'a> {
    Ping,
    Command(CommandName, &'a CommandData),
    Autocomplete(AutocompleteName, &'a CommandData),
    Component(ComponentKind, &'a ComponentData),
    Modal(ModalKind, &'a ModalSubmitData),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("unsupported interaction type {0}")]
    UnsupportedType(u8),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("unknown autocomplete target `{0}`")]
    UnknownAutocomplete(String),
    #[error("custom_id belongs to another producer")]
    ForeignCustomId,
    #[error("malformed custom_id")]
    MalformedCustomId,
    #[error("unknown component kind `{0}`")]
    UnknownComponentKind(String),
    #[error("unknown modal kind `{0}`")]
    UnknownModalKind(String),
}

impl ClassifyError {
    /// Foreign identifiers are constant traffic on a shared transport and
    /// deserve debug severity at most; everything else is worth a warning.
    pub fn is_routine(&self) -> bool {
        matches!(self, Self::ForeignCustomId)
    }
}

/// Two-stage classification: discriminate on the structural category, then
/// resolve the declared name (commands) or the custom_id's namespace + kind
/// segments (components/modals) against the closed registries. The state
/// blob is not decoded here.
pub fn classify(interaction: &Interaction) -> Result<Route<'_>, ClassifyError> {
    match &interaction.payload {
        InteractionPayload::Ping => Ok(Route::Ping),
        InteractionPayload::Command(data) => CommandName::from_name(&data.name)
            .map(|name| Route::Command(name, data))
            .ok_or_else(|| ClassifyError::UnknownCommand(data.name.clone())),
        InteractionPayload::Autocomplete(data) => AutocompleteName::from_name(&data.name)
            .map(|name| Route::Autocomplete(name, data))
            .ok_or_else(|| ClassifyError::UnknownAutocomplete(data.name.clone())),
        InteractionPayload::Component(data) => {
            let kind = owned_kind(&data.custom_id)?;
            ComponentKind::from_kind(kind)
                .map(|component| Route::Component(component, data))
                .ok_or_else(|| ClassifyError::UnknownComponentKind(kind.to_string()))
        }
        InteractionPayload::Modal(data) => {
            let kind = owned_kind(&data.custom_id)?;
            ModalKind::from_kind(kind)
                .map(|modal| Route::Modal(modal, data))
                .ok_or_else(|| ClassifyError::UnknownModalKind(kind.to_string()))
        }
        InteractionPayload::Unsupported(kind) => Err(ClassifyError::UnsupportedType(*kind)),
    }
}

fn owned_kind(raw: &str) -> Result<&str, ClassifyError> {
    if !custom_id::is_ours(raw) {
        return Err(ClassifyError::ForeignCustomId);
    }
    custom_id::peek_kind(raw).ok_or(ClassifyError::MalformedCustomId)
}
