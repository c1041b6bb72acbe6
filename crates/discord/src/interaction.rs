use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

// https://discord.com/developers/docs/reference#snowflakes
const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// One inbound notification from the platform. Immutable once received; the
/// `token` is the one-time key for any follow-up webhook calls.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "WireInteraction")]
pub struct Interaction {
    pub id: String,
    pub application_id: String,
    pub token: String,
    pub guild_id: Option<String>,
    pub channel_id: Option<String>,
    pub user: Option<User>,
    pub payload: InteractionPayload,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
}

/// Category-specific payload, discriminated by Discord's numeric `type`.
/// An unrecognized discriminant parses as `Unsupported` so classification,
/// not serde, owns the rejection.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionPayload {
    Ping,
    Command(CommandData),
    Component(ComponentData),
    Autocomplete(CommandData),
    Modal(ModalSubmitData),
    Unsupported(u8),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OptionValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl CommandData {
    pub fn option_str(&self, name: &str, default: &str) -> String {
        match self.find(name) {
            Some(OptionValue::String(value)) => value.clone(),
            _ => default.to_string(),
        }
    }

    pub fn option_i64(&self, name: &str, default: i64) -> i64 {
        match self.find(name) {
            Some(OptionValue::Integer(value)) => *value,
            _ => default,
        }
    }

    pub fn option_bool(&self, name: &str, default: bool) -> bool {
        match self.find(name) {
            Some(OptionValue::Boolean(value)) => *value,
            _ => default,
        }
    }

    fn find(&self, name: &str) -> Option<&OptionValue> {
        self.options.iter().find(|option| option.name == name).map(|option| &option.value)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ComponentData {
    pub custom_id: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ModalSubmitData {
    pub custom_id: String,
    #[serde(default)]
    pub components: Vec<ModalRow>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ModalRow {
    #[serde(default)]
    pub components: Vec<ModalField>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ModalField {
    pub custom_id: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: u8,
}

impl ModalSubmitData {
    /// Flattens the field groups into (field custom_id, submitted value)
    /// pairs, keeping only text inputs.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.components
            .iter()
            .flat_map(|row| row.components.iter())
            .filter(|field| field.kind == 4)
            .map(|field| (field.custom_id.as_str(), field.value.as_str()))
    }
}

/// Creation time baked into a snowflake id; used for "from ... to ..."
/// timestamps in deferred replies.
pub fn snowflake_timestamp(id: &str) -> Option<DateTime<Utc>> {
    let raw: u64 = id.trim().parse().ok()?;
    let millis = (raw >> 22) as i64 + DISCORD_EPOCH_MS;
    Utc.timestamp_millis_opt(millis).single()
}

#[derive(Debug, Error)]
pub enum InteractionParseError {
    #[error("interaction type {0} is missing its data block")]
    MissingData(u8),
    #[error("interaction data block did not match its type: {0}")]
    Data(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct WireInteraction {
    id: String,
    application_id: String,
    #[serde(rename = "type")]
    kind: u8,
    token: String,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    guild_id: Option<String>,
    #[serde(default)]
    channel_id: Option<String>,
    #[serde(default)]
    member: Option<GuildMember>,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Deserialize)]
struct GuildMember {
    #[serde(default)]
    user: Option<User>,
}

impl TryFrom<WireInteraction> for Interaction {
    type Error = InteractionParseError;

    fn try_from(wire: WireInteraction) -> Result<Self, Self::Error> {
        let payload = match wire.kind {
            1 => InteractionPayload::Ping,
            2 => InteractionPayload::Command(parse_data(wire.kind, wire.data.clone())?),
            3 => InteractionPayload::Component(parse_data(wire.kind, wire.data.clone())?),
            4 => InteractionPayload::Autocomplete(parse_data(wire.kind, wire.data.clone())?),
            5 => InteractionPayload::Modal(parse_data(wire.kind, wire.data.clone())?),
            other => InteractionPayload::Unsupported(other),
        };

        // Guild interactions nest the user under `member`; DMs put it at the top.
        let user = wire.member.and_then(|member| member.user).or(wire.user);

        Ok(Self {
            id: wire.id,
            application_id: wire.application_id,
            token: wire.token,
            guild_id: wire.guild_id,
            channel_id: wire.channel_id,
            user,
            payload,
        })
    }
}

fn parse_data<T: serde::de::DeserializeOwned>(
    kind: u8,
    data: Option<Value>,
) -> Result<T, InteractionParseError> {
    let value = data.ok_or(InteractionParseError::MissingData(kind))?;
    Ok(serde_json::from_value(value)?)
}
