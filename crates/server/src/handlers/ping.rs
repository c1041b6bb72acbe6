use gridbot_core::config::DisplayConfig;
use gridbot_discord::interaction::CommandData;
use gridbot_discord::response::{InteractionResponse, MessageData};

pub fn handle(data: &CommandData, display: &DisplayConfig) -> InteractionResponse {
    let name = data.option_str("name", "world");
    InteractionResponse::channel_message(MessageData::new(format!(
        "Hello {name} from gridbot {}!\nHostname: `{}`",
        env!("CARGO_PKG_VERSION"),
        display.hostname
    )))
}
