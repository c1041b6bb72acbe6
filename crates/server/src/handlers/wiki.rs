use gridbot_discord::interaction::CommandData;
use gridbot_discord::response::{
    Choice, Embed, EmbedAuthor, InteractionResponse, MessageData,
};

use crate::dispatch::HandlerError;
use crate::wiki::WikiApi;

const AUTOCOMPLETE_LIMIT: u8 = 25;
const WIKIPEDIA_ICON: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/8/80/Wikipedia-logo-v2.svg/526px-Wikipedia-logo-v2.svg.png";

pub async fn command(
    data: &CommandData,
    wiki: &dyn WikiApi,
) -> Result<InteractionResponse, HandlerError> {
    let title = data.option_str("title", "Earth");
    let page = wiki.summary(&title).await?;

    let mut embed = Embed::new().title(&page.title).description(&page.extract).author(EmbedAuthor {
        name: "Wikipedia".to_string(),
        url: Some("https://en.wikipedia.org".to_string()),
        icon_url: Some(WIKIPEDIA_ICON.to_string()),
    });
    if let Some(urls) = &page.content_urls {
        embed = embed.url(&urls.desktop.page);
    }
    if let Some(timestamp) = &page.timestamp {
        embed = embed.timestamp(timestamp);
    }
    if let Some(thumbnail) = &page.thumbnail {
        embed = embed.thumbnail(&thumbnail.source);
    }
    if let Some(description) = &page.description {
        embed = embed.footer(description);
    }

    Ok(InteractionResponse::channel_message(MessageData::default().embed(embed)))
}

/// Empty queries produce an empty choice list rather than an error; the
/// platform fires autocomplete on every keystroke, including the first.
pub async fn autocomplete(
    data: &CommandData,
    wiki: &dyn WikiApi,
) -> Result<InteractionResponse, HandlerError> {
    let query = data.option_str("title", "");
    if query.trim().is_empty() {
        return Ok(InteractionResponse::autocomplete(Vec::new()));
    }

    let pages = wiki.search(query.trim(), AUTOCOMPLETE_LIMIT).await?;
    let choices = pages
        .into_iter()
        .map(|page| Choice {
            name: match &page.description {
                Some(description) => format!("{} - {description}", page.title),
                None => page.title.clone(),
            },
            value: page.title,
        })
        .collect();

    Ok(InteractionResponse::autocomplete(choices))
}
