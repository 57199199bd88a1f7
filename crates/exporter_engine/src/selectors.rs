use exporter_core::Selectors;
use scraper::Selector;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector for {field} ({query:?}): {message}")]
pub struct SelectorError {
    pub field: &'static str,
    pub query: String,
    pub message: String,
}

/// Parsed form of the configured structural queries.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub list: Selector,
    pub item: Selector,
    pub wrapper: Selector,
    pub timestamp: Selector,
    pub username: Selector,
    pub content: Selector,
    pub attachment_link: Selector,
    pub sticker: Selector,
    pub identity_attribute: String,
    pub timestamp_attribute: String,
}

impl CompiledSelectors {
    pub fn compile(selectors: &Selectors) -> Result<Self, SelectorError> {
        Ok(Self {
            list: parse("message_list", &selectors.message_list)?,
            item: parse("message_item", &selectors.message_item)?,
            wrapper: parse("message_wrapper", &selectors.message_wrapper)?,
            timestamp: parse("timestamp", &selectors.timestamp)?,
            username: parse("username", &selectors.username)?,
            content: parse("content", &selectors.content)?,
            attachment_link: parse("attachment_link", &selectors.attachment_link)?,
            sticker: parse("sticker", &selectors.sticker)?,
            identity_attribute: selectors.identity_attribute.clone(),
            timestamp_attribute: selectors.timestamp_attribute.clone(),
        })
    }
}

fn parse(field: &'static str, query: &str) -> Result<Selector, SelectorError> {
    Selector::parse(query).map_err(|err| SelectorError {
        field,
        query: query.to_string(),
        message: format!("{err:?}"),
    })
}
