use exporter_core::{Locator, MessageId, RawMessageRecord, ScrollMetrics};
use scraper::{ElementRef, Html};

use crate::{CompiledSelectors, ElementPath, ItemSnapshot, ScrollHost};

/// [`Locator`] over a [`ScrollHost`], re-parsing the host markup on every query.
pub struct HtmlLocator<H> {
    host: H,
    selectors: CompiledSelectors,
}

impl<H: ScrollHost> HtmlLocator<H> {
    pub fn new(host: H, selectors: CompiledSelectors) -> Self {
        Self { host, selectors }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn document(&self) -> Html {
        Html::parse_document(self.host.markup())
    }
}

impl<H: ScrollHost> Locator for HtmlLocator<H> {
    type Node = ElementPath;
    type Item = ItemSnapshot;

    fn find_list_root(&self) -> Option<ElementPath> {
        let document = self.document();
        let list = document.select(&self.selectors.list).next()?;
        Some(ElementPath::of(list))
    }

    fn parent(&self, node: &ElementPath) -> Option<ElementPath> {
        node.parent()
    }

    fn metrics(&self, node: &ElementPath) -> ScrollMetrics {
        self.host.metrics(node)
    }

    fn set_scroll_top(&mut self, node: &ElementPath, offset: u64) {
        self.host.set_scroll_top(node, offset);
    }

    fn list_visible_items(&self) -> Vec<ItemSnapshot> {
        let document = self.document();
        let Some(list) = document.select(&self.selectors.list).next() else {
            return Vec::new();
        };
        let mut items = Vec::new();
        for item in list.select(&self.selectors.item) {
            let identity = item
                .value()
                .attr(&self.selectors.identity_attribute)
                .filter(|id| !id.is_empty())
                .map(MessageId::from);
            items.push(ItemSnapshot {
                identity,
                html: item.html(),
            });
        }
        items
    }

    fn extract_identity(&self, item: &ItemSnapshot) -> Option<MessageId> {
        item.identity.clone()
    }

    fn extract_base(&self, item: &ItemSnapshot) -> RawMessageRecord {
        let fragment = Html::parse_fragment(&item.html);
        match snapshot_root(&fragment) {
            Some(element) => base_record(&self.selectors, element, item.identity.as_ref()),
            None => RawMessageRecord {
                id: item.identity.as_ref().map(ToString::to_string).unwrap_or_default(),
                ..RawMessageRecord::default()
            },
        }
    }
}

/// The item element of a re-parsed snapshot.
pub(crate) fn snapshot_root(fragment: &Html) -> Option<ElementRef<'_>> {
    fragment
        .root_element()
        .children()
        .find_map(ElementRef::wrap)
}

/// Timestamp, author and body of one item; absent parts become empty strings.
pub(crate) fn base_record(
    selectors: &CompiledSelectors,
    item: ElementRef<'_>,
    identity: Option<&MessageId>,
) -> RawMessageRecord {
    let wrapper = item.select(&selectors.wrapper).next().unwrap_or(item);
    let timestamp = wrapper
        .select(&selectors.timestamp)
        .next()
        .and_then(|el| el.value().attr(&selectors.timestamp_attribute))
        .unwrap_or_default()
        .to_string();

    RawMessageRecord {
        id: identity.map(ToString::to_string).unwrap_or_default(),
        timestamp,
        username: first_text(wrapper, &selectors.username),
        content: first_text(wrapper, &selectors.content),
        attachments: Vec::new(),
        stickers: Vec::new(),
    }
}

fn first_text(scope: ElementRef<'_>, selector: &scraper::Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
