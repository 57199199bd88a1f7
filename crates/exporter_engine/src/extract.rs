use exporter_core::{Locator, MessageAccumulator, MessageId, RawMessageRecord, Sticker};
use exporter_logging::exporter_debug;
use scraper::{ElementRef, Html, Selector};

use crate::locator::{base_record, snapshot_root};
use crate::{CompiledSelectors, HtmlLocator, ItemSnapshot, ScrollHost};

/// Extends a base record in place with extra fields read from the item element.
pub type Enricher = Box<dyn Fn(ElementRef<'_>, &mut RawMessageRecord)>;

/// Turns captured items into records: base fields, then every enricher in order.
pub struct MessageExtractor {
    selectors: CompiledSelectors,
    enrichers: Vec<Enricher>,
}

impl MessageExtractor {
    pub fn new(selectors: CompiledSelectors) -> Self {
        Self {
            selectors,
            enrichers: Vec::new(),
        }
    }

    /// Extractor with the attachment and sticker enrichers registered.
    pub fn with_default_enrichers(selectors: CompiledSelectors) -> Self {
        let attachments = attachment_enricher(selectors.attachment_link.clone());
        let stickers = sticker_enricher(selectors.sticker.clone());
        let mut extractor = Self::new(selectors);
        extractor.register(attachments);
        extractor.register(stickers);
        extractor
    }

    pub fn register(&mut self, enricher: Enricher) {
        self.enrichers.push(enricher);
    }

    pub fn extract(&self, items: &[ItemSnapshot]) -> Vec<RawMessageRecord> {
        let records: Vec<_> = items.iter().map(|item| self.record(item)).collect();
        exporter_debug!("extracted {} records", records.len());
        records
    }

    /// Records for everything the accumulator kept, in discovery order.
    pub fn extract_accumulated(
        &self,
        accumulator: &MessageAccumulator<ItemSnapshot>,
    ) -> Vec<RawMessageRecord> {
        let items: Vec<ItemSnapshot> = accumulator
            .get_all()
            .into_iter()
            .map(|(_, item)| item)
            .collect();
        self.extract(&items)
    }

    /// Records for whatever the host renders right now.
    pub fn extract_live<H: ScrollHost>(&self, locator: &HtmlLocator<H>) -> Vec<RawMessageRecord> {
        self.extract(&locator.list_visible_items())
    }

    fn record(&self, item: &ItemSnapshot) -> RawMessageRecord {
        let fragment = Html::parse_fragment(&item.html);
        let Some(element) = snapshot_root(&fragment) else {
            return RawMessageRecord {
                id: item
                    .identity
                    .as_ref()
                    .map(MessageId::to_string)
                    .unwrap_or_default(),
                ..RawMessageRecord::default()
            };
        };
        let mut record = base_record(&self.selectors, element, item.identity.as_ref());
        for enrich in &self.enrichers {
            enrich(element, &mut record);
        }
        record
    }
}

/// Collects the `href` of every matching link.
pub fn attachment_enricher(links: Selector) -> Enricher {
    Box::new(move |item: ElementRef<'_>, record: &mut RawMessageRecord| {
        record.attachments = item
            .select(&links)
            .filter_map(|a| a.value().attr("href"))
            .map(ToString::to_string)
            .collect();
    })
}

/// Collects `data-id` / `data-name` of every matching sticker node.
pub fn sticker_enricher(stickers: Selector) -> Enricher {
    Box::new(move |item: ElementRef<'_>, record: &mut RawMessageRecord| {
        record.stickers = item
            .select(&stickers)
            .map(|node| Sticker {
                id: node.value().attr("data-id").map(ToString::to_string),
                name: node.value().attr("data-name").map(ToString::to_string),
            })
            .collect();
    })
}
