mod support;

use exporter_core::{Locator, MessageId, RawMessageRecord};
use exporter_engine::{event_channel, HostEvent, HtmlLocator, ReplayHost, ScrollHost};
use pretty_assertions::assert_eq;
use support::{frame, message, numbered_frames, selectors, StaticHost};

fn replay_locator(frames: Vec<String>) -> HtmlLocator<ReplayHost> {
    let selectors = selectors();
    let host = ReplayHost::new(frames, &selectors.list).unwrap();
    HtmlLocator::new(host, selectors)
}

#[test]
fn scrollable_ancestor_is_the_lists_container() {
    let locator = replay_locator(numbered_frames(2, 2));

    let list = locator.find_list_root().unwrap();
    assert!(!locator.metrics(&list).overflows());

    let scroller = locator.find_scrollable_ancestor(&list);
    assert_eq!(Some(scroller.clone()), list.parent());
    assert_eq!(&scroller, locator.host().container());
}

#[test]
fn ancestor_search_falls_back_to_the_list_itself() {
    let locator = HtmlLocator::new(
        StaticHost {
            markup: frame(&[message("a", "u", "", "x")]),
        },
        selectors(),
    );
    let list = locator.find_list_root().unwrap();
    assert_eq!(locator.find_scrollable_ancestor(&list), list);
}

#[test]
fn missing_list_is_not_found() {
    let locator = HtmlLocator::new(
        StaticHost {
            markup: "<html><body><p>loading…</p></body></html>".to_string(),
        },
        selectors(),
    );
    assert_eq!(locator.find_list_root(), None);
    assert!(locator.list_visible_items().is_empty());
}

#[test]
fn items_carry_identity_and_snapshot() {
    let markup = frame(&[
        message("chat-messages-1", "alice", "2024-01-01T00:00:00Z", "hi"),
        r#"<li role="listitem"><div role="article">divider</div></li>"#.to_string(),
        message("chat-messages-2", "bob", "2024-01-01T00:01:00Z", "yo"),
    ]);
    let locator = HtmlLocator::new(StaticHost { markup }, selectors());

    let items = locator.list_visible_items();
    assert_eq!(items.len(), 3);
    let ids: Vec<_> = items.iter().map(|i| locator.extract_identity(i)).collect();
    assert_eq!(
        ids,
        vec![
            Some(MessageId::from("chat-messages-1")),
            None,
            Some(MessageId::from("chat-messages-2")),
        ]
    );
    assert!(items[0].html.contains("message-content-chat-messages-1"));
}

#[test]
fn base_record_reads_each_part_and_defaults_the_rest() {
    let markup = frame(&[
        message("m1", "  alice ", "2024-01-01T00:00:00Z", "hello <b>there</b>"),
        r#"<li role="listitem" id="m2"><span>bare</span></li>"#.to_string(),
    ]);
    let locator = HtmlLocator::new(StaticHost { markup }, selectors());
    let items = locator.list_visible_items();

    assert_eq!(
        locator.extract_base(&items[0]),
        RawMessageRecord {
            id: "m1".to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            username: "alice".to_string(),
            content: "hello there".to_string(),
            attachments: Vec::new(),
            stickers: Vec::new(),
        }
    );
    assert_eq!(
        locator.extract_base(&items[1]),
        RawMessageRecord {
            id: "m2".to_string(),
            ..RawMessageRecord::default()
        }
    );
}

#[test]
fn replay_loads_older_frames_when_pushed_to_the_top() {
    let (tx, mut rx) = event_channel();
    let selectors = selectors();
    let mut host = ReplayHost::new(numbered_frames(3, 2), &selectors.list)
        .unwrap()
        .with_events(tx);
    let container = host.container().clone();

    let start = host.metrics(&container);
    assert!(start.overflows());
    assert!(start.scroll_top > 0);

    host.set_scroll_top(&container, 0);
    assert_eq!(host.current_frame(), 1);
    assert!(host.metrics(&container).scroll_top > 0);
    assert_eq!(rx.try_recv().ok(), Some(HostEvent::ListMutated));

    host.set_scroll_top(&container, 0);
    host.set_scroll_top(&container, 0);
    assert_eq!(host.current_frame(), 2);
    assert_eq!(host.metrics(&container).scroll_top, 0);
    assert_eq!(rx.try_recv().ok(), Some(HostEvent::ListMutated));
    assert!(rx.try_recv().is_err());
}

#[test]
fn replay_requires_the_list_in_the_first_frame() {
    let selectors = selectors();
    let result = ReplayHost::new(vec!["<p>nothing</p>".to_string()], &selectors.list);
    assert!(result.is_err());
    assert!(ReplayHost::new(Vec::new(), &selectors.list).is_err());
}

#[test]
fn frames_load_sorted_from_a_directory() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::write(temp.path().join("002.html"), "older").unwrap();
    std::fs::write(temp.path().join("001.html"), "newer").unwrap();
    std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

    let frames = exporter_engine::load_frames(temp.path()).unwrap();
    assert_eq!(frames, vec!["newer".to_string(), "older".to_string()]);

    let empty = tempfile::TempDir::new().unwrap();
    assert!(exporter_engine::load_frames(empty.path()).is_err());
}
