use folio::{Command, Effect, FolioConfig, Host, MemoryClipboard, MemoryStorage, Page, Storage};

const SAMPLE: &str = include_str!("../../../fixtures/whitepaper/sample.md");

/// Replays deferred commands the way a host timer would.
fn settle(page: &mut Page, effects: Vec<Effect>) -> Vec<Effect> {
    let mut out = Vec::new();
    for effect in effects {
        match effect {
            Effect::Defer { command, .. } => {
                let next = page.dispatch(command).unwrap();
                out.extend(settle(page, next));
            }
            other => out.push(other),
        }
    }
    out
}

#[test]
fn a_reading_session_round_trips_through_storage() {
    let storage = MemoryStorage::new();
    let clipboard = MemoryClipboard::new();
    let mut page = Page::boot(
        SAMPLE,
        Host::headless()
            .with_storage(storage)
            .with_clipboard(clipboard.clone()),
        FolioConfig::default(),
    )
    .unwrap();

    page.dispatch(Command::ToggleTheme).unwrap();
    page.dispatch(Command::ToggleSection {
        id: "9-metrics".into(),
    })
    .unwrap();
    let effects = page.click(&|e| e.has_class("copy-btn")).unwrap();
    let effects = settle(&mut page, effects);
    assert!(effects.is_empty());
    assert_eq!(clipboard.writes().len(), 1);
    let label = page.find(&|e| e.has_class("copy-btn")).unwrap().text_content();
    assert_eq!(label, "Copy");

    let storage = page.store().storage();
    assert_eq!(storage.get("theme").as_deref(), Some("dark"));
    assert_eq!(storage.get("collapsed-section-ids").as_deref(), Some(r#"["9-metrics"]"#));

    let saved = MemoryStorage::new()
        .with("theme", "dark")
        .with("collapsed-section-ids", r#"["9-metrics"]"#);
    let again = Page::boot(SAMPLE, Host::headless().with_storage(saved), FolioConfig::default()).unwrap();
    assert!(again.outline().is_collapsed("9-metrics"));
    assert_eq!(again.boot_effects()[0], Effect::SetTheme(folio::Theme::Dark));
}

#[test]
fn rendered_html_keeps_every_interactive_hook() {
    let page = Page::boot(SAMPLE, Host::headless(), FolioConfig::default()).unwrap();
    let html = page.html();
    for hook in [
        r#"class="hero lane-full"#,
        r#"data-section="1-introduction""#,
        "heading-link",
        r#"data-diagram="solution-0""#,
        r#"data-widget="revenue-split""#,
        r#"data-chart="revenue-split""#,
        r#"data-jump="phase-1-foundation""#,
        r#"class="copy-btn"#,
        "table-wrap",
        "data-reveal=",
    ] {
        assert!(html.contains(hook), "missing {hook}");
    }
    // Diagram payloads are replaced, only the rust listing stays a code block.
    assert_eq!(html.matches("<pre").count(), 1);

    let document = folio::shell::render_document(&page);
    assert!(document.contains(&html));
}

#[test]
fn config_overrides_change_runtime_constants() {
    let config = FolioConfig::from_json_str(
        r#"{"deepLink":{"delayMs":120},"storage":{"themeKey":"paper-theme"},"parallax":{"layers":[]}}"#,
    )
    .unwrap();
    let host = Host::headless()
        .with_storage(MemoryStorage::new().with("paper-theme", "dark"))
        .with_location("https://example.org/#7-governance".parse().unwrap());
    let page = Page::boot(SAMPLE, host, config).unwrap();

    assert_eq!(page.store().theme(), folio::Theme::Dark);
    assert!(page.parallax().layers().is_empty());
    assert!(!page.boot_effects().contains(&Effect::RequestFrame));
    assert!(page.boot_effects().contains(&Effect::Defer {
        delay_ms: 120,
        command: Command::Navigate {
            fragment: "7-governance".into()
        },
    }));
}
