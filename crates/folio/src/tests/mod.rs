use crate::host::Host;
use crate::page::Page;
use crate::FolioConfig;

mod command;

const SAMPLE: &str = include_str!("../../../../fixtures/whitepaper/sample.md");

fn boot(host: Host) -> Page {
    Page::boot(SAMPLE, host, FolioConfig::default()).expect("sample boots")
}

fn headless() -> Page {
    boot(Host::headless())
}
