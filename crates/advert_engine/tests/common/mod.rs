#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use advert_engine::{ProgressSink, ScrapeEvent};

#[derive(Default)]
pub struct TestSink {
    events: Mutex<Vec<ScrapeEvent>>,
}

impl TestSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn take(&self) -> Vec<ScrapeEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: ScrapeEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn init_logging() {
    advert_logging::initialize_for_tests();
}
