//! Mock I/O boundaries shared by the integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ccd::config::Settings;
use ccd::infrastructure::di::ServiceContainer;
use ccd::infrastructure::traits::{
    ApiRequest, ApiResponse, Body, HttpTransport, Launcher, RealFileSystem, SelectionItem,
    Selector, TextInput,
};

pub const API_URL: &str = "http://cd.test";
pub const API_KEY: &str = "test-key";

/// Transport that replays canned responses and records every request.
///
/// When the queue runs dry it answers `200` with an empty body.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, String>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(ApiResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `METHOD url` of every request, in order.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url))
            .collect()
    }

    pub fn last(&self) -> ApiRequest {
        self.requests()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, String> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ApiResponse {
                    status: 200,
                    body: String::new(),
                })
            })
    }
}

/// JSON body of a request, panicking on raw or missing bodies.
pub fn json_body(request: &ApiRequest) -> serde_json::Value {
    match &request.body {
        Some(Body::Json(value)) => value.clone(),
        other => panic!("expected JSON body, got {other:?}"),
    }
}

/// Selector that returns a predetermined selection and remembers prompts.
pub struct MockSelector {
    selection_index: Option<usize>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockSelector {
    pub fn new(selection_index: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            selection_index,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Selector for MockSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.selection_index {
            Some(idx) if idx < items.len() => Ok(Some(items[idx].clone())),
            Some(_) => Err("Index out of bounds".to_string()),
            None => Ok(None), // User cancelled
        }
    }
}

/// Text input answering every prompt with fixed values.
pub struct MockInput {
    pub text: String,
    pub secret: String,
}

impl MockInput {
    pub fn new(text: &str, secret: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            secret: secret.to_string(),
        })
    }
}

impl TextInput for MockInput {
    fn text(&self, _prompt: &str, _default: Option<&str>) -> Result<String, String> {
        Ok(self.text.clone())
    }

    fn secret(&self, _prompt: &str) -> Result<String, String> {
        Ok(self.secret.clone())
    }
}

/// Launcher that records URLs instead of opening them.
#[derive(Default)]
pub struct MockLauncher {
    opened: Mutex<Vec<String>>,
}

impl MockLauncher {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl Launcher for MockLauncher {
    fn open(&self, url: &str) -> std::io::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub fn test_settings() -> Settings {
    Settings {
        api_url: API_URL.to_string(),
        api_key: API_KEY.to_string(),
        ..Settings::default()
    }
}

/// Service container over mocks; keeps handles for assertions.
pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub selector: Arc<MockSelector>,
    pub launcher: Arc<MockLauncher>,
    pub container: ServiceContainer,
}

impl Harness {
    pub fn new(selection_index: Option<usize>, input: Arc<MockInput>) -> Self {
        ccd::util::testing::init_test_setup();
        let transport = MockTransport::new();
        let selector = MockSelector::new(selection_index);
        let launcher = Arc::new(MockLauncher::default());
        let container = ServiceContainer::with_deps(
            test_settings(),
            transport.clone(),
            Arc::new(RealFileSystem),
            selector.clone(),
            input,
            launcher.clone(),
        );
        Self {
            transport,
            selector,
            launcher,
            container,
        }
    }

    /// Harness whose selector picks the first item and whose prompts answer "".
    pub fn simple() -> Self {
        Self::new(Some(0), MockInput::new("", ""))
    }
}
