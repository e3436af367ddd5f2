use super::{InferenceService, RoutineService};
use crate::data_uri::DataUri;
use crate::models::Prediction;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum MockReply {
    Predictions(Vec<Prediction>),
    Transport(String),
    Format(String),
}

pub struct MockInferenceClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    received: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            received: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_predictions(self, predictions: Vec<Prediction>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Predictions(predictions));
        self
    }

    pub fn with_transport_error(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Transport(message.to_string()));
        self
    }

    pub fn with_format_error(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Format(message.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Data URIs received so far, in call order.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

impl Default for MockInferenceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceService for MockInferenceClient {
    async fn predict(&self, image: &DataUri) -> Result<Vec<Prediction>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.received.lock().unwrap().push(image.to_string());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Default mock response
            return Ok(vec![Prediction {
                condition: "Healthy".to_string(),
                probability: 1.0,
            }]);
        }

        let index = (*count - 1) % replies.len();
        match &replies[index] {
            MockReply::Predictions(predictions) => Ok(predictions.clone()),
            MockReply::Transport(message) => Err(Error::Transport(message.clone())),
            MockReply::Format(message) => Err(Error::Format(message.clone())),
        }
    }
}

pub struct MockRoutineClient {
    responses: Arc<Mutex<Vec<String>>>,
    requests: Arc<Mutex<Vec<(String, f64)>>>,
    fail: bool,
    call_count: Arc<Mutex<usize>>,
}

impl MockRoutineClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail: false,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_routine_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Every call fails with an `AiProvider` error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// `(condition, probability)` pairs received so far.
    pub fn requests(&self) -> Vec<(String, f64)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockRoutineClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoutineService for MockRoutineClient {
    async fn generate_routine(&self, condition: &str, probability: f64) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.requests
            .lock()
            .unwrap()
            .push((condition.to_string(), probability));

        if self.fail {
            return Err(Error::AiProvider("mock routine failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(format!("Daily Routine:\n- Gentle care for {}", condition))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
