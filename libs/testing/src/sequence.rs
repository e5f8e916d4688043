use std::sync::atomic::{AtomicUsize, Ordering};

use wiremock::{Request, Respond, ResponseTemplate};

/// Responder that replays responses in order, repeating the last one.
#[derive(Debug)]
pub struct Sequence {
    responses: Vec<ResponseTemplate>,
    next: AtomicUsize,
}

impl Sequence {
    /// Create a sequence. At least one response is required.
    pub fn new(responses: Vec<ResponseTemplate>) -> Self {
        assert!(!responses.is_empty(), "a sequence needs at least one response");
        Self {
            responses,
            next: AtomicUsize::new(0),
        }
    }

    /// JSON bodies, all with status 200.
    pub fn json<I>(bodies: I) -> Self
    where
        I: IntoIterator<Item = serde_json::Value>,
    {
        Self::new(
            bodies
                .into_iter()
                .map(|body| ResponseTemplate::new(200).set_body_json(body))
                .collect(),
        )
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let idx = self.next.fetch_add(1, Ordering::SeqCst);
        let last = self.responses.len() - 1;
        self.responses[idx.min(last)].clone()
    }
}
