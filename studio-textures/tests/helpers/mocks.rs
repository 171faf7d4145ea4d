//! Mock external services

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use studio_textures::models::{MaterialDescriptor, TextureProjection};
use studio_textures::services::{
    AiError, ImageError, ImageGenerator, ImageRequest, SemanticDecision, SemanticMatchRequest,
    SemanticMatcher, SimilarityScorer,
};

type Responder =
    Box<dyn Fn(&SemanticMatchRequest) -> Result<SemanticDecision, AiError> + Send + Sync>;

/// Semantic matcher that counts calls and answers from a closure
pub struct CountingMatcher {
    calls: AtomicUsize,
    responder: Responder,
}

impl CountingMatcher {
    pub fn new(
        responder: impl Fn(&SemanticMatchRequest) -> Result<SemanticDecision, AiError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            responder: Box::new(responder),
        }
    }

    /// Every call fails with a network error
    pub fn failing() -> Self {
        Self::new(|_| Err(AiError::NetworkError("connection refused".to_string())))
    }

    /// Every call answers `Unclear`
    pub fn unclear() -> Self {
        Self::new(|_| {
            Ok(SemanticDecision::Unclear {
                reasoning: "not enough information".to_string(),
            })
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SemanticMatcher for CountingMatcher {
    async fn match_material(&self, request: &SemanticMatchRequest) -> Result<SemanticDecision, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.responder)(request)
    }
}

/// Image generator that records requests and returns a deterministic URL
#[derive(Default)]
pub struct RecordingImages {
    requests: Mutex<Vec<ImageRequest>>,
}

impl RecordingImages {
    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for RecordingImages {
    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<String>, ImageError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(Some(format!(
            "https://images.test/{}.png",
            request.name.en.to_lowercase().replace(' ', "-")
        )))
    }
}

/// Scorer returning the same score for every texture
pub struct FixedScorer(pub f64);

impl SimilarityScorer for FixedScorer {
    fn score(&self, _descriptor: &MaterialDescriptor, _texture: &TextureProjection) -> f64 {
        self.0
    }
}
