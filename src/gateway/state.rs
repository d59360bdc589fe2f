use std::path::PathBuf;
use std::sync::Arc;

use crate::answer::AnswerService;
use crate::cache::CacheStore;
use crate::generation::Generator;

pub struct HandlerState<S, G> {
    pub service: Arc<AnswerService<S, G>>,

    /// Served at `GET /` when the file exists.
    pub index_html: PathBuf,
}

impl<S, G> Clone for HandlerState<S, G> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            index_html: self.index_html.clone(),
        }
    }
}

impl<S, G> HandlerState<S, G>
where
    S: CacheStore + Clone + 'static,
    G: Generator + 'static,
{
    pub fn new(service: Arc<AnswerService<S, G>>, index_html: impl Into<PathBuf>) -> Self {
        Self {
            service,
            index_html: index_html.into(),
        }
    }
}
