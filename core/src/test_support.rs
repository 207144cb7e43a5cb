use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::Mutex;

use slide_common::Resolution;
use slide_imagegen::{ByteStream, GenerationBackend, GenerationError};

pub(crate) enum Reply {
    /// Body chunks, delivered in order, then the stream closes.
    Stream(Vec<&'static str>),
    /// Body chunks followed by a transport error.
    Broken(Vec<&'static str>, GenerationError),
    Reject(GenerationError),
}

/// Replays one scripted reply per submitted job. Downloads return `image:<url>`.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    pub prompts: Mutex<Vec<String>>,
    pub downloads: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn submitted(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn downloaded(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

fn chunks(parts: Vec<&'static str>) -> Vec<Result<Bytes, GenerationError>> {
    parts
        .into_iter()
        .map(|part| Ok(Bytes::from_static(part.as_bytes())))
        .collect()
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn submit(&self, prompt: &str, _image_size: Resolution) -> slide_imagegen::Result<ByteStream> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Stream(Vec::new()));
        match reply {
            Reply::Stream(parts) => Ok(stream::iter(chunks(parts)).boxed()),
            Reply::Broken(parts, error) => {
                let mut items = chunks(parts);
                items.push(Err(error));
                Ok(stream::iter(items).boxed())
            }
            Reply::Reject(error) => Err(error),
        }
    }

    async fn download(&self, url: &str) -> slide_imagegen::Result<Bytes> {
        self.downloads.lock().unwrap().push(url.to_string());
        Ok(Bytes::from(format!("image:{url}")))
    }
}
