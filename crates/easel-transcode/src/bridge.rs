//! Parse round-trip over channels.
//!
//! The HTML parser may live on the other side of a process or thread
//! boundary, so requests travel as serializable messages and every
//! round-trip carries a timeout. Dropping either end surfaces as
//! [`TranscodeError::ParseChannelClosed`] rather than a hang.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::element::ContentElement;
use crate::error::TranscodeError;
use crate::parser;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseRequest {
    pub html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResponse {
    pub elements: Vec<ContentElement>,
}

pub type ParseExchange = (ParseRequest, oneshot::Sender<ParseResponse>);

/// Client side of the round-trip. Cheap to clone.
#[derive(Clone)]
pub struct ParserHandle {
    tx: mpsc::Sender<ParseExchange>,
    timeout: Duration,
}

impl ParserHandle {
    pub fn new(tx: mpsc::Sender<ParseExchange>, timeout: Duration) -> Self {
        Self { tx, timeout }
    }

    pub async fn parse(&self, html: &str) -> Result<Vec<ContentElement>, TranscodeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = ParseRequest {
            html: html.to_string(),
        };
        self.tx
            .send((request, reply_tx))
            .await
            .map_err(|_| TranscodeError::ParseChannelClosed)?;
        match tokio::time::timeout(self.timeout, reply_rx).await {
            Ok(Ok(response)) => Ok(response.elements),
            Ok(Err(_)) => Err(TranscodeError::ParseChannelClosed),
            Err(_) => Err(TranscodeError::ParseTimeout(self.timeout.as_millis() as u64)),
        }
    }
}

/// Server side: answer parse requests until every handle is dropped.
pub async fn serve(mut rx: mpsc::Receiver<ParseExchange>) {
    while let Some((request, reply)) = rx.recv().await {
        let elements = parser::parse_content(&request.html);
        debug!(elements = elements.len(), "parsed html fragment");
        // The requester may have timed out; nothing to do then.
        let _ = reply.send(ParseResponse { elements });
    }
}

/// Handle backed by a parser task on the current runtime.
pub fn in_process(timeout: Duration) -> ParserHandle {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(serve(rx));
    ParserHandle::new(tx, timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_through_the_parser_task() {
        let handle = in_process(Duration::from_millis(5000));
        let elements = handle.parse("<h1>Hi</h1><p>body</p>").await.unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text, "Hi");
    }

    #[tokio::test]
    async fn unanswered_request_times_out() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = ParserHandle::new(tx, Duration::from_millis(50));
        // Accept the request but never reply.
        let parked = tokio::spawn(async move {
            let (_request, reply) = rx.recv().await.unwrap();
            std::mem::forget(reply);
            std::future::pending::<()>().await;
        });
        let err = handle.parse("<p>x</p>").await.unwrap_err();
        assert!(matches!(err, TranscodeError::ParseTimeout(50)));
        parked.abort();
    }

    #[tokio::test]
    async fn dropped_server_closes_the_channel() {
        let (tx, rx) = mpsc::channel::<ParseExchange>(1);
        drop(rx);
        let handle = ParserHandle::new(tx, Duration::from_millis(100));
        let err = handle.parse("<p>x</p>").await.unwrap_err();
        assert!(matches!(err, TranscodeError::ParseChannelClosed));
    }
}
