//! Hand-off of pricing requests to background tasks and of their replies
//! back to the event loop that owns the page.
//!
//! Each dispatch spawns an independent task. Replies arrive on the channel
//! in completion order, not issue order, and nothing is de-duplicated or
//! cancelled: whichever reply is applied last is what the page shows.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::service::{PricingService, ServiceError};
use crate::wire::{BondPricingRequest, BondPricingResponse, OptionPricingRequest, OptionPricingResponse};

/// Result of one form activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response was written to the page
    Rendered,
    /// Nothing was selected and the policy stopped the request
    Blocked,
    /// The service failed; the page was left untouched
    Failed(ServiceError),
}

/// Service reply tagged with the sequence number of its request
#[derive(Debug)]
pub enum Reply {
    /// Reply of the option pricing endpoint
    Option {
        /// Sequence number assigned at dispatch
        seq: u64,
        /// Service result
        result: Result<OptionPricingResponse, ServiceError>,
    },
    /// Reply of the bond pricing endpoint
    Bond {
        /// Sequence number assigned at dispatch
        seq: u64,
        /// Service result
        result: Result<BondPricingResponse, ServiceError>,
    },
}

impl Reply {
    /// Sequence number of the originating request
    pub fn seq(&self) -> u64 {
        match self {
            Self::Option { seq, .. } | Self::Bond { seq, .. } => *seq,
        }
    }
}

/// Spawns one task per request and forwards replies over a channel
pub struct Dispatcher<P: ?Sized> {
    service: Arc<P>,
    tx: UnboundedSender<Reply>,
    next_seq: u64,
}

impl<P> Dispatcher<P>
where
    P: PricingService + ?Sized + 'static,
{
    /// Create a dispatcher and the receiving end of its reply channel
    pub fn new(service: Arc<P>) -> (Self, UnboundedReceiver<Reply>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                service,
                tx,
                next_seq: 0,
            },
            rx,
        )
    }

    /// Number of requests dispatched so far
    pub fn dispatched(&self) -> u64 {
        self.next_seq
    }

    fn take_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Send an option pricing request in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch_option(&mut self, request: OptionPricingRequest) -> u64 {
        let seq = self.take_seq();
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        debug!(seq, ?request, "dispatching option pricing request");
        tokio::spawn(async move {
            let result = service.price_option(&request).await;
            if tx.send(Reply::Option { seq, result }).is_err() {
                debug!(seq, "event loop gone, option reply dropped");
            }
        });
        seq
    }

    /// Send a bond pricing request in the background
    pub fn dispatch_bond(&mut self, request: BondPricingRequest) -> u64 {
        let seq = self.take_seq();
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        debug!(seq, ?request, "dispatching bond pricing request");
        tokio::spawn(async move {
            let result = service.price_bond(&request).await;
            if tx.send(Reply::Bond { seq, result }).is_err() {
                debug!(seq, "event loop gone, bond reply dropped");
            }
        });
        seq
    }
}
