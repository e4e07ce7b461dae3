use crate::core::{BookingRequest, SubmissionError};
use tracing::{info, warn};

/// Where finished bookings go. The shipped implementation only logs them.
pub trait BookingBackend {
    fn submit(&mut self, request: &BookingRequest) -> Result<(), SubmissionError>;
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    fail: bool,
    submitted: Vec<BookingRequest>,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every submission fails, exercising the retry path.
    pub fn failing() -> Self {
        Self {
            fail: true,
            submitted: Vec::new(),
        }
    }

    pub fn set_failing(&mut self, fail: bool) {
        self.fail = fail;
    }

    pub fn submitted(&self) -> &[BookingRequest] {
        &self.submitted
    }
}

impl BookingBackend for SimulatedBackend {
    fn submit(&mut self, request: &BookingRequest) -> Result<(), SubmissionError> {
        if self.fail {
            warn!(email = %request.email, "simulated backend rejected booking");
            return Err(SubmissionError::Failed("simulated outage".to_string()));
        }
        match serde_json::to_string(request) {
            Ok(json) => info!(booking = %json, "booking submitted"),
            Err(err) => warn!(error = %err, "booking submitted but could not be serialized"),
        }
        self.submitted.push(request.clone());
        Ok(())
    }
}

impl<B: BookingBackend + ?Sized> BookingBackend for Box<B> {
    fn submit(&mut self, request: &BookingRequest) -> Result<(), SubmissionError> {
        (**self).submit(request)
    }
}
