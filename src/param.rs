//! Parameter request/response bookkeeping. The blocking
//! request/poll/timeout loop itself lives on `Node` (it needs to drive
//! `spin`); this module only tracks whether a response has arrived and
//! holds it until consumed.

use crate::messages::ParamResponse;

#[derive(Debug, Default)]
pub struct ParamClient {
    received: bool,
    response: Option<ParamResponse>,
}

impl ParamClient {
    pub fn new() -> Self {
        ParamClient::default()
    }

    /// Clears any stale response before a new request goes out.
    pub fn clear(&mut self) {
        self.received = false;
        self.response = None;
    }

    /// Called by the dispatcher when a `ParamResponse` arrives.
    pub fn mark_received(&mut self, response: ParamResponse) {
        self.response = Some(response);
        self.received = true;
    }

    pub fn received(&self) -> bool {
        self.received
    }

    /// Takes the stored response, if any, clearing the received flag.
    /// Once taken, a subsequent `get_param` is required to fetch another
    /// one; there is no way to "put it back".
    pub fn take_response(&mut self) -> Option<ParamResponse> {
        self.received = false;
        self.response.take()
    }
}

/// Extracts `ints` from `response` iff its length matches `expected_len`.
/// The response has already been taken out of the `ParamClient` by the time
/// this runs, so a mismatch means the caller must issue a fresh
/// `get_param`; there is nothing left to retry against.
pub fn expect_ints(response: ParamResponse, expected_len: usize) -> Option<Vec<i32>> {
    (response.ints.len() == expected_len).then_some(response.ints)
}

pub fn expect_floats(response: ParamResponse, expected_len: usize) -> Option<Vec<f32>> {
    (response.floats.len() == expected_len).then_some(response.floats)
}

pub fn expect_strings(response: ParamResponse, expected_len: usize) -> Option<Vec<String>> {
    (response.strings.len() == expected_len).then_some(response.strings)
}
