//! The byte-driven receive state machine. Consumes one byte per `feed`
//! call and produces a whole, checksum-verified frame when one completes.
//! Every failure mode is a counter increment; the parser must keep making
//! forward progress on a noisy link, never return an error.

use crate::checksum::Accumulator;
use crate::counters::ErrorCounters;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum State {
    FirstFF,
    SecondFF,
    TopicLow,
    TopicHigh,
    SizeLow,
    SizeHigh,
    Message,
    Checksum,
}

/// A frame that has cleared the checksum and is ready for dispatch. Borrows
/// the state machine's internal buffer, so it must be consumed (or copied
/// out) before the next byte is fed.
pub struct ReceivedFrame<'a> {
    pub topic_id: u16,
    payload: &'a [u8],
}

impl<'a> ReceivedFrame<'a> {
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}

/// Parses the wire frame format out of a raw byte stream. Owns one fixed
/// `max_payload`-sized buffer; never allocates after construction.
pub struct RxStateMachine {
    state: State,
    topic_lo: u8,
    topic: u16,
    remaining: u16,
    data_index: usize,
    accum: Accumulator,
    buffer: Vec<u8>,
    max_payload: usize,
}

impl RxStateMachine {
    pub fn new(max_payload: usize) -> Self {
        RxStateMachine {
            state: State::FirstFF,
            topic_lo: 0,
            topic: 0,
            remaining: 0,
            data_index: 0,
            accum: Accumulator::new(),
            buffer: vec![0u8; max_payload],
            max_payload,
        }
    }

    /// Forces the parser back to its initial state, discarding any
    /// partially received frame. Used when the connection is judged dead
    /// (`TimeSync::tick`) to flush a stale half-parse.
    pub fn reset(&mut self) {
        self.state = State::FirstFF;
        self.topic_lo = 0;
        self.topic = 0;
        self.remaining = 0;
        self.data_index = 0;
        self.accum = Accumulator::new();
    }

    /// Feeds one byte through the state machine. Returns `Some` exactly
    /// when a frame just completed and passed its checksum.
    pub fn feed(&mut self, byte: u8, counters: &mut ErrorCounters) -> Option<ReceivedFrame<'_>> {
        match self.state {
            State::FirstFF => {
                if byte == 0xFF {
                    self.state = State::SecondFF;
                } else {
                    counters.bump_state();
                }
            }
            State::SecondFF => {
                if byte == 0xFF {
                    self.state = State::TopicLow;
                } else {
                    self.reset();
                    counters.bump_state();
                }
            }
            State::TopicLow => {
                self.accum = Accumulator::seeded(byte);
                self.topic_lo = byte;
                self.state = State::TopicHigh;
            }
            State::TopicHigh => {
                self.accum.push(byte);
                self.topic = self.topic_lo as u16 | ((byte as u16) << 8);
                self.state = State::SizeLow;
            }
            State::SizeLow => {
                self.accum.push(byte);
                self.remaining = byte as u16;
                self.state = State::SizeHigh;
            }
            State::SizeHigh => {
                self.accum.push(byte);
                self.remaining |= (byte as u16) << 8;

                if self.remaining == 0 {
                    self.state = State::Checksum;
                } else if self.remaining as usize > self.max_payload {
                    self.reset();
                    counters.bump_invalid_size();
                } else {
                    self.data_index = 0;
                    self.state = State::Message;
                }
            }
            State::Message => {
                self.accum.push(byte);
                self.buffer[self.data_index] = byte;
                self.data_index += 1;
                self.remaining -= 1;

                if self.remaining == 0 {
                    self.state = State::Checksum;
                }
            }
            State::Checksum => {
                let ok = self.accum.verify(byte);
                let topic = self.topic;
                let len = self.data_index;
                self.reset();

                if !ok {
                    counters.bump_checksum();
                    return None;
                }

                return Some(ReceivedFrame {
                    topic_id: topic,
                    payload: &self.buffer[..len],
                });
            }
        }

        None
    }
}
