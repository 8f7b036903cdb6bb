//! Routes a validated frame to the registry, time-sync, parameter client or
//! a subscriber handler.
//!
//! Takes its dependencies as a bundle of disjoint borrows rather than a
//! single `&mut Node`, the same technique the teacher uses in `CommCtx`
//! (`server/lib/neutronium/src/net/endpoint.rs`).

use crate::counters::ErrorCounters;
use crate::error::Result;
use crate::frame::FrameCodec;
use crate::link::ByteLink;
use crate::messages::{self, ParamResponse};
use crate::param::ParamClient;
use crate::registry::TopicRegistry;
use crate::timesync::TimeSync;
use crate::topic::{ID_PARAMETER_REQUEST, ID_TIME, TOPIC_NEGOTIATION};

/// The disjoint pieces of `Node` state a dispatch needs to touch.
pub struct DispatchCtx<'a> {
    pub registry: &'a mut TopicRegistry,
    pub timesync: &'a mut TimeSync,
    pub param: &'a mut ParamClient,
    pub counters: &'a mut ErrorCounters,
    pub codec: &'a FrameCodec,
    pub link: &'a mut dyn ByteLink,
    pub msg_buf: &'a mut Vec<u8>,
    pub frame_buf: &'a mut Vec<u8>,
}

impl<'a> DispatchCtx<'a> {
    fn send(&mut self, topic_id: u16, payload: &[u8]) -> Result<()> {
        self.codec.encode(topic_id, payload, self.frame_buf)?;
        self.link.write_many(self.frame_buf)
    }

    fn emit_negotiation(&mut self) -> Result<()> {
        let infos: Vec<(u16, messages::TopicInfo)> = self.registry.topic_infos().collect();
        let max = self.codec.max_payload();

        for (wire_topic, info) in infos {
            if self.msg_buf.len() < max {
                self.msg_buf.resize(max, 0);
            }
            let len = messages::encode(&info, &mut self.msg_buf[..max])?;
            let payload = self.msg_buf[..len].to_vec();
            self.send(wire_topic, &payload)?;
        }
        Ok(())
    }
}

/// Routes one validated frame. `now_ms` is the spin's sampled time, used by
/// both the negotiation-triggered time-sync kick and `TimeSync::complete`.
pub fn dispatch(topic_id: u16, payload: &[u8], now_ms: u64, ctx: &mut DispatchCtx<'_>) -> Result<()> {
    match topic_id {
        TOPIC_NEGOTIATION => {
            ctx.emit_negotiation()?;
            ctx.timesync.request(now_ms, ctx.codec, ctx.link, ctx.frame_buf)
        }
        ID_TIME => {
            ctx.timesync.complete(now_ms, payload);
            Ok(())
        }
        ID_PARAMETER_REQUEST => {
            if let Some(response) = messages::decode::<ParamResponse>(payload) {
                ctx.param.mark_received(response);
            }
            Ok(())
        }
        id => {
            if let Some(slot) = ctx.registry.subscriber_mut(id) {
                if !(slot.handler)(payload) {
                    ctx.counters.bump_malformed_message();
                }
            } else {
                ctx.counters.bump_unknown_topic();
            }
            Ok(())
        }
    }
}
