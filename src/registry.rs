//! Holds publisher/subscriber descriptors and assigns dynamic topic ids.
//! Slots fill sequentially and are never vacated, since `advertise` and
//! `subscribe` are startup-time operations, so a plain growing `Vec`
//! bounded by a fixed capacity already gives "first empty slot" semantics
//! without the free-list machinery `Endpoint` uses for its short-lived
//! connection slots (`server/lib/neutronium/src/net/endpoint.rs`).
//! The registry owns only descriptors, never a runtime publisher handle.

use crate::error::{Error, Result};
use crate::messages::TopicInfo;
use crate::topic::{PublisherSlot, SubscriberSlot, DYNAMIC_ID_START, TOPIC_PUBLISHERS, TOPIC_SUBSCRIBERS};

pub struct TopicRegistry {
    publishers: Vec<PublisherSlot>,
    subscribers: Vec<SubscriberSlot>,
    max_publishers: usize,
    max_subscribers: usize,
}

impl TopicRegistry {
    pub fn new(max_publishers: usize, max_subscribers: usize) -> Self {
        TopicRegistry {
            publishers: Vec::with_capacity(max_publishers),
            subscribers: Vec::with_capacity(max_subscribers),
            max_publishers,
            max_subscribers,
        }
    }

    /// Registers a publisher and returns its assigned topic id, or
    /// `RegistryFull` once `max_publishers` slots are taken.
    pub fn advertise(&mut self, topic_name: String, message_type: String) -> Result<u16> {
        if self.publishers.len() >= self.max_publishers {
            return Err(Error::RegistryFull);
        }

        let id = DYNAMIC_ID_START + self.max_subscribers as u16 + self.publishers.len() as u16;
        self.publishers.push(PublisherSlot {
            id,
            topic_name,
            message_type,
        });
        Ok(id)
    }

    /// Registers a subscriber and returns its assigned topic id, or
    /// `RegistryFull` once `max_subscribers` slots are taken.
    pub fn subscribe(
        &mut self,
        topic_name: String,
        message_type: String,
        handler: Box<dyn FnMut(&[u8]) -> bool>,
    ) -> Result<u16> {
        if self.subscribers.len() >= self.max_subscribers {
            return Err(Error::RegistryFull);
        }

        let id = DYNAMIC_ID_START + self.subscribers.len() as u16;
        self.subscribers.push(SubscriberSlot {
            id,
            topic_name,
            message_type,
            handler,
        });
        Ok(id)
    }

    /// Looks up the subscriber slot whose dynamic id is `id`, if live.
    pub fn subscriber_mut(&mut self, id: u16) -> Option<&mut SubscriberSlot> {
        let idx = id.checked_sub(DYNAMIC_ID_START)? as usize;
        self.subscribers.get_mut(idx)
    }

    /// Every occupied slot's negotiation announcement: publishers first,
    /// then subscribers, each paired with the outer wire topic it is
    /// announced under. Pure data; the caller is responsible for encoding
    /// and sending each one.
    pub fn topic_infos(&self) -> impl Iterator<Item = (u16, TopicInfo)> + '_ {
        self.publishers
            .iter()
            .map(|p| {
                (
                    TOPIC_PUBLISHERS,
                    TopicInfo {
                        topic_id: p.id,
                        topic_name: p.topic_name.clone(),
                        message_type: p.message_type.clone(),
                    },
                )
            })
            .chain(self.subscribers.iter().map(|s| {
                (
                    TOPIC_SUBSCRIBERS,
                    TopicInfo {
                        topic_id: s.id,
                        topic_name: s.topic_name.clone(),
                        message_type: s.message_type.clone(),
                    },
                )
            }))
    }
}
