//! Topic identifiers and the publisher/subscriber slot descriptors the
//! registry owns.

/// Topic id of the inbound negotiation trigger, and also the outbound wire
/// topic under which publisher `TopicInfo` frames are announced. The two
/// uses never collide since one is inbound-only and the other outbound-only.
pub const TOPIC_NEGOTIATION: u16 = 0;
pub const TOPIC_PUBLISHERS: u16 = 0;
pub const TOPIC_SUBSCRIBERS: u16 = 1;
pub const ID_TIME: u16 = 10;
pub const ID_PARAMETER_REQUEST: u16 = 11;
pub const ID_LOG: u16 = 12;

/// First dynamically assigned topic id. Subscribers occupy
/// `[DYNAMIC_ID_START, DYNAMIC_ID_START + max_subscribers)`, publishers
/// occupy the following `max_publishers`-wide range.
pub const DYNAMIC_ID_START: u16 = 100;

/// A registered publisher. Holds no reference back to the node; `advertise`
/// returns only the assigned id, and publishing happens through
/// `Node::publish(id, ...)`, which avoids a publisher holding a `&mut Node`.
#[derive(Debug, Clone)]
pub struct PublisherSlot {
    pub id: u16,
    pub topic_name: String,
    pub message_type: String,
}

/// A registered subscriber. `handler` returns `false` to reject a payload
/// as malformed (counted, never propagated as an `Error`).
pub struct SubscriberSlot {
    pub id: u16,
    pub topic_name: String,
    pub message_type: String,
    pub handler: Box<dyn FnMut(&[u8]) -> bool>,
}

impl std::fmt::Debug for SubscriberSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberSlot")
            .field("id", &self.id)
            .field("topic_name", &self.topic_name)
            .field("message_type", &self.message_type)
            .finish()
    }
}
