use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use super::topic::Topic;
use super::message::Message;

pub struct Subscriber<T: Message>{
    topic: Arc<Topic<T>>,
    last_seen_epoch: AtomicU64,
}

impl<T: Message> Subscriber<T>{
    pub fn new(topic: Arc<Topic<T>>) -> Self{
        Subscriber{
            topic,
            last_seen_epoch: AtomicU64::new(0),
        }
    }

    pub fn try_recv(&self) -> Option<T>{
        self.topic.try_receive()
    }

    pub fn peek_latest(&self) -> Option<(T, u64)>{
        self.topic.peek_latest()
    }

    pub fn has_new(&self) -> bool{
        let current = self.topic.latest_epoch();
        let last = self.last_seen_epoch.load(Ordering::SeqCst);
        current > last
    }

    pub fn mark_seen(&self){
        let current = self.topic.latest_epoch();
        self.last_seen_epoch.store(current, Ordering::SeqCst);
    }

    pub fn topic_name(&self) -> &str{
        self.topic.name()
    }
}
