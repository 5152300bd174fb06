use std::sync::Arc;
use super::topic::Topic;
use super::message::Message;

pub struct Publisher<T: Message>{
    topic: Arc<Topic<T>>,
}

impl<T: Message> Publisher<T>{
    pub fn new(topic: Arc<Topic<T>>) -> Self{
        Publisher{ topic }
    }

    pub fn publish(&self, msg: T) -> u64{
        self.topic.publish(msg)
    }

    pub fn topic_name(&self) -> &str{
        self.topic.name()
    }
}

impl<T: Message> Clone for Publisher<T>{
    fn clone(&self) -> Self{
        Publisher{ topic: Arc::clone(&self.topic) }
    }
}

#[cfg(test)]
mod tests{
    use super::*;

    #[test]
    fn test_publisher_publish(){
        let topic = Arc::new(Topic::<f64>::new("/vesc/duty_cycle_cmd", 8));
        let publisher = Publisher::new(Arc::clone(&topic));
        let e1 = publisher.publish(25.0);
        let e2 = publisher.publish(50.0);
        assert_eq!(e1, 1);
        assert_eq!(e2, 2);
        assert_eq!(publisher.topic_name(), "/vesc/duty_cycle_cmd");
        assert_eq!(topic.len(), 2);
    }
}
