use std::sync::{Arc, RwLock};
use std::collections::HashMap;
use std::any::Any;
use super::topic::Topic;
use super::message::Message;

pub struct TopicRegistry{
    topics: RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl TopicRegistry{
    pub fn new() -> Self{
        TopicRegistry{
            topics: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_or_create<T: Message>(&self, name: &str, capacity: usize) -> Arc<Topic<T>>{
        let mut topics = self.topics.write().unwrap();
        if let Some(existing) = topics.get(name){
            if let Ok(topic) = existing.clone().downcast::<Topic<T>>(){
                return topic;
            }
        }
        let topic = Arc::new(Topic::<T>::new(name, capacity));
        topics.insert(name.to_string(), topic.clone() as Arc<dyn Any + Send + Sync>);
        topic
    }

    pub fn topic_count(&self) -> usize{
        self.topics.read().unwrap().len()
    }
}

impl Default for TopicRegistry{
    fn default() -> Self{
        Self::new()
    }
}

#[cfg(test)]
mod tests{
    use super::*;

    #[test]
    fn test_registry_get_or_create(){
        let registry = TopicRegistry::new();
        let topic1: Arc<Topic<f64>> = registry.get_or_create("/vesc/rpm_cmd", 8);
        let topic2: Arc<Topic<bool>> = registry.get_or_create("/vesc/ready", 16);
        assert_eq!(topic1.name(), "/vesc/rpm_cmd");
        assert_eq!(topic2.name(), "/vesc/ready");
        assert_eq!(registry.topic_count(), 2);
    }

    #[test]
    fn test_registry_same_topic_returns_same(){
        let registry = TopicRegistry::new();
        let topic1: Arc<Topic<f64>> = registry.get_or_create("/vesc/velocity_cmd", 8);
        topic1.publish(4.2);
        let topic2: Arc<Topic<f64>> = registry.get_or_create("/vesc/velocity_cmd", 8);
        let val = topic2.try_receive().unwrap();
        assert_eq!(val, 4.2);
        assert_eq!(registry.topic_count(), 1);
    }
}
